//! The two maze roles and their asymmetric view of the level.
//!
//! Asymmetric information is the entire gameplay premise: each role can
//! perceive only a subset of the entity types and has to rely on the
//! partner's calls for the rest. The visibility rule is therefore part of
//! the game contract, not a rendering detail.

use crate::maze_logic::level::{Entity, EntityKind};
use channel_lib::traits::PairRole;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MazeRole {
    /// Sees the keys, cannot see the hazards. Triggers them by stepping on one.
    KeyFinder,
    /// Sees doors and hazards, cannot see the keys.
    Navigator,
}

impl PairRole for MazeRole {
    const FIRST: Self = MazeRole::KeyFinder;
    const SECOND: Self = MazeRole::Navigator;
}

impl MazeRole {
    /// The visibility filter for this role. Selected once at role
    /// assignment; the renderer asks nothing else.
    ///
    /// - Keys: only the key finder, only while uncollected.
    /// - Doors: the navigator always, the key finder only once opened.
    /// - Hazards: only the navigator.
    /// - The goal: everyone.
    ///
    /// Triggered hazards are spent and vanish for both roles.
    pub fn sees(&self, entity: &Entity) -> bool {
        if entity.triggered {
            return false;
        }
        match entity.kind {
            EntityKind::Key(_) => *self == MazeRole::KeyFinder && !entity.collected,
            EntityKind::Door(_) => *self == MazeRole::Navigator || entity.opened,
            EntityKind::Hazard(_) => *self == MazeRole::Navigator,
            EntityKind::Goal => true,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            MazeRole::KeyFinder => "Key Finder",
            MazeRole::Navigator => "Navigator",
        }
    }
}
