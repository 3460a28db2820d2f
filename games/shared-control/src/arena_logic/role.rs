//! The two control roles and the key mapping puzzle.
//!
//! Each role's natural movement keys drive its owned axis; the two arrows
//! it does not need are repurposed as the jump and crouch actions. The
//! intended invariant across both roles: any top-or-left key means jump,
//! any bottom-or-right key means crouch.

use channel_lib::reconcile::Axis;
use channel_lib::traits::PairRole;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ArenaRole {
    /// Owns the x axis, moves with left/right.
    Horizontal,
    /// Owns the y axis, moves with up/down.
    Vertical,
}

impl PairRole for ArenaRole {
    const FIRST: Self = ArenaRole::Horizontal;
    const SECOND: Self = ArenaRole::Vertical;
}

/// The four directional keys, before the role gives them a meaning.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArrowKey {
    Up,
    Down,
    Left,
    Right,
}

/// A movement along the owned axis, toward smaller or larger coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MoveDir {
    Negative,
    Positive,
}

/// What a directional key means for a concrete role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    Step(MoveDir),
    Jump,
    Crouch,
}

impl ArenaRole {
    /// The axis this role is the single writer of.
    pub fn owned_axis(&self) -> Axis {
        match self {
            ArenaRole::Horizontal => Axis::Horizontal,
            ArenaRole::Vertical => Axis::Vertical,
        }
    }

    /// The input mapper, selected once at role assignment.
    pub fn map_arrow(&self, arrow: ArrowKey) -> InputAction {
        match self {
            ArenaRole::Horizontal => match arrow {
                ArrowKey::Left => InputAction::Step(MoveDir::Negative),
                ArrowKey::Right => InputAction::Step(MoveDir::Positive),
                ArrowKey::Up => InputAction::Jump,
                ArrowKey::Down => InputAction::Crouch,
            },
            ArenaRole::Vertical => match arrow {
                ArrowKey::Up => InputAction::Step(MoveDir::Negative),
                ArrowKey::Down => InputAction::Step(MoveDir::Positive),
                ArrowKey::Left => InputAction::Jump,
                ArrowKey::Right => InputAction::Crouch,
            },
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ArenaRole::Horizontal => "HORIZONTAL (Left/Right)",
            ArenaRole::Vertical => "VERTICAL (Up/Down)",
        }
    }

    /// The key hints shown in the legend.
    pub fn jump_hint(&self) -> &'static str {
        match self {
            ArenaRole::Horizontal => "Up",
            ArenaRole::Vertical => "Left",
        }
    }

    pub fn crouch_hint(&self) -> &'static str {
        match self {
            ArenaRole::Horizontal => "Down",
            ArenaRole::Vertical => "Right",
        }
    }
}
