//! Everything the maze game sends over the room channel.

use crate::maze_logic::level::{GridPos, HazardKind};
use crate::maze_logic::role::MazeRole;
use serde::{Deserialize, Serialize};

/// The broadcast payload of the maze game.
#[derive(Clone, Serialize, Deserialize)]
pub enum MazeMessage {
    /// Mirrors the mover's avatar on the partner's screen. Sent after every
    /// committed step; the receiver hard-sets its replicated copy.
    PlayerMove {
        player_id: String,
        pos: GridPos,
        role: MazeRole,
    },
    /// A domain event. See [`GameEvent`].
    GameEvent(GameEvent),
}

/// The domain events both peers exchange.
#[derive(Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// A coordination call from the signal buttons (stop, go, carry).
    Signal { message: String, player_id: String },
    /// The key finder stepped into a trap. Carries the effect class so the
    /// partner's countdown applies the same penalty.
    HazardHit { hazard: HazardKind, message: String },
    /// A key was picked up; the receiver opens the matching doors too.
    KeyCollected { entity_id: String },
    /// The session is lost (death trap or timeout).
    GameOver { reason: String },
    /// The goal was reached.
    GameWon { time_remaining: u32 },
}
