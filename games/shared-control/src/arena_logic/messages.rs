//! Everything the shared-control game sends over the room channel.

use crate::arena_logic::input::InputState;
use channel_lib::reconcile::AxisSample;
use serde::{Deserialize, Serialize};

/// How the session ended, from the sender's point of view.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    Won,
    Lost,
}

/// The broadcast payload of the shared-control game.
#[derive(Clone, Serialize, Deserialize)]
pub enum ArenaMessage {
    /// The sender's accumulated input flags, sent on every input edge.
    /// Last value wins on the receiver side.
    Input {
        player_id: String,
        input: InputState,
    },
    /// The authoritative value of the sender's owned axis. Sent right after
    /// every committed step and on the periodic cadence.
    SyncPos(AxisSample),
    /// The session outcome; wins and losses are detected locally and must
    /// be broadcast explicitly for the peer to follow.
    GameState { result: GameOutcome },
}
