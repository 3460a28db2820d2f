//! Client side library for the realtime two player games.
//!
//! The library talks to the relay over a WebSocket, keeps the presence
//! roster of the room, assigns the two roles deterministically, runs the
//! session state machine with its countdown and reconciles the peer
//! position under the single-writer-per-axis model.

pub use protocol::PresenceRecord;

pub mod channel_interface;
pub mod countdown;
pub mod game_channel;
pub mod identity;
pub mod presence;
pub mod reconcile;
pub mod session;
pub mod traits;
