//! The frame tags for messages that we use. They are used consistent across the relay and the clients.
//! Also contains the join request and the presence record shared by both sides.

use serde::{Deserialize, Serialize};

/// The buffer sizes for the channels for intra VPS communication.
pub const CHANNEL_BUFFER_SIZE: usize = 256;

/// The length of a player identity on the wire. Identities are generated
/// client side as random alphanumeric strings of exactly this length.
pub const PLAYER_ID_LEN: usize = 8;

/// The length of a room code as entered by the players.
pub const ROOM_CODE_LEN: usize = 6;

// Client -> Relay.

/// First message on a fresh socket, followed by a postcard serialized [`JoinRequest`].
pub const JOIN: u8 = 0;

/// A broadcast to all other subscribers of the room, followed by the opaque game payload.
/// The relay injects the sender identity before fan-out.
pub const BROADCAST: u8 = 1;

/// The client leaves the room on purpose. Just the tag byte itself.
pub const CLIENT_LEAVES: u8 = 2;

// Relay -> Client.

/// The positive answer to a [`JOIN`]. Just the tag byte; presence follows separately.
pub const JOIN_ACK: u8 = 0;

/// The full roster of the room, followed by a postcard serialized `Vec<PresenceRecord>`.
/// Sent to every member whenever the membership changes.
pub const PRESENCE_SYNC: u8 = 1;

/// A relayed broadcast: tag, [`PLAYER_ID_LEN`] bytes of sender identity, then the game payload.
pub const BROADCAST_DELIVERY: u8 = 2;

/// The error message we add. Followed by UTF-8 text, the socket closes afterwards.
pub const SERVER_ERROR: u8 = 3;

/// One entry of the presence roster. Tracked by the relay, announced by the client on join.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PresenceRecord {
    /// Opaque identity, random per room occupancy, never persisted.
    pub player_id: String,
    /// RFC 3339 timestamp of the moment the client announced itself.
    pub joined_at: String,
}

/// The join request. This struct is used on the relay and on the client.
#[derive(Deserialize, Serialize)]
pub struct JoinRequest {
    /// Which game do we want to join.
    pub game_id: String,
    /// The room code the players agreed on, normalized to uppercase.
    pub room_code: String,
    /// The presence announcement of the joining player.
    pub presence: PresenceRecord,
}

impl JoinRequest {
    /// The channel name both peers rendezvous on. Derived deterministically
    /// from the human-entered code so any two clients with the same code
    /// land in the same room.
    pub fn channel_name(&self) -> String {
        format!("{}#{}", self.room_code, self.game_id)
    }
}
