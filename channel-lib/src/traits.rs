//! Core abstractions shared by the two games.
//!
//! A game brings its own broadcast payload type (an enum of everything it
//! sends over the room channel) and its own role type. The channel layer
//! only requires that payloads serialize with postcard and that roles can
//! be produced from a slot in the sorted presence roster.

use serde::Serialize;
use serde::de::DeserializeOwned;

/// Marker trait for types that can be serialized with postcard.
///
/// This combines [`Serialize`] and [`DeserializeOwned`] into a single bound,
/// reducing boilerplate in generic signatures. All types implementing both
/// traits automatically implement `SerializationCap`.
pub trait SerializationCap: Serialize + DeserializeOwned {}
impl<T> SerializationCap for T where T: Serialize + DeserializeOwned {}

/// A two-element role set, exclusive per room.
///
/// Role assignment is a pure function of the sorted set of connected player
/// identities: the lexicographically first identity gets [`Self::FIRST`],
/// the second gets [`Self::SECOND`]. Anybody beyond slot 1 gets no role.
/// Each game implements this once for its own role enum; everything
/// role-dependent (input mapping, entity visibility) lives as methods on
/// that enum so the branch is selected a single time at assignment.
pub trait PairRole: Copy {
    /// The role of the lexicographically first player.
    const FIRST: Self;
    /// The role of the second player.
    const SECOND: Self;

    /// Maps a slot in the sorted identity list to a role.
    fn from_slot(slot: usize) -> Option<Self> {
        match slot {
            0 => Some(Self::FIRST),
            1 => Some(Self::SECOND),
            _ => None,
        }
    }
}
