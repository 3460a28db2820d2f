//! The shared input flags and their merge semantics.
//!
//! Each role physically controls only some of the flags, but the wire
//! message always carries the sender's full accumulated state. Receiving
//! the same state twice is a no-op by construction (last value wins), which
//! is what makes lost or reordered input broadcasts harmless.

use serde::{Deserialize, Serialize};

/// The boolean input flags of one peer. Movement flags belong to the owned
/// axis; jump and crouch are shared actions both peers may assert.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    pub jump: bool,
    pub crouch: bool,
}

impl InputState {
    /// The global jumping flag: whoever currently asserts it.
    pub fn jumping(local: &InputState, remote: &InputState) -> bool {
        local.jump || remote.jump
    }

    /// The global crouching flag: whoever currently asserts it.
    pub fn crouching(local: &InputState, remote: &InputState) -> bool {
        local.crouch || remote.crouch
    }
}
