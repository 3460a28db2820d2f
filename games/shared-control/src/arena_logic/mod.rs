//! The module for the shared-control game logic: the static arena, the
//! input flags, the two control roles with their key mapping, the step
//! simulation, the channel payloads and the session flow.

pub mod access;
pub mod flow;
pub mod input;
pub mod level;
pub mod messages;
pub mod role;
pub mod simulation;
