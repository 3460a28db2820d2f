//! This module handles game rooms where players rendezvous and exchange broadcasts.
//! It provides:
//! - [`Room`]: a broadcast channel plus the presence roster of its members
//! - [`AppState`]: global state holding all active rooms and game configurations
//! - [`reload_config`]: hot-reloading of game settings from `GameConfig.json`
//!
//! Rooms exist only as long as at least one member is subscribed: they are
//! created implicitly by the first join for an unknown channel name and
//! removed when the last member leaves. The roster here is the single
//! source of truth for presence.

use bytes::{BufMut, Bytes, BytesMut};
use postcard::to_stdvec;
use protocol::{BROADCAST_DELIVERY, PRESENCE_SYNC, PresenceRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::fs;
use tokio::sync::broadcast;
use tokio::sync::{Mutex, RwLock};

/// The game entry we have for one game.
#[derive(Serialize, Deserialize)]
pub struct GameEntry {
    /// The name of the game.
    pub name: String,
    /// The maximum amount of players (0 = no limit)
    pub max_players: u16,
}

type EntryList = Vec<GameEntry>;

/// The description of the room the players rendezvous in.
pub struct Room {
    /// Who is currently subscribed, keyed by player identity.
    pub members: HashMap<String, PresenceRecord>,
    /// The fan-out channel every member task subscribes to.
    pub broadcaster: broadcast::Sender<Bytes>, // Clone-able -> no Mutex!
}

impl Room {
    /// The roster frame reflecting the current membership. Broadcast to
    /// everybody whenever the membership changes.
    pub fn presence_frame(&self) -> Bytes {
        let roster: Vec<&PresenceRecord> = self.members.values().collect();
        let body = to_stdvec(&roster).expect("Could not serialize presence roster");
        let mut msg_builder = BytesMut::with_capacity(1 + body.len());
        msg_builder.put_u8(PRESENCE_SYNC);
        msg_builder.put_slice(&body);
        msg_builder.into()
    }
}

/// Builds the fan-out frame for one relayed broadcast: tag, sender identity,
/// opaque game payload. Receiver tasks use the identity for self filtering.
pub fn delivery_frame(sender_id: &str, payload: &[u8]) -> Bytes {
    let mut msg_builder = BytesMut::with_capacity(1 + sender_id.len() + payload.len());
    msg_builder.put_u8(BROADCAST_DELIVERY);
    msg_builder.put_slice(sender_id.as_bytes());
    msg_builder.put_slice(payload);
    msg_builder.into()
}

/// The application state.
#[derive(Default)]
pub struct AppState {
    /// The rooms we associate with several sessions.
    pub rooms: Mutex<HashMap<String, Room>>,
    /// Contains a mapping from game name to the maximum amount of players allowed.
    pub configs: RwLock<HashMap<String, u16>>,
}

/// Reloads the configuration file, that lists the games with the maximum number of players per room.
pub async fn reload_config(state: &Arc<AppState>) -> Result<(), String> {
    let json_content = fs::read_to_string("GameConfig.json")
        .await
        .map_err(|e| format!("Failed to read file: {}", e))?;
    let raw_data: EntryList =
        serde_json::from_str(&json_content).map_err(|e| format!("Failed to parse JSON: {}", e))?;
    let new_configs: HashMap<String, u16> = raw_data
        .into_iter()
        .map(|entry| (entry.name, entry.max_players))
        .collect();

    {
        let mut configs = state.configs.write().await;
        *configs = new_configs; // Replace all.
    }
    Ok(())
}
