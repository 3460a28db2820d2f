//! This module does the whole initialization and handshake thing.
//! The general protocol of connecting is:
//! Client -> Websocket: JOIN tag plus postcard serialized join request.
//! Websocket -> Client: JOIN_ACK, followed by a presence sync through the room channel.
//!
//! Rooms are created implicitly by the first join for an unknown channel
//! name. A join beyond the configured player limit is rejected explicitly
//! with a closing error instead of being silently observed.

use crate::lobby::{AppState, Room};
use axum::extract::ws::Message::Binary;
use axum::extract::ws::{Message, WebSocket};
use bytes::{BufMut, BytesMut};
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{sink::SinkExt, stream::StreamExt};
use postcard::from_bytes;
use protocol::{CHANNEL_BUFFER_SIZE, JOIN, JOIN_ACK, JoinRequest, PLAYER_ID_LEN, SERVER_ERROR};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::sync::Mutex;

/// Is called on error, sends a text message because e-websocket can not interpret closing messages.
/// This text message is encoded as a binary message.
async fn send_closing_message(sender: &mut SplitSink<WebSocket, Message>, closing_message: String) {
    let raw_data = closing_message.as_bytes();
    let mut msg = BytesMut::with_capacity(1 + raw_data.len());
    msg.put_u8(SERVER_ERROR);
    msg.put_slice(raw_data);

    let _ = sender.send(Message::Binary(msg.into())).await;
    let _ = sender.send(Message::Close(None)).await;
}

/// The handshake result we get for joining the room.
pub struct HandshakeResult {
    /// The identity the player announced.
    pub player_id: String,
    /// The complete identifier of the room as stored in the hashmap.
    pub room_key: String,
    /// Our subscription to the room fan-out.
    pub broadcast_receiver: broadcast::Receiver<bytes::Bytes>,
    /// The sender for pushing our own frames into the room.
    pub broadcaster: broadcast::Sender<bytes::Bytes>,
}

/// This data is data we need to keep for the disconnect handling and cleanup.
pub struct DisconnectData {
    /// The identity of the player we service.
    pub player_id: String,
    /// The complete identifier of the room as stored in the hashmap.
    pub room_key: String,
}

impl From<&HandshakeResult> for DisconnectData {
    fn from(value: &HandshakeResult) -> Self {
        DisconnectData {
            player_id: value.player_id.clone(),
            room_key: value.room_key.clone(),
        }
    }
}

/// Reads in the join request from the web socket, verifies if the game exists and
/// generates the final channel name.
async fn get_initial_query(
    sender: &mut SplitSink<WebSocket, Message>,
    receiver: &mut SplitStream<WebSocket>,
    state: Arc<AppState>,
) -> Option<(JoinRequest, u16)> {
    // First we get a join request. This is the first binary message we receive.
    let my_data = loop {
        let Some(raw_data) = receiver.next().await else {
            tracing::warn!("WebSocket closed before handshake completed");
            return None;
        };
        match raw_data {
            Err(err) => {
                tracing::error!(?err, "Initial error during handshake.");
                send_closing_message(sender, "Initial error during handshake.".into()).await;
                return None;
            }
            Ok(Binary(data)) => {
                break data;
            }
            // We do not care about any other message like ping pong messages.
            Ok(_) => {}
        }
    };

    if my_data.is_empty() || my_data[0] != JOIN {
        tracing::error!("First message was not a join request");
        send_closing_message(sender, "Expected a join request.".into()).await;
        return None;
    }

    // Now we try to convert the rest into the required format.
    let working_struct = match from_bytes::<JoinRequest>(&my_data[1..]) {
        Ok(req) => req,
        Err(e) => {
            tracing::error!(error = ?e, "Failed to parse join request");
            send_closing_message(sender, "Failed to parse join request.".into()).await;
            return None;
        }
    };

    // The fan-out frames carry the sender identity as a fixed width prefix.
    if working_struct.presence.player_id.len() != PLAYER_ID_LEN {
        tracing::error!("Join request with malformed player identity");
        send_closing_message(sender, "Malformed player identity.".into()).await;
        return None;
    }

    // Let us take a look, if the game exists.
    let games = state.configs.read().await;
    let Some(max_players) = games.get(&working_struct.game_id).copied() else {
        drop(games);
        tracing::error!(
            optional_game = working_struct.game_id,
            "Requested illegal game."
        );
        send_closing_message(sender, format!("Unknown game {}.", &working_struct.game_id)).await;
        return None;
    };
    drop(games);

    Some((working_struct, max_players))
}

/// Connects and eventually establishes the room. The room comes into being
/// with the first member and every membership change is announced to all
/// subscribers with a fresh presence sync.
pub async fn init_and_connect(
    sender: &mut SplitSink<WebSocket, Message>,
    receiver: &mut SplitStream<WebSocket>,
    state: Arc<AppState>,
) -> Option<HandshakeResult> {
    let (join_request, max_players) = get_initial_query(sender, receiver, state.clone()).await?;
    let room_key = join_request.channel_name();
    let player_id = join_request.presence.player_id.clone();

    let mut rooms = state.rooms.lock().await;
    let room = rooms.entry(room_key.clone()).or_insert_with(|| {
        let (broadcaster, _) = broadcast::channel(CHANNEL_BUFFER_SIZE);
        Room {
            members: HashMap::new(),
            broadcaster,
        }
    });

    // Do we fit in? max_players == 0 means "infinite". A full room rejects
    // the extra participant outright, it never gets a role anyway.
    if max_players != 0 && room.members.len() >= max_players as usize {
        drop(rooms);
        send_closing_message(
            sender,
            format!(
                "Room {} is full ({} players maximum).",
                &join_request.room_code, max_players
            ),
        )
        .await;
        // User visible but expected behavior, no need for error tracing.
        return None;
    }

    // Identities are random; a clash means two tabs rolled the same string.
    if room.members.contains_key(&player_id) {
        drop(rooms);
        send_closing_message(sender, "Identity already present in room.".into()).await;
        return None;
    }

    room.members
        .insert(player_id.clone(), join_request.presence.clone());
    let broadcast_receiver = room.broadcaster.subscribe();
    let broadcaster = room.broadcaster.clone();
    let presence = room.presence_frame();
    drop(rooms);

    // The joiner subscribed above, so it receives this sync as well.
    let _ = broadcaster.send(presence);

    Some(HandshakeResult {
        player_id,
        room_key,
        broadcast_receiver,
        broadcaster,
    })
}

/// Informs the partner of the connection result, returns a bool as a success flag.
pub async fn inform_client_of_connection(
    sender: &mut SplitSink<WebSocket, Message>,
) -> bool {
    let msg = vec![JOIN_ACK];
    let result = sender.send(Message::Binary(msg.into())).await;
    result.is_ok()
}

/// Performs the shutdown of the system: removes the member from the room,
/// announces the new roster (or drops the empty room) and sends a last message.
pub async fn shutdown_connection(
    wrapped_sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    disconnect_data: DisconnectData,
    app_state: Arc<AppState>,
    error_message: &'static str,
) {
    let mut rooms = app_state.rooms.lock().await;
    if let Some(room) = rooms.get_mut(&disconnect_data.room_key) {
        room.members.remove(&disconnect_data.player_id);
        if room.members.is_empty() {
            // Last one out: the room ceases to exist.
            rooms.remove(&disconnect_data.room_key);
        } else {
            let presence = room.presence_frame();
            let _ = room.broadcaster.send(presence);
        }
    }
    drop(rooms);

    let mut sender = wrapped_sender.lock().await;

    // Send the message to the client endpoint.
    send_closing_message(&mut sender, error_message.into()).await;
}
