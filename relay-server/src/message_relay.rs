//! WebSocket message routing for the relay server.
//!
//! Every subscriber of a room gets the same pair of Tokio tasks:
//! - **Send task**: delivers room frames (presence syncs, peer broadcasts)
//!   to this client, filtering out the client's own broadcasts
//! - **Receive task**: validates inbound frames and fans them out to the
//!   room with the sender identity injected
//!
//! The relay never interprets game payloads. It only validates frame tags
//! and routes bytes between the subscribers of a room.

use crate::lobby::delivery_frame;
use axum::extract::ws::{Message, WebSocket};
use bytes::Bytes;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use protocol::{BROADCAST, BROADCAST_DELIVERY, CLIENT_LEAVES, PLAYER_ID_LEN, PRESENCE_SYNC};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::RecvError;

/// Spawns the bidirectional message handlers for one room subscriber.
///
/// When either task completes (connection lost, protocol error, intentional
/// leave), the other is aborted and the caller cleans up the membership.
///
/// # Returns
/// A static string describing why the connection ended (for logging/debugging).
pub async fn handle_subscriber_logic(
    sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    receiver: SplitStream<WebSocket>,
    broadcast_receiver: broadcast::Receiver<Bytes>,
    broadcaster: broadcast::Sender<Bytes>,
    player_id: String,
) -> &'static str {
    let send_id = player_id.clone();
    let mut send_task =
        tokio::spawn(async move { send_logic(sender, broadcast_receiver, send_id).await });

    let mut receive_task =
        tokio::spawn(async move { receive_logic(receiver, broadcaster, player_id).await });

    // If any one of the tasks run to completion, we abort the other.
    let result = tokio::select! {
        res_a = &mut send_task => {receive_task.abort(); res_a},
        res_b = &mut receive_task => {send_task.abort(); res_b},
    };

    result.unwrap_or_else(|err| {
        tracing::error!(?err, "Error while handling subscriber logic.");
        "Internal panic in subscriber logic."
    })
}

/// Receives frames from the client and fans them out to the room.
///
/// Allowed frame tags from a subscribed client:
/// - [`BROADCAST`]: opaque game payload — the sender identity gets injected
///   before fan-out so receivers can suppress self-echo
/// - [`CLIENT_LEAVES`]: graceful departure (triggers cleanup)
async fn receive_logic(
    mut receiver: SplitStream<WebSocket>,
    broadcaster: broadcast::Sender<Bytes>,
    player_id: String,
) -> &'static str {
    while let Some(state) = receiver.next().await {
        match state {
            Ok(Message::Binary(bytes)) => {
                if bytes.is_empty() {
                    tracing::error!("Illegal empty message in receive logic.");
                    return "Illegal empty message received.";
                }
                match bytes[0] {
                    BROADCAST => {
                        let frame = delivery_frame(&player_id, &bytes[1..]);
                        let res = broadcaster.send(frame);
                        // An error occurs if there are no other subscribers left;
                        // the sender itself keeps a receiver, so this is unusual.
                        if let Err(error) = res {
                            tracing::warn!(?error, "Fan-out without subscribers.");
                        }
                    }
                    CLIENT_LEAVES => {
                        return "Client left intentionally";
                    }
                    _ => {
                        tracing::error!(command = ?bytes[0], "Illegal command from client.");
                        return "Illegal command from client";
                    }
                }
            }
            Ok(_) => {} // Ignore other messages (ping/pong handled by axum)
            Err(_) => {
                return "Connection lost.";
            }
        }
    }
    "Connection lost."
}

/// Delivers room frames to one specific client.
///
/// Presence syncs always pass through. Broadcast deliveries carry the sender
/// identity right after the tag; frames originating from this client are
/// dropped so nobody hears their own echo.
///
/// # Error Handling
/// Returns immediately if the broadcast channel lags (buffer overflow),
/// as the client cannot recover from missed messages.
async fn send_logic(
    sender: Arc<Mutex<SplitSink<WebSocket, Message>>>,
    mut broadcast_receiver: broadcast::Receiver<Bytes>,
    player_id: String,
) -> &'static str {
    let mut enclosed = sender.lock().await;

    loop {
        let state = broadcast_receiver.recv().await;
        match state {
            Err(RecvError::Closed) => {
                // The room was dropped underneath us.
                return "Room closed.";
            }
            Err(RecvError::Lagged(skipped)) => {
                tracing::warn!(
                    skipped_messages = skipped,
                    "Lagging started on internal channel."
                );
                return "Lagging on internal channel - Computer too slow.";
            }
            Ok(bytes) => {
                if bytes.is_empty() {
                    tracing::error!("Illegal empty frame received.");
                    return "Illegal empty frame received.";
                }
                match bytes[0] {
                    PRESENCE_SYNC => {
                        if let Err(error) = enclosed.send(Message::Binary(bytes)).await {
                            tracing::error!(?error, "Error in communication with client endpoint.");
                            return "Error in communication with client endpoint.";
                        }
                    }
                    BROADCAST_DELIVERY => {
                        if bytes.len() < 1 + PLAYER_ID_LEN {
                            tracing::error!("Malformed broadcast delivery frame");
                            return "Malformed frame received.";
                        }
                        // We have to see if this is our own echo.
                        let originator = &bytes[1..1 + PLAYER_ID_LEN];
                        if originator == player_id.as_bytes() {
                            continue;
                        }
                        if let Err(error) = enclosed.send(Message::Binary(bytes)).await {
                            tracing::error!(?error, "Error in communication with client endpoint.");
                            return "Error in communication with client endpoint.";
                        }
                    }
                    _ => {
                        tracing::error!(frame = bytes[0], "Illegal frame on room channel.");
                        return "Illegal frame on room channel.";
                    }
                }
            }
        }
    }
}
