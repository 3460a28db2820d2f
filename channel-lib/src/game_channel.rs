//! The game channel takes care of the communication with the relay service.
//! This is the core entry point of the system.
//!
//! Both peers run the same code; there is no host. The frontend works
//! macroquad game like heartbeat driven: it creates the channel before the
//! game loop, calls [`GameChannel::update`] once per frame, then polls
//! [`GameChannel::next_event`] for presence changes and peer broadcasts and
//! pushes its own payloads with [`GameChannel::broadcast`].
//!
//! As long as the channel is disconnected, a UI for entering or creating a
//! room should be shown, together with the error string. As soon as the
//! channel is subscribed, the real game gets executed; the session phase is
//! driven by the presence events this channel delivers.
//!
//! A rough usage example looks like this:
//! ```text
//! let mut channel: GameChannel<MazeMessage> =
//!     GameChannel::generate_channel(
//!         "ws://127.0.0.1:8080/ws".to_string(),
//!         "key-and-lock".to_string(),
//!     );
//! loop {
//!     channel.update();
//!
//!     match channel.channel_state().clone() {
//!         ChannelState::Disconnected { error_string } => {
//!             // Lobby GUI here, then:
//!             channel.join_room(room_code);
//!         }
//!         ChannelState::Subscribed => {
//!             while let Some(event) = channel.next_event() {
//!                 match event {
//!                     ChannelEvent::PresenceSync(roster) => { /* roles, phase */ }
//!                     ChannelEvent::Broadcast { sender, payload } => { /* game */ }
//!                 }
//!             }
//!             channel.broadcast(&my_payload);
//!         }
//!         _ => {} // Still connecting.
//!     }
//!
//!     next_frame().await
//! }
//! ```

use crate::channel_interface::{ChannelConnection, InboundFrame};
use crate::identity::{generate_player_id, normalize_room_code};
use crate::traits::SerializationCap;
use postcard::from_bytes;
use protocol::{JoinRequest, PresenceRecord};
use std::collections::VecDeque;

/// The different phases we may be in concerning the channel subscription.
#[derive(Clone, PartialEq, Debug)]
pub enum ChannelState {
    /// When we are disconnected we may have an error string, that tells the reason why we went to disconnection.
    Disconnected { error_string: Option<String> },
    /// The socket is being established; the join request is still buffered.
    AwaitingSocket,
    /// The join request is out, we are waiting for the relay to confirm the subscription.
    Joining,
    /// We are a subscribed member of the room and receive presence and broadcasts.
    Subscribed,
}

/// What the channel delivers to the game each heartbeat.
pub enum ChannelEvent<Payload> {
    /// The transport's current notion of who is in the room.
    PresenceSync(Vec<PresenceRecord>),
    /// A decoded broadcast from the other peer. Self-echoes are already
    /// filtered out.
    Broadcast { sender: String, payload: Payload },
}

/// The core entry point to the networking architecture.
pub struct GameChannel<Payload>
where
    Payload: SerializationCap,
{
    /// The core connection.
    core_connection: Option<ChannelConnection>,

    /// The current state we have.
    channel_state: ChannelState,

    /// Decoded inbound events waiting to be polled by the game.
    event_que: VecDeque<ChannelEvent<Payload>>,

    /// The local player identity, random per session.
    local_id: String,

    /// The URI we use for connection.
    connection_string: String,

    /// The name of the game.
    game_name: String,
}

impl<Payload> GameChannel<Payload>
where
    Payload: SerializationCap,
{
    /// Creates the game channel. Needs the connection string (which is relay specific) and
    /// the name of the game, which is game specific. Should be done before entering the game loop.
    /// A fresh random player identity is generated here.
    pub fn generate_channel(connection_string: String, game_name: String) -> Self {
        Self {
            core_connection: None,
            channel_state: ChannelState::Disconnected { error_string: None },
            event_que: VecDeque::new(),
            local_id: generate_player_id(),
            connection_string,
            game_name,
        }
    }

    /// The update should be called once a frame from the main program, typically at the beginning.
    /// Afterwards the events can be polled and the frontend logic done.
    pub fn update(&mut self) {
        match self.channel_state {
            ChannelState::Disconnected { error_string: _ } => {} // Nothing to do here.
            ChannelState::AwaitingSocket => {
                self.update_awaiting_socket();
            }
            ChannelState::Joining => {
                self.update_joining();
            }
            ChannelState::Subscribed => {
                self.update_subscribed();
            }
        }
    }

    /// Joins the room with the indicated code. The code gets normalized to
    /// uppercase so a pasted lowercase code still rendezvouses.
    /// Should only be done in disconnected state.
    pub fn join_room(&mut self, room_code: &str) {
        assert!(
            matches!(
                self.channel_state,
                ChannelState::Disconnected { error_string: _ }
            ),
            "Only in disconnected state is a join allowed."
        );

        let join_request = JoinRequest {
            game_id: self.game_name.clone(),
            room_code: normalize_room_code(room_code),
            presence: PresenceRecord {
                player_id: self.local_id.clone(),
                joined_at: chrono::Utc::now().to_rfc3339(),
            },
        };

        let start =
            ChannelConnection::start_connecting(self.connection_string.clone(), join_request);
        match start {
            Ok(connection) => {
                self.channel_state = ChannelState::AwaitingSocket;
                self.core_connection = Some(connection);
            }
            Err(e) => {
                self.mark_error(e);
            }
        }
    }

    /// Asks explicitly for a disconnection. Should be placed on a leave room button.
    pub fn leave(&mut self) {
        if let Some(connection) = self.core_connection.as_mut()
            && self.channel_state == ChannelState::Subscribed
        {
            connection.leave();
        }
        self.mark_error("Left the room".to_string());
    }

    /// Sends a payload to all other subscribers of the room.
    pub fn broadcast(&mut self, payload: &Payload) {
        if let Some(connection) = self.core_connection.as_mut()
            && self.channel_state == ChannelState::Subscribed
        {
            connection.send_broadcast(payload);
        }
    }

    /// Gets the next inbound event if existent, to be processed by the frontend.
    pub fn next_event(&mut self) -> Option<ChannelEvent<Payload>> {
        self.event_que.pop_front()
    }

    /// Probes the current channel state. Especially interesting for dripping back to
    /// disconnected state for error handling. Should be checked once a frame after the heartbeat.
    pub fn channel_state(&self) -> &ChannelState {
        &self.channel_state
    }

    /// The identity we announced to the room.
    pub fn local_id(&self) -> &str {
        &self.local_id
    }

    /// Global function to mark error and drop the connection.
    fn mark_error(&mut self, error: String) {
        self.channel_state = ChannelState::Disconnected {
            error_string: Some(error),
        };
        self.core_connection = None; // Drops sender + receiver, closes connection
        self.event_que.clear();
    }

    /// We are waiting for the base connection to be established and push the join request out.
    fn update_awaiting_socket(&mut self) {
        let Some(connection) = self.core_connection.as_mut() else {
            debug_assert!(false, "No connection in awaiting socket state");
            return;
        };
        match connection.send_join_request() {
            Ok(()) => {
                self.channel_state = ChannelState::Joining;
            }
            Err(e) => {
                self.mark_error(e);
            }
        }
    }

    /// The update during the join phase. We are just waiting for the relay confirmation.
    fn update_joining(&mut self) {
        let Some(connection) = self.core_connection.as_mut() else {
            debug_assert!(false, "No connection in joining state");
            return;
        };
        match connection.poll_join_answer() {
            Some(Ok(())) => {
                self.channel_state = ChannelState::Subscribed;
            }
            Some(Err(e)) => {
                self.mark_error(e);
            }
            None => {} // Do nothing here.
        }
    }

    /// Drains the socket and decodes everything into the event queue.
    fn update_subscribed(&mut self) {
        let Some(connection) = self.core_connection.as_mut() else {
            debug_assert!(false, "No connection in subscribed state");
            return;
        };
        let frames = match connection.receive_frames() {
            Ok(frames) => frames,
            Err(e) => {
                self.mark_error(e);
                return;
            }
        };

        for frame in frames {
            match frame {
                InboundFrame::PresenceSync(roster) => {
                    self.event_que.push_back(ChannelEvent::PresenceSync(roster));
                }
                InboundFrame::Broadcast { sender, payload } => {
                    // Self-echo suppression. The relay excludes the sender
                    // already, this guards against a misbehaving transport.
                    if sender == self.local_id {
                        continue;
                    }
                    match from_bytes::<Payload>(&payload) {
                        Ok(payload) => {
                            self.event_que
                                .push_back(ChannelEvent::Broadcast { sender, payload });
                        }
                        Err(_) => {
                            // A crash here would desync the whole session, so
                            // unknown payloads are dropped, not escalated.
                            tracing::warn!(sender, "Dropping undecodable broadcast payload");
                        }
                    }
                }
            }
        }
    }
}
