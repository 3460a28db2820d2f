//! Does all communication related stuff with the web socket to the relay.
//! Frames are a tag byte followed by a postcard payload, the same shape the
//! relay speaks.

use crate::traits::SerializationCap;
use bytes::{BufMut, Bytes, BytesMut};
use postcard::{from_bytes, to_stdvec};
use protocol::{
    BROADCAST, BROADCAST_DELIVERY, CLIENT_LEAVES, JOIN, JOIN_ACK, JoinRequest, PLAYER_ID_LEN,
    PRESENCE_SYNC, PresenceRecord, SERVER_ERROR,
};

use ewebsock::WsEvent::{Closed, Error, Message};
use ewebsock::{WsMessage, WsReceiver, WsSender};

/// Everything the relay can push at a subscribed client.
pub enum InboundFrame {
    /// The current full membership of the room.
    PresenceSync(Vec<PresenceRecord>),
    /// A broadcast from another subscriber, still postcard encoded.
    Broadcast { sender: String, payload: Bytes },
}

/// This is a connection information setting that manages all receiving and sending.
pub struct ChannelConnection {
    sender: WsSender,
    receiver: WsReceiver,
    pending_join_request: JoinRequest,
}

impl ChannelConnection {
    /// Initiates the connection phase. The join request is kept and sent once
    /// the socket reports readiness.
    pub fn start_connecting(
        base_url: String,
        join_request: JoinRequest,
    ) -> Result<ChannelConnection, String> {
        let options = ewebsock::Options::default();
        let (sender, receiver) = ewebsock::connect(&base_url, options)
            .map_err(|_| "Could not reach websocket api".to_string())?;

        Ok(ChannelConnection {
            sender,
            receiver,
            pending_join_request: join_request,
        })
    }

    fn send_binary(&mut self, data: &[u8]) {
        self.sender.send(WsMessage::Binary(data.to_vec()));
    }

    fn try_recv_binary(&mut self) -> Result<Option<Vec<u8>>, String> {
        loop {
            match self.receiver.try_recv() {
                Some(Message(WsMessage::Binary(msg))) => return Ok(Some(msg)),
                Some(Closed) => return Err("Connection closed by relay".to_string()),
                Some(Error(context)) => return Err(context),
                Some(_) => continue, // Ignore other message types, keep checking
                None => return Ok(None),
            }
        }
    }

    /// Sends the buffered join request. Called once while awaiting readiness.
    pub fn send_join_request(&mut self) -> Result<(), String> {
        let body = to_stdvec(&self.pending_join_request)
            .map_err(|_| "Problem in serialization".to_string())?;
        let mut msg_builder = BytesMut::with_capacity(1 + body.len());
        msg_builder.put_u8(JOIN);
        msg_builder.put_slice(&body);
        self.send_binary(&msg_builder);
        Ok(())
    }

    /// Polls for the relay's answer to the join request.
    /// `Some(Ok(()))` means we are subscribed from now on.
    pub fn poll_join_answer(&mut self) -> Option<Result<(), String>> {
        let data = match self.try_recv_binary() {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => return Some(Err(e)),
        };

        if data.is_empty() {
            return Some(Err("Empty message received in join phase".to_string()));
        }
        match data[0] {
            JOIN_ACK => Some(Ok(())),
            SERVER_ERROR => {
                let error_text = String::from_utf8_lossy(&data[1..]).to_string();
                Some(Err(error_text))
            }
            tag => Some(Err(format!("Unknown message received in join phase: {:?}", tag))),
        }
    }

    /// Sends an opaque game payload to all other subscribers of the room.
    pub fn send_broadcast<Payload: SerializationCap>(&mut self, payload: &Payload) {
        let raw_bytes = to_stdvec(payload).expect("Failed to serialize broadcast payload");
        let mut msg_builder = BytesMut::with_capacity(1 + raw_bytes.len());
        msg_builder.put_u8(BROADCAST);
        msg_builder.put_slice(&raw_bytes);
        self.send_binary(&msg_builder);
    }

    /// Announces the intentional departure. The relay reacts with a presence
    /// update to everybody else.
    pub fn leave(&mut self) {
        self.send_binary(&[CLIENT_LEAVES]);
    }

    /// Reads in everything that arrived since the last heartbeat.
    pub fn receive_frames(&mut self) -> Result<Vec<InboundFrame>, String> {
        let mut result = Vec::new();

        while let Some(data) = self.try_recv_binary()? {
            if data.is_empty() {
                return Err("Empty message received".to_string());
            }
            let bytes = Bytes::from(data);

            match bytes[0] {
                SERVER_ERROR => {
                    let error_text = String::from_utf8_lossy(&bytes[1..]).to_string();
                    return Err(error_text);
                }
                PRESENCE_SYNC => {
                    let roster: Vec<PresenceRecord> = from_bytes(&bytes[1..])
                        .map_err(|_| "Failed to decode presence roster".to_string())?;
                    result.push(InboundFrame::PresenceSync(roster));
                }
                BROADCAST_DELIVERY => {
                    if bytes.len() < 1 + PLAYER_ID_LEN {
                        tracing::warn!("Dropping truncated broadcast frame");
                        continue;
                    }
                    let sender =
                        String::from_utf8_lossy(&bytes[1..1 + PLAYER_ID_LEN]).to_string();
                    let payload = bytes.slice(1 + PLAYER_ID_LEN..);
                    result.push(InboundFrame::Broadcast { sender, payload });
                }
                tag => return Err(format!("Unknown message received: {:?}", tag)),
            }
        }
        Ok(result)
    }
}
