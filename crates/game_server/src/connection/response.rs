//! Transport implementation backed by the connection manager.
//!
//! This module bridges the coordinator's [`Transport`] seam and the
//! WebSocket connections: messages are encoded as JSON text and queued on
//! each target connection's outbound queue.

use super::{manager::ConnectionManager, ConnectionId};
use crate::coordinator::Transport;
use crate::messaging::ServerMessage;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{error, trace};

/// Implementation of [`Transport`] for the game server.
///
/// Encoding happens once per message; fan-out to topics and to all clients
/// is left to the [`ConnectionManager`].
#[derive(Clone, Debug)]
pub struct GatewayTransport {
    /// Reference to the connection manager for looking up and messaging connections
    connection_manager: Arc<ConnectionManager>,
}

impl GatewayTransport {
    pub fn new(connection_manager: Arc<ConnectionManager>) -> Self {
        Self { connection_manager }
    }

    fn encode(message: &ServerMessage) -> Option<Vec<u8>> {
        match serde_json::to_vec(message) {
            Ok(frame) => Some(frame),
            Err(e) => {
                error!("Failed to encode {} message: {}", message.channel(), e);
                None
            }
        }
    }
}

#[async_trait]
impl Transport for GatewayTransport {
    async fn send(&self, connection: ConnectionId, message: &ServerMessage) {
        if let Some(frame) = Self::encode(message) {
            trace!("➡️ {} to connection {}", message.channel(), connection);
            self.connection_manager.send_to_connection(connection, frame).await;
        }
    }

    async fn broadcast(&self, room: &str, message: &ServerMessage) {
        if let Some(frame) = Self::encode(message) {
            trace!("➡️ {} to room {}", message.channel(), room);
            self.connection_manager.broadcast_to_topic(room, frame).await;
        }
    }

    async fn broadcast_all(&self, message: &ServerMessage) {
        if let Some(frame) = Self::encode(message) {
            trace!("➡️ {} to everyone", message.channel());
            self.connection_manager.broadcast_to_all(frame).await;
        }
    }

    async fn join_topic(&self, connection: ConnectionId, room: &str) {
        self.connection_manager.join_topic(connection, room).await;
    }

    async fn leave_topic(&self, connection: ConnectionId, room: &str) {
        self.connection_manager.leave_topic(connection, room).await;
    }
}
