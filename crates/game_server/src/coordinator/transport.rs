//! The outbound side of the messaging transport.

use crate::connection::ConnectionId;
use crate::messaging::ServerMessage;
use async_trait::async_trait;

/// Delivers server messages to connections and room topics.
///
/// Implementations must not block: the coordinator calls these methods while
/// it holds the registry lock, so that fan-out order matches mutation order.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends a message to a single connection.
    async fn send(&self, connection: ConnectionId, message: &ServerMessage);

    /// Sends a message to every connection subscribed to `room`.
    async fn broadcast(&self, room: &str, message: &ServerMessage);

    /// Sends a message to every connected client.
    async fn broadcast_all(&self, message: &ServerMessage);

    async fn join_topic(&self, connection: ConnectionId, room: &str);

    async fn leave_topic(&self, connection: ConnectionId, room: &str);
}
