//! Connection manager for tracking and managing client connections.
//!
//! This module provides the central management system for all client connections,
//! handling connection lifecycle, room topic subscriptions, and message fan-out.

use super::{client::ClientConnection, ConnectionId};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{debug, info};

/// Receiving end of a connection's outbound queue.
pub type OutboundReceiver = mpsc::UnboundedReceiver<Vec<u8>>;

/// Central manager for all client connections.
///
/// The `ConnectionManager` tracks active connections, assigns unique IDs,
/// remembers which room topics each connection listens to, and queues
/// outgoing frames for the per-connection writer tasks.
///
/// # Architecture
///
/// * Uses `RwLock<HashMap>` for thread-safe connection storage
/// * Implements atomic connection ID generation
/// * Gives every connection its own unbounded queue, so a slow reader
///   delays only itself and never loses frames to other connections' traffic
#[derive(Debug)]
pub struct ConnectionManager {
    /// Map of connection ID to client connection information
    connections: Arc<RwLock<HashMap<ConnectionId, ClientConnection>>>,

    /// Atomic counter for generating unique connection IDs
    next_id: Arc<AtomicUsize>,
}

impl Default for ConnectionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self {
            connections: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicUsize::new(1)),
        }
    }

    /// Adds a new connection and returns its unique ID together with the
    /// queue its writer task drains.
    ///
    /// # Arguments
    ///
    /// * `remote_addr` - The network address of the connecting client
    pub async fn add_connection(&self, remote_addr: SocketAddr) -> (ConnectionId, OutboundReceiver) {
        let connection_id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        let connection = ClientConnection::new(remote_addr, sender);
        let mut connections = self.connections.write().await;
        connections.insert(connection_id, connection);
        info!("🔗 Connection {} from {}", connection_id, remote_addr);
        (connection_id, receiver)
    }

    /// Removes a connection and all of its topic subscriptions.
    ///
    /// Dropping the connection closes its outbound queue.
    pub async fn remove_connection(&self, connection_id: ConnectionId) {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.remove(&connection_id) {
            let lifetime = connection.connected_at.elapsed().unwrap_or_default();
            info!(
                "❌ Connection {} from {} disconnected after {:.1}s",
                connection_id,
                connection.remote_addr,
                lifetime.as_secs_f64()
            );
        }
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Subscribes a connection to a room topic.
    pub async fn join_topic(&self, connection_id: ConnectionId, topic: &str) {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.get_mut(&connection_id) {
            connection.topics.insert(topic.to_string());
        }
    }

    pub async fn leave_topic(&self, connection_id: ConnectionId, topic: &str) {
        let mut connections = self.connections.write().await;
        if let Some(connection) = connections.get_mut(&connection_id) {
            connection.topics.remove(topic);
        }
    }

    /// Connections currently subscribed to `topic`.
    pub async fn topic_members(&self, topic: &str) -> Vec<ConnectionId> {
        let connections = self.connections.read().await;
        let mut members: Vec<ConnectionId> = connections
            .iter()
            .filter(|(_, connection)| connection.is_subscribed(topic))
            .map(|(id, _)| *id)
            .collect();
        members.sort_unstable();
        members
    }

    /// Queues a message for one connection.
    ///
    /// Returns whether the connection exists and its writer is still running.
    pub async fn send_to_connection(&self, connection_id: ConnectionId, message: Vec<u8>) -> bool {
        let connections = self.connections.read().await;
        match connections.get(&connection_id) {
            Some(connection) if connection.queue(message) => true,
            Some(_) => {
                debug!("Writer for connection {} has stopped", connection_id);
                false
            }
            None => {
                debug!("No connection {} to send to", connection_id);
                false
            }
        }
    }

    /// Sends a message to every connection subscribed to `topic`.
    ///
    /// # Returns
    ///
    /// The number of connections that the message was queued for.
    pub async fn broadcast_to_topic(&self, topic: &str, message: Vec<u8>) -> usize {
        let connections = self.connections.read().await;
        let queued = connections
            .values()
            .filter(|connection| connection.is_subscribed(topic))
            .filter(|connection| connection.queue(message.clone()))
            .count();
        debug!("📡 Sent message to {} subscriber(s) of {}", queued, topic);
        queued
    }

    /// Broadcasts a message to all currently connected clients.
    ///
    /// # Returns
    ///
    /// The number of connections that the message was queued for.
    pub async fn broadcast_to_all(&self, message: Vec<u8>) -> usize {
        let connections = self.connections.read().await;
        let queued = connections
            .values()
            .filter(|connection| connection.queue(message.clone()))
            .count();
        debug!("📡 Broadcasted message to {} connections", queued);
        queued
    }
}
