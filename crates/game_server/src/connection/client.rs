//! Client connection representation.

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::SystemTime;
use tokio::sync::mpsc;

/// Represents an individual client connection to the server.
///
/// The connection only knows where it comes from and which room topics it
/// listens to. Game state lives in the session registry.
#[derive(Debug)]
pub struct ClientConnection {
    /// The remote network address of the client
    pub remote_addr: SocketAddr,

    /// When this connection was established
    pub connected_at: SystemTime,

    /// Room topics this connection receives broadcasts for
    pub topics: HashSet<String>,

    /// Outbound frames, drained by the connection's writer task
    pub outbound: mpsc::UnboundedSender<Vec<u8>>,
}

impl ClientConnection {
    pub fn new(remote_addr: SocketAddr, outbound: mpsc::UnboundedSender<Vec<u8>>) -> Self {
        Self {
            remote_addr,
            connected_at: SystemTime::now(),
            topics: HashSet::new(),
            outbound,
        }
    }

    /// Queues a frame for this connection. Returns false once the writer
    /// task is gone.
    pub fn queue(&self, frame: Vec<u8>) -> bool {
        self.outbound.send(frame).is_ok()
    }

    pub fn is_subscribed(&self, topic: &str) -> bool {
        self.topics.contains(topic)
    }
}
