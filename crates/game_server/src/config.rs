//! Server configuration types and defaults.
//!
//! This module contains the server configuration structure and default values
//! used to initialize and customize the game server behavior.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use trigon_geometry::Precision;

/// Configuration structure for the game server.
///
/// Contains the network settings, the rules of the match and the limits
/// applied to inbound frames.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The socket address to bind the server to
    pub bind_address: SocketAddr,

    /// Maximum number of concurrent connections allowed
    pub max_connections: usize,

    /// Sampling density used when deciding a winner
    pub precision: Precision,

    /// Maximum length of player and room names, in characters
    pub max_name_length: usize,

    /// Whether room and player snapshots are written to a store
    pub persistence_enabled: bool,

    /// Security configuration settings
    pub security: SecurityConfig,
}

/// Security configuration for inbound frame validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Maximum message size in bytes
    pub max_message_size: usize,

    /// Maximum allowed nesting depth for JSON messages
    pub max_json_depth: usize,

    /// Maximum allowed string length in JSON
    pub max_string_length: usize,

    /// Maximum allowed array/object size
    pub max_collection_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([127, 0, 0, 1], 8080)),
            max_connections: 1000,
            precision: Precision::High,
            max_name_length: 32,
            persistence_enabled: false,
            security: SecurityConfig::default(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_message_size: 64 * 1024, // 64KB
            max_json_depth: 10,
            max_string_length: 1024,
            max_collection_size: 100,
        }
    }
}
