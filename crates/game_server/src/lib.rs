//! # Game Server - Triangle Enclosure Matches
//!
//! Real-time server for a two-player location game. Each player drops three
//! geographic pins that form a triangle, and a player wins when their
//! triangle fully encloses the opponent's.
//!
//! ## Architecture Overview
//!
//! ### Core Components
//!
//! * **Session Registry** ([`session`]) - Rooms, players and the mapping between
//!   connections, players and rooms. Pure in-memory state with explicit
//!   atomic operations.
//! * **Room Coordinator** ([`coordinator`]) - Serializes every operation on the
//!   registry, fans out the resulting messages and decides matches with the
//!   geometry engine.
//! * **Connection Gateway** ([`server`], [`messaging`]) - WebSocket accept loop,
//!   frame validation and routing of client messages to the coordinator.
//! * **Snapshot Store** ([`store`]) - Optional last-write-wins record of rooms
//!   and players.
//!
//! ### Message Flow
//!
//! 1. Client sends a WebSocket text frame `{"event": ..., "data": ...}`
//! 2. The frame is checked against the [`SecurityConfig`] limits and parsed
//! 3. The router calls the matching coordinator operation
//! 4. The coordinator mutates the registry under its lock and sends the
//!    resulting messages through the [`coordinator::Transport`]
//! 5. After a pin moves in a started room the coordinator samples both
//!    triangles and announces the winner, if any
//!
//! ### Starting a server
//!
//! ```rust,no_run
//! use game_server::{create_server_with_config, ServerConfig};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig {
//!     bind_address: "0.0.0.0:8080".parse()?,
//!     ..Default::default()
//! };
//! let server = create_server_with_config(config);
//! server.start().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! * [`ServerError`] - network and internal failures of the server loop
//! * [`SessionError`] - rejected game operations, reported to the client
//!   with a stable `code`
//! * [`security::SecurityError`] - frames that failed validation
//!
//! No rejected request affects any connection other than the one that sent it.
//!
//! ## Thread Safety
//!
//! * All session state sits behind one `tokio::sync::Mutex` inside the
//!   coordinator, so operations never interleave
//! * Connection tracking uses `Arc<RwLock<HashMap>>`
//! * Outbound frames are queued per connection and drained by that connection's writer

// Re-export core types and functions for easy access
pub use config::{SecurityConfig, ServerConfig};
pub use coordinator::Coordinator;
pub use error::ServerError;
pub use server::GameServer;
pub use session::SessionError;
pub use shutdown::ShutdownState;
pub use utils::{create_server, create_server_with_config};
pub use trigon_geometry::Precision;

// Public module declarations
pub mod config;
pub mod connection;
pub mod coordinator;
pub mod error;
pub mod messaging;
pub mod security;
pub mod server;
pub mod session;
pub mod shutdown;
pub mod store;
pub mod utils;

mod tests;
