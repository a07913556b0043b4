//! Message handling and routing for client-server communication.
//!
//! This module defines the wire messages and routes inbound frames to the
//! room coordinator.

pub mod router;
pub mod types;

pub use router::route_client_message;
pub use types::{ClientMessage, ServerMessage};
