use crate::connection::ConnectionId;
use trigon_geometry::GeometryError;

/// Reasons a registry or coordinator operation is rejected.
///
/// Every variant is recoverable. The rejected operation leaves the registry
/// untouched and only the originating connection is told about it.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SessionError {
    #[error("Name already taken: {0}")]
    DuplicateName(String),

    #[error("Room not found: {0}")]
    RoomNotFound(String),

    #[error("Room is full: {0}")]
    RoomFull(String),

    #[error("Unknown connection: {0}")]
    UnknownConnection(ConnectionId),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Connection {0} is not in a room")]
    NotInRoom(ConnectionId),

    #[error("Room {0} is not ready to start")]
    NotReady(String),

    #[error(transparent)]
    DegenerateGeometry(#[from] GeometryError),
}

impl SessionError {
    /// Stable identifier sent to clients in `error` frames.
    pub fn code(&self) -> &'static str {
        match self {
            SessionError::DuplicateName(_) => "duplicate-name",
            SessionError::RoomNotFound(_) => "room-not-found",
            SessionError::RoomFull(_) => "room-full",
            SessionError::UnknownConnection(_) => "unknown-connection",
            SessionError::InvalidName(_) => "invalid-name",
            SessionError::NotInRoom(_) => "not-in-room",
            SessionError::NotReady(_) => "not-ready",
            SessionError::DegenerateGeometry(_) => "degenerate-geometry",
        }
    }
}
