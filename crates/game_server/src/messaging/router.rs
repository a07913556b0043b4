//! Message routing logic for dispatching client messages to the coordinator.
//!
//! This module validates and parses incoming text frames and maps each
//! channel onto the matching [`Coordinator`] operation.

use crate::{
    config::SecurityConfig,
    connection::ConnectionId,
    coordinator::Coordinator,
    error::ServerError,
    messaging::ClientMessage,
    security::validate_json_message,
};
use tracing::{debug, warn};

/// Routes a raw client frame to the coordinator.
///
/// # Arguments
///
/// * `text` - The raw message text from the client (expected to be JSON)
/// * `connection_id` - The unique identifier for the client connection
/// * `coordinator` - The room coordinator that owns all session state
/// * `security` - Limits applied before the frame is parsed
///
/// # Returns
///
/// `Ok(())` once the frame reached the coordinator, even if the coordinator
/// rejected the request; the client has already been told in that case.
/// A `ServerError` means the frame itself was unusable. The client is sent
/// an `error` frame for those as well and the connection stays open.
///
/// # Example Message Format
///
/// ```json
/// { "event": "create-room", "data": "arena" }
/// ```
pub async fn route_client_message(
    text: &str,
    connection_id: ConnectionId,
    coordinator: &Coordinator,
    security: &SecurityConfig,
) -> Result<(), ServerError> {
    if let Err(e) = validate_json_message(text.as_bytes(), security) {
        warn!("🛡️ Rejected frame from connection {}: {}", connection_id, e);
        coordinator
            .reject_frame(connection_id, e.code(), e.to_string())
            .await;
        return Err(ServerError::Network(format!("Invalid frame: {e}")));
    }

    let message: ClientMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            coordinator
                .reject_frame(connection_id, "invalid-message", e.to_string())
                .await;
            return Err(ServerError::Network(format!("Unknown or malformed message: {e}")));
        }
    };

    debug!("📨 {} from connection {}", message.channel(), connection_id);

    let result = match message {
        ClientMessage::ListRoomsRequest => coordinator.list_rooms(connection_id).await,
        ClientMessage::CreateRoom(name) => coordinator.create_room(connection_id, &name).await,
        ClientMessage::JoinRoom(name) => coordinator.join_room(connection_id, &name).await,
        ClientMessage::LeaveRoom(name) => coordinator.leave_room(connection_id, &name).await,
        ClientMessage::PlayerUpdate(patch) => coordinator.update_player(connection_id, patch).await,
        ClientMessage::StartGame => coordinator.start_game(connection_id).await,
    };

    if let Err(e) = result {
        debug!("Request from connection {} rejected: {}", connection_id, e);
    }
    Ok(())
}
