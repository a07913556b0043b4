//! Message type definitions for client-server communication.
//!
//! Every frame is a JSON object with an `event` naming the channel and an
//! optional `data` payload:
//!
//! ```json
//! { "event": "join-room", "data": "arena" }
//! ```
//!
//! Channel names are kebab-case on the wire.

use crate::session::{PlayerPatch, PlayerSnapshot, PlayerState, RoomListing};
use serde::{Deserialize, Serialize};

/// A message sent from a client to the server.
///
/// # Examples
///
/// Placing the second pin:
/// ```json
/// {
///   "event": "player-update",
///   "data": { "second": { "lat": 48.8584, "lng": 2.2945 } }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientMessage {
    /// Ask for the current lobby listing
    ListRoomsRequest,
    /// Create a room with this name and join it
    CreateRoom(String),
    JoinRoom(String),
    LeaveRoom(String),
    /// Merge attributes into the caller's player
    PlayerUpdate(PlayerPatch),
    /// Start the match in the caller's room
    StartGame,
}

impl ClientMessage {
    /// Wire name of the channel, for logging.
    pub fn channel(&self) -> &'static str {
        match self {
            ClientMessage::ListRoomsRequest => "list-rooms-request",
            ClientMessage::CreateRoom(_) => "create-room",
            ClientMessage::JoinRoom(_) => "join-room",
            ClientMessage::LeaveRoom(_) => "leave-room",
            ClientMessage::PlayerUpdate(_) => "player-update",
            ClientMessage::StartGame => "start-game",
        }
    }
}

/// A message sent from the server to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerMessage {
    /// Full lobby listing, replacing whatever the client had
    LobbyUpdate(Vec<RoomListing>),
    /// Ordered member list of one room
    MembersUpdate {
        room: String,
        members: Vec<PlayerSnapshot>,
    },
    GameStarting,
    /// Name of the winning player
    Victory(String),
    /// The receiving player's own full record
    PlayerState(PlayerState),
    /// A rejected request
    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        ServerMessage::Error {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn channel(&self) -> &'static str {
        match self {
            ServerMessage::LobbyUpdate(_) => "lobby-update",
            ServerMessage::MembersUpdate { .. } => "members-update",
            ServerMessage::GameStarting => "game-starting",
            ServerMessage::Victory(_) => "victory",
            ServerMessage::PlayerState(_) => "player-state",
            ServerMessage::Error { .. } => "error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_client_frames_parse() {
        let message: ClientMessage =
            serde_json::from_value(json!({"event": "list-rooms-request"})).unwrap();
        assert_eq!(message, ClientMessage::ListRoomsRequest);

        let message: ClientMessage =
            serde_json::from_value(json!({"event": "join-room", "data": "arena"})).unwrap();
        assert_eq!(message, ClientMessage::JoinRoom("arena".into()));
        assert_eq!(message.channel(), "join-room");

        let message: ClientMessage = serde_json::from_value(json!({
            "event": "player-update",
            "data": {"name": "ada", "ready": true}
        }))
        .unwrap();
        let ClientMessage::PlayerUpdate(patch) = message else {
            panic!("expected player-update");
        };
        assert_eq!(patch.name.as_deref(), Some("ada"));
        assert_eq!(patch.ready, Some(true));
    }

    #[test]
    fn test_unknown_channel_is_rejected() {
        let result = serde_json::from_value::<ClientMessage>(json!({"event": "teleport"}));
        assert!(result.is_err());

        let result = serde_json::from_value::<ClientMessage>(json!({
            "event": "player-update",
            "data": {"colour": "red"}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_server_frames_shape() {
        let frame = serde_json::to_value(ServerMessage::Victory("ada".into())).unwrap();
        assert_eq!(frame, json!({"event": "victory", "data": "ada"}));

        let frame = serde_json::to_value(ServerMessage::GameStarting).unwrap();
        assert_eq!(frame, json!({"event": "game-starting"}));

        let frame = serde_json::to_value(ServerMessage::LobbyUpdate(vec![RoomListing {
            name: "arena".into(),
            started: false,
        }]))
        .unwrap();
        assert_eq!(
            frame,
            json!({"event": "lobby-update", "data": [{"name": "arena", "started": false}]})
        );

        let frame = serde_json::to_value(ServerMessage::error("room-full", "Room is full: arena"))
            .unwrap();
        assert_eq!(frame["event"], "error");
        assert_eq!(frame["data"]["code"], "room-full");
    }
}
