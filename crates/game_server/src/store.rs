//! Optional snapshot persistence for rooms and players.
//!
//! The coordinator writes a snapshot after every accepted mutation when a
//! store is configured. Nothing is ever read back into the live registry;
//! snapshots serve listing and post-mortem inspection. Writes are last write
//! wins.

use crate::session::{Pins, Player, Registry, Room};
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// Stored view of a room.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomRecord {
    pub name: String,
    /// Member names in join order
    pub members: Vec<String>,
    pub started: bool,
    pub last_winner: Option<String>,
}

impl RoomRecord {
    pub fn capture(room: &Room, registry: &Registry) -> Self {
        Self {
            name: room.name.clone(),
            members: registry
                .members(&room.name)
                .into_iter()
                .map(|player| player.name.clone())
                .collect(),
            started: room.started,
            last_winner: room.last_winner.clone(),
        }
    }
}

/// Stored view of a player.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub ready: bool,
    pub started: bool,
    pub pins: Pins,
    pub room: Option<String>,
}

impl From<&Player> for PlayerRecord {
    fn from(player: &Player) -> Self {
        Self {
            name: player.name.clone(),
            ready: player.ready,
            started: player.started,
            pins: player.pins,
            room: player.room.clone(),
        }
    }
}

/// Key/value storage for room and player snapshots.
pub trait SnapshotStore: Send + Sync {
    fn put_room(&self, record: RoomRecord);
    fn fetch_room(&self, name: &str) -> Option<RoomRecord>;
    fn remove_room(&self, name: &str);
    fn put_player(&self, record: PlayerRecord);
    fn fetch_player(&self, name: &str) -> Option<PlayerRecord>;
    fn remove_player(&self, name: &str);
    /// Every stored room, sorted by name.
    fn rooms(&self) -> Vec<RoomRecord>;
}

/// Process-local store backed by concurrent maps.
#[derive(Debug, Default)]
pub struct MemoryStore {
    rooms: DashMap<String, RoomRecord>,
    players: DashMap<String, PlayerRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SnapshotStore for MemoryStore {
    fn put_room(&self, record: RoomRecord) {
        self.rooms.insert(record.name.clone(), record);
    }

    fn fetch_room(&self, name: &str) -> Option<RoomRecord> {
        self.rooms.get(name).map(|entry| entry.value().clone())
    }

    fn remove_room(&self, name: &str) {
        self.rooms.remove(name);
    }

    fn put_player(&self, record: PlayerRecord) {
        self.players.insert(record.name.clone(), record);
    }

    fn fetch_player(&self, name: &str) -> Option<PlayerRecord> {
        self.players.get(name).map(|entry| entry.value().clone())
    }

    fn remove_player(&self, name: &str) {
        self.players.remove(name);
    }

    fn rooms(&self) -> Vec<RoomRecord> {
        let mut rooms: Vec<RoomRecord> =
            self.rooms.iter().map(|entry| entry.value().clone()).collect();
        rooms.sort_by(|a, b| a.name.cmp(&b.name));
        rooms
    }
}
