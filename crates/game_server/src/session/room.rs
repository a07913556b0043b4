use crate::connection::ConnectionId;
use serde::{Deserialize, Serialize};

/// Maximum number of members in a room.
pub const ROOM_CAPACITY: usize = 2;

/// A two-player match context.
#[derive(Debug, Clone, PartialEq)]
pub struct Room {
    pub name: String,
    /// Members in join order; the first one is the owner.
    pub members: Vec<ConnectionId>,
    pub started: bool,
    /// Name of the player who won the last match played here.
    pub last_winner: Option<String>,
    pub(crate) created: u64,
}

impl Room {
    pub(crate) fn new(name: String, created: u64) -> Self {
        Self {
            name,
            members: Vec::with_capacity(ROOM_CAPACITY),
            started: false,
            last_winner: None,
            created,
        }
    }

    pub fn is_full(&self) -> bool {
        self.members.len() >= ROOM_CAPACITY
    }

    pub fn contains(&self, connection: ConnectionId) -> bool {
        self.members.contains(&connection)
    }

    pub fn owner(&self) -> Option<ConnectionId> {
        self.members.first().copied()
    }

    /// The other member of the room, if any.
    pub fn opponent_of(&self, connection: ConnectionId) -> Option<ConnectionId> {
        self.members.iter().copied().find(|member| *member != connection)
    }

    pub fn phase(&self) -> RoomPhase {
        if self.started {
            return RoomPhase::Started;
        }
        match self.members.len() {
            0 => RoomPhase::Empty,
            1 => RoomPhase::Forming,
            _ => RoomPhase::Ready,
        }
    }

    pub fn listing(&self) -> RoomListing {
        RoomListing {
            name: self.name.clone(),
            started: self.started,
        }
    }
}

/// Where a room stands in its match cycle.
///
/// A finished match drops straight back to `Ready`, so there is no
/// persistent finished phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomPhase {
    Empty,
    Forming,
    Ready,
    Started,
}

/// Entry of a `lobby-update` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomListing {
    pub name: String,
    pub started: bool,
}
