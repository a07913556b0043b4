//! Player records and the partial-update merge.

use crate::connection::ConnectionId;
use serde::{Deserialize, Serialize};
use trigon_geometry::{Point, Triangle};

/// The three pin slots of a player, in placement order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Pins {
    pub first: Option<Point>,
    pub second: Option<Point>,
    pub third: Option<Point>,
}

impl Pins {
    pub fn slots(&self) -> [Option<Point>; 3] {
        [self.first, self.second, self.third]
    }

    /// All three slots are set, so the pins form a real triangle.
    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some() && self.third.is_some()
    }

    pub fn placed(&self) -> usize {
        self.slots().iter().flatten().count()
    }

    /// The triangle used for win evaluation, padded when incomplete.
    pub fn triangle(&self) -> Option<Triangle> {
        Triangle::from_partial(&self.slots())
    }

    pub fn presence(&self) -> PinPresence {
        PinPresence {
            first: self.first.is_some(),
            second: self.second.is_some(),
            third: self.third.is_some(),
        }
    }
}

/// Which pin slots are set, without their coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinPresence {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

/// Attributes a client may send in a `player-update`.
///
/// Absent fields leave the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlayerPatch {
    pub name: Option<String>,
    pub ready: Option<bool>,
    pub first: Option<Point>,
    pub second: Option<Point>,
    pub third: Option<Point>,
    pub position: Option<Point>,
}

impl PlayerPatch {
    pub fn touches_pins(&self) -> bool {
        self.first.is_some() || self.second.is_some() || self.third.is_some()
    }
}

/// Which attributes actually changed during a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub name: bool,
    pub ready: bool,
    pub pins: bool,
    pub position: bool,
}

impl Changes {
    /// Changes that room members can see in a `members-update`.
    pub fn visible_to_room(&self) -> bool {
        self.name || self.ready || self.pins
    }
}

/// A connected participant.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub name: String,
    pub connection: ConnectionId,
    pub pins: Pins,
    pub ready: bool,
    pub started: bool,
    pub position: Option<Point>,
    pub room: Option<String>,
}

impl Player {
    pub fn new(name: String, connection: ConnectionId) -> Self {
        Self {
            name,
            connection,
            pins: Pins::default(),
            ready: false,
            started: false,
            position: None,
            room: None,
        }
    }

    /// Merges `patch` into this player and reports what changed.
    ///
    /// The name is expected to be validated by the caller.
    pub fn apply(&mut self, patch: &PlayerPatch) -> Changes {
        let mut changes = Changes::default();

        if let Some(name) = &patch.name {
            if *name != self.name {
                self.name = name.clone();
                changes.name = true;
            }
        }
        if let Some(ready) = patch.ready {
            changes.ready = ready != self.ready;
            self.ready = ready;
        }

        let slots = [
            (&mut self.pins.first, patch.first),
            (&mut self.pins.second, patch.second),
            (&mut self.pins.third, patch.third),
        ];
        for (slot, update) in slots {
            if let Some(point) = update {
                if *slot != Some(point) {
                    *slot = Some(point);
                    changes.pins = true;
                }
            }
        }

        if let Some(position) = patch.position {
            changes.position = self.position != Some(position);
            self.position = Some(position);
        }

        changes
    }

    /// Clears everything a finished or abandoned match leaves behind.
    pub fn reset_round(&mut self) {
        self.pins = Pins::default();
        self.ready = false;
        self.started = false;
    }

    /// What other members of the room get to see.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            name: self.name.clone(),
            ready: self.ready,
            started: self.started,
            pins: self.pins.presence(),
        }
    }

    /// The full record, sent only to the player's own connection.
    pub fn state(&self) -> PlayerState {
        PlayerState {
            name: self.name.clone(),
            ready: self.ready,
            started: self.started,
            pins: self.pins,
            position: self.position,
            room: self.room.clone(),
        }
    }
}

/// Entry of a `members-update` list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub name: String,
    pub ready: bool,
    pub started: bool,
    pub pins: PinPresence,
}

/// Payload of a `player-state` message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    pub name: String,
    pub ready: bool,
    pub started: bool,
    pub pins: Pins,
    pub position: Option<Point>,
    pub room: Option<String>,
}
