//! The in-memory store of rooms, players and live connections.
//!
//! Every method is a complete step: when it returns, rooms, players and the
//! connection set agree with each other again. The registry itself is not
//! synchronized; the coordinator serializes access to it.

use super::error::SessionError;
use super::player::{Changes, Player, PlayerPatch, PlayerSnapshot};
use super::room::{Room, RoomListing, ROOM_CAPACITY};
use crate::connection::ConnectionId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_MAX_NAME_LENGTH: usize = 32;

/// A member leaving a room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Departure {
    pub room: String,
    /// The room had no members left and is gone.
    pub room_deleted: bool,
    /// The room was started and has dropped back to not started.
    pub match_abandoned: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinOutcome {
    pub room: String,
    /// Set when the player had to leave another room first.
    pub previous: Option<Departure>,
    /// The player was already a member and nothing changed.
    pub already_member: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerUpdate {
    pub player: Player,
    pub changes: Changes,
    /// The old name when the update renamed the player.
    pub previous_name: Option<String>,
    /// The update created the player.
    pub created: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartOutcome {
    pub room: String,
    /// False when the room was already started.
    pub newly_started: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Disconnect {
    pub player: Option<Player>,
    pub departure: Option<Departure>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub connections: usize,
    pub players: usize,
    pub rooms: usize,
    pub started_rooms: usize,
}

#[derive(Debug)]
pub struct Registry {
    rooms: HashMap<String, Room>,
    players: HashMap<ConnectionId, Player>,
    names: HashMap<String, ConnectionId>,
    connections: HashSet<ConnectionId>,
    next_room: u64,
    max_name_length: usize,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NAME_LENGTH)
    }
}

impl Registry {
    pub fn new(max_name_length: usize) -> Self {
        Self {
            rooms: HashMap::new(),
            players: HashMap::new(),
            names: HashMap::new(),
            connections: HashSet::new(),
            next_room: 0,
            max_name_length,
        }
    }

    /// Records a live connection. Returns false if it was already known.
    pub fn register_connection(&mut self, connection: ConnectionId) -> bool {
        self.connections.insert(connection)
    }

    pub fn is_registered(&self, connection: ConnectionId) -> bool {
        self.connections.contains(&connection)
    }

    fn ensure_registered(&self, connection: ConnectionId) -> Result<(), SessionError> {
        if self.is_registered(connection) {
            Ok(())
        } else {
            Err(SessionError::UnknownConnection(connection))
        }
    }

    /// Trims `raw` and checks it can be used as a player or room name.
    pub fn validate_name(&self, raw: &str) -> Result<String, SessionError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidName("name must not be empty".to_string()));
        }
        if name.chars().count() > self.max_name_length {
            return Err(SessionError::InvalidName(format!(
                "name is longer than {} characters",
                self.max_name_length
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(SessionError::InvalidName(
                "name contains control characters".to_string(),
            ));
        }
        Ok(name.to_string())
    }

    pub fn create_room(&mut self, name: &str) -> Result<&Room, SessionError> {
        let name = self.validate_name(name)?;
        if self.rooms.contains_key(&name) {
            return Err(SessionError::DuplicateName(name));
        }

        let created = self.next_room;
        self.next_room += 1;
        Ok(self
            .rooms
            .entry(name.clone())
            .or_insert_with(|| Room::new(name, created)))
    }

    /// Removes a room and releases its members back to the lobby.
    pub fn delete_room(&mut self, name: &str) -> Option<Room> {
        let room = self.rooms.remove(name)?;
        for member in &room.members {
            if let Some(player) = self.players.get_mut(member) {
                player.room = None;
                player.reset_round();
            }
        }
        Some(room)
    }

    /// Returns the connection's player, creating a `guest-<id>` player if
    /// the connection has not picked a name yet.
    pub fn get_or_create_player(
        &mut self,
        connection: ConnectionId,
    ) -> Result<&Player, SessionError> {
        self.ensure_registered(connection)?;

        if !self.players.contains_key(&connection) {
            let name = self.provisional_name(connection);
            self.names.insert(name.clone(), connection);
            self.players.insert(connection, Player::new(name, connection));
        }

        self.players
            .get(&connection)
            .ok_or(SessionError::UnknownConnection(connection))
    }

    fn provisional_name(&self, connection: ConnectionId) -> String {
        let base = format!("guest-{connection}");
        let mut candidate = base.clone();
        let mut suffix = 2;
        while self.names.contains_key(&candidate) {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        candidate
    }

    /// Merges `patch` into the connection's player.
    ///
    /// A connection without a player must supply a name, which creates the
    /// player. Pins can be placed or moved but never cleared this way.
    pub fn update_player(
        &mut self,
        connection: ConnectionId,
        mut patch: PlayerPatch,
    ) -> Result<PlayerUpdate, SessionError> {
        self.ensure_registered(connection)?;

        patch.name = patch
            .name
            .as_deref()
            .map(|name| self.validate_name(name))
            .transpose()?;

        if let Some(name) = &patch.name {
            if let Some(owner) = self.names.get(name) {
                if *owner != connection {
                    return Err(SessionError::DuplicateName(name.clone()));
                }
            }
        }

        let created = !self.players.contains_key(&connection);
        if created {
            let Some(name) = patch.name.clone() else {
                return Err(SessionError::UnknownConnection(connection));
            };
            self.names.insert(name.clone(), connection);
            self.players.insert(connection, Player::new(name, connection));
        }

        let player = self
            .players
            .get_mut(&connection)
            .ok_or(SessionError::UnknownConnection(connection))?;
        let previous = player.name.clone();
        let changes = player.apply(&patch);

        if changes.name {
            self.names.remove(&previous);
            self.names.insert(player.name.clone(), connection);
        }

        Ok(PlayerUpdate {
            player: player.clone(),
            changes,
            previous_name: changes.name.then_some(previous),
            created,
        })
    }

    /// Adds the connection's player to a room, leaving its current room
    /// first. A connection without a player joins as a guest. Nothing
    /// changes when the join is rejected.
    pub fn join_room(
        &mut self,
        name: &str,
        connection: ConnectionId,
    ) -> Result<JoinOutcome, SessionError> {
        self.ensure_registered(connection)?;

        let current = self
            .players
            .get(&connection)
            .and_then(|player| player.room.clone());
        let room = self
            .rooms
            .get(name)
            .ok_or_else(|| SessionError::RoomNotFound(name.to_string()))?;

        if room.contains(connection) {
            return Ok(JoinOutcome {
                room: name.to_string(),
                previous: None,
                already_member: true,
            });
        }
        if room.is_full() {
            return Err(SessionError::RoomFull(name.to_string()));
        }

        self.get_or_create_player(connection)?;
        let previous = current.and_then(|old| self.leave_room(&old, connection));

        let room = self
            .rooms
            .get_mut(name)
            .ok_or_else(|| SessionError::RoomNotFound(name.to_string()))?;
        room.members.push(connection);
        if let Some(player) = self.players.get_mut(&connection) {
            player.room = Some(name.to_string());
        }

        Ok(JoinOutcome {
            room: name.to_string(),
            previous,
            already_member: false,
        })
    }

    /// Removes the connection from a room's membership.
    ///
    /// Returns `None` when the room does not exist or the connection is not a
    /// member, which makes repeated calls harmless. An emptied room is
    /// deleted, and a started room drops back to not started.
    pub fn leave_room(&mut self, name: &str, connection: ConnectionId) -> Option<Departure> {
        let room = self.rooms.get_mut(name)?;
        let index = room.members.iter().position(|member| *member == connection)?;
        room.members.remove(index);

        let match_abandoned = room.started;
        room.started = false;
        let remaining = room.members.clone();
        let room_deleted = remaining.is_empty();
        if room_deleted {
            self.rooms.remove(name);
        }

        if let Some(player) = self.players.get_mut(&connection) {
            player.room = None;
            player.reset_round();
        }
        if match_abandoned {
            for member in remaining {
                if let Some(player) = self.players.get_mut(&member) {
                    player.started = false;
                }
            }
        }

        Some(Departure {
            room: name.to_string(),
            room_deleted,
            match_abandoned,
        })
    }

    /// Forgets a connection and its player. Returns `None` if the connection
    /// was not registered.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Option<Disconnect> {
        if !self.connections.remove(&connection) {
            return None;
        }

        let departure = self
            .players
            .get(&connection)
            .and_then(|player| player.room.clone())
            .and_then(|room| self.leave_room(&room, connection));

        let player = self.players.remove(&connection);
        if let Some(player) = &player {
            self.names.remove(&player.name);
        }

        Some(Disconnect { player, departure })
    }

    /// Starts the match in the connection's room once both members are ready.
    pub fn start_game(&mut self, connection: ConnectionId) -> Result<StartOutcome, SessionError> {
        self.ensure_registered(connection)?;

        let name = self
            .players
            .get(&connection)
            .and_then(|player| player.room.clone())
            .ok_or(SessionError::NotInRoom(connection))?;
        let room = self
            .rooms
            .get_mut(&name)
            .ok_or_else(|| SessionError::RoomNotFound(name.clone()))?;

        if room.started {
            return Ok(StartOutcome {
                room: name,
                newly_started: false,
            });
        }

        let all_ready = room.members.len() == ROOM_CAPACITY
            && room
                .members
                .iter()
                .all(|member| self.players.get(member).is_some_and(|player| player.ready));
        if !all_ready {
            return Err(SessionError::NotReady(name));
        }

        room.started = true;
        for member in &room.members {
            if let Some(player) = self.players.get_mut(member) {
                player.started = true;
            }
        }

        Ok(StartOutcome {
            room: name,
            newly_started: true,
        })
    }

    /// Ends the running match: records the winner and clears every member's
    /// pins, readiness and started flag.
    pub fn finish_match(&mut self, name: &str, winner: &str) -> bool {
        let Some(room) = self.rooms.get_mut(name) else {
            return false;
        };

        room.started = false;
        room.last_winner = Some(winner.to_string());
        for member in &room.members {
            if let Some(player) = self.players.get_mut(member) {
                player.reset_round();
            }
        }
        true
    }

    pub fn room(&self, name: &str) -> Option<&Room> {
        self.rooms.get(name)
    }

    pub fn player(&self, connection: ConnectionId) -> Option<&Player> {
        self.players.get(&connection)
    }

    pub fn player_by_name(&self, name: &str) -> Option<&Player> {
        self.names.get(name).and_then(|connection| self.players.get(connection))
    }

    /// Rooms in creation order.
    pub fn rooms(&self) -> Vec<&Room> {
        let mut rooms: Vec<&Room> = self.rooms.values().collect();
        rooms.sort_by_key(|room| room.created);
        rooms
    }

    pub fn list_rooms(&self) -> Vec<RoomListing> {
        self.rooms().into_iter().map(Room::listing).collect()
    }

    /// Players of a room in join order.
    pub fn members(&self, name: &str) -> Vec<&Player> {
        self.rooms
            .get(name)
            .map(|room| {
                room.members
                    .iter()
                    .filter_map(|member| self.players.get(member))
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn member_snapshots(&self, name: &str) -> Vec<PlayerSnapshot> {
        self.members(name).into_iter().map(Player::snapshot).collect()
    }

    pub fn stats(&self) -> RegistryStats {
        RegistryStats {
            connections: self.connections.len(),
            players: self.players.len(),
            rooms: self.rooms.len(),
            started_rooms: self.rooms.values().filter(|room| room.started).count(),
        }
    }

    /// Checks that rooms, players, names and connections agree.
    ///
    /// Returns a description of the first inconsistency found.
    pub fn check_invariants(&self) -> Result<(), String> {
        let mut memberships: HashMap<ConnectionId, &str> = HashMap::new();

        for (key, room) in &self.rooms {
            if *key != room.name {
                return Err(format!("room {} stored under key {key}", room.name));
            }
            if room.members.is_empty() {
                return Err(format!("room {key} has no members"));
            }
            if room.members.len() > ROOM_CAPACITY {
                return Err(format!("room {key} has {} members", room.members.len()));
            }
            if room.started && room.members.len() != ROOM_CAPACITY {
                return Err(format!("room {key} is started without two members"));
            }
            for member in &room.members {
                if let Some(other) = memberships.insert(*member, key.as_str()) {
                    return Err(format!("connection {member} is a member of {other} and {key}"));
                }
                if !self.connections.contains(member) {
                    return Err(format!("room {key} holds unregistered connection {member}"));
                }
                match self.players.get(member) {
                    Some(player) if player.room.as_deref() == Some(key.as_str()) => {}
                    Some(player) => {
                        return Err(format!(
                            "player {} is a member of {key} but points at {:?}",
                            player.name, player.room
                        ))
                    }
                    None => return Err(format!("room {key} holds connection {member} with no player")),
                }
            }
        }

        for (connection, player) in &self.players {
            if player.connection != *connection {
                return Err(format!("player {} stored under connection {connection}", player.name));
            }
            if !self.connections.contains(connection) {
                return Err(format!("player {} has no live connection", player.name));
            }
            if self.names.get(&player.name) != Some(connection) {
                return Err(format!("name index is stale for {}", player.name));
            }
            match &player.room {
                Some(room) if memberships.get(connection).copied() != Some(room.as_str()) => {
                    return Err(format!("player {} points at {room} without membership", player.name))
                }
                None if memberships.contains_key(connection) => {
                    return Err(format!("player {} is a member but has no room", player.name))
                }
                _ => {}
            }
            if player.started {
                let room_started = player
                    .room
                    .as_deref()
                    .and_then(|room| self.rooms.get(room))
                    .is_some_and(|room| room.started);
                if !room_started {
                    return Err(format!("player {} is started outside a started room", player.name));
                }
            }
        }

        if self.names.len() != self.players.len() {
            return Err(format!(
                "{} names indexed for {} players",
                self.names.len(),
                self.players.len()
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trigon_geometry::Point;

    fn named(registry: &mut Registry, connection: ConnectionId, name: &str) {
        registry.register_connection(connection);
        registry
            .update_player(
                connection,
                PlayerPatch {
                    name: Some(name.to_string()),
                    ..Default::default()
                },
            )
            .expect("Failed to name player");
    }

    fn ready(registry: &mut Registry, connection: ConnectionId) {
        registry
            .update_player(
                connection,
                PlayerPatch {
                    ready: Some(true),
                    ..Default::default()
                },
            )
            .expect("Failed to mark ready");
    }

    /// Two named, ready players in room "arena".
    fn full_room() -> Registry {
        let mut registry = Registry::default();
        named(&mut registry, 1, "ada");
        named(&mut registry, 2, "bob");
        registry.create_room("arena").unwrap();
        registry.join_room("arena", 1).unwrap();
        registry.join_room("arena", 2).unwrap();
        ready(&mut registry, 1);
        ready(&mut registry, 2);
        registry
    }

    #[test]
    fn test_create_room_rejects_duplicates() {
        let mut registry = Registry::default();
        registry.create_room("arena").unwrap();
        assert_eq!(
            registry.create_room(" arena ").unwrap_err(),
            SessionError::DuplicateName("arena".into())
        );
    }

    #[test]
    fn test_room_names_are_validated() {
        let mut registry = Registry::new(5);
        assert!(matches!(registry.create_room("   "), Err(SessionError::InvalidName(_))));
        assert!(matches!(registry.create_room("toolong"), Err(SessionError::InvalidName(_))));
        assert!(matches!(registry.create_room("a\tb"), Err(SessionError::InvalidName(_))));
        assert_eq!(registry.create_room(" ok ").unwrap().name, "ok");
    }

    #[test]
    fn test_list_rooms_keeps_creation_order() {
        let mut registry = Registry::default();
        for name in ["zeta", "alpha", "mid"] {
            registry.create_room(name).unwrap();
        }
        let names: Vec<String> = registry.list_rooms().into_iter().map(|r| r.name).collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_guest_player_for_nameless_connection() {
        let mut registry = Registry::default();
        registry.register_connection(4);
        assert_eq!(registry.get_or_create_player(4).unwrap().name, "guest-4");

        // A real player already took the next guest name
        named(&mut registry, 5, "guest-6");
        registry.register_connection(6);
        assert_eq!(registry.get_or_create_player(6).unwrap().name, "guest-6-2");
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_update_player_needs_identity_or_name() {
        let mut registry = Registry::default();
        assert_eq!(
            registry.update_player(9, PlayerPatch::default()).unwrap_err(),
            SessionError::UnknownConnection(9)
        );

        registry.register_connection(9);
        assert_eq!(
            registry
                .update_player(
                    9,
                    PlayerPatch {
                        ready: Some(true),
                        ..Default::default()
                    }
                )
                .unwrap_err(),
            SessionError::UnknownConnection(9)
        );

        let update = registry
            .update_player(
                9,
                PlayerPatch {
                    name: Some("cleo".into()),
                    ready: Some(true),
                    ..Default::default()
                },
            )
            .unwrap();
        assert!(update.created);
        assert!(update.player.ready);
    }

    #[test]
    fn test_rename_updates_index_and_rejects_taken_names() {
        let mut registry = Registry::default();
        named(&mut registry, 1, "ada");
        named(&mut registry, 2, "bob");

        let rename = PlayerPatch {
            name: Some("bob".into()),
            ..Default::default()
        };
        assert_eq!(
            registry.update_player(1, rename).unwrap_err(),
            SessionError::DuplicateName("bob".into())
        );

        let update = registry
            .update_player(
                1,
                PlayerPatch {
                    name: Some("ada2".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(update.previous_name.as_deref(), Some("ada"));
        assert!(registry.player_by_name("ada").is_none());
        assert_eq!(registry.player_by_name("ada2").unwrap().connection, 1);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_join_rejects_third_member() {
        let mut registry = full_room();
        named(&mut registry, 3, "cleo");

        assert_eq!(
            registry.join_room("arena", 3).unwrap_err(),
            SessionError::RoomFull("arena".into())
        );
        assert_eq!(registry.room("arena").unwrap().members, vec![1, 2]);
        assert!(registry.player(3).unwrap().room.is_none());
        assert!(!registry.list_rooms()[0].started);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_join_missing_room() {
        let mut registry = Registry::default();
        named(&mut registry, 1, "ada");
        assert_eq!(
            registry.join_room("nowhere", 1).unwrap_err(),
            SessionError::RoomNotFound("nowhere".into())
        );
    }

    #[test]
    fn test_join_twice_is_harmless() {
        let mut registry = full_room();
        let outcome = registry.join_room("arena", 1).unwrap();
        assert!(outcome.already_member);
        assert_eq!(registry.room("arena").unwrap().members.len(), 2);
    }

    #[test]
    fn test_join_other_room_leaves_the_first() {
        let mut registry = Registry::default();
        named(&mut registry, 1, "ada");
        registry.create_room("first").unwrap();
        registry.create_room("second").unwrap();
        registry.join_room("first", 1).unwrap();

        let outcome = registry.join_room("second", 1).unwrap();
        let previous = outcome.previous.unwrap();
        assert_eq!(previous.room, "first");
        assert!(previous.room_deleted);
        assert!(registry.room("first").is_none());
        assert_eq!(registry.player(1).unwrap().room.as_deref(), Some("second"));
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_leave_twice_is_a_noop() {
        let mut registry = full_room();

        let departure = registry.leave_room("arena", 2).unwrap();
        assert!(!departure.room_deleted);
        let snapshot = registry.list_rooms();

        assert!(registry.leave_room("arena", 2).is_none());
        assert!(registry.leave_room("arena", 2).is_none());
        assert_eq!(registry.list_rooms(), snapshot);
        assert_eq!(registry.room("arena").unwrap().members, vec![1]);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_last_member_leaving_deletes_room() {
        let mut registry = full_room();
        registry.leave_room("arena", 1).unwrap();
        let departure = registry.leave_room("arena", 2).unwrap();
        assert!(departure.room_deleted);
        assert!(registry.list_rooms().is_empty());
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_start_requires_two_ready_members() {
        let mut registry = Registry::default();
        named(&mut registry, 1, "ada");
        assert_eq!(registry.start_game(1).unwrap_err(), SessionError::NotInRoom(1));

        registry.create_room("arena").unwrap();
        registry.join_room("arena", 1).unwrap();
        ready(&mut registry, 1);
        assert_eq!(
            registry.start_game(1).unwrap_err(),
            SessionError::NotReady("arena".into())
        );

        named(&mut registry, 2, "bob");
        registry.join_room("arena", 2).unwrap();
        assert!(registry.start_game(1).is_err());

        ready(&mut registry, 2);
        let outcome = registry.start_game(2).unwrap();
        assert!(outcome.newly_started);
        assert!(registry.player(1).unwrap().started);
        assert!(!registry.start_game(1).unwrap().newly_started);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_leaving_started_room_abandons_match() {
        let mut registry = full_room();
        registry.start_game(1).unwrap();

        let departure = registry.leave_room("arena", 2).unwrap();
        assert!(departure.match_abandoned);
        let room = registry.room("arena").unwrap();
        assert!(!room.started);
        assert!(!registry.player(1).unwrap().started);
        assert!(!registry.player(2).unwrap().ready);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_finish_match_resets_members() {
        let mut registry = full_room();
        registry.start_game(1).unwrap();
        registry
            .update_player(
                1,
                PlayerPatch {
                    first: Some(Point::new(1.0, 1.0)),
                    ..Default::default()
                },
            )
            .unwrap();

        assert!(registry.finish_match("arena", "ada"));
        let room = registry.room("arena").unwrap();
        assert!(!room.started);
        assert_eq!(room.last_winner.as_deref(), Some("ada"));
        assert_eq!(room.members, vec![1, 2]);
        for player in registry.members("arena") {
            assert_eq!(player.pins.placed(), 0);
            assert!(!player.ready && !player.started);
        }
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_delete_room_releases_members() {
        let mut registry = full_room();
        assert!(registry.delete_room("arena").is_some());
        assert!(registry.delete_room("arena").is_none());
        assert!(registry.player(1).unwrap().room.is_none());
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_remove_connection_cleans_everything() {
        let mut registry = full_room();
        registry.start_game(1).unwrap();

        let disconnect = registry.remove_connection(2).unwrap();
        assert_eq!(disconnect.player.unwrap().name, "bob");
        assert!(disconnect.departure.unwrap().match_abandoned);
        assert!(registry.player_by_name("bob").is_none());
        assert!(registry.remove_connection(2).is_none());
        registry.check_invariants().unwrap();

        // The name is free again
        named(&mut registry, 3, "bob");
    }

    #[test]
    fn test_update_after_remove_is_rejected() {
        let mut registry = full_room();
        registry.remove_connection(1).unwrap();

        let late = PlayerPatch {
            name: Some("ada".into()),
            first: Some(Point::new(0.0, 0.0)),
            ..Default::default()
        };
        assert_eq!(
            registry.update_player(1, late).unwrap_err(),
            SessionError::UnknownConnection(1)
        );
        assert!(registry.player(1).is_none());
        assert_eq!(registry.room("arena").unwrap().members, vec![2]);
        registry.check_invariants().unwrap();
    }

    #[test]
    fn test_stats() {
        let mut registry = full_room();
        registry.register_connection(10);
        registry.start_game(1).unwrap();
        assert_eq!(
            registry.stats(),
            RegistryStats {
                connections: 3,
                players: 2,
                rooms: 1,
                started_rooms: 1,
            }
        );
    }
}
