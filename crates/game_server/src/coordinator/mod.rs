//! Room coordination: the single writer over the session registry.
//!
//! Every operation takes the registry lock, mutates, and fans out the
//! resulting messages before releasing it, so all clients observe changes
//! in the order they happened. Rejected operations leave the registry
//! unchanged and answer only the originating connection, with an `error`
//! frame followed by the state it needs to resynchronize.

pub mod transport;
pub mod victory;

pub use transport::Transport;
pub use victory::{evaluate, Victory};

use crate::connection::ConnectionId;
use crate::messaging::ServerMessage;
use crate::session::{
    Departure, JoinOutcome, PlayerPatch, PlayerState, Registry, RegistryStats, SessionError,
};
use crate::store::{PlayerRecord, RoomRecord, SnapshotStore};
use std::sync::Arc;
use tokio::runtime::{Handle, RuntimeFlavor};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};
use trigon_geometry::Precision;

/// What a rejected client gets sent after the error frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resync {
    Lobby,
    Room,
    Player,
}

pub struct Coordinator {
    registry: Mutex<Registry>,
    transport: Arc<dyn Transport>,
    store: Option<Arc<dyn SnapshotStore>>,
    precision: Precision,
}

impl Coordinator {
    pub fn new(registry: Registry, transport: Arc<dyn Transport>, precision: Precision) -> Self {
        Self {
            registry: Mutex::new(registry),
            transport,
            store: None,
            precision,
        }
    }

    /// Writes room and player snapshots to `store` after every mutation.
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn precision(&self) -> Precision {
        self.precision
    }

    /// Registers a new connection and sends it the lobby.
    pub async fn connect(&self, connection: ConnectionId) {
        let mut registry = self.registry.lock().await;
        if !registry.register_connection(connection) {
            warn!("⚠️ Connection {} registered twice", connection);
        }
        self.transport.send(connection, &lobby(&registry)).await;
        self.verify(&registry);
    }

    /// Forgets a connection, removing its player from any room.
    pub async fn disconnect(&self, connection: ConnectionId) {
        let mut registry = self.registry.lock().await;
        let Some(disconnect) = registry.remove_connection(connection) else {
            debug!("Connection {} was not registered", connection);
            return;
        };

        if let Some(departure) = &disconnect.departure {
            self.transport.leave_topic(connection, &departure.room).await;
            if self.announce_departure(&registry, departure).await {
                self.transport.broadcast_all(&lobby(&registry)).await;
            }
        }
        if let Some(player) = &disconnect.player {
            self.forget_player(&player.name);
            info!("👋 Player {} left (connection {})", player.name, connection);
        }
        self.verify(&registry);
    }

    pub async fn list_rooms(&self, connection: ConnectionId) -> Result<(), SessionError> {
        let registry = self.registry.lock().await;
        if !registry.is_registered(connection) {
            return Err(SessionError::UnknownConnection(connection));
        }
        self.transport.send(connection, &lobby(&registry)).await;
        Ok(())
    }

    /// Creates a room and makes the caller its owner.
    pub async fn create_room(
        &self,
        connection: ConnectionId,
        name: &str,
    ) -> Result<(), SessionError> {
        let mut registry = self.registry.lock().await;
        let result = self.try_create_room(&mut registry, connection, name).await;
        self.settle(&registry, connection, result, Resync::Lobby).await
    }

    async fn try_create_room(
        &self,
        registry: &mut Registry,
        connection: ConnectionId,
        name: &str,
    ) -> Result<(), SessionError> {
        if !registry.is_registered(connection) {
            return Err(SessionError::UnknownConnection(connection));
        }
        let room = registry.create_room(name)?.name.clone();
        let joined = match registry.join_room(&room, connection) {
            Ok(joined) => joined,
            Err(error) => {
                registry.delete_room(&room);
                return Err(error);
            }
        };

        info!("🏠 Room {} created by connection {}", room, connection);
        self.after_join(registry, connection, &joined).await;
        self.transport.broadcast_all(&lobby(registry)).await;
        Ok(())
    }

    pub async fn join_room(&self, connection: ConnectionId, name: &str) -> Result<(), SessionError> {
        let mut registry = self.registry.lock().await;
        let result = self.try_join_room(&mut registry, connection, name).await;
        self.settle(&registry, connection, result, Resync::Lobby).await
    }

    async fn try_join_room(
        &self,
        registry: &mut Registry,
        connection: ConnectionId,
        name: &str,
    ) -> Result<(), SessionError> {
        let joined = registry.join_room(name, connection)?;
        if self.after_join(registry, connection, &joined).await {
            self.transport.broadcast_all(&lobby(registry)).await;
        }
        Ok(())
    }

    /// Leaves a room. Leaving a room the caller is not in does nothing.
    pub async fn leave_room(&self, connection: ConnectionId, name: &str) -> Result<(), SessionError> {
        let mut registry = self.registry.lock().await;
        if !registry.is_registered(connection) {
            let error = SessionError::UnknownConnection(connection);
            return self.settle(&registry, connection, Err(error), Resync::Lobby).await;
        }

        let Some(departure) = registry.leave_room(name, connection) else {
            debug!("Connection {} is not in room {}", connection, name);
            return Ok(());
        };

        self.transport.leave_topic(connection, name).await;
        if self.announce_departure(&registry, &departure).await {
            self.transport.broadcast_all(&lobby(&registry)).await;
        }
        self.persist_player(&registry, connection);
        self.verify(&registry);
        Ok(())
    }

    /// Merges a partial update into the caller's player and, when a pin
    /// moved during a match, checks for a winner.
    pub async fn update_player(
        &self,
        connection: ConnectionId,
        patch: PlayerPatch,
    ) -> Result<(), SessionError> {
        let mut registry = self.registry.lock().await;
        let result = self.try_update_player(&mut registry, connection, patch).await;
        self.settle(&registry, connection, result, Resync::Player).await
    }

    async fn try_update_player(
        &self,
        registry: &mut Registry,
        connection: ConnectionId,
        patch: PlayerPatch,
    ) -> Result<(), SessionError> {
        let update = registry.update_player(connection, patch)?;
        let player = &update.player;

        if update.created {
            info!("🎮 Player {} joined on connection {}", player.name, connection);
        }
        if let Some(previous) = &update.previous_name {
            debug!("Player {} renamed to {}", previous, player.name);
            self.forget_player(previous);
        }

        self.transport
            .send(connection, &ServerMessage::PlayerState(player.state()))
            .await;
        self.persist_player(registry, connection);

        let Some(room) = player.room.clone() else {
            return Ok(());
        };
        if update.changes.visible_to_room() {
            self.transport
                .broadcast(&room, &members_update(registry, &room))
                .await;
            self.persist_room(registry, &room);
        }
        if update.changes.pins && player.started {
            self.evaluate_round(registry, connection).await;
        }
        Ok(())
    }

    /// Starts the match in the caller's room.
    pub async fn start_game(&self, connection: ConnectionId) -> Result<(), SessionError> {
        let mut registry = self.registry.lock().await;
        let result = self.try_start_game(&mut registry, connection).await;
        self.settle(&registry, connection, result, Resync::Room).await
    }

    async fn try_start_game(
        &self,
        registry: &mut Registry,
        connection: ConnectionId,
    ) -> Result<(), SessionError> {
        let outcome = registry.start_game(connection)?;
        if !outcome.newly_started {
            debug!("Room {} is already started", outcome.room);
            return Ok(());
        }

        info!("🚀 Match starting in room {}", outcome.room);
        self.transport
            .broadcast(&outcome.room, &ServerMessage::GameStarting)
            .await;
        self.transport
            .broadcast(&outcome.room, &members_update(registry, &outcome.room))
            .await;
        self.transport.broadcast_all(&lobby(registry)).await;
        self.persist_room(registry, &outcome.room);
        Ok(())
    }

    /// Reports a frame that never reached the registry.
    pub async fn reject_frame(&self, connection: ConnectionId, code: &str, message: String) {
        self.transport
            .send(connection, &ServerMessage::error(code, message))
            .await;
    }

    pub async fn stats(&self) -> RegistryStats {
        self.registry.lock().await.stats()
    }

    /// Runs `f` against the registry under the lock.
    pub async fn inspect<R>(&self, f: impl FnOnce(&Registry) -> R) -> R {
        let registry = self.registry.lock().await;
        f(&registry)
    }

    async fn evaluate_round(&self, registry: &mut Registry, connection: ConnectionId) {
        let precision = self.precision;
        let outcome = off_reactor(|| victory::evaluate(registry, connection, precision));
        match outcome {
            Ok(Some(victory)) => self.conclude(registry, victory).await,
            Ok(None) => {}
            Err(error) => debug!("📐 No winner this round: {}", error),
        }
    }

    async fn conclude(&self, registry: &mut Registry, victory: Victory) {
        info!(
            "🏆 {} wins in room {} ({} of {} cells enclosed)",
            victory.winner,
            victory.room,
            victory.overlap.cells_both,
            victory.overlap.cells_a.min(victory.overlap.cells_b)
        );

        self.transport
            .broadcast(&victory.room, &ServerMessage::Victory(victory.winner.clone()))
            .await;

        registry.finish_match(&victory.room, &victory.winner);

        self.transport
            .broadcast(&victory.room, &members_update(registry, &victory.room))
            .await;
        let states: Vec<(ConnectionId, PlayerState)> = registry
            .members(&victory.room)
            .into_iter()
            .map(|player| (player.connection, player.state()))
            .collect();
        for (member, state) in states {
            self.transport
                .send(member, &ServerMessage::PlayerState(state))
                .await;
            self.persist_player(registry, member);
        }
        self.transport.broadcast_all(&lobby(registry)).await;
        self.persist_room(registry, &victory.room);
    }

    /// Subscribes the caller to its new room and tells the room. Returns
    /// whether the lobby listing changed because of a room left on the way.
    async fn after_join(
        &self,
        registry: &Registry,
        connection: ConnectionId,
        joined: &JoinOutcome,
    ) -> bool {
        let mut lobby_changed = false;
        if let Some(previous) = &joined.previous {
            self.transport.leave_topic(connection, &previous.room).await;
            lobby_changed = self.announce_departure(registry, previous).await;
        }
        if joined.already_member {
            return lobby_changed;
        }

        info!("🚪 Connection {} joined room {}", connection, joined.room);
        self.transport.join_topic(connection, &joined.room).await;
        self.transport
            .broadcast(&joined.room, &members_update(registry, &joined.room))
            .await;
        self.persist_room(registry, &joined.room);
        self.persist_player(registry, connection);
        lobby_changed
    }

    /// Tells the remaining members about a departure. Returns whether the
    /// lobby listing changed.
    async fn announce_departure(&self, registry: &Registry, departure: &Departure) -> bool {
        if departure.room_deleted {
            info!("🗑️ Room {} is empty and was removed", departure.room);
        } else {
            self.transport
                .broadcast(&departure.room, &members_update(registry, &departure.room))
                .await;
        }
        if departure.match_abandoned {
            warn!("⚠️ Match in room {} abandoned", departure.room);
        }
        self.persist_room(registry, &departure.room);
        departure.room_deleted || departure.match_abandoned
    }

    async fn settle(
        &self,
        registry: &Registry,
        connection: ConnectionId,
        result: Result<(), SessionError>,
        resync: Resync,
    ) -> Result<(), SessionError> {
        if let Err(error) = &result {
            warn!("🚫 Rejected request from connection {}: {}", connection, error);
            self.transport
                .send(connection, &ServerMessage::error(error.code(), error.to_string()))
                .await;
            self.resync(registry, connection, resync).await;
        }
        self.verify(registry);
        result
    }

    async fn resync(&self, registry: &Registry, connection: ConnectionId, resync: Resync) {
        let player = registry.player(connection);
        let message = match resync {
            Resync::Lobby => lobby(registry),
            Resync::Room => match player.and_then(|player| player.room.as_deref()) {
                Some(room) => members_update(registry, room),
                None => lobby(registry),
            },
            Resync::Player => match player {
                Some(player) => ServerMessage::PlayerState(player.state()),
                None => return,
            },
        };
        self.transport.send(connection, &message).await;
    }

    fn persist_room(&self, registry: &Registry, name: &str) {
        let Some(store) = &self.store else {
            return;
        };
        match registry.room(name) {
            Some(room) => store.put_room(RoomRecord::capture(room, registry)),
            None => store.remove_room(name),
        }
    }

    fn persist_player(&self, registry: &Registry, connection: ConnectionId) {
        if let (Some(store), Some(player)) = (&self.store, registry.player(connection)) {
            store.put_player(PlayerRecord::from(player));
        }
    }

    fn forget_player(&self, name: &str) {
        if let Some(store) = &self.store {
            store.remove_player(name);
        }
    }

    fn verify(&self, registry: &Registry) {
        if cfg!(debug_assertions) {
            if let Err(violation) = registry.check_invariants() {
                error!("❌ Registry invariant violated: {}", violation);
                debug_assert!(false, "registry invariant violated: {violation}");
            }
        }
    }
}

fn lobby(registry: &Registry) -> ServerMessage {
    ServerMessage::LobbyUpdate(registry.list_rooms())
}

fn members_update(registry: &Registry, room: &str) -> ServerMessage {
    ServerMessage::MembersUpdate {
        room: room.to_string(),
        members: registry.member_snapshots(room),
    }
}

/// Runs CPU-bound sampling so other tasks on this worker move elsewhere.
///
/// `block_in_place` only exists on the multi-threaded runtime; anywhere else
/// `f` runs inline.
fn off_reactor<R>(f: impl FnOnce() -> R) -> R {
    match Handle::try_current().map(|handle| handle.runtime_flavor()) {
        Ok(RuntimeFlavor::MultiThread) => tokio::task::block_in_place(f),
        _ => f(),
    }
}
