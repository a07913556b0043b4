//! Core game server implementation.
//!
//! This module contains the main `GameServer` struct, which wires the
//! connection manager, the WebSocket transport and the room coordinator
//! together and runs the accept loop.

use crate::{
    config::ServerConfig,
    connection::{ConnectionManager, GatewayTransport},
    coordinator::Coordinator,
    error::ServerError,
    server::handlers::handle_connection,
    session::{Registry, RegistryStats},
    shutdown::ShutdownState,
    store::MemoryStore,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::{error, info, warn};

/// The core game server structure.
///
/// `GameServer` owns the session state for its whole lifetime: the
/// [`Coordinator`] and its registry are created with the server and dropped
/// with it.
///
/// # Architecture
///
/// * **Connection Management**: WebSocket connection lifecycle and room topics
/// * **Coordinator**: Serialized access to rooms and players
/// * **Transport**: JSON encoding and fan-out between the two
pub struct GameServer {
    /// Server configuration settings
    config: ServerConfig,

    /// Manager for client connections and messaging
    connection_manager: Arc<ConnectionManager>,

    /// Owner of all room and player state
    coordinator: Arc<Coordinator>,

    /// Channel for coordinating server shutdown
    shutdown_sender: broadcast::Sender<()>,
}

impl GameServer {
    /// Creates a new game server with the specified configuration.
    ///
    /// # Component Initialization
    ///
    /// 1. Creates the connection manager and the transport on top of it
    /// 2. Creates an empty registry and the coordinator that guards it
    /// 3. Attaches an in-memory snapshot store when persistence is enabled
    pub fn new(config: ServerConfig) -> Self {
        let connection_manager = Arc::new(ConnectionManager::new());
        let transport = Arc::new(GatewayTransport::new(connection_manager.clone()));
        let registry = Registry::new(config.max_name_length);

        let mut coordinator = Coordinator::new(registry, transport, config.precision);
        if config.persistence_enabled {
            info!("💾 Snapshot persistence enabled (in-memory store)");
            coordinator = coordinator.with_store(Arc::new(MemoryStore::new()));
        }

        let (shutdown_sender, _) = broadcast::channel(1);

        Self {
            config,
            connection_manager,
            coordinator: Arc::new(coordinator),
            shutdown_sender,
        }
    }

    /// Starts the game server and runs until shutdown is initiated through
    /// the provided shutdown state.
    pub async fn start_with_shutdown_state(&self, shutdown_state: ShutdownState) -> Result<(), ServerError> {
        self.start_internal(Some(shutdown_state)).await
    }

    /// Starts the game server and runs until [`GameServer::shutdown`] is called.
    pub async fn start(&self) -> Result<(), ServerError> {
        self.start_internal(None).await
    }

    async fn start_internal(&self, shutdown_state: Option<ShutdownState>) -> Result<(), ServerError> {
        let listener = self.bind().await?;
        self.serve(listener, shutdown_state).await
    }

    /// Binds the configured address.
    pub async fn bind(&self) -> Result<TcpListener, ServerError> {
        TcpListener::bind(self.config.bind_address)
            .await
            .map_err(|e| ServerError::Network(format!("Failed to bind {}: {e}", self.config.bind_address)))
    }

    /// Runs the accept loop on an already bound listener.
    ///
    /// Each accepted socket gets its own handler task. Sockets beyond
    /// `max_connections` are dropped right away.
    pub async fn serve(
        &self,
        listener: TcpListener,
        shutdown_state: Option<ShutdownState>,
    ) -> Result<(), ServerError> {
        let local_addr = listener
            .local_addr()
            .map_err(|e| ServerError::Network(e.to_string()))?;
        info!("🚀 Game server listening on {}", local_addr);
        info!("🎯 Victory precision: {}", self.config.precision);

        let mut shutdown_receiver = self.shutdown_sender.subscribe();
        let shutdown_signal = async {
            match &shutdown_state {
                Some(state) => state.wait().await,
                None => std::future::pending::<()>().await,
            }
        };
        tokio::pin!(shutdown_signal);

        loop {
            tokio::select! {
                accepted = listener.accept() => match accepted {
                    Ok((stream, addr)) => {
                        let active = self.connection_manager.connection_count().await;
                        if active >= self.config.max_connections {
                            warn!("🚧 Refusing {}: {} connections already open", addr, active);
                            drop(stream);
                            continue;
                        }

                        let connection_manager = self.connection_manager.clone();
                        let coordinator = self.coordinator.clone();
                        let security = self.config.security.clone();
                        let shutdown_state = shutdown_state.clone();

                        // Spawn individual connection handler
                        tokio::spawn(async move {
                            if let Err(e) = handle_connection(
                                stream,
                                addr,
                                connection_manager,
                                coordinator,
                                security,
                                shutdown_state,
                            )
                            .await
                            {
                                warn!("Connection from {} failed: {}", addr, e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                        break;
                    }
                },
                _ = &mut shutdown_signal => {
                    info!("🛑 Accept loop stopping - shutdown initiated");
                    break;
                }
                _ = shutdown_receiver.recv() => {
                    info!("Internal shutdown signal received");
                    break;
                }
            }
        }

        info!("🧹 Performing server cleanup...");
        Ok(())
    }

    /// Initiates server shutdown.
    ///
    /// Stops the accept loop. Open connections are closed through the
    /// shared [`ShutdownState`] when one was supplied at start.
    pub async fn shutdown(&self) -> Result<(), ServerError> {
        info!("🛑 Shutting down server...");
        let _ = self.shutdown_sender.send(());
        Ok(())
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn coordinator(&self) -> Arc<Coordinator> {
        self.coordinator.clone()
    }

    pub fn connection_manager(&self) -> Arc<ConnectionManager> {
        self.connection_manager.clone()
    }

    /// Current session counts, for periodic monitoring.
    pub async fn stats(&self) -> RegistryStats {
        self.coordinator.stats().await
    }
}
