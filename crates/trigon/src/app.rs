//! Main application logic and lifecycle management.
//!
//! This module contains the `Application` struct that orchestrates server
//! startup, periodic monitoring and shutdown.

use crate::{
    cli::CliArgs,
    config::AppConfig,
    logging::display_banner,
    signals::{wait_for_shutdown, wait_for_signal},
};
use game_server::{GameServer, ShutdownState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

const STATS_INTERVAL: Duration = Duration::from_secs(60);
const SERVER_STOP_TIMEOUT: Duration = Duration::from_secs(8);

/// Owns the configuration and the game server for the life of the process.
///
/// All room and player state lives inside the server, so it is created in
/// [`Application::new`] and dropped when [`Application::run`] returns.
pub struct Application {
    config: AppConfig,
    config_path: PathBuf,
    server: Arc<GameServer>,
}

impl Application {
    /// Creates a new application instance.
    ///
    /// # Process
    ///
    /// 1. Load configuration from file (creating default if missing)
    /// 2. Apply command-line argument overrides
    /// 3. Validate merged configuration
    /// 4. Display startup banner
    /// 5. Initialize game server with configuration
    pub async fn new(args: CliArgs) -> Result<Self, Box<dyn std::error::Error>> {
        info!("🔧 Loading configuration from: {}", args.config_path.display());
        let mut config = AppConfig::load_from_file(&args.config_path).await?;

        apply_overrides(&mut config, &args)?;

        if let Err(e) = config.validate() {
            return Err(format!("Configuration validation failed: {e}").into());
        }
        info!("✅ Configuration loaded and validated successfully");

        display_banner();

        let server = GameServer::new(config.to_server_config()?);

        Ok(Self {
            config,
            config_path: args.config_path,
            server: Arc::new(server),
        })
    }

    /// Runs the server until a termination signal arrives, then shuts down
    /// in phases.
    pub async fn run(self) -> Result<(), Box<dyn std::error::Error>> {
        info!("🌟 Starting trigon server");
        self.log_configuration_summary();

        let shutdown_state = ShutdownState::new();

        let server_handle = {
            let server = self.server.clone();
            let shutdown_state = shutdown_state.clone();
            tokio::spawn(async move {
                match server.start_with_shutdown_state(shutdown_state).await {
                    Ok(()) => {
                        info!("✅ Server completed successfully");
                    }
                    Err(e) => {
                        error!("❌ Server error: {:?}", e);
                        std::process::exit(1);
                    }
                }
            })
        };

        let monitoring_handle = {
            let server = self.server.clone();
            tokio::spawn(async move {
                let mut interval = tokio::time::interval(STATS_INTERVAL);
                // The first tick completes immediately
                interval.tick().await;

                loop {
                    interval.tick().await;
                    let stats = server.stats().await;
                    info!(
                        "📊 {} rooms ({} in play) | {} players | {} connections",
                        stats.rooms, stats.started_rooms, stats.players, stats.connections
                    );
                }
            })
        };

        info!("✅ Trigon server is now running!");
        info!(
            "🎮 Ready to accept connections on {}",
            self.config.server.bind_address
        );
        info!("🛑 Press Ctrl+C to gracefully shutdown");

        wait_for_shutdown(&shutdown_state).await?;

        // A second signal skips the graceful path
        tokio::spawn(async move {
            if let Err(e) = wait_for_signal().await {
                error!("Failed to set up forced shutdown signal handler: {e}");
                return;
            }

            warn!("Shutdown signal received again - exiting immediately");
            std::process::exit(1);
        });

        info!("🛑 Shutdown signal received, beginning graceful shutdown...");

        info!("📡 Phase 1: Stopping monitoring...");
        monitoring_handle.abort();

        info!("⏳ Phase 2: Waiting for the accept loop and connections to close...");
        match tokio::time::timeout(SERVER_STOP_TIMEOUT, server_handle).await {
            Ok(Ok(())) => info!("✅ Server task completed gracefully"),
            Ok(Err(e)) => warn!("Server task ended abnormally: {e}"),
            Err(_) => warn!("⏰ Server task did not complete within timeout, proceeding with cleanup"),
        }
        shutdown_state.complete_shutdown();

        info!("🧹 Phase 3: Final cleanup...");
        // Connection handlers finish their disconnect after the close frame
        tokio::time::sleep(Duration::from_millis(500)).await;

        let stats = self.server.stats().await;
        info!("📊 Final Statistics:");
        info!("  - Rooms: {} ({} in play)", stats.rooms, stats.started_rooms);
        info!("  - Players: {}", stats.players);
        info!("  - Connections: {}", stats.connections);

        info!("✅ Trigon server shutdown complete");
        Ok(())
    }

    fn log_configuration_summary(&self) {
        info!("📋 Configuration Summary:");
        info!("  📂 Config file: {}", self.config_path.display());
        info!("  🌐 Bind address: {}", self.config.server.bind_address);
        info!("  👥 Max connections: {}", self.config.server.max_connections);
        info!("  🎯 Precision: {}", self.config.game.precision);
        info!("  🏷️ Max name length: {}", self.config.game.max_name_length);
        info!(
            "  💾 Persistence: {}",
            if self.config.persistence.enabled { "enabled" } else { "disabled" }
        );
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn server(&self) -> Arc<GameServer> {
        self.server.clone()
    }
}

/// Applies command-line values on top of the file configuration.
pub fn apply_overrides(config: &mut AppConfig, args: &CliArgs) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(bind_address) = &args.bind_address {
        config.server.bind_address = bind_address.clone();
    }

    if let Some(log_level) = &args.log_level {
        config.logging.level = log_level.clone();
    }

    if args.json_logs {
        config.logging.json_format = true;
    }

    if let Some(precision) = &args.precision {
        config.game.precision = precision.parse()?;
    }

    Ok(())
}
