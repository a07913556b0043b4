//! # Trigon Server - Main Entry Point
//!
//! Process entry point for the triangle enclosure game server. This crate
//! handles CLI parsing, configuration loading, logging and the application
//! lifecycle; the game itself lives in `game_server`.
//!
//! ## Quick Start
//!
//! ```bash
//! # Run with default configuration
//! trigon
//!
//! # Specify custom configuration
//! trigon --config production.toml
//!
//! # Override specific settings
//! trigon --bind 0.0.0.0:8080 --precision extreme --log-level debug
//!
//! # JSON logging for production
//! trigon --json-logs
//! ```
//!
//! ## Configuration
//!
//! The server loads configuration from a TOML file (default: `config.toml`).
//! If the file doesn't exist, a default configuration will be created.
//!
//! ## Signal Handling
//!
//! SIGINT and SIGTERM start a graceful shutdown. A second signal exits
//! immediately.

use tracing::error;

mod app;
mod cli;
mod config;
mod logging;
mod signals;

pub use app::Application;
pub use cli::CliArgs;
pub use config::{AppConfig, GameSettings, LoggingSettings, PersistenceSettings, ServerSettings};

/// Runs the server process to completion.
///
/// Errors during startup or while running are logged and returned; the
/// binary maps them to exit code 1.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Logging comes up before the full configuration is validated
    let mut logging_settings = AppConfig::load_from_file(&args.config_path)
        .await
        .unwrap_or_default()
        .logging;
    if let Some(level) = &args.log_level {
        logging_settings.level = level.clone();
    }

    if let Err(e) = logging::setup_logging(&logging_settings, args.json_logs) {
        eprintln!("❌ Failed to setup logging: {e}");
        return Err(e);
    }

    let app = match Application::new(args).await {
        Ok(app) => app,
        Err(e) => {
            error!("❌ Failed to start application: {e}");
            return Err(e);
        }
    };

    if let Err(e) = app.run().await {
        error!("❌ Application error: {e}");
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_server::Precision;
    use tempfile::TempDir;

    fn args_for(dir: &TempDir) -> CliArgs {
        CliArgs::try_parse_from([
            "trigon",
            "--config",
            dir.path().join("config.toml").to_str().unwrap(),
        ])
        .unwrap()
    }

    #[tokio::test]
    async fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());

        let server_config = config
            .to_server_config()
            .expect("Default config should convert to ServerConfig");
        assert_eq!(server_config.max_connections, 1000);
        assert_eq!(server_config.precision, Precision::High);
        assert!(!server_config.persistence_enabled);
    }

    #[tokio::test]
    async fn test_application_creation_writes_default_config() {
        let dir = TempDir::new().unwrap();
        let args = args_for(&dir);

        let app = Application::new(args.clone()).await.unwrap();
        assert!(args.config_path.exists());
        assert_eq!(app.config().server.bind_address, "127.0.0.1:8080");
        assert_eq!(app.server().config().precision, Precision::High);

        let stats = app.server().stats().await;
        assert_eq!(stats.rooms, 0);
        assert_eq!(stats.players, 0);
    }

    #[tokio::test]
    async fn test_cli_overrides_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        tokio::fs::write(&path, "[server]\nbind_address = \"127.0.0.1:7000\"\n")
            .await
            .unwrap();

        let args = CliArgs::try_parse_from([
            "trigon",
            "-c",
            path.to_str().unwrap(),
            "-b",
            "127.0.0.1:9100",
            "--precision",
            "normal",
            "--json-logs",
        ])
        .unwrap();

        let app = Application::new(args).await.unwrap();
        assert_eq!(app.config().server.bind_address, "127.0.0.1:9100");
        assert_eq!(app.config().game.precision, Precision::Normal);
        assert!(app.config().logging.json_format);
        assert_eq!(app.server().config().bind_address.port(), 9100);
    }

    #[tokio::test]
    async fn test_invalid_overrides_rejected() {
        let dir = TempDir::new().unwrap();

        let mut args = args_for(&dir);
        args.precision = Some("ultra".to_string());
        assert!(Application::new(args).await.is_err());

        let mut args = args_for(&dir);
        args.log_level = Some("loud".to_string());
        let err = Application::new(args).await.err().unwrap();
        assert!(err.to_string().contains("Invalid log level"));
    }
}
