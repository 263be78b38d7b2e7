//! SessionAuth - cookie session authentication service
//!
//! Serves `POST /login`, `GET /logout` and `GET /healthcheck`, keeping the
//! session state in a signed `session.id` cookie.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;

use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sessionauth::{config::ConfigManager, AuthServer, Config, ShutdownCoordinator};

/// CLI arguments for SessionAuth
#[derive(Parser, Debug)]
#[command(name = "sessionauth")]
#[command(about = "SessionAuth - cookie session login/logout service")]
#[command(version)]
#[command(long_about = "
SessionAuth - cookie session login/logout service

Endpoints:
  POST /login        form fields `username`, `password`
  GET  /logout
  GET  /healthcheck  requires an authenticated session cookie

Configuration priority (highest to lowest):
1. Command-line arguments
2. Configuration file
3. Environment variables
4. Built-in defaults

Environment variables:
  SESSIONAUTH_BIND_ADDR        - Bind address (e.g., 127.0.0.1:8000)
  SESSIONAUTH_WRITE_TIMEOUT    - Per-request timeout (e.g., 15s)
  SESSIONAUTH_COOKIE_NAME      - Session cookie name
  SESSIONAUTH_SESSION_SECRET   - Session signing secret (always applied)
  SESSIONAUTH_LOG_LEVEL        - Log level (trace, debug, info, warn, error)
")]
pub struct CliArgs {
    /// Configuration file path
    #[arg(
        short,
        long,
        default_value = "config.toml",
        help = "Path to configuration file"
    )]
    pub config: PathBuf,

    /// Bind address (overrides config file)
    #[arg(short, long, help = "Bind address (e.g., 127.0.0.1:8000)")]
    pub bind: Option<String>,

    /// Port to bind to (overrides config file)
    #[arg(short, long, help = "Port to bind to")]
    pub port: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, help = "Log level")]
    pub log_level: Option<String>,

    /// Enable verbose logging (sets log level to debug)
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    /// Validate configuration and exit
    #[arg(long, help = "Validate configuration and exit")]
    pub validate_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();

    // Load configuration with priority: CLI args > config file > environment > defaults
    let mut config = if args.config.exists() {
        ConfigManager::load_from_file(&args.config)?
    } else {
        ConfigManager::load_from_env()?
    };

    // Validated before tracing starts so a bad level never reaches EnvFilter
    apply_cli_overrides(&args, &mut config)?;

    init_tracing(&args, &config.logging.log_level)?;

    info!("Starting SessionAuth v{}", env!("CARGO_PKG_VERSION"));

    if args.validate_config {
        info!("Configuration is valid");
        info!("  Bind address: {}", config.server.bind_addr);
        info!("  Write timeout: {:?}", config.server.write_timeout);
        info!("  Session cookie: {}", config.session.cookie_name);
        info!("  Users: {}", config.auth.users.len());
        return Ok(());
    }

    if config.session.secret == sessionauth::config::SessionConfig::default().secret {
        warn!(
            "Using the built-in session secret; set {} for real deployments",
            sessionauth::config::SECRET_ENV
        );
    }

    info!("Bind address: {}", config.server.bind_addr);
    info!("Registered users: {}", config.auth.users.len());

    let shutdown_coordinator = ShutdownCoordinator::new(config.server.shutdown_timeout);
    let server = AuthServer::from_config(&config);
    let mut server_handle = tokio::spawn(server.start(shutdown_coordinator.shutdown_signal()));

    let signalled = tokio::select! {
        // Only returns early when the listener cannot be bound
        result = &mut server_handle => {
            result.context("Server task failed")??;
            false
        }
        result = shutdown_coordinator.listen_for_signals() => {
            if let Err(e) = result {
                error!("Error setting up signal handlers: {}", e);
                shutdown_coordinator.trigger();
            }
            true
        }
    };

    if signalled {
        info!("Initiating graceful shutdown...");
        shutdown_coordinator.wait_for_server(server_handle).await?;
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Apply command-line overrides and validate the result
fn apply_cli_overrides(args: &CliArgs, config: &mut Config) -> Result<()> {
    if let Some(level) = &args.log_level {
        config.logging.log_level = level.clone();
    }

    config.merge_with_cli_args(args.bind.as_deref(), args.port);

    config
        .validate()
        .context("Final configuration validation failed")
}

/// Initialize tracing/logging
fn init_tracing(args: &CliArgs, configured_level: &str) -> Result<()> {
    let log_level = if args.verbose { "debug" } else { configured_level };

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(true)
                .with_level(true)
                .with_ansi(true),
        )
        .with(env_filter)
        .init();

    Ok(())
}
