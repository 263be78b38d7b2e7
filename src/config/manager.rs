//! Configuration Manager

use super::Config;
use crate::Result;
use anyhow::{bail, Context};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

/// Environment variable carrying the session signing secret
pub const SECRET_ENV: &str = "SESSIONAUTH_SESSION_SECRET";

const MAX_WRITE_TIMEOUT: Duration = Duration::from_secs(300);

/// Manages configuration loading and validation
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from file
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let mut config = if path.exists() {
            tracing::info!("Loading configuration from: {}", path.display());
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;

            toml::from_str::<Config>(&content)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            tracing::warn!("Configuration file not found at {}, using defaults", path.display());
            Config::default()
        };

        // The secret is never required to live in the file
        if let Ok(secret) = std::env::var(SECRET_ENV) {
            config.session.secret = secret;
        }

        config
            .validate()
            .with_context(|| "Configuration validation failed")?;

        tracing::info!("Configuration loaded and validated successfully");
        Ok(config)
    }

    /// Load configuration from environment variables
    pub fn load_from_env() -> Result<Config> {
        let mut config = Config::default();
        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }
}

impl Config {
    /// Apply `SESSIONAUTH_*` overrides using the given variable lookup
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_addr) = lookup("SESSIONAUTH_BIND_ADDR") {
            self.server.bind_addr = bind_addr
                .parse::<SocketAddr>()
                .with_context(|| format!("Invalid SESSIONAUTH_BIND_ADDR: {}", bind_addr))?;
        }

        if let Some(timeout) = lookup("SESSIONAUTH_WRITE_TIMEOUT") {
            self.server.write_timeout = humantime::parse_duration(&timeout)
                .with_context(|| format!("Invalid SESSIONAUTH_WRITE_TIMEOUT: {}", timeout))?;
        }

        if let Some(cookie_name) = lookup("SESSIONAUTH_COOKIE_NAME") {
            self.session.cookie_name = cookie_name;
        }

        if let Some(secret) = lookup(SECRET_ENV) {
            self.session.secret = secret;
        }

        if let Some(log_level) = lookup("SESSIONAUTH_LOG_LEVEL") {
            self.logging.log_level = log_level;
        }

        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.validate_server_config()
            .with_context(|| "Server configuration validation failed")?;

        self.validate_session_config()
            .with_context(|| "Session configuration validation failed")?;

        self.validate_auth_config()
            .with_context(|| "Authentication configuration validation failed")?;

        self.validate_logging_config()
            .with_context(|| "Logging configuration validation failed")?;

        Ok(())
    }

    fn validate_server_config(&self) -> Result<()> {
        if self.server.write_timeout.is_zero() {
            bail!("write_timeout must be greater than 0");
        }

        if self.server.write_timeout > MAX_WRITE_TIMEOUT {
            bail!("write_timeout cannot exceed 5 minutes");
        }

        Ok(())
    }

    fn validate_session_config(&self) -> Result<()> {
        let name = &self.session.cookie_name;
        if name.is_empty() {
            bail!("session.cookie_name must not be empty");
        }

        if name
            .chars()
            .any(|c| c.is_whitespace() || c.is_control() || matches!(c, ';' | ',' | '='))
        {
            bail!("session.cookie_name contains invalid characters: {:?}", name);
        }

        if self.session.secret.is_empty() {
            bail!("session.secret must not be empty");
        }

        if !self.session.path.starts_with('/') {
            bail!("session.path must start with '/'");
        }

        Ok(())
    }

    fn validate_auth_config(&self) -> Result<()> {
        if self.auth.users.is_empty() {
            bail!("At least one user must be configured");
        }

        let mut seen = HashSet::new();
        for (i, user) in self.auth.users.iter().enumerate() {
            if user.username.is_empty() {
                bail!("User {} has empty username", i);
            }

            if !seen.insert(user.username.as_str()) {
                bail!("User {} duplicates username '{}'", i, user.username);
            }
        }

        Ok(())
    }

    fn validate_logging_config(&self) -> Result<()> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&self.logging.log_level.as_str()) {
            bail!("logging.log_level must be one of: {}", valid_log_levels.join(", "));
        }

        Ok(())
    }

    /// Merge with CLI arguments
    pub fn merge_with_cli_args(&mut self, bind: Option<&str>, port: Option<u16>) {
        if let Some(bind_str) = bind {
            if let Ok(addr) = bind_str.parse::<SocketAddr>() {
                self.server.bind_addr = addr;
                tracing::info!("CLI override: bind address set to {}", addr);
            } else {
                tracing::warn!("Invalid bind address provided: {}", bind_str);
            }
        }

        if let Some(port) = port {
            self.server.bind_addr.set_port(port);
            tracing::info!("CLI override: port set to {}", port);
        }
    }
}
