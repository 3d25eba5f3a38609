//! Application configuration.
//!
//! Settings come from an optional TOML file (`CONFIG_PATH`, default
//! `config.toml`) and are then overridden by environment variables, which are
//! usually provided through `.env`. Every section has defaults, so the bot can
//! start with no file at all.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::{path::Path, time::Duration};
use tracing::{debug, info};

/// Job broker connection settings
pub mod broker;

/// Database configuration and connection management
pub mod database;

/// Environment flag helpers
pub mod flags;

use broker::BrokerConfig;
use database::DatabaseConfig;

/// Default configuration file location.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// `[cooldown]` section.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct CooldownConfig {
    /// Maximum number of cooldown records kept in memory
    pub max_entries: usize,
    /// Seconds between sweeps of expired records
    pub sweep_interval_secs: u64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            max_entries: 10_000,
            sweep_interval_secs: 60,
        }
    }
}

impl CooldownConfig {
    /// Sweep interval as a duration (never zero).
    #[must_use]
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

/// Upper bound for the handler timeout. Discord drops initial responses sent
/// more than 3 s after the interaction, so the generic failure reply must go
/// out before then.
pub const MAX_HANDLER_TIMEOUT_MS: u64 = 2_500;

/// `[dispatch]` section.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DispatchConfig {
    /// Milliseconds a handler may run before the interaction is failed
    pub handler_timeout_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            handler_timeout_ms: MAX_HANDLER_TIMEOUT_MS,
        }
    }
}

impl DispatchConfig {
    /// Handler timeout as a duration, clamped to `1..=MAX_HANDLER_TIMEOUT_MS`.
    #[must_use]
    pub fn handler_timeout(&self) -> Duration {
        Duration::from_millis(self.handler_timeout_ms.clamp(1, MAX_HANDLER_TIMEOUT_MS))
    }
}

/// Top-level configuration.
#[derive(Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    /// Store settings
    pub database: DatabaseConfig,
    /// Job broker settings
    pub broker: BrokerConfig,
    /// Cooldown guard settings
    pub cooldown: CooldownConfig,
    /// Dispatcher settings
    pub dispatch: DispatchConfig,
    /// Development mode: guild-scoped command registration
    pub dev_mode: bool,
    /// Guild used for command registration in development mode
    pub dev_guild_id: Option<u64>,
}

impl AppConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|e| Error::Config {
            message: format!("Failed to parse configuration: {e}"),
        })
    }

    /// Applies overrides from a variable lookup (normally the process environment).
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(host) = lookup("BROKER_HOST") {
            self.broker.host = host;
        }
        if let Some(port) = lookup("BROKER_PORT") {
            self.broker.port = port.parse().map_err(|_| Error::Config {
                message: format!("BROKER_PORT must be a port number, got `{port}`"),
            })?;
        }
        if let Some(token) = lookup("BROKER_TOKEN") {
            self.broker.token = Some(token);
        }
        if let Some(user) = lookup("BROKER_USER") {
            self.broker.user = Some(user);
        }
        if let Some(password) = lookup("BROKER_PASSWORD") {
            self.broker.password = Some(password);
        }
        if let Some(enabled) = lookup("BROKER_ENABLED") {
            self.broker.enabled = flags::parse_flag(&enabled);
        }
        if let Some(dev_mode) = lookup("DEV_MODE") {
            self.dev_mode = flags::parse_flag(&dev_mode);
        }
        if let Some(guild_id) = lookup("DEV_GUILD_ID") {
            self.dev_guild_id = Some(guild_id.parse().map_err(|_| Error::Config {
                message: format!("DEV_GUILD_ID must be a guild id, got `{guild_id}`"),
            })?);
        }
        Ok(())
    }
}

/// Reads the configuration file at `path`, or returns defaults if it does not exist.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    if !path_ref.exists() {
        info!("No configuration file at {:?}, using defaults", path_ref);
        return Ok(AppConfig::default());
    }

    debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path_ref:?}: {e}"),
    })?;
    AppConfig::from_toml_str(&contents)
}

/// Loads the file named by `CONFIG_PATH` and applies environment overrides.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let mut config = load_config(&path)?;
    config.apply_overrides(|name| std::env::var(name).ok())?;
    info!(
        dev_mode = config.dev_mode,
        broker_enabled = config.broker.enabled,
        "Configuration loaded"
    );
    Ok(config)
}
