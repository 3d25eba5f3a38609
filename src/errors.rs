//! Unified error types for the bot.
//!
//! `Error` covers startup and framework paths (configuration, database, broker,
//! Discord). Component-specific failures have their own enums next to the code
//! that raises them; `StoreError` lives here because every store module and
//! every handler shares it.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;

/// Application-level error used by startup code and poise commands.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid or unreadable configuration
    #[error("Configuration error: {message}")]
    Config {
        /// What was wrong with the configuration
        message: String,
    },

    /// Database connection or query failure
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// Store-level failure raised from a command
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Job broker could not be reached or configured
    #[error("Broker error: {message}")]
    Broker {
        /// Broker client error message
        message: String,
    },

    /// A component custom id could not be built
    #[error("Custom id error: {0}")]
    CustomId(#[from] crate::core::custom_id::EncodeError),

    /// A handler could not be registered at startup
    #[error("Handler registration error: {0}")]
    Registry(#[from] crate::core::registry::RegistryError),

    /// Required environment variable missing or unreadable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// A command that requires a guild was used outside of one
    #[error("This command can only be used inside a server")]
    GuildOnly,

    /// Serenity/poise framework failure
    #[error("Serenity/Poise framework error: {0}")]
    #[allow(clippy::enum_variant_names)]
    FrameworkError(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::FrameworkError(Box::new(value))
    }
}

/// Errors raised by the relational store.
///
/// Unique-key conflicts are reported as [`StoreError::AlreadyExists`] so callers
/// can answer "already exists" instead of a generic failure.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Insert hit a unique or primary key constraint
    #[error("{entity} '{key}' already exists")]
    AlreadyExists {
        /// Kind of record (e.g. "clan")
        entity: &'static str,
        /// Conflicting key value
        key: String,
    },

    /// Requested record does not exist
    #[error("{entity} '{key}' not found")]
    NotFound {
        /// Kind of record
        entity: &'static str,
        /// Key that was looked up
        key: String,
    },

    /// Any other database failure
    #[error("database error: {0}")]
    Database(#[from] DbErr),
}

impl StoreError {
    /// Classifies a database error raised while writing `entity` with the given key.
    #[must_use]
    pub fn classify(err: DbErr, entity: &'static str, key: impl Into<String>) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_)) => Self::AlreadyExists {
                entity,
                key: key.into(),
            },
            _ => Self::Database(err),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
