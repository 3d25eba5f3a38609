//! Shared test utilities.
//!
//! Helpers for setting up test databases, handler contexts backed by the
//! in-memory broker, and stub handlers that record how they were called.

use crate::{
    core::{
        custom_id::ParsedCustomId,
        handler::{ComponentHandler, HandlerContext, HandlerError},
        interaction::{Interaction, Reply},
        jobs::{InMemoryBroker, JobQueue, PublishedJob},
    },
    errors::Result,
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use std::{
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Routes `tracing` output through the test harness.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    init_test_tracing();
    let db = crate::config::database::create_connection("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Handler context over `db` with an in-memory job broker.
/// Returns the receiving end of the broker so tests can inspect submitted jobs.
pub fn test_context_with_db(
    db: DatabaseConnection,
) -> (HandlerContext, mpsc::Receiver<PublishedJob>) {
    let (broker, receiver) = InMemoryBroker::new(16);
    let context = HandlerContext::new(db, JobQueue::new(Arc::new(broker)));
    (context, receiver)
}

/// Handler context for tests that never touch the store.
pub fn test_context() -> (HandlerContext, mpsc::Receiver<PublishedJob>) {
    init_test_tracing();
    test_context_with_db(DatabaseConnection::Disconnected)
}

/// Handler that counts invocations and remembers the last parsed id.
pub struct RecordingHandler {
    key: String,
    calls: AtomicUsize,
    last_parsed: Mutex<Option<ParsedCustomId>>,
    panics: bool,
}

impl RecordingHandler {
    /// Handler replying "ok" under `key`.
    pub fn new(key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            calls: AtomicUsize::new(0),
            last_parsed: Mutex::new(None),
            panics: false,
        })
    }

    /// Handler that panics when executed.
    pub fn panicking(key: &str) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            calls: AtomicUsize::new(0),
            last_parsed: Mutex::new(None),
            panics: true,
        })
    }

    /// Number of times `execute` ran.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Parsed id from the most recent call.
    pub fn last_parsed(&self) -> Option<ParsedCustomId> {
        self.last_parsed.lock().ok().and_then(|guard| guard.clone())
    }
}

#[async_trait]
impl ComponentHandler for RecordingHandler {
    fn custom_id(&self) -> &str {
        &self.key
    }

    async fn execute(
        &self,
        _ctx: &HandlerContext,
        _interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> std::result::Result<Reply, HandlerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_parsed.lock() {
            *last = Some(parsed.clone());
        }
        assert!(!self.panics, "handler `{}` panicked on purpose", self.key);
        Ok(Reply::ephemeral("ok"))
    }
}

/// Handler that fails with the given error.
pub struct FailingHandler {
    key: String,
    error: Mutex<Option<HandlerError>>,
}

impl FailingHandler {
    /// Handler under `key` returning `error` (once; later calls fail with a generic error).
    pub fn new(key: &str, error: HandlerError) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            error: Mutex::new(Some(error)),
        })
    }
}

#[async_trait]
impl ComponentHandler for FailingHandler {
    fn custom_id(&self) -> &str {
        &self.key
    }

    async fn execute(
        &self,
        _ctx: &HandlerContext,
        _interaction: &Interaction,
        _parsed: &ParsedCustomId,
    ) -> std::result::Result<Reply, HandlerError> {
        let error = self.error.lock().ok().and_then(|mut guard| guard.take());
        Err(error.unwrap_or_else(|| HandlerError::invalid("failing handler")))
    }
}

/// Handler that sleeps before replying.
pub struct SlowHandler {
    key: String,
    delay: Duration,
}

impl SlowHandler {
    /// Handler under `key` sleeping for `delay`.
    pub fn new(key: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            key: key.to_string(),
            delay,
        })
    }
}

#[async_trait]
impl ComponentHandler for SlowHandler {
    fn custom_id(&self) -> &str {
        &self.key
    }

    async fn execute(
        &self,
        _ctx: &HandlerContext,
        _interaction: &Interaction,
        _parsed: &ParsedCustomId,
    ) -> std::result::Result<Reply, HandlerError> {
        tokio::time::sleep(self.delay).await;
        Ok(Reply::ephemeral("finally"))
    }
}
