//! Handler capability shared by buttons and modals.

use crate::{
    core::{
        custom_id::ParsedCustomId,
        interaction::{Interaction, Reply},
        jobs::{JobQueue, SubmissionError},
    },
    errors::StoreError,
};
use async_trait::async_trait;
use sea_orm::DatabaseConnection;
use thiserror::Error;

/// Failures raised inside a handler. The dispatcher logs them and answers the
/// user with a generic message.
#[derive(Debug, Error)]
pub enum HandlerError {
    /// Store access failed
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    /// Deferred work could not be queued
    #[error("job submission failed: {0}")]
    Submission(#[from] SubmissionError),
    /// The interaction did not carry what the handler needs
    #[error("invalid interaction input: {message}")]
    InvalidInput {
        /// What was missing or malformed
        message: String,
    },
}

impl HandlerError {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}

/// Shared resources available to every handler invocation.
#[derive(Clone, Debug)]
pub struct HandlerContext {
    /// Store connection
    pub database: DatabaseConnection,
    /// Job queue bridge
    pub jobs: JobQueue,
}

impl HandlerContext {
    /// Bundles the store connection and the job queue.
    #[must_use]
    pub const fn new(database: DatabaseConnection, jobs: JobQueue) -> Self {
        Self { database, jobs }
    }
}

/// A unit of logic bound to a custom id key.
///
/// `custom_id` is either a full `category:action` key or an aligned prefix such
/// as `clan-invite`, which then serves every `clan-invite:*` action.
#[async_trait]
pub trait ComponentHandler: Send + Sync {
    /// Registry key.
    fn custom_id(&self) -> &str;

    /// Performs the handler's effect.
    async fn execute(
        &self,
        ctx: &HandlerContext,
        interaction: &Interaction,
        parsed: &ParsedCustomId,
    ) -> Result<Reply, HandlerError>;
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::jobs::JobDescriptor, test_utils::test_context};
    use serde_json::json;

    #[tokio::test]
    async fn test_cloned_context_shares_job_queue() {
        let (ctx, mut jobs) = test_context();
        let cloned = ctx.clone();

        let first = ctx.jobs.submit(JobDescriptor::new("a", json!({}))).await.unwrap();
        let second = cloned
            .jobs
            .submit(JobDescriptor::new("b", json!({})))
            .await
            .unwrap();

        assert_eq!(jobs.recv().await.unwrap().envelope.id, first.id);
        assert_eq!(jobs.recv().await.unwrap().envelope.id, second.id);
    }
}
