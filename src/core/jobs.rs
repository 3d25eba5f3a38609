//! Job queue bridge.
//!
//! Handlers hand deferred work to [`JobQueue::submit`], which wraps it in a
//! [`JobEnvelope`], serializes it to JSON and publishes it through a
//! [`JobBroker`]. Submission waits only for the broker's acknowledgement; job
//! execution happens elsewhere.
//!
//! The broker may deliver a job more than once. Consumers dedupe on
//! [`JobEnvelope::id`] if they need to.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
};
use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

/// Job type submitted by invite handlers.
pub const PROCESS_INVITE_JOB: &str = "processInvite";

/// Job type submitted when a ticket is opened.
pub const CREATE_TICKET_JOB: &str = "createTicket";

/// Submission failures surfaced to the calling handler.
#[derive(Debug, Error)]
pub enum SubmissionError {
    /// Broker connection unavailable after the client's own retries
    #[error("job broker unavailable: {message}")]
    Unavailable {
        /// Broker client error
        message: String,
    },
    /// Job name is not a valid subject token
    #[error("invalid job name `{name}`")]
    InvalidName {
        /// Rejected name
        name: String,
    },
    /// Payload could not be serialized
    #[error("failed to serialize job: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl SubmissionError {
    /// Wraps any broker client error as [`SubmissionError::Unavailable`].
    pub fn unavailable(err: impl fmt::Display) -> Self {
        Self::Unavailable {
            message: err.to_string(),
        }
    }
}

/// A unit of deferred work.
#[derive(Debug, Clone, PartialEq)]
pub struct JobDescriptor {
    /// Job type
    pub name: String,
    /// Job arguments
    pub payload: Value,
}

impl JobDescriptor {
    /// Creates a job descriptor.
    #[must_use]
    pub fn new(name: impl Into<String>, payload: Value) -> Self {
        Self {
            name: name.into(),
            payload,
        }
    }
}

/// Wire form of a submitted job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobEnvelope {
    /// Unique id assigned at submission
    pub id: Uuid,
    /// Job type
    pub name: String,
    /// Job arguments
    pub payload: Value,
    /// Submission time
    pub submitted_at: DateTime<Utc>,
}

/// Acknowledgement of an enqueued job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobHandle {
    /// Id carried in the envelope
    pub id: Uuid,
    /// Job type
    pub name: String,
    /// Broker-assigned sequence number
    pub sequence: u64,
}

/// Transport that accepts serialized jobs.
#[async_trait]
pub trait JobBroker: Send + Sync {
    /// Publishes `body` for job type `name`, returning the broker's sequence
    /// number once it has acknowledged the message.
    async fn publish(&self, name: &str, body: Vec<u8>) -> Result<u64, SubmissionError>;

    /// Short label for logs.
    fn label(&self) -> &'static str;
}

/// Cloneable handle to the process-wide broker connection.
#[derive(Clone)]
pub struct JobQueue {
    broker: Arc<dyn JobBroker>,
}

impl fmt::Debug for JobQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JobQueue")
            .field("broker", &self.broker.label())
            .finish()
    }
}

impl JobQueue {
    /// Wraps a broker.
    #[must_use]
    pub fn new(broker: Arc<dyn JobBroker>) -> Self {
        Self { broker }
    }

    /// Enqueues a job and returns once the broker has acknowledged it.
    pub async fn submit(&self, job: JobDescriptor) -> Result<JobHandle, SubmissionError> {
        if !is_valid_job_name(&job.name) {
            return Err(SubmissionError::InvalidName { name: job.name });
        }

        let envelope = JobEnvelope {
            id: Uuid::new_v4(),
            name: job.name,
            payload: job.payload,
            submitted_at: Utc::now(),
        };
        let body = serde_json::to_vec(&envelope)?;

        let sequence = self
            .broker
            .publish(&envelope.name, body)
            .await
            .inspect_err(|e| {
                warn!(
                    job = %envelope.name,
                    id = %envelope.id,
                    broker = self.broker.label(),
                    "Job submission failed: {}",
                    e
                );
            })?;

        debug!(job = %envelope.name, id = %envelope.id, sequence, "Job enqueued");
        Ok(JobHandle {
            id: envelope.id,
            name: envelope.name,
            sequence,
        })
    }
}

/// Job names become subject tokens: non-empty, no whitespace, dots or wildcards.
fn is_valid_job_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '.' | '*' | '>'))
}

/// A job as received from the in-memory broker.
#[derive(Debug, Clone)]
pub struct PublishedJob {
    /// Broker sequence number
    pub sequence: u64,
    /// Decoded envelope
    pub envelope: JobEnvelope,
}

/// Broker backed by a bounded tokio channel.
///
/// Used when no external broker is configured and in tests. A full channel
/// applies backpressure; a dropped receiver makes every publish fail.
pub struct InMemoryBroker {
    sender: mpsc::Sender<PublishedJob>,
    next_sequence: AtomicU64,
}

impl InMemoryBroker {
    /// Creates the broker and the receiving end of its channel.
    #[must_use]
    pub fn new(capacity: usize) -> (Self, mpsc::Receiver<PublishedJob>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let broker = Self {
            sender,
            next_sequence: AtomicU64::new(1),
        };
        (broker, receiver)
    }
}

#[async_trait]
impl JobBroker for InMemoryBroker {
    async fn publish(&self, name: &str, body: Vec<u8>) -> Result<u64, SubmissionError> {
        let envelope: JobEnvelope = serde_json::from_slice(&body)?;
        let sequence = self.next_sequence.fetch_add(1, Ordering::Relaxed);
        self.sender
            .send(PublishedJob { sequence, envelope })
            .await
            .map_err(|_| SubmissionError::Unavailable {
                message: format!("in-memory queue closed, `{name}` not delivered"),
            })?;
        Ok(sequence)
    }

    fn label(&self) -> &'static str {
        "in-memory"
    }
}
