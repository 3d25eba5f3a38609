//! NATS JetStream job broker.
//!
//! One client connection is opened at startup and shared by every submission.
//! Reconnection is left to the `async-nats` client; once it gives up, or an
//! acknowledgement times out, the publish fails with
//! [`SubmissionError::Unavailable`].
//!
//! With the broker disabled in development mode, [`connect_job_queue`] falls
//! back to the in-memory broker and drains it into the log.

use crate::{
    config::broker::BrokerConfig,
    core::jobs::{InMemoryBroker, JobBroker, JobQueue, SubmissionError},
    errors::{Error, Result},
};
use async_nats::jetstream;
use async_trait::async_trait;
use std::{sync::Arc, time::Duration};
use tracing::{info, instrument, warn};

/// Builds the process-wide job queue from configuration.
///
/// A disabled broker is only accepted in development mode. Jobs then go to the
/// in-memory broker and are logged, never executed.
pub async fn connect_job_queue(config: &BrokerConfig, dev_mode: bool) -> Result<JobQueue> {
    if config.enabled {
        let broker = NatsBroker::connect(config).await?;
        return Ok(JobQueue::new(Arc::new(broker)));
    }

    if !dev_mode {
        return Err(Error::Broker {
            message: "broker is disabled outside development mode; set BROKER_ENABLED=true \
                      or DEV_MODE=true"
                .to_string(),
        });
    }

    warn!("Job broker disabled (development mode), jobs will be logged and dropped");
    let (broker, mut receiver) = InMemoryBroker::new(config.local_capacity);
    tokio::spawn(async move {
        while let Some(job) = receiver.recv().await {
            warn!(
                job = %job.envelope.name,
                id = %job.envelope.id,
                sequence = job.sequence,
                payload = %job.envelope.payload,
                "Job dropped: no broker configured"
            );
        }
    });
    Ok(JobQueue::new(Arc::new(broker)))
}

/// Publishes jobs to `<subject_prefix>.<job name>` on a JetStream stream.
pub struct NatsBroker {
    jetstream: jetstream::Context,
    subject_prefix: String,
}

impl NatsBroker {
    /// Connects to the broker and makes sure the job stream exists.
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub async fn connect(config: &BrokerConfig) -> Result<Self> {
        let mut options = async_nats::ConnectOptions::new()
            .name("guild-warden")
            .connection_timeout(Duration::from_secs(config.connect_timeout_secs));

        if let Some(token) = &config.token {
            options = options.token(token.clone());
        } else if let (Some(user), Some(password)) = (&config.user, &config.password) {
            options = options.user_and_password(user.clone(), password.clone());
        }

        let address = config.server_address();
        let client = options
            .connect(address.as_str())
            .await
            .map_err(|e| Error::Broker {
                message: format!("failed to connect to {address}: {e}"),
            })?;

        let jetstream = jetstream::new(client);
        jetstream
            .get_or_create_stream(jetstream::stream::Config {
                name: config.stream.clone(),
                subjects: vec![format!("{}.>", config.subject_prefix)],
                ..Default::default()
            })
            .await
            .map_err(|e| Error::Broker {
                message: format!("failed to prepare stream {}: {e}", config.stream),
            })?;

        info!(stream = %config.stream, "Connected to job broker");
        Ok(Self {
            jetstream,
            subject_prefix: config.subject_prefix.clone(),
        })
    }
}

#[async_trait]
impl JobBroker for NatsBroker {
    async fn publish(&self, name: &str, body: Vec<u8>) -> std::result::Result<u64, SubmissionError> {
        let subject = format!("{}.{name}", self.subject_prefix);
        let ack = self
            .jetstream
            .publish(subject, body.into())
            .await
            .map_err(SubmissionError::unavailable)?
            .await
            .map_err(SubmissionError::unavailable)?;
        Ok(ack.sequence)
    }

    fn label(&self) -> &'static str {
        "nats"
    }
}
