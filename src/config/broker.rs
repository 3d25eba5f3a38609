//! Job broker connection settings.

use serde::Deserialize;

/// `[broker]` section of the configuration file.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct BrokerConfig {
    /// Connect to NATS; when false jobs go to an in-process queue
    pub enabled: bool,
    /// Broker host (`BROKER_HOST`)
    pub host: String,
    /// Broker port (`BROKER_PORT`)
    pub port: u16,
    /// Auth token (`BROKER_TOKEN`), takes precedence over user/password
    pub token: Option<String>,
    /// Username (`BROKER_USER`)
    pub user: Option<String>,
    /// Password (`BROKER_PASSWORD`)
    pub password: Option<String>,
    /// JetStream stream holding submitted jobs
    pub stream: String,
    /// Subject prefix; jobs publish to `<prefix>.<job name>`
    pub subject_prefix: String,
    /// Initial connection timeout in seconds
    pub connect_timeout_secs: u64,
    /// Capacity of the in-process queue used when the broker is disabled
    pub local_capacity: usize,
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port: 4222,
            token: None,
            user: None,
            password: None,
            stream: "JOBS".to_string(),
            subject_prefix: "jobs".to_string(),
            connect_timeout_secs: 5,
            local_capacity: 256,
        }
    }
}

impl BrokerConfig {
    /// `nats://host:port` address for the client.
    #[must_use]
    pub fn server_address(&self) -> String {
        format!("nats://{}:{}", self.host, self.port)
    }
}
