/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Session configuration.
//!
//! This module provides configuration options for the FIX session, including
//! loading the counterparty address and CompIDs from the environment.

use fixline_core::error::SessionError;
use fixline_core::message::BEGIN_STRING_FIX42;
use fixline_core::types::CompId;
use std::time::Duration;

/// Environment variable holding the counterparty host.
pub const ENV_HOST: &str = "SELLSIDE_HOST";
/// Environment variable holding the counterparty port.
pub const ENV_PORT: &str = "SELLSIDE_PORT";
/// Environment variable holding the SenderCompID.
pub const ENV_SENDER_COMP_ID: &str = "SENDER_COMP_ID";
/// Environment variable holding the TargetCompID.
pub const ENV_TARGET_COMP_ID: &str = "TARGET_COMP_ID";
/// Optional environment variable holding the heartbeat interval in seconds.
pub const ENV_HEARTBEAT_INTERVAL: &str = "FIX_HEARTBEAT_INTERVAL";

/// Configuration for a FIX session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Counterparty host name or address.
    pub host: String,
    /// Counterparty port.
    pub port: u16,
    /// Sender CompID (tag 49).
    pub sender_comp_id: CompId,
    /// Target CompID (tag 56).
    pub target_comp_id: CompId,
    /// FIX version BeginString.
    pub begin_string: String,
    /// Heartbeat interval advertised on Logon (tag 108).
    pub heartbeat_interval: Duration,
    /// Timeout for a single TCP connect attempt.
    pub connect_timeout: Duration,
    /// Connect attempts per connect cycle.
    pub max_reconnect_attempts: u32,
    /// Delay before the first retry.
    pub reconnect_delay: Duration,
    /// Upper bound for the retry delay.
    pub max_reconnect_delay: Duration,
    /// Upper bound for a single blocking read.
    pub receive_wait: Duration,
    /// How long a New Order Single waits for its execution report.
    pub execution_timeout: Duration,
    /// Bytes requested per socket read.
    pub read_buffer_size: usize,
    /// Maximum buffered inbound bytes without a checksum trailer.
    pub max_message_size: usize,
    /// Prefix of synthesized ClOrdIDs.
    pub order_id_prefix: String,
}

impl SessionConfig {
    /// Creates a new session configuration with required fields.
    ///
    /// # Arguments
    /// * `host` - Counterparty host
    /// * `port` - Counterparty port
    /// * `sender_comp_id` - The sender CompID
    /// * `target_comp_id` - The target CompID
    #[must_use]
    pub fn new(
        host: impl Into<String>,
        port: u16,
        sender_comp_id: CompId,
        target_comp_id: CompId,
    ) -> Self {
        Self {
            host: host.into(),
            port,
            sender_comp_id,
            target_comp_id,
            begin_string: BEGIN_STRING_FIX42.to_string(),
            heartbeat_interval: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            max_reconnect_attempts: 5,
            reconnect_delay: Duration::from_secs(5),
            max_reconnect_delay: Duration::from_secs(60),
            receive_wait: Duration::from_secs(10),
            execution_timeout: Duration::from_secs(30),
            read_buffer_size: 4096,
            max_message_size: 1024 * 1024, // 1MB
            order_id_prefix: "ORDER".to_string(),
        }
    }

    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `SessionError::MissingSetting` when a required variable is
    /// absent and `SessionError::Configuration` when a value is invalid.
    pub fn from_env() -> Result<Self, SessionError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Loads the configuration through an arbitrary variable lookup.
    ///
    /// # Errors
    /// Same as [`SessionConfig::from_env`].
    pub fn from_lookup<F>(lookup: F) -> Result<Self, SessionError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &str| {
            lookup(name)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| SessionError::MissingSetting {
                    name: name.to_string(),
                })
        };

        let host = required(ENV_HOST)?;
        let port = required(ENV_PORT)?;
        let port: u16 = port.trim().parse().map_err(|_| {
            SessionError::Configuration(format!("{ENV_PORT} is not a valid port: {port}"))
        })?;
        let sender = parse_comp_id(ENV_SENDER_COMP_ID, &required(ENV_SENDER_COMP_ID)?)?;
        let target = parse_comp_id(ENV_TARGET_COMP_ID, &required(ENV_TARGET_COMP_ID)?)?;

        let mut config = Self::new(host, port, sender, target);
        if let Some(raw) = lookup(ENV_HEARTBEAT_INTERVAL) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                SessionError::Configuration(format!(
                    "{ENV_HEARTBEAT_INTERVAL} is not a number of seconds: {raw}"
                ))
            })?;
            config.heartbeat_interval = Duration::from_secs(secs);
        }
        Ok(config)
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn with_heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = interval;
        self
    }

    /// Sets the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    /// Sets the reconnect attempt budget and base delay.
    #[must_use]
    pub fn with_reconnect(mut self, max_attempts: u32, delay: Duration) -> Self {
        self.max_reconnect_attempts = max_attempts;
        self.reconnect_delay = delay;
        self
    }

    /// Sets the upper bound for a single blocking read.
    #[must_use]
    pub fn with_receive_wait(mut self, wait: Duration) -> Self {
        self.receive_wait = wait;
        self
    }

    /// Sets the execution report timeout.
    #[must_use]
    pub fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = timeout;
        self
    }

    /// Sets the maximum buffered message size.
    #[must_use]
    pub const fn with_max_message_size(mut self, size: usize) -> Self {
        self.max_message_size = size;
        self
    }

    /// Returns `host:port`.
    #[must_use]
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the heartbeat interval in seconds.
    #[must_use]
    pub fn heartbeat_interval_secs(&self) -> u64 {
        self.heartbeat_interval.as_secs()
    }
}

fn parse_comp_id(name: &str, value: &str) -> Result<CompId, SessionError> {
    CompId::new(value).ok_or_else(|| {
        SessionError::Configuration(format!("{name} must be 1 to 32 bytes: {value}"))
    })
}

/// Builder for session configuration.
#[derive(Debug, Default)]
pub struct SessionConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    sender_comp_id: Option<String>,
    target_comp_id: Option<String>,
    heartbeat_interval: Option<Duration>,
    execution_timeout: Option<Duration>,
}

impl SessionConfigBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the counterparty host.
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the counterparty port.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the sender CompID.
    #[must_use]
    pub fn sender_comp_id(mut self, id: impl Into<String>) -> Self {
        self.sender_comp_id = Some(id.into());
        self
    }

    /// Sets the target CompID.
    #[must_use]
    pub fn target_comp_id(mut self, id: impl Into<String>) -> Self {
        self.target_comp_id = Some(id.into());
        self
    }

    /// Sets the heartbeat interval.
    #[must_use]
    pub fn heartbeat_interval(mut self, interval: Duration) -> Self {
        self.heartbeat_interval = Some(interval);
        self
    }

    /// Sets the execution report timeout.
    #[must_use]
    pub fn execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    /// Returns `SessionError` if a required field is missing or invalid.
    pub fn build(self) -> Result<SessionConfig, SessionError> {
        let missing = |name: &str| SessionError::MissingSetting {
            name: name.to_string(),
        };
        let host = self.host.ok_or_else(|| missing("host"))?;
        let port = self.port.ok_or_else(|| missing("port"))?;
        let sender = self.sender_comp_id.ok_or_else(|| missing("sender_comp_id"))?;
        let target = self.target_comp_id.ok_or_else(|| missing("target_comp_id"))?;

        let mut config = SessionConfig::new(
            host,
            port,
            parse_comp_id("sender_comp_id", &sender)?,
            parse_comp_id("target_comp_id", &target)?,
        );
        if let Some(interval) = self.heartbeat_interval {
            config.heartbeat_interval = interval;
        }
        if let Some(timeout) = self.execution_timeout {
            config.execution_timeout = timeout;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_session_config_defaults() {
        let config = SessionConfig::new(
            "127.0.0.1",
            9876,
            CompId::new("SENDER").unwrap(),
            CompId::new("TARGET").unwrap(),
        );

        assert_eq!(config.begin_string, "FIX.4.2");
        assert_eq!(config.heartbeat_interval_secs(), 30);
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.max_reconnect_attempts, 5);
        assert_eq!(config.reconnect_delay, Duration::from_secs(5));
        assert_eq!(config.receive_wait, Duration::from_secs(10));
        assert_eq!(config.execution_timeout, Duration::from_secs(30));
        assert_eq!(config.read_buffer_size, 4096);
        assert_eq!(config.addr(), "127.0.0.1:9876");
    }

    #[test]
    fn test_from_lookup() {
        let config = SessionConfig::from_lookup(lookup(&[
            (ENV_HOST, "fix.example.net"),
            (ENV_PORT, "5001"),
            (ENV_SENDER_COMP_ID, "CLIENT1"),
            (ENV_TARGET_COMP_ID, "BROKER1"),
            (ENV_HEARTBEAT_INTERVAL, "15"),
        ]))
        .unwrap();

        assert_eq!(config.host, "fix.example.net");
        assert_eq!(config.port, 5001);
        assert_eq!(config.sender_comp_id.as_str(), "CLIENT1");
        assert_eq!(config.target_comp_id.as_str(), "BROKER1");
        assert_eq!(config.heartbeat_interval_secs(), 15);
    }

    #[test]
    fn test_from_lookup_missing_and_invalid() {
        let err = SessionConfig::from_lookup(lookup(&[(ENV_HOST, "h")])).unwrap_err();
        assert_eq!(
            err,
            SessionError::MissingSetting {
                name: ENV_PORT.to_string()
            }
        );

        let err = SessionConfig::from_lookup(lookup(&[
            (ENV_HOST, "h"),
            (ENV_PORT, "port"),
            (ENV_SENDER_COMP_ID, "A"),
            (ENV_TARGET_COMP_ID, "B"),
        ]))
        .unwrap_err();
        assert!(matches!(err, SessionError::Configuration(_)));

        let err = SessionConfig::from_lookup(lookup(&[
            (ENV_HOST, "h"),
            (ENV_PORT, "1"),
            (ENV_SENDER_COMP_ID, ""),
            (ENV_TARGET_COMP_ID, "B"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            SessionError::MissingSetting {
                name: ENV_SENDER_COMP_ID.to_string()
            }
        );
    }

    #[test]
    fn test_session_config_builder() {
        let config = SessionConfigBuilder::new()
            .host("localhost")
            .port(9000)
            .sender_comp_id("SENDER")
            .target_comp_id("TARGET")
            .heartbeat_interval(Duration::from_secs(60))
            .execution_timeout(Duration::from_secs(5))
            .build()
            .unwrap();

        assert_eq!(config.heartbeat_interval, Duration::from_secs(60));
        assert_eq!(config.execution_timeout, Duration::from_secs(5));

        let err = SessionConfigBuilder::new().host("h").port(1).build().unwrap_err();
        assert!(matches!(err, SessionError::MissingSetting { .. }));
    }
}
