/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Client builder for fluent configuration.
//!
//! Engine-level settings given here override those of the session config.

use crate::client::FixClient;
use fixline_core::error::{FixError, Result, SessionError};
use fixline_session::config::SessionConfig;
use std::time::Duration;

/// Builder for configuring a [`FixClient`].
#[derive(Debug, Default)]
pub struct ClientBuilder {
    /// Session configuration.
    session: Option<SessionConfig>,
    /// Connection timeout override.
    connect_timeout: Option<Duration>,
    /// Reconnect interval override.
    reconnect_interval: Option<Duration>,
    /// Maximum reconnect attempts override.
    max_reconnect_attempts: Option<u32>,
    /// Execution report timeout override.
    execution_timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new client builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session configuration.
    #[must_use]
    pub fn with_session(mut self, config: SessionConfig) -> Self {
        self.session = Some(config);
        self
    }

    /// Loads the session configuration from the environment.
    ///
    /// # Errors
    /// Returns `FixError::Session` if a variable is missing or invalid.
    pub fn with_session_from_env(self) -> Result<Self> {
        Ok(self.with_session(SessionConfig::from_env()?))
    }

    /// Sets the connection timeout.
    #[must_use]
    pub const fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the base reconnect interval.
    #[must_use]
    pub const fn with_reconnect_interval(mut self, interval: Duration) -> Self {
        self.reconnect_interval = Some(interval);
        self
    }

    /// Sets the maximum reconnect attempts.
    #[must_use]
    pub const fn with_max_reconnect_attempts(mut self, attempts: u32) -> Self {
        self.max_reconnect_attempts = Some(attempts);
        self
    }

    /// Sets how long a New Order Single waits for its execution report.
    #[must_use]
    pub const fn with_execution_timeout(mut self, timeout: Duration) -> Self {
        self.execution_timeout = Some(timeout);
        self
    }

    /// Returns the session configuration with overrides applied.
    ///
    /// # Errors
    /// Returns `FixError::Session` if no session was given.
    pub fn session_config(&self) -> Result<SessionConfig> {
        let mut config = self
            .session
            .clone()
            .ok_or_else(|| {
                FixError::from(SessionError::MissingSetting {
                    name: "session".to_string(),
                })
            })?;
        if let Some(timeout) = self.connect_timeout {
            config.connect_timeout = timeout;
        }
        if let Some(interval) = self.reconnect_interval {
            config.reconnect_delay = interval;
        }
        if let Some(attempts) = self.max_reconnect_attempts {
            config.max_reconnect_attempts = attempts;
        }
        if let Some(timeout) = self.execution_timeout {
            config.execution_timeout = timeout;
        }
        Ok(config)
    }

    /// Builds a disconnected client.
    ///
    /// # Errors
    /// Returns `FixError::Session` if no session was given.
    pub fn build(self) -> Result<FixClient> {
        Ok(FixClient::new(self.session_config()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixline_core::types::CompId;

    fn session() -> SessionConfig {
        SessionConfig::new(
            "127.0.0.1",
            9876,
            CompId::new("SENDER").unwrap(),
            CompId::new("TARGET").unwrap(),
        )
    }

    #[test]
    fn test_client_builder_requires_session() {
        let err = ClientBuilder::new().build().unwrap_err();
        assert!(matches!(
            err,
            FixError::Session(SessionError::MissingSetting { ref name }) if name == "session"
        ));
        assert_eq!(err.to_string(), "session error: missing setting: session");
    }

    #[test]
    fn test_client_builder_overrides() {
        let config = ClientBuilder::new()
            .with_session(session())
            .with_connect_timeout(Duration::from_secs(3))
            .with_reconnect_interval(Duration::from_millis(250))
            .with_max_reconnect_attempts(2)
            .with_execution_timeout(Duration::from_secs(12))
            .session_config()
            .unwrap();

        assert_eq!(config.connect_timeout, Duration::from_secs(3));
        assert_eq!(config.reconnect_delay, Duration::from_millis(250));
        assert_eq!(config.max_reconnect_attempts, 2);
        assert_eq!(config.execution_timeout, Duration::from_secs(12));
        assert_eq!(config.max_reconnect_delay, Duration::from_secs(60));
    }

    #[test]
    fn test_client_builder_build() {
        let client = ClientBuilder::new().with_session(session()).build().unwrap();
        assert!(!client.is_connected());
        assert_eq!(client.seq_num().value(), 1);
        assert_eq!(client.config().addr(), "127.0.0.1:9876");
    }
}
