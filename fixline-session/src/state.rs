/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Connection state of a FIX session.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether the session currently holds an open TCP connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No connection; the next send or receive connects lazily.
    #[default]
    Disconnected,
    /// A TCP connection is established.
    Connected,
}

impl ConnectionState {
    /// Returns true if connected.
    #[inline]
    #[must_use]
    pub const fn is_connected(self) -> bool {
        matches!(self, Self::Connected)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Disconnected => f.write_str("Disconnected"),
            Self::Connected => f.write_str("Connected"),
        }
    }
}

/// Point-in-time view of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStatus {
    /// Connection flag.
    pub connected: bool,
    /// Current outbound sequence number (the next one to be used).
    pub seq_num: u64,
    /// Last ClOrdID sent, if any.
    pub last_order_id: Option<String>,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Connected: {}, Last Sequence: {}",
            self.connected, self.seq_num
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_state() {
        assert_eq!(ConnectionState::default(), ConnectionState::Disconnected);
        assert!(ConnectionState::Connected.is_connected());
        assert!(!ConnectionState::Disconnected.is_connected());
        assert_eq!(ConnectionState::Connected.to_string(), "Connected");
    }

    #[test]
    fn test_session_status_display() {
        let status = SessionStatus {
            connected: true,
            seq_num: 4,
            last_order_id: Some("ORDER3".to_string()),
        };
        assert_eq!(status.to_string(), "Connected: true, Last Sequence: 4");
    }
}
