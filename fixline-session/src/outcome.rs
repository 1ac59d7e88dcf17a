/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Result of a send operation.

use crate::execution::ExecutionResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of sending a message on the session.
///
/// Non-order messages end in `Sent` or a failure variant. A New Order Single
/// ends in one of the execution variants, `Timeout`, or a failure variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The message was written to the socket.
    Sent {
        /// Sequence number carried by the message.
        seq_num: u64,
    },
    /// The order was partially or completely filled.
    Executed(ExecutionResult),
    /// The order was rejected (39=8).
    Rejected(ExecutionResult),
    /// An execution report arrived with a non-fill, non-reject status.
    Acknowledged(ExecutionResult),
    /// No matching execution report arrived before the deadline.
    Timeout {
        /// ClOrdID that was awaited.
        cl_ord_id: String,
    },
    /// The connection could not be established; nothing was composed.
    ConnectionFailed {
        /// Connect attempts made.
        attempts: u32,
    },
    /// The write failed and the session is now disconnected.
    TransmitFailed {
        /// Underlying I/O failure.
        reason: String,
    },
}

impl SendOutcome {
    /// Wraps an execution report in the variant matching its status.
    #[must_use]
    pub fn from_execution(result: ExecutionResult) -> Self {
        if result.is_fill() {
            Self::Executed(result)
        } else if result.is_rejected() {
            Self::Rejected(result)
        } else {
            Self::Acknowledged(result)
        }
    }

    /// Returns true if the operation reached its goal.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Sent { .. } | Self::Executed(_) | Self::Acknowledged(_)
        )
    }

    /// Returns the execution report, if one was received.
    #[must_use]
    pub const fn execution(&self) -> Option<&ExecutionResult> {
        match self {
            Self::Executed(r) | Self::Rejected(r) | Self::Acknowledged(r) => Some(r),
            _ => None,
        }
    }
}

impl fmt::Display for SendOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sent { seq_num } => write!(f, "Message sent successfully (seq {seq_num})"),
            Self::Executed(r) => write!(f, "Order executed successfully{r}"),
            Self::Rejected(r) => write!(f, "Order rejected: {r}"),
            Self::Acknowledged(r) => write!(f, "Order status: {r}"),
            Self::Timeout { .. } => f.write_str("Timeout waiting for Execution Report"),
            Self::ConnectionFailed { attempts } => {
                write!(f, "Failed to connect after {attempts} attempts")
            }
            Self::TransmitFailed { reason } => write!(f, "Failed to send message: {reason}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::execution::classify;
    use fixline_core::field::FieldMap;

    fn result(status: &str) -> ExecutionResult {
        let fields: FieldMap = [
            (35u32, "8"),
            (150, status),
            (39, status),
            (32, "100"),
            (44, "150.20"),
        ]
        .into_iter()
        .collect();
        classify(&fields)
    }

    #[test]
    fn test_from_execution_variants() {
        assert!(matches!(SendOutcome::from_execution(result("2")), SendOutcome::Executed(_)));
        assert!(matches!(SendOutcome::from_execution(result("1")), SendOutcome::Executed(_)));
        assert!(matches!(SendOutcome::from_execution(result("8")), SendOutcome::Rejected(_)));
        assert!(matches!(SendOutcome::from_execution(result("0")), SendOutcome::Acknowledged(_)));
        assert!(matches!(SendOutcome::from_execution(result("4")), SendOutcome::Acknowledged(_)));
    }

    #[test]
    fn test_display_fill() {
        let text = SendOutcome::from_execution(result("2")).to_string();
        assert_eq!(
            text,
            "Order executed successfullyExecution Report: Type=2, Status=Fill, \
             Filled Qty=100, Avg Price=150.20"
        );
        assert!(text.contains("Fill"));
        assert!(text.contains("100"));
        assert!(text.contains("150.20"));
    }

    #[test]
    fn test_display_other_variants() {
        assert!(
            SendOutcome::from_execution(result("8"))
                .to_string()
                .starts_with("Order rejected: ")
        );
        assert_eq!(
            SendOutcome::from_execution(result("0")).to_string(),
            "Order status: Execution Report: Type=0, Status=New"
        );
        let timeout = SendOutcome::Timeout {
            cl_ord_id: "ORDER2".to_string(),
        };
        assert_eq!(timeout.to_string(), "Timeout waiting for Execution Report");
    }

    #[test]
    fn test_is_success() {
        assert!(SendOutcome::Sent { seq_num: 1 }.is_success());
        assert!(SendOutcome::from_execution(result("2")).is_success());
        assert!(SendOutcome::from_execution(result("0")).is_success());
        assert!(!SendOutcome::from_execution(result("8")).is_success());
        assert!(!SendOutcome::Timeout { cl_ord_id: String::new() }.is_success());
        assert!(!SendOutcome::ConnectionFailed { attempts: 5 }.is_success());
        assert!(!SendOutcome::TransmitFailed { reason: "reset".into() }.is_success());
        assert!(SendOutcome::ConnectionFailed { attempts: 5 }.execution().is_none());
    }

    #[test]
    fn test_serialize_tagged() {
        let json = serde_json::to_value(SendOutcome::Sent { seq_num: 7 }).unwrap();
        assert_eq!(json["outcome"], "sent");
        assert_eq!(json["seq_num"], 7);
    }
}
