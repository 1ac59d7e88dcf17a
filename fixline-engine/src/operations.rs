/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Named session operations with primitive arguments.
//!
//! Each operation maps the session outcome to an [`OperationReport`]: a
//! success/failure flag and a human-readable message, serializable for
//! whatever tool or RPC layer exposes the client.

use crate::client::{FixClient, NewOrder};
use fixline_core::types::{OrdType, Side};
use fixline_session::SendOutcome;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result flag of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationResult {
    /// The operation reached its goal.
    Success,
    /// The operation failed.
    Failed,
}

/// Outcome of a named operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationReport {
    /// Success or failure.
    pub result: OperationResult,
    /// Human-readable detail.
    pub message: String,
}

impl OperationReport {
    /// Creates a success report.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            result: OperationResult::Success,
            message: message.into(),
        }
    }

    /// Creates a failure report.
    #[must_use]
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            result: OperationResult::Failed,
            message: message.into(),
        }
    }

    /// Returns true on success.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self.result, OperationResult::Success)
    }
}

impl fmt::Display for OperationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let flag = match self.result {
            OperationResult::Success => "success",
            OperationResult::Failed => "failed",
        };
        write!(f, "{flag}: {}", self.message)
    }
}

/// Named operations over a borrowed client.
#[derive(Debug)]
pub struct Operations<'a> {
    client: &'a mut FixClient,
}

impl<'a> Operations<'a> {
    /// Wraps a client.
    #[must_use]
    pub fn new(client: &'a mut FixClient) -> Self {
        Self { client }
    }

    /// Sends a Logon.
    pub fn logon(&mut self) -> OperationReport {
        let outcome = self.client.logon();
        admin_report("Logon", &outcome)
    }

    /// Sends a Heartbeat.
    pub fn heartbeat(&mut self) -> OperationReport {
        let outcome = self.client.heartbeat();
        admin_report("Heartbeat", &outcome)
    }

    /// Sends a New Order Single and reports its execution outcome.
    ///
    /// `side` and `ord_type` are FIX codes such as `"1"` and `"2"`.
    pub fn new_order_single(
        &mut self,
        symbol: &str,
        side: &str,
        ord_type: &str,
        price: Decimal,
        quantity: Decimal,
    ) -> OperationReport {
        let Ok(side) = side.parse::<Side>() else {
            return OperationReport::failed(format!("Order failed: invalid side '{side}'"));
        };
        let Ok(ord_type) = ord_type.parse::<OrdType>() else {
            return OperationReport::failed(format!("Order failed: invalid order type '{ord_type}'"));
        };
        let order = NewOrder {
            symbol: symbol.to_string(),
            side,
            ord_type,
            price: Some(price),
            quantity,
            cl_ord_id: None,
        };
        let outcome = self.client.new_order_single(&order);
        report(&outcome, outcome.to_string())
    }

    /// Sends a Logout with the default text.
    pub fn logout(&mut self) -> OperationReport {
        let outcome = self.client.logout(None);
        admin_report("Logout", &outcome)
    }

    /// Sends a Test Request.
    pub fn test_request(&mut self, test_req_id: &str) -> OperationReport {
        let outcome = self.client.test_request(test_req_id);
        admin_report("Test request", &outcome)
    }

    /// Sends a Resend Request.
    pub fn resend_request(&mut self, begin_seq_no: u64, end_seq_no: u64) -> OperationReport {
        let outcome = self.client.resend_request(begin_seq_no, end_seq_no);
        admin_report("Resend request", &outcome)
    }

    /// Sends a session-level Reject.
    pub fn session_reject(&mut self, ref_seq_num: u64, reason: u32) -> OperationReport {
        let outcome = self.client.session_reject(ref_seq_num, reason);
        admin_report("Session reject", &outcome)
    }

    /// Sends a Sequence Reset.
    pub fn sequence_reset(&mut self, new_seq_no: u64, gap_fill: bool) -> OperationReport {
        let outcome = self.client.sequence_reset(new_seq_no, gap_fill);
        admin_report("Sequence reset", &outcome)
    }

    /// Reports the connection flag and current sequence number.
    #[must_use]
    pub fn status(&self) -> OperationReport {
        OperationReport::success(self.client.status().to_string())
    }
}

fn admin_report(name: &str, outcome: &SendOutcome) -> OperationReport {
    if outcome.is_success() {
        OperationReport::success(format!("{name} sent successfully"))
    } else {
        OperationReport::failed(format!("{name} failed: {outcome}"))
    }
}

fn report(outcome: &SendOutcome, message: String) -> OperationReport {
    if outcome.is_success() {
        OperationReport::success(message)
    } else {
        OperationReport::failed(message)
    }
}
