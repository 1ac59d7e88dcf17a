/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Execution report correlation and classification.
//!
//! An inbound message answers an order when it is an Execution Report (35=8)
//! and either its OrderID (37) or its ClOrdID (11) equals the awaited id.

use fixline_core::field::{FieldMap, FieldTag, tags};
use fixline_core::message::MsgType;
use fixline_core::types::OrdStatus;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::warn;

/// Typed content of an Execution Report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// ExecType (150), `0` when absent.
    pub exec_type: String,
    /// OrdStatus (39).
    pub status: OrdStatus,
    /// Venue order id (37).
    pub order_id: Option<String>,
    /// Client order id (11).
    pub cl_ord_id: Option<String>,
    /// CumQty (32), zero when absent.
    pub filled_qty: Decimal,
    /// AvgPx (44), zero when absent.
    pub avg_price: Decimal,
    /// Free text (58).
    pub text: Option<String>,
}

impl ExecutionResult {
    /// Builds a result from decoded Execution Report fields.
    ///
    /// Missing ExecType and OrdStatus both read as `0` (New); missing or
    /// unparsable quantities map to zero.
    #[must_use]
    pub fn from_fields(fields: &FieldMap) -> Self {
        let owned = |tag: FieldTag| fields.get(tag).map(str::to_string);
        Self {
            exec_type: fields.get(tags::EXEC_TYPE).unwrap_or("0").to_string(),
            status: OrdStatus::from_code(fields.get(tags::ORD_STATUS).unwrap_or("0")),
            order_id: owned(tags::ORDER_ID),
            cl_ord_id: owned(tags::CL_ORD_ID),
            filled_qty: decimal_field(fields, tags::CUM_QTY),
            avg_price: decimal_field(fields, tags::AVG_PX),
            text: owned(tags::TEXT),
        }
    }

    /// Returns true for partial and complete fills.
    #[must_use]
    pub const fn is_fill(&self) -> bool {
        self.status.is_fill()
    }

    /// Returns true if the order was rejected.
    #[must_use]
    pub const fn is_rejected(&self) -> bool {
        matches!(self.status, OrdStatus::Rejected)
    }
}

impl fmt::Display for ExecutionResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Execution Report: Type={}, Status={}",
            self.exec_type, self.status
        )?;
        if self.is_fill() {
            write!(
                f,
                ", Filled Qty={}, Avg Price={}",
                self.filled_qty, self.avg_price
            )?;
        }
        Ok(())
    }
}

fn decimal_field(fields: &FieldMap, tag: FieldTag) -> Decimal {
    match fields.get(tag) {
        None => Decimal::ZERO,
        Some(raw) => Decimal::from_str(raw.trim()).unwrap_or_else(|_| {
            warn!(tag = %tag, value = raw, "unparsable decimal in execution report");
            Decimal::ZERO
        }),
    }
}

/// Returns true if the decoded message is the Execution Report for `order_id`.
#[must_use]
pub fn matches_order(fields: &FieldMap, order_id: &str) -> bool {
    let is_exec_report = fields
        .get(tags::MSG_TYPE)
        .is_some_and(|t| t == MsgType::ExecutionReport.as_str());
    is_exec_report
        && (fields.get(tags::ORDER_ID) == Some(order_id)
            || fields.get(tags::CL_ORD_ID) == Some(order_id))
}

/// Classifies decoded Execution Report fields.
#[must_use]
pub fn classify(fields: &FieldMap) -> ExecutionResult {
    ExecutionResult::from_fields(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::prelude::FromPrimitive;

    fn report(pairs: &[(u32, &str)]) -> FieldMap {
        pairs.iter().map(|&(t, v)| (FieldTag::new(t), v.to_string())).collect()
    }

    #[test]
    fn test_matches_order_by_cl_ord_id_or_order_id() {
        let fields = report(&[(35, "8"), (11, "ORDER2"), (37, "OID-9")]);
        assert!(matches_order(&fields, "ORDER2"));
        assert!(matches_order(&fields, "OID-9"));
        assert!(!matches_order(&fields, "ORDER3"));
    }

    #[test]
    fn test_matches_order_requires_execution_report() {
        let fields = report(&[(35, "0"), (11, "ORDER2")]);
        assert!(!matches_order(&fields, "ORDER2"));

        let fields = report(&[(11, "ORDER2")]);
        assert!(!matches_order(&fields, "ORDER2"));
    }

    #[test]
    fn test_classify_fill() {
        let fields = report(&[
            (35, "8"),
            (150, "2"),
            (39, "2"),
            (32, "100"),
            (44, "150.20"),
            (11, "ORDER2"),
        ]);
        let result = classify(&fields);

        assert_eq!(result.status, OrdStatus::Filled);
        assert!(result.is_fill());
        assert_eq!(result.filled_qty, Decimal::from_u32(100).unwrap());
        assert_eq!(
            result.to_string(),
            "Execution Report: Type=2, Status=Fill, Filled Qty=100, Avg Price=150.20"
        );
    }

    #[test]
    fn test_classify_defaults() {
        let result = classify(&report(&[(35, "8"), (39, "1")]));
        assert_eq!(result.exec_type, "0");
        assert_eq!(result.filled_qty, Decimal::ZERO);
        assert_eq!(
            result.to_string(),
            "Execution Report: Type=0, Status=Partial Fill, Filled Qty=0, Avg Price=0"
        );

        let result = classify(&report(&[(35, "8"), (39, "Z"), (32, "n/a")]));
        assert_eq!(result.status, OrdStatus::Unknown("Z".to_string()));
        assert_eq!(result.filled_qty, Decimal::ZERO);
        assert_eq!(result.to_string(), "Execution Report: Type=0, Status=Unknown");
    }

    #[test]
    fn test_classify_missing_status_is_new() {
        let result = classify(&report(&[(35, "8"), (11, "ORDER2")]));
        assert_eq!(result.status, OrdStatus::New);
        assert!(!result.is_fill());
        assert!(matches!(
            crate::outcome::SendOutcome::from_execution(result.clone()),
            crate::outcome::SendOutcome::Acknowledged(_)
        ));
        assert_eq!(result.to_string(), "Execution Report: Type=0, Status=New");
    }

    #[test]
    fn test_classify_rejected() {
        let result = classify(&report(&[(35, "8"), (150, "8"), (39, "8"), (58, "bad px")]));
        assert!(result.is_rejected());
        assert!(!result.is_fill());
        assert_eq!(result.text.as_deref(), Some("bad px"));
        assert_eq!(result.to_string(), "Execution Report: Type=8, Status=Rejected");
    }
}
