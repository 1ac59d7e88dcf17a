/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Message types for the FIX protocol.
//!
//! This module provides:
//! - [`MsgType`]: The message kinds this initiator produces or consumes
//! - [`FixMessage`]: An outbound message, header plus caller-supplied fields

use crate::field::{FieldMap, FieldTag, tags};
use crate::types::{CompId, SeqNum, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BeginString stamped on every outbound message.
pub const BEGIN_STRING_FIX42: &str = "FIX.4.2";

/// FIX message types handled by the initiator.
///
/// Any other value received on the wire is kept as `Custom(String)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MsgType {
    /// Heartbeat (0) - Session level.
    #[default]
    Heartbeat,
    /// Test Request (1) - Session level.
    TestRequest,
    /// Resend Request (2) - Session level.
    ResendRequest,
    /// Reject (3) - Session level.
    Reject,
    /// Sequence Reset (4) - Session level.
    SequenceReset,
    /// Logout (5) - Session level.
    Logout,
    /// Execution Report (8).
    ExecutionReport,
    /// Logon (A) - Session level.
    Logon,
    /// New Order Single (D).
    NewOrderSingle,
    /// Custom or unknown message type.
    Custom(String),
}

impl std::str::FromStr for MsgType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0" => Self::Heartbeat,
            "1" => Self::TestRequest,
            "2" => Self::ResendRequest,
            "3" => Self::Reject,
            "4" => Self::SequenceReset,
            "5" => Self::Logout,
            "8" => Self::ExecutionReport,
            "A" => Self::Logon,
            "D" => Self::NewOrderSingle,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl MsgType {
    /// Returns the wire representation of this message type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heartbeat => "0",
            Self::TestRequest => "1",
            Self::ResendRequest => "2",
            Self::Reject => "3",
            Self::SequenceReset => "4",
            Self::Logout => "5",
            Self::ExecutionReport => "8",
            Self::Logon => "A",
            Self::NewOrderSingle => "D",
            Self::Custom(s) => s.as_str(),
        }
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An outbound FIX message.
///
/// Holds the six header attributes separately from the caller's body fields.
/// [`FixMessage::to_field_map`] produces the canonical tag set, where the
/// header always wins over a body field with the same tag.
#[derive(Debug, Clone)]
pub struct FixMessage {
    begin_string: String,
    msg_type: MsgType,
    sender_comp_id: CompId,
    target_comp_id: CompId,
    msg_seq_num: SeqNum,
    sending_time: Timestamp,
    fields: FieldMap,
}

impl FixMessage {
    /// Creates a message stamped with the current UTC time.
    ///
    /// # Arguments
    /// * `msg_seq_num` - Sequence number for tag 34
    /// * `sender_comp_id` - Value for tag 49
    /// * `target_comp_id` - Value for tag 56
    /// * `msg_type` - Value for tag 35
    #[must_use]
    pub fn new(
        msg_seq_num: SeqNum,
        sender_comp_id: CompId,
        target_comp_id: CompId,
        msg_type: MsgType,
    ) -> Self {
        Self {
            begin_string: BEGIN_STRING_FIX42.to_string(),
            msg_type,
            sender_comp_id,
            target_comp_id,
            msg_seq_num,
            sending_time: Timestamp::now(),
            fields: FieldMap::new(),
        }
    }

    /// Overrides the BeginString.
    #[must_use]
    pub fn with_begin_string(mut self, begin_string: impl Into<String>) -> Self {
        self.begin_string = begin_string.into();
        self
    }

    /// Overrides the SendingTime.
    #[must_use]
    pub fn with_sending_time(mut self, sending_time: Timestamp) -> Self {
        self.sending_time = sending_time;
        self
    }

    /// Adds every field of `fields` to the body.
    #[must_use]
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields.extend(fields);
        self
    }

    /// Sets a body field.
    pub fn set_field(&mut self, tag: impl Into<FieldTag>, value: impl Into<String>) {
        self.fields.insert(tag, value);
    }

    /// Returns the BeginString.
    #[must_use]
    pub fn begin_string(&self) -> &str {
        &self.begin_string
    }

    /// Returns the message type.
    #[must_use]
    pub fn msg_type(&self) -> &MsgType {
        &self.msg_type
    }

    /// Returns the sender CompID.
    #[must_use]
    pub fn sender_comp_id(&self) -> &CompId {
        &self.sender_comp_id
    }

    /// Returns the target CompID.
    #[must_use]
    pub fn target_comp_id(&self) -> &CompId {
        &self.target_comp_id
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn msg_seq_num(&self) -> SeqNum {
        self.msg_seq_num
    }

    /// Returns the sending time.
    #[must_use]
    pub const fn sending_time(&self) -> Timestamp {
        self.sending_time
    }

    /// Returns the caller-supplied body fields.
    #[must_use]
    pub fn fields(&self) -> &FieldMap {
        &self.fields
    }

    /// Returns the canonical tag set: body fields overlaid with the header.
    ///
    /// A body value for tag 10 is dropped; the checksum is always computed
    /// by the encoder.
    #[must_use]
    pub fn to_field_map(&self) -> FieldMap {
        let mut map = self.fields.clone();
        map.remove(tags::CHECK_SUM);
        map.insert(tags::BEGIN_STRING, self.begin_string.as_str());
        map.insert(tags::MSG_TYPE, self.msg_type.as_str());
        map.insert(tags::SENDER_COMP_ID, self.sender_comp_id.as_str());
        map.insert(tags::TARGET_COMP_ID, self.target_comp_id.as_str());
        map.insert(tags::MSG_SEQ_NUM, self.msg_seq_num.to_string());
        map.insert(tags::SENDING_TIME, self.sending_time.format_millis().as_str());
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comp(s: &str) -> CompId {
        CompId::new(s).unwrap()
    }

    #[test]
    fn test_msg_type_from_str() {
        assert_eq!("0".parse::<MsgType>().unwrap(), MsgType::Heartbeat);
        assert_eq!("A".parse::<MsgType>().unwrap(), MsgType::Logon);
        assert_eq!("D".parse::<MsgType>().unwrap(), MsgType::NewOrderSingle);
        assert_eq!("8".parse::<MsgType>().unwrap(), MsgType::ExecutionReport);
    }

    #[test]
    fn test_msg_type_as_str() {
        assert_eq!(MsgType::Heartbeat.as_str(), "0");
        assert_eq!(MsgType::Logon.as_str(), "A");
        assert_eq!(MsgType::SequenceReset.as_str(), "4");
        assert_eq!(MsgType::NewOrderSingle.as_str(), "D");
    }

    #[test]
    fn test_msg_type_custom() {
        let custom: MsgType = "AE".parse().unwrap();
        assert!(matches!(custom, MsgType::Custom(_)));
        assert_eq!(custom.to_string(), "AE");
    }

    #[test]
    fn test_header_overrides_body_fields() {
        let mut msg = FixMessage::new(
            SeqNum::new(3),
            comp("CLIENT1"),
            comp("BROKER1"),
            MsgType::NewOrderSingle,
        )
        .with_sending_time(Timestamp::from_millis(0));
        msg.set_field(tags::MSG_TYPE, "Z");
        msg.set_field(tags::MSG_SEQ_NUM, "999");
        msg.set_field(tags::SENDER_COMP_ID, "SPOOF");
        msg.set_field(tags::CHECK_SUM, "000");
        msg.set_field(tags::SYMBOL, "AAPL");

        let map = msg.to_field_map();
        assert_eq!(map.get(tags::BEGIN_STRING), Some("FIX.4.2"));
        assert_eq!(map.get(tags::MSG_TYPE), Some("D"));
        assert_eq!(map.get(tags::MSG_SEQ_NUM), Some("3"));
        assert_eq!(map.get(tags::SENDER_COMP_ID), Some("CLIENT1"));
        assert_eq!(map.get(tags::TARGET_COMP_ID), Some("BROKER1"));
        assert_eq!(map.get(tags::SENDING_TIME), Some("19700101-00:00:00.000"));
        assert_eq!(map.get(tags::SYMBOL), Some("AAPL"));
        assert!(!map.contains(tags::CHECK_SUM));
        assert_eq!(map.len(), 7);
    }

    #[test]
    fn test_body_fields_untouched_by_overlay() {
        let mut msg = FixMessage::new(
            SeqNum::new(1),
            comp("A"),
            comp("B"),
            MsgType::Heartbeat,
        );
        msg.set_field(tags::MSG_TYPE, "Z");
        let _ = msg.to_field_map();
        assert_eq!(msg.fields().get(tags::MSG_TYPE), Some("Z"));
    }
}
