/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Field types for FIX protocol messages.
//!
//! This module provides:
//! - [`FieldTag`]: Type-safe wrapper for FIX field tag numbers
//! - [`FieldRef`]: Zero-copy reference to a `tag=value` segment of a raw buffer
//! - [`FieldMap`]: Ordered tag to value association used for every message kind
//! - [`tags`]: Catalogue of the well-known tags this crate reads or writes

use crate::error::DecodeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::str::FromStr;

/// FIX field tag number.
///
/// Tags are positive integers that identify fields within a FIX message.
/// Standard tags are defined in the FIX specification (1-5000 range),
/// while user-defined tags use the 5001+ range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct FieldTag(u32);

impl FieldTag {
    /// Creates a new field tag.
    #[inline]
    #[must_use]
    pub const fn new(tag: u32) -> Self {
        Self(tag)
    }

    /// Returns the raw tag number.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Returns true if this is a user-defined tag (5001+).
    #[inline]
    #[must_use]
    pub const fn is_user_defined(self) -> bool {
        self.0 > 5000
    }

    /// Returns the catalogue name of this tag, if it is one of the well-known tags.
    #[must_use]
    pub fn name(self) -> Option<&'static str> {
        tags::name(self)
    }
}

impl From<u32> for FieldTag {
    fn from(tag: u32) -> Self {
        Self(tag)
    }
}

impl From<FieldTag> for u32 {
    fn from(tag: FieldTag) -> Self {
        tag.0
    }
}

impl FromStr for FieldTag {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u32>()
            .map(Self)
            .map_err(|_| DecodeError::InvalidTag(s.to_string()))
    }
}

impl fmt::Display for FieldTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Well-known tags.
///
/// The codec never interprets tags; only builders and classifiers refer to
/// these constants.
pub mod tags {
    use super::FieldTag;

    /// BeginSeqNo (7) - first sequence number of a resend range.
    pub const BEGIN_SEQ_NO: FieldTag = FieldTag::new(7);
    /// BeginString (8) - protocol version.
    pub const BEGIN_STRING: FieldTag = FieldTag::new(8);
    /// CheckSum (10) - modulo 256 trailer.
    pub const CHECK_SUM: FieldTag = FieldTag::new(10);
    /// ClOrdID (11) - client assigned order identifier.
    pub const CL_ORD_ID: FieldTag = FieldTag::new(11);
    /// EndSeqNo (16) - last sequence number of a resend range.
    pub const END_SEQ_NO: FieldTag = FieldTag::new(16);
    /// CumQty (32) - cumulative filled quantity as reported by the counterparty.
    pub const CUM_QTY: FieldTag = FieldTag::new(32);
    /// MsgSeqNum (34).
    pub const MSG_SEQ_NUM: FieldTag = FieldTag::new(34);
    /// MsgType (35).
    pub const MSG_TYPE: FieldTag = FieldTag::new(35);
    /// NewSeqNo (36) - target of a sequence reset.
    pub const NEW_SEQ_NO: FieldTag = FieldTag::new(36);
    /// OrderID (37) - venue assigned order identifier.
    pub const ORDER_ID: FieldTag = FieldTag::new(37);
    /// OrderQty (38).
    pub const ORDER_QTY: FieldTag = FieldTag::new(38);
    /// OrdStatus (39).
    pub const ORD_STATUS: FieldTag = FieldTag::new(39);
    /// OrdType (40).
    pub const ORD_TYPE: FieldTag = FieldTag::new(40);
    /// Price (44) on orders, average price on execution reports.
    pub const PRICE: FieldTag = FieldTag::new(44);
    /// RefSeqNum (45) - sequence number of the rejected message.
    pub const REF_SEQ_NUM: FieldTag = FieldTag::new(45);
    /// SenderCompID (49).
    pub const SENDER_COMP_ID: FieldTag = FieldTag::new(49);
    /// SendingTime (52).
    pub const SENDING_TIME: FieldTag = FieldTag::new(52);
    /// Side (54).
    pub const SIDE: FieldTag = FieldTag::new(54);
    /// Symbol (55).
    pub const SYMBOL: FieldTag = FieldTag::new(55);
    /// TargetCompID (56).
    pub const TARGET_COMP_ID: FieldTag = FieldTag::new(56);
    /// Text (58).
    pub const TEXT: FieldTag = FieldTag::new(58);
    /// EncryptMethod (98).
    pub const ENCRYPT_METHOD: FieldTag = FieldTag::new(98);
    /// HeartBtInt (108).
    pub const HEART_BT_INT: FieldTag = FieldTag::new(108);
    /// TestReqID (112).
    pub const TEST_REQ_ID: FieldTag = FieldTag::new(112);
    /// GapFillFlag (123).
    pub const GAP_FILL_FLAG: FieldTag = FieldTag::new(123);
    /// ExecType (150).
    pub const EXEC_TYPE: FieldTag = FieldTag::new(150);
    /// SessionRejectReason (373).
    pub const SESSION_REJECT_REASON: FieldTag = FieldTag::new(373);

    /// Average price as carried on inbound execution reports.
    pub const AVG_PX: FieldTag = PRICE;

    /// Header tags stamped on every outbound message, in wire order.
    pub const HEADER: [FieldTag; 6] = [
        BEGIN_STRING,
        MSG_SEQ_NUM,
        MSG_TYPE,
        SENDER_COMP_ID,
        SENDING_TIME,
        TARGET_COMP_ID,
    ];

    /// Returns the catalogue name of a tag.
    #[must_use]
    pub fn name(tag: FieldTag) -> Option<&'static str> {
        Some(match tag.value() {
            7 => "BeginSeqNo",
            8 => "BeginString",
            10 => "CheckSum",
            11 => "ClOrdID",
            16 => "EndSeqNo",
            32 => "CumQty",
            34 => "MsgSeqNum",
            35 => "MsgType",
            36 => "NewSeqNo",
            37 => "OrderID",
            38 => "OrderQty",
            39 => "OrdStatus",
            40 => "OrdType",
            44 => "Price",
            45 => "RefSeqNum",
            49 => "SenderCompID",
            52 => "SendingTime",
            54 => "Side",
            55 => "Symbol",
            56 => "TargetCompID",
            58 => "Text",
            98 => "EncryptMethod",
            108 => "HeartBtInt",
            112 => "TestReqID",
            123 => "GapFillFlag",
            150 => "ExecType",
            373 => "SessionRejectReason",
            _ => return None,
        })
    }
}

/// Zero-copy reference to a field within a FIX message buffer.
#[derive(Debug, Clone, Copy)]
pub struct FieldRef<'a> {
    /// The field tag number.
    pub tag: u32,
    /// Reference to the field value bytes (without delimiters).
    pub value: &'a [u8],
}

impl<'a> FieldRef<'a> {
    /// Creates a new field reference.
    #[inline]
    #[must_use]
    pub const fn new(tag: u32, value: &'a [u8]) -> Self {
        Self { tag, value }
    }

    /// Returns the field tag.
    #[inline]
    #[must_use]
    pub const fn tag(&self) -> FieldTag {
        FieldTag(self.tag)
    }

    /// Returns the value as text, replacing invalid UTF-8 sequences.
    #[must_use]
    pub fn to_lossy_string(&self) -> String {
        String::from_utf8_lossy(self.value).into_owned()
    }
}

/// Ordered association of tag to text value.
///
/// Iteration is always ascending by tag, which is the serialization order of
/// the wire format. Inserting an existing tag replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMap(BTreeMap<FieldTag, String>);

impl FieldMap {
    /// Creates an empty field map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Sets a field, returning the previous value for the tag if any.
    pub fn insert(&mut self, tag: impl Into<FieldTag>, value: impl Into<String>) -> Option<String> {
        self.0.insert(tag.into(), value.into())
    }

    /// Builder-style variant of [`FieldMap::insert`].
    #[must_use]
    pub fn with(mut self, tag: impl Into<FieldTag>, value: impl Into<String>) -> Self {
        self.insert(tag, value);
        self
    }

    /// Returns the value of a field.
    #[must_use]
    pub fn get(&self, tag: impl Into<FieldTag>) -> Option<&str> {
        self.0.get(&tag.into()).map(String::as_str)
    }

    /// Parses the value of a field as the requested type.
    ///
    /// # Errors
    /// Returns `DecodeError::MissingRequiredField` if the tag is absent and
    /// `DecodeError::InvalidFieldValue` if the value does not parse.
    pub fn get_as<T: FromStr>(&self, tag: impl Into<FieldTag>) -> Result<T, DecodeError> {
        let tag = tag.into();
        let raw = self
            .get(tag)
            .ok_or(DecodeError::MissingRequiredField { tag: tag.value() })?;
        raw.parse().map_err(|_| DecodeError::InvalidFieldValue {
            tag: tag.value(),
            reason: format!(
                "failed to parse '{}' as {}",
                raw,
                std::any::type_name::<T>()
            ),
        })
    }

    /// Removes a field, returning its value.
    pub fn remove(&mut self, tag: impl Into<FieldTag>) -> Option<String> {
        self.0.remove(&tag.into())
    }

    /// Returns true if the tag is present.
    #[must_use]
    pub fn contains(&self, tag: impl Into<FieldTag>) -> bool {
        self.0.contains_key(&tag.into())
    }

    /// Returns the number of fields.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if there are no fields.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates fields in ascending tag order.
    pub fn iter(&self) -> impl Iterator<Item = (FieldTag, &str)> {
        self.0.iter().map(|(tag, value)| (*tag, value.as_str()))
    }
}

impl<T: Into<FieldTag>, V: Into<String>> FromIterator<(T, V)> for FieldMap {
    fn from_iter<I: IntoIterator<Item = (T, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        map.extend(iter);
        map
    }
}

impl<T: Into<FieldTag>, V: Into<String>> Extend<(T, V)> for FieldMap {
    fn extend<I: IntoIterator<Item = (T, V)>>(&mut self, iter: I) {
        for (tag, value) in iter {
            self.insert(tag, value);
        }
    }
}

impl IntoIterator for FieldMap {
    type Item = (FieldTag, String);
    type IntoIter = btree_map::IntoIter<FieldTag, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
