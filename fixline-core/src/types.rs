/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Core types for FIX protocol operations.
//!
//! This module provides fundamental types used throughout fixline:
//! - [`SeqNum`]: Outbound message sequence number
//! - [`Timestamp`]: UTC timestamp rendered as FIX `SendingTime`
//! - [`CompId`]: Component identifier (SenderCompID, TargetCompID)
//! - [`Side`], [`OrdType`]: Order attributes written by the order builder
//! - [`OrdStatus`]: Order status read back from execution reports

use arrayvec::ArrayString;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum length for CompID strings in bytes.
pub const COMP_ID_MAX_LEN: usize = 32;

/// FIX message sequence number.
///
/// Sequence numbers are unsigned 64-bit integers that identify messages
/// within a FIX session. They start at 1 and increment for each message sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct SeqNum(u64);

impl SeqNum {
    /// Creates a new sequence number.
    #[inline]
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw sequence number value.
    #[inline]
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Default for SeqNum {
    fn default() -> Self {
        Self(1)
    }
}

impl From<u64> for SeqNum {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SeqNum> for u64 {
    fn from(seq: SeqNum) -> Self {
        seq.0
    }
}

impl fmt::Display for SeqNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// FIX protocol timestamp with nanosecond storage.
///
/// Rendered on the wire with millisecond precision as `YYYYMMDD-HH:MM:SS.sss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Nanoseconds since Unix epoch (1970-01-01 00:00:00 UTC).
    nanos_since_epoch: u64,
}

impl Timestamp {
    /// Creates a timestamp from milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn from_millis(millis: u64) -> Self {
        Self {
            nanos_since_epoch: millis * 1_000_000,
        }
    }

    /// Returns the current UTC timestamp.
    #[inline]
    #[must_use]
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Returns milliseconds since Unix epoch.
    #[inline]
    #[must_use]
    pub const fn as_millis(self) -> u64 {
        self.nanos_since_epoch / 1_000_000
    }

    /// Converts to a chrono `DateTime<Utc>`.
    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        DateTime::from_timestamp_nanos(self.nanos_since_epoch as i64)
    }

    /// Formats the timestamp in FIX format with millisecond precision.
    ///
    /// Format: `YYYYMMDD-HH:MM:SS.sss`
    #[must_use]
    pub fn format_millis(self) -> ArrayString<21> {
        let dt = self.to_datetime();
        let mut buf = ArrayString::new();
        let _ = std::fmt::write(
            &mut buf,
            format_args!("{}", dt.format("%Y%m%d-%H:%M:%S%.3f")),
        );
        buf
    }
}

impl Default for Timestamp {
    fn default() -> Self {
        Self::now()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self {
            nanos_since_epoch: dt.timestamp_nanos_opt().unwrap_or(0) as u64,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_millis())
    }
}

/// Component identifier for FIX sessions.
///
/// Used for SenderCompID (tag 49) and TargetCompID (tag 56).
/// Maximum length is 32 characters.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(transparent)]
#[serde(transparent)]
pub struct CompId(ArrayString<COMP_ID_MAX_LEN>);

impl CompId {
    /// Creates a new CompId from a string slice.
    ///
    /// # Returns
    /// `Some(CompId)` if the string is non-empty and fits within the maximum
    /// length, `None` otherwise.
    #[must_use]
    pub fn new(s: &str) -> Option<Self> {
        if s.is_empty() {
            return None;
        }
        ArrayString::from(s).ok().map(Self)
    }

    /// Returns the CompId as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Returns the length of the CompId in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the CompId is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl AsRef<str> for CompId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CompId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CompId {
    type Err = arrayvec::CapacityError<()>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or_else(|| arrayvec::CapacityError::new(()))
    }
}

/// Order side (tag 54).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Buy order.
    Buy = b'1',
    /// Sell order.
    Sell = b'2',
    /// Buy minus.
    BuyMinus = b'3',
    /// Sell plus.
    SellPlus = b'4',
    /// Sell short.
    SellShort = b'5',
    /// Sell short exempt.
    SellShortExempt = b'6',
}

impl Side {
    /// Creates a Side from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Buy),
            '2' => Some(Self::Sell),
            '3' => Some(Self::BuyMinus),
            '4' => Some(Self::SellPlus),
            '5' => Some(Self::SellShort),
            '6' => Some(Self::SellShortExempt),
            _ => None,
        }
    }

    /// Returns the character representation of this side.
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for Side {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or(()),
            _ => Err(()),
        }
    }
}

/// Order type (tag 40).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum OrdType {
    /// Market order.
    Market = b'1',
    /// Limit order.
    Limit = b'2',
    /// Stop order.
    Stop = b'3',
    /// Stop limit order.
    StopLimit = b'4',
}

impl OrdType {
    /// Creates an OrdType from a single character.
    #[must_use]
    pub const fn from_char(c: char) -> Option<Self> {
        match c {
            '1' => Some(Self::Market),
            '2' => Some(Self::Limit),
            '3' => Some(Self::Stop),
            '4' => Some(Self::StopLimit),
            _ => None,
        }
    }

    /// Returns the character representation of this order type.
    #[must_use]
    pub const fn as_char(self) -> char {
        self as u8 as char
    }
}

impl fmt::Display for OrdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl FromStr for OrdType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::from_char(c).ok_or(()),
            _ => Err(()),
        }
    }
}

/// Order status (tag 39) as reported on execution reports.
///
/// Unrecognized codes are preserved in `Unknown` rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrdStatus {
    /// 0 - New.
    New,
    /// 1 - Partially filled.
    PartiallyFilled,
    /// 2 - Filled.
    Filled,
    /// 4 - Canceled.
    Canceled,
    /// 8 - Rejected.
    Rejected,
    /// Any other code.
    Unknown(String),
}

impl OrdStatus {
    /// Maps a wire code to a status. Never fails.
    #[must_use]
    pub fn from_code(code: &str) -> Self {
        match code {
            "0" => Self::New,
            "1" => Self::PartiallyFilled,
            "2" => Self::Filled,
            "4" => Self::Canceled,
            "8" => Self::Rejected,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// Returns the wire code.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::New => "0",
            Self::PartiallyFilled => "1",
            Self::Filled => "2",
            Self::Canceled => "4",
            Self::Rejected => "8",
            Self::Unknown(code) => code.as_str(),
        }
    }

    /// Returns the human-readable label.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::New => "New",
            Self::PartiallyFilled => "Partial Fill",
            Self::Filled => "Fill",
            Self::Canceled => "Canceled",
            Self::Rejected => "Rejected",
            Self::Unknown(_) => "Unknown",
        }
    }

    /// Returns true for partial and complete fills.
    #[must_use]
    pub const fn is_fill(&self) -> bool {
        matches!(self, Self::PartiallyFilled | Self::Filled)
    }
}

impl fmt::Display for OrdStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_num_operations() {
        let seq = SeqNum::new(5);
        assert_eq!(seq.value(), 5);
        assert_eq!(seq.to_string(), "5");
        assert_eq!(SeqNum::default().value(), 1);
    }

    #[test]
    fn test_timestamp_format() {
        let ts = Timestamp::from_millis(1_700_000_000_123);
        assert_eq!(ts.format_millis().as_str(), "20231114-22:13:20.123");
        assert_eq!(Timestamp::from_millis(0).to_string(), "19700101-00:00:00.000");
    }

    #[test]
    fn test_timestamp_now_shape() {
        let formatted = Timestamp::now().format_millis();
        assert_eq!(formatted.len(), 21);
        assert_eq!(&formatted[8..9], "-");
        assert_eq!(&formatted[17..18], ".");
    }

    #[test]
    fn test_comp_id() {
        let id = CompId::new("SENDER").unwrap();
        assert_eq!(id.as_str(), "SENDER");
        assert_eq!(id.len(), 6);
        assert!(!id.is_empty());
    }

    #[test]
    fn test_comp_id_rejects_empty_and_too_long() {
        assert!(CompId::new("").is_none());
        let long_str = "A".repeat(COMP_ID_MAX_LEN + 1);
        assert!(CompId::new(&long_str).is_none());
        assert!(long_str.parse::<CompId>().is_err());
    }

    #[test]
    fn test_side_parse() {
        assert_eq!("1".parse::<Side>(), Ok(Side::Buy));
        assert_eq!("2".parse::<Side>(), Ok(Side::Sell));
        assert!("12".parse::<Side>().is_err());
        assert!("X".parse::<Side>().is_err());
        assert_eq!(Side::Sell.to_string(), "2");
    }

    #[test]
    fn test_ord_type_parse() {
        assert_eq!("2".parse::<OrdType>(), Ok(OrdType::Limit));
        assert_eq!(OrdType::Market.to_string(), "1");
        assert!("".parse::<OrdType>().is_err());
    }

    #[test]
    fn test_ord_status_labels() {
        assert_eq!(OrdStatus::from_code("0").label(), "New");
        assert_eq!(OrdStatus::from_code("1").label(), "Partial Fill");
        assert_eq!(OrdStatus::from_code("2").label(), "Fill");
        assert_eq!(OrdStatus::from_code("4").label(), "Canceled");
        assert_eq!(OrdStatus::from_code("8").label(), "Rejected");
        let unknown = OrdStatus::from_code("C");
        assert_eq!(unknown.label(), "Unknown");
        assert_eq!(unknown.code(), "C");
        assert!(OrdStatus::Filled.is_fill());
        assert!(!OrdStatus::Canceled.is_fill());
    }
}
