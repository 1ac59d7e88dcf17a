/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Lenient FIX message decoder.
//!
//! The decoder splits its input on SOH and keeps every segment of the form
//! `<integer>=<value>`. Anything else is skipped silently; no checksum, length,
//! or header validation is performed. Truncated input simply yields fewer fields.

use crate::{EQUALS, SOH};
use fixline_core::field::{FieldMap, FieldRef};
use memchr::memchr;

/// Zero-copy iterator over the fields of a raw FIX buffer.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input buffer.
    input: &'a [u8],
    /// Current position in the buffer.
    offset: usize,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder for the given input buffer.
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self { input, offset: 0 }
    }

    /// Decodes every remaining field into a map.
    ///
    /// When a tag repeats, the last occurrence wins.
    #[must_use]
    pub fn decode(&mut self) -> FieldMap {
        let mut fields = FieldMap::new();
        while let Some(field) = self.next_field() {
            fields.insert(field.tag, field.to_lossy_string());
        }
        fields
    }

    /// Returns the next well-formed field, skipping malformed segments.
    pub fn next_field(&mut self) -> Option<FieldRef<'a>> {
        while let Some(segment) = self.next_segment() {
            if let Some(field) = parse_segment(segment) {
                return Some(field);
            }
        }
        None
    }

    /// Returns the next SOH-delimited segment. The final segment does not
    /// need a trailing SOH.
    fn next_segment(&mut self) -> Option<&'a [u8]> {
        if self.offset >= self.input.len() {
            return None;
        }
        let remaining = &self.input[self.offset..];
        match memchr(SOH, remaining) {
            Some(pos) => {
                self.offset += pos + 1;
                Some(&remaining[..pos])
            }
            None => {
                self.offset = self.input.len();
                Some(remaining)
            }
        }
    }

    /// Returns the current offset in the buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if the buffer has been fully consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }
}

impl<'a> Iterator for Decoder<'a> {
    type Item = FieldRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_field()
    }
}

/// Decodes a raw wire buffer into a tag to value map.
#[must_use]
pub fn decode(input: &[u8]) -> FieldMap {
    Decoder::new(input).decode()
}

/// Splits a segment on its first `=` into a field.
#[inline]
fn parse_segment(segment: &[u8]) -> Option<FieldRef<'_>> {
    let eq_pos = memchr(EQUALS, segment)?;
    let tag = parse_tag(&segment[..eq_pos])?;
    Some(FieldRef::new(tag, &segment[eq_pos + 1..]))
}

/// Parses a tag number from ASCII bytes.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }

    let mut result: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add((b - b'0') as u32)?;
    }

    Some(result)
}
