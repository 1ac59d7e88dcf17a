/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! FIX message encoder.
//!
//! Builds the wire form of an outbound message: `tag=value` pairs joined by
//! SOH, followed by the checksum trailer.

use crate::SOH;
use crate::checksum::{calculate_checksum, format_checksum};
use bytes::{BufMut, BytesMut};
use fixline_core::field::FieldTag;
use fixline_core::message::FixMessage;

/// Low-level FIX message encoder.
///
/// Fields are written in the order they are put; callers that need the
/// canonical ascending order should go through [`encode`].
#[derive(Debug)]
pub struct Encoder {
    /// Joined `tag=value` pairs, without a trailing delimiter.
    body: BytesMut,
}

impl Encoder {
    /// Creates a new encoder.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new encoder with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            body: BytesMut::with_capacity(capacity),
        }
    }

    /// Appends a field with a string value.
    #[inline]
    pub fn put_str(&mut self, tag: FieldTag, value: &str) {
        self.put_raw(tag, value.as_bytes());
    }

    /// Appends a field with an unsigned integer value.
    #[inline]
    pub fn put_uint(&mut self, tag: FieldTag, value: u64) {
        let mut buf = itoa::Buffer::new();
        self.put_raw(tag, buf.format(value).as_bytes());
    }

    /// Appends a field with raw bytes.
    #[inline]
    pub fn put_raw(&mut self, tag: FieldTag, value: &[u8]) {
        if !self.body.is_empty() {
            self.body.put_u8(SOH);
        }
        let mut tag_buf = itoa::Buffer::new();
        self.body.put_slice(tag_buf.format(tag.value()).as_bytes());
        self.body.put_u8(b'=');
        self.body.put_slice(value);
    }

    /// Appends the checksum trailer and returns the complete message.
    ///
    /// The checksum covers the joined pairs only.
    #[must_use]
    pub fn finish(self) -> BytesMut {
        let checksum = format_checksum(calculate_checksum(&self.body));

        let mut message = self.body;
        message.reserve(8);
        message.put_u8(SOH);
        message.put_slice(b"10=");
        message.put_slice(&checksum);
        message.put_u8(SOH);
        message
    }

    /// Returns the length of the pairs written so far.
    #[inline]
    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Clears the encoder for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.body.clear();
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializes an outbound message to its wire form.
///
/// Header tags overwrite body fields with the same tag and all tags are
/// written in ascending numeric order.
#[must_use]
pub fn encode(message: &FixMessage) -> BytesMut {
    let fields = message.to_field_map();
    let mut encoder = Encoder::with_capacity(32 * fields.len() + 8);
    for (tag, value) in fields.iter() {
        encoder.put_str(tag, value);
    }
    encoder.finish()
}
