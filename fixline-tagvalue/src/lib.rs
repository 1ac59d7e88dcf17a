/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixline Tag-Value
//!
//! FIX tag=value encoding and decoding for the fixline initiator.
//!
//! ## Wire format
//!
//! Fields are serialized as `tag=value` pairs sorted ascending by tag and joined
//! by SOH (0x01). The pair string is followed by `SOH 10=NNN SOH`, where `NNN` is
//! the byte sum of the pair string modulo 256. No BodyLength (tag 9) is emitted.
//!
//! ## Features
//!
//! - **Canonical encoding**: Header overlay and tag ordering are always applied
//! - **Lenient decoding**: Malformed segments are dropped, never reported
//! - **`memchr` search**: Fast delimiter scanning on inbound buffers

pub mod checksum;
pub mod decoder;
pub mod encoder;

pub use checksum::{calculate_checksum, verify_checksum};
pub use decoder::{Decoder, decode};
pub use encoder::{Encoder, encode};

/// SOH (Start of Header) delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// Equals sign delimiter between tag and value.
pub const EQUALS: u8 = b'=';

/// Renders a wire buffer for logs, with SOH shown as `|`.
#[must_use]
pub fn display_frame(frame: &[u8]) -> String {
    String::from_utf8_lossy(frame).replace(SOH as char, "|")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_frame() {
        assert_eq!(display_frame(b"35=0\x0110=123\x01"), "35=0|10=123|");
    }
}
