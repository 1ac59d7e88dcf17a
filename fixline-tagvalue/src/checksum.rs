/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! FIX checksum calculation.
//!
//! The checksum is the sum of the bytes of the joined `tag=value` string
//! (the SOH that introduces the `10=` trailer is not part of it), modulo 256,
//! formatted as a 3-digit zero-padded string.

use memchr::memmem;

/// Marker that introduces the checksum trailer.
const TRAILER: &[u8] = b"\x0110=";

/// Calculates the FIX checksum for the given data.
///
/// # Example
/// ```
/// use fixline_tagvalue::calculate_checksum;
///
/// let checksum = calculate_checksum(b"8=FIX.4.2\x0135=0");
/// assert_eq!(checksum, 244);
/// ```
#[inline]
#[must_use]
pub fn calculate_checksum(data: &[u8]) -> u8 {
    let sum: u32 = data.iter().map(|&b| b as u32).sum();
    (sum % 256) as u8
}

/// Formats a checksum value as a 3-digit zero-padded string.
#[inline]
#[must_use]
pub fn format_checksum(checksum: u8) -> [u8; 3] {
    let d0 = b'0' + (checksum / 100);
    let d1 = b'0' + ((checksum / 10) % 10);
    let d2 = b'0' + (checksum % 10);
    [d0, d1, d2]
}

/// Parses a 3-digit checksum string to a u8 value.
///
/// # Returns
/// `Some(checksum)` if valid, `None` otherwise.
#[inline]
#[must_use]
pub fn parse_checksum(bytes: &[u8]) -> Option<u8> {
    if bytes.len() != 3 || !bytes.iter().all(u8::is_ascii_digit) {
        return None;
    }
    let value = bytes
        .iter()
        .fold(0u16, |acc, &b| acc * 10 + (b - b'0') as u16);
    u8::try_from(value).ok()
}

/// Checks the trailer of a complete frame against its content.
///
/// # Returns
/// `None` if the frame has no parsable `10=NNN` trailer, otherwise whether the
/// declared checksum matches.
#[must_use]
pub fn verify_checksum(frame: &[u8]) -> Option<bool> {
    let pos = memmem::rfind(frame, TRAILER)?;
    let digits = frame[pos + TRAILER.len()..]
        .strip_suffix(&[crate::SOH])
        .unwrap_or(&frame[pos + TRAILER.len()..]);
    let declared = parse_checksum(digits)?;
    Some(calculate_checksum(&frame[..pos]) == declared)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculate_checksum_empty() {
        assert_eq!(calculate_checksum(b""), 0);
    }

    #[test]
    fn test_calculate_checksum_simple() {
        let expected = (b'A' as u32 + b'B' as u32 + b'C' as u32) % 256;
        assert_eq!(calculate_checksum(b"ABC"), expected as u8);
    }

    #[test]
    fn test_calculate_checksum_overflow() {
        let data = vec![255u8; 1000];
        let expected = ((255u32 * 1000) % 256) as u8;
        assert_eq!(calculate_checksum(&data), expected);
    }

    #[test]
    fn test_format_checksum() {
        assert_eq!(format_checksum(0), *b"000");
        assert_eq!(format_checksum(42), *b"042");
        assert_eq!(format_checksum(255), *b"255");
    }

    #[test]
    fn test_parse_checksum_invalid() {
        assert_eq!(parse_checksum(b"042"), Some(42));
        assert_eq!(parse_checksum(b""), None);
        assert_eq!(parse_checksum(b"0000"), None);
        assert_eq!(parse_checksum(b"12X"), None);
        assert_eq!(parse_checksum(b"256"), None);
    }

    #[test]
    fn test_verify_checksum() {
        let body = b"35=0\x0149=A";
        let sum = format_checksum(calculate_checksum(body));
        let mut frame = body.to_vec();
        frame.extend_from_slice(b"\x0110=");
        frame.extend_from_slice(&sum);
        frame.push(crate::SOH);
        assert_eq!(verify_checksum(&frame), Some(true));

        let mut tampered = frame.clone();
        tampered[3] = b'1';
        assert_eq!(verify_checksum(&tampered), Some(false));

        assert_eq!(verify_checksum(b"35=0\x0149=A\x01"), None);
    }
}
