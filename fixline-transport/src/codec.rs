/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! FIX message framing for a blocking byte stream.
//!
//! Outbound messages carry no BodyLength, so inbound frames are delimited by
//! their checksum trailer: a `10=` field that starts the buffer or follows an
//! SOH, terminated by the next SOH.

use bytes::BytesMut;
use fixline_tagvalue::checksum::verify_checksum;
use fixline_tagvalue::display_frame;
use memchr::{memchr, memmem};
use smallvec::SmallVec;
use tracing::debug;

/// SOH delimiter.
const SOH: u8 = 0x01;

/// Checksum field prefix.
const TRAILER_PREFIX: &[u8] = b"10=";

/// Frames drained from a single read.
pub type Frames = SmallVec<[BytesMut; 4]>;

/// Accumulates inbound bytes and splits them into complete FIX frames.
#[derive(Debug)]
pub struct FrameBuffer {
    /// Bytes received but not yet framed.
    buf: BytesMut,
    /// Maximum buffered size before a trailer-less flush.
    max_message_size: usize,
}

impl FrameBuffer {
    /// Creates a new frame buffer with the default 1 MiB limit.
    #[must_use]
    pub fn new() -> Self {
        Self::with_max_message_size(1024 * 1024) // 1MB
    }

    /// Creates a new frame buffer with the given size limit.
    #[must_use]
    pub fn with_max_message_size(max_message_size: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(4096),
            max_message_size,
        }
    }

    /// Appends received bytes.
    #[inline]
    pub fn extend(&mut self, data: &[u8]) {
        self.buf.extend_from_slice(data);
    }

    /// Splits off the next complete frame, if any.
    ///
    /// When no trailer is present and the buffer exceeds the size limit, the
    /// whole buffer is returned as one frame so a misbehaving peer cannot grow
    /// it without bound.
    pub fn next_frame(&mut self) -> Option<BytesMut> {
        if self.buf.is_empty() {
            return None;
        }

        if let Some(end) = find_frame_end(&self.buf) {
            let frame = self.buf.split_to(end);
            if verify_checksum(&frame) == Some(false) {
                debug!(frame = %display_frame(&frame), "inbound checksum mismatch");
            }
            return Some(frame);
        }

        if self.buf.len() > self.max_message_size {
            debug!(
                size = self.buf.len(),
                max_size = self.max_message_size,
                "flushing oversized buffer without trailer"
            );
            return Some(self.buf.split());
        }

        None
    }

    /// Takes whatever is buffered, trailer or not.
    ///
    /// Used when the stream goes idle so a peer that omits the checksum
    /// trailer is still heard.
    pub fn take_partial(&mut self) -> Option<BytesMut> {
        if self.buf.is_empty() {
            return None;
        }
        debug!(size = self.buf.len(), "flushing buffer without trailer");
        Some(self.buf.split())
    }

    /// Splits off every complete frame currently buffered.
    pub fn drain_frames(&mut self) -> Frames {
        let mut frames = Frames::new();
        while let Some(frame) = self.next_frame() {
            frames.push(frame);
        }
        frames
    }

    /// Returns the number of buffered bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing is buffered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Discards buffered bytes.
    #[inline]
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the length of the first complete frame, trailer SOH included.
fn find_frame_end(buf: &[u8]) -> Option<usize> {
    let mut from = 0;
    while let Some(pos) = memmem::find(&buf[from..], TRAILER_PREFIX) {
        let start = from + pos;
        if start == 0 || buf[start - 1] == SOH {
            let value_start = start + TRAILER_PREFIX.len();
            return memchr(SOH, &buf[value_start..]).map(|soh| value_start + soh + 1);
        }
        from = start + 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEARTBEAT: &[u8] = b"8=FIX.4.2\x0135=0\x0134=2\x0110=123\x01";

    #[test]
    fn test_single_frame() {
        let mut frames = FrameBuffer::new();
        frames.extend(HEARTBEAT);

        let frame = frames.next_frame().unwrap();
        assert_eq!(&frame[..], HEARTBEAT);
        assert!(frames.is_empty());
        assert!(frames.next_frame().is_none());
    }

    #[test]
    fn test_split_across_reads() {
        let mut frames = FrameBuffer::new();
        frames.extend(&HEARTBEAT[..20]);
        assert!(frames.next_frame().is_none());

        frames.extend(&HEARTBEAT[20..HEARTBEAT.len() - 1]);
        assert!(frames.next_frame().is_none());

        frames.extend(&HEARTBEAT[HEARTBEAT.len() - 1..]);
        assert_eq!(&frames.next_frame().unwrap()[..], HEARTBEAT);
    }

    #[test]
    fn test_multiple_frames_in_one_read() {
        let mut frames = FrameBuffer::new();
        let mut data = HEARTBEAT.to_vec();
        data.extend_from_slice(b"35=8\x0111=ORDER2\x0110=045\x01");
        data.extend_from_slice(b"35=0");
        frames.extend(&data);

        let drained = frames.drain_frames();
        assert_eq!(drained.len(), 2);
        assert_eq!(&drained[1][..], b"35=8\x0111=ORDER2\x0110=045\x01");
        assert_eq!(frames.len(), 4);
    }

    #[test]
    fn test_ignores_embedded_trailer_prefix() {
        let mut frames = FrameBuffer::new();
        frames.extend(b"58=110=x\x0135=0");
        assert!(frames.next_frame().is_none());

        frames.extend(b"\x0110=001\x01");
        assert_eq!(
            &frames.next_frame().unwrap()[..],
            b"58=110=x\x0135=0\x0110=001\x01"
        );
    }

    #[test]
    fn test_oversized_flush() {
        let mut frames = FrameBuffer::with_max_message_size(8);
        frames.extend(b"35=0\x0158=");
        assert!(frames.next_frame().is_none());

        frames.extend(b"xyz");
        let frame = frames.next_frame().unwrap();
        assert_eq!(&frame[..], b"35=0\x0158=xyz");
        assert!(frames.is_empty());
    }

    #[test]
    fn test_take_partial() {
        let mut frames = FrameBuffer::new();
        assert!(frames.take_partial().is_none());

        frames.extend(b"35=8\x0111=ORDER2\x0139=2\x01");
        assert!(frames.next_frame().is_none());
        let frame = frames.take_partial().unwrap();
        assert_eq!(&frame[..], b"35=8\x0111=ORDER2\x0139=2\x01");
        assert!(frames.is_empty());
        assert!(frames.take_partial().is_none());
    }
}
