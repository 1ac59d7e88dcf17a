/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Sequence number management.
//!
//! The outbound counter is owned by exactly one session and mutated through
//! `&mut self`; it starts at 1 and is consumed once per composed message.

use fixline_core::types::SeqNum;

/// Manages the outbound sequence number of a FIX session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceManager {
    /// Next outgoing sequence number.
    next_sender_seq: u64,
}

impl SequenceManager {
    /// Creates a new sequence manager starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self { next_sender_seq: 1 }
    }

    /// Returns the next sender sequence number without incrementing.
    #[inline]
    #[must_use]
    pub const fn next_sender_seq(&self) -> SeqNum {
        SeqNum::new(self.next_sender_seq)
    }

    /// Allocates the next sender sequence number.
    ///
    /// Returns the value before the increment. The number stays consumed even
    /// if the message carrying it never reaches the wire.
    #[inline]
    pub fn allocate_sender_seq(&mut self) -> SeqNum {
        let seq = SeqNum::new(self.next_sender_seq);
        self.next_sender_seq = self.next_sender_seq.saturating_add(1);
        seq
    }
}

impl Default for SequenceManager {
    fn default() -> Self {
        Self::new()
    }
}
