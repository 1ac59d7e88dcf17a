/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixline
//!
//! A minimal, blocking FIX 4.2 initiator for Rust.
//!
//! fixline keeps one TCP session to a counterparty, encodes outbound
//! administrative messages and New Order Singles, and correlates each order
//! with its Execution Report.
//!
//! ## Features
//!
//! - **Canonical encoding**: Sorted tags, header overlay, fresh checksum
//! - **Lenient decoding**: Malformed inbound segments are dropped
//! - **Bounded reconnects**: Exponential backoff with a fixed attempt budget
//! - **Typed outcomes**: Every send returns a `SendOutcome` variant
//! - **Synchronous**: Plain `std::net`, no runtime required
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use fixline::prelude::*;
//!
//! let config = SessionConfig::from_env()?;
//! let mut client = ClientBuilder::new().with_session(config).build()?;
//!
//! client.logon();
//! let order = NewOrder::limit("AAPL", Side::Buy, Decimal::new(15025, 2), Decimal::from(100));
//! match client.new_order_single(&order) {
//!     SendOutcome::Executed(report) => println!("filled {}", report.filled_qty),
//!     other => println!("{other}"),
//! }
//! client.logout(None);
//! # Ok::<(), fixline::core::FixError>(())
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Fundamental types, tag catalogue, and error definitions
//! - [`tagvalue`]: Tag=value encoding and decoding
//! - [`session`]: Configuration, sequencing, and execution classification
//! - [`transport`]: Blocking TCP transport and framing
//! - [`engine`]: Session client and named operations

pub use rust_decimal::Decimal;

pub mod core {
    //! Core types, tag catalogue, and error definitions.
    pub use fixline_core::*;
}

pub mod tagvalue {
    //! Tag=value encoding and decoding.
    pub use fixline_tagvalue::*;
}

pub mod session {
    //! Configuration, sequencing, and execution classification.
    pub use fixline_session::*;
}

pub mod transport {
    //! Blocking TCP transport and framing.
    pub use fixline_transport::*;
}

pub mod engine {
    //! Session client and named operations.
    pub use fixline_engine::*;
}

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::Decimal;

    // Core types
    pub use fixline_core::{
        CompId, DecodeError, FieldMap, FieldTag, FixError, FixMessage, MsgType, OrdStatus,
        OrdType, Result, SeqNum, SessionError, Side, Timestamp, TransportError, tags,
    };

    // Tag-value encoding
    pub use fixline_tagvalue::{Decoder, Encoder, calculate_checksum, decode, encode};

    // Session
    pub use fixline_session::{
        ConnectionState, ExecutionResult, SendOutcome, SequenceManager, SessionConfig,
        SessionConfigBuilder, SessionStatus,
    };

    // Transport
    pub use fixline_transport::{FrameBuffer, ReconnectPolicy, TcpConnection};

    // Engine
    pub use fixline_engine::{
        ClientBuilder, FixClient, NewOrder, OperationReport, OperationResult, Operations,
    };
}

#[cfg(test)]
mod tests {
    use super::prelude::*;

    #[test]
    fn test_prelude_imports() {
        let _seq = SeqNum::new(1);
        let _ts = Timestamp::now();
        let _side = Side::Buy;
        assert_eq!(MsgType::NewOrderSingle.as_str(), "D");
    }

    #[test]
    fn test_prelude_encode_decode() {
        let msg = FixMessage::new(
            SeqNum::new(1),
            CompId::new("CLIENT1").unwrap(),
            CompId::new("BROKER1").unwrap(),
            MsgType::Heartbeat,
        );
        let fields = decode(&encode(&msg));
        assert_eq!(fields.get(tags::MSG_TYPE), Some("0"));
        assert_eq!(Decimal::new(15025, 2).to_string(), "150.25");
    }
}
