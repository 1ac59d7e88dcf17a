/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixline Transport
//!
//! Blocking network transport for the fixline initiator.
//!
//! This crate provides:
//! - **TCP connection**: Connect with timeout, bounded retries and backoff
//! - **Framing**: Checksum-trailer based splitting of the inbound byte stream

pub mod codec;
pub mod connection;

pub use codec::{FrameBuffer, Frames};
pub use connection::{ReconnectPolicy, TcpConnection};
