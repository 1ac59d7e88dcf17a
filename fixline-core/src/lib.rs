/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixline Core
//!
//! Core types, traits, and error definitions for the fixline FIX initiator.
//!
//! This crate provides the fundamental building blocks used across all fixline crates:
//! - **Error types**: Unified error handling with `thiserror`
//! - **Field types**: `FieldTag`, `FieldMap`, and the well-known tag catalogue
//! - **Message types**: `MsgType` and the outbound `FixMessage`
//! - **Core types**: `SeqNum`, `Timestamp`, `CompId`, `Side`, `OrdType`, `OrdStatus`
//!
//! ## Type-agnostic fields
//!
//! A `FieldMap` stores every value as text keyed by tag. Semantic meaning is only
//! attached at the edges, through the constants in [`field::tags`].

pub mod error;
pub mod field;
pub mod message;
pub mod types;

pub use error::{DecodeError, FixError, Result, SessionError, TransportError};
pub use field::{FieldMap, FieldRef, FieldTag, tags};
pub use message::{BEGIN_STRING_FIX42, FixMessage, MsgType};
pub use types::{CompId, OrdStatus, OrdType, SeqNum, Side, Timestamp};
