/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixline Engine
//!
//! Blocking FIX 4.2 initiator for the fixline protocol implementation.
//!
//! This crate provides:
//! - **Session client**: Send, receive and execution report correlation
//! - **Message builders**: Logon, Heartbeat, New Order Single and admin messages
//! - **Operations**: Named operations returning serializable reports
//! - **Builder API**: Fluent configuration for client setup

pub mod builder;
pub mod client;
pub mod operations;

pub use builder::ClientBuilder;
pub use client::{DEFAULT_LOGOUT_TEXT, FixClient, NewOrder};
pub use operations::{OperationReport, OperationResult, Operations};
