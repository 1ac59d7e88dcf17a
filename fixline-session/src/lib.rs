/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! # fixline Session
//!
//! Session layer building blocks for the fixline initiator.
//!
//! This crate provides:
//! - **Configuration**: Session settings, builder, and environment loading
//! - **Sequence management**: Outbound sequence number allocation
//! - **Connection state**: Connected/Disconnected flag and status snapshots
//! - **Execution reports**: Correlation matching and typed classification
//! - **Outcomes**: The tagged result of every send operation

pub mod config;
pub mod execution;
pub mod outcome;
pub mod sequence;
pub mod state;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use execution::{ExecutionResult, classify, matches_order};
pub use outcome::SendOutcome;
pub use sequence::SequenceManager;
pub use state::{ConnectionState, SessionStatus};
