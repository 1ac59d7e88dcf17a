/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 16/10/26
******************************************************************************/

//! Error types for the fixline FIX initiator.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across decoding, session configuration, and transport.

use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all fixline operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error while reading a field out of a decoded message.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error in session configuration or state.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error from the TCP transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O error outside of the transport layer.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised when interpreting decoded fields.
///
/// Decoding itself never fails: malformed segments are dropped. These errors
/// only surface when a caller asks for a typed view of a field.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Invalid tag format (not a valid integer).
    #[error("invalid tag format: {0}")]
    InvalidTag(String),

    /// Missing required field.
    #[error("missing required field: tag {tag}")]
    MissingRequiredField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// Invalid field value for the expected type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },
}

/// Errors in session configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// A required setting was not provided.
    #[error("missing setting: {name}")]
    MissingSetting {
        /// Name of the setting or environment variable.
        name: String,
    },

    /// A setting was provided but could not be used.
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Errors from the blocking TCP transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// All connect attempts failed.
    #[error("connect failed after {attempts} attempts: {reason}")]
    ConnectFailed {
        /// Number of attempts made in this connect cycle.
        attempts: u32,
        /// Error reported by the last attempt.
        reason: String,
    },

    /// Operation requires an open connection.
    #[error("not connected")]
    NotConnected,

    /// The counterparty closed the connection.
    #[error("connection closed by peer")]
    Closed,

    /// I/O error on the socket.
    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}
