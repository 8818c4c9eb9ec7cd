//! Error types for frame decoding and socket handling.

use std::io;

use thiserror::Error;

/// Errors raised while decoding a motion-capture frame.
///
/// Decode errors are never fatal: the tracker drops the frame and keeps
/// listening.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Not enough bytes in the buffer to hold the fixed frame layout.
    #[error("Truncated frame: need {needed} bytes, got {got}")]
    Truncated { needed: usize, got: usize },

    /// The bytes are long enough but structurally invalid.
    #[error("Malformed frame at offset {offset}: {message}")]
    Malformed { offset: usize, message: String },
}

/// Errors raised by the UDP side of the tracker.
#[derive(Debug, Error)]
pub enum IoError {
    /// The bind address is not a valid IP address.
    #[error("Invalid bind address: {addr}")]
    InvalidAddress { addr: String },

    /// The address/port could not be bound.
    #[error("Cannot bind to {addr}: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The OS reported the socket as unusable during a receive.
    #[error("Receive failed: {source}")]
    ReceiveFailed {
        #[source]
        source: io::Error,
    },

    /// The tracker was closed, either explicitly or after a fatal error.
    #[error("Tracker is closed")]
    Closed,
}
