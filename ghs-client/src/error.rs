//! Client error types.

use ghs_protocol::{ProtocolError, ReturnValue};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Client errors.
///
/// These never cross the public transaction boundary: each one is reported
/// to callers as the status code returned by [`ClientError::status`].
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("not connected")]
    NotConnected,

    #[error("already connected")]
    AlreadyConnected,

    #[error("connection refused")]
    Refused,

    #[error("connect failed: {0}")]
    Connect(#[source] io::Error),

    #[error("could not resolve {host}: {reason}")]
    Resolve { host: String, reason: String },

    #[error("connection limit reached ({limit})")]
    ConnectionLimit { limit: usize },

    #[error("request timeout")]
    Timeout,
}

impl ClientError {
    /// Maps the error onto the status code reported to callers.
    pub fn status(&self) -> ReturnValue {
        match self {
            ClientError::MissingArgument(_) => ReturnValue::NullPtrArgument,
            ClientError::NotConnected => ReturnValue::NoConnection,
            ClientError::AlreadyConnected => ReturnValue::AlreadyConnected,
            ClientError::Refused => ReturnValue::NoConnection,
            ClientError::Connect(_) => ReturnValue::ConnectionFailed,
            ClientError::Resolve { .. } => ReturnValue::ConnectionFailed,
            ClientError::ConnectionLimit { .. } => ReturnValue::ConnectionFailed,
            ClientError::Timeout => ReturnValue::MainframeTimeout,
            ClientError::Io(_) => ReturnValue::NoConnection,
            ClientError::Protocol(e) => e.status(),
        }
    }

    /// Returns whether the connection must be torn down after this error.
    pub fn is_fatal(&self) -> bool {
        match self {
            ClientError::Io(_) | ClientError::Timeout => true,
            ClientError::Protocol(e) => e.is_desync(),
            _ => false,
        }
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {0}: {1}")]
    IoError(PathBuf, #[source] io::Error),

    #[error("failed to parse config file {0}: {1}")]
    ParseError(PathBuf, String),

    #[error("invalid configuration: {0}")]
    ValidationError(String),
}
