//! Error types for the load-balanced client.
//!
//! # Design
//! `ConfigError` only ever surfaces from construction, so a client that exists
//! is always fully configured. Everything that can go wrong during a request
//! attempt is a `ClientError`: either a raw `TransportError` from the delegate
//! HTTP client, or a `RetryableError` raised by the application layer to say
//! the attempt may be repeated elsewhere. The two are kept apart because they
//! drive different decisions in the load-balancing runtime.

use std::time::Duration;

use thiserror::Error;

use crate::config::ConfigKey;

/// Invalid or missing client configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("missing required setting {key}")]
    Missing { key: ConfigKey },

    #[error("invalid value {value:?} for {key}: expected a positive integer of milliseconds")]
    Invalid { key: ConfigKey, value: String },

    #[error("malformed configuration: {0}")]
    Json(String),
}

/// Broad category of a transport failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportErrorKind {
    ConnectionRefused,
    ConnectionReset,
    Timeout,
    Io,
    /// The request could not be turned into a valid wire request.
    InvalidRequest,
}

/// I/O-level failure while executing a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("transport error ({kind:?}): {message}")]
pub struct TransportError {
    pub kind: TransportErrorKind,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        let kind = match err.kind() {
            ErrorKind::ConnectionRefused => TransportErrorKind::ConnectionRefused,
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
                TransportErrorKind::ConnectionReset
            }
            ErrorKind::TimedOut | ErrorKind::WouldBlock => TransportErrorKind::Timeout,
            _ => TransportErrorKind::Io,
        };
        Self::new(kind, err.to_string())
    }
}

/// Application-layer signal that a failed attempt is safe to repeat against
/// another server.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("retryable: {message}")]
pub struct RetryableError {
    pub message: String,
    /// Server-provided hint for how long to wait before retrying.
    pub retry_after: Option<Duration>,
    #[source]
    pub source: Option<TransportError>,
}

impl RetryableError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            retry_after: None,
            source: None,
        }
    }

    pub fn with_retry_after(mut self, retry_after: Duration) -> Self {
        self.retry_after = Some(retry_after);
        self
    }

    /// Mark a transport failure as safe to retry.
    pub fn caused_by(mut self, source: TransportError) -> Self {
        self.source = Some(source);
        self
    }
}

/// Failure of a single request attempt.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Retryable(#[from] RetryableError),
}
