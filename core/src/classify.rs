//! Failure classification for retry and circuit-breaking decisions.
//!
//! # Design
//! Two independent questions are asked of every failure. Did the server
//! misbehave at the transport level (count it against the server's health)?
//! Did the application say the attempt is safe to repeat (try another
//! server)? Any transport failure answers yes to the first, except a request
//! that never became a valid wire request; no server saw it. Only an explicit
//! `RetryableError` answers yes to the second; a bare I/O error may have
//! reached the server, and repeating a non-idempotent request is not ours to
//! decide.

use crate::error::{ClientError, TransportError, TransportErrorKind};

/// Outcome of classifying one failed attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Classification {
    pub circuit_breaker_signal: bool,
    pub retriable: bool,
}

/// Strategy the adapter consults to classify failures. Must be pure.
pub trait FailureClassifier: Send + Sync {
    fn is_circuit_breaker_signal(&self, err: &ClientError) -> bool;

    fn is_retriable(&self, err: &ClientError) -> bool;

    fn classify(&self, err: &ClientError) -> Classification {
        Classification {
            circuit_breaker_signal: self.is_circuit_breaker_signal(err),
            retriable: self.is_retriable(err),
        }
    }
}

/// Transport failures trip the breaker; only explicit retryable errors retry.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultClassifier;

impl FailureClassifier for DefaultClassifier {
    fn is_circuit_breaker_signal(&self, err: &ClientError) -> bool {
        match err {
            ClientError::Transport(source) => reached_server(source),
            ClientError::Retryable(retryable) => {
                retryable.source.as_ref().is_some_and(reached_server)
            }
        }
    }

    fn is_retriable(&self, err: &ClientError) -> bool {
        matches!(err, ClientError::Retryable(_))
    }
}

fn reached_server(err: &TransportError) -> bool {
    err.kind != TransportErrorKind::InvalidRequest
}
