//! Contract for the plain HTTP client the adapter delegates to.
//!
//! # Design
//! The adapter never opens sockets itself. It hands a fully resolved
//! `HttpRequest` plus the effective timeouts to a `Client`, which performs the
//! blocking round-trip. Implementations must be shareable across threads since
//! the load-balancing runtime calls the adapter concurrently.

use std::time::Duration;

use crate::error::TransportError;
use crate::http::{HttpRequest, HttpResponse};

/// Timeouts applied to one delegated call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    pub connect_timeout: Duration,
    pub read_timeout: Duration,
}

impl RequestOptions {
    pub fn from_millis(connect_ms: u64, read_ms: u64) -> Self {
        Self {
            connect_timeout: Duration::from_millis(connect_ms),
            read_timeout: Duration::from_millis(read_ms),
        }
    }
}

/// Executes a single HTTP exchange.
///
/// Any non-transport outcome, including 4xx/5xx statuses, is a successful
/// return; only I/O failures are errors.
pub trait Client: Send + Sync {
    fn execute(
        &self,
        request: &HttpRequest,
        options: &RequestOptions,
    ) -> Result<HttpResponse, TransportError>;
}
