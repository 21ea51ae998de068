//! Request wrapper handed to the adapter by the load-balancing runtime.
//!
//! # Design
//! The caller's `HttpRequest` is held behind an `Arc` and never mutated. A
//! retry against another server calls [`LbRequest::with_uri`], which produces
//! a new wrapper sharing the same immutable request but pointing at a
//! different target. Nothing else is shared between the two.

use std::sync::Arc;

use ::http::Uri;

use crate::config::RequestConfig;
use crate::http::HttpRequest;

/// One attempt of an HTTP request against a resolved server URI.
#[derive(Debug, Clone)]
pub struct LbRequest {
    request: Arc<HttpRequest>,
    uri: Uri,
    overrides: Option<RequestConfig>,
}

impl LbRequest {
    pub fn new(request: impl Into<Arc<HttpRequest>>, uri: Uri) -> Self {
        Self {
            request: request.into(),
            uri,
            overrides: None,
        }
    }

    pub fn with_overrides(mut self, overrides: RequestConfig) -> Self {
        self.overrides = Some(overrides);
        self
    }

    /// The caller's request, exactly as built.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Target URI for this attempt.
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    pub fn overrides(&self) -> Option<&RequestConfig> {
        self.overrides.as_ref()
    }

    /// Copy of this attempt aimed at `uri`. Overrides carry over.
    pub fn with_uri(&self, uri: Uri) -> Self {
        Self {
            request: Arc::clone(&self.request),
            uri,
            overrides: self.overrides,
        }
    }

    /// The request to send on the wire: the caller's method, headers and body
    /// addressed to this attempt's URI.
    pub fn to_request(&self) -> HttpRequest {
        HttpRequest {
            method: self.request.method.clone(),
            url: self.uri.to_string(),
            headers: self.request.headers.clone(),
            body: self.request.body.clone(),
        }
    }
}
