//! Plain HTTP request and response types.
//!
//! # Design
//! These types describe one HTTP exchange as plain data, with no notion of
//! servers, retries or load balancing. The adapter wraps them; the delegate
//! HTTP client executes them. Both are treated as immutable once built.

use ::http::Method;

use crate::headers::Headers;

/// An HTTP request described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: Method,
    /// Absolute or relative URL.
    pub url: String,
    pub headers: Headers,
    pub body: Option<Vec<u8>>,
}

impl HttpRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: Headers::new(),
            body: None,
        }
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.add(key, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Headers,
    /// `None` when the server sent no body at all.
    pub body: Option<Vec<u8>>,
}
