//! Scheme and port resolution for a load-balanced attempt.
//!
//! The runtime hands over a partial URI naming the chosen server's host and,
//! sometimes, its port. The scheme always comes from the request the caller
//! built; the port comes from the partial URI, then from the request URL, and
//! finally from the resolver's default.

use ::http::Uri;

/// Port used when neither the partial URI nor the request URL names one.
pub const DEFAULT_PORT: u16 = 443;

const DEFAULT_SCHEME: &str = "https";

/// Scheme and port an attempt should connect with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub scheme: String,
    pub port: u16,
}

/// Strategy for deriving a [`Target`].
pub trait TargetResolver: Send + Sync {
    fn derive_target(&self, partial_uri: &Uri, request_url: &str) -> Target;

    fn default_port(&self) -> u16 {
        DEFAULT_PORT
    }
}

/// Takes the scheme from the request's own URL.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSchemeResolver;

impl TargetResolver for RequestSchemeResolver {
    fn derive_target(&self, partial_uri: &Uri, request_url: &str) -> Target {
        let scheme = scheme_of(request_url)
            .or_else(|| partial_uri.scheme_str())
            .unwrap_or(DEFAULT_SCHEME)
            .to_ascii_lowercase();

        let port = partial_uri
            .port_u16()
            .or_else(|| port_of(request_url))
            .unwrap_or_else(|| self.default_port());

        Target { scheme, port }
    }
}

/// Scheme of an absolute URL, read from the text before `://`. Other parts of
/// the URL need not be well formed.
fn scheme_of(url: &str) -> Option<&str> {
    let (scheme, _) = url.split_once("://")?;
    let mut chars = scheme.chars();
    let valid = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    valid.then_some(scheme)
}

/// Explicit port of an absolute URL, if any.
fn port_of(url: &str) -> Option<u16> {
    scheme_of(url)?;
    let (_, rest) = url.split_once("://")?;
    let authority = rest
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(rest)
        .rsplit('@')
        .next()
        .unwrap_or(rest);
    // Bracketed IPv6 hosts contain colons of their own.
    let host_end = authority.rfind(']').map_or(0, |i| i + 1);
    let (_, port) = authority[host_end..].rsplit_once(':')?;
    port.parse().ok()
}
