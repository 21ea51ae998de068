//! Response wrapper returned to the load-balancing runtime.

use ::http::Uri;

use crate::headers::Headers;
use crate::http::HttpResponse;

/// A plain response paired with the URI it was fetched from. Read-only.
#[derive(Debug, Clone)]
pub struct LbResponse {
    uri: Uri,
    response: HttpResponse,
}

impl LbResponse {
    pub fn new(uri: Uri, response: HttpResponse) -> Self {
        Self { uri, response }
    }

    pub fn requested_uri(&self) -> &Uri {
        &self.uri
    }

    pub fn status(&self) -> u16 {
        self.response.status
    }

    /// True only for status 200. Other 2xx codes and redirects are not
    /// success for the runtime's purposes.
    pub fn is_success(&self) -> bool {
        self.response.status == 200
    }

    /// Whether a body was sent at all, regardless of status.
    pub fn has_payload(&self) -> bool {
        self.response.body.is_some()
    }

    pub fn payload(&self) -> Option<&[u8]> {
        self.response.body.as_deref()
    }

    pub fn headers(&self) -> &Headers {
        &self.response.headers
    }

    pub fn into_response(self) -> HttpResponse {
        self.response
    }
}
