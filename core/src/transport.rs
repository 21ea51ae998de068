//! Blocking `Client` implementation backed by ureq.
//!
//! # Design
//! One `ureq::Agent` is shared by every call so connections are pooled; the
//! connect and read timeouts are applied per request through
//! `configure_request`, since each attempt may carry different overrides.
//! Status codes are never turned into errors here: a 503 is a response, and
//! deciding what it means belongs to the caller.

use ureq::http::{Request, Response};

use crate::client::{Client, RequestOptions};
use crate::error::{TransportError, TransportErrorKind};
use crate::headers::Headers;
use crate::http::{HttpRequest, HttpResponse};

/// Synchronous HTTP client over a pooled `ureq::Agent`.
#[derive(Clone)]
pub struct UreqClient {
    agent: ureq::Agent,
}

impl UreqClient {
    pub fn new() -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .new_agent();
        Self { agent }
    }

    fn run<S: ureq::AsSendBody>(
        &self,
        request: Request<S>,
        options: &RequestOptions,
    ) -> Result<Response<ureq::Body>, ureq::Error> {
        let configured = self
            .agent
            .configure_request(request)
            .timeout_connect(Some(options.connect_timeout))
            .timeout_recv_response(Some(options.read_timeout))
            .timeout_recv_body(Some(options.read_timeout))
            .build();
        self.agent.run(configured)
    }
}

impl Default for UreqClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Client for UreqClient {
    fn execute(
        &self,
        request: &HttpRequest,
        options: &RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        log::trace!(
            "{} {} (connect {:?}, read {:?})",
            request.method,
            request.url,
            options.connect_timeout,
            options.read_timeout
        );

        let mut builder = Request::builder()
            .method(request.method.clone())
            .uri(request.url.as_str());
        for (name, value) in request.headers.iter() {
            builder = builder.header(name, value);
        }

        let result = match &request.body {
            Some(body) => builder
                .body(body.clone())
                .map_err(invalid_request)
                .and_then(|req| self.run(req, options).map_err(from_ureq)),
            None => builder
                .body(())
                .map_err(invalid_request)
                .and_then(|req| self.run(req, options).map_err(from_ureq)),
        };

        let mut response = result.inspect_err(|err| {
            log::trace!("{} {} failed: {:?}", request.method, request.url, err.kind);
        })?;

        let status = response.status().as_u16();
        let headers: Headers = response
            .headers()
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect();
        // No size cap: an oversized body is not a fault of the server.
        let body = response
            .body_mut()
            .with_config()
            .limit(u64::MAX)
            .read_to_vec()
            .map_err(from_ureq)?;
        log::trace!("{} {} -> {status}", request.method, request.url);

        Ok(HttpResponse {
            status,
            headers,
            body: (!body.is_empty()).then_some(body),
        })
    }
}

fn invalid_request(err: ureq::http::Error) -> TransportError {
    TransportError::new(TransportErrorKind::InvalidRequest, err.to_string())
}

/// Map a ureq failure onto the transport taxonomy.
fn from_ureq(err: ureq::Error) -> TransportError {
    match err {
        ureq::Error::Timeout(timeout) => {
            TransportError::new(TransportErrorKind::Timeout, format!("timed out: {timeout:?}"))
        }
        ureq::Error::Io(io) => TransportError::from(io),
        ureq::Error::Http(_) | ureq::Error::BadUri(_) => {
            TransportError::new(TransportErrorKind::InvalidRequest, err.to_string())
        }
        other => TransportError::new(TransportErrorKind::Io, other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{BufRead, BufReader, Write};
    use std::net::{SocketAddr, TcpListener};

    use super::*;
    use ::http::Method;

    /// Answer a single connection with `head` followed by `body`.
    fn serve_once(head: Vec<u8>, body: Vec<u8>) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        std::thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream);
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let mut stream = reader.into_inner();
            stream.write_all(&head).unwrap();
            stream.write_all(&body).unwrap();
            stream.flush().unwrap();
        });
        addr
    }

    fn get(addr: SocketAddr) -> Result<HttpResponse, TransportError> {
        let request = HttpRequest::new(Method::GET, format!("http://{addr}/"));
        UreqClient::new().execute(&request, &RequestOptions::from_millis(2000, 5000))
    }

    #[test]
    fn bodies_over_ten_mebibytes_are_read_in_full() {
        let body = vec![b'x'; 11 * 1024 * 1024];
        let head = format!(
            "HTTP/1.1 200 OK\r\ncontent-length: {}\r\nconnection: close\r\n\r\n",
            body.len()
        );
        let addr = serve_once(head.into_bytes(), body.clone());

        let response = get(addr).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body.map(|b| b.len()), Some(body.len()));
    }

    #[test]
    fn non_ascii_header_values_are_kept() {
        let mut head = b"HTTP/1.1 200 OK\r\nX-Name: caf".to_vec();
        head.extend_from_slice(&[0xC3, 0xA9]);
        head.extend_from_slice(
            b"\r\nX-Plain: ok\r\ncontent-length: 2\r\nconnection: close\r\n\r\n",
        );
        let addr = serve_once(head, b"hi".to_vec());

        let response = get(addr).unwrap();
        assert_eq!(response.headers.get("x-name"), vec!["caf\u{e9}"]);
        assert_eq!(response.headers.get("x-plain"), vec!["ok"]);
    }

    #[test]
    fn unroutable_url_is_an_invalid_request() {
        let client = UreqClient::new();
        let request = HttpRequest::new(Method::GET, "not a url");
        let err = client
            .execute(&request, &RequestOptions::from_millis(100, 100))
            .unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::InvalidRequest);
    }

    #[test]
    fn refused_connection_is_reported() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let client = UreqClient::new();
        let request = HttpRequest::new(Method::GET, format!("http://{addr}/"));
        let err = client
            .execute(&request, &RequestOptions::from_millis(500, 500))
            .unwrap_err();
        assert!(
            matches!(
                err.kind,
                TransportErrorKind::ConnectionRefused | TransportErrorKind::Io
            ),
            "unexpected kind {:?}",
            err.kind
        );
    }
}
