//! Load-balanced HTTP client adapter.
//!
//! # Overview
//! Bridges a plain, blocking HTTP client to a load-balancing runtime that
//! picks servers from a dynamic pool and drives retries and circuit-breaking.
//! The adapter translates between the runtime's request/response wrappers and
//! plain HTTP values, resolves per-attempt timeouts, and classifies failures.
//!
//! # Design
//! - `LbClient` is immutable after construction and safe to share across
//!   threads; per-attempt state lives in `LbRequest` / `LbResponse`.
//! - Configuration is validated once, in `LbClient::new`.
//! - The adapter never retries and never hides a failure: it returns delegate
//!   errors as-is and exposes pure classification predicates instead.
//! - Classification and target resolution are injected strategies.
//! - `UreqClient` is a ready-made blocking delegate; any `Client` works.

pub mod adapter;
pub mod balancer;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod request;
pub mod response;
pub mod target;
pub mod transport;

pub use adapter::{LbClient, LoadBalancedClient};
pub use balancer::{LoadBalancer, Server};
pub use classify::{Classification, DefaultClassifier, FailureClassifier};
pub use client::{Client, RequestOptions};
pub use config::{ClientConfig, ConfigKey, RequestConfig, Timeouts};
pub use error::{ClientError, ConfigError, RetryableError, TransportError, TransportErrorKind};
pub use headers::{HeaderSnapshot, Headers};
pub use crate::http::{HttpRequest, HttpResponse};
pub use request::LbRequest;
pub use response::LbResponse;
pub use target::{RequestSchemeResolver, Target, TargetResolver, DEFAULT_PORT};
pub use transport::UreqClient;
