//! Load-balanced client adapter.
//!
//! # Design
//! `LbClient` is what the load-balancing runtime drives. For each attempt the
//! runtime picks a server, asks [`LoadBalancedClient::derive_target`] for the
//! scheme and port, builds an [`LbRequest`] aimed at that server and calls
//! [`LoadBalancedClient::execute`]. On failure it consults the classification
//! predicates to decide whether to penalise the server and whether to try
//! another one. The retry loop itself lives in the runtime.
//!
//! Everything the adapter holds is fixed at construction and only read
//! afterwards, so one instance can be shared across threads without locking.
//! Classification and target resolution are injected strategies; the defaults
//! are [`DefaultClassifier`] and [`RequestSchemeResolver`].

use std::fmt;
use std::sync::Arc;

use crate::balancer::LoadBalancer;
use crate::classify::{Classification, DefaultClassifier, FailureClassifier};
use crate::client::{Client, RequestOptions};
use crate::config::{effective_timeout, ClientConfig, ConfigKey, Timeouts};
use crate::error::{ClientError, ConfigError};
use crate::request::LbRequest;
use crate::response::LbResponse;
use crate::target::{RequestSchemeResolver, Target, TargetResolver};

/// Contract the load-balancing runtime expects from a client.
pub trait LoadBalancedClient: Send + Sync {
    /// Execute one attempt. Failures are returned unchanged.
    fn execute(&self, request: &LbRequest) -> Result<LbResponse, ClientError>;

    fn is_circuit_breaker_signal(&self, err: &ClientError) -> bool;

    fn is_retriable(&self, err: &ClientError) -> bool;

    /// Scheme and port for `request`, whose URI is the runtime's partial URI.
    fn derive_target(&self, request: &LbRequest) -> Target;

    fn default_port(&self) -> u16;
}

/// Adapter from the runtime's contract to a plain [`Client`].
pub struct LbClient {
    name: String,
    delegate: Arc<dyn Client>,
    load_balancer: Arc<dyn LoadBalancer>,
    timeouts: Timeouts,
    classifier: Arc<dyn FailureClassifier>,
    resolver: Arc<dyn TargetResolver>,
}

impl LbClient {
    /// Bind `delegate` to `load_balancer` using the default timeouts in
    /// `config`. Fails if either timeout is missing or invalid.
    pub fn new(
        delegate: Arc<dyn Client>,
        load_balancer: Arc<dyn LoadBalancer>,
        config: &ClientConfig,
    ) -> Result<Self, ConfigError> {
        let timeouts = config.timeouts()?;
        Ok(Self {
            name: config.name().to_string(),
            delegate,
            load_balancer,
            timeouts,
            classifier: Arc::new(DefaultClassifier),
            resolver: Arc::new(RequestSchemeResolver),
        })
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn FailureClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_target_resolver(mut self, resolver: Arc<dyn TargetResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn timeouts(&self) -> Timeouts {
        self.timeouts
    }

    pub fn load_balancer(&self) -> &Arc<dyn LoadBalancer> {
        &self.load_balancer
    }

    /// Effective timeouts for `request`, resolved independently per kind.
    pub fn request_options(&self, request: &LbRequest) -> RequestOptions {
        let overrides = request.overrides();
        RequestOptions {
            connect_timeout: effective_timeout(
                overrides,
                &self.timeouts,
                ConfigKey::ConnectTimeout,
            ),
            read_timeout: effective_timeout(overrides, &self.timeouts, ConfigKey::ReadTimeout),
        }
    }

    pub fn classify(&self, err: &ClientError) -> Classification {
        self.classifier.classify(err)
    }
}

impl LoadBalancedClient for LbClient {
    fn execute(&self, request: &LbRequest) -> Result<LbResponse, ClientError> {
        let options = self.request_options(request);
        let response = self.delegate.execute(&request.to_request(), &options)?;
        Ok(LbResponse::new(request.uri().clone(), response))
    }

    fn is_circuit_breaker_signal(&self, err: &ClientError) -> bool {
        self.classifier.is_circuit_breaker_signal(err)
    }

    fn is_retriable(&self, err: &ClientError) -> bool {
        self.classifier.is_retriable(err)
    }

    fn derive_target(&self, request: &LbRequest) -> Target {
        self.resolver.derive_target(request.uri(), &request.request().url)
    }

    fn default_port(&self) -> u16 {
        self.resolver.default_port()
    }
}

impl fmt::Debug for LbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LbClient")
            .field("name", &self.name)
            .field("timeouts", &self.timeouts)
            .finish_non_exhaustive()
    }
}
