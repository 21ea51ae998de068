//! Verify timeout resolution and target derivation against JSON test vectors
//! stored in `test-vectors/`.
//!
//! The vectors only describe inputs and expected outcomes, so the same files
//! can be shared with other implementations of the client contract.

use std::sync::Arc;

use http::{Method, Uri};
use lb_client::{
    Client, ClientConfig, HttpRequest, HttpResponse, LbClient, LbRequest, LoadBalancedClient,
    LoadBalancer, RequestConfig, RequestOptions, Server, TransportError,
};

/// Delegate that never gets called; vectors only exercise pure operations.
struct Unreachable;

impl Client for Unreachable {
    fn execute(
        &self,
        request: &HttpRequest,
        _options: &RequestOptions,
    ) -> Result<HttpResponse, TransportError> {
        panic!("unexpected network call to {}", request.url);
    }
}

struct EmptyPool;

impl LoadBalancer for EmptyPool {
    fn choose_server(&self, _key: Option<&str>) -> Option<Server> {
        None
    }

    fn mark_server_down(&self, _server: &Server) {}

    fn servers(&self) -> Vec<Server> {
        Vec::new()
    }
}

fn client(defaults: &serde_json::Value) -> LbClient {
    let raw = serde_json::to_string(defaults).unwrap();
    let config = ClientConfig::from_json("vectors", &raw).unwrap();
    LbClient::new(Arc::new(Unreachable), Arc::new(EmptyPool), &config).unwrap()
}

// ---------------------------------------------------------------------------
// Timeouts
// ---------------------------------------------------------------------------

#[test]
fn timeout_test_vectors() {
    let raw = include_str!("../../test-vectors/timeouts.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client(&vectors["defaults"]);
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let request = LbRequest::new(
            HttpRequest::new(Method::GET, "https://api.example.com/"),
            "https://10.0.0.7/".parse().unwrap(),
        );
        let request = if case["overrides"].is_null() {
            request
        } else {
            let overrides: RequestConfig = serde_json::from_value(case["overrides"].clone()).unwrap();
            request.with_overrides(overrides)
        };

        let expected = &case["expected"];
        let options = c.request_options(&request);
        assert_eq!(
            options,
            RequestOptions::from_millis(
                expected["connect_ms"].as_u64().unwrap(),
                expected["read_ms"].as_u64().unwrap()
            ),
            "{name}"
        );
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

#[test]
fn target_test_vectors() {
    let raw = include_str!("../../test-vectors/targets.json");
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();

    let c = client(&serde_json::json!({ "ConnectTimeout": 1, "ReadTimeout": 1 }));
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let partial: Uri = case["partial_uri"].as_str().unwrap().parse().unwrap();
        let request = HttpRequest::new(Method::GET, case["request_url"].as_str().unwrap());

        let target = c.derive_target(&LbRequest::new(request, partial));

        let expected = &case["expected"];
        assert_eq!(target.scheme, expected["scheme"].as_str().unwrap(), "{name}: scheme");
        assert_eq!(
            u64::from(target.port),
            expected["port"].as_u64().unwrap(),
            "{name}: port"
        );
    }
}
