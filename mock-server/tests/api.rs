use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_id, Echo, SERVER_ID_HEADER};
use tower::ServiceExt;
use uuid::Uuid;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

// --- status ---

#[tokio::test]
async fn status_route_returns_requested_code() {
    for code in [200u16, 201, 204, 301, 404, 500, 503] {
        let resp = app().oneshot(get(&format!("/status/{code}"))).await.unwrap();
        assert_eq!(resp.status().as_u16(), code);
    }
}

#[tokio::test]
async fn status_route_rejects_out_of_range_code() {
    let resp = app().oneshot(get("/status/1000")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_route_rejects_non_numeric_code() {
    let resp = app().oneshot(get("/status/teapot")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- server id ---

#[tokio::test]
async fn responses_carry_server_id() {
    let id = Uuid::new_v4();
    let resp = app_with_id(id).oneshot(get("/status/200")).await.unwrap();
    assert_eq!(
        resp.headers()[SERVER_ID_HEADER].to_str().unwrap(),
        id.to_string()
    );
}

// --- echo ---

#[tokio::test]
async fn echo_reflects_method_headers_and_body() {
    let id = Uuid::new_v4();
    let req = Request::builder()
        .method("PUT")
        .uri("/echo")
        .header(http::header::CONTENT_TYPE, "text/plain")
        .header("x-trace", "one")
        .header("x-trace", "two")
        .body("hello".to_string())
        .unwrap();

    let resp = app_with_id(id).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let echo: Echo = body_json(resp).await;
    assert_eq!(echo.server_id, id);
    assert_eq!(echo.method, "PUT");
    assert_eq!(echo.path, "/echo");
    assert_eq!(echo.body, "hello");
    let traces: Vec<_> = echo
        .headers
        .iter()
        .filter(|(name, _)| name == "x-trace")
        .map(|(_, value)| value.as_str())
        .collect();
    assert_eq!(traces, vec!["one", "two"]);
}

// --- headers ---

#[tokio::test]
async fn headers_route_repeats_values_in_order() {
    let resp = app().oneshot(get("/headers")).await.unwrap();
    let values: Vec<_> = resp
        .headers()
        .get_all("x-multi")
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["a", "b", "c"]);
}

// --- empty / delay ---

#[tokio::test]
async fn empty_route_has_no_body() {
    let resp = app().oneshot(get("/empty")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_bytes(resp).await.is_empty());
}

#[tokio::test]
async fn delay_route_waits_then_succeeds() {
    let started = std::time::Instant::now();
    let resp = app().oneshot(get("/delay/50")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(started.elapsed() >= std::time::Duration::from_millis(50));
    assert_eq!(body_bytes(resp).await, "slept 50ms");
}

#[tokio::test]
async fn unknown_route_returns_404() {
    let resp = app().oneshot(get("/nope")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
