use std::time::Duration;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use uuid::Uuid;

/// Response header carrying the id of the instance that answered.
pub const SERVER_ID_HEADER: &str = "x-server-id";

#[derive(Clone, Copy, Debug)]
struct Instance {
    id: Uuid,
}

/// What `/echo` saw, returned as JSON.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Echo {
    pub server_id: Uuid,
    pub method: String,
    pub path: String,
    /// Request headers in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: String,
}

pub fn app() -> Router {
    app_with_id(Uuid::new_v4())
}

pub fn app_with_id(id: Uuid) -> Router {
    Router::new()
        .route("/status/{code}", get(status))
        .route("/delay/{ms}", get(delay))
        .route("/headers", get(repeated_headers))
        .route("/empty", get(empty))
        .route("/echo", any(echo))
        .with_state(Instance { id })
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_id(listener: TcpListener, id: Uuid) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_id(id)).await
}

fn tag(instance: Instance, mut response: Response) -> Response {
    if let Ok(value) = HeaderValue::from_str(&instance.id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(SERVER_ID_HEADER), value);
    }
    response
}

fn tagged(instance: Instance, status: StatusCode, body: String) -> Response {
    tag(instance, (status, body).into_response())
}

async fn status(State(instance): State<Instance>, Path(code): Path<u16>) -> Response {
    match StatusCode::from_u16(code) {
        Ok(status) => tagged(instance, status, format!("status {code}")),
        Err(_) => tagged(instance, StatusCode::BAD_REQUEST, format!("bad status {code}")),
    }
}

async fn delay(State(instance): State<Instance>, Path(ms): Path<u64>) -> Response {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    tagged(instance, StatusCode::OK, format!("slept {ms}ms"))
}

async fn repeated_headers(State(instance): State<Instance>) -> Response {
    let mut response = tagged(instance, StatusCode::OK, "multi".to_string());
    for value in ["a", "b", "c"] {
        response
            .headers_mut()
            .append(HeaderName::from_static("x-multi"), HeaderValue::from_static(value));
    }
    response
}

async fn empty(State(instance): State<Instance>) -> Response {
    tagged(instance, StatusCode::OK, String::new())
}

async fn echo(
    State(instance): State<Instance>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let headers = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();
    let echo = Echo {
        server_id: instance.id,
        method: method.to_string(),
        path: uri.path().to_string(),
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    };
    tag(instance, Json(echo).into_response())
}
