//! Test utilities for CLI testing
//!
//! Provides a mock RPC server that answers `getStatus` and `getAllCurves`
//! with scriptable bodies and failures.

use anyhow::Result;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use fanpanel_core::api::{ApiResponse, CURVES_PATH, STATUS_PATH};
use rand::Rng;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

const DEFAULT_CURVES: &str = r#"{"status":"success","data":{
    "quiet":[{"temp":30,"pwm":40},{"temp":50,"pwm":80},{"temp":70,"pwm":150},{"temp":85,"pwm":255}],
    "balanced":[{"temp":30,"pwm":60},{"temp":45,"pwm":100},{"temp":60,"pwm":150},{"temp":75,"pwm":200},{"temp":85,"pwm":255}],
    "performance":[{"temp":25,"pwm":100},{"temp":40,"pwm":150},{"temp":55,"pwm":200},{"temp":70,"pwm":255}],
    "custom":[{"temp":30,"pwm":60},{"temp":45,"pwm":100},{"temp":60,"pwm":150},{"temp":75,"pwm":200},{"temp":85,"pwm":255}]
}}"#;

/// Mock server state
#[derive(Debug, Clone)]
pub struct MockServerState {
    /// Raw `data` of the status envelope
    status: Arc<Mutex<Value>>,
    /// When set, status requests get an error envelope with this message
    status_error: Arc<Mutex<Option<String>>>,
    /// Full curves response body, served verbatim to keep key order
    curves_body: Arc<Mutex<String>>,
    /// Upcoming status requests to answer with HTTP 500
    fail_next: Arc<AtomicUsize>,
    /// Add a little noise to `fan_rpm`
    jitter: Arc<AtomicBool>,
    status_requests: Arc<AtomicUsize>,
}

impl Default for MockServerState {
    fn default() -> Self {
        let status = json!({
            "fan_rpm": 1200,
            "fan_pwm": 120,
            "fan_percentage": 47,
            "fan_mode": 2,
            "fan_mode_desc": "Auto",
            "uci_mode": "auto",
            "uci_preset": "balanced",
            "temp_cpu": 52,
            "temp_board": 45,
            "temp_phy1": 58,
            "temp_phy2": 49,
            "wifi_24g": 41,
            "wifi_5g": 63,
            "wifi_6g": 72
        });

        Self {
            status: Arc::new(Mutex::new(status)),
            status_error: Arc::new(Mutex::new(None)),
            curves_body: Arc::new(Mutex::new(DEFAULT_CURVES.to_string())),
            fail_next: Arc::new(AtomicUsize::new(0)),
            jitter: Arc::new(AtomicBool::new(false)),
            status_requests: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl MockServerState {
    pub fn set_status(&self, status: Value) {
        *self.status.lock().unwrap() = status;
    }

    pub fn set_status_error(&self, error: Option<&str>) {
        *self.status_error.lock().unwrap() = error.map(str::to_string);
    }

    pub fn set_curves_body(&self, body: &str) {
        *self.curves_body.lock().unwrap() = body.to_string();
    }

    pub fn fail_next_status(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    pub fn set_jitter(&self, enabled: bool) {
        self.jitter.store(enabled, Ordering::SeqCst);
    }

    pub fn status_requests(&self) -> usize {
        self.status_requests.load(Ordering::SeqCst)
    }
}

/// Mock server implementation
#[derive(Debug)]
pub struct MockServer {
    state: MockServerState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockServerState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server and return the address
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockServerState {
        &self.state
    }

    fn create_router(&self) -> Router {
        Router::new()
            .route(STATUS_PATH, get(status_handler))
            .route(CURVES_PATH, get(curves_handler))
            .with_state(self.state.clone())
    }
}

async fn status_handler(State(state): State<MockServerState>) -> Response {
    state.status_requests.fetch_add(1, Ordering::SeqCst);

    let failing = state
        .fail_next
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if failing {
        return (StatusCode::INTERNAL_SERVER_ERROR, "scripted failure").into_response();
    }

    if let Some(error) = state.status_error.lock().unwrap().clone() {
        return Json(ApiResponse::<Value>::error(error)).into_response();
    }

    let mut status = state.status.lock().unwrap().clone();
    if state.jitter.load(Ordering::SeqCst) {
        if let Some(rpm) = status.get("fan_rpm").and_then(Value::as_i64) {
            let noise: i64 = rand::thread_rng().gen_range(-25..=25);
            status["fan_rpm"] = json!((rpm + noise).max(0));
        }
    }

    Json(ApiResponse::success(status)).into_response()
}

async fn curves_handler(State(state): State<MockServerState>) -> Response {
    let body = state.curves_body.lock().unwrap().clone();
    ([(header::CONTENT_TYPE, "application/json")], body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let server = MockServer::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (_, url) = MockServer::new().start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}{}", url, STATUS_PATH))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());

        let json: ApiResponse<Value> = response.json().await.unwrap();
        match json {
            ApiResponse::Success { data } => {
                assert_eq!(data["fan_rpm"], 1200);
                assert_eq!(data["fan_mode_desc"], "Auto");
            }
            _ => panic!("Expected success response"),
        }
    }

    #[tokio::test]
    async fn test_scripted_failures_run_out() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server.state().fail_next_status(2);

        let client = reqwest::Client::new();
        let status_url = format!("{}{}", url, STATUS_PATH);
        for expected in [500, 500, 200] {
            let response = client.get(&status_url).send().await.unwrap();
            assert_eq!(response.status().as_u16(), expected);
        }
        assert_eq!(server.state().status_requests(), 3);
    }

    #[tokio::test]
    async fn test_jitter_stays_close() {
        let (server, url) = MockServer::new().start().await.unwrap();
        server.state().set_jitter(true);

        let client = reqwest::Client::new();
        let json: Value = client
            .get(format!("{}{}", url, STATUS_PATH))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        let rpm = json["data"]["fan_rpm"].as_i64().unwrap();
        assert!((1175..=1225).contains(&rpm));
    }
}
