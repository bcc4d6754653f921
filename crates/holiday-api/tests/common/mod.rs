//! Shared helpers for holiday-api integration tests.
//!
//! Every test runs against real sockets: a fake upstream provider and a proxy
//! instance whose batch aggregator calls back into its own listener.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::get,
    Router,
};
use tokio::net::TcpListener;

use holiday_api::http::{create_router, AppState};
use holiday_domain::UpstreamFailurePolicy;
use holiday_server::handlers::batch::{SelfCallChecker, DEFAULT_MAX_BATCH_DATES};
use holiday_upstream::{HttpCalendarClient, UpstreamConfig};

/// Upstream fetch timeout of the spawned proxies.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(2);
/// Self-call timeout; longer than [`UPSTREAM_TIMEOUT`], as in a valid config.
pub const SELF_CALL_TIMEOUT: Duration = Duration::from_secs(5);
/// Timeout of the test's own client.
pub const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);

/// How long the provider stalls before answering for `SLOW`.
pub const SLOW_PROVIDER_DELAY: Duration = Duration::from_secs(3);

pub const US_2021: &str = r#"[
    {"date":"2021-01-01","localName":"New Year's Day","name":"New Year's Day","countryCode":"US","fixed":false,"global":true,"counties":null,"launchYear":null,"types":["Public"]},
    {"date":"2021-07-05","localName":"Independence Day","name":"Independence Day","countryCode":"US","fixed":false,"global":true,"counties":null,"launchYear":null,"types":["Public"]},
    {"date":"2021-12-24","localName":"Christmas Day","name":"Christmas Day","countryCode":"US","fixed":false,"global":true,"counties":null,"launchYear":null,"types":["Public"]}
]"#;

/// Fake provider that counts the calendar fetches it serves.
#[derive(Clone, Default)]
pub struct FakeProvider {
    hits: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }
}

async fn publicholidays(
    State(provider): State<FakeProvider>,
    Path((year, country)): Path<(String, String)>,
) -> impl IntoResponse {
    provider.hits.fetch_add(1, Ordering::SeqCst);
    if country == "SLOW" {
        tokio::time::sleep(SLOW_PROVIDER_DELAY).await;
    }
    match (year.as_str(), country.as_str()) {
        ("2021", "US") => (StatusCode::OK, US_2021.to_string()),
        ("2021", "BROKEN") => (StatusCode::OK, "<html>maintenance</html>".to_string()),
        ("2021", "SLOW") => (StatusCode::OK, "[]".to_string()),
        (_, "XX") => (StatusCode::NOT_FOUND, String::new()),
        _ => (StatusCode::BAD_REQUEST, "invalid year".to_string()),
    }
}

/// Starts the fake provider on an ephemeral port.
pub async fn spawn_fake_provider() -> (SocketAddr, FakeProvider) {
    let provider = FakeProvider::default();
    let app = Router::new()
        .route("/api/v3/publicholidays/:year/:country", get(publicholidays))
        .with_state(provider.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, provider)
}

/// Starts a proxy in self-call mode backed by the provider at `upstream`.
///
/// Batch sub-checks go over HTTP to the proxy's own listener.
pub async fn spawn_self_call_proxy(upstream: SocketAddr) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    spawn_proxy(listener, upstream, &addr.to_string()).await;
    addr
}

/// Starts a proxy whose self-calls target `self_address` instead of itself.
pub async fn spawn_proxy_with_self_address(upstream: SocketAddr, self_address: &str) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    spawn_proxy(listener, upstream, self_address).await;
    addr
}

async fn spawn_proxy(listener: TcpListener, upstream: SocketAddr, self_address: &str) {
    let source = Arc::new(
        HttpCalendarClient::new(
            UpstreamConfig::new(format!("http://{upstream}")).with_timeout(UPSTREAM_TIMEOUT),
        )
        .unwrap(),
    );
    let checker = Arc::new(SelfCallChecker::new(self_address, SELF_CALL_TIMEOUT).unwrap());
    let state = AppState::with_checker(
        source,
        UpstreamFailurePolicy::TreatAsNotFound,
        checker,
        DEFAULT_MAX_BATCH_DATES,
    );
    let app = create_router(state);

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
}

/// Stand-in `/isHoliday` that records the `x-request-id` of each call.
#[derive(Clone, Default)]
pub struct IdRecorder {
    seen: Arc<Mutex<Vec<Option<String>>>>,
}

impl IdRecorder {
    pub fn seen(&self) -> Vec<Option<String>> {
        self.seen.lock().unwrap().clone()
    }
}

async fn recorded_is_holiday(
    State(recorder): State<IdRecorder>,
    Path((date, country)): Path<(String, String)>,
    headers: HeaderMap,
) -> String {
    let id = headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    recorder.seen.lock().unwrap().push(id);
    format!("no holidays on {date} in {country}")
}

/// Starts an [`IdRecorder`] on an ephemeral port.
pub async fn spawn_id_recorder() -> (SocketAddr, IdRecorder) {
    let recorder = IdRecorder::default();
    let app = Router::new()
        .route("/isHoliday/:date/:country", get(recorded_is_holiday))
        .with_state(recorder.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, recorder)
}

/// Returns an address nothing is listening on.
pub fn dead_address() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder().timeout(CLIENT_TIMEOUT).build().unwrap()
}
