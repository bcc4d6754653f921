//! Prometheus metrics.
//!
//! Metric names are described here; they are recorded where the work
//! happens:
//!
//! - `holidays_http_requests_total`, `holidays_http_request_duration_seconds` (middleware)
//! - `holidays_upstream_requests_total`, `holidays_upstream_request_duration_seconds` (upstream client)
//! - `holidays_lookups_total` (single-date lookup)
//! - `holidays_batch_size`, `holidays_batch_failures_total` (batch aggregator)

use std::sync::Arc;

use axum::{extract::State, http::header::CONTENT_TYPE, response::IntoResponse};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Shared handle used to render the Prometheus exposition.
#[derive(Clone)]
pub struct MetricsState {
    handle: Arc<PrometheusHandle>,
}

impl MetricsState {
    pub fn new(handle: PrometheusHandle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("failed to install Prometheus recorder: recorder already installed")]
    AlreadyInstalled,
}

/// Installs the global Prometheus recorder.
///
/// # Errors
///
/// Returns [`MetricsError::AlreadyInstalled`] if a recorder already exists.
pub fn init_metrics() -> Result<MetricsState, MetricsError> {
    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|_| MetricsError::AlreadyInstalled)?;

    describe_metrics();

    Ok(MetricsState::new(handle))
}

fn describe_metrics() {
    metrics::describe_counter!(
        "holidays_http_requests_total",
        "Total number of HTTP requests"
    );
    metrics::describe_histogram!(
        "holidays_http_request_duration_seconds",
        "HTTP request duration in seconds"
    );
    metrics::describe_counter!(
        "holidays_upstream_requests_total",
        "Calendar fetches from the upstream provider by outcome"
    );
    metrics::describe_histogram!(
        "holidays_upstream_request_duration_seconds",
        "Upstream calendar fetch duration in seconds"
    );
    metrics::describe_counter!(
        "holidays_lookups_total",
        "Single-date lookups by result (found, not_found, error)"
    );
    metrics::describe_histogram!(
        "holidays_batch_size",
        "Number of dates per batch request"
    );
    metrics::describe_counter!(
        "holidays_batch_failures_total",
        "Batches aborted by a failed sub-check, by entry point"
    );
}

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Handler for `/metrics`.
pub async fn metrics_handler(State(state): State<MetricsState>) -> impl IntoResponse {
    ([(CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], state.render())
}
