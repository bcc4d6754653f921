//! HTTP request metrics middleware.
//!
//! Emits through the `metrics` facade:
//!
//! - `holidays_http_requests_total` - counter labelled by method, route, status_class
//! - `holidays_http_request_duration_seconds` - histogram with the same labels
//!
//! The route label is the matched pattern (`/isHoliday/:date/:country_code`),
//! never the raw path, so dates do not become label values.

use std::{
    future::Future,
    pin::Pin,
    task::{Context, Poll},
    time::Instant,
};

use axum::{
    extract::MatchedPath,
    http::{Request, Response},
};
use tower::{Layer, Service};

const UNMATCHED_ROUTE: &str = "unmatched";

fn status_class(status: u16) -> &'static str {
    match status {
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        500..=599 => "5xx",
        _ => "other",
    }
}

/// Records one finished request against the installed recorder.
pub fn record_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status_class", status_class(status).to_string()),
    ];
    metrics::counter!("holidays_http_requests_total", &labels).increment(1);
    metrics::histogram!("holidays_http_request_duration_seconds", &labels).record(duration_secs);
}

/// Layer that calls [`record_request`] once per response.
#[derive(Clone, Default)]
pub struct MetricsLayer;

impl MetricsLayer {
    pub fn new() -> Self {
        Self
    }
}

impl<S> Layer<S> for MetricsLayer {
    type Service = MetricsService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        MetricsService { inner }
    }
}

#[derive(Clone)]
pub struct MetricsService<S> {
    inner: S,
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for MetricsService<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>> + Clone + Send + 'static,
    S::Future: Send,
    ReqBody: Send + 'static,
    ResBody: Default + Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request<ReqBody>) -> Self::Future {
        let start = Instant::now();
        let method = request.method().to_string();
        let route = request
            .extensions()
            .get::<MatchedPath>()
            .map_or(UNMATCHED_ROUTE, |p| p.as_str())
            .to_string();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let response = inner.call(request).await?;
            record_request(
                &method,
                &route,
                response.status().as_u16(),
                start.elapsed().as_secs_f64(),
            );
            Ok(response)
        })
    }
}
