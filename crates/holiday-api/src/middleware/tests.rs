use axum::{
    body::Body,
    extract::Path,
    http::{HeaderMap, Request, StatusCode},
    routing::get,
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use tower::ServiceExt;

use super::*;

/// Router with every middleware layer, outermost last.
fn test_app() -> Router {
    Router::new()
        .route(
            "/isHoliday/:date/:country_code",
            get(|Path((date, cc)): Path<(String, String)>| async move {
                format!("no holidays on {date} in {cc}")
            }),
        )
        .route(
            "/span-id",
            get(|axum::Extension(RequestId(id)): axum::Extension<RequestId>| async move { id }),
        )
        .route(
            "/echo-id",
            get(|headers: HeaderMap| async move {
                request_id_of(&headers).unwrap_or_default()
            }),
        )
        .route("/boom", get(|| async { StatusCode::BAD_GATEWAY }))
        .route("/gone", get(|| async { StatusCode::NOT_FOUND }))
        .layer(MetricsLayer::new())
        .layer(RequestLoggingLayer::new())
        .layer(TracingLayer::new())
        .layer(RequestIdLayer::new())
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_request_id_is_generated() {
    let app = test_app();

    let response = app.oneshot(get_request("/echo-id")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let header = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .expect("response carries a request id")
        .to_str()
        .unwrap()
        .to_string();
    assert!(uuid::Uuid::parse_str(&header).is_ok());

    // The handler saw the same id that was returned.
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(String::from_utf8(body.to_vec()).unwrap(), header);
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/echo-id")
                .header(REQUEST_ID_HEADER, "batch-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).unwrap(),
        "batch-42"
    );
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"batch-42");
}

#[tokio::test]
async fn test_request_id_is_stored_in_extensions() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/span-id")
                .header(REQUEST_ID_HEADER, "batch-9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"batch-9");
}

/// Finds the rendered `holidays_http_requests_total` sample carrying `labels`.
fn request_total(rendered: &str, labels: &[&str]) -> Option<String> {
    rendered
        .lines()
        .filter(|line| line.starts_with("holidays_http_requests_total{"))
        .find(|line| labels.iter().all(|label| line.contains(label)))
        .and_then(|line| line.rsplit(' ').next())
        .map(str::to_string)
}

// The local recorder is thread-bound; the default test runtime keeps every
// poll on this thread.
#[tokio::test]
async fn test_metrics_are_recorded_per_route_and_status_class() {
    let recorder = PrometheusBuilder::new().build_recorder();
    let handle = recorder.handle();
    let _guard = ::metrics::set_default_local_recorder(&recorder);
    let app = test_app();

    for uri in ["/isHoliday/2021-07-05/US", "/isHoliday/2021-12-25/GB"] {
        let response = app.clone().oneshot(get_request(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
    let response = app.clone().oneshot(get_request("/boom")).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let response = app.oneshot(get_request("/gone")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let rendered = handle.render();
    assert_eq!(
        request_total(
            &rendered,
            &["route=\"/isHoliday/:date/:country_code\"", "status_class=\"2xx\""]
        )
        .as_deref(),
        Some("2")
    );
    assert_eq!(
        request_total(&rendered, &["route=\"/boom\"", "status_class=\"5xx\""]).as_deref(),
        Some("1")
    );
    assert_eq!(
        request_total(&rendered, &["route=\"/gone\"", "status_class=\"4xx\""]).as_deref(),
        Some("1")
    );
    // Raw dates never become label values.
    assert!(!rendered.contains("2021-07-05"));
}

#[tokio::test]
async fn test_logging_and_tracing_do_not_alter_response() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();

    let app = test_app();

    let response = app
        .oneshot(get_request("/isHoliday/2021-12-25/GB"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), 1024).await.unwrap();
    assert_eq!(&body[..], b"no holidays on 2021-12-25 in GB");
}
