//! HTTP route definitions and handlers.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{rejection::BytesRejection, Path, State},
    http::{header::CONTENT_TYPE, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, warn};

use holiday_domain::{CalendarSource, UpstreamError};
use holiday_server::handlers::batch::{BatchEntryPoint, BatchError, BatchQuery};

use super::state::AppState;
use crate::middleware::{
    request_id_of, MetricsLayer, RequestIdLayer, RequestLoggingLayer, TracingLayer,
};
use crate::observability::{metrics_handler, MetricsState};

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

const TEXT_PLAIN_UTF8: &str = "text/plain; charset=utf-8";
const APPLICATION_JSON: &str = "application/json";

fn api_routes<C: CalendarSource>() -> Router<Arc<AppState<C>>> {
    Router::new()
        .route("/holidays/:year/:country_code", get(get_holidays::<C>))
        .route("/isHoliday/:date/:country_code", get(is_holiday::<C>))
        .route(
            "/areTheseHolidays/:country_code/:dates",
            get(are_these_holidays::<C>),
        )
        .route(
            "/areTheseHolidaysJSON/:country_code",
            get(are_these_holidays_json::<C>).post(are_these_holidays_json::<C>),
        )
}

/// Creates the HTTP router with the holiday endpoints and `/health`.
///
/// Applies the default body size limit (1MB).
pub fn create_router<C: CalendarSource>(state: AppState<C>) -> Router {
    create_router_with_body_limit(state, DEFAULT_BODY_LIMIT)
}

/// Creates the HTTP router with a custom body size limit.
pub fn create_router_with_body_limit<C: CalendarSource>(
    state: AppState<C>,
    body_limit: usize,
) -> Router {
    api_routes::<C>()
        .route("/health", get(health_check))
        .with_state(Arc::new(state))
        .layer(RequestBodyLimitLayer::new(body_limit))
}

/// Creates the router served by the binary.
///
/// Adds `/metrics` when `metrics_state` is present and wraps every route in
/// the request-id, tracing, logging and metrics middleware.
///
/// # Arguments
///
/// * `state` - Application state
/// * `metrics_state` - Prometheus handle, `None` when metrics are disabled
/// * `body_limit` - Maximum request body size in bytes
pub fn create_router_with_observability<C: CalendarSource>(
    state: AppState<C>,
    metrics_state: Option<MetricsState>,
    body_limit: usize,
) -> Router {
    let mut router = create_router_with_body_limit(state, body_limit);

    if let Some(metrics_state) = metrics_state {
        let metrics_router = Router::new()
            .route("/metrics", get(metrics_handler))
            .with_state(metrics_state);
        router = router.merge(metrics_router);
    }

    // Outermost layer last: the request id must exist before logging sees it.
    router
        .layer(MetricsLayer::new())
        .layer(RequestLoggingLayer::new())
        .layer(TracingLayer::new())
        .layer(RequestIdLayer::new())
}

// ============================================================
// Error Handling
// ============================================================

/// Error codes carried in the `code` field of error bodies.
///
/// Each code maps to one HTTP status via [`ApiError::into_response`].
pub mod error_codes {
    /// Malformed input or a batch rejected by the aggregator.
    pub const VALIDATION_ERROR: &str = "validation_error";
    /// The JSON batch endpoint received a non-JSON Content-Type.
    pub const UNSUPPORTED_MEDIA_TYPE: &str = "unsupported_media_type";
    /// The provider has no calendar for the requested country.
    pub const CALENDAR_NOT_FOUND: &str = "calendar_not_found";
    /// Request body exceeds the configured limit.
    pub const PAYLOAD_TOO_LARGE: &str = "payload_too_large";
    /// The provider failed or a batch sub-check could not complete.
    pub const UPSTREAM_ERROR: &str = "upstream_error";
}

/// JSON error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::VALIDATION_ERROR, message)
    }

    pub fn unsupported_media_type(message: impl Into<String>) -> Self {
        Self::new(error_codes::UNSUPPORTED_MEDIA_TYPE, message)
    }

    pub fn calendar_not_found(message: impl Into<String>) -> Self {
        Self::new(error_codes::CALENDAR_NOT_FOUND, message)
    }

    pub fn payload_too_large(message: impl Into<String>) -> Self {
        Self::new(error_codes::PAYLOAD_TOO_LARGE, message)
    }

    pub fn upstream_error(message: impl Into<String>) -> Self {
        Self::new(error_codes::UPSTREAM_ERROR, message)
    }

    /// Maps a batch failure to the status its entry point reports.
    ///
    /// The plain-list endpoint reports a failed sub-check as a gateway
    /// failure; the JSON endpoint reports it as a bad request carrying the
    /// error message. An oversized batch is a bad request on both.
    pub fn from_batch_error(err: BatchError, entry_point: BatchEntryPoint) -> Self {
        match (&err, entry_point) {
            (BatchError::TooManyDates { .. }, _) => Self::validation_error(err.to_string()),
            (BatchError::SubCheckFailed { .. }, BatchEntryPoint::PlainList) => {
                Self::upstream_error(err.to_string())
            }
            (BatchError::SubCheckFailed { .. }, BatchEntryPoint::JsonList) => {
                Self::validation_error(err.to_string())
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        use error_codes::*;

        let status = match self.code.as_str() {
            VALIDATION_ERROR => StatusCode::BAD_REQUEST,
            UNSUPPORTED_MEDIA_TYPE => StatusCode::UNSUPPORTED_MEDIA_TYPE,
            CALENDAR_NOT_FOUND => StatusCode::NOT_FOUND,
            PAYLOAD_TOO_LARGE => StatusCode::PAYLOAD_TOO_LARGE,
            UPSTREAM_ERROR => StatusCode::BAD_GATEWAY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Calendar fetch failures as seen by `/holidays`.
///
/// The provider's body is never forwarded; only its status shapes the reply.
impl From<UpstreamError> for ApiError {
    fn from(err: UpstreamError) -> Self {
        match &err {
            UpstreamError::Status { status: 404, .. } => {
                ApiError::calendar_not_found("no calendar available for this country")
            }
            UpstreamError::Status { status: 400, .. } => {
                ApiError::validation_error("invalid year or country code")
            }
            _ => ApiError::upstream_error(err.to_string()),
        }
    }
}

// ============================================================
// Handlers
// ============================================================

fn text_response(body: impl Into<axum::body::Body>) -> Response {
    (
        [(CONTENT_TYPE, HeaderValue::from_static(TEXT_PLAIN_UTF8))],
        body.into(),
    )
        .into_response()
}

/// Health check.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /holidays/:year/:country_code`
async fn get_holidays<C: CalendarSource>(
    State(state): State<Arc<AppState<C>>>,
    Path((year, country_code)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    match state.source.fetch_calendar(&year, &country_code).await {
        Ok(records) => Ok(Json(records).into_response()),
        Err(err) => {
            error!(year = %year, country_code = %country_code, error = %err, "calendar fetch failed");
            Err(ApiError::from(err))
        }
    }
}

/// `GET /isHoliday/:date/:country_code`
async fn is_holiday<C: CalendarSource>(
    State(state): State<Arc<AppState<C>>>,
    Path((date, country_code)): Path<(String, String)>,
) -> Result<Response, ApiError> {
    let outcome = state
        .lookup
        .is_holiday(&date, &country_code)
        .await
        .map_err(|err| ApiError::upstream_error(err.to_string()))?;

    Ok(text_response(outcome.render(&date, &country_code)))
}

/// `GET /areTheseHolidays/:country_code/:dates`
async fn are_these_holidays<C: CalendarSource>(
    State(state): State<Arc<AppState<C>>>,
    Path((country_code, dates)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let query = BatchQuery::from_comma_separated(country_code, &dates)
        .with_request_id(request_id_of(&headers));
    let entry_point = BatchEntryPoint::PlainList;

    let response = state
        .batch
        .resolve(&query, entry_point)
        .await
        .map_err(|err| ApiError::from_batch_error(err, entry_point))?;

    Ok(text_response(response.body))
}

/// Request body for the JSON batch endpoint.
#[derive(Debug, Deserialize)]
pub struct DatesListBody {
    #[serde(default, deserialize_with = "deserialize_null_as_empty_vec")]
    pub dates: Vec<String>,
}

fn deserialize_null_as_empty_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// Rejects a Content-Type whose media type is not `application/json`.
///
/// A missing or blank header is accepted.
fn check_json_content_type(headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(value) = headers.get(CONTENT_TYPE) else {
        return Ok(());
    };
    if value.as_bytes().iter().all(u8::is_ascii_whitespace) {
        return Ok(());
    }

    let media_type = value
        .to_str()
        .ok()
        .and_then(|v| v.split(';').next())
        .map(|v| v.trim().to_ascii_lowercase());

    match media_type.as_deref() {
        Some(APPLICATION_JSON) => Ok(()),
        _ => {
            warn!(content_type = ?value, "rejected non-JSON batch body");
            Err(ApiError::unsupported_media_type(
                "Content-Type header is not application/json",
            ))
        }
    }
}

fn body_rejection_to_api_error(rejection: BytesRejection) -> ApiError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large(rejection.body_text())
    } else {
        ApiError::validation_error(rejection.body_text())
    }
}

/// Decodes the first JSON value of `body`; anything after it is ignored.
fn parse_dates_body(body: &[u8]) -> Result<DatesListBody, ApiError> {
    match serde_json::Deserializer::from_slice(body)
        .into_iter::<DatesListBody>()
        .next()
    {
        Some(Ok(parsed)) => Ok(parsed),
        Some(Err(err)) => Err(ApiError::validation_error(err.to_string())),
        None => Err(ApiError::validation_error("request body is empty")),
    }
}

/// `GET|POST /areTheseHolidaysJSON/:country_code`
async fn are_these_holidays_json<C: CalendarSource>(
    State(state): State<Arc<AppState<C>>>,
    Path(country_code): Path<String>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, ApiError> {
    check_json_content_type(&headers)?;

    let body = body.map_err(body_rejection_to_api_error)?;
    let parsed = parse_dates_body(&body)?;

    let query =
        BatchQuery::new(country_code, parsed.dates).with_request_id(request_id_of(&headers));
    let entry_point = BatchEntryPoint::JsonList;

    let response = state
        .batch
        .resolve(&query, entry_point)
        .await
        .map_err(|err| ApiError::from_batch_error(err, entry_point))?;

    Ok(text_response(response.body))
}
