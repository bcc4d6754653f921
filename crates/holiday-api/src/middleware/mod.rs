//! Tower middleware applied to every route of the binary's router.
//!
//! - Request ID settlement and echo (`x-request-id`)
//! - One tracing span per request
//! - Request/response logging
//! - HTTP request metrics

mod logging;
mod metrics;
mod request_id;
mod tracing_layer;

pub use logging::RequestLoggingLayer;
pub use metrics::{record_request, MetricsLayer};
pub use request_id::{request_id_of, RequestId, RequestIdLayer, REQUEST_ID_HEADER};
pub use tracing_layer::TracingLayer;

#[cfg(test)]
mod tests;
