//! Logging and metrics setup for the binary.
//!
//! - Structured logging (`tracing-subscriber`, JSON or pretty text)
//! - Prometheus recorder and the `/metrics` handler

mod logging;
mod metrics;

pub use logging::{create_json_layer, init_logging, LoggingConfig};
pub use metrics::{init_metrics, metrics_handler, MetricsError, MetricsState};
