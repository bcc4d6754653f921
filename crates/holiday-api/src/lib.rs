//! holiday-api: HTTP API layer
//!
//! This crate provides the API layer including:
//! - HTTP endpoints via Axum
//! - Middleware (request IDs, logging, metrics)
//! - Observability setup (structured logging, Prometheus)
//! - The startup smoke test
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 holiday-api                  │
//! ├─────────────────────────────────────────────┤
//! │  http/          - HTTP endpoints            │
//! │  middleware/    - Request ID, logs, metrics │
//! │  observability/ - Logging & Prometheus      │
//! │  smoke.rs       - Startup self-check        │
//! └─────────────────────────────────────────────┘
//! ```

pub mod http;
pub mod middleware;
pub mod observability;
pub mod smoke;
