//! holiday-server: Request handlers and configuration
//!
//! This crate contains the layer between the HTTP boundary and the domain:
//! - Batch aggregation over many single-date checks
//! - Date checkers (network self-call or in-process)
//! - Configuration management
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               holiday-server                 │
//! ├─────────────────────────────────────────────┤
//! │  config.rs   - Configuration management     │
//! │  handlers/   - Request handlers             │
//! │    batch/         - Multi-date aggregation  │
//! └─────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod handlers;

// Re-exports for convenience
pub use config::{ConfigLoadError, ServerConfig};
