//! holiday-upstream: Calendar provider implementations
//!
//! This crate provides the `CalendarSource` implementations, including:
//! - `HttpCalendarClient` for the public holiday provider REST API
//! - `MemoryCalendarSource`, an in-memory fixture for tests and demos
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              holiday-upstream                │
//! ├─────────────────────────────────────────────┤
//! │  client.rs - reqwest-backed provider client │
//! │  memory.rs - In-memory implementation       │
//! └─────────────────────────────────────────────┘
//! ```

pub mod client;
pub mod memory;

// Re-export commonly used types
pub use client::{HttpCalendarClient, UpstreamConfig, DEFAULT_UPSTREAM_BASE_URL};
pub use holiday_domain::{CalendarSource, UpstreamError, UpstreamResult};
pub use memory::MemoryCalendarSource;
