//! holiday-domain: Core holiday lookup logic
//!
//! This crate contains the domain layer including:
//! - The `HolidayRecord` wire shape shared with the upstream provider
//! - `HolidayIndex`, a per-request date-keyed view of one calendar
//! - `SingleDateLookup`, answering "is date D a holiday in country C"
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               holiday-domain                 │
//! ├─────────────────────────────────────────────┤
//! │  model/   - HolidayRecord & HolidayIndex    │
//! │  lookup/  - CalendarSource & date lookup    │
//! │  error.rs - Upstream error taxonomy         │
//! └─────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod lookup;
pub mod model;

// Re-export commonly used types at the crate root
pub use error::{UpstreamError, UpstreamResult};
pub use lookup::{CalendarSource, LookupOutcome, SingleDateLookup, UpstreamFailurePolicy};
pub use model::{HolidayIndex, HolidayRecord};
