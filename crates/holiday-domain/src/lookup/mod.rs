//! Single-date holiday lookup.
//!
//! The lookup fetches the full yearly calendar for the requested country,
//! indexes it by date and looks up the exact date string.
//!
//! # Design Decisions
//!
//! - **No caching**: every lookup fetches the calendar again. The index lives
//!   only for the duration of one call.
//! - **Garbage in, garbage propagated**: the year is the text before the first
//!   `-` of the date, forwarded without validation. Malformed dates surface as
//!   upstream errors rather than local parse errors.
//! - **Upstream failures**: absorbed into `NotFound` by default so that
//!   single-date queries never hard-fail. `UpstreamFailurePolicy::Propagate`
//!   makes them distinguishable from a negative answer.

mod single_date;
mod traits;

pub use single_date::{year_of, LookupOutcome, SingleDateLookup, UpstreamFailurePolicy};
pub use traits::CalendarSource;

#[cfg(test)]
mod tests;
