//! Batch holiday checks.
//!
//! A batch names many dates for one country. Each date is resolved by one
//! sub-check, strictly in input order and one at a time, and the answers
//! are concatenated with a trailing newline each.
//!
//! # Sub-check Transport
//!
//! The default `SelfCallChecker` issues an HTTP request to this service's own
//! `/isHoliday/{date}/{countryCode}` endpoint, making the aggregator a client
//! of the service it is part of. This exercises the full HTTP stack per date
//! and requires the listener to be up. `InProcessChecker` skips the network
//! hop and calls the single-date lookup directly while producing the same
//! bytes.
//!
//! # Failure Policy
//!
//! The first failed sub-check aborts the batch and discards everything
//! accumulated so far. Sequential execution is what makes "no output after the
//! failing date" hold, so sub-checks must not be run concurrently.

mod checker;
mod handler;
mod types;

pub use checker::{CheckError, DateChecker, InProcessChecker, SelfCallChecker, REQUEST_ID_HEADER};
pub use handler::BatchAggregator;
pub use types::{
    BatchEntryPoint, BatchError, BatchMode, BatchQuery, BatchResponse, BatchResult,
    DEFAULT_MAX_BATCH_DATES,
};
