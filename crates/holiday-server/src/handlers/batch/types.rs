//! Data types for batch operations.

use std::fmt;
use std::str::FromStr;

use super::checker::CheckError;

/// Default upper bound on dates per batch.
pub const DEFAULT_MAX_BATCH_DATES: usize = 100;

/// An ordered list of dates to check against one country's calendar.
///
/// Dates are neither validated nor deduplicated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchQuery {
    pub country_code: String,
    pub dates: Vec<String>,
    /// Id of the inbound request, forwarded on every self-call.
    pub request_id: Option<String>,
}

impl BatchQuery {
    pub fn new(country_code: impl Into<String>, dates: Vec<String>) -> Self {
        Self {
            country_code: country_code.into(),
            dates,
            request_id: None,
        }
    }

    pub fn with_request_id(mut self, request_id: Option<String>) -> Self {
        self.request_id = request_id;
        self
    }

    /// Splits a comma-separated path segment into dates.
    ///
    /// Empty pieces are kept, so `"a,,b"` yields three dates.
    pub fn from_comma_separated(country_code: impl Into<String>, dates: &str) -> Self {
        Self::new(
            country_code,
            dates.split(',').map(str::to_string).collect(),
        )
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Concatenated answers for a batch, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchResponse {
    pub body: Vec<u8>,
    /// Number of dates answered.
    pub resolved: usize,
}

/// Which HTTP endpoint submitted the batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BatchEntryPoint {
    /// `/areTheseHolidays/{countryCode}/{dates}`
    PlainList,
    /// `/areTheseHolidaysJSON/{countryCode}`
    JsonList,
}

impl BatchEntryPoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchEntryPoint::PlainList => "plain_list",
            BatchEntryPoint::JsonList => "json_list",
        }
    }
}

impl fmt::Display for BatchEntryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How sub-checks reach the single-date lookup.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BatchMode {
    /// HTTP request to this service's own `/isHoliday` endpoint.
    #[default]
    SelfCall,
    /// Direct call into the lookup.
    InProcess,
}

impl BatchMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BatchMode::SelfCall => "self_call",
            BatchMode::InProcess => "in_process",
        }
    }
}

impl FromStr for BatchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "self_call" => Ok(BatchMode::SelfCall),
            "in_process" => Ok(BatchMode::InProcess),
            other => Err(format!(
                "batch.mode must be one of: [\"self_call\", \"in_process\"], got: {other}"
            )),
        }
    }
}

/// Errors that can occur during batch operations.
#[derive(Debug, Clone, thiserror::Error)]
pub enum BatchError {
    /// The batch exceeds the configured maximum.
    #[error("batch size {size} exceeds maximum allowed {max}")]
    TooManyDates { size: usize, max: usize },

    /// A sub-check failed; the batch was aborted at this date.
    #[error("check for date {date:?} (index {index}) failed: {source}")]
    SubCheckFailed {
        index: usize,
        date: String,
        #[source]
        source: CheckError,
    },
}

/// Result type for batch operations.
pub type BatchResult<T> = Result<T, BatchError>;
