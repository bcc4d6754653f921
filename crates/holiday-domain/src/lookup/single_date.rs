//! The single-date lookup and its rendered answer.

use std::sync::Arc;

use tracing::{debug, error, instrument};

use super::traits::CalendarSource;
use crate::error::UpstreamResult;
use crate::model::{HolidayIndex, HolidayRecord};

/// What to do when the calendar cannot be fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamFailurePolicy {
    /// Log the failure and answer `NotFound`.
    #[default]
    TreatAsNotFound,
    /// Return the failure to the caller.
    Propagate,
}

/// Answer to "is this date a holiday".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupOutcome {
    Found(HolidayRecord),
    NotFound,
}

impl LookupOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, LookupOutcome::Found(_))
    }

    /// Renders the plain-text answer served by the single-date endpoint.
    ///
    /// A hit is a `Yes ...` line terminated by a newline, followed by the
    /// JSON-encoded record. A miss is a single line with no trailing newline.
    pub fn render(&self, date: &str, country_code: &str) -> String {
        match self {
            LookupOutcome::Found(record) => {
                let json = match serde_json::to_string(record) {
                    Ok(json) => json,
                    Err(e) => {
                        error!(error = %e, date, "failed to encode holiday record");
                        String::new()
                    }
                };
                format!("Yes {date} is a holiday in {country_code}\n{json}")
            }
            LookupOutcome::NotFound => format!("no holidays on {date} in {country_code}"),
        }
    }
}

/// Returns the text before the first `-` of `date`, or all of it if there is
/// no `-`.
pub fn year_of(date: &str) -> &str {
    date.split('-').next().unwrap_or(date)
}

/// Answers single-date holiday queries against a `CalendarSource`.
pub struct SingleDateLookup<C: CalendarSource> {
    source: Arc<C>,
    policy: UpstreamFailurePolicy,
}

impl<C: CalendarSource> SingleDateLookup<C> {
    /// Creates a lookup that absorbs upstream failures into `NotFound`.
    pub fn new(source: Arc<C>) -> Self {
        Self::with_policy(source, UpstreamFailurePolicy::default())
    }

    pub fn with_policy(source: Arc<C>, policy: UpstreamFailurePolicy) -> Self {
        Self { source, policy }
    }

    pub fn policy(&self) -> UpstreamFailurePolicy {
        self.policy
    }

    /// Checks whether `date` is a holiday in `country_code`.
    ///
    /// Only returns `Err` under `UpstreamFailurePolicy::Propagate`.
    #[instrument(skip(self))]
    pub async fn is_holiday(&self, date: &str, country_code: &str) -> UpstreamResult<LookupOutcome> {
        let year = year_of(date);
        debug!(year, "resolving holiday calendar");

        let calendar = match self.source.fetch_calendar(year, country_code).await {
            Ok(records) => records,
            Err(e) => {
                error!(error = %e, kind = e.kind(), year, country_code, "calendar fetch failed");
                match self.policy {
                    UpstreamFailurePolicy::TreatAsNotFound => Vec::new(),
                    UpstreamFailurePolicy::Propagate => {
                        metrics::counter!("holidays_lookups_total", "result" => "error")
                            .increment(1);
                        return Err(e);
                    }
                }
            }
        };

        let outcome = match HolidayIndex::build(calendar).take(date) {
            Some(record) => LookupOutcome::Found(record),
            None => LookupOutcome::NotFound,
        };

        let result = if outcome.is_found() { "found" } else { "not_found" };
        metrics::counter!("holidays_lookups_total", "result" => result).increment(1);

        Ok(outcome)
    }
}
