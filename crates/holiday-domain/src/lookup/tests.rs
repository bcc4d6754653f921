//! Tests for the single-date lookup.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::*;
use crate::error::{UpstreamError, UpstreamResult};
use crate::model::HolidayRecord;

// ============================================================
// Test Mocks
// ============================================================

/// Mock calendar source returning a fixed calendar and recording every call.
struct MockCalendarSource {
    records: Vec<HolidayRecord>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockCalendarSource {
    fn new(records: Vec<HolidayRecord>) -> Self {
        Self {
            records,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CalendarSource for MockCalendarSource {
    async fn fetch_calendar(
        &self,
        year: &str,
        country_code: &str,
    ) -> UpstreamResult<Vec<HolidayRecord>> {
        self.calls
            .lock()
            .unwrap()
            .push((year.to_string(), country_code.to_string()));
        Ok(self.records.clone())
    }
}

/// Mock calendar source that always fails.
struct FailingCalendarSource {
    error: UpstreamError,
}

#[async_trait]
impl CalendarSource for FailingCalendarSource {
    async fn fetch_calendar(
        &self,
        _year: &str,
        _country_code: &str,
    ) -> UpstreamResult<Vec<HolidayRecord>> {
        Err(self.error.clone())
    }
}

fn us_2021() -> Vec<HolidayRecord> {
    vec![
        HolidayRecord::new("2021-01-01", false, true)
            .with_names("New Year's Day", "New Year's Day")
            .with_country_code("US"),
        HolidayRecord::new("2021-07-05", false, true)
            .with_names("Independence Day", "Independence Day")
            .with_country_code("US")
            .with_types(vec!["Public".to_string()]),
        HolidayRecord::new("2021-12-24", false, true)
            .with_names("Christmas Day", "Christmas Day")
            .with_country_code("US"),
    ]
}

// ============================================================
// year_of
// ============================================================

#[test]
fn test_year_of_takes_text_before_first_dash() {
    assert_eq!(year_of("2021-07-05"), "2021");
    assert_eq!(year_of("2021"), "2021");
    assert_eq!(year_of("-07-05"), "");
    assert_eq!(year_of(""), "");
    assert_eq!(year_of("garbage"), "garbage");
}

// ============================================================
// Lookup
// ============================================================

#[tokio::test]
async fn test_found_returns_matching_record() {
    let source = Arc::new(MockCalendarSource::new(us_2021()));
    let lookup = SingleDateLookup::new(Arc::clone(&source));

    let outcome = lookup.is_holiday("2021-07-05", "US").await.unwrap();

    match outcome {
        LookupOutcome::Found(record) => {
            assert_eq!(record.date, "2021-07-05");
            assert_eq!(record.name.as_deref(), Some("Independence Day"));
        }
        LookupOutcome::NotFound => panic!("expected Found"),
    }
    assert_eq!(
        source.calls(),
        vec![("2021".to_string(), "US".to_string())]
    );
}

#[tokio::test]
async fn test_absent_date_is_not_found() {
    let source = Arc::new(MockCalendarSource::new(us_2021()));
    let lookup = SingleDateLookup::new(source);

    let outcome = lookup.is_holiday("2021-12-25", "US").await.unwrap();
    assert_eq!(outcome, LookupOutcome::NotFound);
}

#[tokio::test]
async fn test_malformed_date_is_forwarded_verbatim() {
    let source = Arc::new(MockCalendarSource::new(us_2021()));
    let lookup = SingleDateLookup::new(Arc::clone(&source));

    let outcome = lookup.is_holiday("not-a-date", "XX").await.unwrap();
    assert_eq!(outcome, LookupOutcome::NotFound);
    assert_eq!(
        source.calls(),
        vec![("not".to_string(), "XX".to_string())]
    );
}

#[tokio::test]
async fn test_upstream_failure_absorbed_by_default() {
    let source = Arc::new(FailingCalendarSource {
        error: UpstreamError::Status {
            status: 500,
            body: "boom".to_string(),
        },
    });
    let lookup = SingleDateLookup::new(source);

    let outcome = lookup.is_holiday("2021-07-05", "US").await.unwrap();
    assert_eq!(outcome, LookupOutcome::NotFound);
}

#[tokio::test]
async fn test_upstream_failure_propagated_when_configured() {
    let source = Arc::new(FailingCalendarSource {
        error: UpstreamError::Transport {
            message: "connection refused".to_string(),
        },
    });
    let lookup = SingleDateLookup::with_policy(source, UpstreamFailurePolicy::Propagate);

    let err = lookup.is_holiday("2021-07-05", "US").await.unwrap_err();
    assert_eq!(err.kind(), "transport");
}

// ============================================================
// Rendering
// ============================================================

#[test]
fn test_render_found_has_yes_line_then_json() {
    let record = HolidayRecord::new("2021-07-05", false, true).with_country_code("US");
    let text = LookupOutcome::Found(record).render("2021-07-05", "US");

    let (first, rest) = text.split_once('\n').unwrap();
    assert_eq!(first, "Yes 2021-07-05 is a holiday in US");
    assert_eq!(
        rest,
        r#"{"date":"2021-07-05","countryCode":"US","fixed":false,"global":true}"#
    );
}

#[test]
fn test_render_not_found_is_single_line() {
    let text = LookupOutcome::NotFound.render("2021-12-25", "US");
    assert_eq!(text, "no holidays on 2021-12-25 in US");
}
