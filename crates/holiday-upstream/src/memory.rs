//! In-memory calendar source for testing.
//!
//! Calendars are keyed by `(year, country_code)` exactly as requested. A
//! missing key behaves like the provider's answer for an unknown country
//! (status 404). Failures can be injected per key.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use holiday_domain::{CalendarSource, HolidayRecord, UpstreamError, UpstreamResult};

type CalendarKey = (String, String);

/// In-memory implementation of `CalendarSource`.
#[derive(Debug, Default)]
pub struct MemoryCalendarSource {
    calendars: DashMap<CalendarKey, Vec<HolidayRecord>>,
    failures: DashMap<CalendarKey, UpstreamError>,
    fetch_count: AtomicU64,
}

impl MemoryCalendarSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory source wrapped in Arc.
    pub fn new_shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Stores the calendar served for `year` and `country_code`.
    pub fn insert(&self, year: &str, country_code: &str, records: Vec<HolidayRecord>) {
        self.calendars
            .insert((year.to_string(), country_code.to_string()), records);
    }

    /// Makes every fetch for `year` and `country_code` fail with `error`.
    pub fn fail_with(&self, year: &str, country_code: &str, error: UpstreamError) {
        self.failures
            .insert((year.to_string(), country_code.to_string()), error);
    }

    /// Number of fetches served so far, failures included.
    pub fn fetch_count(&self) -> u64 {
        self.fetch_count.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl CalendarSource for MemoryCalendarSource {
    async fn fetch_calendar(
        &self,
        year: &str,
        country_code: &str,
    ) -> UpstreamResult<Vec<HolidayRecord>> {
        self.fetch_count.fetch_add(1, Ordering::Relaxed);
        let key = (year.to_string(), country_code.to_string());

        if let Some(error) = self.failures.get(&key) {
            return Err(error.clone());
        }

        self.calendars
            .get(&key)
            .map(|records| records.clone())
            .ok_or_else(|| UpstreamError::Status {
                status: 404,
                body: String::new(),
            })
    }
}
