//! Trait for calendar retrieval needed by the lookup.

use async_trait::async_trait;

use crate::error::UpstreamResult;
use crate::model::HolidayRecord;

/// Source of yearly holiday calendars.
///
/// `year` and `country_code` are passed through verbatim; implementations must
/// not validate or normalize them.
#[async_trait]
pub trait CalendarSource: Send + Sync + 'static {
    /// Fetches every holiday of `country_code` in `year`, in provider order.
    async fn fetch_calendar(
        &self,
        year: &str,
        country_code: &str,
    ) -> UpstreamResult<Vec<HolidayRecord>>;
}
