//! Batch aggregator implementation.

use std::sync::Arc;

use tracing::{error, info, instrument, warn};

use super::checker::DateChecker;
use super::types::{
    BatchEntryPoint, BatchError, BatchQuery, BatchResponse, BatchResult, DEFAULT_MAX_BATCH_DATES,
};

/// Line separator appended after every per-date answer.
const SEPARATOR: &[u8] = b"\n";

/// Aggregates many single-date checks behind one call.
///
/// Dates are checked one after another in input order. There is no
/// concurrent fan-out, no deduplication and no caching.
pub struct BatchAggregator {
    checker: Arc<dyn DateChecker>,
    max_dates: usize,
}

impl BatchAggregator {
    /// Creates an aggregator with the default batch size limit.
    pub fn new(checker: Arc<dyn DateChecker>) -> Self {
        Self {
            checker,
            max_dates: DEFAULT_MAX_BATCH_DATES,
        }
    }

    pub fn with_max_dates(mut self, max_dates: usize) -> Self {
        self.max_dates = max_dates;
        self
    }

    pub fn max_dates(&self) -> usize {
        self.max_dates
    }

    /// Validates a batch before any sub-check runs.
    pub fn validate(&self, query: &BatchQuery) -> BatchResult<()> {
        if query.len() > self.max_dates {
            return Err(BatchError::TooManyDates {
                size: query.len(),
                max: self.max_dates,
            });
        }
        Ok(())
    }

    /// Resolves every date of `query`, in order.
    ///
    /// An empty batch is logged and answered with an empty body. The first
    /// failing sub-check aborts the whole batch; no partial body is returned.
    #[instrument(skip(self, query), fields(country_code = %query.country_code, size = query.len()))]
    pub async fn resolve(
        &self,
        query: &BatchQuery,
        entry_point: BatchEntryPoint,
    ) -> BatchResult<BatchResponse> {
        self.validate(query)?;

        if query.is_empty() {
            warn!(%entry_point, "no dates provided");
            return Ok(BatchResponse::default());
        }

        metrics::histogram!("holidays_batch_size", "entry_point" => entry_point.as_str())
            .record(query.len() as f64);

        let mut body = Vec::new();
        for (index, date) in query.dates.iter().enumerate() {
            match self
                .checker
                .check_date(date, &query.country_code, query.request_id.as_deref())
                .await
            {
                Ok(answer) => {
                    body.extend_from_slice(&answer);
                    body.extend_from_slice(SEPARATOR);
                }
                Err(source) => {
                    error!(%entry_point, index, date = %date, error = %source, "batch aborted");
                    metrics::counter!(
                        "holidays_batch_failures_total",
                        "entry_point" => entry_point.as_str()
                    )
                    .increment(1);
                    return Err(BatchError::SubCheckFailed {
                        index,
                        date: date.clone(),
                        source,
                    });
                }
            }
        }

        info!(%entry_point, resolved = query.len(), "batch resolved");
        Ok(BatchResponse {
            body,
            resolved: query.len(),
        })
    }
}
