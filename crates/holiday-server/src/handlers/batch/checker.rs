//! Per-date sub-checks used by the batch aggregator.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use holiday_domain::{CalendarSource, SingleDateLookup, UpstreamError};
use tracing::{debug, warn};

/// Failure of a single sub-check.
#[derive(Debug, Clone, thiserror::Error)]
pub enum CheckError {
    /// The single-date endpoint could not be reached or its body not read.
    #[error("transport error: {message}")]
    Transport { message: String },

    /// The in-process lookup returned an upstream failure.
    #[error("lookup failed: {0}")]
    Lookup(#[from] UpstreamError),
}

impl From<reqwest::Error> for CheckError {
    fn from(err: reqwest::Error) -> Self {
        CheckError::Transport {
            message: err.to_string(),
        }
    }
}

/// Header carrying the request id across self-calls.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Resolves one date to the bytes the single-date endpoint would serve.
///
/// `request_id` identifies the batch request the check belongs to.
#[async_trait]
pub trait DateChecker: Send + Sync + 'static {
    async fn check_date(
        &self,
        date: &str,
        country_code: &str,
        request_id: Option<&str>,
    ) -> Result<Vec<u8>, CheckError>;
}

/// Checks dates by calling this service's own `/isHoliday` endpoint over HTTP.
///
/// The response body is returned whatever the status code; only transport
/// failures are errors.
#[derive(Debug, Clone)]
pub struct SelfCallChecker {
    client: reqwest::Client,
    base_url: String,
}

impl SelfCallChecker {
    /// Creates a checker for the service reachable at `service_address`.
    ///
    /// `service_address` is either `host:port` or a full `http(s)://` base URL.
    pub fn new(service_address: &str, timeout: Duration) -> Result<Self, CheckError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, service_address))
    }

    pub fn with_client(client: reqwest::Client, service_address: &str) -> Self {
        let address = service_address.trim_end_matches('/');
        let base_url = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{address}")
        };
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the single-date endpoint for `date`, substituted verbatim.
    pub fn date_url(&self, date: &str, country_code: &str) -> String {
        format!("{}/isHoliday/{}/{}", self.base_url, date, country_code)
    }
}

#[async_trait]
impl DateChecker for SelfCallChecker {
    async fn check_date(
        &self,
        date: &str,
        country_code: &str,
        request_id: Option<&str>,
    ) -> Result<Vec<u8>, CheckError> {
        let url = self.date_url(date, country_code);
        debug!(%url, request_id, "self-call for batch date");

        let mut request = self.client.get(&url);
        if let Some(request_id) = request_id {
            request = request.header(REQUEST_ID_HEADER, request_id);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            warn!(
                date,
                country_code,
                status = status.as_u16(),
                "single-date endpoint returned non-success status"
            );
        }

        Ok(body.to_vec())
    }
}

/// Checks dates by calling the single-date lookup directly.
pub struct InProcessChecker<C: CalendarSource> {
    lookup: Arc<SingleDateLookup<C>>,
}

impl<C: CalendarSource> InProcessChecker<C> {
    pub fn new(lookup: Arc<SingleDateLookup<C>>) -> Self {
        Self { lookup }
    }
}

#[async_trait]
impl<C: CalendarSource> DateChecker for InProcessChecker<C> {
    async fn check_date(
        &self,
        date: &str,
        country_code: &str,
        _request_id: Option<&str>,
    ) -> Result<Vec<u8>, CheckError> {
        let outcome = self.lookup.is_holiday(date, country_code).await?;
        Ok(outcome.render(date, country_code).into_bytes())
    }
}
