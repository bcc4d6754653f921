//! HTTP client for the public holiday provider.
//!
//! Calendars are fetched from
//! `{base_url}/api/v3/publicholidays/{year}/{countryCode}`. The path segments
//! are substituted verbatim; malformed input is left for the provider to
//! reject.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use holiday_domain::{CalendarSource, HolidayRecord, UpstreamError, UpstreamResult};
use tracing::{debug, error, instrument};

/// Default provider location.
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "https://date.nager.at";

/// Connection settings for the provider.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    /// Scheme and authority of the provider, without trailing path.
    pub base_url: String,
    /// Per-request timeout covering connect, headers and body.
    pub timeout: Duration,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

impl UpstreamConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// `CalendarSource` backed by the provider's REST API.
///
/// Each call is a single attempt; there are no retries.
#[derive(Debug, Clone)]
pub struct HttpCalendarClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpCalendarClient {
    /// Creates a client with its own connection pool.
    pub fn new(config: UpstreamConfig) -> UpstreamResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(transport_error)?;
        Ok(Self::with_client(client, config.base_url))
    }

    /// Creates a client reusing an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds the calendar URL for `year` and `country_code`.
    pub fn calendar_url(&self, year: &str, country_code: &str) -> String {
        format!(
            "{}/api/v3/publicholidays/{}/{}",
            self.base_url, year, country_code
        )
    }

    async fn fetch(&self, url: &str) -> UpstreamResult<Vec<HolidayRecord>> {
        let response = self.client.get(url).send().await.map_err(transport_error)?;
        let status = response.status();
        let body = response.bytes().await.map_err(transport_error)?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            error!(status = status.as_u16(), body = %body, "upstream returned non-success status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let records: Vec<HolidayRecord> = serde_json::from_slice(&body)?;
        Ok(records)
    }
}

fn transport_error(err: reqwest::Error) -> UpstreamError {
    UpstreamError::Transport {
        message: err.to_string(),
    }
}

#[async_trait]
impl CalendarSource for HttpCalendarClient {
    #[instrument(skip(self))]
    async fn fetch_calendar(
        &self,
        year: &str,
        country_code: &str,
    ) -> UpstreamResult<Vec<HolidayRecord>> {
        let url = self.calendar_url(year, country_code);
        debug!(%url, "fetching holiday calendar");

        let start = Instant::now();
        let result = self.fetch(&url).await;

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        metrics::counter!("holidays_upstream_requests_total", "outcome" => outcome).increment(1);
        metrics::histogram!("holidays_upstream_request_duration_seconds")
            .record(start.elapsed().as_secs_f64());

        if let Ok(records) = &result {
            debug!(count = records.len(), "holiday calendar fetched");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calendar_url_substitutes_verbatim() {
        let client = HttpCalendarClient::new(UpstreamConfig::default()).unwrap();
        assert_eq!(
            client.calendar_url("2021", "US"),
            "https://date.nager.at/api/v3/publicholidays/2021/US"
        );
        assert_eq!(
            client.calendar_url("", "not a country"),
            "https://date.nager.at/api/v3/publicholidays//not a country"
        );
    }

    #[test]
    fn test_trailing_slash_is_trimmed() {
        let client = HttpCalendarClient::with_client(reqwest::Client::new(), "http://localhost:1/");
        assert_eq!(client.base_url(), "http://localhost:1");
        assert_eq!(
            client.calendar_url("2021", "DE"),
            "http://localhost:1/api/v3/publicholidays/2021/DE"
        );
    }

    #[test]
    fn test_config_builder() {
        let config = UpstreamConfig::new("http://example.test").with_timeout(Duration::from_secs(3));
        assert_eq!(config.base_url, "http://example.test");
        assert_eq!(config.timeout, Duration::from_secs(3));
    }
}
