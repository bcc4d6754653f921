//! One-shot request the binary sends to itself after startup.
//!
//! Posts the configured dates to its own JSON batch endpoint and logs the
//! body. Useful as a deployment check that the listener, the self-call path
//! and the upstream provider all answer.

use std::time::Duration;

use anyhow::Context;
use holiday_server::config::SmokeTestSettings;
use serde::Serialize;
use tracing::{info, warn};

const SMOKE_TEST_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct DatesPayload<'a> {
    dates: &'a [String],
}

/// URL of the JSON batch endpoint for `country_code` under `service_address`.
pub fn smoke_test_url(service_address: &str, country_code: &str) -> String {
    let base = if service_address.contains("://") {
        service_address.trim_end_matches('/').to_string()
    } else {
        format!("http://{}", service_address.trim_end_matches('/'))
    };
    format!("{base}/areTheseHolidaysJSON/{country_code}")
}

/// Sends the smoke-test request and returns the response body.
///
/// A non-success status is logged but still returns the body; only a
/// transport failure is an error.
pub async fn run_smoke_test(
    service_address: &str,
    settings: &SmokeTestSettings,
) -> anyhow::Result<String> {
    let url = smoke_test_url(service_address, &settings.country_code);
    let client = reqwest::Client::builder()
        .timeout(SMOKE_TEST_TIMEOUT)
        .build()
        .context("failed to build smoke test client")?;

    let response = client
        .post(&url)
        .json(&DatesPayload {
            dates: &settings.dates,
        })
        .send()
        .await
        .with_context(|| format!("smoke test request to {url} failed"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .context("failed to read smoke test response")?;

    if status.is_success() {
        info!(url = %url, status = status.as_u16(), body = %body, "smoke test response");
    } else {
        warn!(url = %url, status = status.as_u16(), body = %body, "smoke test returned non-success status");
    }

    Ok(body)
}
