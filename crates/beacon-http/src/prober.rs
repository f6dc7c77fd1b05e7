//! Endpoint reachability over HTTP GET

use crate::{DEFAULT_REQUEST_TIMEOUT, build_probe_client};
use async_trait::async_trait;
use beacon_core::traits::{Endpoint, ProbeResult, Prober, StatusDetail};
use std::time::Duration;

/// Probes an endpoint with a single GET
///
/// Redirects are not followed, so a 3xx answer is classified as down. Only
/// an exact 200 counts as up. No side effects beyond the request itself.
pub struct HttpProber {
    client: reqwest::Client,
}

impl HttpProber {
    /// Create a prober
    ///
    /// The per-call timeout passed to [`Prober::probe_endpoint`] overrides
    /// the client default.
    pub fn new() -> Self {
        Self {
            client: build_probe_client(DEFAULT_REQUEST_TIMEOUT),
        }
    }
}

impl Default for HttpProber {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prober for HttpProber {
    async fn probe_endpoint(&self, endpoint: &Endpoint, timeout: Duration) -> ProbeResult {
        let detail = match self
            .client
            .get(&endpoint.address)
            .timeout(timeout)
            .send()
            .await
        {
            Ok(response) => {
                let status = response.status();
                StatusDetail::from_status(
                    status.as_u16(),
                    status.canonical_reason().unwrap_or_default(),
                )
            }
            Err(e) => classify_failure(&e),
        };

        ProbeResult::new(endpoint.clone(), detail)
    }
}

/// Classify a failed request
///
/// Connection failures are checked before timeouts.
fn classify_failure(err: &reqwest::Error) -> StatusDetail {
    if err.is_connect() {
        StatusDetail::ConnectionFailure
    } else if err.is_timeout() {
        StatusDetail::Timeout
    } else {
        StatusDetail::OtherTransportError(err.to_string())
    }
}
