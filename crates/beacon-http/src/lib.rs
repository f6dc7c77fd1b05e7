// # HTTP Resolver and Prober
//
// This crate provides the monitor-side network adapters:
//
// - `HttpResolver`: reads the pointer record's raw-content URL
// - `HttpProber`: one bounded GET per endpoint, classified into a `StatusDetail`
//
// It also hosts the plumbing shared by every reqwest-based adapter in the
// workspace: client construction and the mapping of `reqwest::Error` onto
// the beacon error taxonomy.
//
// ## Rules
//
// - Exactly one request per call, no retries (the next cycle retries)
// - Every request carries an explicit timeout
// - No background tasks

mod prober;
mod resolver;

pub use prober::HttpProber;
pub use resolver::{HttpResolver, validate_location};

use beacon_core::Error;
use std::time::Duration;

/// Default timeout for any request issued by these adapters
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("beacon/", env!("CARGO_PKG_VERSION"));

/// Build a client with the workspace defaults
///
/// Redirects are followed, so a moved pointer record or API still answers.
pub fn build_client(timeout: Duration) -> reqwest::Client {
    client_builder(timeout).build().unwrap_or_default()
}

/// Build the client used for reachability checks
///
/// Redirects are never followed: a 3xx answer is reported as-is.
pub fn build_probe_client(timeout: Duration) -> reqwest::Client {
    client_builder(timeout)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap_or_default()
}

fn client_builder(timeout: Duration) -> reqwest::ClientBuilder {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
}

/// Map a reqwest error onto the beacon error taxonomy
///
/// Connection failures win over timeouts, so a connect timeout is reported
/// as a transport failure.
pub fn transport_error(context: &str, err: &reqwest::Error) -> Error {
    if err.is_connect() {
        Error::transport(format!("{}: {}", context, err))
    } else if err.is_timeout() {
        Error::timeout(format!("{}: {}", context, err))
    } else {
        Error::unexpected(format!("{}: {}", context, err))
    }
}

/// Turn a non-success response into a protocol error, keeping the body
pub async fn protocol_error(context: &str, response: reqwest::Response) -> Error {
    let status = response.status();
    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read error response".to_string());
    let reason = status.canonical_reason().unwrap_or("Unknown status");

    if body.trim().is_empty() {
        Error::protocol(status.as_u16(), format!("{}: {}", context, reason))
    } else {
        Error::protocol(
            status.as_u16(),
            format!("{}: {} - {}", context, reason, body.trim()),
        )
    }
}
