// # Prober Trait
//
// Defines the interface for a single bounded-time reachability check.
//
// ## Implementations
//
// - HTTP GET: `beacon-http` crate (`HttpProber`)
//
// ## Classification
//
// Outcomes are classified in priority order:
//
// 1. Connection failure        -> `StatusDetail::ConnectionFailure`
// 2. Timeout                   -> `StatusDetail::Timeout`
// 3. Status 200                -> reachable, `StatusDetail::HttpStatus(200)`
// 4. Any other status (incl. 3xx) -> `StatusDetail::HttpError(code, reason)`
// 5. Any other transport error -> `StatusDetail::OtherTransportError(message)`
//
// Only an exact 200 counts as up. Redirects are not followed.

use async_trait::async_trait;
use std::fmt;
use std::time::Duration;

/// Where an endpoint address came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EndpointOrigin {
    /// Part of the configured static list
    Static,
    /// Resolved from the pointer record this cycle
    Dynamic,
}

impl fmt::Display for EndpointOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointOrigin::Static => f.write_str("static"),
            EndpointOrigin::Dynamic => f.write_str("dynamic"),
        }
    }
}

/// A monitored endpoint
///
/// Immutable for the duration of a cycle. The dynamic endpoint's address
/// may differ from one cycle to the next.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Endpoint {
    /// The address to probe (a URL)
    pub address: String,
    /// Static or dynamic
    pub origin: EndpointOrigin,
}

impl Endpoint {
    /// Create a statically configured endpoint
    pub fn fixed(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            origin: EndpointOrigin::Static,
        }
    }

    /// Create an endpoint resolved from the pointer record
    pub fn dynamic(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            origin: EndpointOrigin::Dynamic,
        }
    }
}

/// Classified outcome of a probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusDetail {
    /// Reachable with this status code (always 200)
    HttpStatus(u16),
    /// A response arrived with a status other than 200
    HttpError(u16, String),
    /// The host could not be reached
    ConnectionFailure,
    /// The request did not complete within the timeout
    Timeout,
    /// Any other transport error
    OtherTransportError(String),
}

impl StatusDetail {
    /// Whether this outcome counts as reachable
    pub fn is_reachable(&self) -> bool {
        matches!(self, StatusDetail::HttpStatus(200))
    }

    /// Classify a received status code
    ///
    /// Only 200 is reachable. Every other code, redirects included, is
    /// reported as an `HttpError`.
    pub fn from_status(code: u16, reason: impl Into<String>) -> Self {
        if code == 200 {
            StatusDetail::HttpStatus(code)
        } else {
            StatusDetail::HttpError(code, reason.into())
        }
    }
}

impl fmt::Display for StatusDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusDetail::HttpStatus(code) => write!(f, "HTTP Status: {}", code),
            StatusDetail::HttpError(code, reason) if reason.is_empty() => {
                write!(f, "HTTP Error: {}", code)
            }
            StatusDetail::HttpError(code, reason) => write!(f, "HTTP Error: {} {}", code, reason),
            StatusDetail::ConnectionFailure => f.write_str("Connection Error (Cannot reach host)"),
            StatusDetail::Timeout => f.write_str("Timeout (Request took too long)"),
            StatusDetail::OtherTransportError(message) => {
                write!(f, "Generic Request Error: {}", message)
            }
        }
    }
}

/// Result of probing one endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    /// The endpoint that was probed
    pub endpoint: Endpoint,
    /// Whether the endpoint is up
    pub reachable: bool,
    /// Classified outcome
    pub detail: StatusDetail,
}

impl ProbeResult {
    /// Build a result, deriving `reachable` from the detail
    pub fn new(endpoint: Endpoint, detail: StatusDetail) -> Self {
        Self {
            reachable: detail.is_reachable(),
            endpoint,
            detail,
        }
    }
}

/// Trait for prober implementations
///
/// A prober performs exactly one request per call and never retries.
/// It must not panic or return an error: every failure is folded into
/// the returned [`StatusDetail`].
///
/// # Thread Safety
///
/// Implementations must be usable across async tasks.
#[async_trait]
pub trait Prober: Send + Sync {
    /// Probe a single address within `timeout`
    ///
    /// The returned result carries an [`Endpoint`] built from `address`
    /// with [`EndpointOrigin::Static`]; callers that know the real origin
    /// use [`Prober::probe_endpoint`].
    async fn probe(&self, address: &str, timeout: Duration) -> ProbeResult {
        self.probe_endpoint(&Endpoint::fixed(address), timeout).await
    }

    /// Probe an endpoint within `timeout`
    async fn probe_endpoint(&self, endpoint: &Endpoint, timeout: Duration) -> ProbeResult;
}
