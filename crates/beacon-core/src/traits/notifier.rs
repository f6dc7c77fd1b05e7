// # Notifier Traits
//
// The external alert mechanism is split in two:
//
// - `CapabilityProbe`: asked once at startup whether the mechanism exists
// - `Notifier`: invoked once per alert
//
// The answer of the capability probe is injected into the `AlertDispatcher`,
// which never re-checks it.
//
// ## Implementations
//
// - `dunstify` command and PATH lookup: `beacon-notify` crate

use async_trait::async_trait;

/// Startup check for the presence of an external tool
pub trait CapabilityProbe: Send + Sync {
    /// Name of the capability being probed (for logs)
    fn capability(&self) -> &str;

    /// Whether the capability is present
    fn is_available(&self) -> bool;
}

/// Trait for alert delivery mechanisms
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver one alert
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The mechanism reported success
    /// - `Err(Error)`: Invocation failed or the mechanism reported failure
    async fn notify(&self, title: &str, body: &str) -> Result<(), crate::Error>;

    /// Human-readable name of the mechanism
    fn name(&self) -> &str;
}
