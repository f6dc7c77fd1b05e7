// # Tunnel Source Trait
//
// Queries the local tunnel for its current public address.
//
// ## Implementations
//
// - ngrok local API: `beacon-tunnel-ngrok` crate

use async_trait::async_trait;

/// Trait for local tunnel queries
///
/// # Trust Level: Semi-Trusted
///
/// Tunnel sources only observe. They never publish and keep no state
/// between calls.
#[async_trait]
pub trait TunnelSource: Send + Sync {
    /// Get the current public address of the secure tunnel
    ///
    /// # Returns
    ///
    /// - `Ok(Some(String))`: The public address of the first secure tunnel
    /// - `Ok(None)`: The tunnel is running but exposes no secure tunnel
    /// - `Err(Error)`: The local query failed
    async fn current_address(&self) -> Result<Option<String>, crate::Error>;

    /// Name of the source (for logs)
    fn source_name(&self) -> &'static str;
}
