// # Pointer Writer Trait
//
// Writes the pointer record in the remote store.
//
// ## Implementations
//
// - GitHub Gist: `beacon-store-gist` crate
//
// ## Rules
//
// - One write per call, no retry (the publisher retries next cycle)
// - Must not decide whether a write is needed (owned by `Publisher`)
// - Must never log the bearer credential

use async_trait::async_trait;

/// Trait for pointer-store writers
#[async_trait]
pub trait PointerWriter: Send + Sync {
    /// Write `address` as the new pointer payload
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The store confirmed the write
    /// - `Err(Error)`: The write was not confirmed
    async fn publish(&self, address: &str) -> Result<(), crate::Error>;

    /// Name of the store (for logs)
    fn store_name(&self) -> &'static str;
}
