// # Pointer Resolver Trait
//
// Reads the currently published dynamic address from the pointer store.
//
// ## Implementations
//
// - HTTP raw-content read: `beacon-http` crate (`HttpResolver`)
//
// ## Contract
//
// - An empty or malformed location returns `None` without a network call
// - One bounded-time read per call, no retries (the next cycle retries)
// - Transport failure, non-success status, or blank payload -> `None`
// - Otherwise the payload trimmed of surrounding whitespace

use async_trait::async_trait;

/// Trait for pointer-store readers
///
/// # Trust Level: Untrusted
///
/// Resolvers only read. They never write the pointer record and keep no
/// state between calls.
#[async_trait]
pub trait PointerResolver: Send + Sync {
    /// Resolve the address currently published at `location`
    ///
    /// # Returns
    ///
    /// - `Some(String)`: The published address, trimmed
    /// - `None`: Unavailable (already logged by the implementation)
    async fn resolve(&self, location: &str) -> Option<String>;
}
