//! Core traits for the beacon system
//!
//! This module defines the abstract interfaces that all implementations must follow.
//!
//! - [`PointerResolver`]: Read the published dynamic address from the pointer store
//! - [`Prober`]: Bounded-time reachability check of one endpoint
//! - [`Notifier`] / [`CapabilityProbe`]: External alert mechanism
//! - [`TunnelSource`]: Current public address of the local tunnel
//! - [`PointerWriter`]: Authenticated write of the pointer record

pub mod resolver;
pub mod prober;
pub mod notifier;
pub mod tunnel;
pub mod pointer_store;

pub use resolver::PointerResolver;
pub use prober::{Endpoint, EndpointOrigin, ProbeResult, Prober, StatusDetail};
pub use notifier::{CapabilityProbe, Notifier};
pub use tunnel::TunnelSource;
pub use pointer_store::PointerWriter;
