// # beacon-core
//
// Core library for the beacon endpoint monitor and pointer publisher.
//
// ## Architecture Overview
//
// Two loops, coupled only through a remote pointer record:
// - **Publisher**: detects the local tunnel address and writes it to the
//   pointer store when it changes
// - **Monitor**: resolves the pointer record, probes the static and dynamic
//   endpoints, and alerts on every unreachable one
//
// The collaborators are traits:
// - **PointerResolver**: read the published address
// - **Prober**: classify the reachability of one endpoint
// - **Notifier** / **CapabilityProbe**: external alert mechanism
// - **TunnelSource**: current address of the local tunnel
// - **PointerWriter**: authenticated write of the pointer record
//
// ## Design Principles
//
// 1. **Degrade, never die**: every failure is logged and absorbed by the cycle
// 2. **Time-driven**: fixed-interval cycles via `PeriodicScheduler`
// 3. **Library-First**: each cycle can be run directly, without a timer
// 4. **Idempotency**: the publisher only writes confirmed changes

pub mod traits;
pub mod alert;
pub mod config;
pub mod error;
pub mod monitor;
pub mod publisher;
pub mod scheduler;
pub mod state;

// Re-export core types for convenience
pub use traits::{
    CapabilityProbe, Endpoint, EndpointOrigin, Notifier, PointerResolver, PointerWriter,
    ProbeResult, Prober, StatusDetail, TunnelSource,
};
pub use alert::{AlertDispatcher, DispatchOutcome};
pub use config::{AlertConfig, MonitorConfig, PublisherConfig};
pub use error::{Error, Result};
pub use monitor::{CycleReport, Monitor, MonitorEvent};
pub use publisher::{PublishOutcome, Publisher, PublisherEvent};
pub use scheduler::{Cycle, PeriodicScheduler};
pub use state::PublishedAddressState;
