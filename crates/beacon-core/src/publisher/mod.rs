//! Publisher loop
//!
//! The Publisher keeps the pointer record in sync with the local tunnel:
//!
//! 1. QueryLocal: ask the [`TunnelSource`] for the current public address
//! 2. CompareAndMaybePublish: write it through the [`PointerWriter`] if it
//!    differs from the last confirmed publish
//! 3. Sleep: owned by [`PeriodicScheduler`]
//!
//! ## State
//!
//! [`PublishedAddressState`] is only updated after the store confirmed a
//! write. A failed write leaves it untouched, so the next cycle sees the same
//! difference and retries the same address.

use crate::config::PublisherConfig;
use crate::scheduler::{Cycle, PeriodicScheduler};
use crate::state::PublishedAddressState;
use crate::traits::{PointerWriter, TunnelSource};
use async_trait::async_trait;
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Capacity of the publisher event channel
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Outcome of one publisher cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A new address was written and confirmed
    Published {
        address: String,
        previous: Option<String>,
    },

    /// The address matches the last confirmed publish; no write issued
    Unchanged {
        address: String,
    },

    /// The tunnel is up but exposes no secure tunnel
    NoTunnel,

    /// The local tunnel query failed
    QueryFailed {
        error: String,
    },

    /// The write was attempted and not confirmed
    PublishFailed {
        address: String,
        error: String,
    },
}

/// Events emitted by the Publisher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublisherEvent {
    /// A tunnel address different from the published one was detected
    AddressChanged {
        address: String,
        previous: Option<String>,
    },

    /// A cycle finished with this outcome
    CycleCompleted(PublishOutcome),
}

/// Pointer-record publisher
pub struct Publisher {
    /// Local tunnel query
    tunnel: Box<dyn TunnelSource>,

    /// Remote pointer-store writer
    writer: Box<dyn PointerWriter>,

    /// Last confirmed publish
    state: PublishedAddressState,

    /// Sleep between cycles
    publish_interval: Duration,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<PublisherEvent>,
}

impl Publisher {
    /// Create a new publisher with an empty state
    ///
    /// Configuration faults are logged once; writes will keep failing and
    /// being retried until the configuration is fixed.
    ///
    /// # Returns
    ///
    /// A tuple of (publisher, event_receiver)
    pub fn new(
        tunnel: Box<dyn TunnelSource>,
        writer: Box<dyn PointerWriter>,
        config: &PublisherConfig,
    ) -> (Self, mpsc::Receiver<PublisherEvent>) {
        if let Err(e) = config.validate() {
            error!("{}. Publishing will fail until this is fixed.", e);
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let publisher = Self {
            tunnel,
            writer,
            state: PublishedAddressState::new(),
            publish_interval: config.publish_interval(),
            event_tx: tx,
        };

        (publisher, rx)
    }

    /// The last confirmed publish
    pub fn state(&self) -> &PublishedAddressState {
        &self.state
    }

    /// Run one cycle: query the tunnel, publish if changed
    pub async fn run_cycle(&mut self) -> PublishOutcome {
        let outcome = match self.tunnel.current_address().await {
            Ok(Some(address)) => self.publish_if_changed(address).await,
            Ok(None) => {
                warn!(
                    "{} tunnel not detected. Retrying next cycle...",
                    self.tunnel.source_name()
                );
                PublishOutcome::NoTunnel
            }
            Err(e) => {
                warn!(
                    "Error fetching {} tunnel address: {}. Retrying next cycle...",
                    self.tunnel.source_name(),
                    e
                );
                PublishOutcome::QueryFailed {
                    error: e.to_string(),
                }
            }
        };

        self.emit_event(PublisherEvent::CycleCompleted(outcome.clone()));
        outcome
    }

    /// Run until `shutdown` resolves
    ///
    /// # Returns
    ///
    /// The number of completed cycles
    pub async fn run<S>(&mut self, shutdown: S) -> u64
    where
        S: Future<Output = ()>,
    {
        PeriodicScheduler::new(self.publish_interval)
            .run(self, shutdown)
            .await
    }

    /// Compare with the last confirmed publish and write if needed
    async fn publish_if_changed(&mut self, address: String) -> PublishOutcome {
        if !self.state.differs_from(&address) {
            match self.state.last_published_at() {
                Some(at) => debug!("Address unchanged since {}: {}", at, address),
                None => debug!("Address unchanged: {}", address),
            }
            info!("Tunnel address is unchanged: {}. No update needed.", address);
            return PublishOutcome::Unchanged { address };
        }

        let previous = self.state.last_known_address().map(str::to_string);
        info!("New tunnel address detected: {}", address);
        self.emit_event(PublisherEvent::AddressChanged {
            address: address.clone(),
            previous: previous.clone(),
        });

        match self.writer.publish(&address).await {
            Ok(()) => {
                info!("{} updated with {}", self.writer.store_name(), address);
                self.state.record_published(address.as_str());
                PublishOutcome::Published { address, previous }
            }
            Err(e) => {
                error!(
                    "Error updating {} with {}: {}. Will retry next cycle.",
                    self.writer.store_name(),
                    address,
                    e
                );
                PublishOutcome::PublishFailed {
                    address,
                    error: e.to_string(),
                }
            }
        }
    }

    /// Emit a publisher event
    fn emit_event(&self, event: PublisherEvent) {
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Publisher event channel full, dropping event");
        }
    }
}

#[async_trait]
impl Cycle for Publisher {
    async fn run_once(&mut self) {
        self.run_cycle().await;
    }

    fn loop_name(&self) -> &'static str {
        "publisher"
    }
}
