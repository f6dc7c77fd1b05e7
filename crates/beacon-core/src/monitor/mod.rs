//! Monitor loop
//!
//! The Monitor is responsible for:
//! - Assembling the target set (static endpoints + resolved dynamic endpoint)
//! - Probing every endpoint, one at a time, in list order
//! - Routing unreachable endpoints to the alert dispatcher
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │ PointerResolver  │─── Option<address> ───┐
//! └──────────────────┘                       │
//!                                            ▼
//!                                   ┌──────────────┐
//!                                   │   Monitor    │
//!                                   └──────────────┘
//!                                            │
//!         ┌──────────────────────────────────┼─────────────────────────┐
//!         │                                  │                         │
//!         ▼                                  ▼                         ▼
//! ┌─────────────┐                  ┌──────────────────┐        ┌─────────────┐
//! │   Prober    │                  │ AlertDispatcher  │        │   Events    │
//! │ (per target)│                  │ (on down)        │        │  (notify)   │
//! └─────────────┘                  └──────────────────┘        └─────────────┘
//! ```
//!
//! ## Cycle
//!
//! 1. BuildTargetSet: static list, plus one dynamic endpoint if resolvable
//! 2. ProbeEach: probe sequentially, alert on every down endpoint
//! 3. Sleep: owned by [`PeriodicScheduler`]
//!
//! A failed resolution, probe or dispatch only degrades the current cycle.

use crate::alert::{AlertDispatcher, DispatchOutcome};
use crate::config::MonitorConfig;
use crate::scheduler::{Cycle, PeriodicScheduler};
use crate::traits::{Endpoint, PointerResolver, ProbeResult, Prober, StatusDetail};
use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

/// Capacity of the monitor event channel
const EVENT_CHANNEL_CAPACITY: usize = 256;

/// Events emitted by the Monitor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorEvent {
    /// A cycle started with this many targets
    CycleStarted {
        targets: usize,
    },

    /// The dynamic address could not be resolved this cycle
    ResolutionUnavailable,

    /// An endpoint answered with 200
    EndpointUp {
        address: String,
        detail: StatusDetail,
    },

    /// An endpoint is unreachable
    EndpointDown {
        address: String,
        detail: StatusDetail,
    },

    /// An alert was dispatched for a down endpoint
    AlertDispatched {
        address: String,
        outcome: DispatchOutcome,
    },

    /// A cycle finished
    CycleCompleted {
        up: usize,
        down: usize,
    },
}

/// Summary of one monitor cycle
#[derive(Debug, Clone)]
pub struct CycleReport {
    /// Local time the cycle started
    pub started_at: DateTime<Local>,
    /// One result per target, in probe order
    pub results: Vec<ProbeResult>,
    /// One outcome per dispatched alert, in probe order
    pub alerts: Vec<DispatchOutcome>,
}

impl CycleReport {
    /// Number of reachable endpoints
    pub fn up_count(&self) -> usize {
        self.results.iter().filter(|r| r.reachable).count()
    }

    /// Number of unreachable endpoints
    pub fn down_count(&self) -> usize {
        self.results.len() - self.up_count()
    }
}

/// Endpoint monitor
///
/// ## Lifecycle
///
/// 1. Create with [`Monitor::new()`]
/// 2. Drive with [`Monitor::run()`], or call [`Monitor::run_cycle()`] directly
/// 3. Runs until the shutdown future resolves
pub struct Monitor {
    /// Reader of the pointer record
    resolver: Box<dyn PointerResolver>,

    /// Reachability check
    prober: Box<dyn Prober>,

    /// Alert routing
    dispatcher: AlertDispatcher,

    /// Endpoints probed every cycle
    static_endpoints: Vec<Endpoint>,

    /// Raw-content location of the pointer record
    pointer_location: Option<String>,

    /// Timeout for each probe
    probe_timeout: Duration,

    /// Sleep between cycles
    check_interval: Duration,

    /// Title of down alerts
    down_title: String,

    /// Event sender for external monitoring
    event_tx: mpsc::Sender<MonitorEvent>,
}

impl Monitor {
    /// Create a new monitor
    ///
    /// Configuration faults are logged here, once. They never prevent the
    /// monitor from being built: a bad pointer location only means every
    /// cycle runs on the static set.
    ///
    /// # Returns
    ///
    /// A tuple of (monitor, event_receiver)
    pub fn new(
        resolver: Box<dyn PointerResolver>,
        prober: Box<dyn Prober>,
        dispatcher: AlertDispatcher,
        config: &MonitorConfig,
    ) -> (Self, mpsc::Receiver<MonitorEvent>) {
        if let Err(e) = config.validate() {
            error!("{}. Monitoring continues with reduced functionality.", e);
        }
        if config.pointer_location.is_none() {
            warn!("No pointer location configured, only static endpoints will be monitored");
        }

        let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let monitor = Self {
            resolver,
            prober,
            dispatcher,
            static_endpoints: config
                .static_endpoints
                .iter()
                .map(|address| Endpoint::fixed(address.as_str()))
                .collect(),
            pointer_location: config.pointer_location.clone(),
            probe_timeout: config.probe_timeout(),
            check_interval: config.check_interval(),
            down_title: config.alert.down_title.clone(),
            event_tx: tx,
        };

        (monitor, rx)
    }

    /// Assemble this cycle's targets
    ///
    /// The static endpoints come first, in configured order, followed by the
    /// dynamic endpoint when the pointer record resolves.
    pub async fn build_target_set(&self) -> Vec<Endpoint> {
        let mut targets = self.static_endpoints.clone();

        let resolved = match self.pointer_location.as_deref() {
            Some(location) => self.resolver.resolve(location).await,
            None => None,
        };

        match resolved {
            Some(address) => targets.push(Endpoint::dynamic(address)),
            None => {
                warn!(
                    "Skipping dynamic endpoint check this cycle due to retrieval failure. \
                     Ensure the publisher is running and updating the pointer record."
                );
                self.emit_event(MonitorEvent::ResolutionUnavailable);
            }
        }

        targets
    }

    /// Run one full cycle: build the target set, probe each, alert on down
    pub async fn run_cycle(&self) -> CycleReport {
        let targets = self.build_target_set().await;
        let started_at = Local::now();

        info!("--- Checking Websites ({}) ---", started_at.format("%Y-%m-%d %H:%M:%S"));
        self.emit_event(MonitorEvent::CycleStarted {
            targets: targets.len(),
        });

        if targets.is_empty() {
            info!("No URLs to check. Configure static endpoints or fix the pointer location.");
        }

        let mut results = Vec::with_capacity(targets.len());
        let mut alerts = Vec::new();

        for endpoint in &targets {
            info!("Checking: {}...", endpoint.address);
            let result = self.prober.probe_endpoint(endpoint, self.probe_timeout).await;

            if result.reachable {
                info!("  [UP] {} (Status: {})", endpoint.address, result.detail);
                self.emit_event(MonitorEvent::EndpointUp {
                    address: endpoint.address.clone(),
                    detail: result.detail.clone(),
                });
            } else {
                warn!("  [DOWN] {} (Reason: {})", endpoint.address, result.detail);
                self.emit_event(MonitorEvent::EndpointDown {
                    address: endpoint.address.clone(),
                    detail: result.detail.clone(),
                });

                let outcome = self.alert_down(&result).await;
                self.emit_event(MonitorEvent::AlertDispatched {
                    address: endpoint.address.clone(),
                    outcome: outcome.clone(),
                });
                alerts.push(outcome);
            }

            results.push(result);
        }

        let report = CycleReport {
            started_at,
            results,
            alerts,
        };
        self.emit_event(MonitorEvent::CycleCompleted {
            up: report.up_count(),
            down: report.down_count(),
        });
        report
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
        PeriodicScheduler::new(self.check_interval)
            .run(self, shutdown)
            .await
    }

    /// Dispatch the alert for an unreachable endpoint
    async fn alert_down(&self, result: &ProbeResult) -> DispatchOutcome {
        let body = format!("URL: {}\nReason: {}", result.endpoint.address, result.detail);
        self.dispatcher.dispatch(&self.down_title, &body).await
    }

    /// Emit a monitor event
    fn emit_event(&self, event: MonitorEvent) {
        // A closed channel means nobody listens; only a full one is worth a warning
        if let Err(mpsc::error::TrySendError::Full(_)) = self.event_tx.try_send(event) {
            warn!("Monitor event channel full, dropping event");
        }
    }
}

#[async_trait]
impl Cycle for Monitor {
    async fn run_once(&mut self) {
        let report = self.run_cycle().await;
        info!(
            "Cycle finished: {} up, {} down, {} alert(s)",
            report.up_count(),
            report.down_count(),
            report.alerts.len()
        );
    }

    fn loop_name(&self) -> &'static str {
        "monitor"
    }
}
