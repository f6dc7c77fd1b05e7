//! Alert dispatcher
//!
//! Routes down events to the external notifier. Whether the notifier is
//! available is decided once, at construction, from a [`CapabilityProbe`].
//! An unavailable notifier turns every dispatch into a console-only no-op;
//! a failing notifier is logged and never stops the caller.

use crate::traits::{CapabilityProbe, Notifier};
use tracing::{debug, error, warn};

/// Outcome of one dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The notifier reported success
    Delivered,
    /// The notifier is unavailable; the alert was only logged
    Degraded,
    /// The notifier was invoked but failed
    Failed(String),
}

impl DispatchOutcome {
    /// Whether the alert reached the OS alert surface
    pub fn is_delivered(&self) -> bool {
        matches!(self, DispatchOutcome::Delivered)
    }
}

/// Sends alerts through a notifier whose availability was probed once
pub struct AlertDispatcher {
    notifier: Box<dyn Notifier>,
    available: bool,
}

impl AlertDispatcher {
    /// Create a dispatcher, probing the capability exactly once
    pub fn new(notifier: Box<dyn Notifier>, probe: &dyn CapabilityProbe) -> Self {
        let available = probe.is_available();
        if !available {
            warn!(
                "'{}' command not found. Desktop notifications will be disabled.",
                probe.capability()
            );
        }
        Self::with_availability(notifier, available)
    }

    /// Create a dispatcher with a known availability
    pub fn with_availability(notifier: Box<dyn Notifier>, available: bool) -> Self {
        Self { notifier, available }
    }

    /// Whether alerts are delivered or only logged
    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Dispatch one alert
    pub async fn dispatch(&self, title: &str, body: &str) -> DispatchOutcome {
        if !self.available {
            debug!("Notifications disabled, alert logged only: {} | {}", title, body);
            return DispatchOutcome::Degraded;
        }

        match self.notifier.notify(title, body).await {
            Ok(()) => {
                debug!("Alert delivered via {}", self.notifier.name());
                DispatchOutcome::Delivered
            }
            Err(e) => {
                error!("Failed to send {} notification: {}", self.notifier.name(), e);
                DispatchOutcome::Failed(e.to_string())
            }
        }
    }
}
