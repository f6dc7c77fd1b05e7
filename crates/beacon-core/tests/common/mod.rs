//! Test doubles and common utilities for loop contract tests
//!
//! This module provides scripted collaborators that record how the loops
//! call them, without touching the network or spawning processes.

#![allow(dead_code)]

use beacon_core::config::{MonitorConfig, PublisherConfig};
use beacon_core::error::{Error, Result};
use beacon_core::traits::{
    Endpoint, Notifier, PointerResolver, PointerWriter, ProbeResult, Prober, StatusDetail,
    TunnelSource,
};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// A resolver that returns a fixed answer and counts calls
#[derive(Clone)]
pub struct FixedResolver {
    answer: Option<String>,
    calls: Arc<Mutex<Vec<String>>>,
}

impl FixedResolver {
    pub fn resolving(address: &str) -> Self {
        Self {
            answer: Some(address.to_string()),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            answer: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Locations this resolver was asked for
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PointerResolver for FixedResolver {
    async fn resolve(&self, location: &str) -> Option<String> {
        self.calls.lock().unwrap().push(location.to_string());
        self.answer.clone()
    }
}

/// A prober answering from a per-address script
///
/// Unknown addresses answer 200.
#[derive(Clone)]
pub struct ScriptedProber {
    script: Arc<HashMap<String, StatusDetail>>,
    probed: Arc<Mutex<Vec<Endpoint>>>,
    timeouts: Arc<Mutex<Vec<Duration>>>,
}

impl ScriptedProber {
    pub fn new(script: &[(&str, StatusDetail)]) -> Self {
        Self {
            script: Arc::new(
                script
                    .iter()
                    .map(|(address, detail)| (address.to_string(), detail.clone()))
                    .collect(),
            ),
            probed: Arc::new(Mutex::new(Vec::new())),
            timeouts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn all_up() -> Self {
        Self::new(&[])
    }

    /// Endpoints probed so far, in call order
    pub fn probed(&self) -> Vec<Endpoint> {
        self.probed.lock().unwrap().clone()
    }

    /// Timeouts passed to each probe
    pub fn timeouts(&self) -> Vec<Duration> {
        self.timeouts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Prober for ScriptedProber {
    async fn probe_endpoint(&self, endpoint: &Endpoint, timeout: Duration) -> ProbeResult {
        self.probed.lock().unwrap().push(endpoint.clone());
        self.timeouts.lock().unwrap().push(timeout);
        let detail = self
            .script
            .get(&endpoint.address)
            .cloned()
            .unwrap_or(StatusDetail::HttpStatus(200));
        ProbeResult::new(endpoint.clone(), detail)
    }
}

/// A notifier recording every alert
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    alerts: Arc<Mutex<Vec<(String, String)>>>,
    fail: bool,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// A notifier that records and then reports failure
    pub fn failing() -> Self {
        Self {
            alerts: Arc::new(Mutex::new(Vec::new())),
            fail: true,
        }
    }

    /// (title, body) pairs received so far
    pub fn alerts(&self) -> Vec<(String, String)> {
        self.alerts.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, title: &str, body: &str) -> Result<()> {
        self.alerts
            .lock()
            .unwrap()
            .push((title.to_string(), body.to_string()));
        if self.fail {
            Err(Error::unexpected("notifier exited with status 1"))
        } else {
            Ok(())
        }
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// A tunnel source replaying scripted answers, repeating the last one
#[derive(Clone)]
pub struct ScriptedTunnel {
    answers: Arc<Mutex<VecDeque<Result<Option<String>>>>>,
    last: Arc<Mutex<Option<String>>>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedTunnel {
    pub fn new(answers: Vec<Result<Option<String>>>) -> Self {
        Self {
            answers: Arc::new(Mutex::new(answers.into_iter().collect())),
            last: Arc::new(Mutex::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A tunnel that always reports `address`
    pub fn steady(address: &str) -> Self {
        Self::new(vec![Ok(Some(address.to_string()))])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl TunnelSource for ScriptedTunnel {
    async fn current_address(&self) -> Result<Option<String>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let next = self.answers.lock().unwrap().pop_front();
        match next {
            Some(Ok(answer)) => {
                *self.last.lock().unwrap() = answer.clone();
                Ok(answer)
            }
            Some(Err(e)) => Err(e),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }

    fn source_name(&self) -> &'static str {
        "scripted"
    }
}

/// A pointer writer that records writes and fails on demand
#[derive(Clone, Default)]
pub struct RecordingWriter {
    writes: Arc<Mutex<Vec<String>>>,
    failures_left: Arc<AtomicUsize>,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the next `count` writes, then succeed
    pub fn failing_first(count: usize) -> Self {
        Self {
            writes: Arc::new(Mutex::new(Vec::new())),
            failures_left: Arc::new(AtomicUsize::new(count)),
        }
    }

    /// Every attempted write, successful or not
    pub fn writes(&self) -> Vec<String> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl PointerWriter for RecordingWriter {
    async fn publish(&self, address: &str) -> Result<()> {
        self.writes.lock().unwrap().push(address.to_string());
        let remaining = self.failures_left.load(Ordering::SeqCst);
        if remaining > 0 {
            self.failures_left.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::protocol(502, "Bad Gateway"));
        }
        Ok(())
    }

    fn store_name(&self) -> &'static str {
        "recording store"
    }
}

/// Monitor configuration for tests
pub fn monitor_config(static_endpoints: &[&str], pointer: Option<&str>) -> MonitorConfig {
    MonitorConfig {
        static_endpoints: static_endpoints.iter().map(|s| s.to_string()).collect(),
        pointer_location: pointer.map(str::to_string),
        check_interval_secs: 300,
        probe_timeout_secs: 10,
        resolve_timeout_secs: 10,
        ..MonitorConfig::default()
    }
}

/// Publisher configuration for tests
pub fn publisher_config() -> PublisherConfig {
    PublisherConfig {
        gist_id: "0123456789abcdef".to_string(),
        gist_filename: "current_url.txt".to_string(),
        token: "test-token-value".to_string(),
        ..PublisherConfig::default()
    }
}
