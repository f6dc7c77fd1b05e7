//! Environment-driven configuration for both binaries
//!
//! ## Monitor
//! - `BEACON_POINTER_URL`: raw-content URL of the pointer record (optional)
//! - `BEACON_STATIC_URLS`: comma-separated addresses, replaces the defaults
//! - `BEACON_CHECK_INTERVAL_SECS`, `BEACON_PROBE_TIMEOUT_SECS`,
//!   `BEACON_RESOLVE_TIMEOUT_SECS`
//! - `BEACON_NOTIFY_PROGRAM`, `BEACON_NOTIFY_APP`
//!
//! ## Publisher
//! - `BEACON_GIST_ID`, `BEACON_GIST_FILENAME`, `BEACON_GITHUB_TOKEN`
//! - `BEACON_TUNNEL_API_URL`, `BEACON_GIST_API_BASE`
//! - `BEACON_PUBLISH_INTERVAL_SECS`, `BEACON_TUNNEL_TIMEOUT_SECS`,
//!   `BEACON_WRITE_TIMEOUT_SECS`
//!
//! Loading never fails. Unparseable or zero numbers keep their default and
//! log a warning; everything else is checked later by `validate()`.

use beacon_core::{MonitorConfig, PublisherConfig};

/// Load the monitor configuration from the process environment
pub fn monitor_from_env() -> MonitorConfig {
    monitor_from_lookup(|key| std::env::var(key).ok())
}

/// Load the publisher configuration from the process environment
pub fn publisher_from_env() -> PublisherConfig {
    publisher_from_lookup(|key| std::env::var(key).ok())
}

/// Build a monitor configuration from an arbitrary variable lookup
pub fn monitor_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> MonitorConfig {
    let mut config = MonitorConfig::default();

    config.pointer_location = lookup("BEACON_POINTER_URL")
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    if let Some(list) = lookup("BEACON_STATIC_URLS") {
        config.static_endpoints = split_list(&list);
    }

    config.check_interval_secs = seconds(
        &lookup,
        "BEACON_CHECK_INTERVAL_SECS",
        config.check_interval_secs,
    );
    config.probe_timeout_secs = seconds(
        &lookup,
        "BEACON_PROBE_TIMEOUT_SECS",
        config.probe_timeout_secs,
    );
    config.resolve_timeout_secs = seconds(
        &lookup,
        "BEACON_RESOLVE_TIMEOUT_SECS",
        config.resolve_timeout_secs,
    );

    if let Some(program) = non_empty(&lookup, "BEACON_NOTIFY_PROGRAM") {
        config.alert.program = program;
    }
    if let Some(app) = non_empty(&lookup, "BEACON_NOTIFY_APP") {
        config.alert.app_tag = app;
    }

    config
}

/// Build a publisher configuration from an arbitrary variable lookup
pub fn publisher_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> PublisherConfig {
    let mut config = PublisherConfig::default();

    config.gist_id = lookup("BEACON_GIST_ID").unwrap_or_default().trim().to_string();
    config.gist_filename = lookup("BEACON_GIST_FILENAME")
        .unwrap_or_default()
        .trim()
        .to_string();
    config.token = lookup("BEACON_GITHUB_TOKEN")
        .unwrap_or_default()
        .trim()
        .to_string();

    if let Some(url) = non_empty(&lookup, "BEACON_TUNNEL_API_URL") {
        config.tunnel_api_url = url;
    }
    if let Some(base) = non_empty(&lookup, "BEACON_GIST_API_BASE") {
        config.gist_api_base = base;
    }

    config.publish_interval_secs = seconds(
        &lookup,
        "BEACON_PUBLISH_INTERVAL_SECS",
        config.publish_interval_secs,
    );
    config.tunnel_timeout_secs = seconds(
        &lookup,
        "BEACON_TUNNEL_TIMEOUT_SECS",
        config.tunnel_timeout_secs,
    );
    config.write_timeout_secs = seconds(
        &lookup,
        "BEACON_WRITE_TIMEOUT_SECS",
        config.write_timeout_secs,
    );

    config
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse a positive number of seconds, keeping `default` otherwise
fn seconds(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u64) -> u64 {
    let Some(raw) = non_empty(lookup, key) else {
        return default;
    };

    match raw.parse::<u64>() {
        Ok(value) if value > 0 => value,
        _ => {
            tracing::warn!(
                "{} must be a positive number of seconds, got '{}'. Using {}.",
                key,
                raw,
                default
            );
            default
        }
    }
}
