//! Configuration types for the beacon system
//!
//! Both loops receive an immutable configuration built once at startup.
//! Validation reports configuration faults; callers log them and keep
//! running in a degraded mode.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Statically monitored addresses used when none are configured
pub const DEFAULT_STATIC_ENDPOINTS: &[&str] = &[
    "https://www.youtube.com",
    "https://coddy.tech",
    "https://this-website-is-fake-123xyz.com",
];

/// Local ngrok API listing active tunnels
pub const DEFAULT_TUNNEL_API_URL: &str = "http://127.0.0.1:4040/api/tunnels";

/// GitHub REST API base
pub const DEFAULT_GIST_API_BASE: &str = "https://api.github.com";

/// Markers left in template values that were never filled in
const PLACEHOLDER_MARKERS: &[&str] = &[
    "YOUR_USERNAME",
    "YOUR_GIST_ID",
    "YOUR_FILENAME",
    "YOUR_TOKEN",
    "REPLACE_ME",
];

/// Whether a configured value still carries a template placeholder
pub fn is_placeholder(value: &str) -> bool {
    let upper = value.to_uppercase();
    PLACEHOLDER_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Monitor loop configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Addresses probed every cycle, in this order
    #[serde(default = "default_static_endpoints")]
    pub static_endpoints: Vec<String>,

    /// Raw-content URL of the pointer record
    ///
    /// `None` disables dynamic resolution.
    #[serde(default)]
    pub pointer_location: Option<String>,

    /// Sleep between cycles (in seconds)
    #[serde(default = "default_interval_secs")]
    pub check_interval_secs: u64,

    /// Timeout for each endpoint probe (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub probe_timeout_secs: u64,

    /// Timeout for the pointer read (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub resolve_timeout_secs: u64,

    /// Alert settings
    #[serde(default)]
    pub alert: AlertConfig,
}

impl MonitorConfig {
    /// Validate the configuration
    ///
    /// A missing pointer location is not a fault: the monitor simply runs
    /// on the static set.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if let Some(location) = &self.pointer_location {
            if location.trim().is_empty() {
                return Err(crate::Error::config("Pointer location cannot be empty"));
            }
            if is_placeholder(location) {
                return Err(crate::Error::config(format!(
                    "Pointer location is still a template placeholder: {}",
                    location
                )));
            }
        }

        if self.check_interval_secs == 0 {
            return Err(crate::Error::config("Check interval must be > 0"));
        }
        if self.probe_timeout_secs == 0 || self.resolve_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeouts must be > 0"));
        }

        if self.static_endpoints.iter().any(|e| e.trim().is_empty()) {
            return Err(crate::Error::config("Static endpoints cannot be empty strings"));
        }

        self.alert.validate()
    }

    /// Interval between cycles
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs)
    }

    /// Timeout for one probe
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Timeout for one pointer read
    pub fn resolve_timeout(&self) -> Duration {
        Duration::from_secs(self.resolve_timeout_secs)
    }
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            static_endpoints: default_static_endpoints(),
            pointer_location: None,
            check_interval_secs: default_interval_secs(),
            probe_timeout_secs: default_request_timeout_secs(),
            resolve_timeout_secs: default_request_timeout_secs(),
            alert: AlertConfig::default(),
        }
    }
}

/// Alert settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Program invoked to raise a desktop alert
    #[serde(default = "default_notify_program")]
    pub program: String,

    /// Application tag passed to the program
    #[serde(default = "default_app_tag")]
    pub app_tag: String,

    /// Title of down alerts
    #[serde(default = "default_down_title")]
    pub down_title: String,

    /// Timeout for one alert invocation (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub timeout_secs: u64,
}

impl AlertConfig {
    /// Validate the alert settings
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.program.trim().is_empty() {
            return Err(crate::Error::config("Alert program cannot be empty"));
        }
        if self.timeout_secs == 0 {
            return Err(crate::Error::config("Alert timeout must be > 0"));
        }
        Ok(())
    }
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            program: default_notify_program(),
            app_tag: default_app_tag(),
            down_title: default_down_title(),
            timeout_secs: default_request_timeout_secs(),
        }
    }
}

/// Publisher loop configuration
///
/// # Security
///
/// The Debug implementation does NOT expose the token.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublisherConfig {
    /// Identifier of the gist holding the pointer record
    #[serde(default)]
    pub gist_id: String,

    /// File inside the gist holding the address
    #[serde(default)]
    pub gist_filename: String,

    /// Bearer credential for writes
    /// ⚠️ NEVER log this value
    #[serde(default)]
    pub token: String,

    /// Local tunnel status endpoint
    #[serde(default = "default_tunnel_api_url")]
    pub tunnel_api_url: String,

    /// Base URL of the gist API
    #[serde(default = "default_gist_api_base")]
    pub gist_api_base: String,

    /// Sleep between cycles (in seconds)
    #[serde(default = "default_interval_secs")]
    pub publish_interval_secs: u64,

    /// Timeout for the local tunnel query (in seconds)
    #[serde(default = "default_tunnel_timeout_secs")]
    pub tunnel_timeout_secs: u64,

    /// Timeout for the remote write (in seconds)
    #[serde(default = "default_request_timeout_secs")]
    pub write_timeout_secs: u64,
}

impl PublisherConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.gist_id.trim().is_empty() {
            return Err(crate::Error::config("Gist id is required"));
        }
        if self.gist_filename.trim().is_empty() {
            return Err(crate::Error::config("Gist filename is required"));
        }
        if self.token.is_empty() {
            return Err(crate::Error::config("Bearer token is required"));
        }
        if is_placeholder(&self.gist_id)
            || is_placeholder(&self.gist_filename)
            || is_placeholder(&self.token)
        {
            return Err(crate::Error::config(
                "Gist id, filename or token is still a template placeholder",
            ));
        }
        if self.publish_interval_secs == 0 {
            return Err(crate::Error::config("Publish interval must be > 0"));
        }
        if self.tunnel_timeout_secs == 0 || self.write_timeout_secs == 0 {
            return Err(crate::Error::config("Request timeouts must be > 0"));
        }
        Ok(())
    }

    /// Interval between cycles
    pub fn publish_interval(&self) -> Duration {
        Duration::from_secs(self.publish_interval_secs)
    }

    /// Timeout for the local tunnel query
    pub fn tunnel_timeout(&self) -> Duration {
        Duration::from_secs(self.tunnel_timeout_secs)
    }

    /// Timeout for the remote write
    pub fn write_timeout(&self) -> Duration {
        Duration::from_secs(self.write_timeout_secs)
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            gist_id: String::new(),
            gist_filename: String::new(),
            token: String::new(),
            tunnel_api_url: default_tunnel_api_url(),
            gist_api_base: default_gist_api_base(),
            publish_interval_secs: default_interval_secs(),
            tunnel_timeout_secs: default_tunnel_timeout_secs(),
            write_timeout_secs: default_request_timeout_secs(),
        }
    }
}

// Custom Debug implementation that hides the token
impl fmt::Debug for PublisherConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PublisherConfig")
            .field("gist_id", &self.gist_id)
            .field("gist_filename", &self.gist_filename)
            .field("token", &"<REDACTED>")
            .field("tunnel_api_url", &self.tunnel_api_url)
            .field("gist_api_base", &self.gist_api_base)
            .field("publish_interval_secs", &self.publish_interval_secs)
            .field("tunnel_timeout_secs", &self.tunnel_timeout_secs)
            .field("write_timeout_secs", &self.write_timeout_secs)
            .finish()
    }
}

fn default_static_endpoints() -> Vec<String> {
    DEFAULT_STATIC_ENDPOINTS.iter().map(|s| s.to_string()).collect()
}

fn default_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_tunnel_timeout_secs() -> u64 {
    5
}

fn default_notify_program() -> String {
    "dunstify".to_string()
}

fn default_app_tag() -> String {
    "WebsiteMonitor".to_string()
}

fn default_down_title() -> String {
    "Website Down Alert!".to_string()
}

fn default_tunnel_api_url() -> String {
    DEFAULT_TUNNEL_API_URL.to_string()
}

fn default_gist_api_base() -> String {
    DEFAULT_GIST_API_BASE.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn publisher_config() -> PublisherConfig {
        PublisherConfig {
            gist_id: "abc123".to_string(),
            gist_filename: "current_url.txt".to_string(),
            token: "ghp_secret_value".to_string(),
            ..PublisherConfig::default()
        }
    }

    #[test]
    fn monitor_defaults_are_valid() {
        let config = MonitorConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.check_interval(), Duration::from_secs(300));
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.static_endpoints.len(), 3);
        assert_eq!(config.alert.down_title, "Website Down Alert!");
    }

    #[test]
    fn templated_pointer_location_is_a_fault() {
        let config = MonitorConfig {
            pointer_location: Some(
                "https://gist.githubusercontent.com/YOUR_USERNAME/YOUR_GIST_ID/raw/YOUR_FILENAME"
                    .to_string(),
            ),
            ..MonitorConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn missing_pointer_location_is_not_a_fault() {
        let config = MonitorConfig {
            pointer_location: None,
            ..MonitorConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn publisher_requires_identifiers() {
        assert!(publisher_config().validate().is_ok());
        assert!(PublisherConfig::default().validate().is_err());

        let config = PublisherConfig {
            token: "YOUR_TOKEN".to_string(),
            ..publisher_config()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn publisher_debug_redacts_token() {
        let rendered = format!("{:?}", publisher_config());
        assert!(!rendered.contains("ghp_secret_value"));
        assert!(rendered.contains("<REDACTED>"));
    }

    #[test]
    fn monitor_config_deserializes_with_defaults() {
        let config: MonitorConfig =
            serde_json::from_str(r#"{"pointer_location": "https://example.test/raw"}"#).unwrap();
        assert_eq!(config.check_interval_secs, 300);
        assert_eq!(config.alert.program, "dunstify");
        assert_eq!(config.static_endpoints, default_static_endpoints());
    }
}
