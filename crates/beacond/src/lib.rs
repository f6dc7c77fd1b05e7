// # beacond
//
// Thin integration layer shared by the `beacon-monitor` and
// `beacon-publisher` binaries:
//
// 1. Reading configuration from environment variables
// 2. Initializing logging
// 3. Waiting for shutdown signals
//
// All monitoring and publishing logic lives in beacon-core.

pub mod settings;

use std::process::ExitCode;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};

/// Environment variable selecting the log level
pub const LOG_LEVEL_VAR: &str = "BEACON_LOG_LEVEL";

/// Exit codes for different termination scenarios
///
/// Configuration faults never stop the loops, so there is no
/// configuration exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeaconExitCode {
    /// Clean shutdown (normal exit)
    CleanShutdown = 0,
    /// Logging or runtime could not be set up
    RuntimeError = 2,
}

impl From<BeaconExitCode> for ExitCode {
    fn from(code: BeaconExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Parse a log level name, defaulting to info
pub fn parse_log_level(value: &str) -> Level {
    match value.trim().to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Install the global tracing subscriber
pub fn init_logging() -> anyhow::Result<()> {
    let level = std::env::var(LOG_LEVEL_VAR)
        .map(|v| parse_log_level(&v))
        .unwrap_or(Level::INFO);

    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))
}

/// Build the multi-threaded runtime both binaries run on
pub fn build_runtime() -> anyhow::Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to create tokio runtime: {}", e))
}

/// Wait for SIGTERM or SIGINT
///
/// Returns the name of the signal received. If the handlers cannot be
/// installed the future never completes, and the process runs until killed.
#[cfg(unix)]
pub async fn shutdown_signal() -> &'static str {
    let (mut sigterm, mut sigint) =
        match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                tracing::error!("Failed to set up signal handlers: {}", e);
                return std::future::pending().await;
            }
        };

    let name = tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = sigint.recv() => "SIGINT",
    };
    tracing::info!("Received shutdown signal: {}", name);
    name
}

/// Wait for CTRL-C
///
/// Fallback implementation for non-Unix platforms.
#[cfg(not(unix))]
pub async fn shutdown_signal() -> &'static str {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to wait for CTRL-C: {}", e);
        return std::future::pending().await;
    }
    tracing::info!("Received shutdown signal: SIGINT");
    "SIGINT"
}
