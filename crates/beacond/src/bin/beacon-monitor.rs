// # beacon-monitor
//
// Periodically probes the static endpoints plus the address published in the
// pointer record, and raises a desktop notification for every endpoint that
// is down.
//
// ## Example
//
// ```bash
// export BEACON_POINTER_URL=https://gist.githubusercontent.com/<user>/<gist>/raw/current_url.txt
// export BEACON_STATIC_URLS=https://example.com,https://example.org
// beacon-monitor
// ```
//
// See `beacond::settings` for every variable.

use beacon_core::{AlertDispatcher, Monitor, MonitorEvent};
use beacon_http::{HttpProber, HttpResolver};
use beacon_notify::{CommandNotifier, PathProbe};
use beacond::{BeaconExitCode, build_runtime, init_logging, settings, shutdown_signal};
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("{}", e);
        return BeaconExitCode::RuntimeError.into();
    }

    let config = settings::monitor_from_env();

    let rt = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{}", e);
            return BeaconExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        info!("Starting beacon-monitor");
        info!(
            "Monitoring {} static endpoint(s), checking every {} seconds",
            config.static_endpoints.len(),
            config.check_interval_secs
        );

        let dispatcher = AlertDispatcher::new(
            Box::new(CommandNotifier::from(&config.alert)),
            &PathProbe::from(&config.alert),
        );

        let (mut monitor, mut events) = Monitor::new(
            Box::new(HttpResolver::new(config.resolve_timeout())),
            Box::new(HttpProber::new()),
            dispatcher,
            &config,
        );

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    MonitorEvent::CycleCompleted { up, down } => {
                        debug!("Cycle completed: {} up, {} down", up, down)
                    }
                    other => debug!("Monitor event: {:?}", other),
                }
            }
        });

        let cycles = monitor
            .run(async {
                shutdown_signal().await;
            })
            .await;

        info!("Monitoring stopped after {} cycle(s)", cycles);
    });

    BeaconExitCode::CleanShutdown.into()
}
