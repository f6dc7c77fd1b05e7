// # beacon-publisher
//
// Periodically reads the public address of the local ngrok tunnel and
// writes it to the pointer record (a GitHub Gist file) whenever it changes.
//
// ## Example
//
// ```bash
// export BEACON_GIST_ID=<gist id>
// export BEACON_GIST_FILENAME=current_url.txt
// export BEACON_GITHUB_TOKEN=<token with gist scope>
// beacon-publisher
// ```
//
// See `beacond::settings` for every variable.

use beacon_core::{Publisher, PublisherEvent};
use beacon_store_gist::GistPointerStore;
use beacon_tunnel_ngrok::NgrokTunnelSource;
use beacond::{BeaconExitCode, build_runtime, init_logging, settings, shutdown_signal};
use std::process::ExitCode;
use tracing::{debug, error, info};

fn main() -> ExitCode {
    if let Err(e) = init_logging() {
        eprintln!("{}", e);
        return BeaconExitCode::RuntimeError.into();
    }

    let config = settings::publisher_from_env();

    let rt = match build_runtime() {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("{}", e);
            return BeaconExitCode::RuntimeError.into();
        }
    };

    rt.block_on(async {
        info!("Starting beacon-publisher");
        info!(
            "Watching {} every {} seconds",
            config.tunnel_api_url, config.publish_interval_secs
        );

        let (mut publisher, mut events) = Publisher::new(
            Box::new(NgrokTunnelSource::from(&config)),
            Box::new(GistPointerStore::from(&config)),
            &config,
        );

        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                match event {
                    PublisherEvent::AddressChanged { address, previous } => {
                        debug!("Pointer record moved from {:?} to {}", previous, address)
                    }
                    PublisherEvent::CycleCompleted(outcome) => {
                        debug!("Publish cycle completed: {:?}", outcome)
                    }
                }
            }
        });

        let cycles = publisher
            .run(async {
                shutdown_signal().await;
            })
            .await;

        info!("Publishing stopped after {} cycle(s)", cycles);
    });

    BeaconExitCode::CleanShutdown.into()
}
