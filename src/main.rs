use std::sync::Arc;

use grid_hmi::client::{HttpClient, ReqwestClient};
use grid_hmi::config::Config;
use grid_hmi::poller::{self, PollerConfig, PollerHandle};
use grid_hmi::snapshot::{self, Decoder};
use grid_hmi::dashboard;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    let config = Config::from_env()?;
    let client: Arc<dyn HttpClient> = Arc::new(ReqwestClient::new()?);

    let mut handles = Vec::new();
    if let Some(url) = config.endpoints.hmi.clone() {
        handles.push(start_dashboard(
            &client,
            &config,
            "hmi",
            url,
            snapshot::decode_household_pair,
        ));
    }
    if let Some(url) = config.endpoints.power_meter.clone() {
        handles.push(start_dashboard(
            &client,
            &config,
            "power-meter",
            url,
            snapshot::decode_power_meter,
        ));
    }
    if let Some(url) = config.endpoints.transfer_switch.clone() {
        handles.push(start_dashboard(
            &client,
            &config,
            "transfer-switch",
            url,
            snapshot::decode_transfer_switch,
        ));
    }
    info!("{} dashboard(s) polling; press Ctrl-C to stop", handles.len());

    tokio::signal::ctrl_c().await?;
    info!("shutdown requested");
    for handle in &handles {
        handle.stop();
    }

    Ok(())
}

/// Spawn the poller for one subsystem plus the task that logs its state.
fn start_dashboard(
    client: &Arc<dyn HttpClient>,
    config: &Config,
    subsystem: &'static str,
    url: String,
    decode: Decoder,
) -> PollerHandle {
    info!(subsystem, endpoint = %url, "starting dashboard poller");

    let handle = poller::spawn(
        Arc::clone(client),
        PollerConfig {
            url,
            interval: config.poll.interval(),
            request_timeout: config.poll.request_timeout(),
        },
        decode,
    );
    tokio::spawn(dashboard::run_display(subsystem, handle.subscribe()));

    handle
}
