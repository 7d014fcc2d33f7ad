//! Polling engine: one background task per monitored endpoint, issuing a
//! GET every interval and publishing the latest poll state.
//!
//! Ticks never wait for outstanding requests, so cycles can overlap under a
//! slow network. Every request carries a monotonic sequence number and a
//! completed result is applied only if it is newer than the last applied
//! one, so a stale response cannot overwrite a fresher state.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tokio::sync::{mpsc, watch};
use tracing::{debug, trace};

use crate::client::HttpClient;
use crate::error::{DecodeError, PollError};
use crate::snapshot::{Decoder, Snapshot};

/// Externally observable status of one poller.
///
/// `Loading` only exists before the first completed response; afterwards
/// the state is always the most recently applied result.
#[derive(Debug, Clone, PartialEq)]
pub enum PollState {
    Loading,
    Ready(Snapshot),
    Failed(PollError),
}

impl PollState {
    pub fn snapshot(&self) -> Option<&Snapshot> {
        match self {
            PollState::Ready(snapshot) => Some(snapshot),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, PollState::Loading)
    }
}

#[derive(Debug, Clone)]
pub struct PollerConfig {
    pub url: String,
    pub interval: Duration,
    pub request_timeout: Duration,
}

/// Handle to a running poller. Dropping the handle also stops the poller,
/// so a torn-down dashboard cannot leak its timer.
pub struct PollerHandle {
    state_rx: watch::Receiver<PollState>,
    shutdown_tx: watch::Sender<bool>,
}

impl PollerHandle {
    /// The most recently published state.
    pub fn state(&self) -> PollState {
        self.state_rx.borrow().clone()
    }

    /// A receiver that observes every completed poll cycle.
    pub fn subscribe(&self) -> watch::Receiver<PollState> {
        self.state_rx.clone()
    }

    /// Stop the repeating timer. Idempotent; no further request is issued
    /// after this returns, and results of requests already in flight are
    /// discarded on arrival.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }
}

/// Start a poller against one endpoint. The first request fires
/// immediately, then one per `config.interval`.
pub fn spawn(client: Arc<dyn HttpClient>, config: PollerConfig, decode: Decoder) -> PollerHandle {
    let (state_tx, state_rx) = watch::channel(PollState::Loading);
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    tokio::spawn(run(client, config, decode, state_tx, shutdown_rx));

    PollerHandle {
        state_rx,
        shutdown_tx,
    }
}

async fn run(
    client: Arc<dyn HttpClient>,
    config: PollerConfig,
    decode: Decoder,
    state_tx: watch::Sender<PollState>,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    let mut ticker = tokio::time::interval(config.interval);
    let (outcome_tx, mut outcome_rx) = mpsc::unbounded_channel();

    let mut issued: u64 = 0;
    let mut applied: u64 = 0;

    debug!(url = %config.url, interval = ?config.interval, "poller started");

    loop {
        tokio::select! {
            // Stop requested, or the handle was dropped.
            _ = shutdown_rx.changed() => break,
            _ = ticker.tick() => {
                issued += 1;
                let seq = issued;
                let client = Arc::clone(&client);
                let url = config.url.clone();
                let timeout = config.request_timeout;
                let tx = outcome_tx.clone();
                tokio::spawn(async move {
                    let outcome = fetch_once(client.as_ref(), &url, timeout, decode).await;
                    // The engine may have stopped in the meantime.
                    let _ = tx.send((seq, outcome));
                });
            }
            Some((seq, outcome)) = outcome_rx.recv() => {
                if seq <= applied {
                    trace!(url = %config.url, seq, applied, "discarding out-of-order poll response");
                    continue;
                }
                applied = seq;
                let next = match outcome {
                    Ok(snapshot) => PollState::Ready(snapshot),
                    Err(e) => {
                        debug!(url = %config.url, seq, reason = %e.reason(), "poll cycle failed");
                        PollState::Failed(e)
                    }
                };
                state_tx.send_replace(next);
            }
        }
    }

    debug!(url = %config.url, "poller stopped");
}

/// One full request lifecycle: fetch, classify status, parse JSON, decode.
async fn fetch_once(
    client: &dyn HttpClient,
    url: &str,
    timeout: Duration,
    decode: Decoder,
) -> Result<Snapshot, PollError> {
    let response = tokio::time::timeout(timeout, client.get(url))
        .await
        .map_err(|_| PollError::Network(format!("request timed out after {}ms", timeout.as_millis())))??;

    if !response.is_success() {
        return Err(PollError::Status {
            status: response.status,
        });
    }

    let value: Value = serde_json::from_slice(&response.body).map_err(|e| {
        PollError::Decode(DecodeError {
            field: "$".to_string(),
            reason: format!("invalid JSON: {e}"),
        })
    })?;

    Ok(decode(&value)?)
}
