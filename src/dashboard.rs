//! Thin presentation layer: turns the latest poll state into display lines
//! and logs them as poll cycles complete. All layout beyond plain text is
//! out of scope.

use tokio::sync::watch;
use tracing::{debug, info};

use crate::derived::{active_source_label, day_cycle_phase, format_time_of_day};
use crate::poller::PollState;
use crate::snapshot::{PlcSnapshot, Snapshot};

/// Presentation-ready lines for one subsystem's current state.
pub fn render(state: &PollState) -> Vec<String> {
    match state {
        PollState::Loading => vec!["Loading...".to_string()],
        PollState::Failed(e) => {
            vec![format!("Error: {}. Simulation may be offline", e.reason())]
        }
        PollState::Ready(snapshot) => render_snapshot(snapshot),
    }
}

fn render_snapshot(snapshot: &Snapshot) -> Vec<String> {
    match snapshot {
        Snapshot::Plc(plc) => render_plc(plc),
        Snapshot::HouseholdPair(pair) => {
            let mut lines = vec!["Household 1".to_string()];
            lines.extend(render_plc(&pair.household1));
            lines.push("Household 2".to_string());
            lines.extend(render_plc(&pair.household2));
            lines
        }
        Snapshot::PowerMeter(pm) => {
            let time = format_time_of_day(pm.elapsed_minutes);
            let hours = (pm.elapsed_minutes / 60) % 24;
            vec![
                format!("Time: {} ({})", time, day_cycle_phase(hours)),
                format!("Power Output: {:.2} W", pm.reading),
            ]
        }
        Snapshot::TransferSwitch(ts) => {
            vec![format!(
                "Transfer Switch Status: {}",
                active_source_label(ts.active_source)
            )]
        }
    }
}

fn render_plc(plc: &PlcSnapshot) -> Vec<String> {
    vec![
        format!(
            "Current solar panel power meter reading: {} mW",
            plc.meter_reading()
        ),
        format!("Switching threshold: {} mW", plc.switching_threshold()),
        format!("Current input power: {}", active_source_label(plc.coil_state)),
    ]
}

/// Log rendered state for one subsystem as cycles complete. Unchanged
/// values are logged at debug so a steady simulation does not flood the
/// output at a 100ms cadence.
pub async fn run_display(subsystem: &str, mut rx: watch::Receiver<PollState>) {
    let mut last: Option<PollState> = None;

    loop {
        let state = rx.borrow_and_update().clone();
        let line = render(&state).join(" | ");
        if last.as_ref() != Some(&state) {
            info!(subsystem, "{line}");
        } else {
            debug!(subsystem, "{line}");
        }
        last = Some(state);

        if rx.changed().await.is_err() {
            break;
        }
    }
}
