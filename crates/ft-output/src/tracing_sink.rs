//! `TracingSink` — the fleet log as structured `tracing` records.

use tracing::{info, warn};

use ft_core::Tick;
use ft_sim::{Event, EventSink};

/// An [`EventSink`] that emits one `tracing` record per engine event under
/// the `fleet` target.
///
/// Unreachable destinations are logged at `WARN`, everything else at
/// `INFO`.  Filter with e.g. `RUST_LOG=fleet=info`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn on_event(&mut self, tick: Tick, event: &Event) {
        let agent  = event.agent().map(|a| a.0);
        let vertex = event.vertex().map(|v| v.0);
        match event {
            Event::Unreachable { .. } => warn!(
                target: "fleet",
                tick = tick.0, kind = event.kind(), agent, vertex,
                "{event}"
            ),
            _ => info!(
                target: "fleet",
                tick = tick.0, kind = event.kind(), agent, vertex,
                "{event}"
            ),
        }
    }

    fn on_run_end(&mut self, final_tick: Tick) {
        info!(target: "fleet", tick = final_tick.0, "run finished");
    }
}
