//! `EventLogObserver<W>` — bridges `EventSink` to an `EventWriter`.

use ft_agent::RobotStore;
use ft_core::Tick;
use ft_sim::{Event, EventSink};

use crate::row::{AgentStatusRow, EventRow};
use crate::writer::EventWriter;
use crate::{OutputError, OutputResult};

/// An [`EventSink`] that writes every event, plus periodic status-table
/// snapshots, to any [`EventWriter`] backend.
///
/// Events are buffered for the duration of a tick and written as one batch
/// in `on_tick_end`.  Errors from the writer are stored internally because
/// `EventSink` methods have no return value.  After `engine.run()` returns,
/// check for errors with [`take_error`][Self::take_error].
pub struct EventLogObserver<W: EventWriter> {
    writer:          W,
    /// Write the status table every this many ticks.  0 disables it.
    status_interval: u64,
    buffer:          Vec<EventRow>,
    last_error:      Option<OutputError>,
}

impl<W: EventWriter> EventLogObserver<W> {
    /// An observer that records the status table every tick.
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            status_interval: 1,
            buffer:          Vec::new(),
            last_error:      None,
        }
    }

    /// Record the status table every `ticks` ticks (0 = never).
    pub fn with_status_interval(mut self, ticks: u64) -> Self {
        self.status_interval = ticks;
        self
    }

    /// Take the stored write error (if any) after `engine.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Flush the writer.  `run` does this on its own; call it after driving
    /// the engine with `run_ticks`.
    pub fn finish(&mut self) -> OutputResult<()> {
        self.writer.finish()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: EventWriter> EventSink for EventLogObserver<W> {
    fn on_event(&mut self, tick: Tick, event: &Event) {
        self.buffer.push(EventRow::from_event(tick, event));
    }

    fn on_tick_end(&mut self, tick: Tick, robots: &RobotStore) {
        if !self.buffer.is_empty() {
            let result = self.writer.write_events(&self.buffer);
            self.buffer.clear();
            self.store_err(result);
        }

        if tick.falls_on(self.status_interval) {
            let rows: Vec<AgentStatusRow> = robots
                .iter()
                .map(|r| AgentStatusRow::from_robot(tick, r))
                .collect();
            if !rows.is_empty() {
                let result = self.writer.write_status(&rows);
                self.store_err(result);
            }
        }
    }

    fn on_run_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
