//! The `EventWriter` trait implemented by all backend writers.

use crate::{AgentStatusRow, EventRow, OutputResult};

/// Trait implemented by the CSV and SQLite event logs.
///
/// Errors are stored by the observer and retrieved with
/// [`EventLogObserver::take_error`][crate::EventLogObserver::take_error].
pub trait EventWriter {
    /// Append one tick's events, in emission order.
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()>;

    /// Append one status-table snapshot (one row per live robot).
    fn write_status(&mut self, rows: &[AgentStatusRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
