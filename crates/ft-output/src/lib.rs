//! `ft-output` — event-log and status-table sinks for the fleet traffic
//! engine.
//!
//! | Feature   | Backend   | Files created                          |
//! |-----------|-----------|----------------------------------------|
//! | *(none)*  | CSV       | `events.csv`, `agent_status.csv`       |
//! | `sqlite`  | SQLite    | `fleet.db` (`events`, `agent_status`)  |
//!
//! File backends implement [`EventWriter`] and are driven by
//! [`EventLogObserver`], which implements `ft_sim::EventSink`.
//! [`TracingSink`] needs no backend: it forwards every event to `tracing`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ft_output::{CsvEventLog, EventLogObserver};
//!
//! let writer = CsvEventLog::new(Path::new("./output"))?;
//! let mut obs = EventLogObserver::new(writer);
//! engine.run(&mut obs);
//! if let Some(e) = obs.take_error() {
//!     eprintln!("output error: {e}");
//! }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod tracing_sink;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;


pub use csv::CsvEventLog;
pub use error::{OutputError, OutputResult};
pub use observer::EventLogObserver;
pub use row::{AgentStatusRow, EventRow};
pub use tracing_sink::TracingSink;
pub use writer::EventWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteEventLog;
