//! CSV output backend.
//!
//! Creates two files in the configured output directory:
//! - `events.csv`
//! - `agent_status.csv`
//!
//! Absent optional values are written as empty fields.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::EventWriter;
use crate::{AgentStatusRow, EventRow, OutputResult};

/// Writes the event log and status table to two CSV files.
pub struct CsvEventLog {
    events:   Writer<File>,
    status:   Writer<File>,
    finished: bool,
}

fn opt(v: Option<u32>) -> String {
    v.map(|x| x.to_string()).unwrap_or_default()
}

impl CsvEventLog {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut events = Writer::from_path(dir.join("events.csv"))?;
        events.write_record(["tick", "kind", "agent", "vertex", "detail"])?;

        let mut status = Writer::from_path(dir.join("agent_status.csv"))?;
        status.write_record(["tick", "agent", "vertex", "status", "destination", "next_vertex"])?;

        Ok(Self { events, status, finished: false })
    }
}

impl EventWriter for CsvEventLog {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        for row in rows {
            self.events.write_record(&[
                row.tick.to_string(),
                row.kind.to_owned(),
                opt(row.agent),
                opt(row.vertex),
                row.detail.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_status(&mut self, rows: &[AgentStatusRow]) -> OutputResult<()> {
        for row in rows {
            self.status.write_record(&[
                row.tick.to_string(),
                row.agent.to_string(),
                row.vertex.to_string(),
                row.status.as_str().to_owned(),
                opt(row.destination),
                opt(row.next_vertex),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.events.flush()?;
        self.status.flush()?;
        Ok(())
    }
}
