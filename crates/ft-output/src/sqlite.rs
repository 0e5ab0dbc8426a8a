//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `fleet.db` file in the configured output directory with
//! two tables: `events` and `agent_status`.  Absent optional values are
//! stored as `NULL`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::EventWriter;
use crate::{AgentStatusRow, EventRow, OutputResult};

/// Writes the event log and status table to an SQLite database.
pub struct SqliteEventLog {
    conn:     Connection,
    finished: bool,
}

impl SqliteEventLog {
    /// Open (or create) `fleet.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("fleet.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS events (
                 seq    INTEGER PRIMARY KEY AUTOINCREMENT,
                 tick   INTEGER NOT NULL,
                 kind   TEXT    NOT NULL,
                 agent  INTEGER,
                 vertex INTEGER,
                 detail TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS agent_status (
                 tick        INTEGER NOT NULL,
                 agent       INTEGER NOT NULL,
                 vertex      INTEGER NOT NULL,
                 status      TEXT    NOT NULL,
                 destination INTEGER,
                 next_vertex INTEGER,
                 PRIMARY KEY (tick, agent)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl EventWriter for SqliteEventLog {
    fn write_events(&mut self, rows: &[EventRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO events (tick, kind, agent, vertex, detail) \
                 VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![row.tick, row.kind, row.agent, row.vertex, row.detail])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_status(&mut self, rows: &[AgentStatusRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO agent_status \
                 (tick, agent, vertex, status, destination, next_vertex) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.tick,
                    row.agent,
                    row.vertex,
                    row.status.as_str(),
                    row.destination,
                    row.next_vertex,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
