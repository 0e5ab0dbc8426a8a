//! `ft-sim` — the negotiation scheduler.
//!
//! # Tick loop
//!
//! ```text
//! tick():
//!   ① Agent pass  — every live robot, ascending AgentId (= spawn order),
//!                   gets exactly one state-machine step:
//!                     Advance → try_acquire(next); Granted → release(current)
//!                                                  Denied  → wait
//!                     Replan  → planner from the current vertex
//!                     Finish  → TaskComplete
//!   ② Delivery    — every vertex freed during the tick is handed to its
//!                   promised FIFO head, which moves immediately (same tick).
//!                   That move may free another vertex; hand-offs are
//!                   processed first-in, first-out until none remain.
//!   ③ Deadlocks   — cycles in the wait-for relation are rotated one vertex
//!                   forward atomically (`EngineConfig::resolve_deadlocks`).
//! ```
//!
//! Every reservation mutation goes through the [`Engine`]; robots only
//! decide.  The loop is single-threaded, so no robot ever observes a
//! half-applied step of another.
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ft_sim::{EngineBuilder, NoopSink};
//!
//! let mut engine = EngineBuilder::new(graph).build()?;
//! let a = engine.spawn_agent(VertexId(0))?;
//! engine.assign_destination(a, VertexId(2))?;
//! let events = engine.tick();
//! ```

pub mod builder;
pub mod deadlock;
pub mod engine;
pub mod error;
pub mod event;
pub mod snapshot;


pub use builder::EngineBuilder;
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use event::{Event, EventSink, NoopSink};
pub use snapshot::{AgentView, ReservationView, Snapshot, VertexView};
