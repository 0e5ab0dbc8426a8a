//! `ft-reserve` — the single source of truth for vertex occupancy.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                 |
//! |-------------|----------------------------------------------------------|
//! | [`table`]   | `ReservationTable` — holder, promise, and FIFO queue per vertex |
//! | [`outcome`] | `Acquire`, `Release` result enums                        |
//!
//! # Per-vertex state
//!
//! ```text
//!  holder:   Option<AgentId>      who stands on the vertex
//!  promised: Option<AgentId>      head popped by the last release, not yet granted
//!  queue:    VecDeque<AgentId>    FIFO of agents denied entry
//! ```
//!
//! `release` never grants.  It pops the queue head into `promised` and hands
//! it back to the caller; from then on only that agent can acquire the
//! vertex.  This keeps FIFO order intact even if another agent asks for the
//! vertex before the scheduler delivers the grant.
//!
//! The table has exactly one mutator (the scheduler in `ft-sim`).  Robots
//! read it through snapshots only.
//!
//! # Feature flags
//!
//! | Flag      | Effect                                                 |
//! |-----------|--------------------------------------------------------|
//! | `fx-hash` | FxHash instead of SipHash for the agent → vertex index |

pub mod outcome;
pub mod table;

#[cfg(test)]
mod tests;

pub use outcome::{Acquire, Release};
pub use table::ReservationTable;
