//! `ft-core` — foundational types for the fleet traffic engine.
//!
//! This crate is a dependency of every other `ft-*` crate.  It intentionally
//! has no `ft-*` dependencies and minimal external ones (only `rand` and
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `AgentId`, `VertexId`, `LaneId`                       |
//! | [`geo`]         | `Point2`, Euclidean distance                          |
//! | [`time`]        | `Tick`                                                |
//! | [`status`]      | `AgentStatus` — closed set of robot states            |
//! | [`config`]      | `EngineConfig`                                        |
//! | [`rng`]         | `SimRng` (seeded task generation for hosts/demos)     |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod status;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::EngineConfig;
pub use error::{CoreError, CoreResult};
pub use geo::Point2;
pub use ids::{AgentId, LaneId, VertexId};
pub use rng::SimRng;
pub use status::AgentStatus;
pub use time::Tick;
