//! `ft-graph` — navigation graph, spatial lookup, and route planning.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`graph`]   | `NavGraph` (CSR + R-tree), `NavGraphBuilder`, `VertexKind`    |
//! | [`planner`] | `Planner` trait, `Route`, `BfsPlanner`, `DijkstraPlanner`     |
//! | [`loader`]  | `load_nav_graph` (feature = `"json"`, on by default)          |
//! | [`error`]   | `GraphError`, `GraphResult<T>`                                |
//!
//! The graph is immutable once built.  Planning is a pure function of the
//! topology: current occupancy is never consulted here.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `json`  | Nav-graph JSON loading via `serde_json` (default).           |
//! | `serde` | Derives `Serialize`/`Deserialize` on public types.           |

pub mod error;
pub mod graph;
pub mod planner;

#[cfg(feature = "json")]
pub mod loader;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{NavGraph, NavGraphBuilder, VertexKind};
pub use planner::{plan_route, BfsPlanner, DijkstraPlanner, Planner, Route};

#[cfg(feature = "json")]
pub use loader::{load_nav_graph, load_nav_graph_reader};
