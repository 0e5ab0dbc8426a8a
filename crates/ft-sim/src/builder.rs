//! Fluent builder for constructing an [`Engine`].

use ft_core::{EngineConfig, VertexId};
use ft_graph::{BfsPlanner, NavGraph, Planner};

use crate::{Engine, EngineResult};

/// Fluent builder for [`Engine<P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method               | Default                    |
/// |----------------------|----------------------------|
/// | `.config(c)`         | `EngineConfig::default()`  |
/// | `.planner(p)`        | [`BfsPlanner`]             |
/// | `.initial_agents(v)` | no robots                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = EngineBuilder::new(graph)
///     .config(config)
///     .planner(DijkstraPlanner)
///     .initial_agents(vec![VertexId(0), VertexId(4)])
///     .build()?;
/// ```
pub struct EngineBuilder<P: Planner = BfsPlanner> {
    graph:     NavGraph,
    config:    EngineConfig,
    planner:   P,
    positions: Vec<VertexId>,
}

impl EngineBuilder<BfsPlanner> {
    /// Start from a graph with default configuration and the BFS planner.
    pub fn new(graph: NavGraph) -> Self {
        Self {
            graph,
            config:    EngineConfig::default(),
            planner:   BfsPlanner,
            positions: Vec::new(),
        }
    }
}

impl<P: Planner> EngineBuilder<P> {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Swap the route planner.
    pub fn planner<Q: Planner>(self, planner: Q) -> EngineBuilder<Q> {
        EngineBuilder {
            graph:     self.graph,
            config:    self.config,
            planner,
            positions: self.positions,
        }
    }

    /// Robots to spawn at build time, in id order.  Their `Spawned` events
    /// are returned by the first `tick()`.
    pub fn initial_agents(mut self, positions: Vec<VertexId>) -> Self {
        self.positions = positions;
        self
    }

    /// Validate the configuration, spawn the initial robots, and return a
    /// ready-to-tick [`Engine`].
    ///
    /// # Errors
    ///
    /// `Config` for invalid settings; `UnknownVertex`/`VertexOccupied` if an
    /// initial position cannot be claimed.
    pub fn build(self) -> EngineResult<Engine<P>> {
        self.config.validate()?;
        let mut engine = Engine::new(self.graph, self.config, self.planner);
        for at in self.positions {
            engine.spawn_agent(at)?;
        }
        Ok(engine)
    }
}
