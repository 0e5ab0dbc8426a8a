//! Read-only engine views for rendering.

use ft_core::{AgentId, AgentStatus, Point2, Tick, VertexId};
use ft_graph::VertexKind;

/// A copy of everything a presentation layer draws.
///
/// Built by [`Engine::snapshot`][crate::Engine::snapshot]; owns its data so
/// it can be handed to another thread or serialized.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    /// The tick the next `tick()` call will process.
    pub tick:         Tick,
    pub vertices:     Vec<VertexView>,
    /// Live agents, ascending by id.
    pub agents:       Vec<AgentView>,
    /// Only vertices that are held, promised, or have waiters.
    pub reservations: Vec<ReservationView>,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VertexView {
    pub id:       VertexId,
    pub name:     String,
    pub position: Point2,
    pub kind:     VertexKind,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AgentView {
    pub id:          AgentId,
    pub vertex:      VertexId,
    pub status:      AgentStatus,
    pub destination: Option<VertexId>,
    pub next_vertex: Option<VertexId>,
    /// The part of the route still ahead, starting at `vertex`.
    pub route:       Vec<VertexId>,
    pub waiting_on:  Option<VertexId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ReservationView {
    pub vertex:   VertexId,
    pub holder:   Option<AgentId>,
    pub promised: Option<AgentId>,
    pub queue:    Vec<AgentId>,
}

impl Snapshot {
    pub fn agent(&self, id: AgentId) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.id == id)
    }

    pub fn holder(&self, v: VertexId) -> Option<AgentId> {
        self.reservations.iter().find(|r| r.vertex == v).and_then(|r| r.holder)
    }
}
