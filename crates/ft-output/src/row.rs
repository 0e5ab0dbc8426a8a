//! Plain data row types written by output backends.

use ft_agent::Robot;
use ft_core::{AgentStatus, Tick};
use ft_sim::Event;

/// One engine event, flattened for tabular storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRow {
    pub tick:   u64,
    /// `Event::kind` label, e.g. `"collision_avoided"`.
    pub kind:   &'static str,
    pub agent:  Option<u32>,
    pub vertex: Option<u32>,
    /// Human-readable rendering of the whole event.
    pub detail: String,
}

impl EventRow {
    pub fn from_event(tick: Tick, event: &Event) -> Self {
        Self {
            tick:   tick.0,
            kind:   event.kind(),
            agent:  event.agent().map(|a| a.0),
            vertex: event.vertex().map(|v| v.0),
            detail: event.to_string(),
        }
    }
}

/// One line of the fleet status table: where a robot is, what it is doing,
/// and where it goes next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgentStatusRow {
    pub tick:        u64,
    pub agent:       u32,
    pub vertex:      u32,
    pub status:      AgentStatus,
    pub destination: Option<u32>,
    pub next_vertex: Option<u32>,
}

impl AgentStatusRow {
    pub fn from_robot(tick: Tick, robot: &Robot) -> Self {
        Self {
            tick:        tick.0,
            agent:       robot.id.0,
            vertex:      robot.current.0,
            status:      robot.status,
            destination: robot.destination.map(|v| v.0),
            next_vertex: robot.next_vertex().map(|v| v.0),
        }
    }
}
