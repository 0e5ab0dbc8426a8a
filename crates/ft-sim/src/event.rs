//! Engine events and the sink trait that consumes them.

use ft_agent::RobotStore;
use ft_core::{AgentId, Tick, VertexId};

// ── Event ─────────────────────────────────────────────────────────────────────

/// A structured record of one engine state change.
///
/// Events carry no behavior; loggers and UIs interpret them.  Within one
/// tick they appear in the order the changes were applied, so replaying
/// them reconstructs the reservation history exactly.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Event {
    Spawned          { agent: AgentId, vertex: VertexId },
    TaskAssigned     { agent: AgentId, destination: VertexId },
    /// Assignment or re-planning found no route.  The agent is unassigned.
    Unreachable      { agent: AgentId, destination: VertexId },
    Reserved         { vertex: VertexId, agent: AgentId },
    Released         { vertex: VertexId, agent: AgentId },
    /// First denial of `vertex`; the agent keeps its current vertex.
    Waiting          { agent: AgentId, vertex: VertexId },
    /// The agent's next vertex was physically occupied and it did not move
    /// into it.  Also emitted for each agent moved by a deadlock rotation.
    CollisionAvoided { agent: AgentId, vertex: VertexId },
    Arrived          { agent: AgentId, vertex: VertexId },
    TaskComplete     { agent: AgentId },
    Replanned        { agent: AgentId },
    Relocated        { agent: AgentId, from: VertexId, to: VertexId },
    Removed          { agent: AgentId, vertex: VertexId },
    /// A wait cycle was broken by rotating its members, listed in rotation
    /// order starting from the lowest id.
    DeadlockResolved { agents: Vec<AgentId> },
}

impl Event {
    /// Stable snake_case label, used as the `kind` column in event logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Spawned { .. }          => "spawned",
            Event::TaskAssigned { .. }     => "task_assigned",
            Event::Unreachable { .. }      => "unreachable",
            Event::Reserved { .. }         => "reserved",
            Event::Released { .. }         => "released",
            Event::Waiting { .. }          => "waiting",
            Event::CollisionAvoided { .. } => "collision_avoided",
            Event::Arrived { .. }          => "arrived",
            Event::TaskComplete { .. }     => "task_complete",
            Event::Replanned { .. }        => "replanned",
            Event::Relocated { .. }        => "relocated",
            Event::Removed { .. }          => "removed",
            Event::DeadlockResolved { .. } => "deadlock_resolved",
        }
    }

    /// The agent the event is about.  `None` only for `DeadlockResolved`.
    pub fn agent(&self) -> Option<AgentId> {
        match *self {
            Event::Spawned { agent, .. }
            | Event::TaskAssigned { agent, .. }
            | Event::Unreachable { agent, .. }
            | Event::Reserved { agent, .. }
            | Event::Released { agent, .. }
            | Event::Waiting { agent, .. }
            | Event::CollisionAvoided { agent, .. }
            | Event::Arrived { agent, .. }
            | Event::TaskComplete { agent }
            | Event::Replanned { agent }
            | Event::Relocated { agent, .. }
            | Event::Removed { agent, .. } => Some(agent),
            Event::DeadlockResolved { .. } => None,
        }
    }

    /// The vertex the event is about, if any.  For `Relocated` this is the
    /// target, for `TaskAssigned`/`Unreachable` the destination.
    pub fn vertex(&self) -> Option<VertexId> {
        match *self {
            Event::Spawned { vertex, .. }
            | Event::Reserved { vertex, .. }
            | Event::Released { vertex, .. }
            | Event::Waiting { vertex, .. }
            | Event::CollisionAvoided { vertex, .. }
            | Event::Arrived { vertex, .. }
            | Event::Removed { vertex, .. } => Some(vertex),
            Event::TaskAssigned { destination, .. }
            | Event::Unreachable { destination, .. } => Some(destination),
            Event::Relocated { to, .. } => Some(to),
            Event::TaskComplete { .. }
            | Event::Replanned { .. }
            | Event::DeadlockResolved { .. } => None,
        }
    }
}

impl std::fmt::Display for Event {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Event::Spawned { agent, vertex }       => write!(f, "{agent} spawned at {vertex}"),
            Event::TaskAssigned { agent, destination } => {
                write!(f, "{agent} assigned to {destination}")
            }
            Event::Unreachable { agent, destination } => {
                write!(f, "{agent} cannot reach {destination}")
            }
            Event::Reserved { vertex, agent }      => write!(f, "{vertex} reserved by {agent}"),
            Event::Released { vertex, agent }      => write!(f, "{vertex} released by {agent}"),
            Event::Waiting { agent, vertex }       => write!(f, "{agent} waiting for {vertex}"),
            Event::CollisionAvoided { agent, vertex } => {
                write!(f, "{agent} avoided collision at {vertex}")
            }
            Event::Arrived { agent, vertex }       => write!(f, "{agent} arrived at {vertex}"),
            Event::TaskComplete { agent }          => write!(f, "{agent} completed its task"),
            Event::Replanned { agent }             => write!(f, "{agent} replanned"),
            Event::Relocated { agent, from, to }   => write!(f, "{agent} relocated {from} -> {to}"),
            Event::Removed { agent, vertex }       => write!(f, "{agent} removed from {vertex}"),
            Event::DeadlockResolved { agents } => {
                write!(f, "deadlock resolved between")?;
                for a in agents {
                    write!(f, " {a}")?;
                }
                Ok(())
            }
        }
    }
}

// ── EventSink ─────────────────────────────────────────────────────────────────

/// Callbacks invoked by [`Engine::run`][crate::Engine::run] and
/// [`Engine::run_ticks`][crate::Engine::run_ticks].
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example: console log
///
/// ```rust,ignore
/// struct Console;
///
/// impl EventSink for Console {
///     fn on_event(&mut self, tick: Tick, event: &Event) {
///         println!("[{tick}] {event}");
///     }
/// }
/// ```
pub trait EventSink {
    /// Called before the tick is processed.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called once per event, in emission order.
    fn on_event(&mut self, _tick: Tick, _event: &Event) {}

    /// Called after all of the tick's events, with the robots' final state
    /// for the tick (status-table rows, dashboards).
    fn on_tick_end(&mut self, _tick: Tick, _robots: &RobotStore) {}

    /// Called once after the last tick of a `run`.
    fn on_run_end(&mut self, _final_tick: Tick) {}
}

/// An [`EventSink`] that discards everything.
pub struct NoopSink;

impl EventSink for NoopSink {}

/// Collects `(tick, event)` pairs.  Handy in tests and replay tools.
impl EventSink for Vec<(Tick, Event)> {
    fn on_event(&mut self, tick: Tick, event: &Event) {
        self.push((tick, event.clone()));
    }
}
