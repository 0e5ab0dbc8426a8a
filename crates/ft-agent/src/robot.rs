//! The per-robot state machine.

use ft_core::{AgentId, AgentStatus, VertexId};
use ft_graph::{NavGraph, Route};

/// What a robot wants to do this tick.  Produced by [`Robot::decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Nothing to do: no destination, or the task is complete.
    Idle,
    /// Standing on the destination with the route exhausted; only the
    /// bookkeeping transition to `TaskComplete` is left.
    Finish,
    /// Acquire `to`, then release `from`.
    Advance { from: VertexId, to: VertexId },
    /// The stored route is stale or the robot has waited too long; plan
    /// again from the current vertex.
    Replan,
}

/// One robot: identity, position, route, and status.
///
/// `route[cursor]` is the vertex the robot stands on while the route is
/// current.  A forced relocation breaks that link, which `decide` detects
/// and answers with [`Step::Replan`].
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Robot {
    pub id:          AgentId,
    /// Always a vertex this robot holds in the reservation table.
    pub current:     VertexId,
    pub destination: Option<VertexId>,
    pub route:       Vec<VertexId>,
    pub cursor:      usize,
    pub status:      AgentStatus,
    /// The vertex whose last acquire was denied.
    pub waiting_on:  Option<VertexId>,
    /// Consecutive denials on `waiting_on`.
    pub wait_ticks:  u64,
}

impl Robot {
    /// A freshly spawned, unassigned robot standing on `at`.
    pub fn new(id: AgentId, at: VertexId) -> Self {
        Self {
            id,
            current:     at,
            destination: None,
            route:       Vec::new(),
            cursor:      0,
            status:      AgentStatus::Unassigned,
            waiting_on:  None,
            wait_ticks:  0,
        }
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// The vertex after `current` on the stored route.
    #[inline]
    pub fn next_vertex(&self) -> Option<VertexId> {
        self.route.get(self.cursor + 1).copied()
    }

    /// The part of the route not yet covered, starting at `current`.
    pub fn remaining_route(&self) -> &[VertexId] {
        self.route.get(self.cursor..).unwrap_or(&[])
    }

    /// Euclidean length of the remaining route.  Zero when idle.
    pub fn remaining_distance(&self, graph: &NavGraph) -> f32 {
        if !self.status.is_active() {
            return 0.0;
        }
        self.remaining_route()
            .windows(2)
            .map(|w| graph.position(w[0]).distance(graph.position(w[1])))
            .sum()
    }

    /// `false` once a forced relocation moved the robot off its route.
    #[inline]
    pub fn route_is_current(&self) -> bool {
        self.route.get(self.cursor) == Some(&self.current)
    }

    /// Decide this tick's step.  Pure: reads only the robot's own fields.
    ///
    /// `replan_after` is the wait threshold from `EngineConfig`; `None`
    /// means a waiting robot keeps retrying the same vertex.
    pub fn decide(&self, replan_after: Option<u64>) -> Step {
        if !self.status.is_active() {
            return Step::Idle;
        }
        let Some(destination) = self.destination else {
            return Step::Idle;
        };
        if !self.route_is_current() {
            return Step::Replan;
        }
        if replan_after.is_some_and(|n| self.wait_ticks >= n) {
            return Step::Replan;
        }
        match self.next_vertex() {
            Some(to)                           => Step::Advance { from: self.current, to },
            None if self.current == destination => Step::Finish,
            None                               => Step::Replan,
        }
    }

    // ── Transitions ───────────────────────────────────────────────────────

    /// Take a new task.  `route` must start at `current`.
    pub fn assign(&mut self, destination: VertexId, route: Route) {
        debug_assert_eq!(route.source(), Some(self.current));
        self.destination = Some(destination);
        self.route       = route.vertices;
        self.cursor      = 0;
        self.status      = AgentStatus::TaskAssigned;
        self.reset_wait();
    }

    /// Replace the route of the current task without restarting it.
    pub fn reroute(&mut self, route: Route) {
        debug_assert_eq!(route.source(), Some(self.current));
        self.route  = route.vertices;
        self.cursor = 0;
        self.reset_wait();
    }

    /// The scheduler moved the robot onto `to`, its next route vertex.
    /// Returns `true` if that completed the task.
    pub fn advance_to(&mut self, to: VertexId) -> bool {
        debug_assert_eq!(self.next_vertex(), Some(to));
        self.current = to;
        self.cursor += 1;
        self.reset_wait();

        let arrived = self.cursor + 1 == self.route.len() && self.destination == Some(to);
        self.status = if arrived { AgentStatus::TaskComplete } else { AgentStatus::Moving };
        arrived
    }

    /// The acquire of `v` was denied.  Returns `true` on the first denial
    /// for `v`, `false` while the robot keeps waiting on the same vertex.
    pub fn block_on(&mut self, v: VertexId) -> bool {
        self.status = AgentStatus::Waiting;
        if self.waiting_on == Some(v) {
            self.wait_ticks += 1;
            false
        } else {
            self.waiting_on = Some(v);
            self.wait_ticks = 1;
            true
        }
    }

    /// Trivial task (destination == current) completes without a move.
    pub fn finish(&mut self) {
        self.status = AgentStatus::TaskComplete;
        self.reset_wait();
    }

    /// Forget the task.  Used when (re)planning fails.
    pub fn clear(&mut self) {
        self.destination = None;
        self.route.clear();
        self.cursor = 0;
        self.status = AgentStatus::Unassigned;
        self.reset_wait();
    }

    /// External forced move.  The route is left as is; `decide` will ask
    /// for a replan if the robot still has a task.
    pub fn relocate(&mut self, to: VertexId) {
        self.current = to;
        self.reset_wait();
    }

    fn reset_wait(&mut self) {
        self.waiting_on = None;
        self.wait_ticks = 0;
    }
}
