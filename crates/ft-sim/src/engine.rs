//! The `Engine` and its tick loop.

use std::collections::VecDeque;

use tracing::{debug, debug_span, error, info, warn};

use ft_agent::{Robot, RobotStore, Step};
use ft_core::{AgentId, AgentStatus, EngineConfig, Tick, VertexId};
use ft_graph::{BfsPlanner, GraphError, NavGraph, Planner};
use ft_reserve::{Acquire, Release, ReservationTable};

use crate::snapshot::{AgentView, ReservationView, VertexView};
use crate::{deadlock, EngineError, EngineResult, Event, EventSink, Snapshot};

/// The negotiation engine: graph, reservation table, robots, and the clock.
///
/// `Engine<P>` is the only mutator of the [`ReservationTable`].  Hosts drive
/// it with intents (`spawn_agent`, `assign_destination`, …) and `tick()`;
/// everything else is read-only access.
///
/// Create via [`EngineBuilder`][crate::EngineBuilder].
pub struct Engine<P: Planner = BfsPlanner> {
    config:  EngineConfig,
    graph:   NavGraph,
    table:   ReservationTable,
    robots:  RobotStore,
    planner: P,
    /// The tick the next `tick()` call processes.
    now:     Tick,

    /// Events produced since the last `tick()` returned.
    pending:  Vec<Event>,
    /// Vertices freed with a promised next holder, oldest first.
    handoffs: VecDeque<(VertexId, AgentId)>,
}

impl<P: Planner> Engine<P> {
    pub(crate) fn new(graph: NavGraph, config: EngineConfig, planner: P) -> Self {
        let table = ReservationTable::new(graph.vertex_count());
        Self {
            config,
            graph,
            table,
            robots:   RobotStore::new(),
            planner,
            now:      Tick::ZERO,
            pending:  Vec::new(),
            handoffs: VecDeque::new(),
        }
    }

    // ── Read access ───────────────────────────────────────────────────────

    #[inline]
    pub fn now(&self) -> Tick {
        self.now
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn graph(&self) -> &NavGraph {
        &self.graph
    }

    pub fn table(&self) -> &ReservationTable {
        &self.table
    }

    pub fn robots(&self) -> &RobotStore {
        &self.robots
    }

    pub fn robot(&self, agent: AgentId) -> Option<&Robot> {
        self.robots.get(agent)
    }

    pub fn planner(&self) -> &P {
        &self.planner
    }

    /// No robot has route left to cover and no hand-off is outstanding.
    pub fn is_idle(&self) -> bool {
        self.handoffs.is_empty() && self.robots.iter().all(|r| !r.status.is_active())
    }

    /// Euclidean length of the rest of `agent`'s route.
    pub fn remaining_distance(&self, agent: AgentId) -> EngineResult<f32> {
        let robot = self.robots.get(agent).ok_or(EngineError::UnknownAgent(agent))?;
        Ok(robot.remaining_distance(&self.graph))
    }

    /// Copy out everything a renderer needs.
    pub fn snapshot(&self) -> Snapshot {
        let graph = &self.graph;
        let vertices = graph
            .vertices()
            .map(|v| VertexView {
                id:       v,
                name:     graph.name(v).to_owned(),
                position: graph.position(v),
                kind:     graph.kind(v),
            })
            .collect();

        let agents = self
            .robots
            .iter()
            .map(|r| AgentView {
                id:          r.id,
                vertex:      r.current,
                status:      r.status,
                destination: r.destination,
                next_vertex: r.next_vertex(),
                route:       r.remaining_route().to_vec(),
                waiting_on:  r.waiting_on,
            })
            .collect();

        let reservations = graph
            .vertices()
            .filter_map(|v| {
                let holder   = self.table.holder(v);
                let promised = self.table.promised_to(v);
                let queue: Vec<AgentId> = self.table.waiters(v).collect();
                (holder.is_some() || promised.is_some() || !queue.is_empty())
                    .then_some(ReservationView { vertex: v, holder, promised, queue })
            })
            .collect();

        Snapshot { tick: self.now, vertices, agents, reservations }
    }

    // ── Intents ───────────────────────────────────────────────────────────

    /// Create a robot on `at`, reserving it in the same step.
    ///
    /// Fails with `VertexOccupied` if `at` is held, promised to a waiter,
    /// or has a queue.
    pub fn spawn_agent(&mut self, at: VertexId) -> EngineResult<AgentId> {
        if !self.graph.contains(at) {
            return Err(EngineError::UnknownVertex(at));
        }
        let agent = self.robots.next_id();
        if !self.table.claim(at, agent) {
            return Err(EngineError::VertexOccupied(at));
        }
        self.robots.spawn(at);

        info!(agent = agent.0, vertex = at.0, "spawned");
        self.pending.push(Event::Spawned { agent, vertex: at });
        self.pending.push(Event::Reserved { vertex: at, agent });
        Ok(agent)
    }

    /// Give `agent` a new destination, superseding any current task.
    ///
    /// The route is planned from the robot's current vertex at any status,
    /// including `Waiting`.  An unreachable destination resets the robot to
    /// `Unassigned`, emits `Unreachable`, and returns the error.
    pub fn assign_destination(&mut self, agent: AgentId, destination: VertexId) -> EngineResult<()> {
        let from = self
            .robots
            .get(agent)
            .ok_or(EngineError::UnknownAgent(agent))?
            .current;
        if !self.graph.contains(destination) {
            return Err(EngineError::UnknownVertex(destination));
        }

        let route = match self.planner.plan(&self.graph, from, destination) {
            Ok(route) => route,
            Err(GraphError::Unreachable { .. }) => {
                self.abandon(agent, destination);
                return Err(EngineError::Unreachable { agent, from, to: destination });
            }
            Err(e) => return Err(e.into()),
        };

        self.withdraw(agent);
        if let Some(robot) = self.robots.get_mut(agent) {
            robot.assign(destination, route);
        }
        info!(agent = agent.0, from = from.0, to = destination.0, "task assigned");
        self.pending.push(Event::TaskAssigned { agent, destination });
        Ok(())
    }

    /// Re-invoke the planner from `agent`'s current vertex to its
    /// destination.  A no-op for robots without an active task.
    pub fn replan(&mut self, agent: AgentId) -> EngineResult<()> {
        let robot = self.robots.get(agent).ok_or(EngineError::UnknownAgent(agent))?;
        let from = robot.current;
        let destination = match robot.destination {
            Some(d) if robot.status.is_active() => d,
            _ => return Ok(()),
        };

        match self.planner.plan(&self.graph, from, destination) {
            Ok(route) => {
                // Same next vertex: keep the queue position or promise.
                let next = route.vertices.get(1).copied();
                let keeps_place = next.is_some()
                    && (self.table.queued_on(agent) == next || self.table.promise_of(agent) == next);
                if !keeps_place {
                    self.withdraw(agent);
                }
                if let Some(robot) = self.robots.get_mut(agent) {
                    robot.reroute(route);
                }
                debug!(agent = agent.0, from = from.0, to = destination.0, "replanned");
                self.pending.push(Event::Replanned { agent });
                Ok(())
            }
            Err(GraphError::Unreachable { .. }) => {
                self.abandon(agent, destination);
                Err(EngineError::Unreachable { agent, from, to: destination })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Take `agent` out of the fleet.  Its vertex is released and any
    /// promise it held passes to the next waiter.
    pub fn remove_agent(&mut self, agent: AgentId) -> EngineResult<()> {
        let robot = self.robots.remove(agent).ok_or(EngineError::UnknownAgent(agent))?;
        self.withdraw(agent);
        self.release(robot.current, agent);
        info!(agent = agent.0, vertex = robot.current.0, "removed");
        self.pending.push(Event::Removed { agent, vertex: robot.current });
        Ok(())
    }

    /// Force `agent` onto `to`, which must be fully available.
    ///
    /// The robot's route is left stale; its next step re-plans from `to`.
    pub fn relocate_agent(&mut self, agent: AgentId, to: VertexId) -> EngineResult<()> {
        let from = self
            .robots
            .get(agent)
            .ok_or(EngineError::UnknownAgent(agent))?
            .current;
        if !self.graph.contains(to) {
            return Err(EngineError::UnknownVertex(to));
        }
        if from == to {
            return Ok(());
        }
        if !self.table.claim(to, agent) {
            return Err(EngineError::VertexOccupied(to));
        }

        self.pending.push(Event::Reserved { vertex: to, agent });
        self.withdraw(agent);
        self.release(from, agent);
        if let Some(robot) = self.robots.get_mut(agent) {
            robot.relocate(to);
        }
        info!(agent = agent.0, from = from.0, to = to.0, "relocated");
        self.pending.push(Event::Relocated { agent, from, to });
        Ok(())
    }

    // ── Tick loop ─────────────────────────────────────────────────────────

    /// Advance one tick and return every event produced since the previous
    /// call (including those of intents issued in between).
    pub fn tick(&mut self) -> Vec<Event> {
        let now = self.now;
        let _span = debug_span!("tick", tick = now.0).entered();
        let mut moved = vec![false; self.robots.next_id().index()];

        // ── Phase 1: agent pass ───────────────────────────────────────────
        for agent in self.robots.ids() {
            if self.step(agent) {
                moved[agent.index()] = true;
            }
        }

        // ── Phase 2: deliver freed vertices to their promised waiters ─────
        while let Some((v, next)) = self.handoffs.pop_front() {
            if self.table.promised_to(v) != Some(next) || moved[next.index()] {
                continue;
            }
            let Some(robot) = self.robots.get(next) else {
                continue;
            };
            if robot.next_vertex() != Some(v) {
                // Promise to a robot no longer heading there; pass it on.
                self.withdraw(next);
                continue;
            }
            let from = robot.current;
            debug!(agent = next.0, vertex = v.0, "delivering hand-off");
            if self.advance(next, from, v) {
                moved[next.index()] = true;
            }
        }

        // ── Phase 3: break wait cycles ────────────────────────────────────
        if self.config.resolve_deadlocks {
            self.resolve_deadlocks();
        }

        debug_assert!(
            self.table.violations().is_empty(),
            "reservation invariants broken at {now}: {:?}",
            self.table.violations()
        );

        self.now = now.next();
        std::mem::take(&mut self.pending)
    }

    /// Tick until `config.total_ticks`, forwarding events to `sink`.
    pub fn run<S: EventSink>(&mut self, sink: &mut S) {
        while self.now.0 < self.config.total_ticks {
            self.tick_into(sink);
        }
        sink.on_run_end(self.now);
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).
    pub fn run_ticks<S: EventSink>(&mut self, n: u64, sink: &mut S) {
        for _ in 0..n {
            self.tick_into(sink);
        }
    }

    /// Tick until every robot is idle or `total_ticks` is reached.  Returns
    /// whether the fleet went idle.
    pub fn run_until_idle<S: EventSink>(&mut self, sink: &mut S) -> bool {
        while self.now.0 < self.config.total_ticks && !(self.is_idle() && self.pending.is_empty()) {
            self.tick_into(sink);
        }
        sink.on_run_end(self.now);
        self.is_idle()
    }

    fn tick_into<S: EventSink>(&mut self, sink: &mut S) {
        let now = self.now;
        sink.on_tick_start(now);
        for event in self.tick() {
            sink.on_event(now, &event);
        }
        sink.on_tick_end(now, &self.robots);
    }

    // ── Per-agent step ────────────────────────────────────────────────────

    /// Apply one state-machine step.  Returns `true` if the robot moved.
    fn step(&mut self, agent: AgentId) -> bool {
        let Some(robot) = self.robots.get_mut(agent) else {
            return false;
        };
        match robot.decide(self.config.replan_after_wait_ticks) {
            Step::Idle => false,
            Step::Finish => {
                robot.finish();
                let vertex = robot.current;
                info!(agent = agent.0, vertex = vertex.0, "task complete");
                self.pending.push(Event::Arrived { agent, vertex });
                self.pending.push(Event::TaskComplete { agent });
                false
            }
            Step::Advance { from, to } => self.advance(agent, from, to),
            Step::Replan => {
                if let Err(e) = self.replan(agent) {
                    debug!(agent = agent.0, error = %e, "replan failed");
                }
                false
            }
        }
    }

    /// Acquire `to`, and only then release `from`.
    fn advance(&mut self, agent: AgentId, from: VertexId, to: VertexId) -> bool {
        match self.table.try_acquire(to, agent) {
            Acquire::Granted => {
                self.pending.push(Event::Reserved { vertex: to, agent });
                self.release(from, agent);
                let arrived = self.robots.get_mut(agent).is_some_and(|r| r.advance_to(to));
                debug!(agent = agent.0, from = from.0, to = to.0, "moved");
                if arrived {
                    info!(agent = agent.0, vertex = to.0, "arrived");
                    self.pending.push(Event::Arrived { agent, vertex: to });
                    self.pending.push(Event::TaskComplete { agent });
                }
                true
            }
            Acquire::Denied { holder } => {
                let first = self.robots.get_mut(agent).is_some_and(|r| r.block_on(to));
                if first {
                    debug!(agent = agent.0, vertex = to.0, holder = ?holder.map(|h| h.0), "waiting");
                    self.pending.push(Event::Waiting { agent, vertex: to });
                    if holder.is_some() {
                        self.pending.push(Event::CollisionAvoided { agent, vertex: to });
                    }
                }
                false
            }
        }
    }

    // ── Reservation plumbing ──────────────────────────────────────────────

    fn release(&mut self, v: VertexId, agent: AgentId) {
        let outcome = self.table.release(v, agent);
        debug_assert_ne!(outcome, Release::NotHolder, "{agent} released {v} without holding it");
        match outcome {
            Release::Released { next_eligible } => {
                self.pending.push(Event::Released { vertex: v, agent });
                if let Some(next) = next_eligible {
                    self.handoffs.push_back((v, next));
                }
            }
            Release::NotHolder => {
                error!(agent = agent.0, vertex = v.0, "release by non-holder ignored");
            }
        }
    }

    /// Drop `agent`'s queue position and promise; a promise passes on.
    fn withdraw(&mut self, agent: AgentId) {
        if let Some((v, next)) = self.table.withdraw(agent) {
            debug!(from = agent.0, to = next.0, vertex = v.0, "promise passed on");
            self.handoffs.push_back((v, next));
        }
    }

    /// Reset `agent` after a failed plan.
    fn abandon(&mut self, agent: AgentId, destination: VertexId) {
        self.withdraw(agent);
        if let Some(robot) = self.robots.get_mut(agent) {
            robot.clear();
        }
        warn!(agent = agent.0, destination = destination.0, "destination unreachable");
        self.pending.push(Event::Unreachable { agent, destination });
    }

    // ── Deadlock rotation ─────────────────────────────────────────────────

    fn resolve_deadlocks(&mut self) {
        let table = &self.table;
        let edges: Vec<(AgentId, AgentId)> = self
            .robots
            .iter()
            .filter(|r| r.status == AgentStatus::Waiting)
            .filter_map(|r| {
                let v = r.waiting_on?;
                if r.next_vertex() != Some(v) {
                    return None;
                }
                let holder = table.holder(v)?;
                (holder != r.id).then_some((r.id, holder))
            })
            .collect();

        for cycle in deadlock::find_cycles(&edges) {
            let moves: Vec<(AgentId, VertexId, VertexId)> = cycle
                .iter()
                .filter_map(|&a| {
                    let r = self.robots.get(a)?;
                    Some((a, r.current, r.waiting_on?))
                })
                .collect();
            // Refused while an earlier requester is queued ahead of a mover.
            if moves.len() != cycle.len() || !self.table.rotate(&moves) {
                debug!(agents = ?cycle, "wait cycle not rotated");
                continue;
            }

            for &(agent, from, to) in &moves {
                self.pending.push(Event::CollisionAvoided { agent, vertex: to });
                self.pending.push(Event::Reserved { vertex: to, agent });
                self.pending.push(Event::Released { vertex: from, agent });
                let arrived = self.robots.get_mut(agent).is_some_and(|r| r.advance_to(to));
                if arrived {
                    info!(agent = agent.0, vertex = to.0, "arrived");
                    self.pending.push(Event::Arrived { agent, vertex: to });
                    self.pending.push(Event::TaskComplete { agent });
                }
            }
            info!(agents = ?cycle, "deadlock resolved by rotation");
            self.pending.push(Event::DeadlockResolved { agents: cycle });
        }
    }
}
