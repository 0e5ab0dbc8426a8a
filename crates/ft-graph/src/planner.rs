//! Route planning: the `Planner` trait and two deterministic implementations.
//!
//! # Pluggability
//!
//! `ft-sim` calls planning via the [`Planner`] trait, so hosts can swap in
//! another search without touching the scheduler.  Both built-in planners
//! ignore occupancy entirely; congestion is the negotiation layer's job.
//!
//! # Determinism
//!
//! When several shortest routes exist, the one chosen is the route whose
//! predecessor at every vertex (walking back from the destination) has the
//! lowest `VertexId`.  The result depends only on topology and endpoints.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use ft_core::VertexId;

use crate::{GraphError, GraphResult, NavGraph};

// ── Route ─────────────────────────────────────────────────────────────────────

/// An ordered vertex sequence from source to destination, both included.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub vertices: Vec<VertexId>,
    /// Sum of Euclidean lane lengths along the route.
    pub length: f32,
}

impl Route {
    /// The route of a robot already standing on its destination.
    pub fn single(v: VertexId) -> Self {
        Self { vertices: vec![v], length: 0.0 }
    }

    pub fn source(&self) -> Option<VertexId> {
        self.vertices.first().copied()
    }

    pub fn destination(&self) -> Option<VertexId> {
        self.vertices.last().copied()
    }

    /// Number of lanes to traverse.
    pub fn hops(&self) -> usize {
        self.vertices.len().saturating_sub(1)
    }

    /// `true` if source and destination coincide.
    pub fn is_trivial(&self) -> bool {
        self.vertices.len() <= 1
    }

    /// Every adjacent pair is joined by a lane in `graph`.
    pub fn is_valid_on(&self, graph: &NavGraph) -> bool {
        !self.vertices.is_empty()
            && self.vertices.iter().all(|&v| graph.contains(v))
            && self.vertices.windows(2).all(|w| graph.has_lane(w[0], w[1]))
    }
}

// ── Planner trait ─────────────────────────────────────────────────────────────

/// Pluggable, occupancy-agnostic route planner.
pub trait Planner: Send + Sync {
    /// Plan a route `from → to`.
    ///
    /// `from == to` yields a single-vertex route.  Unknown endpoints fail
    /// with `VertexNotFound`; disconnected endpoints with `Unreachable`.
    fn plan(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route>;
}

/// Plan with the default breadth-first planner.
pub fn plan_route(graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
    BfsPlanner.plan(graph, from, to)
}

// ── BfsPlanner ────────────────────────────────────────────────────────────────

/// Fewest-hops search; lane lengths are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BfsPlanner;

impl Planner for BfsPlanner {
    fn plan(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
        graph.check(from)?;
        graph.check(to)?;
        if from == to {
            return Ok(Route::single(from));
        }

        let n = graph.vertex_count();
        let mut depth = vec![u32::MAX; n];
        let mut prev  = vec![VertexId::INVALID; n];
        let mut queue = VecDeque::new();

        depth[from.index()] = 0;
        queue.push_back(from);

        // Every vertex one layer above `to` is dequeued before `to` itself,
        // so `prev` is final by the time `to` comes off the queue.
        while let Some(v) = queue.pop_front() {
            if v == to {
                return Ok(reconstruct(graph, &prev, from, to));
            }
            let next_depth = depth[v.index()] + 1;
            for &w in graph.neighbors(v) {
                let slot = w.index();
                if depth[slot] == u32::MAX {
                    depth[slot] = next_depth;
                    prev[slot]  = v;
                    queue.push_back(w);
                } else if depth[slot] == next_depth && v < prev[slot] {
                    prev[slot] = v;
                }
            }
        }

        Err(GraphError::Unreachable { from, to })
    }
}

// ── DijkstraPlanner ───────────────────────────────────────────────────────────

/// Uniform-cost search over Euclidean lane lengths.
///
/// Costs are integer millimetres (minimum 1 per lane) so equal-length routes
/// compare exactly and the lowest-id tie-break applies.
#[derive(Debug, Clone, Copy, Default)]
pub struct DijkstraPlanner;

#[inline]
fn lane_cost_mm(length: f32) -> u64 {
    ((length as f64 * 1000.0).round() as u64).max(1)
}

impl Planner for DijkstraPlanner {
    fn plan(&self, graph: &NavGraph, from: VertexId, to: VertexId) -> GraphResult<Route> {
        graph.check(from)?;
        graph.check(to)?;
        if from == to {
            return Ok(Route::single(from));
        }

        let n = graph.vertex_count();
        let mut dist = vec![u64::MAX; n];
        let mut prev = vec![VertexId::INVALID; n];

        dist[from.index()] = 0;

        // Min-heap: (cost, vertex).  Secondary key keeps pop order stable.
        let mut heap: BinaryHeap<Reverse<(u64, VertexId)>> = BinaryHeap::new();
        heap.push(Reverse((0, from)));

        while let Some(Reverse((cost, v))) = heap.pop() {
            if v == to {
                return Ok(reconstruct(graph, &prev, from, to));
            }
            if cost > dist[v.index()] {
                continue;
            }
            for lane in graph.out_lanes(v) {
                let w = graph.lane_to[lane.index()];
                let new_cost = cost.saturating_add(lane_cost_mm(graph.lane_length[lane.index()]));
                let slot = w.index();
                if new_cost < dist[slot] {
                    dist[slot] = new_cost;
                    prev[slot] = v;
                    heap.push(Reverse((new_cost, w)));
                } else if new_cost == dist[slot] && v < prev[slot] {
                    prev[slot] = v;
                }
            }
        }

        Err(GraphError::Unreachable { from, to })
    }
}

// ── Shared reconstruction ─────────────────────────────────────────────────────

fn reconstruct(graph: &NavGraph, prev: &[VertexId], from: VertexId, to: VertexId) -> Route {
    let mut vertices = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        vertices.push(cur);
    }
    vertices.reverse();

    let length = vertices
        .windows(2)
        .filter_map(|w| graph.lane_between(w[0], w[1]))
        .map(|lane| graph.lane_length[lane.index()])
        .sum();

    Route { vertices, length }
}
