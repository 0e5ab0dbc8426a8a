//! Navigation graph representation and builder.
//!
//! # Data layout
//!
//! Lanes are stored **directed** in Compressed Sparse Row (CSR) form.  Given
//! a `VertexId v`, its outgoing lanes occupy the slice:
//!
//! ```text
//! lane_to[ vertex_out_start[v] .. vertex_out_start[v+1] ]
//! ```
//!
//! A bidirectional lane (the default, [`NavGraphBuilder::add_lane`]) is two
//! directed lanes.  Within one vertex's slice lanes are sorted by target
//! `VertexId`, so neighbour iteration is in ascending id order and
//! [`NavGraph::lane_between`] is a binary search.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps floor-plan positions to the nearest vertex.
//! Presentation layers use it to turn a click into a vertex id.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use ft_core::{LaneId, Point2, VertexId};

use crate::{GraphError, GraphResult};

// ── VertexKind ────────────────────────────────────────────────────────────────

/// Vertex attribute.  Chargers are rendered differently but negotiate
/// exactly like regular vertices.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum VertexKind {
    #[default]
    Regular,
    Charger,
}

// ── R-tree entry ──────────────────────────────────────────────────────────────

#[derive(Clone)]
struct VertexEntry {
    point: [f32; 2],
    id:    VertexId,
}

impl RTreeObject for VertexEntry {
    type Envelope = AABB<[f32; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for VertexEntry {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── NavGraph ──────────────────────────────────────────────────────────────────

/// Immutable navigation graph.
///
/// Fields are `pub` for direct indexed access.  Construct with
/// [`NavGraphBuilder`] or [`crate::load_nav_graph`].
pub struct NavGraph {
    // ── Vertex data (indexed by VertexId) ─────────────────────────────────
    pub vertex_pos:  Vec<Point2>,
    pub vertex_name: Vec<String>,
    pub vertex_kind: Vec<VertexKind>,

    // ── CSR lane adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Length = `vertex_count + 1`.
    pub vertex_out_start: Vec<u32>,

    // ── Lane data (indexed by LaneId) ─────────────────────────────────────
    pub lane_from:   Vec<VertexId>,
    pub lane_to:     Vec<VertexId>,
    /// Euclidean length of each lane in floor-plan units.
    pub lane_length: Vec<f32>,

    spatial_idx: RTree<VertexEntry>,
}

impl NavGraph {
    /// A graph with no vertices.  Every spawn and plan against it fails.
    pub fn empty() -> Self {
        NavGraphBuilder::new()
            .build()
            .unwrap_or_else(|_| unreachable!("an empty builder has no lanes to reject"))
    }

    // ── Dimensions ────────────────────────────────────────────────────────

    pub fn vertex_count(&self) -> usize {
        self.vertex_pos.len()
    }

    /// Number of **directed** lanes (a bidirectional lane counts twice).
    pub fn lane_count(&self) -> usize {
        self.lane_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertex_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        v.index() < self.vertex_count()
    }

    /// `Ok(())` if `v` exists, `VertexNotFound` otherwise.
    pub fn check(&self, v: VertexId) -> GraphResult<()> {
        if self.contains(v) {
            Ok(())
        } else {
            Err(GraphError::VertexNotFound(v))
        }
    }

    /// All vertex ids in ascending order.
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertex_count()).map(VertexId::from_index)
    }

    // ── Vertex attributes ─────────────────────────────────────────────────

    #[inline]
    pub fn position(&self, v: VertexId) -> Point2 {
        self.vertex_pos[v.index()]
    }

    #[inline]
    pub fn name(&self, v: VertexId) -> &str {
        &self.vertex_name[v.index()]
    }

    #[inline]
    pub fn kind(&self, v: VertexId) -> VertexKind {
        self.vertex_kind[v.index()]
    }

    pub fn is_charger(&self, v: VertexId) -> bool {
        self.kind(v) == VertexKind::Charger
    }

    /// First vertex whose name equals `name`.
    pub fn vertex_by_name(&self, name: &str) -> Option<VertexId> {
        self.vertex_name
            .iter()
            .position(|n| n == name)
            .map(VertexId::from_index)
    }

    // ── Traversal ─────────────────────────────────────────────────────────

    /// `LaneId`s of all outgoing lanes from `v`, in ascending target order.
    #[inline]
    pub fn out_lanes(&self, v: VertexId) -> impl Iterator<Item = LaneId> + '_ {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        (start..end).map(LaneId::from_index)
    }

    /// Vertices reachable from `v` in one lane, in ascending id order.
    #[inline]
    pub fn neighbors(&self, v: VertexId) -> &[VertexId] {
        let start = self.vertex_out_start[v.index()] as usize;
        let end   = self.vertex_out_start[v.index() + 1] as usize;
        &self.lane_to[start..end]
    }

    pub fn out_degree(&self, v: VertexId) -> usize {
        self.neighbors(v).len()
    }

    /// The directed lane `from → to`, if one exists.
    pub fn lane_between(&self, from: VertexId, to: VertexId) -> Option<LaneId> {
        if !self.contains(from) {
            return None;
        }
        let start = self.vertex_out_start[from.index()] as usize;
        self.neighbors(from)
            .binary_search(&to)
            .ok()
            .map(|offset| LaneId::from_index(start + offset))
    }

    #[inline]
    pub fn has_lane(&self, from: VertexId, to: VertexId) -> bool {
        self.lane_between(from, to).is_some()
    }

    /// Every directed lane as `(from, to)`, in CSR order.
    pub fn lanes(&self) -> impl Iterator<Item = (VertexId, VertexId)> + '_ {
        self.lane_from.iter().copied().zip(self.lane_to.iter().copied())
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// The vertex nearest to `pos`.  `None` only for an empty graph.
    pub fn nearest_vertex(&self, pos: Point2) -> Option<VertexId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }

    /// Vertices within `radius` of `pos`, in no particular order.
    pub fn vertices_within(&self, pos: Point2, radius: f32) -> Vec<VertexId> {
        self.spatial_idx
            .locate_within_distance([pos.x, pos.y], radius * radius)
            .map(|e| e.id)
            .collect()
    }
}

// ── NavGraphBuilder ───────────────────────────────────────────────────────────

/// Construct a [`NavGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use ft_core::Point2;
/// use ft_graph::NavGraphBuilder;
///
/// let mut b = NavGraphBuilder::new();
/// let a = b.add_vertex(Point2::new(0.0, 0.0));
/// let c = b.add_vertex(Point2::new(3.0, 4.0));
/// b.add_lane(a, c);
/// let graph = b.build().unwrap();
/// assert_eq!(graph.vertex_count(), 2);
/// assert_eq!(graph.lane_count(), 2); // bidirectional
/// ```
#[derive(Default)]
pub struct NavGraphBuilder {
    pos:   Vec<Point2>,
    names: Vec<String>,
    kinds: Vec<VertexKind>,
    raw_lanes: Vec<(u32, u32)>,
}

impl NavGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a regular vertex named `V<index>` and return its id.
    pub fn add_vertex(&mut self, pos: Point2) -> VertexId {
        let name = format!("V{}", self.pos.len());
        self.add_named_vertex(pos, name, VertexKind::Regular)
    }

    /// Add a vertex with explicit name and kind.
    pub fn add_named_vertex(
        &mut self,
        pos:  Point2,
        name: impl Into<String>,
        kind: VertexKind,
    ) -> VertexId {
        let id = VertexId::from_index(self.pos.len());
        self.pos.push(pos);
        self.names.push(name.into());
        self.kinds.push(kind);
        id
    }

    /// Add a one-way lane `from → to`.
    pub fn add_directed_lane(&mut self, from: VertexId, to: VertexId) {
        self.raw_lanes.push((from.0, to.0));
    }

    /// Add a lane traversable in both directions.
    pub fn add_lane(&mut self, a: VertexId, b: VertexId) {
        self.add_directed_lane(a, b);
        self.add_directed_lane(b, a);
    }

    pub fn vertex_count(&self) -> usize {
        self.pos.len()
    }

    /// Validate lanes and produce the [`NavGraph`].
    ///
    /// Duplicate lanes collapse into one.  A lane naming a missing vertex or
    /// looping onto itself is rejected with [`GraphError::InvalidLane`].
    pub fn build(self) -> GraphResult<NavGraph> {
        let vertex_count = self.pos.len();

        let mut raw = self.raw_lanes;
        if let Some(&(from, to)) = raw
            .iter()
            .find(|&&(f, t)| f == t || f as usize >= vertex_count || t as usize >= vertex_count)
        {
            return Err(GraphError::InvalidLane { from, to });
        }
        raw.sort_unstable();
        raw.dedup();

        let lane_from: Vec<VertexId> = raw.iter().map(|&(f, _)| VertexId(f)).collect();
        let lane_to:   Vec<VertexId> = raw.iter().map(|&(_, t)| VertexId(t)).collect();
        let lane_length: Vec<f32> = raw
            .iter()
            .map(|&(f, t)| self.pos[f as usize].distance(self.pos[t as usize]))
            .collect();

        let mut vertex_out_start = vec![0u32; vertex_count + 1];
        for &(f, _) in &raw {
            vertex_out_start[f as usize + 1] += 1;
        }
        for i in 1..=vertex_count {
            vertex_out_start[i] += vertex_out_start[i - 1];
        }
        debug_assert_eq!(vertex_out_start[vertex_count] as usize, raw.len());

        let entries: Vec<VertexEntry> = self
            .pos
            .iter()
            .enumerate()
            .map(|(i, p)| VertexEntry { point: [p.x, p.y], id: VertexId::from_index(i) })
            .collect();

        Ok(NavGraph {
            vertex_pos: self.pos,
            vertex_name: self.names,
            vertex_kind: self.kinds,
            vertex_out_start,
            lane_from,
            lane_to,
            lane_length,
            spatial_idx: RTree::bulk_load(entries),
        })
    }
}
