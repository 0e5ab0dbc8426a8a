//! Unit tests for ft-graph.
//!
//! All tests use hand-built graphs so they run without any map file.

#[cfg(test)]
mod helpers {
    use ft_core::{Point2, VertexId};
    use crate::{NavGraph, NavGraphBuilder};

    /// Small grid used across the planner tests.
    ///
    /// ```text
    ///   0 ── 1 ── 2
    ///   │         │
    ///   3 ─────── 4
    /// ```
    ///
    /// 0→4 is two hops via 3 and three hops via 1, 2.  By length the top
    /// path (1 + 1 + 1) beats the bottom one (1 + 10).
    pub fn grid() -> (NavGraph, [VertexId; 5]) {
        let mut b = NavGraphBuilder::new();
        let v0 = b.add_vertex(Point2::new(0.0, 0.0));
        let v1 = b.add_vertex(Point2::new(1.0, 0.0));
        let v2 = b.add_vertex(Point2::new(2.0, 0.0));
        let v3 = b.add_vertex(Point2::new(0.0, 1.0));
        let v4 = b.add_vertex(Point2::new(10.0, 1.0));
        b.add_lane(v0, v1);
        b.add_lane(v1, v2);
        b.add_lane(v2, v4);
        b.add_lane(v0, v3);
        b.add_lane(v3, v4);
        (b.build().unwrap(), [v0, v1, v2, v3, v4])
    }

    /// Diamond with two equal shortest routes 0→3: via 1 and via 2.
    /// Vertex 2 is added first so insertion order cannot explain the result.
    pub fn diamond() -> NavGraph {
        let mut b = NavGraphBuilder::new();
        for i in 0..4 {
            b.add_vertex(Point2::new(i as f32, 0.0));
        }
        b.add_lane(VertexId(0), VertexId(2));
        b.add_lane(VertexId(2), VertexId(3));
        b.add_lane(VertexId(0), VertexId(1));
        b.add_lane(VertexId(1), VertexId(3));
        b.build().unwrap()
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use ft_core::{Point2, VertexId};
    use crate::{GraphError, NavGraphBuilder, VertexKind};

    #[test]
    fn empty_build() {
        let g = NavGraphBuilder::new().build().unwrap();
        assert!(g.is_empty());
        assert_eq!(g.lane_count(), 0);
        assert!(g.nearest_vertex(Point2::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn bidirectional_lane_counts_twice() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(3.0, 4.0));
        b.add_lane(a, c);
        let g = b.build().unwrap();
        assert_eq!(g.lane_count(), 2);
        assert!(g.has_lane(a, c));
        assert!(g.has_lane(c, a));
        let lane = g.lane_between(a, c).unwrap();
        assert!((g.lane_length[lane.index()] - 5.0).abs() < 1e-6);
    }

    #[test]
    fn directed_lane_is_one_way() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(1.0, 0.0));
        b.add_directed_lane(a, c);
        let g = b.build().unwrap();
        assert_eq!(g.out_degree(a), 1);
        assert_eq!(g.out_degree(c), 0);
        assert!(!g.has_lane(c, a));
    }

    #[test]
    fn duplicate_lanes_collapse() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(1.0, 0.0));
        b.add_lane(a, c);
        b.add_lane(c, a);
        assert_eq!(b.build().unwrap().lane_count(), 2);
    }

    #[test]
    fn lane_to_missing_vertex_rejected() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        b.add_lane(a, VertexId(7));
        assert!(matches!(b.build(), Err(GraphError::InvalidLane { .. })));
    }

    #[test]
    fn self_loop_rejected() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        b.add_directed_lane(a, a);
        assert!(matches!(b.build(), Err(GraphError::InvalidLane { from: 0, to: 0 })));
    }

    #[test]
    fn neighbors_sorted_ascending() {
        let mut b = NavGraphBuilder::new();
        let hub = b.add_vertex(Point2::new(0.0, 0.0));
        let v1 = b.add_vertex(Point2::new(1.0, 0.0));
        let v2 = b.add_vertex(Point2::new(0.0, 1.0));
        let v3 = b.add_vertex(Point2::new(-1.0, 0.0));
        b.add_lane(hub, v3);
        b.add_lane(hub, v1);
        b.add_lane(hub, v2);
        let g = b.build().unwrap();
        assert_eq!(g.neighbors(hub), &[v1, v2, v3]);
    }

    #[test]
    fn vertex_metadata() {
        let mut b = NavGraphBuilder::new();
        let dock = b.add_named_vertex(Point2::new(0.0, 0.0), "dock", VertexKind::Charger);
        let plain = b.add_vertex(Point2::new(5.0, 0.0));
        let g = b.build().unwrap();
        assert!(g.is_charger(dock));
        assert!(!g.is_charger(plain));
        assert_eq!(g.name(plain), "V1");
        assert_eq!(g.vertex_by_name("dock"), Some(dock));
        assert_eq!(g.vertex_by_name("nowhere"), None);
    }
}

// ── Spatial lookup ────────────────────────────────────────────────────────────

#[cfg(test)]
mod spatial {
    use ft_core::{Point2, VertexId};

    #[test]
    fn nearest_vertex_snaps_click() {
        let (g, [v0, _, v2, _, v4]) = super::helpers::grid();
        assert_eq!(g.nearest_vertex(Point2::new(0.1, -0.2)), Some(v0));
        assert_eq!(g.nearest_vertex(Point2::new(2.2, 0.1)), Some(v2));
        assert_eq!(g.nearest_vertex(Point2::new(9.0, 1.5)), Some(v4));
    }

    #[test]
    fn vertices_within_radius() {
        let (g, _) = super::helpers::grid();
        let mut near = g.vertices_within(Point2::new(0.0, 0.0), 1.05);
        near.sort();
        assert_eq!(near, vec![VertexId(0), VertexId(1), VertexId(3)]);
    }
}

// ── Planners ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod planning {
    use ft_core::{Point2, VertexId};
    use crate::{plan_route, BfsPlanner, DijkstraPlanner, GraphError, NavGraphBuilder, Planner};

    #[test]
    fn bfs_prefers_fewest_hops() {
        let (g, [v0, _, _, v3, v4]) = super::helpers::grid();
        let route = BfsPlanner.plan(&g, v0, v4).unwrap();
        assert_eq!(route.vertices, vec![v0, v3, v4]);
        assert!(route.is_valid_on(&g));
        assert_eq!(route.hops(), 2);
    }

    #[test]
    fn dijkstra_prefers_shortest_length() {
        let (g, [v0, v1, v2, _, v4]) = super::helpers::grid();
        let route = DijkstraPlanner.plan(&g, v0, v4).unwrap();
        assert_eq!(route.vertices, vec![v0, v1, v2, v4]);
        assert!(route.is_valid_on(&g));
        assert!(route.length < 11.0, "top path is ~10.06, bottom is 11");
    }

    #[test]
    fn same_endpoint_is_single_vertex() {
        let (g, [v0, ..]) = super::helpers::grid();
        for route in [
            BfsPlanner.plan(&g, v0, v0).unwrap(),
            DijkstraPlanner.plan(&g, v0, v0).unwrap(),
        ] {
            assert_eq!(route.vertices, vec![v0]);
            assert!(route.is_trivial());
            assert_eq!(route.length, 0.0);
        }
    }

    #[test]
    fn tie_breaks_on_lowest_vertex_id() {
        let g = super::helpers::diamond();
        let bfs = BfsPlanner.plan(&g, VertexId(0), VertexId(3)).unwrap();
        assert_eq!(bfs.vertices, vec![VertexId(0), VertexId(1), VertexId(3)]);
    }

    #[test]
    fn dijkstra_tie_breaks_on_lowest_vertex_id() {
        // Square: 0 ─ 1 ─ 3 and 0 ─ 2 ─ 3 with identical lengths.
        let mut b = NavGraphBuilder::new();
        let v0 = b.add_vertex(Point2::new(0.0, 0.0));
        let v1 = b.add_vertex(Point2::new(1.0, 1.0));
        let v2 = b.add_vertex(Point2::new(1.0, -1.0));
        let v3 = b.add_vertex(Point2::new(2.0, 0.0));
        b.add_lane(v0, v2);
        b.add_lane(v2, v3);
        b.add_lane(v0, v1);
        b.add_lane(v1, v3);
        let g = b.build().unwrap();
        let route = DijkstraPlanner.plan(&g, v0, v3).unwrap();
        assert_eq!(route.vertices, vec![v0, v1, v3]);
    }

    #[test]
    fn planning_is_deterministic() {
        let (g, [v0, .., v4]) = super::helpers::grid();
        let first = plan_route(&g, v4, v0).unwrap();
        for _ in 0..20 {
            assert_eq!(plan_route(&g, v4, v0).unwrap(), first);
        }
    }

    #[test]
    fn disconnected_is_unreachable() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(1.0, 0.0));
        let island = b.add_vertex(Point2::new(9.0, 9.0));
        b.add_lane(a, c);
        let g = b.build().unwrap();
        assert!(matches!(
            BfsPlanner.plan(&g, a, island),
            Err(GraphError::Unreachable { .. })
        ));
        assert!(matches!(
            DijkstraPlanner.plan(&g, a, island),
            Err(GraphError::Unreachable { .. })
        ));
    }

    #[test]
    fn one_way_lane_blocks_return_trip() {
        let mut b = NavGraphBuilder::new();
        let a = b.add_vertex(Point2::new(0.0, 0.0));
        let c = b.add_vertex(Point2::new(1.0, 0.0));
        b.add_directed_lane(a, c);
        let g = b.build().unwrap();
        assert!(plan_route(&g, a, c).is_ok());
        assert!(matches!(plan_route(&g, c, a), Err(GraphError::Unreachable { .. })));
    }

    #[test]
    fn unknown_vertex_reported() {
        let (g, [v0, ..]) = super::helpers::grid();
        assert!(matches!(
            plan_route(&g, v0, VertexId(99)),
            Err(GraphError::VertexNotFound(VertexId(99)))
        ));
    }

    #[test]
    fn every_pair_route_is_valid() {
        let (g, _) = super::helpers::grid();
        for from in g.vertices() {
            for to in g.vertices() {
                let route = plan_route(&g, from, to).unwrap();
                assert!(route.is_valid_on(&g), "{from} -> {to}: {:?}", route.vertices);
                assert_eq!(route.source(), Some(from));
                assert_eq!(route.destination(), Some(to));
            }
        }
    }
}

// ── JSON loader ───────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "json"))]
mod loader {
    use std::io::Cursor;

    use ft_core::VertexId;
    use crate::{load_nav_graph_reader, GraphError, VertexKind};

    const LEVELS_DOC: &str = r#"{
        "building_name": "depot",
        "levels": {
            "L1": {
                "vertices": [
                    [0.0, 0.0, {"name": "dock", "is_charger": true}],
                    [2.0, 0.0, {"name": "aisle"}],
                    [2.0, 3.0, {}]
                ],
                "lanes": [
                    [0, 1, {"speed_limit": 0.0}],
                    [1, 2, {"is_bidirectional": false}]
                ]
            },
            "L2": { "vertices": [[9.0, 9.0, {}]], "lanes": [] }
        }
    }"#;

    #[test]
    fn loads_first_level() {
        let g = load_nav_graph_reader(Cursor::new(LEVELS_DOC)).unwrap();
        assert_eq!(g.vertex_count(), 3);
        assert_eq!(g.kind(VertexId(0)), VertexKind::Charger);
        assert_eq!(g.name(VertexId(1)), "aisle");
        assert_eq!(g.name(VertexId(2)), "V2");
        assert!(g.has_lane(VertexId(0), VertexId(1)));
        assert!(g.has_lane(VertexId(1), VertexId(0)));
        assert!(g.has_lane(VertexId(1), VertexId(2)));
        assert!(!g.has_lane(VertexId(2), VertexId(1)));
    }

    #[test]
    fn loads_flat_document() {
        let doc = r#"{ "vertices": [[0, 0, {}], [1, 0, {}]], "lanes": [[0, 1, {}]] }"#;
        let g = load_nav_graph_reader(Cursor::new(doc)).unwrap();
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.lane_count(), 2);
    }

    #[test]
    fn lane_to_unknown_vertex_rejected() {
        let doc = r#"{ "vertices": [[0, 0, {}]], "lanes": [[0, 4, {}]] }"#;
        assert!(matches!(
            load_nav_graph_reader(Cursor::new(doc)),
            Err(GraphError::InvalidLane { from: 0, to: 4 })
        ));
    }

    #[test]
    fn empty_levels_rejected() {
        let doc = r#"{ "levels": {} }"#;
        assert!(matches!(
            load_nav_graph_reader(Cursor::new(doc)),
            Err(GraphError::Format(_))
        ));
    }

    #[test]
    fn malformed_json_rejected() {
        assert!(matches!(
            load_nav_graph_reader(Cursor::new("{ not json")),
            Err(GraphError::Json(_))
        ));
    }
}
