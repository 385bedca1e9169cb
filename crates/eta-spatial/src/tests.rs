//! Unit tests for eta-spatial.
//!
//! All tests use hand-crafted or seeded random networks so they run without
//! any map data.

#[cfg(test)]
mod helpers {
    use eta_core::{GeoPoint, NodeId};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::{RoadNetwork, RoadNetworkBuilder};

    /// Two-way road whose length is `factor` × the straight-line distance.
    pub fn road(b: &mut RoadNetworkBuilder, x: NodeId, y: NodeId, factor: f64) {
        let len = b.node_pos(x).unwrap().distance_m(b.node_pos(y).unwrap()) * factor;
        b.add_road(x, y, len).unwrap();
    }

    /// Small Midtown-sized grid.
    ///
    /// ```text
    ///   3 ─────────────── 4      lat 40.760
    ///   │ (x2 detour)     │
    ///   0 ─── 1 ──────── 2      lat 40.750
    /// ```
    ///
    /// Road 0–3 is twice its straight-line length, so the shortest path
    /// 0→4 is 0→1→2→4.
    pub fn grid_network() -> (RoadNetwork, [NodeId; 5]) {
        let mut b = RoadNetworkBuilder::new();

        let n0 = b.add_node(GeoPoint::new(40.750, -73.990));
        let n1 = b.add_node(GeoPoint::new(40.750, -73.980));
        let n2 = b.add_node(GeoPoint::new(40.750, -73.970));
        let n3 = b.add_node(GeoPoint::new(40.760, -73.990));
        let n4 = b.add_node(GeoPoint::new(40.760, -73.970));

        road(&mut b, n0, n1, 1.0);
        road(&mut b, n1, n2, 1.0);
        road(&mut b, n2, n4, 1.0);
        road(&mut b, n0, n3, 2.0);
        road(&mut b, n3, n4, 1.0);

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// A → B (1000 m) → C (1200 m), one-way, no A → C shortcut.
    pub fn three_stop_chain() -> (RoadNetwork, [NodeId; 3]) {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(40.75, -73.98));
        let bb = b.add_node(GeoPoint::new(40.76, -73.97));
        let c = b.add_node(GeoPoint::new(40.77, -73.96));
        b.add_directed_edge(a, bb, 1_000.0).unwrap();
        b.add_directed_edge(bb, c, 1_200.0).unwrap();
        (b.build(), [a, bb, c])
    }

    /// `nodes` random points over lower Manhattan joined by `edges` random
    /// directed edges, each 1–2× its straight-line length.
    pub fn random_network(seed: u64, nodes: usize, edges: usize) -> RoadNetwork {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<NodeId> = (0..nodes)
            .map(|_| {
                b.add_node(GeoPoint::new(
                    rng.gen_range(40.70..40.80),
                    rng.gen_range(-74.02..-73.93),
                ))
            })
            .collect();
        for _ in 0..edges {
            let x = ids[rng.gen_range(0..nodes)];
            let y = ids[rng.gen_range(0..nodes)];
            let straight = b.node_pos(x).unwrap().distance_m(b.node_pos(y).unwrap());
            b.add_directed_edge(x, y, straight * rng.gen_range(1.0..2.0)).unwrap();
        }
        b.build()
    }

    /// Random network routed towards `target` with edges 0.3–2× their
    /// straight-line length.  Every edge into `target` is longer than the
    /// farthest node's straight-line distance to it, so the great-circle
    /// heuristic stays admissible while short edges elsewhere break its
    /// consistency.
    pub fn shortcut_network(seed: u64, nodes: usize, edges: usize, target: NodeId) -> RoadNetwork {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut b = RoadNetworkBuilder::new();
        let ids: Vec<NodeId> = (0..nodes)
            .map(|_| {
                b.add_node(GeoPoint::new(
                    rng.gen_range(40.70..40.80),
                    rng.gen_range(-74.02..-73.93),
                ))
            })
            .collect();
        let goal = b.node_pos(target).unwrap();
        let reach = ids
            .iter()
            .map(|&id| b.node_pos(id).unwrap().distance_m(goal))
            .fold(0.0, f64::max);
        for _ in 0..edges {
            let x = ids[rng.gen_range(0..nodes)];
            let y = ids[rng.gen_range(0..nodes)];
            let straight = b.node_pos(x).unwrap().distance_m(b.node_pos(y).unwrap());
            let mut len = straight * rng.gen_range(0.3..2.0);
            if y == target && x != target {
                len += reach;
            }
            b.add_directed_edge(x, y, len).unwrap();
        }
        b.build()
    }

    /// Bellman-Ford single-source distances; `INFINITY` = unreachable.
    pub fn brute_force_distances(net: &RoadNetwork, from: NodeId) -> Vec<f64> {
        let mut dist = vec![f64::INFINITY; net.node_count()];
        dist[from.index()] = 0.0;
        for _ in 0..net.node_count() {
            let mut changed = false;
            for e in 0..net.edge_count() {
                let u = net.edge_from[e].index();
                let v = net.edge_to[e].index();
                let cand = dist[u] + net.edge_length_m[e];
                if cand < dist[v] {
                    dist[v] = cand;
                    changed = true;
                }
            }
            if !changed {
                break;
            }
        }
        dist
    }

    /// Length of `path` using the shortest parallel edge between each pair;
    /// panics if two consecutive nodes are not connected.
    pub fn path_length(net: &RoadNetwork, path: &[NodeId]) -> f64 {
        path.windows(2)
            .map(|w| {
                net.neighbors_of(w[0])
                    .unwrap()
                    .filter(|&(n, _)| n == w[1])
                    .map(|(_, len)| len)
                    .fold(f64::INFINITY, f64::min)
            })
            .inspect(|len| assert!(len.is_finite(), "path uses a missing edge"))
            .sum()
    }
}

// ── Builder & network structure ───────────────────────────────────────────────

#[cfg(test)]
mod network {
    use eta_core::{GeoPoint, NodeId};

    use crate::{RoadNetworkBuilder, SpatialError};

    #[test]
    fn empty_build() {
        let net = RoadNetworkBuilder::new().build();
        assert_eq!(net.node_count(), 0);
        assert_eq!(net.edge_count(), 0);
        assert!(net.is_empty());
    }

    #[test]
    fn csr_degrees() {
        let (net, [n0, n1, n2, n3, n4]) = super::helpers::grid_network();
        assert_eq!(net.edge_count(), 10);
        assert_eq!(net.out_degree(n0), 2);
        assert_eq!(net.out_degree(n1), 2);
        assert_eq!(net.out_degree(n2), 2);
        assert_eq!(net.out_degree(n3), 2);
        assert_eq!(net.out_degree(n4), 2);
        for e in net.out_edges(n0) {
            assert_eq!(net.edge_from[e.index()], n0);
        }
    }

    #[test]
    fn directed_only_edge() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 1.0));
        b.add_directed_edge(a, c, 120_000.0).unwrap();
        let net = b.build();
        assert_eq!(net.edge_count(), 1);
        assert_eq!(net.out_degree(a), 1);
        assert_eq!(net.out_degree(c), 0);
    }

    #[test]
    fn coordinates_of_known_and_unknown() {
        let (net, [_, n1, ..]) = super::helpers::grid_network();
        assert_eq!(net.coordinates_of(n1).unwrap(), GeoPoint::new(40.750, -73.980));
        assert!(matches!(
            net.coordinates_of(NodeId(99)),
            Err(SpatialError::NodeNotFound(NodeId(99)))
        ));
    }

    #[test]
    fn neighbors_of_dead_end_is_empty() {
        let (net, [a, b, c]) = super::helpers::three_stop_chain();
        assert_eq!(net.neighbors_of(a).unwrap().collect::<Vec<_>>(), vec![(b, 1_000.0)]);
        assert_eq!(net.neighbors_of(c).unwrap().count(), 0);
        assert!(net.neighbors_of(NodeId(3)).is_err());
    }

    #[test]
    fn parallel_edges_kept_in_insertion_order() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(40.750, -73.98));
        let c = b.add_node(GeoPoint::new(40.759, -73.98));
        b.add_directed_edge(a, c, 3_000.0).unwrap();
        b.add_directed_edge(a, c, 1_500.0).unwrap();
        let net = b.build();
        let lens: Vec<f64> = net.neighbors_of(a).unwrap().map(|(_, l)| l).collect();
        assert_eq!(lens, vec![3_000.0, 1_500.0]);
    }

    #[test]
    fn rejects_unknown_endpoint() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let err = b.add_directed_edge(a, NodeId(5), 10.0).unwrap_err();
        assert!(matches!(err, SpatialError::InvalidEdge { .. }));
        assert_eq!(b.edge_count(), 0);
    }

    #[test]
    fn rejects_bad_lengths() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(0.0, 0.0));
        let c = b.add_node(GeoPoint::new(0.0, 0.1));
        assert!(b.add_directed_edge(a, c, -1.0).is_err());
        assert!(b.add_directed_edge(a, c, f64::NAN).is_err());
        assert!(b.add_road(a, c, f64::INFINITY).is_err());
        assert!(b.add_directed_edge(a, c, 0.0).is_ok());
    }
}

// ── Spatial snap ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod snap {
    use eta_core::GeoPoint;
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    use crate::{RoadNetworkBuilder, SpatialError};

    #[test]
    fn snaps_to_closer_of_two() {
        let mut b = RoadNetworkBuilder::new();
        let origin = b.add_node(GeoPoint::new(0.0, 0.0));
        b.add_node(GeoPoint::new(1.0, 1.0));
        let net = b.build();

        let q = GeoPoint::new(0.1, 0.1);
        assert_eq!(net.snap_to_node(q).unwrap(), origin);
        assert_eq!(net.snap_to_node_linear(q).unwrap(), origin);
    }

    #[test]
    fn snap_exact_position() {
        let (net, [_, _, _, n3, _]) = super::helpers::grid_network();
        assert_eq!(net.snap_to_node(GeoPoint::new(40.760, -73.990)).unwrap(), n3);
    }

    #[test]
    fn empty_network_fails() {
        let net = RoadNetworkBuilder::new().build();
        let q = GeoPoint::new(40.75, -73.98);
        assert!(matches!(net.snap_to_node(q), Err(SpatialError::EmptyNetwork)));
        assert!(matches!(net.snap_to_node_linear(q), Err(SpatialError::EmptyNetwork)));
    }

    #[test]
    fn ties_go_to_lowest_id() {
        let mut b = RoadNetworkBuilder::new();
        b.add_node(GeoPoint::new(10.0, 10.0));
        let first = b.add_node(GeoPoint::new(40.75, -73.98));
        for _ in 0..8 {
            b.add_node(GeoPoint::new(40.75, -73.98));
        }
        let net = b.build();

        let q = GeoPoint::new(40.7501, -73.9801);
        assert_eq!(net.snap_to_node(q).unwrap(), first);
        assert_eq!(net.snap_to_node_linear(q).unwrap(), first);
    }

    #[test]
    fn indexed_matches_linear_scan() {
        let net = super::helpers::random_network(11, 500, 0);
        let mut rng = SmallRng::seed_from_u64(99);
        for _ in 0..200 {
            let q = GeoPoint::new(rng.gen_range(40.68..40.82), rng.gen_range(-74.05..-73.90));
            assert_eq!(net.snap_to_node(q).unwrap(), net.snap_to_node_linear(q).unwrap());
        }
    }
}

// ── Search ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod routing {
    use std::time::Instant;

    use eta_core::{GeoPoint, NodeId};

    use crate::{
        AStarRouter, CancelToken, DijkstraRouter, RoadNetworkBuilder, Router, SearchControl,
        SpatialError,
    };

    fn unbounded() -> SearchControl {
        SearchControl::unbounded()
    }

    #[test]
    fn trivial_same_node() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        for router in [&AStarRouter as &dyn Router, &DijkstraRouter] {
            let p = router.route(&net, n0, n0, &unbounded()).unwrap();
            assert!(p.is_trivial());
            assert_eq!(p.nodes, vec![n0]);
            assert_eq!(p.cost_m, 0.0);
        }
    }

    #[test]
    fn shortest_path_correct() {
        let (net, [n0, n1, n2, _, n4]) = super::helpers::grid_network();
        let p = AStarRouter.route(&net, n0, n4, &unbounded()).unwrap();
        assert_eq!(p.nodes, vec![n0, n1, n2, n4]);
        let expected = super::helpers::path_length(&net, &p.nodes);
        assert!((p.cost_m - expected).abs() < 1e-9);
    }

    #[test]
    fn scenario_chain_goes_through_middle() {
        let (net, [a, b, c]) = super::helpers::three_stop_chain();
        let p = AStarRouter.route(&net, a, c, &unbounded()).unwrap();
        assert_eq!(p.nodes, vec![a, b, c]);
        assert_eq!(p.cost_m, 2_200.0);
    }

    #[test]
    fn no_route_disconnected() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(40.70, -74.00));
        let a2 = b.add_node(GeoPoint::new(40.71, -74.00));
        let c = b.add_node(GeoPoint::new(40.80, -73.95));
        let c2 = b.add_node(GeoPoint::new(40.81, -73.95));
        b.add_road(a, a2, 2_000.0).unwrap();
        b.add_road(c, c2, 2_000.0).unwrap();
        let net = b.build();

        for router in [&AStarRouter as &dyn Router, &DijkstraRouter] {
            let result = router.route(&net, a, c2, &unbounded());
            assert!(matches!(result, Err(SpatialError::NoRoute { from, to }) if from == a && to == c2));
        }
    }

    #[test]
    fn directed_one_way_blocks_return() {
        let (net, [a, _, c]) = super::helpers::three_stop_chain();
        assert!(AStarRouter.route(&net, a, c, &unbounded()).is_ok());
        assert!(matches!(
            AStarRouter.route(&net, c, a, &unbounded()),
            Err(SpatialError::NoRoute { .. })
        ));
    }

    #[test]
    fn unknown_node_is_not_found() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        assert!(matches!(
            AStarRouter.route(&net, n0, NodeId(42), &unbounded()),
            Err(SpatialError::NodeNotFound(NodeId(42)))
        ));
        assert!(matches!(
            DijkstraRouter.route(&net, NodeId(42), n0, &unbounded()),
            Err(SpatialError::NodeNotFound(NodeId(42)))
        ));
    }

    #[test]
    fn parallel_edges_use_shortest() {
        let mut b = RoadNetworkBuilder::new();
        let a = b.add_node(GeoPoint::new(40.750, -73.98));
        let c = b.add_node(GeoPoint::new(40.759, -73.98));
        b.add_directed_edge(a, c, 3_000.0).unwrap();
        b.add_directed_edge(a, c, 1_500.0).unwrap();
        b.add_directed_edge(a, c, 2_000.0).unwrap();
        let net = b.build();
        let p = AStarRouter.route(&net, a, c, &unbounded()).unwrap();
        assert_eq!(p.cost_m, 1_500.0);
    }

    #[test]
    fn astar_matches_brute_force() {
        for seed in 0..8 {
            let net = super::helpers::random_network(seed, 60, 240);
            for origin in [0u32, 7, 23, 59].map(NodeId) {
                let truth = super::helpers::brute_force_distances(&net, origin);
                for target in (0..60).map(NodeId) {
                    let astar = AStarRouter.route(&net, origin, target, &unbounded());
                    let dijkstra = DijkstraRouter.route(&net, origin, target, &unbounded());
                    let best = truth[target.index()];

                    if best.is_finite() {
                        let astar = astar.unwrap();
                        let dijkstra = dijkstra.unwrap();
                        assert!((astar.cost_m - best).abs() < 1e-6, "seed {seed}: {origin}->{target}");
                        assert!((dijkstra.cost_m - best).abs() < 1e-6);
                        let walked = super::helpers::path_length(&net, &astar.nodes);
                        assert!((walked - astar.cost_m).abs() < 1e-6);
                        assert_eq!(astar.nodes.first(), Some(&origin));
                        assert_eq!(astar.nodes.last(), Some(&target));
                    } else {
                        assert!(matches!(astar, Err(SpatialError::NoRoute { .. })));
                        assert!(matches!(dijkstra, Err(SpatialError::NoRoute { .. })));
                    }
                }
            }
        }
    }

    #[test]
    fn short_edge_reopens_node() {
        // S→A→B is shorter than S→B even though A lies farther from T, so B
        // is first reached through the worse edge and must be reopened.
        let mut b = RoadNetworkBuilder::new();
        let t = b.add_node(GeoPoint::new(0.0, 0.0));
        let bb = b.add_node(GeoPoint::new(0.0, 0.05));
        let a = b.add_node(GeoPoint::new(0.09, 0.0));
        let s = b.add_node(GeoPoint::new(0.10, 0.0));
        b.add_directed_edge(s, a, 1_112.0).unwrap();
        b.add_directed_edge(s, bb, 3_000.0).unwrap();
        b.add_directed_edge(a, bb, 1_000.0).unwrap();
        b.add_directed_edge(bb, t, 20_000.0).unwrap();
        let net = b.build();

        let astar = AStarRouter.route(&net, s, t, &unbounded()).unwrap();
        let dijkstra = DijkstraRouter.route(&net, s, t, &unbounded()).unwrap();
        assert_eq!(astar.nodes, vec![s, a, bb, t]);
        assert!((astar.cost_m - 22_112.0).abs() < 1e-6);
        assert_eq!(astar.nodes, dijkstra.nodes);
    }

    #[test]
    fn astar_optimal_with_inconsistent_heuristic() {
        for seed in 0..6 {
            for target in [0u32, 17, 41].map(NodeId) {
                let net = super::helpers::shortcut_network(seed, 50, 220, target);
                for origin in (0..50).map(NodeId) {
                    let best = super::helpers::brute_force_distances(&net, origin)[target.index()];
                    let astar = AStarRouter.route(&net, origin, target, &unbounded());
                    if best.is_finite() {
                        let astar = astar.unwrap();
                        assert!(
                            (astar.cost_m - best).abs() < 1e-6,
                            "seed {seed}: {origin}->{target} got {} want {best}",
                            astar.cost_m
                        );
                        let walked = super::helpers::path_length(&net, &astar.nodes);
                        assert!((walked - astar.cost_m).abs() < 1e-6);
                    } else {
                        assert!(matches!(astar, Err(SpatialError::NoRoute { .. })));
                    }
                }
            }
        }
    }

    #[test]
    fn astar_settles_no_more_than_dijkstra() {
        let mut b = RoadNetworkBuilder::new();
        let mut grid = [[NodeId::INVALID; 12]; 12];
        for (r, row) in grid.iter_mut().enumerate() {
            for (c, cell) in row.iter_mut().enumerate() {
                *cell = b.add_node(GeoPoint::new(40.70 + r as f64 * 0.002, -74.00 + c as f64 * 0.002));
            }
        }
        for r in 0..12 {
            for c in 0..12 {
                if c + 1 < 12 {
                    super::helpers::road(&mut b, grid[r][c], grid[r][c + 1], 1.1);
                }
                if r + 1 < 12 {
                    super::helpers::road(&mut b, grid[r][c], grid[r + 1][c], 1.1);
                }
            }
        }
        let net = b.build();

        let from = grid[0][0];
        let to = grid[11][11];
        let astar = AStarRouter.route(&net, from, to, &unbounded()).unwrap();
        let dijkstra = DijkstraRouter.route(&net, from, to, &unbounded()).unwrap();
        assert!((astar.cost_m - dijkstra.cost_m).abs() < 1e-6);
        assert!(astar.stats.nodes_settled <= dijkstra.stats.nodes_settled);
    }

    #[test]
    fn deterministic() {
        let net = super::helpers::random_network(3, 80, 320);
        let first = AStarRouter.route(&net, NodeId(0), NodeId(40), &unbounded());
        let second = AStarRouter.route(&net, NodeId(0), NodeId(40), &unbounded());
        match (first, second) {
            (Ok(a), Ok(b)) => assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => panic!("results differ between identical calls"),
        }
    }

    #[test]
    fn cancelled_token_aborts() {
        let (net, [n0, .., n4]) = super::helpers::grid_network();
        let token = CancelToken::new();
        token.cancel();
        let control = SearchControl::unbounded().with_cancel(token.clone());
        assert!(token.is_cancelled());
        assert!(matches!(
            AStarRouter.route(&net, n0, n4, &control),
            Err(SpatialError::Cancelled)
        ));
    }

    #[test]
    fn live_token_does_not_interfere() {
        let (net, [n0, .., n4]) = super::helpers::grid_network();
        let control = SearchControl::unbounded()
            .with_cancel(CancelToken::new())
            .with_check_interval(1);
        assert!(AStarRouter.route(&net, n0, n4, &control).is_ok());
    }

    #[test]
    fn expired_deadline_aborts() {
        let (net, [n0, .., n4]) = super::helpers::grid_network();
        let control = SearchControl::unbounded().with_deadline(Instant::now());
        assert!(matches!(
            DijkstraRouter.route(&net, n0, n4, &control),
            Err(SpatialError::DeadlineExceeded)
        ));
    }

    #[test]
    fn check_interval_zero_is_clamped() {
        assert_eq!(SearchControl::unbounded().with_check_interval(0).check_interval(), 1);
    }
}

// ── Point-to-point planning ───────────────────────────────────────────────────

#[cfg(test)]
mod planner {
    use eta_core::GeoPoint;

    use crate::{
        AStarRouter, DistanceMetric, RoadNetworkBuilder, Route, RoutePlanner, RoutingConfig,
        SearchStats, SnapStrategy, SpatialError,
    };

    #[test]
    fn single_edge_reports_great_circle_distance() {
        let mut b = RoadNetworkBuilder::new();
        let pa = GeoPoint::new(40.75, -73.98);
        let pb = GeoPoint::new(40.76, -73.97);
        let a = b.add_node(pa);
        let c = b.add_node(pb);
        b.add_directed_edge(a, c, 5_000.0).unwrap();
        let net = b.build();

        let planner = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());
        let route = planner.plan(pa, pb).unwrap();
        assert_eq!(route.nodes, vec![a, c]);
        assert_eq!(route.coords, vec![pa, pb]);
        assert!((route.distance_km - pa.distance_km(pb)).abs() < 1e-9);
        assert_eq!(route.edge_length_m, 5_000.0);
    }

    #[test]
    fn same_point_is_zero_distance() {
        let (net, [n0, ..]) = super::helpers::grid_network();
        let planner = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());
        let p = GeoPoint::new(40.7501, -73.9899);
        let route = planner.plan(p, p).unwrap();
        assert!(route.is_trivial());
        assert_eq!(route.origin(), Some(n0));
        assert_eq!(route.destination(), Some(n0));
        assert_eq!(route.distance_km, 0.0);
    }

    #[test]
    fn empty_route_has_no_endpoints() {
        let route = Route {
            nodes:          Vec::new(),
            coords:         Vec::new(),
            distance_km:    0.0,
            great_circle_m: 0.0,
            edge_length_m:  0.0,
            stats:          SearchStats::default(),
        };
        assert_eq!(route.origin(), None);
        assert_eq!(route.destination(), None);
        assert!(!route.is_trivial());
    }

    #[test]
    fn three_stop_scenario() {
        let (net, [a, b, c]) = super::helpers::three_stop_chain();
        let pa = GeoPoint::new(40.75, -73.98);
        let pb = GeoPoint::new(40.76, -73.97);
        let pc = GeoPoint::new(40.77, -73.96);

        let planner = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());
        let route = planner.plan(pa, pc).unwrap();
        assert_eq!(route.nodes, vec![a, b, c]);
        let expected = pa.distance_km(pb) + pb.distance_km(pc);
        assert!((route.distance_km - expected).abs() < 1e-9);
        assert!((route.great_circle_m - expected * 1_000.0).abs() < 1e-6);
    }

    #[test]
    fn edge_length_metric() {
        let (net, _) = super::helpers::three_stop_chain();
        let config = RoutingConfig { metric: DistanceMetric::EdgeLength, ..RoutingConfig::default() };
        let planner = RoutePlanner::new(&net, &AStarRouter, config);
        let route = planner
            .plan(GeoPoint::new(40.75, -73.98), GeoPoint::new(40.77, -73.96))
            .unwrap();
        assert!((route.distance_km - 2.2).abs() < 1e-12);
    }

    #[test]
    fn linear_snapping_gives_same_route() {
        let net = super::helpers::random_network(5, 120, 600);
        let pickup = GeoPoint::new(40.72, -74.00);
        let dropoff = GeoPoint::new(40.78, -73.95);

        let indexed = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());
        let linear = RoutePlanner::new(
            &net,
            &AStarRouter,
            RoutingConfig { snap: SnapStrategy::Linear, ..RoutingConfig::default() },
        );
        assert_eq!(indexed.snap(pickup).unwrap(), linear.snap(pickup).unwrap());
        match (indexed.plan(pickup, dropoff), linear.plan(pickup, dropoff)) {
            (Ok(x), Ok(y)) => assert_eq!(x, y),
            (Err(SpatialError::NoRoute { .. }), Err(SpatialError::NoRoute { .. })) => {}
            (x, y) => panic!("strategies disagree: {x:?} vs {y:?}"),
        }
    }

    #[test]
    fn empty_network_fails_to_snap() {
        let net = RoadNetworkBuilder::new().build();
        let planner = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());
        let p = GeoPoint::new(40.75, -73.98);
        assert!(matches!(planner.plan(p, p), Err(SpatialError::EmptyNetwork)));
    }

    #[test]
    fn zero_timeout_from_config() {
        let (net, _) = super::helpers::grid_network();
        let config = RoutingConfig { timeout_ms: Some(0), ..RoutingConfig::default() };
        let planner = RoutePlanner::new(&net, &AStarRouter, config);
        let result = planner.plan(GeoPoint::new(40.750, -73.990), GeoPoint::new(40.760, -73.970));
        assert!(matches!(result, Err(SpatialError::DeadlineExceeded)));
    }

    #[test]
    fn plan_many_keeps_order_and_isolates_failures() {
        let (net, [a, _, c]) = super::helpers::three_stop_chain();
        let pa = GeoPoint::new(40.75, -73.98);
        let pc = GeoPoint::new(40.77, -73.96);
        let planner = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());

        let results = planner.plan_many(&[(pa, pc), (pc, pa), (pa, pa)]);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].as_ref().unwrap().nodes.first(), Some(&a));
        assert_eq!(results[0].as_ref().unwrap().nodes.last(), Some(&c));
        assert!(matches!(results[1], Err(SpatialError::NoRoute { .. })));
        assert!(results[2].as_ref().unwrap().is_trivial());
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::{Cursor, Write};

    use eta_core::GeoPoint;

    use crate::{load_network_csv, load_network_reader, SpatialError};

    const NODES: &str = "\
id,lat,lon
1001,40.7500,-73.9800
1002,40.7600,-73.9700
1003,40.7700,-73.9600
";

    const EDGES: &str = "\
from,to,length_m,oneway
1001,1002,1450.0,false
1002,1003,1450.0,
";

    #[test]
    fn loads_nodes_and_edges() {
        let loaded = load_network_reader(Cursor::new(NODES), Cursor::new(EDGES)).unwrap();
        let net = &loaded.network;
        assert_eq!(net.node_count(), 3);
        // 1001<->1002 two-way, 1002->1003 one-way.
        assert_eq!(net.edge_count(), 3);

        let n2 = loaded.node_for(1002).unwrap();
        assert_eq!(loaded.source_id(n2), Some(1002));
        assert_eq!(net.coordinates_of(n2).unwrap(), GeoPoint::new(40.76, -73.97));
        assert!(loaded.node_for(9999).is_none());

        let n3 = loaded.node_for(1003).unwrap();
        assert_eq!(net.out_degree(n3), 0);
    }

    #[test]
    fn oneway_column_is_optional() {
        let edges = "from,to,length_m\n1001,1002,1450.0\n";
        let loaded = load_network_reader(Cursor::new(NODES), Cursor::new(edges)).unwrap();
        assert_eq!(loaded.network.edge_count(), 1);
    }

    #[test]
    fn dangling_edge_is_rejected() {
        let edges = "from,to,length_m\n1001,4242,10.0\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges));
        assert!(matches!(result, Err(SpatialError::Parse(msg)) if msg.contains("4242")));
    }

    #[test]
    fn duplicate_node_is_rejected() {
        let nodes = "id,lat,lon\n1,40.0,-73.0\n1,40.1,-73.1\n";
        let result = load_network_reader(Cursor::new(nodes), Cursor::new("from,to,length_m\n"));
        assert!(matches!(result, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn out_of_range_coordinate_is_rejected() {
        let nodes = "id,lat,lon\n1,95.0,-73.0\n";
        let result = load_network_reader(Cursor::new(nodes), Cursor::new("from,to,length_m\n"));
        assert!(matches!(result, Err(SpatialError::Parse(_))));
    }

    #[test]
    fn negative_length_is_rejected() {
        let edges = "from,to,length_m\n1001,1002,-3.0\n";
        let result = load_network_reader(Cursor::new(NODES), Cursor::new(edges));
        assert!(matches!(result, Err(SpatialError::InvalidEdge { .. })));
    }

    #[test]
    fn loads_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let nodes_path = dir.path().join("nodes.csv");
        let edges_path = dir.path().join("edges.csv");
        std::fs::File::create(&nodes_path).unwrap().write_all(NODES.as_bytes()).unwrap();
        std::fs::File::create(&edges_path).unwrap().write_all(EDGES.as_bytes()).unwrap();

        let loaded = load_network_csv(&nodes_path, &edges_path).unwrap();
        assert_eq!(loaded.network.node_count(), 3);

        let missing = load_network_csv(&dir.path().join("nope.csv"), &edges_path);
        assert!(matches!(missing, Err(SpatialError::Io(_))));
    }
}

// ── OSM loader ────────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "osm"))]
mod osm {
    use std::io::Write;

    use crate::SpatialError;
    use crate::osm::load_from_pbf;

    #[test]
    fn missing_file_is_an_osm_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_from_pbf(&dir.path().join("absent.osm.pbf"));
        assert!(matches!(result, Err(SpatialError::Osm(_))));
    }

    #[test]
    fn garbage_file_is_an_osm_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"\x00\x00\x00\x0dnot a pbf blob at all").unwrap();
        let result = load_from_pbf(file.path());
        assert!(matches!(result, Err(SpatialError::Osm(_))));
    }
}
