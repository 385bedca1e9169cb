//! Routing trait, A* with a great-circle heuristic, and plain Dijkstra.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait so the search algorithm can be
//! swapped without touching snapping or route assembly.  [`AStarRouter`] is
//! the default; [`DijkstraRouter`] explores more of the graph but needs no
//! coordinates and serves as the reference the A* results are checked
//! against.
//!
//! # Cost units
//!
//! Search cost is the sum of `edge_length_m` along the path, in metres.  The
//! A* heuristic is the haversine distance to the destination, also metres.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use eta_core::{EdgeId, NodeId};

use crate::network::RoadNetwork;
use crate::search::{SearchControl, SearchStats};
use crate::{SpatialError, SpatialResult};

// ── NodePath ──────────────────────────────────────────────────────────────────

/// Minimum-cost node sequence returned by a [`Router`].
#[derive(Debug, Clone, PartialEq)]
pub struct NodePath {
    /// Nodes from origin to destination, both inclusive.
    pub nodes: Vec<NodeId>,
    /// Sum of traversed edge lengths in metres.
    pub cost_m: f64,
    pub stats: SearchStats,
}

impl NodePath {
    fn trivial(node: NodeId) -> Self {
        Self { nodes: vec![node], cost_m: 0.0, stats: SearchStats::default() }
    }

    /// `true` if origin and destination are the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path search over a [`RoadNetwork`].
///
/// Implementations hold no per-request state; the network is borrowed
/// immutably, so one router and one network can serve many threads at once.
pub trait Router: Send + Sync {
    /// Compute a minimum-length path from `from` to `to`.
    ///
    /// `from == to` yields a single-node path of cost zero.  Fails with
    /// [`SpatialError::NodeNotFound`] for ids outside the network,
    /// [`SpatialError::NoRoute`] when `to` is unreachable, and
    /// `Cancelled` / `DeadlineExceeded` when `control` trips.
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        control: &SearchControl,
    ) -> SpatialResult<NodePath>;
}

// ── AStarRouter ───────────────────────────────────────────────────────────────

/// A* search guided by straight-line (great-circle) distance to the target.
///
/// The path returned has minimum total edge length whenever the heuristic is
/// admissible, i.e. the haversine distance from any node to the target never
/// exceeds its remaining road distance.  Edges shorter than the straight line
/// between their endpoints make the heuristic inconsistent; a node popped too
/// early is then reopened when a cheaper path to it turns up.  With lengths
/// measured along road geometry each node is expanded at most once.
pub struct AStarRouter;

impl Router for AStarRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        control: &SearchControl,
    ) -> SpatialResult<NodePath> {
        let target = network.coordinates_of(to)?;
        network.coordinates_of(from)?;
        best_first(network, from, to, control, |n| {
            network.node_pos[n.index()].distance_m(target)
        })
    }
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Uninformed Dijkstra over edge lengths.
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &RoadNetwork,
        from:    NodeId,
        to:      NodeId,
        control: &SearchControl,
    ) -> SpatialResult<NodePath> {
        network.coordinates_of(to)?;
        network.coordinates_of(from)?;
        best_first(network, from, to, control, |_| 0.0)
    }
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Frontier entry.  Ordered so `BinaryHeap` (a max-heap) pops the lowest
/// `f` first; ties go to the lower `g`, then the lower `NodeId`.
#[derive(Copy, Clone, Debug)]
struct Candidate {
    f:    f64,
    g:    f64,
    node: NodeId,
}

impl Ord for Candidate {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.g.total_cmp(&self.g))
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for Candidate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for Candidate {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Candidate {}

/// Shared best-first loop.  With `heuristic ≡ 0` this is Dijkstra.
///
/// `from` and `to` must already be validated against `network`.
fn best_first(
    network:   &RoadNetwork,
    from:      NodeId,
    to:        NodeId,
    control:   &SearchControl,
    heuristic: impl Fn(NodeId) -> f64,
) -> SpatialResult<NodePath> {
    if from == to {
        return Ok(NodePath::trivial(from));
    }

    let n = network.node_count();
    // g[v] = best known path length (m) from `from` to v.
    let mut g         = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut stats     = SearchStats::default();

    g[from.index()] = 0.0;

    let mut frontier = BinaryHeap::new();
    frontier.push(Candidate { f: heuristic(from), g: 0.0, node: from });

    let mut pops = 0usize;
    while let Some(Candidate { g: cost, node, .. }) = frontier.pop() {
        if control.due(pops) {
            control.check().inspect_err(|e| {
                log::warn!("search {from} -> {to} aborted after {pops} pops: {e}");
            })?;
        }
        pops += 1;

        // Stale entry: a cheaper path to `node` was pushed after this one.
        if cost > g[node.index()] {
            continue;
        }
        stats.nodes_settled += 1;

        if node == to {
            let nodes = reconstruct(network, &prev_edge, to);
            log::debug!("route {from} -> {to}: {:.1} m over {} nodes ({stats})", cost, nodes.len());
            return Ok(NodePath { nodes, cost_m: cost, stats });
        }

        for edge in network.out_edges(node) {
            let neighbor = network.edge_to[edge.index()];
            let candidate = cost + network.edge_length_m[edge.index()];

            if candidate < g[neighbor.index()] {
                g[neighbor.index()] = candidate;
                prev_edge[neighbor.index()] = edge;
                stats.edges_relaxed += 1;
                frontier.push(Candidate {
                    f:    candidate + heuristic(neighbor),
                    g:    candidate,
                    node: neighbor,
                });
            }
        }
    }

    log::debug!("no route {from} -> {to} ({stats})");
    Err(SpatialError::NoRoute { from, to })
}

/// Walk predecessor edges back from `to` and reverse into origin-first order.
fn reconstruct(network: &RoadNetwork, prev_edge: &[EdgeId], to: NodeId) -> Vec<NodeId> {
    let mut nodes = vec![to];
    let mut cur = to;
    loop {
        let e = prev_edge[cur.index()];
        if e == EdgeId::INVALID {
            break;
        }
        cur = network.edge_from[e.index()];
        nodes.push(cur);
    }
    nodes.reverse();
    nodes
}
