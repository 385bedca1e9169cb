//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! All edge arrays (`edge_from`, `edge_to`, `edge_length_m`) are sorted by
//! source node and indexed by `EdgeId`.  The sort is stable, so parallel
//! edges keep the order in which the graph source added them.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over unit-sphere Cartesian vectors maps a
//! `GeoPoint` to its great-circle-nearest `NodeId`.  A linear haversine scan
//! is kept alongside for small graphs and for cross-checking the index.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use eta_core::{EdgeId, GeoPoint, NodeId};

use crate::{SpatialError, SpatialResult};

/// Relative slack under which two snap candidates count as equidistant.
const SNAP_TIE_EPS: f64 = 1e-12;

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a node's unit-sphere position and its id.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length on the unit sphere.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Immutable directed road graph in CSR format plus a spatial index for
/// node snapping.
///
/// Nothing on `RoadNetwork` takes `&mut self`, so one instance can be shared
/// by any number of concurrent routing requests.  Build it with
/// [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// CSR row pointer.  Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Source node of each edge; used to walk predecessor edges backwards.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Physical length of each edge in metres.  Always finite and `>= 0`.
    pub edge_length_m: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// A network with no nodes or edges.  Every snap against it fails with
    /// [`SpatialError::EmptyNetwork`].
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    fn check(&self, node: NodeId) -> SpatialResult<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(SpatialError::NodeNotFound(node))
        }
    }

    // ── Read-only queries ─────────────────────────────────────────────────

    /// Coordinates of `node`.
    pub fn coordinates_of(&self, node: NodeId) -> SpatialResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    /// `(neighbor, edge_length_m)` for every outgoing edge of `node`,
    /// parallel edges included.  A dead end yields an empty iterator.
    pub fn neighbors_of(
        &self,
        node: NodeId,
    ) -> SpatialResult<impl Iterator<Item = (NodeId, f64)> + '_> {
        self.check(node)?;
        Ok(self
            .out_edges(node)
            .map(|e| (self.edge_to[e.index()], self.edge_length_m[e.index()])))
    }

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// Contiguous index range, no allocation.  `node` must be in range; use
    /// [`neighbors_of`](Self::neighbors_of) for checked access.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| EdgeId(i as u32))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Nearest node to `pos` by great-circle distance, via the R-tree.
    ///
    /// Among equidistant candidates the lowest `NodeId` wins, so the answer
    /// does not depend on R-tree packing.
    pub fn snap_to_node(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        let query = pos.to_unit_vector();
        let mut candidates = self.spatial_idx.nearest_neighbor_iter(&query);

        let first = candidates.next().ok_or(SpatialError::EmptyNetwork)?;
        let best_d2 = first.distance_2(&query);
        let limit = best_d2 + best_d2 * SNAP_TIE_EPS + f64::MIN_POSITIVE;

        Ok(candidates
            .take_while(|e| e.distance_2(&query) <= limit)
            .fold(first.id, |best, e| best.min(e.id)))
    }

    /// Nearest node to `pos` by a full haversine scan in `NodeId` order.
    ///
    /// O(N).  Fine up to tens of thousands of nodes; the first node at the
    /// minimum distance wins.
    pub fn snap_to_node_linear(&self, pos: GeoPoint) -> SpatialResult<NodeId> {
        let mut best: Option<(NodeId, f64)> = None;
        for (i, &p) in self.node_pos.iter().enumerate() {
            let d = pos.distance_m(p);
            match best {
                Some((_, best_d)) if d >= best_d => {}
                _ => best = Some((NodeId(i as u32), d)),
            }
        }
        best.map(|(id, _)| id).ok_or(SpatialError::EmptyNetwork)
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// Edges are validated on insertion: both endpoints must already exist and
/// the length must be finite and non-negative.  This is what guarantees the
/// network invariant that every edge references nodes present in the graph.
///
/// # Example
///
/// ```
/// use eta_core::GeoPoint;
/// use eta_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(40.75, -73.98));
/// let c = b.add_node(GeoPoint::new(40.76, -73.97));
/// b.add_road(a, c, 1_400.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes:     Vec<GeoPoint>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from:     NodeId,
    to:       NodeId,
    length_m: f64,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        id
    }

    /// Add a **directed** edge of `length_m` metres from `from` to `to`.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> SpatialResult<()> {
        for node in [from, to] {
            if node.index() >= self.nodes.len() {
                return Err(SpatialError::InvalidEdge {
                    from,
                    to,
                    reason: format!("endpoint {node} has not been added"),
                });
            }
        }
        if !length_m.is_finite() || length_m < 0.0 {
            return Err(SpatialError::InvalidEdge {
                from,
                to,
                reason: format!("length {length_m} m is not a finite non-negative number"),
            });
        }
        self.raw_edges.push(RawEdge { from, to, length_m });
        Ok(())
    }

    /// Convenience: add edges in **both directions** for a two-way segment.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) -> SpatialResult<()> {
        self.add_directed_edge(a, b, length_m)?;
        self.add_directed_edge(b, a, length_m)
    }

    /// Position of a node added earlier (loaders use it to derive edge
    /// lengths from way geometry).
    pub fn node_pos(&self, id: NodeId) -> Option<GeoPoint> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// O(E log E) for the edge sort + O(N log N) for the R-tree bulk load.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| e.from.0);

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.to_unit_vector(),
                id:    NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        log::debug!("built road network: {node_count} nodes, {edge_count} edges");

        RoadNetwork {
            node_pos: self.nodes,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
