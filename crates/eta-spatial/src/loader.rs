//! CSV road-network loader.
//!
//! # CSV format
//!
//! Two files.  Node ids are whatever integer the data source uses (an OSM
//! node id, a row number); they are mapped to dense `NodeId`s in file order.
//!
//! ```csv
//! id,lat,lon
//! 42429741,40.7580,-73.9855
//! 42429749,40.7592,-73.9846
//! ```
//!
//! ```csv
//! from,to,length_m,oneway
//! 42429741,42429749,152.4,false
//! 42429749,42429741,152.4,
//! ```
//!
//! **`oneway`** is optional.  Empty or `true` adds a single directed edge;
//! `false` adds the reverse edge as well.
//!
//! Duplicate node ids and edges that mention an unknown node id are errors,
//! not skipped rows: a silently dropped edge changes which routes exist.

use std::io::Read;
use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use eta_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::{SpatialError, SpatialResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    id:  i64,
    lat: f64,
    lon: f64,
}

#[derive(Deserialize)]
struct EdgeRecord {
    from:     i64,
    to:       i64,
    length_m: f64,
    #[serde(default)]
    oneway:   Option<bool>,
}

// ── Loaded network ────────────────────────────────────────────────────────────

/// A network plus the mapping from source ids back to `NodeId`s.
pub struct LoadedNetwork {
    pub network: RoadNetwork,
    /// Source id of each node, indexed by `NodeId`.
    pub source_ids: Vec<i64>,
    by_source: FxHashMap<i64, NodeId>,
}

impl LoadedNetwork {
    /// `NodeId` assigned to the node the source file called `source_id`.
    pub fn node_for(&self, source_id: i64) -> Option<NodeId> {
        self.by_source.get(&source_id).copied()
    }

    /// Source id of `node`.
    pub fn source_id(&self, node: NodeId) -> Option<i64> {
        self.source_ids.get(node.index()).copied()
    }
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a network from `nodes.csv` / `edges.csv` style files.
pub fn load_network_csv(nodes: &Path, edges: &Path) -> SpatialResult<LoadedNetwork> {
    let nodes = std::fs::File::open(nodes)?;
    let edges = std::fs::File::open(edges)?;
    load_network_reader(nodes, edges)
}

/// Like [`load_network_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`) or for embedded data.
pub fn load_network_reader<N: Read, E: Read>(nodes: N, edges: E) -> SpatialResult<LoadedNetwork> {
    let mut builder = RoadNetworkBuilder::new();
    let mut by_source: FxHashMap<i64, NodeId> = FxHashMap::default();
    let mut source_ids: Vec<i64> = Vec::new();

    // ── Nodes ─────────────────────────────────────────────────────────────
    let mut node_reader = csv::Reader::from_reader(nodes);
    for (row, result) in node_reader.deserialize::<NodeRecord>().enumerate() {
        let rec = result.map_err(|e| SpatialError::Parse(format!("nodes row {}: {e}", row + 1)))?;
        let pos = GeoPoint::try_new(rec.lat, rec.lon)
            .map_err(|e| SpatialError::Parse(format!("nodes row {}: {e}", row + 1)))?;

        if by_source.contains_key(&rec.id) {
            return Err(SpatialError::Parse(format!("duplicate node id {}", rec.id)));
        }
        let id = builder.add_node(pos);
        by_source.insert(rec.id, id);
        source_ids.push(rec.id);
    }

    // ── Edges ─────────────────────────────────────────────────────────────
    let lookup = |source: i64, row: usize| {
        by_source.get(&source).copied().ok_or_else(|| {
            SpatialError::Parse(format!("edges row {row}: unknown node id {source}"))
        })
    };

    let mut edge_reader = csv::Reader::from_reader(edges);
    for (row, result) in edge_reader.deserialize::<EdgeRecord>().enumerate() {
        let row = row + 1;
        let rec = result.map_err(|e| SpatialError::Parse(format!("edges row {row}: {e}")))?;
        let from = lookup(rec.from, row)?;
        let to = lookup(rec.to, row)?;

        if rec.oneway.unwrap_or(true) {
            builder.add_directed_edge(from, to, rec.length_m)?;
        } else {
            builder.add_road(from, to, rec.length_m)?;
        }
    }

    log::info!(
        "loaded {} nodes and {} directed edges from CSV",
        builder.node_count(),
        builder.edge_count()
    );

    Ok(LoadedNetwork { network: builder.build(), source_ids, by_source })
}
