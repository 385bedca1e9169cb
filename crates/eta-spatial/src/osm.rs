//! OSM PBF loader — enabled with the `osm` Cargo feature.
//!
//! # Usage
//!
//! ```ignore
//! use std::path::Path;
//! use eta_spatial::osm::load_from_pbf;
//!
//! let network = load_from_pbf(Path::new("manhattan.osm.pbf"))?;
//! ```
//!
//! # What is loaded
//!
//! The drivable street network: `highway=*` ways accepted by [`is_drivable`],
//! minus ways tagged `access=no|private` or `motor_vehicle=no`.  One-way roads
//! add a single directed edge (reversed for `oneway=-1`); two-way roads add
//! both directions.  Edge length is the haversine distance between
//! consecutive way nodes, which keeps the A* heuristic admissible by
//! construction.

use std::path::Path;

use osmpbf::{Element, ElementReader};
use rustc_hash::{FxHashMap, FxHashSet};

use eta_core::{GeoPoint, NodeId};

use crate::network::{RoadNetwork, RoadNetworkBuilder};
use crate::SpatialError;

// ── Public entry point ────────────────────────────────────────────────────────

/// Load the drivable road network from an OSM PBF extract.
///
/// # Errors
///
/// [`SpatialError::Osm`] when the file cannot be opened or decoded.
pub fn load_from_pbf(path: &Path) -> Result<RoadNetwork, SpatialError> {
    let reader = ElementReader::from_path(path).map_err(|e| SpatialError::Osm(e.to_string()))?;

    let mut all_nodes: FxHashMap<i64, GeoPoint> = FxHashMap::default();
    let mut road_ways: Vec<OsmWay> = Vec::new();

    reader
        .for_each(|elem| match elem {
            Element::Node(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::DenseNode(n) => {
                all_nodes.insert(n.id(), GeoPoint::new(n.lat(), n.lon()));
            }
            Element::Way(w) => {
                let tags: Vec<(&str, &str)> = w.tags().collect();
                let tag = |key: &str| tags.iter().find(|(k, _)| *k == key).map(|(_, v)| *v);

                let Some(highway) = tag("highway") else { return };
                if !is_drivable(highway)
                    || matches!(tag("access"), Some("no" | "private"))
                    || tag("motor_vehicle") == Some("no")
                {
                    return;
                }

                let direction = match tag("oneway") {
                    Some("yes" | "1" | "true") => Direction::Forward,
                    Some("-1" | "reverse") => Direction::Backward,
                    Some("no" | "0" | "false") => Direction::Both,
                    _ if is_implicit_oneway(highway, tag("junction")) => Direction::Forward,
                    _ => Direction::Both,
                };
                road_ways.push(OsmWay { refs: w.refs().collect(), direction });
            }
            _ => {}
        })
        .map_err(|e| SpatialError::Osm(e.to_string()))?;

    let road_node_ids: FxHashSet<i64> = road_ways
        .iter()
        .flat_map(|w| w.refs.iter().copied())
        .collect();

    let mut builder = RoadNetworkBuilder::with_capacity(road_node_ids.len(), road_node_ids.len() * 2);
    let mut osm_to_eta: FxHashMap<i64, NodeId> = FxHashMap::default();

    // Sorted so NodeIds do not depend on hash-set iteration order.
    let mut ordered: Vec<i64> = road_node_ids.into_iter().collect();
    ordered.sort_unstable();
    for osm_id in ordered {
        if let Some(&pos) = all_nodes.get(&osm_id) {
            osm_to_eta.insert(osm_id, builder.add_node(pos));
        }
    }
    drop(all_nodes);

    let mut skipped = 0usize;
    for way in &road_ways {
        for pair in way.refs.windows(2) {
            let (Some(&a), Some(&b)) = (osm_to_eta.get(&pair[0]), osm_to_eta.get(&pair[1])) else {
                skipped += 1;
                continue;
            };
            let (Some(pa), Some(pb)) = (builder.node_pos(a), builder.node_pos(b)) else {
                skipped += 1;
                continue;
            };
            let len_m = pa.distance_m(pb);

            match way.direction {
                Direction::Forward => builder.add_directed_edge(a, b, len_m)?,
                Direction::Backward => builder.add_directed_edge(b, a, len_m)?,
                Direction::Both => builder.add_road(a, b, len_m)?,
            }
        }
    }
    if skipped > 0 {
        log::warn!("skipped {skipped} way segments referencing nodes missing from the extract");
    }

    Ok(builder.build())
}

// ── Internal types ────────────────────────────────────────────────────────────

#[derive(Copy, Clone)]
enum Direction {
    Forward,
    Backward,
    Both,
}

struct OsmWay {
    refs:      Vec<i64>,
    direction: Direction,
}

// ── Tag helpers ───────────────────────────────────────────────────────────────

/// `highway` values that make up a drive network.
fn is_drivable(highway: &str) -> bool {
    matches!(
        highway,
        "motorway" | "motorway_link"
            | "trunk" | "trunk_link"
            | "primary" | "primary_link"
            | "secondary" | "secondary_link"
            | "tertiary" | "tertiary_link"
            | "residential" | "living_street"
            | "unclassified" | "road"
    )
}

/// Motorways and roundabouts are one-way unless tagged otherwise.
fn is_implicit_oneway(highway: &str, junction: Option<&str>) -> bool {
    matches!(highway, "motorway" | "motorway_link")
        || matches!(junction, Some("roundabout" | "circular"))
}
