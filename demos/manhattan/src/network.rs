//! Synthetic Midtown street grid.
//!
//! Avenues run along Manhattan's grid bearing (29° east of true north) and
//! are two-way.  Cross streets alternate one-way direction the way numbered
//! streets do: even streets eastbound, odd streets westbound.  Every edge is
//! exactly as long as the straight line between its endpoints.

use eta_core::{GeoPoint, NodeId};
use eta_spatial::{RoadNetwork, RoadNetworkBuilder, SpatialResult};

/// South-west corner of the grid (roughly 34th St & 8th Ave).
const ORIGIN: GeoPoint = GeoPoint { lat: 40.7527, lon: -73.9939 };
const GRID_BEARING_DEG: f64 = 29.0;
/// Block length between cross streets.
const STREET_SPACING_M: f64 = 80.0;
/// Block length between avenues.
const AVENUE_SPACING_M: f64 = 270.0;
const STREETS: usize = 30;
const AVENUES: usize = 7;

const METRES_PER_DEG_LAT: f64 = 111_195.0;

/// Build the grid; node `[street][avenue]` ids are returned alongside.
pub fn build_grid() -> SpatialResult<(RoadNetwork, Vec<Vec<NodeId>>)> {
    let mut b = RoadNetworkBuilder::with_capacity(STREETS * AVENUES, STREETS * AVENUES * 4);

    let (sin, cos) = GRID_BEARING_DEG.to_radians().sin_cos();
    let m_per_deg_lon = METRES_PER_DEG_LAT * ORIGIN.lat.to_radians().cos();

    let grid: Vec<Vec<NodeId>> = (0..STREETS)
        .map(|s| {
            (0..AVENUES)
                .map(|a| {
                    // Uptown along the bearing, crosstown perpendicular to it.
                    let up = s as f64 * STREET_SPACING_M;
                    let across = a as f64 * AVENUE_SPACING_M;
                    let north = up * cos - across * sin;
                    let east = up * sin + across * cos;
                    b.add_node(GeoPoint::new(
                        ORIGIN.lat + north / METRES_PER_DEG_LAT,
                        ORIGIN.lon + east / m_per_deg_lon,
                    ))
                })
                .collect()
        })
        .collect();

    let straight = |b: &RoadNetworkBuilder, x: NodeId, y: NodeId| -> f64 {
        match (b.node_pos(x), b.node_pos(y)) {
            (Some(p), Some(q)) => p.distance_m(q),
            _ => f64::NAN,
        }
    };

    for s in 0..STREETS {
        for a in 0..AVENUES {
            if s + 1 < STREETS {
                let (x, y) = (grid[s][a], grid[s + 1][a]);
                let len = straight(&b, x, y);
                b.add_road(x, y, len)?;
            }
            if a + 1 < AVENUES {
                let (x, y) = (grid[s][a], grid[s][a + 1]);
                let len = straight(&b, x, y);
                if s % 2 == 0 {
                    b.add_directed_edge(x, y, len)?;
                } else {
                    b.add_directed_edge(y, x, len)?;
                }
            }
        }
    }

    Ok((b.build(), grid))
}
