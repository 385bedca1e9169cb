//! `eta-spatial` — road network, nearest-node snapping, and A* routing.
//!
//! # Crate layout
//!
//! | Module     | Contents                                                      |
//! |------------|---------------------------------------------------------------|
//! | [`network`]| `RoadNetwork` (CSR + R-tree), `RoadNetworkBuilder`            |
//! | [`router`] | `Router` trait, `NodePath`, `AStarRouter`, `DijkstraRouter`   |
//! | [`route`]  | `Route`, `RoutePlanner` (snap → search → assemble)            |
//! | [`search`] | `SearchControl`, `CancelToken`, `SearchStats`                 |
//! | [`config`] | `RoutingConfig`, `SnapStrategy`, `DistanceMetric`             |
//! | [`loader`] | `load_network_csv`, `load_network_reader`                     |
//! | [`osm`]    | `load_from_pbf` (feature = `"osm"` only)                      |
//! | [`error`]  | `SpatialError`, `SpatialResult<T>`                            |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                    |
//! |------------|-----------------------------------------------------------|
//! | `osm`      | Enables OSM PBF loading via the `osmpbf` crate.           |
//! | `parallel` | `RoutePlanner::plan_many` runs on Rayon.                  |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.        |
//!
//! # Quick-start
//!
//! ```
//! use eta_core::GeoPoint;
//! use eta_spatial::{AStarRouter, RoadNetworkBuilder, RoutePlanner, RoutingConfig};
//!
//! let mut b = RoadNetworkBuilder::new();
//! let a = b.add_node(GeoPoint::new(40.75, -73.98));
//! let c = b.add_node(GeoPoint::new(40.76, -73.97));
//! b.add_road(a, c, 1_500.0).unwrap();
//! let net = b.build();
//!
//! let planner = RoutePlanner::new(&net, &AStarRouter, RoutingConfig::default());
//! let route = planner
//!     .plan(GeoPoint::new(40.7501, -73.9801), GeoPoint::new(40.7599, -73.9701))
//!     .unwrap();
//! assert_eq!(route.nodes, vec![a, c]);
//! ```

pub mod config;
pub mod error;
pub mod loader;
pub mod network;
pub mod route;
pub mod router;
pub mod search;

#[cfg(feature = "osm")]
pub mod osm;

#[cfg(test)]
mod tests;

pub use config::{DistanceMetric, RoutingConfig, SnapStrategy};
pub use error::{SpatialError, SpatialResult};
pub use loader::{LoadedNetwork, load_network_csv, load_network_reader};
pub use network::{RoadNetwork, RoadNetworkBuilder};
pub use route::{Route, RoutePlanner};
pub use router::{AStarRouter, DijkstraRouter, NodePath, Router};
pub use search::{CancelToken, SearchControl, SearchStats};
