//! Point-to-point routing: snap, search, assemble.
//!
//! [`RoutePlanner`] is what callers holding raw pickup/dropoff coordinates
//! use.  It snaps both points to graph nodes, hands the node pair to a
//! [`Router`], and turns the resulting [`NodePath`] into a [`Route`] with a
//! coordinate polyline and a distance in kilometres.

use eta_core::{GeoPoint, NodeId};

use crate::config::{DistanceMetric, RoutingConfig, SnapStrategy};
use crate::network::RoadNetwork;
use crate::router::{NodePath, Router};
use crate::search::{SearchControl, SearchStats};
use crate::SpatialResult;

// ── Route ─────────────────────────────────────────────────────────────────────

/// A shortest path between two snapped points.  Derived and transient.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Path nodes, origin first.
    pub nodes: Vec<NodeId>,
    /// Coordinates of `nodes`, same order.
    pub coords: Vec<GeoPoint>,
    /// Reported trip distance, measured per [`DistanceMetric`].
    pub distance_km: f64,
    /// Sum of great-circle legs between consecutive `coords`, in metres.
    pub great_circle_m: f64,
    /// Sum of traversed edge lengths, in metres (the search cost).
    pub edge_length_m: f64,
    pub stats: SearchStats,
}

impl Route {
    /// Project `path` onto coordinates and measure it.
    pub fn assemble(
        network: &RoadNetwork,
        path:    NodePath,
        metric:  DistanceMetric,
    ) -> SpatialResult<Route> {
        let coords = path
            .nodes
            .iter()
            .map(|&n| network.coordinates_of(n))
            .collect::<SpatialResult<Vec<_>>>()?;

        let great_circle_m: f64 = coords.windows(2).map(|w| w[0].distance_m(w[1])).sum();

        let distance_km = match metric {
            DistanceMetric::GreatCircle => great_circle_m / 1_000.0,
            DistanceMetric::EdgeLength => path.cost_m / 1_000.0,
        };

        Ok(Route {
            nodes: path.nodes,
            coords,
            distance_km,
            great_circle_m,
            edge_length_m: path.cost_m,
            stats: path.stats,
        })
    }

    /// First node of the path; `None` only for a hand-built empty route.
    pub fn origin(&self) -> Option<NodeId> {
        self.nodes.first().copied()
    }

    pub fn destination(&self) -> Option<NodeId> {
        self.nodes.last().copied()
    }

    /// `true` if pickup and dropoff snapped to the same node.
    pub fn is_trivial(&self) -> bool {
        self.nodes.len() == 1
    }
}

// ── RoutePlanner ──────────────────────────────────────────────────────────────

/// Borrowing façade over a network, a router and a config.
///
/// Cheap to construct per request; holds only references and a config clone.
pub struct RoutePlanner<'a, R: Router> {
    network: &'a RoadNetwork,
    router:  &'a R,
    config:  RoutingConfig,
}

impl<'a, R: Router> RoutePlanner<'a, R> {
    pub fn new(network: &'a RoadNetwork, router: &'a R, config: RoutingConfig) -> Self {
        Self { network, router, config }
    }

    pub fn network(&self) -> &'a RoadNetwork {
        self.network
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Nearest node to `point` using the configured strategy.
    pub fn snap(&self, point: GeoPoint) -> SpatialResult<NodeId> {
        match self.config.snap {
            SnapStrategy::Indexed => self.network.snap_to_node(point),
            SnapStrategy::Linear => self.network.snap_to_node_linear(point),
        }
    }

    /// Route between two coordinates with a fresh per-request control
    /// derived from the config.
    pub fn plan(&self, pickup: GeoPoint, dropoff: GeoPoint) -> SpatialResult<Route> {
        self.plan_with(pickup, dropoff, &self.config.search_control())
    }

    /// Like [`plan`](Self::plan) with a caller-supplied cancellation token
    /// or deadline.
    pub fn plan_with(
        &self,
        pickup:  GeoPoint,
        dropoff: GeoPoint,
        control: &SearchControl,
    ) -> SpatialResult<Route> {
        let from = self.snap(pickup)?;
        let to = self.snap(dropoff)?;
        log::debug!("snapped {pickup} -> {from}, {dropoff} -> {to}");

        let path = self.router.route(self.network, from, to, control)?;
        Route::assemble(self.network, path, self.config.metric)
    }

    /// Route each `(pickup, dropoff)` pair independently.  Results are in
    /// input order; one failure does not affect the others.
    ///
    /// With the `parallel` Cargo feature the requests run on Rayon's thread
    /// pool, sharing the network read-only.
    pub fn plan_many(&self, pairs: &[(GeoPoint, GeoPoint)]) -> Vec<SpatialResult<Route>> {
        #[cfg(not(feature = "parallel"))]
        {
            pairs.iter().map(|&(a, b)| self.plan(a, b)).collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            pairs.par_iter().map(|&(a, b)| self.plan(a, b)).collect()
        }
    }
}
