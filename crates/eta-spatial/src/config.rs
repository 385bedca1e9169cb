//! Routing configuration.
//!
//! Typically filled in by the application from CLI flags or a config file and
//! handed to [`RoutePlanner`](crate::RoutePlanner).

use std::time::Duration;

use crate::search::{DEFAULT_CHECK_INTERVAL, SearchControl};

/// How pickup/dropoff coordinates are matched to graph nodes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SnapStrategy {
    /// R-tree nearest neighbour (O(log N)).
    #[default]
    Indexed,
    /// Full haversine scan (O(N)).
    Linear,
}

/// Which length a [`Route`](crate::Route) reports as `distance_km`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DistanceMetric {
    /// Sum of great-circle distances between consecutive path nodes.
    #[default]
    GreatCircle,
    /// Sum of the edge lengths the search minimised.
    EdgeLength,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoutingConfig {
    pub snap: SnapStrategy,

    pub metric: DistanceMetric,

    /// Frontier pops between cancellation/deadline checks.
    pub check_interval: u32,

    /// Per-search wall-clock budget.  `None` = unbounded.
    pub timeout_ms: Option<u64>,
}

impl RoutingConfig {
    /// A fresh [`SearchControl`] for one request.  The deadline, if any,
    /// starts counting now.
    pub fn search_control(&self) -> SearchControl {
        let control = SearchControl::unbounded().with_check_interval(self.check_interval);
        match self.timeout_ms {
            Some(ms) => control.with_timeout(Duration::from_millis(ms)),
            None => control,
        }
    }
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            snap:           SnapStrategy::default(),
            metric:         DistanceMetric::default(),
            check_interval: DEFAULT_CHECK_INTERVAL,
            timeout_ms:     None,
        }
    }
}
