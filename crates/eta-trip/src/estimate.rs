//! Route → features → predicted duration.

use std::fmt;

use eta_core::GeoPoint;
use eta_spatial::{Route, RoutePlanner, Router};

use crate::features::{RideInfo, TripFeatures};
use crate::model::DurationPredictor;
use crate::session::TripSession;
use crate::{TripError, TripResult};

// ── TripEstimate ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct TripEstimate {
    pub route:         Route,
    pub features:      TripFeatures,
    pub duration_secs: f64,
}

impl TripEstimate {
    /// Whole minutes and leftover whole seconds.
    pub fn minutes_seconds(&self) -> (u64, u64) {
        let secs = self.duration_secs.max(0.0);
        ((secs / 60.0).floor() as u64, (secs % 60.0).floor() as u64)
    }

    pub fn distance_km(&self) -> f64 {
        self.route.distance_km
    }
}

impl fmt::Display for TripEstimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (m, s) = self.minutes_seconds();
        write!(f, "{m} min {s} sec, distance {:.2} km", self.route.distance_km)
    }
}

// ── TripEstimator ─────────────────────────────────────────────────────────────

/// Routes a trip and feeds the routed distance to a [`DurationPredictor`].
pub struct TripEstimator<'a, R: Router, P: DurationPredictor> {
    planner:   RoutePlanner<'a, R>,
    predictor: &'a P,
}

impl<'a, R: Router, P: DurationPredictor> TripEstimator<'a, R, P> {
    pub fn new(planner: RoutePlanner<'a, R>, predictor: &'a P) -> Self {
        Self { planner, predictor }
    }

    pub fn planner(&self) -> &RoutePlanner<'a, R> {
        &self.planner
    }

    /// Route `pickup` → `dropoff` and predict the duration for `ride`.
    ///
    /// Routing and prediction errors come back as `Err`; nothing here panics
    /// on bad input, so a UI can show the message and carry on.
    pub fn estimate(
        &self,
        pickup:  GeoPoint,
        dropoff: GeoPoint,
        ride:    &RideInfo,
    ) -> TripResult<TripEstimate> {
        ride.validate()?;
        let route = self.planner.plan(pickup, dropoff)?;
        let features = ride.with_distance(route.distance_km);

        let duration_secs = self.predictor.predict(&features.to_vector())?;
        if !duration_secs.is_finite() {
            return Err(TripError::Prediction(format!(
                "model returned a non-finite duration ({duration_secs})"
            )));
        }

        log::debug!(
            "estimated {duration_secs:.0} s for {:.3} km ({} route nodes)",
            route.distance_km,
            route.nodes.len()
        );
        Ok(TripEstimate { route, features, duration_secs })
    }

    /// [`estimate`](Self::estimate) using the session's selected endpoints.
    pub fn estimate_session(&self, session: &TripSession, ride: &RideInfo) -> TripResult<TripEstimate> {
        let (pickup, dropoff) = session.endpoints().ok_or(TripError::IncompleteSelection)?;
        self.estimate(pickup, dropoff, ride)
    }

    /// Route for drawing on a map, or `None` when the selection is
    /// incomplete or no route exists.  Failures are logged, not returned.
    pub fn preview_route(&self, session: &TripSession) -> Option<Route> {
        let (pickup, dropoff) = session.endpoints()?;
        self.planner
            .plan(pickup, dropoff)
            .inspect_err(|e| log::debug!("no preview route: {e}"))
            .ok()
    }
}
