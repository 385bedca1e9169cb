//! The `DurationPredictor` trait — the extension point for trained models.

use crate::features::{FEATURE_COUNT, check_features};
use crate::{TripError, TripResult};

/// Black-box trip-duration model.
///
/// Takes the fixed-order vector
/// `[passenger_count, vendor_id, hour_of_day, day_of_week, distance_km]` and
/// returns a duration in seconds.  Any regression (linear, tree ensemble, a
/// call into an inference runtime) fits behind this trait; how it was trained
/// or stored is none of the router's business.
///
/// Implementations must be deterministic and should reject malformed input
/// with an error rather than panicking.  [`check_features`] does the common
/// length and finiteness checks.
///
/// Closures `Fn(&[f64]) -> TripResult<f64>` implement the trait, which is
/// handy for wrapping an external model:
///
/// ```
/// use eta_trip::{DurationPredictor, TripResult};
///
/// let flat_rate = |_: &[f64]| -> TripResult<f64> { Ok(600.0) };
/// assert_eq!(flat_rate.predict(&[1.0, 1.0, 8.0, 0.0, 2.5]).unwrap(), 600.0);
/// ```
pub trait DurationPredictor: Send + Sync {
    fn predict(&self, features: &[f64]) -> TripResult<f64>;
}

impl<F> DurationPredictor for F
where
    F: Fn(&[f64]) -> TripResult<f64> + Send + Sync,
{
    fn predict(&self, features: &[f64]) -> TripResult<f64> {
        self(features)
    }
}

// ── LinearModel ───────────────────────────────────────────────────────────────

/// `intercept + Σ weightᵢ · featureᵢ`, floored at zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinearModel {
    pub intercept: f64,
    pub weights:   [f64; FEATURE_COUNT],
}

impl LinearModel {
    pub fn new(intercept: f64, weights: [f64; FEATURE_COUNT]) -> TripResult<Self> {
        if !intercept.is_finite() || weights.iter().any(|w| !w.is_finite()) {
            return Err(TripError::Prediction("linear model has non-finite coefficients".into()));
        }
        Ok(Self { intercept, weights })
    }
}

impl DurationPredictor for LinearModel {
    fn predict(&self, features: &[f64]) -> TripResult<f64> {
        let x = check_features(features)?;
        let y = self.intercept + self.weights.iter().zip(x).map(|(w, v)| w * v).sum::<f64>();
        Ok(y.max(0.0))
    }
}

// ── ConstantSpeedModel ────────────────────────────────────────────────────────

/// Distance over a fixed average speed plus a fixed pickup overhead.
///
/// Ignores every feature except `distance_km`.  A baseline for tests and for
/// running without a trained model.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConstantSpeedModel {
    pub speed_kmh:     f64,
    pub overhead_secs: f64,
}

impl ConstantSpeedModel {
    pub fn new(speed_kmh: f64, overhead_secs: f64) -> TripResult<Self> {
        if !(speed_kmh.is_finite() && speed_kmh > 0.0) {
            return Err(TripError::Prediction(format!("speed {speed_kmh} km/h must be positive")));
        }
        if !(overhead_secs.is_finite() && overhead_secs >= 0.0) {
            return Err(TripError::Prediction(format!("overhead {overhead_secs} s must be non-negative")));
        }
        Ok(Self { speed_kmh, overhead_secs })
    }
}

impl Default for ConstantSpeedModel {
    /// Midtown average, roughly 18 km/h.
    fn default() -> Self {
        Self { speed_kmh: 18.0, overhead_secs: 0.0 }
    }
}

impl DurationPredictor for ConstantSpeedModel {
    fn predict(&self, features: &[f64]) -> TripResult<f64> {
        let x = check_features(features)?;
        let distance_km = x[FEATURE_COUNT - 1];
        Ok(self.overhead_secs + distance_km.max(0.0) / self.speed_kmh * 3_600.0)
    }
}
