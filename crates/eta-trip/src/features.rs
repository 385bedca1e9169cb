//! Ride attributes and the predictor's fixed-order feature vector.

use crate::{TripError, TripResult};

/// Length of the vector passed to [`DurationPredictor::predict`](crate::DurationPredictor::predict).
pub const FEATURE_COUNT: usize = 5;

/// Column order of the feature vector.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] =
    ["passenger_count", "vendor_id", "hour_of_day", "day_of_week", "distance_km"];

pub const MAX_PASSENGERS: u8 = 6;
pub const VENDOR_IDS: [u8; 2] = [1, 2];

/// Everything about a trip except where it goes.
///
/// `hour_of_day` is 0–23 and `day_of_week` is 0–6 with Monday = 0.  Turning a
/// pickup timestamp into these two numbers is the caller's job.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RideInfo {
    pub passenger_count: u8,
    pub vendor_id:       u8,
    pub hour_of_day:     u8,
    pub day_of_week:     u8,
}

impl RideInfo {
    /// Validated constructor.
    pub fn new(passenger_count: u8, vendor_id: u8, hour_of_day: u8, day_of_week: u8) -> TripResult<Self> {
        let ride = Self { passenger_count, vendor_id, hour_of_day, day_of_week };
        ride.validate()?;
        Ok(ride)
    }

    pub fn validate(&self) -> TripResult<()> {
        if !(1..=MAX_PASSENGERS).contains(&self.passenger_count) {
            return Err(TripError::InvalidRide(format!(
                "passenger count {} outside 1..={MAX_PASSENGERS}",
                self.passenger_count
            )));
        }
        if !VENDOR_IDS.contains(&self.vendor_id) {
            return Err(TripError::InvalidRide(format!(
                "unknown vendor id {} (expected one of {VENDOR_IDS:?})",
                self.vendor_id
            )));
        }
        if self.hour_of_day > 23 {
            return Err(TripError::InvalidRide(format!("hour {} outside 0..=23", self.hour_of_day)));
        }
        if self.day_of_week > 6 {
            return Err(TripError::InvalidRide(format!("weekday {} outside 0..=6", self.day_of_week)));
        }
        Ok(())
    }

    /// Combine with a routed distance.
    pub fn with_distance(self, distance_km: f64) -> TripFeatures {
        TripFeatures { ride: self, distance_km }
    }
}

/// Ride attributes plus route distance, ready to hand to a predictor.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripFeatures {
    pub ride:        RideInfo,
    pub distance_km: f64,
}

impl TripFeatures {
    /// `[passenger_count, vendor_id, hour_of_day, day_of_week, distance_km]`
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            f64::from(self.ride.passenger_count),
            f64::from(self.ride.vendor_id),
            f64::from(self.ride.hour_of_day),
            f64::from(self.ride.day_of_week),
            self.distance_km,
        ]
    }
}

/// Check length and finiteness of a raw feature vector.
pub fn check_features(features: &[f64]) -> TripResult<&[f64; FEATURE_COUNT]> {
    let fixed: &[f64; FEATURE_COUNT] = features.try_into().map_err(|_| TripError::MalformedFeatures {
        expected: FEATURE_COUNT,
        got:      features.len(),
    })?;
    if let Some(index) = fixed.iter().position(|v| !v.is_finite()) {
        return Err(TripError::NonFiniteFeature { index, name: FEATURE_NAMES[index] });
    }
    Ok(fixed)
}
