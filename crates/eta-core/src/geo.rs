//! Geographic coordinate type and great-circle helpers.
//!
//! `GeoPoint` is double precision.  Route distances are sums of many short
//! haversine legs, and the A* heuristic is compared against edge lengths
//! accumulated over thousands of relaxations; `f32` rounding at that scale
//! would be visible in the reported kilometres.

use std::fmt;
use std::str::FromStr;

use crate::{CoreError, CoreResult};

/// Mean Earth radius in metres (IUGG).
pub const EARTH_RADIUS_M: f64 = 6_371_008.8;

/// A WGS-84 geographic coordinate in decimal degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    #[inline]
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Like [`new`](Self::new) but rejects non-finite values and coordinates
    /// outside `[-90, 90] × [-180, 180]`.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
            return Err(CoreError::InvalidCoordinate { lat, lon });
        }
        if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
            return Err(CoreError::InvalidCoordinate { lat, lon });
        }
        Ok(Self { lat, lon })
    }

    /// Haversine great-circle distance in metres on a spherical Earth.
    ///
    /// Symmetric, non-negative and satisfies the triangle inequality, so it
    /// is a consistent A* heuristic for any road graph whose edge lengths are
    /// at least the straight-line distance between their endpoints.
    pub fn distance_m(self, other: GeoPoint) -> f64 {
        let d_lat = (other.lat - self.lat).to_radians();
        let d_lon = (other.lon - self.lon).to_radians();

        let lat1 = self.lat.to_radians();
        let lat2 = other.lat.to_radians();

        let a = (d_lat * 0.5).sin().powi(2)
            + lat1.cos() * lat2.cos() * (d_lon * 0.5).sin().powi(2);

        // Clamp guards asin against a > 1 from rounding on antipodal points.
        2.0 * EARTH_RADIUS_M * a.sqrt().min(1.0).asin()
    }

    #[inline]
    pub fn distance_km(self, other: GeoPoint) -> f64 {
        self.distance_m(other) / 1_000.0
    }

    /// Position on the unit sphere as Earth-centred Cartesian `[x, y, z]`.
    ///
    /// Straight-line (chord) distance between two unit vectors grows
    /// monotonically with the great-circle angle between them, so Euclidean
    /// nearest-neighbour search over these vectors returns the great-circle
    /// nearest point.
    pub fn to_unit_vector(self) -> [f64; 3] {
        let lat = self.lat.to_radians();
        let lon = self.lon.to_radians();
        [lat.cos() * lon.cos(), lat.cos() * lon.sin(), lat.sin()]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

/// Parses `"lat,lon"` (whitespace around either number is ignored).
impl FromStr for GeoPoint {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| CoreError::Parse(format!("expected \"lat,lon\", got {s:?}")))?;
        let lat = lat
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::Parse(format!("latitude {lat:?}: {e}")))?;
        let lon = lon
            .trim()
            .parse::<f64>()
            .map_err(|e| CoreError::Parse(format!("longitude {lon:?}: {e}")))?;
        GeoPoint::try_new(lat, lon)
    }
}
