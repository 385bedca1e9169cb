//! Caller-held pickup/dropoff selection.
//!
//! A UI owns one `TripSession` per user session and feeds map clicks into it.
//! Nothing here is global; dropping the value is the reset.

use eta_core::GeoPoint;

/// Which endpoint the next click sets.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ClickMode {
    #[default]
    Pickup,
    Dropoff,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TripSession {
    pub mode: ClickMode,
    pickup:   Option<GeoPoint>,
    dropoff:  Option<GeoPoint>,
}

impl TripSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a click at `point` as the endpoint selected by `self.mode`.
    /// A second click in the same mode replaces the first.
    pub fn click(&mut self, point: GeoPoint) -> ClickMode {
        match self.mode {
            ClickMode::Pickup => self.pickup = Some(point),
            ClickMode::Dropoff => self.dropoff = Some(point),
        }
        self.mode
    }

    pub fn set_pickup(&mut self, point: GeoPoint) {
        self.pickup = Some(point);
    }

    pub fn set_dropoff(&mut self, point: GeoPoint) {
        self.dropoff = Some(point);
    }

    pub fn pickup(&self) -> Option<GeoPoint> {
        self.pickup
    }

    pub fn dropoff(&self) -> Option<GeoPoint> {
        self.dropoff
    }

    /// `(pickup, dropoff)` once both are set.
    pub fn endpoints(&self) -> Option<(GeoPoint, GeoPoint)> {
        self.pickup.zip(self.dropoff)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
