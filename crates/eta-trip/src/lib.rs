//! `eta-trip` — from a routed distance to a predicted trip duration.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`features`] | `RideInfo`, `TripFeatures`, feature-vector checks          |
//! | [`model`]    | `DurationPredictor` trait, `LinearModel`, `ConstantSpeedModel` |
//! | [`estimate`] | `TripEstimator`, `TripEstimate`                            |
//! | [`session`]  | `TripSession`, `ClickMode`                                 |
//! | [`error`]    | `TripError`, `TripResult<T>`                               |
//!
//! The predictor sees only the five-element vector
//! `[passenger_count, vendor_id, hour_of_day, day_of_week, distance_km]`, where
//! `distance_km` is [`Route::distance_km`](eta_spatial::Route::distance_km).

pub mod error;
pub mod estimate;
pub mod features;
pub mod model;
pub mod session;


pub use error::{TripError, TripResult};
pub use estimate::{TripEstimate, TripEstimator};
pub use features::{FEATURE_COUNT, FEATURE_NAMES, RideInfo, TripFeatures, check_features};
pub use model::{ConstantSpeedModel, DurationPredictor, LinearModel};
pub use session::{ClickMode, TripSession};
