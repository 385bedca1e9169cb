use thiserror::Error;

use eta_spatial::SpatialError;

#[derive(Debug, Error)]
pub enum TripError {
    #[error("invalid ride information: {0}")]
    InvalidRide(String),

    #[error("feature vector has {got} values, expected {expected}")]
    MalformedFeatures { expected: usize, got: usize },

    #[error("feature {name} (index {index}) is not a finite number")]
    NonFiniteFeature { index: usize, name: &'static str },

    #[error("prediction failed: {0}")]
    Prediction(String),

    #[error("both pickup and dropoff must be selected")]
    IncompleteSelection,

    #[error("routing failed: {0}")]
    Routing(#[from] SpatialError),
}

pub type TripResult<T> = Result<T, TripError>;
