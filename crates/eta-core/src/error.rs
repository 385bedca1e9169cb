//! Core error type.
//!
//! Sub-crates define their own error enums; `CoreError` only covers what
//! `eta-core` itself can get wrong, which is turning user input into a
//! [`GeoPoint`](crate::GeoPoint).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("coordinate ({lat}, {lon}) is outside the valid WGS-84 range")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `eta-core`.
pub type CoreResult<T> = Result<T, CoreError>;
