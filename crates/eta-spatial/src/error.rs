//! Spatial-subsystem error type.

use thiserror::Error;

use eta_core::NodeId;

/// Errors produced by `eta-spatial`.
///
/// Routing failures are deterministic for a given network and query, so none
/// of these are worth retrying; callers turn them into a "no route" message.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in network")]
    NodeNotFound(NodeId),

    #[error("road network has no nodes")]
    EmptyNetwork,

    #[error("invalid edge {from} -> {to}: {reason}")]
    InvalidEdge {
        from:   NodeId,
        to:     NodeId,
        reason: String,
    },

    #[error("route search cancelled")]
    Cancelled,

    #[error("route search exceeded its deadline")]
    DeadlineExceeded,

    #[error("road network parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "osm")]
    #[error("OSM parse error: {0}")]
    Osm(String),
}

pub type SpatialResult<T> = Result<T, SpatialError>;
