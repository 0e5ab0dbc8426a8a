//! Graph-subsystem error type.

use thiserror::Error;

use ft_core::VertexId;

/// Errors produced by `ft-graph`.
#[derive(Debug, Error)]
pub enum GraphError {
    #[error("no route from {from} to {to}")]
    Unreachable { from: VertexId, to: VertexId },

    #[error("vertex {0} not found in graph")]
    VertexNotFound(VertexId),

    /// A lane endpoint does not name an existing vertex, or the lane is a
    /// self-loop.
    #[error("invalid lane {from} -> {to}")]
    InvalidLane { from: u32, to: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "json")]
    #[error("nav-graph JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "json")]
    #[error("nav-graph format error: {0}")]
    Format(String),
}

pub type GraphResult<T> = Result<T, GraphError>;
