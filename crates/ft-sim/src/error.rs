use thiserror::Error;

use ft_core::{AgentId, CoreError, VertexId};
use ft_graph::GraphError;

/// Errors returned across the engine boundary.  All are recoverable: the
/// engine state is unchanged unless the variant says otherwise.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Spawn or relocation target is held, promised, or has waiters.
    #[error("vertex {0} is occupied")]
    VertexOccupied(VertexId),

    #[error("unknown agent {0}")]
    UnknownAgent(AgentId),

    #[error("unknown vertex {0}")]
    UnknownVertex(VertexId),

    /// No route exists.  The agent has been reset to `Unassigned` and an
    /// `Unreachable` event was emitted.
    #[error("agent {agent}: no route from {from} to {to}")]
    Unreachable {
        agent: AgentId,
        from:  VertexId,
        to:    VertexId,
    },

    #[error("engine configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("graph error: {0}")]
    Graph(#[from] GraphError),
}

pub type EngineResult<T> = Result<T, EngineError>;
