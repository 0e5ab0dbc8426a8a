//! Core error type.
//!
//! Sub-crates define their own error enums (`GraphError`, `EngineError`, …)
//! and wrap `CoreError` as one variant where they need to.

use thiserror::Error;

/// Errors produced while validating core configuration.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `ft-core`.
pub type CoreResult<T> = Result<T, CoreError>;
