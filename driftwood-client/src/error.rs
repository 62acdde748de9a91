//! Error types for the client orchestration layer.

use driftwood_core::BackendError;
use thiserror::Error;

/// Read-side failure. Stored in query snapshots, so it stays cloneable and
/// comparable; it never escapes `subscribe` as a control-flow error.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error("Fetch failed: {0}")]
    Other(String),
}

/// Write-side failure surfaced through a mutation controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MutationError {
    #[error(transparent)]
    Backend(#[from] BackendError),

    /// A second `run` was attempted while this controller was already
    /// pending. Rejected locally; the backend never sees it.
    #[error("A mutation is already pending on this controller")]
    Concurrent,

    #[error("Mutation failed: {0}")]
    Other(String),
}
