//! Error types for driftwood operations

use thiserror::Error;

/// Validation errors for workspace addresses, document paths, and author
/// short names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AddressError {
    #[error("Workspace address must start with '+': {0}")]
    MissingLeadingPlus(String),

    #[error("Workspace address must be '+name.suffix': {0}")]
    MissingSuffix(String),

    #[error("Invalid workspace name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Document path must start with '/' and contain no empty segments: {0}")]
    MalformedPath(String),

    #[error("Author short name must be exactly 4 lowercase ASCII letters: {0}")]
    InvalidShortName(String),
}

/// Errors surfaced by the backend collaborator.
///
/// The backend is remote and opaque; these variants categorize its refusals
/// without modeling its wire protocol.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BackendError {
    #[error("Unknown workspace: {0}")]
    WorkspaceNotFound(String),

    #[error(transparent)]
    Address(#[from] AddressError),

    #[error("Pub unreachable: {0}")]
    PubUnreachable(String),

    #[error("Write rejected by backend: {0}")]
    WriteRejected(String),

    #[error("Transport failure: {0}")]
    Transport(String),
}
