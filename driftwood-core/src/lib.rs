//! Driftwood Core - Data Types
//!
//! Pure data structures with no behavior beyond validation and identity
//! generation. All other crates depend on this. This crate contains ONLY
//! data types - no orchestration logic.

use chrono::{DateTime, Utc};

pub mod error;
pub mod identity;
pub mod workspace;

pub use error::{AddressError, BackendError};
pub use identity::AuthorIdentity;
pub use workspace::{
    AuthorRef, Document, DocumentDraft, DocumentPath, SyncReport, Workspace, WorkspaceAddress,
    WriteReceipt,
};

/// Timestamp type using UTC timezone.
pub type Timestamp = DateTime<Utc>;
