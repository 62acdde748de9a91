//! Driftwood client orchestration.
//!
//! Sits between a UI and a remote document-synchronization backend: issues
//! named read queries, caches their results, executes mutations, and keeps
//! cached results consistent with writes via invalidation + re-fetch. The
//! backend itself (storage, conflict resolution, peer wire protocol) is an
//! external collaborator behind [`backend::WorkspaceBackend`].

pub mod backend;
pub mod cache;
pub mod error;
pub mod memory;
pub mod mutation;
pub mod post;
pub mod sync;

pub use backend::{workspace_fetcher, SharedBackend, WorkspaceBackend, WorkspaceCache, WorkspaceList};
pub use cache::{
    query_fetcher, FreshnessPolicy, QueryCache, QueryFetcher, QuerySnapshot, QueryStatus,
    QuerySubscription, WORKSPACES_QUERY,
};
pub use error::{FetchError, MutationError};
pub use memory::{MemoryBackend, PubDocument};
pub use mutation::{mutation_op, MutationController, MutationOp, MutationStatus};
pub use post::DocumentPoster;
pub use sync::{SyncOrchestrator, SyncRequest};
