//! The backend collaborator boundary.
//!
//! Everything behind this trait - storage, conflict resolution, the peer
//! wire protocol - is out of scope for the client. The client only decides
//! when to call these operations and when to trust what it cached.

use crate::cache::{query_fetcher, QueryCache, QueryFetcher};
use crate::error::FetchError;
use async_trait::async_trait;
use driftwood_core::{
    AuthorIdentity, BackendError, DocumentDraft, SyncReport, Workspace, WorkspaceAddress,
    WriteReceipt,
};
use std::sync::Arc;

/// Fetched workspace list, in the backend's order (last activity
/// descending); never re-sorted client-side.
pub type WorkspaceList = Vec<Workspace>;

/// The cache instance shared by every consumer of the workspace query.
pub type WorkspaceCache = QueryCache<WorkspaceList>;

pub type SharedBackend = Arc<dyn WorkspaceBackend>;

/// Abstract operations the orchestration layer requires from the backend.
#[async_trait]
pub trait WorkspaceBackend: Send + Sync {
    /// All known workspaces, sorted by last activity descending. The
    /// ordering is the backend's contract.
    async fn fetch_workspaces(&self) -> Result<WorkspaceList, BackendError>;

    /// Synchronize one workspace with one remote pub. The merged result is
    /// only observable by re-reading the workspace list.
    async fn sync_workspace(
        &self,
        workspace: &WorkspaceAddress,
        pub_url: &str,
    ) -> Result<SyncReport, BackendError>;

    /// Submit one document under the given authoring identity. Fails
    /// distinctly when the backend rejects the write (e.g. malformed path).
    async fn write_document(
        &self,
        author: &AuthorIdentity,
        draft: &DocumentDraft,
        workspace: &WorkspaceAddress,
    ) -> Result<WriteReceipt, BackendError>;
}

/// Fetcher for the workspace list query, backed by `fetch_workspaces`.
pub fn workspace_fetcher(backend: SharedBackend) -> QueryFetcher<WorkspaceList> {
    query_fetcher(move || {
        let backend = Arc::clone(&backend);
        async move { backend.fetch_workspaces().await.map_err(FetchError::from) }
    })
}
