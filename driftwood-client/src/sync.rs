//! Workspace synchronization orchestration.

use crate::backend::{SharedBackend, WorkspaceCache};
use crate::cache::WORKSPACES_QUERY;
use crate::error::MutationError;
use crate::mutation::{mutation_op, MutationController, MutationStatus};
use driftwood_core::{SyncReport, WorkspaceAddress};
use std::sync::Arc;

/// Input to one synchronization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncRequest {
    pub workspace: WorkspaceAddress,
    pub pub_url: String,
}

/// Mutation controller whose write operation is "synchronize one workspace
/// with one remote pub".
///
/// On success the workspace list query is invalidated and re-fetched; the
/// sync result itself is never merged into cached state, so the client
/// never grows a second, divergent merge algorithm.
#[derive(Clone)]
pub struct SyncOrchestrator {
    controller: MutationController<SyncRequest, SyncReport>,
}

impl SyncOrchestrator {
    pub fn new(backend: SharedBackend, cache: WorkspaceCache) -> Self {
        let op = mutation_op(move |request: SyncRequest| {
            let backend = Arc::clone(&backend);
            async move {
                backend
                    .sync_workspace(&request.workspace, &request.pub_url)
                    .await
                    .map_err(MutationError::from)
            }
        });
        let controller = MutationController::new(op)
            .on_success(move |_report: &SyncReport| cache.invalidate(WORKSPACES_QUERY));
        Self { controller }
    }

    pub async fn run(&self, request: SyncRequest) -> Result<SyncReport, MutationError> {
        self.controller.run(request).await
    }

    pub fn status(&self) -> MutationStatus {
        self.controller.status()
    }

    pub fn is_pending(&self) -> bool {
        self.controller.is_pending()
    }

    pub fn last_error(&self) -> Option<MutationError> {
        self.controller.last_error()
    }
}
