//! Document posting under an ephemeral identity.

use crate::backend::{SharedBackend, WorkspaceCache};
use crate::cache::WORKSPACES_QUERY;
use crate::error::MutationError;
use crate::mutation::{mutation_op, MutationController, MutationStatus};
use driftwood_core::{AddressError, AuthorIdentity, DocumentDraft, WorkspaceAddress, WriteReceipt};
use std::sync::{Arc, Mutex, PoisonError};

/// Mutation controller whose write operation is "submit the current draft
/// to one workspace".
///
/// The authoring identity is generated once at construction and held for
/// the poster's lifetime - ephemeral, never persisted, never shared between
/// posters. The poster also owns the draft the UI edits: on a successful
/// post the workspace list query is invalidated and then the draft is
/// cleared, both before `run` resolves. On failure the draft is preserved
/// so the user can retry.
#[derive(Clone)]
pub struct DocumentPoster {
    identity: AuthorIdentity,
    workspace: WorkspaceAddress,
    draft: Arc<Mutex<DocumentDraft>>,
    controller: MutationController<DocumentDraft, WriteReceipt>,
}

impl DocumentPoster {
    pub fn new(
        backend: SharedBackend,
        cache: WorkspaceCache,
        workspace: WorkspaceAddress,
        seed_label: &str,
    ) -> Result<Self, AddressError> {
        let identity = AuthorIdentity::generate(seed_label)?;
        let draft = Arc::new(Mutex::new(DocumentDraft::default()));

        let op = {
            let backend = Arc::clone(&backend);
            let identity = identity.clone();
            let workspace = workspace.clone();
            mutation_op(move |draft: DocumentDraft| {
                let backend = Arc::clone(&backend);
                let identity = identity.clone();
                let workspace = workspace.clone();
                async move {
                    backend
                        .write_document(&identity, &draft, &workspace)
                        .await
                        .map_err(MutationError::from)
                }
            })
        };

        let hook_draft = Arc::clone(&draft);
        let controller = MutationController::new(op).on_success(move |_receipt: &WriteReceipt| {
            // Invalidation first, then the draft reset.
            cache.invalidate(WORKSPACES_QUERY);
            hook_draft
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clear();
        });

        Ok(Self {
            identity,
            workspace,
            draft,
            controller,
        })
    }

    /// Post the current draft. Rejected locally while a previous post is
    /// still pending.
    pub async fn run(&self) -> Result<WriteReceipt, MutationError> {
        let draft = self.draft();
        self.controller.run(draft).await
    }

    pub fn identity(&self) -> &AuthorIdentity {
        &self.identity
    }

    pub fn workspace(&self) -> &WorkspaceAddress {
        &self.workspace
    }

    pub fn draft(&self) -> DocumentDraft {
        self.draft
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Edit the draft in place. The UI goes through this for every
    /// keystroke so the poster stays the single owner of the draft.
    pub fn edit_draft<R>(&self, f: impl FnOnce(&mut DocumentDraft) -> R) -> R {
        f(&mut self.draft.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn set_path(&self, path: impl Into<String>) {
        self.edit_draft(|draft| draft.path = path.into());
    }

    pub fn set_value(&self, value: impl Into<String>) {
        self.edit_draft(|draft| draft.value = value.into());
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
