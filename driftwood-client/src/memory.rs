//! In-memory backend with simulated pubs.
//!
//! Stands in for the real peer-to-peer store: documents live per workspace
//! with last-write-wins per (path, author), population counts distinct
//! authors, and "pubs" are registered per URL with documents that merge in
//! on sync. Used by the demo TUI and by tests.

use crate::backend::{WorkspaceBackend, WorkspaceList};
use async_trait::async_trait;
use chrono::Utc;
use driftwood_core::{
    AddressError, AuthorIdentity, AuthorRef, BackendError, Document, DocumentDraft, DocumentPath,
    SyncReport, Timestamp, Workspace, WorkspaceAddress, WriteReceipt,
};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

#[derive(Debug, Clone)]
struct StoredDocument {
    path: DocumentPath,
    value: String,
    author_short_name: String,
    author_address: String,
}

/// A document held by a simulated pub, waiting to be synced in.
#[derive(Debug, Clone)]
pub struct PubDocument {
    pub workspace: WorkspaceAddress,
    pub path: DocumentPath,
    pub value: String,
    pub author_short_name: String,
    pub author_address: String,
}

struct WorkspaceState {
    address: WorkspaceAddress,
    documents: Vec<StoredDocument>,
    last_activity: Timestamp,
}

struct MemoryState {
    workspaces: Vec<WorkspaceState>,
    pubs: HashMap<String, Vec<PubDocument>>,
}

/// In-memory [`WorkspaceBackend`].
pub struct MemoryBackend {
    inner: Mutex<MemoryState>,
}

impl MemoryBackend {
    /// Create a backend seeded with empty workspaces at the given addresses.
    pub fn new(seed_addresses: &[&str]) -> Result<Self, AddressError> {
        let now = Utc::now();
        let workspaces = seed_addresses
            .iter()
            .map(|raw| {
                WorkspaceAddress::parse(raw).map(|address| WorkspaceState {
                    address,
                    documents: Vec::new(),
                    last_activity: now,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            inner: Mutex::new(MemoryState {
                workspaces,
                pubs: HashMap::new(),
            }),
        })
    }

    /// Register a simulated pub. Syncing against its URL merges these
    /// documents into the matching workspace.
    pub fn register_pub(&self, url: impl Into<String>, documents: Vec<PubDocument>) {
        self.lock().pubs.insert(url.into(), documents);
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl WorkspaceState {
    fn upsert(&mut self, incoming: StoredDocument) -> bool {
        let slot = self.documents.iter_mut().find(|doc| {
            doc.path == incoming.path && doc.author_address == incoming.author_address
        });
        match slot {
            Some(existing) => {
                if existing.value == incoming.value {
                    return false;
                }
                existing.value = incoming.value;
                true
            }
            None => {
                self.documents.push(incoming);
                true
            }
        }
    }

    fn population(&self) -> u32 {
        let mut authors: Vec<&str> = self
            .documents
            .iter()
            .map(|doc| doc.author_address.as_str())
            .collect();
        authors.sort_unstable();
        authors.dedup();
        authors.len() as u32
    }

    fn projection(&self) -> Workspace {
        Workspace {
            name: self.address.name().to_string(),
            address: self.address.clone(),
            population: self.population(),
            documents: self
                .documents
                .iter()
                .map(|doc| Document {
                    path: doc.path.clone(),
                    value: doc.value.clone(),
                    author: AuthorRef {
                        short_name: doc.author_short_name.clone(),
                    },
                })
                .collect(),
        }
    }
}

#[async_trait]
impl WorkspaceBackend for MemoryBackend {
    async fn fetch_workspaces(&self) -> Result<WorkspaceList, BackendError> {
        let state = self.lock();
        let mut ordered: Vec<&WorkspaceState> = state.workspaces.iter().collect();
        ordered.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        Ok(ordered.iter().map(|ws| ws.projection()).collect())
    }

    async fn sync_workspace(
        &self,
        workspace: &WorkspaceAddress,
        pub_url: &str,
    ) -> Result<SyncReport, BackendError> {
        let mut state = self.lock();
        let incoming = state
            .pubs
            .get(pub_url)
            .ok_or_else(|| BackendError::PubUnreachable(pub_url.to_string()))?
            .iter()
            .filter(|doc| &doc.workspace == workspace)
            .cloned()
            .collect::<Vec<_>>();
        let target = state
            .workspaces
            .iter_mut()
            .find(|ws| &ws.address == workspace)
            .ok_or_else(|| BackendError::WorkspaceNotFound(workspace.to_string()))?;

        let mut ingested = 0;
        for doc in incoming {
            if target.upsert(StoredDocument {
                path: doc.path,
                value: doc.value,
                author_short_name: doc.author_short_name,
                author_address: doc.author_address,
            }) {
                ingested += 1;
            }
        }
        if ingested > 0 {
            target.last_activity = Utc::now();
        }
        debug!(workspace = %workspace, pub_url, ingested, "sync completed");
        Ok(SyncReport {
            documents_ingested: ingested,
        })
    }

    async fn write_document(
        &self,
        author: &AuthorIdentity,
        draft: &DocumentDraft,
        workspace: &WorkspaceAddress,
    ) -> Result<WriteReceipt, BackendError> {
        let path = DocumentPath::parse(&draft.path)?;
        let mut state = self.lock();
        let target = state
            .workspaces
            .iter_mut()
            .find(|ws| &ws.address == workspace)
            .ok_or_else(|| BackendError::WorkspaceNotFound(workspace.to_string()))?;

        target.upsert(StoredDocument {
            path: path.clone(),
            value: draft.value.clone(),
            author_short_name: author.short_name.clone(),
            author_address: author.address.clone(),
        });
        target.last_activity = Utc::now();
        debug!(workspace = %workspace, path = %path, "document written");

        Ok(WriteReceipt {
            document: Document {
                path,
                value: draft.value.clone(),
                author: AuthorRef {
                    short_name: author.short_name.clone(),
                },
            },
        })
    }
}
