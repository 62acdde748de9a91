//! Scripted backend for exercising the cache and the mutation controllers.
//!
//! Counts every backend call, can hold calls open behind semaphore gates so
//! tests control completion order, and can be flipped into failure mode.

#![allow(dead_code)]

use async_trait::async_trait;
use driftwood_client::backend::{WorkspaceBackend, WorkspaceList};
use driftwood_core::{
    AuthorIdentity, AuthorRef, BackendError, Document, DocumentDraft, DocumentPath, SyncReport,
    Workspace, WorkspaceAddress, WriteReceipt,
};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Semaphore;

pub const DEMO_WORKSPACE: &str = "+demo.123";
pub const DEMO_PUB: &str = "https://pub.example";

pub struct ScriptedBackend {
    pub fetch_calls: AtomicUsize,
    pub sync_calls: AtomicUsize,
    pub write_calls: AtomicUsize,
    pub fail_fetches: AtomicBool,
    pub fail_writes: AtomicBool,
    pub fail_syncs: AtomicBool,
    pub workspaces: Mutex<WorkspaceList>,
    fetch_gate: Semaphore,
    write_gate: Semaphore,
    sync_gate: Semaphore,
}

impl ScriptedBackend {
    fn with_gates(fetch_permits: usize, write_permits: usize, sync_permits: usize) -> Arc<Self> {
        Arc::new(Self {
            fetch_calls: AtomicUsize::new(0),
            sync_calls: AtomicUsize::new(0),
            write_calls: AtomicUsize::new(0),
            fail_fetches: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
            fail_syncs: AtomicBool::new(false),
            workspaces: Mutex::new(vec![empty_workspace(DEMO_WORKSPACE)]),
            fetch_gate: Semaphore::new(fetch_permits),
            write_gate: Semaphore::new(write_permits),
            sync_gate: Semaphore::new(sync_permits),
        })
    }

    /// Every call completes as soon as it is polled.
    pub fn open() -> Arc<Self> {
        Self::with_gates(
            Semaphore::MAX_PERMITS,
            Semaphore::MAX_PERMITS,
            Semaphore::MAX_PERMITS,
        )
    }

    /// Fetches block until [`release_fetch`](Self::release_fetch).
    pub fn holding_fetches() -> Arc<Self> {
        Self::with_gates(0, Semaphore::MAX_PERMITS, Semaphore::MAX_PERMITS)
    }

    /// Writes block until [`release_write`](Self::release_write).
    pub fn holding_writes() -> Arc<Self> {
        Self::with_gates(Semaphore::MAX_PERMITS, 0, Semaphore::MAX_PERMITS)
    }

    pub fn release_fetch(&self) {
        self.fetch_gate.add_permits(1);
    }

    pub fn release_write(&self) {
        self.write_gate.add_permits(1);
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_calls.load(Ordering::SeqCst)
    }

    pub fn sync_count(&self) -> usize {
        self.sync_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WorkspaceBackend for ScriptedBackend {
    async fn fetch_workspaces(&self) -> Result<WorkspaceList, BackendError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        self.fetch_gate
            .acquire()
            .await
            .expect("fetch gate closed")
            .forget();
        if self.fail_fetches.load(Ordering::SeqCst) {
            return Err(BackendError::Transport("scripted fetch failure".into()));
        }
        Ok(self.workspaces.lock().unwrap().clone())
    }

    async fn sync_workspace(
        &self,
        workspace: &WorkspaceAddress,
        pub_url: &str,
    ) -> Result<SyncReport, BackendError> {
        self.sync_calls.fetch_add(1, Ordering::SeqCst);
        self.sync_gate
            .acquire()
            .await
            .expect("sync gate closed")
            .forget();
        if self.fail_syncs.load(Ordering::SeqCst) {
            return Err(BackendError::PubUnreachable(pub_url.to_string()));
        }
        // Simulate documents arriving from the pub: the result is only
        // observable through the next fetch.
        let mut workspaces = self.workspaces.lock().unwrap();
        let target = workspaces
            .iter_mut()
            .find(|ws| &ws.address == workspace)
            .ok_or_else(|| BackendError::WorkspaceNotFound(workspace.to_string()))?;
        target.documents.push(document("/synced", "from the pub", "peer"));
        Ok(SyncReport {
            documents_ingested: 1,
        })
    }

    async fn write_document(
        &self,
        author: &AuthorIdentity,
        draft: &DocumentDraft,
        workspace: &WorkspaceAddress,
    ) -> Result<WriteReceipt, BackendError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        self.write_gate
            .acquire()
            .await
            .expect("write gate closed")
            .forget();
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(BackendError::WriteRejected("scripted write failure".into()));
        }
        let path = DocumentPath::parse(&draft.path)?;
        let doc = Document {
            path,
            value: draft.value.clone(),
            author: AuthorRef {
                short_name: author.short_name.clone(),
            },
        };
        let mut workspaces = self.workspaces.lock().unwrap();
        let target = workspaces
            .iter_mut()
            .find(|ws| &ws.address == workspace)
            .ok_or_else(|| BackendError::WorkspaceNotFound(workspace.to_string()))?;
        target.documents.push(doc.clone());
        Ok(WriteReceipt { document: doc })
    }
}

pub fn address(raw: &str) -> WorkspaceAddress {
    WorkspaceAddress::parse(raw).expect("test address")
}

pub fn empty_workspace(raw: &str) -> Workspace {
    let addr = address(raw);
    Workspace {
        name: addr.name().to_string(),
        address: addr,
        population: 0,
        documents: Vec::new(),
    }
}

pub fn document(path: &str, value: &str, short_name: &str) -> Document {
    Document {
        path: DocumentPath::parse(path).expect("test path"),
        value: value.to_string(),
        author: AuthorRef {
            short_name: short_name.to_string(),
        },
    }
}
