//! Event types for the TUI event loop.

use crossterm::event::KeyEvent;
use driftwood_client::{MutationError, QuerySnapshot, WorkspaceList};
use driftwood_core::{SyncReport, WorkspaceAddress, WriteReceipt};

#[derive(Debug, Clone)]
pub enum TuiEvent {
    Input(KeyEvent),
    Tick,
    Resize { width: u16, height: u16 },
    QueryChanged(QuerySnapshot<WorkspaceList>),
    SyncDone {
        workspace: WorkspaceAddress,
        result: Result<SyncReport, MutationError>,
    },
    PostDone {
        workspace: WorkspaceAddress,
        result: Result<WriteReceipt, MutationError>,
    },
}
