//! Application state.

use crate::config::TuiConfig;
use crate::keys::InputMode;
use crate::notifications::{Notification, NotificationLevel};
use crate::theme::Theme;
use driftwood_client::{
    DocumentPoster, QuerySnapshot, QueryStatus, SharedBackend, SyncOrchestrator, WorkspaceCache,
    WorkspaceList, WORKSPACES_QUERY,
};
use driftwood_core::{Workspace, WorkspaceAddress};
use tracing::warn;

/// Which part of the screen receives keystrokes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    PathField,
    ValueField,
}

/// Per-workspace controllers and the address that keys them.
///
/// A row survives re-fetches of the workspace list, so its poster keeps one
/// ephemeral identity and one draft for as long as the workspace is shown.
pub struct WorkspaceRow {
    pub address: WorkspaceAddress,
    pub sync: SyncOrchestrator,
    pub poster: DocumentPoster,
}

pub struct App {
    pub config: TuiConfig,
    pub theme: Theme,
    pub backend: SharedBackend,
    pub cache: WorkspaceCache,
    pub snapshot: QuerySnapshot<WorkspaceList>,
    pub rows: Vec<WorkspaceRow>,
    pub selected: usize,
    pub focus: Focus,
    pub notifications: Vec<Notification>,
}

impl App {
    pub fn new(config: TuiConfig, backend: SharedBackend, cache: WorkspaceCache) -> Self {
        let snapshot = cache.peek(WORKSPACES_QUERY);
        Self {
            config,
            theme: Theme::driftwood(),
            backend,
            cache,
            snapshot,
            rows: Vec::new(),
            selected: 0,
            focus: Focus::List,
            notifications: Vec::new(),
        }
    }

    pub fn input_mode(&self) -> InputMode {
        match self.focus {
            Focus::List => InputMode::Browse,
            Focus::PathField | Focus::ValueField => InputMode::Edit,
        }
    }

    /// Absorb a new snapshot of the workspace query and reconcile the rows.
    pub fn apply_snapshot(&mut self, snapshot: QuerySnapshot<WorkspaceList>) {
        self.snapshot = snapshot;
        self.reconcile_rows();
    }

    /// Keep one row per listed workspace, preserving existing controllers,
    /// drafts, and identities for addresses that are still present.
    fn reconcile_rows(&mut self) {
        let Some(data) = self.snapshot.data.clone() else {
            return;
        };
        let mut rows = Vec::with_capacity(data.len());
        for workspace in data.iter() {
            if let Some(pos) = self
                .rows
                .iter()
                .position(|row| row.address == workspace.address)
            {
                rows.push(self.rows.swap_remove(pos));
            } else {
                match self.make_row(workspace.address.clone()) {
                    Ok(row) => rows.push(row),
                    Err(err) => {
                        warn!(workspace = %workspace.address, error = %err, "row setup failed");
                        self.notify(
                            NotificationLevel::Error,
                            format!("Cannot prepare {}: {}", workspace.address, err),
                        );
                    }
                }
            }
        }
        self.rows = rows;
        if self.selected >= self.rows.len() {
            self.selected = self.rows.len().saturating_sub(1);
        }
    }

    fn make_row(
        &self,
        address: WorkspaceAddress,
    ) -> Result<WorkspaceRow, driftwood_core::AddressError> {
        let poster = DocumentPoster::new(
            self.backend.clone(),
            self.cache.clone(),
            address.clone(),
            &self.config.author_seed,
        )?;
        Ok(WorkspaceRow {
            sync: SyncOrchestrator::new(self.backend.clone(), self.cache.clone()),
            poster,
            address,
        })
    }

    pub fn is_loading(&self) -> bool {
        matches!(
            self.snapshot.status,
            QueryStatus::Idle | QueryStatus::Loading
        ) && self.snapshot.data.is_none()
    }

    pub fn selected_workspace(&self) -> Option<&Workspace> {
        self.snapshot.data.as_deref()?.get(self.selected)
    }

    pub fn selected_row(&self) -> Option<&WorkspaceRow> {
        self.rows.get(self.selected)
    }

    pub fn select_next(&mut self) {
        if !self.rows.is_empty() {
            self.selected = (self.selected + 1) % self.rows.len();
        }
    }

    pub fn select_previous(&mut self) {
        if !self.rows.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.rows.len() - 1);
        }
    }

    pub fn notify(&mut self, level: NotificationLevel, message: impl Into<String>) {
        self.notifications.push(Notification::new(level, message));
    }

    /// Drop notifications old enough to have been read.
    pub fn prune_notifications(&mut self) {
        self.notifications.retain(|note| note.age_seconds() < 6);
    }
}
