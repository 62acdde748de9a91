//! Row reconciliation: controllers, drafts, and identities are keyed by
//! workspace address and survive re-fetches of the workspace list.

use driftwood_client::{MemoryBackend, QuerySnapshot, QueryStatus, WorkspaceCache, WorkspaceList};
use driftwood_core::{Workspace, WorkspaceAddress};
use driftwood_tui::config::TuiConfig;
use driftwood_tui::state::{App, Focus};
use std::sync::Arc;

fn workspace(raw: &str) -> Workspace {
    let address = WorkspaceAddress::parse(raw).expect("test address");
    Workspace {
        name: address.name().to_string(),
        address,
        population: 0,
        documents: Vec::new(),
    }
}

fn snapshot(workspaces: Vec<Workspace>) -> QuerySnapshot<WorkspaceList> {
    QuerySnapshot {
        status: QueryStatus::Success,
        data: Some(Arc::new(workspaces)),
        error: None,
    }
}

fn demo_app() -> App {
    let config = TuiConfig::demo();
    let backend = Arc::new(MemoryBackend::new(&["+demo.123"]).expect("seed"));
    App::new(config, backend, WorkspaceCache::new())
}

#[test]
fn rows_are_created_per_listed_workspace() {
    let mut app = demo_app();
    assert!(app.rows.is_empty());

    app.apply_snapshot(snapshot(vec![workspace("+demo.123"), workspace("+react.123")]));
    assert_eq!(app.rows.len(), 2);
    assert_eq!(app.rows[0].address.as_str(), "+demo.123");
    assert_eq!(app.rows[1].address.as_str(), "+react.123");
}

#[test]
fn refetch_preserves_row_identity_and_draft() {
    let mut app = demo_app();
    app.apply_snapshot(snapshot(vec![workspace("+demo.123"), workspace("+react.123")]));

    let identity_before = app.rows[0].poster.identity().address.clone();
    app.rows[0].poster.set_path("/in-progress");
    app.rows[0].poster.set_value("half-typed");

    // Refreshed list reorders the same workspaces.
    app.apply_snapshot(snapshot(vec![workspace("+react.123"), workspace("+demo.123")]));
    assert_eq!(app.rows.len(), 2);

    let demo_row = app
        .rows
        .iter()
        .find(|row| row.address.as_str() == "+demo.123")
        .expect("demo row survives");
    assert_eq!(demo_row.poster.identity().address, identity_before);
    assert_eq!(demo_row.poster.draft().path, "/in-progress");
    assert_eq!(demo_row.poster.draft().value, "half-typed");
}

#[test]
fn removed_workspace_drops_its_row() {
    let mut app = demo_app();
    app.apply_snapshot(snapshot(vec![workspace("+demo.123"), workspace("+react.123")]));
    let react_identity = app.rows[1].poster.identity().address.clone();

    app.apply_snapshot(snapshot(vec![workspace("+demo.123")]));
    assert_eq!(app.rows.len(), 1);

    // A workspace that reappears gets a fresh row, hence a new identity.
    app.apply_snapshot(snapshot(vec![workspace("+demo.123"), workspace("+react.123")]));
    assert_ne!(app.rows[1].poster.identity().address, react_identity);
}

#[test]
fn selection_clamps_when_list_shrinks() {
    let mut app = demo_app();
    app.apply_snapshot(snapshot(vec![
        workspace("+demo.123"),
        workspace("+react.123"),
        workspace("+music.9"),
    ]));
    app.selected = 2;

    app.apply_snapshot(snapshot(vec![workspace("+demo.123")]));
    assert_eq!(app.selected, 0);
}

#[test]
fn snapshot_without_data_keeps_existing_rows() {
    let mut app = demo_app();
    app.apply_snapshot(snapshot(vec![workspace("+demo.123")]));
    assert_eq!(app.rows.len(), 1);

    // A loading snapshot (e.g. right after invalidation) has no data yet;
    // the rows must not be torn down.
    app.apply_snapshot(QuerySnapshot {
        status: QueryStatus::Loading,
        data: None,
        error: None,
    });
    assert_eq!(app.rows.len(), 1);
}

#[test]
fn input_mode_follows_focus() {
    let mut app = demo_app();
    assert_eq!(app.input_mode(), driftwood_tui::keys::InputMode::Browse);
    app.focus = Focus::PathField;
    assert_eq!(app.input_mode(), driftwood_tui::keys::InputMode::Edit);
    app.focus = Focus::ValueField;
    assert_eq!(app.input_mode(), driftwood_tui::keys::InputMode::Edit);
}
