//! driftwood TUI entry point.

use crossterm::{
    event::{self, Event as CrosstermEvent},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use driftwood_client::{
    workspace_fetcher, FreshnessPolicy, MemoryBackend, PubDocument, QuerySubscription,
    SharedBackend, SyncRequest, WorkspaceCache, WorkspaceList, WORKSPACES_QUERY,
};
use driftwood_client::{MutationError, QueryStatus};
use driftwood_core::{DocumentPath, WorkspaceAddress};
use driftwood_tui::config::TuiConfig;
use driftwood_tui::error::TuiError;
use driftwood_tui::events::TuiEvent;
use driftwood_tui::keys::{map_key, Action};
use driftwood_tui::notifications::NotificationLevel;
use driftwood_tui::state::{App, Focus};
use driftwood_tui::views::render_view;
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), TuiError> {
    let config = TuiConfig::load()?;
    init_logging(&config)?;

    let backend = build_backend(&config)?;
    let cache = WorkspaceCache::new();
    let mut app = App::new(config, backend, cache.clone());

    let (event_tx, mut event_rx) = mpsc::channel::<TuiEvent>(256);

    let subscription = cache.subscribe(
        WORKSPACES_QUERY,
        workspace_fetcher(app.backend.clone()),
        FreshnessPolicy::AlwaysRefetch,
    );
    spawn_query_watcher(subscription, event_tx.clone());
    spawn_input_reader(event_tx.clone());

    let mut terminal = setup_terminal()?;
    let _guard = TerminalGuard {};

    let tick_rate = Duration::from_millis(app.config.tick_interval_ms);
    let mut ticker = tokio::time::interval(tick_rate);

    loop {
        terminal.draw(|f| render_view(f, &app))?;

        tokio::select! {
            _ = ticker.tick() => {
                let _ = event_tx.send(TuiEvent::Tick).await;
            }
            Some(event) = event_rx.recv() => {
                if handle_event(&mut app, &event_tx, event) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn handle_event(app: &mut App, sender: &mpsc::Sender<TuiEvent>, event: TuiEvent) -> bool {
    match event {
        TuiEvent::Input(key) => {
            if let Some(action) = map_key(key, app.input_mode()) {
                return handle_action(app, sender, action);
            }
        }
        TuiEvent::Tick => app.prune_notifications(),
        TuiEvent::Resize { .. } => {}
        TuiEvent::QueryChanged(snapshot) => {
            if snapshot.status == QueryStatus::Error {
                if let Some(err) = &snapshot.error {
                    app.notify(NotificationLevel::Error, format!("Refresh failed: {err}"));
                }
            }
            app.apply_snapshot(snapshot);
        }
        TuiEvent::SyncDone { workspace, result } => match result {
            Ok(report) => app.notify(
                NotificationLevel::Success,
                format!(
                    "Synced {}: {} new document{}",
                    workspace,
                    report.documents_ingested,
                    if report.documents_ingested == 1 { "" } else { "s" }
                ),
            ),
            Err(MutationError::Concurrent) => {}
            Err(err) => app.notify(
                NotificationLevel::Error,
                format!("Sync of {workspace} failed: {err}"),
            ),
        },
        TuiEvent::PostDone { workspace, result } => match result {
            Ok(receipt) => app.notify(
                NotificationLevel::Success,
                format!("Posted {} to {}", receipt.document.path, workspace),
            ),
            Err(MutationError::Concurrent) => {}
            Err(err) => app.notify(
                NotificationLevel::Error,
                format!("Post to {workspace} failed: {err}"),
            ),
        },
    }
    false
}

fn handle_action(app: &mut App, sender: &mpsc::Sender<TuiEvent>, action: Action) -> bool {
    match action {
        Action::Quit => return true,
        Action::MoveUp => app.select_previous(),
        Action::MoveDown => app.select_next(),
        Action::Refresh => app.cache.invalidate(WORKSPACES_QUERY),
        Action::FocusForm => {
            if app.selected_row().is_some() {
                app.focus = Focus::PathField;
            }
        }
        Action::NextField => {
            app.focus = match app.focus {
                Focus::PathField => Focus::ValueField,
                _ => Focus::PathField,
            };
        }
        Action::Cancel => app.focus = Focus::List,
        Action::Insert(c) => {
            if let Some(row) = app.selected_row() {
                if !row.poster.is_pending() {
                    match app.focus {
                        Focus::PathField => row.poster.edit_draft(|draft| draft.path.push(c)),
                        Focus::ValueField => row.poster.edit_draft(|draft| draft.value.push(c)),
                        Focus::List => {}
                    }
                }
            }
        }
        Action::DeleteBack => {
            if let Some(row) = app.selected_row() {
                if !row.poster.is_pending() {
                    match app.focus {
                        Focus::PathField => {
                            row.poster.edit_draft(|draft| {
                                draft.path.pop();
                            });
                        }
                        Focus::ValueField => {
                            row.poster.edit_draft(|draft| {
                                draft.value.pop();
                            });
                        }
                        Focus::List => {}
                    }
                }
            }
        }
        Action::Sync => {
            if let Some(row) = app.selected_row() {
                // The control is disabled while a sync is pending; the
                // controller would reject the call anyway.
                if row.sync.is_pending() {
                    return false;
                }
                let sync = row.sync.clone();
                let workspace = row.address.clone();
                let pub_url = app.config.pub_url.clone();
                let sender = sender.clone();
                tokio::spawn(async move {
                    let result = sync
                        .run(SyncRequest {
                            workspace: workspace.clone(),
                            pub_url,
                        })
                        .await;
                    let _ = sender.send(TuiEvent::SyncDone { workspace, result }).await;
                });
            }
        }
        Action::Submit => {
            if let Some(row) = app.selected_row() {
                if row.poster.is_pending() {
                    return false;
                }
                let poster = row.poster.clone();
                let workspace = row.address.clone();
                let sender = sender.clone();
                tokio::spawn(async move {
                    let result = poster.run().await;
                    let _ = sender.send(TuiEvent::PostDone { workspace, result }).await;
                });
            }
        }
    }
    false
}

fn build_backend(config: &TuiConfig) -> Result<SharedBackend, TuiError> {
    let seeds: Vec<&str> = config.seed_workspaces.iter().map(String::as_str).collect();
    let backend = MemoryBackend::new(&seeds)?;
    seed_demo_pub(&backend, config)?;
    Ok(Arc::new(backend))
}

/// Give the simulated pub something to say, so the first sync against it
/// visibly merges documents.
fn seed_demo_pub(backend: &MemoryBackend, config: &TuiConfig) -> Result<(), TuiError> {
    let mut documents = Vec::new();
    if let Some(first) = config.seed_workspaces.first() {
        let workspace = WorkspaceAddress::parse(first)?;
        documents.push(PubDocument {
            workspace: workspace.clone(),
            path: DocumentPath::parse("/welcome")?,
            value: "Welcome! This document arrived from the pub.".to_string(),
            author_short_name: "suzy".to_string(),
            author_address: "@suzy.bpeerpeerpeerpeer".to_string(),
        });
        documents.push(PubDocument {
            workspace,
            path: DocumentPath::parse("/wiki/shed")?,
            value: "The shed key lives under the third pot.".to_string(),
            author_short_name: "suzy".to_string(),
            author_address: "@suzy.bpeerpeerpeerpeer".to_string(),
        });
    }
    backend.register_pub(&config.pub_url, documents);
    Ok(())
}

fn init_logging(config: &TuiConfig) -> Result<(), TuiError> {
    if let Some(parent) = config.log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.log_path)?;
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| TuiError::Logging(err.to_string()))?;
    Ok(())
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, TuiError> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

struct TerminalGuard;

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        let _ = execute!(stdout, LeaveAlternateScreen);
    }
}

fn spawn_input_reader(sender: mpsc::Sender<TuiEvent>) {
    std::thread::spawn(move || loop {
        if let Ok(true) = event::poll(Duration::from_millis(200)) {
            if let Ok(evt) = event::read() {
                match evt {
                    CrosstermEvent::Key(key) => {
                        let _ = sender.blocking_send(TuiEvent::Input(key));
                    }
                    CrosstermEvent::Resize(width, height) => {
                        let _ = sender.blocking_send(TuiEvent::Resize { width, height });
                    }
                    _ => {}
                }
            }
        }
    });
}

fn spawn_query_watcher(
    mut subscription: QuerySubscription<WorkspaceList>,
    sender: mpsc::Sender<TuiEvent>,
) {
    tokio::spawn(async move {
        // Deliver the snapshot that existed at subscription time, then
        // every change after it.
        let mut current = subscription.snapshot();
        loop {
            if sender.send(TuiEvent::QueryChanged(current)).await.is_err() {
                break;
            }
            current = subscription.changed().await;
        }
    });
}
