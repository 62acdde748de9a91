//! Workspace list and detail rendering.

use crate::state::{App, Focus, WorkspaceRow};
use crate::widgets::TextField;
use driftwood_client::QueryStatus;
use driftwood_core::Workspace;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn render(f: &mut Frame<'_>, app: &App, area: Rect) {
    if app.is_loading() {
        let loading = Paragraph::new("Loading workspaces\u{2026}")
            .style(Style::default().fg(app.theme.text_dim))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(loading, area);
        return;
    }
    let Some(data) = app.snapshot.data.clone() else {
        // No data and not loading: the very first fetch failed.
        let message = match &app.snapshot.error {
            Some(err) => format!("Could not load workspaces: {err}\nPress r to retry."),
            None => "No workspaces.".to_string(),
        };
        let error = Paragraph::new(message)
            .style(Style::default().fg(app.theme.error))
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(error, area);
        return;
    };

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_list(f, app, &data, columns[0]);
    if let (Some(workspace), Some(row)) = (data.get(app.selected), app.selected_row()) {
        render_detail(f, app, workspace, row, columns[1]);
    }
}

fn render_list(f: &mut Frame<'_>, app: &App, data: &[Workspace], area: Rect) {
    let items: Vec<ListItem> = data
        .iter()
        .enumerate()
        .map(|(i, ws)| {
            let pending = app
                .rows
                .get(i)
                .is_some_and(|row| row.sync.is_pending() || row.poster.is_pending());
            let mut spans = vec![
                Span::styled(ws.name.clone(), Style::default().fg(app.theme.text)),
                Span::styled(
                    format!("  {} member{}", ws.population, plural(ws.population)),
                    Style::default().fg(app.theme.text_dim),
                ),
            ];
            if pending {
                spans.push(Span::styled(
                    "  \u{2026}",
                    Style::default().fg(app.theme.warning),
                ));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    // A stale list with an error alongside stays visible.
    let title = if app.snapshot.status == QueryStatus::Error {
        "Workspaces (stale)"
    } else {
        "Workspaces"
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(border_style(app, app.focus == Focus::List)),
        )
        .highlight_style(
            Style::default()
                .fg(app.theme.primary)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    let mut state = ListState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(list, area, &mut state);
}

fn render_detail(
    f: &mut Frame<'_>,
    app: &App,
    workspace: &Workspace,
    row: &WorkspaceRow,
    area: Rect,
) {
    let outer = Block::default()
        .title(workspace.address.to_string())
        .borders(Borders::ALL)
        .border_style(border_style(app, false));
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(inner);

    render_sync_line(f, app, row, sections[0]);
    render_documents(f, app, workspace, sections[1]);
    render_form(f, app, row, sections[2], sections[3], sections[4]);
}

fn render_sync_line(f: &mut Frame<'_>, app: &App, row: &WorkspaceRow, area: Rect) {
    let (label, style) = if row.sync.is_pending() {
        (
            "Syncing\u{2026}".to_string(),
            Style::default().fg(app.theme.warning),
        )
    } else {
        (
            format!("[s] Sync with {}", app.config.pub_url),
            Style::default().fg(app.theme.secondary),
        )
    };
    f.render_widget(Paragraph::new(label).style(style), area);
}

fn render_documents(f: &mut Frame<'_>, app: &App, workspace: &Workspace, area: Rect) {
    let lines: Vec<Line> = if workspace.documents.is_empty() {
        vec![Line::from(Span::styled(
            "No documents yet.",
            Style::default().fg(app.theme.text_dim),
        ))]
    } else {
        workspace
            .documents
            .iter()
            .map(|doc| {
                Line::from(vec![
                    Span::styled("Posted by ", Style::default().fg(app.theme.text_dim)),
                    Span::styled(
                        format!("~{}", doc.author.short_name),
                        Style::default().fg(app.theme.secondary),
                    ),
                    Span::styled(" to ", Style::default().fg(app.theme.text_dim)),
                    Span::styled(
                        doc.path.to_string(),
                        Style::default().fg(app.theme.info),
                    ),
                    Span::styled(": ", Style::default().fg(app.theme.text_dim)),
                    Span::styled(doc.value.clone(), Style::default().fg(app.theme.text)),
                ])
            })
            .collect()
    };
    f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), area);
}

fn render_form(
    f: &mut Frame<'_>,
    app: &App,
    row: &WorkspaceRow,
    path_area: Rect,
    value_area: Rect,
    hint_area: Rect,
) {
    let draft = row.poster.draft();
    let pending = row.poster.is_pending();
    let text_style = Style::default().fg(app.theme.text);
    let dim_style = Style::default().fg(app.theme.text_dim);

    TextField {
        label: "Path",
        text: &draft.path,
        placeholder: "/some/path",
        focused: app.focus == Focus::PathField,
        disabled: pending,
        text_style,
        dim_style,
        border_style: Style::default().fg(app.theme.border),
        focus_style: Style::default().fg(app.theme.border_focus),
    }
    .render(f, path_area);

    TextField {
        label: "Value",
        text: &draft.value,
        placeholder: "Hey everyone!",
        focused: app.focus == Focus::ValueField,
        disabled: pending,
        text_style,
        dim_style,
        border_style: Style::default().fg(app.theme.border),
        focus_style: Style::default().fg(app.theme.border_focus),
    }
    .render(f, value_area);

    let hint = if pending {
        Span::styled("Posting\u{2026}", Style::default().fg(app.theme.warning))
    } else {
        Span::styled(
            format!("Post with a temporary identity (~{})", row.poster.identity().short_name),
            Style::default().fg(app.theme.text_dim),
        )
    };
    f.render_widget(Paragraph::new(Line::from(hint)), hint_area);
}

fn border_style(app: &App, focused: bool) -> Style {
    if focused {
        Style::default().fg(app.theme.border_focus)
    } else {
        Style::default().fg(app.theme.border)
    }
}

fn plural(count: u32) -> &'static str {
    if count == 1 {
        ""
    } else {
        "s"
    }
}
