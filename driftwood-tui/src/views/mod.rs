//! View rendering dispatch.

pub mod workspaces;

use crate::notifications::NotificationLevel;
use crate::state::App;
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::Span,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub fn render_view(f: &mut Frame<'_>, app: &App) {
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(f.size());

    render_header(f, app, layout[0]);
    workspaces::render(f, app, layout[1]);
    render_footer(f, app, layout[2]);
}

fn render_header(f: &mut Frame<'_>, app: &App, area: ratatui::layout::Rect) {
    let count = app
        .snapshot
        .data
        .as_ref()
        .map(|data| data.len())
        .unwrap_or(0);
    let title = format!(
        "driftwood | my workspaces ({}) | posting as ~{}",
        count, app.config.author_seed
    );
    let block = Block::default().borders(Borders::ALL).title(Span::styled(
        title,
        Style::default().fg(app.theme.primary),
    ));
    f.render_widget(block, area);
}

fn render_footer(f: &mut Frame<'_>, app: &App, area: ratatui::layout::Rect) {
    let help = match app.focus {
        crate::state::Focus::List => {
            "j/k move \u{2022} s sync \u{2022} i/Enter post form \u{2022} r refresh \u{2022} q quit"
        }
        _ => "Tab switch field \u{2022} Enter post \u{2022} Esc back",
    };
    let (text, style) = if let Some(note) = app.notifications.last() {
        let (label, color) = match note.level {
            NotificationLevel::Info => ("INFO", app.theme.info),
            NotificationLevel::Error => ("ERROR", app.theme.error),
            NotificationLevel::Success => ("OK", app.theme.success),
        };
        (
            format!("{}: {}", label, note.message),
            Style::default().fg(color),
        )
    } else {
        (help.to_string(), Style::default().fg(app.theme.text_dim))
    };
    f.render_widget(Paragraph::new(text).style(style), area);
}
