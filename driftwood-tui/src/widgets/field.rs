//! Single-line text field widget.

use ratatui::{
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub struct TextField<'a> {
    pub label: &'a str,
    pub text: &'a str,
    pub placeholder: &'a str,
    pub focused: bool,
    pub disabled: bool,
    pub text_style: Style,
    pub dim_style: Style,
    pub border_style: Style,
    pub focus_style: Style,
}

impl TextField<'_> {
    pub fn render(&self, f: &mut Frame<'_>, area: Rect) {
        let border = if self.focused {
            self.focus_style
        } else {
            self.border_style
        };
        let (content, style) = if self.text.is_empty() {
            (self.placeholder.to_string(), self.dim_style)
        } else if self.focused && !self.disabled {
            (format!("{}\u{2588}", self.text), self.text_style)
        } else {
            (self.text.to_string(), self.text_style)
        };
        let style = if self.disabled { self.dim_style } else { style };
        let paragraph = Paragraph::new(content).style(style).block(
            Block::default()
                .title(self.label)
                .borders(Borders::ALL)
                .border_style(border),
        );
        f.render_widget(paragraph, area);
    }
}
