//! Color theme for the TUI.

use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub primary: Color,
    pub secondary: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
    pub info: Color,
    pub text: Color,
    pub text_dim: Color,
    pub border: Color,
    pub border_focus: Color,
}

impl Theme {
    /// Washed-up-on-the-beach palette.
    pub fn driftwood() -> Self {
        Self {
            primary: Color::Rgb(0, 190, 190),
            secondary: Color::Rgb(210, 160, 90),
            success: Color::Rgb(120, 200, 120),
            warning: Color::Rgb(230, 200, 80),
            error: Color::Rgb(220, 90, 90),
            info: Color::Rgb(140, 180, 220),
            text: Color::Rgb(230, 230, 225),
            text_dim: Color::Rgb(130, 130, 125),
            border: Color::Rgb(90, 90, 85),
            border_focus: Color::Rgb(0, 190, 190),
        }
    }
}
