//! Theme and styling definitions for the jobsearch TUI.

use ratatui::style::{Color, Modifier, Style};

/// Color palette for the TUI.
pub struct Palette;

impl Palette {
    // Base colors
    pub const BG: Color = Color::Rgb(30, 30, 40);
    pub const FG: Color = Color::Rgb(220, 220, 230);
    pub const DIM: Color = Color::Rgb(140, 140, 160);

    // Accent colors
    pub const ACCENT: Color = Color::Rgb(130, 170, 255);

    // Status colors
    pub const SUCCESS: Color = Color::Rgb(130, 220, 130);
    pub const ERROR: Color = Color::Rgb(240, 100, 100);

    // Border colors
    pub const BORDER: Color = Color::Rgb(80, 80, 100);
    pub const BORDER_ACTIVE: Color = Color::Rgb(130, 170, 255);
}

/// Indicator symbols.
pub struct Symbols;

impl Symbols {
    pub const SPINNER: [&'static str; 4] = ["|", "/", "-", "\\"];
}

/// Common styles used throughout the TUI.
pub struct Styles;

impl Styles {
    /// Default text style.
    pub fn default() -> Style {
        Style::default().fg(Palette::FG).bg(Palette::BG)
    }

    /// Dimmed text for secondary information.
    pub fn dim() -> Style {
        Style::default().fg(Palette::DIM).bg(Palette::BG)
    }

    /// Active/focused element.
    pub fn active() -> Style {
        Style::default().fg(Palette::ACCENT).bg(Palette::BG)
    }

    /// User message label.
    pub fn user() -> Style {
        Style::default()
            .fg(Palette::ACCENT)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Agent message label.
    pub fn agent() -> Style {
        Style::default()
            .fg(Palette::SUCCESS)
            .bg(Palette::BG)
            .add_modifier(Modifier::BOLD)
    }

    /// Error message label and text.
    pub fn error() -> Style {
        Style::default().fg(Palette::ERROR).bg(Palette::BG)
    }

    /// Pane border.
    pub fn border() -> Style {
        Style::default().fg(Palette::BORDER).bg(Palette::BG)
    }

    /// Border of the focused pane.
    pub fn border_active() -> Style {
        Style::default().fg(Palette::BORDER_ACTIVE).bg(Palette::BG)
    }
}
