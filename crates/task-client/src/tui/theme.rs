//! Color theme for the task TUI

use ratatui::style::{Color, Modifier, Style};

use crate::notify::NotificationLevel;

pub struct Theme;

impl Theme {
    /// Primary accent color (Indigo-500)
    pub const PRIMARY: Color = Color::Rgb(99, 102, 241);

    /// Success color (Emerald-500)
    pub const SUCCESS: Color = Color::Rgb(16, 185, 129);

    /// Warning color (Amber-500)
    pub const WARNING: Color = Color::Rgb(245, 158, 11);

    /// Error color (Red-500)
    pub const ERROR: Color = Color::Rgb(239, 68, 68);

    /// Border color (Slate-700)
    pub const BORDER: Color = Color::Rgb(51, 65, 85);

    /// Primary text color (Slate-50)
    pub const TEXT: Color = Color::Rgb(248, 250, 252);

    /// Secondary/muted text color (Slate-500)
    pub const TEXT_MUTED: Color = Color::Rgb(100, 116, 139);

    /// Highlight background (Slate-700)
    pub const HIGHLIGHT_BG: Color = Color::Rgb(51, 65, 85);

    pub fn title() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn text() -> Style {
        Style::default().fg(Self::TEXT)
    }

    pub fn text_muted() -> Style {
        Style::default().fg(Self::TEXT_MUTED)
    }

    pub fn completed() -> Style {
        Style::default()
            .fg(Self::TEXT_MUTED)
            .add_modifier(Modifier::CROSSED_OUT)
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Self::HIGHLIGHT_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border(focused: bool) -> Style {
        if focused {
            Style::default().fg(Self::PRIMARY)
        } else {
            Style::default().fg(Self::BORDER)
        }
    }

    pub fn help_key() -> Style {
        Style::default().fg(Self::PRIMARY).add_modifier(Modifier::BOLD)
    }

    pub fn notification(level: NotificationLevel) -> Style {
        let color = match level {
            NotificationLevel::Success => Self::SUCCESS,
            NotificationLevel::Warning => Self::WARNING,
            NotificationLevel::Error => Self::ERROR,
        };
        Style::default().fg(color).add_modifier(Modifier::BOLD)
    }
}
