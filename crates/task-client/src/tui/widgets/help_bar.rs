//! Key binding hints shown at the bottom of the screen

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Widget},
};

use crate::tui::theme::Theme;

pub struct HelpBar {
    items: Vec<(&'static str, &'static str)>,
}

impl HelpBar {
    pub fn new(items: Vec<(&'static str, &'static str)>) -> Self {
        Self { items }
    }

    /// Help bar while the task list has focus
    pub fn list() -> Self {
        Self::new(vec![
            ("↑/↓", "Select"),
            ("a", "Add"),
            ("e", "Edit"),
            ("Space", "Toggle"),
            ("d", "Delete"),
            ("r", "Reload"),
            ("q", "Quit"),
        ])
    }

    /// Help bar while the form has focus
    pub fn form(editing: bool) -> Self {
        Self::new(vec![
            ("Tab", "Next Field"),
            ("Enter", if editing { "Update Task" } else { "Add Task" }),
            ("Esc", if editing { "Cancel" } else { "Back" }),
        ])
    }
}

impl Widget for HelpBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut spans = Vec::new();

        for (i, (key, desc)) in self.items.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(format!("[{key}]"), Theme::help_key()));
            spans.push(Span::styled(format!(" {desc}"), Theme::text_muted()));
        }

        Paragraph::new(Line::from(spans))
            .alignment(Alignment::Center)
            .render(area, buf);
    }
}
