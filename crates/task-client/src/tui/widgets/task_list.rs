//! Rows of the task list

use ratatui::{prelude::*, widgets::ListItem};

use crate::models::Task;
use crate::tui::theme::Theme;

/// One list row per task: checkbox, title and description.
pub fn task_items(tasks: &[Task]) -> Vec<ListItem<'_>> {
    tasks
        .iter()
        .map(|task| {
            let (checkbox, title_style) = if task.completed {
                ("[x] ", Theme::completed())
            } else {
                ("[ ] ", Theme::text())
            };

            let mut spans = vec![
                Span::styled(checkbox, Theme::text_muted()),
                Span::styled(task.title.as_str(), title_style),
            ];
            if !task.description.is_empty() {
                spans.push(Span::styled(" - ", Theme::text_muted()));
                spans.push(Span::styled(task.description.as_str(), Theme::text_muted()));
            }

            ListItem::new(Line::from(spans))
        })
        .collect()
}
