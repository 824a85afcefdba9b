//! Application state for the task TUI

use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, List, ListState, Paragraph};
use tokio::sync::mpsc;

use super::event::{Event, EventHandler};
use super::form::{FormField, FormMode, Submission, TaskForm};
use super::theme::Theme;
use super::widgets::{task_items, HelpBar};
use super::Tui;
use crate::api::TaskApi;
use crate::models::Task;
use crate::notify::Notification;
use crate::store::ClientTaskStore;

/// Which pane receives key presses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Form,
}

/// A request dispatched to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Load,
    Create,
    Update(String),
    Toggle(String),
    Delete(String),
}

/// Completion report for a dispatched [`Action`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub action: Action,
    pub ok: bool,
}

/// Application state
pub struct App<A> {
    store: Arc<ClientTaskStore<A>>,
    form: TaskForm,
    focus: Focus,
    list_state: ListState,
    should_quit: bool,
    outcome_tx: mpsc::UnboundedSender<Outcome>,
    outcome_rx: mpsc::UnboundedReceiver<Outcome>,
}

impl<A: TaskApi + 'static> App<A> {
    pub fn new(store: Arc<ClientTaskStore<A>>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        Self {
            store,
            form: TaskForm::new(),
            focus: Focus::List,
            list_state: ListState::default().with_selected(Some(0)),
            should_quit: false,
            outcome_tx,
            outcome_rx,
        }
    }

    pub fn form(&self) -> &TaskForm {
        &self.form
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.list_state.selected()
    }

    pub fn selected_task(&self) -> Option<Task> {
        let index = self.list_state.selected()?;
        self.store.get_all().into_iter().nth(index)
    }

    /// Fetch the initial list.
    pub fn mount(&mut self) {
        let store = self.store.clone();
        self.dispatch(Action::Load, async move { store.load().await.is_ok() });
    }

    /// Run the application main loop
    pub async fn run(&mut self, terminal: &mut Tui, mut events: EventHandler) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            tokio::select! {
                event = events.next() => match event? {
                    Event::Key(key) => self.handle_key(key),
                    Event::Tick | Event::Resize(_, _) => {}
                },
                Some(outcome) = self.outcome_rx.recv() => self.apply_outcome(&outcome),
            }
        }

        Ok(())
    }

    /// Wait for the next dispatched request to finish and apply it.
    pub async fn next_outcome(&mut self) -> Option<Outcome> {
        let outcome = self.outcome_rx.recv().await?;
        self.apply_outcome(&outcome);
        Some(outcome)
    }

    // =========================================================================
    // Input
    // =========================================================================

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        match self.focus {
            Focus::List => self.handle_list_key(key),
            Focus::Form => self.handle_form_key(key),
        }
    }

    fn handle_list_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => self.select_previous(),
            KeyCode::Down | KeyCode::Char('j') => self.select_next(),
            KeyCode::Char('a') | KeyCode::Tab => self.focus = Focus::Form,
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(task) = self.selected_task() {
                    self.form.select_edit(&task);
                    self.focus = Focus::Form;
                }
            }
            KeyCode::Char(' ' | 't') => {
                if let Some(task) = self.selected_task() {
                    let store = self.store.clone();
                    let id = task.id.clone();
                    self.dispatch(Action::Toggle(task.id), async move {
                        store.toggle(&id).await.is_ok()
                    });
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(task) = self.selected_task() {
                    let store = self.store.clone();
                    let id = task.id.clone();
                    self.dispatch(Action::Delete(task.id), async move {
                        store.delete(&id).await.is_ok()
                    });
                }
            }
            KeyCode::Char('r') => self.mount(),
            _ => {}
        }
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                if self.form.is_editing() {
                    self.form.cancel();
                }
                self.focus = Focus::List;
            }
            KeyCode::Tab => self.form.next_field(),
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(c) => self.form.push_char(c),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let store = self.store.clone();
        match self.form.submit() {
            Err(reason) => self.store.notify(Notification::warning(reason)),
            Ok(Submission::Create(draft)) => {
                self.dispatch(Action::Create, async move {
                    store.create(draft).await.is_ok()
                });
            }
            Ok(Submission::Update { id, draft }) => {
                let target = id.clone();
                self.dispatch(Action::Update(target), async move {
                    store.update(&id, draft).await.is_ok()
                });
            }
        }
    }

    /// Run `request` in the background and report back through the outcome channel.
    fn dispatch<F>(&self, action: Action, request: F)
    where
        F: Future<Output = bool> + Send + 'static,
    {
        let tx = self.outcome_tx.clone();
        tokio::spawn(async move {
            let ok = request.await;
            let _ = tx.send(Outcome { action, ok });
        });
    }

    fn apply_outcome(&mut self, outcome: &Outcome) {
        if outcome.ok {
            match &outcome.action {
                Action::Create => {
                    self.form.submit_succeeded(&FormMode::Idle);
                    self.focus = Focus::List;
                    self.list_state.select(self.store.len().checked_sub(1));
                }
                Action::Update(id) => {
                    self.form.submit_succeeded(&FormMode::Editing(id.clone()));
                    self.focus = Focus::List;
                }
                Action::Delete(id) => self.form.forget(id),
                Action::Load | Action::Toggle(_) => {}
            }
        }
        self.clamp_selection();
    }

    // =========================================================================
    // Selection
    // =========================================================================

    fn select_previous(&mut self) {
        let index = self.list_state.selected().unwrap_or(0);
        self.list_state.select(Some(index.saturating_sub(1)));
    }

    fn select_next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let index = self.list_state.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.list_state.select(Some(index));
    }

    fn clamp_selection(&mut self) {
        let len = self.store.len();
        let selected = match self.list_state.selected() {
            _ if len == 0 => None,
            Some(i) => Some(i.min(len - 1)),
            None => Some(0),
        };
        self.list_state.select(selected);
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub fn draw(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(8),    // List + form
                Constraint::Length(1), // Notification
                Constraint::Length(1), // Help bar
            ])
            .split(frame.area());

        let header = Paragraph::new("Task Manager")
            .style(Theme::title())
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::BOTTOM).border_style(Theme::border(false)));
        frame.render_widget(header, chunks[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1]);

        self.draw_list(frame, body[0]);
        self.draw_form(frame, body[1]);
        self.draw_status(frame, chunks[2]);

        let help = match self.focus {
            Focus::List => HelpBar::list(),
            Focus::Form => HelpBar::form(self.form.is_editing()),
        };
        frame.render_widget(help, chunks[3]);
    }

    fn draw_list(&mut self, frame: &mut Frame, area: Rect) {
        let tasks = self.store.get_all();
        let block = Block::default()
            .title(format!(" Tasks ({}) ", tasks.len()))
            .borders(Borders::ALL)
            .border_style(Theme::border(self.focus == Focus::List));

        if tasks.is_empty() {
            let empty = Paragraph::new("No tasks yet. Press [a] to add one.")
                .style(Theme::text_muted())
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let list = List::new(task_items(&tasks))
            .block(block)
            .highlight_style(Theme::selected())
            .highlight_symbol("> ");
        frame.render_stateful_widget(list, area, &mut self.list_state);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Form;
        let heading = if self.form.is_editing() { " Edit Task " } else { " New Task " };
        let block = Block::default()
            .title(heading)
            .borders(Borders::ALL)
            .border_style(Theme::border(focused));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Title
                Constraint::Length(3), // Description
                Constraint::Length(1), // Submit
                Constraint::Min(0),
            ])
            .split(inner);

        let inputs = [
            (FormField::Title, "Task title", self.form.title(), rows[0]),
            (FormField::Description, "Task description", self.form.description(), rows[1]),
        ];
        for (field, placeholder, value, row) in inputs {
            let active = focused && self.form.field() == field;
            let text = if value.is_empty() && !active {
                Span::styled(placeholder, Theme::text_muted())
            } else if active {
                Span::styled(format!("{value}▏"), Theme::text())
            } else {
                Span::styled(value, Theme::text())
            };
            let input = Paragraph::new(Line::from(text)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Theme::border(active)),
            );
            frame.render_widget(input, row);
        }

        let button = Paragraph::new(format!("[ {} ]", self.form.submit_label()))
            .style(if focused { Theme::help_key() } else { Theme::text_muted() })
            .alignment(Alignment::Center);
        frame.render_widget(button, rows[2]);
    }

    fn draw_status(&self, frame: &mut Frame, area: Rect) {
        let line = match self.store.latest_notification() {
            Some(n) if !n.is_expired() => {
                Line::from(Span::styled(n.message, Theme::notification(n.level)))
            }
            _ if self.store.is_busy() => Line::from(Span::styled("Working...", Theme::text_muted())),
            _ => Line::default(),
        };
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::MockTaskApi;
    use crate::models::TaskDraft;
    use ratatui::backend::TestBackend;

    fn task(id: &str, title: &str, description: &str, completed: bool) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            completed,
        }
    }

    fn seeded_api() -> MockTaskApi {
        let mut api = MockTaskApi::new();
        api.expect_list().returning(|| {
            Ok(vec![
                task("1", "Task 1", "Desc 1", false),
                task("2", "Task 2", "Desc 2", true),
            ])
        });
        api
    }

    async fn mounted(api: MockTaskApi) -> App<MockTaskApi> {
        let mut app = App::new(Arc::new(ClientTaskStore::new(api)));
        app.mount();
        let outcome = app.next_outcome().await.unwrap();
        assert_eq!(outcome, Outcome { action: Action::Load, ok: true });
        app
    }

    fn press(app: &mut App<MockTaskApi>, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App<MockTaskApi>, s: &str) {
        s.chars().for_each(|c| press(app, KeyCode::Char(c)));
    }

    fn render(app: &mut App<MockTaskApi>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 24)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[tokio::test]
    async fn renders_title_and_seeded_tasks() {
        let mut app = mounted(seeded_api()).await;

        let screen = render(&mut app);
        assert!(screen.contains("Task Manager"));
        assert!(screen.contains("[ ] Task 1 - Desc 1"));
        assert!(screen.contains("[x] Task 2 - Desc 2"));
        assert!(screen.contains("[ Add Task ]"));
    }

    #[tokio::test]
    async fn delete_control_removes_first_task() {
        let mut api = seeded_api();
        api.expect_delete()
            .withf(|id| id == "1")
            .times(1)
            .returning(|_| Ok(()));
        let mut app = mounted(api).await;

        press(&mut app, KeyCode::Char('d'));
        let outcome = app.next_outcome().await.unwrap();
        assert_eq!(outcome.action, Action::Delete("1".to_string()));
        assert!(outcome.ok);

        let screen = render(&mut app);
        assert!(!screen.contains("Task 1"));
        assert!(screen.contains("Task 2"));
        assert!(screen.contains("Task deleted"));
        assert_eq!(app.selected_index(), Some(0));
    }

    #[tokio::test]
    async fn add_task_through_form() {
        let mut api = seeded_api();
        api.expect_create()
            .withf(|draft| draft == &TaskDraft::new("New Task", "New Desc"))
            .times(1)
            .returning(|_| Ok(task("3", "New Task", "New Desc", false)));
        let mut app = mounted(api).await;

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.focus(), Focus::Form);
        type_str(&mut app, "New Task");
        press(&mut app, KeyCode::Tab);
        type_str(&mut app, "New Desc");
        press(&mut app, KeyCode::Enter);

        let outcome = app.next_outcome().await.unwrap();
        assert_eq!(outcome, Outcome { action: Action::Create, ok: true });
        assert_eq!(app.form().mode(), &FormMode::Idle);
        assert!(app.form().title().is_empty());
        assert_eq!(app.focus(), Focus::List);

        let screen = render(&mut app);
        assert!(screen.contains("New Task - New Desc"));
        assert!(screen.contains("Task added successfully"));
    }

    #[tokio::test]
    async fn edit_task_through_form() {
        let mut api = seeded_api();
        api.expect_update()
            .withf(|id, draft| {
                id == "1"
                    && draft == &TaskDraft::new("Updated Task", "Updated Desc").completed(false)
            })
            .times(1)
            .returning(|id, draft| Ok(task(id, &draft.title, &draft.description, false)));
        let mut app = mounted(api).await;

        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.form().mode(), &FormMode::Editing("1".to_string()));
        assert!(render(&mut app).contains("[ Update Task ]"));

        "Task 1".chars().for_each(|_| press(&mut app, KeyCode::Backspace));
        type_str(&mut app, "Updated Task");
        press(&mut app, KeyCode::Tab);
        "Desc 1".chars().for_each(|_| press(&mut app, KeyCode::Backspace));
        type_str(&mut app, "Updated Desc");
        press(&mut app, KeyCode::Enter);

        let outcome = app.next_outcome().await.unwrap();
        assert_eq!(outcome.action, Action::Update("1".to_string()));
        assert!(outcome.ok);
        assert_eq!(app.form().mode(), &FormMode::Idle);

        let screen = render(&mut app);
        assert!(screen.contains("Updated Task - Updated Desc"));
        assert!(screen.contains("Task updated successfully"));
    }

    #[tokio::test]
    async fn cancel_edit_returns_to_idle() {
        let mut app = mounted(seeded_api()).await;

        press(&mut app, KeyCode::Char('e'));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.form().mode(), &FormMode::Idle);
        assert_eq!(app.focus(), Focus::List);
    }

    #[tokio::test]
    async fn toggle_selected_task() {
        let mut api = seeded_api();
        api.expect_toggle()
            .withf(|id| id == "2")
            .times(1)
            .returning(|id| Ok(task(id, "Task 2", "Desc 2", false)));
        let mut app = mounted(api).await;

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        app.next_outcome().await.unwrap();

        assert!(render(&mut app).contains("[ ] Task 2"));
    }

    #[tokio::test]
    async fn blank_title_is_not_sent() {
        let mut api = seeded_api();
        api.expect_create().never();
        let mut app = mounted(api).await;

        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);

        assert!(render(&mut app).contains("Please input a task title"));
        assert_eq!(app.focus(), Focus::Form);
    }

    #[tokio::test]
    async fn failed_submit_keeps_form_contents() {
        let mut api = seeded_api();
        api.expect_create().returning(|_| {
            Err(crate::error::ClientError::Status {
                status: 500,
                message: "Something went wrong!".to_string(),
            })
        });
        let mut app = mounted(api).await;

        press(&mut app, KeyCode::Char('a'));
        type_str(&mut app, "Keep me");
        press(&mut app, KeyCode::Enter);
        let outcome = app.next_outcome().await.unwrap();

        assert!(!outcome.ok);
        assert_eq!(app.form().title(), "Keep me");
        assert_eq!(app.focus(), Focus::Form);
        assert!(render(&mut app).contains("Failed to add task"));
    }

    #[tokio::test]
    async fn quit_keys() {
        let mut app = mounted(seeded_api()).await;
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit());

        let mut app = mounted(seeded_api()).await;
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.should_quit());
        assert_eq!(app.form().title(), "q");
    }
}
