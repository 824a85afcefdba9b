//! Shared add/edit form.
//!
//! The form is either idle (submitting creates a task) or editing an
//! existing task (submitting updates it). A successful submit or a cancel
//! returns it to idle with empty inputs.

use crate::models::{Task, TaskDraft};

/// Which task, if any, the form is editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormMode {
    #[default]
    Idle,
    Editing(String),
}

/// Input fields, in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormField {
    #[default]
    Title,
    Description,
}

/// Request produced by a submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(TaskDraft),
    Update { id: String, draft: TaskDraft },
}

#[derive(Debug, Clone, Default)]
pub struct TaskForm {
    mode: FormMode,
    title: String,
    description: String,
    /// Completion flag of the task being edited, sent back unchanged
    completed: bool,
    field: FormField,
}

impl TaskForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &FormMode {
        &self.mode
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn field(&self) -> FormField {
        self.field
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, FormMode::Editing(_))
    }

    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            FormMode::Idle => "Add Task",
            FormMode::Editing(_) => "Update Task",
        }
    }

    /// `idle|editing --select-edit--> editing(id)`, prefilled from `task`.
    pub fn select_edit(&mut self, task: &Task) {
        self.mode = FormMode::Editing(task.id.clone());
        self.title.clone_from(&task.title);
        self.description.clone_from(&task.description);
        self.completed = task.completed;
        self.field = FormField::Title;
    }

    /// `editing --cancel--> idle`.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Build the request for the current mode, or explain why not.
    pub fn submit(&self) -> Result<Submission, String> {
        if self.title.trim().is_empty() {
            return Err("Please input a task title".to_string());
        }

        Ok(match &self.mode {
            FormMode::Idle => Submission::Create(TaskDraft::new(&self.title, &self.description)),
            FormMode::Editing(id) => Submission::Update {
                id: id.clone(),
                draft: TaskDraft::new(&self.title, &self.description).completed(self.completed),
            },
        })
    }

    /// `--submit-success--> idle`, unless the form moved on meanwhile.
    pub fn submit_succeeded(&mut self, submitted: &FormMode) {
        if &self.mode == submitted {
            self.reset();
        }
    }

    /// The edited task disappeared; drop back to idle.
    pub fn forget(&mut self, id: &str) {
        if self.mode == FormMode::Editing(id.to_string()) {
            self.reset();
        }
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            FormField::Title => FormField::Description,
            FormField::Description => FormField::Title,
        };
    }

    pub fn push_char(&mut self, c: char) {
        self.active_input().push(c);
    }

    pub fn backspace(&mut self) {
        self.active_input().pop();
    }

    fn active_input(&mut self) -> &mut String {
        match self.field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
        }
    }

    fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn task() -> Task {
        Task {
            id: "1".to_string(),
            title: "Task 1".to_string(),
            description: "Desc 1".to_string(),
            completed: true,
        }
    }

    fn type_str(form: &mut TaskForm, s: &str) {
        s.chars().for_each(|c| form.push_char(c));
    }

    #[test]
    fn idle_submit_creates() {
        let mut form = TaskForm::new();
        type_str(&mut form, "New Task");
        form.next_field();
        type_str(&mut form, "New Desc");

        assert_eq!(form.submit_label(), "Add Task");
        assert_eq!(
            form.submit().unwrap(),
            Submission::Create(TaskDraft::new("New Task", "New Desc"))
        );
    }

    #[test]
    fn select_edit_prefills_and_submits_update() {
        let mut form = TaskForm::new();
        form.select_edit(&task());

        assert_eq!(form.mode(), &FormMode::Editing("1".to_string()));
        assert_eq!(form.title(), "Task 1");
        assert_eq!(form.description(), "Desc 1");
        assert_eq!(form.submit_label(), "Update Task");

        form.backspace();
        form.push_char('!');
        assert_eq!(
            form.submit().unwrap(),
            Submission::Update {
                id: "1".to_string(),
                draft: TaskDraft::new("Task !", "Desc 1").completed(true),
            }
        );
    }

    #[test]
    fn cancel_returns_to_idle() {
        let mut form = TaskForm::new();
        form.select_edit(&task());
        form.cancel();

        assert_eq!(form.mode(), &FormMode::Idle);
        assert!(form.title().is_empty());
        assert_eq!(form.submit_label(), "Add Task");
    }

    #[test]
    fn submit_success_returns_to_idle() {
        let mut form = TaskForm::new();
        form.select_edit(&task());
        let submitted = form.mode().clone();

        form.submit_succeeded(&submitted);

        assert_eq!(form.mode(), &FormMode::Idle);
        assert!(form.description().is_empty());
    }

    #[test]
    fn stale_success_does_not_clobber_new_edit() {
        let mut form = TaskForm::new();
        form.select_edit(&task());

        form.submit_succeeded(&FormMode::Idle);

        assert!(form.is_editing());
        assert_eq!(form.title(), "Task 1");
    }

    #[test]
    fn blank_title_is_rejected_locally() {
        let mut form = TaskForm::new();
        type_str(&mut form, "   ");
        assert!(form.submit().is_err());
    }

    #[test]
    fn forgetting_edited_task_resets() {
        let mut form = TaskForm::new();
        form.select_edit(&task());
        form.forget("2");
        assert!(form.is_editing());
        form.forget("1");
        assert!(!form.is_editing());
    }
}
