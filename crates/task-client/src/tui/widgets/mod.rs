//! Reusable TUI widgets for the task client

mod help_bar;
mod task_list;

pub use help_bar::HelpBar;
pub use task_list::task_items;
