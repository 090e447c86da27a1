use crate::error::AppError;
use crate::model::{Task, date};
use crate::stats::Statistics;
use std::collections::VecDeque;
use time::UtcOffset;

pub const PRESS_ENTER: &str = "Press enter to continue";
pub const INVALID_OPTION: &str = "Invalid option, try again: ";
pub const INVALID_MENU_OPTION: &str = "-INVALID OPTION-";
pub const INVALID_TITLE: &str = "Invalid or empty title, try again";
pub const INVALID_DUE_DATE: &str = "Invalid date, it will be saved as 'No data'";
pub const NO_TASKS: &str = "There are no tasks yet";
pub const NO_TASKS_WITH_STATUS: &str = "There are no tasks with that status";
pub const NO_SEARCH_RESULTS: &str = "No tasks found with that name";
pub const GOODBYE: &str = "See you next time!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Menu {
    Main,
    View,
}

pub fn menu_text(menu: Menu) -> &'static str {
    match menu {
        Menu::Main => {
            "[1] View my tasks\n[2] Search my tasks\n[3] Add a task\n[4] Statistics\n[0] Exit"
        }
        Menu::View => {
            "Which tasks do you want to see?\n[1] All\n[2] Pending\n[3] In progress\n[4] Done\n[0] Back"
        }
    }
}

/// One `Task #[n]: name` line per task, numbered from 1.
pub fn task_list_text(tasks: &[Task]) -> String {
    tasks
        .iter()
        .enumerate()
        .map(|(index, task)| format!("Task #[{}]: {}", index + 1, task.name()))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn statistics_text(stats: &Statistics) -> String {
    let mut lines = vec![format!("TOTAL TASKS: {}", stats.total), String::new()];
    lines.push("--- BY STATUS ---".to_string());
    for bucket in &stats.by_status {
        lines.push(format!(
            "  {:<12} {} ({}%)",
            format!("{}:", bucket.label),
            bucket.count,
            bucket.percent
        ));
    }
    lines.push(String::new());
    lines.push("--- BY DIFFICULTY ---".to_string());
    for bucket in &stats.by_difficulty {
        lines.push(format!(
            "  {:<12} {} ({}%)",
            format!("{}:", bucket.label),
            bucket.count,
            bucket.percent
        ));
    }
    lines.join("\n")
}

/// The interaction surface the workflows and menu handlers talk to.
///
/// Only `ask` and `say` are required; the rendering hooks default to plain
/// text so a terminal front end can restyle them.
pub trait Prompt {
    /// Shows `question` and returns the next input line without its line
    /// terminator. Spaces are preserved: a lone `" "` is meaningful.
    fn ask(&mut self, question: &str) -> Result<String, AppError>;

    fn say(&mut self, text: &str);

    /// Offset used to read typed due dates and to print stored ones.
    fn offset(&self) -> UtcOffset {
        date::local_offset()
    }

    fn pause(&mut self) -> Result<(), AppError> {
        self.ask(PRESS_ENTER).map(|_| ())
    }

    fn show_menu(&mut self, menu: Menu) {
        self.say(menu_text(menu));
    }

    fn show_tasks(&mut self, tasks: &[Task]) {
        self.say(&task_list_text(tasks));
    }

    fn show_statistics(&mut self, stats: &Statistics) {
        self.say(&statistics_text(stats));
    }
}

/// A [`Prompt`] fed from a fixed list of lines, recording everything shown.
#[derive(Debug, Default)]
pub struct ScriptedPrompt {
    inputs: VecDeque<String>,
    pub transcript: Vec<String>,
}

impl ScriptedPrompt {
    pub fn new<I, S>(inputs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            inputs: inputs.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.inputs.len()
    }

    pub fn output(&self) -> String {
        self.transcript.join("\n")
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, question: &str) -> Result<String, AppError> {
        self.transcript.push(question.to_string());
        self.inputs.pop_front().ok_or_else(AppError::input_closed)
    }

    fn say(&mut self, text: &str) {
        self.transcript.push(text.to_string());
    }
}
