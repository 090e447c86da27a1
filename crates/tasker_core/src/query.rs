use crate::model::{Task, TaskStatus};

/// Result of a filter that distinguishes "nothing matched" from a match list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matches {
    Found(Vec<Task>),
    NoResults,
}

impl Matches {
    pub fn from_filtered(tasks: Vec<Task>) -> Self {
        if tasks.is_empty() {
            Self::NoResults
        } else {
            Self::Found(tasks)
        }
    }

    pub fn into_option(self) -> Option<Vec<Task>> {
        match self {
            Self::Found(tasks) => Some(tasks),
            Self::NoResults => None,
        }
    }
}

pub fn active_tasks(tasks: &[Task]) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| !task.is_deleted())
        .cloned()
        .collect()
}

pub fn by_status(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status() == status)
        .cloned()
        .collect()
}

/// Case-insensitive substring search on the name; empty text matches everything.
pub fn by_name_contains(tasks: &[Task], text: &str) -> Vec<Task> {
    let needle = text.to_lowercase();
    tasks
        .iter()
        .filter(|task| task.name().to_lowercase().contains(&needle))
        .cloned()
        .collect()
}

pub fn matching_status(tasks: &[Task], status: TaskStatus) -> Matches {
    Matches::from_filtered(by_status(tasks, status))
}

pub fn matching_name(tasks: &[Task], text: &str) -> Matches {
    Matches::from_filtered(by_name_contains(tasks, text))
}

pub fn find_by_id<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    tasks.iter().find(|task| task.id() == id)
}

pub fn append(tasks: &[Task], task: Task) -> Vec<Task> {
    let mut next = Vec::with_capacity(tasks.len() + 1);
    next.extend_from_slice(tasks);
    next.push(task);
    next
}

/// Substitutes `replacement` at the position of the task with the same id.
pub fn replace_by_id(tasks: &[Task], replacement: &Task) -> Vec<Task> {
    tasks
        .iter()
        .map(|task| {
            if task.id() == replacement.id() {
                replacement.clone()
            } else {
                task.clone()
            }
        })
        .collect()
}
