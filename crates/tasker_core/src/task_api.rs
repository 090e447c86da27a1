use crate::error::AppError;
use crate::model::{Task, TaskStatus};
use crate::prompt::{
    GOODBYE, INVALID_MENU_OPTION, Menu, NO_SEARCH_RESULTS, NO_TASKS, NO_TASKS_WITH_STATUS, Prompt,
};
use crate::query::{self, Matches};
use crate::stats::{self, Statistics};
use crate::storage::json_store;
use crate::workflow::{self, Resolution};
use std::path::{Path, PathBuf};

/// The in-memory task collection plus the file it came from.
///
/// Every mutation swaps in a new collection and bumps `version`; the store
/// is dirty whenever `version` differs from the last saved one.
#[derive(Debug)]
pub struct TaskStore {
    path: PathBuf,
    tasks: Vec<Task>,
    version: u64,
    saved_version: u64,
}

impl TaskStore {
    /// Loads the file at `path`; missing or corrupt files give an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tasks = json_store::load_tasks(&path);
        tracing::debug!(target: "tasks", "loaded {} tasks from {}", tasks.len(), path.display());
        Self::with_tasks(path, tasks)
    }

    pub fn with_tasks(path: impl Into<PathBuf>, tasks: Vec<Task>) -> Self {
        Self {
            path: path.into(),
            tasks,
            version: 0,
            saved_version: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn active_tasks(&self) -> Vec<Task> {
        query::active_tasks(&self.tasks)
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn is_dirty(&self) -> bool {
        self.version != self.saved_version
    }

    fn commit(&mut self, tasks: Vec<Task>) -> u64 {
        self.tasks = tasks;
        self.version += 1;
        self.version
    }

    pub fn add(&mut self, task: Task) -> u64 {
        let next = query::append(&self.tasks, task);
        self.commit(next)
    }

    pub fn replace(&mut self, task: &Task) -> Result<u64, AppError> {
        if query::find_by_id(&self.tasks, task.id()).is_none() {
            return Err(AppError::invalid_input("task not found"));
        }
        let next = query::replace_by_id(&self.tasks, task);
        Ok(self.commit(next))
    }

    /// Returns whether the collection changed.
    pub fn apply(&mut self, resolution: Resolution) -> Result<bool, AppError> {
        match resolution {
            Resolution::Replaced(task) => self.replace(&task).map(|_| true),
            Resolution::Unchanged => Ok(false),
        }
    }

    /// Writes the whole collection. Failures are logged and reported as `false`.
    pub fn save(&mut self) -> bool {
        match json_store::save_tasks(&self.path, &self.tasks) {
            Ok(()) => {
                self.saved_version = self.version;
                true
            }
            Err(err) => {
                tracing::error!(
                    target: "tasks",
                    "could not save tasks to {}: {err}",
                    self.path.display()
                );
                false
            }
        }
    }

    /// Saves only when dirty; a clean store counts as success.
    pub fn save_if_changed(&mut self) -> bool {
        if self.is_dirty() { self.save() } else { true }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MainOption {
    Exit,
    View,
    Search,
    Add,
    Statistics,
}

impl MainOption {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u8>().ok()? {
            0 => Some(Self::Exit),
            1 => Some(Self::View),
            2 => Some(Self::Search),
            3 => Some(Self::Add),
            4 => Some(Self::Statistics),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewOption {
    Back,
    All,
    Status(TaskStatus),
}

impl ViewOption {
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().parse::<u8>().ok()? {
            0 => Some(Self::Back),
            1 => Some(Self::All),
            2 => Some(Self::Status(TaskStatus::Pending)),
            3 => Some(Self::Status(TaskStatus::InProgress)),
            4 => Some(Self::Status(TaskStatus::Done)),
            _ => None,
        }
    }
}

/// What the view handler offers to the detail workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewCandidates {
    NoTasks,
    NoResults,
    Found(Vec<Task>),
}

/// Candidate list for a view option, always drawn from active tasks.
pub fn view_candidates(tasks: &[Task], status: Option<TaskStatus>) -> ViewCandidates {
    let active = query::active_tasks(tasks);
    if active.is_empty() {
        return ViewCandidates::NoTasks;
    }

    match status {
        None => ViewCandidates::Found(active),
        Some(status) => match query::matching_status(&active, status) {
            Matches::Found(found) => ViewCandidates::Found(found),
            Matches::NoResults => ViewCandidates::NoResults,
        },
    }
}

/// Runs one main-menu option. Returns whether the collection changed.
pub fn dispatch(
    store: &mut TaskStore,
    option: MainOption,
    prompt: &mut dyn Prompt,
) -> Result<bool, AppError> {
    match option {
        MainOption::Exit => Ok(false),
        MainOption::View => view_tasks(store, prompt),
        MainOption::Search => search_tasks(store, prompt).map(|_| false),
        MainOption::Add => add_task(store, prompt).map(|_| true),
        MainOption::Statistics => show_statistics(store, prompt).map(|_| false),
    }
}

pub fn view_tasks(store: &mut TaskStore, prompt: &mut dyn Prompt) -> Result<bool, AppError> {
    if store.active_tasks().is_empty() {
        prompt.say(NO_TASKS);
        prompt.pause()?;
        return Ok(false);
    }

    prompt.show_menu(Menu::View);
    let input = prompt.ask("Option: ")?;
    match ViewOption::parse(&input) {
        Some(ViewOption::Back) => Ok(false),
        Some(ViewOption::All) => view_filtered(store, None, prompt),
        Some(ViewOption::Status(status)) => view_filtered(store, Some(status), prompt),
        None => {
            prompt.say(INVALID_MENU_OPTION);
            prompt.pause()?;
            Ok(false)
        }
    }
}

pub fn view_filtered(
    store: &mut TaskStore,
    status: Option<TaskStatus>,
    prompt: &mut dyn Prompt,
) -> Result<bool, AppError> {
    let candidates = match view_candidates(store.tasks(), status) {
        ViewCandidates::Found(candidates) => candidates,
        ViewCandidates::NoTasks => {
            prompt.say(NO_TASKS);
            prompt.pause()?;
            return Ok(false);
        }
        ViewCandidates::NoResults => {
            prompt.say(NO_TASKS_WITH_STATUS);
            prompt.pause()?;
            return Ok(false);
        }
    };

    prompt.show_tasks(&candidates);
    let resolution = workflow::run_detail_workflow(&candidates, prompt)?;
    store.apply(resolution)
}

/// Searches active tasks by name. Returns the matches, if any.
pub fn search_tasks(
    store: &TaskStore,
    prompt: &mut dyn Prompt,
) -> Result<Option<Vec<Task>>, AppError> {
    let active = store.active_tasks();
    if active.is_empty() {
        prompt.say(NO_TASKS);
        prompt.pause()?;
        return Ok(None);
    }

    let mut text = prompt.ask("Title of the task to search for: ")?;
    while text.is_empty() {
        prompt.say("Enter at least one character");
        text = prompt.ask("Title of the task to search for: ")?;
    }

    let found = query::matching_name(&active, &text).into_option();
    match &found {
        Some(tasks) => prompt.show_tasks(tasks),
        None => prompt.say(NO_SEARCH_RESULTS),
    }
    prompt.pause()?;

    Ok(found)
}

pub fn add_task(store: &mut TaskStore, prompt: &mut dyn Prompt) -> Result<Task, AppError> {
    let task = workflow::collect_new_task(prompt)?;
    store.add(task.clone());
    tracing::debug!(target: "tasks", "added task {}", task.id());
    Ok(task)
}

pub fn show_statistics(
    store: &TaskStore,
    prompt: &mut dyn Prompt,
) -> Result<Option<Statistics>, AppError> {
    let summary = stats::summarize(store.tasks());
    if summary.is_empty() {
        prompt.say(NO_TASKS);
        prompt.pause()?;
        return Ok(None);
    }

    prompt.show_statistics(&summary);
    prompt.pause()?;
    Ok(Some(summary))
}

fn report_save(store: &TaskStore, saved: bool, prompt: &mut dyn Prompt) {
    if !saved {
        prompt.say(&format!(
            "Could not save tasks to {}",
            store.path().display()
        ));
    }
}

enum SessionEnd {
    Exit,
    InputClosed,
}

fn drive_menu(store: &mut TaskStore, prompt: &mut dyn Prompt) -> Result<SessionEnd, AppError> {
    loop {
        prompt.show_menu(Menu::Main);
        let input = match prompt.ask("Option: ") {
            Ok(input) => input,
            Err(err) if err.is_input_closed() => return Ok(SessionEnd::InputClosed),
            Err(err) => return Err(err),
        };

        let Some(option) = MainOption::parse(&input) else {
            prompt.say(INVALID_MENU_OPTION);
            match prompt.pause() {
                Ok(()) => continue,
                Err(err) if err.is_input_closed() => return Ok(SessionEnd::InputClosed),
                Err(err) => return Err(err),
            }
        };

        if option == MainOption::Exit {
            return Ok(SessionEnd::Exit);
        }

        match dispatch(store, option, prompt) {
            Ok(_) => {}
            Err(err) if err.is_input_closed() => return Ok(SessionEnd::InputClosed),
            Err(err) => prompt.say(&format!("ERROR: {err}")),
        }

        let saved = store.save_if_changed();
        report_save(store, saved, prompt);
    }
}

/// The interactive loop: menu, handler, save when changed. However the loop
/// ends (`0`, end of input, or a failing prompt) the store is saved first.
pub fn run_session(store: &mut TaskStore, prompt: &mut dyn Prompt) -> Result<(), AppError> {
    let outcome = drive_menu(store, prompt);

    let saved = store.save();
    report_save(store, saved, prompt);

    match outcome? {
        SessionEnd::Exit => prompt.say(GOODBYE),
        SessionEnd::InputClosed => {}
    }
    Ok(())
}
