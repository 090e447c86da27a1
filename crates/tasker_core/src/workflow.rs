use crate::error::AppError;
use crate::model::date;
use crate::model::{Difficulty, Task, TaskStatus, is_valid_title, validate_title};
use crate::prompt::{INVALID_DUE_DATE, INVALID_OPTION, INVALID_TITLE, Prompt};
use time::{OffsetDateTime, UtcOffset};

/// Terminal result of the detail workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Replaced(Task),
    Unchanged,
}

/// Three-way convention shared by every editable field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldInput {
    Keep,
    Reset,
    Value(String),
}

impl FieldInput {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "" => Self::Keep,
            " " => Self::Reset,
            other => Self::Value(other.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditInputs {
    pub description: FieldInput,
    pub difficulty: FieldInput,
    pub status: FieldInput,
    pub due_date: FieldInput,
}

#[derive(Debug, Clone)]
pub struct Edited {
    pub task: Task,
    pub due_date_rejected: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailChoice {
    Continue,
    Edit,
    Delete,
}

impl DetailChoice {
    pub fn parse(input: &str) -> Option<Self> {
        match input {
            "" => Some(Self::Continue),
            "e" | "E" => Some(Self::Edit),
            "x" | "X" => Some(Self::Delete),
            _ => None,
        }
    }
}

/// Accepts `1`, `2` or `3`; anything else is `None`.
pub fn parse_code(input: &str) -> Option<u8> {
    input
        .trim()
        .parse::<u8>()
        .ok()
        .filter(|code| (1..=3).contains(code))
}

/// Parses a 1-based candidate index; `Some(0)` means "go back".
pub fn parse_index(input: &str, candidates: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|index| *index <= candidates)
}

pub fn is_confirmation(input: &str) -> bool {
    matches!(input.trim().to_lowercase().as_str(), "s" | "si" | "sí")
}

/// Applies the edit inputs in field order and stamps `edited_at` with `now`.
///
/// Out-of-range difficulty or status input leaves the field untouched. An
/// unparseable due date clears it and is reported through `due_date_rejected`.
pub fn apply_edits(
    task: &Task,
    inputs: &EditInputs,
    now: OffsetDateTime,
    offset: UtcOffset,
) -> Edited {
    let mut edited = match &inputs.description {
        FieldInput::Keep => task.clone(),
        FieldInput::Reset => task.with_description(""),
        FieldInput::Value(value) => task.with_description(value),
    };

    edited = match &inputs.difficulty {
        FieldInput::Keep => edited,
        FieldInput::Reset => edited.with_difficulty(Difficulty::default()),
        FieldInput::Value(value) => match parse_code(value).map(Difficulty::try_from) {
            Some(Ok(difficulty)) => edited.with_difficulty(difficulty),
            _ => edited,
        },
    };

    edited = match &inputs.status {
        FieldInput::Keep => edited,
        FieldInput::Reset => edited.with_status(TaskStatus::default()),
        FieldInput::Value(value) => match parse_code(value).map(TaskStatus::try_from) {
            Some(Ok(status)) => edited.with_status(status),
            _ => edited,
        },
    };

    let mut due_date_rejected = false;
    edited = match &inputs.due_date {
        FieldInput::Keep => edited,
        FieldInput::Reset => edited.with_due_date(None),
        FieldInput::Value(value) => {
            let due = date::parse_due_date(value, offset);
            due_date_rejected = due.is_none();
            edited.with_due_date(due)
        }
    };

    Edited {
        task: edited.touched(now),
        due_date_rejected,
    }
}

pub fn detail_text(task: &Task, offset: UtcOffset) -> String {
    format!(
        "Title: {}\nDescription: {}\nStatus: {}\nDifficulty: {} {}\nCreated: {}\nLast edited: {}\nDue: {}",
        task.name(),
        task.description(),
        task.status().label(),
        task.difficulty().marker(),
        task.difficulty().label(),
        task.created_display(offset),
        task.edited_display(offset),
        task.due_display(offset),
    )
}

enum Step<'a> {
    SelectingIndex,
    ShowingDetail(&'a Task),
    Editing(&'a Task),
    ConfirmingDelete(&'a Task),
    Cancelled,
    Resolved(Resolution),
}

/// Lets the user pick one of `candidates`, then view, edit or soft-delete it.
///
/// Indices refer to `candidates`, not to the full collection; the caller
/// substitutes a [`Resolution::Replaced`] task back by id.
pub fn run_detail_workflow(
    candidates: &[Task],
    prompt: &mut dyn Prompt,
) -> Result<Resolution, AppError> {
    let offset = prompt.offset();
    let mut step = Step::SelectingIndex;

    loop {
        step = match step {
            Step::SelectingIndex => select_candidate(candidates, prompt)?,
            Step::ShowingDetail(task) => {
                prompt.say(&detail_text(task, offset));
                match choose_detail_action(prompt)? {
                    DetailChoice::Continue => Step::Cancelled,
                    DetailChoice::Edit => Step::Editing(task),
                    DetailChoice::Delete => Step::ConfirmingDelete(task),
                }
            }
            Step::Editing(task) => {
                let edited = edit_task(task, prompt, offset)?;
                prompt.say("Task updated!");
                prompt.pause()?;
                Step::Resolved(Resolution::Replaced(edited))
            }
            Step::ConfirmingDelete(task) => {
                if confirm_delete(task, prompt)? {
                    prompt.say("The task was marked as deleted");
                    prompt.pause()?;
                    Step::Resolved(Resolution::Replaced(task.soft_deleted(date::now())))
                } else {
                    prompt.say("Deletion cancelled");
                    prompt.pause()?;
                    Step::Resolved(Resolution::Unchanged)
                }
            }
            Step::Cancelled => {
                prompt.say("Back to the menu...");
                Step::Resolved(Resolution::Unchanged)
            }
            Step::Resolved(resolution) => return Ok(resolution),
        };
    }
}

fn select_candidate<'a>(
    candidates: &'a [Task],
    prompt: &mut dyn Prompt,
) -> Result<Step<'a>, AppError> {
    let mut input = prompt.ask("Task number to see its details, or 0 to go back: ")?;
    loop {
        match parse_index(&input, candidates.len()) {
            Some(0) => return Ok(Step::Cancelled),
            Some(index) => return Ok(Step::ShowingDetail(&candidates[index - 1])),
            None => input = prompt.ask(INVALID_OPTION)?,
        }
    }
}

fn choose_detail_action(prompt: &mut dyn Prompt) -> Result<DetailChoice, AppError> {
    let mut input = prompt.ask("Press enter to continue, [E] to edit or [X] to delete: ")?;
    loop {
        match DetailChoice::parse(&input) {
            Some(choice) => return Ok(choice),
            None => input = prompt.ask(INVALID_OPTION)?,
        }
    }
}

fn edit_task(task: &Task, prompt: &mut dyn Prompt, offset: UtcOffset) -> Result<Task, AppError> {
    prompt.say(
        "Enter a single space to reset a field, press enter to keep it, or type a new value:",
    );
    let description = prompt.ask("New description: ")?;
    let difficulty = prompt.ask("New difficulty [1] Easy [2] Medium [3] Hard: ")?;
    let status = prompt.ask("New status [1] Pending [2] In progress [3] Done: ")?;
    let due_date = prompt.ask("New due date (yyyy/mm/dd): ")?;

    let inputs = EditInputs {
        description: FieldInput::parse(&description),
        difficulty: FieldInput::parse(&difficulty),
        status: FieldInput::parse(&status),
        due_date: FieldInput::parse(&due_date),
    };
    let edited = apply_edits(task, &inputs, date::now(), offset);
    if edited.due_date_rejected {
        prompt.say(INVALID_DUE_DATE);
    }

    Ok(edited.task)
}

fn confirm_delete(task: &Task, prompt: &mut dyn Prompt) -> Result<bool, AppError> {
    prompt.say(&format!(
        "Are you sure you want to delete \"{}\"?",
        task.name()
    ));
    let answer = prompt.ask("The task will be marked as deleted [S/N]: ")?;
    Ok(is_confirmation(&answer))
}

/// Field values for a new task as typed by the user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTaskInput {
    pub title: String,
    pub description: String,
    pub difficulty: String,
    pub status: String,
    pub due_date: String,
}

#[derive(Debug, Clone)]
pub struct Created {
    pub task: Task,
    pub due_date_rejected: bool,
}

/// Builds a task from raw field input. Empty or out-of-range fields take
/// their defaults; the title must pass [`validate_title`].
pub fn build_new_task(input: &NewTaskInput, offset: UtcOffset) -> Result<Created, AppError> {
    validate_title(&input.title)?;

    let due_date = date::parse_due_date(&input.due_date, offset);
    let difficulty = parse_code(&input.difficulty)
        .and_then(|code| Difficulty::try_from(code).ok())
        .unwrap_or_default();
    let status = parse_code(&input.status)
        .and_then(|code| TaskStatus::try_from(code).ok())
        .unwrap_or_default();

    let task = Task::new(input.title.clone(), due_date)
        .with_description(&input.description)
        .with_difficulty(difficulty)
        .with_status(status);

    Ok(Created {
        task,
        due_date_rejected: due_date.is_none() && !input.due_date.trim().is_empty(),
    })
}

/// Prompts for every field of a new task, re-asking for the title until it
/// is long enough.
pub fn collect_new_task(prompt: &mut dyn Prompt) -> Result<Task, AppError> {
    let mut title = prompt.ask("Task title (at least 4 characters): ")?;
    while !is_valid_title(&title) {
        prompt.say(INVALID_TITLE);
        title = prompt.ask("Task title (at least 4 characters): ")?;
    }

    let input = NewTaskInput {
        title,
        description: prompt.ask("Description: ")?,
        difficulty: prompt.ask("Difficulty [1] Easy [2] Medium [3] Hard: ")?,
        status: prompt.ask("Status [1] Pending [2] In progress [3] Done: ")?,
        due_date: prompt.ask("Due date (yyyy/mm/dd): ")?,
    };

    let created = build_new_task(&input, prompt.offset())?;
    if created.due_date_rejected {
        prompt.say(INVALID_DUE_DATE);
    }

    Ok(created.task)
}
