use crate::error::AppError;
use crate::model::date;
use std::hash::{Hash, Hasher};
use time::{OffsetDateTime, UtcOffset};

pub const DEFAULT_DESCRIPTION: &str = "No description";
pub const MIN_TITLE_CHARS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum Difficulty {
    #[default]
    Easy = 1,
    Medium = 2,
    Hard = 3,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }

    pub fn marker(self) -> &'static str {
        match self {
            Self::Easy => "★☆☆",
            Self::Medium => "★★☆",
            Self::Hard => "★★★",
        }
    }
}

impl TryFrom<u8> for Difficulty {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Easy),
            2 => Ok(Self::Medium),
            3 => Ok(Self::Hard),
            other => Err(AppError::invalid_data(format!("unknown difficulty {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TaskStatus {
    #[default]
    Pending = 1,
    InProgress = 2,
    Done = 3,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Done];

    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::InProgress => "In progress",
            Self::Done => "Done",
        }
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = AppError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Pending),
            2 => Ok(Self::InProgress),
            3 => Ok(Self::Done),
            other => Err(AppError::invalid_data(format!("unknown status {other}"))),
        }
    }
}

/// A tracked task.
///
/// Values are never changed in place: every `with_*` transform hands back a
/// new `Task` carrying the same `id` and `created_at`. Two tasks are equal
/// when their ids are equal.
#[derive(Debug, Clone)]
pub struct Task {
    id: String,
    name: String,
    description: String,
    difficulty: Difficulty,
    status: TaskStatus,
    created_at: OffsetDateTime,
    edited_at: OffsetDateTime,
    due_date: Option<OffsetDateTime>,
    deleted: bool,
}

impl Task {
    /// Creates a fresh task with a new id and both timestamps set to now.
    ///
    /// The title is not validated here; see [`validate_title`].
    pub fn new(name: impl Into<String>, due_date: Option<OffsetDateTime>) -> Self {
        let now = date::now();
        let due_date = due_date.map(date::truncate_to_millis);
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            description: DEFAULT_DESCRIPTION.to_string(),
            difficulty: Difficulty::default(),
            status: TaskStatus::default(),
            created_at: now,
            edited_at: now,
            due_date,
            deleted: false,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub(crate) fn restore(
        id: String,
        name: String,
        description: String,
        difficulty: Difficulty,
        status: TaskStatus,
        created_at: OffsetDateTime,
        edited_at: OffsetDateTime,
        due_date: Option<OffsetDateTime>,
        deleted: bool,
    ) -> Result<Self, AppError> {
        if id.trim().is_empty() {
            return Err(AppError::invalid_data("id is required"));
        }
        if name.is_empty() {
            return Err(AppError::invalid_data("name is required"));
        }
        if edited_at < created_at {
            return Err(AppError::invalid_data(format!(
                "task {id} was edited before it was created"
            )));
        }

        Ok(Self {
            id,
            name,
            description,
            difficulty,
            status,
            created_at,
            edited_at,
            due_date,
            deleted,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn status(&self) -> TaskStatus {
        self.status
    }

    pub fn created_at(&self) -> OffsetDateTime {
        self.created_at
    }

    pub fn edited_at(&self) -> OffsetDateTime {
        self.edited_at
    }

    pub fn due_date(&self) -> Option<OffsetDateTime> {
        self.due_date
    }

    pub fn is_deleted(&self) -> bool {
        self.deleted
    }

    pub fn created_display(&self, offset: UtcOffset) -> String {
        date::format_display(self.created_at, offset)
    }

    pub fn edited_display(&self, offset: UtcOffset) -> String {
        date::format_display(self.edited_at, offset)
    }

    /// `dd/mm/yyyy`, or `No data` when there is no due date.
    pub fn due_display(&self, offset: UtcOffset) -> String {
        date::format_due_display(self.due_date, offset)
    }

    /// An empty description falls back to [`DEFAULT_DESCRIPTION`].
    pub fn with_description(&self, description: &str) -> Self {
        let description = if description.is_empty() {
            DEFAULT_DESCRIPTION
        } else {
            description
        };
        Self {
            description: description.to_string(),
            ..self.clone()
        }
    }

    pub fn with_difficulty(&self, difficulty: Difficulty) -> Self {
        Self {
            difficulty,
            ..self.clone()
        }
    }

    pub fn with_status(&self, status: TaskStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }

    pub fn with_due_date(&self, due_date: Option<OffsetDateTime>) -> Self {
        Self {
            due_date: due_date.map(date::truncate_to_millis),
            ..self.clone()
        }
    }

    /// Stamps `edited_at`, never earlier than `created_at`.
    ///
    /// Timestamps passed to the transforms are cut to whole milliseconds so a
    /// task survives a save and reload unchanged.
    pub fn touched(&self, at: OffsetDateTime) -> Self {
        Self {
            edited_at: date::truncate_to_millis(at).max(self.created_at),
            ..self.clone()
        }
    }

    pub fn soft_deleted(&self, at: OffsetDateTime) -> Self {
        Self {
            deleted: true,
            ..self.touched(at)
        }
    }
}

impl PartialEq for Task {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Task {}

impl Hash for Task {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

pub fn is_valid_title(title: &str) -> bool {
    title.chars().count() >= MIN_TITLE_CHARS
}

pub fn validate_title(title: &str) -> Result<(), AppError> {
    if is_valid_title(title) {
        Ok(())
    } else {
        Err(AppError::invalid_input(format!(
            "title must have at least {MIN_TITLE_CHARS} characters"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::{
        DEFAULT_DESCRIPTION, Difficulty, Task, TaskStatus, is_valid_title, validate_title,
    };
    use time::Duration;
    use time::UtcOffset;
    use time::macros::datetime;

    #[test]
    fn new_task_has_defaults() {
        let task = Task::new("Buy milk", None);

        assert!(!task.id().is_empty());
        assert_eq!(task.name(), "Buy milk");
        assert_eq!(task.description(), DEFAULT_DESCRIPTION);
        assert_eq!(task.difficulty(), Difficulty::Easy);
        assert_eq!(task.status(), TaskStatus::Pending);
        assert_eq!(task.created_at(), task.edited_at());
        assert_eq!(task.due_date(), None);
        assert!(!task.is_deleted());
    }

    #[test]
    fn new_tasks_get_distinct_ids() {
        let first = Task::new("first", None);
        let second = Task::new("first", None);
        assert_ne!(first.id(), second.id());
        assert_ne!(first, second);
    }

    #[test]
    fn transforms_keep_identity_and_original() {
        let original = Task::new("Write report", None);
        let edited = original
            .with_description("quarterly numbers")
            .with_difficulty(Difficulty::Hard)
            .with_status(TaskStatus::InProgress);

        assert_eq!(edited, original);
        assert_eq!(edited.id(), original.id());
        assert_eq!(edited.created_at(), original.created_at());
        assert_eq!(edited.description(), "quarterly numbers");
        assert_eq!(original.description(), DEFAULT_DESCRIPTION);
        assert_eq!(original.difficulty(), Difficulty::Easy);
    }

    #[test]
    fn empty_description_falls_back_to_default() {
        let task = Task::new("Write report", None).with_description("notes");
        assert_eq!(task.with_description("").description(), DEFAULT_DESCRIPTION);
    }

    #[test]
    fn touched_never_precedes_creation() {
        let task = Task::new("Write report", None);
        let earlier = task.created_at() - Duration::days(3);

        assert_eq!(task.touched(earlier).edited_at(), task.created_at());
    }

    #[test]
    fn soft_delete_is_idempotent_apart_from_edit_stamp() {
        let task = Task::new("Write report", None).with_status(TaskStatus::Done);
        let first = task.soft_deleted(task.created_at() + Duration::minutes(1));
        let second = first.soft_deleted(task.created_at() + Duration::minutes(2));

        assert!(second.is_deleted());
        assert!(second.edited_at() > first.edited_at());
        assert_eq!(second.name(), first.name());
        assert_eq!(second.description(), first.description());
        assert_eq!(second.status(), first.status());
        assert_eq!(second.difficulty(), first.difficulty());
        assert_eq!(second.due_date(), first.due_date());
        assert_eq!(second.created_at(), first.created_at());
    }

    #[test]
    fn transforms_drop_sub_millisecond_precision() {
        let task = Task::new("Write report", Some(datetime!(2024-01-15 3:00:00.123456789 UTC)));
        assert_eq!(task.due_date(), Some(datetime!(2024-01-15 3:00:00.123 UTC)));

        let later = task.created_at() + Duration::nanoseconds(1_500_999);
        let deleted = task.soft_deleted(later);
        assert_eq!(deleted.edited_at().nanosecond() % 1_000_000, 0);
        assert_eq!(deleted.edited_at(), task.created_at() + Duration::milliseconds(1));

        let due = task.with_due_date(Some(datetime!(2030-06-01 8:00:00.999999 UTC)));
        assert_eq!(due.due_date(), Some(datetime!(2030-06-01 8:00:00.999 UTC)));
    }

    #[test]
    fn due_display_reports_missing_date() {
        let task = Task::new("Write report", None);
        assert_eq!(task.due_display(UtcOffset::UTC), "No data");

        let dated = task.with_due_date(Some(datetime!(2024-01-15 0:00 UTC)));
        assert_eq!(dated.due_display(UtcOffset::UTC), "15/01/2024");
    }

    #[test]
    fn title_validation_gate() {
        for short in ["", "a", "ab", "abc", "ñañ"] {
            assert!(!is_valid_title(short), "{short:?} should be rejected");
        }
        for long in ["abcd", "Buy milk", "ñandú"] {
            assert!(is_valid_title(long), "{long:?} should be accepted");
        }

        let err = validate_title("abc").unwrap_err();
        assert_eq!(err.code(), "invalid_input");
    }

    #[test]
    fn enum_codes_are_stable() {
        assert_eq!(Difficulty::Easy.code(), 1);
        assert_eq!(Difficulty::Hard.code(), 3);
        assert_eq!(TaskStatus::InProgress.code(), 2);
        assert_eq!(TaskStatus::try_from(3).unwrap(), TaskStatus::Done);
        assert_eq!(Difficulty::try_from(4).unwrap_err().code(), "invalid_data");
    }
}
