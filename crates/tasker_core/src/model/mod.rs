pub mod date;
mod record;
mod task;

pub use record::TaskRecord;
pub use task::{
    DEFAULT_DESCRIPTION, Difficulty, MIN_TITLE_CHARS, Task, TaskStatus, is_valid_title,
    validate_title,
};
