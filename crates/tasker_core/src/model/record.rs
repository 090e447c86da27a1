use crate::error::AppError;
use crate::model::date;
use crate::model::{Difficulty, Task, TaskStatus};
use serde::{Deserialize, Serialize};

/// On-disk shape of a task. Field names are fixed by the existing file format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    #[serde(rename = "nombre")]
    pub name: String,
    #[serde(rename = "descripcion")]
    pub description: String,
    #[serde(rename = "dificultad")]
    pub difficulty: u8,
    #[serde(rename = "estado")]
    pub status: u8,
    #[serde(rename = "fechaCreacion")]
    pub created_at: String,
    #[serde(rename = "fechaEdicion")]
    pub edited_at: String,
    #[serde(rename = "fechaVencimiento")]
    pub due_date: String,
    #[serde(rename = "eliminada")]
    pub deleted: bool,
}

impl Task {
    pub fn to_record(&self) -> Result<TaskRecord, AppError> {
        Ok(TaskRecord {
            id: self.id().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            difficulty: self.difficulty().code(),
            status: self.status().code(),
            created_at: date::format_iso(self.created_at())?,
            edited_at: date::format_iso(self.edited_at())?,
            due_date: date::format_iso(date::due_date_to_stored(self.due_date()))?,
            deleted: self.is_deleted(),
        })
    }

    pub fn from_record(record: TaskRecord) -> Result<Self, AppError> {
        let due = date::parse_iso(&record.due_date)?;
        Task::restore(
            record.id,
            record.name,
            record.description,
            Difficulty::try_from(record.difficulty)?,
            TaskStatus::try_from(record.status)?,
            date::parse_iso(&record.created_at)?,
            date::parse_iso(&record.edited_at)?,
            date::due_date_from_stored(due),
            record.deleted,
        )
    }
}
