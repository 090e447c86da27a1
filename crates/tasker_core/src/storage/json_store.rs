use crate::error::AppError;
use crate::model::{Task, TaskRecord};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub const DEFAULT_STORE_NAME: &str = "tasks";
pub const STORE_PATH_ENV: &str = "TASKER_STORE_PATH";

/// Encodes every task, deleted ones included, in collection order.
pub fn encode(tasks: &[Task]) -> Result<Vec<TaskRecord>, AppError> {
    tasks.iter().map(Task::to_record).collect()
}

/// All-or-nothing decode: one bad record rejects the whole document.
pub fn try_decode(value: Value) -> Result<Vec<Task>, AppError> {
    if !value.is_array() {
        return Err(AppError::invalid_data("task file must contain a JSON array"));
    }

    let records: Vec<TaskRecord> = serde_json::from_value(value)?;
    records.into_iter().map(Task::from_record).collect()
}

/// Like [`try_decode`] but degrades to an empty collection on any failure.
pub fn decode(value: Value) -> Vec<Task> {
    match try_decode(value) {
        Ok(tasks) => tasks,
        Err(err) => {
            tracing::warn!(target: "tasks", "could not decode stored tasks, starting empty: {err}");
            Vec::new()
        }
    }
}

pub fn store_path(store_name: &str) -> Result<PathBuf, AppError> {
    if let Ok(path) = std::env::var(STORE_PATH_ENV)
        && !path.trim().is_empty()
    {
        return Ok(PathBuf::from(path));
    }

    let exe = std::env::current_exe()?;
    let root = exe
        .parent()
        .ok_or_else(|| AppError::invalid_data("executable has no parent directory"))?;
    Ok(root.join(format!("{store_name}.json")))
}

/// Reads the task file at `path`. A missing or unreadable file yields an
/// empty collection.
pub fn load_tasks(path: &Path) -> Vec<Task> {
    if !path.exists() {
        tracing::info!(
            target: "tasks",
            "{} does not exist yet, it will be created on save",
            path.display()
        );
        return Vec::new();
    }

    match read_value(path) {
        Ok(value) => decode(value),
        Err(err) => {
            tracing::warn!(target: "tasks", "could not read {}: {err}", path.display());
            Vec::new()
        }
    }
}

fn read_value(path: &Path) -> Result<Value, AppError> {
    let content = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

pub fn save_tasks(path: &Path, tasks: &[Task]) -> Result<(), AppError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }

    let records = encode(tasks)?;
    let content = serde_json::to_string_pretty(&records)?;
    std::fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)?;
    }

    tracing::info!(target: "tasks", "saved {} tasks to {}", tasks.len(), path.display());
    Ok(())
}
