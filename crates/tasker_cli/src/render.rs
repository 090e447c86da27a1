use serde_json::{Value, json};
use tabled::settings::Style;
use tabled::{Table, Tabled};
use tasker_core::error::AppError;
use tasker_core::model::Task;
use tasker_core::model::date;
use tasker_core::stats::{Bucket, Statistics};
use time::UtcOffset;

#[derive(Tabled)]
struct TaskRow {
    #[tabled(rename = "#")]
    number: usize,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Status")]
    status: &'static str,
    #[tabled(rename = "Difficulty")]
    difficulty: String,
    #[tabled(rename = "Due")]
    due: String,
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "Group")]
    group: &'static str,
    #[tabled(rename = "Label")]
    label: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Percent")]
    percent: String,
}

/// Numbered table in collection order; numbers match what the interactive
/// detail workflow accepts.
pub fn tasks_table(tasks: &[Task], offset: UtcOffset) -> String {
    let rows = tasks.iter().enumerate().map(|(index, task)| TaskRow {
        number: index + 1,
        title: task.name().to_string(),
        status: task.status().label(),
        difficulty: format!(
            "{} {}",
            task.difficulty().marker(),
            task.difficulty().label()
        ),
        due: task.due_display(offset),
    });

    Table::new(rows).with(Style::rounded()).to_string()
}

fn bucket_rows(group: &'static str, buckets: &[Bucket]) -> Vec<BucketRow> {
    buckets
        .iter()
        .map(|bucket| BucketRow {
            group,
            label: bucket.label,
            count: bucket.count,
            percent: format!("{}%", bucket.percent),
        })
        .collect()
}

pub fn statistics_table(stats: &Statistics) -> String {
    let mut rows = bucket_rows("Status", &stats.by_status);
    rows.extend(bucket_rows("Difficulty", &stats.by_difficulty));

    let table = Table::new(rows).with(Style::rounded()).to_string();
    format!("TOTAL TASKS: {}\n{table}", stats.total)
}

pub fn task_json(task: &Task) -> Result<Value, AppError> {
    let due_date = match task.due_date() {
        Some(due) => Some(date::format_iso(due)?),
        None => None,
    };

    Ok(json!({
        "id": task.id(),
        "title": task.name(),
        "description": task.description(),
        "difficulty": task.difficulty().label(),
        "status": task.status().label(),
        "created_at": date::format_iso(task.created_at())?,
        "edited_at": date::format_iso(task.edited_at())?,
        "due_date": due_date,
    }))
}

pub fn tasks_json(tasks: &[Task]) -> Result<Value, AppError> {
    tasks
        .iter()
        .map(task_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

pub fn statistics_json(stats: &Statistics) -> Result<Value, AppError> {
    Ok(serde_json::to_value(stats)?)
}
