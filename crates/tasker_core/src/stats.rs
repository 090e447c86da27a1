use crate::model::{Difficulty, Task, TaskStatus};
use crate::query::active_tasks;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Bucket {
    pub label: &'static str,
    pub count: usize,
    pub percent: u32,
}

/// Counts over the active (non-deleted) tasks of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistics {
    pub total: usize,
    pub by_status: [Bucket; 3],
    pub by_difficulty: [Bucket; 3],
}

impl Statistics {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

pub fn summarize(tasks: &[Task]) -> Statistics {
    let active = active_tasks(tasks);
    let total = active.len();

    let by_status = TaskStatus::ALL.map(|status| {
        let count = active.iter().filter(|task| task.status() == status).count();
        Bucket {
            label: status.label(),
            count,
            percent: percentage(count, total),
        }
    });
    let by_difficulty = Difficulty::ALL.map(|difficulty| {
        let count = active
            .iter()
            .filter(|task| task.difficulty() == difficulty)
            .count();
        Bucket {
            label: difficulty.label(),
            count,
            percent: percentage(count, total),
        }
    });

    Statistics {
        total,
        by_status,
        by_difficulty,
    }
}

/// `round(count / total * 100)` with halves rounded up; 0 when `total` is 0.
pub fn percentage(count: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((count * 200 + total) / (total * 2)) as u32
}
