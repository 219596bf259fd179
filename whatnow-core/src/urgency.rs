//! Due-date urgency classification.
//!
//! Scores (days until due → score):
//! - overdue → 4
//! - 0..=1 → 3
//! - 2..=3 → 2
//! - 4..=7 → 1
//! - later, or no due date → 0

use chrono::NaiveDate;
use serde::Serialize;

use crate::task::Task;
use crate::time::day_delta;

/// Score at or above which a task counts as urgent for presentation order.
pub const URGENT_THRESHOLD: u8 = 2;

pub fn days_until_due(task: &Task, today: NaiveDate) -> Option<i64> {
    task.due_date.map(|due| day_delta(today, due))
}

pub fn urgency_score(task: &Task, today: NaiveDate) -> u8 {
    match days_until_due(task, today) {
        None => 0,
        Some(d) if d < 0 => 4,
        Some(d) if d <= 1 => 3,
        Some(d) if d <= 3 => 2,
        Some(d) if d <= 7 => 1,
        Some(_) => 0,
    }
}

pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.due_date.is_some_and(|due| due < today)
}

/// Display bucket for a task's due date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DueStatus {
    Overdue(i64),
    DueToday,
    DueTomorrow,
    DueIn(i64),
}

pub fn due_status(task: &Task, today: NaiveDate) -> Option<DueStatus> {
    let days = days_until_due(task, today)?;
    Some(match days {
        d if d < 0 => DueStatus::Overdue(-d),
        0 => DueStatus::DueToday,
        1 => DueStatus::DueTomorrow,
        d => DueStatus::DueIn(d),
    })
}
