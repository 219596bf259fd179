//! Task lifecycle: the effects of accepting, skipping and completing.
//!
//! `Active -> Shown -> (Skipped -> Active) | (Accepted -> Completed)`.
//!
//! Completion branches on recurrence and due date:
//! - recurring: counters + points, due date advanced, task stays
//! - one-shot (no recurrence, due date): task removed
//! - reusable (no recurrence, no due date): counters + points, task stays
//!
//! These are pure functions over task records; persistence belongs to the
//! caller (see [`crate::service`]).

use chrono::{DateTime, NaiveDate, Utc};

use crate::recurrence::next_due_date;
use crate::scoring::calculate_points;
use crate::stats::{CompletedEntry, PointsEvent, StatsDelta};
use crate::task::{Suggestion, Task};

/// Surfaced and taken on: times-shown + 1.
pub fn accept_task(task: &Task) -> Task {
    let mut t = task.clone();
    t.times_shown = t.times_shown.saturating_add(1);
    t
}

/// Surfaced and passed over: times-shown + 1, times-skipped + 1.
pub fn skip_task(task: &Task) -> Task {
    let mut t = accept_task(task);
    t.times_skipped = t.times_skipped.saturating_add(1);
    t
}

/// What happens to the task record after a completion.
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// Updated record to write back.
    Retained(Task),
    /// One-shot task fulfilled; delete it from the collection.
    Removed { id: String },
    /// Fallback suggestion; there is no record to touch.
    Untracked,
}

impl TaskOutcome {
    pub fn updated(&self) -> Option<&Task> {
        match self {
            TaskOutcome::Retained(t) => Some(t),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub outcome: TaskOutcome,
    pub points: u32,
    pub stats_delta: StatsDelta,
    pub log_entry: CompletedEntry,
}

/// Minutes to credit for a completion.
///
/// With a timer: ⌈seconds / 60⌉, or `None` if it never ticked.
/// Without one: the task's nominal time cost, if it has one.
pub fn minutes_spent(task: &Task, timer_seconds: Option<u32>) -> Option<u32> {
    match timer_seconds {
        Some(0) => None,
        Some(secs) => Some(secs.div_ceil(60)),
        None => task.time,
    }
}

pub fn complete_task(
    suggestion: &Suggestion,
    timer_seconds: Option<u32>,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Completion {
    let task = suggestion.task();
    let points = calculate_points(task);

    let outcome = match suggestion {
        Suggestion::Fallback(_) => TaskOutcome::Untracked,
        Suggestion::Owned(t) if t.is_one_shot() => TaskOutcome::Removed { id: t.id.clone() },
        Suggestion::Owned(t) => {
            let mut updated = t.clone();
            updated.times_completed = updated.times_completed.saturating_add(1);
            updated.points_earned = updated.points_earned.saturating_add(points);
            if t.recurring.is_recurring() {
                updated.due_date = next_due_date(t, today);
            }
            TaskOutcome::Retained(updated)
        }
    };

    let minutes = minutes_spent(task, timer_seconds);

    let stats_delta = StatsDelta {
        completed: 1,
        points,
        minutes,
        history: PointsEvent {
            date: now,
            points,
            task_name: task.name.clone(),
        },
    };

    let log_entry = CompletedEntry {
        id: format!("cpl_{}", now.timestamp_millis()),
        name: task.name.clone(),
        kind: task.kind.clone(),
        points,
        time_spent: minutes,
        completed_at: now,
    };

    Completion {
        outcome,
        points,
        stats_delta,
        log_entry,
    }
}
