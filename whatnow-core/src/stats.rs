//! Aggregate stats and the completed-task log.
//!
//! Both histories are bounded; when full, the oldest entries are evicted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Newest point-earning events kept in [`Stats::points_history`].
pub const POINTS_HISTORY_CAP: usize = 100;
/// Newest completions kept in the completed log.
pub const COMPLETED_LOG_CAP: usize = 200;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsEvent {
    pub date: DateTime<Utc>,
    pub points: u32,
    pub task_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    pub points: u32,
    /// Minutes; `None` when a timer ran for zero seconds.
    #[serde(default)]
    pub time_spent: Option<u32>,
    pub completed_at: DateTime<Utc>,
}

/// What a single completion adds to [`Stats`].
#[derive(Debug, Clone, PartialEq)]
pub struct StatsDelta {
    pub completed: u32,
    pub points: u32,
    pub minutes: Option<u32>,
    pub history: PointsEvent,
}

/// One record per user, created zeroed.
///
/// Fields missing from older stored records default to zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stats {
    pub completed: u32,
    pub skipped: u32,
    pub total_points: u32,
    /// Minutes.
    pub total_time_spent: u32,
    pub points_history: Vec<PointsEvent>,
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply_completion(&mut self, delta: &StatsDelta) {
        self.completed = self.completed.saturating_add(delta.completed);
        self.add_points(delta.history.clone());
        if let Some(m) = delta.minutes {
            self.total_time_spent = self.total_time_spent.saturating_add(m);
        }
    }

    pub fn record_skip(&mut self) {
        self.skipped = self.skipped.saturating_add(1);
    }

    pub fn add_points(&mut self, event: PointsEvent) {
        self.total_points = self.total_points.saturating_add(event.points);
        push_bounded(&mut self.points_history, event, POINTS_HISTORY_CAP);
    }
}

/// Append to the completed log, keeping the newest [`COMPLETED_LOG_CAP`].
pub fn append_completed(log: &mut Vec<CompletedEntry>, entry: CompletedEntry) {
    push_bounded(log, entry, COMPLETED_LOG_CAP);
}

/// Push and evict from the front until `cap` holds.
pub fn push_bounded<T>(list: &mut Vec<T>, item: T, cap: usize) {
    list.push(item);
    if list.len() > cap {
        let excess = list.len() - cap;
        list.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(i: u32) -> PointsEvent {
        PointsEvent {
            date: Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap(),
            points: 15,
            task_name: format!("task {i}"),
        }
    }

    fn entry(i: u32) -> CompletedEntry {
        CompletedEntry {
            id: format!("cpl_{i}"),
            name: format!("task {i}"),
            kind: "Chores".into(),
            points: 15,
            time_spent: Some(5),
            completed_at: Utc.with_ymd_and_hms(2025, 6, 15, 9, 0, 0).unwrap(),
        }
    }

    #[test]
    fn points_history_evicts_oldest() {
        let mut stats = Stats::new();
        for i in 0..105 {
            stats.add_points(event(i));
        }
        assert_eq!(stats.points_history.len(), 100);
        assert_eq!(stats.points_history[0].task_name, "task 5");
        assert_eq!(stats.points_history[99].task_name, "task 104");
        assert_eq!(stats.total_points, 105 * 15);
    }

    #[test]
    fn completed_log_evicts_oldest() {
        let mut log = Vec::new();
        for i in 0..205 {
            append_completed(&mut log, entry(i));
        }
        assert_eq!(log.len(), 200);
        assert_eq!(log[0].id, "cpl_5");
        assert_eq!(log[199].id, "cpl_204");
    }

    #[test]
    fn apply_completion_updates_totals() {
        let mut stats = Stats::new();
        stats.apply_completion(&StatsDelta {
            completed: 1,
            points: 15,
            minutes: Some(7),
            history: event(0),
        });
        stats.apply_completion(&StatsDelta {
            completed: 1,
            points: 15,
            minutes: None,
            history: event(1),
        });
        stats.record_skip();
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.total_points, 30);
        assert_eq!(stats.total_time_spent, 7);
        assert_eq!(stats.skipped, 1);
    }

    #[test]
    fn old_stats_records_load_with_zeroed_fields() {
        let stats: Stats = serde_json::from_str(r#"{"completed": 4, "skipped": 2}"#).unwrap();
        assert_eq!(stats.completed, 4);
        assert_eq!(stats.total_points, 0);
        assert!(stats.points_history.is_empty());
    }
}
