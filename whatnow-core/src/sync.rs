//! Remote mirror effects.
//!
//! The core never talks to the network. Each successful local mutation
//! queues a [`SyncEffect`]; an outer layer drains the queue and hands the
//! effects to a [`SyncSink`]. Delivery is best-effort: a failing sink is
//! logged and never rolls back or blocks local state.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::scoring::get_rank;
use crate::stats::{CompletedEntry, Stats};
use crate::task::Task;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    pub total_points: u32,
    pub total_tasks_completed: u32,
    pub total_time_spent: u32,
    pub current_rank: String,
}

impl ProfileSnapshot {
    pub fn from_stats(stats: &Stats) -> Self {
        Self {
            total_points: stats.total_points,
            total_tasks_completed: stats.completed,
            total_time_spent: stats.total_time_spent,
            current_rank: get_rank(stats.total_points).name.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "payload", rename_all = "snake_case")]
pub enum SyncEffect {
    AddTask(Task),
    /// Full record after the local write.
    UpdateTask(Task),
    DeleteTask { id: String },
    LogCompleted(CompletedEntry),
    UpdateProfile(ProfileSnapshot),
}

impl SyncEffect {
    pub fn op(&self) -> &'static str {
        match self {
            SyncEffect::AddTask(_) => "add_task",
            SyncEffect::UpdateTask(_) => "update_task",
            SyncEffect::DeleteTask { .. } => "delete_task",
            SyncEffect::LogCompleted(_) => "log_completed",
            SyncEffect::UpdateProfile(_) => "update_profile",
        }
    }
}

pub type SinkError = Box<dyn std::error::Error + Send + Sync>;

pub trait SyncSink {
    /// Fire-and-forget. Implementations must not block on the remote.
    fn enqueue_sync(&mut self, effect: SyncEffect) -> Result<(), SinkError>;
}

/// Drops everything; used when sync is disabled.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl SyncSink for NullSink {
    fn enqueue_sync(&mut self, _effect: SyncEffect) -> Result<(), SinkError> {
        Ok(())
    }
}

/// Keeps effects in memory, for embedding and tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub effects: Vec<SyncEffect>,
}

impl SyncSink for RecordingSink {
    fn enqueue_sync(&mut self, effect: SyncEffect) -> Result<(), SinkError> {
        self.effects.push(effect);
        Ok(())
    }
}

/// Hand every effect to `sink`. Failures are logged and skipped.
/// Returns how many were accepted.
pub fn dispatch<S: SyncSink + ?Sized>(effects: Vec<SyncEffect>, sink: &mut S) -> usize {
    let mut accepted = 0;
    for effect in effects {
        let op = effect.op();
        match sink.enqueue_sync(effect) {
            Ok(()) => {
                debug!(op, "sync effect queued");
                accepted += 1;
            }
            Err(e) => warn!(op, error = %e, "sync effect dropped"),
        }
    }
    accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingSink;

    impl SyncSink for FailingSink {
        fn enqueue_sync(&mut self, _effect: SyncEffect) -> Result<(), SinkError> {
            Err("remote unavailable".into())
        }
    }

    #[test]
    fn failures_are_swallowed() {
        let effects = vec![
            SyncEffect::DeleteTask { id: "a".into() },
            SyncEffect::DeleteTask { id: "b".into() },
        ];
        assert_eq!(dispatch(effects, &mut FailingSink), 0);
    }

    #[test]
    fn recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        let effects = vec![
            SyncEffect::AddTask(Task::new("a", "a")),
            SyncEffect::DeleteTask { id: "a".into() },
        ];
        assert_eq!(dispatch(effects, &mut sink), 2);
        assert_eq!(sink.effects[0].op(), "add_task");
        assert_eq!(sink.effects[1].op(), "delete_task");
    }

    #[test]
    fn serializes_with_op_tag() {
        let json = serde_json::to_value(SyncEffect::DeleteTask { id: "a".into() }).unwrap();
        assert_eq!(json["op"], "delete_task");
        assert_eq!(json["payload"]["id"], "a");
    }

    #[test]
    fn profile_carries_rank_name() {
        let stats = Stats {
            total_points: 120,
            completed: 6,
            ..Stats::default()
        };
        let p = ProfileSnapshot::from_stats(&stats);
        assert_eq!(p.current_rank, "Task Apprentice");
        assert_eq!(p.total_tasks_completed, 6);
    }
}
