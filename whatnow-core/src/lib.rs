//! whatnow-core: task matching, scoring and recurrence for the What Now? app.
//!
//! Users log small tasks tagged with time, social and energy costs; the
//! engine suggests ones that fit how they feel right now, awards points on
//! completion and tracks rank progression.

pub mod error;
pub mod fallback;
pub mod lifecycle;
pub mod matcher;
pub mod recurrence;
pub mod scoring;
pub mod service;
pub mod stats;
pub mod store;
pub mod sync;
pub mod task;
pub mod template;
pub mod time;
pub mod timer;
pub mod urgency;

pub use error::{CoreError, Result};
pub use fallback::builtin_tasks;
pub use lifecycle::{Completion, TaskOutcome, accept_task, complete_task, minutes_spent, skip_task};
pub use matcher::{Filters, find_matching_tasks, get_fallback_tasks, presentation_order, suggest};
pub use recurrence::next_due_date;
pub use scoring::{
    Milestone, RANKS, Rank, calculate_points, get_next_rank, get_rank, rank_progress, task_comparison,
    time_comparison,
};
pub use service::{CompletionReport, DEFAULT_TYPES, WhatNow};
pub use stats::{CompletedEntry, PointsEvent, Stats, StatsDelta};
pub use store::{CollectionStore, JsonDirStore, MemoryStore};
pub use sync::{NullSink, ProfileSnapshot, RecordingSink, SyncEffect, SyncSink, dispatch};
pub use task::{Level, Recurrence, Suggestion, TIME_CHOICES, Task};
pub use template::Template;
pub use time::{Clock, FixedClock, SystemClock};
pub use timer::FocusTimer;
pub use urgency::{DueStatus, days_until_due, due_status, is_overdue, urgency_score};
