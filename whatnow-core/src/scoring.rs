//! Points and rank progression.
//!
//! Points per completion: `time + social + energy`, ranging from 15
//! (5 min / low / low) to 65 (60 min / high / high) for the supported costs.

use serde::Serialize;

use crate::task::{Level, Task};

/// Points for a time cost; anything outside 5/15/30/60 scores 10, as does
/// an unknown time (see [`calculate_points`]).
pub fn time_points(minutes: u32) -> u32 {
    match minutes {
        5 => 5,
        15 => 10,
        30 => 15,
        60 => 25,
        _ => 10,
    }
}

/// Points for a social or energy level; unspecified scores 5.
pub fn level_points(level: Option<Level>) -> u32 {
    match level {
        Some(Level::Low) => 5,
        Some(Level::Medium) => 10,
        Some(Level::High) => 20,
        None => 5,
    }
}

pub fn calculate_points(task: &Task) -> u32 {
    task.time.map_or(10, time_points) + level_points(task.social) + level_points(task.energy)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Rank {
    pub name: &'static str,
    pub min_points: u32,
}

/// Ascending by `min_points`, starting at 0.
pub const RANKS: [Rank; 6] = [
    Rank { name: "Task Newbie", min_points: 0 },
    Rank { name: "Task Apprentice", min_points: 100 },
    Rank { name: "Task Warrior", min_points: 500 },
    Rank { name: "Task Hero", min_points: 1000 },
    Rank { name: "Task Master", min_points: 2500 },
    Rank { name: "Task Legend", min_points: 5000 },
];

/// Highest tier whose threshold has been reached. Never fails.
pub fn get_rank(total_points: u32) -> &'static Rank {
    RANKS
        .iter()
        .rev()
        .find(|r| total_points >= r.min_points)
        .unwrap_or(&RANKS[0])
}

/// The next tier to unlock, or `None` at max rank.
pub fn get_next_rank(total_points: u32) -> Option<&'static Rank> {
    RANKS.iter().find(|r| total_points < r.min_points)
}

/// Percent (0..=100) of the way from the current tier to the next one.
/// `None` at max rank, where no progress bar is shown.
pub fn rank_progress(total_points: u32) -> Option<u8> {
    let current = get_rank(total_points);
    let next = get_next_rank(total_points)?;
    let span = next.min_points - current.min_points;
    let done = total_points - current.min_points;
    Some(((done as u64 * 100) / span as u64) as u8)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Milestone {
    pub threshold: u32,
    pub text: &'static str,
}

/// Hours-spent milestones for the stats screen.
pub const TIME_MILESTONES: [Milestone; 7] = [
    Milestone { threshold: 1, text: "enough to watch a movie" },
    Milestone { threshold: 5, text: "a full workday of productivity" },
    Milestone { threshold: 10, text: "the time to read a novel" },
    Milestone { threshold: 24, text: "a full day of focus" },
    Milestone { threshold: 50, text: "enough to learn a new skill" },
    Milestone { threshold: 100, text: "the fastest time to cycle around the world... almost!" },
    Milestone { threshold: 200, text: "more than a week of non-stop work" },
];

/// Completed-count milestones for the stats screen.
pub const TASK_MILESTONES: [Milestone; 7] = [
    Milestone { threshold: 10, text: "a playlist of wins" },
    Milestone { threshold: 25, text: "almost a month of daily tasks" },
    Milestone { threshold: 50, text: "a deck of cards worth of tasks" },
    Milestone { threshold: 100, text: "a century of accomplishments" },
    Milestone { threshold: 200, text: "more tasks than days in most years" },
    Milestone { threshold: 365, text: "a full year of daily achievements" },
    Milestone { threshold: 500, text: "half a thousand victories" },
];

/// Highest hours milestone reached by `minutes` of tracked time.
pub fn time_comparison(minutes: u32) -> Option<&'static Milestone> {
    // Compare in minutes so 59 minutes does not round up to an hour.
    TIME_MILESTONES
        .iter()
        .rev()
        .find(|m| minutes >= m.threshold * 60)
}

pub fn task_comparison(count: u32) -> Option<&'static Milestone> {
    TASK_MILESTONES.iter().rev().find(|m| count >= m.threshold)
}
