//! Task matcher: filter by the user's current state, then rank.
//!
//! Algorithm (deterministic until presentation):
//! 1) keep tasks whose energy and social cost the user can cover, and whose
//!    time cost fits the available minutes (absent filter = no constraint)
//! 2) stable sort by urgency DESC, then times_skipped DESC (surface tasks the
//!    user keeps avoiding), then times_shown ASC
//! 3) if nothing matched, offer built-in fallbacks under the same filters
//! 4) presentation: urgent tasks (score >= 2) first, the rest shuffled

use chrono::NaiveDate;
use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::fallback::synthetic_id;
use crate::task::{Level, Suggestion, Task};
use crate::urgency::{URGENT_THRESHOLD, urgency_score};

/// The user's current state. `None` on a dimension matches everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filters {
    pub energy: Option<Level>,
    pub social: Option<Level>,
    /// Minutes available.
    pub time: Option<u32>,
}

impl Filters {
    pub fn new(energy: Option<Level>, social: Option<Level>, time: Option<u32>) -> Self {
        Self { energy, social, time }
    }

    /// Capacity must meet or exceed the task's requirement on every
    /// constrained dimension. A task with an unspecified level or time never
    /// fits a constrained dimension. A time budget of 0 means no budget.
    pub fn admits(&self, task: &Task) -> bool {
        covers(self.energy, task.energy) && covers(self.social, task.social) && self.fits_time(task)
    }

    fn fits_time(&self, task: &Task) -> bool {
        match self.time.filter(|&minutes| minutes > 0) {
            None => true,
            Some(minutes) => task.time.is_some_and(|needed| minutes >= needed),
        }
    }
}

fn covers(capacity: Option<Level>, required: Option<Level>) -> bool {
    match (capacity, required) {
        (None, _) => true,
        (Some(cap), Some(req)) => cap.rank() >= req.rank(),
        (Some(_), None) => false,
    }
}

pub fn find_matching_tasks(filters: &Filters, tasks: &[Task], today: NaiveDate) -> Vec<Task> {
    let mut matching: Vec<Task> = tasks.iter().filter(|t| filters.admits(t)).cloned().collect();

    // sort_by is stable, so equal keys keep collection order.
    matching.sort_by(|a, b| {
        urgency_score(b, today)
            .cmp(&urgency_score(a, today))
            .then_with(|| b.times_skipped.cmp(&a.times_skipped))
            .then_with(|| a.times_shown.cmp(&b.times_shown))
    });

    matching
}

/// Built-ins that fit `filters`, each with a fresh synthetic id.
pub fn get_fallback_tasks<R: Rng + ?Sized>(
    filters: &Filters,
    builtins: &[Task],
    rng: &mut R,
) -> Vec<Suggestion> {
    builtins
        .iter()
        .filter(|t| filters.admits(t))
        .map(|t| {
            let mut task = t.clone();
            task.id = synthetic_id(rng);
            Suggestion::Fallback(task)
        })
        .collect()
}

/// Urgent suggestions keep their ranked order at the front; the rest are
/// uniformly shuffled behind them.
pub fn presentation_order<R: Rng + ?Sized>(
    ranked: Vec<Suggestion>,
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Suggestion> {
    let (urgent, mut rest): (Vec<Suggestion>, Vec<Suggestion>) = ranked
        .into_iter()
        .partition(|s| urgency_score(s.task(), today) >= URGENT_THRESHOLD);

    rest.shuffle(rng);

    let mut out = urgent;
    out.extend(rest);
    out
}

/// Full pipeline: match, fall back when empty, order for presentation.
///
/// An empty result means there is nothing to suggest.
pub fn suggest<R: Rng + ?Sized>(
    filters: &Filters,
    tasks: &[Task],
    builtins: &[Task],
    today: NaiveDate,
    rng: &mut R,
) -> Vec<Suggestion> {
    let matched = find_matching_tasks(filters, tasks, today);
    let ranked = if matched.is_empty() {
        get_fallback_tasks(filters, builtins, rng)
    } else {
        matched.into_iter().map(Suggestion::Owned).collect()
    };
    presentation_order(ranked, today, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fallback::builtin_tasks;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn due(days: u64) -> NaiveDate {
        today().checked_add_days(Days::new(days)).unwrap()
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn no_filters_sorts_by_urgency_then_skips_then_shown() {
        let tasks = vec![
            Task::new("plain", "no due").with_counters(0, 0, 0),
            Task::new("week", "due in 5").with_due_date(due(5)),
            Task::new("shown_a_lot", "no due").with_counters(9, 0, 0),
            Task::new("avoided", "no due").with_counters(4, 3, 0),
            Task::new("today", "due today").with_due_date(due(0)),
        ];

        let out = find_matching_tasks(&Filters::default(), &tasks, today());
        assert_eq!(ids(&out), vec!["today", "week", "avoided", "plain", "shown_a_lot"]);
    }

    #[test]
    fn energy_and_social_are_capacity_checks() {
        let hard = Task::new("hard", "hard").with_energy(Level::High);
        let easy = Task::new("easy", "easy").with_energy(Level::Low);
        let chatty = Task::new("chatty", "chatty").with_social(Level::High);
        let tasks = vec![hard, easy, chatty];

        let low = Filters::new(Some(Level::Low), None, None);
        assert_eq!(ids(&find_matching_tasks(&low, &tasks, today())), vec!["easy", "chatty"]);

        let high = Filters::new(Some(Level::High), None, None);
        assert_eq!(find_matching_tasks(&high, &tasks, today()).len(), 3);

        let quiet = Filters::new(None, Some(Level::Medium), None);
        assert_eq!(ids(&find_matching_tasks(&quiet, &tasks, today())), vec!["hard", "easy"]);
    }

    #[test]
    fn time_budget_must_cover_task() {
        let tasks = vec![
            Task::new("short", "s").with_time(15),
            Task::new("long", "l").with_time(60),
        ];
        let f = Filters::new(None, None, Some(30));
        assert_eq!(ids(&find_matching_tasks(&f, &tasks, today())), vec!["short"]);
        let f = Filters::new(None, None, Some(60));
        assert_eq!(find_matching_tasks(&f, &tasks, today()).len(), 2);
    }

    #[test]
    fn zero_budget_is_unconstrained() {
        let tasks = vec![Task::new("long", "l").with_time(60)];
        let f = Filters::new(None, None, Some(0));
        assert_eq!(ids(&find_matching_tasks(&f, &tasks, today())), vec!["long"]);
    }

    #[test]
    fn unknown_time_only_matches_without_a_budget() {
        let mut t = Task::new("vague", "v");
        t.time = None;
        let tasks = vec![t];
        assert!(find_matching_tasks(&Filters::new(None, None, Some(60)), &tasks, today()).is_empty());
        assert_eq!(find_matching_tasks(&Filters::default(), &tasks, today()).len(), 1);
    }

    #[test]
    fn unspecified_task_level_fails_a_set_filter() {
        let mut t = Task::new("odd", "odd");
        t.energy = None;
        let tasks = vec![t];
        assert!(find_matching_tasks(&Filters::new(Some(Level::High), None, None), &tasks, today()).is_empty());
        assert_eq!(find_matching_tasks(&Filters::default(), &tasks, today()).len(), 1);
    }

    #[test]
    fn fallbacks_respect_filters_and_get_fresh_ids() {
        let mut rng = rand::thread_rng();
        let builtins = builtin_tasks();

        let f = Filters::new(Some(Level::Low), Some(Level::Low), Some(5));
        let first = get_fallback_tasks(&f, &builtins, &mut rng);
        assert!(!first.is_empty());
        assert!(first.iter().all(|s| s.is_fallback()));
        assert!(first.iter().all(|s| s.task().time.is_some_and(|m| m <= 5) && s.task().social == Some(Level::Low)));

        let second = get_fallback_tasks(&f, &builtins, &mut rng);
        assert_eq!(first.len(), second.len());
        assert_ne!(first[0].id(), second[0].id());
    }

    #[test]
    fn presentation_keeps_urgent_first() {
        let mut rng = rand::thread_rng();
        let mut tasks = vec![
            Task::new("overdue", "o").with_due_date(today().checked_sub_days(Days::new(2)).unwrap()),
            Task::new("soon", "s").with_due_date(due(3)),
        ];
        for i in 0..10 {
            tasks.push(Task::new(format!("n{i}"), "n"));
        }

        for _ in 0..20 {
            let out = suggest(&Filters::default(), &tasks, &[], today(), &mut rng);
            assert_eq!(out.len(), 12);
            assert_eq!(out[0].id(), "overdue");
            assert_eq!(out[1].id(), "soon");
            assert!(out.iter().all(|s| !s.is_fallback()));
        }
    }

    #[test]
    fn suggest_falls_back_then_may_be_empty() {
        let mut rng = rand::thread_rng();
        let tasks = vec![Task::new("hard", "hard").with_energy(Level::High)];
        let builtins = builtin_tasks();

        let f = Filters::new(Some(Level::Low), None, None);
        let out = suggest(&f, &tasks, &builtins, today(), &mut rng);
        assert!(!out.is_empty());
        assert!(out.iter().all(|s| s.is_fallback()));

        let nothing_fits = Filters::new(None, None, Some(1));
        assert!(suggest(&nothing_fits, &tasks, &builtins, today(), &mut rng).is_empty());
    }
}
