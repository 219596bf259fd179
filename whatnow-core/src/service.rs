//! WhatNow service: ties the matcher, lifecycle and stats to a store.
//!
//! One instance per process owns the store and the clock. Every mutation
//! persists locally first and only then queues a [`SyncEffect`]; callers
//! drain the queue with [`WhatNow::take_effects`] and dispatch it however
//! they like.
//!
//! Missing tasks (deleted elsewhere, or already fulfilled one-shots) turn
//! accept/skip/complete into logged no-ops returning `Ok(None)`.

use chrono::NaiveDate;
use rand::Rng;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::fallback::builtin_tasks;
use crate::lifecycle::{Completion, TaskOutcome, accept_task, complete_task, skip_task};
use crate::matcher::{Filters, suggest};
use crate::scoring::{Rank, get_rank};
use crate::stats::{CompletedEntry, Stats, append_completed};
use crate::store::{self, CollectionStore, load_list, load_record, save};
use crate::sync::{ProfileSnapshot, SyncEffect};
use crate::task::{Suggestion, Task};
use crate::template::{Template, template_id};
use crate::time::{Clock, SystemClock};
use crate::urgency::is_overdue;

pub const DEFAULT_TYPES: [&str; 8] = [
    "Chores",
    "Work",
    "Health",
    "Admin",
    "Errand",
    "Self-care",
    "Creative",
    "Social",
];

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionReport {
    pub completion: Completion,
    pub previous_rank: &'static Rank,
    pub rank: &'static Rank,
    pub stats: Stats,
}

impl CompletionReport {
    pub fn leveled_up(&self) -> bool {
        self.rank.name != self.previous_rank.name
    }
}

#[derive(Debug)]
pub struct WhatNow<S: CollectionStore, C: Clock = SystemClock> {
    store: S,
    clock: C,
    builtins: Vec<Task>,
    outbox: Vec<SyncEffect>,
}

impl<S: CollectionStore> WhatNow<S, SystemClock> {
    pub fn open(store: S) -> Self {
        Self::new(store, SystemClock)
    }
}

impl<S: CollectionStore, C: Clock> WhatNow<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self {
            store,
            clock,
            builtins: builtin_tasks(),
            outbox: Vec::new(),
        }
    }

    pub fn with_builtins(mut self, builtins: Vec<Task>) -> Self {
        self.builtins = builtins;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Drain queued sync effects, oldest first.
    pub fn take_effects(&mut self) -> Vec<SyncEffect> {
        std::mem::take(&mut self.outbox)
    }

    // ---- tasks ----

    pub fn tasks(&self) -> Result<Vec<Task>> {
        load_list(&self.store, store::TASKS)
    }

    pub fn task(&self, id: &str) -> Result<Option<Task>> {
        Ok(self.tasks()?.into_iter().find(|t| t.id == id))
    }

    /// Store a new task. Id, creation time and counters are assigned here.
    pub fn add_task(&mut self, draft: Task) -> Result<Task> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidTask("name must not be empty".into()));
        }

        let task = Task {
            id: Uuid::new_v4().to_string(),
            name,
            times_shown: 0,
            times_skipped: 0,
            times_completed: 0,
            points_earned: 0,
            created: Some(self.clock.now()),
            ..draft
        };

        let mut tasks = self.tasks()?;
        tasks.push(task.clone());
        save(&mut self.store, store::TASKS, &tasks)?;
        debug!(id = %task.id, name = %task.name, "task added");

        self.outbox.push(SyncEffect::AddTask(task.clone()));
        Ok(task)
    }

    /// Edit a task in place. Id and counters cannot be changed this way.
    pub fn update_task(&mut self, id: &str, edit: impl FnOnce(&mut Task)) -> Result<Option<Task>> {
        let mut tasks = self.tasks()?;
        let Some(slot) = tasks.iter_mut().find(|t| t.id == id) else {
            warn!(id, "update: task not found");
            return Ok(None);
        };

        let before = slot.clone();
        edit(slot);
        slot.id = before.id;
        slot.times_shown = before.times_shown;
        slot.times_skipped = before.times_skipped;
        slot.times_completed = before.times_completed;
        slot.points_earned = before.points_earned;
        slot.created = before.created;
        if slot.name.trim().is_empty() {
            return Err(CoreError::InvalidTask("name must not be empty".into()));
        }

        let updated = slot.clone();
        save(&mut self.store, store::TASKS, &tasks)?;
        debug!(id, "task updated");

        self.outbox.push(SyncEffect::UpdateTask(updated.clone()));
        Ok(Some(updated))
    }

    /// Returns whether anything was removed.
    pub fn delete_task(&mut self, id: &str) -> Result<bool> {
        let mut tasks = self.tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            warn!(id, "delete: task not found");
            return Ok(false);
        }

        save(&mut self.store, store::TASKS, &tasks)?;
        self.clear_current_if(id)?;
        debug!(id, "task deleted");

        self.outbox.push(SyncEffect::DeleteTask { id: id.to_string() });
        Ok(true)
    }

    // ---- task types ----

    pub fn task_types(&self) -> Result<Vec<String>> {
        let stored: Option<Vec<String>> = load_record(&self.store, store::TYPES)?;
        Ok(stored.unwrap_or_else(|| DEFAULT_TYPES.iter().map(|s| s.to_string()).collect()))
    }

    pub fn add_task_type(&mut self, kind: &str) -> Result<Vec<String>> {
        let kind = kind.trim();
        let mut types = self.task_types()?;
        if !kind.is_empty() && !types.iter().any(|t| t == kind) {
            types.push(kind.to_string());
            save(&mut self.store, store::TYPES, &types)?;
        }
        Ok(types)
    }

    pub fn remove_task_type(&mut self, kind: &str) -> Result<Vec<String>> {
        let mut types = self.task_types()?;
        types.retain(|t| t != kind);
        save(&mut self.store, store::TYPES, &types)?;
        Ok(types)
    }

    // ---- templates ----

    pub fn templates(&self) -> Result<Vec<Template>> {
        load_list(&self.store, store::TEMPLATES)
    }

    /// Store a preset. Id and creation time are assigned here.
    pub fn add_template(&mut self, template: Template) -> Result<Template> {
        let name = template.name.trim().to_string();
        if name.is_empty() {
            return Err(CoreError::InvalidTask("template name must not be empty".into()));
        }

        let mut templates = self.templates()?;
        let now = self.clock.now();
        let template = Template {
            id: template_id(now, &templates),
            name,
            created: Some(now),
            ..template
        };
        templates.push(template.clone());
        save(&mut self.store, store::TEMPLATES, &templates)?;
        debug!(id = %template.id, name = %template.name, "template added");
        Ok(template)
    }

    /// Returns whether anything was removed.
    pub fn delete_template(&mut self, id: &str) -> Result<bool> {
        let mut templates = self.templates()?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            warn!(id, "delete template: not found");
            return Ok(false);
        }
        save(&mut self.store, store::TEMPLATES, &templates)?;
        debug!(id, "template deleted");
        Ok(true)
    }

    /// Create a task pre-filled from a template. `edit` may override any
    /// field before the task is stored. `Ok(None)` if the template is gone.
    pub fn add_task_from_template(&mut self, id: &str, edit: impl FnOnce(&mut Task)) -> Result<Option<Task>> {
        let Some(template) = self.templates()?.into_iter().find(|t| t.id == id) else {
            warn!(id, "template not found");
            return Ok(None);
        };
        let mut draft = template.to_draft();
        edit(&mut draft);
        self.add_task(draft).map(Some)
    }

    // ---- suggestions ----

    /// The accepted suggestion still waiting to be completed or skipped.
    pub fn current(&self) -> Result<Option<Suggestion>> {
        load_record(&self.store, store::CURRENT)
    }

    pub fn suggest(&self, filters: &Filters) -> Result<Vec<Suggestion>> {
        self.suggest_with_rng(filters, &mut rand::thread_rng())
    }

    /// Matching is not re-run while an accepted suggestion is pending; that
    /// suggestion is returned alone.
    pub fn suggest_with_rng<R: Rng + ?Sized>(&self, filters: &Filters, rng: &mut R) -> Result<Vec<Suggestion>> {
        if let Some(current) = self.current()? {
            debug!(id = current.id(), "suggest: current candidate still pending");
            return Ok(vec![current]);
        }

        let tasks = self.tasks()?;
        let out = suggest(filters, &tasks, &self.builtins, self.clock.today(), rng);
        debug!(
            candidates = out.len(),
            fallback = out.first().is_some_and(Suggestion::is_fallback),
            "suggest"
        );
        Ok(out)
    }

    /// Resolve an owned task id into a suggestion carrying the stored record.
    pub fn owned(&self, id: &str) -> Result<Option<Suggestion>> {
        Ok(self.task(id)?.map(Suggestion::Owned))
    }

    /// Look up a built-in by name (case-insensitive) as a fresh fallback.
    pub fn fallback_named(&self, name: &str) -> Option<Suggestion> {
        let mut rng = rand::thread_rng();
        self.builtins
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name.trim()))
            .map(|t| {
                let mut task = t.clone();
                task.id = crate::fallback::synthetic_id(&mut rng);
                Suggestion::Fallback(task)
            })
    }

    /// Take a suggestion on: times-shown + 1, and it becomes current.
    pub fn accept(&mut self, suggestion: &Suggestion) -> Result<Option<Suggestion>> {
        let accepted = match suggestion {
            Suggestion::Fallback(t) => Suggestion::Fallback(t.clone()),
            Suggestion::Owned(t) => {
                let Some(updated) = self.mutate_task(&t.id, accept_task)? else {
                    warn!(id = %t.id, "accept: task not found");
                    return Ok(None);
                };
                self.outbox.push(SyncEffect::UpdateTask(updated.clone()));
                Suggestion::Owned(updated)
            }
        };

        save(&mut self.store, store::CURRENT, &accepted)?;
        debug!(id = accepted.id(), "accepted");
        Ok(Some(accepted))
    }

    /// Pass on a suggestion: times-shown + 1, times-skipped + 1, and the
    /// global skipped count goes up.
    pub fn skip(&mut self, suggestion: &Suggestion) -> Result<Option<Suggestion>> {
        let skipped = match suggestion {
            Suggestion::Fallback(t) => Suggestion::Fallback(t.clone()),
            Suggestion::Owned(t) => {
                let Some(updated) = self.mutate_task(&t.id, skip_task)? else {
                    warn!(id = %t.id, "skip: task not found");
                    self.clear_current_if(&t.id)?;
                    return Ok(None);
                };
                self.outbox.push(SyncEffect::UpdateTask(updated.clone()));
                Suggestion::Owned(updated)
            }
        };

        let mut stats = self.stats()?;
        stats.record_skip();
        save(&mut self.store, store::STATS, &stats)?;
        self.clear_current_if(skipped.id())?;

        debug!(id = skipped.id(), "skipped");
        Ok(Some(skipped))
    }

    /// Complete a suggestion. `timer_seconds` is `Some` when a focus timer
    /// was used for it.
    pub fn complete(&mut self, suggestion: &Suggestion, timer_seconds: Option<u32>) -> Result<Option<CompletionReport>> {
        // Work from the stored record, not a possibly stale copy.
        let target = match suggestion {
            Suggestion::Fallback(_) => suggestion.clone(),
            Suggestion::Owned(t) => match self.task(&t.id)? {
                Some(stored) => Suggestion::Owned(stored),
                None => {
                    warn!(id = %t.id, "complete: task not found");
                    self.clear_current_if(&t.id)?;
                    return Ok(None);
                }
            },
        };

        let completion = complete_task(&target, timer_seconds, self.clock.today(), self.clock.now());

        let mut tasks = self.tasks()?;
        let task_effect = match &completion.outcome {
            TaskOutcome::Retained(updated) => {
                if let Some(slot) = tasks.iter_mut().find(|t| t.id == updated.id) {
                    *slot = updated.clone();
                }
                Some(SyncEffect::UpdateTask(updated.clone()))
            }
            TaskOutcome::Removed { id } => {
                tasks.retain(|t| &t.id != id);
                Some(SyncEffect::DeleteTask { id: id.clone() })
            }
            TaskOutcome::Untracked => None,
        };
        if task_effect.is_some() {
            save(&mut self.store, store::TASKS, &tasks)?;
        }

        let mut stats = self.stats()?;
        let previous_rank = get_rank(stats.total_points);
        stats.apply_completion(&completion.stats_delta);
        let rank = get_rank(stats.total_points);
        save(&mut self.store, store::STATS, &stats)?;

        let mut log = self.completed_log()?;
        append_completed(&mut log, completion.log_entry.clone());
        save(&mut self.store, store::COMPLETED, &log)?;

        self.clear_current_if(target.id())?;

        self.outbox.extend(task_effect);
        self.outbox.push(SyncEffect::LogCompleted(completion.log_entry.clone()));
        self.outbox.push(SyncEffect::UpdateProfile(ProfileSnapshot::from_stats(&stats)));

        info!(
            task = %target.task().name,
            points = completion.points,
            total = stats.total_points,
            rank = rank.name,
            "task completed"
        );
        if rank.name != previous_rank.name {
            info!(from = previous_rank.name, to = rank.name, "rank up");
        }

        Ok(Some(CompletionReport {
            completion,
            previous_rank,
            rank,
            stats,
        }))
    }

    // ---- stats ----

    pub fn stats(&self) -> Result<Stats> {
        Ok(load_record(&self.store, store::STATS)?.unwrap_or_default())
    }

    pub fn completed_log(&self) -> Result<Vec<CompletedEntry>> {
        load_list(&self.store, store::COMPLETED)
    }

    /// Overdue tasks, computed from the stored collection on every call.
    pub fn overdue_tasks(&self) -> Result<Vec<Task>> {
        let today = self.clock.today();
        Ok(self.tasks()?.into_iter().filter(|t| is_overdue(t, today)).collect())
    }

    pub fn overdue_count(&self) -> Result<usize> {
        self.overdue_tasks().map(|t| t.len())
    }

    // ---- internals ----

    fn mutate_task(&mut self, id: &str, f: impl FnOnce(&Task) -> Task) -> Result<Option<Task>> {
        let mut tasks = self.tasks()?;
        let Some(slot) = tasks.iter_mut().find(|t| t.id == id) else {
            return Ok(None);
        };
        *slot = f(&*slot);
        let updated = slot.clone();
        save(&mut self.store, store::TASKS, &tasks)?;
        Ok(Some(updated))
    }

    fn clear_current_if(&mut self, id: &str) -> Result<()> {
        if self.current()?.is_some_and(|c| c.id() == id) {
            save(&mut self.store, store::CURRENT, &serde_json::Value::Null)?;
        }
        Ok(())
    }
}
