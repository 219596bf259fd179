//! Task templates: saved name and cost presets that pre-fill a new task.
//!
//! A template carries no schedule and no counters. Due date and recurrence
//! are chosen per task.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::task::{Level, Task, lenient_level, lenient_minutes, lenient_opt_string, lenient_string};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    #[serde(default, deserialize_with = "lenient_string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(
        rename = "desc",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_opt_string"
    )]
    pub description: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_minutes")]
    pub time: Option<u32>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub social: Option<Level>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub energy: Option<Level>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Template {
    /// Capture the preset fields of `task`. Id and creation time are
    /// assigned when the template is stored.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: String::new(),
            name: task.name.clone(),
            description: task.description.clone(),
            kind: task.kind.clone(),
            time: task.time,
            social: task.social,
            energy: task.energy,
            created: None,
        }
    }

    /// A task draft pre-filled from this template.
    pub fn to_draft(&self) -> Task {
        let mut t = Task::new("", self.name.clone());
        t.description = self.description.clone();
        t.kind = self.kind.clone();
        t.time = self.time;
        t.social = self.social;
        t.energy = self.energy;
        t
    }
}

/// `tpl_<millis>`, bumped past any id already in `existing`.
pub fn template_id(now: DateTime<Utc>, existing: &[Template]) -> String {
    let mut millis = now.timestamp_millis();
    loop {
        let id = format!("tpl_{millis}");
        if !existing.iter().any(|t| t.id == id) {
            return id;
        }
        millis += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Recurrence;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn draft_keeps_costs_but_no_schedule() {
        let task = Task::new("t1", "Laundry")
            .with_description("whites")
            .with_type("Chores")
            .with_time(30)
            .with_energy(Level::Medium)
            .with_due_date(NaiveDate::from_ymd_opt(2025, 6, 1).unwrap())
            .with_recurrence(Recurrence::Weekly)
            .with_counters(3, 1, 2);

        let draft = Template::from_task(&task).to_draft();
        assert_eq!(draft.name, "Laundry");
        assert_eq!(draft.description.as_deref(), Some("whites"));
        assert_eq!(draft.kind, "Chores");
        assert_eq!(draft.time, Some(30));
        assert_eq!(draft.energy, Some(Level::Medium));
        assert_eq!(draft.due_date, None);
        assert_eq!(draft.recurring, Recurrence::None);
        assert_eq!(draft.times_completed, 0);
        assert!(draft.id.is_empty());
    }

    #[test]
    fn ids_use_millis_and_never_collide() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 12, 0, 0).unwrap();
        let first = template_id(now, &[]);
        assert_eq!(first, format!("tpl_{}", now.timestamp_millis()));

        let mut taken = Template::from_task(&Task::new("", "a"));
        taken.id = first.clone();
        let second = template_id(now, &[taken]);
        assert_eq!(second, format!("tpl_{}", now.timestamp_millis() + 1));
    }

    #[test]
    fn reads_stored_shape_with_nulls() {
        let json = r#"{"id":"tpl_1","name":"Call mum","desc":null,"type":"Social","time":null,"social":"medium","energy":"low","created":"2025-06-10T12:00:00Z"}"#;
        let t: Template = serde_json::from_str(json).unwrap();
        assert_eq!(t.kind, "Social");
        assert_eq!(t.time, None);
        assert_eq!(t.social, Some(Level::Medium));
        assert!(t.created.is_some());
    }
}
