//! Task model shared by the matcher, scoring and lifecycle code.
//!
//! Field names serialize in camelCase so records written by earlier versions
//! of the app (and the cloud mirror) load unchanged.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Ordinal cost level used for both social battery and energy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    /// low=1, medium=2, high=3.
    pub fn rank(self) -> u8 {
        match self {
            Level::Low => 1,
            Level::Medium => 2,
            Level::High => 3,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Some(Level::Low),
            "medium" => Some(Level::Medium),
            "high" => Some(Level::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Low => "low",
            Level::Medium => "medium",
            Level::High => "high",
        }
    }
}

impl std::fmt::Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Recurrence {
    #[default]
    None,
    Daily,
    Weekly,
    Monthly,
}

impl Recurrence {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "" => Some(Recurrence::None),
            "daily" => Some(Recurrence::Daily),
            "weekly" => Some(Recurrence::Weekly),
            "monthly" => Some(Recurrence::Monthly),
            _ => None,
        }
    }

    pub fn is_recurring(self) -> bool {
        self != Recurrence::None
    }
}

/// Time costs the app offers when creating a task (minutes).
pub const TIME_CHOICES: [u32; 4] = [5, 15, 30, 60];

/// A user-defined unit of work.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
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

    /// Category label; the set is open.
    #[serde(rename = "type", default, deserialize_with = "lenient_string")]
    pub kind: String,

    /// Minutes. `None` when the stored value is missing or not a whole
    /// number; such a task scores the default time points and never fits
    /// a time budget.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_minutes")]
    pub time: Option<u32>,

    /// `None` when the stored value is missing or not a known level.
    #[serde(default, deserialize_with = "lenient_level")]
    pub social: Option<Level>,

    #[serde(default, deserialize_with = "lenient_level")]
    pub energy: Option<Level>,

    /// Accepts a bare date or a full timestamp; anything else reads as unset.
    #[serde(default, skip_serializing_if = "Option::is_none", deserialize_with = "lenient_date")]
    pub due_date: Option<NaiveDate>,

    #[serde(default, deserialize_with = "lenient_recurrence")]
    pub recurring: Recurrence,

    #[serde(default, deserialize_with = "lenient_count")]
    pub times_shown: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub times_skipped: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub times_completed: u32,
    #[serde(default, deserialize_with = "lenient_count")]
    pub points_earned: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
}

impl Task {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            kind: String::new(),
            time: Some(15),
            social: Some(Level::Low),
            energy: Some(Level::Low),
            due_date: None,
            recurring: Recurrence::None,
            times_shown: 0,
            times_skipped: 0,
            times_completed: 0,
            points_earned: 0,
            created: None,
        }
    }

    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn with_type(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_time(mut self, minutes: u32) -> Self {
        self.time = Some(minutes);
        self
    }

    pub fn with_social(mut self, level: Level) -> Self {
        self.social = Some(level);
        self
    }

    pub fn with_energy(mut self, level: Level) -> Self {
        self.energy = Some(level);
        self
    }

    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn with_recurrence(mut self, recurring: Recurrence) -> Self {
        self.recurring = recurring;
        self
    }

    pub fn with_counters(mut self, shown: u32, skipped: u32, completed: u32) -> Self {
        self.times_shown = shown;
        self.times_skipped = skipped;
        self.times_completed = completed;
        self
    }

    /// A non-recurring task with a due date; removed when completed.
    pub fn is_one_shot(&self) -> bool {
        !self.recurring.is_recurring() && self.due_date.is_some()
    }
}

// Records written by older app versions can hold `null` (or a stray string)
// where a number or label belongs. These readers map anything unexpected to
// the field's default instead of rejecting the whole collection.

pub(crate) fn lenient_string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(match raw {
        Some(serde_json::Value::String(s)) => s,
        Some(serde_json::Value::Number(n)) => n.to_string(),
        _ => String::new(),
    })
}

pub(crate) fn lenient_opt_string<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.and_then(|v| match v {
        serde_json::Value::String(s) => Some(s),
        _ => None,
    }))
}

/// Whole minutes from a number or a numeric string.
pub(crate) fn lenient_minutes<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u32>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(json_u32))
}

fn lenient_count<'de, D: Deserializer<'de>>(d: D) -> Result<u32, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(json_u32).unwrap_or(0))
}

fn json_u32(v: &serde_json::Value) -> Option<u32> {
    match v {
        serde_json::Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0 && *f >= 0.0).map(|f| f as u64))
            .and_then(|n| u32::try_from(n).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn lenient_level<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Level>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(Level::parse))
}

fn lenient_date<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveDate>, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw.as_ref().and_then(|v| v.as_str()).and_then(crate::time::parse_date))
}

fn lenient_recurrence<'de, D: Deserializer<'de>>(d: D) -> Result<Recurrence, D::Error> {
    let raw = Option::<serde_json::Value>::deserialize(d)?;
    Ok(raw
        .as_ref()
        .and_then(|v| v.as_str())
        .and_then(Recurrence::parse)
        .unwrap_or_default())
}

/// A candidate surfaced to the user.
///
/// Fallback suggestions come from the built-in list: they are never
/// persisted, never mutated, and get a fresh synthetic id every time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "task", rename_all = "lowercase")]
pub enum Suggestion {
    Owned(Task),
    Fallback(Task),
}

impl Suggestion {
    pub fn task(&self) -> &Task {
        match self {
            Suggestion::Owned(t) | Suggestion::Fallback(t) => t,
        }
    }

    pub fn id(&self) -> &str {
        &self.task().id
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Suggestion::Fallback(_))
    }
}
