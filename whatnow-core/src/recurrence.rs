//! Next due date for recurring tasks.

use chrono::{Days, NaiveDate};

use crate::task::{Recurrence, Task};
use crate::time::add_months_rollover;

/// Next due date after a completion, or `None` for non-recurring tasks.
///
/// The base is the current due date, or `today` when the task has none.
/// Monthly recurrence rolls short months over (see [`add_months_rollover`]).
pub fn next_due_date(task: &Task, today: NaiveDate) -> Option<NaiveDate> {
    let base = task.due_date.unwrap_or(today);
    match task.recurring {
        Recurrence::None => None,
        Recurrence::Daily => base.checked_add_days(Days::new(1)),
        Recurrence::Weekly => base.checked_add_days(Days::new(7)),
        Recurrence::Monthly => add_months_rollover(base, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 9).unwrap()
    }

    fn on(due: &str, recurring: Recurrence) -> Task {
        Task::new("t", "t")
            .with_due_date(due.parse().unwrap())
            .with_recurrence(recurring)
    }

    #[test]
    fn advances_by_policy() {
        let next = |r| next_due_date(&on("2025-06-15", r), today()).map(|d| d.to_string());
        assert_eq!(next(Recurrence::Daily).as_deref(), Some("2025-06-16"));
        assert_eq!(next(Recurrence::Weekly).as_deref(), Some("2025-06-22"));
        assert_eq!(next(Recurrence::Monthly).as_deref(), Some("2025-07-15"));
        assert_eq!(next(Recurrence::None), None);
    }

    #[test]
    fn missing_recurrence_is_none() {
        let t: Task = serde_json::from_str(r#"{"id":"t","name":"t","dueDate":"2025-06-15"}"#).unwrap();
        assert_eq!(next_due_date(&t, today()), None);
    }

    #[test]
    fn without_due_date_uses_today() {
        let t = Task::new("t", "t").with_recurrence(Recurrence::Weekly);
        assert_eq!(
            next_due_date(&t, today()),
            NaiveDate::from_ymd_opt(2026, 3, 16)
        );
    }

    #[test]
    fn month_end_rolls_over() {
        let t = on("2025-01-31", Recurrence::Monthly);
        assert_eq!(next_due_date(&t, today()).map(|d| d.to_string()).as_deref(), Some("2025-03-03"));
    }

    #[test]
    fn idempotent() {
        let t = on("2025-06-15", Recurrence::Monthly);
        assert_eq!(next_due_date(&t, today()), next_due_date(&t, today()));
    }
}
