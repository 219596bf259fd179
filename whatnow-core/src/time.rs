//! Calendar-day utilities. All date math uses local calendar days at
//! midnight; there is no timezone handling.

use chrono::{DateTime, Datelike, Days, Local, NaiveDate, Utc};

/// Source of "today" and "now" for the service.
pub trait Clock {
    /// The local calendar day.
    fn today(&self) -> NaiveDate;
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub today: NaiveDate,
    pub now: DateTime<Utc>,
}

impl FixedClock {
    pub fn on(today: NaiveDate) -> Self {
        let now = today
            .and_hms_opt(12, 0, 0)
            .map(|dt| dt.and_utc())
            .unwrap_or_else(Utc::now);
        Self { today, now }
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.today
    }

    fn now(&self) -> DateTime<Utc> {
        self.now
    }
}

/// Whole days from `from` to `to` (negative when `to` is earlier).
pub fn day_delta(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Parse an ISO calendar date ("2025-06-15"). A trailing time component
/// ("2025-06-15T09:00:00Z") is ignored.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.split('T').next().unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

/// Add calendar months, letting an out-of-range day roll over into the
/// following month (Jan 31 + 1 month = Mar 3 in a common year).
pub fn add_months_rollover(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let total = date.month0() + months;
    let year = date.year() + (total / 12) as i32;
    let month = total % 12 + 1;
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    first.checked_add_days(Days::new(u64::from(date.day0())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn delta_is_signed_whole_days() {
        assert_eq!(day_delta(d(2025, 6, 15), d(2025, 6, 15)), 0);
        assert_eq!(day_delta(d(2025, 6, 15), d(2025, 6, 14)), -1);
        assert_eq!(day_delta(d(2025, 12, 31), d(2026, 1, 8)), 8);
    }

    #[test]
    fn parses_dates_with_or_without_time() {
        assert_eq!(parse_date("2025-06-15"), Some(d(2025, 6, 15)));
        assert_eq!(parse_date("2025-06-15T23:00:00.000Z"), Some(d(2025, 6, 15)));
        assert_eq!(parse_date("15/06/2025"), None);
    }

    #[test]
    fn month_rollover() {
        assert_eq!(add_months_rollover(d(2025, 6, 15), 1), Some(d(2025, 7, 15)));
        assert_eq!(add_months_rollover(d(2025, 12, 10), 1), Some(d(2026, 1, 10)));
        assert_eq!(add_months_rollover(d(2025, 1, 31), 1), Some(d(2025, 3, 3)));
        assert_eq!(add_months_rollover(d(2024, 1, 31), 1), Some(d(2024, 3, 2)));
        assert_eq!(add_months_rollover(d(2025, 3, 31), 1), Some(d(2025, 5, 1)));
    }
}
