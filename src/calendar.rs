//! Calendar-day predicates and week arithmetic.
//!
//! The whole analytics layer works at local-calendar-day granularity, never
//! timestamp-exact. Every predicate takes the reference day (`today`) as an
//! explicit argument so rollups are deterministic and testable; only the CLI
//! reads the wall clock.
//!
//! Weeks start on Monday: when `today` is a Sunday the current week began
//! six days earlier.

use chrono::{Datelike, Days, NaiveDate};

/// Same calendar day.
pub fn is_today(d: NaiveDate, today: NaiveDate) -> bool {
    d == today
}

/// Strictly before `today`.
pub fn is_past_due(d: NaiveDate, today: NaiveDate) -> bool {
    d < today
}

/// Within the Monday–Sunday week containing `today`.
pub fn is_this_week(d: NaiveDate, today: NaiveDate) -> bool {
    week_start(d) == week_start(today)
}

/// Same year and month as `today`.
pub fn is_this_month(d: NaiveDate, today: NaiveDate) -> bool {
    d.year() == today.year() && d.month() == today.month()
}

/// Between `today` and `today + n` inclusive.
pub fn is_in_next_days(d: NaiveDate, today: NaiveDate, n: u32) -> bool {
    d >= today && d <= today + Days::new(u64::from(n))
}

/// Between `today − (n − 1)` and `today` inclusive. `n = 1` means today only;
/// `n = 0` matches nothing.
pub fn is_in_last_days(d: NaiveDate, today: NaiveDate, n: u32) -> bool {
    if n == 0 {
        return false;
    }
    d <= today && d >= today - Days::new(u64::from(n - 1))
}

/// Monday of the week containing `d`.
pub fn week_start(d: NaiveDate) -> NaiveDate {
    d - Days::new(u64::from(d.weekday().num_days_from_monday()))
}

/// The seven consecutive days starting at `week_start(d)`.
pub fn week_days(d: NaiveDate) -> [NaiveDate; 7] {
    let start = week_start(d);
    std::array::from_fn(|i| start + Days::new(i as u64))
}

/// 0 = Monday … 6 = Sunday.
pub fn weekday_index(d: NaiveDate) -> usize {
    d.weekday().num_days_from_monday() as usize
}
