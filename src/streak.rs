//! Consecutive-day success streaks for habits.
//!
//! A "successful day" is any calendar day with at least one successful
//! tracking entry for the habit; duplicate entries on the same day collapse.
//! Current and longest streaks are independent pure computations over the
//! same derived day set and are recomputed fresh on every call — the day
//! set changes as entries are logged.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::HabitLog;

/// Current and longest streaks for one habit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    /// Consecutive successful days ending today. Zero unless today itself
    /// was successful.
    pub current: u32,
    /// Longest consecutive successful-day run ever recorded.
    pub longest: u32,
}

/// Distinct calendar days on which the habit had at least one successful
/// entry. Entries without a parseable date are ignored.
pub fn successful_days(habit_id: &str, logs: &[HabitLog]) -> BTreeSet<NaiveDate> {
    logs.iter()
        .filter(|log| log.successful && log.is_for(habit_id))
        .filter_map(|log| log.executed_on)
        .collect()
}

/// Consecutive successful days counted backward from `today`.
///
/// A current streak always terminates at today: if today is not in the set
/// the streak is zero, regardless of how recent the last success was.
pub fn current_streak(days: &BTreeSet<NaiveDate>, today: NaiveDate) -> u32 {
    let mut count = 0;
    let mut day = today;
    while days.contains(&day) {
        count += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    count
}

/// Longest run of consecutive days in the set. One if any day exists, zero
/// if none do.
pub fn longest_streak(days: &BTreeSet<NaiveDate>) -> u32 {
    let mut longest = 0;
    let mut run = 0;
    let mut prev: Option<NaiveDate> = None;

    for &day in days {
        run = match prev {
            Some(p) if p.succ_opt() == Some(day) => run + 1,
            _ => 1,
        };
        longest = longest.max(run);
        prev = Some(day);
    }
    longest
}

/// Both streaks for a habit over the full tracking collection.
pub fn habit_streaks(habit_id: &str, logs: &[HabitLog], today: NaiveDate) -> StreakSummary {
    let days = successful_days(habit_id, logs);
    StreakSummary {
        current: current_streak(&days, today),
        longest: longest_streak(&days),
    }
}
