//! Derived view models: progress rollups, period success rates, trends.
//!
//! Every function here is a pure projection from a snapshot (plus a
//! reference day) to a plain value object, recomputed from scratch per call.
//! There is no caching layer and no incremental update — a refresh replaces
//! the snapshot and everything is recomputed.
//!
//! Totality contract: absent or partial data degrades every computed value
//! to zero/empty. Calling any rollup with empty collections returns a
//! well-formed, zero-valued result, never an error.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;
use crate::linkage::{Snapshot, SnapshotIndex};
use crate::model::{HabitKind, HabitLog, KeyResult, Objective, Task};
use crate::status::StatusGroup;

/// Objectives whose target date is within this many days are candidates for
/// at-risk detection.
pub const AT_RISK_WINDOW_DAYS: u32 = 14;

/// Averaged key-result progress below this marks a near-deadline objective
/// as at risk.
pub const AT_RISK_PROGRESS_THRESHOLD: u32 = 50;

/// Category label for habits without a category field.
pub const UNCATEGORIZED: &str = "(uncategorized)";

/// `round(100 × successful / total)`, defined as 0 when `total` is 0.
pub fn round_pct(successful: usize, total: usize) -> u32 {
    if total == 0 {
        0
    } else {
        ((successful as f64 / total as f64) * 100.0).round() as u32
    }
}

// ---------------------------------------------------------------------------
// Objective progress
// ---------------------------------------------------------------------------

/// Per-objective key-result rollup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectiveProgress {
    pub objective_id: String,
    pub name: String,
    /// Mean of linked key-result progress percents (missing treated as 0),
    /// rounded to the nearest integer.
    pub avg_progress: u32,
    pub done_key_results: usize,
    pub total_key_results: usize,
}

/// Average the progress of an objective's key results and count done ones.
pub fn objective_progress(index: &SnapshotIndex<'_>, objective: &Objective) -> ObjectiveProgress {
    let krs = index.key_results_for_objective(objective);
    let total = krs.len();

    let avg_progress = if total == 0 {
        0
    } else {
        let sum: f64 = krs.iter().map(|kr| kr.progress_clamped()).sum();
        (sum / total as f64).round() as u32
    };
    let done = krs
        .iter()
        .filter(|kr| kr.status_group() == StatusGroup::Done)
        .count();

    ObjectiveProgress {
        objective_id: objective.id.clone(),
        name: objective.name.clone(),
        avg_progress,
        done_key_results: done,
        total_key_results: total,
    }
}

/// Progress rollups for every objective, in snapshot order.
pub fn all_objective_progress(index: &SnapshotIndex<'_>) -> Vec<ObjectiveProgress> {
    index
        .snapshot()
        .objectives
        .iter()
        .map(|obj| objective_progress(index, obj))
        .collect()
}

/// Whether an objective's target date is inside the at-risk window with
/// averaged progress below threshold. Objectives without a target date are
/// never at risk.
pub fn is_at_risk(index: &SnapshotIndex<'_>, objective: &Objective, today: NaiveDate) -> bool {
    match objective.target_date {
        Some(target) if calendar::is_in_next_days(target, today, AT_RISK_WINDOW_DAYS) => {
            objective_progress(index, objective).avg_progress < AT_RISK_PROGRESS_THRESHOLD
        }
        _ => false,
    }
}

/// All at-risk objectives, in snapshot order.
pub fn at_risk_objectives<'a>(
    index: &SnapshotIndex<'a>,
    today: NaiveDate,
) -> Vec<&'a Objective> {
    index
        .snapshot()
        .objectives
        .iter()
        .filter(|obj| is_at_risk(index, obj, today))
        .collect()
}

// ---------------------------------------------------------------------------
// Task breakdowns
// ---------------------------------------------------------------------------

/// Count tuple over the 3-way status groups.
///
/// Percentages are each rounded independently and may not sum to exactly
/// 100; this is the accepted display approximation, not normalized away.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskBreakdown {
    pub done: usize,
    pub in_progress: usize,
    pub pending: usize,
    pub total: usize,
}

impl TaskBreakdown {
    /// Classify each task into its status group and tally.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut breakdown = Self::default();
        for task in tasks {
            match task.status_group() {
                StatusGroup::Done => breakdown.done += 1,
                StatusGroup::InProgress => breakdown.in_progress += 1,
                StatusGroup::Pending => breakdown.pending += 1,
            }
            breakdown.total += 1;
        }
        breakdown
    }

    pub fn done_pct(&self) -> u32 {
        round_pct(self.done, self.total)
    }

    pub fn in_progress_pct(&self) -> u32 {
        round_pct(self.in_progress, self.total)
    }

    pub fn pending_pct(&self) -> u32 {
        round_pct(self.pending, self.total)
    }
}

/// Completion stats over the tasks linked to a key result.
pub fn key_result_task_stats(index: &SnapshotIndex<'_>, kr: &KeyResult) -> TaskBreakdown {
    TaskBreakdown::from_tasks(index.tasks_for_key_result(kr))
}

// ---------------------------------------------------------------------------
// Periodic success rates
// ---------------------------------------------------------------------------

/// A calendar period relative to a reference day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Period {
    /// The last `n` days ending today, inclusive.
    LastDays(u32),
    /// Monday through Sunday of the current week.
    ThisWeek,
    /// The current calendar month.
    ThisMonth,
}

impl Period {
    pub fn contains(&self, d: NaiveDate, today: NaiveDate) -> bool {
        match self {
            Self::LastDays(n) => calendar::is_in_last_days(d, today, *n),
            Self::ThisWeek => calendar::is_this_week(d, today),
            Self::ThisMonth => calendar::is_this_month(d, today),
        }
    }
}

/// Percentage of tasks due in the period that are done. Tasks without a due
/// date fall outside every period.
pub fn task_success_rate(tasks: &[Task], period: Period, today: NaiveDate) -> u32 {
    let mut total = 0;
    let mut done = 0;
    for task in tasks {
        if task.due_date.is_some_and(|d| period.contains(d, today)) {
            total += 1;
            if task.status_group() == StatusGroup::Done {
                done += 1;
            }
        }
    }
    round_pct(done, total)
}

/// Percentage of tracking entries in the period that were successful.
pub fn habit_success_rate<'a>(
    logs: impl IntoIterator<Item = &'a HabitLog>,
    period: Period,
    today: NaiveDate,
) -> u32 {
    let mut total = 0;
    let mut successful = 0;
    for log in logs {
        if log.executed_on.is_some_and(|d| period.contains(d, today)) {
            total += 1;
            if log.successful {
                successful += 1;
            }
        }
    }
    round_pct(successful, total)
}

// ---------------------------------------------------------------------------
// Weekly trends
// ---------------------------------------------------------------------------

/// One aggregate point per occurrence week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// Monday of the bucket's week.
    pub week_start: NaiveDate,
    pub total: usize,
    pub successful: usize,
    pub success_pct: u32,
}

/// Bucket dated success/failure entries by the Monday of their week over a
/// rolling `weeks × 7` day window, ascending by week start, truncated to the
/// most recent `weeks` buckets.
pub fn weekly_trend(
    entries: impl IntoIterator<Item = (NaiveDate, bool)>,
    weeks: usize,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    let window_days = (weeks * 7) as u32;
    let mut buckets: BTreeMap<NaiveDate, (usize, usize)> = BTreeMap::new();

    for (date, successful) in entries {
        if !calendar::is_in_last_days(date, today, window_days) {
            continue;
        }
        let bucket = buckets.entry(calendar::week_start(date)).or_default();
        bucket.0 += 1;
        if successful {
            bucket.1 += 1;
        }
    }

    let points: Vec<TrendPoint> = buckets
        .into_iter()
        .map(|(week_start, (total, successful))| TrendPoint {
            week_start,
            total,
            successful,
            success_pct: round_pct(successful, total),
        })
        .collect();

    // BTreeMap iteration is already ascending; keep the most recent buckets.
    let skip = points.len().saturating_sub(weeks);
    points.into_iter().skip(skip).collect()
}

/// Weekly task-completion trend keyed on due dates.
pub fn weekly_task_trend(tasks: &[Task], weeks: usize, today: NaiveDate) -> Vec<TrendPoint> {
    weekly_trend(
        tasks.iter().filter_map(|t| {
            t.due_date
                .map(|d| (d, t.status_group() == StatusGroup::Done))
        }),
        weeks,
        today,
    )
}

/// Weekly habit-tracking trend keyed on execution dates.
pub fn weekly_habit_trend<'a>(
    logs: impl IntoIterator<Item = &'a HabitLog>,
    weeks: usize,
    today: NaiveDate,
) -> Vec<TrendPoint> {
    weekly_trend(
        logs.into_iter()
            .filter_map(|l| l.executed_on.map(|d| (d, l.successful))),
        weeks,
        today,
    )
}

// ---------------------------------------------------------------------------
// Category averages
// ---------------------------------------------------------------------------

/// Average successful hits per day for one habit category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryAverage {
    pub category: String,
    /// Successful entries per day over the period, one decimal.
    pub avg_per_day: f64,
}

/// Group habits of one kind by category and average their successful hits
/// per day over the last `period_days` days (floored to at least 1 day).
/// Categories averaging zero are dropped — zero-value series are not
/// rendered. Results are ordered by category name.
pub fn habit_category_averages(
    snapshot: &Snapshot,
    kind: HabitKind,
    period_days: u32,
    today: NaiveDate,
) -> Vec<CategoryAverage> {
    let days = period_days.max(1);
    let mut hits_by_category: BTreeMap<String, usize> = BTreeMap::new();

    for habit in &snapshot.habits {
        if habit.kind != kind {
            continue;
        }
        let category = if habit.category.is_empty() {
            UNCATEGORIZED.to_string()
        } else {
            habit.category.clone()
        };
        let hits = snapshot
            .habit_logs
            .iter()
            .filter(|log| {
                log.successful
                    && log.is_for(&habit.id)
                    && log
                        .executed_on
                        .is_some_and(|d| calendar::is_in_last_days(d, today, days))
            })
            .count();
        *hits_by_category.entry(category).or_default() += hits;
    }

    hits_by_category
        .into_iter()
        .filter_map(|(category, hits)| {
            let avg_per_day = round_tenth(hits as f64 / f64::from(days));
            (avg_per_day > 0.0).then_some(CategoryAverage {
                category,
                avg_per_day,
            })
        })
        .collect()
}

fn round_tenth(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Upcoming ordering
// ---------------------------------------------------------------------------

/// The next `n` not-done tasks ordered by due date ascending, with missing
/// due dates sorted last. Status is deliberately not part of the sort key:
/// a past-due pending task sorts before a far-future one.
pub fn upcoming_tasks(tasks: &[Task], n: usize) -> Vec<&Task> {
    let mut upcoming: Vec<&Task> = tasks
        .iter()
        .filter(|t| t.status_group() != StatusGroup::Done)
        .collect();
    upcoming.sort_by_key(|t| t.due_date.unwrap_or(NaiveDate::MAX));
    upcoming.truncate(n);
    upcoming
}
