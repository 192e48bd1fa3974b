//! Typed planner entities.
//!
//! Raw store records are heterogeneous field maps; everything downstream of
//! the store boundary works on these strongly-typed entities instead. Each
//! `from_record` constructor is the single normalization pass: it resolves
//! field-name aliases, coerces types, and degrades missing or malformed
//! fields to `None`/empty rather than failing. Relationships stay as plain
//! id lists — the store has no foreign keys, so joins happen in `linkage`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::record::{self, Record};
use crate::status::StatusGroup;

/// A high-level objective with key results attached via inverse links.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Objective {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub start_date: Option<NaiveDate>,
    pub target_date: Option<NaiveDate>,
}

impl Objective {
    pub fn from_record(r: &Record) -> Self {
        Self {
            id: r.id.clone(),
            name: r.text(&["Objective Name", "Objective", "Name"]),
            description: r.text(&["Description"]),
            category: r.text(&["Category"]),
            priority: r.text(&["Priority"]),
            status: r.text(&["Status"]),
            start_date: r.date(&["Start Date"]),
            target_date: r.date(&["Target Date"]),
        }
    }

    pub fn status_group(&self) -> StatusGroup {
        StatusGroup::classify(&self.status)
    }
}

/// A measurable key result, referencing at most one objective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyResult {
    pub id: String,
    pub name: String,
    pub description: String,
    pub metric: String,
    pub current_value: Option<f64>,
    pub target_value: Option<f64>,
    pub unit: String,
    pub deadline: Option<NaiveDate>,
    /// Progress percent as stored. May be absent; clamped on read via
    /// [`KeyResult::progress_clamped`].
    pub progress: Option<f64>,
    pub status: String,
    /// Link field holding zero or one objective id.
    pub objective_ids: Vec<String>,
}

impl KeyResult {
    pub fn from_record(r: &Record) -> Self {
        Self {
            id: r.id.clone(),
            name: r.text(&["Key Result Name", "Name"]),
            description: r.text(&["Description"]),
            metric: r.text(&["Metric"]),
            current_value: r.number(&["Current Value"]),
            target_value: r.number(&["Target Value"]),
            unit: r.text(&["Unit"]),
            deadline: r.date(&["Deadline"]),
            progress: r.number(&["Progress (%)"]),
            status: r.text(&["Status"]),
            objective_ids: r.id_list(&["Objective Link", "Objective"]),
        }
    }

    /// Progress in `[0, 100]`, with absence treated as 0.
    pub fn progress_clamped(&self) -> f64 {
        self.progress.unwrap_or(0.0).clamp(0.0, 100.0)
    }

    pub fn status_group(&self) -> StatusGroup {
        StatusGroup::classify(&self.status)
    }
}

/// A task, optionally linked to objectives (directly or through its key
/// results) and key results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub priority: String,
    pub assignee: String,
    pub category: String,
    pub status: String,
    pub objective_ids: Vec<String>,
    pub key_result_ids: Vec<String>,
}

impl Task {
    pub fn from_record(r: &Record) -> Self {
        Self {
            id: r.id.clone(),
            name: r.text(&["Task Name", "Name"]),
            description: r.text(&["Description"]),
            due_date: r.date(&["Due Date"]),
            priority: r.text(&["Priority"]),
            assignee: r.text(&["Assignee"]),
            category: r.text(&["Category"]),
            status: r.text(&["Status"]),
            objective_ids: r.id_list(&["Objective Link", "Objectives", "Objective"]),
            key_result_ids: r.id_list(&["Key Result", "Key Results"]),
        }
    }

    pub fn status_group(&self) -> StatusGroup {
        StatusGroup::classify(&self.status)
    }
}

/// Whether tracking a habit measures building it up or breaking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HabitKind {
    Good,
    Bad,
}

impl HabitKind {
    /// Parse from the stored type label. Unrecognized or empty values
    /// default to `Good` — legacy rows predate the type column.
    pub fn from_label(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("bad") {
            Self::Bad
        } else {
            Self::Good
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Good => "good",
            Self::Bad => "bad",
        }
    }
}

impl std::fmt::Display for HabitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_label())
    }
}

/// A habit definition, referenced by tracking entries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub name: String,
    pub category: String,
    pub kind: HabitKind,
    pub frequency: String,
}

impl Habit {
    pub fn from_record(r: &Record) -> Self {
        Self {
            id: r.id.clone(),
            name: r.text(&["Habit Name", "Name"]),
            category: r.text(&["Category"]),
            kind: HabitKind::from_label(&r.text(&["Habit type", "Habit Type"])),
            frequency: r.text(&["Frequency"]),
        }
    }
}

/// One habit-tracking log entry. Nominally one per habit per day, but
/// duplicates are tolerated; the streak layer collapses them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: String,
    /// Link field holding the habit id (tolerated as a raw scalar too).
    pub habit_ids: Vec<String>,
    pub executed_on: Option<NaiveDate>,
    pub successful: bool,
}

impl HabitLog {
    pub fn from_record(r: &Record) -> Self {
        Self {
            id: r.id.clone(),
            habit_ids: r.id_list(&["Habit"]),
            executed_on: r.date(&["Execution Date-Time", "Execution Date"]),
            successful: r
                .field(&["Was Successful?"])
                .map(record::is_success)
                .unwrap_or(false),
        }
    }

    /// Whether this entry belongs to the given habit.
    pub fn is_for(&self, habit_id: &str) -> bool {
        self.habit_ids.iter().any(|id| id == habit_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rec(id: &str, fields: serde_json::Value) -> Record {
        let serde_json::Value::Object(map) = fields else {
            panic!("test fields must be an object");
        };
        Record::new(id, map)
    }

    #[test]
    fn objective_normalizes_aliases_and_dates() {
        let r = rec(
            "obj1",
            json!({
                "Objective": "Get fit",
                "Status": "In Progress",
                "Target Date": "2024-06-30",
            }),
        );
        let o = Objective::from_record(&r);
        assert_eq!(o.name, "Get fit");
        assert_eq!(o.status_group(), StatusGroup::InProgress);
        assert_eq!(o.target_date, NaiveDate::from_ymd_opt(2024, 6, 30));
        assert!(o.start_date.is_none());
        assert!(o.category.is_empty());
    }

    #[test]
    fn key_result_progress_clamping() {
        let r = rec("kr1", json!({"Progress (%)": 140}));
        assert_eq!(KeyResult::from_record(&r).progress_clamped(), 100.0);

        let r = rec("kr2", json!({"Progress (%)": -5}));
        assert_eq!(KeyResult::from_record(&r).progress_clamped(), 0.0);

        let r = rec("kr3", json!({}));
        let kr = KeyResult::from_record(&r);
        assert!(kr.progress.is_none());
        assert_eq!(kr.progress_clamped(), 0.0);
    }

    #[test]
    fn key_result_links_objective() {
        let r = rec(
            "kr1",
            json!({"Key Result Name": "Run 100km", "Objective Link": ["obj1"]}),
        );
        let kr = KeyResult::from_record(&r);
        assert_eq!(kr.objective_ids, vec!["obj1"]);
        assert_eq!(kr.name, "Run 100km");
    }

    #[test]
    fn task_reads_both_link_fields() {
        let r = rec(
            "t1",
            json!({
                "Task Name": "Buy shoes",
                "Key Results": ["kr1", "kr2"],
                "Objective Link": ["obj1"],
                "Due Date": "2024-03-10T00:00:00.000Z",
            }),
        );
        let t = Task::from_record(&r);
        assert_eq!(t.key_result_ids, vec!["kr1", "kr2"]);
        assert_eq!(t.objective_ids, vec!["obj1"]);
        assert_eq!(t.due_date, NaiveDate::from_ymd_opt(2024, 3, 10));
    }

    #[test]
    fn habit_kind_parsing() {
        assert_eq!(HabitKind::from_label("Bad"), HabitKind::Bad);
        assert_eq!(HabitKind::from_label("Good"), HabitKind::Good);
        assert_eq!(HabitKind::from_label(""), HabitKind::Good);

        let r = rec("h1", json!({"Habit Name": "Smoke less", "Habit type": "Bad"}));
        assert_eq!(Habit::from_record(&r).kind, HabitKind::Bad);
    }

    #[test]
    fn habit_log_tolerates_scalar_link_and_legacy_success() {
        let r = rec(
            "log1",
            json!({
                "Habit": "h1",
                "Execution Date": "2024-03-05",
                "Was Successful?": "yes",
            }),
        );
        let log = HabitLog::from_record(&r);
        assert!(log.is_for("h1"));
        assert!(!log.is_for("h2"));
        assert!(log.successful);
        assert_eq!(log.executed_on, NaiveDate::from_ymd_opt(2024, 3, 5));
    }

    #[test]
    fn habit_log_missing_success_is_failure() {
        let r = rec("log1", json!({"Habit": ["h1"]}));
        let log = HabitLog::from_record(&r);
        assert!(!log.successful);
        assert!(log.executed_on.is_none());
    }
}
