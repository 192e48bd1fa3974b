//! Canonical status classification.
//!
//! Objectives, key results, and tasks all carry a free-text status field.
//! Progress bars and group-by lists everywhere use a single 3-way bucketing
//! of that field; task lists refine it with a fourth "past due" bucket that
//! outranks the nominal status for incomplete, overdue work.
//!
//! The datasets this was built for mix English and Spanish status labels,
//! so both synonym sets are recognized.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::calendar;

/// Labels that classify as done, lowercase.
const DONE_SYNONYMS: &[&str] = &["done", "complete", "completado", "hecho", "cerrado"];

/// Labels that classify as in progress, lowercase.
const IN_PROGRESS_SYNONYMS: &[&str] = &["in progress", "en progreso"];

/// The 3-way status bucketing shared by all entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusGroup {
    Done,
    InProgress,
    Pending,
}

impl StatusGroup {
    /// Classify a free-text status. Total: anything unrecognized, including
    /// the empty string, is `Pending`.
    pub fn classify(status: &str) -> Self {
        let s = status.trim().to_lowercase();
        if DONE_SYNONYMS.contains(&s.as_str()) {
            Self::Done
        } else if IN_PROGRESS_SYNONYMS.contains(&s.as_str()) {
            Self::InProgress
        } else {
            Self::Pending
        }
    }

    /// Serialize to a short label.
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Done => "done",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
        }
    }
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}

/// Status bucketing for task lists: overdue incomplete work is surfaced as
/// `PastDue` ahead of its nominal status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayGroup {
    PastDue,
    Done,
    InProgress,
    Pending,
}

impl DisplayGroup {
    /// Classify a status with an optional due date. A past-due date on a
    /// not-done record wins over the status group.
    pub fn classify(status: &str, due: Option<NaiveDate>, today: NaiveDate) -> Self {
        let group = StatusGroup::classify(status);
        if group != StatusGroup::Done
            && due.is_some_and(|d| calendar::is_past_due(d, today))
        {
            Self::PastDue
        } else {
            group.into()
        }
    }

    pub fn as_label(&self) -> &'static str {
        match self {
            Self::PastDue => "past_due",
            Self::Done => "done",
            Self::InProgress => "in_progress",
            Self::Pending => "pending",
        }
    }
}

impl From<StatusGroup> for DisplayGroup {
    fn from(group: StatusGroup) -> Self {
        match group {
            StatusGroup::Done => Self::Done,
            StatusGroup::InProgress => Self::InProgress,
            StatusGroup::Pending => Self::Pending,
        }
    }
}

impl fmt::Display for DisplayGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
