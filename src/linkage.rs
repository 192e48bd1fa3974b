//! Client-side joins over independently fetched collections.
//!
//! The record store returns each table as a flat, unordered list with no
//! server-side join or filter capability, so every relationship is resolved
//! here by intersecting id lists. A [`SnapshotIndex`] builds `id → entity`
//! maps once per refresh; all linkage rules are lookups against those maps.
//!
//! Ids that reference records missing from the snapshot (fetch-limit
//! truncation, mid-refresh deletes) silently resolve to nothing.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::model::{Habit, HabitLog, KeyResult, Objective, Task};

/// One full re-fetch of all five planner tables. Replaced wholesale on each
/// refresh; nothing here is ever mutated in place.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub objectives: Vec<Objective>,
    pub key_results: Vec<KeyResult>,
    pub tasks: Vec<Task>,
    pub habits: Vec<Habit>,
    pub habit_logs: Vec<HabitLog>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the per-refresh id index.
    pub fn index(&self) -> SnapshotIndex<'_> {
        SnapshotIndex::new(self)
    }
}

/// Id-keyed lookup maps over a snapshot, built once per refresh.
#[derive(Debug)]
pub struct SnapshotIndex<'a> {
    snapshot: &'a Snapshot,
    objectives: HashMap<&'a str, &'a Objective>,
    key_results: HashMap<&'a str, &'a KeyResult>,
    tasks: HashMap<&'a str, &'a Task>,
    habits: HashMap<&'a str, &'a Habit>,
}

impl<'a> SnapshotIndex<'a> {
    pub fn new(snapshot: &'a Snapshot) -> Self {
        Self {
            snapshot,
            objectives: snapshot
                .objectives
                .iter()
                .map(|o| (o.id.as_str(), o))
                .collect(),
            key_results: snapshot
                .key_results
                .iter()
                .map(|kr| (kr.id.as_str(), kr))
                .collect(),
            tasks: snapshot.tasks.iter().map(|t| (t.id.as_str(), t)).collect(),
            habits: snapshot.habits.iter().map(|h| (h.id.as_str(), h)).collect(),
        }
    }

    /// The snapshot this index was built from.
    pub fn snapshot(&self) -> &'a Snapshot {
        self.snapshot
    }

    pub fn objective(&self, id: &str) -> Option<&'a Objective> {
        self.objectives.get(id).copied()
    }

    pub fn key_result(&self, id: &str) -> Option<&'a KeyResult> {
        self.key_results.get(id).copied()
    }

    pub fn task(&self, id: &str) -> Option<&'a Task> {
        self.tasks.get(id).copied()
    }

    pub fn habit(&self, id: &str) -> Option<&'a Habit> {
        self.habits.get(id).copied()
    }

    /// The objective a key result belongs to, if its link resolves.
    pub fn objective_for_key_result(&self, kr: &KeyResult) -> Option<&'a Objective> {
        kr.objective_ids.first().and_then(|id| self.objective(id))
    }

    /// All key results linked to an objective (inverse of the KR link field).
    pub fn key_results_for_objective(&self, objective: &Objective) -> Vec<&'a KeyResult> {
        self.snapshot
            .key_results
            .iter()
            .filter(|kr| kr.objective_ids.iter().any(|id| *id == objective.id))
            .collect()
    }

    /// Key results a task links to. Unresolvable ids are skipped.
    pub fn key_results_for_task(&self, task: &Task) -> Vec<&'a KeyResult> {
        task.key_result_ids
            .iter()
            .filter_map(|id| self.key_result(id))
            .collect()
    }

    /// Objectives a task belongs to: directly referenced objectives unioned
    /// with the objectives of each linked key result. A task with no direct
    /// objective tag inherits its key results' objectives. Deduplicated,
    /// direct links first.
    pub fn objectives_for_task(&self, task: &Task) -> Vec<&'a Objective> {
        let mut seen: HashSet<&str> = HashSet::new();
        let mut out = Vec::new();

        for id in &task.objective_ids {
            if let Some(obj) = self.objective(id)
                && seen.insert(obj.id.as_str())
            {
                out.push(obj);
            }
        }
        for kr in self.key_results_for_task(task) {
            if let Some(obj) = self.objective_for_key_result(kr)
                && seen.insert(obj.id.as_str())
            {
                out.push(obj);
            }
        }
        out
    }

    /// All tasks linked to a key result (inverse of the task link field).
    pub fn tasks_for_key_result(&self, kr: &KeyResult) -> Vec<&'a Task> {
        self.snapshot
            .tasks
            .iter()
            .filter(|t| t.key_result_ids.iter().any(|id| *id == kr.id))
            .collect()
    }

    /// All tracking entries for a habit, in snapshot order.
    pub fn logs_for_habit(&self, habit_id: &str) -> Vec<&'a HabitLog> {
        self.snapshot
            .habit_logs
            .iter()
            .filter(|log| log.is_for(habit_id))
            .collect()
    }
}
