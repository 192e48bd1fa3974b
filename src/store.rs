//! HTTP client for the external record store.
//!
//! The store exposes exactly four primitives per table — fetch-all, create,
//! update, delete — each speaking flat `{id, fields}` JSON. There are no
//! transactions, no server-side filters or joins, and no cross-table
//! consistency guarantee; every refresh re-fetches all five planner tables
//! and rebuilds the snapshot wholesale.
//!
//! Authentication is a static shared-secret header sent on every request.

use std::time::Duration;

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::TableNames;
use crate::linkage::Snapshot;
use crate::model::{Habit, HabitLog, KeyResult, Objective, Task};
use crate::record::Record;

/// Tracking tables grow fastest; they get a higher fetch cap than the
/// default table limit.
pub const TRACKING_FETCH_LIMIT: usize = 5000;

/// Shared-secret header checked by the request router.
const API_KEY_HEADER: &str = "X-Api-Key";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum StoreError {
    #[error("record store request failed: {message}")]
    #[diagnostic(
        code(telos::store::request),
        help("Check the base URL, the API key, and that the records API is reachable.")
    )]
    Request { message: String },

    #[error("unexpected response from record store: {message}")]
    #[diagnostic(
        code(telos::store::response),
        help("The records API returned a body this client does not understand. API version mismatch?")
    )]
    Response { message: String },
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Connection parameters for the records API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    pub base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080".to_string(),
            api_key: String::new(),
            timeout_secs: 10,
        }
    }
}

/// Client for the four record-store primitives.
pub struct RecordStore {
    config: StoreConfig,
    http: ureq::Agent,
}

/// Wire shape of a fetch-all response.
#[derive(Deserialize)]
struct RecordPage {
    records: Vec<Record>,
}

impl RecordStore {
    pub fn new(config: StoreConfig) -> Self {
        let http = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build();
        Self { config, http }
    }

    fn table_url(&self, table: &str) -> String {
        // Table names contain spaces ("Key Results"); ureq does not encode
        // path segments itself.
        let encoded = table.replace(' ', "%20");
        format!(
            "{}/records/{encoded}",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Fetch up to `limit` rows of one table. No ordering guarantee —
    /// callers sort client-side.
    pub fn fetch_all(&self, table: &str, limit: Option<usize>) -> StoreResult<Vec<Record>> {
        let mut request = self
            .http
            .get(&self.table_url(table))
            .set(API_KEY_HEADER, &self.config.api_key);
        if let Some(limit) = limit {
            request = request.query("limit", &limit.to_string());
        }
        let response = request.call().map_err(|e| StoreError::Request {
            message: e.to_string(),
        })?;
        let page: RecordPage = response.into_json().map_err(|e| StoreError::Response {
            message: format!("failed to parse record page: {e}"),
        })?;
        debug!(table, count = page.records.len(), "fetched records");
        Ok(page.records)
    }

    /// Create a record from a flat field map. Array-valued fields denote
    /// link references.
    pub fn create(&self, table: &str, fields: Map<String, Value>) -> StoreResult<Record> {
        let response = self
            .http
            .post(&self.table_url(table))
            .set(API_KEY_HEADER, &self.config.api_key)
            .send_json(serde_json::json!({ "fields": fields }))
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;
        response.into_json().map_err(|e| StoreError::Response {
            message: format!("failed to parse created record: {e}"),
        })
    }

    /// Update fields on an existing record.
    pub fn update(&self, table: &str, id: &str, fields: Map<String, Value>) -> StoreResult<Record> {
        let url = format!("{}/{id}", self.table_url(table));
        let response = self
            .http
            .request("PATCH", &url)
            .set(API_KEY_HEADER, &self.config.api_key)
            .send_json(serde_json::json!({ "fields": fields }))
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;
        response.into_json().map_err(|e| StoreError::Response {
            message: format!("failed to parse updated record: {e}"),
        })
    }

    /// Delete a record by id.
    pub fn delete(&self, table: &str, id: &str) -> StoreResult<()> {
        let url = format!("{}/{id}", self.table_url(table));
        self.http
            .delete(&url)
            .set(API_KEY_HEADER, &self.config.api_key)
            .call()
            .map_err(|e| StoreError::Request {
                message: e.to_string(),
            })?;
        Ok(())
    }

    /// Fetch all five planner tables and build a typed snapshot.
    ///
    /// Fetches are independent; if any one fails the whole refresh fails —
    /// aggregation is never run over a partial snapshot.
    pub fn fetch_snapshot(&self, tables: &TableNames, limit: usize) -> StoreResult<Snapshot> {
        let objectives = self.fetch_all(&tables.objectives, Some(limit))?;
        let key_results = self.fetch_all(&tables.key_results, Some(limit))?;
        let tasks = self.fetch_all(&tables.tasks, Some(limit))?;
        let habits = self.fetch_all(&tables.habits, Some(limit))?;
        let habit_logs = self.fetch_all(&tables.habit_tracking, Some(TRACKING_FETCH_LIMIT))?;

        let snapshot = Snapshot {
            objectives: objectives.iter().map(Objective::from_record).collect(),
            key_results: key_results.iter().map(KeyResult::from_record).collect(),
            tasks: tasks.iter().map(Task::from_record).collect(),
            habits: habits.iter().map(Habit::from_record).collect(),
            habit_logs: habit_logs.iter().map(HabitLog::from_record).collect(),
        };
        info!(
            objectives = snapshot.objectives.len(),
            key_results = snapshot.key_results.len(),
            tasks = snapshot.tasks.len(),
            habits = snapshot.habits.len(),
            habit_logs = snapshot.habit_logs.len(),
            "refreshed snapshot"
        );
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_url_encodes_spaces() {
        let store = RecordStore::new(StoreConfig {
            base_url: "http://localhost:9000/".to_string(),
            ..Default::default()
        });
        assert_eq!(
            store.table_url("Key Results"),
            "http://localhost:9000/records/Key%20Results"
        );
        assert_eq!(
            store.table_url("Tasks"),
            "http://localhost:9000/records/Tasks"
        );
    }

    #[test]
    fn record_page_deserializes() {
        let page: RecordPage = serde_json::from_str(
            r#"{"records": [{"id": "rec1", "fields": {"Status": "Done"}}, {"id": "rec2"}]}"#,
        )
        .unwrap();
        assert_eq!(page.records.len(), 2);
        assert_eq!(page.records[0].id, "rec1");
        assert!(page.records[1].fields.is_empty());
    }
}
