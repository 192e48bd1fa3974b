//! # telos
//!
//! Analytics core for a personal productivity planner (objectives / key
//! results, tasks, habits) whose persistent store is a spreadsheet-style
//! records API with no join, filter, or aggregation capability. Everything
//! interesting happens client-side: flat record collections are fetched
//! independently, normalized into typed entities, joined by id, and rolled
//! up into derived views.
//!
//! ## Architecture
//!
//! - **Record access** (`record`): tolerant field accessors over untyped maps
//! - **Entities** (`model`): single normalization pass into typed structs
//! - **Calendar** (`calendar`): day-granularity predicates, Monday-start weeks
//! - **Status** (`status`): canonical 3-way (+past-due) status bucketing
//! - **Linkage** (`linkage`): id-indexed client-side joins, including
//!   objective inheritance through key results
//! - **Streaks** (`streak`): consecutive-day habit streaks
//! - **Rollups** (`rollup`): progress averages, period success rates, weekly
//!   trends, at-risk detection, category averages
//! - **Store** (`store`): HTTP client for the four records-API primitives
//!
//! The analytics modules are pure and total: they never touch the network,
//! never mutate shared state, and degrade missing or malformed data to
//! zero/empty values instead of failing.
//!
//! ## Library usage
//!
//! ```
//! use chrono::NaiveDate;
//! use telos::linkage::Snapshot;
//! use telos::rollup;
//!
//! let snapshot = Snapshot::new(); // normally store.fetch_snapshot(...)
//! let index = snapshot.index();
//! let today = NaiveDate::from_ymd_opt(2024, 3, 6).unwrap();
//! assert!(rollup::at_risk_objectives(&index, today).is_empty());
//! ```

pub mod calendar;
pub mod config;
pub mod error;
pub mod linkage;
pub mod model;
pub mod record;
pub mod rollup;
pub mod status;
pub mod store;
pub mod streak;
