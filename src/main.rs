//! telos CLI: planner dashboard views over the records API.

use std::path::PathBuf;

use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use miette::Result;
use serde_json::{Map, Value, json};

use telos::config::PlannerConfig;
use telos::linkage::Snapshot;
use telos::model::HabitKind;
use telos::rollup::{self, Period};
use telos::status::DisplayGroup;
use telos::store::RecordStore;
use telos::streak;

#[derive(Parser)]
#[command(name = "telos", version, about = "Personal planner analytics")]
struct Cli {
    /// Path to the config file (default: $XDG_CONFIG_HOME/telos/config.toml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Objective progress with key-result rollups and at-risk flags.
    Objectives,

    /// Task breakdown by display group plus the next upcoming tasks.
    Tasks {
        /// How many upcoming tasks to list.
        #[arg(long, default_value = "5")]
        next: usize,
    },

    /// Habit streaks and this-week success rates.
    Habits,

    /// Weekly success trends for tasks and habit tracking.
    Trend {
        /// Number of week buckets.
        #[arg(long, default_value = "8")]
        weeks: usize,
    },

    /// Average successful habit hits per day, grouped by category.
    Categories {
        /// Rolling window in days.
        #[arg(long, default_value = "30")]
        days: u32,

        /// Show bad habits instead of good ones.
        #[arg(long)]
        bad: bool,
    },

    /// Mark a task as done, then refresh.
    CompleteTask {
        /// Record id of the task.
        id: String,
    },

    /// Log a habit-tracking entry for today, then refresh.
    LogHabit {
        /// Record id of the habit.
        id: String,

        /// Log a failed day instead of a successful one.
        #[arg(long)]
        failed: bool,
    },
}

fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(3)
                .build(),
        )
    }))
    .ok(); // Ignore error if hook already set (e.g., in tests)

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let config = PlannerConfig::load(cli.config.as_deref())?;
    config.require_api_key()?;

    let store = RecordStore::new(config.store.clone());
    let today = Local::now().date_naive();

    match cli.command {
        Commands::Objectives => {
            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;
            print_objectives(&snapshot, today);
        }

        Commands::Tasks { next } => {
            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;
            print_tasks(&snapshot, next, today);
        }

        Commands::Habits => {
            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;
            print_habits(&snapshot, today);
        }

        Commands::Trend { weeks } => {
            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;

            println!("Task completion by week (last {weeks}):");
            print_trend(&rollup::weekly_task_trend(&snapshot.tasks, weeks, today));

            println!("\nHabit tracking by week (last {weeks}):");
            print_trend(&rollup::weekly_habit_trend(&snapshot.habit_logs, weeks, today));
        }

        Commands::Categories { days, bad } => {
            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;
            let kind = if bad { HabitKind::Bad } else { HabitKind::Good };
            let averages = rollup::habit_category_averages(&snapshot, kind, days, today);

            if averages.is_empty() {
                println!("No {kind} habit activity in the last {days} days.");
            } else {
                println!("{kind} habit hits/day over the last {days} days:");
                for avg in &averages {
                    println!("  {:<24} {:.1}", avg.category, avg.avg_per_day);
                }
            }
        }

        Commands::CompleteTask { id } => {
            store.update(&config.tables.tasks, &id, fields(json!({"Status": "Done"})))?;
            println!("Task {id} marked done.");

            // Full re-fetch and recompute; there is no cached aggregate to patch.
            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;
            print_tasks(&snapshot, 5, today);
        }

        Commands::LogHabit { id, failed } => {
            let entry = fields(json!({
                "Habit": [id.clone()],
                "Execution Date": today.to_string(),
                "Was Successful?": !failed,
            }));
            store.create(&config.tables.habit_tracking, entry)?;
            println!(
                "Logged {} day for habit {id}.",
                if failed { "a failed" } else { "a successful" }
            );

            let snapshot = store.fetch_snapshot(&config.tables, config.fetch_limit)?;
            let summary = streak::habit_streaks(&id, &snapshot.habit_logs, today);
            println!(
                "Current streak: {} day(s), longest: {} day(s).",
                summary.current, summary.longest
            );
        }
    }

    Ok(())
}

/// Extract the map from a `json!` object literal.
fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("fields called with a non-object literal"),
    }
}

fn print_objectives(snapshot: &Snapshot, today: NaiveDate) {
    let index = snapshot.index();
    let rollups = rollup::all_objective_progress(&index);

    if rollups.is_empty() {
        println!("No objectives.");
        return;
    }

    println!("Objectives ({}):", rollups.len());
    for progress in &rollups {
        let objective = index
            .objective(&progress.objective_id)
            .expect("rollup ids come from the snapshot");
        let risk = if rollup::is_at_risk(&index, objective, today) {
            "  [AT RISK]"
        } else {
            ""
        };
        println!(
            "  {:<32} {:>3}%  ({}/{} key results done){}",
            progress.name, progress.avg_progress, progress.done_key_results,
            progress.total_key_results, risk
        );

        for kr in index.key_results_for_objective(objective) {
            let stats = rollup::key_result_task_stats(&index, kr);
            if stats.total > 0 {
                println!(
                    "      {:<28} tasks: {} done / {} in progress / {} pending ({}%)",
                    kr.name, stats.done, stats.in_progress, stats.pending,
                    stats.done_pct()
                );
            }
        }
    }
}

fn print_tasks(snapshot: &Snapshot, next: usize, today: NaiveDate) {
    let breakdown = rollup::TaskBreakdown::from_tasks(&snapshot.tasks);
    println!(
        "Tasks: {} total — {} done ({}%), {} in progress, {} pending",
        breakdown.total,
        breakdown.done,
        breakdown.done_pct(),
        breakdown.in_progress,
        breakdown.pending,
    );
    println!(
        "Completion: last 3 days {}%, this week {}%, this month {}%",
        rollup::task_success_rate(&snapshot.tasks, Period::LastDays(3), today),
        rollup::task_success_rate(&snapshot.tasks, Period::ThisWeek, today),
        rollup::task_success_rate(&snapshot.tasks, Period::ThisMonth, today),
    );

    let upcoming = rollup::upcoming_tasks(&snapshot.tasks, next);
    if upcoming.is_empty() {
        println!("Nothing upcoming.");
        return;
    }
    println!("Next {}:", upcoming.len());
    for task in upcoming {
        let group = DisplayGroup::classify(&task.status, task.due_date, today);
        let due = task
            .due_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "no due date".to_string());
        println!("  [{:<11}] {:<32} {}", group.as_label(), task.name, due);
    }
}

fn print_habits(snapshot: &Snapshot, today: NaiveDate) {
    if snapshot.habits.is_empty() {
        println!("No habits.");
        return;
    }

    let index = snapshot.index();
    println!("Habits ({}):", snapshot.habits.len());
    for habit in &snapshot.habits {
        let summary = streak::habit_streaks(&habit.id, &snapshot.habit_logs, today);
        let week_pct = rollup::habit_success_rate(
            index.logs_for_habit(&habit.id),
            Period::ThisWeek,
            today,
        );
        println!(
            "  {:<28} [{}] streak {:>2} (best {:>2})  this week {:>3}%",
            habit.name, habit.kind, summary.current, summary.longest, week_pct
        );
    }
}

fn print_trend(points: &[rollup::TrendPoint]) {
    if points.is_empty() {
        println!("  (no data)");
        return;
    }
    for point in points {
        println!(
            "  week of {}: {:>3}% ({}/{})",
            point.week_start, point.success_pct, point.successful, point.total
        );
    }
}
