use chrono::{Duration, NaiveDate};
use clap::Subcommand;
use serde::Serialize;
use vocabflow_core::progress::{
    activity_window, current_streak, format_day, ActivityDay, MAX_HEATMAP_DAYS,
};
use vocabflow_core::storage::Database;
use vocabflow_core::{Clock, Config, ListProgress, SystemClock};

#[derive(Subcommand)]
pub enum StatsAction {
    /// Words memorized today (reference day)
    Today {
        /// Limit to one list
        #[arg(long)]
        list: Option<String>,
    },
    /// Per-list progress summary
    Dashboard,
    /// Daily activity history
    Heatmap {
        /// Limit to one list
        #[arg(long)]
        list: Option<String>,
        /// Window length in days (defaults to progress.heatmap_days)
        #[arg(
            long,
            value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_HEATMAP_DAYS))
        )]
        days: Option<u32>,
    },
}

#[derive(Serialize)]
struct Today {
    day: String,
    count: u32,
}

#[derive(Serialize)]
struct DashboardRow {
    list_id: String,
    name: String,
    today: u32,
    mastered_ratio: f64,
    #[serde(flatten)]
    progress: ListProgress,
}

#[derive(Serialize)]
struct Heatmap {
    days: Vec<ActivityDay>,
    total: u32,
    active_days: usize,
    streak: u32,
}

fn count_for(
    db: &Database,
    list: Option<&str>,
    day: NaiveDate,
) -> Result<u32, Box<dyn std::error::Error>> {
    Ok(db.daily_counts(list, day, day)?.get(&day).copied().unwrap_or(0))
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open_library()?;
    let config = Config::load()?;
    let now = SystemClock.now_ms();
    let today = config.reference_zone()?.day_of(now);

    match action {
        StatsAction::Today { list } => {
            let stats = Today {
                day: format_day(today),
                count: count_for(&db, list.as_deref(), today)?,
            };
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        StatsAction::Dashboard => {
            let review = config.review_clock()?;
            let mut rows = Vec::new();
            for list in db.lists()? {
                let progress = ListProgress::compute(&list, &review, now);
                rows.push(DashboardRow {
                    today: db.daily_count(&list.id, today)?,
                    mastered_ratio: progress.mastered_ratio(),
                    list_id: list.id,
                    name: list.name,
                    progress,
                });
            }
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        StatsAction::Heatmap { list, days } => {
            let days = days.unwrap_or(config.progress.heatmap_days);
            let from = today
                .checked_sub_signed(Duration::days(i64::from(days) - 1))
                .unwrap_or(NaiveDate::MIN);
            let counts = db.daily_counts(list.as_deref(), from, today)?;
            let window = activity_window(&counts, today, days);
            let heatmap = Heatmap {
                total: window.iter().map(|d| d.count).sum(),
                active_days: window.iter().filter(|d| d.count > 0).count(),
                streak: current_streak(&counts, today),
                days: window,
            };
            println!("{}", serde_json::to_string_pretty(&heatmap)?);
        }
    }
    Ok(())
}
