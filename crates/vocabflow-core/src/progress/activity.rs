//! Daily activity history for the contribution heatmap.

use std::collections::BTreeMap;

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Default window: one year ending today.
pub const DEFAULT_HEATMAP_DAYS: u32 = 365;

/// Longest window a heatmap may span.
pub const MAX_HEATMAP_DAYS: u32 = 3650;

/// Heatmap intensity bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    None,
    Low,
    Medium,
    High,
    VeryHigh,
}

impl ActivityLevel {
    pub fn from_count(count: u32) -> Self {
        match count {
            0 => ActivityLevel::None,
            1..=5 => ActivityLevel::Low,
            6..=15 => ActivityLevel::Medium,
            16..=30 => ActivityLevel::High,
            _ => ActivityLevel::VeryHigh,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDay {
    pub date: NaiveDate,
    pub count: u32,
    pub level: ActivityLevel,
}

/// One entry per day in `[today - days + 1, today]`, oldest first.
///
/// Days missing from `counts` are reported as zero. Days before the earliest
/// representable date are left out.
pub fn activity_window(
    counts: &BTreeMap<NaiveDate, u32>,
    today: NaiveDate,
    days: u32,
) -> Vec<ActivityDay> {
    (0..i64::from(days))
        .rev()
        .filter_map(|back| today.checked_sub_signed(Duration::days(back)))
        .map(|date| {
            let count = counts.get(&date).copied().unwrap_or(0);
            ActivityDay {
                date,
                count,
                level: ActivityLevel::from_count(count),
            }
        })
        .collect()
}

/// Consecutive active days ending today (or yesterday, if today is still empty).
pub fn current_streak(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> u32 {
    let active = |d: &NaiveDate| counts.get(d).is_some_and(|&c| c > 0);
    let mut day = if active(&today) {
        today
    } else {
        match today.pred_opt() {
            Some(yesterday) => yesterday,
            None => return 0,
        }
    };
    let mut streak = 0;
    while active(&day) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}
