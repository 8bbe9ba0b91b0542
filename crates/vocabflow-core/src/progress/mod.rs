//! Progress statistics.
//!
//! Everything here is recomputed from the current list snapshot, except the
//! daily memorize counter, which is persisted per list and reference day by
//! [`crate::storage::Database`].

mod activity;
mod counters;
mod day;

pub use activity::{
    activity_window, current_streak, ActivityDay, ActivityLevel, DEFAULT_HEATMAP_DAYS,
    MAX_HEATMAP_DAYS,
};
pub use counters::{learned_count, mastered_count, ListProgress};
pub use day::{format_day, parse_day, ReferenceZone, DEFAULT_REFERENCE_OFFSET_HOURS};
