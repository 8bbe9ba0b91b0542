//! Interval-based review scheduling.
//!
//! A word's stage is the number of prior masteries minus one. The stage
//! indexes an [`IntervalTable`]; the [`ReviewClock`] adds that delay to the
//! last mastery to get the next-due time.

mod clock;
mod interval;
mod review;

pub use clock::{Clock, FixedClock, SystemClock};
pub use interval::{IntervalTable, DEFAULT_FALLBACK_DAYS, DEFAULT_INTERVAL_DAYS};
pub use review::{ReviewClock, WordStatus};
