//! Review delays indexed by mastery stage.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Default delays in days for stages 0..=4.
pub const DEFAULT_INTERVAL_DAYS: [u32; 5] = [1, 2, 4, 7, 15];

/// Delay used once a word has outgrown the table.
pub const DEFAULT_FALLBACK_DAYS: u32 = 30;

const MS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Ordered review delays.
///
/// Stage `n` (the `n+1`-th mastery) waits `interval_days[n]` days; any stage
/// past the end of the table waits `fallback_days`. Construction guarantees the
/// lookup is non-decreasing in the stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntervalTable {
    interval_days: Vec<u32>,
    fallback_days: u32,
}

impl Default for IntervalTable {
    fn default() -> Self {
        Self {
            interval_days: DEFAULT_INTERVAL_DAYS.to_vec(),
            fallback_days: DEFAULT_FALLBACK_DAYS,
        }
    }
}

impl IntervalTable {
    /// Build a table from day counts.
    ///
    /// # Errors
    /// Rejects an empty table, zero-day entries, a decreasing sequence, and a
    /// fallback shorter than the last stage.
    pub fn new(interval_days: Vec<u32>, fallback_days: u32) -> Result<Self, ValidationError> {
        let Some(&last) = interval_days.last() else {
            return Err(ValidationError::EmptyCollection("interval_days".into()));
        };
        if interval_days.contains(&0) {
            return Err(ValidationError::InvalidValue {
                field: "interval_days".into(),
                message: "intervals must be at least one day".into(),
            });
        }
        if interval_days.windows(2).any(|pair| pair[1] < pair[0]) {
            return Err(ValidationError::InvalidValue {
                field: "interval_days".into(),
                message: "intervals must not decrease".into(),
            });
        }
        if fallback_days < last {
            return Err(ValidationError::InvalidValue {
                field: "fallback_days".into(),
                message: format!("fallback ({fallback_days}) is shorter than the last interval ({last})"),
            });
        }
        Ok(Self {
            interval_days,
            fallback_days,
        })
    }

    pub fn len(&self) -> usize {
        self.interval_days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interval_days.is_empty()
    }

    pub fn interval_days(&self) -> &[u32] {
        &self.interval_days
    }

    pub fn fallback_days(&self) -> u32 {
        self.fallback_days
    }

    pub fn days_for_stage(&self, stage: usize) -> u32 {
        self.interval_days
            .get(stage)
            .copied()
            .unwrap_or(self.fallback_days)
    }

    pub fn duration_for_stage(&self, stage: usize) -> Duration {
        Duration::days(i64::from(self.days_for_stage(stage)))
    }

    pub fn millis_for_stage(&self, stage: usize) -> i64 {
        i64::from(self.days_for_stage(stage)) * MS_PER_DAY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_design_values() {
        let table = IntervalTable::default();
        let days: Vec<u32> = (0..7).map(|s| table.days_for_stage(s)).collect();
        assert_eq!(days, vec![1, 2, 4, 7, 15, 30, 30]);
        assert_eq!(table.duration_for_stage(0), Duration::days(1));
        assert_eq!(table.millis_for_stage(0), 86_400_000);
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(
            IntervalTable::new(vec![], 30),
            Err(ValidationError::EmptyCollection("interval_days".into()))
        );
    }

    #[test]
    fn rejects_decreasing_table() {
        assert!(IntervalTable::new(vec![1, 3, 2], 30).is_err());
        assert!(IntervalTable::new(vec![0, 1], 30).is_err());
    }

    #[test]
    fn rejects_short_fallback() {
        assert!(IntervalTable::new(vec![1, 2, 40], 30).is_err());
        assert!(IntervalTable::new(vec![1, 2, 30], 30).is_ok());
    }
}
