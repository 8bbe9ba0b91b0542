//! Calendar days in a fixed reference offset.
//!
//! Daily counters roll over at midnight of the reference offset, not the
//! learner's local midnight, so the boundary does not move when they travel.

use chrono::{DateTime, FixedOffset, NaiveDate, Offset, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::model::Timestamp;

/// UTC+8.
pub const DEFAULT_REFERENCE_OFFSET_HOURS: i32 = 8;

const DAY_KEY_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceZone {
    offset_hours: i32,
}

impl Default for ReferenceZone {
    fn default() -> Self {
        Self {
            offset_hours: DEFAULT_REFERENCE_OFFSET_HOURS,
        }
    }
}

impl ReferenceZone {
    /// # Errors
    /// Offsets outside -12..=14 hours are rejected.
    pub fn new(offset_hours: i32) -> Result<Self, ValidationError> {
        if !(-12..=14).contains(&offset_hours) {
            return Err(ValidationError::InvalidValue {
                field: "reference_offset_hours".into(),
                message: format!("{offset_hours} is outside -12..=14"),
            });
        }
        Ok(Self { offset_hours })
    }

    pub fn offset_hours(&self) -> i32 {
        self.offset_hours
    }

    fn offset(&self) -> FixedOffset {
        // Out-of-range values can only arrive through deserialization.
        FixedOffset::east_opt(self.offset_hours * 3600).unwrap_or(Utc.fix())
    }

    /// Calendar day containing `at`.
    pub fn day_of(&self, at: Timestamp) -> NaiveDate {
        DateTime::from_timestamp_millis(at)
            .unwrap_or_default()
            .with_timezone(&self.offset())
            .date_naive()
    }

    /// `YYYY-MM-DD` key used by the daily counter store.
    pub fn day_key(&self, at: Timestamp) -> String {
        format_day(self.day_of(at))
    }
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_KEY_FORMAT).to_string()
}

pub fn parse_day(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key, DAY_KEY_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-01T15:59:59.999Z and one millisecond later.
    const BEFORE_MIDNIGHT_CST: i64 = 1_709_308_799_999;
    const MIDNIGHT_CST: i64 = 1_709_308_800_000;

    #[test]
    fn day_rolls_over_at_reference_midnight() {
        let zone = ReferenceZone::default();
        assert_eq!(zone.day_key(BEFORE_MIDNIGHT_CST), "2024-03-01");
        assert_eq!(zone.day_key(MIDNIGHT_CST), "2024-03-02");
    }

    #[test]
    fn utc_zone_uses_utc_day() {
        let zone = ReferenceZone::new(0).unwrap();
        assert_eq!(zone.day_key(MIDNIGHT_CST), "2024-03-01");
    }

    #[test]
    fn rejects_out_of_range_offsets() {
        assert!(ReferenceZone::new(15).is_err());
        assert!(ReferenceZone::new(-13).is_err());
        assert!(ReferenceZone::new(-12).is_ok());
    }

    #[test]
    fn day_keys_round_trip() {
        let day = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        assert_eq!(parse_day(&format_day(day)), Some(day));
        assert_eq!(parse_day("31/12/2025"), None);
    }
}
