use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Which subset of a list a session works through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningMode {
    /// New words.
    Memorize,
    /// Words in the consolidation queue.
    Consolidate,
    /// Mastered words whose review is due.
    Review,
}

impl LearningMode {
    pub const ALL: [LearningMode; 3] = [
        LearningMode::Memorize,
        LearningMode::Consolidate,
        LearningMode::Review,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            LearningMode::Memorize => "memorize",
            LearningMode::Consolidate => "consolidate",
            LearningMode::Review => "review",
        }
    }

    /// Completed cards of this mode count toward the daily total.
    pub fn counts_toward_daily(&self) -> bool {
        matches!(self, LearningMode::Memorize)
    }
}

impl fmt::Display for LearningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "memorize" => Ok(LearningMode::Memorize),
            "consolidate" => Ok(LearningMode::Consolidate),
            "review" => Ok(LearningMode::Review),
            other => Err(format!(
                "unknown mode '{other}' (expected memorize, consolidate or review)"
            )),
        }
    }
}
