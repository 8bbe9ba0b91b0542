//! A single vocabulary entry and its learning history.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable identifier of a word.
pub type WordId = String;

/// Milliseconds since the Unix epoch.
pub type Timestamp = i64;

/// A vocabulary entry.
///
/// The display fields are opaque to the scheduler. Only `mastered_dates` and
/// `incorrect_count` take part in scheduling decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Word {
    pub id: WordId,
    pub english: String,
    #[serde(default)]
    pub phonetic: String,
    #[serde(default, alias = "partOfSpeech")]
    pub part_of_speech: String,
    /// Meaning shown on the back of the card.
    #[serde(alias = "chinese")]
    pub definition: String,
    /// One entry per completed memorize -> master cycle, oldest first.
    #[serde(default, alias = "masteredDates")]
    pub mastered_dates: Vec<Timestamp>,
    #[serde(default, alias = "incorrectCount")]
    pub incorrect_count: u32,
}

impl Word {
    /// Create a brand new word with a generated id and no history.
    pub fn new(
        english: impl Into<String>,
        phonetic: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self::with_id(Uuid::new_v4().to_string(), english, phonetic, definition)
    }

    pub fn with_id(
        id: impl Into<WordId>,
        english: impl Into<String>,
        phonetic: impl Into<String>,
        definition: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            english: english.into(),
            phonetic: phonetic.into(),
            part_of_speech: String::new(),
            definition: definition.into(),
            mastered_dates: Vec::new(),
            incorrect_count: 0,
        }
    }

    pub fn mastery_count(&self) -> usize {
        self.mastered_dates.len()
    }

    pub fn is_mastered(&self) -> bool {
        !self.mastered_dates.is_empty()
    }

    pub fn last_mastered(&self) -> Option<Timestamp> {
        self.mastered_dates.last().copied()
    }

    /// Zero-based interval stage, `None` for a word that was never mastered.
    pub fn stage(&self) -> Option<usize> {
        self.mastered_dates.len().checked_sub(1)
    }

    /// Append a mastery event.
    ///
    /// A timestamp earlier than the last recorded one (clock moved backwards)
    /// is clamped so the history stays non-decreasing.
    pub fn record_mastery(&mut self, at: Timestamp) {
        let at = self.last_mastered().map_or(at, |last| at.max(last));
        self.mastered_dates.push(at);
    }

    pub fn record_lapse(&mut self) {
        self.incorrect_count = self.incorrect_count.saturating_add(1);
    }

    /// Same display text, ignoring id and history.
    pub fn same_entry(&self, other: &Word) -> bool {
        self.english == other.english
            && self.phonetic == other.phonetic
            && self.definition == other.definition
    }

    /// Copy of this word under a new id with its learning history cleared.
    pub fn fresh_copy(&self) -> Word {
        Word {
            id: Uuid::new_v4().to_string(),
            mastered_dates: Vec::new(),
            incorrect_count: 0,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stage_follows_mastery_count() {
        let mut word = Word::new("abandon", "/əˈbændən/", "to give up");
        assert_eq!(word.stage(), None);
        word.record_mastery(1_000);
        assert_eq!(word.stage(), Some(0));
        word.record_mastery(2_000);
        assert_eq!(word.stage(), Some(1));
        assert_eq!(word.last_mastered(), Some(2_000));
    }

    #[test]
    fn record_mastery_never_goes_backwards() {
        let mut word = Word::new("absolute", "", "complete");
        word.record_mastery(5_000);
        word.record_mastery(4_000);
        assert_eq!(word.mastered_dates, vec![5_000, 5_000]);
    }

    #[test]
    fn fresh_copy_resets_history() {
        let mut word = Word::new("abundant", "", "plentiful");
        word.record_mastery(10);
        word.record_lapse();

        let copy = word.fresh_copy();
        assert_ne!(copy.id, word.id);
        assert!(copy.same_entry(&word));
        assert!(copy.mastered_dates.is_empty());
        assert_eq!(copy.incorrect_count, 0);
    }

    #[test]
    fn deserializes_legacy_field_names() {
        let json = r#"{
            "id": "w1",
            "english": "abandon",
            "phonetic": "/əˈbændən/",
            "chinese": "v. 放弃",
            "masteredDates": [1700000000000],
            "incorrectCount": 2
        }"#;
        let word: Word = serde_json::from_str(json).unwrap();
        assert_eq!(word.definition, "v. 放弃");
        assert_eq!(word.mastered_dates, vec![1_700_000_000_000]);
        assert_eq!(word.incorrect_count, 2);
    }
}
