//! Mutation descriptors returned by the session engine.
//!
//! The engine never touches the store. Each transition returns a
//! [`CardOutcome`] that the host applies to its own copy of the list.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Timestamp, Word, WordId, WordList};

/// Change to a word's scheduling fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WordMutation {
    /// `incorrect_count += 1`
    RecordLapse,
    /// Append `at` to `mastered_dates`.
    RecordMastery { at: Timestamp },
}

impl WordMutation {
    pub fn apply(&self, word: &mut Word) {
        match *self {
            WordMutation::RecordLapse => word.record_lapse(),
            WordMutation::RecordMastery { at } => word.record_mastery(at),
        }
    }
}

/// Final judgment on a revealed card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// Failed recall, answer acknowledged.
    GotIt,
    /// Recalled and confirmed at `at`; graduates the word.
    Mastered { at: Timestamp },
    /// Recalled but wants more practice.
    ReviewLater,
    /// Thought it was known, the answer proved otherwise.
    StillUnknown,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::GotIt => "got_it",
            Decision::Mastered { .. } => "mastered",
            Decision::ReviewLater => "review_later",
            Decision::StillUnknown => "still_unknown",
        }
    }
}

/// Result of a single session transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardOutcome {
    pub word_id: WordId,
    /// `None` for reveal transitions.
    pub mutation: Option<WordMutation>,
    /// The session's copy of the word with `mutation` applied.
    pub mutated_word: Option<Word>,
    pub queue_add: bool,
    pub queue_remove: bool,
    /// The cursor moved past this card.
    pub session_advanced: bool,
    pub finished: bool,
    /// This completion counts toward the daily memorize total.
    pub daily_progress: bool,
}

impl CardOutcome {
    pub(crate) fn reveal(word_id: WordId) -> Self {
        Self {
            word_id,
            mutation: None,
            mutated_word: None,
            queue_add: false,
            queue_remove: false,
            session_advanced: false,
            finished: false,
            daily_progress: false,
        }
    }

    pub fn is_completion(&self) -> bool {
        self.session_advanced
    }

    /// Apply the mutation to the live list.
    ///
    /// The delta is applied to the list's current word rather than replacing
    /// it with `mutated_word`, so edits made elsewhere during the session
    /// survive.
    ///
    /// # Errors
    /// Returns `WordNotFound` if the word was removed from the list after the
    /// session was built. Nothing is changed in that case.
    pub fn apply_to(&self, list: &mut WordList) -> Result<()> {
        if let Some(mutation) = self.mutation {
            mutation.apply(list.require_word_mut(&self.word_id)?);
        }
        if self.queue_add {
            list.enqueue(&self.word_id);
        }
        if self.queue_remove {
            list.dequeue(&self.word_id);
        }
        Ok(())
    }
}
