//! Word lists and the consolidation queue they carry.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::word::{Word, WordId};
use crate::error::{CoreError, Result, ValidationError};

/// Opaque, stable identifier of a list.
pub type ListId = String;

/// An ordered collection of words plus the set of words flagged for
/// short-term reinforcement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordList {
    pub id: ListId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Display order. Consolidate ties keep this order.
    #[serde(default)]
    pub words: Vec<Word>,
    #[serde(default, alias = "consolidationQueueIds")]
    pub consolidation_queue_ids: BTreeSet<WordId>,
}

impl WordList {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: description.into(),
            words: Vec::new(),
            consolidation_queue_ids: BTreeSet::new(),
        }
    }

    /// The list shipped with a fresh install.
    pub fn starter() -> Self {
        Self {
            id: "list-1".to_string(),
            name: "CET-4 Core".to_string(),
            description: "Essential words for College English Test Band 4".to_string(),
            words: vec![
                Word::with_id("w1", "abandon", "/əˈbændən/", "v. 放弃，遗弃；抛弃"),
                Word::with_id("w2", "absolute", "/ˈæbsəluːt/", "adj. 绝对的；完全的"),
                Word::with_id("w3", "abundant", "/əˈbʌndənt/", "adj. 丰富的；充裕的"),
            ],
            consolidation_queue_ids: BTreeSet::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn word(&self, id: &str) -> Option<&Word> {
        self.words.iter().find(|w| w.id == id)
    }

    pub fn word_mut(&mut self, id: &str) -> Option<&mut Word> {
        self.words.iter_mut().find(|w| w.id == id)
    }

    /// Lookup that reports a missing id as an error.
    pub fn require_word_mut(&mut self, id: &str) -> Result<&mut Word> {
        let list_id = self.id.clone();
        self.word_mut(id).ok_or_else(|| CoreError::WordNotFound {
            list_id,
            word_id: id.to_string(),
        })
    }

    pub fn is_queued(&self, id: &str) -> bool {
        self.consolidation_queue_ids.contains(id)
    }

    /// Returns `true` if the id was not queued before.
    pub fn enqueue(&mut self, id: &str) -> bool {
        self.consolidation_queue_ids.insert(id.to_string())
    }

    /// Returns `true` if the id was queued before.
    pub fn dequeue(&mut self, id: &str) -> bool {
        self.consolidation_queue_ids.remove(id)
    }

    pub fn add_word(&mut self, word: Word) -> &Word {
        self.words.push(word);
        let idx = self.words.len() - 1;
        &self.words[idx]
    }

    /// Replace the display text of a word, keeping its history.
    pub fn edit_word(
        &mut self,
        id: &str,
        english: impl Into<String>,
        phonetic: impl Into<String>,
        definition: impl Into<String>,
    ) -> Result<&Word> {
        let word = self.require_word_mut(id)?;
        word.english = english.into();
        word.phonetic = phonetic.into();
        word.definition = definition.into();
        Ok(&*word)
    }

    /// Remove a word and drop it from the consolidation queue.
    pub fn remove_word(&mut self, id: &str) -> Result<Word> {
        let idx = self
            .words
            .iter()
            .position(|w| w.id == id)
            .ok_or_else(|| CoreError::WordNotFound {
                list_id: self.id.clone(),
                word_id: id.to_string(),
            })?;
        self.consolidation_queue_ids.remove(id);
        Ok(self.words.remove(idx))
    }

    pub fn contains_entry(&self, word: &Word) -> bool {
        self.words.iter().any(|w| w.same_entry(word))
    }

    /// Add a history-free copy of `word` to this list.
    ///
    /// Rejected when a word with identical text is already present.
    pub fn add_copy_of(&mut self, word: &Word) -> Result<&Word> {
        if self.contains_entry(word) {
            return Err(ValidationError::DuplicateWord {
                list_id: self.id.clone(),
                english: word.english.clone(),
            }
            .into());
        }
        Ok(self.add_word(word.fresh_copy()))
    }

    /// Repair data coming from an untrusted source (backups, older versions).
    ///
    /// Sorts mastery histories and drops queue ids that no longer reference a
    /// word. Returns the number of dangling queue ids removed.
    pub fn normalize(&mut self) -> usize {
        for word in &mut self.words {
            word.mastered_dates.sort_unstable();
        }
        let before = self.consolidation_queue_ids.len();
        let words = &self.words;
        self.consolidation_queue_ids
            .retain(|id| words.iter().any(|w| &w.id == id));
        before - self.consolidation_queue_ids.len()
    }
}
