//! Learning session state machine.
//!
//! A session walks a snapshot queue one card at a time. Every card starts in
//! `Question`; the learner's first judgment reveals the answer, the second
//! completes the card and advances the cursor.
//!
//! ## Card Transitions
//!
//! ```text
//! Question -(known)---> PassRevealed -(mastered | review later | still unknown)-> done
//! Question -(unknown)-> FailRevealed -(got it)-------------------------------> done
//! ```
//!
//! After the last card the session is `Finished`, which is absorbing.
//!
//! ## Usage
//!
//! ```ignore
//! let mut session = builder.start_session(&list, LearningMode::Memorize, now, 0);
//! session.submit_known()?;
//! let outcome = session.confirm_mastered(clock.now_ms())?;
//! outcome.apply_to(&mut list)?;
//! ```

use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use super::mode::LearningMode;
use super::outcome::{CardOutcome, Decision, WordMutation};
use crate::error::SessionError;
use crate::model::{ListId, Timestamp, Word};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CardState {
    Question,
    /// Learner said "unknown".
    FailRevealed,
    /// Learner said "known".
    PassRevealed,
}

/// One bounded pass over a snapshot queue.
///
/// Serializable so a host can park it between interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    list_id: ListId,
    mode: LearningMode,
    queue: Vec<Word>,
    cursor: usize,
    card_state: CardState,
    finished: bool,
    /// Set once the cursor failed to resolve. Never cleared.
    #[serde(default)]
    corrupt: bool,
    /// Cards completed in this session.
    completed: usize,
    /// Running daily memorize total. Seeded from the counter of the start
    /// day; the host re-syncs it after each persisted increment.
    daily_count: u32,
}

impl Session {
    /// Wrap a prebuilt queue. An empty queue is finished immediately.
    pub fn new(list_id: ListId, mode: LearningMode, queue: Vec<Word>, daily_count: u32) -> Self {
        let finished = queue.is_empty();
        info!(%list_id, %mode, cards = queue.len(), "session started");
        Self {
            list_id,
            mode,
            queue,
            cursor: 0,
            card_state: CardState::Question,
            finished,
            corrupt: false,
            completed: 0,
            daily_count,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn mode(&self) -> LearningMode {
        self.mode
    }

    pub fn queue(&self) -> &[Word] {
        &self.queue
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn card_state(&self) -> CardState {
        self.card_state
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn is_corrupt(&self) -> bool {
        self.corrupt
    }

    pub fn completed(&self) -> usize {
        self.completed
    }

    pub fn remaining(&self) -> usize {
        self.queue.len().saturating_sub(self.completed)
    }

    pub fn daily_count(&self) -> u32 {
        self.daily_count
    }

    /// The card under the cursor, `None` once finished.
    ///
    /// # Errors
    /// `CorruptSession` if the cursor does not resolve to a card.
    pub fn current_card(&self) -> Result<Option<&Word>, SessionError> {
        if self.corrupt {
            return Err(self.corrupt_error());
        }
        if self.finished {
            return Ok(None);
        }
        self.queue
            .get(self.cursor)
            .map(Some)
            .ok_or_else(|| self.corrupt_error())
    }

    /// Serializable summary for display.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            list_id: self.list_id.clone(),
            mode: self.mode,
            card_state: self.card_state,
            position: (self.cursor + 1).min(self.queue.len()),
            total: self.queue.len(),
            completed: self.completed,
            finished: self.finished,
            daily_count: self.daily_count,
            card: self.current_card().ok().flatten().cloned(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Replace the running daily total with the value the host persisted.
    ///
    /// After the reference midnight the stored counter restarts under a new
    /// day key while the session's own total would keep counting.
    pub fn sync_daily_count(&mut self, persisted: u32) {
        self.daily_count = persisted;
    }

    /// Learner recognizes the word.
    pub fn submit_known(&mut self) -> Result<CardOutcome, SessionError> {
        self.reveal("submit_known", CardState::PassRevealed)
    }

    /// Learner does not recognize the word.
    pub fn submit_unknown(&mut self) -> Result<CardOutcome, SessionError> {
        self.reveal("submit_unknown", CardState::FailRevealed)
    }

    /// Acknowledge the answer after a failed recall.
    pub fn confirm_got_it(&mut self) -> Result<CardOutcome, SessionError> {
        self.decide(Decision::GotIt)
    }

    /// Graduate the word, stamping the mastery with `now`.
    pub fn confirm_mastered(&mut self, now: Timestamp) -> Result<CardOutcome, SessionError> {
        self.decide(Decision::Mastered { at: now })
    }

    pub fn confirm_review_later(&mut self) -> Result<CardOutcome, SessionError> {
        self.decide(Decision::ReviewLater)
    }

    pub fn confirm_still_unknown(&mut self) -> Result<CardOutcome, SessionError> {
        self.decide(Decision::StillUnknown)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn reveal(
        &mut self,
        action: &'static str,
        to: CardState,
    ) -> Result<CardOutcome, SessionError> {
        let word_id = self.resolve()?.id.clone();
        if self.card_state != CardState::Question {
            return Err(SessionError::InvalidTransition {
                action,
                state: self.card_state,
            });
        }
        self.card_state = to;
        debug!(%word_id, state = ?to, "card revealed");
        Ok(CardOutcome::reveal(word_id))
    }

    fn decide(&mut self, decision: Decision) -> Result<CardOutcome, SessionError> {
        let mut mutated = self.resolve()?.clone();

        let allowed = match decision {
            Decision::GotIt => self.card_state == CardState::FailRevealed,
            Decision::Mastered { .. } | Decision::ReviewLater | Decision::StillUnknown => {
                self.card_state == CardState::PassRevealed
            }
        };
        if !allowed {
            return Err(SessionError::InvalidTransition {
                action: decision_action(decision),
                state: self.card_state,
            });
        }

        let (mutation, queue_add, queue_remove) = match decision {
            Decision::Mastered { at } => (WordMutation::RecordMastery { at }, false, true),
            Decision::GotIt | Decision::ReviewLater | Decision::StillUnknown => {
                (WordMutation::RecordLapse, true, false)
            }
        };

        mutation.apply(&mut mutated);

        let daily_progress = self.mode.counts_toward_daily();
        if daily_progress {
            self.daily_count = self.daily_count.saturating_add(1);
        }
        self.completed += 1;
        self.advance();

        info!(
            word_id = %mutated.id,
            decision = decision.as_str(),
            completed = self.completed,
            "card completed"
        );

        Ok(CardOutcome {
            word_id: mutated.id.clone(),
            mutation: Some(mutation),
            mutated_word: Some(mutated),
            queue_add,
            queue_remove,
            session_advanced: true,
            finished: self.finished,
            daily_progress,
        })
    }

    /// Current card for a command, rejecting finished and corrupt sessions.
    fn resolve(&mut self) -> Result<&Word, SessionError> {
        if self.corrupt {
            return Err(self.corrupt_error());
        }
        if self.finished {
            return Err(SessionError::Finished { mode: self.mode });
        }
        if self.cursor >= self.queue.len() {
            self.corrupt = true;
            let err = self.corrupt_error();
            error!(list_id = %self.list_id, error = %err, "session corrupted");
            return Err(err);
        }
        Ok(&self.queue[self.cursor])
    }

    fn advance(&mut self) {
        self.card_state = CardState::Question;
        self.cursor += 1;
        if self.cursor >= self.queue.len() {
            self.finished = true;
            info!(
                list_id = %self.list_id,
                mode = %self.mode,
                completed = self.completed,
                "session finished"
            );
        }
    }

    fn corrupt_error(&self) -> SessionError {
        SessionError::CorruptSession {
            cursor: self.cursor,
            queue_len: self.queue.len(),
        }
    }
}

fn decision_action(decision: Decision) -> &'static str {
    match decision {
        Decision::GotIt => "confirm_got_it",
        Decision::Mastered { .. } => "confirm_mastered",
        Decision::ReviewLater => "confirm_review_later",
        Decision::StillUnknown => "confirm_still_unknown",
    }
}

/// Display summary of a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub list_id: ListId,
    pub mode: LearningMode,
    pub card_state: CardState,
    /// 1-based position of the current card.
    pub position: usize,
    pub total: usize,
    pub completed: usize,
    pub finished: bool,
    pub daily_count: u32,
    pub card: Option<Word>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_700_000_000_000;

    fn session_of(n: usize, mode: LearningMode) -> Session {
        let queue = (0..n)
            .map(|i| Word::with_id(format!("w{i}"), format!("word{i}"), "", "meaning"))
            .collect();
        Session::new("list".into(), mode, queue, 0)
    }

    #[test]
    fn known_then_mastered_records_mastery() {
        let mut session = session_of(2, LearningMode::Memorize);

        let reveal = session.submit_known().unwrap();
        assert_eq!(reveal.mutation, None);
        assert!(!reveal.session_advanced);
        assert_eq!(session.card_state(), CardState::PassRevealed);

        let done = session.confirm_mastered(NOW).unwrap();
        assert_eq!(done.mutation, Some(WordMutation::RecordMastery { at: NOW }));
        assert!(done.queue_remove);
        assert!(!done.queue_add);
        assert!(done.session_advanced);
        assert!(!done.finished);
        assert_eq!(done.mutated_word.unwrap().mastered_dates, vec![NOW]);
        assert_eq!(session.card_state(), CardState::Question);
        assert_eq!(session.cursor(), 1);
    }

    #[test]
    fn unknown_then_got_it_records_lapse() {
        let mut session = session_of(1, LearningMode::Review);
        session.submit_unknown().unwrap();
        let done = session.confirm_got_it().unwrap();
        assert_eq!(done.mutation, Some(WordMutation::RecordLapse));
        assert!(done.queue_add);
        assert_eq!(done.mutated_word.unwrap().incorrect_count, 1);
        assert!(done.finished);
        assert!(!done.daily_progress);
    }

    #[test]
    fn review_later_and_still_unknown_record_lapse() {
        for later in [true, false] {
            let mut session = session_of(1, LearningMode::Consolidate);
            session.submit_known().unwrap();
            let done = if later {
                session.confirm_review_later().unwrap()
            } else {
                session.confirm_still_unknown().unwrap()
            };
            assert_eq!(done.mutation, Some(WordMutation::RecordLapse));
            assert!(done.queue_add);
            assert!(!done.queue_remove);
        }
    }

    #[test]
    fn decisions_rejected_in_question_state() {
        let mut session = session_of(1, LearningMode::Memorize);
        let err = session.confirm_mastered(NOW).unwrap_err();
        assert_eq!(
            err,
            SessionError::InvalidTransition {
                action: "confirm_mastered",
                state: CardState::Question
            }
        );
        assert!(session.confirm_got_it().is_err());
        assert_eq!(session.cursor(), 0);
        assert_eq!(session.daily_count(), 0);
    }

    #[test]
    fn pass_path_decisions_rejected_after_fail() {
        let mut session = session_of(1, LearningMode::Memorize);
        session.submit_unknown().unwrap();
        assert!(session.confirm_mastered(NOW).is_err());
        assert!(session.confirm_review_later().is_err());
        assert!(session.confirm_still_unknown().is_err());
        assert!(session.submit_known().is_err());
        assert_eq!(session.card_state(), CardState::FailRevealed);
    }

    #[test]
    fn got_it_rejected_after_pass() {
        let mut session = session_of(1, LearningMode::Memorize);
        session.submit_known().unwrap();
        assert!(matches!(
            session.confirm_got_it(),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert!(session.submit_unknown().is_err());
    }

    #[test]
    fn memorize_completions_bump_daily_count() {
        let mut session = Session::new(
            "list".into(),
            LearningMode::Memorize,
            vec![
                Word::with_id("a", "a", "", "a"),
                Word::with_id("b", "b", "", "b"),
            ],
            5,
        );
        session.submit_known().unwrap();
        assert!(session.confirm_mastered(NOW).unwrap().daily_progress);
        session.submit_unknown().unwrap();
        session.confirm_got_it().unwrap();
        assert_eq!(session.daily_count(), 7);
    }

    #[test]
    fn each_decision_maps_to_its_mutation() {
        let mut mastered = session_of(1, LearningMode::Consolidate);
        mastered.submit_known().unwrap();
        let done = mastered.confirm_mastered(NOW + 5).unwrap();
        assert_eq!(
            done.mutation,
            Some(WordMutation::RecordMastery { at: NOW + 5 })
        );
        assert!(done.queue_remove && !done.queue_add);
        assert_eq!(done.mutated_word.unwrap().incorrect_count, 0);

        let mut lapsed = session_of(1, LearningMode::Consolidate);
        lapsed.submit_known().unwrap();
        let done = lapsed.confirm_still_unknown().unwrap();
        assert_eq!(done.mutation, Some(WordMutation::RecordLapse));
        assert!(done.mutated_word.unwrap().mastered_dates.is_empty());
    }

    #[test]
    fn daily_count_follows_persisted_counter() {
        let mut session = session_of(2, LearningMode::Memorize);
        session.sync_daily_count(9);
        session.submit_unknown().unwrap();
        session.confirm_got_it().unwrap();
        assert_eq!(session.daily_count(), 10);

        // The stored counter rolled over to a new day.
        session.sync_daily_count(1);
        assert_eq!(session.daily_count(), 1);
        assert_eq!(session.snapshot().daily_count, 1);
    }

    #[test]
    fn finished_is_absorbing() {
        let mut session = session_of(1, LearningMode::Memorize);
        session.submit_unknown().unwrap();
        assert!(session.confirm_got_it().unwrap().finished);
        assert!(session.is_finished());
        assert_eq!(session.current_card(), Ok(None));
        assert_eq!(
            session.submit_known().unwrap_err(),
            SessionError::Finished {
                mode: LearningMode::Memorize
            }
        );
        assert_eq!(session.completed(), 1);
    }

    #[test]
    fn empty_queue_is_finished_immediately() {
        let session = session_of(0, LearningMode::Review);
        assert!(session.is_finished());
        assert_eq!(session.current_card(), Ok(None));
        assert_eq!(session.remaining(), 0);
    }

    #[test]
    fn dangling_cursor_poisons_session() {
        let json = serde_json::json!({
            "list_id": "list",
            "mode": "memorize",
            "queue": [],
            "cursor": 3,
            "card_state": "question",
            "finished": false,
            "completed": 0,
            "daily_count": 0
        });
        let mut session: Session = serde_json::from_value(json).unwrap();
        let err = session.submit_known().unwrap_err();
        assert_eq!(
            err,
            SessionError::CorruptSession {
                cursor: 3,
                queue_len: 0
            }
        );
        assert!(session.is_corrupt());
        assert_eq!(session.current_card().unwrap_err(), err);
        assert_eq!(session.confirm_got_it().unwrap_err(), err);
    }

    #[test]
    fn snapshot_reports_position() {
        let mut session = session_of(3, LearningMode::Memorize);
        session.submit_unknown().unwrap();
        session.confirm_got_it().unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.position, 2);
        assert_eq!(snap.total, 3);
        assert_eq!(snap.completed, 1);
        assert_eq!(snap.card.unwrap().id, "w1");
    }
}
