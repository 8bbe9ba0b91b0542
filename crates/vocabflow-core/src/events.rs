use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{ListId, WordId};
use crate::session::{CardOutcome, CardState, LearningMode, Session, WordMutation};

/// Every session state change produces an Event.
/// Front ends render them; the CLI prints them as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SessionStarted {
        list_id: ListId,
        mode: LearningMode,
        cards: usize,
        at: DateTime<Utc>,
    },
    CardRevealed {
        word_id: WordId,
        card_state: CardState,
        at: DateTime<Utc>,
    },
    CardCompleted {
        word_id: WordId,
        mutation: WordMutation,
        queue_add: bool,
        queue_remove: bool,
        daily_count: u32,
        at: DateTime<Utc>,
    },
    SessionFinished {
        list_id: ListId,
        mode: LearningMode,
        completed: usize,
        at: DateTime<Utc>,
    },
    /// Session dropped before the last card. Completed cards stay applied.
    SessionAbandoned {
        list_id: ListId,
        mode: LearningMode,
        completed: usize,
        remaining: usize,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn started(session: &Session, at: DateTime<Utc>) -> Self {
        Event::SessionStarted {
            list_id: session.list_id().to_string(),
            mode: session.mode(),
            cards: session.len(),
            at,
        }
    }

    /// Events for a transition: a reveal, or a completion optionally
    /// followed by `SessionFinished`.
    pub fn from_outcome(session: &Session, outcome: &CardOutcome, at: DateTime<Utc>) -> Vec<Self> {
        let Some(mutation) = outcome.mutation else {
            return vec![Event::CardRevealed {
                word_id: outcome.word_id.clone(),
                card_state: session.card_state(),
                at,
            }];
        };

        let mut events = vec![Event::CardCompleted {
            word_id: outcome.word_id.clone(),
            mutation,
            queue_add: outcome.queue_add,
            queue_remove: outcome.queue_remove,
            daily_count: session.daily_count(),
            at,
        }];
        if outcome.finished {
            events.push(Event::SessionFinished {
                list_id: session.list_id().to_string(),
                mode: session.mode(),
                completed: session.completed(),
                at,
            });
        }
        events
    }

    pub fn abandoned(session: &Session, at: DateTime<Utc>) -> Self {
        Event::SessionAbandoned {
            list_id: session.list_id().to_string(),
            mode: session.mode(),
            completed: session.completed(),
            remaining: session.remaining(),
            at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Word;

    #[test]
    fn completion_of_last_card_also_finishes() {
        let mut session = Session::new(
            "l".into(),
            LearningMode::Memorize,
            vec![Word::with_id("w", "w", "", "w")],
            0,
        );
        let at = Utc::now();

        let reveal = session.submit_unknown().unwrap();
        let events = Event::from_outcome(&session, &reveal, at);
        assert!(matches!(
            events.as_slice(),
            [Event::CardRevealed {
                card_state: CardState::FailRevealed,
                ..
            }]
        ));

        let done = session.confirm_got_it().unwrap();
        let events = Event::from_outcome(&session, &done, at);
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[0],
            Event::CardCompleted {
                mutation: WordMutation::RecordLapse,
                daily_count: 1,
                ..
            }
        ));
        assert!(matches!(&events[1], Event::SessionFinished { completed: 1, .. }));
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let event = Event::SessionAbandoned {
            list_id: "l".into(),
            mode: LearningMode::Review,
            completed: 2,
            remaining: 3,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "session_abandoned");
        assert_eq!(json["mode"], "review");
    }
}
