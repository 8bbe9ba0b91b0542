//! Learning session commands for CLI.
//!
//! The active session is parked in the kv store between invocations. Every
//! completed card is applied to the stored list immediately, so an aborted
//! session keeps the progress made so far.

use chrono::NaiveDate;
use clap::Subcommand;
use tracing::warn;
use vocabflow_core::storage::Database;
use vocabflow_core::{
    CardOutcome, Clock, Config, CoreError, Event, LearningMode, Session, SessionError,
    SystemClock, Timestamp,
};

const SESSION_KEY: &str = "active_session";

#[derive(Subcommand)]
pub enum StudyAction {
    /// Start a session over a list
    Start {
        /// List ID
        list_id: String,
        /// memorize, consolidate or review
        #[arg(long, default_value = "memorize")]
        mode: LearningMode,
    },
    /// Print the current card and session progress as JSON
    Show,
    /// "I know this word"
    Known,
    /// "I don't know this word"
    Unknown,
    /// Acknowledge the answer after "unknown"
    GotIt,
    /// Confirm a known word as mastered
    Mastered,
    /// Known, but keep practicing it
    Later,
    /// Thought it was known, it wasn't
    Mistaken,
    /// Drop the session; completed cards stay applied
    Abort,
}

fn load_session(db: &Database) -> Result<Option<Session>, Box<dyn std::error::Error>> {
    match db.kv_get(SESSION_KEY)? {
        Some(json) => Ok(Some(serde_json::from_str::<Session>(&json)?)),
        None => Ok(None),
    }
}

fn save_session(db: &Database, session: &Session) -> Result<(), Box<dyn std::error::Error>> {
    if session.is_finished() {
        db.kv_delete(SESSION_KEY)?;
    } else {
        let json = serde_json::to_string(session)?;
        db.kv_set(SESSION_KEY, &json)?;
    }
    Ok(())
}

fn require_session(db: &Database) -> Result<Session, Box<dyn std::error::Error>> {
    load_session(db)?.ok_or_else(|| "no active session; run `study start <list-id>`".into())
}

/// Drop the parked session, if any.
pub fn discard(db: &Database) -> Result<(), Box<dyn std::error::Error>> {
    db.kv_delete(SESSION_KEY)?;
    Ok(())
}

/// Drop the parked session if it belongs to `list_id`.
pub fn discard_for_list(db: &Database, list_id: &str) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(session) = load_session(db)? {
        if session.list_id() == list_id {
            db.kv_delete(SESSION_KEY)?;
        }
    }
    Ok(())
}

fn print_events(events: &[Event]) -> Result<(), Box<dyn std::error::Error>> {
    for event in events {
        println!("{}", serde_json::to_string_pretty(event)?);
    }
    Ok(())
}

/// Run one transition, persist its effects, and park or clear the session.
///
/// A corrupt session or a word that vanished from the list ends the session.
fn step<F>(db: &Database, transition: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut Session, Timestamp) -> Result<CardOutcome, SessionError>,
{
    let clock = SystemClock;
    let mut session = require_session(db)?;
    // Resolved up front so nothing is written when the config is unreadable.
    let zone = Config::load()?.reference_zone()?;

    let outcome = match transition(&mut session, clock.now_ms()) {
        Ok(outcome) => outcome,
        Err(e @ SessionError::CorruptSession { .. }) => {
            warn!(error = %e, "discarding corrupt session");
            db.kv_delete(SESSION_KEY)?;
            return Err(e.into());
        }
        Err(e) => return Err(e.into()),
    };

    if outcome.is_completion() {
        let counter_day = outcome
            .daily_progress
            .then(|| zone.day_of(clock.now_ms()));
        match apply_outcome(db, &session, &outcome, counter_day) {
            Ok(Some(persisted)) => session.sync_daily_count(persisted),
            Ok(None) => {}
            Err(e) => {
                if matches!(e, CoreError::WordNotFound { .. } | CoreError::ListNotFound(_)) {
                    warn!(error = %e, "session target is gone, abandoning session");
                    print_events(&[Event::abandoned(&session, clock.now())])?;
                    db.kv_delete(SESSION_KEY)?;
                }
                return Err(e.into());
            }
        }
    }

    print_events(&Event::from_outcome(&session, &outcome, clock.now()))?;
    save_session(db, &session)
}

/// Apply a completion to the stored list and bump the daily counter in one
/// transaction. Returns the persisted counter when it was bumped.
fn apply_outcome(
    db: &Database,
    session: &Session,
    outcome: &CardOutcome,
    counter_day: Option<NaiveDate>,
) -> Result<Option<u32>, CoreError> {
    let mut list = db.load_list(session.list_id())?;
    outcome.apply_to(&mut list)?;
    db.record_completion(&list, counter_day)
}

pub fn run(action: StudyAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = super::open_library()?;

    match action {
        StudyAction::Start { list_id, mode } => {
            if let Some(active) = load_session(&db)? {
                return Err(format!(
                    "a {} session on list '{}' is active; run `study abort` first",
                    active.mode(),
                    active.list_id()
                )
                .into());
            }
            let config = Config::load()?;
            let clock = SystemClock;
            let now = clock.now_ms();
            let list = db.load_list(&list_id)?;
            let daily = db.daily_count(&list.id, config.reference_zone()?.day_of(now))?;
            let session = config
                .queue_builder()?
                .start_session(&list, mode, now, daily);

            print_events(&[Event::started(&session, clock.now())])?;
            if session.is_finished() {
                println!("No {mode} cards available in '{}'", list.name);
            } else {
                println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
            }
            save_session(&db, &session)?;
        }
        StudyAction::Show => {
            let session = require_session(&db)?;
            if let Err(e) = session.current_card() {
                warn!(error = %e, "discarding corrupt session");
                db.kv_delete(SESSION_KEY)?;
                return Err(e.into());
            }
            println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
        }
        StudyAction::Known => step(&db, |s, _| s.submit_known())?,
        StudyAction::Unknown => step(&db, |s, _| s.submit_unknown())?,
        StudyAction::GotIt => step(&db, |s, _| s.confirm_got_it())?,
        StudyAction::Mastered => step(&db, |s, now| s.confirm_mastered(now))?,
        StudyAction::Later => step(&db, |s, _| s.confirm_review_later())?,
        StudyAction::Mistaken => step(&db, |s, _| s.confirm_still_unknown())?,
        StudyAction::Abort => {
            let session = require_session(&db)?;
            print_events(&[Event::abandoned(&session, SystemClock.now())])?;
            db.kv_delete(SESSION_KEY)?;
        }
    }
    Ok(())
}
