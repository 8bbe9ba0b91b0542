//! # VocabFlow Core Library
//!
//! This library provides the learning scheduling engine behind VocabFlow, a
//! vocabulary trainer with three learning modes and an interval-based review
//! scheduler. All operations are available via the standalone CLI binary; any
//! other front end is a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Schedule**: interval table lookup and due-date calculation
//! - **Session**: queue selection per learning mode and the per-card state
//!   machine. The engine only reads snapshots and returns mutation
//!   descriptors; the host applies and persists them.
//! - **Progress**: derived list statistics, reference-day daily counters and
//!   activity history
//! - **Storage**: SQLite library storage, TOML configuration, JSON backups
//!
//! ## Key Components
//!
//! - [`QueueBuilder`]: selects and orders the cards of a session
//! - [`Session`]: card state machine
//! - [`ReviewClock`]: next-due computation
//! - [`Database`]: list and counter persistence
//! - [`Config`]: application configuration management

pub mod error;
pub mod events;
pub mod model;
pub mod progress;
pub mod schedule;
pub mod session;
pub mod storage;

pub use error::{ConfigError, CoreError, DatabaseError, SessionError, ValidationError};
pub use events::Event;
pub use model::{ListId, Timestamp, Word, WordId, WordList};
pub use progress::{learned_count, mastered_count, ListProgress, ReferenceZone};
pub use schedule::{Clock, FixedClock, IntervalTable, ReviewClock, SystemClock, WordStatus};
pub use session::{
    CardOutcome, CardState, Decision, LearningMode, QueueBuilder, Session, SessionSnapshot,
    WordMutation,
};
pub use storage::{Config, Database, LibraryBundle};
