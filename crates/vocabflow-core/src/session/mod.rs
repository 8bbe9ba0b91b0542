//! Learning sessions: queue construction and the per-card state machine.

mod engine;
mod mode;
mod outcome;
mod queue;

pub use engine::{CardState, Session, SessionSnapshot};
pub use mode::LearningMode;
pub use outcome::{CardOutcome, Decision, WordMutation};
pub use queue::QueueBuilder;
