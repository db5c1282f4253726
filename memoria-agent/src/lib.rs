//! Session logic for memoria
//!
//! This crate provides the interactive session loop that replays the
//! persisted conversation to the completion provider.

pub mod input;
pub mod session;

pub use input::{LineSource, ReaderLines, StdinLines};
pub use session::{Session, SessionOptions, SessionState, TurnOutcome, EXIT_COMMAND};
