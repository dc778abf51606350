//! Task-wide error type
//!
//! Two fatal families: configuration problems (caught before any block
//! starts) and I/O failures around the terminal or the results file.
//! A no-response timeout is NOT an error; it is a valid trial outcome.
//! A user abort is NOT an error either; it surfaces as an aborted
//! session summary so collected rows still get persisted.

use thiserror::Error;

/// Unified error type for the Stroop task binary
#[derive(Error, Debug)]
pub enum TaskError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("results persistence error: {0}")]
    Results(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TaskError>;
