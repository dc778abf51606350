//! Session layer: trial execution, sequencing and results
//!
//! # Components
//! - `runner.rs`: single-trial state machine and collaborator traits
//! - `sequencer.rs`: block iteration and session-global bookkeeping
//! - `results.rs`: append-only results log

pub mod results;
pub mod runner;
pub mod sequencer;

pub use results::CsvSink;
pub use sequencer::{SessionContext, SessionSequencer};
