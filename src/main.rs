//! Stroop color-word task - terminal trial sequencer
//!
//! Single-session, self-contained CLI experiment runner: counterbalanced
//! key-color assignment, training and measurement blocks, per-trial
//! response timing and an append-only behavioural results file.

mod cli;
mod config;
mod error;
mod session;
mod stimulus;

use clap::Parser;
use cli::{messages, TerminalDisplay, TerminalInput};
use config::ExperimentConfig;
use rand::rngs::StdRng;
use rand::SeedableRng;
use session::runner::MonotonicClock;
use session::{CsvSink, SessionContext, SessionSequencer};
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use stimulus::KeyColorAssignment;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "Stroop color-word task")]
#[command(about = "Terminal Stroop task: trial sequencing, timing and scoring")]
struct Args {
    /// Participant identifier
    #[arg(short, long)]
    id: String,

    /// Participant sex (M/F)
    #[arg(short, long, default_value = "M")]
    sex: String,

    /// Participant age
    #[arg(short, long, default_value = "0")]
    age: String,

    /// Path to the experiment config file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Directory for the results file and session log
    #[arg(short, long, default_value = "results")]
    results: PathBuf,

    /// Directory with instruction text files (built-ins used when absent)
    #[arg(short, long, default_value = "messages")]
    messages: PathBuf,

    /// Seed for the session randomness (reproducible runs)
    #[arg(long)]
    seed: Option<u64>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let part_id = format!("{}{}{}", args.id, args.sex, args.age);

    fs::create_dir_all(&args.results)?;

    // Session log file, one per participant
    let log_file = fs::File::create(args.results.join(format!("{}.log", part_id)))?;
    let default_filter = if args.debug {
        "stroop_task=debug"
    } else {
        "stroop_task=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(log_file))
                .with_ansi(false),
        )
        .init();

    // Fatal before any block starts; no results file exists yet
    let config = ExperimentConfig::load(&args.config)?;
    info!(frame_rate = config.frame_rate, "FRAME RATE");
    info!(screen_res = ?config.screen_res, "SCREEN RES");

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    // Computed exactly once; immutable for the whole session
    let assignment = KeyColorAssignment::generate(&config.reaction_keys, &mut rng);
    let session_messages = messages::load(&args.messages, &assignment.help_line(&config));

    let mut sink = CsvSink::create(&args.results.join(format!("{}_beh.csv", part_id)))?;

    TerminalInput::enable_raw_mode()?;
    let mut display = TerminalDisplay::new(&config);
    let mut input = TerminalInput::new();
    let mut clock = MonotonicClock::new();

    let mut sequencer = SessionSequencer::new(
        &config,
        SessionContext {
            participant_id: part_id.clone(),
        },
        assignment,
        rng,
    );
    let summary = sequencer.run(
        &mut display,
        &mut input,
        &mut clock,
        &mut sink,
        &session_messages,
    )?;

    drop(display); // restores the terminal
    TerminalInput::disable_raw_mode()?;

    if summary.aborted {
        println!(
            "Session aborted by participant {} after {} trials; partial results saved.",
            part_id, summary.trials_run
        );
    } else {
        println!(
            "Session complete: participant {}, {} blocks, {} trials.",
            part_id, summary.blocks_completed, summary.trials_run
        );
    }

    Ok(())
}
