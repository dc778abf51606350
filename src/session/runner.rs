//! Single-trial state machine
//!
//! Drives one trial through Fixation -> Presenting -> Scoring ->
//! (Feedback, training only) -> Done. Presentation polls the reaction
//! keys once per frame up to STIM_TIME; the first keypress ends the
//! phase and its reaction time is read from a clock reset at stimulus
//! onset. The abort key is honored at every polling point and turns
//! into session-level termination, never a trial retry.

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::stimulus::types::{Color, ResponseKey, Trial};
use std::time::{Duration, Instant};

/// Outcome classification codes, written to the results file
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Correctness {
    Correct,
    Incorrect,
    NoResponse,
}

impl Correctness {
    /// Numeric code used in the results file (1 / 0 / 2)
    pub fn code(self) -> u8 {
        match self {
            Correctness::Correct => 1,
            Correctness::Incorrect => 0,
            Correctness::NoResponse => 2,
        }
    }

    /// Feedback text shown after a training trial
    pub fn feedback_text(self) -> &'static str {
        match self {
            Correctness::Correct => "Poprawnie",
            Correctness::Incorrect => "Niepoprawnie",
            Correctness::NoResponse => "Brak odpowiedzi",
        }
    }
}

/// What the participant did on one trial
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrialOutcome {
    /// None when the presentation timed out
    pub key_pressed: Option<ResponseKey>,
    /// Seconds from stimulus onset; None on timeout
    pub reaction_time: Option<f64>,
    pub correctness: Correctness,
}

/// Result of running one trial
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TrialSignal {
    Completed(TrialOutcome),
    /// Abort key detected; the session must terminate early
    Aborted,
}

/// What the presentation phase observed
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Presentation {
    Pressed(ResponseKey, f64),
    TimedOut,
    Aborted,
}

/// One bounded input poll
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PolledKey {
    Reaction(ResponseKey),
    Abort,
    Idle,
}

/// Continue/abort decision on an instruction or break screen
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Advance {
    Continue,
    Abort,
}

/// Monotonic stopwatch reset at each presentation onset
pub trait Clock {
    fn reset(&mut self);
    /// Seconds since the last reset
    fn elapsed(&self) -> f64;
}

/// `Instant`-backed clock used outside of tests
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        MonotonicClock {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn reset(&mut self) {
        self.origin = Instant::now();
    }

    fn elapsed(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Bounded, non-blocking key input
pub trait InputSource {
    /// Wait up to `timeout` for one of `allowed` or the abort key
    fn poll(&mut self, allowed: &[ResponseKey], timeout: Duration) -> Result<PolledKey>;
    /// Discard any queued events (called right before stimulus onset)
    fn drain(&mut self) -> Result<()>;
    /// Block until a continue key or the abort key (instruction screens)
    fn wait_continue(&mut self) -> Result<Advance>;
}

/// Screen-side collaborator; the terminal implementation lives in `cli`
pub trait Renderer {
    fn show_fixation(&mut self) -> Result<()>;
    fn show_stimulus(&mut self, word: &str, color: Color, help: &str) -> Result<()>;
    fn show_feedback(&mut self, correctness: Correctness) -> Result<()>;
    fn show_blank(&mut self) -> Result<()>;
    fn show_message(&mut self, text: &str) -> Result<()>;
}

/// Classify a presentation result against the trial's correct key
///
/// Exactly one classification per trial; a timeout is a valid outcome,
/// not an error.
pub fn classify(trial: &Trial, presentation: Presentation) -> TrialOutcome {
    match presentation {
        Presentation::Pressed(key, rt) => TrialOutcome {
            key_pressed: Some(key),
            reaction_time: Some(rt),
            correctness: if key == trial.correct_key {
                Correctness::Correct
            } else {
                Correctness::Incorrect
            },
        },
        Presentation::TimedOut | Presentation::Aborted => TrialOutcome {
            key_pressed: None,
            reaction_time: None,
            correctness: Correctness::NoResponse,
        },
    }
}

/// Runs trials against the renderer/input/clock collaborators
pub struct TrialRunner<'a, R: Renderer, I: InputSource, C: Clock> {
    config: &'a ExperimentConfig,
    renderer: &'a mut R,
    input: &'a mut I,
    clock: &'a mut C,
    reaction_keys: Vec<ResponseKey>,
    help_line: String,
}

impl<'a, R: Renderer, I: InputSource, C: Clock> TrialRunner<'a, R, I, C> {
    pub fn new(
        config: &'a ExperimentConfig,
        renderer: &'a mut R,
        input: &'a mut I,
        clock: &'a mut C,
        help_line: String,
    ) -> Self {
        let reaction_keys = config.reaction_keys.iter().map(|&c| ResponseKey(c)).collect();
        TrialRunner {
            config,
            renderer,
            input,
            clock,
            reaction_keys,
            help_line,
        }
    }

    /// Run one trial start to finish
    pub fn run(&mut self, trial: &Trial) -> Result<TrialSignal> {
        // Fixation
        self.renderer.show_fixation()?;
        if self.idle_wait(self.config.fix_cross_time)? {
            return Ok(TrialSignal::Aborted);
        }

        // Presenting
        let presentation = self.present(trial)?;
        if presentation == Presentation::Aborted {
            return Ok(TrialSignal::Aborted);
        }

        // Scoring
        let outcome = classify(trial, presentation);
        tracing::debug!(
            correctness = outcome.correctness.code(),
            rt = ?outcome.reaction_time,
            "trial scored"
        );

        // Feedback (training only)
        if trial.is_training {
            self.renderer.show_feedback(outcome.correctness)?;
            if self.idle_wait(self.config.fix_cross_time)? {
                return Ok(TrialSignal::Aborted);
            }
        }

        self.renderer.show_blank()?;
        Ok(TrialSignal::Completed(outcome))
    }

    /// Present the stimulus until the first reaction key or timeout
    fn present(&mut self, trial: &Trial) -> Result<Presentation> {
        self.input.drain()?;
        self.renderer
            .show_stimulus(trial.word.text(self.config), trial.color, &self.help_line)?;
        let frame = self.config.frame_interval();
        self.clock.reset();
        loop {
            if self.clock.elapsed() >= self.config.stim_time {
                return Ok(Presentation::TimedOut);
            }
            match self.input.poll(&self.reaction_keys, frame)? {
                PolledKey::Reaction(key) => {
                    return Ok(Presentation::Pressed(key, self.clock.elapsed()))
                }
                PolledKey::Abort => return Ok(Presentation::Aborted),
                PolledKey::Idle => {}
            }
        }
    }

    /// Wait a fixed duration, polling only the abort key.
    /// Returns true when the session should terminate.
    pub fn idle_wait(&mut self, seconds: f64) -> Result<bool> {
        let frame = self.config.frame_interval();
        self.clock.reset();
        while self.clock.elapsed() < seconds {
            if self.input.poll(&[], frame)? == PolledKey::Abort {
                return Ok(true);
            }
        }
        Ok(false)
    }
}
