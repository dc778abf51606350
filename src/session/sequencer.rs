//! Session driver
//!
//! Owns the whole experiment flow: one key-color assignment, the
//! instruction screens, block iteration (training block first when
//! enabled), per-trial pick -> anti-repeat -> run -> record, random
//! inter-trial waits and inter-block breaks. Trial numbering is
//! session-global and 1-based; block numbering is 0-based and includes
//! the training block.

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::session::results::{ResultRow, ResultsSink};
use crate::session::runner::{
    Advance, Clock, InputSource, Renderer, TrialRunner, TrialSignal,
};
use crate::stimulus::keymap::KeyColorAssignment;
use crate::stimulus::picker::StimulusPicker;
use crate::stimulus::types::Trial;
use crate::stimulus::{plan_block, TypeCounts};
use rand::Rng;
use tracing::info;

/// Immutable per-session identity
#[derive(Clone, Debug)]
pub struct SessionContext {
    pub participant_id: String,
}

/// Instruction and break screen texts, resolved before the session starts
#[derive(Clone, Debug)]
pub struct SessionMessages {
    pub intro: String,
    pub keymap: String,
    pub training_note: String,
    pub after_training: String,
    pub pause: String,
    pub end: String,
}

/// What the session amounted to
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionSummary {
    pub aborted: bool,
    pub trials_run: usize,
    pub blocks_completed: usize,
}

/// Top-level experiment driver
pub struct SessionSequencer<'a, G: Rng> {
    config: &'a ExperimentConfig,
    context: SessionContext,
    assignment: KeyColorAssignment,
    rng: G,
}

impl<'a, G: Rng> SessionSequencer<'a, G> {
    pub fn new(
        config: &'a ExperimentConfig,
        context: SessionContext,
        assignment: KeyColorAssignment,
        rng: G,
    ) -> Self {
        SessionSequencer {
            config,
            context,
            assignment,
            rng,
        }
    }

    /// Run every block; always flushes the sink before returning,
    /// including on user abort.
    pub fn run<R: Renderer, I: InputSource, C: Clock, S: ResultsSink>(
        &mut self,
        renderer: &mut R,
        input: &mut I,
        clock: &mut C,
        sink: &mut S,
        messages: &SessionMessages,
    ) -> Result<SessionSummary> {
        let help_line = self.assignment.help_line(self.config);
        info!(help = %help_line, "key-color assignment fixed for session");

        let mut summary = SessionSummary {
            aborted: false,
            trials_run: 0,
            blocks_completed: 0,
        };

        // Opening instruction screens
        let mut intro_screens = vec![&messages.intro, &messages.keymap];
        if self.config.training_enabled() {
            intro_screens.push(&messages.training_note);
        }
        for text in intro_screens {
            renderer.show_message(text)?;
            if input.wait_continue()? == Advance::Abort {
                return self.finish_aborted(sink, summary);
            }
        }

        let total_blocks = self.config.total_blocks();

        for block_no in 0..total_blocks {
            let is_training = self.config.training_enabled() && block_no == 0;
            let counts: TypeCounts = if is_training {
                self.config.train_counts()
            } else {
                self.config.exp_counts()
            };
            let order = plan_block(counts, &mut self.rng);
            info!(block_no, is_training, trials = order.len(), "block planned");

            let picker = StimulusPicker::new(self.config, &self.assignment);
            let mut previous: Option<Trial> = None;

            // the runner borrows the terminal collaborators only for the
            // trials of this block; break screens use them directly
            {
                let mut runner = TrialRunner::new(
                    self.config,
                    &mut *renderer,
                    &mut *input,
                    &mut *clock,
                    help_line.clone(),
                );

                for trial_type in order {
                    let candidate = picker.pick(trial_type, is_training, &mut self.rng);
                    let trial =
                        picker.enforce_anti_repeat(candidate, previous.as_ref(), &mut self.rng);

                    match runner.run(&trial)? {
                        TrialSignal::Completed(outcome) => {
                            summary.trials_run += 1;
                            sink.append(ResultRow {
                                participant_id: self.context.participant_id.clone(),
                                block_no,
                                trial_no: summary.trials_run,
                                outcome,
                                trial_type: trial.trial_type,
                                stim_color: trial.color,
                                stim_word: trial.word.text(self.config).to_string(),
                                is_training: trial.is_training,
                            })?;
                            previous = Some(trial);
                        }
                        TrialSignal::Aborted => {
                            return self.finish_aborted(sink, summary);
                        }
                    }

                    let wait = self.config.wait_time
                        [self.rng.gen_range(0..self.config.wait_time.len())];
                    if runner.idle_wait(wait)? {
                        return self.finish_aborted(sink, summary);
                    }
                }
            }

            summary.blocks_completed += 1;

            // Break screen between blocks; after the training block the
            // dedicated post-training text plus the key map again.
            if block_no + 1 < total_blocks {
                let break_text = if is_training {
                    &messages.after_training
                } else {
                    &messages.pause
                };
                for text in [break_text, &messages.keymap] {
                    renderer.show_message(text)?;
                    if input.wait_continue()? == Advance::Abort {
                        return self.finish_aborted(sink, summary);
                    }
                }
            }
        }

        sink.flush()?;
        info!(
            trials = summary.trials_run,
            blocks = summary.blocks_completed,
            "session complete, results persisted"
        );
        renderer.show_message(&messages.end)?;
        let _ = input.wait_continue()?;
        Ok(summary)
    }

    fn finish_aborted<S: ResultsSink>(
        &self,
        sink: &mut S,
        mut summary: SessionSummary,
    ) -> Result<SessionSummary> {
        summary.aborted = true;
        sink.flush()?;
        info!(trials = summary.trials_run, "session aborted by user, partial results persisted");
        Ok(summary)
    }
}
