//! Stimulus selection
//!
//! Produces:
//! - A concrete (word, color, correct key) triple per trial type,
//!   obeying the congruency rules
//! - A one-shot anti-repeat pass so no two consecutive trials render
//!   the identical word/color stimulus
//!
//! The resample is deliberately attempted exactly once: a second
//! consecutive collision is accepted rather than looping. This keeps
//! trial generation bounded and matches the intended tolerance for a
//! rare residual repeat.

use crate::config::ExperimentConfig;
use crate::stimulus::keymap::KeyColorAssignment;
use crate::stimulus::types::{Color, Trial, TrialType, Word};
use rand::Rng;

/// Draws stimuli for one session, bound to its fixed key assignment
pub struct StimulusPicker<'a> {
    config: &'a ExperimentConfig,
    assignment: &'a KeyColorAssignment,
}

impl<'a> StimulusPicker<'a> {
    pub fn new(config: &'a ExperimentConfig, assignment: &'a KeyColorAssignment) -> Self {
        StimulusPicker { config, assignment }
    }

    /// Produce a trial of the requested type
    ///
    /// Pools are validated non-empty at config load, so drawing cannot fail.
    pub fn pick<R: Rng>(&self, trial_type: TrialType, is_training: bool, rng: &mut R) -> Trial {
        let (word, color) = match trial_type {
            TrialType::Congruent => {
                let named = draw_color(rng);
                (Word::Naming(named), named)
            }
            TrialType::Incongruent => {
                let named = draw_color(rng);
                let alternates = named.alternates();
                (Word::Naming(named), alternates[rng.gen_range(0..alternates.len())])
            }
            TrialType::Control => (Word::Control(self.draw_control_word(rng)), draw_color(rng)),
        };

        Trial {
            trial_type,
            correct_key: self.assignment.key_for(color),
            word,
            color,
            is_training,
        }
    }

    /// Reject a stimulus identical to the previous one and resample once
    ///
    /// The resampled trial is returned without re-checking; see the
    /// module docs for why a residual collision is tolerated.
    pub fn enforce_anti_repeat<R: Rng>(
        &self,
        candidate: Trial,
        previous: Option<&Trial>,
        rng: &mut R,
    ) -> Trial {
        let colliding = match previous {
            Some(prev) => candidate.same_stimulus(prev),
            None => false,
        };
        if !colliding {
            return candidate;
        }

        match candidate.trial_type {
            TrialType::Congruent => {
                let named = draw_color(rng);
                Trial {
                    word: Word::Naming(named),
                    color: named,
                    correct_key: self.assignment.key_for(named),
                    ..candidate
                }
            }
            TrialType::Incongruent => {
                let named = match candidate.word.named_color() {
                    Some(named) => named,
                    None => return candidate,
                };
                let alternates = named.alternates();
                let color = alternates[rng.gen_range(0..alternates.len())];
                Trial {
                    color,
                    correct_key: self.assignment.key_for(color),
                    ..candidate
                }
            }
            TrialType::Control => Trial {
                word: Word::Control(self.draw_control_word(rng)),
                ..candidate
            },
        }
    }

    fn draw_control_word<R: Rng>(&self, rng: &mut R) -> String {
        let pool = &self.config.control_word;
        pool[rng.gen_range(0..pool.len())].clone()
    }
}

/// Uniform draw from the fixed palette
fn draw_color<R: Rng>(rng: &mut R) -> Color {
    Color::ALL[rng.gen_range(0..Color::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn fixture() -> (crate::config::ExperimentConfig, KeyColorAssignment) {
        let config = test_config();
        let assignment =
            KeyColorAssignment::generate(&config.reaction_keys, &mut StdRng::seed_from_u64(3));
        (config, assignment)
    }

    #[test]
    fn test_congruent_word_names_its_color() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let trial = picker.pick(TrialType::Congruent, false, &mut rng);
            assert_eq!(trial.word.named_color(), Some(trial.color));
            assert_eq!(trial.correct_key, assignment.key_for(trial.color));
        }
    }

    #[test]
    fn test_incongruent_color_differs_from_named() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..200 {
            let trial = picker.pick(TrialType::Incongruent, false, &mut rng);
            let named = trial.word.named_color().expect("incongruent word names a color");
            assert_ne!(named, trial.color);
            assert!(named.alternates().contains(&trial.color));
            assert_eq!(trial.correct_key, assignment.key_for(trial.color));
        }
    }

    #[test]
    fn test_control_word_names_no_color() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(13);
        for _ in 0..200 {
            let trial = picker.pick(TrialType::Control, false, &mut rng);
            assert_eq!(trial.word.named_color(), None);
            match &trial.word {
                Word::Control(text) => assert!(config.control_word.contains(text)),
                Word::Naming(_) => panic!("control trial drew a color-naming word"),
            }
            assert_eq!(trial.correct_key, assignment.key_for(trial.color));
        }
    }

    #[test]
    fn test_no_collision_passes_through() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(14);
        let previous = picker.pick(TrialType::Congruent, false, &mut rng);
        let mut candidate = picker.pick(TrialType::Congruent, false, &mut rng);
        while candidate.same_stimulus(&previous) {
            candidate = picker.pick(TrialType::Congruent, false, &mut rng);
        }
        let kept = picker.enforce_anti_repeat(candidate.clone(), Some(&previous), &mut rng);
        assert_eq!(kept, candidate);
        let first = picker.enforce_anti_repeat(candidate.clone(), None, &mut rng);
        assert_eq!(first, candidate);
    }

    #[test]
    fn test_congruent_resample_stays_congruent() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(15);
        for _ in 0..100 {
            let previous = picker.pick(TrialType::Congruent, false, &mut rng);
            let resampled =
                picker.enforce_anti_repeat(previous.clone(), Some(&previous), &mut rng);
            assert_eq!(resampled.word.named_color(), Some(resampled.color));
            assert_eq!(resampled.correct_key, assignment.key_for(resampled.color));
        }
    }

    #[test]
    fn test_incongruent_resample_keeps_word_redraws_color() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(16);
        for _ in 0..100 {
            let previous = picker.pick(TrialType::Incongruent, false, &mut rng);
            let resampled =
                picker.enforce_anti_repeat(previous.clone(), Some(&previous), &mut rng);
            assert_eq!(resampled.word, previous.word);
            let named = resampled.word.named_color().expect("names a color");
            assert_ne!(resampled.color, named);
            assert_eq!(resampled.correct_key, assignment.key_for(resampled.color));
        }
    }

    #[test]
    fn test_control_resample_keeps_color_redraws_word() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(17);
        for _ in 0..100 {
            let previous = picker.pick(TrialType::Control, false, &mut rng);
            let resampled =
                picker.enforce_anti_repeat(previous.clone(), Some(&previous), &mut rng);
            assert_eq!(resampled.color, previous.color);
            assert_eq!(resampled.word.named_color(), None);
            assert_eq!(resampled.correct_key, previous.correct_key);
        }
    }

    #[test]
    fn test_resample_is_single_shot() {
        // With a single control word the resample must collide again and
        // still be accepted: no retry loop.
        let mut config = test_config();
        config.control_word = vec!["dom".into()];
        let assignment =
            KeyColorAssignment::generate(&config.reaction_keys, &mut StdRng::seed_from_u64(3));
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(18);
        let previous = picker.pick(TrialType::Control, false, &mut rng);
        let resampled = picker.enforce_anti_repeat(previous.clone(), Some(&previous), &mut rng);
        assert!(resampled.same_stimulus(&previous));
    }

    #[test]
    fn test_pick_marks_training_flag() {
        let (config, assignment) = fixture();
        let picker = StimulusPicker::new(&config, &assignment);
        let mut rng = StdRng::seed_from_u64(19);
        assert!(picker.pick(TrialType::Congruent, true, &mut rng).is_training);
        assert!(!picker.pick(TrialType::Congruent, false, &mut rng).is_training);
    }
}
