//! Session key-color assignment
//!
//! Binds each of the 4 reaction keys to one color by a single random
//! permutation at session start. The assignment is immutable for the
//! whole session; every correctness judgment reads it.

use crate::config::ExperimentConfig;
use crate::stimulus::types::{Color, ResponseKey};
use rand::seq::SliceRandom;
use rand::Rng;

/// Bijection Color -> ResponseKey, fixed for the session
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyColorAssignment {
    /// Key per color, indexed by `Color::index`
    keys: [ResponseKey; 4],
}

impl KeyColorAssignment {
    /// Shuffle the configured keys and zip them with the canonical
    /// color order. Deterministic under a seeded rng.
    pub fn generate<R: Rng>(reaction_keys: &[char], rng: &mut R) -> Self {
        debug_assert_eq!(reaction_keys.len(), Color::ALL.len());
        let mut shuffled: Vec<char> = reaction_keys.to_vec();
        shuffled.shuffle(rng);

        let mut keys = [ResponseKey(' '); 4];
        for (slot, key) in keys.iter_mut().zip(shuffled) {
            *slot = ResponseKey(key);
        }
        KeyColorAssignment { keys }
    }

    /// The correct response key for a stimulus color
    pub fn key_for(&self, color: Color) -> ResponseKey {
        self.keys[color.index()]
    }

    /// "word: key" pairs for the instruction and in-trial help line
    pub fn help_line(&self, config: &ExperimentConfig) -> String {
        Color::ALL
            .iter()
            .map(|&color| format!("{}: {}", config.word_for(color), self.key_for(color)))
            .collect::<Vec<_>>()
            .join(",  ")
    }
}
