//! Core stimulus vocabulary
//!
//! Covers:
//! - The fixed 4-color palette and its canonical order
//! - Stimulus words (color-naming or neutral control)
//! - Response keys and trial types
//! - The Trial record with its congruency invariants

use crate::config::ExperimentConfig;
use std::fmt;

/// The 4 stimulus colors, canonical order matching STIM_WORD
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Yellow,
    Green,
    Blue,
    Red,
}

impl Color {
    /// Canonical palette order; STIM_WORD and the key assignment zip against it
    pub const ALL: [Color; 4] = [Color::Yellow, Color::Green, Color::Blue, Color::Red];

    /// Position in the canonical order
    pub fn index(self) -> usize {
        match self {
            Color::Yellow => 0,
            Color::Green => 1,
            Color::Blue => 2,
            Color::Red => 3,
        }
    }

    /// The 3 colors other than this one, in canonical order
    pub fn alternates(self) -> [Color; 3] {
        let mut out = [Color::Yellow; 3];
        let mut n = 0;
        for c in Color::ALL {
            if c != self {
                out[n] = c;
                n += 1;
            }
        }
        out
    }

    /// Parse a config color name
    pub fn from_name(name: &str) -> Option<Color> {
        match name.to_ascii_lowercase().as_str() {
            "yellow" => Some(Color::Yellow),
            "green" => Some(Color::Green),
            "blue" => Some(Color::Blue),
            "red" => Some(Color::Red),
            _ => None,
        }
    }

    /// Config/results-file name of this color
    pub fn name(self) -> &'static str {
        match self {
            Color::Yellow => "yellow",
            Color::Green => "green",
            Color::Blue => "blue",
            Color::Red => "red",
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stimulus word: either names one of the 4 colors or is a neutral
/// control word that names no color at all
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Word {
    /// Color-naming word; display text comes from STIM_WORD
    Naming(Color),
    /// Control word text drawn from CONTROL_WORD
    Control(String),
}

impl Word {
    /// The color this word denotes, if any
    pub fn named_color(&self) -> Option<Color> {
        match self {
            Word::Naming(color) => Some(*color),
            Word::Control(_) => None,
        }
    }

    /// Display text of the word under a given config
    pub fn text<'a>(&'a self, config: &'a ExperimentConfig) -> &'a str {
        match self {
            Word::Naming(color) => config.word_for(*color),
            Word::Control(text) => text,
        }
    }
}

/// One of the session's 4 configured reaction keys
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ResponseKey(pub char);

impl fmt::Display for ResponseKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trial taxonomy of the Stroop task
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialType {
    Congruent,
    Incongruent,
    Control,
}

impl TrialType {
    /// Results-file label
    pub fn name(self) -> &'static str {
        match self {
            TrialType::Congruent => "congruent",
            TrialType::Incongruent => "incongruent",
            TrialType::Control => "control",
        }
    }
}

/// A fully specified stimulus presentation
///
/// Invariants (enforced by the picker, checked in its tests):
/// - Congruent: `word` names exactly `color`
/// - Incongruent: `word` names a color, but not `color`
/// - Control: `word` names no color
/// - `correct_key` is always the session assignment's key for `color`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Trial {
    pub trial_type: TrialType,
    pub word: Word,
    pub color: Color,
    pub correct_key: ResponseKey,
    pub is_training: bool,
}

impl Trial {
    /// True when two trials would render as the same word/color stimulus
    pub fn same_stimulus(&self, other: &Trial) -> bool {
        self.word == other.word && self.color == other.color
    }
}
