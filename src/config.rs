//! Experiment configuration
//!
//! Loads:
//! - JSON config file with SCREAMING_SNAKE_CASE keys
//! - Per-phase trial counts, stimulus pools, reaction keys, timings
//!
//! Every required list is validated up front; a bad config aborts the
//! session before any block starts and before any results file exists.

use crate::error::{Result, TaskError};
use crate::stimulus::block::TypeCounts;
use crate::stimulus::types::Color;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// All experiment parameters, one per key of the config file
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub struct ExperimentConfig {
    /// Polling rate during stimulus presentation (Hz)
    pub frame_rate: u32,
    /// Advisory screen resolution, logged at startup
    pub screen_res: [u32; 2],
    /// Background color name (advisory for the terminal renderer)
    pub background_color: String,
    /// 1 = block 0 is a training block with feedback, 0 = no training
    pub training: u8,
    pub train_congruent_in_block: usize,
    pub train_incongruent_in_block: usize,
    pub train_control_in_block: usize,
    pub exp_congruent_in_block: usize,
    pub exp_incongruent_in_block: usize,
    pub exp_control_in_block: usize,
    /// Number of measurement blocks (training block not included)
    pub exp_no_blocks: usize,
    /// Color-naming words in canonical color order: yellow, green, blue, red
    pub stim_word: Vec<String>,
    /// Neutral words that name no color
    pub control_word: Vec<String>,
    /// The 4 stimulus color names; must be the canonical palette
    pub stim_color: Vec<String>,
    /// The 4 response keys, one per color after the session shuffle
    pub reaction_keys: Vec<char>,
    /// Fixation cross duration in seconds (also the feedback duration)
    pub fix_cross_time: f64,
    /// Maximum stimulus presentation time in seconds
    pub stim_time: f64,
    /// Inter-trial wait candidates in seconds, one drawn at random per trial
    pub wait_time: Vec<f64>,
    /// Stimulus text size hint for the renderer
    pub stim_size: u16,
    /// Fixation cross color name
    pub fix_cross_color: String,
}

impl ExperimentConfig {
    /// Load and validate a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            TaskError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        let config: ExperimentConfig = serde_json::from_str(&content)
            .map_err(|e| TaskError::Config(format!("malformed {}: {}", path.display(), e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every invariant the sequencer relies on
    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(TaskError::Config("FRAME_RATE must be positive".into()));
        }
        if self.stim_word.len() != Color::ALL.len() {
            return Err(TaskError::Config(format!(
                "STIM_WORD must list exactly {} words in canonical color order",
                Color::ALL.len()
            )));
        }
        if self.stim_word.iter().any(|w| w.trim().is_empty()) {
            return Err(TaskError::Config("STIM_WORD contains an empty word".into()));
        }
        if self.control_word.is_empty() {
            return Err(TaskError::Config("CONTROL_WORD must not be empty".into()));
        }
        if self.control_word.iter().any(|w| w.trim().is_empty()) {
            return Err(TaskError::Config("CONTROL_WORD contains an empty word".into()));
        }
        let palette: FxHashSet<Color> = self
            .stim_color
            .iter()
            .map(|name| {
                Color::from_name(name)
                    .ok_or_else(|| TaskError::Config(format!("unknown STIM_COLOR '{}'", name)))
            })
            .collect::<Result<_>>()?;
        if palette.len() != Color::ALL.len() || self.stim_color.len() != Color::ALL.len() {
            return Err(TaskError::Config(
                "STIM_COLOR must name each of the 4 colors exactly once".into(),
            ));
        }
        // keypresses are lowercased by the input layer, so an uppercase
        // key could never match
        if self.reaction_keys.iter().any(|k| k.is_ascii_uppercase()) {
            return Err(TaskError::Config(
                "REACTION_KEYS must be lowercase characters".into(),
            ));
        }
        let distinct_keys: FxHashSet<char> = self.reaction_keys.iter().copied().collect();
        if self.reaction_keys.len() != Color::ALL.len()
            || distinct_keys.len() != Color::ALL.len()
        {
            return Err(TaskError::Config(
                "REACTION_KEYS must list exactly 4 distinct keys".into(),
            ));
        }
        if self.wait_time.is_empty() {
            return Err(TaskError::Config("WAIT_TIME must not be empty".into()));
        }
        if self.stim_time <= 0.0 {
            return Err(TaskError::Config("STIM_TIME must be positive".into()));
        }
        if self.fix_cross_time < 0.0 {
            return Err(TaskError::Config("FIX_CROSS_TIME must not be negative".into()));
        }
        if Color::from_name(&self.fix_cross_color).is_none() {
            return Err(TaskError::Config(format!(
                "unknown FIX_CROSS_COLOR '{}'",
                self.fix_cross_color
            )));
        }
        Ok(())
    }

    /// Display text for a color-naming word
    pub fn word_for(&self, color: Color) -> &str {
        &self.stim_word[color.index()]
    }

    /// Whether block 0 is a training block
    pub fn training_enabled(&self) -> bool {
        self.training == 1
    }

    /// Total block count, training block included
    pub fn total_blocks(&self) -> usize {
        self.exp_no_blocks + usize::from(self.training_enabled())
    }

    /// Per-type trial counts for the training block
    pub fn train_counts(&self) -> TypeCounts {
        TypeCounts {
            congruent: self.train_congruent_in_block,
            incongruent: self.train_incongruent_in_block,
            control: self.train_control_in_block,
        }
    }

    /// Per-type trial counts for one measurement block
    pub fn exp_counts(&self) -> TypeCounts {
        TypeCounts {
            congruent: self.exp_congruent_in_block,
            incongruent: self.exp_incongruent_in_block,
            control: self.exp_control_in_block,
        }
    }

    /// Polling interval during stimulus presentation
    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.frame_rate))
    }
}

/// Baseline config used by tests across the crate
#[cfg(test)]
pub(crate) fn test_config() -> ExperimentConfig {
    ExperimentConfig {
        frame_rate: 60,
        screen_res: [800, 600],
        background_color: "black".into(),
        training: 0,
        train_congruent_in_block: 2,
        train_incongruent_in_block: 2,
        train_control_in_block: 2,
        exp_congruent_in_block: 1,
        exp_incongruent_in_block: 1,
        exp_control_in_block: 1,
        exp_no_blocks: 1,
        stim_word: vec![
            "zolty".into(),
            "zielony".into(),
            "niebieski".into(),
            "czerwony".into(),
        ],
        control_word: vec!["dom".into(), "okno".into(), "most".into()],
        stim_color: vec!["yellow".into(), "green".into(), "blue".into(), "red".into()],
        reaction_keys: vec!['z', 'x', 'n', 'm'],
        fix_cross_time: 1.0,
        stim_time: 2.0,
        wait_time: vec![0.5, 1.0],
        stim_size: 40,
        fix_cross_color: "red".into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn test_empty_control_words_rejected() {
        let mut config = test_config();
        config.control_word.clear();
        assert!(matches!(config.validate(), Err(TaskError::Config(_))));
    }

    #[test]
    fn test_duplicate_reaction_keys_rejected() {
        let mut config = test_config();
        config.reaction_keys = vec!['z', 'z', 'n', 'm'];
        assert!(matches!(config.validate(), Err(TaskError::Config(_))));
    }

    #[test]
    fn test_uppercase_reaction_key_rejected() {
        // the input layer lowercases keypresses; an uppercase key would
        // silently time out every trial instead of matching
        let mut config = test_config();
        config.reaction_keys = vec!['Z', 'x', 'n', 'm'];
        assert!(matches!(config.validate(), Err(TaskError::Config(_))));
    }

    #[test]
    fn test_wrong_word_arity_rejected() {
        let mut config = test_config();
        config.stim_word.pop();
        assert!(matches!(config.validate(), Err(TaskError::Config(_))));
    }

    #[test]
    fn test_unknown_color_rejected() {
        let mut config = test_config();
        config.stim_color[0] = "purple".into();
        assert!(matches!(config.validate(), Err(TaskError::Config(_))));
    }

    #[test]
    fn test_json_round_trip_uses_screaming_keys() {
        let json = serde_json::to_string(&test_config()).unwrap();
        assert!(json.contains("\"REACTION_KEYS\""));
        assert!(json.contains("\"EXP_NO_BLOCKS\""));
        let parsed: ExperimentConfig = serde_json::from_str(&json).unwrap();
        assert!(parsed.validate().is_ok());
    }
}
