//! Instruction and break screen texts
//!
//! Handles:
//! - Loading message files with '#'-prefixed comment lines filtered out
//! - The `<--insert-->` slot, substituted with the key-color help line
//! - Built-in fallback text when a message file is absent

use crate::session::sequencer::SessionMessages;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Slot marker a message file may use for the dynamic key-color line
pub const INSERT_MARK: &str = "<--insert-->";

const DEFAULT_INTRO: &str = "Welcome to the color-word task.\n\
You will see words printed in different colors.\n\
Respond to the PRINT COLOR of each word, never to its meaning.";

const DEFAULT_KEYMAP: &str = "Respond with the keys below:\n<--insert-->\n\
Answer as fast as you can without making mistakes.";

const DEFAULT_TRAINING_NOTE: &str = "First comes a short training block.\n\
After every training trial you will see whether you were correct.";

const DEFAULT_AFTER_TRAINING: &str = "Training is over.\n\
From now on there is no feedback; the measured blocks begin.";

const DEFAULT_BREAK: &str = "Short break.\nContinue whenever you are ready.";

const DEFAULT_END: &str = "This is the end of the experiment.\nThank you!";

/// Read one message file, dropping '#' comment lines and resolving the
/// insert slot. Falls back to the built-in text when the file is absent.
fn load_one(dir: &Path, file_name: &str, fallback: &str, insert: &str) -> String {
    let path = dir.join(file_name);
    let template = match fs::read_to_string(&path) {
        Ok(content) => content
            .lines()
            .filter(|line| !line.starts_with('#'))
            .collect::<Vec<_>>()
            .join("\n"),
        Err(_) => {
            debug!(file = file_name, "message file absent, using built-in text");
            fallback.to_string()
        }
    };
    resolve(&template, insert)
}

/// Substitute the insert slot; pure, no I/O
pub fn resolve(template: &str, insert: &str) -> String {
    template.replace(INSERT_MARK, insert)
}

/// Load every screen text for one session
pub fn load(dir: &Path, help_line: &str) -> SessionMessages {
    SessionMessages {
        intro: load_one(dir, "Instruction_1.txt", DEFAULT_INTRO, help_line),
        keymap: load_one(dir, "Instruction_2.txt", DEFAULT_KEYMAP, help_line),
        training_note: load_one(dir, "Instruction_3.txt", DEFAULT_TRAINING_NOTE, help_line),
        after_training: load_one(dir, "after_training.txt", DEFAULT_AFTER_TRAINING, help_line),
        pause: load_one(dir, "Break.txt", DEFAULT_BREAK, help_line),
        end: load_one(dir, "end.txt", DEFAULT_END, help_line),
    }
}
