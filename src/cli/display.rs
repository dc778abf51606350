//! Terminal rendering via crossterm
//!
//! Features:
//! - Fixation cross in the configured color
//! - Stimulus word drawn in its render color with the key help line
//! - Training feedback and instruction/break screens
//!
//! SCREEN_RES and STIM_SIZE from the config are advisory here; a
//! terminal cell grid has no font size, so the stimulus is simply
//! placed on fixed rows the way the rest of the screens are.

use crate::config::ExperimentConfig;
use crate::error::Result;
use crate::session::runner::{Correctness, Renderer};
use crate::stimulus::types::Color;
use crossterm::{
    cursor, execute,
    style::{Color as TermColor, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use std::io::{stdout, Write};

/// Row on which fixation, stimulus and feedback are drawn
const STIM_ROW: u16 = 4;
/// Row of the key help line during presentation
const HELP_ROW: u16 = 8;

/// Map a stimulus color onto the terminal palette
fn term_color(color: Color) -> TermColor {
    match color {
        Color::Yellow => TermColor::Yellow,
        Color::Green => TermColor::Green,
        Color::Blue => TermColor::Blue,
        Color::Red => TermColor::Red,
    }
}

/// Crossterm-backed renderer
pub struct TerminalDisplay {
    fix_cross_color: TermColor,
}

impl TerminalDisplay {
    pub fn new(config: &ExperimentConfig) -> Self {
        let fix_cross_color = Color::from_name(&config.fix_cross_color)
            .map(term_color)
            .unwrap_or(TermColor::White);
        TerminalDisplay { fix_cross_color }
    }

    fn clear(&self) -> Result<()> {
        let mut stdout = stdout();
        execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Hide
        )?;
        Ok(())
    }
}

impl Renderer for TerminalDisplay {
    fn show_fixation(&mut self) -> Result<()> {
        self.clear()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, STIM_ROW),
            SetForegroundColor(self.fix_cross_color),
            Print("+"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn show_stimulus(&mut self, word: &str, color: Color, help: &str) -> Result<()> {
        self.clear()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, STIM_ROW),
            SetForegroundColor(term_color(color)),
            Print(word),
            ResetColor,
            cursor::MoveTo(0, HELP_ROW),
            SetForegroundColor(TermColor::DarkGrey),
            Print(help),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn show_feedback(&mut self, correctness: Correctness) -> Result<()> {
        self.clear()?;
        let mut stdout = stdout();
        execute!(
            stdout,
            cursor::MoveTo(0, STIM_ROW),
            SetForegroundColor(self.fix_cross_color),
            Print(correctness.feedback_text()),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }

    fn show_blank(&mut self) -> Result<()> {
        self.clear()
    }

    fn show_message(&mut self, text: &str) -> Result<()> {
        self.clear()?;
        let mut stdout = stdout();
        // raw mode: carriage returns must be explicit
        for (row, line) in text.lines().enumerate() {
            execute!(stdout, cursor::MoveTo(0, row as u16 + 1), Print(line))?;
        }
        let rows = text.lines().count() as u16;
        execute!(
            stdout,
            cursor::MoveTo(0, rows + 3),
            SetForegroundColor(TermColor::DarkGrey),
            Print("ENTER/SPACE to continue  |  F7 or ESC to abort"),
            ResetColor
        )?;
        stdout.flush()?;
        Ok(())
    }
}

impl Drop for TerminalDisplay {
    fn drop(&mut self) {
        // Best effort cleanup
        let mut stdout = stdout();
        let _ = execute!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            cursor::Show,
            ResetColor
        );
        let _ = crossterm::terminal::disable_raw_mode();
    }
}
