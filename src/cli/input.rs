//! Keystroke input via crossterm
//!
//! Features:
//! - Bounded non-blocking polling during stimulus presentation
//! - Event-queue drain before stimulus onset
//! - F7 / Esc / Ctrl+C as the session abort action

use crate::error::Result;
use crate::session::runner::{Advance, InputSource, PolledKey};
use crate::stimulus::types::ResponseKey;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use std::time::Duration;

/// Terminal-backed input source
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        TerminalInput
    }

    /// Enable raw mode for the session
    pub fn enable_raw_mode() -> std::io::Result<()> {
        crossterm::terminal::enable_raw_mode()
    }

    /// Restore the terminal
    pub fn disable_raw_mode() -> std::io::Result<()> {
        crossterm::terminal::disable_raw_mode()
    }

    /// The dedicated exit action: F7 (as in the lab protocol), Esc or Ctrl+C
    fn is_abort(key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::F(7) | KeyCode::Esc => true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => true,
            _ => false,
        }
    }

    /// Plain character of a key event, if it carries one
    fn key_to_char(key: &KeyEvent) -> Option<char> {
        match key.code {
            KeyCode::Char(c)
                if !key.modifiers.contains(KeyModifiers::CONTROL)
                    && !key.modifiers.contains(KeyModifiers::ALT) =>
            {
                Some(c.to_ascii_lowercase())
            }
            _ => None,
        }
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self, allowed: &[ResponseKey], timeout: Duration) -> Result<PolledKey> {
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if Self::is_abort(&key) {
                    return Ok(PolledKey::Abort);
                }
                if let Some(c) = Self::key_to_char(&key) {
                    let pressed = ResponseKey(c);
                    if allowed.contains(&pressed) {
                        return Ok(PolledKey::Reaction(pressed));
                    }
                }
            }
        }
        Ok(PolledKey::Idle)
    }

    fn drain(&mut self) -> Result<()> {
        while event::poll(Duration::from_millis(0))? {
            let _ = event::read()?;
        }
        Ok(())
    }

    fn wait_continue(&mut self) -> Result<Advance> {
        loop {
            if let Event::Key(key) = event::read()? {
                if Self::is_abort(&key) {
                    return Ok(Advance::Abort);
                }
                match key.code {
                    KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right => {
                        return Ok(Advance::Continue)
                    }
                    _ => {}
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn test_abort_keys() {
        assert!(TerminalInput::is_abort(&key(KeyCode::F(7), KeyModifiers::NONE)));
        assert!(TerminalInput::is_abort(&key(KeyCode::Esc, KeyModifiers::NONE)));
        assert!(TerminalInput::is_abort(&key(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
        assert!(!TerminalInput::is_abort(&key(
            KeyCode::Char('z'),
            KeyModifiers::NONE
        )));
    }

    #[test]
    fn test_key_to_char_lowercases_and_filters_modifiers() {
        assert_eq!(
            TerminalInput::key_to_char(&key(KeyCode::Char('Z'), KeyModifiers::SHIFT)),
            Some('z')
        );
        assert_eq!(
            TerminalInput::key_to_char(&key(KeyCode::Char('z'), KeyModifiers::ALT)),
            None
        );
        assert_eq!(
            TerminalInput::key_to_char(&key(KeyCode::Enter, KeyModifiers::NONE)),
            None
        );
    }
}
