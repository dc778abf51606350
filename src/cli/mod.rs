//! Terminal collaborators: rendering, input and instruction texts
//!
//! # Components
//! - `display.rs`: crossterm implementation of the `Renderer` trait
//! - `input.rs`: crossterm implementation of the `InputSource` trait
//! - `messages.rs`: instruction/break screen texts with file overrides

pub mod display;
pub mod input;
pub mod messages;

pub use display::TerminalDisplay;
pub use input::TerminalInput;
