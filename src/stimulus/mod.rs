//! Stimulus generation: vocabulary, key assignment, picking, block planning
//!
//! # Components
//! - `types.rs`: Color/Word/TrialType/Trial data model
//! - `keymap.rs`: session-fixed key-color bijection
//! - `picker.rs`: congruency-rule stimulus draws and one-shot anti-repeat
//! - `block.rs`: shuffled per-block trial-type order

pub mod block;
pub mod keymap;
pub mod picker;
pub mod types;

pub use block::{plan_block, TypeCounts};
pub use keymap::KeyColorAssignment;
