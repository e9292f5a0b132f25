//! Terminal input module (engine-facing).
//!
//! Maps `crossterm` key events into [`crate::types::BoardAction`] and keeps the
//! keyboard cursor that stands in for a pointer on a terminal board.

pub mod cursor;
pub mod map;

pub use tui_match3_types as types;

pub use cursor::Cursor;
pub use map::{handle_key_event, should_quit};
