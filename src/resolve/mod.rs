//! Turn resolution.
//!
//! Validates submitted turns against the board and applies or reverts them.

pub mod turn;

pub use turn::{play_turn, undo_turn, TurnError, UndoError};
