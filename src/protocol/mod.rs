//! Text notation for squares, turns, and whole positions.
//!
//! Used for logging, the loss report written by the simulation binary, and
//! for setting up positions in tests.

pub mod notation;
pub mod position;

pub use notation::{format_square, format_turn, parse_square, parse_turn, NotationError};
pub use position::{encode_position, parse_position};
