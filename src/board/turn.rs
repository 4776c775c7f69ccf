//! Turn descriptions.
//!
//! A turn moves one worker to a neighbouring cell and then raises one cell
//! next to the destination. Turns are plain values: the board re-reads its
//! own cells when a turn is played, so the team and height fields recorded
//! here are only trusted for undo verification.

use std::fmt;

use super::tile::{Tile, WIN_HEIGHT};
use crate::protocol::notation::format_turn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Turn {
    /// The tile the worker stands on before the turn.
    pub worker: Tile,
    /// The destination the worker moves to.
    pub move_to: Tile,
    /// The tile raised by one level after the move.
    pub build: Tile,
}

impl Turn {
    pub const fn new(worker: Tile, move_to: Tile, build: Tile) -> Self {
        Turn {
            worker,
            move_to,
            build,
        }
    }

    /// Whether the recorded destination height ends the game on arrival.
    #[inline]
    pub const fn is_winning(&self) -> bool {
        self.move_to.height == WIN_HEIGHT
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_turn(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn winning_turn_detected_from_destination_height() {
        let turn = Turn::new(
            Tile::new(1, 2, 0, 0),
            Tile::new(0, 3, 1, 0),
            Tile::new(0, 0, 2, 0),
        );
        assert!(turn.is_winning());
    }

    #[test]
    fn display_uses_square_notation() {
        let turn = Turn::new(
            Tile::new(1, 0, 2, 1),
            Tile::new(0, 0, 2, 2),
            Tile::new(0, 0, 3, 3),
        );
        assert_eq!(turn.to_string(), "c2-c3^d4");
    }
}
