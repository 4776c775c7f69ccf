//! Tile values and the move-legality predicate.
//!
//! A `Tile` is a decoded snapshot of one board cell. Tiles are produced on
//! demand from the packed board and carry no link back to it, so mutating a
//! tile never changes board state.

use std::fmt;

/// Team index. `0` marks an unoccupied cell, `1..=teams` own a worker.
pub type Team = u8;

/// Team value stored in cells that hold no worker.
pub const NO_TEAM: Team = 0;

/// Height a worker must step onto to win.
pub const WIN_HEIGHT: u8 = 3;

/// Height of a capped tower. Capped cells can never hold a worker.
pub const CAP_HEIGHT: u8 = 4;

/// Why a worker cannot move from one tile to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveViolation {
    /// The destination is not one of the eight surrounding cells.
    NotAdjacent,
    /// Another worker already stands on the destination.
    Occupied,
    /// The destination is a capped tower.
    Capped,
    /// The destination is more than one level above the worker.
    TooHigh,
}

impl fmt::Display for MoveViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            MoveViolation::NotAdjacent => "destination is not adjacent",
            MoveViolation::Occupied => "destination is occupied",
            MoveViolation::Capped => "destination is capped",
            MoveViolation::TooHigh => "destination is more than one level up",
        };
        f.write_str(msg)
    }
}

/// One grid cell: its occupant, height and coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub team: Team,
    pub height: u8,
    pub x: u8,
    pub y: u8,
}

impl Tile {
    pub const fn new(team: Team, height: u8, x: u8, y: u8) -> Self {
        Tile { team, height, x, y }
    }

    /// Decodes a packed cell byte: team in the high bits, height in the low 3.
    #[inline]
    pub(crate) const fn from_cell(cell: u8, x: u8, y: u8) -> Self {
        Tile {
            team: cell >> 3,
            height: cell & 0x7,
            x,
            y,
        }
    }

    #[inline]
    pub const fn is_occupied(&self) -> bool {
        self.team != NO_TEAM
    }

    #[inline]
    pub const fn is_capped(&self) -> bool {
        self.height >= CAP_HEIGHT
    }

    /// True when both tiles refer to the same coordinates, whatever their contents.
    #[inline]
    pub const fn same_location(&self, other: &Tile) -> bool {
        self.x == other.x && self.y == other.y
    }

    /// True when `other` is one of the eight cells surrounding this one.
    #[inline]
    pub fn is_adjacent(&self, other: &Tile) -> bool {
        !self.same_location(other)
            && self.x.abs_diff(other.x) <= 1
            && self.y.abs_diff(other.y) <= 1
    }

    /// Checks whether a worker on this tile may step onto `dest`.
    ///
    /// Climbing is limited to one level; dropping any distance is allowed.
    pub fn can_move_to(&self, dest: &Tile) -> Result<(), MoveViolation> {
        if !self.is_adjacent(dest) {
            return Err(MoveViolation::NotAdjacent);
        }
        self.can_step_onto(dest)
    }

    /// Move legality for a destination already known to be adjacent.
    #[inline]
    pub(crate) fn can_step_onto(&self, dest: &Tile) -> Result<(), MoveViolation> {
        if dest.is_occupied() {
            return Err(MoveViolation::Occupied);
        }
        if dest.is_capped() {
            return Err(MoveViolation::Capped);
        }
        if dest.height > self.height + 1 {
            return Err(MoveViolation::TooHigh);
        }
        Ok(())
    }
}
