//! Packed board state.
//!
//! The board is a flat `width × height` byte array. Each byte stores the
//! occupying team in its high 5 bits and the tile height in its low 3 bits,
//! so a standard 5×5 board fits in 25 bytes and clones with one memcpy.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::tile::{Team, Tile, CAP_HEIGHT, NO_TEAM};
use crate::protocol::notation::{column_char, team_char};

/// Largest team index the 5-bit team field can hold.
pub const MAX_TEAMS: u8 = 31;

/// Smallest board side length.
pub const MIN_SIDE: u8 = 2;

/// Largest board side length. Columns are named `a` through `z`.
pub const MAX_SIDE: u8 = 26;

/// Neighbour offsets in their fixed order: N, S, W, E, NE, NW, SE, SW.
const NEIGHBOUR_OFFSETS: [(i8, i8); 8] = [
    (0, -1),
    (0, 1),
    (-1, 0),
    (1, 0),
    (1, -1),
    (-1, -1),
    (1, 1),
    (-1, 1),
];

/// Errors from board setup and coordinate lookups.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardError {
    #[error("invalid board configuration: {0}")]
    InvalidConfig(String),

    #[error("({x},{y}) is outside the {width}x{height} board")]
    OutOfBounds { x: u8, y: u8, width: u8, height: u8 },

    #[error("team {0} is not playing on this board")]
    InvalidTeam(Team),

    #[error("height {0} is above the cap")]
    InvalidHeight(u8),

    #[error("cannot cap ({x},{y}) while a worker stands on it")]
    CapWithWorker { x: u8, y: u8 },

    #[error("({x},{y}) is already occupied")]
    Occupied { x: u8, y: u8 },

    #[error("team {0} already has all of its workers on the board")]
    TooManyWorkers(Team),
}

/// Board dimensions and roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardConfig {
    pub width: u8,
    pub height: u8,
    pub teams: u8,
    /// Workers per team.
    pub workers: u8,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: 5,
            height: 5,
            teams: 2,
            workers: 2,
        }
    }
}

impl BoardConfig {
    /// Checks the configuration against the limits of the cell encoding.
    pub fn validate(&self) -> Result<(), BoardError> {
        let sides = MIN_SIDE..=MAX_SIDE;
        if !sides.contains(&self.width) || !sides.contains(&self.height) {
            return Err(BoardError::InvalidConfig(format!(
                "board must be between {MIN_SIDE} and {MAX_SIDE} cells per side, got {}x{}",
                self.width, self.height
            )));
        }
        if self.teams == 0 || self.teams > MAX_TEAMS {
            return Err(BoardError::InvalidConfig(format!(
                "team count must be between 1 and {MAX_TEAMS}, got {}",
                self.teams
            )));
        }
        if self.workers == 0 {
            return Err(BoardError::InvalidConfig("each team needs at least one worker".into()));
        }
        let cells = self.width as usize * self.height as usize;
        if self.teams as usize * self.workers as usize > cells {
            return Err(BoardError::InvalidConfig(format!(
                "{} teams of {} workers do not fit on {} cells",
                self.teams, self.workers, cells
            )));
        }
        Ok(())
    }
}

/// Up to eight neighbouring tiles, kept on the stack for move generation.
#[derive(Clone, Copy)]
pub struct Neighbours {
    tiles: [Tile; 8],
    len: usize,
}

impl Neighbours {
    #[inline]
    pub fn as_slice(&self) -> &[Tile] {
        &self.tiles[..self.len]
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Tile> {
        self.as_slice().iter()
    }
}

/// Complete game board.
///
/// Cloning copies the cell vector, so a clone can be played on speculatively
/// without touching the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    cells: Vec<u8>,
    width: u8,
    height: u8,
    teams: u8,
    workers: u8,
    /// Turns committed so far; decides which team moves next.
    turn_count: u32,
}

impl Board {
    /// Creates an empty board: all cells at ground level, no workers placed.
    pub fn new(config: BoardConfig) -> Result<Self, BoardError> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    fn empty(config: BoardConfig) -> Self {
        Board {
            cells: vec![0; config.width as usize * config.height as usize],
            width: config.width,
            height: config.height,
            teams: config.teams,
            workers: config.workers,
            turn_count: 0,
        }
    }

    /// The standard two-player opening on a 5×5 board.
    ///
    /// Team 1 holds (2,1) and (2,3); team 2 holds (1,2) and (3,2).
    pub fn standard() -> Self {
        let mut board = Self::empty(BoardConfig::default());
        for (team, x, y) in [(1, 2, 1), (1, 2, 3), (2, 1, 2), (2, 3, 2)] {
            let idx = board.index(x, y);
            board.cells[idx] = team << 3;
        }
        board
    }

    /// Places every team's workers on distinct random cells of an empty board.
    pub fn random_layout<R: Rng + ?Sized>(
        config: BoardConfig,
        rng: &mut R,
    ) -> Result<Self, BoardError> {
        let mut board = Self::new(config)?;
        let needed = config.teams as usize * config.workers as usize;
        let mut cells: Vec<usize> = (0..board.cells.len()).collect();
        cells.shuffle(rng);
        for (slot, &idx) in cells.iter().take(needed).enumerate() {
            let team = (slot / config.workers as usize) as u8 + 1;
            board.cells[idx] = team << 3;
        }
        Ok(board)
    }

    /// Returns `(width, height)`.
    #[inline]
    pub fn dimensions(&self) -> (u8, u8) {
        (self.width, self.height)
    }

    /// Number of teams playing on this board.
    #[inline]
    pub fn teams(&self) -> u8 {
        self.teams
    }

    #[inline]
    pub fn workers_per_team(&self) -> u8 {
        self.workers
    }

    #[inline]
    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    /// The team whose turn it is: `turn_count mod teams + 1`.
    #[inline]
    pub fn current_team(&self) -> Team {
        (self.turn_count % self.teams as u32) as Team + 1
    }

    /// Hands the move to the next team.
    pub fn advance_turn(&mut self) {
        self.turn_count += 1;
    }

    pub(crate) fn set_turn_count(&mut self, turn_count: u32) {
        self.turn_count = turn_count;
    }

    #[inline]
    fn index(&self, x: u8, y: u8) -> usize {
        self.width as usize * y as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u8, y: u8) -> bool {
        x < self.width && y < self.height
    }

    fn check_bounds(&self, x: u8, y: u8) -> Result<(), BoardError> {
        if self.in_bounds(x, y) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Decodes the cell at `(x, y)`.
    pub fn tile(&self, x: u8, y: u8) -> Result<Tile, BoardError> {
        self.check_bounds(x, y)?;
        Ok(self.tile_unchecked(x, y))
    }

    /// Decodes a cell the caller has already bounds-checked.
    #[inline]
    pub(crate) fn tile_unchecked(&self, x: u8, y: u8) -> Tile {
        Tile::from_cell(self.cells[self.index(x, y)], x, y)
    }

    /// Overwrites a cell. Callers validate the invariants beforehand.
    #[inline]
    pub(crate) fn write_cell(&mut self, x: u8, y: u8, team: Team, height: u8) {
        debug_assert!(team <= self.teams);
        debug_assert!(height <= CAP_HEIGHT);
        debug_assert!(team == NO_TEAM || height < CAP_HEIGHT);
        let idx = self.index(x, y);
        self.cells[idx] = (team << 3) | height;
    }

    /// All tiles, row by row.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        let width = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &cell)| Tile::from_cell(cell, (i % width) as u8, (i / width) as u8))
    }

    /// Tiles occupied by `team`'s workers, in row-major order.
    pub fn workers(&self, team: Team) -> Vec<Tile> {
        let mut workers = Vec::with_capacity(self.workers as usize);
        if team == NO_TEAM {
            return workers;
        }
        workers.extend(self.tiles().filter(|t| t.team == team));
        workers
    }

    /// Neighbouring tiles of `(x, y)` that exist on the grid, N, S, W, E, NE, NW, SE, SW.
    #[inline]
    pub fn neighbours(&self, x: u8, y: u8) -> Neighbours {
        let mut out = Neighbours {
            tiles: [Tile::new(NO_TEAM, 0, 0, 0); 8],
            len: 0,
        };
        for (dx, dy) in NEIGHBOUR_OFFSETS {
            let nx = x as i16 + dx as i16;
            let ny = y as i16 + dy as i16;
            if nx < 0 || ny < 0 || nx >= self.width as i16 || ny >= self.height as i16 {
                continue;
            }
            out.tiles[out.len] = self.tile_unchecked(nx as u8, ny as u8);
            out.len += 1;
        }
        out
    }

    /// Owned list of the on-grid neighbours of `(x, y)` in the fixed order.
    pub fn surrounding_tiles(&self, x: u8, y: u8) -> Vec<Tile> {
        self.neighbours(x, y).as_slice().to_vec()
    }

    /// Places a worker for `team` on an unoccupied, uncapped cell.
    pub fn place_worker(&mut self, team: Team, x: u8, y: u8) -> Result<(), BoardError> {
        self.check_bounds(x, y)?;
        if team == NO_TEAM || team > self.teams {
            return Err(BoardError::InvalidTeam(team));
        }
        let tile = self.tile_unchecked(x, y);
        if tile.is_occupied() {
            return Err(BoardError::Occupied { x, y });
        }
        if tile.is_capped() {
            return Err(BoardError::CapWithWorker { x, y });
        }
        if self.workers(team).len() >= self.workers as usize {
            return Err(BoardError::TooManyWorkers(team));
        }
        self.write_cell(x, y, team, tile.height);
        Ok(())
    }

    /// Sets a cell's height during setup, keeping any worker on it.
    pub fn set_height(&mut self, x: u8, y: u8, height: u8) -> Result<(), BoardError> {
        self.check_bounds(x, y)?;
        if height > CAP_HEIGHT {
            return Err(BoardError::InvalidHeight(height));
        }
        let tile = self.tile_unchecked(x, y);
        if height == CAP_HEIGHT && tile.is_occupied() {
            return Err(BoardError::CapWithWorker { x, y });
        }
        self.write_cell(x, y, tile.team, height);
        Ok(())
    }

    /// Canonical fixed-length key for the cell array, one character per cell.
    ///
    /// Each character is the packed cell offset from `'A'`, so boards with up
    /// to two teams produce plain ASCII. The turn counter is not part of the key.
    pub fn hash(&self) -> String {
        self.cells
            .iter()
            .filter_map(|&cell| char::from_u32(u32::from(cell) + u32::from(b'A')))
            .collect()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "   ")?;
        for x in 0..self.width {
            write!(f, " {} ", column_char(x))?;
        }
        writeln!(f)?;
        for y in 0..self.height {
            write!(f, "{:>2} ", y + 1)?;
            for x in 0..self.width {
                let tile = self.tile_unchecked(x, y);
                write!(f, " {}{}", tile.height, team_char(tile.team))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
