//! Turn application and undo.
//!
//! `play_turn` never trusts the team or height values recorded in a submitted
//! turn: it re-reads all three cells from the board and validates the move and
//! build against them before writing anything, so a rejected turn leaves the
//! board untouched.

use thiserror::Error;

use crate::board::{Board, BoardError, MoveViolation, Team, Tile, Turn, NO_TEAM, WIN_HEIGHT};
use crate::movegen::{check_build, BuildViolation};

/// Rule violations reported by `play_turn`.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TurnError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("no worker at ({x},{y})")]
    NoWorker { x: u8, y: u8 },

    #[error(
        "worker at ({x},{y}) belongs to team {found}, \
         turn claims team {claimed} and team {to_move} is to move"
    )]
    WrongTeam {
        x: u8,
        y: u8,
        found: Team,
        claimed: Team,
        to_move: Team,
    },

    #[error("illegal move: {0}")]
    IllegalMove(MoveViolation),

    #[error("illegal build: {0}")]
    IllegalBuild(BuildViolation),
}

/// Undo failures. Any of these means the turn was never played on this board
/// in its current state; callers should treat them as fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UndoError {
    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("cannot undo, destination ({x},{y}) does not hold a team {team} worker")]
    WorkerMissing { x: u8, y: u8, team: Team },

    #[error("cannot undo, origin ({x},{y}) is occupied")]
    OriginOccupied { x: u8, y: u8 },

    #[error("cannot undo, no building at ({x},{y})")]
    NothingBuilt { x: u8, y: u8 },

    #[error("cannot undo, height at ({x},{y}) is {found} but the turn recorded {expected}")]
    HeightMismatch { x: u8, y: u8, expected: u8, found: u8 },
}

/// Applies `turn` for the team to move. Returns `Ok(true)` when the move wins.
///
/// A winning move does not build. The turn counter is left for the caller
/// to advance.
pub fn play_turn(board: &mut Board, turn: &Turn) -> Result<bool, TurnError> {
    let to_move = board.current_team();
    let worker = board.tile(turn.worker.x, turn.worker.y)?;
    let move_to = board.tile(turn.move_to.x, turn.move_to.y)?;
    let build = board.tile(turn.build.x, turn.build.y)?;

    if !worker.is_occupied() {
        return Err(TurnError::NoWorker {
            x: worker.x,
            y: worker.y,
        });
    }
    if worker.team != to_move || worker.team != turn.worker.team {
        return Err(TurnError::WrongTeam {
            x: worker.x,
            y: worker.y,
            found: worker.team,
            claimed: turn.worker.team,
            to_move,
        });
    }

    worker.can_move_to(&move_to).map_err(TurnError::IllegalMove)?;
    check_build(&worker, &move_to, &build).map_err(TurnError::IllegalBuild)?;

    board.write_cell(worker.x, worker.y, NO_TEAM, worker.height);
    board.write_cell(move_to.x, move_to.y, worker.team, move_to.height);

    if move_to.height == WIN_HEIGHT {
        return Ok(true);
    }

    // Re-read the build cell: it may be the origin that was just vacated.
    let target = board.tile_unchecked(build.x, build.y);
    board.write_cell(target.x, target.y, NO_TEAM, target.height + 1);
    Ok(false)
}

/// Reverts a turn previously applied with `play_turn`.
///
/// Lowers the build cell (skipped for winning turns), returns the worker to
/// its origin at its recorded height and clears the destination. Every
/// precondition is checked before the board is modified.
pub fn undo_turn(board: &mut Board, turn: &Turn) -> Result<(), UndoError> {
    let team = turn.worker.team;
    let origin = board.tile(turn.worker.x, turn.worker.y)?;
    let dest = board.tile(turn.move_to.x, turn.move_to.y)?;
    let build = board.tile(turn.build.x, turn.build.y)?;

    if team == NO_TEAM || dest.team != team {
        return Err(UndoError::WorkerMissing {
            x: dest.x,
            y: dest.y,
            team,
        });
    }
    if dest.height != turn.move_to.height {
        return Err(mismatch(&dest, turn.move_to.height));
    }
    if origin.is_occupied() {
        return Err(UndoError::OriginOccupied {
            x: origin.x,
            y: origin.y,
        });
    }

    let built = !turn.is_winning();
    if built && build.height == 0 {
        return Err(UndoError::NothingBuilt {
            x: build.x,
            y: build.y,
        });
    }

    let origin_height = if built && build.same_location(&origin) {
        build.height - 1
    } else {
        origin.height
    };
    if origin_height != turn.worker.height {
        return Err(mismatch(&Tile { height: origin_height, ..origin }, turn.worker.height));
    }

    if built && !build.same_location(&origin) {
        board.write_cell(build.x, build.y, build.team, build.height - 1);
    }
    board.write_cell(origin.x, origin.y, team, turn.worker.height);
    board.write_cell(dest.x, dest.y, NO_TEAM, dest.height);

    debug_assert_eq!(board.tile_unchecked(origin.x, origin.y), Tile { team, ..turn.worker });
    Ok(())
}

fn mismatch(found: &Tile, expected: u8) -> UndoError {
    UndoError::HeightMismatch {
        x: found.x,
        y: found.y,
        expected,
        found: found.height,
    }
}

impl Board {
    /// Applies `turn` for the team to move; see [`play_turn`].
    pub fn play_turn(&mut self, turn: &Turn) -> Result<bool, TurnError> {
        play_turn(self, turn)
    }

    /// Reverts a played turn; see [`undo_turn`].
    pub fn undo_turn(&mut self, turn: &Turn) -> Result<(), UndoError> {
        undo_turn(self, turn)
    }
}
