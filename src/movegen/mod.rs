//! Legal turn generation.
//!
//! Enumerates every (worker, move, build) combination a team may play in the
//! current position. This runs once per ply of every simulated game, so it
//! works from stack-allocated neighbour lists and only allocates the output.

use std::fmt;

use rand::Rng;

use crate::board::{Board, Team, Tile, Turn, NO_TEAM, WIN_HEIGHT};

/// Why a build target is not allowed for a given move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildViolation {
    /// The target is not one of the cells surrounding the destination.
    NotAdjacent,
    /// The target is the cell the worker is moving onto.
    OnDestination,
    /// Another worker stands on the target.
    Occupied,
    /// The target is already capped.
    Capped,
}

impl fmt::Display for BuildViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            BuildViolation::NotAdjacent => "build target is not adjacent to the destination",
            BuildViolation::OnDestination => "cannot build on the destination",
            BuildViolation::Occupied => "build target is occupied",
            BuildViolation::Capped => "build target is already capped",
        };
        f.write_str(msg)
    }
}

/// Build legality for a worker moving from `worker` to `move_to`.
///
/// The worker's origin counts as vacated, so building there is allowed. A
/// move onto height 3 never builds, so its target may be capped.
pub fn check_build(worker: &Tile, move_to: &Tile, build: &Tile) -> Result<(), BuildViolation> {
    if build.same_location(move_to) {
        return Err(BuildViolation::OnDestination);
    }
    if !move_to.is_adjacent(build) {
        return Err(BuildViolation::NotAdjacent);
    }
    if build.is_occupied() && !build.same_location(worker) {
        return Err(BuildViolation::Occupied);
    }
    if build.is_capped() && move_to.height != WIN_HEIGHT {
        return Err(BuildViolation::Capped);
    }
    Ok(())
}

/// Generates every legal turn for `team`.
///
/// Turns are grouped by worker (row-major), then by move and build in
/// neighbour order, so the result is stable for a given position.
pub fn valid_turns(board: &Board, team: Team) -> Vec<Turn> {
    if team == NO_TEAM {
        return Vec::new();
    }
    let workers = board.workers(team);
    let mut turns = Vec::with_capacity(workers.len() * 8 * 8);

    for worker in &workers {
        for dest in board.neighbours(worker.x, worker.y).iter() {
            if worker.can_step_onto(dest).is_err() {
                continue;
            }
            for build in board.neighbours(dest.x, dest.y).iter() {
                // The origin still shows the worker, but it leaves before building.
                if build.is_occupied() && !build.same_location(worker) {
                    continue;
                }
                if build.is_capped() && dest.height != WIN_HEIGHT {
                    continue;
                }
                turns.push(Turn::new(*worker, *dest, *build));
            }
        }
    }

    turns
}

/// Turns from `turns` that end the game on arrival.
pub fn winning_turns(turns: &[Turn]) -> impl Iterator<Item = &Turn> + '_ {
    turns.iter().filter(|t| t.is_winning())
}

/// Picks a uniformly random legal turn for `team`, or `None` if it has none.
pub fn random_turn(board: &Board, team: Team, rng: &mut impl Rng) -> Option<Turn> {
    let turns = valid_turns(board, team);
    if turns.is_empty() {
        return None;
    }
    let idx = rng.gen_range(0..turns.len());
    Some(turns[idx])
}

impl Board {
    /// Every legal turn for `team` in the current position.
    pub fn valid_turns(&self, team: Team) -> Vec<Turn> {
        valid_turns(self, team)
    }
}
