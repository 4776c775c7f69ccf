//! Board representation and game-state types.
//!
//! Contains the packed board, tile snapshots, and turn descriptions.

pub mod state;
pub mod tile;
pub mod turn;

pub use state::{Board, BoardConfig, BoardError, Neighbours, MAX_SIDE, MAX_TEAMS, MIN_SIDE};
pub use tile::{MoveViolation, Team, Tile, CAP_HEIGHT, NO_TEAM, WIN_HEIGHT};
pub use turn::Turn;
