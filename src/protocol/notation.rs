//! Square and turn notation.
//!
//! Squares are written as a column letter followed by a 1-based row number,
//! so `(x: 2, y: 1)` is `c2`. A turn is `<worker>-<destination>^<build>`,
//! for example `c2-c3^d4`.

use thiserror::Error;

use crate::board::{Board, BoardError, Team, Turn, MAX_TEAMS, NO_TEAM};

/// Team markers: `.` for no team, then `1`-`9`, then `A`-`V` for teams 10-31.
const TEAM_CHARS: &[u8; 32] = b".123456789ABCDEFGHIJKLMNOPQRSTUV";

/// Errors from parsing squares, turns and positions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NotationError {
    #[error("empty input")]
    Empty,

    #[error("invalid square '{0}'")]
    InvalidSquare(String),

    #[error("invalid turn '{0}', expected <worker>-<destination>^<build>")]
    InvalidTurn(String),

    #[error("invalid team marker '{0}'")]
    InvalidTeam(char),

    #[error("invalid height '{0}'")]
    InvalidHeight(char),

    #[error("invalid position header '{0}'")]
    InvalidHeader(String),

    #[error("expected {expected} rows, got {found}")]
    WrongRowCount { expected: usize, found: usize },

    #[error("row {row} should have {expected} cells, got '{found}'")]
    WrongRowLength {
        row: usize,
        expected: usize,
        found: String,
    },

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Column letter for a 0-based x coordinate.
pub fn column_char(x: u8) -> char {
    (b'a' + x) as char
}

/// Single-character marker for a team, `.` when unoccupied.
pub fn team_char(team: Team) -> char {
    TEAM_CHARS
        .get(team as usize)
        .map(|&c| c as char)
        .unwrap_or('?')
}

/// Parses a team marker produced by [`team_char`].
pub fn parse_team_char(c: char) -> Result<Team, NotationError> {
    TEAM_CHARS
        .iter()
        .position(|&t| t as char == c)
        .filter(|&i| i <= MAX_TEAMS as usize)
        .map(|i| i as Team)
        .ok_or(NotationError::InvalidTeam(c))
}

/// Formats 0-based coordinates as a square name like `c2`.
pub fn format_square(x: u8, y: u8) -> String {
    format!("{}{}", column_char(x), y as u16 + 1)
}

/// Parses a square name into 0-based `(x, y)` coordinates.
pub fn parse_square(s: &str) -> Result<(u8, u8), NotationError> {
    let s = s.trim();
    let invalid = || NotationError::InvalidSquare(s.to_string());

    let mut chars = s.chars();
    let col = chars.next().ok_or(NotationError::Empty)?;
    if !col.is_ascii_lowercase() {
        return Err(invalid());
    }
    let row: u16 = chars.as_str().parse().map_err(|_| invalid())?;
    if row == 0 || row > 256 {
        return Err(invalid());
    }
    Ok((col as u8 - b'a', (row - 1) as u8))
}

/// Formats a turn as `<worker>-<destination>^<build>`.
pub fn format_turn(turn: &Turn) -> String {
    format!(
        "{}-{}^{}",
        format_square(turn.worker.x, turn.worker.y),
        format_square(turn.move_to.x, turn.move_to.y),
        format_square(turn.build.x, turn.build.y)
    )
}

/// Parses turn notation, filling the tiles from the current board.
pub fn parse_turn(board: &Board, s: &str) -> Result<Turn, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::Empty);
    }
    let (movement, build) = s
        .split_once('^')
        .ok_or_else(|| NotationError::InvalidTurn(s.to_string()))?;
    let (from, to) = movement
        .split_once('-')
        .ok_or_else(|| NotationError::InvalidTurn(s.to_string()))?;

    let (wx, wy) = parse_square(from)?;
    let (mx, my) = parse_square(to)?;
    let (bx, by) = parse_square(build)?;

    Ok(Turn::new(board.tile(wx, wy)?, board.tile(mx, my)?, board.tile(bx, by)?))
}

/// True for the marker of an unoccupied cell.
pub(crate) fn is_empty_marker(c: char) -> bool {
    c == team_char(NO_TEAM)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_names() {
        assert_eq!(format_square(0, 0), "a1");
        assert_eq!(format_square(2, 1), "c2");
        assert_eq!(format_square(25, 25), "z26");
        assert_eq!(parse_square("c2"), Ok((2, 1)));
        assert_eq!(parse_square("z26"), Ok((25, 25)));
    }

    #[test]
    fn bad_squares_rejected() {
        assert_eq!(parse_square(""), Err(NotationError::Empty));
        assert!(matches!(parse_square("C2"), Err(NotationError::InvalidSquare(_))));
        assert!(matches!(parse_square("c0"), Err(NotationError::InvalidSquare(_))));
        assert!(matches!(parse_square("cx"), Err(NotationError::InvalidSquare(_))));
    }

    #[test]
    fn team_markers() {
        assert_eq!(team_char(0), '.');
        assert_eq!(team_char(1), '1');
        assert_eq!(team_char(10), 'A');
        assert_eq!(team_char(31), 'V');
        assert_eq!(parse_team_char('.'), Ok(0));
        assert_eq!(parse_team_char('V'), Ok(31));
        assert_eq!(parse_team_char('W'), Err(NotationError::InvalidTeam('W')));
    }

    #[test]
    fn turn_parse_reads_board_tiles() {
        let board = Board::standard();
        let turn = parse_turn(&board, "c2-c1^b1").unwrap();
        assert_eq!(turn.worker.team, 1);
        assert_eq!((turn.move_to.x, turn.move_to.y), (2, 0));
        assert_eq!((turn.build.x, turn.build.y), (1, 0));
        assert_eq!(format_turn(&turn), "c2-c1^b1");
    }

    #[test]
    fn malformed_turns_rejected() {
        let board = Board::standard();
        assert!(matches!(parse_turn(&board, "c2c1^b1"), Err(NotationError::InvalidTurn(_))));
        assert!(matches!(parse_turn(&board, "c2-c1"), Err(NotationError::InvalidTurn(_))));
        assert!(matches!(parse_turn(&board, "c2-c1^h9"), Err(NotationError::Board(_))));
        assert_eq!(parse_turn(&board, "  "), Err(NotationError::Empty));
    }
}
