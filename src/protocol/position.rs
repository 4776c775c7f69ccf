//! Compact position strings.
//!
//! A position is written as `<width>x<height>:<teams>:<workers>:<turns>`
//! followed by one `/`-separated section per row. Each row holds one
//! two-character token per cell: the height digit and the team marker.
//!
//! The standard opening encodes as
//! `5x5:2:2:0/0.0.0.0.0./0.0.010.0./0.020.020./0.0.010.0./0.0.0.0.0.`

use super::notation::{is_empty_marker, parse_team_char, team_char, NotationError};
use crate::board::{Board, BoardConfig, CAP_HEIGHT};

/// Encodes the full board, including the turn counter.
pub fn encode_position(board: &Board) -> String {
    let (width, height) = board.dimensions();
    let mut out = String::with_capacity(16 + (width as usize * 2 + 1) * height as usize);
    out.push_str(&format!(
        "{}x{}:{}:{}:{}",
        width,
        height,
        board.teams(),
        board.workers_per_team(),
        board.turn_count()
    ));
    for (i, tile) in board.tiles().enumerate() {
        if i % width as usize == 0 {
            out.push('/');
        }
        out.push((b'0' + tile.height) as char);
        out.push(team_char(tile.team));
    }
    out
}

/// Parses a position string produced by [`encode_position`].
pub fn parse_position(s: &str) -> Result<Board, NotationError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(NotationError::Empty);
    }
    let mut sections = s.split('/');
    let header = sections.next().ok_or(NotationError::Empty)?;
    let (config, turn_count) = parse_header(header)?;

    let rows: Vec<&str> = sections.collect();
    if rows.len() != config.height as usize {
        return Err(NotationError::WrongRowCount {
            expected: config.height as usize,
            found: rows.len(),
        });
    }

    let mut board = Board::new(config)?;
    for (y, row) in rows.iter().enumerate() {
        let chars: Vec<char> = row.chars().collect();
        if chars.len() != config.width as usize * 2 {
            return Err(NotationError::WrongRowLength {
                row: y + 1,
                expected: config.width as usize,
                found: row.to_string(),
            });
        }
        for (x, cell) in chars.chunks(2).enumerate() {
            let height = cell[0]
                .to_digit(10)
                .filter(|&h| h <= CAP_HEIGHT as u32)
                .ok_or(NotationError::InvalidHeight(cell[0]))? as u8;
            let (x, y) = (x as u8, y as u8);
            if !is_empty_marker(cell[1]) {
                board.place_worker(parse_team_char(cell[1])?, x, y)?;
            }
            board.set_height(x, y, height)?;
        }
    }
    board.set_turn_count(turn_count);
    Ok(board)
}

fn parse_header(s: &str) -> Result<(BoardConfig, u32), NotationError> {
    let invalid = || NotationError::InvalidHeader(s.to_string());
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 4 {
        return Err(invalid());
    }
    let (width, height) = parts[0].split_once('x').ok_or_else(invalid)?;
    let config = BoardConfig {
        width: width.parse().map_err(|_| invalid())?,
        height: height.parse().map_err(|_| invalid())?,
        teams: parts[1].parse().map_err(|_| invalid())?,
        workers: parts[2].parse().map_err(|_| invalid())?,
    };
    let turn_count = parts[3].parse().map_err(|_| invalid())?;
    Ok((config, turn_count))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::{BoardError, Tile};

    const STANDARD: &str = "5x5:2:2:0/0.0.0.0.0./0.0.010.0./0.020.020./0.0.010.0./0.0.0.0.0.";

    #[test]
    fn encodes_standard_opening() {
        assert_eq!(encode_position(&Board::standard()), STANDARD);
    }

    #[test]
    fn parses_standard_opening() {
        assert_eq!(parse_position(STANDARD).unwrap(), Board::standard());
    }

    #[test]
    fn keeps_heights_under_workers_and_turn_count() {
        let mut board = Board::standard();
        board.set_height(2, 1, 3).unwrap();
        board.set_height(0, 0, CAP_HEIGHT).unwrap();
        board.advance_turn();
        let encoded = encode_position(&board);
        assert!(encoded.starts_with("5x5:2:2:1/4."));
        let parsed = parse_position(&encoded).unwrap();
        assert_eq!(parsed, board);
        assert_eq!(parsed.tile(2, 1).unwrap(), Tile::new(1, 3, 2, 1));
    }

    #[test]
    fn rejects_malformed_positions() {
        assert_eq!(parse_position(""), Err(NotationError::Empty));
        assert!(matches!(parse_position("5x5:2:2/0."), Err(NotationError::InvalidHeader(_))));
        assert!(matches!(
            parse_position("2x2:2:1:0/0.0."),
            Err(NotationError::WrongRowCount { expected: 2, found: 1 })
        ));
        assert!(matches!(
            parse_position("2x2:2:1:0/0.0./0."),
            Err(NotationError::WrongRowLength { row: 2, .. })
        ));
        assert_eq!(
            parse_position("2x2:2:1:0/0.5./0.0."),
            Err(NotationError::InvalidHeight('5'))
        );
        assert_eq!(
            parse_position("2x2:2:1:0/410./0.0."),
            Err(NotationError::Board(BoardError::CapWithWorker { x: 0, y: 0 }))
        );
    }
}
