//! One-ply greedy strategy.
//!
//! Priorities, in order: take a winning move; cap a square an opponent could
//! win on next turn; otherwise play the turn with the best score after trying
//! it on a scratch board. Ties keep the earliest turn in generation order, so
//! the bot is deterministic.

use tracing::{debug, Span};

use super::{Bot, BotContext};
use crate::board::{Board, Team, Turn};
use crate::movegen::{valid_turns, winning_turns};

pub struct GreedyBot {
    span: Span,
}

impl GreedyBot {
    pub fn new(ctx: BotContext) -> Self {
        GreedyBot { span: ctx.span }
    }
}

/// Squares some opponent of `team` could win on with their next turn.
fn threatened_squares(board: &Board, team: Team) -> Vec<(u8, u8)> {
    let mut squares = Vec::new();
    for opponent in (1..=board.teams()).filter(|&t| t != team) {
        let turns = valid_turns(board, opponent);
        for t in winning_turns(&turns) {
            let square = (t.move_to.x, t.move_to.y);
            if !squares.contains(&square) {
                squares.push(square);
            }
        }
    }
    squares
}

/// Scores a position reached by `turn`, higher is better for `team`.
fn score(board: &Board, team: Team, turn: &Turn) -> i32 {
    let own_wins = winning_turns(&valid_turns(board, team)).count() as i32;
    let threats = threatened_squares(board, team).len() as i32;
    let raised = turn.build.height as i32 + 1;
    // Raising next to the new square to a climbable level sets up the next move.
    let setup = if raised <= turn.move_to.height as i32 + 1 { 1 } else { 0 };

    turn.move_to.height as i32 * 4 + own_wins * 3 + setup - threats * 10
}

impl Bot for GreedyBot {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    fn select_turn(&mut self, board: &Board, team: Team) -> Option<Turn> {
        let _enter = self.span.enter();
        let turns = valid_turns(board, team);
        if turns.is_empty() {
            return None;
        }

        if let Some(win) = winning_turns(&turns).next() {
            debug!(team, turn = %win, "taking winning move");
            return Some(*win);
        }

        let threats = threatened_squares(board, team);
        if !threats.is_empty() {
            let block = turns
                .iter()
                .find(|t| threats.contains(&(t.build.x, t.build.y)));
            if let Some(block) = block {
                debug!(team, turn = %block, "capping opponent's winning square");
                return Some(*block);
            }
            debug!(team, threats = threats.len(), "cannot block opponent");
        }

        let mut scratch = board.clone();
        let mut best: Option<(i32, Turn)> = None;
        for turn in &turns {
            // The scratch board may not have this team to move when called out of turn.
            if scratch.play_turn(turn).is_err() {
                continue;
            }
            let value = score(&scratch, team, turn);
            if let Err(err) = scratch.undo_turn(turn) {
                debug!(team, turn = %turn, error = %err, "scratch undo failed, skipping candidate");
                scratch = board.clone();
                continue;
            }
            if best.map_or(true, |(b, _)| value > b) {
                best = Some((value, *turn));
            }
        }

        Some(best.map_or(turns[0], |(_, t)| t))
    }
}
