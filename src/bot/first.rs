//! Deterministic strategy that always plays the first generated turn.

use tracing::{trace, Span};

use super::{Bot, BotContext};
use crate::board::{Board, Team, Turn};

pub struct FirstBot {
    span: Span,
}

impl FirstBot {
    pub fn new(ctx: BotContext) -> Self {
        FirstBot { span: ctx.span }
    }
}

impl Bot for FirstBot {
    fn name(&self) -> &'static str {
        "first"
    }

    fn is_deterministic(&self) -> bool {
        true
    }

    fn select_turn(&mut self, board: &Board, team: Team) -> Option<Turn> {
        let _enter = self.span.enter();
        let turn = board.valid_turns(team).first().copied();
        trace!(team, turn = ?turn.map(|t| t.to_string()), "first pick");
        turn
    }
}
