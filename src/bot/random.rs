//! Uniformly random strategy.

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{trace, Span};

use super::{Bot, BotContext};
use crate::board::{Board, Team, Turn};
use crate::movegen::random_turn;

pub struct RandomBot {
    rng: SmallRng,
    span: Span,
}

impl RandomBot {
    pub fn new(ctx: BotContext) -> Self {
        RandomBot {
            rng: SmallRng::seed_from_u64(ctx.seed),
            span: ctx.span,
        }
    }
}

impl Bot for RandomBot {
    fn name(&self) -> &'static str {
        "random"
    }

    fn is_deterministic(&self) -> bool {
        false
    }

    fn select_turn(&mut self, board: &Board, team: Team) -> Option<Turn> {
        let _enter = self.span.enter();
        let turn = random_turn(board, team, &mut self.rng);
        trace!(team, turn = ?turn.map(|t| t.to_string()), "random pick");
        turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bot(seed: u64) -> RandomBot {
        RandomBot::new(BotContext {
            team: 1,
            seed,
            span: Span::none(),
        })
    }

    #[test]
    fn same_seed_same_choice() {
        let board = Board::standard();
        assert_eq!(bot(3).select_turn(&board, 1), bot(3).select_turn(&board, 1));
    }

    #[test]
    fn no_turns_means_none() {
        let mut board = Board::new(Default::default()).unwrap();
        board.place_worker(1, 0, 0).unwrap();
        for (x, y) in [(1, 0), (0, 1), (1, 1)] {
            board.set_height(x, y, 4).unwrap();
        }
        assert_eq!(bot(1).select_turn(&board, 1), None);
    }
}
