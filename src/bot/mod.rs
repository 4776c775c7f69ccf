//! Bot contract and the registry of built-in strategies.
//!
//! The simulation only talks to bots through the [`Bot`] trait. Each
//! simulation owns its own bot instances, built from a [`BotKind`] with a
//! per-game seed and tracing span, so stateful bots are never shared between
//! concurrently running games.

pub mod first;
pub mod greedy;
pub mod random;

use std::fmt;
use std::str::FromStr;

use thiserror::Error;
use tracing::Span;

use crate::board::{Board, Team, Turn};

pub use first::FirstBot;
pub use greedy::GreedyBot;
pub use random::RandomBot;

/// A turn-selection strategy.
pub trait Bot: Send {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// True when the chosen turn is a pure function of the board.
    ///
    /// Two deterministic bots always replay the same game, so the harness
    /// only needs one game per seating.
    fn is_deterministic(&self) -> bool;

    /// Chooses a legal turn for `team`, or `None` when the team cannot move
    /// and therefore loses.
    fn select_turn(&mut self, board: &Board, team: Team) -> Option<Turn>;
}

/// Everything a bot is constructed from.
#[derive(Debug, Clone)]
pub struct BotContext {
    pub team: Team,
    /// Seed for randomised strategies.
    pub seed: u64,
    /// Span of the game the bot plays in; bot log lines are recorded inside it.
    pub span: Span,
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BotError {
    #[error("unknown bot '{name}', known bots: {known}")]
    Unknown { name: String, known: String },
}

/// The built-in strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BotKind {
    Random,
    First,
    Greedy,
}

/// All built-in strategies, in listing order.
pub const ALL_BOTS: [BotKind; 3] = [BotKind::Random, BotKind::First, BotKind::Greedy];

impl BotKind {
    pub const fn name(self) -> &'static str {
        match self {
            BotKind::Random => "random",
            BotKind::First => "first",
            BotKind::Greedy => "greedy",
        }
    }

    pub const fn is_deterministic(self) -> bool {
        match self {
            BotKind::Random => false,
            BotKind::First | BotKind::Greedy => true,
        }
    }

    /// One-line description for bot listings.
    pub const fn description(self) -> &'static str {
        match self {
            BotKind::Random => "plays a uniformly random legal turn",
            BotKind::First => "plays the first legal turn in generation order",
            BotKind::Greedy => "wins when it can, blocks wins, otherwise climbs",
        }
    }

    /// Builds a fresh instance of this strategy.
    pub fn build(self, ctx: BotContext) -> Box<dyn Bot> {
        match self {
            BotKind::Random => Box::new(RandomBot::new(ctx)),
            BotKind::First => Box::new(FirstBot::new(ctx)),
            BotKind::Greedy => Box::new(GreedyBot::new(ctx)),
        }
    }
}

impl fmt::Display for BotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BotKind {
    type Err = BotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ALL_BOTS
            .iter()
            .copied()
            .find(|kind| kind.name() == wanted)
            .ok_or_else(|| BotError::Unknown {
                name: s.to_string(),
                known: ALL_BOTS.map(BotKind::name).join(", "),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(team: Team) -> BotContext {
        BotContext {
            team,
            seed: 7,
            span: Span::none(),
        }
    }

    #[test]
    fn names_round_trip_through_from_str() {
        for kind in ALL_BOTS {
            assert_eq!(kind.name().parse::<BotKind>(), Ok(kind));
        }
        assert_eq!("Greedy".parse::<BotKind>(), Ok(BotKind::Greedy));
    }

    #[test]
    fn unknown_name_lists_known_bots() {
        let err = "kyle".parse::<BotKind>().unwrap_err();
        assert_eq!(
            err,
            BotError::Unknown {
                name: "kyle".into(),
                known: "random, first, greedy".into()
            }
        );
    }

    #[test]
    fn built_bots_report_kind_metadata() {
        for kind in ALL_BOTS {
            let bot = kind.build(ctx(1));
            assert_eq!(bot.name(), kind.name());
            assert_eq!(bot.is_deterministic(), kind.is_deterministic());
        }
    }

    #[test]
    fn every_bot_plays_a_legal_opening_turn() {
        let board = Board::standard();
        let legal = board.valid_turns(1);
        for kind in ALL_BOTS {
            let mut bot = kind.build(ctx(1));
            let turn = bot.select_turn(&board, 1).unwrap();
            assert!(legal.contains(&turn), "{} chose {}", kind, turn);
        }
    }
}
