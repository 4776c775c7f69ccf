//! A single game between two bots.
//!
//! A simulation owns its board and both bot instances. `run` asks the bot of
//! the team to move for a turn, plays it, and repeats until a worker reaches
//! height 3, a bot has no turn to offer, or the move cap is hit.

use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info_span, warn, Span};

use crate::board::{Board, Team, Turn};
use crate::bot::{Bot, BotContext, BotKind};
use crate::protocol::{encode_position, format_turn};
use crate::resolve::TurnError;

/// Default cap on turns per game before it is called a draw.
pub const DEFAULT_MAX_MOVES: usize = 1000;

/// Lifecycle of a simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimState {
    Pending,
    Running,
    Complete,
}

/// How a game was won.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WinReason {
    /// A worker stepped onto height 3.
    Reached,
    /// The other team had no turn to play.
    Exhaustion,
}

/// Final result of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    Win { team: Team, reason: WinReason },
    /// The move cap was reached without a winner.
    Draw,
}

impl Outcome {
    pub fn victor(&self) -> Option<Team> {
        match self {
            Outcome::Win { team, .. } => Some(*team),
            Outcome::Draw => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("simulations need exactly two teams, board has {0}")]
    UnsupportedTeams(u8),

    #[error("{bot} (team {team}) played illegal turn {turn} on move {ply}: {source}")]
    IllegalTurn {
        bot: &'static str,
        team: Team,
        turn: String,
        ply: usize,
        #[source]
        source: TurnError,
    },

    #[error("simulation {0} was aborted by an earlier failure")]
    Aborted(usize),

    #[error("simulation {number} panicked: {message}")]
    Panicked { number: usize, message: String },
}

/// Serialisable summary of a finished game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameRecord {
    pub number: usize,
    /// Bot names for team 1 and team 2.
    pub bots: [&'static str; 2],
    pub outcome: Option<Outcome>,
    /// Full rounds played, one turn per team.
    pub rounds: usize,
    pub moves: Vec<String>,
    pub final_hash: String,
    pub final_position: String,
}

pub struct Simulation {
    number: usize,
    board: Board,
    /// Bots indexed by `team - 1`.
    bots: [Box<dyn Bot>; 2],
    moves: Vec<Turn>,
    outcome: Option<Outcome>,
    state: SimState,
    max_moves: usize,
    span: Span,
}

impl Simulation {
    /// Creates a pending simulation. `team1` moves first.
    pub fn new(
        number: usize,
        board: Board,
        team1: Box<dyn Bot>,
        team2: Box<dyn Bot>,
    ) -> Result<Self, SimulationError> {
        Self::with_span(number, board, [team1, team2], info_span!("simulation", number))
    }

    /// Creates a pending simulation with fresh bots of the given kinds.
    ///
    /// Each team's bot gets its own seed derived from `seed`, and logs inside
    /// this game's span.
    pub fn from_kinds(
        number: usize,
        board: Board,
        kinds: [BotKind; 2],
        seed: u64,
    ) -> Result<Self, SimulationError> {
        let span = info_span!("simulation", number);
        let build = |kind: BotKind, team: Team| {
            kind.build(BotContext {
                team,
                seed: seed.wrapping_mul(2).wrapping_add(team as u64),
                span: span.clone(),
            })
        };
        let bots = [build(kinds[0], 1), build(kinds[1], 2)];
        Self::with_span(number, board, bots, span)
    }

    fn with_span(
        number: usize,
        board: Board,
        bots: [Box<dyn Bot>; 2],
        span: Span,
    ) -> Result<Self, SimulationError> {
        if board.teams() != 2 {
            return Err(SimulationError::UnsupportedTeams(board.teams()));
        }
        Ok(Simulation {
            number,
            board,
            bots,
            moves: Vec::new(),
            outcome: None,
            state: SimState::Pending,
            max_moves: DEFAULT_MAX_MOVES,
            span,
        })
    }

    /// Sets the turn cap after which the game is a draw.
    pub fn with_max_moves(mut self, max_moves: usize) -> Self {
        self.max_moves = max_moves;
        self
    }

    pub fn number(&self) -> usize {
        self.number
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Turns played so far, in order.
    pub fn moves(&self) -> &[Turn] {
        &self.moves
    }

    pub fn state(&self) -> SimState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.outcome
    }

    /// The winning team, once there is one.
    pub fn victor(&self) -> Option<Team> {
        self.outcome.and_then(|o| o.victor())
    }

    pub fn bot_names(&self) -> [&'static str; 2] {
        [self.bots[0].name(), self.bots[1].name()]
    }

    /// Plays the game to completion.
    ///
    /// Running a completed simulation again returns the recorded outcome. An
    /// illegal turn from a bot ends the game with an error; it is never
    /// retried.
    pub fn run(&mut self) -> Result<Outcome, SimulationError> {
        if self.state == SimState::Complete {
            return self.outcome.ok_or(SimulationError::Aborted(self.number));
        }
        self.state = SimState::Running;
        let span = self.span.clone();
        let _enter = span.enter();
        debug!(team1 = self.bots[0].name(), team2 = self.bots[1].name(), "game started");

        while self.moves.len() < self.max_moves {
            let team = self.board.current_team();
            let bot = &mut self.bots[(team - 1) as usize];
            let name = bot.name();

            let Some(turn) = bot.select_turn(&self.board, team) else {
                let winner = 3 - team;
                debug!(team, winner, ply = self.moves.len(), "no legal turn, team loses");
                return Ok(self.finish(Outcome::Win {
                    team: winner,
                    reason: WinReason::Exhaustion,
                }));
            };

            match self.board.play_turn(&turn) {
                Ok(won) => {
                    self.moves.push(turn);
                    debug!(team, bot = name, turn = %turn, "turn played");
                    if won {
                        return Ok(self.finish(Outcome::Win {
                            team,
                            reason: WinReason::Reached,
                        }));
                    }
                    self.board.advance_turn();
                }
                Err(source) => {
                    error!(
                        team,
                        bot = name,
                        turn = %turn,
                        error = %source,
                        "bot played an illegal turn"
                    );
                    self.state = SimState::Complete;
                    return Err(SimulationError::IllegalTurn {
                        bot: name,
                        team,
                        turn: format_turn(&turn),
                        ply: self.moves.len(),
                        source,
                    });
                }
            }
        }

        warn!(max_moves = self.max_moves, "move cap reached, game drawn");
        Ok(self.finish(Outcome::Draw))
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        debug!(?outcome, moves = self.moves.len(), "game complete");
        self.outcome = Some(outcome);
        self.state = SimState::Complete;
        outcome
    }

    /// Snapshot of the game for reporting.
    pub fn record(&self) -> GameRecord {
        GameRecord {
            number: self.number,
            bots: self.bot_names(),
            outcome: self.outcome,
            rounds: self.moves.len() / 2,
            moves: self.moves.iter().map(format_turn).collect(),
            final_hash: self.board.hash(),
            final_position: encode_position(&self.board),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::BoardConfig;

    /// Replays a fixed script, then gives up.
    struct Scripted {
        turns: Vec<Turn>,
    }

    impl Bot for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn is_deterministic(&self) -> bool {
            true
        }

        fn select_turn(&mut self, _board: &Board, _team: Team) -> Option<Turn> {
            if self.turns.is_empty() {
                None
            } else {
                Some(self.turns.remove(0))
            }
        }
    }

    fn scripted(turns: Vec<Turn>) -> Box<dyn Bot> {
        Box::new(Scripted { turns })
    }

    #[test]
    fn exhaustion_hands_win_to_other_team() {
        let mut sim =
            Simulation::new(0, Board::standard(), scripted(vec![]), scripted(vec![])).unwrap();
        assert_eq!(sim.state(), SimState::Pending);
        let outcome = sim.run().unwrap();
        assert_eq!(
            outcome,
            Outcome::Win {
                team: 2,
                reason: WinReason::Exhaustion
            }
        );
        assert_eq!(sim.state(), SimState::Complete);
        assert_eq!(sim.victor(), Some(2));
        assert!(sim.moves().is_empty());
    }

    #[test]
    fn reaching_height_three_wins() {
        let mut board = Board::new(BoardConfig::default()).unwrap();
        board.place_worker(1, 0, 0).unwrap();
        board.place_worker(2, 4, 4).unwrap();
        board.set_height(0, 0, 2).unwrap();
        board.set_height(1, 0, 3).unwrap();
        let win = Turn::new(
            board.tile(0, 0).unwrap(),
            board.tile(1, 0).unwrap(),
            board.tile(2, 0).unwrap(),
        );
        let mut sim = Simulation::new(1, board, scripted(vec![win]), scripted(vec![])).unwrap();
        assert_eq!(
            sim.run().unwrap(),
            Outcome::Win {
                team: 1,
                reason: WinReason::Reached
            }
        );
        assert_eq!(sim.moves(), &[win]);
        assert_eq!(sim.board().tile(2, 0).unwrap().height, 0);
        let record = sim.record();
        assert_eq!(record.moves, vec!["a1-b1^c1".to_string()]);
        assert_eq!(record.bots, ["scripted", "scripted"]);
    }

    #[test]
    fn illegal_turn_is_fatal() {
        let board = Board::standard();
        // Team 1 tries to move a team 2 worker.
        let bogus = Turn::new(
            board.tile(1, 2).unwrap(),
            board.tile(0, 2).unwrap(),
            board.tile(0, 1).unwrap(),
        );
        let mut sim = Simulation::new(2, board, scripted(vec![bogus]), scripted(vec![])).unwrap();
        let err = sim.run().unwrap_err();
        assert!(matches!(
            err,
            SimulationError::IllegalTurn {
                team: 1,
                ply: 0,
                source: TurnError::WrongTeam { .. },
                ..
            }
        ));
        assert_eq!(sim.state(), SimState::Complete);
        assert!(matches!(sim.run(), Err(SimulationError::Aborted(2))));
    }

    #[test]
    fn move_cap_declares_draw() {
        let kinds = [BotKind::Random, BotKind::Random];
        let mut sim = Simulation::from_kinds(3, Board::standard(), kinds, 11)
            .unwrap()
            .with_max_moves(4);
        let outcome = sim.run().unwrap();
        // Four turns cannot produce a win from the opening.
        assert_eq!(outcome, Outcome::Draw);
        assert_eq!(sim.moves().len(), 4);
        assert_eq!(sim.board().turn_count(), 4);
    }

    #[test]
    fn rejects_boards_without_two_teams() {
        let board = Board::new(BoardConfig {
            teams: 3,
            ..Default::default()
        })
        .unwrap();
        let result = Simulation::from_kinds(0, board, [BotKind::First, BotKind::First], 0);
        assert!(matches!(result, Err(SimulationError::UnsupportedTeams(3))));
    }

    #[test]
    fn rerun_returns_recorded_outcome() {
        let kinds = [BotKind::Greedy, BotKind::First];
        let mut sim = Simulation::from_kinds(4, Board::standard(), kinds, 0).unwrap();
        let first = sim.run().unwrap();
        let moves = sim.moves().len();
        assert_eq!(sim.run().unwrap(), first);
        assert_eq!(sim.moves().len(), moves);
        assert_eq!(sim.record().outcome, Some(first));
    }
}
