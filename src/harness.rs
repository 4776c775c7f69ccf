//! Concurrent bot-vs-bot simulation batches.
//!
//! A producer feeds simulations into a bounded work channel. A fixed pool of
//! runners pulls from it, plays each game, and pushes a [`Completed`] record
//! onto the results channel. A single aggregator drains results into
//! [`Stats`]. Every runner holds a clone of the results sender, so the
//! results channel closes exactly when the last runner exits.

use std::any::Any;
use std::io::Write;
use std::panic::{self, AssertUnwindSafe};
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, info};

use crate::board::{Board, BoardConfig, BoardError, Team};
use crate::bot::BotKind;
use crate::simulation::{GameRecord, Simulation, SimulationError, DEFAULT_MAX_MOVES};

/// Starting positions for a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    /// The fixed two-player 5×5 opening.
    Standard,
    /// Workers scattered at random, reseeded for every game.
    Random(BoardConfig),
}

impl Layout {
    pub fn board(&self, seed: u64) -> Result<Board, BoardError> {
        match self {
            Layout::Standard => Ok(Board::standard()),
            Layout::Random(config) => {
                Board::random_layout(*config, &mut SmallRng::seed_from_u64(seed))
            }
        }
    }

    fn teams(&self) -> u8 {
        match self {
            Layout::Standard => 2,
            Layout::Random(config) => config.teams,
        }
    }
}

/// Configuration for a simulation batch.
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Number of games requested.
    pub games: usize,
    /// Number of concurrent runners.
    pub threads: usize,
    /// Turn cap per game before it is drawn.
    pub max_moves: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Play only one game per seating when both bots are deterministic.
    pub shortcut_deterministic: bool,
    /// Keep the records of games bot 1 lost.
    pub retain_losses: bool,
    /// Suppress per-game progress logging.
    pub quiet: bool,
    pub layout: Layout,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        HarnessConfig {
            games: 1000,
            threads: 10,
            max_moves: DEFAULT_MAX_MOVES,
            seed: 0,
            shortcut_deterministic: true,
            retain_losses: true,
            quiet: false,
            layout: Layout::Standard,
        }
    }
}

#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("at least one runner thread is required")]
    NoThreads,

    #[error("simulations need exactly two teams, layout has {0}")]
    UnsupportedTeams(u8),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("failed to build runner pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("aggregator thread panicked")]
    AggregatorPanicked,
}

/// Result of one simulation, as delivered to the aggregator.
#[derive(Debug)]
pub struct Completed {
    pub number: usize,
    pub result: Result<GameRecord, SimulationError>,
}

/// The team bot 1 plays in simulation `number`.
///
/// Seating alternates: even numbers put bot 1 first, odd numbers bot 2.
pub fn bot1_team(number: usize) -> Team {
    (number % 2) as Team + 1
}

/// Number of games a batch will actually play.
///
/// Two deterministic bots replay the same game for a given seating, so with
/// the shortcut enabled one game per seating is enough.
pub fn planned_games(config: &HarnessConfig, bot1: BotKind, bot2: BotKind) -> usize {
    if config.shortcut_deterministic && bot1.is_deterministic() && bot2.is_deterministic() {
        config.games.min(2)
    } else {
        config.games
    }
}

/// Aggregated batch results, from bot 1's point of view.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Stats {
    pub games: usize,
    pub bot1_wins: usize,
    pub bot2_wins: usize,
    pub draws: usize,
    pub failures: usize,
    /// Sum of full rounds over every finished game.
    pub sum_rounds: usize,
    /// Games bot 1 lost, kept for inspection.
    #[serde(skip)]
    pub losses: Vec<GameRecord>,
}

impl Stats {
    /// Folds one completed simulation into the totals.
    pub fn update(&mut self, completed: Completed, retain_losses: bool) {
        self.games += 1;
        let record = match completed.result {
            Ok(record) => record,
            Err(err) => {
                error!(number = completed.number, error = %err, "simulation failed");
                self.failures += 1;
                return;
            }
        };

        self.sum_rounds += record.rounds;
        match record.outcome.and_then(|o| o.victor()) {
            None => self.draws += 1,
            Some(team) if team == bot1_team(completed.number) => self.bot1_wins += 1,
            Some(_) => {
                self.bot2_wins += 1;
                if retain_losses {
                    self.losses.push(record);
                }
            }
        }
    }

    /// Mean number of rounds per finished game.
    pub fn average_rounds(&self) -> f64 {
        let finished = self.games - self.failures;
        if finished == 0 {
            0.0
        } else {
            self.sum_rounds as f64 / finished as f64
        }
    }
}

/// Outcome of a full batch.
#[derive(Debug, Clone)]
pub struct Summary {
    pub bot1: BotKind,
    pub bot2: BotKind,
    pub planned: usize,
    pub stats: Stats,
    pub elapsed: Duration,
}

impl Summary {
    /// Emits the batch totals as one structured log line.
    pub fn log(&self) {
        info!(
            bot1 = %self.bot1,
            bot1_wins = self.stats.bot1_wins,
            bot2 = %self.bot2,
            bot2_wins = self.stats.bot2_wins,
            draws = self.stats.draws,
            failures = self.stats.failures,
            num_rounds = self.stats.sum_rounds,
            avg_round_length = self.stats.average_rounds(),
            elapsed_ms = self.elapsed.as_millis() as u64,
            "batch complete"
        );
    }

    /// Writes a human-readable report.
    pub fn write_report<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        let games = self.stats.games.max(1) as f64;
        writeln!(out, "=== {} vs {} ===", self.bot1, self.bot2)?;
        writeln!(out, "Games: {}", self.stats.games)?;
        writeln!(
            out,
            "  {:>8}: {} ({:.1}%)",
            self.bot1.name(),
            self.stats.bot1_wins,
            100.0 * self.stats.bot1_wins as f64 / games
        )?;
        writeln!(
            out,
            "  {:>8}: {} ({:.1}%)",
            self.bot2.name(),
            self.stats.bot2_wins,
            100.0 * self.stats.bot2_wins as f64 / games
        )?;
        writeln!(out, "Draws: {}", self.stats.draws)?;
        writeln!(out, "Failures: {}", self.stats.failures)?;
        writeln!(out, "Avg rounds/game: {:.1}", self.stats.average_rounds())?;
        writeln!(out, "Elapsed: {:.2}s", self.elapsed.as_secs_f64())
    }
}

/// Lazily builds the simulations of a batch, seating the bots round-robin.
///
/// Nothing is constructed until the iterator is polled, so only the games
/// waiting in the work channel or being played exist at any one time.
pub fn batch_simulations(
    config: &HarnessConfig,
    bot1: BotKind,
    bot2: BotKind,
    planned: usize,
    base_seed: u64,
) -> impl Iterator<Item = Result<Simulation, HarnessError>> + '_ {
    (0..planned).map(move |number| {
        let seed = base_seed.wrapping_add(number as u64);
        let kinds = if bot1_team(number) == 1 {
            [bot1, bot2]
        } else {
            [bot2, bot1]
        };
        let board = config.layout.board(seed)?;
        let sim = Simulation::from_kinds(number, board, kinds, seed)?;
        Ok(sim.with_max_moves(config.max_moves))
    })
}

/// Runs a batch of games between `bot1` and `bot2`.
///
/// Configuration problems are reported before any game starts.
pub fn run_batch(
    config: &HarnessConfig,
    bot1: BotKind,
    bot2: BotKind,
) -> Result<Summary, HarnessError> {
    if config.threads == 0 {
        return Err(HarnessError::NoThreads);
    }
    if config.layout.teams() != 2 {
        return Err(HarnessError::UnsupportedTeams(config.layout.teams()));
    }
    if let Layout::Random(board) = config.layout {
        board.validate()?;
    }

    let planned = planned_games(config, bot1, bot2);
    let base_seed = if config.seed != 0 {
        config.seed
    } else {
        rand::random()
    };
    info!(
        %bot1,
        %bot2,
        games = planned,
        threads = config.threads,
        seed = base_seed,
        "starting batch"
    );

    let mut build_error = None;
    let simulations = batch_simulations(config, bot1, bot2, planned, base_seed)
        .map_while(|sim| sim.map_err(|err| build_error = Some(err)).ok());

    let start = Instant::now();
    let mut stats = Stats::default();
    let quiet = config.quiet;
    let retain_losses = config.retain_losses;
    run_pool(config.threads, simulations, |completed| {
        stats.update(completed, retain_losses);
        if !quiet {
            debug!(
                done = stats.games,
                planned,
                bot1_wins = stats.bot1_wins,
                bot2_wins = stats.bot2_wins,
                "progress"
            );
            if planned >= 10 && stats.games % (planned / 10) == 0 {
                info!(done = stats.games, planned, "progress");
            }
        }
    })?;
    if let Some(err) = build_error {
        return Err(err);
    }

    let summary = Summary {
        bot1,
        bot2,
        planned,
        stats,
        elapsed: start.elapsed(),
    };
    summary.log();
    Ok(summary)
}

/// Plays `simulations` on `threads` runners, handing every result to
/// `on_complete` on a single aggregator thread.
///
/// Returns once every simulation has been reported.
pub fn run_pool<I, F>(threads: usize, simulations: I, on_complete: F) -> Result<usize, HarnessError>
where
    I: IntoIterator<Item = Simulation>,
    F: FnMut(Completed) + Send,
{
    if threads == 0 {
        return Err(HarnessError::NoThreads);
    }
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("sim-runner-{i}"))
        .build()?;

    let (work_tx, work_rx) = crossbeam_channel::bounded::<Simulation>(threads * 2);
    let (done_tx, done_rx) = crossbeam_channel::unbounded::<Completed>();

    for id in 0..threads {
        let work_rx = work_rx.clone();
        let done_tx = done_tx.clone();
        pool.spawn(move || runner(id, work_rx, done_tx));
    }
    // From here on only the runners hold results senders.
    drop(done_tx);
    drop(work_rx);

    thread::scope(|s| {
        let aggregator = s.spawn(move || aggregate(done_rx, on_complete));

        let mut submitted = 0;
        for sim in simulations {
            if work_tx.send(sim).is_err() {
                error!(submitted, "all runners exited early");
                break;
            }
            submitted += 1;
        }
        drop(work_tx);
        debug!(submitted, "work channel closed, waiting for runners");

        let received = aggregator
            .join()
            .map_err(|_| HarnessError::AggregatorPanicked)?;
        debug!(received, "results drained");
        Ok(received)
    })
}

fn runner(id: usize, work: Receiver<Simulation>, done: Sender<Completed>) {
    debug!(runner = id, "runner started");
    for mut sim in work.iter() {
        let number = sim.number();
        let result = match panic::catch_unwind(AssertUnwindSafe(|| sim.run())) {
            Ok(Ok(_)) => Ok(sim.record()),
            Ok(Err(err)) => Err(err),
            Err(payload) => Err(SimulationError::Panicked {
                number,
                message: panic_message(payload.as_ref()),
            }),
        };
        if done.send(Completed { number, result }).is_err() {
            break;
        }
    }
    debug!(runner = id, "runner finished");
}

fn aggregate<F: FnMut(Completed)>(results: Receiver<Completed>, mut on_complete: F) -> usize {
    let mut received = 0;
    for completed in results.iter() {
        received += 1;
        on_complete(completed);
    }
    received
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Writes game records as JSON lines.
pub fn write_jsonl<W: Write>(records: &[GameRecord], out: &mut W) -> std::io::Result<()> {
    for record in records {
        serde_json::to_writer(&mut *out, record)?;
        writeln!(out)?;
    }
    out.flush()
}
