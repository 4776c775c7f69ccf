//! Bot-vs-bot simulation CLI.
//!
//! Usage:
//!   santorini-sim <bot1> <bot2> [games] [OPTIONS]
//!
//! Plays `games` Santorini games between two bots, alternating who moves
//! first, and prints the win totals.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use santorini::board::BoardConfig;
use santorini::bot::{BotKind, ALL_BOTS};
use santorini::harness::{self, HarnessConfig, Layout};
use santorini::simulation::DEFAULT_MAX_MOVES;

#[derive(Parser, Debug)]
#[command(name = "santorini-sim", version, about = "Pits two Santorini bots against each other")]
struct Args {
    /// Bot playing first in even-numbered games
    bot1: Option<String>,

    /// Bot playing first in odd-numbered games
    bot2: Option<String>,

    /// Number of games to play
    games: Option<usize>,

    /// Number of concurrent runners
    #[arg(long, default_value_t = 10)]
    threads: usize,

    /// Turns per game before it is called a draw
    #[arg(long, default_value_t = DEFAULT_MAX_MOVES)]
    max_moves: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Play every requested game even when both bots are deterministic
    #[arg(long)]
    no_shortcut: bool,

    /// Scatter workers randomly instead of using the standard opening
    #[arg(long)]
    random_layout: bool,

    /// Write the games bot 1 lost to this file as JSON lines
    #[arg(long, value_name = "FILE")]
    losses: Option<PathBuf>,

    /// List the available bots and exit
    #[arg(long)]
    list: bool,

    /// Only log warnings and errors
    #[arg(short, long)]
    quiet: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn print_bots() {
    println!("Available bots:");
    for kind in ALL_BOTS {
        println!("  {:<8} {}", kind.name(), kind.description());
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => Level::WARN,
        (false, 0) => Level::INFO,
        (false, 1) => Level::DEBUG,
        (false, _) => Level::TRACE,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("failed to install logger")?;

    if args.list {
        print_bots();
        return Ok(());
    }

    let (Some(bot1), Some(bot2)) = (args.bot1.as_deref(), args.bot2.as_deref()) else {
        print_bots();
        bail!("two bots are required: santorini-sim <bot1> <bot2> [games]");
    };
    let bot1: BotKind = bot1.parse()?;
    let bot2: BotKind = bot2.parse()?;

    let defaults = HarnessConfig::default();
    let config = HarnessConfig {
        games: args.games.unwrap_or(defaults.games),
        threads: args.threads,
        max_moves: args.max_moves,
        seed: args.seed,
        shortcut_deterministic: !args.no_shortcut,
        retain_losses: args.losses.is_some(),
        quiet: args.quiet,
        layout: if args.random_layout {
            Layout::Random(BoardConfig::default())
        } else {
            Layout::Standard
        },
    };

    let summary = harness::run_batch(&config, bot1, bot2)?;
    summary.write_report(&mut io::stdout().lock())?;

    if let Some(path) = args.losses {
        let file = File::create(&path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        harness::write_jsonl(&summary.stats.losses, &mut writer)
            .with_context(|| format!("failed to write {}", path.display()))?;
        info!(count = summary.stats.losses.len(), path = %path.display(), "wrote losing games");
    }

    Ok(())
}
