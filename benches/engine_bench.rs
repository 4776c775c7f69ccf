use criterion::{black_box, criterion_group, criterion_main, Criterion};

use santorini::board::Board;
use santorini::bot::BotKind;
use santorini::movegen::valid_turns;
use santorini::protocol::parse_position;
use santorini::simulation::Simulation;

/// Mid-game position with towers at every height.
const MIDGAME: &str = "5x5:2:2:6/1.2.0.0.0./0.211.0.0./0.114.020./1.0.122.0./0.0.3.0.0.";

fn bench_valid_turns(c: &mut Criterion) {
    let opening = Board::standard();
    c.bench_function("valid_turns_opening", |b| {
        b.iter(|| valid_turns(black_box(&opening), black_box(1)))
    });

    let midgame = parse_position(MIDGAME).unwrap();
    c.bench_function("valid_turns_midgame", |b| {
        b.iter(|| valid_turns(black_box(&midgame), black_box(1)))
    });
}

fn bench_play_undo(c: &mut Criterion) {
    let board = parse_position(MIDGAME).unwrap();
    let turns = valid_turns(&board, board.current_team());
    c.bench_function("play_undo_all_turns", |b| {
        let mut scratch = board.clone();
        b.iter(|| {
            for turn in &turns {
                let won = scratch.play_turn(black_box(turn)).unwrap();
                black_box(won);
                scratch.undo_turn(turn).unwrap();
            }
        })
    });
}

fn bench_hash(c: &mut Criterion) {
    let board = parse_position(MIDGAME).unwrap();
    c.bench_function("board_hash", |b| b.iter(|| black_box(&board).hash()));
}

fn bench_full_game(c: &mut Criterion) {
    c.bench_function("random_vs_greedy_game", |b| {
        let mut seed = 0u64;
        b.iter(|| {
            seed += 1;
            let mut sim = Simulation::from_kinds(
                0,
                Board::standard(),
                [BotKind::Random, BotKind::Greedy],
                seed,
            )
            .unwrap();
            black_box(sim.run().unwrap())
        })
    });
}

criterion_group!(
    benches,
    bench_valid_turns,
    bench_play_undo,
    bench_hash,
    bench_full_game
);
criterion_main!(benches);
