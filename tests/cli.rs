//! End-to-end tests for the `santorini-sim` binary.

use std::process::{Command, Output};

fn run_sim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_santorini-sim"))
        .args(args)
        .output()
        .expect("failed to start santorini-sim")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn list_shows_every_bot() {
    let output = run_sim(&["--list"]);
    assert!(output.status.success());
    let text = stdout(&output);
    for name in ["random", "first", "greedy"] {
        assert!(text.contains(name), "missing {name} in:\n{text}");
    }
}

#[test]
fn deterministic_pair_plays_two_games() {
    let output = run_sim(&["first", "greedy", "--threads", "2", "--quiet"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("=== first vs greedy ==="));
    assert!(text.contains("Games: 2"), "unexpected report:\n{text}");
}

#[test]
fn explicit_count_with_random_bot() {
    let output = run_sim(&["random", "Greedy", "12", "--threads", "3", "--seed", "7", "--quiet"]);
    assert!(output.status.success());
    assert!(stdout(&output).contains("Games: 12"));
}

#[test]
fn unknown_bot_fails_before_running() {
    let output = run_sim(&["random", "kyle", "--quiet"]);
    assert!(!output.status.success());
    let err = String::from_utf8_lossy(&output.stderr);
    assert!(err.contains("unknown bot 'kyle'"), "stderr was:\n{err}");
    assert!(!stdout(&output).contains("Games:"));
}

#[test]
fn unparsable_count_is_rejected() {
    let output = run_sim(&["random", "first", "lots"]);
    assert!(!output.status.success());
    assert!(!stdout(&output).contains("Games:"));
}

#[test]
fn missing_bots_print_usage() {
    let output = run_sim(&[]);
    assert!(!output.status.success());
    assert!(stdout(&output).contains("Available bots:"));
}

#[test]
fn losses_file_holds_json_lines() {
    let path = std::env::temp_dir().join(format!("santorini-losses-{}.jsonl", std::process::id()));
    let path_str = path.to_str().unwrap();
    let output = run_sim(&[
        "random", "greedy", "20", "--seed", "3", "--threads", "2", "--quiet", "--losses", path_str,
    ]);
    assert!(output.status.success());

    let contents = std::fs::read_to_string(&path).unwrap();
    for line in contents.lines() {
        let value: serde_json::Value = serde_json::from_str(line).unwrap();
        assert!(value["moves"].is_array());
        assert!(value["final_position"].is_string());
    }
    std::fs::remove_file(&path).unwrap();
}
