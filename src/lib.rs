//! Santorini rules engine and bot-vs-bot simulation harness.
//!
//! Exposes the packed board, turn generation and resolution, notation,
//! the bot contract, single-game simulations, and the concurrent batch
//! runner used by the `santorini-sim` binary.

pub mod board;
pub mod bot;
pub mod harness;
pub mod movegen;
pub mod protocol;
pub mod resolve;
pub mod simulation;
