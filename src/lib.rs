//! # Interactive Terminal Chessboard
//!
//! A thin presentation layer over the `shakmaty` rules engine: an
//! interactive 8x8 board in the terminal, a trivial opponent that replies
//! with a uniformly random legal move after a short "thinking" pause, and a
//! one-shot trigger for a remote AI training service.
//!
//! All chess rules (legal move generation, check/checkmate/stalemate
//! detection, move application) live in `shakmaty`; this crate only reads
//! snapshots, submits moves and reflects the result on screen.
//!
//! ## Features
//! - Two-phase click selection with legal-destination highlighting
//! - Random-move opponent behind a swappable strategy trait
//! - Move history panel and live status line
//! - Fire-and-forget training request to a remote endpoint
//!
//! ## Usage
//! Run the `play` binary; see `--help` for the delay, seed and endpoint
//! options.

pub mod agent;
pub mod app;
pub mod board;
pub mod session;
pub mod trainer;
pub mod tui;
