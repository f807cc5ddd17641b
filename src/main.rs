//! # Terminal Chessboard
//!
//! Entry point for the interactive chessboard. Parses the command line,
//! initializes logging (to a file when requested, so the alternate screen
//! stays clean) and hands control to the TUI event loop.

use anyhow::Result;
use chessboard::app::{App, AppConfig};
use chessboard::tui;
use clap::Parser;
use env_logger::{Env, Target};
use std::fs::File;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Delay in milliseconds before the opponent replies
    #[clap(long, default_value_t = 300)]
    delay_ms: u64,

    /// Base URL of the remote training service
    #[clap(long, default_value = "http://127.0.0.1:5001")]
    train_url: String,

    /// Fix the opponent's RNG seed for reproducible games
    #[clap(long)]
    seed: Option<u64>,

    /// Write logs to this file instead of stderr
    #[clap(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut builder = env_logger::Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(path) = &args.log_file {
        builder.target(Target::Pipe(Box::new(File::create(path)?)));
    }
    builder.init();

    let mut app = App::new(AppConfig {
        reply_delay: Duration::from_millis(args.delay_ms),
        train_url: args.train_url,
        seed: args.seed,
    });
    tui::run_tui(&mut app)?;

    Ok(())
}
