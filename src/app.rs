//! # Application State and Interaction Controller
//!
//! This module defines the `App` struct that owns everything the UI
//! mutates: the game session, the two-phase click selection, the move
//! history, the status line, the pending opponent reply and the training
//! worker. The terminal layer only translates events into the methods here
//! and draws the resulting state.
//!
//! Click handling is an explicit two-state machine (`Selection`): picking a
//! piece highlights its legal destinations, a second click submits the
//! move. A rejected target is immediately re-evaluated as a fresh selection
//! attempt instead of hard-resetting, so mis-clicks flow straight into
//! picking another piece.

use crate::agent::{OpponentStrategy, RandomStrategy};
use crate::board::{color_name, Coord};
use crate::session::{GameSession, Outcome};
use crate::trainer::{TrainerWorker, TrainingUpdate};
use log::{debug, info};
use shakmaty::Color;
use std::time::{Duration, Instant};

/// Number of self-play games requested from the training service.
pub const NUM_TRAINING_GAMES: u32 = 1000;

/// Two-phase selection state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// No piece selected.
    Idle,
    /// One source square marked, with its legal destinations for highlighting.
    Selected { from: Coord, targets: Vec<Coord> },
}

/// One line of the move log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    /// The side that made the move.
    pub mover: Color,
    /// The move in text form ("e2e4").
    pub text: String,
}

impl HistoryEntry {
    /// Renders the entry the way the history panel shows it.
    pub fn label(&self) -> String {
        format!("{}: {}", color_name(self.mover), self.text)
    }
}

/// Runtime configuration for an `App`.
pub struct AppConfig {
    /// Pause before the opponent replies, emulating "thinking".
    pub reply_delay: Duration,
    /// Base URL of the remote training service.
    pub train_url: String,
    /// Fixed RNG seed for the opponent; entropy-seeded when absent.
    pub seed: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            reply_delay: Duration::from_millis(300),
            train_url: "http://127.0.0.1:5001".to_string(),
            seed: None,
        }
    }
}

/// The main application state.
pub struct App {
    pub should_quit: bool,
    pub session: GameSession,
    pub selection: Selection,
    pub history: Vec<HistoryEntry>,
    pub status: String,
    /// Keyboard cursor on the board (arrow keys + Enter mirror mouse clicks).
    pub cursor: Coord,
    strategy: Box<dyn OpponentStrategy>,
    reply_delay: Duration,
    /// Deadline for the opponent's scheduled reply, armed only after a
    /// human move is fully applied and reported.
    pending_reply: Option<Instant>,
    trainer: TrainerWorker,
}

impl App {
    pub fn new(config: AppConfig) -> Self {
        let strategy: Box<dyn OpponentStrategy> = match config.seed {
            Some(seed) => Box::new(RandomStrategy::seeded(seed)),
            None => Box::new(RandomStrategy::new()),
        };
        let mut app = Self {
            should_quit: false,
            session: GameSession::new(),
            selection: Selection::Idle,
            history: Vec::new(),
            status: String::new(),
            cursor: Coord::new(6, 4), // e2
            strategy,
            reply_delay: config.reply_delay,
            pending_reply: None,
            trainer: TrainerWorker::new(config.train_url),
        };
        app.update_status();
        app
    }

    /// One click (or Enter press) on a board square.
    pub fn handle_square_click(&mut self, at: Coord) {
        match std::mem::replace(&mut self.selection, Selection::Idle) {
            Selection::Idle => self.try_select(at),
            Selection::Selected { from, .. } => match self.session.submit_move(from, at) {
                Ok(applied) => {
                    info!("{} played {}", color_name(applied.mover), applied.text);
                    self.history.push(HistoryEntry {
                        mover: applied.mover,
                        text: applied.text,
                    });
                    self.update_status();
                    // Arm the reply only after the move is fully reported.
                    self.pending_reply = Some(Instant::now() + self.reply_delay);
                }
                Err(err) => {
                    debug!(
                        "move {}{} rejected: {err}",
                        from.algebraic(),
                        at.algebraic()
                    );
                    // Treat the rejected target as a fresh selection click.
                    self.try_select(at);
                }
            },
        }
    }

    /// Selects `at` if it holds a piece of the side to move.
    fn try_select(&mut self, at: Coord) {
        let side = self.session.side_to_move();
        if self.session.piece_at(at).is_some_and(|p| p.color == side) {
            let targets = self.session.legal_destinations(at);
            self.selection = Selection::Selected { from: at, targets };
        }
    }

    /// Plays one opponent move, chosen by the configured strategy.
    pub fn take_opponent_turn(&mut self) {
        if self.session.is_game_over() {
            self.update_status();
            return;
        }
        let legal = self.session.legal_moves();
        if let Some(m) = self.strategy.choose(&legal) {
            let applied = self.session.apply_trusted(&m);
            debug!("opponent played {}", applied.text);
            self.history.push(HistoryEntry {
                mover: applied.mover,
                text: applied.text,
            });
            self.update_status();
        }
    }

    /// Called once per event-loop tick: fires the opponent reply when due
    /// and drains training updates.
    pub fn tick(&mut self) {
        if self.pending_reply.is_some_and(|due| Instant::now() >= due) {
            self.pending_reply = None;
            self.take_opponent_turn();
        }
        while let Some(update) = self.trainer.try_recv() {
            self.apply_training_update(update);
        }
    }

    pub fn has_pending_reply(&self) -> bool {
        self.pending_reply.is_some()
    }

    /// Re-derives the status line from the session.
    pub fn update_status(&mut self) {
        self.status = match self.session.outcome() {
            Outcome::Checkmate { winner } => {
                format!("Game Over - {} wins by checkmate!", color_name(winner))
            }
            Outcome::Draw => "Game Over - Draw!".to_string(),
            Outcome::Stalemate => "Game Over - Stalemate!".to_string(),
            Outcome::InProgress => {
                format!("{} to move", color_name(self.session.side_to_move()))
            }
        };
    }

    /// Resets the session and all UI state; cancels a pending reply.
    pub fn new_game(&mut self) {
        info!("starting a new game");
        self.session.reset();
        self.selection = Selection::Idle;
        self.history.clear();
        self.pending_reply = None;
        self.update_status();
    }

    /// Sends one fire-and-forget training request to the remote service.
    pub fn request_training(&mut self) {
        self.status = format!("Training AI for {NUM_TRAINING_GAMES} games...");
        self.trainer.request_training(NUM_TRAINING_GAMES);
    }

    pub fn apply_training_update(&mut self, update: TrainingUpdate) {
        match update {
            TrainingUpdate::Accepted => {
                info!("training request acknowledged");
                self.status = "AI training started! This may take a while...".to_string();
            }
            TrainingUpdate::Failed(_) => {
                // Already logged by the worker; the user just sees the status.
                self.status = "Error starting AI training.".to_string();
            }
        }
    }

    pub fn move_cursor(&mut self, d_row: i8, d_col: i8) {
        let row = (self.cursor.row as i8 + d_row).clamp(0, 7) as u8;
        let col = (self.cursor.col as i8 + d_col).clamp(0, 7) as u8;
        self.cursor = Coord::new(row, col);
    }
}
