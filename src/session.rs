//! # Game Session - Rules Engine Facade
//!
//! This module provides the `GameSession` which owns the authoritative game
//! position. All chess rules (legal move generation, move application,
//! check/checkmate/stalemate detection) are delegated to the `shakmaty`
//! crate; the session only exposes the narrow query/command surface the
//! presentation layer consumes:
//!
//! - **Snapshots**: the 8x8 grid of pieces, read-only, rebuilt per query
//! - **Move submission**: validated against the engine's own legal move
//!   list and applied atomically, with promotions forced to queen
//! - **Outcome**: derived from the position on every query, never cached

use crate::board::Coord;
use shakmaty::zobrist::{Zobrist64, ZobristHash};
use shakmaty::{
    uci::UciMove, CastlingMode, Chess, Color, EnPassantMode, Move, MoveList, Piece, Position, Role,
};
use std::collections::HashMap;

/// Why a submitted move was not applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveError {
    /// No legal move exists between the two squares.
    Illegal { from: Coord, to: Coord },
    /// The game has already ended; no more moves are accepted.
    GameOver,
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::Illegal { from, to } => {
                write!(f, "no legal move from {} to {}", from.algebraic(), to.algebraic())
            }
            MoveError::GameOver => write!(f, "game is already over"),
        }
    }
}

impl std::error::Error for MoveError {}

/// A move the session has applied, as the reporter wants to see it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedMove {
    /// The side that made the move.
    pub mover: Color,
    /// The move in UCI text form ("e2e4", "e7e8q").
    pub text: String,
}

/// Result of the game as derived from the current position.
///
/// Checkmate takes priority over draw detection, and draws (insufficient
/// material, 50-move rule) take priority over stalemate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Checkmate { winner: Color },
    Draw,
    Stalemate,
}

/// The single source of truth for one game of chess.
///
/// Owns a `shakmaty::Chess` position. The UI never mutates pieces directly:
/// every change goes through `submit_move` (validated) or `apply_trusted`
/// (moves taken from the engine's own legal move list).
pub struct GameSession {
    position: Chess,
    /// How often each position (zobrist-hashed) has occurred, for the
    /// threefold repetition rule. The position the game starts in counts.
    repetitions: HashMap<Zobrist64, u8>,
}

impl GameSession {
    /// Starts a session at the standard initial position.
    pub fn new() -> Self {
        let mut session = Self {
            position: Chess::default(),
            repetitions: HashMap::new(),
        };
        session.record_position();
        session
    }

    fn record_position(&mut self) {
        let hash: Zobrist64 = self.position.zobrist_hash(EnPassantMode::Legal);
        *self.repetitions.entry(hash).or_insert(0) += 1;
    }

    fn is_threefold_repetition(&self) -> bool {
        let hash: Zobrist64 = self.position.zobrist_hash(EnPassantMode::Legal);
        self.repetitions.get(&hash).copied().unwrap_or(0) >= 3
    }

    /// The full board as an 8x8 grid in display orientation (row 0 = rank 8).
    pub fn board_snapshot(&self) -> [[Option<Piece>; 8]; 8] {
        let mut grid = [[None; 8]; 8];
        for (row, rank) in grid.iter_mut().enumerate() {
            for (col, cell) in rank.iter_mut().enumerate() {
                *cell = self
                    .position
                    .board()
                    .piece_at(Coord::new(row as u8, col as u8).square());
            }
        }
        grid
    }

    pub fn piece_at(&self, at: Coord) -> Option<Piece> {
        self.position.board().piece_at(at.square())
    }

    pub fn side_to_move(&self) -> Color {
        self.position.turn()
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> MoveList {
        self.position.legal_moves()
    }

    /// Every square reachable by a legal move from `from`, deduplicated.
    ///
    /// Castling counts as a king move to its destination square (g1/c1
    /// style), matching how moves are submitted by clicking.
    pub fn legal_destinations(&self, from: Coord) -> Vec<Coord> {
        let mut targets: Vec<Coord> = self
            .position
            .legal_moves()
            .iter()
            .filter_map(|m| match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal { from: f, to, .. } if f == from.square() => {
                    Some(Coord::from_square(to))
                }
                _ => None,
            })
            .collect();
        targets.sort_unstable();
        targets.dedup();
        targets
    }

    /// Validates and applies the move `from` -> `to`.
    ///
    /// Pawn promotions are forced to queen; a general promotion selector is
    /// deliberately out of scope. The move is matched against the engine's
    /// legal move list, so castling is requested by the king's destination
    /// square and en passant by the capture destination.
    pub fn submit_move(&mut self, from: Coord, to: Coord) -> Result<AppliedMove, MoveError> {
        if self.is_game_over() {
            return Err(MoveError::GameOver);
        }
        let chosen = self
            .position
            .legal_moves()
            .iter()
            .find(|m| match m.to_uci(CastlingMode::Standard) {
                UciMove::Normal {
                    from: f,
                    to: t,
                    promotion,
                } => {
                    f == from.square()
                        && t == to.square()
                        && (promotion.is_none() || promotion == Some(Role::Queen))
                }
                _ => false,
            })
            .cloned();
        match chosen {
            Some(m) => Ok(self.apply_trusted(&m)),
            None => Err(MoveError::Illegal { from, to }),
        }
    }

    /// Applies a move taken from this session's own legal move list.
    ///
    /// Legality is guaranteed by construction, so no validation is repeated.
    pub fn apply_trusted(&mut self, m: &Move) -> AppliedMove {
        let mover = self.position.turn();
        let text = m.to_uci(CastlingMode::Standard).to_string();
        self.position.play_unchecked(m.clone());
        self.record_position();
        AppliedMove { mover, text }
    }

    pub fn is_game_over(&self) -> bool {
        self.position.is_game_over() || self.is_draw_by_rule()
    }

    /// Draws the engine does not fold into `is_game_over` on its own:
    /// 50-move rule and threefold repetition.
    fn is_draw_by_rule(&self) -> bool {
        self.position.halfmoves() >= 100 || self.is_threefold_repetition()
    }

    /// Derives the outcome from the current position; nothing is cached.
    pub fn outcome(&self) -> Outcome {
        if self.position.is_checkmate() {
            Outcome::Checkmate {
                winner: self.position.turn().other(),
            }
        } else if self.position.is_insufficient_material() || self.is_draw_by_rule() {
            Outcome::Draw
        } else if self.position.is_stalemate() {
            Outcome::Stalemate
        } else {
            Outcome::InProgress
        }
    }

    /// Restores the standard initial position.
    pub fn reset(&mut self) {
        self.position = Chess::default();
        self.repetitions.clear();
        self.record_position();
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shakmaty::fen::Fen;
    use std::str::FromStr;

    fn session_from_fen(fen: &str) -> GameSession {
        let position = Fen::from_str(fen)
            .unwrap()
            .into_position(CastlingMode::Standard)
            .unwrap();
        let mut session = GameSession {
            position,
            repetitions: HashMap::new(),
        };
        session.record_position();
        session
    }

    fn coord(s: &str) -> Coord {
        Coord::from_algebraic(s).unwrap()
    }

    #[test]
    fn fresh_game_is_white_to_move_and_in_progress() {
        let session = GameSession::new();
        assert_eq!(session.side_to_move(), Color::White);
        assert!(!session.is_game_over());
        assert_eq!(session.outcome(), Outcome::InProgress);
        let snapshot = session.board_snapshot();
        assert_eq!(
            snapshot[7][4],
            Some(Piece {
                color: Color::White,
                role: Role::King
            })
        );
        assert_eq!(
            snapshot[1][0],
            Some(Piece {
                color: Color::Black,
                role: Role::Pawn
            })
        );
        assert_eq!(snapshot[4][4], None);
    }

    #[test]
    fn accepts_e2e4_and_advances_turn() {
        let mut session = GameSession::new();
        let applied = session.submit_move(coord("e2"), coord("e4")).unwrap();
        assert_eq!(applied.mover, Color::White);
        assert_eq!(applied.text, "e2e4");
        assert_eq!(session.side_to_move(), Color::Black);
        assert_eq!(session.piece_at(coord("e2")), None);
        assert!(session.piece_at(coord("e4")).is_some());
    }

    #[test]
    fn rejects_move_from_empty_square() {
        let mut session = GameSession::new();
        let err = session.submit_move(coord("e4"), coord("e5")).unwrap_err();
        assert_eq!(
            err,
            MoveError::Illegal {
                from: coord("e4"),
                to: coord("e5")
            }
        );
        // Board untouched.
        assert_eq!(session.board_snapshot(), GameSession::new().board_snapshot());
    }

    #[test]
    fn rejects_illegal_destination() {
        let mut session = GameSession::new();
        assert!(session.submit_move(coord("e2"), coord("e5")).is_err());
        assert!(session.submit_move(coord("e2"), coord("d3")).is_err());
        assert_eq!(session.side_to_move(), Color::White);
    }

    #[test]
    fn pawn_destinations_from_start() {
        let session = GameSession::new();
        let targets = session.legal_destinations(coord("e2"));
        assert_eq!(targets, {
            let mut expected = vec![coord("e3"), coord("e4")];
            expected.sort_unstable();
            expected
        });
        assert!(session.legal_destinations(coord("e4")).is_empty());
        // Black piece, not the side to move.
        assert!(session.legal_destinations(coord("e7")).is_empty());
    }

    #[test]
    fn promotion_auto_queens() {
        // White pawn one step from promotion.
        let mut session = session_from_fen("8/4P3/8/8/8/2k5/8/4K3 w - - 0 1");
        let applied = session.submit_move(coord("e7"), coord("e8")).unwrap();
        assert_eq!(applied.text, "e7e8q");
        assert_eq!(
            session.piece_at(coord("e8")),
            Some(Piece {
                color: Color::White,
                role: Role::Queen
            })
        );
    }

    #[test]
    fn castling_by_king_destination() {
        let mut session =
            session_from_fen("r1bqkbnr/pppp1ppp/2n5/4p3/2B1P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 4 4");
        let targets = session.legal_destinations(coord("e1"));
        assert!(targets.contains(&coord("g1")));
        let applied = session.submit_move(coord("e1"), coord("g1")).unwrap();
        assert_eq!(applied.text, "e1g1");
        assert_eq!(
            session.piece_at(coord("g1")).map(|p| p.role),
            Some(Role::King)
        );
        assert_eq!(
            session.piece_at(coord("f1")).map(|p| p.role),
            Some(Role::Rook)
        );
    }

    #[test]
    fn fools_mate_is_checkmate_for_black() {
        let mut session = GameSession::new();
        session.submit_move(coord("f2"), coord("f3")).unwrap();
        session.submit_move(coord("e7"), coord("e5")).unwrap();
        session.submit_move(coord("g2"), coord("g4")).unwrap();
        session.submit_move(coord("d8"), coord("h4")).unwrap();
        assert!(session.is_game_over());
        assert_eq!(
            session.outcome(),
            Outcome::Checkmate {
                winner: Color::Black
            }
        );
        assert!(session.legal_moves().is_empty());
        assert_eq!(
            session.submit_move(coord("e2"), coord("e4")),
            Err(MoveError::GameOver)
        );
    }

    #[test]
    fn stalemate_detected() {
        let session = session_from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1");
        assert!(session.is_game_over());
        assert_eq!(session.outcome(), Outcome::Stalemate);
    }

    #[test]
    fn bare_kings_draw() {
        let session = session_from_fen("8/8/4k3/8/8/4K3/8/8 w - - 0 1");
        assert!(session.is_game_over());
        assert_eq!(session.outcome(), Outcome::Draw);
    }

    #[test]
    fn threefold_repetition_is_a_draw() {
        let mut session = GameSession::new();
        // Shuffle the knights out and back twice: the starting position
        // (which counts as the first occurrence) comes up a third time.
        let shuffle = [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")];
        for _ in 0..2 {
            for (from, to) in shuffle {
                session.submit_move(coord(from), coord(to)).unwrap();
            }
        }
        assert!(session.is_game_over());
        assert_eq!(session.outcome(), Outcome::Draw);
        assert_eq!(
            session.submit_move(coord("e2"), coord("e4")),
            Err(MoveError::GameOver)
        );

        // The repetition count does not leak into the next game.
        session.reset();
        assert!(!session.is_game_over());
        assert_eq!(session.outcome(), Outcome::InProgress);
    }

    #[test]
    fn repeating_twice_is_not_a_draw() {
        let mut session = GameSession::new();
        for (from, to) in [("g1", "f3"), ("g8", "f6"), ("f3", "g1"), ("f6", "g8")] {
            session.submit_move(coord(from), coord(to)).unwrap();
        }
        // Second occurrence of the starting position only.
        assert!(!session.is_game_over());
        assert_eq!(session.outcome(), Outcome::InProgress);
    }

    #[test]
    fn reset_restores_initial_position() {
        let mut session = GameSession::new();
        session.submit_move(coord("e2"), coord("e4")).unwrap();
        session.reset();
        assert_eq!(session.side_to_move(), Color::White);
        assert_eq!(session.board_snapshot(), GameSession::new().board_snapshot());
    }
}
