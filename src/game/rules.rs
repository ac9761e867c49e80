//! Rules-engine capability consumed by the session.
//!
//! The session never inspects chess rules directly: it asks a [`RulesEngine`]
//! to apply, load and describe positions. [`ChessRules`] backs it with the
//! `chess` crate.

use chess::{Board, ChessMove, Color, Game, Piece, Rank, Square};
use log::debug;
use std::str::FromStr;

use crate::error::{SyncError, SyncResult};
use crate::game::notation::{to_san, to_uci};
use crate::game::utils::has_insufficient_material;

/// One entry of the move history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveRecord {
    pub uci: String,
    pub san: String,
}

pub trait RulesEngine {
    /// Current position as a FEN string
    fn current_position(&self) -> String;
    /// Current position as a board
    fn board(&self) -> Board;
    /// Apply a move; on rejection the engine is unchanged
    fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> SyncResult<MoveRecord>;
    fn is_game_over(&self) -> bool;
    fn side_to_move(&self) -> Color;
    fn move_history(&self) -> &[MoveRecord];
    /// Replace the position wholesale; the history restarts from it
    fn load_position(&mut self, fen: &str) -> SyncResult<()>;
    fn reset(&mut self);
}

/// Queen is substituted when a pawn reaches the last rank without an explicit choice.
pub fn resolve_promotion(
    board: &Board,
    from: Square,
    to: Square,
    requested: Option<Piece>,
) -> Option<Piece> {
    if requested.is_some() {
        return requested;
    }
    let last_rank = match board.side_to_move() {
        Color::White => Rank::Eighth,
        Color::Black => Rank::First,
    };
    if board.piece_on(from) == Some(Piece::Pawn) && to.get_rank() == last_rank {
        Some(Piece::Queen)
    } else {
        None
    }
}

/// Parse a square name, case-insensitively
pub fn parse_square(name: &str) -> Option<Square> {
    Square::from_str(&name.to_lowercase()).ok()
}

/// `q`, `r`, `b` or `n`, either case
pub fn parse_promotion(letter: &str) -> Option<Piece> {
    match letter.to_ascii_lowercase().as_str() {
        "q" => Some(Piece::Queen),
        "r" => Some(Piece::Rook),
        "b" => Some(Piece::Bishop),
        "n" => Some(Piece::Knight),
        _ => None,
    }
}

/// [`RulesEngine`] over `chess::Game`
///
/// The `chess` crate does not track the halfmove clock or fullmove number, so
/// both are kept here and spliced into the FEN.
#[derive(Debug, Clone)]
pub struct ChessRules {
    game: Game,
    history: Vec<MoveRecord>,
    halfmove_clock: u32,
    fullmove_number: u32,
}

impl Default for ChessRules {
    fn default() -> Self {
        Self::new()
    }
}

impl ChessRules {
    pub fn new() -> Self {
        Self {
            game: Game::new(),
            history: Vec::new(),
            halfmove_clock: 0,
            fullmove_number: 1,
        }
    }

    pub fn from_fen(fen: &str) -> SyncResult<Self> {
        let mut rules = Self::new();
        rules.load_position(fen)?;
        Ok(rules)
    }
}

impl RulesEngine for ChessRules {
    fn current_position(&self) -> String {
        let board_fen = self.board().to_string();
        let fields: Vec<&str> = board_fen.split_whitespace().take(4).collect();
        format!(
            "{} {} {}",
            fields.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }

    fn board(&self) -> Board {
        self.game.current_position()
    }

    fn apply_move(
        &mut self,
        from: Square,
        to: Square,
        promotion: Option<Piece>,
    ) -> SyncResult<MoveRecord> {
        let illegal = || SyncError::IllegalMove {
            from: from.to_string(),
            to: to.to_string(),
        };

        let board = self.board();
        let chess_move = ChessMove::new(from, to, promotion);
        if self.is_game_over() || !board.legal(chess_move) {
            return Err(illegal());
        }

        let record = MoveRecord {
            uci: to_uci(chess_move),
            san: to_san(&board, chess_move),
        };
        let resets_clock =
            board.piece_on(from) == Some(Piece::Pawn) || board.piece_on(to).is_some();

        if !self.game.make_move(chess_move) {
            return Err(illegal());
        }

        self.halfmove_clock = if resets_clock { 0 } else { self.halfmove_clock + 1 };
        if board.side_to_move() == Color::Black {
            self.fullmove_number += 1;
        }
        debug!("Applied {} ({})", record.uci, record.san);
        self.history.push(record.clone());
        Ok(record)
    }

    fn is_game_over(&self) -> bool {
        self.game.result().is_some()
            || has_insufficient_material(&self.board())
            || self.game.can_declare_draw()
    }

    fn side_to_move(&self) -> Color {
        self.game.side_to_move()
    }

    fn move_history(&self) -> &[MoveRecord] {
        &self.history
    }

    fn load_position(&mut self, fen: &str) -> SyncResult<()> {
        let invalid = || SyncError::InvalidPosition { fen: fen.to_string() };
        let board = Board::from_str(fen).map_err(|_| invalid())?;

        let mut counters = fen.split_whitespace().skip(4);
        let halfmove_clock = counters.next().and_then(|s| s.parse().ok()).unwrap_or(0);
        let fullmove_number = counters
            .next()
            .and_then(|s| s.parse().ok())
            .filter(|n: &u32| *n >= 1)
            .unwrap_or(1);

        self.game = Game::new_with_board(board);
        self.history.clear();
        self.halfmove_clock = halfmove_clock;
        self.fullmove_number = fullmove_number;
        Ok(())
    }

    fn reset(&mut self) {
        *self = Self::new();
    }
}
