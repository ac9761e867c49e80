//! Standard algebraic notation for the move transcript.

use chess::{Board, BoardStatus, ChessMove, MoveGen, Piece, Square};

fn piece_letter(piece: Piece) -> Option<char> {
    match piece {
        Piece::Pawn => None,
        Piece::Knight => Some('N'),
        Piece::Bishop => Some('B'),
        Piece::Rook => Some('R'),
        Piece::Queen => Some('Q'),
        Piece::King => Some('K'),
    }
}

fn file_char(square: Square) -> char {
    (b'a' + square.get_file().to_index() as u8) as char
}

fn rank_char(square: Square) -> char {
    (b'1' + square.get_rank().to_index() as u8) as char
}

/// Coordinate notation, e.g. `e2e4` or `e7e8q`
pub fn to_uci(chess_move: ChessMove) -> String {
    let mut uci = format!("{}{}", chess_move.get_source(), chess_move.get_dest());
    if let Some(piece) = chess_move.get_promotion() {
        uci.push(piece_letter(piece).map_or('q', |c| c.to_ascii_lowercase()));
    }
    uci
}

/// Render a legal move on `board` in SAN. The move must be legal on `board`.
pub fn to_san(board: &Board, chess_move: ChessMove) -> String {
    let source = chess_move.get_source();
    let dest = chess_move.get_dest();
    let Some(piece) = board.piece_on(source) else {
        return to_uci(chess_move);
    };

    let file_delta =
        (dest.get_file().to_index() as i32 - source.get_file().to_index() as i32).abs();

    let mut san = String::new();
    if piece == Piece::King && file_delta == 2 {
        if dest.get_file().to_index() > source.get_file().to_index() {
            san.push_str("O-O");
        } else {
            san.push_str("O-O-O");
        }
    } else {
        let is_capture =
            board.piece_on(dest).is_some() || (piece == Piece::Pawn && file_delta == 1);

        match piece_letter(piece) {
            Some(letter) => {
                san.push(letter);
                san.push_str(&disambiguation(board, piece, source, dest));
            }
            None if is_capture => san.push(file_char(source)),
            None => {}
        }
        if is_capture {
            san.push('x');
        }
        san.push_str(&dest.to_string());
        if let Some(promotion) = chess_move.get_promotion().and_then(piece_letter) {
            san.push('=');
            san.push(promotion);
        }
    }

    let after = board.make_move_new(chess_move);
    if after.status() == BoardStatus::Checkmate {
        san.push('#');
    } else if after.checkers().popcnt() > 0 {
        san.push('+');
    }
    san
}

fn disambiguation(board: &Board, piece: Piece, source: Square, dest: Square) -> String {
    let rivals: Vec<Square> = MoveGen::new_legal(board)
        .filter(|m| {
            m.get_dest() == dest
                && m.get_source() != source
                && board.piece_on(m.get_source()) == Some(piece)
        })
        .map(|m| m.get_source())
        .collect();

    if rivals.is_empty() {
        String::new()
    } else if rivals.iter().all(|s| s.get_file() != source.get_file()) {
        file_char(source).to_string()
    } else if rivals.iter().all(|s| s.get_rank() != source.get_rank()) {
        rank_char(source).to_string()
    } else {
        format!("{}{}", file_char(source), rank_char(source))
    }
}
