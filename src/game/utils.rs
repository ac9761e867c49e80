use chess::{Board, BoardStatus, Color, Piece, Square, ALL_SQUARES};

/// Convert a chess color to a string
pub fn color_to_string(color: Color) -> String {
    match color {
        Color::White => "white".to_string(),
        Color::Black => "black".to_string(),
    }
}

/// Parse a chessboard piece code such as `wP` or `bK` into its color and piece
pub fn parse_piece_code(code: &str) -> Option<(Color, Piece)> {
    let mut chars = code.chars();
    let color = match chars.next()? {
        'w' => Color::White,
        'b' => Color::Black,
        _ => return None,
    };
    let piece = match chars.next()?.to_ascii_uppercase() {
        'P' => Piece::Pawn,
        'N' => Piece::Knight,
        'B' => Piece::Bishop,
        'R' => Piece::Rook,
        'Q' => Piece::Queen,
        'K' => Piece::King,
        _ => return None,
    };
    if chars.next().is_some() {
        return None;
    }
    Some((color, piece))
}

/// Get the game status as a string
pub fn game_status(board: &Board, game_over: bool) -> String {
    match board.status() {
        BoardStatus::Checkmate => match board.side_to_move() {
            Color::White => "black_wins".to_string(),
            Color::Black => "white_wins".to_string(),
        },
        BoardStatus::Stalemate => "draw".to_string(),
        BoardStatus::Ongoing if game_over => "draw".to_string(),
        BoardStatus::Ongoing => {
            if board.checkers().popcnt() > 0 {
                "check".to_string()
            } else if board.side_to_move() == Color::White {
                "white_turn".to_string()
            } else {
                "black_turn".to_string()
            }
        }
    }
}

#[derive(Default)]
struct MinorCount {
    knights: u32,
    bishops: u32,
    bishop_on_light: bool,
    bishop_on_dark: bool,
    heavy_or_pawn: u32,
}

fn is_light_square(square: Square) -> bool {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2 == 1
}

/// Check if the board has insufficient material for checkmate
pub fn has_insufficient_material(board: &Board) -> bool {
    let mut white = MinorCount::default();
    let mut black = MinorCount::default();

    for square in ALL_SQUARES {
        let (Some(piece), Some(color)) = (board.piece_on(square), board.color_on(square)) else {
            continue;
        };
        let side = match color {
            Color::White => &mut white,
            Color::Black => &mut black,
        };
        match piece {
            Piece::Knight => side.knights += 1,
            Piece::Bishop => {
                side.bishops += 1;
                if is_light_square(square) {
                    side.bishop_on_light = true;
                } else {
                    side.bishop_on_dark = true;
                }
            }
            Piece::King => {}
            _ => side.heavy_or_pawn += 1,
        }
    }

    if white.heavy_or_pawn > 0 || black.heavy_or_pawn > 0 {
        return false;
    }

    let white_minors = white.knights + white.bishops;
    let black_minors = black.knights + black.bishops;

    match (white_minors, black_minors) {
        // King vs king, or a lone minor piece against a bare king
        (0, 0) | (1, 0) | (0, 1) => true,
        // Bishops of the same square color cannot force mate
        (1, 1) if white.bishops == 1 && black.bishops == 1 => {
            (white.bishop_on_light && black.bishop_on_light)
                || (white.bishop_on_dark && black.bishop_on_dark)
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn piece_codes_parse() {
        assert_eq!(parse_piece_code("wP"), Some((Color::White, Piece::Pawn)));
        assert_eq!(parse_piece_code("bK"), Some((Color::Black, Piece::King)));
        assert_eq!(parse_piece_code("xQ"), None);
        assert_eq!(parse_piece_code("wQQ"), None);
        assert_eq!(parse_piece_code(""), None);
    }

    #[test]
    fn status_of_start_position() {
        assert_eq!(game_status(&Board::default(), false), "white_turn");
    }

    #[test]
    fn status_reports_checkmate_winner() {
        // Fool's mate
        let board =
            Board::from_str("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3").unwrap();
        assert_eq!(game_status(&board, true), "black_wins");
    }

    #[test]
    fn insufficient_material_cases() {
        let bare = Board::from_str("8/8/8/8/8/8/8/4K2k w - - 0 1").unwrap();
        assert!(has_insufficient_material(&bare));

        let knight = Board::from_str("8/8/8/8/8/8/8/4KN1k w - - 0 1").unwrap();
        assert!(has_insufficient_material(&knight));

        let rook = Board::from_str("8/8/8/8/8/8/8/R3K2k w - - 0 1").unwrap();
        assert!(!has_insufficient_material(&rook));

        let pawn = Board::from_str("8/8/8/8/8/8/4P3/4K2k w - - 0 1").unwrap();
        assert!(!has_insufficient_material(&pawn));

        assert!(!has_insufficient_material(&Board::default()));
    }
}
