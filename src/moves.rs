use std::fmt;

use serde::{Deserialize, Serialize};

use crate::board::{Board, CastlingRights, EnPassant, Side};
use crate::piece::{Piece, PieceType};
use crate::square::Square;

/// What a move does beyond relocating the moving piece.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum MoveKind {
    Quiet,
    Capture,
    /// Pawn advance of two squares; opens en passant for one ply.
    DoubleStep,
    /// Pawn takes the pawn standing on `captured`, not on the target square.
    EnPassant { captured: Square },
    Castle { rook_from: Square, rook_to: Square },
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Move {
    pub from: Square,
    pub to: Square,
    pub kind: MoveKind,
}

impl Move {
    /// Classify `piece` going to `to` on the current board. Does not check
    /// legality; callers run geometry first.
    pub fn classify(board: &Board, piece: &Piece, to: Square) -> Move {
        let from = piece.square;
        let df = to.file - from.file;
        let dr = to.rank - from.rank;

        let kind = match piece.piece_type {
            PieceType::King if dr == 0 && df.abs() == 2 => {
                let side = Side::toward(df);
                MoveKind::Castle {
                    rook_from: Square::new(side.rook_file(), from.rank),
                    rook_to: Square::new(from.file + df.signum(), from.rank),
                }
            }
            PieceType::Pawn if df == 0 && dr.abs() == 2 => MoveKind::DoubleStep,
            PieceType::Pawn if df != 0 && board.piece_at(to).is_none() => {
                match board.en_passant() {
                    Some(ep) if ep.skipped == to => MoveKind::EnPassant { captured: ep.pawn },
                    _ => MoveKind::Quiet,
                }
            }
            _ if board.piece_at(to).is_some() => MoveKind::Capture,
            _ => MoveKind::Quiet,
        };

        Move { from, to, kind }
    }

    pub fn is_capture(&self) -> bool {
        matches!(self.kind, MoveKind::Capture | MoveKind::EnPassant { .. })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Everything `Board::unmake` needs to put the board back as it was before
/// `Board::make`. Pieces are stored as they were before the move.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub mv: Move,
    pub moved: Piece,
    pub captured: Option<Piece>,
    /// Castling rook, for `MoveKind::Castle`.
    pub rook: Option<Piece>,
    /// Pawn whose en passant eligibility lapsed with this move.
    pub lapsed: Option<Piece>,
    pub castling: CastlingRights,
    pub en_passant: Option<EnPassant>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::Color;

    fn put(board: &mut Board, kind: PieceType, color: Color, file: i8, rank: i8) -> Piece {
        board
            .place(Piece::new(kind, color), Square::new(file, rank))
            .expect("square on board");
        *board.piece_at(Square::new(file, rank)).expect("just placed")
    }

    #[test]
    fn classifies_castling_both_sides() {
        let mut board = Board::empty();
        let king = put(&mut board, PieceType::King, Color::White, 5, 1);

        let short = Move::classify(&board, &king, Square::new(7, 1));
        assert_eq!(
            short.kind,
            MoveKind::Castle {
                rook_from: Square::new(8, 1),
                rook_to: Square::new(6, 1),
            }
        );

        let long = Move::classify(&board, &king, Square::new(3, 1));
        assert_eq!(
            long.kind,
            MoveKind::Castle {
                rook_from: Square::new(1, 1),
                rook_to: Square::new(4, 1),
            }
        );
    }

    #[test]
    fn classifies_pawn_moves() {
        let mut board = Board::empty();
        let pawn = put(&mut board, PieceType::Pawn, Color::White, 4, 2);
        put(&mut board, PieceType::Knight, Color::Black, 5, 3);

        assert_eq!(Move::classify(&board, &pawn, Square::new(4, 4)).kind, MoveKind::DoubleStep);
        assert_eq!(Move::classify(&board, &pawn, Square::new(4, 3)).kind, MoveKind::Quiet);
        let take = Move::classify(&board, &pawn, Square::new(5, 3));
        assert_eq!(take.kind, MoveKind::Capture);
        assert!(take.is_capture());
    }
}
