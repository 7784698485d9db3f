// =============================================================================
// Piece geometry
//
// One `Movement` implementation per piece kind. `can_attack` answers "does
// this piece threaten that square" and feeds check detection; `can_reach`
// answers "may this piece move there" ignoring whether the mover's own king
// ends up in check (the King is the exception: its ordinary steps are
// filtered through the safety validator, and castling checks its own path).
//
// The shared preconditions (target on the board, not the origin, not held by
// a friendly piece) live in the free functions `can_reach` / `can_attack`,
// which are what the rest of the crate calls.
// =============================================================================

use crate::board::{Board, Side};
use crate::error::MoveError;
use crate::moves::Move;
use crate::piece::{Piece, PieceType, KING_FILE};
use crate::safety;
use crate::square::{Square, ALL_DIRECTIONS, DIAGONAL, ORTHOGONAL};

pub trait Movement {
    /// Whether `piece` threatens `target`, regardless of what stands there.
    fn can_attack(&self, piece: &Piece, target: Square, board: &Board) -> bool;

    /// Whether `piece` may move to `target`. Callers have already checked the
    /// shared preconditions.
    fn can_reach(&self, piece: &Piece, target: Square, board: &Board) -> bool {
        self.can_attack(piece, target, board)
    }
}

pub struct King;
pub struct Queen;
pub struct Rook;
pub struct Bishop;
pub struct Knight;
pub struct Pawn;

/// The movement rules for a piece kind.
pub fn movement(piece_type: PieceType) -> &'static dyn Movement {
    match piece_type {
        PieceType::King => &King,
        PieceType::Queen => &Queen,
        PieceType::Rook => &Rook,
        PieceType::Bishop => &Bishop,
        PieceType::Knight => &Knight,
        PieceType::Pawn => &Pawn,
    }
}

/// Pure movement legality of `piece` to `target`.
///
/// Fails with `InvalidField` for an off-board target. Returns false for the
/// piece's own square and for squares held by a piece of the same color.
pub fn can_reach(piece: &Piece, target: Square, board: &Board) -> Result<bool, MoveError> {
    if !target.is_valid() {
        return Err(MoveError::InvalidField { square: target });
    }
    if target == piece.square {
        return Ok(false);
    }
    if board.piece_at(target).is_some_and(|p| p.color == piece.color) {
        return Ok(false);
    }
    Ok(movement(piece.piece_type).can_reach(piece, target, board))
}

/// Whether `piece` threatens `target`. Off-board targets are never attacked.
pub fn can_attack(piece: &Piece, target: Square, board: &Board) -> bool {
    target.is_valid()
        && target != piece.square
        && movement(piece.piece_type).can_attack(piece, target, board)
}

/// Scan outward from `origin` along each direction. Empty squares are passed
/// over; the first occupied square on a ray ends it. True if `target` is met
/// on or before that square.
pub fn ray_reaches(board: &Board, origin: Square, target: Square, directions: &[(i8, i8)]) -> bool {
    for &(df, dr) in directions {
        let mut next = origin.offset(df, dr);
        while let Some(sq) = next {
            if sq == target {
                return true;
            }
            if board.piece_at(sq).is_some() {
                break;
            }
            next = sq.offset(df, dr);
        }
    }
    false
}

impl Movement for Rook {
    fn can_attack(&self, piece: &Piece, target: Square, board: &Board) -> bool {
        ray_reaches(board, piece.square, target, &ORTHOGONAL)
    }
}

impl Movement for Bishop {
    fn can_attack(&self, piece: &Piece, target: Square, board: &Board) -> bool {
        ray_reaches(board, piece.square, target, &DIAGONAL)
    }
}

impl Movement for Queen {
    fn can_attack(&self, piece: &Piece, target: Square, board: &Board) -> bool {
        ray_reaches(board, piece.square, target, &ALL_DIRECTIONS)
    }
}

impl Movement for Knight {
    fn can_attack(&self, piece: &Piece, target: Square, _board: &Board) -> bool {
        let df = (target.file - piece.square.file).abs();
        let dr = (target.rank - piece.square.rank).abs();
        matches!((df, dr), (1, 2) | (2, 1))
    }
}

impl Movement for King {
    fn can_attack(&self, piece: &Piece, target: Square, _board: &Board) -> bool {
        let df = (target.file - piece.square.file).abs();
        let dr = (target.rank - piece.square.rank).abs();
        df.max(dr) == 1
    }

    fn can_reach(&self, piece: &Piece, target: Square, board: &Board) -> bool {
        if self.can_attack(piece, target, board) {
            return safety::is_move_safe(board, &Move::classify(board, piece, target));
        }
        can_castle(piece, target, board)
    }
}

/// Castling: king and rook unmoved on their home squares, rights intact, nothing between them, and
/// the king's start, transit and destination squares all unattacked.
fn can_castle(king: &Piece, target: Square, board: &Board) -> bool {
    let from = king.square;
    let df = target.file - from.file;
    if king.has_moved
        || from.rank != king.color.back_rank()
        || from.file != KING_FILE
        || target.rank != from.rank
        || df.abs() != 2
    {
        return false;
    }

    let side = Side::toward(df);
    if !board.castling_rights().get(king.color, side) {
        return false;
    }

    let rook_square = Square::new(side.rook_file(), from.rank);
    match board.piece_at(rook_square) {
        Some(rook) if rook.is(PieceType::Rook, king.color) && !rook.has_moved => {}
        _ => return false,
    }

    let step = df.signum();
    let mut file = from.file + step;
    while file != rook_square.file {
        if board.piece_at(Square::new(file, from.rank)).is_some() {
            return false;
        }
        file += step;
    }

    let path = [from, Square::new(from.file + step, from.rank), target];
    !board.is_attacked(king.color.opposite(), &path)
}

impl Movement for Pawn {
    /// The two forward diagonals, occupied or not.
    fn can_attack(&self, piece: &Piece, target: Square, _board: &Board) -> bool {
        target.rank - piece.square.rank == piece.color.forward()
            && (target.file - piece.square.file).abs() == 1
    }

    fn can_reach(&self, piece: &Piece, target: Square, board: &Board) -> bool {
        let forward = piece.color.forward();
        let df = target.file - piece.square.file;
        let dr = target.rank - piece.square.rank;

        if df == 0 {
            if dr == forward {
                return board.piece_at(target).is_none();
            }
            if dr == 2 * forward {
                let between = Square::new(target.file, piece.square.rank + forward);
                return piece.square.rank == piece.color.pawn_rank()
                    && board.piece_at(between).is_none()
                    && board.piece_at(target).is_none();
            }
            return false;
        }

        if !self.can_attack(piece, target, board) {
            return false;
        }
        match board.piece_at(target) {
            Some(victim) => victim.color != piece.color,
            None => board.en_passant().is_some_and(|ep| {
                ep.skipped == target
                    && board
                        .piece_at(ep.pawn)
                        .is_some_and(|p| p.is(PieceType::Pawn, piece.color.opposite()))
            }),
        }
    }
}
