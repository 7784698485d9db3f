use serde::{Deserialize, Serialize};

use crate::board::{Board, CastlingRights};
use crate::error::SetupError;
use crate::piece::{Color, Piece, PieceType, BACK_RANK};
use crate::square::{Square, MAX, MIN};

fn white() -> Color {
    Color::White
}

/// One piece of a starting position.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Placement {
    pub piece_type: PieceType,
    pub color: Color,
    pub file: i8,
    pub rank: i8,
    /// Mark the piece as already moved, e.g. to rule out castling with it.
    #[serde(default)]
    pub moved: bool,
}

impl Placement {
    pub fn new(piece_type: PieceType, color: Color, file: i8, rank: i8) -> Self {
        Placement {
            piece_type,
            color,
            file,
            rank,
            moved: false,
        }
    }

    pub fn square(&self) -> Square {
        Square::new(self.file, self.rank)
    }
}

/// A starting position: which pieces stand where, who moves first, and which
/// castling rights are still open.
///
/// ```json
/// {
///   "side_to_move": "Black",
///   "pieces": [
///     { "piece_type": "King", "color": "White", "file": 5, "rank": 1 },
///     { "piece_type": "King", "color": "Black", "file": 5, "rank": 8 }
///   ]
/// }
/// ```
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Setup {
    #[serde(default = "white")]
    pub side_to_move: Color,
    pub pieces: Vec<Placement>,
    #[serde(default = "CastlingRights::all")]
    pub castling: CastlingRights,
}

impl Default for Setup {
    fn default() -> Self {
        Self::standard()
    }
}

impl Setup {
    /// The usual starting array.
    pub fn standard() -> Self {
        let mut pieces = Vec::with_capacity(32);
        for color in [Color::White, Color::Black] {
            for (file, &kind) in (MIN..=MAX).zip(BACK_RANK.iter()) {
                pieces.push(Placement::new(kind, color, file, color.back_rank()));
                pieces.push(Placement::new(PieceType::Pawn, color, file, color.pawn_rank()));
            }
        }

        Setup {
            side_to_move: Color::White,
            pieces,
            castling: CastlingRights::all(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SetupError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Lay the pieces out on a fresh board. Every placement must be on the
    /// board and on its own square, and each side needs exactly one king.
    /// The side that just moved may not be left in check.
    pub fn build(&self) -> Result<Board, SetupError> {
        let mut board = Board::empty();
        let mut kings = [0usize; 2];

        for placement in &self.pieces {
            let square = placement.square();
            if !square.is_valid() {
                return Err(SetupError::OutOfRange { square });
            }
            if board.piece_at(square).is_some() {
                return Err(SetupError::Occupied { square });
            }

            let mut piece = Piece::new(placement.piece_type, placement.color);
            piece.has_moved = placement.moved;
            board
                .place(piece, square)
                .map_err(|_| SetupError::OutOfRange { square })?;

            if placement.piece_type == PieceType::King {
                kings[placement.color.index()] += 1;
            }
        }

        for color in [Color::White, Color::Black] {
            match kings[color.index()] {
                0 => return Err(SetupError::MissingKing { color }),
                1 => {}
                _ => return Err(SetupError::ExtraKing { color }),
            }
        }

        let waiting = self.side_to_move.opposite();
        if board.is_in_check(waiting) {
            return Err(SetupError::OpponentInCheck { color: waiting });
        }

        board.set_castling_rights(self.castling);
        Ok(board)
    }
}
