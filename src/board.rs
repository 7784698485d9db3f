use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::MoveError;
use crate::geometry;
use crate::moves::{Move, MoveKind, MoveRecord};
use crate::piece::{Color, Piece, PieceType, BACK_RANK};
use crate::square::{Square, MAX, MIN};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Kingside,
    Queenside,
}

impl Side {
    /// Side a king heads toward when it moves `df` files.
    pub fn toward(df: i8) -> Side {
        if df > 0 {
            Side::Kingside
        } else {
            Side::Queenside
        }
    }

    pub fn rook_file(self) -> i8 {
        match self {
            Side::Kingside => MAX,
            Side::Queenside => MIN,
        }
    }
}

/// Castling rights per (color, side). Rights are only ever revoked; whether a
/// castle is possible right now is decided by geometry.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CastlingRights {
    pub white_kingside: bool,
    pub white_queenside: bool,
    pub black_kingside: bool,
    pub black_queenside: bool,
}

impl CastlingRights {
    pub fn all() -> Self {
        CastlingRights {
            white_kingside: true,
            white_queenside: true,
            black_kingside: true,
            black_queenside: true,
        }
    }

    pub fn none() -> Self {
        CastlingRights {
            white_kingside: false,
            white_queenside: false,
            black_kingside: false,
            black_queenside: false,
        }
    }

    pub fn get(&self, color: Color, side: Side) -> bool {
        match (color, side) {
            (Color::White, Side::Kingside) => self.white_kingside,
            (Color::White, Side::Queenside) => self.white_queenside,
            (Color::Black, Side::Kingside) => self.black_kingside,
            (Color::Black, Side::Queenside) => self.black_queenside,
        }
    }

    pub fn revoke(&mut self, color: Color, side: Side) {
        match (color, side) {
            (Color::White, Side::Kingside) => self.white_kingside = false,
            (Color::White, Side::Queenside) => self.white_queenside = false,
            (Color::Black, Side::Kingside) => self.black_kingside = false,
            (Color::Black, Side::Queenside) => self.black_queenside = false,
        }
    }

    pub fn revoke_all(&mut self, color: Color) {
        self.revoke(color, Side::Kingside);
        self.revoke(color, Side::Queenside);
    }

    /// Drop the right tied to `rook` if it stands in its home corner.
    fn revoke_rook(&mut self, rook: &Piece) {
        if rook.piece_type != PieceType::Rook || rook.square.rank != rook.color.back_rank() {
            return;
        }
        if rook.square.file == Side::Kingside.rook_file() {
            self.revoke(rook.color, Side::Kingside);
        } else if rook.square.file == Side::Queenside.rook_file() {
            self.revoke(rook.color, Side::Queenside);
        }
    }
}

/// The pawn that just advanced two squares and the square it skipped.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct EnPassant {
    pub pawn: Square,
    pub skipped: Square,
}

/// 8x8 occupancy grid plus the state the rules need between plies.
///
/// The grid is the only registry of pieces: `pieces(Some(color))` scans it,
/// so there is nothing to drift out of sync. Every mutation goes through
/// `put`/`take`, which also keep the king cache current.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Board {
    squares: [[Option<Piece>; 8]; 8],
    kings: [Option<Square>; 2],
    castling_rights: CastlingRights,
    en_passant: Option<EnPassant>,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Create an empty board with no pieces. Useful for setting up test positions.
    pub fn empty() -> Self {
        Board {
            squares: [[None; 8]; 8],
            kings: [None; 2],
            castling_rights: CastlingRights::all(),
            en_passant: None,
        }
    }

    pub fn new() -> Self {
        let mut board = Board::empty();
        for (file, &kind) in (MIN..=MAX).zip(BACK_RANK.iter()) {
            for color in [Color::White, Color::Black] {
                board.put(Piece::new(kind, color), Square::new(file, color.back_rank()));
                board.put(
                    Piece::new(PieceType::Pawn, color),
                    Square::new(file, color.pawn_rank()),
                );
            }
        }
        board
    }

    /// Piece on `square`, or `InvalidField` if the square is off the board.
    pub fn get(&self, square: Square) -> Result<Option<Piece>, MoveError> {
        let (row, col) = square.index().ok_or(MoveError::InvalidField { square })?;
        Ok(self.squares[row][col])
    }

    /// Like `get`, but off-board squares simply hold nothing.
    pub fn piece_at(&self, square: Square) -> Option<&Piece> {
        let (row, col) = square.index()?;
        self.squares[row][col].as_ref()
    }

    /// Put `piece` on `square`, replacing whatever was there. No legality check.
    pub fn place(&mut self, piece: Piece, square: Square) -> Result<(), MoveError> {
        if !square.is_valid() {
            return Err(MoveError::InvalidField { square });
        }
        self.take(square);
        self.put(piece, square);
        Ok(())
    }

    /// Lift the piece off `square`, returning it.
    pub fn remove(&mut self, square: Square) -> Result<Option<Piece>, MoveError> {
        if !square.is_valid() {
            return Err(MoveError::InvalidField { square });
        }
        Ok(self.take(square))
    }

    /// Relocate the piece on `from` to `to`, replacing whatever was there.
    pub fn move_piece(&mut self, from: Square, to: Square) -> Result<(), MoveError> {
        if !to.is_valid() {
            return Err(MoveError::InvalidField { square: to });
        }
        let piece = self
            .remove(from)?
            .ok_or(MoveError::NoPiece { square: from })?;
        self.take(to);
        self.put(piece, to);
        Ok(())
    }

    fn put(&mut self, mut piece: Piece, square: Square) {
        let Some((row, col)) = square.index() else {
            return;
        };
        piece.square = square;
        if piece.piece_type == PieceType::King {
            self.kings[piece.color.index()] = Some(square);
        }
        self.squares[row][col] = Some(piece);
    }

    fn take(&mut self, square: Square) -> Option<Piece> {
        let (row, col) = square.index()?;
        let piece = self.squares[row][col].take()?;
        if piece.piece_type == PieceType::King && self.kings[piece.color.index()] == Some(square) {
            self.kings[piece.color.index()] = None;
        }
        Some(piece)
    }

    /// All pieces on the board, optionally only those of one color.
    pub fn pieces(&self, color: Option<Color>) -> impl Iterator<Item = &Piece> + '_ {
        self.squares
            .iter()
            .flatten()
            .flatten()
            .filter(move |p| color.map_or(true, |c| p.color == c))
    }

    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.kings[color.index()]
    }

    pub fn castling_rights(&self) -> CastlingRights {
        self.castling_rights
    }

    pub fn set_castling_rights(&mut self, rights: CastlingRights) {
        self.castling_rights = rights;
    }

    pub fn en_passant(&self) -> Option<EnPassant> {
        self.en_passant
    }

    /// True if any piece of `attacker` attacks at least one of `squares`.
    pub fn is_attacked(&self, attacker: Color, squares: &[Square]) -> bool {
        self.pieces(Some(attacker)).any(|piece| {
            squares
                .iter()
                .any(|&sq| geometry::can_attack(piece, sq, self))
        })
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        match self.king_square(color) {
            Some(king) => self.is_attacked(color.opposite(), &[king]),
            None => false,
        }
    }

    /// Apply `mv` without any legality check, returning what `unmake` needs
    /// to reverse it. Updates piece flags, castling rights and en passant state.
    pub fn make(&mut self, mv: &Move) -> Result<MoveRecord, MoveError> {
        if !mv.to.is_valid() {
            return Err(MoveError::InvalidField { square: mv.to });
        }
        let moved = self
            .get(mv.from)?
            .ok_or(MoveError::NoPiece { square: mv.from })?;

        let captured = match mv.kind {
            MoveKind::EnPassant { captured } => self.piece_at(captured).copied(),
            _ => self.piece_at(mv.to).copied(),
        };
        let rook = match mv.kind {
            MoveKind::Castle { rook_from, .. } => self.piece_at(rook_from).copied(),
            _ => None,
        };
        let lapsed = self
            .en_passant
            .and_then(|ep| self.piece_at(ep.pawn).copied());

        let record = MoveRecord {
            mv: *mv,
            moved,
            captured,
            rook,
            lapsed,
            castling: self.castling_rights,
            en_passant: self.en_passant,
        };

        // Only the immediately preceding double step may be taken en passant.
        if let Some(mut pawn) = lapsed {
            pawn.double_stepped = false;
            self.put(pawn, pawn.square);
        }
        self.en_passant = None;

        if let Some(victim) = captured {
            self.take(victim.square);
            self.castling_rights.revoke_rook(&victim);
        }

        let mut piece = moved;
        self.take(mv.from);
        piece.has_moved = true;
        piece.double_stepped = mv.kind == MoveKind::DoubleStep;
        if piece.double_stepped {
            self.en_passant = Some(EnPassant {
                pawn: mv.to,
                skipped: Square::new(mv.to.file, (mv.from.rank + mv.to.rank) / 2),
            });
        }
        self.put(piece, mv.to);

        if let MoveKind::Castle { rook_from, rook_to } = mv.kind {
            if let Some(mut r) = self.take(rook_from) {
                r.has_moved = true;
                self.put(r, rook_to);
            }
        }

        match moved.piece_type {
            PieceType::King => self.castling_rights.revoke_all(moved.color),
            PieceType::Rook => self.castling_rights.revoke_rook(&moved),
            _ => {}
        }

        Ok(record)
    }

    /// Reverse a `make`. Records must be unmade in the reverse order they were made.
    pub fn unmake(&mut self, record: MoveRecord) {
        let mv = record.mv;
        if let MoveKind::Castle { rook_from, rook_to } = mv.kind {
            self.take(rook_to);
            if let Some(rook) = record.rook {
                self.put(rook, rook_from);
            }
        }

        self.take(mv.to);
        self.put(record.moved, mv.from);
        if let Some(victim) = record.captured {
            self.put(victim, victim.square);
        }
        if let Some(pawn) = record.lapsed {
            self.put(pawn, pawn.square);
        }

        self.castling_rights = record.castling;
        self.en_passant = record.en_passant;
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "  | ")?;
        for file in MIN..=MAX {
            write!(f, " {file}")?;
        }
        writeln!(f)?;
        writeln!(f, "--+-----------------")?;
        for rank in (MIN..=MAX).rev() {
            write!(f, "{rank} | ")?;
            for file in MIN..=MAX {
                let symbol = self
                    .piece_at(Square::new(file, rank))
                    .map_or('.', Piece::symbol);
                write!(f, " {symbol}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
