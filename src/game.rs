// =============================================================================
// Move coordinator
//
// `Game` owns the live board and whose turn it is. `request_move` is the only
// way to change either: it validates the request (squares on the board, a
// piece of the side to move on the origin, geometry, king safety), commits
// the move, then hands the turn over. Every failure leaves the board exactly
// as it was.
// =============================================================================

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::{Board, CastlingRights, EnPassant};
use crate::config::Setup;
use crate::error::{MoveError, SetupError};
use crate::geometry;
use crate::moves::Move;
use crate::piece::{Color, Piece};
use crate::safety;
use crate::square::{Square, MAX, MIN};

/// Read-only picture of a game for adapters (rendering, JSON clients).
/// `squares[rank - 1][file - 1]`.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Snapshot {
    pub squares: Vec<Vec<Option<Piece>>>,
    pub side_to_move: Color,
    pub in_check: bool,
    pub castling_rights: CastlingRights,
    pub en_passant: Option<EnPassant>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Game {
    board: Board,
    side_to_move: Color,
}

impl Default for Game {
    fn default() -> Self {
        Self::new()
    }
}

impl Game {
    /// A game from the standard starting position, White to move.
    pub fn new() -> Self {
        Game {
            board: Board::new(),
            side_to_move: Color::White,
        }
    }

    pub fn from_setup(setup: &Setup) -> Result<Self, SetupError> {
        Ok(Game {
            board: setup.build()?,
            side_to_move: setup.side_to_move,
        })
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn get(&self, square: Square) -> Result<Option<Piece>, MoveError> {
        self.board.get(square)
    }

    pub fn pieces(&self, color: Option<Color>) -> impl Iterator<Item = &Piece> + '_ {
        self.board.pieces(color)
    }

    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    pub fn is_in_check(&self, color: Color) -> bool {
        self.board.is_in_check(color)
    }

    /// Move the piece on `origin` to `target` for the side to move.
    ///
    /// Errors, in the order they are checked:
    /// - `InvalidField` if either square is off the board
    /// - `NoPiece` if `origin` is empty
    /// - `InvalidPiece` if the piece there belongs to the other side
    /// - `IllegalMove` if the piece cannot go there, or doing so would leave
    ///   its own king in check
    pub fn request_move(&mut self, origin: Square, target: Square) -> Result<(), MoveError> {
        let mover = self.side_to_move;
        let result = self
            .validate(origin, target)
            .and_then(|mv| safety::apply_if_safe(&mut self.board, &mv));

        match result {
            Ok(record) => {
                debug!(
                    %origin,
                    %target,
                    side = %mover,
                    kind = ?record.mv.kind,
                    capture = record.mv.is_capture(),
                    "move accepted"
                );
                self.side_to_move = mover.opposite();
                Ok(())
            }
            Err(err) => {
                debug!(%origin, %target, side = %mover, error = %err, "move rejected");
                Err(err)
            }
        }
    }

    /// Everything short of king safety: coordinates, ownership, geometry.
    fn validate(&self, origin: Square, target: Square) -> Result<Move, MoveError> {
        for square in [origin, target] {
            if !square.is_valid() {
                return Err(MoveError::InvalidField { square });
            }
        }
        let piece = self.owned_piece(origin)?;
        if !geometry::can_reach(&piece, target, &self.board)? {
            return Err(MoveError::illegal(format!(
                "{:?} cannot move from {origin} to {target}",
                piece.piece_type
            )));
        }
        Ok(Move::classify(&self.board, &piece, target))
    }

    fn owned_piece(&self, origin: Square) -> Result<Piece, MoveError> {
        let piece = self
            .board
            .get(origin)?
            .ok_or(MoveError::NoPiece { square: origin })?;
        if piece.color != self.side_to_move {
            return Err(MoveError::InvalidPiece {
                square: origin,
                color: piece.color,
            });
        }
        Ok(piece)
    }

    /// Every square the piece on `origin` may legally move to right now.
    /// Fails the same way `request_move` would for a bad origin.
    pub fn legal_targets(&self, origin: Square) -> Result<Vec<Square>, MoveError> {
        Ok(self
            .legal_moves_from(origin)?
            .into_iter()
            .map(|mv| mv.to)
            .collect())
    }

    fn legal_moves_from(&self, origin: Square) -> Result<Vec<Move>, MoveError> {
        if !origin.is_valid() {
            return Err(MoveError::InvalidField { square: origin });
        }
        let piece = self.owned_piece(origin)?;
        let mut moves = Vec::new();
        for target in Square::all() {
            if !geometry::can_reach(&piece, target, &self.board)? {
                continue;
            }
            let mv = Move::classify(&self.board, &piece, target);
            if safety::is_move_safe(&self.board, &mv) {
                moves.push(mv);
            }
        }
        Ok(moves)
    }

    /// All legal moves for the side to move.
    pub fn legal_moves(&self) -> Vec<Move> {
        let origins: Vec<Square> = self
            .pieces(Some(self.side_to_move))
            .map(|p| p.square)
            .collect();
        origins
            .into_iter()
            .filter_map(|origin| self.legal_moves_from(origin).ok())
            .flatten()
            .collect()
    }

    pub fn snapshot(&self) -> Snapshot {
        let squares = (MIN..=MAX)
            .map(|rank| {
                (MIN..=MAX)
                    .map(|file| self.board.piece_at(Square::new(file, rank)).copied())
                    .collect::<Vec<_>>()
            })
            .collect();

        Snapshot {
            squares,
            side_to_move: self.side_to_move,
            in_check: self.is_in_check(self.side_to_move),
            castling_rights: self.board.castling_rights(),
            en_passant: self.board.en_passant(),
        }
    }

    pub fn snapshot_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.snapshot())
    }
}

/// Pick one of the side to move's legal moves at random. `None` when there
/// are none.
pub fn random_move<R: Rng + ?Sized>(game: &Game, rng: &mut R) -> Option<Move> {
    game.legal_moves().choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Placement;
    use crate::error::MoveErrorKind;
    use crate::piece::PieceType;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn sq(file: i8, rank: i8) -> Square {
        Square::new(file, rank)
    }

    fn game_with(side_to_move: Color, pieces: &[(PieceType, Color, i8, i8)]) -> Game {
        let setup = Setup {
            side_to_move,
            pieces: pieces
                .iter()
                .map(|&(kind, color, file, rank)| Placement::new(kind, color, file, rank))
                .collect(),
            castling: CastlingRights::all(),
        };
        Game::from_setup(&setup).unwrap()
    }

    #[test]
    fn opening_double_step_hands_turn_to_black() {
        let mut game = Game::new();
        game.request_move(sq(5, 2), sq(5, 4)).unwrap();
        assert_eq!(game.side_to_move(), Color::Black);
        assert!(game.get(sq(5, 4)).unwrap().unwrap().is(PieceType::Pawn, Color::White));
        assert_eq!(game.get(sq(5, 2)).unwrap(), None);
    }

    #[test]
    fn errors_are_checked_in_order() {
        let mut game = Game::new();
        let err = game.request_move(sq(9, 1), sq(5, 5)).unwrap_err();
        assert_eq!(err, MoveError::InvalidField { square: sq(9, 1) });

        // Off-board target beats the empty origin.
        let err = game.request_move(sq(4, 4), sq(4, 0)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::InvalidField);

        let err = game.request_move(sq(4, 4), sq(4, 5)).unwrap_err();
        assert_eq!(err, MoveError::NoPiece { square: sq(4, 4) });

        let err = game.request_move(sq(5, 7), sq(5, 5)).unwrap_err();
        assert_eq!(
            err,
            MoveError::InvalidPiece { square: sq(5, 7), color: Color::Black }
        );

        let err = game.request_move(sq(1, 1), sq(1, 3)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::IllegalMove);
    }

    #[test]
    fn rejected_requests_change_nothing() {
        let mut game = Game::new();
        let before = game.clone();
        for _ in 0..3 {
            let err = game.request_move(sq(4, 1), sq(4, 5)).unwrap_err();
            assert_eq!(err.kind(), MoveErrorKind::IllegalMove);
            assert_eq!(game, before);
        }
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn turns_alternate() {
        let mut game = Game::new();
        let plies = [((7, 1), (6, 3)), ((7, 8), (6, 6)), ((6, 3), (7, 1)), ((6, 6), (7, 8))];
        let mut expected = Color::White;
        for ((ff, fr), (tf, tr)) in plies {
            assert_eq!(game.side_to_move(), expected);
            game.request_move(sq(ff, fr), sq(tf, tr)).unwrap();
            expected = expected.opposite();
        }
        assert_eq!(game.side_to_move(), Color::White);
    }

    #[test]
    fn starting_position_has_twenty_moves() {
        let game = Game::new();
        assert_eq!(game.legal_moves().len(), 20);
        let mut knight = game.legal_targets(sq(2, 1)).unwrap();
        knight.sort_by_key(|s| (s.file, s.rank));
        assert_eq!(knight, vec![sq(1, 3), sq(3, 3)]);
        assert!(game.legal_targets(sq(1, 1)).unwrap().is_empty());
    }

    #[test]
    fn legal_targets_rejects_bad_origins() {
        let game = Game::new();
        assert_eq!(
            game.legal_targets(sq(0, 0)).unwrap_err().kind(),
            MoveErrorKind::InvalidField
        );
        assert_eq!(
            game.legal_targets(sq(5, 5)).unwrap_err().kind(),
            MoveErrorKind::NoPiece
        );
        assert_eq!(
            game.legal_targets(sq(5, 7)).unwrap_err().kind(),
            MoveErrorKind::InvalidPiece
        );
    }

    #[test]
    fn king_cannot_walk_into_check() {
        let mut game = game_with(
            Color::White,
            &[
                (PieceType::King, Color::White, 5, 1),
                (PieceType::King, Color::Black, 5, 8),
                (PieceType::Rook, Color::Black, 4, 8),
            ],
        );
        let err = game.request_move(sq(5, 1), sq(4, 1)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::IllegalMove);
        game.request_move(sq(5, 1), sq(6, 1)).unwrap();
    }

    #[test]
    fn castling_through_request_move() {
        let mut game = game_with(
            Color::White,
            &[
                (PieceType::King, Color::White, 5, 1),
                (PieceType::Rook, Color::White, 8, 1),
                (PieceType::King, Color::Black, 5, 8),
            ],
        );
        game.request_move(sq(5, 1), sq(7, 1)).unwrap();
        assert!(game.get(sq(7, 1)).unwrap().unwrap().is(PieceType::King, Color::White));
        assert!(game.get(sq(6, 1)).unwrap().unwrap().is(PieceType::Rook, Color::White));
        assert_eq!(game.side_to_move(), Color::Black);
    }

    #[test]
    fn castling_right_is_lost_once_the_king_has_moved() {
        let mut game = game_with(
            Color::White,
            &[
                (PieceType::King, Color::White, 5, 1),
                (PieceType::Rook, Color::White, 8, 1),
                (PieceType::King, Color::Black, 5, 8),
            ],
        );
        game.request_move(sq(5, 1), sq(5, 2)).unwrap();
        game.request_move(sq(5, 8), sq(5, 7)).unwrap();
        game.request_move(sq(5, 2), sq(5, 1)).unwrap();
        game.request_move(sq(5, 7), sq(5, 8)).unwrap();
        let err = game.request_move(sq(5, 1), sq(7, 1)).unwrap_err();
        assert_eq!(err.kind(), MoveErrorKind::IllegalMove);
    }

    #[test]
    fn snapshot_reflects_position() {
        let mut game = Game::new();
        game.request_move(sq(4, 2), sq(4, 4)).unwrap();
        let snap = game.snapshot();
        assert_eq!(snap.side_to_move, Color::Black);
        assert!(!snap.in_check);
        assert_eq!(snap.squares.len(), 8);
        assert_eq!(snap.squares[3][3].map(|p| p.piece_type), Some(PieceType::Pawn));
        assert_eq!(
            snap.en_passant,
            Some(EnPassant { pawn: sq(4, 4), skipped: sq(4, 3) })
        );

        let json = game.snapshot_json().unwrap();
        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);
    }

    #[test]
    fn random_moves_are_always_accepted() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut game = Game::new();
        for _ in 0..40 {
            let Some(mv) = random_move(&game, &mut rng) else {
                break;
            };
            game.request_move(mv.from, mv.to).unwrap();
        }
    }
}
