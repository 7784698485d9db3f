pub mod board;
pub mod config;
pub mod error;
pub mod game;
pub mod geometry;
pub mod moves;
pub mod piece;
pub mod safety;
pub mod square;

pub use board::Board;
pub use error::{MoveError, MoveErrorKind, SetupError};
pub use game::Game;
pub use piece::{Color, Piece, PieceType};
pub use square::Square;
