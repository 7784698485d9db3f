use crate::piece::Color;
use crate::square::Square;

/// Why a move request was refused. None of these are fatal; the board is
/// left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("square {square} is off the board")]
    InvalidField { square: Square },

    #[error("no piece on {square}")]
    NoPiece { square: Square },

    #[error("piece on {square} belongs to {color}, who is not to move")]
    InvalidPiece { square: Square, color: Color },

    #[error("illegal move: {reason}")]
    IllegalMove { reason: String },
}

/// Fieldless view of `MoveError`, for comparing outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveErrorKind {
    InvalidField,
    NoPiece,
    InvalidPiece,
    IllegalMove,
}

impl MoveError {
    pub fn illegal(reason: impl Into<String>) -> Self {
        MoveError::IllegalMove {
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> MoveErrorKind {
        match self {
            MoveError::InvalidField { .. } => MoveErrorKind::InvalidField,
            MoveError::NoPiece { .. } => MoveErrorKind::NoPiece,
            MoveError::InvalidPiece { .. } => MoveErrorKind::InvalidPiece,
            MoveError::IllegalMove { .. } => MoveErrorKind::IllegalMove,
        }
    }
}

/// Problems found while building a game from a `Setup`.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("setup is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("placement at {square} is off the board")]
    OutOfRange { square: Square },

    #[error("two pieces placed on {square}")]
    Occupied { square: Square },

    #[error("{color} has no king")]
    MissingKing { color: Color },

    #[error("{color} has more than one king")]
    ExtraKing { color: Color },

    #[error("{color} is in check but it is not their move")]
    OpponentInCheck { color: Color },
}
