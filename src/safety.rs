//! Check-safety: a move is only legal if the mover's own king is not attacked
//! once it has been played.
//!
//! Two entry points answer the same question. `is_move_safe` works on a
//! scratch copy and never touches the caller's board; `apply_if_safe` plays
//! the move on the live board and unmakes it again if the king is exposed.

use tracing::trace;

use crate::board::Board;
use crate::error::MoveError;
use crate::moves::{Move, MoveRecord};

/// Whether playing `mv` leaves the mover's king unattacked. The board passed
/// in is not modified.
pub fn is_move_safe(board: &Board, mv: &Move) -> bool {
    let mut scratch = board.clone();
    match scratch.make(mv) {
        Ok(record) => {
            let safe = !scratch.is_in_check(record.moved.color);
            if !safe {
                trace!(from = %mv.from, to = %mv.to, "move exposes king");
            }
            safe
        }
        Err(_) => false,
    }
}

/// Play `mv` on `board` and keep it only if the mover's king is safe
/// afterwards. On rejection the board is restored exactly.
pub fn apply_if_safe(board: &mut Board, mv: &Move) -> Result<MoveRecord, MoveError> {
    let record = board.make(mv)?;
    if board.is_in_check(record.moved.color) {
        trace!(from = %mv.from, to = %mv.to, "move exposes king, unmaking");
        board.unmake(record);
        return Err(MoveError::illegal("move would leave own king in check"));
    }
    Ok(record)
}
