use std::fmt;

use serde::{Deserialize, Serialize};

/// Lowest file/rank index. Files and ranks both run 1..=8.
pub const MIN: i8 = 1;
/// Highest file/rank index.
pub const MAX: i8 = 8;

pub const ORTHOGONAL: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];
pub const DIAGONAL: [(i8, i8); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
pub const ALL_DIRECTIONS: [(i8, i8); 8] = [
    (0, 1), (0, -1), (1, 0), (-1, 0),
    (1, 1), (1, -1), (-1, 1), (-1, -1),
];
pub const KNIGHT_JUMPS: [(i8, i8); 8] = [
    (-2, -1), (-2, 1), (-1, -2), (-1, 2),
    (1, -2), (1, 2), (2, -1), (2, 1),
];

/// A (file, rank) pair. May hold out-of-range values so that callers can
/// describe bad requests; anything touching the board checks `is_valid` first.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub struct Square {
    pub file: i8,
    pub rank: i8,
}

impl Square {
    pub const fn new(file: i8, rank: i8) -> Self {
        Square { file, rank }
    }

    pub fn is_valid(self) -> bool {
        (MIN..=MAX).contains(&self.file) && (MIN..=MAX).contains(&self.rank)
    }

    /// Grid indices `(row, col)` with row 0 = rank 1, col 0 = file 1.
    pub(crate) fn index(self) -> Option<(usize, usize)> {
        if self.is_valid() {
            Some(((self.rank - MIN) as usize, (self.file - MIN) as usize))
        } else {
            None
        }
    }

    /// The square `(df, dr)` away, if it is still on the board.
    pub fn offset(self, df: i8, dr: i8) -> Option<Square> {
        let sq = Square::new(self.file + df, self.rank + dr);
        if sq.is_valid() {
            Some(sq)
        } else {
            None
        }
    }

    /// Every on-board square, rank by rank from (1, 1).
    pub fn all() -> impl Iterator<Item = Square> {
        (MIN..=MAX).flat_map(|rank| (MIN..=MAX).map(move |file| Square::new(file, rank)))
    }
}

impl From<(i8, i8)> for Square {
    fn from((file, rank): (i8, i8)) -> Self {
        Square::new(file, rank)
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.file, self.rank)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_is_one_based() {
        assert!(Square::new(1, 1).is_valid());
        assert!(Square::new(8, 8).is_valid());
        assert!(!Square::new(0, 4).is_valid());
        assert!(!Square::new(9, 1).is_valid());
        assert!(!Square::new(4, -1).is_valid());
    }

    #[test]
    fn offset_stops_at_the_edge() {
        assert_eq!(Square::new(1, 1).offset(1, 2), Some(Square::new(2, 3)));
        assert_eq!(Square::new(8, 8).offset(1, 0), None);
        assert_eq!(Square::new(1, 5).offset(-1, 1), None);
    }

    #[test]
    fn all_covers_the_board_once() {
        let squares: Vec<Square> = Square::all().collect();
        assert_eq!(squares.len(), 64);
        assert_eq!(squares[0], Square::new(1, 1));
        assert_eq!(squares[63], Square::new(8, 8));
        assert!(squares.iter().all(|s| s.is_valid()));
    }

    #[test]
    fn index_maps_rank_to_row() {
        assert_eq!(Square::new(5, 2).index(), Some((1, 4)));
        assert_eq!(Square::new(9, 2).index(), None);
    }
}
