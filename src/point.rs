//! Board coordinates.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::COLUMN_LETTERS;
use crate::error::ParseError;

/// A board coordinate, 1-indexed.
///
/// A `Point` knows nothing about board size; whether it lies on a grid is
/// decided by [`Board::is_on_grid`](crate::board::Board::is_on_grid).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl Point {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The four orthogonal neighbours (N, W, S, E), without bounds checks.
    ///
    /// Row or column 0 (and the wrapped value below it) is off every grid.
    #[inline]
    pub fn neighbors(self) -> [Point; 4] {
        [
            Point::new(self.row.wrapping_sub(1), self.col),
            Point::new(self.row, self.col.wrapping_sub(1)),
            Point::new(self.row + 1, self.col),
            Point::new(self.row, self.col + 1),
        ]
    }

    /// The four diagonal neighbours, without bounds checks.
    #[inline]
    pub fn diagonals(self) -> [Point; 4] {
        let up = self.row.wrapping_sub(1);
        let left = self.col.wrapping_sub(1);
        [
            Point::new(up, left),
            Point::new(up, self.col + 1),
            Point::new(self.row + 1, left),
            Point::new(self.row + 1, self.col + 1),
        ]
    }
}

/// Parse a GTP vertex such as `"D4"` or `"q16"`.
///
/// The letter selects the column (skipping `I`), the number is the row.
impl FromStr for Point {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseError::Vertex(s.to_string());
        let s = s.trim();
        let mut chars = s.chars();
        let letter = chars.next().ok_or_else(err)?.to_ascii_uppercase();
        let col = COLUMN_LETTERS
            .iter()
            .position(|&c| c as char == letter)
            .ok_or_else(err)?
            + 1;
        let digits = chars.as_str();
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err());
        }
        let row: usize = digits.parse().map_err(|_| err())?;
        if row == 0 {
            return Err(err());
        }
        Ok(Point::new(row, col))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.col.checked_sub(1).and_then(|i| COLUMN_LETTERS.get(i)) {
            Some(&letter) if self.row > 0 => write!(f, "{}{}", letter as char, self.row),
            _ => write!(f, "({}, {})", self.row, self.col),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_neighbors() {
        let p = Point::new(3, 3);
        let n = p.neighbors();
        assert!(n.contains(&Point::new(2, 3)));
        assert!(n.contains(&Point::new(4, 3)));
        assert!(n.contains(&Point::new(3, 2)));
        assert!(n.contains(&Point::new(3, 4)));
    }

    #[test]
    fn test_neighbors_at_origin_do_not_panic() {
        // Off-grid neighbours are produced unchecked.
        let n = Point::new(1, 1).neighbors();
        assert_eq!(n[0], Point::new(0, 1));
        assert_eq!(n[1], Point::new(1, 0));
    }

    #[test]
    fn test_diagonals() {
        let d = Point::new(2, 2).diagonals();
        assert_eq!(
            d,
            [
                Point::new(1, 1),
                Point::new(1, 3),
                Point::new(3, 1),
                Point::new(3, 3)
            ]
        );
    }

    #[test]
    fn test_parse_skips_i() {
        let h: Point = "H5".parse().unwrap();
        let j: Point = "J5".parse().unwrap();
        assert_eq!(h.col, 8);
        assert_eq!(j.col, 9, "J should follow H directly");
        assert_eq!(j.row, 5);
    }

    #[test]
    fn test_parse_lowercase_and_two_digit_rows() {
        let p: Point = "q16".parse().unwrap();
        assert_eq!(p, Point::new(16, 16));
        assert_eq!(p.to_string(), "Q16");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for s in ["", "I3", "A", "A0", "3A", "A-1", "pass"] {
            assert!(s.parse::<Point>().is_err(), "{s:?} should not parse");
        }
    }

    #[test]
    fn test_display_off_alphabet() {
        assert_eq!(Point::new(0, 3).to_string(), "(0, 3)");
        assert_eq!(Point::new(2, 0).to_string(), "(2, 0)");
    }
}
