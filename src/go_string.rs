//! Strings (connected groups) of stones.

use std::collections::BTreeSet;

use crate::player::Player;
use crate::point::Point;

/// A maximal connected group of same-coloured stones and its liberties.
///
/// Values are immutable: every operation returns a new string. The board
/// replaces a string for all of its stones at once, so no cell can observe a
/// half-updated group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoString {
    color: Player,
    stones: BTreeSet<Point>,
    liberties: BTreeSet<Point>,
}

impl GoString {
    /// Build a string from its parts.
    ///
    /// # Panics
    /// If `stones` is empty or a liberty is also one of the stones.
    pub fn new(
        color: Player,
        stones: impl IntoIterator<Item = Point>,
        liberties: impl IntoIterator<Item = Point>,
    ) -> Self {
        let stones: BTreeSet<Point> = stones.into_iter().collect();
        let liberties: BTreeSet<Point> = liberties.into_iter().collect();
        assert!(!stones.is_empty(), "a string needs at least one stone");
        assert!(
            stones.is_disjoint(&liberties),
            "a stone cannot be its own liberty"
        );
        Self {
            color,
            stones,
            liberties,
        }
    }

    pub fn color(&self) -> Player {
        self.color
    }

    pub fn stones(&self) -> &BTreeSet<Point> {
        &self.stones
    }

    pub fn liberties(&self) -> &BTreeSet<Point> {
        &self.liberties
    }

    #[inline]
    pub fn num_liberties(&self) -> usize {
        self.liberties.len()
    }

    #[inline]
    pub fn num_stones(&self) -> usize {
        self.stones.len()
    }

    pub fn contains(&self, point: Point) -> bool {
        self.stones.contains(&point)
    }

    pub fn without_liberty(&self, point: Point) -> GoString {
        let mut liberties = self.liberties.clone();
        liberties.remove(&point);
        GoString {
            color: self.color,
            stones: self.stones.clone(),
            liberties,
        }
    }

    pub fn with_liberty(&self, point: Point) -> GoString {
        debug_assert!(!self.stones.contains(&point));
        let mut liberties = self.liberties.clone();
        liberties.insert(point);
        GoString {
            color: self.color,
            stones: self.stones.clone(),
            liberties,
        }
    }

    /// Union of two strings of the same colour.
    ///
    /// The result's liberties are both liberty sets minus the combined stones,
    /// so a point that joined the two strings is never left as a liberty.
    ///
    /// # Panics
    /// If the colours differ. Joining strings is only ever done for friendly
    /// neighbours, so a mismatch is a bug in the caller.
    pub fn merged_with(&self, other: &GoString) -> GoString {
        assert_eq!(
            self.color, other.color,
            "cannot merge strings of different colors"
        );
        let stones: BTreeSet<Point> = self.stones.union(&other.stones).copied().collect();
        let liberties = self
            .liberties
            .union(&other.liberties)
            .filter(|p| !stones.contains(p))
            .copied()
            .collect();
        GoString {
            color: self.color,
            stones,
            liberties,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    #[test]
    fn test_merge_same_color() {
        let a = GoString::new(
            Player::Black,
            [p(1, 1)],
            [p(0, 1), p(1, 0), p(1, 2), p(2, 1)],
        );
        let b = GoString::new(
            Player::Black,
            [p(2, 1)],
            [p(1, 1), p(2, 0), p(2, 2), p(3, 1)],
        );
        let merged = a.merged_with(&b);
        assert_eq!(merged.num_stones(), a.num_stones() + b.num_stones());
        assert!(merged.contains(p(1, 1)) && merged.contains(p(2, 1)));
        // (1,1) and (2,1) were liberties of each other and are now stones.
        assert_eq!(merged.num_liberties(), 6);
        assert!(merged.stones().is_disjoint(merged.liberties()));
    }

    #[test]
    fn test_merge_shared_liberty_counted_once() {
        let a = GoString::new(Player::White, [p(2, 2)], [p(2, 3), p(1, 2)]);
        let b = GoString::new(Player::White, [p(2, 4)], [p(2, 3), p(1, 4)]);
        let merged = a.merged_with(&b);
        assert_eq!(merged.num_liberties(), 3);
    }

    #[test]
    #[should_panic(expected = "different colors")]
    fn test_merge_other_color_panics() {
        let a = GoString::new(Player::Black, [p(1, 1)], [p(1, 2)]);
        let b = GoString::new(Player::White, [p(2, 1)], [p(2, 2)]);
        let _ = a.merged_with(&b);
    }

    #[test]
    fn test_liberty_copies_leave_original_untouched() {
        let s = GoString::new(Player::Black, [p(3, 3)], [p(2, 3), p(4, 3)]);
        let fewer = s.without_liberty(p(2, 3));
        let more = s.with_liberty(p(3, 4));
        assert_eq!(s.num_liberties(), 2);
        assert_eq!(fewer.num_liberties(), 1);
        assert_eq!(more.num_liberties(), 3);
        assert_eq!(s.without_liberty(p(9, 9)), s, "unknown liberty is a no-op");
    }

    #[test]
    #[should_panic]
    fn test_empty_string_rejected() {
        let _ = GoString::new(Player::Black, Vec::<Point>::new(), [p(1, 1)]);
    }
}
