//! The Go board: stone placement, string bookkeeping and captures.
//!
//! Strings live in an arena and every occupied cell stores the id of the
//! string that owns it. Updating a string for all of its stones is therefore
//! a single write to its arena slot, and a cell can never see a stale copy.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::trace;

use crate::constants::{COLUMN_LETTERS, EMPTY, MAX_BOARD_SIZE, MIN_BOARD_SIZE, STONE_BLACK, STONE_WHITE};
use crate::go_string::GoString;
use crate::player::Player;
use crate::point::Point;
use crate::zobrist::{EMPTY_BOARD, ZobristTable};

/// Index of a string in the board's arena.
type StringId = usize;

/// A rectangular Go board.
///
/// Cloning a board copies its strings, so the clone can be mutated without
/// affecting the original.
#[derive(Clone)]
pub struct Board {
    num_rows: usize,
    num_cols: usize,
    /// `None` for empty cells, otherwise the owning string.
    grid: Vec<Option<StringId>>,
    strings: Vec<Option<GoString>>,
    /// Arena slots available for reuse.
    free: Vec<StringId>,
    hash: u64,
    zobrist: Arc<ZobristTable>,
}

impl Board {
    /// An empty board hashed with the shared Zobrist table.
    ///
    /// # Panics
    /// If either dimension is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self::with_zobrist(num_rows, num_cols, ZobristTable::shared())
    }

    /// An empty `size` x `size` board.
    pub fn square(size: usize) -> Self {
        Self::new(size, size)
    }

    /// An empty board hashed with a caller-supplied table.
    ///
    /// # Panics
    /// If either dimension is out of range or larger than the table.
    pub fn with_zobrist(num_rows: usize, num_cols: usize, zobrist: Arc<ZobristTable>) -> Self {
        let limit = MAX_BOARD_SIZE.min(zobrist.max_size());
        assert!(
            (MIN_BOARD_SIZE..=limit).contains(&num_rows) && (MIN_BOARD_SIZE..=limit).contains(&num_cols),
            "unsupported board size {num_rows}x{num_cols}"
        );
        Self {
            num_rows,
            num_cols,
            grid: vec![None; num_rows * num_cols],
            strings: Vec::new(),
            free: Vec::new(),
            hash: EMPTY_BOARD,
            zobrist,
        }
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[inline]
    pub fn is_on_grid(&self, point: Point) -> bool {
        (1..=self.num_rows).contains(&point.row) && (1..=self.num_cols).contains(&point.col)
    }

    #[inline]
    fn idx(&self, point: Point) -> usize {
        (point.row - 1) * self.num_cols + point.col - 1
    }

    /// Every point on the board, row by row.
    pub fn points(&self) -> impl Iterator<Item = Point> + '_ {
        (1..=self.num_rows).flat_map(move |row| (1..=self.num_cols).map(move |col| Point::new(row, col)))
    }

    fn string_id(&self, point: Point) -> Option<StringId> {
        if !self.is_on_grid(point) {
            return None;
        }
        self.grid[self.idx(point)]
    }

    fn string(&self, id: StringId) -> &GoString {
        self.strings[id]
            .as_ref()
            .expect("grid refers to a live string")
    }

    /// Colour of the stone at `point`; `None` if empty or off the board.
    pub fn get(&self, point: Point) -> Option<Player> {
        self.get_go_string(point).map(GoString::color)
    }

    /// The string containing `point`; `None` if empty or off the board.
    pub fn get_go_string(&self, point: Point) -> Option<&GoString> {
        self.string_id(point).map(|id| self.string(id))
    }

    /// Every string currently on the board, each once.
    pub fn strings(&self) -> impl Iterator<Item = &GoString> + '_ {
        self.strings.iter().flatten()
    }

    pub fn stone_count(&self, player: Player) -> usize {
        self.strings()
            .filter(|s| s.color() == player)
            .map(GoString::num_stones)
            .sum()
    }

    /// Incrementally maintained Zobrist hash of the position.
    #[inline]
    pub fn zobrist_hash(&self) -> u64 {
        self.hash
    }

    /// The hash computed from scratch over the occupied points.
    ///
    /// Always equal to [`zobrist_hash`](Self::zobrist_hash); used to check it.
    pub fn recompute_hash(&self) -> u64 {
        self.points()
            .filter_map(|p| self.get(p).map(|c| self.zobrist.value(p, c)))
            .fold(EMPTY_BOARD, |h, v| h ^ v)
    }

    /// Place a stone, merge it with friendly neighbours and remove any enemy
    /// strings left without liberties.
    ///
    /// Returns the number of stones captured. Legality (suicide, superko) is
    /// decided by [`GameState`](crate::game::GameState); a self-capturing
    /// placement here leaves a string with zero liberties on the board.
    ///
    /// # Panics
    /// If `point` is off the board or already occupied.
    pub fn place_stone(&mut self, player: Player, point: Point) -> usize {
        assert!(self.is_on_grid(point), "point {point} is off the board");
        assert!(
            self.string_id(point).is_none(),
            "point {point} is already occupied"
        );

        let mut liberties = Vec::with_capacity(4);
        let mut friendly: Vec<StringId> = Vec::with_capacity(4);
        let mut enemy: Vec<StringId> = Vec::with_capacity(4);
        for neighbor in point.neighbors() {
            if !self.is_on_grid(neighbor) {
                continue;
            }
            match self.string_id(neighbor) {
                None => liberties.push(neighbor),
                Some(id) => {
                    let bucket = if self.string(id).color() == player {
                        &mut friendly
                    } else {
                        &mut enemy
                    };
                    if !bucket.contains(&id) {
                        bucket.push(id);
                    }
                }
            }
        }

        let mut merged = GoString::new(player, [point], liberties);
        for id in friendly {
            let neighbor = self.take_string(id);
            merged = merged.merged_with(&neighbor);
        }
        self.insert_string(merged);
        self.hash ^= self.zobrist.value(point, player);

        // Captures only after the new string is in place: stones removed
        // below hand their points back to it as liberties.
        let mut captured = 0;
        for id in enemy {
            let reduced = self.string(id).without_liberty(point);
            if reduced.num_liberties() > 0 {
                self.strings[id] = Some(reduced);
            } else {
                captured += self.remove_string(id);
            }
        }
        captured
    }

    fn insert_string(&mut self, string: GoString) -> StringId {
        let id = match self.free.pop() {
            Some(id) => id,
            None => {
                self.strings.push(None);
                self.strings.len() - 1
            }
        };
        for &stone in string.stones() {
            let i = self.idx(stone);
            self.grid[i] = Some(id);
        }
        self.strings[id] = Some(string);
        id
    }

    /// Detach a string from the arena without touching the grid.
    fn take_string(&mut self, id: StringId) -> GoString {
        let string = self.strings[id]
            .take()
            .expect("grid refers to a live string");
        self.free.push(id);
        string
    }

    /// Capture a string: empty its points, hash them out and give each
    /// freed point back as a liberty to the strings around it.
    fn remove_string(&mut self, id: StringId) -> usize {
        let string = self.take_string(id);
        let color = string.color();
        for &stone in string.stones() {
            let i = self.idx(stone);
            self.grid[i] = None;
            self.hash ^= self.zobrist.value(stone, color);
        }
        for &stone in string.stones() {
            for neighbor in stone.neighbors() {
                if let Some(nid) = self.string_id(neighbor) {
                    let restored = self.string(nid).with_liberty(stone);
                    self.strings[nid] = Some(restored);
                }
            }
        }
        trace!(
            color = %color,
            stones = string.num_stones(),
            "captured string"
        );
        string.num_stones()
    }

    /// Whether `player` would capture an enemy string by playing at `point`.
    pub fn would_capture(&self, player: Player, point: Point) -> bool {
        if !self.is_on_grid(point) {
            return false;
        }
        point.neighbors().into_iter().any(|n| {
            self.get_go_string(n).is_some_and(|s| {
                s.color() != player && s.num_liberties() == 1 && s.liberties().contains(&point)
            })
        })
    }

    /// Fast self-capture test for an empty `point`, without placing a stone.
    ///
    /// The stone's liberties are its empty neighbours plus the liberties of
    /// the friendly strings it joins, minus `point` itself. Capturing an enemy
    /// string always frees a point next to the new stone, so any capture
    /// makes the move safe.
    pub fn is_self_capture(&self, player: Player, point: Point) -> bool {
        if !self.is_on_grid(point) {
            return false;
        }
        let mut liberties = BTreeSet::new();
        for neighbor in point.neighbors() {
            if !self.is_on_grid(neighbor) {
                continue;
            }
            match self.get_go_string(neighbor) {
                None => {
                    liberties.insert(neighbor);
                }
                Some(s) if s.color() == player => liberties.extend(s.liberties().iter().copied()),
                Some(s) => {
                    if s.num_liberties() == 1 && s.liberties().contains(&point) {
                        return false;
                    }
                }
            }
        }
        liberties.remove(&point);
        liberties.is_empty()
    }

    /// Whether `point` is an eye of `player`.
    ///
    /// All on-board neighbours must be `player` stones. In the centre all
    /// four corners must be friendly; on the edge or in the corner every
    /// on-board corner must be.
    pub fn is_point_an_eye(&self, point: Point, player: Player) -> bool {
        if !self.is_on_grid(point) || self.get(point).is_some() {
            return false;
        }
        if point
            .neighbors()
            .into_iter()
            .any(|n| self.is_on_grid(n) && self.get(n) != Some(player))
        {
            return false;
        }

        let mut friendly_corners = 0;
        let mut off_board_corners = 0;
        for corner in point.diagonals() {
            if !self.is_on_grid(corner) {
                off_board_corners += 1;
            } else if self.get(corner) == Some(player) {
                friendly_corners += 1;
            }
        }
        if off_board_corners > 0 {
            return off_board_corners + friendly_corners == 4;
        }
        friendly_corners == 4
    }
}

/// Boards are equal when they have the same size and the same stones,
/// regardless of how their strings are laid out in memory.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.num_rows == other.num_rows
            && self.num_cols == other.num_cols
            && self.hash == other.hash
            && self.points().all(|p| self.get(p) == other.get(p))
    }
}

impl Eq for Board {}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Board")
            .field("num_rows", &self.num_rows)
            .field("num_cols", &self.num_cols)
            .field("hash", &format_args!("{:#018x}", self.hash))
            .field("stones", &self.grid.iter().flatten().count())
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in (1..=self.num_rows).rev() {
            write!(f, "{row:>2}")?;
            for col in 1..=self.num_cols {
                let ch = match self.get(Point::new(row, col)) {
                    Some(Player::Black) => STONE_BLACK,
                    Some(Player::White) => STONE_WHITE,
                    None => EMPTY,
                };
                write!(f, " {ch}")?;
            }
            writeln!(f)?;
        }
        write!(f, "  ")?;
        for &letter in &COLUMN_LETTERS[..self.num_cols] {
            write!(f, " {}", letter as char)?;
        }
        writeln!(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: usize, col: usize) -> Point {
        Point::new(row, col)
    }

    /// Checks every structural invariant of the board.
    fn assert_consistent(board: &Board) {
        assert_eq!(board.zobrist_hash(), board.recompute_hash(), "hash drifted");
        for s in board.strings() {
            for &stone in s.stones() {
                assert_eq!(board.get(stone), Some(s.color()));
                assert_eq!(board.get_go_string(stone), Some(s));
            }
            for &lib in s.liberties() {
                assert!(board.is_on_grid(lib), "liberty {lib} off board");
                assert_eq!(board.get(lib), None, "liberty {lib} is occupied");
                assert!(lib.neighbors().iter().any(|n| s.contains(*n)));
            }
        }
    }

    #[test]
    fn test_place_one_stone() {
        let mut board = Board::square(13);
        board.place_stone(Player::Black, p(3, 3));

        assert_eq!(board.get(p(3, 3)), Some(Player::Black));
        assert_eq!(board.get(p(2, 3)), None);

        let s = board.get_go_string(p(3, 3)).unwrap();
        assert_eq!(s.color(), Player::Black);
        assert_eq!(s.stones().iter().copied().collect::<Vec<_>>(), vec![p(3, 3)]);
        assert_eq!(
            s.liberties(),
            &BTreeSet::from([p(2, 3), p(3, 2), p(4, 3), p(3, 4)])
        );
        assert_consistent(&board);
    }

    #[test]
    fn test_two_black_stones_merge() {
        let mut board = Board::square(13);
        board.place_stone(Player::Black, p(3, 3));
        board.place_stone(Player::Black, p(3, 4));

        let s = board.get_go_string(p(3, 3)).unwrap();
        assert!(std::ptr::eq(s, board.get_go_string(p(3, 4)).unwrap()));
        assert_eq!(s.num_stones(), 2);
        assert_eq!(
            s.liberties(),
            &BTreeSet::from([p(2, 4), p(4, 4), p(3, 5), p(2, 3), p(3, 2), p(4, 3)])
        );
        assert_consistent(&board);
    }

    #[test]
    fn test_two_stones_different_colors() {
        let mut board = Board::square(13);
        board.place_stone(Player::Black, p(3, 3));
        board.place_stone(Player::White, p(3, 4));

        let black = board.get_go_string(p(3, 3)).unwrap();
        assert_eq!(black.liberties(), &BTreeSet::from([p(2, 3), p(3, 2), p(4, 3)]));
        let white = board.get_go_string(p(3, 4)).unwrap();
        assert_eq!(white.color(), Player::White);
        assert_eq!(white.liberties(), &BTreeSet::from([p(2, 4), p(4, 4), p(3, 5)]));
        assert_consistent(&board);
    }

    #[test]
    fn test_surrounded_stone_is_captured() {
        let mut board = Board::square(13);
        board.place_stone(Player::Black, p(3, 3));
        board.place_stone(Player::White, p(2, 3));
        board.place_stone(Player::White, p(3, 2));
        board.place_stone(Player::White, p(3, 4));
        assert_eq!(board.get(p(3, 3)), Some(Player::Black));

        let captured = board.place_stone(Player::White, p(4, 3));
        assert_eq!(captured, 1);
        assert_eq!(board.get(p(3, 3)), None);
        // Each surrounding white stone got (3,3) back.
        for w in [p(2, 3), p(3, 2), p(3, 4), p(4, 3)] {
            assert!(board.get_go_string(w).unwrap().liberties().contains(&p(3, 3)));
        }
        assert_consistent(&board);
    }

    #[test]
    fn test_capture_three_stone_string() {
        // White wall on row 1 at columns 1..=3, Black closing it in.
        let mut board = Board::square(9);
        for col in 1..=3 {
            board.place_stone(Player::White, p(1, col));
        }
        for col in 1..=3 {
            board.place_stone(Player::Black, p(2, col));
        }
        assert_eq!(board.get_go_string(p(1, 1)).unwrap().num_liberties(), 1);

        let captured = board.place_stone(Player::Black, p(1, 4));
        assert_eq!(captured, 3);
        for col in 1..=3 {
            assert_eq!(board.get(p(1, col)), None);
        }
        let wall = board.get_go_string(p(2, 1)).unwrap();
        for col in 1..=3 {
            assert!(wall.liberties().contains(&p(1, col)));
        }
        let corner = board.get_go_string(p(1, 4)).unwrap();
        assert!(corner.liberties().contains(&p(1, 3)));
        assert_eq!(board.stone_count(Player::White), 0);
        assert_consistent(&board);
    }

    #[test]
    fn test_capture_frees_liberty_for_new_stone_in_atari() {
        // Black at (1,2) has no empty neighbours, captures the white stone
        // at (1,1) and ends up in atari on the freed point.
        let mut board = Board::square(5);
        board.place_stone(Player::White, p(1, 1));
        board.place_stone(Player::Black, p(2, 1));
        board.place_stone(Player::White, p(2, 2));
        board.place_stone(Player::White, p(1, 3));

        let captured = board.place_stone(Player::Black, p(1, 2));
        assert_eq!(captured, 1);
        let s = board.get_go_string(p(1, 2)).unwrap();
        assert_eq!(s.liberties(), &BTreeSet::from([p(1, 1)]));
        assert_consistent(&board);
    }

    #[test]
    fn test_hash_returns_to_empty_after_capture() {
        let mut board = Board::square(5);
        board.place_stone(Player::White, p(1, 1));
        let before = board.zobrist_hash();
        assert_ne!(before, EMPTY_BOARD);
        board.place_stone(Player::Black, p(1, 2));
        board.place_stone(Player::Black, p(2, 1));
        assert_eq!(board.get(p(1, 1)), None);
        assert_eq!(board.zobrist_hash(), board.recompute_hash());
    }

    #[test]
    #[should_panic(expected = "already occupied")]
    fn test_place_on_occupied_panics() {
        let mut board = Board::square(9);
        board.place_stone(Player::Black, p(5, 5));
        board.place_stone(Player::White, p(5, 5));
    }

    #[test]
    #[should_panic(expected = "off the board")]
    fn test_place_off_board_panics() {
        let mut board = Board::square(9);
        board.place_stone(Player::Black, p(10, 1));
    }

    #[test]
    #[should_panic(expected = "unsupported board size")]
    fn test_zero_size_board_panics() {
        let _ = Board::square(0);
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = Board::square(9);
        board.place_stone(Player::Black, p(4, 4));
        let snapshot = board.clone();
        board.place_stone(Player::Black, p(4, 5));
        assert_eq!(snapshot.get(p(4, 5)), None);
        assert_eq!(snapshot.get_go_string(p(4, 4)).unwrap().num_stones(), 1);
        assert_ne!(snapshot, board);
    }

    #[test]
    fn test_equality_ignores_arena_layout() {
        let mut a = Board::square(9);
        a.place_stone(Player::Black, p(1, 1));
        a.place_stone(Player::Black, p(5, 5));
        let mut b = Board::square(9);
        b.place_stone(Player::Black, p(5, 5));
        b.place_stone(Player::Black, p(1, 1));
        assert_eq!(a, b);
    }

    #[test]
    fn test_fast_self_capture() {
        let mut board = Board::square(9);
        board.place_stone(Player::Black, p(1, 2));
        board.place_stone(Player::Black, p(2, 1));
        assert!(board.is_self_capture(Player::White, p(1, 1)));
        assert!(!board.is_self_capture(Player::Black, p(1, 1)));
        assert!(!board.would_capture(Player::White, p(1, 1)));
    }

    #[test]
    fn test_capture_queries_off_the_board() {
        let board = Board::square(9);
        for point in [p(0, 3), p(10, 1), p(usize::MAX, usize::MAX)] {
            assert!(!board.is_self_capture(Player::Black, point));
            assert!(!board.would_capture(Player::Black, point));
        }
    }

    #[test]
    fn test_eye_detection() {
        let mut board = Board::square(9);
        // Corner eye at (1,1).
        for pt in [p(1, 2), p(2, 1), p(2, 2)] {
            board.place_stone(Player::Black, pt);
        }
        assert!(board.is_point_an_eye(p(1, 1), Player::Black));
        assert!(!board.is_point_an_eye(p(1, 1), Player::White));

        // Centre point with all neighbours but only three friendly corners.
        for pt in [p(4, 5), p(6, 5), p(5, 4), p(5, 6), p(4, 4), p(4, 6), p(6, 4)] {
            board.place_stone(Player::Black, pt);
        }
        assert!(!board.is_point_an_eye(p(5, 5), Player::Black));
        board.place_stone(Player::Black, p(6, 6));
        assert!(board.is_point_an_eye(p(5, 5), Player::Black));
        assert!(!board.is_point_an_eye(p(4, 4), Player::Black), "occupied");
    }

    #[test]
    fn test_display() {
        let mut board = Board::square(3);
        board.place_stone(Player::Black, p(1, 1));
        board.place_stone(Player::White, p(3, 3));
        assert_eq!(board.to_string(), " 3 . . O\n 2 . . .\n 1 X . .\n   A B C\n");
    }
}
