//! Zobrist hashing of board positions.
//!
//! Every `(point, player)` pair gets a fixed pseudorandom 63-bit value. A
//! position's hash is the XOR of the values of its occupied points, so
//! adding or removing a stone is a single XOR.

use std::sync::{Arc, LazyLock};

use crate::constants::{MAX_BOARD_SIZE, ZOBRIST_MASK, ZOBRIST_SEED};
use crate::player::Player;
use crate::point::Point;

/// Hash of an empty board.
pub const EMPTY_BOARD: u64 = 0;

/// Random values for every `(point, player)` pair up to `max_size`.
#[derive(Debug)]
pub struct ZobristTable {
    max_size: usize,
    values: Vec<[u64; 2]>,
}

static SHARED: LazyLock<Arc<ZobristTable>> =
    LazyLock::new(|| Arc::new(ZobristTable::new(MAX_BOARD_SIZE, ZOBRIST_SEED)));

impl ZobristTable {
    /// Build a table for boards up to `max_size` x `max_size`.
    pub fn new(max_size: usize, seed: u64) -> Self {
        let mut rng = fastrand::Rng::with_seed(seed);
        let values = (0..max_size * max_size)
            .map(|_| [rng.u64(..) & ZOBRIST_MASK, rng.u64(..) & ZOBRIST_MASK])
            .collect();
        Self { max_size, values }
    }

    /// The process-wide table, covering every supported board size.
    pub fn shared() -> Arc<ZobristTable> {
        Arc::clone(&SHARED)
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    /// Value for a stone of `player` at `point`.
    ///
    /// # Panics
    /// If `point` lies outside the table.
    #[inline]
    pub fn value(&self, point: Point, player: Player) -> u64 {
        assert!(
            (1..=self.max_size).contains(&point.row) && (1..=self.max_size).contains(&point.col),
            "point {point} outside zobrist table"
        );
        self.values[(point.row - 1) * self.max_size + point.col - 1][player.index()]
    }
}
