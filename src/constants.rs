//! Board-size limits and engine-wide constants.
//!
//! The rules engine works on any rectangular grid inside these limits; the
//! GTP front end and `GameState::new_game` only ever build square boards.

// =============================================================================
// Board Geometry
// =============================================================================

/// Smallest supported board edge.
pub const MIN_BOARD_SIZE: usize = 1;

/// Largest supported board edge. Matches the GTP vertex alphabet
/// (`A`..`Z` without `I`).
pub const MAX_BOARD_SIZE: usize = 25;

/// Board size used when none is given.
pub const DEFAULT_BOARD_SIZE: usize = 19;

/// Column letters used by GTP vertices. `I` is skipped to avoid confusion
/// with `J`.
pub const COLUMN_LETTERS: &[u8; MAX_BOARD_SIZE] = b"ABCDEFGHJKLMNOPQRSTUVWXYZ";

// =============================================================================
// Position Hashing
// =============================================================================

/// Seed for the process-wide Zobrist table.
///
/// Fixed so that hashes are reproducible across runs, which keeps logged
/// hashes comparable.
pub const ZOBRIST_SEED: u64 = 0x5EED_0F60_BA4E_2024;

/// Zobrist values are restricted to 63 bits.
pub const ZOBRIST_MASK: u64 = 0x7fff_ffff_ffff_ffff;

// =============================================================================
// Text Rendering
// =============================================================================

/// Black stone in board diagrams.
pub const STONE_BLACK: char = 'X';

/// White stone in board diagrams.
pub const STONE_WHITE: char = 'O';

/// Empty point in board diagrams.
pub const EMPTY: char = '.';
