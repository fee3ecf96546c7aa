//! Error types.
//!
//! Illegal moves are ordinary game events and are reported through
//! [`MoveError`]. Misuse of the board API (placing off the grid or on an
//! occupied point) is a caller bug and panics instead.

use thiserror::Error;

/// Why a move was rejected by [`GameState::check_move`](crate::game::GameState::check_move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MoveError {
    /// The game already ended by resignation or two passes.
    #[error("Illegal move: game is over")]
    GameOver,
    /// The point lies outside the board.
    #[error("Illegal move: point is off the board")]
    OffBoard,
    /// The point is not empty.
    #[error("Illegal move: point not EMPTY")]
    Occupied,
    /// The stone would have no liberties and captures nothing.
    #[error("Illegal move: suicide")]
    SelfCapture,
    /// The resulting position already occurred with the same side to move.
    #[error("Illegal move: repeats a previous position (superko)")]
    Superko,
}

/// Failure to read a point, player or move from text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("invalid vertex: {0:?}")]
    Vertex(String),
    #[error("invalid color: {0:?}")]
    Color(String),
}

/// A move list that cannot be replayed from the start position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("move {index} cannot be replayed: {source}")]
pub struct ReplayError {
    /// Zero-based index into the move list.
    pub index: usize,
    #[source]
    pub source: MoveError,
}
