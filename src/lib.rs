//! Goban: a rules engine for the game of Go.
//!
//! The engine tracks stones, strings and liberties, resolves captures,
//! rejects suicide and positional superko, and keeps every position of a game
//! as an immutable, backward-linked history that doubles as an undo stack.
//!
//! ## Modules
//!
//! - [`constants`] - Board-size limits and engine-wide constants
//! - [`point`] - Board coordinates
//! - [`player`] - Stone colours
//! - [`go_string`] - Strings of connected stones and their liberties
//! - [`zobrist`] - Position hashing
//! - [`board`] - Stone placement and captures
//! - [`game`] - Moves, legality and the game history
//! - [`history`] - Undo/redo cursor over a game
//! - [`gtp`] - Go Text Protocol front end
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use goban::game::{GameState, Move};
//! use goban::point::Point;
//!
//! let game = GameState::new_game(9);
//! let mv = Move::Play(Point::new(3, 3));
//! assert!(game.is_valid_move(mv));
//!
//! let next = game.apply_move(mv);
//! assert_eq!(next.board().get(Point::new(3, 3)), Some(goban::player::Player::Black));
//! assert!(next.previous_state().is_some());
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod game;
pub mod go_string;
pub mod gtp;
pub mod history;
pub mod player;
pub mod point;
pub mod zobrist;

pub use board::Board;
pub use error::{MoveError, ParseError, ReplayError};
pub use game::{GameState, Move};
pub use go_string::GoString;
pub use history::History;
pub use player::Player;
pub use point::Point;
