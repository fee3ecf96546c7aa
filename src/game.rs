//! Moves, move legality and the immutable game history.
//!
//! A [`GameState`] is one node of a backward-linked chain: the board after a
//! move, the side to move, the move that produced it and a link to the
//! previous node. Nodes never change once built, so undo is following
//! [`GameState::previous_state`] and redo is keeping the later node around.
//! The same chain answers superko queries: a play is illegal if the
//! resulting `(side to move, board hash)` pair already occurs in it.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::board::Board;
use crate::constants::DEFAULT_BOARD_SIZE;
use crate::error::{MoveError, ParseError, ReplayError};
use crate::player::Player;
use crate::point::Point;

/// A player's action on their turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Move {
    Play(Point),
    Pass,
    Resign,
}

impl Move {
    pub fn play(point: Point) -> Self {
        Move::Play(point)
    }

    /// The point played, if this is a stone placement.
    pub fn point(self) -> Option<Point> {
        match self {
            Move::Play(p) => Some(p),
            Move::Pass | Move::Resign => None,
        }
    }

    pub fn is_pass(self) -> bool {
        self == Move::Pass
    }

    pub fn is_resign(self) -> bool {
        self == Move::Resign
    }
}

/// Parses `pass`, `resign` or a GTP vertex.
impl FromStr for Move {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("pass") {
            Ok(Move::Pass)
        } else if s.eq_ignore_ascii_case("resign") {
            Ok(Move::Resign)
        } else {
            s.parse().map(Move::Play)
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Move::Play(p) => write!(f, "{p}"),
            Move::Pass => write!(f, "pass"),
            Move::Resign => write!(f, "resign"),
        }
    }
}

/// One immutable snapshot of a game.
///
/// Cloning is cheap and shares the node. Nodes are `Send + Sync` and may be
/// read from any thread.
#[derive(Clone)]
pub struct GameState(Arc<Node>);

struct Node {
    board: Arc<Board>,
    next_player: Player,
    previous_state: Option<GameState>,
    last_move: Option<Move>,
    move_number: usize,
    /// Stones captured so far, indexed by the capturing player.
    captures: [usize; 2],
}

// Unlink iteratively so dropping a long game does not recurse once per move.
impl Drop for Node {
    fn drop(&mut self) {
        let mut previous = self.previous_state.take();
        while let Some(GameState(node)) = previous {
            match Arc::try_unwrap(node) {
                Ok(mut node) => previous = node.previous_state.take(),
                Err(_) => break,
            }
        }
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new_game(DEFAULT_BOARD_SIZE)
    }
}

impl GameState {
    /// The start of a game on an empty `board_size` x `board_size` board,
    /// Black to move.
    ///
    /// # Panics
    /// If `board_size` is outside `MIN_BOARD_SIZE..=MAX_BOARD_SIZE`.
    pub fn new_game(board_size: usize) -> Self {
        Self::from_board(Board::square(board_size), Player::Black)
    }

    /// A root node for an arbitrary starting position.
    pub fn from_board(board: Board, next_player: Player) -> Self {
        GameState(Arc::new(Node {
            board: Arc::new(board),
            next_player,
            previous_state: None,
            last_move: None,
            move_number: 0,
            captures: [0; 2],
        }))
    }

    pub fn board(&self) -> &Board {
        &self.0.board
    }

    pub fn next_player(&self) -> Player {
        self.0.next_player
    }

    pub fn previous_state(&self) -> Option<&GameState> {
        self.0.previous_state.as_ref()
    }

    pub fn last_move(&self) -> Option<Move> {
        self.0.last_move
    }

    /// Number of moves (including passes) played to reach this node.
    pub fn move_number(&self) -> usize {
        self.0.move_number
    }

    /// Stones `player` has captured so far.
    pub fn captures(&self, player: Player) -> usize {
        self.0.captures[player.index()]
    }

    /// The pair that identifies a position for superko.
    pub fn situation(&self) -> (Player, u64) {
        (self.next_player(), self.board().zobrist_hash())
    }

    /// This node followed by each of its predecessors back to the root.
    pub fn ancestors(&self) -> impl Iterator<Item = &GameState> + '_ {
        std::iter::successors(Some(self), |s| s.previous_state())
    }

    /// True after a resignation or after two passes in a row.
    pub fn is_over(&self) -> bool {
        match self.last_move() {
            None => false,
            Some(Move::Resign) => true,
            Some(Move::Play(_)) => false,
            Some(Move::Pass) => self
                .previous_state()
                .and_then(GameState::last_move)
                .is_some_and(Move::is_pass),
        }
    }

    pub fn is_valid_move(&self, mv: Move) -> bool {
        self.check_move(mv).is_ok()
    }

    /// Decide whether `mv` is legal for the side to move, and why not.
    ///
    /// Never changes `self`; a rejected move leaves no trace.
    pub fn check_move(&self, mv: Move) -> Result<(), MoveError> {
        self.simulate(mv).map(|_| ())
    }

    /// Play `mv` and return the resulting node.
    ///
    /// # Panics
    /// If the game is over or the point is off the board or occupied. Other
    /// illegal moves (suicide, superko) are only caught in debug builds;
    /// check with [`is_valid_move`](Self::is_valid_move) first, or use
    /// [`try_apply_move`](Self::try_apply_move).
    pub fn apply_move(&self, mv: Move) -> GameState {
        assert!(!self.is_over(), "cannot play {mv}: game is over");
        debug_assert!(self.is_valid_move(mv), "illegal move {mv}");
        let (board, captured) = match mv {
            Move::Play(point) => {
                let mut board = Board::clone(self.board());
                let captured = board.place_stone(self.next_player(), point);
                (Arc::new(board), captured)
            }
            Move::Pass | Move::Resign => (Arc::clone(&self.0.board), 0),
        };
        self.child(mv, board, captured)
    }

    /// Check `mv` and, if legal, play it.
    pub fn try_apply_move(&self, mv: Move) -> Result<GameState, MoveError> {
        let (board, captured) = match self.simulate(mv)? {
            Some((board, captured)) => (Arc::new(board), captured),
            None => (Arc::clone(&self.0.board), 0),
        };
        Ok(self.child(mv, board, captured))
    }

    /// Legality check. For a legal play, returns the resulting board and the
    /// number of stones it captured.
    fn simulate(&self, mv: Move) -> Result<Option<(Board, usize)>, MoveError> {
        if self.is_over() {
            return Err(MoveError::GameOver);
        }
        let point = match mv {
            Move::Play(point) => point,
            Move::Pass | Move::Resign => return Ok(None),
        };
        let board = self.board();
        if !board.is_on_grid(point) {
            return Err(MoveError::OffBoard);
        }
        if board.get(point).is_some() {
            return Err(MoveError::Occupied);
        }

        let player = self.next_player();
        let mut next = board.clone();
        let captured = next.place_stone(player, point);
        let suicide = next
            .get_go_string(point)
            .is_some_and(|s| s.num_liberties() == 0);
        debug_assert_eq!(
            suicide,
            board.is_self_capture(player, point),
            "fast self-capture check disagrees at {point}"
        );
        if suicide {
            return Err(MoveError::SelfCapture);
        }

        let situation = (player.other(), next.zobrist_hash());
        if self.ancestors().any(|s| s.situation() == situation) {
            return Err(MoveError::Superko);
        }
        Ok(Some((next, captured)))
    }

    fn child(&self, mv: Move, board: Arc<Board>, captured: usize) -> GameState {
        let player = self.next_player();
        let mut captures = self.0.captures;
        captures[player.index()] += captured;
        debug!(
            move_number = self.move_number() + 1,
            player = %player,
            mv = %mv,
            captured,
            hash = board.zobrist_hash(),
            "move applied"
        );
        GameState(Arc::new(Node {
            board,
            next_player: player.other(),
            previous_state: Some(self.clone()),
            last_move: Some(mv),
            move_number: self.move_number() + 1,
            captures,
        }))
    }

    /// Every legal move for the side to move: plays first, row by row, then
    /// pass and resign. Empty once the game is over.
    pub fn legal_moves(&self) -> Vec<Move> {
        if self.is_over() {
            return Vec::new();
        }
        self.board()
            .points()
            .map(Move::Play)
            .filter(|&mv| self.is_valid_move(mv))
            .chain([Move::Pass, Move::Resign])
            .collect()
    }

    /// The moves leading from the root to this node, oldest first.
    pub fn moves(&self) -> Vec<Move> {
        let mut moves: Vec<Move> = self.ancestors().filter_map(GameState::last_move).collect();
        moves.reverse();
        moves
    }

    /// Rebuild a game from its board size and move list.
    pub fn replay(board_size: usize, moves: &[Move]) -> Result<GameState, ReplayError> {
        moves
            .iter()
            .enumerate()
            .try_fold(GameState::new_game(board_size), |state, (index, &mv)| {
                state
                    .try_apply_move(mv)
                    .map_err(|source| ReplayError { index, source })
            })
    }
}

impl fmt::Debug for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GameState")
            .field("move_number", &self.move_number())
            .field("next_player", &self.next_player())
            .field("last_move", &self.last_move())
            .field("board", self.board())
            .finish_non_exhaustive()
    }
}
