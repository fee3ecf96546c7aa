//! Linear undo/redo over a chain of [`GameState`] nodes.
//!
//! Nodes already link backwards, so undo alone needs nothing but
//! [`GameState::previous_state`]. Redo needs the nodes that were undone, which
//! a node cannot reach; `History` keeps them in a list with a cursor. Playing
//! a new move after an undo discards the redo tail.

use crate::error::MoveError;
use crate::game::{GameState, Move};

#[derive(Debug, Clone)]
pub struct History {
    states: Vec<GameState>,
    cursor: usize,
}

impl History {
    pub fn new(board_size: usize) -> Self {
        Self::from_state(GameState::new_game(board_size))
    }

    /// A history starting at an existing node.
    pub fn from_state(state: GameState) -> Self {
        Self {
            states: vec![state],
            cursor: 0,
        }
    }

    /// Start over with an empty board.
    pub fn reset(&mut self, board_size: usize) {
        *self = Self::new(board_size);
    }

    pub fn current(&self) -> &GameState {
        &self.states[self.cursor]
    }

    /// Play `mv` from the current node, dropping any redo tail.
    pub fn play(&mut self, mv: Move) -> Result<&GameState, MoveError> {
        let next = self.current().try_apply_move(mv)?;
        self.states.truncate(self.cursor + 1);
        self.states.push(next);
        self.cursor += 1;
        Ok(self.current())
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.states.len()
    }

    /// Step back one move. Returns false at the start of the game.
    pub fn undo(&mut self) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        true
    }

    /// Step forward to a previously undone move. Returns false if there is
    /// nothing to redo.
    pub fn redo(&mut self) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        true
    }
}
