//! Transactional editing: the command trait and the undo stack.
//!
//! Every mutation of the store goes through a [`Command`] pushed onto an
//! [`UndoStack`]. Commands capture whatever state they need to reverse
//! themselves during `apply`, so `unapply` never has to guess.

pub mod manager;
pub mod ops;

pub use manager::{MoveEdit, RegionsManager};
pub use ops::{
    EditCmd, InsertBatchCmd, InsertCmd, MoveBatchCmd, RemoveBatchCmd, RemoveBatchOptions,
    RemoveCmd,
};

use crate::error::Result;

/// A reversible mutation of a target of type `T`.
///
/// `apply` runs the mutation; `unapply` reverses it exactly. Commands are
/// applied once and then owned by the stack; they may stash positional state
/// during `apply` for later use by `unapply`.
pub trait Command<T> {
    /// Run the mutation.
    fn apply(&mut self, target: &mut T) -> Result<()>;

    /// Reverse a previously applied mutation.
    fn unapply(&mut self, target: &mut T) -> Result<()>;

    /// Short human-readable description, for logs.
    fn label(&self) -> String;
}

/// Linear undo/redo history over boxed commands.
///
/// Pushing a new command executes it and discards any redoable future. A
/// command that fails to apply is dropped and the stacks are left untouched.
pub struct UndoStack<T> {
    done: Vec<Box<dyn Command<T>>>,
    undone: Vec<Box<dyn Command<T>>>,
}

impl<T> Default for UndoStack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> UndoStack<T> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            done: Vec::new(),
            undone: Vec::new(),
        }
    }

    /// Execute `cmd` against `target` and record it.
    ///
    /// On success any undone commands are discarded. On failure the error is
    /// propagated and the history is unchanged.
    pub fn push(&mut self, target: &mut T, mut cmd: Box<dyn Command<T>>) -> Result<()> {
        log::debug!("applying command: {}", cmd.label());
        cmd.apply(target)?;
        self.undone.clear();
        self.done.push(cmd);
        Ok(())
    }

    /// Reverse the most recent command. Returns `false` when there is
    /// nothing to undo.
    pub fn undo(&mut self, target: &mut T) -> Result<bool> {
        let Some(mut cmd) = self.done.pop() else {
            return Ok(false);
        };
        log::debug!("undoing command: {}", cmd.label());
        cmd.unapply(target)?;
        self.undone.push(cmd);
        Ok(true)
    }

    /// Re-apply the most recently undone command. Returns `false` when
    /// there is nothing to redo.
    pub fn redo(&mut self, target: &mut T) -> Result<bool> {
        let Some(mut cmd) = self.undone.pop() else {
            return Ok(false);
        };
        log::debug!("redoing command: {}", cmd.label());
        cmd.apply(target)?;
        self.done.push(cmd);
        Ok(true)
    }

    /// True when at least one command can be undone.
    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    /// True when at least one command can be redone.
    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Drop the entire history.
    pub fn clear(&mut self) {
        self.done.clear();
        self.undone.clear();
    }
}

impl<T> std::fmt::Debug for UndoStack<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UndoStack")
            .field("done", &self.done.len())
            .field("undone", &self.undone.len())
            .finish()
    }
}
