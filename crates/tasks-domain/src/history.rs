//! Undo/redo history management.
//!
//! Provides a command-based history controller. It only does bookkeeping:
//! the changes each step produces are returned to the caller, or handed to a
//! sink the caller supplies, so persistence stays outside the stack and the
//! stack can be tested without any storage.

use crate::commands::{ReversibleCommand, TaskChange};
use std::collections::VecDeque;
use std::fmt;
use tasks_core::{TaskError, TaskResult};

/// Linear undo/redo history over reversible commands.
///
/// Performing a new command after an undo discards the redo branch; there
/// is no redo tree.
pub struct CommandStack {
    /// Commands that can be undone (most recent = back of deque).
    undone: VecDeque<Box<dyn ReversibleCommand>>,

    /// Commands that can be redone (most recent = back of deque).
    redone: VecDeque<Box<dyn ReversibleCommand>>,

    /// Maximum undo depth; the oldest entries are dropped first.
    limit: Option<usize>,
}

impl CommandStack {
    /// Create an unbounded history.
    pub fn new() -> Self {
        Self {
            undone: VecDeque::new(),
            redone: VecDeque::new(),
            limit: None,
        }
    }

    /// Create a history keeping at most `limit` undo steps. A limit of zero
    /// is treated as one.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit.max(1)),
            ..Self::new()
        }
    }

    /// Execute `command` and record it.
    ///
    /// If `execute` fails the history is left exactly as it was.
    pub fn perform<C>(&mut self, command: C) -> TaskResult<TaskChange>
    where
        C: ReversibleCommand + 'static,
    {
        self.perform_with(command, |_| Ok(()))
    }

    /// Execute `command`, pass its change to `apply`, then record it.
    ///
    /// The command is recorded only when both steps succeed.
    pub fn perform_with<C, F>(&mut self, mut command: C, apply: F) -> TaskResult<TaskChange>
    where
        C: ReversibleCommand + 'static,
        F: FnOnce(&TaskChange) -> TaskResult<()>,
    {
        let change = command.execute()?;
        apply(&change)?;

        tracing::debug!("Performed: {}", command.description());
        self.undone.push_back(Box::new(command));
        // Any new action clears the redo history
        self.redone.clear();
        self.enforce_limit();
        Ok(change)
    }

    pub fn undo(&mut self) -> TaskResult<TaskChange> {
        self.undo_with(|_| Ok(()))
    }

    /// Undo the most recent command, passing its change to `apply`.
    ///
    /// On failure the command stays on the undo side.
    pub fn undo_with<F>(&mut self, apply: F) -> TaskResult<TaskChange>
    where
        F: FnOnce(&TaskChange) -> TaskResult<()>,
    {
        let mut command = self
            .undone
            .pop_back()
            .ok_or_else(|| TaskError::IllegalState("nothing to undo".to_string()))?;

        match command.undo().and_then(|change| apply(&change).map(|()| change)) {
            Ok(change) => {
                tracing::debug!("Undid: {}", command.description());
                self.redone.push_back(command);
                Ok(change)
            }
            Err(e) => {
                self.undone.push_back(command);
                Err(e)
            }
        }
    }

    pub fn redo(&mut self) -> TaskResult<TaskChange> {
        self.redo_with(|_| Ok(()))
    }

    /// Redo the most recently undone command, passing its change to `apply`.
    ///
    /// On failure the command stays on the redo side.
    pub fn redo_with<F>(&mut self, apply: F) -> TaskResult<TaskChange>
    where
        F: FnOnce(&TaskChange) -> TaskResult<()>,
    {
        let mut command = self
            .redone
            .pop_back()
            .ok_or_else(|| TaskError::IllegalState("nothing to redo".to_string()))?;

        match command.redo().and_then(|change| apply(&change).map(|()| change)) {
            Ok(change) => {
                tracing::debug!("Redid: {}", command.description());
                self.undone.push_back(command);
                self.enforce_limit();
                Ok(change)
            }
            Err(e) => {
                self.redone.push_back(command);
                Err(e)
            }
        }
    }

    /// Redo every undone command, stopping at the first failure.
    pub fn redo_all<F>(&mut self, mut apply: F) -> TaskResult<Vec<TaskChange>>
    where
        F: FnMut(&TaskChange) -> TaskResult<()>,
    {
        let mut changes = Vec::with_capacity(self.redone.len());
        while self.can_redo() {
            changes.push(self.redo_with(&mut apply)?);
        }
        Ok(changes)
    }

    /// Check if undo is available.
    pub fn can_undo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Check if redo is available.
    pub fn can_redo(&self) -> bool {
        !self.redone.is_empty()
    }

    /// Description of the command `undo` would revert.
    pub fn undo_description(&self) -> Option<String> {
        self.undone.back().map(|command| command.description())
    }

    /// Description of the command `redo` would replay.
    pub fn redo_description(&self) -> Option<String> {
        self.redone.back().map(|command| command.description())
    }

    /// Clear all history.
    pub fn clear(&mut self) {
        self.undone.clear();
        self.redone.clear();
    }

    pub fn undo_depth(&self) -> usize {
        self.undone.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redone.len()
    }

    fn enforce_limit(&mut self) {
        if let Some(limit) = self.limit {
            while self.undone.len() > limit {
                if let Some(dropped) = self.undone.pop_front() {
                    tracing::debug!("History limit reached, dropped: {}", dropped.description());
                }
            }
        }
    }
}

impl Default for CommandStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CommandStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandStack")
            .field("undo_depth", &self.undo_depth())
            .field("redo_depth", &self.redo_depth())
            .field("limit", &self.limit)
            .finish()
    }
}
