//! Bounded snapshot history.

use std::{collections::VecDeque, sync::Arc};

use cpix_engine::Document;

/// A snapshot together with the operation that left it.
#[derive(Debug, Clone)]
pub struct UndoEntry {
    pub description: String,
    pub document: Arc<Document>,
}

#[derive(Debug, Clone)]
pub struct UndoStack {
    limit: usize,
    /// Oldest first.
    undo_stack: VecDeque<UndoEntry>,
    redo_stack: Vec<UndoEntry>,
}

impl UndoStack {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Records the state before a new operation; the redo stack is dropped.
    pub fn push(&mut self, entry: UndoEntry) {
        self.redo_stack.clear();
        self.push_undo(entry);
    }

    /// Pushes without touching the redo stack, evicting the oldest entry
    /// beyond the limit.
    pub fn push_undo(&mut self, entry: UndoEntry) {
        if self.limit == 0 {
            return;
        }
        while self.undo_stack.len() >= self.limit {
            self.undo_stack.pop_front();
        }
        self.undo_stack.push_back(entry);
    }

    pub fn pop_undo(&mut self) -> Option<UndoEntry> {
        self.undo_stack.pop_back()
    }

    pub fn push_redo(&mut self, entry: UndoEntry) {
        self.redo_stack.push(entry);
    }

    pub fn pop_redo(&mut self) -> Option<UndoEntry> {
        self.redo_stack.pop()
    }

    pub fn undo_len(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_len(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.undo_stack.back().map(|entry| entry.description.as_str())
    }

    pub fn redo_description(&self) -> Option<&str> {
        self.redo_stack.last().map(|entry| entry.description.as_str())
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }
}
