use std::collections::VecDeque;

use super::element::DrawingElement;

pub const DEFAULT_MAX_HISTORY: usize = 50;

pub type Snapshot = Vec<DrawingElement>;

/// Bounded undo/redo over whole-canvas snapshots.
///
/// The top of `undo_stack` always mirrors the live canvas; undo pops it and
/// restores the entry beneath.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    undo_stack: VecDeque<Snapshot>,
    redo_stack: Vec<Snapshot>,
    max_history: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryManager {
    pub fn new() -> Self {
        Self::with_max_history(DEFAULT_MAX_HISTORY)
    }

    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            undo_stack: VecDeque::new(),
            redo_stack: Vec::new(),
            max_history: max_history.max(1),
        }
    }

    pub fn max_history(&self) -> usize {
        self.max_history
    }

    pub fn save_state(&mut self, elements: &[DrawingElement]) {
        self.undo_stack.push_back(elements.to_vec());
        self.redo_stack.clear();

        while self.undo_stack.len() > self.max_history {
            self.undo_stack.pop_front();
        }
        tracing::trace!(
            undo_depth = self.undo_stack.len(),
            elements = elements.len(),
            "history snapshot saved"
        );
    }

    pub fn undo(&mut self) -> Snapshot {
        let Some(current) = self.undo_stack.pop_back() else {
            return Snapshot::new();
        };
        self.redo_stack.push(current);
        self.undo_stack.back().cloned().unwrap_or_default()
    }

    pub fn redo(&mut self) -> Snapshot {
        let Some(state) = self.redo_stack.pop() else {
            return Snapshot::new();
        };
        let restored = state.clone();
        self.undo_stack.push_back(state);
        restored
    }

    pub fn can_undo(&self) -> bool {
        self.undo_stack.len() > 1
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    pub fn undo_depth(&self) -> usize {
        self.undo_stack.len()
    }

    pub fn redo_depth(&self) -> usize {
        self.redo_stack.len()
    }

    pub fn clear(&mut self) {
        self.undo_stack.clear();
        self.redo_stack.clear();
    }

    #[cfg(test)]
    fn oldest(&self) -> Option<&Snapshot> {
        self.undo_stack.front()
    }
}
