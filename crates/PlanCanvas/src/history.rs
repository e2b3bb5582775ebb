use std::collections::VecDeque;

use crate::model::GraphState;

/// Manages the Undo/Redo history of the working graph.
///
/// History is a bounded, linear list of full `{nodes, edges}` snapshots with
/// a cursor pointing at the snapshot that matches the current state. Committing
/// from the middle of the list discards the entries after the cursor, and once
/// `max_history` entries are stored the oldest one is evicted first.
#[derive(Clone, Debug)]
pub struct HistoryManager {
    entries: VecDeque<GraphState>,
    cursor: usize,
    pub max_history: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(50)
    }
}

impl HistoryManager {
    /// Creates a new HistoryManager with a specified limit (at least 1).
    pub fn new(max_history: usize) -> Self {
        let max_history = max_history.max(1);
        Self {
            entries: VecDeque::with_capacity(max_history),
            cursor: 0,
            max_history,
        }
    }

    /// Drops every entry and starts over from `state`.
    pub fn reset(&mut self, state: &GraphState) {
        self.entries.clear();
        self.entries.push_back(state.clone());
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The snapshot under the cursor.
    pub fn current(&self) -> Option<&GraphState> {
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    /// Records `state` as the newest snapshot.
    ///
    /// Call this *after* a discrete user action has finished mutating the graph.
    pub fn commit(&mut self, state: &GraphState) {
        if !self.entries.is_empty() {
            self.entries.truncate(self.cursor + 1);
        }
        self.entries.push_back(state.clone());
        while self.entries.len() > self.max_history {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    /// Performs Undo.
    ///
    /// Returns true if successful (state updated), false at the start of history.
    pub fn undo(&mut self, state: &mut GraphState) -> bool {
        if !self.can_undo() {
            return false;
        }
        self.cursor -= 1;
        match self.entries.get(self.cursor) {
            Some(snapshot) => {
                *state = snapshot.clone();
                true
            }
            None => false,
        }
    }

    /// Performs Redo.
    ///
    /// Returns true if successful (state updated), false at the end of history.
    pub fn redo(&mut self, state: &mut GraphState) -> bool {
        if !self.can_redo() {
            return false;
        }
        self.cursor += 1;
        match self.entries.get(self.cursor) {
            Some(snapshot) => {
                *state = snapshot.clone();
                true
            }
            None => false,
        }
    }
}
