//! Bounded undo/redo over whole-state snapshots.

use std::collections::VecDeque;

pub const DEFAULT_LIMIT: usize = 50;

/// Snapshot ring with a cursor. The entry under the cursor is the current
/// state; entries after it can be redone. Pushing past `limit` evicts the
/// oldest snapshot.
#[derive(Debug, Clone)]
pub struct History<T> {
    entries: VecDeque<T>,
    cursor: usize,
    limit: usize,
}

impl<T: Clone> History<T> {
    pub fn new(initial: T, limit: usize) -> Self {
        let mut entries = VecDeque::with_capacity(limit.max(1));
        entries.push_back(initial);
        Self {
            entries,
            cursor: 0,
            limit: limit.max(1),
        }
    }

    pub fn current(&self) -> Option<&T> {
        self.entries.get(self.cursor)
    }

    /// Records `state` as the new current state and drops anything redoable.
    pub fn push(&mut self, state: T) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push_back(state);
        if self.entries.len() > self.limit {
            self.entries.pop_front();
        } else {
            self.cursor += 1;
        }
    }

    pub fn undo(&mut self) -> Option<&T> {
        if !self.can_undo() {
            return None;
        }
        self.cursor -= 1;
        log::debug!("undo -> {}/{}", self.cursor, self.entries.len());
        self.entries.get(self.cursor)
    }

    pub fn redo(&mut self) -> Option<&T> {
        if !self.can_redo() {
            return None;
        }
        self.cursor += 1;
        log::debug!("redo -> {}/{}", self.cursor, self.entries.len());
        self.entries.get(self.cursor)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor + 1 < self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Forgets everything and starts over from `initial`.
    pub fn reset(&mut self, initial: T) {
        self.entries.clear();
        self.entries.push_back(initial);
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn undo_redo_walks_cursor() {
        let mut h = History::new(0, 10);
        assert!(!h.can_undo());
        h.push(1);
        h.push(2);
        assert_eq!(h.undo(), Some(&1));
        assert_eq!(h.undo(), Some(&0));
        assert_eq!(h.undo(), None);
        assert_eq!(h.redo(), Some(&1));
        assert_eq!(h.current(), Some(&1));
    }

    #[test]
    fn push_truncates_redo_tail() {
        let mut h = History::new(0, 10);
        h.push(1);
        h.push(2);
        h.undo();
        h.push(3);
        assert!(!h.can_redo());
        assert_eq!(h.len(), 3);
        assert_eq!(h.undo(), Some(&1));
    }

    #[test]
    fn evicts_oldest_past_limit() {
        let mut h = History::new(0, 50);
        for i in 1..=60 {
            h.push(i);
        }
        assert_eq!(h.len(), 50);
        assert_eq!(h.current(), Some(&60));
        let mut oldest = 60;
        while let Some(v) = h.undo() {
            oldest = *v;
        }
        assert_eq!(oldest, 11);
    }

    #[test]
    fn reset_starts_over() {
        let mut h = History::new(vec![1], 5);
        h.push(vec![1, 2]);
        h.reset(Vec::new());
        assert_eq!(h.len(), 1);
        assert_eq!(h.current(), Some(&Vec::new()));
        assert!(!h.can_undo() && !h.can_redo());
    }
}
