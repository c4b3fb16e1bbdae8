use std::sync::Arc;
use std::time::SystemTime;

use super::entry::{Entry, Seek};
use crate::persist::Vector;

/// Linear undo/redo history over persistent model snapshots.
///
/// Entries are held in a persistent vector, so cloning a `History` is O(1)
/// and a clone handed to a time-travel view never observes later changes.
/// Recording after an undo drops everything past the current position.
pub struct History<M, A> {
    entries: Vector<Entry<M, A>>,
    // Physical index of the oldest live entry. Entries before it were
    // evicted by the capacity limit and are compacted away lazily.
    first: usize,
    position: usize,
    next_sequence: u64,
    max_entries: usize,
}

impl<M, A: Clone> Clone for History<M, A> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
            first: self.first,
            position: self.position,
            next_sequence: self.next_sequence,
            max_entries: self.max_entries,
        }
    }
}

impl<M, A: Clone> History<M, A> {
    /// Starts a history whose first entry is `initial`.
    ///
    /// `max_entries` is clamped to at least one.
    pub fn new(initial: Arc<M>, max_entries: usize) -> Self {
        let mut entries = Vector::new();
        entries.push_back(Entry {
            sequence: 0,
            model: initial,
            action: None,
            unknown_action: None,
            recorded_at: SystemTime::now(),
        });
        Self {
            entries,
            first: 0,
            position: 0,
            next_sequence: 1,
            max_entries: max_entries.max(1),
        }
    }

    /// Rebuilds a history from decoded entries.
    ///
    /// Returns `None` if `entries` is empty, sequences are not strictly
    /// increasing, or `position` names no entry.
    pub fn from_entries(entries: Vec<Entry<M, A>>, position: u64, max_entries: usize) -> Option<Self> {
        let ordered = entries.windows(2).all(|w| w[0].sequence < w[1].sequence);
        if !ordered {
            return None;
        }
        let next_sequence = entries.last()?.sequence + 1;
        let max_entries = max_entries.max(1);
        let skip = entries.len().saturating_sub(max_entries);
        let entries: Vector<_> = entries.into_iter().skip(skip).collect();
        let mut history = Self {
            entries,
            first: 0,
            position: 0,
            next_sequence,
            max_entries,
        };
        history.position = history.find(position)?;
        Some(history)
    }

    /// Appends a new current entry, discarding any redo tail first.
    ///
    /// Returns the sequence number of the new entry.
    pub fn record(&mut self, model: Arc<M>, action: Option<A>) -> u64 {
        self.entries.truncate(self.position + 1);

        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.entries.push_back(Entry {
            sequence,
            model,
            action,
            unknown_action: None,
            recorded_at: SystemTime::now(),
        });
        self.position = self.entries.len() - 1;

        if self.len() > self.max_entries {
            self.first += 1;
        }
        if self.first > self.max_entries {
            self.compact();
        }
        sequence
    }

    pub fn undo(&mut self) -> Seek<M> {
        if !self.can_undo() {
            return Seek::AtBoundary;
        }
        self.position -= 1;
        self.seek_result()
    }

    pub fn redo(&mut self) -> Seek<M> {
        if !self.can_redo() {
            return Seek::AtBoundary;
        }
        self.position += 1;
        self.seek_result()
    }

    /// Jumps to the entry with `sequence`.
    ///
    /// Unknown or evicted sequences, and the current one, are boundaries.
    pub fn goto(&mut self, sequence: u64) -> Seek<M> {
        match self.find(sequence) {
            Some(index) if index != self.position => {
                self.position = index;
                self.seek_result()
            }
            _ => Seek::AtBoundary,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.position > self.first
    }

    pub fn can_redo(&self) -> bool {
        self.position + 1 < self.entries.len()
    }

    pub fn current(&self) -> &Entry<M, A> {
        // position always points at a live entry
        &self.entries[self.position]
    }

    /// Sequence number of the current entry.
    pub fn position(&self) -> u64 {
        self.current().sequence
    }

    /// Zero-based index of the current entry among live entries.
    pub fn index(&self) -> usize {
        self.position - self.first
    }

    pub fn len(&self) -> usize {
        self.entries.len() - self.first
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn get(&self, sequence: u64) -> Option<&Entry<M, A>> {
        self.find(sequence).and_then(|index| self.entries.get(index))
    }

    /// Live entries, oldest first, including any redo tail.
    pub fn entries(&self) -> impl Iterator<Item = &Entry<M, A>> {
        self.entries.iter().skip(self.first)
    }

    fn seek_result(&self) -> Seek<M> {
        let entry = self.current();
        Seek::Moved {
            sequence: entry.sequence,
            model: Arc::clone(&entry.model),
        }
    }

    fn find(&self, sequence: u64) -> Option<usize> {
        let (mut lo, mut hi) = (self.first, self.entries.len());
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let found = self.entries.get(mid)?.sequence;
            if found == sequence {
                return Some(mid);
            }
            if found < sequence {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        None
    }

    fn compact(&mut self) {
        self.entries = self.entries.iter().skip(self.first).cloned().collect();
        self.position -= self.first;
        self.first = 0;
    }
}

impl<M: std::fmt::Debug, A: std::fmt::Debug> std::fmt::Debug for History<M, A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("History")
            .field("len", &(self.entries.len() - self.first))
            .field("index", &(self.position - self.first))
            .field("max_entries", &self.max_entries)
            .finish()
    }
}
