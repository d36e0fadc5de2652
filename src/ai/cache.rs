//! Transposition table: search results keyed by position hash.
//!
//! Entries are replaced only by results searched at least as deep. The table
//! has a hard capacity; inserting a new key into a full table clears it first.

use std::collections::HashMap;

/// How a stored score relates to the true value of the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// The search completed inside the window
    Exact,
    /// Failed high: true score >= stored score
    Lower,
    /// Failed low: true score <= stored score
    Upper,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheEntry {
    pub depth: usize,
    pub score: i32,
    pub bound: Bound,
    /// Best column found, tried first on the next visit.
    pub best_move: Option<usize>,
}

pub struct TranspositionTable {
    entries: HashMap<u64, CacheEntry>,
    capacity: usize,
}

impl TranspositionTable {
    pub fn new(capacity: usize) -> Self {
        TranspositionTable {
            entries: HashMap::new(),
            capacity: capacity.max(1),
        }
    }

    pub fn get(&self, hash: u64) -> Option<CacheEntry> {
        self.entries.get(&hash).copied()
    }

    /// Store `entry` under `hash`. Returns false when an existing deeper entry
    /// was kept instead.
    pub fn set(&mut self, hash: u64, entry: CacheEntry) -> bool {
        match self.entries.get_mut(&hash) {
            Some(existing) => {
                if entry.depth < existing.depth {
                    return false;
                }
                *existing = entry;
            }
            None => {
                if self.entries.len() >= self.capacity {
                    log::trace!("transposition table full at {} entries, clearing", self.capacity);
                    self.entries.clear();
                }
                self.entries.insert(hash, entry);
            }
        }
        true
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(depth: usize, score: i32) -> CacheEntry {
        CacheEntry {
            depth,
            score,
            bound: Bound::Exact,
            best_move: Some(3),
        }
    }

    #[test]
    fn get_returns_stored_entry() {
        let mut tt = TranspositionTable::new(16);
        assert!(tt.get(1).is_none());
        tt.set(1, entry(4, 10));
        assert_eq!(tt.get(1), Some(entry(4, 10)));
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn shallower_never_replaces_deeper() {
        let mut tt = TranspositionTable::new(16);
        tt.set(7, entry(6, 100));
        assert!(!tt.set(7, entry(3, -5)));
        assert_eq!(tt.get(7).unwrap().score, 100);
    }

    #[test]
    fn equal_or_deeper_replaces() {
        let mut tt = TranspositionTable::new(16);
        tt.set(7, entry(4, 1));
        assert!(tt.set(7, entry(4, 2)));
        assert_eq!(tt.get(7).unwrap().score, 2);
        assert!(tt.set(7, entry(9, 3)));
        assert_eq!(tt.get(7), Some(entry(9, 3)));
    }

    #[test]
    fn clear_empties_table() {
        let mut tt = TranspositionTable::new(16);
        for h in 0..5 {
            tt.set(h, entry(1, 0));
        }
        assert_eq!(tt.len(), 5);
        tt.clear();
        assert!(tt.is_empty());
        assert!(tt.get(0).is_none());
    }

    #[test]
    fn new_key_at_capacity_clears_first() {
        let mut tt = TranspositionTable::new(3);
        for h in 0..3 {
            tt.set(h, entry(2, h as i32));
        }
        assert_eq!(tt.len(), 3);

        tt.set(99, entry(1, 0));
        assert_eq!(tt.len(), 1);
        assert!(tt.get(0).is_none());
        assert!(tt.get(99).is_some());
    }

    #[test]
    fn replacing_existing_key_at_capacity_keeps_table() {
        let mut tt = TranspositionTable::new(3);
        for h in 0..3 {
            tt.set(h, entry(2, 0));
        }
        tt.set(1, entry(5, 42));
        assert_eq!(tt.len(), 3);
        assert_eq!(tt.get(1).unwrap().score, 42);

        // A rejected shallower write at capacity does not clear either.
        tt.set(2, entry(0, 7));
        assert_eq!(tt.len(), 3);
    }
}
