//! Transposition table. A plain unbounded `HashMap`, no replacement
//! policy and no size bound — it grows for as long as the process runs.

use std::collections::HashMap;

use crate::board::Move;

#[derive(Clone, Copy, Debug)]
pub struct TtEntry {
    pub best_move: Move,
    pub depth: i32,
    pub score: i32,
}

#[derive(Default)]
pub struct TranspositionTable {
    entries: HashMap<u64, TtEntry>,
}

impl TranspositionTable {
    pub fn new() -> Self {
        TranspositionTable {
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: u64) -> Option<&TtEntry> {
        self.entries.get(&key)
    }

    pub fn insert(&mut self, key: u64, entry: TtEntry) {
        self.entries.insert(key, entry);
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
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::NULL_MOVE;

    #[test]
    fn insert_then_get_round_trips() {
        let mut tt = TranspositionTable::new();
        assert!(tt.get(42).is_none());
        tt.insert(
            42,
            TtEntry {
                best_move: NULL_MOVE,
                depth: 3,
                score: 17,
            },
        );
        let entry = tt.get(42).expect("entry should be present");
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.score, 17);
    }

    #[test]
    fn clear_empties_the_table() {
        let mut tt = TranspositionTable::new();
        tt.insert(
            1,
            TtEntry {
                best_move: NULL_MOVE,
                depth: 1,
                score: 0,
            },
        );
        assert_eq!(tt.len(), 1);
        tt.clear();
        assert!(tt.is_empty());
    }
}
