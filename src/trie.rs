//! Trie / goto table construction (§4.2).
//!
//! Builds the goto table by walking each pattern's `folded` bytes down the
//! trie, allocating new states on first mismatch. State 0 is the root.
//! `-1` marks "no transition" during construction; after all patterns are
//! inserted, any `-1` left in row 0 is rewritten to `0` (self-loop) so the
//! failure builder and the delta compiler never have to special-case the
//! root.

use crate::pattern::Pattern;

/// Sentinel for "no transition" in the goto table.
pub const NO_TRANSITION: i32 = -1;

/// A single trie state: 256 transitions plus an accumulated output set.
#[derive(Debug, Clone)]
pub struct GotoState {
    pub transitions: [i32; 256],
    pub output: Vec<u32>,
}

impl GotoState {
    fn new() -> Self {
        Self {
            transitions: [NO_TRANSITION; 256],
            output: Vec::new(),
        }
    }
}

/// The goto table under construction: `state_count x 256`.
pub struct GotoTable {
    pub states: Vec<GotoState>,
}

impl GotoTable {
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn alloc_state(&mut self) -> u32 {
        let id = self.states.len() as u32;
        self.states.push(GotoState::new());
        id
    }

    /// Pre-allocate first-level states for every distinct byte value that
    /// begins at least one pattern (the "level-1 gap" fill, §4.2, §9). This
    /// is behaviourally harmless and only expands state 0's explicit
    /// children ahead of the main insertion pass; retained for parity with
    /// the reference rather than for any correctness requirement.
    fn fill_level1_gap(&mut self, patterns: &[Pattern]) {
        let mut seen = [false; 256];
        for p in patterns {
            if let Some(&first) = p.folded.first() {
                seen[first as usize] = true;
            }
        }
        for (byte, &present) in seen.iter().enumerate() {
            if present && self.states[0].transitions[byte] == NO_TRANSITION {
                let new_state = self.alloc_state();
                self.states[0].transitions[byte] = new_state as i32;
            }
        }
    }

    fn insert(&mut self, pattern: &Pattern) {
        let mut current = 0usize;
        for &byte in &pattern.folded {
            let next = self.states[current].transitions[byte as usize];
            current = if next != NO_TRANSITION {
                next as usize
            } else {
                let new_state = self.alloc_state();
                self.states[current].transitions[byte as usize] = new_state as i32;
                new_state as usize
            };
        }
        if !self.states[current].output.contains(&pattern.id) {
            self.states[current].output.push(pattern.id);
        }
    }

    /// Rewrite any remaining `-1` cells in the root's row to `0`.
    fn close_root(&mut self) {
        for cell in self.states[0].transitions.iter_mut() {
            if *cell == NO_TRANSITION {
                *cell = 0;
            }
        }
    }

    /// Build the goto table from a frozen pattern array, in insertion order.
    pub fn build(patterns: &[Pattern], level1_gap_fill: bool) -> Self {
        let mut table = GotoTable {
            states: vec![GotoState::new()], // root
        };
        if level1_gap_fill {
            table.fill_level1_gap(patterns);
        }
        for pattern in patterns {
            table.insert(pattern);
        }
        table.close_root();
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PatternFlags, PatternStore};

    fn build(patterns: &[(&[u8], u32)]) -> GotoTable {
        let mut store = PatternStore::new();
        for (bytes, id) in patterns {
            store.add_case_sensitive(bytes, *id, PatternFlags::default()).unwrap();
        }
        let frozen = store.freeze();
        GotoTable::build(&frozen.patterns, true)
    }

    #[test]
    fn root_has_no_dangling_transitions() {
        let table = build(&[(b"abcd", 0)]);
        assert!(table.states[0].transitions.iter().all(|&c| c != NO_TRANSITION));
    }

    #[test]
    fn shared_prefix_shares_states() {
        let table = build(&[(b"abcd", 0), (b"abce", 1)]);
        // "ab" is shared: state count should be less than sum of lengths + 1.
        assert!(table.state_count() < 1 + 4 + 4);
    }

    #[test]
    fn terminal_state_carries_output() {
        let table = build(&[(b"he", 0)]);
        let mut state = 0usize;
        for &b in b"he" {
            state = table.states[state].transitions[b as usize] as usize;
        }
        assert_eq!(table.states[state].output, vec![0]);
    }
}
