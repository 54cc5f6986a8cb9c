//! Failure function construction (§4.3).
//!
//! Breadth-first over the trie from the root, computing each state's
//! failure link and union-merging output sets along the way so the delta
//! compiler never needs to consult the failure table itself (§4.4's
//! "failureless" delta is built purely from goto; outputs were already
//! merged here).
//!
//! The BFS queue is a growable `VecDeque` rather than the reference's
//! fixed 65536-slot ring (§9 "Queue overflow" — the natural fix). This
//! means `PatternTooManyForQueue` (`MpmError::TooManyPatterns`) is not
//! reachable from pattern-set size alone; it is kept in the error enum so
//! the API shape matches §7, and would only surface if growing the queue's
//! backing allocation itself failed.

use crate::trie::{GotoTable, NO_TRANSITION};
use std::collections::VecDeque;

/// Run the BFS and merge outputs in place on the goto table's states.
/// Returns the failure table (state -> failure target), retained only
/// until delta compilation finishes (§3 lifecycle).
pub fn build_failure_links(table: &mut GotoTable) -> Vec<u32> {
    let state_count = table.state_count();
    let mut failure = vec![0u32; state_count];
    let mut queue: VecDeque<u32> = VecDeque::with_capacity(state_count);

    for byte in 0..256usize {
        let child = table.states[0].transitions[byte];
        if child > 0 {
            let child = child as u32;
            failure[child as usize] = 0;
            queue.push_back(child);
        }
    }

    while let Some(r) = queue.pop_front() {
        for byte in 0..256usize {
            let u = table.states[r as usize].transitions[byte];
            if u == NO_TRANSITION {
                continue;
            }
            let u = u as u32;
            if u == 0 {
                // r itself is root, or this is the root's own self-loop;
                // root's children are seeded above and never revisited.
                continue;
            }
            queue.push_back(u);

            let mut state = failure[r as usize];
            while table.states[state as usize].transitions[byte] == NO_TRANSITION {
                state = failure[state as usize];
            }
            let target = table.states[state as usize].transitions[byte] as u32;
            failure[u as usize] = if target == u { 0 } else { target };

            let suffix_output = table.states[failure[u as usize] as usize].output.clone();
            if !suffix_output.is_empty() {
                let out = &mut table.states[u as usize].output;
                for id in suffix_output {
                    if !out.contains(&id) {
                        out.push(id);
                    }
                }
            }
        }
    }

    failure
}
