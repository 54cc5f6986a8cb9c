//! Scan kernel (§4.5).
//!
//! Drives the compiled, failureless delta table across an input buffer,
//! restarting the automaton at every starting offset so that all-occurrence
//! matching is recovered without runtime failure-link traversal (§9). Two
//! near-identical loops exist for the two delta cell widths rather than one
//! generic loop over a trait object, matching the reference's split 16-bit
//! / 32-bit paths and keeping the hot loop free of dynamic dispatch.

use crate::delta::{CompiledAutomaton, Delta, CASE_VERIFY_BIT, OUT_BIT_16, OUT_BIT_32, STATE_MASK_16, STATE_MASK_32};
use crate::sink::MatchSink;

/// Per-thread scan statistics (§4.7 "thread context"; ambient, §6
/// `print_search_stats`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanStats {
    pub scans: u64,
    pub bytes_scanned: u64,
    pub raw_matches: u64,
}

impl ScanStats {
    pub fn print_search_stats(&self) {
        println!("pfac-mpm search stats:");
        println!("  scans performed : {}", self.scans);
        println!("  bytes scanned   : {}", self.bytes_scanned);
        println!("  raw match events: {}", self.raw_matches);
    }
}

/// Run the scan kernel over `buf`, populating `sink` and returning the raw
/// match-event count (§4.5, §4.6). A no-op (returns 0) on an empty buffer
/// or an unprepared/empty automaton, per §8's testable properties.
pub fn scan(automaton: &CompiledAutomaton, buf: &[u8], sink: &mut MatchSink, stats: &mut ScanStats) -> u32 {
    let raw = match &automaton.delta {
        Delta::Sixteen(delta) => scan_16(delta, automaton, buf, sink),
        Delta::ThirtyTwo(delta) => scan_32(delta, automaton, buf, sink),
    };
    stats.scans += 1;
    stats.bytes_scanned += buf.len() as u64;
    stats.raw_matches += raw as u64;
    raw
}

/// Verify a case-sensitive pattern's exact bytes against the candidate
/// window and, if it matches, add the (low-16) id to the sink. Returns
/// whether emission should continue to the next id in this state's output
/// list: `false` means "stop emitting for this state" (§4.5's literal
/// break-on-verify-failure semantics).
#[inline]
fn emit_one(automaton: &CompiledAutomaton, buf: &[u8], start: usize, encoded_id: u32, sink: &mut MatchSink, raw: &mut u32) -> bool {
    let id = encoded_id & 0xFFFF;
    if encoded_id & CASE_VERIFY_BIT != 0 {
        let Some((exact, len)) = automaton.pattern_list.get(id as usize).and_then(|e| e.as_ref()) else {
            return true;
        };
        let len = *len as usize;
        let Some(window) = buf.get(start..start + len) else {
            return false;
        };
        if window != exact.as_slice() {
            return false;
        }
    }
    sink.add(id);
    *raw += 1;
    true
}

fn scan_16(delta: &[u16], automaton: &CompiledAutomaton, buf: &[u8], sink: &mut MatchSink) -> u32 {
    let buflen = buf.len();
    let mut raw = 0u32;

    for i in 0..buflen {
        let mut state: u16 = 0;
        let mut j = i;
        while j < buflen {
            let byte = buf[j].to_ascii_lowercase();
            let row = (state & STATE_MASK_16) as usize;
            state = delta[row * 256 + byte as usize];
            if state == 0 {
                break;
            }
            if state & OUT_BIT_16 != 0 {
                let out_state = (state & STATE_MASK_16) as usize;
                for &encoded_id in &automaton.outputs[out_state] {
                    if !emit_one(automaton, buf, i, encoded_id, sink, &mut raw) {
                        break;
                    }
                }
            }
            j += 1;
        }
    }

    raw
}

fn scan_32(delta: &[u32], automaton: &CompiledAutomaton, buf: &[u8], sink: &mut MatchSink) -> u32 {
    let buflen = buf.len();
    let mut raw = 0u32;

    for i in 0..buflen {
        let mut state: u32 = 0;
        // §9 open question: the reference's 32-bit path indexes `buf[i]`
        // here, which is a typo relative to the 16-bit path's `buf[j]`;
        // this implementation uses `buf[j]` uniformly as recommended.
        let mut j = i;
        while j < buflen {
            let byte = buf[j].to_ascii_lowercase();
            let row = (state & STATE_MASK_32) as usize;
            state = delta[row * 256 + byte as usize];
            if state == 0 {
                break;
            }
            if state & OUT_BIT_32 != 0 {
                let out_state = (state & STATE_MASK_32) as usize;
                for &encoded_id in &automaton.outputs[out_state] {
                    if !emit_one(automaton, buf, i, encoded_id, sink, &mut raw) {
                        break;
                    }
                }
            }
            j += 1;
        }
    }

    raw
}
