//! Delta table compilation (§4.4).
//!
//! Folds the goto table into a dense, failureless transition table: the
//! cell for `(state, byte)` is `goto[state][byte]` if present, else `0`
//! (the root) — never `delta[failure[state]][byte]`. Output sets were
//! already merged along failure links by [`crate::failure`], so the delta
//! compiler only needs the goto table and the (now-merged) per-state
//! output sets; the failure table itself is dropped once this runs.
//!
//! Two cell widths are supported (§3):
//! - 16-bit: bit 15 is the "emits output" flag, bits 0-14 the next state.
//!   Used when `state_count < 32767`.
//! - 32-bit: bit 24 is the "emits output" flag, bits 0-23 the next state.
//!   Bits 25-31 are reserved and always zero.

use crate::pattern::Pattern;
use crate::trie::GotoTable;

/// Threshold below which the 16-bit variant is used (§3, §4.4).
pub const SIXTEEN_BIT_LIMIT: usize = 32767;

/// Bit 15 of a 16-bit delta cell: "the target state emits output" (§3, §4.4).
pub const OUT_BIT_16: u16 = 0x8000;
/// Bits 0-14 of a 16-bit delta cell: the next-state field (§3, §4.4).
pub const STATE_MASK_16: u16 = 0x7FFF;
/// Bit 24 of a 32-bit delta cell: "the target state emits output" (§3, §4.4).
pub const OUT_BIT_32: u32 = 1 << 24;
/// Bits 0-23 of a 32-bit delta cell: the next-state field (§3, §4.4).
pub const STATE_MASK_32: u32 = 0x00FF_FFFF;

/// Bit inside an encoded output-table pattern id that flags "case-sensitive
/// re-check required" (§3, §4.4).
pub const CASE_VERIFY_BIT: u32 = 1 << 16;

/// The compiled transition table, in one of its two cell widths.
pub enum Delta {
    Sixteen(Vec<u16>),
    ThirtyTwo(Vec<u32>),
}

impl Delta {
    pub fn state_count(&self, stride: usize) -> usize {
        match self {
            Delta::Sixteen(v) => v.len() / stride,
            Delta::ThirtyTwo(v) => v.len() / stride,
        }
    }
}

/// Per-state output lists, indexed by (folded, merged) automaton state —
/// not by pattern id. Each entry is `pattern_id | (CASE_VERIFY_BIT if
/// needed)`.
pub type OutputTable = Vec<Vec<u32>>;

/// Scan-time lookup for case-sensitive verification, indexed by the same
/// truncated (low 16 bits) id that [`encode_output_id`] stores in the
/// output table — `emit_one` only ever has that truncated id to look up
/// with, so this list has to share its indexing scheme or the lookup is
/// wrong for every id `>= 65536`. `None` means no verify is needed (added
/// case-insensitively); matches §3's "absent entry" wording via `Option`
/// instead of the reference's null-bytes/zero-length sentinel.
pub type PatternList = Vec<Option<(Vec<u8>, u16)>>;

/// Result of compiling goto+outputs into the final scan-time structures.
pub struct CompiledAutomaton {
    pub delta: Delta,
    pub outputs: OutputTable,
    pub pattern_list: PatternList,
}

/// Compile the delta table, output table, and pattern list from a
/// (failure-merged) goto table and the frozen pattern array.
///
/// `force_both` mirrors the reference's global flag to build both variants
/// regardless of state count (used by consumers that need a fixed width);
/// when set, the wider 32-bit variant is what's returned here since only
/// one `Delta` is held at a time — callers that truly need both widths
/// compile twice.
pub fn compile(table: &GotoTable, patterns: &[Pattern], force_32bit: bool) -> CompiledAutomaton {
    let state_count = table.state_count();
    let pattern_list = build_pattern_list(patterns);
    let verify_needed = build_verify_lookup(patterns);

    let outputs: OutputTable = table
        .states
        .iter()
        .map(|s| {
            s.output
                .iter()
                .map(|&id| encode_output_id(id, &verify_needed))
                .collect()
        })
        .collect();

    let delta = if state_count < SIXTEEN_BIT_LIMIT && !force_32bit {
        compile_16(table, &outputs)
    } else {
        compile_32(table, &outputs)
    };

    CompiledAutomaton {
        delta,
        outputs,
        pattern_list,
    }
}

fn build_verify_lookup(patterns: &[Pattern]) -> Vec<bool> {
    let max_id = patterns.iter().map(|p| p.id).max().unwrap_or(0);
    let mut needs = vec![false; max_id as usize + 1];
    for p in patterns {
        needs[p.id as usize] = p.needs_verify();
    }
    needs
}

fn encode_output_id(id: u32, verify_needed: &[bool]) -> u32 {
    let verify = verify_needed.get(id as usize).copied().unwrap_or(false);
    let low16 = id & 0xFFFF;
    if verify {
        low16 | CASE_VERIFY_BIT
    } else {
        low16
    }
}

/// Build the scan-time pattern list (§4.7 step 3): `exact`+`len` for every
/// pattern added case-sensitively, indexed by the low 16 bits of its id —
/// the same truncation [`encode_output_id`] applies when it writes that id
/// into the output table (§9 open question). Two patterns whose ids share
/// a low 16 bits alias onto the same slot; the first one encountered (in
/// insertion order) keeps it, so a scan never reports a verify entry from
/// a pattern it didn't come from.
fn build_pattern_list(patterns: &[Pattern]) -> PatternList {
    let max_low16 = patterns.iter().map(|p| p.id & 0xFFFF).max().unwrap_or(0);
    let mut list: PatternList = vec![None; max_low16 as usize + 1];
    for p in patterns {
        if p.needs_verify() {
            let slot = &mut list[(p.id & 0xFFFF) as usize];
            if slot.is_none() {
                *slot = Some((p.exact.clone(), p.length));
            }
        }
    }
    list
}

fn compile_16(table: &GotoTable, outputs: &OutputTable) -> Delta {
    let state_count = table.state_count();
    let mut delta = vec![0u16; state_count * 256];
    for (state, row) in table.states.iter().enumerate() {
        for byte in 0..256usize {
            let target = row.transitions[byte];
            let target = if target == crate::trie::NO_TRANSITION {
                0
            } else {
                target as u16
            };
            let mut cell = target & STATE_MASK_16;
            if !outputs[target as usize].is_empty() {
                cell |= OUT_BIT_16;
            }
            delta[state * 256 + byte] = cell;
        }
    }
    Delta::Sixteen(delta)
}

fn compile_32(table: &GotoTable, outputs: &OutputTable) -> Delta {
    let state_count = table.state_count();
    let mut delta = vec![0u32; state_count * 256];
    for (state, row) in table.states.iter().enumerate() {
        for byte in 0..256usize {
            let target = row.transitions[byte];
            let target = if target == crate::trie::NO_TRANSITION {
                0
            } else {
                target as u32
            };
            let mut cell = target & STATE_MASK_32;
            if !outputs[target as usize].is_empty() {
                cell |= OUT_BIT_32;
            }
            delta[state * 256 + byte] = cell;
        }
    }
    Delta::ThirtyTwo(delta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pattern::{PatternFlags, PatternStore};

    fn compiled(patterns: &[(&[u8], u32, bool)]) -> CompiledAutomaton {
        let mut store = PatternStore::new();
        for (bytes, id, nocase) in patterns {
            if *nocase {
                store.add_case_insensitive(bytes, *id, PatternFlags::default()).unwrap();
            } else {
                store.add_case_sensitive(bytes, *id, PatternFlags::default()).unwrap();
            }
        }
        let frozen = store.freeze();
        let mut table = crate::trie::GotoTable::build(&frozen.patterns, true);
        crate::failure::build_failure_links(&mut table);
        compile(&table, &frozen.patterns, false)
    }

    #[test]
    fn selects_16bit_for_small_automata() {
        let c = compiled(&[(b"abcd", 0, false)]);
        assert!(matches!(c.delta, Delta::Sixteen(_)));
    }

    #[test]
    fn forced_32bit_variant() {
        let mut store = PatternStore::new();
        store.add_case_sensitive(b"abcd", 0, PatternFlags::default()).unwrap();
        let frozen = store.freeze();
        let mut table = crate::trie::GotoTable::build(&frozen.patterns, true);
        crate::failure::build_failure_links(&mut table);
        let c = compile(&table, &frozen.patterns, true);
        assert!(matches!(c.delta, Delta::ThirtyTwo(_)));
    }

    #[test]
    fn case_sensitive_pattern_gets_verify_bit_and_list_entry() {
        let c = compiled(&[(b"Works", 1, false), (b"Works", 0, true)]);
        assert!(c.pattern_list[1].is_some());
        assert!(c.pattern_list[0].is_none());
    }
}
