//! Lifecycle & interfaces (§4.7, §6).
//!
//! Ties the four construction stages together behind a small state machine:
//! an [`Mpm`] accumulates patterns in a [`PatternStore`], then [`Mpm::prepare`]
//! freezes them through the trie -> failure -> delta pipeline and becomes
//! read-only. [`ThreadContext`] is the per-thread scratch space §6 calls
//! `thread_context_init` for; today that's just scan statistics, matching
//! the reference where the thread context carries little beyond counters.

use crate::delta::{compile, CompiledAutomaton};
use crate::error::{MpmError, Result};
use crate::failure::build_failure_links;
use crate::pattern::{Pattern, PatternFlags, PatternStore};
use crate::scan::{scan, ScanStats};
use crate::sink::MatchSink;
use crate::trie::GotoTable;

/// Construction-time (allocation count, total bytes) accounting (§4.7,
/// SPEC_FULL ambient §E). Updated once per §4 pipeline stage at `prepare`
/// time; this is bookkeeping for `print_info`, not a hot-path concern.
#[derive(Debug, Clone, Copy, Default)]
pub struct MpmStats {
    pub allocations: u64,
    pub bytes: u64,
}

impl MpmStats {
    fn record(&mut self, bytes: usize) {
        self.allocations += 1;
        self.bytes += bytes as u64;
    }
}

enum State {
    Ingesting(PatternStore),
    Prepared {
        automaton: Option<CompiledAutomaton>,
        max_id: u32,
    },
}

/// A matcher context: accumulates patterns, then prepares a read-only
/// compiled automaton that [`Mpm::search`] drives (§3 "Lifecycles", §5
/// concurrency model — safe to share `&Mpm` across scanning threads once
/// prepared, each with its own [`ThreadContext`] and [`MatchSink`]).
pub struct Mpm {
    state: State,
    stats: MpmStats,
    force_32bit: bool,
}

impl Default for Mpm {
    fn default() -> Self {
        Self::new()
    }
}

impl Mpm {
    /// `context_init` (§6): zero-initialize, allocate the ingestion hash.
    pub fn new() -> Self {
        Self {
            state: State::Ingesting(PatternStore::new()),
            stats: MpmStats::default(),
            force_32bit: false,
        }
    }

    /// Force the 32-bit delta variant regardless of state count (§4.4's
    /// "global flag"), e.g. for a consumer that requires a fixed cell width.
    pub fn set_force_32bit(&mut self, force: bool) {
        self.force_32bit = force;
    }

    fn store_mut(&mut self) -> Result<&mut PatternStore> {
        match &mut self.state {
            State::Ingesting(store) => Ok(store),
            State::Prepared { .. } => Err(MpmError::Other(
                "add_pattern called after prepare()".to_string(),
            )),
        }
    }

    /// `add_pattern_case_sensitive` (§6). `offset`/`depth`/`sid` from the
    /// wider API family are accepted nowhere in this signature — this core
    /// ignores them per §6/§9, so the safe Rust surface never takes them.
    pub fn add_pattern_case_sensitive(&mut self, bytes: &[u8], id: u32, flags: PatternFlags) -> Result<()> {
        self.store_mut()?.add_case_sensitive(bytes, id, flags)
    }

    /// `add_pattern_case_insensitive` (§6).
    pub fn add_pattern_case_insensitive(&mut self, bytes: &[u8], id: u32, flags: PatternFlags) -> Result<()> {
        self.store_mut()?.add_case_insensitive(bytes, id, flags)
    }

    /// `prepare` (§4.7, §6). Runs trie -> failure -> delta and freezes the
    /// context. An empty pattern set prepares into a "scan returns 0"
    /// state rather than an error (§4.7 step 1). Calling this twice is an
    /// error (`AlreadyPrepared`) rather than a silent no-op, since the
    /// reference documents "not supported" here rather than idempotent.
    pub fn prepare(&mut self) -> Result<()> {
        let store = match std::mem::replace(&mut self.state, State::Prepared { automaton: None, max_id: 0 }) {
            State::Ingesting(store) => store,
            State::Prepared { automaton, max_id } => {
                self.state = State::Prepared { automaton, max_id };
                return Err(MpmError::AlreadyPrepared);
            }
        };

        if store.is_empty() {
            self.state = State::Prepared { automaton: None, max_id: 0 };
            return Ok(());
        }

        let max_id = store.max_id();
        let frozen = store.freeze();
        let automaton = self.build_automaton(&frozen.patterns);
        self.state = State::Prepared { automaton: Some(automaton), max_id };
        Ok(())
    }

    fn build_automaton(&mut self, patterns: &[Pattern]) -> CompiledAutomaton {
        let mut goto = GotoTable::build(patterns, true);
        self.stats.record(goto.state_count() * 256 * std::mem::size_of::<i32>());

        let _failure = build_failure_links(&mut goto);
        self.stats.record(goto.state_count() * std::mem::size_of::<u32>());

        let compiled = compile(&goto, patterns, self.force_32bit);
        let cell_bytes = match &compiled.delta {
            crate::delta::Delta::Sixteen(v) => v.len() * std::mem::size_of::<u16>(),
            crate::delta::Delta::ThirtyTwo(v) => v.len() * std::mem::size_of::<u32>(),
        };
        self.stats.record(cell_bytes);
        self.stats.record(compiled.outputs.iter().map(|o| o.len() * 4).sum());
        self.stats.record(compiled.pattern_list.len() * std::mem::size_of::<Option<(Vec<u8>, u16)>>());

        // goto and failure tables are transient (§3, §4.4); dropping here
        // frees them before the context becomes scan-ready.
        compiled
    }

    /// `search` (§4.5, §6): scan `buf`, populate `sink`, return the raw
    /// match-event count. Total — cannot fail, per §7.
    pub fn search(&self, thread_ctx: &mut ThreadContext, sink: &mut MatchSink, buf: &[u8]) -> u32 {
        match &self.state {
            State::Prepared { automaton: Some(automaton), .. } => scan(automaton, buf, sink, &mut thread_ctx.stats),
            _ => 0,
        }
    }

    /// Highest pattern id added, valid once the pattern set is non-empty.
    pub fn max_id(&self) -> u32 {
        match &self.state {
            State::Ingesting(store) => store.max_id(),
            State::Prepared { max_id, .. } => *max_id,
        }
    }

    pub fn is_prepared(&self) -> bool {
        matches!(self.state, State::Prepared { .. })
    }

    pub fn stats(&self) -> MpmStats {
        self.stats
    }

    /// `print_info` (§6): diagnostic dump, plain `eprintln!` — no logging
    /// framework dependency (SPEC_FULL ambient §B), matching the reference.
    pub fn print_info(&self) {
        match &self.state {
            State::Ingesting(store) => {
                eprintln!("pfac-mpm context: ingesting ({} patterns so far, not yet prepared)", store.len());
            }
            State::Prepared { automaton: None, .. } => {
                eprintln!("pfac-mpm context: prepared, empty pattern set (search always returns 0)");
            }
            State::Prepared { automaton: Some(automaton), max_id } => {
                let (state_count, width) = match &automaton.delta {
                    crate::delta::Delta::Sixteen(v) => (v.len() / 256, 16),
                    crate::delta::Delta::ThirtyTwo(v) => (v.len() / 256, 32),
                };
                eprintln!("pfac-mpm context: prepared");
                eprintln!("  states     : {state_count}");
                eprintln!("  delta width: {width}-bit");
                eprintln!("  max id     : {max_id}");
                eprintln!("  allocations: {}", self.stats.allocations);
                eprintln!("  bytes      : {}", self.stats.bytes);
            }
        }
    }
}

/// Per-thread scratch context (§6 `thread_context_init`). The reference
/// reserves a `reserved` argument for future use; this crate has nothing
/// to put there yet, so [`ThreadContext::new`] takes none.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadContext {
    stats: ScanStats,
}

impl ThreadContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stats(&self) -> ScanStats {
        self.stats
    }

    /// `print_search_stats` (§6).
    pub fn print_search_stats(&self) {
        self.stats.print_search_stats();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_pattern_set_prepares_to_zero_state() {
        let mut mpm = Mpm::new();
        mpm.prepare().unwrap();
        let mut tc = ThreadContext::new();
        let mut sink = MatchSink::new(16);
        let raw = mpm.search(&mut tc, &mut sink, b"anything at all");
        assert_eq!(raw, 0);
        assert!(sink.is_empty());
    }

    #[test]
    fn double_prepare_errors() {
        let mut mpm = Mpm::new();
        mpm.add_pattern_case_sensitive(b"abcd", 0, PatternFlags::default()).unwrap();
        mpm.prepare().unwrap();
        assert_eq!(mpm.prepare(), Err(MpmError::AlreadyPrepared));
    }

    #[test]
    fn add_after_prepare_errors() {
        let mut mpm = Mpm::new();
        mpm.prepare().unwrap();
        assert!(mpm.add_pattern_case_sensitive(b"abcd", 0, PatternFlags::default()).is_err());
    }

    #[test]
    fn end_to_end_scan() {
        let mut mpm = Mpm::new();
        mpm.add_pattern_case_sensitive(b"abcd", 0, PatternFlags::default()).unwrap();
        mpm.add_pattern_case_sensitive(b"bcde", 1, PatternFlags::default()).unwrap();
        mpm.prepare().unwrap();

        let mut tc = ThreadContext::new();
        let mut sink = MatchSink::new(16);
        let raw = mpm.search(&mut tc, &mut sink, b"xxabcdexx");
        assert_eq!(raw, 2);
        let mut ids = sink.ids().to_vec();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 1]);
        assert_eq!(tc.stats().raw_matches, 2);
    }
}
