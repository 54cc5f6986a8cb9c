//! Property-based checks of the two generative invariants from §8 over
//! randomly generated pattern sets and haystacks (SPEC_FULL ambient §D),
//! using `proptest` the way the teacher's own property suite does.

use pfac_mpm::{MatchSink, Mpm, PatternFlags, ThreadContext};
use proptest::prelude::*;

fn ascii_word() -> impl Strategy<Value = String> {
    "[a-z]{1,6}"
}

proptest! {
    /// A pattern occurring k >= 1 times in the haystack is reported
    /// exactly once in the sink's id list, for arbitrary single-pattern
    /// repeated haystacks.
    #[test]
    fn idempotent_reporting(word in ascii_word(), repeats in 1usize..20) {
        let mut mpm = Mpm::new();
        mpm.add_pattern_case_sensitive(word.as_bytes(), 0, PatternFlags::default()).unwrap();
        mpm.prepare().unwrap();

        let haystack = word.repeat(repeats);
        let mut thread_ctx = ThreadContext::new();
        let mut sink = MatchSink::new(1);
        mpm.search(&mut thread_ctx, &mut sink, haystack.as_bytes());

        prop_assert_eq!(sink.ids(), &[0u32]);
    }

    /// Adding several patterns under the same id keeps only the first; the
    /// frozen pattern set reported by a scan never depends on later
    /// same-id insertions.
    #[test]
    fn dedup_by_id_on_construction(first in ascii_word(), second in ascii_word()) {
        prop_assume!(first != second && !second.contains(&first) && !first.contains(&second));

        let mut mpm = Mpm::new();
        mpm.add_pattern_case_sensitive(first.as_bytes(), 0, PatternFlags::default()).unwrap();
        mpm.add_pattern_case_sensitive(second.as_bytes(), 0, PatternFlags::default()).unwrap();
        mpm.prepare().unwrap();

        let mut thread_ctx = ThreadContext::new();
        let mut sink = MatchSink::new(1);
        mpm.search(&mut thread_ctx, &mut sink, second.as_bytes());
        prop_assert!(sink.is_empty(), "second same-id insertion must not take effect");

        sink.clear();
        mpm.search(&mut thread_ctx, &mut sink, first.as_bytes());
        prop_assert_eq!(sink.ids(), &[0u32]);
    }
}
