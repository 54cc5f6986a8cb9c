//! pfac-mpm: a failureless Aho-Corasick multi-pattern matcher core.
//!
//! Given a set of byte patterns, each tagged with a caller-chosen 32-bit
//! identifier and an optional case-insensitivity flag, this crate builds a
//! compiled automaton and scans input buffers for every pattern occurrence,
//! reporting the set of matched pattern ids. It implements the "parallel
//! failureless AC" (PFAC) construction used in signature-matching engines:
//! failure-link traversal is folded away at build time into a dense
//! transition table, and the scan kernel recovers all-occurrence semantics
//! by restarting the automaton at every input offset instead.
//!
//! # Quick start
//!
//! ```
//! use pfac_mpm::{Mpm, ThreadContext, MatchSink, PatternFlags};
//!
//! let mut mpm = Mpm::new();
//! mpm.add_pattern_case_sensitive(b"abcd", 0, PatternFlags::default()).unwrap();
//! mpm.add_pattern_case_insensitive(b"XYZ", 1, PatternFlags::default()).unwrap();
//! mpm.prepare().unwrap();
//!
//! let mut thread_ctx = ThreadContext::new();
//! let mut sink = MatchSink::new(mpm.max_id() + 1);
//! let raw = mpm.search(&mut thread_ctx, &mut sink, b"...abcd...xyz...");
//!
//! assert_eq!(raw, 2);
//! assert!(sink.ids().contains(&0));
//! assert!(sink.ids().contains(&1));
//! ```
//!
//! # What this crate is not
//!
//! It is the matching core only: no regex, no anchored/offset/depth
//! filtering, no incremental or streaming matching across buffer
//! boundaries, and no pattern removal after [`Mpm::prepare`]. Callers
//! needing those belong to the enclosing detection engine, which is out of
//! scope here (it supplies patterns and consumes the resulting match sets).

#![warn(missing_docs)]
#![allow(clippy::needless_range_loop)]

/// Compiled transition table (goto+failure folded into a dense `state x
/// 256` array) and the scan-time output/pattern-verify tables (§4.4).
pub mod delta;
/// Construction-time error taxonomy (§7).
pub mod error;
/// Breadth-first failure-link construction and output-set merging (§4.3).
pub mod failure;
/// Lifecycle glue: [`context::Mpm`] and [`context::ThreadContext`] (§4.7, §6).
pub mod context;
/// Pattern ingestion, case-folding, and dedup-by-id (§4.1).
pub mod pattern;
/// Scan kernel: drives the compiled automaton over an input buffer (§4.5).
pub mod scan;
/// Caller-owned deduplicating match-id collector (§4.6).
pub mod sink;
/// Trie / goto table construction (§4.2).
pub mod trie;

/// `extern "C"` shim mirroring §6's function-level surface, for callers
/// embedding this core from C/C++. Feature-gated so plain Rust consumers
/// don't pay for it.
#[cfg(feature = "capi")]
pub mod c_api;

pub use crate::context::{Mpm, MpmStats, ThreadContext};
pub use crate::error::{MpmError, Result};
pub use crate::pattern::PatternFlags;
pub use crate::scan::ScanStats;
pub use crate::sink::MatchSink;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
