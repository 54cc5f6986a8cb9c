//! Pattern ingestion and deduplication (§4.1).
//!
//! Patterns accumulate here during construction. Insertion is keyed by
//! caller-chosen `id`; a second `add` with an id already present is a
//! silent no-op (`IdCollision`, §7) — the first insertion for a given id
//! always wins, regardless of what bytes the later call carries. That
//! requires probing by `id` alone: a content-derived hash (§4.1's cheap
//! `len · bytes[0] + bytes[1]` bucket) cannot answer "does this id already
//! exist" because two patterns sharing an id but differing in bytes land
//! in different buckets. So the dedup index here is a plain `id -> index`
//! map, discarded once [`PatternStore::freeze`] hands the frozen array to
//! the trie builder.

use crate::error::Result;
use std::collections::HashMap;

/// Per-pattern flag bits. Only `NOCASE` is defined; the bit set is left
/// open (a `u8`) the way the reference's pattern flags are a bare bit field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PatternFlags(pub u8);

impl PatternFlags {
    /// Case-insensitive pattern: the automaton state reached by this
    /// pattern requires no byte-exact re-check at scan time.
    pub const NOCASE: PatternFlags = PatternFlags(1);

    pub fn contains(&self, other: PatternFlags) -> bool {
        self.0 & other.0 != 0
    }
}

impl std::ops::BitOr for PatternFlags {
    type Output = PatternFlags;
    fn bitor(self, rhs: PatternFlags) -> PatternFlags {
        PatternFlags(self.0 | rhs.0)
    }
}

/// A single ingested pattern (§3).
#[derive(Debug, Clone)]
pub struct Pattern {
    pub id: u32,
    pub length: u16,
    pub flags: PatternFlags,
    pub original: Vec<u8>,
    /// ASCII-uppercase-lowered view, always computed and always what the
    /// trie is built from — case sensitivity is enforced by a post-match
    /// verify against `exact`, never by the automaton itself.
    pub folded: Vec<u8>,
    /// `folded` when the pattern is case-insensitive or was already
    /// lowercase; otherwise a copy of `original`.
    pub exact: Vec<u8>,
}

impl Pattern {
    /// True when a scan match at this pattern's terminal state requires a
    /// byte-exact re-check of `exact` before being reported.
    pub fn needs_verify(&self) -> bool {
        !self.flags.contains(PatternFlags::NOCASE) && self.exact != self.folded
    }
}

fn fold_ascii(bytes: &[u8]) -> Vec<u8> {
    bytes.iter().map(|b| b.to_ascii_lowercase()).collect()
}

/// Accumulates unique patterns during ingestion; produces a frozen,
/// contiguous array at `freeze` time.
pub struct PatternStore {
    patterns: Vec<Pattern>,
    /// Dedup index: id -> index into `patterns`.
    by_id: HashMap<u32, u32>,
    max_id: u32,
    max_len: usize,
    min_len: usize,
}

impl Default for PatternStore {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternStore {
    pub fn new() -> Self {
        Self {
            patterns: Vec::new(),
            by_id: HashMap::new(),
            max_id: 0,
            max_len: 0,
            min_len: usize::MAX,
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    pub fn max_id(&self) -> u32 {
        self.max_id
    }

    /// Add a pattern under caller-controlled flags. Zero-length patterns
    /// are silently ignored (`InvalidArgument`, §7 — logged and ignored,
    /// returns success). An id collision is silently ignored too.
    pub fn add(&mut self, bytes: &[u8], id: u32, flags: PatternFlags) -> Result<()> {
        if bytes.is_empty() {
            return Ok(());
        }

        if self.by_id.contains_key(&id) {
            // IdCollision: first insertion wins, ignore the rest.
            return Ok(());
        }

        let folded = fold_ascii(bytes);
        let nocase = flags.contains(PatternFlags::NOCASE);
        let exact = if nocase || bytes == folded.as_slice() {
            folded.clone()
        } else {
            bytes.to_vec()
        };

        let pattern = Pattern {
            id,
            length: bytes.len() as u16,
            flags,
            original: bytes.to_vec(),
            folded,
            exact,
        };

        let index = self.patterns.len() as u32;
        self.patterns.push(pattern);
        self.by_id.insert(id, index);

        self.max_id = self.max_id.max(id);
        self.max_len = self.max_len.max(bytes.len());
        self.min_len = self.min_len.min(bytes.len());

        Ok(())
    }

    /// Add a pattern forcing case-sensitive flags (clears `NOCASE`).
    pub fn add_case_sensitive(&mut self, bytes: &[u8], id: u32, flags: PatternFlags) -> Result<()> {
        self.add(bytes, id, PatternFlags(flags.0 & !PatternFlags::NOCASE.0))
    }

    /// Add a pattern forcing `NOCASE` into the flag set.
    pub fn add_case_insensitive(&mut self, bytes: &[u8], id: u32, flags: PatternFlags) -> Result<()> {
        self.add(bytes, id, flags | PatternFlags::NOCASE)
    }

    /// Freeze the store: produce a contiguous pattern array and discard the
    /// insertion index. Not idempotent — the store is consumed.
    pub fn freeze(self) -> FrozenPatterns {
        FrozenPatterns {
            patterns: self.patterns,
            max_id: self.max_id,
        }
    }
}

/// The pattern set as handed to the trie builder: a contiguous array, order
/// stable for a given sequence of `add` calls, insertion index discarded.
pub struct FrozenPatterns {
    pub patterns: Vec<Pattern>,
    pub max_id: u32,
}
