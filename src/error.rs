//! Error types for the matcher core.
use std::fmt;

/// Result type alias for MPM operations.
pub type Result<T> = std::result::Result<T, MpmError>;

/// Construction-time error taxonomy (§7). Scanning is total and never fails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MpmError {
    /// A pattern was rejected outright (currently unused at the call sites
    /// that prefer silent-ignore per spec, kept for API parity with
    /// malformed-input callers such as the C shim).
    InvalidPattern(String),

    /// Allocation failed while growing a construction-time structure.
    /// The reference implementation aborts the process; this crate surfaces
    /// it instead and leaves the context safe to drop.
    Resource(String),

    /// The BFS failure-construction queue could not be grown to hold the
    /// pattern set. With a growable `VecDeque` this is only reachable if
    /// the underlying allocation itself fails.
    TooManyPatterns(String),

    /// `prepare` was called a second time on an already-prepared context.
    AlreadyPrepared,

    /// Catch-all for anything else.
    Other(String),
}

impl fmt::Display for MpmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpmError::InvalidPattern(msg) => write!(f, "invalid pattern: {msg}"),
            MpmError::Resource(msg) => write!(f, "resource limit exceeded: {msg}"),
            MpmError::TooManyPatterns(msg) => write!(f, "too many patterns: {msg}"),
            MpmError::AlreadyPrepared => write!(f, "prepare() called on an already-prepared context"),
            MpmError::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for MpmError {}

impl From<String> for MpmError {
    fn from(msg: String) -> Self {
        MpmError::Other(msg)
    }
}

impl From<&str> for MpmError {
    fn from(msg: &str) -> Self {
        MpmError::Other(msg.to_string())
    }
}
