//! Error types for tokenfield-core.

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors from the core plumbing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoreError {
    /// The timer ID is invalid or has already fired or been cancelled.
    #[error("invalid or expired timer ID")]
    InvalidTimer,

    /// Deferred work kept re-posting itself past the per-tick limit.
    #[error("deferred work did not settle within {limit} rounds")]
    TickOverflow { limit: usize },
}
