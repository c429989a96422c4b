//! Error types for slotwire.

use thiserror::Error;

/// Main error type for all slotwire operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotwireError {
    /// A frame or buffer is shorter than a decode/encode step requires.
    #[error("insufficient bytes: need {needed}, have {available}")]
    InsufficientBytes { needed: usize, available: usize },

    /// Key longer than the 64-byte limit.
    #[error("key is too big")]
    KeyTooBig,

    /// Value longer than the 1024-byte limit.
    #[error("value is too big")]
    ValueTooBig,

    /// Zero-length key.
    #[error("key is blank")]
    BlankKey,

    /// Embedded sequence does not match the expected next sequence
    /// (replayed, reordered, or desynchronized frame).
    #[error("version mismatch: expected {expected}, got {found}")]
    VersionMismatch { expected: u32, found: u32 },

    /// Frame tag outside the known command set.
    #[error("unknown command {0}")]
    UnknownCommand(u8),

    /// Every slot is occupied by a different key.
    #[error("store is full")]
    StoreFull,

    /// Error surfaced by a caller-supplied handler or iteration visitor.
    #[error("handler error: {0}")]
    Handler(String),
}

/// Result type alias using SlotwireError.
pub type Result<T> = std::result::Result<T, SlotwireError>;
