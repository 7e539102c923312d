//! Structured error type for the public API.
//!
//! [`BloscError::code`] maps each variant to the small negative integer
//! callers familiar with the C API's error-code convention expect at the
//! boundary, while the crate itself propagates a real error type
//! internally.

use thiserror::Error;

/// Everything that can go wrong during compression, decompression, or
/// getitem, plus the inspectors in [`crate::inspect`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BloscError {
    #[error("compression level {0} is out of range (expected 0..=9)")]
    InvalidClevel(u8),

    #[error("doshuffle flag {0} is out of range (expected 0 or 1)")]
    InvalidShuffleFlag(u8),

    #[error("input of {nbytes} bytes exceeds the maximum buffer size of {max} bytes")]
    BufferTooLarge { nbytes: usize, max: usize },

    #[error("compressor id {0} is not registered in this build")]
    UnsupportedCodec(u8),

    #[error("corrupt input: {0}")]
    CorruptInput(&'static str),

    #[error("inner codec produced more output than its reserved slot allowed: {0}")]
    InternalOverflow(&'static str),

    #[error("buffer is too short to contain a valid header: {0} bytes, need at least {1}")]
    HeaderTooShort(usize, usize),

    #[error("invalid out-of-range request: {0}")]
    InvalidRange(&'static str),
}

impl BloscError {
    /// Maps a variant to the small negative integer returned at the
    /// public boundary.
    pub fn code(&self) -> i32 {
        match self {
            BloscError::InvalidClevel(_)
            | BloscError::InvalidShuffleFlag(_)
            | BloscError::BufferTooLarge { .. } => -10,
            BloscError::UnsupportedCodec(_) => -5,
            BloscError::CorruptInput(_) | BloscError::HeaderTooShort(..) => -2,
            BloscError::InternalOverflow(_) => -1,
            BloscError::InvalidRange(_) => -1,
        }
    }
}

pub type Result<T> = std::result::Result<T, BloscError>;
