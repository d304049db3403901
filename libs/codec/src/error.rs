//! Codec-level errors.
//!
//! Every variant here is fatal for the operation that raised it: a bounds or
//! truncation failure means the buffer cannot be trusted at all, so no
//! partial output is ever returned.

use thiserror::Error;

/// Errors raised while encoding or decoding any of the bridge's byte
/// layouts.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Backward-cursor arithmetic would cross the start of the buffer.
    #[error("cursor underflow: need {need} bytes, cursor at {cursor}")]
    Bounds { need: usize, cursor: usize },

    /// A declared length does not fit the remaining buffer.
    #[error("truncated input: need {need} bytes, {got} available")]
    Truncated { need: usize, got: usize },

    /// A whole-structure decode or encode did not consume the buffer
    /// exactly. Catches both truncation and over-read.
    #[error("{remaining} bytes left unconsumed after decode")]
    TrailingBytes { remaining: usize },

    /// AM package version other than the supported one.
    #[error("unsupported AM package version {got}")]
    Version { got: u32 },

    /// A fixed-width field arrived with the wrong width.
    #[error("field must be {expected} bytes, got {got}")]
    FieldWidth { expected: usize, got: usize },

    /// A domain name field was not valid UTF-8.
    #[error("domain name is not valid utf-8")]
    InvalidDomain,

    /// A proof envelope was structurally valid TLV but semantically broken.
    #[error("malformed proof envelope: {0}")]
    MalformedProof(String),
}

pub type CodecResult<T> = std::result::Result<T, CodecError>;
