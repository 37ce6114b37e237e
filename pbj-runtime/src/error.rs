// SPDX-License-Identifier: Apache-2.0

use pbj_buffer::BufferError;
use pbj_wire::{WireError, WireType};
use thiserror::Error;

/// The full error taxonomy a generated codec can surface. Each kind is its
/// own case rather than a single opaque error, so callers (and fuzzers) can
/// match on exactly what went wrong.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CodecErrorKind {
    #[error("malformed varint")]
    MalformedVarint,
    #[error("field {field} has wire type {got:?}, expected {expected:?}")]
    WireTypeMismatch {
        field: u32,
        got: WireType,
        expected: WireType,
    },
    #[error("malformed utf-8 string")]
    MalformedString,
    #[error("truncated: fewer bytes remain than the field requires")]
    Truncated,
    #[error("recursion-depth guard exceeded")]
    MaxDepthExceeded,
    #[error("field number is zero, negative, or exceeds 2^29-1")]
    BadField,
    #[error("unrecognised enum value in strict mode")]
    UnrecognisedEnumStrict,
    #[error("i/o error")]
    Io,
    #[error("write exceeded the output buffer")]
    Overflow,
}

/// A parse/write failure, with the field (when known) and byte offset it
/// occurred at, to aid fuzz debugging. `parse` is total: it always returns
/// either a complete record or one of these, never a partially-built record.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind} (field={field:?}, offset={offset})")]
pub struct CodecError {
    pub kind: CodecErrorKind,
    pub field: Option<u32>,
    pub offset: usize,
}

impl CodecError {
    pub fn new(kind: CodecErrorKind, field: Option<u32>, offset: usize) -> Self {
        CodecError { kind, field, offset }
    }

    /// Rewrites the byte offset on an error that was constructed (or
    /// converted via `From`) without one, e.g. right after a `WireError`
    /// crossed into the codec layer and the caller knows the true offset.
    pub fn at(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

impl From<WireError> for CodecError {
    fn from(e: WireError) -> Self {
        let kind = match e {
            WireError::MalformedVarint => CodecErrorKind::MalformedVarint,
            WireError::MalformedString => CodecErrorKind::MalformedString,
            WireError::BadField => CodecErrorKind::BadField,
        };
        CodecError::new(kind, None, 0)
    }
}

impl From<BufferError> for CodecError {
    fn from(e: BufferError) -> Self {
        let kind = match e {
            BufferError::Underflow { .. } => CodecErrorKind::Truncated,
            BufferError::Overflow { .. } => CodecErrorKind::Overflow,
            BufferError::Io(_) => CodecErrorKind::Io,
        };
        CodecError::new(kind, None, 0)
    }
}
