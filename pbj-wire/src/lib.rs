// SPDX-License-Identifier: Apache-2.0

//! L2: varint/zig-zag coding, tags, fixed-width primitives, and strict UTF-8
//! helpers. Everything here is branch-light and allocation-free so that the
//! codec runtime built on top (`pbj-runtime`) can parse and write without
//! per-field allocation.

pub mod tag;
pub mod utf8;
pub mod varint;
pub mod zigzag;

pub use tag::{Tag, WireType, MAX_FIELD_NUMBER, MIN_FIELD_NUMBER};

use thiserror::Error;

/// Failures intrinsic to the wire-primitive layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WireError {
    /// A varint's continuation bit never cleared within 10 bytes, or its
    /// value exceeds what fits in 64 bits.
    #[error("malformed varint")]
    MalformedVarint,
    /// A string field contained invalid UTF-8, or encoding hit an unpaired
    /// surrogate.
    #[error("malformed utf-8 string")]
    MalformedString,
    /// A field number was zero, negative, or exceeded 2^29-1, or the wire
    /// type was one of the unsupported group types (3/4).
    #[error("invalid field number or wire type")]
    BadField,
}

pub type WireResult<T> = Result<T, WireError>;
