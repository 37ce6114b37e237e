// SPDX-License-Identifier: Apache-2.0

//! L1: sequential (cursor-based) and random-access (offset-based) views over
//! heap arrays, off-heap memory, and I/O streams.
//!
//! Every view enforces `0 <= position <= limit <= capacity`; setters clamp
//! rather than panic, reads past `limit` fail with [`BufferError::Underflow`]
//! and writes past `limit` fail with [`BufferError::Overflow`]. This mirrors
//! the cursor discipline of a `java.nio.ByteBuffer`-style API, reworked as
//! plain Rust traits with `Result` returns instead of exceptions.

mod heap;
mod offheap;
mod random_access;
mod sequential;
mod stream;

pub use heap::BufferedData;
pub use offheap::OffHeapMemory;
pub use random_access::RandomAccessData;
pub use sequential::{ReadableSequentialData, SequentialData, WritableSequentialData};
pub use stream::{ReadableStreamingData, WritableStreamingData};

use thiserror::Error;

/// Sentinel capacity used by streaming buffers with no caller-provided
/// bound; effectively "unbounded" without using a saturating type.
pub const UNBOUNDED_CAPACITY: i64 = i64::MAX;

/// Failures intrinsic to the buffer abstraction itself (distinct from the
/// higher-level wire/codec error taxonomy in `pbj-runtime`, which wraps
/// these).
#[derive(Debug, Error)]
pub enum BufferError {
    /// A read was attempted past `limit` (or past stream EOF).
    #[error("buffer underflow: requested {requested} byte(s), {available} available")]
    Underflow { requested: usize, available: usize },
    /// A write was attempted past `limit`.
    #[error("buffer overflow: requested {requested} byte(s), {available} available")]
    Overflow { requested: usize, available: usize },
    /// The underlying stream (for streaming buffers) faulted.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type BufferResult<T> = Result<T, BufferError>;
