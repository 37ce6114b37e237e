// SPDX-License-Identifier: Apache-2.0

//! Immutable byte sequence with content equality, a stable content hash, and
//! zero-copy slicing.
//!
//! [`Bytes`] is the L0 layer of the wire codec: every other layer (buffers,
//! varint/UTF-8 primitives, the codec runtime, generated codecs) is
//! expressed in terms of it. It wraps [`bytes::Bytes`] for the refcounted
//! storage and zero-copy slicing, and adds the semantics this codec needs on
//! top: a stable 32-bit content hash (xxh3-64 folded down) and base64/UTF-8
//! views.
//!
//! The hash is part of the public API and must not change between releases:
//! callers may persist it (e.g. as a cache key), so once published, changing
//! the algorithm is a breaking change.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, RangeBounds};

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD, URL_SAFE, URL_SAFE_NO_PAD};
use base64::Engine;
use thiserror::Error;

/// Errors surfaced by [`Bytes`] conversions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BytesError {
    /// The input was not valid base64 in any of the accepted alphabets.
    #[error("invalid base64 input")]
    InvalidBase64,
    /// The bytes were not valid UTF-8 at the given byte offset.
    #[error("invalid utf-8 at byte offset {0}")]
    InvalidUtf8(usize),
}

/// An immutable, cheaply-cloneable sequence of octets.
///
/// Equality and hashing are by content. Slicing never copies: it produces a
/// new `Bytes` sharing the same underlying allocation.
#[derive(Clone, Default)]
pub struct Bytes(bytes::Bytes);

impl Bytes {
    /// The empty byte sequence.
    pub const EMPTY: Bytes = Bytes(bytes::Bytes::new());

    /// Wraps a `'static` slice without copying.
    pub const fn from_static(slice: &'static [u8]) -> Self {
        Bytes(bytes::Bytes::from_static(slice))
    }

    /// Copies `slice` into a freshly owned buffer.
    pub fn copy_from_slice(slice: &[u8]) -> Self {
        Bytes(bytes::Bytes::copy_from_slice(slice))
    }

    /// Takes ownership of an existing `Vec<u8>` without copying.
    pub fn from_vec(vec: Vec<u8>) -> Self {
        Bytes(bytes::Bytes::from(vec))
    }

    /// Number of bytes in this sequence.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True iff this sequence has zero bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrows the content as a slice.
    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    /// Byte at `index`, or `None` if out of range.
    #[inline]
    pub fn get(&self, index: usize) -> Option<u8> {
        self.0.get(index).copied()
    }

    /// Returns a zero-copy slice of this sequence sharing the same backing
    /// allocation.
    ///
    /// # Panics
    /// Panics if `range` is out of bounds, matching `bytes::Bytes::slice`.
    pub fn slice(&self, range: impl RangeBounds<usize>) -> Self {
        Bytes(self.0.slice(range))
    }

    /// Decodes this sequence as UTF-8.
    pub fn as_utf8(&self) -> Result<&str, BytesError> {
        std::str::from_utf8(&self.0).map_err(|e| BytesError::InvalidUtf8(e.valid_up_to()))
    }

    /// Encodes as standard base64 with padding (the canonical emitted form
    /// for protobuf `bytes` fields in JSON, per the wire mapping table).
    pub fn to_base64(&self) -> String {
        STANDARD.encode(&self.0)
    }

    /// Decodes base64, accepting standard or URL-safe alphabets with or
    /// without padding, matching the lenient-read/canonical-write rule used
    /// by the JSON codec for `bytes` fields.
    pub fn from_base64(input: &str) -> Result<Self, BytesError> {
        for engine in [&STANDARD, &STANDARD_NO_PAD, &URL_SAFE, &URL_SAFE_NO_PAD] {
            if let Ok(decoded) = engine.decode(input) {
                return Ok(Bytes::from_vec(decoded));
            }
        }
        Err(BytesError::InvalidBase64)
    }

    /// Stable, version-independent 32-bit content hash (xxh3-64 folded to 32
    /// bits by XOR-ing the high and low halves).
    pub fn hash_code(&self) -> u32 {
        let full = xxhash_rust::xxh3::xxh3_64(&self.0);
        ((full >> 32) as u32) ^ (full as u32)
    }
}

impl Deref for Bytes {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for Bytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Bytes {
    fn from(vec: Vec<u8>) -> Self {
        Bytes::from_vec(vec)
    }
}

impl From<&[u8]> for Bytes {
    fn from(slice: &[u8]) -> Self {
        Bytes::copy_from_slice(slice)
    }
}

impl PartialEq for Bytes {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Bytes {}

impl Hash for Bytes {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(xxhash_rust::xxh3::xxh3_64(&self.0));
    }
}

impl PartialOrd for Bytes {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Bytes {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Lexicographic, unsigned byte comparison.
        self.0.as_ref().cmp(other.0.as_ref())
    }
}

impl fmt::Debug for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Bytes").field(&self.to_base64()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn equality_is_by_content() {
        let a = Bytes::copy_from_slice(b"hello");
        let b = Bytes::from_vec(b"hello".to_vec());
        assert_eq!(a, b);
        assert_ne!(a, Bytes::copy_from_slice(b"hellp"));
    }

    #[test]
    fn hash_is_deterministic_and_content_based() {
        let a = Bytes::copy_from_slice(b"the quick brown fox");
        let b = Bytes::copy_from_slice(b"the quick brown fox");
        assert_eq!(a.hash_code(), b.hash_code());
        assert_ne!(a.hash_code(), Bytes::copy_from_slice(b"the quick brown dog").hash_code());
    }

    #[test]
    fn slice_is_zero_copy_view() {
        let a = Bytes::copy_from_slice(b"hello world");
        let mid = a.slice(6..11);
        assert_eq!(mid.as_slice(), b"world");
    }

    #[test]
    fn base64_round_trip_standard_padded() {
        let a = Bytes::copy_from_slice(b"pbj wire format");
        let encoded = a.to_base64();
        let decoded = Bytes::from_base64(&encoded).unwrap();
        assert_eq!(a, decoded);
    }

    #[test]
    fn base64_accepts_url_safe_and_unpadded() {
        let standard = Bytes::from_base64("aGVsbG8=").unwrap();
        let url_safe_no_pad = Bytes::from_base64("aGVsbG8").unwrap();
        assert_eq!(standard, url_safe_no_pad);
    }

    #[test]
    fn utf8_round_trip() {
        let a = Bytes::copy_from_slice("héllo wörld".as_bytes());
        assert_eq!(a.as_utf8().unwrap(), "héllo wörld");
    }

    #[test]
    fn utf8_rejects_invalid_sequences() {
        let bad = Bytes::copy_from_slice(&[0xff, 0xfe]);
        assert!(bad.as_utf8().is_err());
    }
}
