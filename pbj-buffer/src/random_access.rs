// SPDX-License-Identifier: Apache-2.0

use crate::{BufferError, BufferResult};
use pbj_bytes::Bytes;
use std::cmp::Ordering;
use std::io::Write;

/// Offset-based (non-cursor) view over a fixed span of bytes.
///
/// Unlike [`crate::SequentialData`], none of these operations move a
/// cursor; every access takes an explicit offset. Multi-byte accessors are
/// big-endian, matching the convention of the public `getInt`/`getLong`
/// style accessor in the prior art this is modeled on; wire-format code
/// instead uses the little-endian accessors on [`crate::SequentialData`].
pub trait RandomAccessData {
    /// Total number of addressable bytes.
    fn length(&self) -> usize;

    /// Single byte at `offset`.
    fn get_byte(&self, offset: usize) -> BufferResult<u8>;

    /// Copies `len` bytes starting at `offset`.
    fn get_bytes(&self, offset: usize, len: usize) -> BufferResult<Bytes>;

    /// Big-endian 32-bit integer at `offset`.
    fn get_int(&self, offset: usize) -> BufferResult<i32> {
        let mut buf = [0u8; 4];
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.get_byte(offset + i)?;
        }
        Ok(i32::from_be_bytes(buf))
    }

    /// Big-endian 64-bit integer at `offset`.
    fn get_long(&self, offset: usize) -> BufferResult<i64> {
        let mut buf = [0u8; 8];
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.get_byte(offset + i)?;
        }
        Ok(i64::from_be_bytes(buf))
    }

    /// Little-endian 32-bit integer at `offset`; used internally by codecs
    /// (`fixed32`/`sfixed32`/`float`), kept separate from the big-endian
    /// public accessor above.
    fn get_int_le(&self, offset: usize) -> BufferResult<i32> {
        let mut buf = [0u8; 4];
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.get_byte(offset + i)?;
        }
        Ok(i32::from_le_bytes(buf))
    }

    /// Little-endian 64-bit integer at `offset`.
    fn get_long_le(&self, offset: usize) -> BufferResult<i64> {
        let mut buf = [0u8; 8];
        for (i, slot) in buf.iter_mut().enumerate() {
            *slot = self.get_byte(offset + i)?;
        }
        Ok(i64::from_le_bytes(buf))
    }

    /// Reads a varint at an arbitrary offset without moving any cursor.
    /// Returns the decoded value and the number of bytes it occupied.
    fn get_var_long(&self, offset: usize) -> BufferResult<(u64, usize)> {
        let mut result: u64 = 0;
        let mut shift = 0u32;
        let mut i = 0usize;
        loop {
            if i == 10 {
                return Err(BufferError::Underflow {
                    requested: 1,
                    available: 0,
                });
            }
            let byte = self.get_byte(offset + i)?;
            i += 1;
            if shift < 63 {
                result |= ((byte & 0x7F) as u64) << shift;
            }
            if byte & 0x80 == 0 {
                break;
            }
            shift += 7;
        }
        Ok((result, i))
    }

    /// Writes `len` bytes starting at `offset` to `out`.
    fn write_to(&self, out: &mut dyn Write, offset: usize, len: usize) -> BufferResult<()> {
        let bytes = self.get_bytes(offset, len)?;
        out.write_all(bytes.as_slice()).map_err(BufferError::Io)
    }

    /// Zero-allocation check that `pattern` occurs at `offset`.
    fn contains(&self, offset: usize, pattern: &[u8]) -> bool {
        if offset + pattern.len() > self.length() {
            return false;
        }
        // Eight-byte block compare for longer patterns, falling back to a
        // byte-by-byte tail; on a heap-backed implementation this degrades
        // to a direct slice comparison via the overridden impl.
        let mut i = 0;
        while i + 8 <= pattern.len() {
            let mut window = [0u8; 8];
            for (j, slot) in window.iter_mut().enumerate() {
                match self.get_byte(offset + i + j) {
                    Ok(b) => *slot = b,
                    Err(_) => return false,
                }
            }
            if window != pattern[i..i + 8] {
                return false;
            }
            i += 8;
        }
        while i < pattern.len() {
            match self.get_byte(offset + i) {
                Ok(b) if b == pattern[i] => {}
                _ => return false,
            }
            i += 1;
        }
        true
    }

    /// Equivalent to `contains(0, pattern)`.
    fn matches_prefix(&self, pattern: &[u8]) -> bool {
        self.contains(0, pattern)
    }

    /// Lexicographic, unsigned-byte comparison against another view.
    fn compare_to(&self, other: &dyn RandomAccessData) -> Ordering {
        let len = self.length().min(other.length());
        for i in 0..len {
            // Both offsets are within bounds by construction of `len`.
            let a = self.get_byte(i).unwrap_or(0);
            let b = other.get_byte(i).unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        self.length().cmp(&other.length())
    }
}
