// SPDX-License-Identifier: Apache-2.0

use crate::offheap::OffHeapMemory;
use crate::random_access::RandomAccessData;
use crate::sequential::{ReadableSequentialData, SequentialData, WritableSequentialData};
use crate::{BufferError, BufferResult};
use pbj_bytes::Bytes;

enum Storage {
    Heap(Box<[u8]>),
    OffHeap(OffHeapMemory),
}

impl Storage {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Heap(b) => b,
            Storage::OffHeap(m) => m,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Heap(b) => b,
            Storage::OffHeap(m) => m,
        }
    }
}

/// A fixed-capacity buffer that is simultaneously a [`SequentialData`]
/// cursor and a [`RandomAccessData`] view, backed by either a heap
/// allocation or an off-heap one.
///
/// This is the concrete type generated codecs read from and write to; the
/// two allocation modes exist so that very large or short-lived buffers can
/// avoid pressuring the GC-equivalent (Rust's allocator/heap profile)
/// during hot parse/write loops.
pub struct BufferedData {
    storage: Storage,
    position: usize,
    limit: usize,
}

impl BufferedData {
    /// Wraps an existing heap-allocated buffer. `position` starts at 0 and
    /// `limit`/`capacity` are the buffer's length.
    pub fn wrap(bytes: Vec<u8>) -> Self {
        let len = bytes.len();
        BufferedData {
            storage: Storage::Heap(bytes.into_boxed_slice()),
            position: 0,
            limit: len,
        }
    }

    /// Allocates a zeroed heap buffer of `capacity` bytes, limit set to the
    /// full capacity.
    pub fn allocate(capacity: usize) -> Self {
        BufferedData::wrap(vec![0u8; capacity])
    }

    /// Allocates a zeroed off-heap buffer of `capacity` bytes. Falls back to
    /// an empty heap buffer if `capacity` is zero (off-heap allocation of
    /// zero bytes is not representable).
    pub fn allocate_off_heap(capacity: usize) -> Self {
        match OffHeapMemory::new(capacity) {
            Some(mem) => BufferedData {
                storage: Storage::OffHeap(mem),
                position: 0,
                limit: capacity,
            },
            None => BufferedData::wrap(Vec::new()),
        }
    }

    /// Whether this instance owns an off-heap allocation.
    pub fn is_off_heap(&self) -> bool {
        matches!(self.storage, Storage::OffHeap(_))
    }

    fn slice(&self) -> &[u8] {
        self.storage.as_slice()
    }

    fn slice_mut(&mut self) -> &mut [u8] {
        self.storage.as_mut_slice()
    }
}

impl SequentialData for BufferedData {
    fn position(&self) -> usize {
        self.position
    }

    fn set_position(&mut self, position: usize) {
        self.position = position.min(self.limit);
    }

    fn limit(&self) -> usize {
        self.limit
    }

    fn set_limit(&mut self, limit: usize) {
        self.limit = limit.min(self.capacity());
        self.position = self.position.min(self.limit);
    }

    fn capacity(&self) -> usize {
        self.slice().len()
    }
}

impl ReadableSequentialData for BufferedData {
    fn read_byte(&mut self) -> BufferResult<u8> {
        if self.remaining() < 1 {
            return Err(BufferError::Underflow {
                requested: 1,
                available: 0,
            });
        }
        let byte = self.slice()[self.position];
        self.position += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, dst: &mut [u8]) -> BufferResult<()> {
        if self.remaining() < dst.len() {
            return Err(BufferError::Underflow {
                requested: dst.len(),
                available: self.remaining(),
            });
        }
        let start = self.position;
        dst.copy_from_slice(&self.slice()[start..start + dst.len()]);
        self.position += dst.len();
        Ok(())
    }
}

impl WritableSequentialData for BufferedData {
    fn write_byte(&mut self, byte: u8) -> BufferResult<()> {
        if self.remaining() < 1 {
            return Err(BufferError::Overflow {
                requested: 1,
                available: 0,
            });
        }
        let pos = self.position;
        self.slice_mut()[pos] = byte;
        self.position += 1;
        Ok(())
    }

    fn write_bytes(&mut self, src: &[u8]) -> BufferResult<()> {
        if self.remaining() < src.len() {
            return Err(BufferError::Overflow {
                requested: src.len(),
                available: self.remaining(),
            });
        }
        let start = self.position;
        self.slice_mut()[start..start + src.len()].copy_from_slice(src);
        self.position += src.len();
        Ok(())
    }
}

impl RandomAccessData for BufferedData {
    fn length(&self) -> usize {
        self.limit
    }

    fn get_byte(&self, offset: usize) -> BufferResult<u8> {
        if offset >= self.limit {
            return Err(BufferError::Underflow {
                requested: 1,
                available: self.limit.saturating_sub(offset),
            });
        }
        Ok(self.slice()[offset])
    }

    fn get_bytes(&self, offset: usize, len: usize) -> BufferResult<Bytes> {
        if offset + len > self.limit {
            return Err(BufferError::Underflow {
                requested: len,
                available: self.limit.saturating_sub(offset),
            });
        }
        Ok(Bytes::copy_from_slice(&self.slice()[offset..offset + len]))
    }

    fn contains(&self, offset: usize, pattern: &[u8]) -> bool {
        if offset + pattern.len() > self.limit {
            return false;
        }
        &self.slice()[offset..offset + pattern.len()] == pattern
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn invariants_clamp_rather_than_panic() {
        let mut buf = BufferedData::wrap(vec![1, 2, 3, 4]);
        buf.set_limit(100);
        assert_eq!(buf.limit(), 4);
        buf.set_position(100);
        assert_eq!(buf.position(), 4);
    }

    #[test]
    fn read_write_round_trip() {
        let mut buf = BufferedData::allocate(8);
        buf.write_bytes(&[1, 2, 3, 4]).unwrap();
        buf.set_position(0);
        buf.set_limit(4);
        let mut out = [0u8; 4];
        buf.read_bytes(&mut out).unwrap();
        assert_eq!(out, [1, 2, 3, 4]);
    }

    #[test]
    fn read_past_limit_is_underflow() {
        let mut buf = BufferedData::wrap(vec![1, 2]);
        buf.set_limit(1);
        let mut out = [0u8; 2];
        assert!(matches!(
            buf.read_bytes(&mut out),
            Err(BufferError::Underflow { .. })
        ));
    }

    #[test]
    fn random_access_reads_past_limit_are_underflow() {
        let buf = BufferedData::wrap(vec![1, 2]);
        let mut shrunk = BufferedData::wrap(vec![1, 2]);
        shrunk.set_limit(1);
        assert_eq!(buf.get_byte(1).unwrap(), 2);
        assert!(matches!(
            shrunk.get_byte(1),
            Err(BufferError::Underflow { .. })
        ));
        assert!(matches!(
            shrunk.get_bytes(0, 2),
            Err(BufferError::Underflow { .. })
        ));
        assert!(!shrunk.contains(0, &[1, 2]));
        assert!(shrunk.contains(0, &[1]));
    }

    #[test]
    fn write_past_limit_is_overflow() {
        let mut buf = BufferedData::allocate(1);
        assert!(matches!(
            buf.write_bytes(&[1, 2]),
            Err(BufferError::Overflow { .. })
        ));
    }

    #[test]
    fn writable_skip_advances_by_exactly_n_zero_bytes() {
        let mut buf = BufferedData::allocate(4);
        buf.write_byte(0xff).unwrap();
        buf.skip(3).unwrap();
        assert_eq!(buf.position(), 4);
        buf.set_position(0);
        buf.set_limit(4);
        let mut out = [0u8; 4];
        buf.read_bytes(&mut out).unwrap();
        assert_eq!(out, [0xff, 0, 0, 0]);
    }

    #[test]
    fn off_heap_round_trip() {
        let mut buf = BufferedData::allocate_off_heap(4);
        assert!(buf.is_off_heap());
        buf.write_bytes(&[9, 8, 7, 6]).unwrap();
        assert_eq!(buf.get_bytes(0, 4).unwrap().as_slice(), &[9, 8, 7, 6]);
    }

    #[test]
    fn var_long_reads_without_moving_cursor() {
        let buf = BufferedData::wrap(vec![0xAC, 0x02]);
        let (value, len) = buf.get_var_long(0).unwrap();
        assert_eq!(value, 300);
        assert_eq!(len, 2);
        assert_eq!(buf.position(), 0);
    }

    #[test]
    fn contains_and_matches_prefix() {
        let buf = BufferedData::wrap(b"protobuf-wire".to_vec());
        assert!(buf.matches_prefix(b"proto"));
        assert!(buf.contains(9, b"wire"));
        assert!(!buf.contains(9, b"fire"));
    }

    #[test]
    fn compare_to_is_lexicographic_unsigned() {
        let a = BufferedData::wrap(vec![1, 2, 3]);
        let b = BufferedData::wrap(vec![1, 2, 4]);
        assert_eq!(a.compare_to(&b), std::cmp::Ordering::Less);
    }
}
