// SPDX-License-Identifier: Apache-2.0

use crate::sequential::{ReadableSequentialData, SequentialData, WritableSequentialData};
use crate::{BufferError, BufferResult, UNBOUNDED_CAPACITY};
use std::io::{Read, Write};

/// A [`SequentialData`] reader over an arbitrary [`Read`] stream.
///
/// `capacity` is either a caller-provided bound or [`UNBOUNDED_CAPACITY`];
/// `limit` is always clamped into `[position, capacity]`. Reads beyond the
/// limit, or past actual stream EOF, both surface as
/// [`BufferError::Underflow`].
pub struct ReadableStreamingData<R: Read> {
    inner: R,
    position: usize,
    capacity: i64,
    limit: usize,
}

impl<R: Read> ReadableStreamingData<R> {
    /// Wraps `inner` with no caller-imposed bound (capacity is the sentinel
    /// [`UNBOUNDED_CAPACITY`]).
    pub fn new(inner: R) -> Self {
        ReadableStreamingData {
            inner,
            position: 0,
            capacity: UNBOUNDED_CAPACITY,
            limit: UNBOUNDED_CAPACITY as usize,
        }
    }

    /// Wraps `inner`, bounding the stream to at most `capacity` bytes.
    pub fn bounded(inner: R, capacity: usize) -> Self {
        ReadableStreamingData {
            inner,
            position: 0,
            capacity: capacity as i64,
            limit: capacity,
        }
    }

    /// Drops this view, closing nothing itself: streaming readers over a
    /// borrowed `Read` have no ownership to release. Owned-stream callers
    /// should simply let the wrapped value drop.
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> SequentialData for ReadableStreamingData<R> {
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
        let cap = self.capacity();
        self.limit = limit.clamp(self.position, cap);
    }

    fn capacity(&self) -> usize {
        if self.capacity == UNBOUNDED_CAPACITY {
            usize::MAX
        } else {
            self.capacity as usize
        }
    }
}

impl<R: Read> ReadableSequentialData for ReadableStreamingData<R> {
    fn read_byte(&mut self) -> BufferResult<u8> {
        if self.remaining() < 1 {
            return Err(BufferError::Underflow {
                requested: 1,
                available: 0,
            });
        }
        let mut buf = [0u8; 1];
        self.inner.read_exact(&mut buf).map_err(|e| to_underflow(e, 1))?;
        self.position += 1;
        Ok(buf[0])
    }

    fn read_bytes(&mut self, dst: &mut [u8]) -> BufferResult<()> {
        if self.remaining() < dst.len() {
            return Err(BufferError::Underflow {
                requested: dst.len(),
                available: self.remaining(),
            });
        }
        self.inner.read_exact(dst).map_err(|e| to_underflow(e, dst.len()))?;
        self.position += dst.len();
        Ok(())
    }
}

fn to_underflow(err: std::io::Error, requested: usize) -> BufferError {
    if err.kind() == std::io::ErrorKind::UnexpectedEof {
        BufferError::Underflow {
            requested,
            available: 0,
        }
    } else {
        BufferError::Io(err)
    }
}

/// A [`SequentialData`] writer over an arbitrary [`Write`] stream.
pub struct WritableStreamingData<W: Write> {
    inner: W,
    position: usize,
    capacity: i64,
    limit: usize,
}

impl<W: Write> WritableStreamingData<W> {
    pub fn new(inner: W) -> Self {
        WritableStreamingData {
            inner,
            position: 0,
            capacity: UNBOUNDED_CAPACITY,
            limit: UNBOUNDED_CAPACITY as usize,
        }
    }

    pub fn bounded(inner: W, capacity: usize) -> Self {
        WritableStreamingData {
            inner,
            position: 0,
            capacity: capacity as i64,
            limit: capacity,
        }
    }

    /// Forwards to the underlying stream's `flush`.
    pub fn flush(&mut self) -> BufferResult<()> {
        self.inner.flush().map_err(BufferError::Io)
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> SequentialData for WritableStreamingData<W> {
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
        let cap = self.capacity();
        self.limit = limit.clamp(self.position, cap);
    }

    fn capacity(&self) -> usize {
        if self.capacity == UNBOUNDED_CAPACITY {
            usize::MAX
        } else {
            self.capacity as usize
        }
    }
}

impl<W: Write> WritableSequentialData for WritableStreamingData<W> {
    fn write_byte(&mut self, byte: u8) -> BufferResult<()> {
        if self.remaining() < 1 {
            return Err(BufferError::Overflow {
                requested: 1,
                available: 0,
            });
        }
        self.inner.write_all(&[byte]).map_err(BufferError::Io)?;
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
        self.inner.write_all(src).map_err(BufferError::Io)?;
        self.position += src.len();
        Ok(())
    }

    /// Advances `position` by exactly `n`, writing `n` zero bytes to the
    /// stream in fixed-size chunks. The historical implementation this is
    /// modeled on computed the chunk size as `max(count, remaining())`,
    /// which could write far more than requested; this corrected version
    /// uses `min` so a bounded stream is never over-written.
    fn skip(&mut self, n: usize) -> BufferResult<()> {
        const ZEROES: [u8; 256] = [0u8; 256];
        if self.remaining() < n {
            return Err(BufferError::Overflow {
                requested: n,
                available: self.remaining(),
            });
        }
        let mut left = n;
        while left > 0 {
            let chunk = left.min(ZEROES.len());
            self.write_bytes(&ZEROES[..chunk])?;
            left -= chunk;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Cursor;

    #[test]
    fn readable_stream_underflow_on_eof() {
        let mut r = ReadableStreamingData::new(Cursor::new(vec![1, 2]));
        let mut out = [0u8; 3];
        assert!(matches!(
            r.read_bytes(&mut out),
            Err(BufferError::Underflow { .. })
        ));
    }

    #[test]
    fn writable_stream_bounded_overflow() {
        let mut w = WritableStreamingData::bounded(Vec::new(), 2);
        assert!(w.write_bytes(&[1, 2]).is_ok());
        assert!(matches!(
            w.write_bytes(&[3]),
            Err(BufferError::Overflow { .. })
        ));
    }

    #[test]
    fn writable_stream_skip_writes_exact_zero_run() {
        let mut w = WritableStreamingData::new(Vec::new());
        w.write_byte(0xAA).unwrap();
        w.skip(5).unwrap();
        assert_eq!(w.position(), 6);
        let buf = w.into_inner();
        assert_eq!(buf, vec![0xAA, 0, 0, 0, 0, 0]);
    }

    #[test]
    fn flush_forwards_to_underlying_stream() {
        let mut w = WritableStreamingData::new(Vec::new());
        w.write_byte(1).unwrap();
        assert!(w.flush().is_ok());
    }
}
