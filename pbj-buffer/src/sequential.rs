// SPDX-License-Identifier: Apache-2.0

use crate::{BufferError, BufferResult};

/// Cursor state shared by readable and writable sequential views:
/// `position <= limit <= capacity`, all clamped by setters, never panicking.
pub trait SequentialData {
    /// Current cursor offset.
    fn position(&self) -> usize;

    /// Sets the cursor, clamped to `[0, limit]`.
    fn set_position(&mut self, position: usize);

    /// The high-water mark reads/writes may not cross.
    fn limit(&self) -> usize;

    /// Sets the limit, clamped to `[position, capacity]`.
    fn set_limit(&mut self, limit: usize);

    /// Total addressable size backing this view.
    fn capacity(&self) -> usize;

    /// Bytes between `position` and `limit`.
    #[inline]
    fn remaining(&self) -> usize {
        self.limit().saturating_sub(self.position())
    }

    #[inline]
    fn has_remaining(&self) -> bool {
        self.remaining() > 0
    }

    /// Resets `position` to zero and `limit` to `capacity`.
    fn clear(&mut self) {
        self.set_position(0);
        self.set_limit(self.capacity());
    }
}

/// Directional reads over a [`SequentialData`] cursor.
pub trait ReadableSequentialData: SequentialData {
    /// Reads exactly one byte, advancing `position` by one.
    fn read_byte(&mut self) -> BufferResult<u8>;

    /// Fills `dst` entirely from the buffer, advancing `position` by
    /// `dst.len()`.
    fn read_bytes(&mut self, dst: &mut [u8]) -> BufferResult<()>;

    /// Advances `position` by `n` without returning the skipped bytes.
    fn skip(&mut self, n: usize) -> BufferResult<()> {
        if self.remaining() < n {
            return Err(BufferError::Underflow {
                requested: n,
                available: self.remaining(),
            });
        }
        self.set_position(self.position() + n);
        Ok(())
    }

    /// Reads a little-endian `f32`.
    fn read_float(&mut self) -> BufferResult<f32> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(f32::from_le_bytes(buf))
    }

    /// Reads a little-endian `f64`.
    fn read_double(&mut self) -> BufferResult<f64> {
        let mut buf = [0u8; 8];
        self.read_bytes(&mut buf)?;
        Ok(f64::from_le_bytes(buf))
    }

    /// Reads a little-endian 32-bit fixed-width integer (`fixed32`,
    /// `sfixed32`, or the bit pattern of a `float`).
    fn read_fixed32(&mut self) -> BufferResult<u32> {
        let mut buf = [0u8; 4];
        self.read_bytes(&mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    /// Reads a little-endian 64-bit fixed-width integer.
    fn read_fixed64(&mut self) -> BufferResult<u64> {
        let mut buf = [0u8; 8];
        self.read_bytes(&mut buf)?;
        Ok(u64::from_le_bytes(buf))
    }
}

/// Directional writes over a [`SequentialData`] cursor.
pub trait WritableSequentialData: SequentialData {
    /// Writes one byte, advancing `position` by one.
    fn write_byte(&mut self, byte: u8) -> BufferResult<()>;

    /// Writes all of `src`, advancing `position` by `src.len()`.
    fn write_bytes(&mut self, src: &[u8]) -> BufferResult<()>;

    /// Advances `position` by exactly `n`, writing `n` zero bytes (possibly
    /// in chunks). Never a no-op that leaves a hole, and never a silent
    /// partial skip: either all `n` zero bytes are written or
    /// [`BufferError::Overflow`] is returned and `position` is unchanged.
    fn skip(&mut self, n: usize) -> BufferResult<()> {
        const ZEROES: [u8; 64] = [0u8; 64];
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

    fn write_float(&mut self, value: f32) -> BufferResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_double(&mut self, value: f64) -> BufferResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_fixed32(&mut self, value: u32) -> BufferResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    fn write_fixed64(&mut self, value: u64) -> BufferResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }
}
