// SPDX-License-Identifier: Apache-2.0

use crate::{WireError, WireResult};
use pbj_buffer::{BufferResult, ReadableSequentialData, WritableSequentialData};

/// Maximum number of bytes a base-128 varint may occupy, per the wire
/// format: 10 bytes covers a full 64-bit value (`ceil(64/7) == 10`).
pub const MAX_VARINT_BYTES: usize = 10;

/// Number of bytes `encode` would emit for `value`, without doing any I/O.
///
/// Branch-free formula from the reference protobuf implementation's coded
/// stream sizer: counts the position of the highest set bit and divides by
/// 7, rounding up, with the `| 1` guarding the `value == 0` case (which
/// needs one byte, not zero).
#[must_use]
#[inline]
pub const fn encoded_len(value: u64) -> usize {
    ((((value | 1).leading_zeros() ^ 63) * 9 + 73) / 64) as usize
}

/// Writes `value` as an unsigned LSB-first base-128 varint.
#[inline]
pub fn write(writer: &mut impl WritableSequentialData, mut value: u64) -> BufferResult<()> {
    loop {
        if value < 0x80 {
            writer.write_byte(value as u8)?;
            return Ok(());
        }
        writer.write_byte(((value & 0x7F) | 0x80) as u8)?;
        value >>= 7;
    }
}

/// Reads an unsigned varint, failing with [`WireError::MalformedVarint`] if
/// the continuation bit never clears within [`MAX_VARINT_BYTES`] bytes or if
/// the final byte carries bits beyond bit 63.
pub fn read(reader: &mut impl ReadableSequentialData) -> WireResult<u64> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    for i in 0..MAX_VARINT_BYTES {
        let byte = reader.read_byte().map_err(|_| WireError::MalformedVarint)?;
        let payload = (byte & 0x7F) as u64;
        if i == MAX_VARINT_BYTES - 1 {
            // The 10th byte may only contribute its single remaining valid
            // bit (bit 63); anything else overflows 64 bits.
            if payload > 1 {
                return Err(WireError::MalformedVarint);
            }
        }
        result |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok(result);
        }
        shift += 7;
    }
    Err(WireError::MalformedVarint)
}

/// Like [`read`], but also returns the exact bytes consumed. Used when
/// preserving an unknown field verbatim: the raw encoding (which may use a
/// non-minimal byte length) must survive a parse/write round-trip
/// unchanged, so the decoded value alone isn't enough.
pub fn read_with_raw(reader: &mut impl ReadableSequentialData) -> WireResult<(u64, Vec<u8>)> {
    let mut result: u64 = 0;
    let mut shift: u32 = 0;
    let mut raw = Vec::with_capacity(4);
    for i in 0..MAX_VARINT_BYTES {
        let byte = reader.read_byte().map_err(|_| WireError::MalformedVarint)?;
        raw.push(byte);
        let payload = (byte & 0x7F) as u64;
        if i == MAX_VARINT_BYTES - 1 && payload > 1 {
            return Err(WireError::MalformedVarint);
        }
        result |= payload << shift;
        if byte & 0x80 == 0 {
            return Ok((result, raw));
        }
        shift += 7;
    }
    Err(WireError::MalformedVarint)
}

/// Writes a 32-bit value as a varint (upcasting to `u64`, as protobuf
/// always does for varint-encoded fields).
#[inline]
pub fn write_u32(writer: &mut impl WritableSequentialData, value: u32) -> BufferResult<()> {
    write(writer, value as u64)
}

/// Reads a varint and truncates it to 32 bits, matching protobuf's
/// "sign-extend on read, truncate on narrow" behavior for `int32`.
pub fn read_u32(reader: &mut impl ReadableSequentialData) -> WireResult<u32> {
    Ok(read(reader)? as u32)
}

/// Writes a negative-capable `int32` the way protobuf does on the wire:
/// sign-extended to 64 bits rather than zigzag-coded, so a negative value
/// always costs the full 10 bytes.
#[inline]
pub fn write_i32(writer: &mut impl WritableSequentialData, value: i32) -> BufferResult<()> {
    write(writer, value as i64 as u64)
}

/// Reads an `int32`: decodes the full 64-bit varint, then truncates,
/// undoing the sign-extension `write_i32` applied.
pub fn read_i32(reader: &mut impl ReadableSequentialData) -> WireResult<i32> {
    Ok(read(reader)? as i64 as i32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbj_buffer::{BufferedData, SequentialData};
    use pretty_assertions::assert_eq;

    fn round_trip(value: u64) -> u64 {
        let mut buf = BufferedData::allocate(MAX_VARINT_BYTES);
        write(&mut buf, value).unwrap();
        let written = buf.position();
        buf.set_position(0);
        buf.set_limit(written);
        read(&mut buf).unwrap()
    }

    #[test]
    fn round_trips_boundary_values() {
        for &v in &[0u64, 1, 127, 128, 300, 16384, u32::MAX as u64, u64::MAX] {
            assert_eq!(round_trip(v), v);
        }
    }

    #[test]
    fn length_matches_encode_output() {
        for &v in &[0u64, 1, 127, 128, 16383, 16384, u64::MAX] {
            let mut buf = BufferedData::allocate(MAX_VARINT_BYTES);
            write(&mut buf, v).unwrap();
            assert_eq!(buf.position(), encoded_len(v));
            assert!(encoded_len(v) >= 1 && encoded_len(v) <= MAX_VARINT_BYTES);
        }
    }

    #[test]
    fn ten_byte_varint_with_overflow_bits_is_malformed() {
        // A 10-byte varint where the final byte carries more than bit 63.
        let mut buf = BufferedData::wrap(vec![
            0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x02,
        ]);
        assert_eq!(read(&mut buf), Err(WireError::MalformedVarint));
    }

    #[test]
    fn unterminated_varint_is_malformed() {
        let mut buf = BufferedData::wrap(vec![0xff; 11]);
        assert_eq!(read(&mut buf), Err(WireError::MalformedVarint));
    }

    #[test]
    fn negative_int32_sign_extends_to_full_varint_width() {
        let mut buf = BufferedData::allocate(MAX_VARINT_BYTES);
        write_i32(&mut buf, -1).unwrap();
        // Sign-extended to 64 bits, so -1 costs the full 10 bytes, not 1.
        assert_eq!(buf.position(), MAX_VARINT_BYTES);
        let written = buf.position();
        buf.set_position(0);
        buf.set_limit(written);
        assert_eq!(read_i32(&mut buf).unwrap(), -1);
    }

    #[test]
    fn fuzz_round_trip_is_lossless_for_any_u64() {
        use bolero::generator::TypeGenerator;
        bolero::check!()
            .with_generator(u64::produce())
            .for_each(|&value| {
                assert_eq!(round_trip(value), value);
            })
    }

    #[test]
    fn fuzz_round_trip_is_lossless_for_any_i32() {
        use bolero::generator::TypeGenerator;
        bolero::check!()
            .with_generator(i32::produce())
            .for_each(|&value| {
                let mut buf = BufferedData::allocate(MAX_VARINT_BYTES);
                write_i32(&mut buf, value).unwrap();
                let written = buf.position();
                buf.set_position(0);
                buf.set_limit(written);
                assert_eq!(read_i32(&mut buf).unwrap(), value);
            })
    }

    #[test]
    fn known_wire_scenario_timestamp_seconds() {
        // From the end-to-end scenario: seconds=5678 on field 1 encodes to
        // the varint bytes `AE 2C` (after the tag byte, written elsewhere).
        use pbj_buffer::RandomAccessData;
        assert_eq!(round_trip(5678), 5678);
        let mut buf = BufferedData::allocate(MAX_VARINT_BYTES);
        write(&mut buf, 5678).unwrap();
        assert_eq!(buf.get_bytes(0, 2).unwrap().as_slice(), &[0xAE, 0x2C]);
    }
}
