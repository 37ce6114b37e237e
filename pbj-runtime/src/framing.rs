// SPDX-License-Identifier: Apache-2.0

use crate::error::{CodecError, CodecErrorKind};
use pbj_bytes::Bytes;
use pbj_buffer::{ReadableSequentialData, SequentialData, WritableSequentialData};
use pbj_wire::{varint, WireType};

/// Reads a length-delimited frame: a varint length prefix followed by that
/// many raw bytes.
pub fn read_length_delimited(reader: &mut impl ReadableSequentialData) -> Result<Bytes, CodecError> {
    let offset = reader.position();
    let len = varint::read(reader)? as usize;
    if reader.remaining() < len {
        return Err(CodecError::new(CodecErrorKind::Truncated, None, offset));
    }
    let mut buf = vec![0u8; len];
    reader
        .read_bytes(&mut buf)
        .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, offset))?;
    Ok(Bytes::from_vec(buf))
}

/// Writes a varint length prefix followed by `bytes`.
pub fn write_length_delimited(
    writer: &mut impl WritableSequentialData,
    bytes: &[u8],
) -> Result<(), CodecError> {
    varint::write(writer, bytes.len() as u64)?;
    writer.write_bytes(bytes)?;
    Ok(())
}

/// Raw bytes of a single field occurrence, exactly as encountered on the
/// wire -- the payload only, not the tag. Used both to discard an unknown
/// field (`parse_unknown_fields == false`) and to capture one verbatim
/// (`parse_unknown_fields == true`) so a later `write` reproduces the exact
/// original encoding, including a non-minimal varint length.
pub fn read_raw_value(
    reader: &mut impl ReadableSequentialData,
    wire_type: WireType,
) -> Result<Vec<u8>, CodecError> {
    let offset = reader.position();
    match wire_type {
        WireType::Varint => {
            let (_, raw) = varint::read_with_raw(reader)?;
            Ok(raw)
        }
        WireType::Fixed32 => {
            let mut buf = [0u8; 4];
            reader
                .read_bytes(&mut buf)
                .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, offset))?;
            Ok(buf.to_vec())
        }
        WireType::Fixed64 => {
            let mut buf = [0u8; 8];
            reader
                .read_bytes(&mut buf)
                .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, offset))?;
            Ok(buf.to_vec())
        }
        WireType::LengthDelimited => {
            let len_start = reader.position();
            let len = varint::read(reader)? as usize;
            if reader.remaining() < len {
                return Err(CodecError::new(CodecErrorKind::Truncated, None, len_start));
            }
            let mut body = vec![0u8; len];
            reader
                .read_bytes(&mut body)
                .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, len_start))?;
            // Re-derive the exact length-prefix bytes so the whole value
            // (prefix + body) round-trips byte for byte.
            let mut raw = Vec::with_capacity(varint::encoded_len(len as u64) + len);
            write_varint_into(&mut raw, len as u64);
            raw.extend_from_slice(&body);
            Ok(raw)
        }
    }
}

fn write_varint_into(out: &mut Vec<u8>, mut value: u64) {
    loop {
        if value < 0x80 {
            out.push(value as u8);
            return;
        }
        out.push(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }
}

/// Discards a field's value without materializing it: reads and throws away
/// a varint, skips a fixed width, or skips a length-delimited body after
/// reading its length.
pub fn skip_field(reader: &mut impl ReadableSequentialData, wire_type: WireType) -> Result<(), CodecError> {
    let offset = reader.position();
    match wire_type {
        WireType::Varint => {
            varint::read(reader)?;
        }
        WireType::Fixed32 => reader
            .skip(4)
            .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, offset))?,
        WireType::Fixed64 => reader
            .skip(8)
            .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, offset))?,
        WireType::LengthDelimited => {
            let len = varint::read(reader)? as usize;
            reader
                .skip(len)
                .map_err(|_| CodecError::new(CodecErrorKind::Truncated, None, offset))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbj_buffer::BufferedData;
    use pretty_assertions::assert_eq;

    #[test]
    fn length_delimited_round_trip() {
        let mut buf = BufferedData::allocate(16);
        write_length_delimited(&mut buf, b"hello").unwrap();
        let written = buf.position();
        buf.set_position(0);
        buf.set_limit(written);
        let out = read_length_delimited(&mut buf).unwrap();
        assert_eq!(out.as_slice(), b"hello");
    }

    #[test]
    fn skip_field_advances_past_each_wire_type() {
        let mut buf = BufferedData::allocate(32);
        varint::write(&mut buf, 42).unwrap();
        buf.write_bytes(&[1, 2, 3, 4]).unwrap();
        write_length_delimited(&mut buf, b"xyz").unwrap();
        let end = buf.position();
        buf.set_position(0);
        buf.set_limit(end);

        skip_field(&mut buf, WireType::Varint).unwrap();
        skip_field(&mut buf, WireType::Fixed32).unwrap();
        skip_field(&mut buf, WireType::LengthDelimited).unwrap();
        assert_eq!(buf.position(), end);
    }

    #[test]
    fn raw_value_preserves_non_minimal_varint_encoding() {
        // 0x00 encoded as two bytes (0x80, 0x00) instead of the minimal
        // single zero byte -- not something our own writer would produce,
        // but legal on the wire and must survive capture verbatim.
        let mut buf = BufferedData::wrap(vec![0x80, 0x00]);
        buf.set_limit(2);
        let raw = read_raw_value(&mut buf, WireType::Varint).unwrap();
        assert_eq!(raw, vec![0x80, 0x00]);
    }

    #[test]
    fn truncated_length_delimited_fails() {
        let mut buf = BufferedData::wrap(vec![5, 1, 2]); // claims 5 bytes, has 2
        assert!(read_length_delimited(&mut buf).is_err());
    }
}
