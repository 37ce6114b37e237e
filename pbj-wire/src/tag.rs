// SPDX-License-Identifier: Apache-2.0

use crate::varint;
use crate::{WireError, WireResult};
use pbj_buffer::{BufferResult, ReadableSequentialData, WritableSequentialData};

/// Smallest legal field number.
pub const MIN_FIELD_NUMBER: u32 = 1;

/// Largest legal field number: protobuf reserves the top 3 bits of a
/// 32-bit tag varint for the wire type, so field numbers top out at
/// `2^29 - 1`.
pub const MAX_FIELD_NUMBER: u32 = (1 << 29) - 1;

/// The 3-bit wire-type suffix of a tag. Only these four are accepted;
/// groups (`StartGroup`/`EndGroup`, values 3 and 4) are rejected.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[repr(u32)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    Fixed32 = 5,
}

impl WireType {
    fn from_u32(raw: u32) -> WireResult<Self> {
        match raw {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            5 => Ok(WireType::Fixed32),
            _ => Err(WireError::BadField),
        }
    }
}

/// A decoded `(field_number, wire_type)` pair.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tag {
    pub field: u32,
    pub wire_type: WireType,
}

impl Tag {
    /// Builds a tag, validating the field number is in range. The wire type
    /// is always one of the four supported variants by construction.
    pub fn new(field: u32, wire_type: WireType) -> WireResult<Self> {
        if !(MIN_FIELD_NUMBER..=MAX_FIELD_NUMBER).contains(&field) {
            return Err(WireError::BadField);
        }
        Ok(Tag { field, wire_type })
    }

    /// Builds a tag without validating the field number, for generated code
    /// where the field number is a schema-fixed constant already known to
    /// be in range. Debug builds still assert the invariant.
    pub const fn new_unchecked(field: u32, wire_type: WireType) -> Self {
        debug_assert!(field >= MIN_FIELD_NUMBER && field <= MAX_FIELD_NUMBER);
        Tag { field, wire_type }
    }

    fn packed(self) -> u32 {
        (self.field << 3) | self.wire_type as u32
    }

    /// Writes this tag as its varint-encoded packed form.
    pub fn write(self, writer: &mut impl WritableSequentialData) -> BufferResult<()> {
        varint::write_u32(writer, self.packed())
    }

    /// Bytes this tag would occupy when written.
    pub fn encoded_len(self) -> usize {
        varint::encoded_len(self.packed() as u64)
    }

    /// Reads and unpacks a tag, rejecting field number 0 or out-of-range,
    /// and any wire type other than the four supported ones.
    pub fn read(reader: &mut impl ReadableSequentialData) -> WireResult<Self> {
        let packed = varint::read_u32(reader)?;
        let field = packed >> 3;
        let wire_type = WireType::from_u32(packed & 0x7)?;
        Tag::new(field, wire_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pbj_buffer::{BufferedData, SequentialData};
    use pretty_assertions::assert_eq;

    #[test]
    fn round_trips_tag() {
        let tag = Tag::new(10, WireType::Varint).unwrap();
        let mut buf = BufferedData::allocate(5);
        tag.write(&mut buf).unwrap();
        let written = buf.position();
        buf.set_position(0);
        buf.set_limit(written);
        let read_back = Tag::read(&mut buf).unwrap();
        assert_eq!(read_back, tag);
    }

    #[test]
    fn rejects_field_zero() {
        assert_eq!(Tag::new(0, WireType::Varint), Err(WireError::BadField));
    }

    #[test]
    fn rejects_field_beyond_max() {
        assert_eq!(
            Tag::new(MAX_FIELD_NUMBER + 1, WireType::Varint),
            Err(WireError::BadField)
        );
    }

    #[test]
    fn rejects_group_wire_types_on_read() {
        // Wire type 3 (StartGroup), field number 1 -> packed = (1<<3)|3 = 11
        let mut buf = BufferedData::wrap(vec![11]);
        assert_eq!(Tag::read(&mut buf), Err(WireError::BadField));
    }

    #[test]
    fn timestamp_scenario_tags() {
        // seconds field 1 VARINT -> tag byte 0x08; nanos field 2 VARINT -> 0x10
        assert_eq!(Tag::new(1, WireType::Varint).unwrap().packed(), 0x08);
        assert_eq!(Tag::new(2, WireType::Varint).unwrap().packed(), 0x10);
    }
}
