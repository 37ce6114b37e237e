// SPDX-License-Identifier: Apache-2.0

//! Streaming fast-equals: compares an encoded message against a record's
//! canonical encoding without materializing a full parsed record for
//! either side.
//!
//! The wrinkle spec'd out in the invariant (`fast_equals(r, bytes) ==
//! (parse(bytes) == r)`) is that a semantically-equal input may not be
//! byte-identical to `write(r)`: known repeated scalar fields may arrive as
//! any mixture of packed and unpacked occurrences, and duplicated
//! non-repeated scalars use last-wins. [`FieldShape`] tells this module how
//! to normalize each field's occurrences before comparing, so the
//! comparison is correct regardless of which wire-legal encoding the input
//! used.

use crate::error::{CodecError, CodecErrorKind};
use pbj_bytes::Bytes;
use pbj_buffer::{BufferedData, ReadableSequentialData, SequentialData};
use pbj_wire::{varint, Tag, WireType};
use std::collections::BTreeMap;

/// One field occurrence's decoded payload, still unaware of the message's
/// Rust-level field type -- just enough to compare or re-normalize.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RawOccurrence {
    Varint(u64),
    Fixed32([u8; 4]),
    Fixed64([u8; 8]),
    Len(Bytes),
}

/// How a field's repeated occurrences should be normalized before
/// comparison; derived from its [`pbj_model::FieldDefinition`] by the
/// generated codec.
#[derive(Copy, Clone, Debug)]
pub enum FieldShape {
    /// Non-repeated: only the last occurrence counts (parse's "last wins"
    /// default for a duplicated scalar).
    Singular,
    /// Repeated message/string/bytes: an ordered list, compared positionally.
    RepeatedOrdered,
    /// Repeated numeric/bool/enum scalar: occurrences may be packed,
    /// unpacked, or a mixture; merge to one ordered value sequence before
    /// comparing.
    RepeatedPackableScalar(WireType),
    /// A `map<K, V>`: entries compared as an order-independent set.
    MapEntries,
}

fn decode_all(reader: &mut impl ReadableSequentialData) -> Result<Vec<(u32, RawOccurrence)>, CodecError> {
    let mut out = Vec::new();
    while reader.has_remaining() {
        let offset = reader.position();
        let tag = Tag::read(reader).map_err(|e| CodecError::new(e.into_kind(), None, offset))?;
        let occurrence = match tag.wire_type {
            WireType::Varint => RawOccurrence::Varint(varint::read(reader)?),
            WireType::Fixed32 => RawOccurrence::Fixed32(reader.read_fixed32()?.to_le_bytes()),
            WireType::Fixed64 => RawOccurrence::Fixed64(reader.read_fixed64()?.to_le_bytes()),
            WireType::LengthDelimited => RawOccurrence::Len(crate::framing::read_length_delimited(reader)?),
        };
        out.push((tag.field, occurrence));
    }
    Ok(out)
}

fn unpack_scalars(elem_wire: WireType, blob: &[u8]) -> Result<Vec<u64>, CodecError> {
    let mut cursor = BufferedData::wrap(blob.to_vec());
    let mut values = Vec::new();
    while cursor.has_remaining() {
        let v = match elem_wire {
            WireType::Varint => varint::read(&mut cursor)?,
            WireType::Fixed32 => cursor.read_fixed32()? as u64,
            WireType::Fixed64 => cursor.read_fixed64()?,
            WireType::LengthDelimited => return Err(CodecError::new(CodecErrorKind::BadField, None, 0)),
        };
        values.push(v);
    }
    Ok(values)
}

fn merge_packable(
    occurrences: &[RawOccurrence],
    elem_wire: WireType,
) -> Result<Vec<u64>, CodecError> {
    let mut values = Vec::new();
    for occ in occurrences {
        match (occ, elem_wire) {
            (RawOccurrence::Varint(v), WireType::Varint) => values.push(*v),
            (RawOccurrence::Fixed32(b), WireType::Fixed32) => values.push(u32::from_le_bytes(*b) as u64),
            (RawOccurrence::Fixed64(b), WireType::Fixed64) => values.push(u64::from_le_bytes(*b)),
            (RawOccurrence::Len(blob), _) => values.extend(unpack_scalars(elem_wire, blob.as_slice())?),
            _ => return Err(CodecError::new(CodecErrorKind::BadField, None, 0)),
        }
    }
    Ok(values)
}

fn group_by_field(fields: Vec<(u32, RawOccurrence)>) -> BTreeMap<u32, Vec<RawOccurrence>> {
    let mut map: BTreeMap<u32, Vec<RawOccurrence>> = BTreeMap::new();
    for (field, occ) in fields {
        map.entry(field).or_default().push(occ);
    }
    map
}

/// Compares `input`'s encoding against `record_bytes` (the output of the
/// record's own canonical `write`), normalizing each field's occurrences
/// per `shape` before comparing. Returns `Ok(false)` on the first semantic
/// divergence, and `Err` if `input` itself doesn't parse as well-formed
/// protobuf -- callers implementing the public `fast_equals` contract
/// should map that `Err` case to `false`, since the spec requires
/// `fast_equals` to return `false` whenever `parse` would also fail.
pub fn fast_equals_canonical(
    record_bytes: &[u8],
    input: &mut impl ReadableSequentialData,
    shape: impl Fn(u32) -> FieldShape,
) -> Result<bool, CodecError> {
    let mut record_reader = BufferedData::wrap(record_bytes.to_vec());
    let rec_fields = group_by_field(decode_all(&mut record_reader)?);
    let in_fields = group_by_field(decode_all(input)?);

    let mut fields: Vec<u32> = rec_fields.keys().chain(in_fields.keys()).copied().collect();
    fields.sort_unstable();
    fields.dedup();

    for field in fields {
        let empty = Vec::new();
        let rec_occ = rec_fields.get(&field).unwrap_or(&empty);
        let in_occ = in_fields.get(&field).unwrap_or(&empty);
        if !fields_equal(rec_occ, in_occ, shape(field))? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn fields_equal(
    rec: &[RawOccurrence],
    input: &[RawOccurrence],
    shape: FieldShape,
) -> Result<bool, CodecError> {
    match shape {
        FieldShape::Singular => Ok(rec.last() == input.last()),
        FieldShape::RepeatedOrdered => Ok(rec == input),
        FieldShape::RepeatedPackableScalar(elem_wire) => {
            Ok(merge_packable(rec, elem_wire)? == merge_packable(input, elem_wire)?)
        }
        FieldShape::MapEntries => {
            let mut rec_sorted: Vec<&[u8]> = rec
                .iter()
                .map(|o| match o {
                    RawOccurrence::Len(b) => Ok(b.as_slice()),
                    _ => Err(CodecError::new(CodecErrorKind::BadField, None, 0)),
                })
                .collect::<Result<_, _>>()?;
            let mut in_sorted: Vec<&[u8]> = input
                .iter()
                .map(|o| match o {
                    RawOccurrence::Len(b) => Ok(b.as_slice()),
                    _ => Err(CodecError::new(CodecErrorKind::BadField, None, 0)),
                })
                .collect::<Result<_, _>>()?;
            rec_sorted.sort_unstable();
            in_sorted.sort_unstable();
            Ok(rec_sorted == in_sorted)
        }
    }
}

// Small helper so `WireError -> CodecErrorKind` can be spelled inline above
// without pulling in the full `From<WireError> for CodecError` (which
// discards the field/offset context this module wants to retain).
trait IntoKind {
    fn into_kind(self) -> CodecErrorKind;
}

impl IntoKind for pbj_wire::WireError {
    fn into_kind(self) -> CodecErrorKind {
        match self {
            pbj_wire::WireError::MalformedVarint => CodecErrorKind::MalformedVarint,
            pbj_wire::WireError::MalformedString => CodecErrorKind::MalformedString,
            pbj_wire::WireError::BadField => CodecErrorKind::BadField,
        }
    }
}
