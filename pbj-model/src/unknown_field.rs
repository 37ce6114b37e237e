// SPDX-License-Identifier: Apache-2.0

use pbj_bytes::Bytes;
use pbj_wire::WireType;
use std::cmp::Ordering;

/// A field number the current schema doesn't recognize, preserved verbatim
/// so `parse -> write` round-trips it byte-for-byte.
///
/// Natural ordering is by `field` alone (stable sort, ascending), matching
/// the canonical-write rule that unknown fields are emitted after all known
/// fields in ascending field-number order. [`UnknownField::protobuf_compare`]
/// additionally tie-breaks by wire type then payload bytes, for tests that
/// want a total order rather than the field-only partial order used by
/// `sort`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownField {
    pub field: u32,
    pub wire_type: WireType,
    pub bytes: Bytes,
}

impl UnknownField {
    pub fn new(field: u32, wire_type: WireType, bytes: Bytes) -> Self {
        UnknownField {
            field,
            wire_type,
            bytes,
        }
    }

    /// Total order used when a deterministic tie-break beyond field number
    /// is needed (e.g. comparing two unknown-field lists for structural
    /// equality in a stable way during tests).
    pub fn protobuf_compare(&self, other: &Self) -> Ordering {
        self.field
            .cmp(&other.field)
            .then_with(|| (self.wire_type as u32).cmp(&(other.wire_type as u32)))
            .then_with(|| self.bytes.as_slice().cmp(other.bytes.as_slice()))
    }
}

impl PartialOrd for UnknownField {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for UnknownField {
    fn cmp(&self, other: &Self) -> Ordering {
        self.field.cmp(&other.field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sorts_stably_by_field_number() {
        let mut fields = vec![
            UnknownField::new(5, WireType::Varint, Bytes::from_static(b"b")),
            UnknownField::new(2, WireType::Varint, Bytes::from_static(b"a")),
            UnknownField::new(5, WireType::Varint, Bytes::from_static(b"c")),
        ];
        fields.sort();
        assert_eq!(fields[0].field, 2);
        assert_eq!(fields[1].field, 5);
        assert_eq!(fields[1].bytes.as_slice(), b"b");
        assert_eq!(fields[2].bytes.as_slice(), b"c");
    }

    #[test]
    fn protobuf_compare_breaks_ties_by_wire_type_then_bytes() {
        let a = UnknownField::new(1, WireType::Varint, Bytes::from_static(b"x"));
        let b = UnknownField::new(1, WireType::Fixed32, Bytes::from_static(b"x"));
        assert_eq!(a.protobuf_compare(&b), Ordering::Less);
    }
}
