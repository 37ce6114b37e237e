// SPDX-License-Identifier: Apache-2.0

use pbj_buffer::{
    BufferedData, RandomAccessData, ReadableSequentialData, SequentialData, WritableSequentialData,
};
use pbj_json::{JsonLexer, JsonWriter};
use pbj_model::{FieldDefinition, FieldType, Schema, UnknownField};
use pbj_runtime::{
    fast_equals_canonical, read_length_delimited, read_raw_value, skip_field, CodecError,
    CodecErrorKind, DepthGuard, FieldShape, ParseConfig,
};
use pbj_wire::{varint, Tag, WireType};

const SECONDS_TAG: Tag = Tag::new_unchecked(1, WireType::Varint);
const NANOS_TAG: Tag = Tag::new_unchecked(2, WireType::Varint);

const FIELDS: &[FieldDefinition] = &[
    FieldDefinition::new("seconds", FieldType::Int64, false, false, false, 1),
    FieldDefinition::new("nanos", FieldType::Int32, false, false, false, 2),
];

/// `google.protobuf.Timestamp`-shaped nested message: seconds since the
/// Unix epoch plus the fractional nanosecond remainder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Timestamp {
    pub seconds: i64,
    pub nanos: i32,
    pub unknown_fields: Vec<UnknownField>,
}

impl Schema for Timestamp {
    fn field_def_by_number(number: u32) -> Option<&'static FieldDefinition> {
        FIELDS.iter().find(|f| f.number == number)
    }
}

/// The canonical JSON key for field `number`, derived from the schema name
/// the way a generated codec with no explicit `json_name` override would.
fn json_key(number: u32) -> String {
    pbj_json::to_lower_camel_case(
        FIELDS
            .iter()
            .find(|f| f.number == number)
            .expect("caller passes a field number this schema defines")
            .name,
    )
}

/// Reverse of [`json_key`]: which field a JSON object key names, if any.
fn field_for_json_key(key: &str) -> Option<u32> {
    FIELDS
        .iter()
        .find(|f| pbj_json::to_lower_camel_case(f.name) == key)
        .map(|f| f.number)
}

impl Timestamp {
    pub fn default_instance() -> Self {
        Self::default()
    }

    pub fn parse(bytes: &[u8], config: &ParseConfig) -> Result<Self, CodecError> {
        let mut reader = BufferedData::wrap(bytes.to_vec());
        Self::parse_from(&mut reader, config, DepthGuard::new(config.max_depth))
    }

    pub(crate) fn parse_from(
        reader: &mut impl ReadableSequentialData,
        config: &ParseConfig,
        _depth: DepthGuard,
    ) -> Result<Self, CodecError> {
        let mut seconds = 0i64;
        let mut nanos = 0i32;
        let mut seconds_seen = false;
        let mut nanos_seen = false;
        let mut unknown_fields = Vec::new();

        while reader.has_remaining() {
            let offset = reader.position();
            let tag = Tag::read(reader).map_err(|e| CodecError::from(e).at(offset))?;
            match tag.field {
                1 => {
                    require_wire_type(tag, WireType::Varint, offset)?;
                    if config.strict && seconds_seen {
                        return Err(CodecError::new(CodecErrorKind::BadField, Some(1), offset));
                    }
                    seconds = varint::read(reader).map_err(|e| CodecError::from(e).at(offset))? as i64;
                    seconds_seen = true;
                }
                2 => {
                    require_wire_type(tag, WireType::Varint, offset)?;
                    if config.strict && nanos_seen {
                        return Err(CodecError::new(CodecErrorKind::BadField, Some(2), offset));
                    }
                    nanos = varint::read_i32(reader).map_err(|e| CodecError::from(e).at(offset))?;
                    nanos_seen = true;
                }
                _ => {
                    if config.parse_unknown_fields {
                        let raw = read_raw_value(reader, tag.wire_type)?;
                        unknown_fields.push(UnknownField::new(
                            tag.field,
                            tag.wire_type,
                            pbj_bytes::Bytes::from_vec(raw),
                        ));
                    } else {
                        skip_field(reader, tag.wire_type)?;
                    }
                }
            }
        }

        Ok(Timestamp {
            seconds,
            nanos,
            unknown_fields,
        })
    }

    pub fn measure(&self) -> usize {
        let mut len = 0;
        if self.seconds != 0 {
            len += SECONDS_TAG.encoded_len() + varint::encoded_len(self.seconds as u64);
        }
        if self.nanos != 0 {
            len += NANOS_TAG.encoded_len() + varint::encoded_len(self.nanos as i64 as u64);
        }
        for f in &self.unknown_fields {
            len += Tag::new_unchecked(f.field, f.wire_type).encoded_len() + f.bytes.len();
        }
        len
    }

    pub fn write(&self, writer: &mut impl WritableSequentialData) -> Result<(), CodecError> {
        if self.seconds != 0 {
            SECONDS_TAG.write(writer)?;
            varint::write(writer, self.seconds as u64)?;
        }
        if self.nanos != 0 {
            NANOS_TAG.write(writer)?;
            varint::write_i32(writer, self.nanos)?;
        }
        let mut unknown: Vec<&UnknownField> = self.unknown_fields.iter().collect();
        unknown.sort_by_key(|f| f.field);
        for f in unknown {
            Tag::new_unchecked(f.field, f.wire_type).write(writer)?;
            writer.write_bytes(f.bytes.as_slice())?;
        }
        Ok(())
    }

    pub fn write_to_vec(&self) -> Vec<u8> {
        let mut buf = BufferedData::allocate(self.measure());
        self.write(&mut buf).expect("measure() sized the buffer exactly");
        buf.get_bytes(0, buf.position())
            .expect("position is within capacity")
            .as_slice()
            .to_vec()
    }

    /// Wire-level comparison against an arbitrary encoding, without
    /// materializing `bytes` into a `Timestamp` first.
    pub fn fast_equals(&self, bytes: &[u8]) -> bool {
        let canonical = self.write_to_vec();
        let mut reader = BufferedData::wrap(bytes.to_vec());
        fast_equals_canonical(&canonical, &mut reader, |field| match field {
            1 | 2 => FieldShape::Singular,
            // Unknown to this schema: preserved as an ordered list, never
            // collapsed to last-wins.
            _ => FieldShape::RepeatedOrdered,
        })
        .unwrap_or(false)
    }

    pub fn to_json(&self) -> String {
        let mut w = JsonWriter::new();
        w.begin_object();
        if self.seconds != 0 {
            w.write_key(&json_key(1));
            w.write_string(&pbj_json::encode_int64(self.seconds));
        }
        if self.nanos != 0 {
            w.write_key(&json_key(2));
            w.write_raw(&self.nanos.to_string());
        }
        w.end_object();
        w.finish()
    }

    pub fn from_json(json: &str) -> Result<Self, pbj_json::JsonError> {
        let mut lexer = JsonLexer::new(json.as_bytes());
        let mut out = Timestamp::default();
        pbj_json::parse_object(&mut lexer, |key, lexer| {
            let value = lexer.next_token()?;
            match field_for_json_key(key) {
                Some(1) => out.seconds = pbj_json::decode_int64(&value)?,
                Some(2) => out.nanos = pbj_json::decode_int64(&value)? as i32,
                _ => {}
            }
            Ok(())
        })?;
        Ok(out)
    }
}

fn require_wire_type(tag: Tag, expected: WireType, offset: usize) -> Result<(), CodecError> {
    if tag.wire_type != expected {
        return Err(CodecError::new(
            CodecErrorKind::WireTypeMismatch {
                field: tag.field,
                got: tag.wire_type,
                expected,
            },
            Some(tag.field),
            offset,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn zero_fields_encode_to_empty_message() {
        let ts = Timestamp::default();
        assert_eq!(ts.measure(), 0);
        assert_eq!(ts.write_to_vec(), Vec::<u8>::new());
    }

    #[test]
    fn known_wire_scenario_seconds_and_nanos() {
        // seconds=5678, nanos=1234: tag 0x08 + varint(5678), tag 0x10 + varint(1234).
        let ts = Timestamp {
            seconds: 5678,
            nanos: 1234,
            unknown_fields: Vec::new(),
        };
        let bytes = ts.write_to_vec();
        assert_eq!(bytes[0], 0x08);
        assert_eq!(&bytes[1..3], &[0xAE, 0x2C]);
        assert_eq!(bytes[3], 0x10);

        let parsed = Timestamp::parse(&bytes, &ParseConfig::default()).unwrap();
        assert_eq!(parsed, ts);
    }

    #[test]
    fn negative_nanos_round_trips() {
        let ts = Timestamp {
            seconds: 0,
            nanos: -500_000_000,
            unknown_fields: Vec::new(),
        };
        let bytes = ts.write_to_vec();
        let parsed = Timestamp::parse(&bytes, &ParseConfig::default()).unwrap();
        assert_eq!(parsed.nanos, -500_000_000);
    }

    #[test]
    fn unknown_field_round_trips_through_parse_and_write() {
        let mut buf = BufferedData::allocate(16);
        Tag::new_unchecked(1, WireType::Varint).write(&mut buf).unwrap();
        varint::write(&mut buf, 42).unwrap();
        Tag::new_unchecked(99, WireType::Varint).write(&mut buf).unwrap();
        varint::write(&mut buf, 7).unwrap();
        let written = buf.position();
        buf.set_position(0);
        buf.set_limit(written);

        let original = buf.get_bytes(0, buf.position()).unwrap().as_slice().to_vec();
        let config = ParseConfig::default();
        let parsed = Timestamp::parse(&original, &config).unwrap();
        assert_eq!(parsed.seconds, 42);
        assert_eq!(parsed.unknown_fields.len(), 1);
        assert_eq!(parsed.unknown_fields[0].field, 99);

        let rewritten = parsed.write_to_vec();
        assert_eq!(rewritten, original);
    }

    #[test]
    fn discards_unknown_fields_when_configured() {
        let mut buf = BufferedData::allocate(8);
        Tag::new_unchecked(99, WireType::Varint).write(&mut buf).unwrap();
        varint::write(&mut buf, 7).unwrap();
        let written = buf.position();
        buf.set_position(0);
        buf.set_limit(written);

        let config = ParseConfig {
            parse_unknown_fields: false,
            ..ParseConfig::default()
        };
        let original = buf.get_bytes(0, buf.position()).unwrap().as_slice().to_vec();
        let parsed = Timestamp::parse(&original, &config).unwrap();
        assert!(parsed.unknown_fields.is_empty());
    }

    #[test]
    fn fast_equals_matches_a_semantically_equal_encoding() {
        let ts = Timestamp {
            seconds: 1,
            nanos: 2,
            unknown_fields: Vec::new(),
        };
        assert!(ts.fast_equals(&ts.write_to_vec()));
        assert!(!ts.fast_equals(&Timestamp { seconds: 2, ..ts.clone() }.write_to_vec()));
    }

    #[test]
    fn fast_equals_distinguishes_unknown_field_occurrence_order() {
        fn encode_unknown_pair(first: u64, second: u64) -> Vec<u8> {
            let mut buf = BufferedData::allocate(16);
            Tag::new_unchecked(50, WireType::Varint).write(&mut buf).unwrap();
            varint::write(&mut buf, first).unwrap();
            Tag::new_unchecked(50, WireType::Varint).write(&mut buf).unwrap();
            varint::write(&mut buf, second).unwrap();
            let written = buf.position();
            buf.set_position(0);
            buf.get_bytes(0, written).unwrap().as_slice().to_vec()
        }

        let config = ParseConfig::default();
        let a_b = encode_unknown_pair(1, 2);
        let c_b = encode_unknown_pair(3, 2);
        let record = Timestamp::parse(&a_b, &config).unwrap();

        assert!(record.fast_equals(&a_b));
        assert!(!record.fast_equals(&c_b));
        assert_ne!(Timestamp::parse(&c_b, &config).unwrap(), record);
    }

    #[test]
    fn fuzz_parse_write_round_trip_holds_for_any_seconds_and_nanos() {
        use bolero::generator::TypeGenerator;
        bolero::check!()
            .with_generator((i64::produce(), i32::produce()))
            .for_each(|&(seconds, nanos)| {
                let ts = Timestamp {
                    seconds,
                    nanos,
                    unknown_fields: Vec::new(),
                };
                let bytes = ts.write_to_vec();
                let parsed = Timestamp::parse(&bytes, &ParseConfig::default()).unwrap();
                assert_eq!(parsed, ts);
                assert!(ts.fast_equals(&bytes));
            })
    }

    #[test]
    fn json_round_trip() {
        let ts = Timestamp {
            seconds: 5678,
            nanos: 1234,
            unknown_fields: Vec::new(),
        };
        let json = ts.to_json();
        assert_eq!(json, r#"{"seconds":"5678","nanos":1234}"#);
        let parsed = Timestamp::from_json(&json).unwrap();
        assert_eq!(parsed.seconds, 5678);
        assert_eq!(parsed.nanos, 1234);
    }

    #[test]
    fn json_omits_zero_fields() {
        assert_eq!(Timestamp::default().to_json(), "{}");
    }
}
