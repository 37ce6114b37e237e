// SPDX-License-Identifier: Apache-2.0

use pbj_bytes::Bytes;
use pbj_buffer::{
    BufferedData, RandomAccessData, ReadableSequentialData, SequentialData, WritableSequentialData,
};
use pbj_json::{JsonLexer, JsonWriter, Token};
use pbj_model::{EnumValue, FieldDefinition, FieldType, OneOf, OrderedMap, Schema, UnknownField};
use pbj_runtime::{
    fast_equals_canonical, read_length_delimited, read_raw_value, skip_field, CodecError,
    CodecErrorKind, DepthGuard, FieldShape, ParseConfig,
};
use pbj_wire::{varint, Tag, WireType};

use super::severity::Severity;

const ID_TAG: Tag = Tag::new_unchecked(1, WireType::LengthDelimited);
const SEVERITY_TAG: Tag = Tag::new_unchecked(2, WireType::Varint);
const TIMESTAMP_TAG: Tag = Tag::new_unchecked(3, WireType::LengthDelimited);
const TAGS_TAG: Tag = Tag::new_unchecked(4, WireType::LengthDelimited);
const ATTRIBUTES_TAG: Tag = Tag::new_unchecked(5, WireType::LengthDelimited);
const NOTE_TAG: Tag = Tag::new_unchecked(6, WireType::LengthDelimited);
const PAYLOAD_TEXT_TAG: Tag = Tag::new_unchecked(7, WireType::LengthDelimited);
const PAYLOAD_DATA_TAG: Tag = Tag::new_unchecked(8, WireType::LengthDelimited);

const MAP_KEY_TAG: Tag = Tag::new_unchecked(1, WireType::LengthDelimited);
const MAP_VALUE_TAG: Tag = Tag::new_unchecked(2, WireType::LengthDelimited);

const FIELDS: &[FieldDefinition] = &[
    FieldDefinition::new("id", FieldType::String, false, false, false, 1),
    FieldDefinition::new("severity", FieldType::Enum, false, false, false, 2),
    FieldDefinition::new("timestamp", FieldType::Message, false, false, false, 3),
    FieldDefinition::new("tags", FieldType::Int32, false, true, false, 4),
    FieldDefinition::new("attributes", FieldType::Message, false, true, false, 5),
    FieldDefinition::new("note", FieldType::String, false, false, true, 6),
    FieldDefinition::new("text", FieldType::String, true, false, false, 7),
    FieldDefinition::new("data", FieldType::Bytes, true, false, false, 8),
];

/// The `oneof payload` group: at most one of a plain-text body or a raw
/// binary one is ever set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Payload {
    #[default]
    Unset,
    Text(String),
    Data(Bytes),
}

impl OneOf for Payload {
    fn kind(&self) -> u32 {
        match self {
            Payload::Unset => 0,
            Payload::Text(_) => 7,
            Payload::Data(_) => 8,
        }
    }
}

/// Demonstrates every wire-format corner the runtime's contracts cover in
/// one message: implicit-presence scalar omission (`id`, `severity`), a
/// nested message with explicit presence (`timestamp`), a packed repeated
/// scalar that also accepts unpacked input (`tags`), an ordered map
/// (`attributes`), a Proto3 `optional` wrapper field (`note`), a `oneof`
/// (`payload`), and unknown-field preservation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Event {
    pub id: String,
    pub severity: EnumValue<Severity>,
    pub timestamp: Option<super::timestamp::Timestamp>,
    pub tags: Vec<i32>,
    pub attributes: OrderedMap<String, String>,
    pub note: Option<String>,
    pub payload: Payload,
    pub unknown_fields: Vec<UnknownField>,
}

impl Schema for Event {
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

impl Event {
    pub fn default_instance() -> Self {
        Self::default()
    }

    pub fn parse(bytes: &[u8], config: &ParseConfig) -> Result<Self, CodecError> {
        let mut reader = BufferedData::wrap(bytes.to_vec());
        Self::parse_from(&mut reader, config, DepthGuard::new(config.max_depth))
    }

    fn parse_from(
        reader: &mut impl ReadableSequentialData,
        config: &ParseConfig,
        depth: DepthGuard,
    ) -> Result<Self, CodecError> {
        let mut out = Event::default();
        let mut id_seen = false;
        let mut severity_seen = false;
        let mut timestamp_seen = false;
        let mut note_seen = false;

        while reader.has_remaining() {
            let offset = reader.position();
            let tag = Tag::read(reader).map_err(|e| CodecError::from(e).at(offset))?;
            match tag.field {
                1 => {
                    require_wire_type(tag, WireType::LengthDelimited, offset)?;
                    reject_strict_duplicate(config, id_seen, 1, offset)?;
                    let raw = read_length_delimited(reader)?;
                    out.id = raw
                        .as_utf8()
                        .map_err(|_| CodecError::new(CodecErrorKind::MalformedString, Some(1), offset))?
                        .to_string();
                    id_seen = true;
                }
                2 => {
                    require_wire_type(tag, WireType::Varint, offset)?;
                    reject_strict_duplicate(config, severity_seen, 2, offset)?;
                    let ordinal = varint::read_i32(reader).map_err(|e| CodecError::from(e).at(offset))?;
                    out.severity = match Severity::from_ordinal(ordinal) {
                        Some(known) => EnumValue::Known(known),
                        None if config.strict => {
                            return Err(CodecError::new(
                                CodecErrorKind::UnrecognisedEnumStrict,
                                Some(2),
                                offset,
                            ))
                        }
                        None => EnumValue::Unrecognised(ordinal),
                    };
                    severity_seen = true;
                }
                3 => {
                    require_wire_type(tag, WireType::LengthDelimited, offset)?;
                    reject_strict_duplicate(config, timestamp_seen, 3, offset)?;
                    let child = depth.descend(offset)?;
                    let nested = read_length_delimited(reader)?;
                    let mut nested_reader = BufferedData::wrap(nested.as_slice().to_vec());
                    out.timestamp = Some(super::timestamp::Timestamp::parse_from(
                        &mut nested_reader,
                        config,
                        child,
                    )?);
                    timestamp_seen = true;
                }
                4 => match tag.wire_type {
                    WireType::LengthDelimited => {
                        let packed = read_length_delimited(reader)?;
                        let mut cursor = BufferedData::wrap(packed.as_slice().to_vec());
                        while cursor.has_remaining() {
                            out.tags.push(
                                varint::read_i32(&mut cursor).map_err(|e| CodecError::from(e).at(offset))?,
                            );
                        }
                    }
                    WireType::Varint => {
                        out.tags
                            .push(varint::read_i32(reader).map_err(|e| CodecError::from(e).at(offset))?);
                    }
                    _ => return Err(wire_mismatch(tag, WireType::LengthDelimited, offset)),
                },
                5 => {
                    require_wire_type(tag, WireType::LengthDelimited, offset)?;
                    let entry_bytes = read_length_delimited(reader)?;
                    let (key, value) = parse_map_entry(entry_bytes.as_slice(), offset)?;
                    out.attributes.insert(key, value);
                }
                6 => {
                    require_wire_type(tag, WireType::LengthDelimited, offset)?;
                    reject_strict_duplicate(config, note_seen, 6, offset)?;
                    let raw = read_length_delimited(reader)?;
                    out.note = Some(
                        raw.as_utf8()
                            .map_err(|_| CodecError::new(CodecErrorKind::MalformedString, Some(6), offset))?
                            .to_string(),
                    );
                    note_seen = true;
                }
                7 => {
                    require_wire_type(tag, WireType::LengthDelimited, offset)?;
                    let raw = read_length_delimited(reader)?;
                    out.payload = Payload::Text(
                        raw.as_utf8()
                            .map_err(|_| CodecError::new(CodecErrorKind::MalformedString, Some(7), offset))?
                            .to_string(),
                    );
                }
                8 => {
                    require_wire_type(tag, WireType::LengthDelimited, offset)?;
                    out.payload = Payload::Data(read_length_delimited(reader)?);
                }
                _ => {
                    if config.parse_unknown_fields {
                        let raw = read_raw_value(reader, tag.wire_type)?;
                        out.unknown_fields
                            .push(UnknownField::new(tag.field, tag.wire_type, Bytes::from_vec(raw)));
                    } else {
                        skip_field(reader, tag.wire_type)?;
                    }
                }
            }
        }
        Ok(out)
    }

    pub fn measure(&self) -> usize {
        let mut len = 0;
        if !self.id.is_empty() {
            len += ID_TAG.encoded_len() + varint::encoded_len(self.id.len() as u64) + self.id.len();
        }
        if self.severity.ordinal() != 0 {
            len += SEVERITY_TAG.encoded_len() + varint::encoded_len(self.severity.ordinal() as i64 as u64);
        }
        if let Some(ts) = &self.timestamp {
            let inner = ts.measure();
            len += TIMESTAMP_TAG.encoded_len() + varint::encoded_len(inner as u64) + inner;
        }
        if !self.tags.is_empty() {
            let body: usize = self
                .tags
                .iter()
                .map(|t| varint::encoded_len(*t as i64 as u64))
                .sum();
            len += TAGS_TAG.encoded_len() + varint::encoded_len(body as u64) + body;
        }
        for (k, v) in self.attributes.iter_sorted() {
            let entry_len = map_entry_len(k, v);
            len += ATTRIBUTES_TAG.encoded_len() + varint::encoded_len(entry_len as u64) + entry_len;
        }
        if let Some(note) = &self.note {
            len += NOTE_TAG.encoded_len() + varint::encoded_len(note.len() as u64) + note.len();
        }
        match &self.payload {
            Payload::Unset => {}
            Payload::Text(s) => {
                len += PAYLOAD_TEXT_TAG.encoded_len() + varint::encoded_len(s.len() as u64) + s.len();
            }
            Payload::Data(b) => {
                len += PAYLOAD_DATA_TAG.encoded_len() + varint::encoded_len(b.len() as u64) + b.len();
            }
        }
        for f in &self.unknown_fields {
            len += Tag::new_unchecked(f.field, f.wire_type).encoded_len() + f.bytes.len();
        }
        len
    }

    pub fn write(&self, writer: &mut impl WritableSequentialData) -> Result<(), CodecError> {
        if !self.id.is_empty() {
            ID_TAG.write(writer)?;
            pbj_runtime::write_length_delimited(writer, self.id.as_bytes())?;
        }
        if self.severity.ordinal() != 0 {
            SEVERITY_TAG.write(writer)?;
            varint::write(writer, self.severity.ordinal() as i64 as u64)?;
        }
        if let Some(ts) = &self.timestamp {
            TIMESTAMP_TAG.write(writer)?;
            let inner = ts.write_to_vec();
            pbj_runtime::write_length_delimited(writer, &inner)?;
        }
        if !self.tags.is_empty() {
            TAGS_TAG.write(writer)?;
            let mut body_buf = BufferedData::allocate(
                self.tags.iter().map(|t| varint::encoded_len(*t as i64 as u64)).sum(),
            );
            for &t in &self.tags {
                varint::write_i32(&mut body_buf, t)?;
            }
            let body = body_buf
                .get_bytes(0, body_buf.position())
                .expect("sized exactly")
                .as_slice()
                .to_vec();
            pbj_runtime::write_length_delimited(writer, &body)?;
        }
        for (k, v) in self.attributes.iter_sorted() {
            ATTRIBUTES_TAG.write(writer)?;
            let entry = encode_map_entry(k, v);
            pbj_runtime::write_length_delimited(writer, &entry)?;
        }
        if let Some(note) = &self.note {
            NOTE_TAG.write(writer)?;
            pbj_runtime::write_length_delimited(writer, note.as_bytes())?;
        }
        match &self.payload {
            Payload::Unset => {}
            Payload::Text(s) => {
                PAYLOAD_TEXT_TAG.write(writer)?;
                pbj_runtime::write_length_delimited(writer, s.as_bytes())?;
            }
            Payload::Data(b) => {
                PAYLOAD_DATA_TAG.write(writer)?;
                pbj_runtime::write_length_delimited(writer, b.as_slice())?;
            }
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

    pub fn fast_equals(&self, bytes: &[u8]) -> bool {
        let canonical = self.write_to_vec();
        let mut reader = BufferedData::wrap(bytes.to_vec());
        fast_equals_canonical(&canonical, &mut reader, |field| match field {
            1 | 2 | 3 | 6 | 7 | 8 => FieldShape::Singular,
            4 => FieldShape::RepeatedPackableScalar(WireType::Varint),
            5 => FieldShape::MapEntries,
            // Unknown to this schema: `unknown_fields` preserves every
            // occurrence as an ordered list, never collapses to last-wins.
            _ => FieldShape::RepeatedOrdered,
        })
        .unwrap_or(false)
    }

    pub fn to_json(&self) -> String {
        let mut w = JsonWriter::new();
        w.begin_object();
        if !self.id.is_empty() {
            w.write_key(&json_key(1));
            w.write_string(&self.id);
        }
        if self.severity.ordinal() != 0 {
            w.write_key(&json_key(2));
            match self.severity {
                EnumValue::Known(s) => w.write_string(s.json_name()),
                EnumValue::Unrecognised(raw) => w.write_raw(&raw.to_string()),
            }
        }
        if let Some(ts) = &self.timestamp {
            w.write_key(&json_key(3));
            w.write_raw(&ts.to_json());
        }
        if !self.tags.is_empty() {
            w.write_key(&json_key(4));
            w.begin_array();
            for t in &self.tags {
                w.write_raw(&t.to_string());
            }
            w.end_array();
        }
        if !self.attributes.is_empty() {
            w.write_key(&json_key(5));
            w.begin_object();
            for (k, v) in self.attributes.iter_sorted() {
                w.write_key(k);
                w.write_string(v);
            }
            w.end_object();
        }
        if let Some(note) = &self.note {
            w.write_key(&json_key(6));
            w.write_string(note);
        }
        match &self.payload {
            Payload::Unset => {}
            Payload::Text(s) => {
                w.write_key(&json_key(7));
                w.write_string(s);
            }
            Payload::Data(b) => {
                w.write_key(&json_key(8));
                w.write_string(&pbj_json::encode_bytes(b));
            }
        }
        w.end_object();
        w.finish()
    }

    pub fn from_json(json: &str) -> Result<Self, pbj_json::JsonError> {
        let mut lexer = JsonLexer::new(json.as_bytes());
        let mut out = Event::default();
        pbj_json::parse_object(&mut lexer, |key, lexer| {
            match field_for_json_key(key) {
                Some(1) => {
                    out.id = expect_string(lexer.next_token()?)?;
                }
                Some(2) => {
                    let token = lexer.next_token()?;
                    out.severity = match &token {
                        Token::Str(name) => Severity::from_json_name(name)
                            .map(EnumValue::Known)
                            .ok_or(pbj_json::JsonError::InvalidValueForType)?,
                        Token::Num(raw) => {
                            let ordinal: i32 =
                                raw.parse().map_err(|_| pbj_json::JsonError::InvalidValueForType)?;
                            Severity::from_ordinal(ordinal)
                                .map(EnumValue::Known)
                                .unwrap_or(EnumValue::Unrecognised(ordinal))
                        }
                        _ => return Err(pbj_json::JsonError::InvalidValueForType),
                    };
                }
                Some(3) => {
                    let nested = collect_object_text(lexer)?;
                    out.timestamp =
                        Some(super::timestamp::Timestamp::from_json(&nested).map_err(|_| {
                            pbj_json::JsonError::InvalidValueForType
                        })?);
                }
                Some(4) => {
                    pbj_json::parse_array(lexer, |lexer| {
                        if let Token::Num(raw) = lexer.next_token()? {
                            out.tags.push(
                                raw.parse::<f64>()
                                    .map(|v| v as i32)
                                    .map_err(|_| pbj_json::JsonError::InvalidValueForType)?,
                            );
                            Ok(())
                        } else {
                            Err(pbj_json::JsonError::InvalidValueForType)
                        }
                    })?;
                }
                Some(5) => {
                    pbj_json::parse_object(lexer, |entry_key, lexer| {
                        let value = expect_string(lexer.next_token()?)?;
                        out.attributes.insert(entry_key.to_string(), value);
                        Ok(())
                    })?;
                }
                Some(6) => {
                    out.note = Some(expect_string(lexer.next_token()?)?);
                }
                Some(7) => {
                    out.payload = Payload::Text(expect_string(lexer.next_token()?)?);
                }
                Some(8) => {
                    let s = expect_string(lexer.next_token()?)?;
                    out.payload = Payload::Data(
                        Bytes::from_base64(&s).map_err(|_| pbj_json::JsonError::InvalidValueForType)?,
                    );
                }
                _ => {
                    // Unknown JSON key: the canonical mapping has no slot to
                    // preserve it in (unlike unknown *wire* fields), so it's
                    // silently ignored.
                    skip_json_value(lexer)?;
                }
            }
            Ok(())
        })?;
        Ok(out)
    }
}

/// Consumes and discards one JSON value of any shape, recursing into
/// objects/arrays so brace/bracket nesting stays balanced. Used for JSON
/// object keys the schema doesn't recognize.
fn skip_json_value(lexer: &mut JsonLexer) -> Result<(), pbj_json::JsonError> {
    if lexer.peek_byte_is(b'{') {
        return pbj_json::parse_object(lexer, |_, lexer| skip_json_value(lexer));
    }
    if lexer.peek_byte_is(b'[') {
        pbj_json::parse_array(lexer, |lexer| skip_json_value(lexer))?;
        return Ok(());
    }
    lexer.next_token()?;
    Ok(())
}

fn expect_string(token: Token) -> Result<String, pbj_json::JsonError> {
    match token {
        Token::Str(s) => Ok(s),
        _ => Err(pbj_json::JsonError::InvalidValueForType),
    }
}

/// `timestamp`'s nested object is re-parsed by `Timestamp::from_json`, which
/// wants its own complete `{...}` text; this re-serializes just that span
/// rather than threading a sub-lexer through, trading an allocation for
/// reuse of `Timestamp`'s own JSON parser.
fn collect_object_text(lexer: &mut JsonLexer) -> Result<String, pbj_json::JsonError> {
    let mut writer = JsonWriter::new();
    writer.begin_object();
    pbj_json::parse_object(lexer, |key, lexer| {
        writer.write_key(key);
        match lexer.next_token()? {
            Token::Str(s) => writer.write_string(&s),
            Token::Num(raw) => writer.write_raw(&raw),
            Token::Bool(b) => writer.write_bool(b),
            Token::Null => writer.write_null(),
            _ => return Err(pbj_json::JsonError::InvalidValueForType),
        }
        Ok(())
    })?;
    writer.end_object();
    Ok(writer.finish())
}

fn require_wire_type(tag: Tag, expected: WireType, offset: usize) -> Result<(), CodecError> {
    if tag.wire_type != expected {
        return Err(wire_mismatch(tag, expected, offset));
    }
    Ok(())
}

fn wire_mismatch(tag: Tag, expected: WireType, offset: usize) -> CodecError {
    CodecError::new(
        CodecErrorKind::WireTypeMismatch {
            field: tag.field,
            got: tag.wire_type,
            expected,
        },
        Some(tag.field),
        offset,
    )
}

fn reject_strict_duplicate(
    config: &ParseConfig,
    already_seen: bool,
    field: u32,
    offset: usize,
) -> Result<(), CodecError> {
    if config.strict && already_seen {
        return Err(CodecError::new(CodecErrorKind::BadField, Some(field), offset));
    }
    Ok(())
}

fn map_entry_len(key: &str, value: &str) -> usize {
    MAP_KEY_TAG.encoded_len()
        + varint::encoded_len(key.len() as u64)
        + key.len()
        + MAP_VALUE_TAG.encoded_len()
        + varint::encoded_len(value.len() as u64)
        + value.len()
}

fn encode_map_entry(key: &str, value: &str) -> Vec<u8> {
    let mut buf = BufferedData::allocate(map_entry_len(key, value));
    MAP_KEY_TAG.write(&mut buf).expect("sized exactly");
    pbj_runtime::write_length_delimited(&mut buf, key.as_bytes()).expect("sized exactly");
    MAP_VALUE_TAG.write(&mut buf).expect("sized exactly");
    pbj_runtime::write_length_delimited(&mut buf, value.as_bytes()).expect("sized exactly");
    buf.get_bytes(0, buf.position())
        .expect("in bounds")
        .as_slice()
        .to_vec()
}

fn parse_map_entry(bytes: &[u8], offset: usize) -> Result<(String, String), CodecError> {
    let mut reader = BufferedData::wrap(bytes.to_vec());
    let mut key = String::new();
    let mut value = String::new();
    while reader.has_remaining() {
        let tag = Tag::read(&mut reader).map_err(|e| CodecError::from(e).at(offset))?;
        match tag.field {
            1 => {
                let raw = read_length_delimited(&mut reader)?;
                key = raw
                    .as_utf8()
                    .map_err(|_| CodecError::new(CodecErrorKind::MalformedString, Some(1), offset))?
                    .to_string();
            }
            2 => {
                let raw = read_length_delimited(&mut reader)?;
                value = raw
                    .as_utf8()
                    .map_err(|_| CodecError::new(CodecErrorKind::MalformedString, Some(2), offset))?
                    .to_string();
            }
            _ => skip_field(&mut reader, tag.wire_type)?,
        }
    }
    Ok((key, value))
}
