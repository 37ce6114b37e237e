// SPDX-License-Identifier: Apache-2.0

/// The proto scalar/message/enum types a field can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FieldType {
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint32,
    Sint64,
    Bool,
    Fixed32,
    Fixed64,
    Sfixed32,
    Sfixed64,
    Float,
    Double,
    String,
    Bytes,
    Message,
    Enum,
}

/// A single field's schema entry, as a generated codec exposes it via
/// `field_def_by_number`. This -- and nothing else -- is what the codec
/// runtime knows about a message's shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FieldDefinition {
    pub name: &'static str,
    pub type_: FieldType,
    pub is_oneof: bool,
    pub is_repeated: bool,
    pub is_optional_wrapper: bool,
    pub number: u32,
}

impl FieldDefinition {
    pub const fn new(
        name: &'static str,
        type_: FieldType,
        is_oneof: bool,
        is_repeated: bool,
        is_optional_wrapper: bool,
        number: u32,
    ) -> Self {
        FieldDefinition {
            name,
            type_,
            is_oneof,
            is_repeated,
            is_optional_wrapper,
            number,
        }
    }
}
