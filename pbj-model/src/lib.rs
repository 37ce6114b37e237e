// SPDX-License-Identifier: Apache-2.0

//! L6: the message model shared by every generated message type --
//! unknown-field preservation, the ordered-map wrapper, the `oneof` tagged
//! variant contract, enum wrappers, and the schema-entry type the codec
//! runtime dispatches on.
//!
//! None of this is specific to any one message; generated codecs (see
//! `pbj-messages`) are clients of these types, not owners of them.

mod enum_value;
mod field;
mod ordered_map;
mod unknown_field;

pub use enum_value::EnumValue;
pub use field::{FieldDefinition, FieldType};
pub use ordered_map::OrderedMap;
pub use unknown_field::UnknownField;

/// Implemented by every generated message record.
///
/// This is the only schema surface the codec runtime (`pbj-runtime`) sees:
/// given a field number, it gets back whatever the generator decided that
/// field means, without needing to know the concrete message type.
pub trait Schema {
    /// Looks up a field by its wire field number.
    fn field_def_by_number(number: u32) -> Option<&'static FieldDefinition>;
}

/// Marker for the at-most-one-present contract of a `oneof` group.
/// Each generated `oneof` is its own enum; this trait exists so runtime
/// helpers (equality, JSON, unknown-field merging) can treat them uniformly
/// without needing to know the concrete variant type.
pub trait OneOf: Default + PartialEq {
    /// `0` conventionally means "unset"; generated discriminants start at 1,
    /// matching the field numbers of their variants.
    fn kind(&self) -> u32;

    #[inline]
    fn is_set(&self) -> bool {
        self.kind() != 0
    }
}
