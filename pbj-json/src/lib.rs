// SPDX-License-Identifier: Apache-2.0

//! L5: the canonical Protobuf-JSON mapping.
//!
//! This crate owns exactly the JSON mechanics a generated codec's
//! `write_json`/`parse_json` needs: a single-pass, non-backtracking lexer, a
//! minimal writer, and the scalar-value mapping rules from the canonical
//! table (int64 as string, float/double with the `NaN`/`Infinity` string
//! forms, bytes as base64, enum as variant name). Field dispatch, object
//! shape, and `lowerCamelCase` key derivation are schema-driven and live in
//! the generated codec, not here.

mod lexer;
mod names;
mod object;
mod value;
mod writer;

pub use lexer::{JsonLexer, Token};
pub use names::to_lower_camel_case;
pub use object::{parse_array, parse_object};
pub use value::{
    decode_bool, decode_bytes, decode_double, decode_float, decode_int64, decode_uint64,
    encode_bool, encode_bytes, encode_double, encode_float, encode_int64, encode_uint64,
};
pub use writer::JsonWriter;

use thiserror::Error;

/// Failures from the JSON lexer/writer layer, distinct from the protobuf
/// wire-codec error taxonomy (`pbj-runtime::CodecError`) a generated codec
/// wraps this in.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonError {
    #[error("unexpected byte {byte:#04x} at offset {offset}")]
    UnexpectedByte { byte: u8, offset: usize },
    #[error("unterminated string starting at offset {offset}")]
    UnterminatedString { offset: usize },
    #[error("invalid escape sequence at offset {offset}")]
    InvalidEscape { offset: usize },
    #[error("invalid number literal at offset {offset}")]
    InvalidNumber { offset: usize },
    #[error("unexpected end of input")]
    UnexpectedEof,
    #[error("invalid value for this field's type")]
    InvalidValueForType,
}

pub type JsonResult<T> = Result<T, JsonError>;
