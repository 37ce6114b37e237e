// SPDX-License-Identifier: Apache-2.0

use crate::{JsonError, JsonResult, Token};
use pbj_bytes::Bytes;

/// Canonical write form for a 64-bit integer field: always a JSON string,
/// regardless of what the generated codec read on the way in. JavaScript's
/// `number` can't losslessly hold the full 64-bit range, so the canonical
/// mapping always emits these as strings.
pub fn encode_int64(value: i64) -> String {
    value.to_string()
}

pub fn encode_uint64(value: u64) -> String {
    value.to_string()
}

/// Reads a 64-bit integer field, accepting either token form the mapping
/// table allows on read (`JSON string (decimal) on write; number or string
/// accepted on read`).
pub fn decode_int64(token: &Token) -> JsonResult<i64> {
    let raw = numeric_text(token)?;
    raw.parse::<i64>().map_err(|_| JsonError::InvalidValueForType)
}

pub fn decode_uint64(token: &Token) -> JsonResult<u64> {
    let raw = numeric_text(token)?;
    raw.parse::<u64>().map_err(|_| JsonError::InvalidValueForType)
}

fn numeric_text(token: &Token) -> JsonResult<&str> {
    match token {
        Token::Num(raw) => Ok(raw.as_str()),
        Token::Str(raw) => Ok(raw.as_str()),
        _ => Err(JsonError::InvalidValueForType),
    }
}

/// `float`/`double` use the same textual special cases; `encode_float` and
/// `encode_double` exist separately only because the caller's value is a
/// different width, not because the mapping differs.
pub fn encode_float(value: f32) -> String {
    encode_finite_or_special(value as f64, value.is_nan(), value.is_infinite(), value.is_sign_negative())
}

pub fn encode_double(value: f64) -> String {
    encode_finite_or_special(value, value.is_nan(), value.is_infinite(), value.is_sign_negative())
}

fn encode_finite_or_special(value: f64, is_nan: bool, is_infinite: bool, negative: bool) -> String {
    if is_nan {
        "\"NaN\"".to_string()
    } else if is_infinite {
        if negative {
            "\"-Infinity\"".to_string()
        } else {
            "\"Infinity\"".to_string()
        }
    } else {
        // `ryu`-free formatting via the standard float Display is round-trip
        // correct for f64 as of Rust 1.x's libcore float formatter; good
        // enough precision for a codec whose binary form is authoritative.
        value.to_string()
    }
}

pub fn decode_float(token: &Token) -> JsonResult<f32> {
    decode_double(token).map(|v| v as f32)
}

pub fn decode_double(token: &Token) -> JsonResult<f64> {
    match token {
        Token::Num(raw) => raw.parse::<f64>().map_err(|_| JsonError::InvalidValueForType),
        Token::Str(s) => match s.as_str() {
            "NaN" => Ok(f64::NAN),
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            other => other.parse::<f64>().map_err(|_| JsonError::InvalidValueForType),
        },
        _ => Err(JsonError::InvalidValueForType),
    }
}

pub fn encode_bool(value: bool) -> &'static str {
    if value {
        "true"
    } else {
        "false"
    }
}

pub fn decode_bool(token: &Token) -> JsonResult<bool> {
    match token {
        Token::Bool(b) => Ok(*b),
        Token::Str(s) if s == "true" => Ok(true),
        Token::Str(s) if s == "false" => Ok(false),
        _ => Err(JsonError::InvalidValueForType),
    }
}

/// `bytes` fields: standard base64 with padding on write; any of the four
/// common alphabets accepted on read (delegated to `Bytes::from_base64`).
pub fn encode_bytes(value: &Bytes) -> String {
    value.to_base64()
}

pub fn decode_bytes(token: &Token) -> JsonResult<Bytes> {
    match token {
        Token::Str(s) => Bytes::from_base64(s).map_err(|_| JsonError::InvalidValueForType),
        _ => Err(JsonError::InvalidValueForType),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn int64_round_trips_through_string() {
        let encoded = encode_int64(-9_223_372_036_854_775_808);
        assert_eq!(encoded, "-9223372036854775808");
        assert_eq!(
            decode_int64(&Token::Str(encoded)).unwrap(),
            -9_223_372_036_854_775_808
        );
    }

    #[test]
    fn int64_also_accepts_number_token_on_read() {
        assert_eq!(decode_int64(&Token::Num("42".into())).unwrap(), 42);
    }

    #[test]
    fn double_special_values_round_trip() {
        assert_eq!(encode_double(f64::NAN), "\"NaN\"");
        assert_eq!(decode_double(&Token::Str("NaN".into())).unwrap().is_nan(), true);
        assert_eq!(encode_double(f64::INFINITY), "\"Infinity\"");
        assert_eq!(
            decode_double(&Token::Str("Infinity".into())).unwrap(),
            f64::INFINITY
        );
        assert_eq!(encode_double(f64::NEG_INFINITY), "\"-Infinity\"");
    }

    #[test]
    fn bool_accepts_literal_and_string_forms() {
        assert_eq!(decode_bool(&Token::Bool(true)).unwrap(), true);
        assert_eq!(decode_bool(&Token::Str("false".into())).unwrap(), false);
    }

    #[test]
    fn bytes_round_trip_through_base64() {
        let original = Bytes::copy_from_slice(b"hello world");
        let encoded = encode_bytes(&original);
        let decoded = decode_bytes(&Token::Str(encoded)).unwrap();
        assert_eq!(decoded, original);
    }

    #[test]
    fn bytes_read_accepts_url_safe_alphabet() {
        // URL-safe encoding of the same bytes, no padding.
        let decoded = decode_bytes(&Token::Str("aGVsbG8".into())).unwrap();
        assert_eq!(decoded.as_slice(), b"hello");
    }
}
