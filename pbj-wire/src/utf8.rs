// SPDX-License-Identifier: Apache-2.0

//! Strict UTF-8 length/encode/decode helpers for `string` fields.
//!
//! Rust's `str` type is a built-in invariant: it can never hold unpaired
//! surrogates, overlong sequences, or out-of-range code points, so the
//! "encode" direction is exact by construction. The "decode" direction
//! validates untrusted bytes with the same strictness the wire format
//! requires: overlong sequences, surrogate halves, code points beyond
//! U+10FFFF, and truncated sequences are all rejected.

use crate::{WireError, WireResult};

/// Exact number of bytes `s` occupies when UTF-8 encoded. `str` is always
/// valid UTF-8, so this is simply its byte length; it exists as a named
/// operation to mirror the wire-format contract (callers should not assume
/// `str::len` is the intended API).
#[must_use]
#[inline]
pub fn encoded_length(s: &str) -> usize {
    s.len()
}

/// Copies the UTF-8 encoding of `s` into `dst` starting at `offset`,
/// returning the number of bytes written. `dst` must have at least
/// `encoded_length(s)` bytes available from `offset`.
pub fn encode(s: &str, dst: &mut [u8], offset: usize) -> WireResult<usize> {
    let bytes = s.as_bytes();
    let end = offset.checked_add(bytes.len()).ok_or(WireError::MalformedString)?;
    dst.get_mut(offset..end)
        .ok_or(WireError::MalformedString)?
        .copy_from_slice(bytes);
    Ok(bytes.len())
}

/// Strictly decodes `len` bytes starting at `offset` in `bytes` as UTF-8.
/// Rejects overlong sequences, lone surrogate halves, code points above
/// U+10FFFF, and truncated multi-byte sequences -- anything `str::from_utf8`
/// itself rejects, which already implements the full strict grammar.
pub fn decode(bytes: &[u8], offset: usize, len: usize) -> WireResult<&str> {
    let end = offset.checked_add(len).ok_or(WireError::MalformedString)?;
    let slice = bytes.get(offset..end).ok_or(WireError::MalformedString)?;
    std::str::from_utf8(slice).map_err(|_| WireError::MalformedString)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn encode_decode_round_trip_for_every_scalar_range() {
        let samples = ["", "ascii", "héllo", "\u{10348}", "日本語"];
        for s in samples {
            let mut buf = vec![0u8; encoded_length(s)];
            let written = encode(s, &mut buf, 0).unwrap();
            assert_eq!(written, buf.len());
            assert_eq!(decode(&buf, 0, buf.len()).unwrap(), s);
        }
    }

    #[test]
    fn decode_rejects_truncated_sequence() {
        // Lead byte of a 3-byte sequence, then nothing.
        assert_eq!(decode(&[0xE2], 0, 1), Err(WireError::MalformedString));
    }

    #[test]
    fn decode_rejects_lone_surrogate_half() {
        // ED A0 80 is the CESU-8 / WTF-8 encoding of U+D800 (a lone high
        // surrogate), which is not valid UTF-8.
        assert_eq!(decode(&[0xED, 0xA0, 0x80], 0, 3), Err(WireError::MalformedString));
    }

    #[test]
    fn decode_rejects_overlong_encoding() {
        // Overlong two-byte encoding of NUL (should be a single 0x00 byte).
        assert_eq!(decode(&[0xC0, 0x80], 0, 2), Err(WireError::MalformedString));
    }

    #[test]
    fn fuzz_round_trip_holds_for_any_generated_string() {
        use bolero::generator::TypeGenerator;
        bolero::check!()
            .with_generator(String::produce())
            .for_each(|s| {
                let mut buf = vec![0u8; encoded_length(s)];
                let written = encode(s, &mut buf, 0).unwrap();
                assert_eq!(written, buf.len());
                assert_eq!(decode(&buf, 0, buf.len()).unwrap(), s);
            })
    }

    #[test]
    fn decode_rejects_code_point_beyond_max() {
        // F4 90 80 80 would decode to U+110000, one past U+10FFFF.
        assert_eq!(
            decode(&[0xF4, 0x90, 0x80, 0x80], 0, 4),
            Err(WireError::MalformedString)
        );
    }
}
