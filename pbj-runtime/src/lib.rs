// SPDX-License-Identifier: Apache-2.0

//! L3: the codec runtime that every generated codec (L4, see
//! `pbj-messages`) is a client of. This is where tag dispatch, the
//! recursion-depth guard, unknown-field capture, canonical-size caching,
//! and the streaming fast-equals comparator live.
//!
//! Generated `parse`/`write`/`measure`/`fast_equals` functions are thin: they
//! know the field numbers and Rust types for one message; everything about
//! *how* a varint, a length-delimited frame, or an unknown field is read or
//! written lives here.

mod config;
mod depth;
mod error;
mod fast_equals;
mod framing;

pub use config::ParseConfig;
pub use depth::DepthGuard;
pub use error::{CodecError, CodecErrorKind};
pub use fast_equals::{fast_equals_canonical, FieldShape, RawOccurrence};
pub use framing::{read_length_delimited, read_raw_value, skip_field, write_length_delimited};

/// Default recursion budget for a top-level `parse` call, per spec: deep
/// enough for real-world nesting, shallow enough to bound stack usage on a
/// crafted adversarial input.
pub const DEFAULT_MAX_DEPTH: u32 = 64;
