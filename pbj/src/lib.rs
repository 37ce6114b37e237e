// SPDX-License-Identifier: Apache-2.0

//! A canonical, deterministic Protocol Buffers codec: wire format, canonical
//! JSON mapping, and the generated-style message model, as a single crate.
//!
//! This is the facade over the layered implementation:
//!
//! - [`bytes`] -- L0, the immutable byte sequence every other layer builds on.
//! - [`buffer`] -- L1, sequential/random-access views over it.
//! - [`wire`] -- L2, varint/zig-zag/tag primitives.
//! - [`runtime`] -- L3, the codec runtime (unknown fields, depth guard,
//!   fast-equals) every generated codec is a client of.
//! - [`messages`] -- L4, the generated-style codecs themselves.
//! - [`json`] -- L5, the canonical Protobuf-JSON mapping.
//! - [`model`] -- L6, the message model shared by every generated type.
//!
//! Most callers only need the top-level re-exports: construct a message,
//! `write_to_vec`/`parse` it, or `to_json`/`from_json` it.

pub use pbj_bytes as bytes;
pub use pbj_buffer as buffer;
pub use pbj_json as json;
pub use pbj_messages as messages;
pub use pbj_model as model;
pub use pbj_runtime as runtime;
pub use pbj_wire as wire;

pub use pbj_bytes::{Bytes, BytesError};
pub use pbj_messages::{Event, Payload, Severity, Timestamp};
pub use pbj_runtime::{CodecError, CodecErrorKind, ParseConfig, DEFAULT_MAX_DEPTH};

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn facade_reexports_round_trip_a_message() {
        let event = Event::default();
        let bytes = event.write_to_vec();
        let parsed = Event::parse(&bytes, &ParseConfig::default()).unwrap();
        assert_eq!(event, parsed);
    }
}
