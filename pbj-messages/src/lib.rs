// SPDX-License-Identifier: Apache-2.0

//! L4: hand-written stand-ins for what the PBJ compiler would generate from
//! a `.proto` file.
//!
//! Nothing here is hand-tuned beyond what a generator would reasonably
//! emit: each message exposes `parse`/`write`/`measure`/`fast_equals`/
//! `default_instance`, a `field_def_by_number` table (via [`pbj_model::Schema`]),
//! and canonical-JSON `to_json`/`from_json`. Together the two messages below
//! exercise every wire-format corner the runtime contracts care about:
//! implicit-presence scalar omission, a packed repeated scalar, an ordered
//! map, a `oneof`, a Proto3 `optional` wrapper field, a nested message, and
//! unknown-field preservation.

pub mod messages;

pub use messages::event::{Event, Payload};
pub use messages::severity::Severity;
pub use messages::timestamp::Timestamp;
