// SPDX-License-Identifier: Apache-2.0

use crate::DEFAULT_MAX_DEPTH;

/// Per-call parse configuration. Every generated `parse` function takes one
/// of these; there is no global/thread-local configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Rejects duplicated non-repeated scalar fields and unrecognized enum
    /// values instead of the lenient "last wins" / "store raw integer"
    /// defaults.
    pub strict: bool,
    /// When `true`, fields not present in the schema are captured as
    /// `UnknownField`s and re-emitted by `write`. When `false`, they are
    /// skipped and discarded.
    pub parse_unknown_fields: bool,
    /// Recursion budget for nested messages; exceeding it fails with
    /// `MaxDepthExceeded` rather than overflowing the stack.
    pub max_depth: u32,
}

impl Default for ParseConfig {
    fn default() -> Self {
        ParseConfig {
            strict: false,
            parse_unknown_fields: true,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ParseConfig {
    pub fn strict() -> Self {
        ParseConfig {
            strict: true,
            ..Self::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }
}
