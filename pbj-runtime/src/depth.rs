// SPDX-License-Identifier: Apache-2.0

use crate::error::{CodecError, CodecErrorKind};

/// Recursion-depth guard: entering a nested message decrements the budget;
/// hitting zero fails with [`CodecErrorKind::MaxDepthExceeded`] instead of
/// recursing further (and, on a sufficiently adversarial input, overflowing
/// the stack).
#[derive(Copy, Clone, Debug)]
pub struct DepthGuard {
    remaining: u32,
}

impl DepthGuard {
    pub fn new(max_depth: u32) -> Self {
        DepthGuard {
            remaining: max_depth,
        }
    }

    /// Produces the guard a nested message's `parse` call should use,
    /// failing if this level is already exhausted.
    pub fn descend(&self, offset: usize) -> Result<DepthGuard, CodecError> {
        if self.remaining == 0 {
            tracing::warn!(offset, "recursion-depth guard exceeded while parsing nested message");
            return Err(CodecError::new(CodecErrorKind::MaxDepthExceeded, None, offset));
        }
        Ok(DepthGuard {
            remaining: self.remaining - 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn exhausting_the_budget_fails() {
        let guard = DepthGuard::new(1);
        let child = guard.descend(0).unwrap();
        let err = child.descend(0).unwrap_err();
        assert_eq!(err.kind, CodecErrorKind::MaxDepthExceeded);
    }

    #[test]
    fn budget_of_64_allows_64_levels() {
        let mut guard = DepthGuard::new(64);
        for _ in 0..64 {
            guard = guard.descend(0).unwrap();
        }
        assert!(guard.descend(0).is_err());
    }
}
