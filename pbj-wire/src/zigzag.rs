// SPDX-License-Identifier: Apache-2.0

//! Sign-folding transform used for `sint32`/`sint64`: small-magnitude
//! negative numbers stay small after folding, instead of becoming the
//! ten-byte varints a naive two's-complement encoding would produce.

#[must_use]
#[inline]
pub const fn encode32(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

#[must_use]
#[inline]
pub const fn decode32(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}

#[must_use]
#[inline]
pub const fn encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[must_use]
#[inline]
pub const fn decode64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
