// SPDX-License-Identifier: Apache-2.0

/// An enum field's value: either one of the schema's known variants, or an
/// integer the current schema doesn't recognize (forward compatibility --
/// a newer writer may emit a variant this reader's schema predates).
///
/// Default is always the zero-valued variant per Proto3 rules; generators
/// must make `T::default()` return that variant.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum EnumValue<T> {
    Known(T),
    Unrecognised(i32),
}

impl<T: Default> Default for EnumValue<T> {
    fn default() -> Self {
        EnumValue::Known(T::default())
    }
}

impl<T> EnumValue<T> {
    pub fn known(&self) -> Option<&T> {
        match self {
            EnumValue::Known(v) => Some(v),
            EnumValue::Unrecognised(_) => None,
        }
    }
}

impl<T> EnumValue<T>
where
    T: Copy + Into<i32>,
{
    /// Numeric wire value, regardless of whether it's recognized.
    pub fn ordinal(&self) -> i32 {
        match self {
            EnumValue::Known(v) => (*v).into(),
            EnumValue::Unrecognised(raw) => *raw,
        }
    }
}
