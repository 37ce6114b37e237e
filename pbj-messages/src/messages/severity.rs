// SPDX-License-Identifier: Apache-2.0

/// `Event.severity`'s enum type. Proto3 requires the zero variant to be the
/// default, so `Unspecified` is what an absent/omitted field decodes to.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Severity {
    #[default]
    Unspecified = 0,
    Info = 1,
    Warning = 2,
    Error = 3,
}

impl Severity {
    /// What the generator emits in place of reflection-based enum decoding:
    /// a plain match from the wire integer to the known variant.
    pub fn from_ordinal(value: i32) -> Option<Severity> {
        match value {
            0 => Some(Severity::Unspecified),
            1 => Some(Severity::Info),
            2 => Some(Severity::Warning),
            3 => Some(Severity::Error),
            _ => None,
        }
    }

    pub fn json_name(self) -> &'static str {
        match self {
            Severity::Unspecified => "SEVERITY_UNSPECIFIED",
            Severity::Info => "SEVERITY_INFO",
            Severity::Warning => "SEVERITY_WARNING",
            Severity::Error => "SEVERITY_ERROR",
        }
    }

    pub fn from_json_name(name: &str) -> Option<Severity> {
        match name {
            "SEVERITY_UNSPECIFIED" => Some(Severity::Unspecified),
            "SEVERITY_INFO" => Some(Severity::Info),
            "SEVERITY_WARNING" => Some(Severity::Warning),
            "SEVERITY_ERROR" => Some(Severity::Error),
            _ => None,
        }
    }
}

impl From<Severity> for i32 {
    fn from(value: Severity) -> i32 {
        value as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_is_the_zero_variant() {
        assert_eq!(Severity::default(), Severity::Unspecified);
    }

    #[test]
    fn from_ordinal_rejects_out_of_range() {
        assert_eq!(Severity::from_ordinal(99), None);
    }

    #[test]
    fn json_name_round_trips() {
        for s in [Severity::Unspecified, Severity::Info, Severity::Warning, Severity::Error] {
            assert_eq!(Severity::from_json_name(s.json_name()), Some(s));
        }
    }
}
