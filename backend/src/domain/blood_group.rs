//! ABO/Rh blood groups.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Error returned when text does not name a known blood group.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown blood group '{value}'; expected one of A+, A-, B+, B-, AB+, AB-, O+, O-")]
pub struct BloodGroupParseError {
    /// Rejected input.
    pub value: String,
}

/// One of the eight ABO/Rh blood groups, written as `A+`, `O-`, and so on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum BloodGroup {
    /// A Rh-positive.
    #[serde(rename = "A+")]
    APositive,
    /// A Rh-negative.
    #[serde(rename = "A-")]
    ANegative,
    /// B Rh-positive.
    #[serde(rename = "B+")]
    BPositive,
    /// B Rh-negative.
    #[serde(rename = "B-")]
    BNegative,
    /// AB Rh-positive.
    #[serde(rename = "AB+")]
    AbPositive,
    /// AB Rh-negative.
    #[serde(rename = "AB-")]
    AbNegative,
    /// O Rh-positive.
    #[serde(rename = "O+")]
    OPositive,
    /// O Rh-negative.
    #[serde(rename = "O-")]
    ONegative,
}

impl BloodGroup {
    /// Every group, in display order.
    pub const ALL: [Self; 8] = [
        Self::APositive,
        Self::ANegative,
        Self::BPositive,
        Self::BNegative,
        Self::AbPositive,
        Self::AbNegative,
        Self::OPositive,
        Self::ONegative,
    ];

    /// Group whose donors may give to any requested group.
    pub const UNIVERSAL_DONOR: Self = Self::ONegative;

    /// Group that may receive from every donor group.
    pub const UNIVERSAL_ACCEPTOR: Self = Self::AbPositive;

    /// Canonical textual form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::APositive => "A+",
            Self::ANegative => "A-",
            Self::BPositive => "B+",
            Self::BNegative => "B-",
            Self::AbPositive => "AB+",
            Self::AbNegative => "AB-",
            Self::OPositive => "O+",
            Self::ONegative => "O-",
        }
    }
}

impl fmt::Display for BloodGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BloodGroup {
    type Err = BloodGroupParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalised = s.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|group| group.as_str() == normalised)
            .ok_or_else(|| BloodGroupParseError { value: s.to_owned() })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("A+", BloodGroup::APositive)]
    #[case("ab-", BloodGroup::AbNegative)]
    #[case(" O- ", BloodGroup::ONegative)]
    fn parses_textual_groups(#[case] raw: &str, #[case] expected: BloodGroup) {
        assert_eq!(raw.parse::<BloodGroup>(), Ok(expected));
    }

    #[rstest]
    #[case("C+")]
    #[case("A")]
    #[case("")]
    fn rejects_unknown_groups(#[case] raw: &str) {
        assert!(raw.parse::<BloodGroup>().is_err());
    }

    #[test]
    fn display_and_serde_agree() {
        for group in BloodGroup::ALL {
            let json = serde_json::to_value(group).expect("serialise group");
            assert_eq!(json.as_str(), Some(group.as_str()));
            assert_eq!(group.to_string().parse::<BloodGroup>(), Ok(group));
        }
    }
}
