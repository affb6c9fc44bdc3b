//! Postal location and the field checks shared by donor and hospital profiles.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lowest accepted six-digit pincode.
pub const PINCODE_MIN: u32 = 100_000;
/// Highest accepted six-digit pincode.
pub const PINCODE_MAX: u32 = 999_999;

/// Validation errors raised while building a profile.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileValidationError {
    /// A required text field is blank.
    #[error("{field} is required")]
    MissingField {
        /// Wire name of the field.
        field: &'static str,
    },
    /// A numeric field is zero or negative.
    #[error("{field} must be greater than zero")]
    NotPositive {
        /// Wire name of the field.
        field: &'static str,
    },
    /// The pincode is not a six-digit number.
    #[error("Pincode must be a valid 6-digit number")]
    InvalidPincode,
}

/// Trim `value` and reject it when nothing is left.
pub(crate) fn require_text(
    field: &'static str,
    value: &str,
) -> Result<String, ProfileValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ProfileValidationError::MissingField { field })
    } else {
        Ok(trimmed.to_owned())
    }
}

/// Six-digit postal code.
///
/// # Examples
/// ```
/// use bloodlink::domain::Pincode;
///
/// assert!("560001".parse::<Pincode>().is_ok());
/// assert!("056001".parse::<Pincode>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Pincode(u32);

impl Pincode {
    /// Validate a numeric pincode.
    pub const fn new(value: u32) -> Result<Self, ProfileValidationError> {
        if value >= PINCODE_MIN && value <= PINCODE_MAX {
            Ok(Self(value))
        } else {
            Err(ProfileValidationError::InvalidPincode)
        }
    }

    /// Numeric value.
    #[must_use]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Pincode {
    type Err = ProfileValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim();
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ProfileValidationError::InvalidPincode);
        }
        digits
            .parse::<u32>()
            .map_err(|_| ProfileValidationError::InvalidPincode)
            .and_then(Self::new)
    }
}

impl TryFrom<String> for Pincode {
    type Error = ProfileValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Pincode> for String {
    fn from(value: Pincode) -> Self {
        value.to_string()
    }
}

/// City-level address shared by both profile kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    /// City name.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country name.
    pub country: String,
    /// Six-digit postal code.
    #[schema(value_type = String, example = "560001")]
    pub pincode: Pincode,
}

impl Location {
    /// Trim each text field and reject blanks.
    pub fn normalised(self) -> Result<Self, ProfileValidationError> {
        Ok(Self {
            city: require_text("city", &self.city)?,
            state: require_text("state", &self.state)?,
            country: require_text("country", &self.country)?,
            pincode: self.pincode,
        })
    }
}
