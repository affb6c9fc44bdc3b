//! Hospital profiles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::location::require_text;
use crate::domain::{AccountId, EmailAddress, HospitalContact, Location, ProfileValidationError};

/// Profile fields submitted by a hospital.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalProfileDraft {
    /// Display name shown to donors.
    pub hospital_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Street address.
    pub address: String,
    /// Postal location.
    #[serde(flatten)]
    pub location: Location,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
}

/// Stored hospital profile.
///
/// The contact email is copied from the owning account and cannot be edited
/// through the profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalProfile {
    /// Owning hospital account.
    pub account_id: AccountId,
    /// Display name shown to donors.
    pub hospital_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Account email.
    #[schema(value_type = String)]
    pub email: EmailAddress,
    /// Street address.
    pub address: String,
    /// Postal location.
    #[serde(flatten)]
    pub location: Location,
    /// Free-form description.
    pub description: String,
    /// First save.
    pub created_at: DateTime<Utc>,
    /// Most recent save.
    pub updated_at: DateTime<Utc>,
}

impl HospitalProfile {
    /// Validate `draft` and build the profile.
    ///
    /// # Errors
    /// Returns [`ProfileValidationError`] when a required field is blank.
    pub fn from_draft(
        account_id: AccountId,
        email: EmailAddress,
        draft: HospitalProfileDraft,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, ProfileValidationError> {
        Ok(Self {
            account_id,
            hospital_name: require_text("hospitalName", &draft.hospital_name)?,
            phone: require_text("phone", &draft.phone)?,
            email,
            address: require_text("address", &draft.address)?,
            location: draft.location.normalised()?,
            description: draft.description.trim().to_owned(),
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        })
    }

    /// Contact details copied onto every request the hospital issues.
    #[must_use]
    pub fn contact(&self) -> HospitalContact {
        HospitalContact {
            name: self.hospital_name.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            city: self.location.city.clone(),
            state: self.location.state.clone(),
            country: self.location.country.clone(),
            pincode: self.location.pincode,
        }
    }
}
