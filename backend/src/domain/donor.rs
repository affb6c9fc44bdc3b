//! Donor profiles.
//!
//! A profile is rebuilt from a [`DonorProfileDraft`] on every save. Saving
//! re-runs the eligibility rules and resets availability to the outcome, so an
//! ineligible donor is never searchable until the rules pass again.
//!
//! "Today" for the donation gap is the UTC calendar date of the save. A last
//! donation dated after today fails the gap rule like a recent one.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::location::require_text;
use crate::domain::{
    AccountId, BloodGroup, EligibilityCriteria, HealthCondition, IneligibilityReason, Location,
    ProfileValidationError, evaluate,
};

/// Raised when a donor asks to become available while ineligible.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("ineligible donors cannot be marked available")]
pub struct AvailabilityError;

/// Profile fields submitted by a donor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfileDraft {
    /// Full name.
    pub name: String,
    /// Age in whole years.
    pub age: u32,
    /// Body weight in kilograms.
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    /// Contact phone number.
    pub phone: String,
    /// Postal location.
    #[serde(flatten)]
    pub location: Location,
    /// ABO/Rh group.
    pub blood_group: BloodGroup,
    /// Self-declared health condition.
    pub health_condition: HealthCondition,
    /// Most recent donation, if any.
    #[serde(default, rename = "lastDonationDate")]
    pub last_donation: Option<NaiveDate>,
    /// Hemoglobin level in g/dL, if known.
    #[serde(default)]
    pub hemoglobin: Option<f64>,
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

impl DonorProfileDraft {
    fn validated(self) -> Result<Self, ProfileValidationError> {
        if self.age == 0 {
            return Err(ProfileValidationError::NotPositive { field: "age" });
        }
        if !is_positive(self.weight_kg) {
            return Err(ProfileValidationError::NotPositive { field: "weight" });
        }
        if self.hemoglobin.is_some_and(|level| !is_positive(level)) {
            return Err(ProfileValidationError::NotPositive {
                field: "hemoglobin",
            });
        }
        Ok(Self {
            name: require_text("name", &self.name)?,
            phone: require_text("phone", &self.phone)?,
            location: self.location.normalised()?,
            ..self
        })
    }
}

/// Stored donor profile with its eligibility outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorProfile {
    /// Owning donor account.
    pub account_id: AccountId,
    /// Full name.
    pub name: String,
    /// Age in whole years.
    pub age: u32,
    /// Body weight in kilograms.
    #[serde(rename = "weight")]
    pub weight_kg: f64,
    /// Contact phone number.
    pub phone: String,
    /// Postal location.
    #[serde(flatten)]
    pub location: Location,
    /// ABO/Rh group.
    pub blood_group: BloodGroup,
    /// Self-declared health condition.
    pub health_condition: HealthCondition,
    /// Most recent donation, if any.
    #[serde(rename = "lastDonationDate")]
    pub last_donation: Option<NaiveDate>,
    /// Hemoglobin level in g/dL, if known.
    pub hemoglobin: Option<f64>,
    /// Outcome of the eligibility rules at the last save.
    pub eligible: bool,
    /// Donor-controlled availability; never `true` while ineligible.
    pub available: bool,
    /// Messages for every violated rule.
    #[schema(value_type = Vec<String>)]
    pub eligibility_reasons: Vec<IneligibilityReason>,
    /// First save.
    pub created_at: DateTime<Utc>,
    /// Most recent save or availability change.
    pub updated_at: DateTime<Utc>,
}

impl DonorProfile {
    /// Validate `draft`, evaluate eligibility as of `now` and build the
    /// profile. `created_at` carries over from a previous save when given.
    ///
    /// # Errors
    /// Returns [`ProfileValidationError`] when a field is blank or not
    /// positive.
    pub fn from_draft(
        account_id: AccountId,
        draft: DonorProfileDraft,
        created_at: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> Result<Self, ProfileValidationError> {
        let today = now.date_naive();
        let draft = draft.validated()?;
        let report = evaluate(
            &EligibilityCriteria {
                age: draft.age,
                weight_kg: draft.weight_kg,
                health_condition: draft.health_condition,
                last_donation: draft.last_donation,
            },
            today,
        );

        Ok(Self {
            account_id,
            name: draft.name,
            age: draft.age,
            weight_kg: draft.weight_kg,
            phone: draft.phone,
            location: draft.location,
            blood_group: draft.blood_group,
            health_condition: draft.health_condition,
            last_donation: draft.last_donation,
            hemoglobin: draft.hemoglobin,
            eligible: report.eligible,
            available: report.eligible,
            eligibility_reasons: report.reasons,
            created_at: created_at.unwrap_or(now),
            updated_at: now,
        })
    }

    /// Toggle availability.
    ///
    /// # Errors
    /// Returns [`AvailabilityError`] when `available` is requested for an
    /// ineligible donor. Turning availability off always succeeds.
    pub fn set_availability(
        &mut self,
        available: bool,
        now: DateTime<Utc>,
    ) -> Result<(), AvailabilityError> {
        if available && !self.eligible {
            return Err(AvailabilityError);
        }
        self.available = available;
        self.updated_at = now;
        Ok(())
    }

    /// Whether hospitals may find this donor.
    #[must_use]
    pub const fn is_searchable(&self) -> bool {
        self.eligible && self.available
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Pincode;
    use chrono::TimeZone;
    use rstest::{fixture, rstest};

    #[fixture]
    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 6, 15, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[fixture]
    fn draft() -> DonorProfileDraft {
        sample_draft()
    }

    fn sample_draft() -> DonorProfileDraft {
        DonorProfileDraft {
            name: " Asha Rao ".into(),
            age: 29,
            weight_kg: 61.5,
            phone: "9876543210".into(),
            location: Location {
                city: "Bengaluru".into(),
                state: "Karnataka".into(),
                country: "India".into(),
                pincode: Pincode::new(560_001).expect("valid pincode"),
            },
            blood_group: BloodGroup::APositive,
            health_condition: HealthCondition::GenerallyHealthy,
            last_donation: None,
            hemoglobin: Some(13.4),
        }
    }

    #[rstest]
    fn eligible_draft_becomes_available(draft: DonorProfileDraft, now: DateTime<Utc>) {
        let profile =
            DonorProfile::from_draft(AccountId::random(), draft, None, now).expect("valid draft");
        assert_eq!(profile.name, "Asha Rao");
        assert!(profile.eligible);
        assert!(profile.available);
        assert!(profile.is_searchable());
        assert_eq!(profile.created_at, now);
    }

    #[rstest]
    fn ineligible_draft_is_hidden_with_reasons(draft: DonorProfileDraft, now: DateTime<Utc>) {
        let draft = DonorProfileDraft {
            health_condition: HealthCondition::RecentSurgery,
            ..draft
        };
        let profile =
            DonorProfile::from_draft(AccountId::random(), draft, None, now).expect("valid draft");
        assert!(!profile.eligible);
        assert!(!profile.available);
        assert_eq!(
            profile.eligibility_reasons,
            vec![IneligibilityReason::UnsuitableHealthCondition]
        );
    }

    #[rstest]
    fn resave_keeps_creation_time(draft: DonorProfileDraft, now: DateTime<Utc>) {
        let first = now - chrono::Duration::days(3);
        let profile = DonorProfile::from_draft(AccountId::random(), draft, Some(first), now)
            .expect("valid draft");
        assert_eq!(profile.created_at, first);
        assert_eq!(profile.updated_at, now);
    }

    #[rstest]
    #[case::blank_name(DonorProfileDraft { name: " ".into(), ..sample_draft() }, ProfileValidationError::MissingField { field: "name" })]
    #[case::zero_age(DonorProfileDraft { age: 0, ..sample_draft() }, ProfileValidationError::NotPositive { field: "age" })]
    #[case::zero_weight(DonorProfileDraft { weight_kg: 0.0, ..sample_draft() }, ProfileValidationError::NotPositive { field: "weight" })]
    #[case::negative_hemoglobin(DonorProfileDraft { hemoglobin: Some(-1.0), ..sample_draft() }, ProfileValidationError::NotPositive { field: "hemoglobin" })]
    fn invalid_drafts_are_rejected(
        now: DateTime<Utc>,
        #[case] draft: DonorProfileDraft,
        #[case] expected: ProfileValidationError,
    ) {
        let err = DonorProfile::from_draft(AccountId::random(), draft, None, now)
            .expect_err("draft must be rejected");
        assert_eq!(err, expected);
    }

    #[rstest]
    fn future_last_donation_saves_as_ineligible(draft: DonorProfileDraft, now: DateTime<Utc>) {
        let tomorrow = now.date_naive().succ_opt().expect("valid date");
        let draft = DonorProfileDraft {
            last_donation: Some(tomorrow),
            ..draft
        };
        let profile =
            DonorProfile::from_draft(AccountId::random(), draft, None, now).expect("valid draft");
        assert!(!profile.eligible);
        assert!(!profile.available);
        assert_eq!(profile.last_donation, Some(tomorrow));
        assert_eq!(
            profile.eligibility_reasons,
            vec![IneligibilityReason::DonatedTooRecently]
        );
    }

    #[rstest]
    #[case::late_utc_evening(23, false)]
    #[case::next_utc_morning(24, true)]
    fn donation_gap_counts_utc_calendar_days(
        draft: DonorProfileDraft,
        #[case] hour: i64,
        #[case] eligible: bool,
    ) {
        // 89 days before 2026-06-14, 90 before 2026-06-15.
        let last_donation = NaiveDate::from_ymd_opt(2026, 3, 17).expect("valid date");
        let midnight = Utc
            .with_ymd_and_hms(2026, 6, 14, 0, 0, 0)
            .single()
            .expect("valid timestamp");
        let now = midnight + chrono::Duration::hours(hour);
        let draft = DonorProfileDraft {
            last_donation: Some(last_donation),
            ..draft
        };
        let profile =
            DonorProfile::from_draft(AccountId::random(), draft, None, now).expect("valid draft");
        assert_eq!(profile.eligible, eligible);
    }

    #[rstest]
    fn ineligible_donor_cannot_become_available(draft: DonorProfileDraft, now: DateTime<Utc>) {
        let draft = DonorProfileDraft { age: 17, ..draft };
        let mut profile =
            DonorProfile::from_draft(AccountId::random(), draft, None, now).expect("valid draft");
        assert_eq!(profile.set_availability(true, now), Err(AvailabilityError));
        assert!(profile.set_availability(false, now).is_ok());
    }

    #[rstest]
    fn eligible_donor_can_pause_and_resume(draft: DonorProfileDraft, now: DateTime<Utc>) {
        let mut profile =
            DonorProfile::from_draft(AccountId::random(), draft, None, now).expect("valid draft");
        profile.set_availability(false, now).expect("pause");
        assert!(!profile.is_searchable());
        profile.set_availability(true, now).expect("resume");
        assert!(profile.is_searchable());
    }

    #[rstest]
    fn draft_uses_wire_field_names(draft: DonorProfileDraft) {
        let json = serde_json::to_value(&draft).expect("serialise draft");
        assert_eq!(json["weight"], serde_json::json!(61.5));
        assert_eq!(json["pincode"], serde_json::json!("560001"));
        assert_eq!(json["bloodGroup"], serde_json::json!("A+"));
        assert_eq!(json["healthCondition"], serde_json::json!("Generally Healthy"));
    }
}
