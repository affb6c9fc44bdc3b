//! Donor eligibility evaluation.
//!
//! A donor may give blood when all of the following hold:
//!
//! - age is between 18 and 65 inclusive;
//! - weight is at least 50 kg;
//! - the declared health condition is "Generally Healthy" or "Minor Illness";
//! - the last donation, if any, was at least 90 days before today. A date
//!   after today fails this rule.
//!
//! Every violated rule is reported, in that order, with a human-readable
//! message. The evaluator is pure; "today" is supplied by the caller.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Youngest eligible age in years.
pub const MIN_DONOR_AGE: u32 = 18;
/// Oldest eligible age in years.
pub const MAX_DONOR_AGE: u32 = 65;
/// Lightest eligible weight in kilograms.
pub const MIN_DONOR_WEIGHT_KG: f64 = 50.0;
/// Minimum gap between donations in days.
pub const MIN_DAYS_BETWEEN_DONATIONS: i64 = 90;

/// Self-declared health condition category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum HealthCondition {
    /// No current health issues.
    #[serde(rename = "Generally Healthy")]
    GenerallyHealthy,
    /// Cold or similar minor illness.
    #[serde(rename = "Minor Illness")]
    MinorIllness,
    /// Chronic condition managed with medication.
    #[serde(rename = "Chronic Condition on Medication")]
    ChronicConditionOnMedication,
    /// Surgery in the recent past.
    #[serde(rename = "Recent Surgery")]
    RecentSurgery,
}

impl HealthCondition {
    /// Every category, in display order.
    pub const ALL: [Self; 4] = [
        Self::GenerallyHealthy,
        Self::MinorIllness,
        Self::ChronicConditionOnMedication,
        Self::RecentSurgery,
    ];

    /// Human-readable label, also used as the wire and storage form.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::GenerallyHealthy => "Generally Healthy",
            Self::MinorIllness => "Minor Illness",
            Self::ChronicConditionOnMedication => "Chronic Condition on Medication",
            Self::RecentSurgery => "Recent Surgery",
        }
    }

    /// Parse a stored or submitted label.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|condition| condition.label() == label)
    }

    /// Whether the condition permits donation.
    #[must_use]
    pub const fn permits_donation(self) -> bool {
        matches!(self, Self::GenerallyHealthy | Self::MinorIllness)
    }
}

impl fmt::Display for HealthCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rule a donor failed to satisfy.
///
/// Serialises as its human-readable message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum IneligibilityReason {
    /// Age outside 18..=65.
    AgeOutOfRange,
    /// Weight under 50 kg.
    Underweight,
    /// Health condition excludes donation.
    UnsuitableHealthCondition,
    /// Donated within the last 90 days.
    DonatedTooRecently,
}

impl IneligibilityReason {
    /// Message shown to the donor.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::AgeOutOfRange => "Age must be between 18-65 years",
            Self::Underweight => "Weight must be at least 50kg",
            Self::UnsuitableHealthCondition => "Health condition not suitable for donation",
            Self::DonatedTooRecently => "Last donation must be at least 90 days ago",
        }
    }

    const ALL: [Self; 4] = [
        Self::AgeOutOfRange,
        Self::Underweight,
        Self::UnsuitableHealthCondition,
        Self::DonatedTooRecently,
    ];
}

impl fmt::Display for IneligibilityReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

impl From<IneligibilityReason> for String {
    fn from(value: IneligibilityReason) -> Self {
        value.message().to_owned()
    }
}

impl TryFrom<String> for IneligibilityReason {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|reason| reason.message() == value)
            .ok_or_else(|| format!("unknown eligibility reason: {value}"))
    }
}

/// Inputs to the eligibility rules.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EligibilityCriteria {
    /// Age in whole years.
    pub age: u32,
    /// Body weight in kilograms.
    pub weight_kg: f64,
    /// Declared health condition.
    pub health_condition: HealthCondition,
    /// Date of the most recent donation, if any.
    pub last_donation: Option<NaiveDate>,
}

/// Outcome of [`evaluate`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EligibilityReport {
    /// `true` when no rule was violated.
    pub eligible: bool,
    /// Violated rules, in evaluation order.
    pub reasons: Vec<IneligibilityReason>,
}

/// Evaluate the eligibility rules against `today`.
///
/// # Examples
/// ```
/// use bloodlink::domain::{evaluate, EligibilityCriteria, HealthCondition};
/// use chrono::NaiveDate;
///
/// let today = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// let report = evaluate(
///     &EligibilityCriteria {
///         age: 30,
///         weight_kg: 72.0,
///         health_condition: HealthCondition::GenerallyHealthy,
///         last_donation: None,
///     },
///     today,
/// );
/// assert!(report.eligible);
/// ```
#[must_use]
pub fn evaluate(criteria: &EligibilityCriteria, today: NaiveDate) -> EligibilityReport {
    let mut reasons = Vec::new();

    if !(MIN_DONOR_AGE..=MAX_DONOR_AGE).contains(&criteria.age) {
        reasons.push(IneligibilityReason::AgeOutOfRange);
    }
    if criteria.weight_kg < MIN_DONOR_WEIGHT_KG {
        reasons.push(IneligibilityReason::Underweight);
    }
    if !criteria.health_condition.permits_donation() {
        reasons.push(IneligibilityReason::UnsuitableHealthCondition);
    }
    if let Some(last) = criteria.last_donation {
        let days_since = today.signed_duration_since(last).num_days();
        if days_since < MIN_DAYS_BETWEEN_DONATIONS {
            reasons.push(IneligibilityReason::DonatedTooRecently);
        }
    }

    EligibilityReport {
        eligible: reasons.is_empty(),
        reasons,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;
    use rstest::{fixture, rstest};

    #[fixture]
    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 15).expect("valid date")
    }

    #[fixture]
    fn healthy() -> EligibilityCriteria {
        EligibilityCriteria {
            age: 30,
            weight_kg: 70.0,
            health_condition: HealthCondition::GenerallyHealthy,
            last_donation: None,
        }
    }

    #[rstest]
    fn all_criteria_met_is_eligible(healthy: EligibilityCriteria, today: NaiveDate) {
        let report = evaluate(&healthy, today);
        assert!(report.eligible);
        assert!(report.reasons.is_empty());
    }

    #[rstest]
    #[case(17, false)]
    #[case(18, true)]
    #[case(65, true)]
    #[case(66, false)]
    fn age_bounds_are_inclusive(
        healthy: EligibilityCriteria,
        today: NaiveDate,
        #[case] age: u32,
        #[case] eligible: bool,
    ) {
        let report = evaluate(&EligibilityCriteria { age, ..healthy }, today);
        assert_eq!(report.eligible, eligible);
        if !eligible {
            assert_eq!(report.reasons, vec![IneligibilityReason::AgeOutOfRange]);
        }
    }

    #[rstest]
    #[case(49.9, false)]
    #[case(50.0, true)]
    fn weight_threshold(
        healthy: EligibilityCriteria,
        today: NaiveDate,
        #[case] weight_kg: f64,
        #[case] eligible: bool,
    ) {
        let report = evaluate(&EligibilityCriteria { weight_kg, ..healthy }, today);
        assert_eq!(report.eligible, eligible);
    }

    #[rstest]
    #[case(HealthCondition::GenerallyHealthy, true)]
    #[case(HealthCondition::MinorIllness, true)]
    #[case(HealthCondition::ChronicConditionOnMedication, false)]
    #[case(HealthCondition::RecentSurgery, false)]
    fn health_condition_gate(
        healthy: EligibilityCriteria,
        today: NaiveDate,
        #[case] health_condition: HealthCondition,
        #[case] eligible: bool,
    ) {
        let report = evaluate(
            &EligibilityCriteria {
                health_condition,
                ..healthy
            },
            today,
        );
        assert_eq!(report.eligible, eligible);
    }

    #[rstest]
    #[case(89, false)]
    #[case(90, true)]
    #[case(400, true)]
    fn donation_gap(
        healthy: EligibilityCriteria,
        today: NaiveDate,
        #[case] days_ago: u64,
        #[case] eligible: bool,
    ) {
        let last = today.checked_sub_days(Days::new(days_ago)).expect("valid date");
        let report = evaluate(
            &EligibilityCriteria {
                last_donation: Some(last),
                ..healthy
            },
            today,
        );
        assert_eq!(report.eligible, eligible);
    }

    #[rstest]
    fn future_donation_counts_as_too_recent(healthy: EligibilityCriteria, today: NaiveDate) {
        let next_week = today.checked_add_days(Days::new(7)).expect("valid date");
        let report = evaluate(
            &EligibilityCriteria {
                last_donation: Some(next_week),
                ..healthy
            },
            today,
        );
        assert_eq!(report.reasons, vec![IneligibilityReason::DonatedTooRecently]);
    }

    #[rstest]
    fn reports_every_violation_in_order(today: NaiveDate) {
        let criteria = EligibilityCriteria {
            age: 70,
            weight_kg: 45.0,
            health_condition: HealthCondition::RecentSurgery,
            last_donation: Some(today),
        };
        let report = evaluate(&criteria, today);
        let messages: Vec<&str> = report.reasons.iter().map(|r| r.message()).collect();
        assert_eq!(
            messages,
            vec![
                "Age must be between 18-65 years",
                "Weight must be at least 50kg",
                "Health condition not suitable for donation",
                "Last donation must be at least 90 days ago",
            ]
        );
    }

    #[rstest]
    fn reasons_round_trip_through_messages() {
        for reason in IneligibilityReason::ALL {
            let text = String::from(reason);
            assert_eq!(IneligibilityReason::try_from(text), Ok(reason));
        }
    }

    #[rstest]
    #[case("Generally Healthy", Some(HealthCondition::GenerallyHealthy))]
    #[case("Recent Surgery", Some(HealthCondition::RecentSurgery))]
    #[case("recent surgery", None)]
    fn health_condition_labels(#[case] label: &str, #[case] expected: Option<HealthCondition>) {
        assert_eq!(HealthCondition::from_label(label), expected);
    }
}
