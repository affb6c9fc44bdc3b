//! Blood requests and their lifecycle.
//!
//! ```text
//! pending ──accept──▶ accepted ──mark_donated──▶ donated
//!    │
//!    └────reject────▶ rejected
//! ```
//!
//! Status only moves forward. `rejected` and `donated` are terminal, and each
//! transition stamps its own timestamp.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AccountId, BloodGroup, EmailAddress, Pincode};

/// Identifier of a single donor-addressed request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct RequestId(Uuid);

impl RequestId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting the donor's answer.
    Pending,
    /// The donor agreed to donate.
    Accepted,
    /// The donor declined.
    Rejected,
    /// The hospital recorded the donation.
    Donated,
}

impl RequestStatus {
    /// Lowercase wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Accepted => "accepted",
            Self::Rejected => "rejected",
            Self::Donated => "donated",
        }
    }

    /// Whether `next` directly follows this status.
    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Accepted | Self::Rejected) | (Self::Accepted, Self::Donated)
        )
    }

    /// Whether no further transition is possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Rejected | Self::Donated)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when text does not name a request status.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("status must be one of: pending, accepted, rejected, donated")]
pub struct RequestStatusParseError;

impl FromStr for RequestStatus {
    type Err = RequestStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "rejected" => Ok(Self::Rejected),
            "donated" => Ok(Self::Donated),
            _ => Err(RequestStatusParseError),
        }
    }
}

/// Errors raised by request construction and transitions.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BloodRequestError {
    /// A request must ask for at least one unit.
    #[error("unitsRequired must be at least 1")]
    NoUnits,
    /// The requested transition is not allowed from the current status.
    #[error("cannot move request from {from} to {to}")]
    InvalidTransition {
        /// Status at the time of the attempt.
        from: RequestStatus,
        /// Requested status.
        to: RequestStatus,
    },
}

/// Hospital details denormalised onto each request so donors can reach the
/// hospital without reading its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HospitalContact {
    /// Hospital display name.
    pub name: String,
    /// Contact phone number.
    pub phone: String,
    /// Contact email.
    #[schema(value_type = String)]
    pub email: EmailAddress,
    /// City name.
    pub city: String,
    /// State or province.
    pub state: String,
    /// Country name.
    pub country: String,
    /// Six-digit postal code.
    #[schema(value_type = String)]
    pub pincode: Pincode,
}

/// Stored field set used to rehydrate a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BloodRequestRecord {
    /// Request identifier.
    pub id: RequestId,
    /// Issuing hospital.
    pub hospital_id: AccountId,
    /// Addressed donor.
    pub donor_id: AccountId,
    /// Requested group.
    pub blood_group: BloodGroup,
    /// Units asked for.
    pub units_required: u32,
    /// Denormalised hospital contact.
    pub hospital: HospitalContact,
    /// Current status.
    pub status: RequestStatus,
    /// Creation time.
    pub created_at: DateTime<Utc>,
    /// Set when accepted.
    pub accepted_at: Option<DateTime<Utc>>,
    /// Set when rejected.
    pub rejected_at: Option<DateTime<Utc>>,
    /// Set when donated.
    pub donated_at: Option<DateTime<Utc>>,
}

/// A request from one hospital to one donor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BloodRequest {
    id: RequestId,
    hospital_id: AccountId,
    donor_id: AccountId,
    blood_group: BloodGroup,
    units_required: u32,
    hospital: HospitalContact,
    status: RequestStatus,
    created_at: DateTime<Utc>,
    accepted_at: Option<DateTime<Utc>>,
    rejected_at: Option<DateTime<Utc>>,
    donated_at: Option<DateTime<Utc>>,
}

impl BloodRequest {
    /// Open a pending request.
    ///
    /// # Errors
    /// Returns [`BloodRequestError::NoUnits`] when `units_required` is zero.
    pub fn pending(
        hospital_id: AccountId,
        donor_id: AccountId,
        blood_group: BloodGroup,
        units_required: u32,
        hospital: HospitalContact,
        created_at: DateTime<Utc>,
    ) -> Result<Self, BloodRequestError> {
        if units_required == 0 {
            return Err(BloodRequestError::NoUnits);
        }
        Ok(Self {
            id: RequestId::random(),
            hospital_id,
            donor_id,
            blood_group,
            units_required,
            hospital,
            status: RequestStatus::Pending,
            created_at,
            accepted_at: None,
            rejected_at: None,
            donated_at: None,
        })
    }

    /// Rebuild a request from storage.
    #[must_use]
    pub fn restore(record: BloodRequestRecord) -> Self {
        Self {
            id: record.id,
            hospital_id: record.hospital_id,
            donor_id: record.donor_id,
            blood_group: record.blood_group,
            units_required: record.units_required,
            hospital: record.hospital,
            status: record.status,
            created_at: record.created_at,
            accepted_at: record.accepted_at,
            rejected_at: record.rejected_at,
            donated_at: record.donated_at,
        }
    }

    fn advance(&mut self, to: RequestStatus) -> Result<(), BloodRequestError> {
        if !self.status.can_transition_to(to) {
            return Err(BloodRequestError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        Ok(())
    }

    /// Donor accepts a pending request.
    ///
    /// # Errors
    /// Returns [`BloodRequestError::InvalidTransition`] unless pending.
    pub fn accept(&mut self, at: DateTime<Utc>) -> Result<(), BloodRequestError> {
        self.advance(RequestStatus::Accepted)?;
        self.accepted_at = Some(at);
        Ok(())
    }

    /// Donor declines a pending request.
    ///
    /// # Errors
    /// Returns [`BloodRequestError::InvalidTransition`] unless pending.
    pub fn reject(&mut self, at: DateTime<Utc>) -> Result<(), BloodRequestError> {
        self.advance(RequestStatus::Rejected)?;
        self.rejected_at = Some(at);
        Ok(())
    }

    /// Hospital records the donation of an accepted request.
    ///
    /// # Errors
    /// Returns [`BloodRequestError::InvalidTransition`] unless accepted.
    pub fn mark_donated(&mut self, at: DateTime<Utc>) -> Result<(), BloodRequestError> {
        self.advance(RequestStatus::Donated)?;
        self.donated_at = Some(at);
        Ok(())
    }

    /// Request identifier.
    #[must_use]
    pub const fn id(&self) -> RequestId {
        self.id
    }

    /// Issuing hospital.
    #[must_use]
    pub const fn hospital_id(&self) -> AccountId {
        self.hospital_id
    }

    /// Addressed donor.
    #[must_use]
    pub const fn donor_id(&self) -> AccountId {
        self.donor_id
    }

    /// Requested group.
    #[must_use]
    pub const fn blood_group(&self) -> BloodGroup {
        self.blood_group
    }

    /// Units asked for.
    #[must_use]
    pub const fn units_required(&self) -> u32 {
        self.units_required
    }

    /// Denormalised hospital contact.
    #[must_use]
    pub const fn hospital(&self) -> &HospitalContact {
        &self.hospital
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> RequestStatus {
        self.status
    }

    /// Creation time.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Acceptance time, if accepted.
    #[must_use]
    pub const fn accepted_at(&self) -> Option<DateTime<Utc>> {
        self.accepted_at
    }

    /// Rejection time, if rejected.
    #[must_use]
    pub const fn rejected_at(&self) -> Option<DateTime<Utc>> {
        self.rejected_at
    }

    /// Donation time, if donated.
    #[must_use]
    pub const fn donated_at(&self) -> Option<DateTime<Utc>> {
        self.donated_at
    }

    /// Whether `account` is the issuing hospital or the addressed donor.
    #[must_use]
    pub fn involves(&self, account: &AccountId) -> bool {
        self.hospital_id == *account || self.donor_id == *account
    }
}

/// Per-status request counts for a hospital dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestStats {
    /// All requests issued.
    pub total: u64,
    /// Awaiting an answer.
    pub pending: u64,
    /// Accepted but not yet donated.
    pub accepted: u64,
    /// Declined.
    pub rejected: u64,
    /// Completed donations.
    pub donated: u64,
    /// `donated / total` as a whole percentage, rounded half up.
    pub success_rate: u64,
}

impl RequestStats {
    /// Count `requests` by status.
    ///
    /// # Examples
    /// ```
    /// use bloodlink::domain::RequestStats;
    ///
    /// let stats = RequestStats::tally(&[]);
    /// assert_eq!(stats.success_rate, 0);
    /// ```
    #[must_use]
    pub fn tally(requests: &[BloodRequest]) -> Self {
        let mut stats = requests.iter().fold(Self::default(), |mut acc, request| {
            acc.total += 1;
            match request.status() {
                RequestStatus::Pending => acc.pending += 1,
                RequestStatus::Accepted => acc.accepted += 1,
                RequestStatus::Rejected => acc.rejected += 1,
                RequestStatus::Donated => acc.donated += 1,
            }
            acc
        });
        if stats.total > 0 {
            stats.success_rate = (stats.donated * 200 + stats.total) / (stats.total * 2);
        }
        stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn contact() -> HospitalContact {
        HospitalContact {
            name: "City General".into(),
            phone: "080-5550100".into(),
            email: EmailAddress::new("desk@citygeneral.org").expect("valid email"),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            pincode: Pincode::new(560_001).expect("valid pincode"),
        }
    }

    #[fixture]
    fn request(contact: HospitalContact) -> BloodRequest {
        BloodRequest::pending(
            AccountId::random(),
            AccountId::random(),
            BloodGroup::APositive,
            2,
            contact,
            Utc::now(),
        )
        .expect("valid request")
    }

    #[rstest]
    fn new_requests_are_pending(request: BloodRequest) {
        assert_eq!(request.status(), RequestStatus::Pending);
        assert!(request.accepted_at().is_none());
    }

    #[rstest]
    fn zero_units_are_rejected(contact: HospitalContact) {
        let err = BloodRequest::pending(
            AccountId::random(),
            AccountId::random(),
            BloodGroup::ONegative,
            0,
            contact,
            Utc::now(),
        )
        .expect_err("zero units");
        assert_eq!(err, BloodRequestError::NoUnits);
    }

    #[rstest]
    fn accept_then_donate_stamps_each_step(mut request: BloodRequest) {
        let accepted = Utc::now();
        request.accept(accepted).expect("accept pending");
        assert_eq!(request.status(), RequestStatus::Accepted);
        assert_eq!(request.accepted_at(), Some(accepted));

        let donated = accepted + chrono::Duration::hours(4);
        request.mark_donated(donated).expect("donate accepted");
        assert_eq!(request.status(), RequestStatus::Donated);
        assert_eq!(request.donated_at(), Some(donated));
    }

    #[rstest]
    fn donation_requires_acceptance(mut request: BloodRequest) {
        let err = request.mark_donated(Utc::now()).expect_err("pending");
        assert_eq!(
            err,
            BloodRequestError::InvalidTransition {
                from: RequestStatus::Pending,
                to: RequestStatus::Donated,
            }
        );
        assert!(request.donated_at().is_none());
    }

    #[rstest]
    fn terminal_states_never_change(mut request: BloodRequest) {
        request.reject(Utc::now()).expect("reject pending");
        assert!(request.status().is_terminal());
        assert!(request.accept(Utc::now()).is_err());
        assert!(request.reject(Utc::now()).is_err());
        assert!(request.mark_donated(Utc::now()).is_err());
        assert_eq!(request.status(), RequestStatus::Rejected);
    }

    #[rstest]
    #[case(RequestStatus::Pending, RequestStatus::Accepted, true)]
    #[case(RequestStatus::Pending, RequestStatus::Rejected, true)]
    #[case(RequestStatus::Accepted, RequestStatus::Donated, true)]
    #[case(RequestStatus::Accepted, RequestStatus::Pending, false)]
    #[case(RequestStatus::Accepted, RequestStatus::Rejected, false)]
    #[case(RequestStatus::Donated, RequestStatus::Accepted, false)]
    fn transition_table(
        #[case] from: RequestStatus,
        #[case] to: RequestStatus,
        #[case] allowed: bool,
    ) {
        assert_eq!(from.can_transition_to(to), allowed);
    }

    #[rstest]
    fn stats_round_success_rate(contact: HospitalContact) {
        let hospital = AccountId::random();
        let mut requests: Vec<BloodRequest> = (0..3)
            .map(|_| {
                BloodRequest::pending(
                    hospital,
                    AccountId::random(),
                    BloodGroup::BPositive,
                    1,
                    contact.clone(),
                    Utc::now(),
                )
                .expect("valid request")
            })
            .collect();
        let now = Utc::now();
        if let Some(first) = requests.first_mut() {
            first.accept(now).expect("accept");
            first.mark_donated(now).expect("donate");
        }
        if let Some(second) = requests.get_mut(1) {
            second.reject(now).expect("reject");
        }

        let stats = RequestStats::tally(&requests);
        assert_eq!(
            stats,
            RequestStats {
                total: 3,
                pending: 1,
                accepted: 0,
                rejected: 1,
                donated: 1,
                success_rate: 33,
            }
        );
    }

    #[test]
    fn stats_for_no_requests_are_zero() {
        assert_eq!(RequestStats::tally(&[]), RequestStats::default());
    }

    #[rstest]
    fn serialises_camel_case_with_status(request: BloodRequest) {
        let json = serde_json::to_value(&request).expect("serialise request");
        assert_eq!(json["status"], serde_json::json!("pending"));
        assert_eq!(json["unitsRequired"], serde_json::json!(2));
        assert_eq!(json["hospital"]["pincode"], serde_json::json!("560001"));
    }
}
