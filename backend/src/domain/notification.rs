//! In-app notifications sent to the counterpart of a request transition.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::{AccountId, BloodGroup, BloodRequest, RequestId};

/// Identifier of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct NotificationId(Uuid);

impl NotificationId {
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

impl fmt::Display for NotificationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Event that produced a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// A hospital sent the donor a request.
    BloodRequest,
    /// A donor accepted the hospital's request.
    DonorAccepted,
    /// The hospital recorded the donor's donation.
    DonationCompleted,
}

impl NotificationKind {
    /// Snake-case wire and storage form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::BloodRequest => "blood_request",
            Self::DonorAccepted => "donor_accepted",
            Self::DonationCompleted => "donation_completed",
        }
    }

    /// Parse the stored form.
    #[must_use]
    pub fn from_storage(value: &str) -> Option<Self> {
        [Self::BloodRequest, Self::DonorAccepted, Self::DonationCompleted]
            .into_iter()
            .find(|kind| kind.as_str() == value)
    }
}

/// Notification addressed to one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Notification identifier.
    pub id: NotificationId,
    /// Account that sees the notification.
    pub recipient_id: AccountId,
    /// Account whose action produced it.
    pub sender_id: Option<AccountId>,
    /// Triggering event.
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    /// Text shown to the recipient.
    pub message: String,
    /// Related request.
    pub request_id: Option<RequestId>,
    /// Requested group, for new requests.
    pub blood_group: Option<BloodGroup>,
    /// Requested units, for new requests.
    pub units_required: Option<u32>,
    /// Whether the recipient has seen it.
    pub read: bool,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

impl Notification {
    fn about(
        request: &BloodRequest,
        recipient_id: AccountId,
        sender_id: AccountId,
        kind: NotificationKind,
        message: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: NotificationId::random(),
            recipient_id,
            sender_id: Some(sender_id),
            kind,
            message,
            request_id: Some(request.id()),
            blood_group: None,
            units_required: None,
            read: false,
            created_at,
        }
    }

    /// Tell the donor a hospital needs blood.
    #[must_use]
    pub fn request_received(request: &BloodRequest, created_at: DateTime<Utc>) -> Self {
        Self {
            blood_group: Some(request.blood_group()),
            units_required: Some(request.units_required()),
            ..Self::about(
                request,
                request.donor_id(),
                request.hospital_id(),
                NotificationKind::BloodRequest,
                format!("Blood request from {}", request.hospital().name),
                created_at,
            )
        }
    }

    /// Tell the hospital its request was accepted.
    #[must_use]
    pub fn donor_accepted(request: &BloodRequest, created_at: DateTime<Utc>) -> Self {
        Self::about(
            request,
            request.hospital_id(),
            request.donor_id(),
            NotificationKind::DonorAccepted,
            "A donor has accepted your blood request".to_owned(),
            created_at,
        )
    }

    /// Thank the donor once the hospital records the donation.
    #[must_use]
    pub fn donation_completed(request: &BloodRequest, created_at: DateTime<Utc>) -> Self {
        Self::about(
            request,
            request.donor_id(),
            request.hospital_id(),
            NotificationKind::DonationCompleted,
            "Thank you! Your donation has been completed".to_owned(),
            created_at,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EmailAddress, HospitalContact, Pincode};
    use rstest::{fixture, rstest};

    #[fixture]
    fn request() -> BloodRequest {
        let contact = HospitalContact {
            name: "City General".into(),
            phone: "080-5550100".into(),
            email: EmailAddress::new("desk@citygeneral.org").expect("valid email"),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            country: "India".into(),
            pincode: Pincode::new(560_001).expect("valid pincode"),
        };
        BloodRequest::pending(
            AccountId::random(),
            AccountId::random(),
            BloodGroup::ONegative,
            3,
            contact,
            Utc::now(),
        )
        .expect("valid request")
    }

    #[rstest]
    fn request_received_goes_to_the_donor(request: BloodRequest) {
        let note = Notification::request_received(&request, Utc::now());
        assert_eq!(note.recipient_id, request.donor_id());
        assert_eq!(note.sender_id, Some(request.hospital_id()));
        assert_eq!(note.message, "Blood request from City General");
        assert_eq!(note.blood_group, Some(BloodGroup::ONegative));
        assert_eq!(note.units_required, Some(3));
        assert!(!note.read);
    }

    #[rstest]
    fn acceptance_goes_to_the_hospital(request: BloodRequest) {
        let note = Notification::donor_accepted(&request, Utc::now());
        assert_eq!(note.recipient_id, request.hospital_id());
        assert_eq!(note.kind, NotificationKind::DonorAccepted);
        assert_eq!(note.request_id, Some(request.id()));
        assert!(note.blood_group.is_none());
    }

    #[rstest]
    fn completion_thanks_the_donor(request: BloodRequest) {
        let note = Notification::donation_completed(&request, Utc::now());
        assert_eq!(note.recipient_id, request.donor_id());
        assert_eq!(note.message, "Thank you! Your donation has been completed");
    }

    #[rstest]
    fn kind_serialises_under_type(request: BloodRequest) {
        let note = Notification::request_received(&request, Utc::now());
        let json = serde_json::to_value(&note).expect("serialise notification");
        assert_eq!(json["type"], serde_json::json!("blood_request"));
    }

    #[rstest]
    #[case("donor_accepted", Some(NotificationKind::DonorAccepted))]
    #[case("unknown", None)]
    fn storage_form_round_trips(#[case] raw: &str, #[case] expected: Option<NotificationKind>) {
        assert_eq!(NotificationKind::from_storage(raw), expected);
    }
}
