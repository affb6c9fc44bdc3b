//! Domain primitives, aggregates and services.
//!
//! Purpose: Define strongly typed domain entities used by the API and
//! persistence layers, and the services that implement the driving ports.
//! Keep types immutable where possible and document invariants and
//! serialisation contracts (serde) in each type's Rustdoc.
//!
//! Public surface:
//! - Error (alias to `error::Error`): API error response payload.
//! - ErrorCode (alias to `error::ErrorCode`): stable error identifier.
//! - Account, Role, Credentials: identity and portal membership.
//! - DonorProfile, HospitalProfile: role-specific profiles.
//! - BloodGroup, MatchKind: blood groups and compatibility ranking.
//! - BloodRequest, RequestStatus: request lifecycle.
//! - Notification, DomainEvent: counterpart notices and live-feed events.

pub mod account;
pub mod auth;
pub mod blood_group;
pub mod blood_request;
mod blood_request_service;
pub mod compatibility;
pub mod donor;
mod donor_search_service;
pub mod eligibility;
pub mod error;
pub mod events;
pub mod hospital;
mod identity_service;
pub mod location;
pub mod notification;
mod notification_service;
mod port_error_mapping;
pub mod ports;
mod profile_service;
#[cfg(test)]
pub(crate) mod test_fixtures;
pub mod trace_id;

pub use self::account::{Account, AccountId, AccountValidationError, EmailAddress, NextStep, Role};
pub use self::auth::{Credentials, CredentialsValidationError, PASSWORD_MIN_LEN};
pub use self::blood_group::{BloodGroup, BloodGroupParseError};
pub use self::blood_request::{
    BloodRequest, BloodRequestError, BloodRequestRecord, HospitalContact, RequestId,
    RequestStats, RequestStatus, RequestStatusParseError,
};
pub use self::blood_request_service::{
    BloodRequestCommandService, BloodRequestQueryService, BloodRequestStores,
};
pub use self::compatibility::{MatchKind, Ranked, classify, compatible_groups, rank_candidates};
pub use self::donor::{AvailabilityError, DonorProfile, DonorProfileDraft};
pub use self::donor_search_service::DonorSearchService;
pub use self::eligibility::{
    EligibilityCriteria, EligibilityReport, HealthCondition, IneligibilityReason, evaluate,
};
pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::events::DomainEvent;
pub use self::hospital::{HospitalProfile, HospitalProfileDraft};
pub use self::identity_service::IdentityService;
pub use self::location::{Location, Pincode, ProfileValidationError};
pub use self::notification::{Notification, NotificationId, NotificationKind};
pub use self::notification_service::NotificationsService;
pub use self::profile_service::{DonorProfileService, HospitalProfileService};
pub use self::trace_id::TraceId;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use bloodlink::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
