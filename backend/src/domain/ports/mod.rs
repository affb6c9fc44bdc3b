//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, identity provider, event bus) are implemented
//! by outbound adapters. Driving ports (commands and queries) are implemented
//! by domain services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod blood_request_command;
mod blood_request_query;
mod blood_request_repository;
mod donor_profile_command;
mod donor_profile_repository;
mod donor_search_query;
mod event_bus;
mod hospital_profile_command;
mod hospital_profile_repository;
mod identity_gate;
mod identity_provider;
mod notification_repository;
mod notifications_query;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, AccountRepositoryError};
#[cfg(test)]
pub use blood_request_command::MockBloodRequestCommand;
pub use blood_request_command::{BloodRequestCommand, CreateBloodRequest};
#[cfg(test)]
pub use blood_request_query::MockBloodRequestQuery;
pub use blood_request_query::{BloodRequestQuery, DonorSummary, HospitalRequest};
#[cfg(test)]
pub use blood_request_repository::MockBloodRequestRepository;
pub use blood_request_repository::{BloodRequestRepository, BloodRequestRepositoryError};
#[cfg(test)]
pub use donor_profile_command::{MockDonorProfileCommand, MockDonorProfileQuery};
pub use donor_profile_command::{DonorProfileCommand, DonorProfileQuery};
#[cfg(test)]
pub use donor_profile_repository::MockDonorProfileRepository;
pub use donor_profile_repository::{DonorProfileRepository, DonorProfileRepositoryError};
#[cfg(test)]
pub use donor_search_query::MockDonorSearchQuery;
pub use donor_search_query::{DonorMatch, DonorSearchQuery};
#[cfg(test)]
pub use event_bus::MockEventPublisher;
pub use event_bus::{EventPublisher, EventSubscriber, NoOpEventPublisher};
#[cfg(test)]
pub use hospital_profile_command::{MockHospitalProfileCommand, MockHospitalProfileQuery};
pub use hospital_profile_command::{HospitalProfileCommand, HospitalProfileQuery};
#[cfg(test)]
pub use hospital_profile_repository::MockHospitalProfileRepository;
pub use hospital_profile_repository::{HospitalProfileRepository, HospitalProfileRepositoryError};
#[cfg(test)]
pub use identity_gate::MockIdentityGate;
pub use identity_gate::{IdentityGate, SignInOutcome};
#[cfg(test)]
pub use identity_provider::MockIdentityProvider;
pub use identity_provider::{IdentityProvider, IdentityProviderError};
#[cfg(test)]
pub use notification_repository::MockNotificationRepository;
pub use notification_repository::{NotificationRepository, NotificationRepositoryError};
#[cfg(test)]
pub use notifications_query::{MockNotificationsCommand, MockNotificationsQuery};
pub use notifications_query::{NotificationsCommand, NotificationsQuery};
