//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    BloodRequestCommand, BloodRequestQuery, DonorProfileCommand, DonorProfileQuery,
    DonorSearchQuery, HospitalProfileCommand, HospitalProfileQuery, IdentityGate,
    NotificationsCommand, NotificationsQuery,
};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Sign-up, sign-in and session account lookup.
    pub identity: Arc<dyn IdentityGate>,
    /// Donor profile writes.
    pub donor_profiles: Arc<dyn DonorProfileCommand>,
    /// Donor profile reads.
    pub donor_profiles_query: Arc<dyn DonorProfileQuery>,
    /// Hospital profile writes.
    pub hospital_profiles: Arc<dyn HospitalProfileCommand>,
    /// Hospital profile reads.
    pub hospital_profiles_query: Arc<dyn HospitalProfileQuery>,
    /// Compatible donor search for hospitals.
    pub donor_search: Arc<dyn DonorSearchQuery>,
    /// Request creation and transitions.
    pub requests: Arc<dyn BloodRequestCommand>,
    /// Request listings and hospital statistics.
    pub requests_query: Arc<dyn BloodRequestQuery>,
    /// Marking notifications read.
    pub notifications: Arc<dyn NotificationsCommand>,
    /// Notification listings.
    pub notifications_query: Arc<dyn NotificationsQuery>,
}
