//! Blood request services.
//!
//! The command service creates requests, applies transitions on behalf of
//! the owning party, stores the resulting notifications and publishes domain
//! events. Once a request write has committed the caller gets the committed
//! request back: a failed notification write is logged and only drops the
//! notifications, never the request change. The query service serves
//! listings, the hospital roster joined with donor contact details and the
//! hospital dashboard statistics.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{info, warn};

use crate::domain::donor_search_service::ranked_matches;
use crate::domain::port_error_mapping::{
    map_donor_profile_error, map_hospital_profile_error, map_notification_error,
    map_request_error,
};
use crate::domain::ports::{
    BloodRequestCommand, BloodRequestQuery, BloodRequestRepository, CreateBloodRequest,
    DonorProfileRepository, DonorSummary, EventPublisher, HospitalProfileRepository,
    HospitalRequest, NotificationRepository,
};
use crate::domain::{
    AccountId, BloodRequest, BloodRequestError, DomainEvent, Error, Notification, RequestId,
    RequestStats, RequestStatus,
};

type Transition = fn(&mut BloodRequest, DateTime<Utc>) -> Result<(), BloodRequestError>;
type Notify = fn(&BloodRequest, DateTime<Utc>) -> Notification;

/// Who may apply a transition.
#[derive(Debug, Clone, Copy)]
enum Party {
    Donor,
    Hospital,
}

impl Party {
    fn owns(self, request: &BloodRequest, actor: &AccountId) -> bool {
        match self {
            Self::Donor => request.donor_id() == *actor,
            Self::Hospital => request.hospital_id() == *actor,
        }
    }
}

fn map_request_validation(error: BloodRequestError) -> Error {
    match error {
        BloodRequestError::NoUnits => Error::invalid_request(error.to_string()),
        BloodRequestError::InvalidTransition { from, to } => Error::conflict(error.to_string())
            .with_details(serde_json::json!({
                "currentStatus": from,
                "requestedStatus": to,
                "code": "invalid_transition",
            })),
    }
}

fn request_missing(request_id: &RequestId) -> Error {
    Error::not_found(format!("blood request {request_id} not found"))
}

/// Dependencies of [`BloodRequestCommandService`].
pub struct BloodRequestStores<H, D, B, N> {
    /// Hospital profile store.
    pub hospitals: Arc<H>,
    /// Donor profile store.
    pub donors: Arc<D>,
    /// Blood request store.
    pub requests: Arc<B>,
    /// Notification store.
    pub notifications: Arc<N>,
}

impl<H, D, B, N> Clone for BloodRequestStores<H, D, B, N> {
    fn clone(&self) -> Self {
        Self {
            hospitals: Arc::clone(&self.hospitals),
            donors: Arc::clone(&self.donors),
            requests: Arc::clone(&self.requests),
            notifications: Arc::clone(&self.notifications),
        }
    }
}

/// Blood request service implementing [`BloodRequestCommand`].
#[derive(Clone)]
pub struct BloodRequestCommandService<H, D, B, N> {
    stores: BloodRequestStores<H, D, B, N>,
    events: Arc<dyn EventPublisher>,
    clock: Arc<dyn Clock>,
}

impl<H, D, B, N> BloodRequestCommandService<H, D, B, N> {
    /// Create a new command service.
    pub fn new(
        stores: BloodRequestStores<H, D, B, N>,
        events: Arc<dyn EventPublisher>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            stores,
            events,
            clock,
        }
    }
}

impl<H, D, B, N> BloodRequestCommandService<H, D, B, N>
where
    H: HospitalProfileRepository,
    D: DonorProfileRepository,
    B: BloodRequestRepository,
    N: NotificationRepository,
{
    async fn store_notifications(&self, notifications: &[Notification]) -> Result<(), Error> {
        if notifications.is_empty() {
            return Ok(());
        }
        self.stores
            .notifications
            .insert_many(notifications)
            .await
            .map_err(map_notification_error)
    }

    /// Store `notifications` for already committed `requests`, then publish
    /// both. Notifications that could not be stored are not published.
    async fn deliver(&self, requests: &[BloodRequest], notifications: Vec<Notification>) {
        let notifications = match self.store_notifications(&notifications).await {
            Ok(()) => notifications,
            Err(error) => {
                warn!(
                    error = %error,
                    dropped = notifications.len(),
                    "notifications not stored for committed blood requests"
                );
                Vec::new()
            }
        };
        self.announce(requests, notifications);
    }

    fn announce(&self, requests: &[BloodRequest], notifications: Vec<Notification>) {
        for request in requests {
            self.events
                .publish(DomainEvent::RequestChanged(request.clone()));
        }
        for notification in notifications {
            self.events
                .publish(DomainEvent::NotificationCreated(notification));
        }
    }

    fn select_donors(
        matched: Vec<AccountId>,
        requested: Option<Vec<AccountId>>,
    ) -> Result<Vec<AccountId>, Error> {
        let Some(requested) = requested else {
            return Ok(matched);
        };
        if requested.is_empty() {
            return Err(Error::invalid_request("donorIds must not be empty"));
        }

        let allowed: HashSet<AccountId> = matched.into_iter().collect();
        let mut seen = HashSet::new();
        let mut selected = Vec::with_capacity(requested.len());
        for donor_id in requested {
            if !allowed.contains(&donor_id) {
                return Err(
                    Error::invalid_request("donor is not an eligible match for this request")
                        .with_details(serde_json::json!({ "donorId": donor_id })),
                );
            }
            if seen.insert(donor_id) {
                selected.push(donor_id);
            }
        }
        Ok(selected)
    }

    async fn transition(
        &self,
        party: Party,
        actor: &AccountId,
        request_id: &RequestId,
        apply: Transition,
        notify: Option<Notify>,
    ) -> Result<BloodRequest, Error> {
        let mut request = self
            .stores
            .requests
            .find(request_id)
            .await
            .map_err(map_request_error)?
            .filter(|request| party.owns(request, actor))
            .ok_or_else(|| request_missing(request_id))?;

        let previous = request.status();
        let now = self.clock.utc();
        apply(&mut request, now).map_err(map_request_validation)?;
        self.stores
            .requests
            .update(&request, previous)
            .await
            .map_err(map_request_error)?;

        let notifications: Vec<Notification> =
            notify.map(|build| build(&request, now)).into_iter().collect();
        self.deliver(std::slice::from_ref(&request), notifications)
            .await;

        info!(
            request_id = %request_id,
            from = %previous,
            to = %request.status(),
            "blood request transitioned"
        );
        Ok(request)
    }
}

#[async_trait]
impl<H, D, B, N> BloodRequestCommand for BloodRequestCommandService<H, D, B, N>
where
    H: HospitalProfileRepository,
    D: DonorProfileRepository,
    B: BloodRequestRepository,
    N: NotificationRepository,
{
    async fn create(
        &self,
        hospital_id: &AccountId,
        request: CreateBloodRequest,
    ) -> Result<Vec<BloodRequest>, Error> {
        if request.units_required == 0 {
            return Err(map_request_validation(BloodRequestError::NoUnits));
        }
        let hospital = self
            .stores
            .hospitals
            .find(hospital_id)
            .await
            .map_err(map_hospital_profile_error)?
            .ok_or_else(|| {
                Error::not_found("complete the hospital profile before requesting blood")
            })?;

        let matched: Vec<AccountId> =
            ranked_matches(self.stores.donors.as_ref(), request.blood_group)
                .await?
                .into_iter()
                .map(|m| m.donor.account_id)
                .collect();
        if matched.is_empty() {
            return Err(Error::invalid_request(format!(
                "No eligible donors found for blood group {}",
                request.blood_group
            )));
        }
        let donor_ids = Self::select_donors(matched, request.donor_ids)?;

        let now = self.clock.utc();
        let contact = hospital.contact();
        let requests = donor_ids
            .into_iter()
            .map(|donor_id| {
                BloodRequest::pending(
                    *hospital_id,
                    donor_id,
                    request.blood_group,
                    request.units_required,
                    contact.clone(),
                    now,
                )
            })
            .collect::<Result<Vec<_>, _>>()
            .map_err(map_request_validation)?;

        self.stores
            .requests
            .insert_many(&requests)
            .await
            .map_err(map_request_error)?;
        let notifications: Vec<Notification> = requests
            .iter()
            .map(|created| Notification::request_received(created, now))
            .collect();
        self.deliver(&requests, notifications).await;

        info!(
            hospital_id = %hospital_id,
            blood_group = %request.blood_group,
            donors = requests.len(),
            "blood requests sent"
        );
        Ok(requests)
    }

    async fn accept(
        &self,
        donor_id: &AccountId,
        request_id: &RequestId,
    ) -> Result<BloodRequest, Error> {
        self.transition(
            Party::Donor,
            donor_id,
            request_id,
            BloodRequest::accept,
            Some(Notification::donor_accepted),
        )
        .await
    }

    async fn reject(
        &self,
        donor_id: &AccountId,
        request_id: &RequestId,
    ) -> Result<BloodRequest, Error> {
        self.transition(Party::Donor, donor_id, request_id, BloodRequest::reject, None)
            .await
    }

    async fn mark_donated(
        &self,
        hospital_id: &AccountId,
        request_id: &RequestId,
    ) -> Result<BloodRequest, Error> {
        self.transition(
            Party::Hospital,
            hospital_id,
            request_id,
            BloodRequest::mark_donated,
            Some(Notification::donation_completed),
        )
        .await
    }
}

/// Blood request service implementing [`BloodRequestQuery`].
#[derive(Clone)]
pub struct BloodRequestQueryService<B, D> {
    requests: Arc<B>,
    donors: Arc<D>,
}

impl<B, D> BloodRequestQueryService<B, D> {
    /// Create a new query service over the request and donor stores.
    pub fn new(requests: Arc<B>, donors: Arc<D>) -> Self {
        Self { requests, donors }
    }
}

impl<B, D> BloodRequestQueryService<B, D>
where
    D: DonorProfileRepository,
{
    /// Look up each distinct donor once.
    async fn donor_summaries(
        &self,
        requests: &[BloodRequest],
    ) -> Result<HashMap<AccountId, DonorSummary>, Error> {
        let donor_ids: HashSet<AccountId> = requests.iter().map(BloodRequest::donor_id).collect();
        let mut summaries = HashMap::with_capacity(donor_ids.len());
        for donor_id in donor_ids {
            let profile = self
                .donors
                .find(&donor_id)
                .await
                .map_err(map_donor_profile_error)?;
            if let Some(profile) = profile {
                summaries.insert(donor_id, DonorSummary::from(profile));
            }
        }
        Ok(summaries)
    }
}

#[async_trait]
impl<B, D> BloodRequestQuery for BloodRequestQueryService<B, D>
where
    B: BloodRequestRepository,
    D: DonorProfileRepository,
{
    async fn for_donor(
        &self,
        donor_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, Error> {
        self.requests
            .list_for_donor(donor_id, status)
            .await
            .map_err(map_request_error)
    }

    async fn for_hospital(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, Error> {
        self.requests
            .list_for_hospital(hospital_id, status)
            .await
            .map_err(map_request_error)
    }

    async fn hospital_roster(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<HospitalRequest>, Error> {
        let requests = self.for_hospital(hospital_id, status).await?;
        let summaries = self.donor_summaries(&requests).await?;
        Ok(requests
            .into_iter()
            .map(|request| HospitalRequest {
                donor: summaries.get(&request.donor_id()).cloned(),
                request,
            })
            .collect())
    }

    async fn hospital_stats(&self, hospital_id: &AccountId) -> Result<RequestStats, Error> {
        let requests = self.for_hospital(hospital_id, None).await?;
        Ok(RequestStats::tally(&requests))
    }
}

#[cfg(test)]
#[path = "blood_request_service_tests.rs"]
mod tests;
