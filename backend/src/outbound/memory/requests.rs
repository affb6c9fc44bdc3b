//! Blood requests and notifications.

use std::cmp::Reverse;

use async_trait::async_trait;

use crate::domain::ports::{
    BloodRequestRepository, BloodRequestRepositoryError, NotificationRepository,
    NotificationRepositoryError,
};
use crate::domain::{
    AccountId, BloodRequest, Notification, NotificationId, RequestId, RequestStatus,
};

use super::InMemoryStore;

fn newest_first(mut requests: Vec<BloodRequest>) -> Vec<BloodRequest> {
    requests.sort_by_key(|request| (Reverse(request.created_at()), *request.id().as_uuid()));
    requests
}

impl InMemoryStore {
    fn list_requests<F>(
        &self,
        status: Option<RequestStatus>,
        belongs: F,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError>
    where
        F: Fn(&BloodRequest) -> bool,
    {
        let state = self.read().map_err(BloodRequestRepositoryError::query)?;
        let found = state
            .requests
            .values()
            .filter(|&request| belongs(request))
            .filter(|request| status.is_none_or(|wanted| request.status() == wanted))
            .cloned()
            .collect();
        Ok(newest_first(found))
    }
}

#[async_trait]
impl BloodRequestRepository for InMemoryStore {
    async fn insert_many(
        &self,
        requests: &[BloodRequest],
    ) -> Result<(), BloodRequestRepositoryError> {
        let mut state = self.write().map_err(BloodRequestRepositoryError::query)?;
        if let Some(clash) = requests
            .iter()
            .find(|request| state.requests.contains_key(&request.id()))
        {
            return Err(BloodRequestRepositoryError::query(format!(
                "blood request {} already exists",
                clash.id()
            )));
        }
        for request in requests {
            state.requests.insert(request.id(), request.clone());
        }
        Ok(())
    }

    async fn find(
        &self,
        id: &RequestId,
    ) -> Result<Option<BloodRequest>, BloodRequestRepositoryError> {
        let state = self.read().map_err(BloodRequestRepositoryError::query)?;
        Ok(state.requests.get(id).cloned())
    }

    async fn update(
        &self,
        request: &BloodRequest,
        expected: RequestStatus,
    ) -> Result<(), BloodRequestRepositoryError> {
        let mut state = self.write().map_err(BloodRequestRepositoryError::query)?;
        let Some(stored) = state.requests.get_mut(&request.id()) else {
            return Err(BloodRequestRepositoryError::not_found(
                *request.id().as_uuid(),
            ));
        };
        if stored.status() != expected {
            return Err(BloodRequestRepositoryError::status_changed(
                *request.id().as_uuid(),
                expected,
            ));
        }
        *stored = request.clone();
        Ok(())
    }

    async fn list_for_donor(
        &self,
        donor_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError> {
        self.list_requests(status, |request| request.donor_id() == *donor_id)
    }

    async fn list_for_hospital(
        &self,
        hospital_id: &AccountId,
        status: Option<RequestStatus>,
    ) -> Result<Vec<BloodRequest>, BloodRequestRepositoryError> {
        self.list_requests(status, |request| request.hospital_id() == *hospital_id)
    }
}

#[async_trait]
impl NotificationRepository for InMemoryStore {
    async fn insert_many(
        &self,
        notifications: &[Notification],
    ) -> Result<(), NotificationRepositoryError> {
        let mut state = self.write().map_err(NotificationRepositoryError::query)?;
        state.notifications.extend_from_slice(notifications);
        Ok(())
    }

    async fn list_for(
        &self,
        recipient_id: &AccountId,
    ) -> Result<Vec<Notification>, NotificationRepositoryError> {
        let state = self.read().map_err(NotificationRepositoryError::query)?;
        let mut found: Vec<Notification> = state
            .notifications
            .iter()
            .filter(|notification| notification.recipient_id == *recipient_id)
            .cloned()
            .collect();
        found.sort_by_key(|notification| Reverse(notification.created_at));
        Ok(found)
    }

    async fn mark_read(
        &self,
        id: &NotificationId,
        recipient_id: &AccountId,
    ) -> Result<bool, NotificationRepositoryError> {
        let mut state = self.write().map_err(NotificationRepositoryError::query)?;
        let Some(notification) = state
            .notifications
            .iter_mut()
            .find(|notification| notification.id == *id && notification.recipient_id == *recipient_id)
        else {
            return Ok(false);
        };
        notification.read = true;
        Ok(true)
    }
}
