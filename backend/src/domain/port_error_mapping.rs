//! Translate driven-port errors into domain [`Error`] values.
//!
//! Connection failures become `service_unavailable`, query failures become
//! `internal_error` and store-level constraint failures become `conflict`.

use crate::domain::Error;
use crate::domain::ports::{
    AccountRepositoryError, BloodRequestRepositoryError, DonorProfileRepositoryError,
    HospitalProfileRepositoryError, IdentityProviderError, NotificationRepositoryError,
};

pub(crate) const DUPLICATE_EMAIL_MESSAGE: &str =
    "This email is already registered. Please use a different email or sign in instead.";

pub(crate) fn map_account_error(error: AccountRepositoryError) -> Error {
    match error {
        AccountRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("account repository unavailable: {message}"))
        }
        AccountRepositoryError::Query { message } => {
            Error::internal(format!("account repository error: {message}"))
        }
        AccountRepositoryError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
    }
}

pub(crate) fn map_identity_error(error: IdentityProviderError) -> Error {
    match error {
        IdentityProviderError::Connection { message } => {
            Error::service_unavailable(format!("identity provider unavailable: {message}"))
        }
        IdentityProviderError::Query { message } => {
            Error::internal(format!("identity provider error: {message}"))
        }
        IdentityProviderError::DuplicateEmail { .. } => Error::conflict(DUPLICATE_EMAIL_MESSAGE),
    }
}

pub(crate) fn map_donor_profile_error(error: DonorProfileRepositoryError) -> Error {
    match error {
        DonorProfileRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("donor profile repository unavailable: {message}"))
        }
        DonorProfileRepositoryError::Query { message } => {
            Error::internal(format!("donor profile repository error: {message}"))
        }
    }
}

pub(crate) fn map_hospital_profile_error(error: HospitalProfileRepositoryError) -> Error {
    match error {
        HospitalProfileRepositoryError::Connection { message } => Error::service_unavailable(
            format!("hospital profile repository unavailable: {message}"),
        ),
        HospitalProfileRepositoryError::Query { message } => {
            Error::internal(format!("hospital profile repository error: {message}"))
        }
    }
}

pub(crate) fn map_request_error(error: BloodRequestRepositoryError) -> Error {
    match error {
        BloodRequestRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("blood request repository unavailable: {message}"))
        }
        BloodRequestRepositoryError::Query { message } => {
            Error::internal(format!("blood request repository error: {message}"))
        }
        BloodRequestRepositoryError::NotFound { request_id } => {
            Error::not_found(format!("blood request {request_id} not found"))
        }
        BloodRequestRepositoryError::StatusChanged {
            request_id,
            expected,
        } => Error::conflict(format!(
            "blood request {request_id} changed while it was being updated"
        ))
        .with_details(serde_json::json!({
            "requestId": request_id,
            "expectedStatus": expected,
            "code": "status_changed",
        })),
    }
}

pub(crate) fn map_notification_error(error: NotificationRepositoryError) -> Error {
    match error {
        NotificationRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("notification repository unavailable: {message}"))
        }
        NotificationRepositoryError::Query { message } => {
            Error::internal(format!("notification repository error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ErrorCode, RequestStatus};
    use rstest::rstest;
    use uuid::Uuid;

    #[rstest]
    #[case(AccountRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(AccountRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(AccountRepositoryError::duplicate_email("a@b.co"), ErrorCode::Conflict)]
    fn account_errors_map_to_codes(
        #[case] error: AccountRepositoryError,
        #[case] expected: ErrorCode,
    ) {
        assert_eq!(map_account_error(error).code(), expected);
    }

    #[test]
    fn status_changed_carries_details() {
        let id = Uuid::new_v4();
        let error = map_request_error(BloodRequestRepositoryError::status_changed(
            id,
            RequestStatus::Accepted,
        ));
        assert_eq!(error.code(), ErrorCode::Conflict);
        let details = error.details().expect("details present");
        assert_eq!(details["expectedStatus"], serde_json::json!("accepted"));
        assert_eq!(details["requestId"], serde_json::json!(id));
    }
}
