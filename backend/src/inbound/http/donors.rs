//! Donor portal HTTP handlers.
//!
//! ```text
//! GET  /api/v1/donors/me/profile
//! PUT  /api/v1/donors/me/profile
//! PUT  /api/v1/donors/me/availability
//! GET  /api/v1/donors/me/requests?status=
//! POST /api/v1/donors/me/requests/{id}/accept
//! POST /api/v1/donors/me/requests/{id}/reject
//! ```

use actix_web::{get, post, put, web};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    BloodRequest, DonorProfile, DonorProfileDraft, Error, RequestId, RequestStatus, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Availability toggle payload.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// Whether hospitals may find the donor.
    pub available: bool,
}

/// Optional status filter for request listings.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct StatusFilter {
    /// Only return requests in this status.
    #[param(value_type = Option<String>, example = "pending")]
    pub status: Option<RequestStatus>,
}

/// Fetch the signed-in donor's profile.
#[utoipa::path(
    get,
    path = "/api/v1/donors/me/profile",
    responses(
        (status = 200, description = "Donor profile", body = DonorProfile),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a donor account", body = Error),
        (status = 404, description = "Profile not created yet", body = Error)
    ),
    tags = ["donors"],
    operation_id = "getDonorProfile"
)]
#[get("/donors/me/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DonorProfile>> {
    let donor_id = session.require_role(Role::Donor)?;
    let profile = state.donor_profiles_query.profile(&donor_id).await?;
    Ok(web::Json(profile))
}

/// Save the signed-in donor's profile and re-evaluate eligibility.
#[utoipa::path(
    put,
    path = "/api/v1/donors/me/profile",
    request_body = DonorProfileDraft,
    responses(
        (status = 200, description = "Saved profile with eligibility outcome", body = DonorProfile),
        (status = 400, description = "Invalid profile", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a donor account", body = Error)
    ),
    tags = ["donors"],
    operation_id = "saveDonorProfile"
)]
#[put("/donors/me/profile")]
pub async fn save_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<DonorProfileDraft>,
) -> ApiResult<web::Json<DonorProfile>> {
    let donor_id = session.require_role(Role::Donor)?;
    let profile = state
        .donor_profiles
        .save(&donor_id, payload.into_inner())
        .await?;
    Ok(web::Json(profile))
}

/// Toggle whether hospitals may find the signed-in donor.
#[utoipa::path(
    put,
    path = "/api/v1/donors/me/availability",
    request_body = AvailabilityRequest,
    responses(
        (status = 200, description = "Updated profile", body = DonorProfile),
        (status = 400, description = "Ineligible donors cannot become available", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a donor account", body = Error),
        (status = 404, description = "Profile not created yet", body = Error)
    ),
    tags = ["donors"],
    operation_id = "setDonorAvailability"
)]
#[put("/donors/me/availability")]
pub async fn set_availability(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<AvailabilityRequest>,
) -> ApiResult<web::Json<DonorProfile>> {
    let donor_id = session.require_role(Role::Donor)?;
    let profile = state
        .donor_profiles
        .set_availability(&donor_id, payload.available)
        .await?;
    Ok(web::Json(profile))
}

/// Requests addressed to the signed-in donor, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/donors/me/requests",
    params(StatusFilter),
    responses(
        (status = 200, description = "Blood requests", body = [BloodRequest]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a donor account", body = Error)
    ),
    tags = ["donors"],
    operation_id = "listDonorRequests"
)]
#[get("/donors/me/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<StatusFilter>,
) -> ApiResult<web::Json<Vec<BloodRequest>>> {
    let donor_id = session.require_role(Role::Donor)?;
    let requests = state
        .requests_query
        .for_donor(&donor_id, filter.status)
        .await?;
    Ok(web::Json(requests))
}

/// Accept a pending request.
#[utoipa::path(
    post,
    path = "/api/v1/donors/me/requests/{id}/accept",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Accepted request", body = BloodRequest),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a donor account", body = Error),
        (status = 404, description = "No such request for this donor", body = Error),
        (status = 409, description = "Request is no longer pending", body = Error)
    ),
    tags = ["donors"],
    operation_id = "acceptRequest"
)]
#[post("/donors/me/requests/{id}/accept")]
pub async fn accept_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<RequestId>,
) -> ApiResult<web::Json<BloodRequest>> {
    let donor_id = session.require_role(Role::Donor)?;
    let request = state.requests.accept(&donor_id, &id).await?;
    Ok(web::Json(request))
}

/// Decline a pending request.
#[utoipa::path(
    post,
    path = "/api/v1/donors/me/requests/{id}/reject",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Rejected request", body = BloodRequest),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a donor account", body = Error),
        (status = 404, description = "No such request for this donor", body = Error),
        (status = 409, description = "Request is no longer pending", body = Error)
    ),
    tags = ["donors"],
    operation_id = "rejectRequest"
)]
#[post("/donors/me/requests/{id}/reject")]
pub async fn reject_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<RequestId>,
) -> ApiResult<web::Json<BloodRequest>> {
    let donor_id = session.require_role(Role::Donor)?;
    let request = state.requests.reject(&donor_id, &id).await?;
    Ok(web::Json(request))
}
