//! Hospital portal HTTP handlers.
//!
//! ```text
//! GET  /api/v1/hospitals/me/profile
//! PUT  /api/v1/hospitals/me/profile
//! GET  /api/v1/hospitals/me/donor-matches?bloodGroup=
//! POST /api/v1/hospitals/me/requests
//! GET  /api/v1/hospitals/me/requests?status=
//! POST /api/v1/hospitals/me/requests/{id}/donated
//! GET  /api/v1/hospitals/me/stats
//! ```

use actix_web::{HttpResponse, get, post, put, web};
use serde::Deserialize;
use tracing::info;
use utoipa::IntoParams;

use crate::domain::ports::{CreateBloodRequest, DonorMatch, HospitalRequest};
use crate::domain::{
    BloodGroup, BloodRequest, Error, HospitalProfile, HospitalProfileDraft, RequestId,
    RequestStats, Role,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::donors::StatusFilter;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Requested group for the donor search.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct MatchQuery {
    /// Group the hospital needs, URL encoded (`A%2B`).
    #[param(value_type = String, example = "O-")]
    pub blood_group: BloodGroup,
}

/// Fetch the signed-in hospital's profile.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals/me/profile",
    responses(
        (status = 200, description = "Hospital profile", body = HospitalProfile),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error),
        (status = 404, description = "Profile not created yet", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "getHospitalProfile"
)]
#[get("/hospitals/me/profile")]
pub async fn get_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<HospitalProfile>> {
    let hospital_id = session.require_role(Role::Hospital)?;
    let profile = state.hospital_profiles_query.profile(&hospital_id).await?;
    Ok(web::Json(profile))
}

/// Save the signed-in hospital's profile.
#[utoipa::path(
    put,
    path = "/api/v1/hospitals/me/profile",
    request_body = HospitalProfileDraft,
    responses(
        (status = 200, description = "Saved profile", body = HospitalProfile),
        (status = 400, description = "Invalid profile", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "saveHospitalProfile"
)]
#[put("/hospitals/me/profile")]
pub async fn save_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<HospitalProfileDraft>,
) -> ApiResult<web::Json<HospitalProfile>> {
    let hospital_id = session.require_role(Role::Hospital)?;
    let profile = state
        .hospital_profiles
        .save(&hospital_id, payload.into_inner())
        .await?;
    Ok(web::Json(profile))
}

/// Eligible, available donors compatible with the requested group.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals/me/donor-matches",
    params(MatchQuery),
    responses(
        (status = 200, description = "Matching donors, exact matches first", body = [DonorMatch]),
        (status = 400, description = "Unknown blood group", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "findDonorMatches"
)]
#[get("/hospitals/me/donor-matches")]
pub async fn donor_matches(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<MatchQuery>,
) -> ApiResult<web::Json<Vec<DonorMatch>>> {
    session.require_role(Role::Hospital)?;
    let matches = state.donor_search.find_matches(query.blood_group).await?;
    Ok(web::Json(matches))
}

/// Send a pending request to each addressed donor.
#[utoipa::path(
    post,
    path = "/api/v1/hospitals/me/requests",
    request_body = CreateBloodRequest,
    responses(
        (status = 201, description = "One request per addressed donor", body = [BloodRequest]),
        (status = 400, description = "No matching donors or invalid payload", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error),
        (status = 404, description = "Hospital profile not created yet", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "createBloodRequests"
)]
#[post("/hospitals/me/requests")]
pub async fn create_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateBloodRequest>,
) -> ApiResult<HttpResponse> {
    let hospital_id = session.require_role(Role::Hospital)?;
    let created = state
        .requests
        .create(&hospital_id, payload.into_inner())
        .await?;
    info!(%hospital_id, count = created.len(), "blood requests sent");
    Ok(HttpResponse::Created().json(created))
}

/// Requests issued by the signed-in hospital with each donor's contact
/// details, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals/me/requests",
    params(StatusFilter),
    responses(
        (status = 200, description = "Blood requests with donor details", body = [HospitalRequest]),
        (status = 400, description = "Unknown status", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "listHospitalRequests"
)]
#[get("/hospitals/me/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    filter: web::Query<StatusFilter>,
) -> ApiResult<web::Json<Vec<HospitalRequest>>> {
    let hospital_id = session.require_role(Role::Hospital)?;
    let requests = state
        .requests_query
        .hospital_roster(&hospital_id, filter.status)
        .await?;
    Ok(web::Json(requests))
}

/// Record that the donor of an accepted request has donated.
#[utoipa::path(
    post,
    path = "/api/v1/hospitals/me/requests/{id}/donated",
    params(("id" = String, Path, description = "Request identifier")),
    responses(
        (status = 200, description = "Completed request", body = BloodRequest),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error),
        (status = 404, description = "No such request for this hospital", body = Error),
        (status = 409, description = "Request has not been accepted", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "markDonated"
)]
#[post("/hospitals/me/requests/{id}/donated")]
pub async fn mark_donated(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<RequestId>,
) -> ApiResult<web::Json<BloodRequest>> {
    let hospital_id = session.require_role(Role::Hospital)?;
    let request = state.requests.mark_donated(&hospital_id, &id).await?;
    Ok(web::Json(request))
}

/// Per-status counts and success rate.
#[utoipa::path(
    get,
    path = "/api/v1/hospitals/me/stats",
    responses(
        (status = 200, description = "Request statistics", body = RequestStats),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Not a hospital account", body = Error)
    ),
    tags = ["hospitals"],
    operation_id = "hospitalStats"
)]
#[get("/hospitals/me/stats")]
pub async fn stats(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<RequestStats>> {
    let hospital_id = session.require_role(Role::Hospital)?;
    let stats = state.requests_query.hospital_stats(&hospital_id).await?;
    Ok(web::Json(stats))
}
