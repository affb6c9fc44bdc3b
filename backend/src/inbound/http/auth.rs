//! Sign-up, sign-in and session HTTP handlers.
//!
//! ```text
//! POST /api/v1/auth/{role}/register
//! POST /api/v1/auth/{role}/login
//! POST /api/v1/auth/logout
//! GET  /api/v1/auth/me
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use tracing::info;
use utoipa::ToSchema;

use crate::domain::ports::SignInOutcome;
use crate::domain::{Credentials, Error, ErrorCode, Role};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::credentials_error;

/// Email and password submitted to either portal.
#[derive(Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CredentialsRequest {
    /// Sign-in email.
    #[schema(example = "asha@example.com")]
    pub email: String,
    /// Password of at least six characters.
    #[schema(example = "hunter22")]
    pub password: String,
}

impl TryFrom<CredentialsRequest> for Credentials {
    type Error = Error;

    fn try_from(value: CredentialsRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password).map_err(|err| credentials_error(&err))
    }
}

/// Create an account in the `role` portal and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/{role}/register",
    params(("role" = Role, Path, description = "Portal to register with")),
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "Account created and signed in", body = SignInOutcome,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials payload", body = Error),
        (status = 409, description = "Email already registered", body = Error)
    ),
    tags = ["auth"],
    operation_id = "register",
    security([])
)]
#[post("/auth/{role}/register")]
pub async fn register(
    state: web::Data<HttpState>,
    session: SessionContext,
    role: web::Path<Role>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let outcome = state.identity.register(role.into_inner(), &credentials).await?;
    session.persist(&outcome.account)?;
    info!(account_id = %outcome.account.id, role = %outcome.account.role, "account registered");
    Ok(HttpResponse::Created().json(outcome))
}

/// Sign in to the `role` portal.
#[utoipa::path(
    post,
    path = "/api/v1/auth/{role}/login",
    params(("role" = Role, Path, description = "Portal to sign in to")),
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Signed in", body = SignInOutcome,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid credentials payload", body = Error),
        (status = 401, description = "Wrong email or password", body = Error),
        (status = 403, description = "Account belongs to the other portal", body = Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/{role}/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    role: web::Path<Role>,
    payload: web::Json<CredentialsRequest>,
) -> ApiResult<HttpResponse> {
    let credentials = Credentials::try_from(payload.into_inner())?;
    let outcome = state.identity.sign_in(role.into_inner(), &credentials).await?;
    session.persist(&outcome.account)?;
    Ok(HttpResponse::Ok().json(outcome))
}

/// Forget the signed-in account.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses((status = 204, description = "Signed out")),
    tags = ["auth"],
    operation_id = "logout"
)]
#[post("/auth/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.clear();
    HttpResponse::NoContent().finish()
}

/// The signed-in account and where the client should go next.
#[utoipa::path(
    get,
    path = "/api/v1/auth/me",
    responses(
        (status = 200, description = "Signed-in account", body = SignInOutcome),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["auth"],
    operation_id = "currentAccount"
)]
#[get("/auth/me")]
pub async fn current_account(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<SignInOutcome>> {
    let account = session.require_account()?;
    match state.identity.current(&account.id).await {
        Ok(outcome) => Ok(web::Json(outcome)),
        Err(error) => {
            if error.code() == ErrorCode::Unauthorized {
                session.clear();
            }
            Err(error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{credentials_body, test_client};
    use actix_web::http::StatusCode;
    use rstest::rstest;
    use serde_json::Value;

    #[actix_web::test]
    async fn register_signs_the_account_in() {
        let client = test_client().await;

        let (status, body, cookie) = client
            .post_json("/api/v1/auth/donor/register", &credentials_body("asha@example.com"), None)
            .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["account"]["role"], "donor");
        assert_eq!(body["account"]["profileCompleted"], false);
        assert_eq!(body["nextStep"], "profile_setup");
        let cookie = cookie.expect("session cookie");

        let (status, me) = client.get("/api/v1/auth/me", Some(&cookie)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["account"]["email"], "asha@example.com");
    }

    #[actix_web::test]
    async fn email_cannot_join_both_portals() {
        let client = test_client().await;
        client.register("hospital", "desk@citygeneral.org").await;

        let (status, body, cookie) = client
            .post_json(
                "/api/v1/auth/donor/register",
                &credentials_body("desk@citygeneral.org"),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "conflict");
        assert!(
            body["message"]
                .as_str()
                .is_some_and(|message| message.contains("hospital"))
        );
        assert!(cookie.is_none());
    }

    #[rstest]
    #[case::wrong_portal("hospital", "hunter22", StatusCode::FORBIDDEN)]
    #[case::wrong_password("donor", "hunter23", StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn login_rejects_bad_attempts(
        #[case] portal: &str,
        #[case] password: &str,
        #[case] expected: StatusCode,
    ) {
        let client = test_client().await;
        client.register("donor", "asha@example.com").await;

        let (status, _, cookie) = client
            .post_json(
                &format!("/api/v1/auth/{portal}/login"),
                &serde_json::json!({ "email": "asha@example.com", "password": password }),
                None,
            )
            .await;

        assert_eq!(status, expected);
        assert!(cookie.is_none());
    }

    #[actix_web::test]
    async fn login_returns_the_next_step() {
        let client = test_client().await;
        client.register("donor", "asha@example.com").await;

        let (status, body, cookie) = client
            .post_json("/api/v1/auth/donor/login", &credentials_body("asha@example.com"), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["nextStep"], "profile_setup");
        assert!(cookie.is_some());
    }

    #[rstest]
    #[case::blank_email("", "hunter22", "email", "empty_email")]
    #[case::bad_email("asha", "hunter22", "email", "invalid_email")]
    #[case::short_password("asha@example.com", "12345", "password", "password_too_short")]
    #[actix_web::test]
    async fn invalid_credentials_name_the_field(
        #[case] email: &str,
        #[case] password: &str,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let client = test_client().await;

        let (status, body, _) = client
            .post_json(
                "/api/v1/auth/donor/register",
                &serde_json::json!({ "email": email, "password": password }),
                None,
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["field"], field);
        assert_eq!(body["details"]["code"], code);
    }

    #[actix_web::test]
    async fn unknown_portal_is_a_malformed_path() {
        let client = test_client().await;

        let (status, body, _) = client
            .post_json("/api/v1/auth/admin/register", &credentials_body("a@b.co"), None)
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"]["part"], "path");
    }

    #[actix_web::test]
    async fn logout_forgets_the_account() {
        let client = test_client().await;
        let cookie = client.register("donor", "asha@example.com").await;

        let (status, _, cleared) = client.post_json("/api/v1/auth/logout", &Value::Null, Some(&cookie)).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let cleared = cleared.expect("removal cookie");

        let (status, body) = client.get("/api/v1/auth/me", Some(&cleared)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "unauthorized");
    }
}
