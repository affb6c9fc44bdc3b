//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie carries the signed-in account id and its role. Handlers ask
//! for the role they serve through [`SessionContext::require_role`], so a
//! donor cookie never reaches hospital endpoints.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Account, AccountId, Error, Role};

pub(crate) const ACCOUNT_ID_KEY: &str = "account_id";
pub(crate) const ROLE_KEY: &str = "role";

/// Account and role recovered from the session cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionAccount {
    /// Signed-in account.
    pub id: AccountId,
    /// Portal the account belongs to.
    pub role: Role,
}

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Store the account in the session, replacing any previous sign-in.
    pub fn persist(&self, account: &Account) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(ACCOUNT_ID_KEY, account.id.to_string())
            .and_then(|()| self.0.insert(ROLE_KEY, account.role.as_str()))
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Forget the signed-in account.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// The signed-in account, if the cookie holds a valid one.
    pub fn account(&self) -> Result<Option<SessionAccount>, Error> {
        let read = |key: &str| {
            self.0
                .get::<String>(key)
                .map_err(|error| Error::internal(format!("failed to read session: {error}")))
        };
        let (Some(raw_id), Some(raw_role)) = (read(ACCOUNT_ID_KEY)?, read(ROLE_KEY)?) else {
            return Ok(None);
        };
        match (AccountId::new(&raw_id), raw_role.parse::<Role>()) {
            (Ok(id), Ok(role)) => Ok(Some(SessionAccount { id, role })),
            (Err(error), _) => {
                warn!(%error, "invalid account id in session cookie");
                Ok(None)
            }
            (_, Err(error)) => {
                warn!(%error, "invalid role in session cookie");
                Ok(None)
            }
        }
    }

    /// Require a signed-in account or return `401 Unauthorized`.
    pub fn require_account(&self) -> Result<SessionAccount, Error> {
        self.account()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Require a signed-in account of `role` or return `403 Forbidden`.
    pub fn require_role(&self, role: Role) -> Result<AccountId, Error> {
        let account = self.require_account()?;
        if account.role == role {
            Ok(account.id)
        } else {
            Err(Error::forbidden(format!("this endpoint is for {role} accounts")))
        }
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EmailAddress;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use chrono::Utc;
    use rstest::rstest;

    fn session_test_app() -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        App::new()
            .wrap(crate::inbound::http::test_utils::test_session_middleware())
            .route(
                "/sign-in/{role}",
                web::get().to(|session: SessionContext, role: web::Path<Role>| async move {
                    let account = Account::register(
                        AccountId::new("3fa85f64-5717-4562-b3fc-2c963f66afa6")
                            .expect("fixture id"),
                        EmailAddress::new("someone@example.com").expect("fixture email"),
                        role.into_inner(),
                        Utc::now(),
                    );
                    session.persist(&account)?;
                    Ok::<_, Error>(HttpResponse::Ok())
                }),
            )
            .route(
                "/donor-only",
                web::get().to(|session: SessionContext| async move {
                    let id = session.require_role(Role::Donor)?;
                    Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                }),
            )
            .route(
                "/tamper",
                web::get().to(|session: Session| async move {
                    session.insert(ACCOUNT_ID_KEY, "not-a-uuid").expect("insert id");
                    session.insert(ROLE_KEY, "donor").expect("insert role");
                    HttpResponse::Ok()
                }),
            )
    }

    async fn cookie_from(
        app: &impl actix_web::dev::Service<
            actix_http::Request,
            Response = actix_web::dev::ServiceResponse,
            Error = actix_web::Error,
        >,
        uri: &str,
    ) -> actix_web::cookie::Cookie<'static> {
        let res = test::call_service(app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(res.status(), StatusCode::OK);
        res.response()
            .cookies()
            .find(|cookie| cookie.name() == "session")
            .expect("session cookie set")
            .into_owned()
    }

    #[actix_web::test]
    async fn donor_session_reaches_donor_endpoint() {
        let app = test::init_service(session_test_app()).await;
        let cookie = cookie_from(&app, "/sign-in/donor").await;

        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/donor-only")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::OK);
        let body = test::read_body(res).await;
        assert_eq!(body, "3fa85f64-5717-4562-b3fc-2c963f66afa6");
    }

    #[rstest]
    #[case::anonymous(None, StatusCode::UNAUTHORIZED)]
    #[case::wrong_role(Some("/sign-in/hospital"), StatusCode::FORBIDDEN)]
    #[case::tampered(Some("/tamper"), StatusCode::UNAUTHORIZED)]
    #[actix_web::test]
    async fn donor_endpoint_turns_away_other_sessions(
        #[case] sign_in: Option<&str>,
        #[case] expected: StatusCode,
    ) {
        let app = test::init_service(session_test_app()).await;
        let mut request = test::TestRequest::get().uri("/donor-only");
        if let Some(uri) = sign_in {
            request = request.cookie(cookie_from(&app, uri).await);
        }

        let res = test::call_service(&app, request.to_request()).await;

        assert_eq!(res.status(), expected);
    }
}
