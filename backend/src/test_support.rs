//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Arc, Mutex, PoisonError};

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::MessageBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use chrono::{DateTime, Duration, Local, TimeZone, Utc};
use mockable::Clock;
use serde::Serialize;
use serde_json::{Value, json};

use crate::Trace;
use crate::composition::{AppStates, Backend, build_states};
use crate::domain::AccountId;
use crate::inbound::http::configure_api;
use crate::inbound::ws::state::OriginPolicy;
use crate::inbound::ws::ws_entry;
use crate::outbound::events::BroadcastEventBus;
use crate::outbound::memory::InMemoryStore;

/// Name of the session cookie issued by [`session_middleware`].
pub const SESSION_COOKIE: &str = "session";

/// Origin accepted by the live feed in test apps.
pub const TEST_ORIGIN: &str = "http://localhost:3000";

/// Clock whose time only moves when a test says so.
pub struct MutableClock {
    now: Mutex<DateTime<Utc>>,
}

impl MutableClock {
    /// Start the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Jump to `now`.
    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    /// Move forward by `by`.
    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Default for MutableClock {
    fn default() -> Self {
        Self::new(Utc.with_ymd_and_hms(2026, 6, 15, 10, 30, 0).single().unwrap_or_default())
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Build a session middleware configured for tests.
///
/// Sets the cookie name to [`SESSION_COOKIE`] and disables the `Secure`
/// flag for local HTTP tests. Share `key` between app instances that must
/// accept each other's cookies.
#[must_use]
pub fn session_middleware(key: Key) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name(SESSION_COOKIE.to_owned())
        .cookie_secure(false)
        .build()
}

/// Wiring for one in-memory test application.
#[derive(Clone)]
pub struct TestHarness {
    /// Adapter states over a fresh in-memory store.
    pub states: AppStates,
    /// Clock driving every service.
    pub clock: Arc<MutableClock>,
    /// Bus shared by services and the live feed.
    pub bus: Arc<BroadcastEventBus>,
    /// Session signing key.
    pub key: Key,
}

impl TestHarness {
    /// Fresh store, default clock and [`TEST_ORIGIN`] as the only origin.
    #[must_use]
    pub fn new() -> Self {
        let clock = Arc::new(MutableClock::default());
        let bus = Arc::new(BroadcastEventBus::default());
        let origins = OriginPolicy::parse([TEST_ORIGIN]).unwrap_or_default();
        let states = build_states(
            &Backend::InMemory(Arc::new(InMemoryStore::new())),
            &bus,
            &(Arc::clone(&clock) as Arc<dyn Clock>),
            origins,
        );
        Self {
            states,
            clock,
            bus,
            key: Key::generate(),
        }
    }

    /// The application as served under `/api/v1`.
    ///
    /// The returned app owns clones of the harness state, so it outlives
    /// the borrow of `self`.
    #[must_use]
    pub fn app(
        &self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse<impl MessageBody + use<>>,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        let http = web::Data::new(self.states.http.clone());
        let ws = web::Data::new(self.states.ws.clone());
        let key = self.key.clone();
        App::new()
            .app_data(http)
            .app_data(ws)
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware(key))
                    .configure(configure_api)
                    .service(ws_entry),
            )
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// JSON body for the credential endpoints.
#[must_use]
pub fn credentials_body(email: &str) -> Value {
    json!({ "email": email, "password": "hunter22" })
}

/// A donor profile payload that passes every eligibility rule.
#[must_use]
pub fn donor_profile_body(blood_group: &str) -> Value {
    json!({
        "name": "Asha Rao",
        "age": 29,
        "weight": 61.5,
        "phone": "9876543210",
        "city": "Bengaluru",
        "state": "Karnataka",
        "country": "India",
        "pincode": "560001",
        "bloodGroup": blood_group,
        "healthCondition": "Generally Healthy"
    })
}

/// A complete hospital profile payload.
#[must_use]
pub fn hospital_profile_body() -> Value {
    json!({
        "hospitalName": "City General",
        "phone": "080-5550100",
        "address": "12 MG Road",
        "city": "Bengaluru",
        "state": "Karnataka",
        "country": "India",
        "pincode": "560001"
    })
}

/// Response status, JSON body (or `null`) and session cookie if one was set.
pub type Exchange = (StatusCode, Value, Option<Cookie<'static>>);

/// Drives an initialised test service with JSON requests.
pub struct TestClient<S> {
    app: S,
    /// Wiring behind the service.
    pub harness: TestHarness,
}

/// Initialise a [`TestClient`] over a fresh [`TestHarness`].
pub async fn test_client() -> TestClient<
    impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
> {
    client_for(TestHarness::new()).await
}

/// Initialise a [`TestClient`] sharing `harness` with other app instances.
pub async fn client_for(
    harness: TestHarness,
) -> TestClient<
    impl Service<actix_http::Request, Response = ServiceResponse<impl MessageBody>, Error = actix_web::Error>,
> {
    let app = test::init_service(harness.app()).await;
    TestClient { app, harness }
}

impl<S, B> TestClient<S>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
    B: MessageBody,
{
    async fn exchange(&self, request: test::TestRequest, cookie: Option<&Cookie<'static>>) -> Exchange {
        let request = match cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        let response = test::call_service(&self.app, request.to_request()).await;
        let status = response.status();
        let cookie = response
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE)
            .map(Cookie::into_owned);
        let bytes = test::read_body(response).await;
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body, cookie)
    }

    /// `GET uri`.
    pub async fn get(&self, uri: &str, cookie: Option<&Cookie<'static>>) -> (StatusCode, Value) {
        let (status, body, _) = self.exchange(test::TestRequest::get().uri(uri), cookie).await;
        (status, body)
    }

    /// `POST uri` with a JSON body.
    pub async fn post_json(
        &self,
        uri: &str,
        body: &impl Serialize,
        cookie: Option<&Cookie<'static>>,
    ) -> Exchange {
        self.exchange(test::TestRequest::post().uri(uri).set_json(body), cookie)
            .await
    }

    /// `PUT uri` with a JSON body.
    pub async fn put_json(
        &self,
        uri: &str,
        body: &impl Serialize,
        cookie: Option<&Cookie<'static>>,
    ) -> Exchange {
        self.exchange(test::TestRequest::put().uri(uri).set_json(body), cookie)
            .await
    }

    /// Register `email` in the `role` portal and return its session cookie.
    ///
    /// # Panics
    /// Panics when registration does not succeed.
    pub async fn register(&self, role: &str, email: &str) -> Cookie<'static> {
        let (status, body, cookie) = self
            .post_json(&format!("/api/v1/auth/{role}/register"), &credentials_body(email), None)
            .await;
        match (status, cookie) {
            (StatusCode::CREATED, Some(cookie)) => cookie,
            (status, _) => panic!("registering {email} as {role} failed with {status}: {body}"),
        }
    }

    /// Register a donor with a saved, eligible profile.
    ///
    /// # Panics
    /// Panics when registration or the profile save fails.
    pub async fn donor(&self, email: &str, blood_group: &str) -> (Cookie<'static>, String) {
        let cookie = self.register("donor", email).await;
        let (status, body, _) = self
            .put_json("/api/v1/donors/me/profile", &donor_profile_body(blood_group), Some(&cookie))
            .await;
        assert_eq!(status, StatusCode::OK, "saving donor profile failed: {body}");
        let id = body["accountId"].as_str().unwrap_or_default().to_owned();
        (cookie, id)
    }

    /// Register a hospital with a saved profile.
    ///
    /// # Panics
    /// Panics when registration or the profile save fails.
    pub async fn hospital(&self, email: &str) -> Cookie<'static> {
        let cookie = self.register("hospital", email).await;
        let (status, body, _) = self
            .put_json("/api/v1/hospitals/me/profile", &hospital_profile_body(), Some(&cookie))
            .await;
        assert_eq!(status, StatusCode::OK, "saving hospital profile failed: {body}");
        cookie
    }

    /// Account identifier behind a session cookie.
    ///
    /// # Panics
    /// Panics when the cookie is not signed in.
    pub async fn account_id(&self, cookie: &Cookie<'static>) -> AccountId {
        let (status, body) = self.get("/api/v1/auth/me", Some(cookie)).await;
        match body["account"]["id"].as_str().map(AccountId::new) {
            Some(Ok(id)) => id,
            _ => panic!("resolving the signed-in account failed with {status}: {body}"),
        }
    }
}
