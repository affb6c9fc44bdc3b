//! Builders wiring driven adapters into the inbound adapter states.
//!
//! The same services run over either backend: the in-memory store when no
//! database is configured, otherwise the Diesel repositories sharing one
//! pool. Both inbound adapters share one event bus.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{
    AccountRepository, BloodRequestRepository, DonorProfileRepository, EventPublisher,
    EventSubscriber, HospitalProfileRepository, IdentityProvider, NotificationRepository,
};
use crate::domain::{
    BloodRequestCommandService, BloodRequestQueryService, BloodRequestStores,
    DonorProfileService, DonorSearchService, HospitalProfileService, IdentityService,
    NotificationsService,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::ws::state::{OriginPolicy, WsState};
use crate::outbound::events::BroadcastEventBus;
use crate::outbound::memory::InMemoryStore;
use crate::outbound::persistence::{
    DbPool, DieselAccountRepository, DieselBloodRequestRepository, DieselDonorProfileRepository,
    DieselHospitalProfileRepository, DieselIdentityProvider, DieselNotificationRepository,
};

/// Storage the services run on.
#[derive(Clone)]
pub enum Backend {
    /// Process-local store; data is lost on restart.
    InMemory(Arc<InMemoryStore>),
    /// PostgreSQL through the shared pool.
    Postgres(DbPool),
}

impl Backend {
    /// Short label used in startup logs.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InMemory(_) => "in-memory",
            Self::Postgres(_) => "postgres",
        }
    }
}

/// States handed to the HTTP and WebSocket adapters.
#[derive(Clone)]
pub struct AppStates {
    /// Ports used by REST handlers.
    pub http: HttpState,
    /// Ports used by the live feed.
    pub ws: WsState,
}

struct Repositories<A, I, D, H, B, N> {
    accounts: Arc<A>,
    identities: Arc<I>,
    donors: Arc<D>,
    hospitals: Arc<H>,
    requests: Arc<B>,
    notifications: Arc<N>,
}

fn wire<A, I, D, H, B, N>(
    repos: Repositories<A, I, D, H, B, N>,
    events: Arc<dyn EventPublisher>,
    clock: &Arc<dyn Clock>,
) -> HttpState
where
    A: AccountRepository + 'static,
    I: IdentityProvider + 'static,
    D: DonorProfileRepository + 'static,
    H: HospitalProfileRepository + 'static,
    B: BloodRequestRepository + 'static,
    N: NotificationRepository + 'static,
{
    let donor_profiles = Arc::new(DonorProfileService::new(
        Arc::clone(&repos.accounts),
        Arc::clone(&repos.donors),
        Arc::clone(clock),
    ));
    let hospital_profiles = Arc::new(HospitalProfileService::new(
        Arc::clone(&repos.accounts),
        Arc::clone(&repos.hospitals),
        Arc::clone(clock),
    ));
    let requests = Arc::new(BloodRequestCommandService::new(
        BloodRequestStores {
            hospitals: Arc::clone(&repos.hospitals),
            donors: Arc::clone(&repos.donors),
            requests: Arc::clone(&repos.requests),
            notifications: Arc::clone(&repos.notifications),
        },
        events,
        Arc::clone(clock),
    ));
    let notifications = Arc::new(NotificationsService::new(repos.notifications));

    HttpState {
        identity: Arc::new(IdentityService::new(
            repos.accounts,
            repos.identities,
            Arc::clone(clock),
        )),
        donor_profiles: donor_profiles.clone(),
        donor_profiles_query: donor_profiles,
        hospital_profiles: hospital_profiles.clone(),
        hospital_profiles_query: hospital_profiles,
        donor_search: Arc::new(DonorSearchService::new(Arc::clone(&repos.donors))),
        requests,
        requests_query: Arc::new(BloodRequestQueryService::new(repos.requests, repos.donors)),
        notifications: notifications.clone(),
        notifications_query: notifications,
    }
}

/// Build the HTTP state over `backend`, publishing events to `events`.
pub fn build_http_state(
    backend: &Backend,
    events: Arc<dyn EventPublisher>,
    clock: &Arc<dyn Clock>,
) -> HttpState {
    match backend {
        Backend::InMemory(store) => wire(
            Repositories {
                accounts: Arc::clone(store),
                identities: Arc::clone(store),
                donors: Arc::clone(store),
                hospitals: Arc::clone(store),
                requests: Arc::clone(store),
                notifications: Arc::clone(store),
            },
            events,
            clock,
        ),
        Backend::Postgres(pool) => wire(
            Repositories {
                accounts: Arc::new(DieselAccountRepository::new(pool.clone())),
                identities: Arc::new(DieselIdentityProvider::new(pool.clone())),
                donors: Arc::new(DieselDonorProfileRepository::new(pool.clone())),
                hospitals: Arc::new(DieselHospitalProfileRepository::new(pool.clone())),
                requests: Arc::new(DieselBloodRequestRepository::new(pool.clone())),
                notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
            },
            events,
            clock,
        ),
    }
}

/// Build both adapter states sharing `bus`.
pub fn build_states(
    backend: &Backend,
    bus: &Arc<BroadcastEventBus>,
    clock: &Arc<dyn Clock>,
    origins: OriginPolicy,
) -> AppStates {
    let http = build_http_state(backend, Arc::clone(bus) as Arc<dyn EventPublisher>, clock);
    let ws = WsState {
        events: Arc::clone(bus) as Arc<dyn EventSubscriber>,
        requests: Arc::clone(&http.requests_query),
        notifications: Arc::clone(&http.notifications_query),
        origins,
    };
    AppStates { http, ws }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::test_fixtures::{credentials, fixture_clock};
    use crate::domain::{NextStep, Role};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn in_memory_states_share_one_store() {
        let backend = Backend::InMemory(Arc::new(InMemoryStore::new()));
        let bus = Arc::new(BroadcastEventBus::default());
        let states = build_states(&backend, &bus, &fixture_clock(), OriginPolicy::default());

        let registered = states
            .http
            .identity
            .register(Role::Donor, &credentials("asha@example.com"))
            .await
            .expect("register donor");
        let signed_in = states
            .http
            .identity
            .sign_in(Role::Donor, &credentials("asha@example.com"))
            .await
            .expect("sign in donor");

        assert_eq!(signed_in.account.id, registered.account.id);
        assert_eq!(signed_in.next_step, NextStep::ProfileSetup);
        assert_eq!(backend.label(), "in-memory");
    }

    #[rstest]
    fn ws_state_subscribes_to_the_shared_bus() {
        let backend = Backend::InMemory(Arc::new(InMemoryStore::new()));
        let bus = Arc::new(BroadcastEventBus::default());
        let states = build_states(&backend, &bus, &fixture_clock(), OriginPolicy::default());

        let _receiver = states.ws.events.subscribe();

        assert_eq!(bus.subscriber_count(), 1);
    }
}
