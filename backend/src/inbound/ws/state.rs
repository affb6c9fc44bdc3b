//! Shared WebSocket adapter state.
//!
//! The live feed depends on domain ports only: a subscription to domain
//! events plus the read ports used to build snapshots. Tests swap in
//! in-memory stores and a local event bus.

use std::sync::Arc;

use url::Url;

use crate::domain::ports::{BloodRequestQuery, EventSubscriber, NotificationsQuery};

/// Origins allowed to open the live feed.
///
/// An origin matches when scheme, host and effective port are equal to one
/// of the configured origins. Paths and queries are ignored.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    allowed: Vec<Url>,
}

impl OriginPolicy {
    /// Allow exactly the given origins.
    #[must_use]
    pub const fn new(allowed: Vec<Url>) -> Self {
        Self { allowed }
    }

    /// Parse origins from configuration strings.
    ///
    /// # Errors
    /// Returns the first entry that is not an absolute URL.
    pub fn parse<I, S>(origins: I) -> Result<Self, url::ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let allowed = origins
            .into_iter()
            .map(|origin| Url::parse(origin.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { allowed })
    }

    /// Whether `origin` is on the allow-list.
    #[must_use]
    pub fn allows(&self, origin: &Url) -> bool {
        self.allowed
            .iter()
            .any(|allowed| allowed.origin() == origin.origin())
    }
}

/// Dependency bundle for the live feed.
#[derive(Clone)]
pub struct WsState {
    /// Source of domain events.
    pub events: Arc<dyn EventSubscriber>,
    /// Request listings for snapshots.
    pub requests: Arc<dyn BloodRequestQuery>,
    /// Notification listings for snapshots.
    pub notifications: Arc<dyn NotificationsQuery>,
    /// Accepted `Origin` values.
    pub origins: OriginPolicy,
}
