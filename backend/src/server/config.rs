//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use actix_web::cookie::{Key, SameSite, time};
use bloodlink::composition::Backend;
use bloodlink::inbound::http::session_config::SessionSettings;
use bloodlink::inbound::ws::state::OriginPolicy;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) same_site: SameSite,
    pub(crate) session_ttl: time::Duration,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) backend: Backend,
    pub(crate) origins: OriginPolicy,
}

impl ServerConfig {
    /// Construct a server configuration from session settings and storage.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr, backend: Backend) -> Self {
        let session_ttl =
            time::Duration::try_from(session.ttl).unwrap_or_else(|_| time::Duration::hours(2));
        Self {
            key: session.key,
            cookie_secure: session.cookie_secure,
            same_site: session.same_site,
            session_ttl,
            bind_addr,
            backend,
            origins: OriginPolicy::default(),
        }
    }

    /// Origins allowed to open the live feed.
    #[must_use]
    pub fn with_origins(mut self, origins: OriginPolicy) -> Self {
        self.origins = origins;
        self
    }
}
