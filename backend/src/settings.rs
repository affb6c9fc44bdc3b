//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `BLOODLINK_*` environment variables and
//! configuration files, in increasing order of precedence per OrthoConfig.

use std::net::{IpAddr, SocketAddr};

use ortho_config::OrthoConfig;
use serde::{Deserialize, Deserializer};

use crate::inbound::ws::state::OriginPolicy;
use crate::outbound::persistence::PoolConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:3000";

/// Errors raised while interpreting loaded settings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// The bind host is not an IP address.
    #[error("invalid bind host '{host}'")]
    InvalidHost {
        /// Rejected value.
        host: String,
    },
    /// An allowed origin is not an absolute URL.
    #[error("invalid WebSocket origin in [{origins}]: {message}")]
    InvalidOrigin {
        /// Configured origins, comma-joined.
        origins: String,
        /// Parser failure.
        message: String,
    },
}

/// Listener, storage and live feed settings.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BLOODLINK")]
pub struct ServerSettings {
    /// IP address to bind; defaults to all interfaces.
    pub host: Option<String>,
    /// TCP port to bind.
    #[ortho_config(default = 8080)]
    pub port: u16,
    /// PostgreSQL URL. In-memory storage is used when absent.
    pub database_url: Option<String>,
    /// Maximum pooled database connections.
    pub db_pool_size: Option<u32>,
    /// Origins allowed to open the live feed. The environment form is
    /// comma-separated; a lone origin is accepted as a plain string.
    #[serde(default, deserialize_with = "one_or_many")]
    pub ws_allowed_origins: Option<Vec<String>>,
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Origins {
        One(String),
        Many(Vec<String>),
    }

    Ok(Option::<Origins>::deserialize(deserializer)?.map(|origins| match origins {
        Origins::One(origin) => vec![origin],
        Origins::Many(origins) => origins,
    }))
}

impl ServerSettings {
    /// Socket address for the HTTP listener.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidHost`] when the host is not an IP.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.trim().parse().map_err(|_| SettingsError::InvalidHost {
            host: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }

    /// Pool configuration when a database URL is configured.
    pub fn pool_config(&self) -> Option<PoolConfig> {
        let url = self.database_url.as_deref().map(str::trim)?;
        if url.is_empty() {
            return None;
        }
        let config = PoolConfig::new(url);
        Some(match self.db_pool_size {
            Some(size) => config.with_max_size(size),
            None => config,
        })
    }

    /// Origins allowed to open the live feed.
    ///
    /// # Errors
    /// Returns [`SettingsError::InvalidOrigin`] when an entry is not an
    /// absolute URL.
    pub fn origin_policy(&self) -> Result<OriginPolicy, SettingsError> {
        let fallback = [DEFAULT_ALLOWED_ORIGIN.to_owned()];
        let origins = self.ws_allowed_origins.as_deref().unwrap_or(&fallback);
        OriginPolicy::parse(
            origins
                .iter()
                .map(String::as_str)
                .map(str::trim)
                .filter(|origin| !origin.is_empty()),
        )
        .map_err(|error| SettingsError::InvalidOrigin {
            origins: origins.join(","),
            message: error.to_string(),
        })
    }
}
