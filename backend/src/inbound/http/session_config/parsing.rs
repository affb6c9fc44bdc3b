//! Environment parsing helpers for session configuration.

use std::path::PathBuf;
use std::time::Duration;

use actix_web::cookie::{Key, SameSite};
use mockable::Env;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::fingerprint::key_fingerprint;
use super::{
    BuildMode, DEFAULT_SESSION_TTL, SAMESITE_ENV, SESSION_KEY_MIN_LEN, SessionConfigError,
    TTL_HOURS_ENV,
};

const BOOL_EXPECTED: &str = "1|0|true|false|yes|no|y|n";
const SAMESITE_EXPECTED: &str = "Strict|Lax|None";
const TTL_EXPECTED: &str = "whole hours between 1 and 720";
const MAX_TTL_HOURS: u64 = 720;
/// Key derivation needs at least this much material.
const DEBUG_KEY_MIN_LEN: usize = 32;

/// Boolean toggle name plus the value debug builds fall back to.
pub(super) struct BoolToggle {
    name: &'static str,
    default_value: bool,
}

impl BoolToggle {
    pub(super) const fn new(name: &'static str, default_value: bool) -> Self {
        Self {
            name,
            default_value,
        }
    }
}

/// In debug builds log and fall back; in release builds fail.
fn lenient<T>(
    mode: BuildMode,
    fallback: T,
    error: SessionConfigError,
    log: impl FnOnce(),
) -> Result<T, SessionConfigError> {
    if mode.is_debug() {
        log();
        Ok(fallback)
    } else {
        Err(error)
    }
}

pub(super) fn parse_bool_toggle<E: Env>(
    env: &E,
    mode: BuildMode,
    toggle: BoolToggle,
    validate: impl FnOnce(bool, BuildMode) -> Result<bool, SessionConfigError>,
) -> Result<bool, SessionConfigError> {
    let BoolToggle {
        name,
        default_value,
    } = toggle;
    let Some(value) = env.string(name) else {
        return lenient(
            mode,
            default_value,
            SessionConfigError::MissingEnv { name },
            || warn!(default_value, "{name} not set; using default"),
        );
    };
    match parse_bool(&value) {
        Some(flag) => validate(flag, mode),
        None => lenient(
            mode,
            default_value,
            SessionConfigError::InvalidEnv {
                name,
                value: value.clone(),
                expected: BOOL_EXPECTED,
            },
            || warn!(value = %value, default_value, "invalid {name}; using default"),
        ),
    }
}

pub(super) fn parse_same_site<E: Env>(
    env: &E,
    mode: BuildMode,
    cookie_secure: bool,
) -> Result<SameSite, SessionConfigError> {
    let default_same_site = if mode.is_debug() {
        SameSite::Lax
    } else {
        SameSite::Strict
    };
    let Some(value) = env.string(SAMESITE_ENV) else {
        return lenient(
            mode,
            default_same_site,
            SessionConfigError::MissingEnv { name: SAMESITE_ENV },
            || warn!("SESSION_SAMESITE not set; using default"),
        );
    };

    match value.to_ascii_lowercase().as_str() {
        "lax" => Ok(SameSite::Lax),
        "strict" => Ok(SameSite::Strict),
        "none" if cookie_secure => Ok(SameSite::None),
        "none" => lenient(
            mode,
            SameSite::None,
            SessionConfigError::InsecureSameSiteNone,
            || warn!("SESSION_SAMESITE=None without a secure cookie; browsers may drop it"),
        ),
        _ => lenient(
            mode,
            default_same_site,
            SessionConfigError::InvalidEnv {
                name: SAMESITE_ENV,
                value: value.clone(),
                expected: SAMESITE_EXPECTED,
            },
            || warn!(value = %value, "invalid SESSION_SAMESITE; using default"),
        ),
    }
}

/// Unlike the other toggles, a missing TTL is fine in every build mode.
pub(super) fn parse_ttl_hours<E: Env>(
    env: &E,
    mode: BuildMode,
) -> Result<Duration, SessionConfigError> {
    let Some(value) = env.string(TTL_HOURS_ENV) else {
        return Ok(DEFAULT_SESSION_TTL);
    };
    match value.trim().parse::<u64>() {
        Ok(hours) if (1..=MAX_TTL_HOURS).contains(&hours) => {
            Ok(Duration::from_secs(hours * 60 * 60))
        }
        _ => lenient(
            mode,
            DEFAULT_SESSION_TTL,
            SessionConfigError::InvalidEnv {
                name: TTL_HOURS_ENV,
                value: value.clone(),
                expected: TTL_EXPECTED,
            },
            || warn!(value = %value, "invalid SESSION_TTL_HOURS; using default"),
        ),
    }
}

pub(super) fn read_session_key(
    path: PathBuf,
    mode: BuildMode,
    allow_ephemeral: bool,
) -> Result<Key, SessionConfigError> {
    match std::fs::read(&path) {
        Ok(bytes) => {
            let bytes = Zeroizing::new(bytes);
            let length = bytes.len();
            let min_len = if mode.is_debug() {
                DEBUG_KEY_MIN_LEN
            } else {
                SESSION_KEY_MIN_LEN
            };
            if length < min_len {
                return Err(SessionConfigError::KeyTooShort {
                    path,
                    length,
                    min_len,
                });
            }
            let key = Key::derive_from(&bytes);
            info!(
                fingerprint = %key_fingerprint(&key),
                path = %path.display(),
                "session key loaded"
            );
            Ok(key)
        }
        Err(error) if mode.is_debug() || allow_ephemeral => {
            warn!(
                path = %path.display(),
                error = %error,
                "using temporary session key (dev only)"
            );
            Ok(Key::generate())
        }
        Err(source) => Err(SessionConfigError::KeyRead { path, source }),
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" => Some(true),
        "0" | "false" | "no" | "n" => Some(false),
        _ => None,
    }
}
