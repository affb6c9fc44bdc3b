//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::Key;

/// Build a session middleware with a fresh signing key.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    crate::test_support::session_middleware(Key::generate())
}
