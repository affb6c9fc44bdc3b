//! Backend library modules.
//!
//! Bloodlink connects blood donors with hospitals: donors keep an
//! eligibility-checked profile, hospitals search compatible donors and send
//! requests, and both sides follow the request lifecycle over REST and a
//! WebSocket live feed.

pub mod composition;
pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;
#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
