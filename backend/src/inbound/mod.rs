//! Inbound adapters translating portal traffic into domain service calls.
//!
//! [`http`] serves the REST API for both portals; [`ws`] streams the live
//! feed of request and notification changes to signed-in accounts.

pub mod http;
pub mod ws;
