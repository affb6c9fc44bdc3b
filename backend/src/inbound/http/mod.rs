//! HTTP inbound adapter exposing REST endpoints.

use actix_web::web;

pub mod auth;
pub mod donors;
pub mod error;
pub mod health;
pub mod hospitals;
pub mod notifications;
pub mod session;
pub mod session_config;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register every REST handler plus the extractor error envelopes.
///
/// Mount inside a scope wrapped by the session middleware:
///
/// ```ignore
/// App::new().service(
///     web::scope("/api/v1")
///         .wrap(session_middleware)
///         .configure(configure_api),
/// )
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(auth::register)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::current_account)
        .service(donors::get_profile)
        .service(donors::save_profile)
        .service(donors::set_availability)
        .service(donors::list_requests)
        .service(donors::accept_request)
        .service(donors::reject_request)
        .service(hospitals::get_profile)
        .service(hospitals::save_profile)
        .service(hospitals::donor_matches)
        .service(hospitals::create_requests)
        .service(hospitals::list_requests)
        .service(hospitals::mark_donated)
        .service(hospitals::stats)
        .service(notifications::list_notifications)
        .service(notifications::mark_read);
}
