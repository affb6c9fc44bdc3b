//! WebSocket live feed bridging domain events to signed-in clients.
//!
//! Responsibilities:
//! - validate upgrade requests (origin allow-list, signed-in session)
//! - subscribe to the event bus before the first snapshot is built
//! - spawn the per-connection loop and keep WebSocket concerns at the edge

use actix_web::web::{self, Payload};
use actix_web::{
    HttpRequest, HttpResponse, get,
    http::header::{HeaderValue, ORIGIN},
};
use tracing::{error, info, warn};
use url::Url;

use crate::domain::Error;
use crate::inbound::http::session::SessionContext;

mod session;

pub mod messages;
pub mod state;

use self::state::{OriginPolicy, WsState};

/// Open the live feed for the signed-in account.
#[utoipa::path(
    get,
    path = "/api/v1/ws",
    description = "Upgrade to a WebSocket streaming snapshots, request changes and \
                   notifications for the signed-in account.",
    responses(
        (status = 101, description = "Switching protocols"),
        (status = 400, description = "Invalid Origin header", body = Error),
        (status = 401, description = "Login required", body = Error),
        (status = 403, description = "Origin not allowed", body = Error)
    ),
    tags = ["live"],
    operation_id = "openLiveFeed"
)]
#[get("/ws")]
pub async fn ws_entry(
    state: web::Data<WsState>,
    session: SessionContext,
    req: HttpRequest,
    stream: Payload,
) -> actix_web::Result<HttpResponse> {
    let mut origin_iter = req.headers().get_all(ORIGIN);
    let origin_header = origin_iter.next().ok_or_else(|| {
        error!("Missing Origin header on WebSocket upgrade");
        Error::forbidden("origin not allowed")
    })?;
    if origin_iter.next().is_some() {
        error!("Multiple Origin headers on WebSocket upgrade");
        return Err(Error::invalid_request("invalid Origin header").into());
    }
    validate_origin(&state.origins, origin_header)?;

    let account = session.require_account()?;
    let events = state.events.subscribe();
    let (response, ws_session, messages) = actix_ws::handle(&req, stream).map_err(|error| {
        error!(error = %error, "WebSocket upgrade failed");
        Error::internal("WebSocket upgrade failed")
    })?;

    info!(account_id = %account.id, role = %account.role, "live feed opened");
    let context = session::FeedContext {
        account,
        requests: state.requests.clone(),
        notifications: state.notifications.clone(),
    };
    actix_web::rt::spawn(session::handle_ws_session(
        context, events, ws_session, messages,
    ));
    Ok(response)
}

fn validate_origin(policy: &OriginPolicy, origin_header: &HeaderValue) -> Result<(), Error> {
    let origin_value = origin_header.to_str().map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as string");
        Error::invalid_request("invalid Origin header")
    })?;

    let origin = Url::parse(origin_value).map_err(|error| {
        error!(error = %error, "Failed to parse Origin header as URL");
        Error::invalid_request("invalid Origin header")
    })?;

    if policy.allows(&origin) {
        Ok(())
    } else {
        warn!(
            origin = origin_value,
            "Rejected WS upgrade due to disallowed Origin"
        );
        Err(Error::forbidden("origin not allowed"))
    }
}
