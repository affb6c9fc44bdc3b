//! Per-connection live feed handler.
//!
//! Keeps WebSocket framing and heartbeats at the edge. The feed opens with a
//! snapshot of the account's requests and notifications, then forwards every
//! domain event that concerns the account. A receiver that falls behind the
//! bus, or a client sending `{"type":"resync"}`, gets a fresh snapshot. The
//! public contract pings every 5s and considers a connection idle after 10s
//! without client traffic; tests shorten both.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time;
use tracing::{debug, warn};

use crate::domain::ports::{BloodRequestQuery, NotificationsQuery};
use crate::domain::{DomainEvent, Error, Role};
use crate::inbound::http::session::SessionAccount;
use crate::inbound::ws::messages::{ClientMessage, FeedMessage};

/// Time between heartbeats to the client (5s in production, shorter in tests).
#[cfg(not(test))]
pub(super) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
pub(super) const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

/// Max idle time before disconnecting the client (10s in production, shorter in tests).
#[cfg(not(test))]
pub(super) const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
pub(super) const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

/// Read ports and identity for one connection.
pub(super) struct FeedContext {
    pub(super) account: SessionAccount,
    pub(super) requests: Arc<dyn BloodRequestQuery>,
    pub(super) notifications: Arc<dyn NotificationsQuery>,
}

pub(super) async fn handle_ws_session(
    context: FeedContext,
    events: broadcast::Receiver<DomainEvent>,
    session: Session,
    stream: MessageStream,
) {
    FeedSession { context }.run(events, session, stream).await;
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Snapshot(Error),
    BusClosed,
    Network(Closed),
}

enum CloseAction {
    None,
    Close(Option<CloseReason>),
}

struct FeedSession {
    context: FeedContext,
}

impl FeedSession {
    async fn run(
        &self,
        mut events: broadcast::Receiver<DomainEvent>,
        mut session: Session,
        mut stream: MessageStream,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        let mut result = self.send_snapshot(&mut session).await;
        while result.is_ok() {
            result = tokio::select! {
                _ = heartbeat.tick() => {
                    Self::handle_heartbeat_tick(&mut session, last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                event = events.recv() => self.handle_event(&mut session, event).await,
            };
        }

        if let Err(error) = result {
            self.log_shutdown_reason(&error);
            close_session_if_needed(session, close_action_for(error)).await;
        }
    }

    async fn handle_heartbeat_tick(
        session: &mut Session,
        last_heartbeat: Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }

        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let Some(message) = message else {
            return Err(SessionError::StreamClosed);
        };

        match message {
            Ok(Message::Ping(payload)) => {
                *last_heartbeat = Instant::now();
                session.pong(&payload).await.map_err(SessionError::Network)
            }
            Ok(Message::Text(text)) => {
                *last_heartbeat = Instant::now();
                self.handle_text_message(session, text.as_ref()).await
            }
            Ok(Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop) => {
                *last_heartbeat = Instant::now();
                Ok(())
            }
            Ok(Message::Close(reason)) => Err(SessionError::ClientClosed(reason)),
            Err(error) => Err(SessionError::Protocol(error)),
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        match serde_json::from_str::<ClientMessage>(text) {
            Ok(ClientMessage::Resync) => self.send_snapshot(session).await,
            Err(error) => {
                warn!(error = %error, "Rejected malformed live feed payload");
                Err(SessionError::InvalidPayload)
            }
        }
    }

    async fn handle_event(
        &self,
        session: &mut Session,
        event: Result<DomainEvent, RecvError>,
    ) -> Result<(), SessionError> {
        match event {
            Ok(event) if event.concerns(&self.context.account.id) => {
                send_json(session, &FeedMessage::from(event))
                    .await
                    .map_err(SessionError::Network)
            }
            Ok(_) => Ok(()),
            Err(RecvError::Lagged(skipped)) => {
                warn!(
                    account_id = %self.context.account.id,
                    skipped,
                    "live feed lagged; resending snapshot"
                );
                self.send_snapshot(session).await
            }
            Err(RecvError::Closed) => Err(SessionError::BusClosed),
        }
    }

    async fn snapshot(&self) -> Result<FeedMessage, Error> {
        let SessionAccount { id, role } = self.context.account;
        let requests = match role {
            Role::Donor => self.context.requests.for_donor(&id, None).await?,
            Role::Hospital => self.context.requests.for_hospital(&id, None).await?,
        };
        let notifications = self.context.notifications.list(&id).await?;
        Ok(FeedMessage::Snapshot {
            requests,
            notifications,
        })
    }

    async fn send_snapshot(&self, session: &mut Session) -> Result<(), SessionError> {
        let snapshot = self.snapshot().await.map_err(SessionError::Snapshot)?;
        debug!(account_id = %self.context.account.id, "live feed snapshot sent");
        send_json(session, &snapshot)
            .await
            .map_err(SessionError::Network)
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        let account_id = self.context.account.id;
        match error {
            SessionError::HeartbeatTimeout => {
                warn!(%account_id, "Live feed heartbeat timeout; closing connection");
            }
            SessionError::Protocol(error) => {
                warn!(%account_id, error = %error, "Live feed protocol error");
            }
            SessionError::Network(error) => {
                warn!(%account_id, error = %error, "Live feed send failed; closing connection");
            }
            SessionError::Snapshot(error) => {
                warn!(%account_id, error = %error, "Live feed snapshot failed; closing connection");
            }
            SessionError::BusClosed => {
                warn!(%account_id, "Event bus closed; closing live feed");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {
                debug!(%account_id, "live feed closed");
            }
        }
    }
}

fn reason(code: CloseCode, description: &str) -> Option<CloseReason> {
    Some(CloseReason {
        code,
        description: Some(description.to_owned()),
    })
}

fn close_action_for(error: SessionError) -> CloseAction {
    match error {
        SessionError::HeartbeatTimeout => CloseAction::Close(reason(CloseCode::Normal, "heartbeat timeout")),
        SessionError::Protocol(_) => CloseAction::Close(reason(CloseCode::Protocol, "protocol error")),
        SessionError::InvalidPayload => CloseAction::Close(reason(CloseCode::Policy, "invalid payload")),
        SessionError::Snapshot(_) => {
            CloseAction::Close(reason(CloseCode::Error, "snapshot unavailable"))
        }
        SessionError::BusClosed => CloseAction::Close(reason(CloseCode::Away, "server shutting down")),
        SessionError::ClientClosed(reason) => CloseAction::Close(reason),
        SessionError::StreamClosed | SessionError::Network(_) => CloseAction::None,
    }
}

async fn close_session_if_needed(session: Session, close_action: CloseAction) {
    if let CloseAction::Close(reason) = close_action {
        if let Err(error) = session.close(reason).await {
            warn!(error = %error, "Failed to close live feed session");
        }
    }
}

async fn send_json(session: &mut Session, payload: &FeedMessage) -> Result<(), Closed> {
    match serde_json::to_string(payload) {
        Ok(body) => session.text(body).await,
        Err(error) => {
            warn!(error = %error, "Failed to serialize live feed payload");
            Ok(())
        }
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
