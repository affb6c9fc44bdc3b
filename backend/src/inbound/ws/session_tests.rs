//! Live feed session tests against a real listener.

use super::*;
use crate::domain::BloodGroup;
use crate::domain::ports::CreateBloodRequest;
use crate::test_support::{TEST_ORIGIN, TestHarness, client_for};
use actix_web::cookie::Cookie;
use actix_web::{HttpServer, dev::ServerHandle, http::StatusCode, http::header};
use awc::{BoxedSocket, ws::Codec, ws::Frame, ws::Message};
use futures_util::{SinkExt, StreamExt};
use rstest::rstest;
use serde_json::Value;

type Socket = actix_codec::Framed<BoxedSocket, Codec>;

struct LiveServer {
    url: String,
    handle: ServerHandle,
}

impl LiveServer {
    fn start(harness: &TestHarness) -> Self {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind test listener");
        let addr = listener.local_addr().expect("listener addr");
        let harness = harness.clone();
        let server = HttpServer::new(move || harness.app())
            .workers(1)
            .listen(listener)
            .expect("bind test server")
            .disable_signals()
            .run();
        let handle = server.handle();
        actix_web::rt::spawn(server);
        Self {
            url: format!("ws://{addr}/api/v1/ws"),
            handle,
        }
    }

    async fn connect(&self, cookie: &Cookie<'static>) -> Socket {
        let (_resp, socket) = awc::Client::default()
            .ws(self.url.as_str())
            .set_header(header::ORIGIN, TEST_ORIGIN)
            .cookie(cookie.clone())
            .connect()
            .await
            .expect("websocket connect");
        socket
    }

    async fn refuse(&self, origin: &str, cookie: Option<&Cookie<'static>>) -> StatusCode {
        let request = awc::Client::default()
            .ws(self.url.as_str())
            .set_header(header::ORIGIN, origin);
        let request = match cookie {
            Some(cookie) => request.cookie(cookie.clone()),
            None => request,
        };
        match request.connect().await {
            Err(awc::error::WsClientError::InvalidResponseStatus(status)) => status,
            Err(other) => panic!("unexpected handshake error: {other:?}"),
            Ok(_) => panic!("handshake unexpectedly succeeded"),
        }
    }

    async fn stop(self) {
        self.handle.stop(false).await;
    }
}

/// Next JSON message, answering heartbeats so the feed stays open.
async fn next_message(socket: &mut Socket) -> Value {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Text(bytes) => return serde_json::from_slice(&bytes).expect("json"),
            Frame::Ping(payload) => socket
                .send(Message::Pong(payload))
                .await
                .expect("send pong"),
            Frame::Pong(_) => {}
            other => panic!("expected text frame, got {other:?}"),
        }
    }
}

async fn close_reason(socket: &mut Socket) -> CloseReason {
    loop {
        let frame = socket.next().await.expect("response frame").expect("frame");
        match frame {
            Frame::Close(reason) => return reason.expect("close reason"),
            Frame::Ping(_) | Frame::Pong(_) | Frame::Text(_) => {}
            other => panic!("unexpected frame before close: {other:?}"),
        }
    }
}

#[actix_rt::test]
async fn feed_opens_with_a_snapshot() {
    let harness = TestHarness::new();
    let client = client_for(harness.clone()).await;
    let (donor, _) = client.donor("asha@example.com", "A+").await;
    let server = LiveServer::start(&harness);

    let mut socket = server.connect(&donor).await;
    let snapshot = next_message(&mut socket).await;

    assert_eq!(snapshot["type"], "snapshot");
    assert_eq!(snapshot["requests"], Value::Array(Vec::new()));
    assert_eq!(snapshot["notifications"], Value::Array(Vec::new()));
    server.stop().await;
}

#[actix_rt::test]
async fn donor_sees_new_requests_live() {
    let harness = TestHarness::new();
    let client = client_for(harness.clone()).await;
    let (donor, _) = client.donor("asha@example.com", "A+").await;
    let hospital = client.hospital("desk@citygeneral.org").await;
    let hospital_id = client.account_id(&hospital).await;
    let server = LiveServer::start(&harness);
    let mut socket = server.connect(&donor).await;
    next_message(&mut socket).await;

    let created = harness
        .states
        .http
        .requests
        .create(
            &hospital_id,
            CreateBloodRequest {
                blood_group: BloodGroup::APositive,
                units_required: 2,
                donor_ids: None,
            },
        )
        .await
        .expect("request created");

    let changed = next_message(&mut socket).await;
    assert_eq!(changed["type"], "requestChanged");
    assert_eq!(changed["request"]["id"], created[0].id().to_string());
    assert_eq!(changed["request"]["status"], "pending");
    let notified = next_message(&mut socket).await;
    assert_eq!(notified["type"], "notificationCreated");
    assert_eq!(notified["notification"]["type"], "blood_request");
    server.stop().await;
}

#[actix_rt::test]
async fn resync_resends_the_snapshot() {
    let harness = TestHarness::new();
    let client = client_for(harness.clone()).await;
    let hospital = client.hospital("desk@citygeneral.org").await;
    let server = LiveServer::start(&harness);
    let mut socket = server.connect(&hospital).await;
    next_message(&mut socket).await;

    socket
        .send(Message::Text(r#"{"type":"resync"}"#.into()))
        .await
        .expect("send resync");

    let snapshot = next_message(&mut socket).await;
    assert_eq!(snapshot["type"], "snapshot");
    server.stop().await;
}

#[actix_rt::test]
async fn malformed_frames_close_with_policy() {
    let harness = TestHarness::new();
    let client = client_for(harness.clone()).await;
    let hospital = client.hospital("desk@citygeneral.org").await;
    let server = LiveServer::start(&harness);
    let mut socket = server.connect(&hospital).await;
    next_message(&mut socket).await;

    socket
        .send(Message::Text("not-json".into()))
        .await
        .expect("send text");

    let reason = close_reason(&mut socket).await;
    assert_eq!(reason.code, CloseCode::Policy);
    server.stop().await;
}

#[actix_rt::test]
async fn silent_clients_time_out() {
    let harness = TestHarness::new();
    let client = client_for(harness.clone()).await;
    let hospital = client.hospital("desk@citygeneral.org").await;
    let server = LiveServer::start(&harness);
    let mut socket = server.connect(&hospital).await;

    let reason = tokio::time::timeout(
        CLIENT_TIMEOUT + HEARTBEAT_INTERVAL * 20,
        close_reason(&mut socket),
    )
    .await
    .expect("close frame within timeout");

    assert_eq!(reason.code, CloseCode::Normal);
    assert_eq!(reason.description.as_deref(), Some("heartbeat timeout"));
    server.stop().await;
}

#[rstest]
#[case::no_session(TEST_ORIGIN, false, StatusCode::UNAUTHORIZED)]
#[case::foreign_origin("https://evil.example", true, StatusCode::FORBIDDEN)]
#[actix_rt::test]
async fn upgrades_are_refused(
    #[case] origin: &str,
    #[case] signed_in: bool,
    #[case] expected: StatusCode,
) {
    let harness = TestHarness::new();
    let client = client_for(harness.clone()).await;
    let cookie = client.register("donor", "asha@example.com").await;
    let server = LiveServer::start(&harness);

    let status = server
        .refuse(origin, signed_in.then_some(&cookie))
        .await;

    assert_eq!(status, expected);
    server.stop().await;
}
