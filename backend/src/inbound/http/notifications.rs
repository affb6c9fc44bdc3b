//! Notification inbox HTTP handlers.
//!
//! ```text
//! GET  /api/v1/notifications
//! POST /api/v1/notifications/{id}/read
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{Error, Notification, NotificationId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Notifications for the signed-in account, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/notifications",
    responses(
        (status = 200, description = "Notifications", body = [Notification]),
        (status = 401, description = "Login required", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "listNotifications"
)]
#[get("/notifications")]
pub async fn list_notifications(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<Notification>>> {
    let account = session.require_account()?;
    let notifications = state.notifications_query.list(&account.id).await?;
    Ok(web::Json(notifications))
}

/// Flag one notification as read.
#[utoipa::path(
    post,
    path = "/api/v1/notifications/{id}/read",
    params(("id" = String, Path, description = "Notification identifier")),
    responses(
        (status = 204, description = "Marked as read"),
        (status = 401, description = "Login required", body = Error),
        (status = 404, description = "No such notification for this account", body = Error)
    ),
    tags = ["notifications"],
    operation_id = "markNotificationRead"
)]
#[post("/notifications/{id}/read")]
pub async fn mark_read(
    state: web::Data<HttpState>,
    session: SessionContext,
    id: web::Path<NotificationId>,
) -> ApiResult<HttpResponse> {
    let account = session.require_account()?;
    state.notifications.mark_read(&account.id, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_client;
    use actix_web::http::StatusCode;
    use serde_json::{Value, json};

    #[actix_web::test]
    async fn inbox_requires_a_session() {
        let client = test_client().await;

        let (status, _) = client.get("/api/v1/notifications", None).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn counterparts_are_notified_and_can_acknowledge() {
        let client = test_client().await;
        let (donor, _) = client.donor("asha@example.com", "A+").await;
        let hospital = client.hospital("desk@citygeneral.org").await;
        let (_, created, _) = client
            .post_json(
                "/api/v1/hospitals/me/requests",
                &json!({ "bloodGroup": "A+", "unitsRequired": 2 }),
                Some(&hospital),
            )
            .await;
        let request_id = created[0]["id"].clone();

        let (status, inbox) = client.get("/api/v1/notifications", Some(&donor)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(inbox[0]["type"], "blood_request");
        assert_eq!(inbox[0]["requestId"], request_id);
        assert_eq!(inbox[0]["unitsRequired"], 2);
        assert_eq!(inbox[0]["read"], false);

        let id = inbox[0]["id"].as_str().expect("notification id").to_owned();
        let (status, _, _) = client
            .post_json(&format!("/api/v1/notifications/{id}/read"), &Value::Null, Some(&donor))
            .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        let (_, inbox) = client.get("/api/v1/notifications", Some(&donor)).await;
        assert_eq!(inbox[0]["read"], true);

        let (_, hospital_inbox) = client.get("/api/v1/notifications", Some(&hospital)).await;
        assert_eq!(hospital_inbox, json!([]));
    }

    #[actix_web::test]
    async fn strangers_cannot_acknowledge() {
        let client = test_client().await;
        let (donor, _) = client.donor("asha@example.com", "A+").await;
        let hospital = client.hospital("desk@citygeneral.org").await;
        client
            .post_json(
                "/api/v1/hospitals/me/requests",
                &json!({ "bloodGroup": "A+", "unitsRequired": 1 }),
                Some(&hospital),
            )
            .await;
        let (_, inbox) = client.get("/api/v1/notifications", Some(&donor)).await;
        let id = inbox[0]["id"].as_str().expect("notification id").to_owned();

        let (status, _, _) = client
            .post_json(&format!("/api/v1/notifications/{id}/read"), &Value::Null, Some(&hospital))
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
