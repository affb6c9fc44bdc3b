//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST path, the live feed upgrade and the health
//! probes together with the domain schemas they exchange. The document is
//! served by Swagger UI in debug builds and exported via
//! `cargo run --bin openapi-dump` for client generation.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{
    CreateBloodRequest, DonorMatch, DonorSummary, HospitalRequest, SignInOutcome,
};
use crate::domain::{
    Account, BloodGroup, BloodRequest, DonorProfile, DonorProfileDraft, Error, ErrorCode,
    HealthCondition, HospitalContact, HospitalProfile, HospitalProfileDraft, MatchKind, NextStep,
    Notification, NotificationKind, RequestStats, RequestStatus, Role,
};
use crate::inbound::http::auth::CredentialsRequest;
use crate::inbound::http::donors::AvailabilityRequest;
use crate::inbound::ws::messages::{ClientMessage, FeedMessage};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/auth/{role}/register or /login.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bloodlink backend API",
        description = "Donor and hospital portals for coordinating blood donation requests."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::register,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::current_account,
        crate::inbound::http::donors::get_profile,
        crate::inbound::http::donors::save_profile,
        crate::inbound::http::donors::set_availability,
        crate::inbound::http::donors::list_requests,
        crate::inbound::http::donors::accept_request,
        crate::inbound::http::donors::reject_request,
        crate::inbound::http::hospitals::get_profile,
        crate::inbound::http::hospitals::save_profile,
        crate::inbound::http::hospitals::donor_matches,
        crate::inbound::http::hospitals::create_requests,
        crate::inbound::http::hospitals::list_requests,
        crate::inbound::http::hospitals::mark_donated,
        crate::inbound::http::hospitals::stats,
        crate::inbound::http::notifications::list_notifications,
        crate::inbound::http::notifications::mark_read,
        crate::inbound::ws::ws_entry,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Account,
        AvailabilityRequest,
        BloodGroup,
        BloodRequest,
        ClientMessage,
        CreateBloodRequest,
        CredentialsRequest,
        DonorMatch,
        DonorProfile,
        DonorProfileDraft,
        DonorSummary,
        Error,
        ErrorCode,
        FeedMessage,
        HealthCondition,
        HospitalContact,
        HospitalProfile,
        HospitalProfileDraft,
        HospitalRequest,
        MatchKind,
        NextStep,
        Notification,
        NotificationKind,
        RequestStats,
        RequestStatus,
        Role,
        SignInOutcome,
    )),
    tags(
        (name = "auth", description = "Registration, sign-in and the current session"),
        (name = "donors", description = "Donor profile, availability and request answers"),
        (name = "hospitals", description = "Hospital profile, donor search and requests"),
        (name = "notifications", description = "Per-account notification inbox"),
        (name = "live", description = "WebSocket live feed"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered paths and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[rstest]
    #[case("Error", "code")]
    #[case("Error", "message")]
    #[case("Account", "profileCompleted")]
    #[case("RequestStats", "successRate")]
    #[case("CredentialsRequest", "password")]
    fn schemas_expose_wire_fields(#[case] name: &str, #[case] field: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let schema = schemas.get(name).unwrap_or_else(|| panic!("{name} schema"));

        assert_object_schema_has_field(schema, field);
    }

    #[rstest]
    #[case("DonorSummary")]
    #[case("HospitalRequest")]
    fn roster_schemas_are_registered(#[case] name: &str) {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;

        assert!(schemas.contains_key(name), "missing {name} schema");
    }

    #[rstest]
    #[case("/api/v1/auth/{role}/register")]
    #[case("/api/v1/donors/me/requests/{id}/accept")]
    #[case("/api/v1/hospitals/me/donor-matches")]
    #[case("/api/v1/notifications/{id}/read")]
    #[case("/api/v1/ws")]
    #[case("/health/ready")]
    fn paths_are_registered(#[case] path: &str) {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key(path), "missing {path}");
    }

    #[rstest]
    fn session_cookie_scheme_is_declared() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");

        assert!(components.security_schemes.contains_key("SessionCookie"));
    }
}
