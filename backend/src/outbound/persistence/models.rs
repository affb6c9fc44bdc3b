//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. They exist solely to satisfy Diesel's
//! type requirements for queries and mutations.

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{
    accounts, blood_requests, donor_profiles, hospital_profiles, identities, notifications,
};

// ---------------------------------------------------------------------------
// Identity and account models
// ---------------------------------------------------------------------------

/// Row struct for verifying identities.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = identities)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IdentityRow {
    pub id: Uuid,
    pub password_hash: String,
}

/// Insertable struct for creating identities.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = identities)]
pub(crate) struct NewIdentityRow<'a> {
    pub id: Uuid,
    pub email: &'a str,
    pub password_hash: &'a str,
}

/// Row struct for the accounts table, used for reads and inserts.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = accounts)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct AccountRow {
    pub id: Uuid,
    pub email: String,
    pub role: String,
    pub profile_completed: bool,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Profile models
// ---------------------------------------------------------------------------

/// Row struct for the donor_profiles table.
///
/// Doubles as the upsert changeset; `None` clears nullable columns.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = donor_profiles)]
#[diesel(primary_key(account_id))]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct DonorProfileRow {
    pub account_id: Uuid,
    pub name: String,
    pub age: i32,
    pub weight_kg: f64,
    pub phone: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: i32,
    pub blood_group: String,
    pub health_condition: String,
    pub last_donation: Option<NaiveDate>,
    pub hemoglobin: Option<f64>,
    pub eligible: bool,
    pub available: bool,
    pub eligibility_reasons: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Row struct for the hospital_profiles table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable, AsChangeset)]
#[diesel(table_name = hospital_profiles)]
#[diesel(primary_key(account_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct HospitalProfileRow {
    pub account_id: Uuid,
    pub hospital_name: String,
    pub phone: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: i32,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Blood request and notification models
// ---------------------------------------------------------------------------

/// Row struct for the blood_requests table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = blood_requests)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct BloodRequestRow {
    pub id: Uuid,
    pub hospital_id: Uuid,
    pub donor_id: Uuid,
    pub blood_group: String,
    pub units_required: i32,
    pub hospital_name: String,
    pub hospital_phone: String,
    pub hospital_email: String,
    pub hospital_city: String,
    pub hospital_state: String,
    pub hospital_country: String,
    pub hospital_pincode: i32,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub donated_at: Option<DateTime<Utc>>,
}

/// Changeset applied by a status transition.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = blood_requests)]
#[diesel(treat_none_as_null = true)]
pub(crate) struct BloodRequestStatusUpdate<'a> {
    pub status: &'a str,
    pub accepted_at: Option<DateTime<Utc>>,
    pub rejected_at: Option<DateTime<Utc>>,
    pub donated_at: Option<DateTime<Utc>>,
}

/// Row struct for the notifications table.
#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = notifications)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct NotificationRow {
    pub id: Uuid,
    pub recipient_id: Uuid,
    pub sender_id: Option<Uuid>,
    pub kind: String,
    pub message: String,
    pub request_id: Option<Uuid>,
    pub blood_group: Option<String>,
    pub units_required: Option<i32>,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}
