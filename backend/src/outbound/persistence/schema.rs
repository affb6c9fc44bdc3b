//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//!
//! # Maintenance
//!
//! When migrations change the schema, this file should be regenerated or
//! manually updated to reflect those changes. The `diesel print-schema`
//! command can generate these definitions from a live database.

diesel::table! {
    /// Sign-in identities with Argon2id password hashes.
    identities (id) {
        /// Primary key shared with the account.
        id -> Uuid,
        /// Normalised email; unique.
        email -> Text,
        /// `hex(salt)$hex(digest)`.
        password_hash -> Text,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Registered accounts, one role each.
    accounts (id) {
        /// Primary key: identity identifier.
        id -> Uuid,
        /// Normalised email; unique across both roles.
        email -> Text,
        /// `donor` or `hospital`.
        role -> Text,
        /// Set once the role profile is saved.
        profile_completed -> Bool,
        /// Registration timestamp.
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Donor profiles with their last eligibility evaluation.
    donor_profiles (account_id) {
        account_id -> Uuid,
        name -> Text,
        age -> Int4,
        weight_kg -> Float8,
        phone -> Text,
        city -> Text,
        state -> Text,
        country -> Text,
        pincode -> Int4,
        blood_group -> Text,
        health_condition -> Text,
        last_donation -> Nullable<Date>,
        hemoglobin -> Nullable<Float8>,
        eligible -> Bool,
        available -> Bool,
        eligibility_reasons -> Array<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Hospital profiles.
    hospital_profiles (account_id) {
        account_id -> Uuid,
        hospital_name -> Text,
        phone -> Text,
        email -> Text,
        address -> Text,
        city -> Text,
        state -> Text,
        country -> Text,
        pincode -> Int4,
        description -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// One request per hospital and addressed donor.
    ///
    /// Hospital contact columns are copied at creation time.
    blood_requests (id) {
        id -> Uuid,
        hospital_id -> Uuid,
        donor_id -> Uuid,
        blood_group -> Text,
        units_required -> Int4,
        hospital_name -> Text,
        hospital_phone -> Text,
        hospital_email -> Text,
        hospital_city -> Text,
        hospital_state -> Text,
        hospital_country -> Text,
        hospital_pincode -> Int4,
        /// `pending`, `accepted`, `rejected` or `donated`.
        status -> Text,
        created_at -> Timestamptz,
        accepted_at -> Nullable<Timestamptz>,
        rejected_at -> Nullable<Timestamptz>,
        donated_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    /// Notifications addressed to one account.
    notifications (id) {
        id -> Uuid,
        recipient_id -> Uuid,
        sender_id -> Nullable<Uuid>,
        kind -> Text,
        message -> Text,
        request_id -> Nullable<Uuid>,
        blood_group -> Nullable<Text>,
        units_required -> Nullable<Int4>,
        read -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(donor_profiles -> accounts (account_id));
diesel::joinable!(hospital_profiles -> accounts (account_id));
diesel::joinable!(notifications -> blood_requests (request_id));

diesel::allow_tables_to_appear_in_same_query!(
    identities,
    accounts,
    donor_profiles,
    hospital_profiles,
    blood_requests,
    notifications,
);
