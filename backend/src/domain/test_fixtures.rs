//! Shared fixtures for domain service unit tests.

use std::sync::Arc;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

use crate::domain::{
    Account, AccountId, BloodGroup, BloodRequest, Credentials, DonorProfile, DonorProfileDraft,
    EmailAddress, HealthCondition, HospitalProfile, HospitalProfileDraft, Location, Pincode, Role,
};

pub(crate) fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 6, 15, 10, 30, 0)
        .single()
        .expect("valid fixture timestamp")
}

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

pub(crate) fn fixture_clock() -> Arc<dyn Clock> {
    Arc::new(FixtureClock {
        utc_now: fixture_timestamp(),
    })
}

pub(crate) fn credentials(email: &str) -> Credentials {
    Credentials::try_from_parts(email, "hunter22").expect("valid credentials")
}

pub(crate) fn account(email: &str, role: Role, profile_completed: bool) -> Account {
    let mut account = Account::register(
        AccountId::random(),
        EmailAddress::new(email).expect("valid email"),
        role,
        fixture_timestamp(),
    );
    account.profile_completed = profile_completed;
    account
}

pub(crate) fn location() -> Location {
    Location {
        city: "Bengaluru".into(),
        state: "Karnataka".into(),
        country: "India".into(),
        pincode: Pincode::new(560_001).expect("valid pincode"),
    }
}

pub(crate) fn donor_draft(blood_group: BloodGroup) -> DonorProfileDraft {
    DonorProfileDraft {
        name: "Asha Rao".into(),
        age: 29,
        weight_kg: 61.5,
        phone: "9876543210".into(),
        location: location(),
        blood_group,
        health_condition: HealthCondition::GenerallyHealthy,
        last_donation: None,
        hemoglobin: None,
    }
}

pub(crate) fn donor_profile(blood_group: BloodGroup) -> DonorProfile {
    DonorProfile::from_draft(
        AccountId::random(),
        donor_draft(blood_group),
        None,
        fixture_timestamp(),
    )
    .expect("valid donor profile")
}

pub(crate) fn hospital_draft() -> HospitalProfileDraft {
    HospitalProfileDraft {
        hospital_name: "City General".into(),
        phone: "080-5550100".into(),
        address: "12 MG Road".into(),
        location: location(),
        description: String::new(),
    }
}

pub(crate) fn hospital_profile(account_id: AccountId) -> HospitalProfile {
    HospitalProfile::from_draft(
        account_id,
        EmailAddress::new("desk@citygeneral.org").expect("valid email"),
        hospital_draft(),
        None,
        fixture_timestamp(),
    )
    .expect("valid hospital profile")
}

pub(crate) fn pending_request(hospital_id: AccountId, donor_id: AccountId) -> BloodRequest {
    BloodRequest::pending(
        hospital_id,
        donor_id,
        BloodGroup::APositive,
        2,
        hospital_profile(hospital_id).contact(),
        fixture_timestamp(),
    )
    .expect("valid request")
}
