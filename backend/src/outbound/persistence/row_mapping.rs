//! Conversions between Diesel rows and domain values.
//!
//! Stored values are re-validated on the way out; a row that no longer
//! satisfies a domain invariant yields a message the repository reports as a
//! query failure.

use crate::domain::{
    Account, AccountId, BloodGroup, BloodRequest, BloodRequestRecord, DonorProfile, EmailAddress,
    HealthCondition, HospitalContact, HospitalProfile, IneligibilityReason, Location,
    Notification, NotificationId, NotificationKind, Pincode, RequestId, RequestStatus, Role,
};

use super::models::{
    AccountRow, BloodRequestRow, DonorProfileRow, HospitalProfileRow, NotificationRow,
};

pub(crate) fn to_db_int(value: u32, field: &str) -> Result<i32, String> {
    i32::try_from(value).map_err(|_| format!("{field} {value} exceeds the storable range"))
}

fn from_db_int(value: i32, field: &str) -> Result<u32, String> {
    u32::try_from(value).map_err(|_| format!("stored {field} {value} is negative"))
}

fn email(value: &str) -> Result<EmailAddress, String> {
    EmailAddress::new(value).map_err(|err| format!("stored email is invalid: {err}"))
}

fn blood_group(value: &str) -> Result<BloodGroup, String> {
    value
        .parse()
        .map_err(|err| format!("stored blood group is invalid: {err}"))
}

fn pincode(value: i32) -> Result<Pincode, String> {
    Pincode::new(from_db_int(value, "pincode")?)
        .map_err(|err| format!("stored pincode is invalid: {err}"))
}

pub(crate) fn account_from_row(row: AccountRow) -> Result<Account, String> {
    Ok(Account {
        id: AccountId::from_uuid(row.id),
        email: email(&row.email)?,
        role: row
            .role
            .parse::<Role>()
            .map_err(|err| format!("stored role is invalid: {err}"))?,
        profile_completed: row.profile_completed,
        created_at: row.created_at,
    })
}

pub(crate) fn account_to_row(account: &Account) -> AccountRow {
    AccountRow {
        id: *account.id.as_uuid(),
        email: account.email.to_string(),
        role: account.role.as_str().to_owned(),
        profile_completed: account.profile_completed,
        created_at: account.created_at,
    }
}

pub(crate) fn donor_profile_to_row(profile: &DonorProfile) -> Result<DonorProfileRow, String> {
    Ok(DonorProfileRow {
        account_id: *profile.account_id.as_uuid(),
        name: profile.name.clone(),
        age: to_db_int(profile.age, "age")?,
        weight_kg: profile.weight_kg,
        phone: profile.phone.clone(),
        city: profile.location.city.clone(),
        state: profile.location.state.clone(),
        country: profile.location.country.clone(),
        pincode: to_db_int(profile.location.pincode.value(), "pincode")?,
        blood_group: profile.blood_group.as_str().to_owned(),
        health_condition: profile.health_condition.label().to_owned(),
        last_donation: profile.last_donation,
        hemoglobin: profile.hemoglobin,
        eligible: profile.eligible,
        available: profile.available,
        eligibility_reasons: profile
            .eligibility_reasons
            .iter()
            .map(|reason| reason.message().to_owned())
            .collect(),
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    })
}

pub(crate) fn donor_profile_from_row(row: DonorProfileRow) -> Result<DonorProfile, String> {
    let eligibility_reasons = row
        .eligibility_reasons
        .into_iter()
        .map(IneligibilityReason::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(DonorProfile {
        account_id: AccountId::from_uuid(row.account_id),
        name: row.name,
        age: from_db_int(row.age, "age")?,
        weight_kg: row.weight_kg,
        phone: row.phone,
        location: Location {
            city: row.city,
            state: row.state,
            country: row.country,
            pincode: pincode(row.pincode)?,
        },
        blood_group: blood_group(&row.blood_group)?,
        health_condition: HealthCondition::from_label(&row.health_condition).ok_or_else(|| {
            format!(
                "stored health condition is invalid: {}",
                row.health_condition
            )
        })?,
        last_donation: row.last_donation,
        hemoglobin: row.hemoglobin,
        eligible: row.eligible,
        available: row.available,
        eligibility_reasons,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(crate) fn hospital_profile_to_row(
    profile: &HospitalProfile,
) -> Result<HospitalProfileRow, String> {
    Ok(HospitalProfileRow {
        account_id: *profile.account_id.as_uuid(),
        hospital_name: profile.hospital_name.clone(),
        phone: profile.phone.clone(),
        email: profile.email.to_string(),
        address: profile.address.clone(),
        city: profile.location.city.clone(),
        state: profile.location.state.clone(),
        country: profile.location.country.clone(),
        pincode: to_db_int(profile.location.pincode.value(), "pincode")?,
        description: profile.description.clone(),
        created_at: profile.created_at,
        updated_at: profile.updated_at,
    })
}

pub(crate) fn hospital_profile_from_row(
    row: HospitalProfileRow,
) -> Result<HospitalProfile, String> {
    Ok(HospitalProfile {
        account_id: AccountId::from_uuid(row.account_id),
        hospital_name: row.hospital_name,
        phone: row.phone,
        email: email(&row.email)?,
        address: row.address,
        location: Location {
            city: row.city,
            state: row.state,
            country: row.country,
            pincode: pincode(row.pincode)?,
        },
        description: row.description,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

pub(crate) fn blood_request_to_row(request: &BloodRequest) -> Result<BloodRequestRow, String> {
    let hospital = request.hospital();
    Ok(BloodRequestRow {
        id: *request.id().as_uuid(),
        hospital_id: *request.hospital_id().as_uuid(),
        donor_id: *request.donor_id().as_uuid(),
        blood_group: request.blood_group().as_str().to_owned(),
        units_required: to_db_int(request.units_required(), "unitsRequired")?,
        hospital_name: hospital.name.clone(),
        hospital_phone: hospital.phone.clone(),
        hospital_email: hospital.email.to_string(),
        hospital_city: hospital.city.clone(),
        hospital_state: hospital.state.clone(),
        hospital_country: hospital.country.clone(),
        hospital_pincode: to_db_int(hospital.pincode.value(), "pincode")?,
        status: request.status().as_str().to_owned(),
        created_at: request.created_at(),
        accepted_at: request.accepted_at(),
        rejected_at: request.rejected_at(),
        donated_at: request.donated_at(),
    })
}

pub(crate) fn blood_request_from_row(row: BloodRequestRow) -> Result<BloodRequest, String> {
    Ok(BloodRequest::restore(BloodRequestRecord {
        id: RequestId::from_uuid(row.id),
        hospital_id: AccountId::from_uuid(row.hospital_id),
        donor_id: AccountId::from_uuid(row.donor_id),
        blood_group: blood_group(&row.blood_group)?,
        units_required: from_db_int(row.units_required, "units_required")?,
        hospital: HospitalContact {
            name: row.hospital_name,
            phone: row.hospital_phone,
            email: email(&row.hospital_email)?,
            city: row.hospital_city,
            state: row.hospital_state,
            country: row.hospital_country,
            pincode: pincode(row.hospital_pincode)?,
        },
        status: row
            .status
            .parse::<RequestStatus>()
            .map_err(|err| format!("stored status is invalid: {err}"))?,
        created_at: row.created_at,
        accepted_at: row.accepted_at,
        rejected_at: row.rejected_at,
        donated_at: row.donated_at,
    }))
}

pub(crate) fn notification_to_row(notification: &Notification) -> Result<NotificationRow, String> {
    Ok(NotificationRow {
        id: *notification.id.as_uuid(),
        recipient_id: *notification.recipient_id.as_uuid(),
        sender_id: notification.sender_id.map(|id| *id.as_uuid()),
        kind: notification.kind.as_str().to_owned(),
        message: notification.message.clone(),
        request_id: notification.request_id.map(|id| *id.as_uuid()),
        blood_group: notification
            .blood_group
            .map(|group| group.as_str().to_owned()),
        units_required: notification
            .units_required
            .map(|units| to_db_int(units, "unitsRequired"))
            .transpose()?,
        read: notification.read,
        created_at: notification.created_at,
    })
}

pub(crate) fn notification_from_row(row: NotificationRow) -> Result<Notification, String> {
    Ok(Notification {
        id: NotificationId::from_uuid(row.id),
        recipient_id: AccountId::from_uuid(row.recipient_id),
        sender_id: row.sender_id.map(AccountId::from_uuid),
        kind: NotificationKind::from_storage(&row.kind)
            .ok_or_else(|| format!("stored notification kind is invalid: {}", row.kind))?,
        message: row.message,
        request_id: row.request_id.map(RequestId::from_uuid),
        blood_group: row.blood_group.as_deref().map(blood_group).transpose()?,
        units_required: row
            .units_required
            .map(|units| from_db_int(units, "units_required"))
            .transpose()?,
        read: row.read,
        created_at: row.created_at,
    })
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use rstest::rstest;

    fn request() -> BloodRequest {
        BloodRequest::pending(
            AccountId::random(),
            AccountId::random(),
            BloodGroup::AbNegative,
            3,
            HospitalContact {
                name: "City General".into(),
                phone: "080-5550100".into(),
                email: EmailAddress::new("desk@citygeneral.org").expect("valid email"),
                city: "Bengaluru".into(),
                state: "Karnataka".into(),
                country: "India".into(),
                pincode: Pincode::new(560_001).expect("valid pincode"),
            },
            Utc::now(),
        )
        .expect("valid request")
    }

    #[rstest]
    fn request_rows_survive_storage() {
        let mut original = request();
        original.accept(Utc::now()).expect("accept");

        let row = blood_request_to_row(&original).expect("to row");
        assert_eq!(row.status, "accepted");
        let restored = blood_request_from_row(row).expect("from row");

        assert_eq!(restored, original);
    }

    #[rstest]
    #[case::status("status", "lost")]
    #[case::group("blood_group", "C+")]
    fn corrupt_request_rows_are_rejected(#[case] column: &str, #[case] value: &str) {
        let mut row = blood_request_to_row(&request()).expect("to row");
        match column {
            "status" => row.status = value.to_owned(),
            _ => row.blood_group = value.to_owned(),
        }

        assert!(blood_request_from_row(row).is_err());
    }

    #[rstest]
    fn negative_stored_counts_are_rejected() {
        let mut row = blood_request_to_row(&request()).expect("to row");
        row.units_required = -1;

        let err = blood_request_from_row(row).expect_err("negative units");
        assert!(err.contains("negative"));
    }

    #[rstest]
    fn notification_kind_is_stored_as_its_tag() {
        let notification = Notification::request_received(&request(), Utc::now());

        let row = notification_to_row(&notification).expect("to row");

        assert_eq!(row.kind, "blood_request");
        assert_eq!(row.blood_group.as_deref(), Some("AB-"));
        assert_eq!(notification_from_row(row).expect("from row"), notification);
    }
}
