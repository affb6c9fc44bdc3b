//! Donor and hospital profiles.

use async_trait::async_trait;

use crate::domain::ports::{
    DonorProfileRepository, DonorProfileRepositoryError, HospitalProfileRepository,
    HospitalProfileRepositoryError,
};
use crate::domain::{AccountId, BloodGroup, DonorProfile, HospitalProfile};

use super::InMemoryStore;

#[async_trait]
impl DonorProfileRepository for InMemoryStore {
    async fn upsert(&self, profile: &DonorProfile) -> Result<(), DonorProfileRepositoryError> {
        let mut state = self.write().map_err(DonorProfileRepositoryError::query)?;
        state.donors.insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<DonorProfile>, DonorProfileRepositoryError> {
        let state = self.read().map_err(DonorProfileRepositoryError::query)?;
        Ok(state.donors.get(account_id).cloned())
    }

    async fn search(
        &self,
        groups: &[BloodGroup],
    ) -> Result<Vec<DonorProfile>, DonorProfileRepositoryError> {
        let state = self.read().map_err(DonorProfileRepositoryError::query)?;
        let mut found: Vec<DonorProfile> = state
            .donors
            .values()
            .filter(|profile| profile.is_searchable() && groups.contains(&profile.blood_group))
            .cloned()
            .collect();
        found.sort_by_key(|profile| (profile.created_at, profile.account_id));
        Ok(found)
    }
}

#[async_trait]
impl HospitalProfileRepository for InMemoryStore {
    async fn upsert(
        &self,
        profile: &HospitalProfile,
    ) -> Result<(), HospitalProfileRepositoryError> {
        let mut state = self
            .write()
            .map_err(HospitalProfileRepositoryError::query)?;
        state.hospitals.insert(profile.account_id, profile.clone());
        Ok(())
    }

    async fn find(
        &self,
        account_id: &AccountId,
    ) -> Result<Option<HospitalProfile>, HospitalProfileRepositoryError> {
        let state = self.read().map_err(HospitalProfileRepositoryError::query)?;
        Ok(state.hospitals.get(account_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::domain::{DonorProfileDraft, HealthCondition, Location, Pincode};

    fn profile(group: BloodGroup, minutes: i64, condition: HealthCondition) -> DonorProfile {
        let base = Utc
            .with_ymd_and_hms(2026, 6, 15, 10, 30, 0)
            .single()
            .expect("valid timestamp");
        let now = base + Duration::minutes(minutes);
        DonorProfile::from_draft(
            AccountId::random(),
            DonorProfileDraft {
                name: "Asha".into(),
                age: 30,
                weight_kg: 60.0,
                phone: "9000000000".into(),
                location: Location {
                    city: "Pune".into(),
                    state: "Maharashtra".into(),
                    country: "India".into(),
                    pincode: Pincode::new(411_001).expect("valid pincode"),
                },
                blood_group: group,
                health_condition: condition,
                last_donation: None,
                hemoglobin: None,
            },
            None,
            now,
        )
        .expect("valid profile")
    }

    #[tokio::test]
    async fn search_returns_searchable_donors_oldest_first() {
        let store = InMemoryStore::new();
        let newer = profile(BloodGroup::APositive, 5, HealthCondition::GenerallyHealthy);
        let older = profile(BloodGroup::ONegative, 0, HealthCondition::MinorIllness);
        let ineligible = profile(BloodGroup::APositive, 1, HealthCondition::RecentSurgery);
        let other_group = profile(BloodGroup::BPositive, 2, HealthCondition::GenerallyHealthy);
        for donor in [&newer, &older, &ineligible, &other_group] {
            DonorProfileRepository::upsert(&store, donor)
                .await
                .expect("upsert");
        }

        let found = store
            .search(&[BloodGroup::APositive, BloodGroup::ONegative])
            .await
            .expect("search");

        let ids: Vec<AccountId> = found.iter().map(|p| p.account_id).collect();
        assert_eq!(ids, vec![older.account_id, newer.account_id]);
    }

    #[tokio::test]
    async fn upsert_replaces_the_stored_profile() {
        let store = InMemoryStore::new();
        let mut donor = profile(BloodGroup::APositive, 0, HealthCondition::GenerallyHealthy);
        DonorProfileRepository::upsert(&store, &donor)
            .await
            .expect("insert");
        donor.available = false;
        DonorProfileRepository::upsert(&store, &donor)
            .await
            .expect("replace");

        let stored = DonorProfileRepository::find(&store, &donor.account_id)
            .await
            .expect("find")
            .expect("present");
        assert!(!stored.available);
        assert!(
            store
                .search(&[BloodGroup::APositive])
                .await
                .expect("search")
                .is_empty()
        );
    }
}
