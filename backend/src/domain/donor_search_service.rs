//! Hospital-side donor search.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::port_error_mapping::map_donor_profile_error;
use crate::domain::ports::{DonorMatch, DonorProfileRepository, DonorSearchQuery};
use crate::domain::{BloodGroup, DonorProfile, Error, compatible_groups, rank_candidates};

/// Load searchable donors for `requested` and rank them by match kind.
pub(crate) async fn ranked_matches<D>(
    profiles: &D,
    requested: BloodGroup,
) -> Result<Vec<DonorMatch>, Error>
where
    D: DonorProfileRepository + ?Sized,
{
    let candidates: Vec<DonorProfile> = profiles
        .search(&compatible_groups(requested))
        .await
        .map_err(map_donor_profile_error)?
        .into_iter()
        .filter(DonorProfile::is_searchable)
        .collect();

    Ok(
        rank_candidates(requested, candidates, |profile| profile.blood_group)
            .into_iter()
            .map(|ranked| DonorMatch {
                donor: ranked.candidate,
                match_kind: ranked.kind,
            })
            .collect(),
    )
}

/// Donor search service implementing [`DonorSearchQuery`].
#[derive(Clone)]
pub struct DonorSearchService<D> {
    profiles: Arc<D>,
}

impl<D> DonorSearchService<D> {
    /// Create a new service over the donor profile store.
    pub fn new(profiles: Arc<D>) -> Self {
        Self { profiles }
    }
}

#[async_trait]
impl<D> DonorSearchQuery for DonorSearchService<D>
where
    D: DonorProfileRepository,
{
    async fn find_matches(&self, requested: BloodGroup) -> Result<Vec<DonorMatch>, Error> {
        ranked_matches(self.profiles.as_ref(), requested).await
    }
}
