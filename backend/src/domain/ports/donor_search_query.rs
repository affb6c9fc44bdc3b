//! Driving port for the hospital donor search.

use async_trait::async_trait;
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{BloodGroup, DonorProfile, Error, MatchKind};

/// Searchable donor with the reason it matched.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DonorMatch {
    /// Matched donor profile.
    #[serde(flatten)]
    pub donor: DonorProfile,
    /// How the donor's group relates to the requested group.
    pub match_kind: MatchKind,
}

/// Port for finding donors compatible with a requested group.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DonorSearchQuery: Send + Sync {
    /// Eligible, available donors for `requested`, exact matches first.
    async fn find_matches(&self, requested: BloodGroup) -> Result<Vec<DonorMatch>, Error>;
}
