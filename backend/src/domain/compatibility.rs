//! Hospital-side blood compatibility matching.
//!
//! Matching is deliberately coarse. For a requested group:
//!
//! - donors of the same group are exact matches (rank 0);
//! - when AB+ is requested every other group qualifies (rank 1);
//! - otherwise O- donors are added (rank 1).
//!
//! A donor group is classified once, so an O- donor answering an O- request
//! is an exact match and never appears twice.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::BloodGroup;

/// Why a donor group qualifies for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// Same group as requested.
    Exact,
    /// The requested group is the universal acceptor.
    UniversalMatch,
    /// The donor belongs to the universal donor group.
    UniversalDonor,
}

impl MatchKind {
    /// Sort key; lower ranks are listed first.
    #[must_use]
    pub const fn rank(self) -> u8 {
        match self {
            Self::Exact => 0,
            Self::UniversalMatch | Self::UniversalDonor => 1,
        }
    }
}

/// Classify a donor group against a requested group.
///
/// # Examples
/// ```
/// use bloodlink::domain::{classify, BloodGroup, MatchKind};
///
/// assert_eq!(classify(BloodGroup::APositive, BloodGroup::ONegative), Some(MatchKind::UniversalDonor));
/// assert_eq!(classify(BloodGroup::APositive, BloodGroup::BPositive), None);
/// ```
#[must_use]
pub fn classify(requested: BloodGroup, donor: BloodGroup) -> Option<MatchKind> {
    if donor == requested {
        Some(MatchKind::Exact)
    } else if requested == BloodGroup::UNIVERSAL_ACCEPTOR {
        Some(MatchKind::UniversalMatch)
    } else if donor == BloodGroup::UNIVERSAL_DONOR {
        Some(MatchKind::UniversalDonor)
    } else {
        None
    }
}

/// Donor groups that qualify for `requested`, best first.
#[must_use]
pub fn compatible_groups(requested: BloodGroup) -> Vec<BloodGroup> {
    let mut groups: Vec<(BloodGroup, MatchKind)> = BloodGroup::ALL
        .into_iter()
        .filter_map(|donor| classify(requested, donor).map(|kind| (donor, kind)))
        .collect();
    groups.sort_by_key(|(_, kind)| kind.rank());
    groups.into_iter().map(|(group, _)| group).collect()
}

/// A candidate paired with its match classification.
#[derive(Debug, Clone, PartialEq)]
pub struct Ranked<T> {
    /// The matched candidate.
    pub candidate: T,
    /// How the candidate matched.
    pub kind: MatchKind,
}

/// Keep the candidates whose group qualifies for `requested` and order them
/// by rank. The sort is stable, so candidates of equal rank keep their input
/// order.
pub fn rank_candidates<T, F>(requested: BloodGroup, candidates: Vec<T>, group_of: F) -> Vec<Ranked<T>>
where
    F: Fn(&T) -> BloodGroup,
{
    let mut ranked: Vec<Ranked<T>> = candidates
        .into_iter()
        .filter_map(|candidate| {
            classify(requested, group_of(&candidate)).map(|kind| Ranked { candidate, kind })
        })
        .collect();
    ranked.sort_by_key(|entry| entry.kind.rank());
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn universal_acceptor_matches_every_group() {
        let groups = compatible_groups(BloodGroup::AbPositive);
        assert_eq!(groups.len(), BloodGroup::ALL.len());
        assert_eq!(groups.first(), Some(&BloodGroup::AbPositive));
    }

    #[rstest]
    #[case(BloodGroup::APositive, vec![BloodGroup::APositive, BloodGroup::ONegative])]
    #[case(BloodGroup::BNegative, vec![BloodGroup::BNegative, BloodGroup::ONegative])]
    #[case(BloodGroup::ONegative, vec![BloodGroup::ONegative])]
    fn other_groups_add_only_the_universal_donor(
        #[case] requested: BloodGroup,
        #[case] expected: Vec<BloodGroup>,
    ) {
        assert_eq!(compatible_groups(requested), expected);
    }

    #[rstest]
    fn exact_matches_rank_before_universal_donors() {
        let donors = vec![
            ("olu", BloodGroup::ONegative),
            ("ana", BloodGroup::APositive),
            ("ben", BloodGroup::BPositive),
            ("ada", BloodGroup::APositive),
        ];
        let ranked = rank_candidates(BloodGroup::APositive, donors, |(_, group)| *group);
        let names: Vec<&str> = ranked.iter().map(|entry| entry.candidate.0).collect();
        assert_eq!(names, vec!["ana", "ada", "olu"]);
        assert_eq!(ranked.last().map(|entry| entry.kind), Some(MatchKind::UniversalDonor));
    }

    #[rstest]
    fn universal_donor_is_not_duplicated_for_its_own_group() {
        let donors = vec![("olu", BloodGroup::ONegative)];
        let ranked = rank_candidates(BloodGroup::ONegative, donors, |(_, group)| *group);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked.first().map(|entry| entry.kind), Some(MatchKind::Exact));
    }

    #[rstest]
    fn universal_match_is_tagged_for_ab_positive_requests() {
        assert_eq!(
            classify(BloodGroup::AbPositive, BloodGroup::BNegative),
            Some(MatchKind::UniversalMatch)
        );
        assert_eq!(
            classify(BloodGroup::AbPositive, BloodGroup::ONegative),
            Some(MatchKind::UniversalMatch)
        );
    }
}
