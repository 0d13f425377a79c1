//! Daily ranking of launches by upvotes.

use crate::types::{DbId, Timestamp};

/// Number of podium places assigned per launch day.
pub const MAX_DAILY_RANKING: i16 = 3;

/// A launch competing for a podium place on its launch day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankCandidate {
    pub launch_id: DbId,
    pub upvote_count: i64,
    pub created_at: Timestamp,
}

/// Order candidates by upvotes (descending), then by submission time, then ID.
pub fn sort_by_votes(candidates: &mut [RankCandidate]) {
    candidates.sort_by(|a, b| {
        b.upvote_count
            .cmp(&a.upvote_count)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.launch_id.cmp(&b.launch_id))
    });
}

/// Assign rankings `1..=MAX_DAILY_RANKING` to the best launches of a day.
///
/// Launches without a single upvote are never ranked.
pub fn assign_daily_rankings(candidates: &[RankCandidate]) -> Vec<(DbId, i16)> {
    let mut sorted = candidates.to_vec();
    sort_by_votes(&mut sorted);
    sorted
        .into_iter()
        .filter(|c| c.upvote_count > 0)
        .zip(1..=MAX_DAILY_RANKING)
        .map(|(c, rank)| (c.launch_id, rank))
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn candidate(id: DbId, votes: i64, minute: u32) -> RankCandidate {
        RankCandidate {
            launch_id: id,
            upvote_count: votes,
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 8, minute, 0).unwrap(),
        }
    }

    #[test]
    fn top_three_by_votes() {
        let ranks = assign_daily_rankings(&[
            candidate(1, 5, 0),
            candidate(2, 12, 0),
            candidate(3, 1, 0),
            candidate(4, 7, 0),
        ]);
        assert_eq!(ranks, vec![(2, 1), (4, 2), (1, 3)]);
    }

    #[test]
    fn ties_go_to_earlier_submission() {
        let ranks = assign_daily_rankings(&[candidate(1, 4, 30), candidate(2, 4, 10)]);
        assert_eq!(ranks, vec![(2, 1), (1, 2)]);
    }

    #[test]
    fn unvoted_launches_are_not_ranked() {
        let ranks = assign_daily_rankings(&[candidate(1, 0, 0), candidate(2, 2, 0)]);
        assert_eq!(ranks, vec![(2, 1)]);
    }

    #[test]
    fn empty_day_has_no_rankings() {
        assert!(assign_daily_rankings(&[]).is_empty());
    }
}
