use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Ranking rule set.
///
/// Decides how many score points a single participation earns. Points for a
/// finishing rank come from `rank_points`; ranks without an entry earn 0 so
/// that new ranks can appear in results before the table is extended.
///
/// Example JSON (as stored in the ledger document):
/// ```json
/// "ranking_rules": {
///   "rank_points": { "1": 10, "2": 6, "3": 3 },
///   "first_buyin": 1,
///   "participation": 1
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct RankingRules {
    /// Score per finishing rank (1 = best)
    #[serde(default)]
    pub rank_points: BTreeMap<u32, i64>,

    /// Bonus for finishing a session without any rebuy
    #[serde(default)]
    pub first_buyin: i64,

    /// Bonus awarded for every participation
    #[serde(default)]
    pub participation: i64,
}

impl Default for RankingRules {
    fn default() -> Self {
        Self {
            rank_points: BTreeMap::from([(1, 10), (2, 6), (3, 3)]),
            first_buyin: 1,
            participation: 1,
        }
    }
}

impl RankingRules {
    /// Score for a finishing rank. Ranks missing from the table score 0.
    pub fn points_for_rank(&self, rank: u32) -> i64 {
        self.rank_points.get(&rank).copied().unwrap_or(0)
    }

    /// True when every configured value is non-negative
    pub fn is_non_negative(&self) -> bool {
        self.first_buyin >= 0
            && self.participation >= 0
            && self.rank_points.values().all(|v| *v >= 0)
    }
}
