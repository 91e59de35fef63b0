pub mod engine;
pub mod rules;
pub mod tally;
pub mod validation;

pub use engine::{
    aggregate_ranking, compute_net, compute_score, list_players, per_game_detail,
    per_player_history, DateRange, GameRow, HistoryRow, HistorySource, HistoryTotals,
    PlayerHistory, Ranking,
};
pub use rules::RankingRules;
pub use tally::{Standing, Tally, Total};
pub use validation::{validate_rules, MAX_RULE_POINTS};
