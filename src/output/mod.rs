pub mod export;
pub mod formatter;

pub use export::{export_ranking, write_standings_csv};
pub use formatter::{
    format_adjustments, format_amount, format_game_detail, format_game_list,
    format_player_history, format_point_ranking, format_points, format_rules,
    format_score_ranking, format_standings_tsv, should_use_colors,
};
