pub mod input;
pub mod storage;
pub mod store;
pub mod types;

pub use input::{
    parse_amount, parse_bonus_spec, parse_count, parse_date, parse_player_spec, parse_rank_points, parse_time,
    validate_adjustment, validate_entry, validate_session,
};
pub use storage::{get_data_path, load_ledger, save_ledger};
pub use store::Store;
pub use types::{BonusEntry, LedgerData, PlayerEntry, PointAdjustment, Session};
