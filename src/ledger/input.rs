//! Boundary between raw user input and typed ledger records.
//!
//! Parsing failures are `Parse` errors; records that parse but break a rule
//! are `Validation` errors carrying every problem found. Blank numeric
//! fields are read as 0, matching how the ledger has always treated them.

use chrono::{NaiveDate, NaiveTime};

use super::types::{BonusEntry, PlayerEntry, PointAdjustment, Session};
use crate::error::{LedgerError, Result};

/// Parse an ISO 8601 calendar date ("2024-03-01")
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|e| LedgerError::parse("date", s, e))
}

/// Parse a time of day ("19:30" or "19:30:00")
pub fn parse_time(s: &str) -> Result<NaiveTime> {
    let s = s.trim();
    NaiveTime::parse_from_str(s, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
        .map_err(|e| LedgerError::parse("time", s, e))
}

/// Parse a numeric amount. Blank input reads as 0.
pub fn parse_amount(field: &str, s: &str) -> Result<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0.0);
    }
    let value: f64 = s.parse().map_err(|e| LedgerError::parse(field, s, e))?;
    if !value.is_finite() {
        return Err(LedgerError::parse(field, s, "must be a finite number"));
    }
    Ok(value)
}

/// Parse a whole count. Blank input reads as 0.
pub fn parse_count(field: &str, s: &str) -> Result<u32> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(0);
    }
    s.parse().map_err(|e| LedgerError::parse(field, s, e))
}

/// Parse a player spec "nickname:buyin:rebuy:cashout:rank".
///
/// Missing trailing fields read as 0, so "A:10" is a player who bought in
/// for 10 and has no rank yet (which validation then rejects).
pub fn parse_player_spec(spec: &str) -> Result<PlayerEntry> {
    let parts: Vec<&str> = spec.split(':').collect();
    if parts.len() > 5 {
        return Err(LedgerError::parse(
            "player",
            spec,
            "expected nickname:buyin:rebuy:cashout:rank",
        ));
    }
    let field = |i: usize| parts.get(i).copied().unwrap_or("");

    Ok(PlayerEntry {
        nickname: field(0).trim().to_string(),
        buyin: parse_amount("buyin", field(1))?,
        rebuy: parse_count("rebuy", field(2))?,
        cashout: parse_amount("cashout", field(3))?,
        rank: parse_count("rank", field(4))?,
    })
}

/// Parse a bonus spec "nickname:amount:reason". The reason may contain ':'.
pub fn parse_bonus_spec(spec: &str) -> Result<BonusEntry> {
    let mut parts = spec.splitn(3, ':');
    let nickname = parts.next().unwrap_or("").trim().to_string();
    let amount = parse_amount("bonus amount", parts.next().unwrap_or(""))?;
    let reason = parts.next().unwrap_or("").trim().to_string();
    Ok(BonusEntry {
        nickname,
        amount,
        reason,
    })
}

/// Parse one rule-table entry "rank=points" ("1=10")
pub fn parse_rank_points(s: &str) -> Result<(u32, i64)> {
    let (rank, points) = s
        .split_once('=')
        .ok_or_else(|| LedgerError::parse("rank points", s, "expected RANK=POINTS"))?;
    let rank: u32 = rank
        .trim()
        .parse()
        .map_err(|e| LedgerError::parse("rank", rank.trim(), e))?;
    let points: i64 = points
        .trim()
        .parse()
        .map_err(|e| LedgerError::parse("points", points.trim(), e))?;
    Ok((rank, points))
}

fn entry_errors(entry: &PlayerEntry, prefix: &str, errors: &mut Vec<String>) {
    if entry.nickname.trim().is_empty() {
        errors.push(format!("{}nickname is required", prefix));
    }
    for (name, value) in [("buyin", entry.buyin), ("cashout", entry.cashout)] {
        if !value.is_finite() || value < 0.0 {
            errors.push(format!("{}{} must be a non-negative number", prefix, name));
        }
    }
    if entry.rank < 1 {
        errors.push(format!("{}rank must be at least 1", prefix));
    }
}

fn into_result(errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LedgerError::Validation(errors))
    }
}

pub fn validate_entry(entry: &PlayerEntry) -> Result<()> {
    let mut errors = Vec::new();
    entry_errors(entry, "", &mut errors);
    into_result(errors)
}

/// Validate a whole session, reporting problems for every player at once
pub fn validate_session(session: &Session) -> Result<()> {
    let mut errors = Vec::new();

    if session.name.trim().is_empty() {
        errors.push("game name is required".to_string());
    }
    if session.players.is_empty() {
        errors.push("a game needs at least one player".to_string());
    }
    for (i, entry) in session.players.iter().enumerate() {
        let label = if entry.nickname.trim().is_empty() {
            format!("player {}: ", i + 1)
        } else {
            format!("player {} ({}): ", i + 1, entry.nickname)
        };
        entry_errors(entry, &label, &mut errors);
    }
    for (name, value) in [("buyin_cost", session.buyin_cost), ("prize_pool", session.prize_pool)] {
        if let Some(v) = value {
            if !v.is_finite() || v < 0.0 {
                errors.push(format!("{} must be a non-negative number", name));
            }
        }
    }
    for bonus in &session.bonuses {
        if bonus.nickname.trim().is_empty() {
            errors.push("bonus nickname is required".to_string());
        }
    }

    into_result(errors)
}

pub fn validate_adjustment(adjustment: &PointAdjustment) -> Result<()> {
    let mut errors = Vec::new();
    if adjustment.nickname.trim().is_empty() {
        errors.push("nickname is required".to_string());
    }
    if !adjustment.amount.is_finite() {
        errors.push("amount must be a finite number".to_string());
    }
    into_result(errors)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date(" 2024-03-01 ").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
    }

    #[test]
    fn test_parse_date_malformed() {
        for bad in ["03/01/2024", "2024-02-30", "", "yesterday"] {
            let result = parse_date(bad);
            assert!(
                matches!(result, Err(LedgerError::Parse { .. })),
                "expected parse error for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(parse_time("19:30").unwrap(), NaiveTime::from_hms_opt(19, 30, 0).unwrap());
        assert_eq!(parse_time("07:05:09").unwrap(), NaiveTime::from_hms_opt(7, 5, 9).unwrap());
        assert!(parse_time("25:00").is_err());
    }

    #[test]
    fn test_parse_amount_blank_is_zero() {
        assert_eq!(parse_amount("buyin", "").unwrap(), 0.0);
        assert_eq!(parse_amount("buyin", "  ").unwrap(), 0.0);
        assert_eq!(parse_amount("amount", "-2.5").unwrap(), -2.5);
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        let err = parse_amount("cashout", "ten").unwrap_err();
        assert!(err.to_string().starts_with("Invalid cashout 'ten'"));
        assert!(parse_amount("cashout", "inf").is_err());
    }

    #[test]
    fn test_parse_player_spec_full() {
        let entry = parse_player_spec("A:10:1:15:2").unwrap();
        assert_eq!(entry, PlayerEntry::new("A", 10.0, 1, 15.0, 2));
    }

    #[test]
    fn test_parse_player_spec_missing_fields_default_to_zero() {
        let entry = parse_player_spec("A:10::30:1").unwrap();
        assert_eq!(entry.rebuy, 0);
        assert_eq!(entry.cashout, 30.0);

        let entry = parse_player_spec("B:10").unwrap();
        assert_eq!(entry.rebuy, 0);
        assert_eq!(entry.cashout, 0.0);
        assert_eq!(entry.rank, 0);
    }

    #[test]
    fn test_parse_player_spec_errors() {
        assert!(matches!(parse_player_spec("A:x:0:0:1"), Err(LedgerError::Parse { .. })));
        assert!(matches!(parse_player_spec("A:10:-1:0:1"), Err(LedgerError::Parse { .. })));
        assert!(matches!(parse_player_spec("A:1:2:3:4:5"), Err(LedgerError::Parse { .. })));
    }

    #[test]
    fn test_parse_bonus_spec() {
        let bonus = parse_bonus_spec("A:5:high hand: quads").unwrap();
        assert_eq!(bonus.nickname, "A");
        assert_eq!(bonus.amount, 5.0);
        assert_eq!(bonus.reason, "high hand: quads");

        let bonus = parse_bonus_spec("B").unwrap();
        assert_eq!(bonus.amount, 0.0);
        assert!(bonus.reason.is_empty());

        assert!(parse_bonus_spec("C:lots").is_err());
    }

    #[test]
    fn test_parse_rank_points() {
        assert_eq!(parse_rank_points("1=10").unwrap(), (1, 10));
        assert_eq!(parse_rank_points(" 4 = -2 ").unwrap(), (4, -2));
        assert!(parse_rank_points("1:10").is_err());
        assert!(parse_rank_points("first=10").is_err());
    }

    #[test]
    fn test_validate_entry() {
        assert!(validate_entry(&PlayerEntry::new("A", 10.0, 0, 0.0, 1)).is_ok());

        let err = validate_entry(&PlayerEntry::new(" ", -1.0, 0, 0.0, 0)).unwrap_err();
        match err {
            LedgerError::Validation(errors) => {
                assert_eq!(errors.len(), 3);
                assert!(errors[0].contains("nickname"));
                assert!(errors[1].contains("buyin"));
                assert!(errors[2].contains("rank"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_session_collects_all_errors() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let session = Session::new(
            "",
            date,
            vec![
                PlayerEntry::new("A", 10.0, 0, 0.0, 1),
                PlayerEntry::new("B", 10.0, 0, 0.0, 0),
                PlayerEntry::new("", 10.0, 0, 0.0, 3),
            ],
        );
        match validate_session(&session).unwrap_err() {
            LedgerError::Validation(errors) => {
                assert_eq!(errors.len(), 3);
                assert_eq!(errors[0], "game name is required");
                assert_eq!(errors[1], "player 2 (B): rank must be at least 1");
                assert_eq!(errors[2], "player 3: nickname is required");
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_session_requires_players() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let result = validate_session(&Session::new("Empty", date, vec![]));
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_validate_adjustment() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut adj = PointAdjustment {
            nickname: "A".to_string(),
            amount: -5.0,
            reason: String::new(),
            date,
        };
        assert!(validate_adjustment(&adj).is_ok());
        adj.nickname = String::new();
        assert!(validate_adjustment(&adj).is_err());
    }
}
