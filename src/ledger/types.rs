use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::scoring::RankingRules;

/// Full persisted ledger document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct LedgerData {
    #[serde(default)]
    pub games: Vec<Session>,
    #[serde(default)]
    pub ranking_rules: RankingRules,
    #[serde(default)]
    pub point_adjustments: Vec<PointAdjustment>,
}

/// One recorded game session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    #[serde(default)]
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub players: Vec<PlayerEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buyin_cost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prize_pool: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bonuses: Vec<BonusEntry>,
}

impl Session {
    pub fn new(name: impl Into<String>, date: NaiveDate, players: Vec<PlayerEntry>) -> Self {
        Self {
            name: name.into(),
            date,
            players,
            open_time: None,
            buyin_cost: None,
            prize_pool: None,
            bonuses: Vec::new(),
        }
    }

    /// Menu label for a session at a 0-based position: "1. Friday Game (2024-03-01)"
    pub fn label(&self, position: usize) -> String {
        format!("{}. {} ({})", position + 1, self.name, self.date)
    }

    pub fn has_player(&self, nickname: &str) -> bool {
        self.players.iter().any(|p| p.nickname == nickname)
    }
}

/// One player's participation in a session.
///
/// Numeric fields missing from a stored document load as 0. `rank` and
/// `rebuy` also accept integral floats and numeric strings, which older
/// ledger files contain.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlayerEntry {
    pub nickname: String,
    #[serde(default)]
    pub buyin: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub rebuy: u32,
    #[serde(default)]
    pub cashout: f64,
    #[serde(default, deserialize_with = "lenient_count")]
    pub rank: u32,
}

impl PlayerEntry {
    pub fn new(nickname: impl Into<String>, buyin: f64, rebuy: u32, cashout: f64, rank: u32) -> Self {
        Self {
            nickname: nickname.into(),
            buyin,
            rebuy,
            cashout,
            rank,
        }
    }
}

/// Extra award recorded against a session. Shown in the game log only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BonusEntry {
    pub nickname: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
}

/// Manual correction to a player's point total
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PointAdjustment {
    pub nickname: String,
    #[serde(default, alias = "point")]
    pub amount: f64,
    #[serde(default)]
    pub reason: String,
    pub date: NaiveDate,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCount {
    Int(u64),
    Float(f64),
    Text(String),
}

fn lenient_count<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    let raw = RawCount::deserialize(deserializer)?;
    let value = match raw {
        RawCount::Int(n) => n,
        RawCount::Float(f) if f >= 0.0 && f.fract() == 0.0 => f as u64,
        RawCount::Float(f) => return Err(D::Error::custom(format!("expected a whole count, got {}", f))),
        RawCount::Text(s) if s.trim().is_empty() => 0,
        RawCount::Text(s) => s
            .trim()
            .parse::<u64>()
            .map_err(|e| D::Error::custom(format!("invalid count '{}': {}", s, e)))?,
    };
    u32::try_from(value).map_err(|_| D::Error::custom(format!("count {} is too large", value)))
}
