use chrono::NaiveDate;
use std::collections::BTreeSet;

use super::rules::RankingRules;
use super::tally::{Standing, Tally};
use crate::error::{LedgerError, Result};
use crate::ledger::types::{PlayerEntry, PointAdjustment, Session};

/// Inclusive calendar-date window. A missing bound is open.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    pub fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Result<Self> {
        if let (Some(s), Some(e)) = (start, end) {
            if s > e {
                return Err(LedgerError::Validation(vec![format!(
                    "date range start {} is after end {}",
                    s, e
                )]));
            }
        }
        Ok(Self { start, end })
    }

    /// Range covering every date
    pub fn all() -> Self {
        Self::default()
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |s| date >= s) && self.end.map_or(true, |e| date <= e)
    }
}

/// Both rankings produced by [`aggregate_ranking`], best first
#[derive(Debug, Clone, PartialEq)]
pub struct Ranking {
    pub points: Vec<Standing<f64>>,
    pub scores: Vec<Standing<i64>>,
}

/// One row of the per-game log
#[derive(Debug, Clone, PartialEq)]
pub struct GameRow {
    pub nickname: String,
    pub rank: u32,
    pub buyin: f64,
    pub rebuy: u32,
    pub cashout: f64,
    pub net: f64,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistorySource {
    Game { name: String, rank: u32 },
    Adjustment { reason: String },
}

/// One row of a player's history: a game appearance or a point adjustment
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub date: NaiveDate,
    pub source: HistorySource,
    pub net: f64,
    pub score: i64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HistoryTotals {
    pub games: usize,
    pub net: f64,
    pub score: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerHistory {
    pub nickname: String,
    pub rows: Vec<HistoryRow>,
    pub totals: HistoryTotals,
}

/// Cash outcome of one participation: cashout minus every stake paid.
/// Negative values are losses.
pub fn compute_net(entry: &PlayerEntry) -> f64 {
    entry.cashout - entry.buyin * (1.0 + entry.rebuy as f64)
}

/// Rule-derived score of one participation. Saturates rather than wrapping
/// for rule values loaded from a hand-edited ledger.
pub fn compute_score(entry: &PlayerEntry, rules: &RankingRules) -> i64 {
    let mut score = rules.points_for_rank(entry.rank);
    if entry.rebuy == 0 {
        score = score.saturating_add(rules.first_buyin);
    }
    score.saturating_add(rules.participation)
}

/// Fold sessions and adjustments inside `range` into point and score rankings.
///
/// Adjustments only move points. Ties keep the order in which nicknames were
/// first seen: sessions in store order, players in entry order, then
/// adjustments.
pub fn aggregate_ranking(
    sessions: &[Session],
    adjustments: &[PointAdjustment],
    rules: &RankingRules,
    range: &DateRange,
) -> Ranking {
    let mut points: Tally<f64> = Tally::new();
    let mut scores: Tally<i64> = Tally::new();

    let included: Vec<&Session> = sessions.iter().filter(|s| range.contains(s.date)).collect();
    for session in &included {
        for entry in &session.players {
            points.add(&entry.nickname, compute_net(entry));
            scores.add(&entry.nickname, compute_score(entry, rules));
        }
    }

    let mut applied = 0;
    for adjustment in adjustments.iter().filter(|a| range.contains(a.date)) {
        points.add(&adjustment.nickname, adjustment.amount);
        applied += 1;
    }

    log::debug!(
        "Ranking over {}/{} sessions and {}/{} adjustments ({} players)",
        included.len(),
        sessions.len(),
        applied,
        adjustments.len(),
        points.len()
    );

    Ranking {
        points: points.into_sorted(),
        scores: scores.into_sorted(),
    }
}

/// Per-player rows for one session, ordered by finishing rank
pub fn per_game_detail(session: &Session, rules: &RankingRules) -> Vec<GameRow> {
    let mut rows: Vec<GameRow> = session
        .players
        .iter()
        .map(|entry| GameRow {
            nickname: entry.nickname.clone(),
            rank: entry.rank,
            buyin: entry.buyin,
            rebuy: entry.rebuy,
            cashout: entry.cashout,
            net: compute_net(entry),
            score: compute_score(entry, rules),
        })
        .collect();
    rows.sort_by_key(|row| row.rank);
    rows
}

/// Every appearance and adjustment for `nickname`, ordered by date, with totals.
///
/// # Errors
///
/// Returns `NotFound` if the nickname appears in no session and no adjustment.
pub fn per_player_history(
    nickname: &str,
    sessions: &[Session],
    adjustments: &[PointAdjustment],
    rules: &RankingRules,
) -> Result<PlayerHistory> {
    let mut rows = Vec::new();

    for session in sessions {
        for entry in session.players.iter().filter(|p| p.nickname == nickname) {
            rows.push(HistoryRow {
                date: session.date,
                source: HistorySource::Game {
                    name: session.name.clone(),
                    rank: entry.rank,
                },
                net: compute_net(entry),
                score: compute_score(entry, rules),
            });
        }
    }

    for adjustment in adjustments.iter().filter(|a| a.nickname == nickname) {
        rows.push(HistoryRow {
            date: adjustment.date,
            source: HistorySource::Adjustment {
                reason: adjustment.reason.clone(),
            },
            net: adjustment.amount,
            score: 0,
        });
    }

    if rows.is_empty() {
        return Err(LedgerError::NotFound(format!("no records for player '{}'", nickname)));
    }

    rows.sort_by_key(|row| row.date);

    let totals = rows.iter().fold(HistoryTotals::default(), |mut acc, row| {
        if matches!(row.source, HistorySource::Game { .. }) {
            acc.games += 1;
        }
        acc.net += row.net;
        acc.score += row.score;
        acc
    });

    Ok(PlayerHistory {
        nickname: nickname.to_string(),
        rows,
        totals,
    })
}

/// Distinct nicknames across all sessions, sorted
pub fn list_players(sessions: &[Session]) -> Vec<String> {
    sessions
        .iter()
        .flat_map(|s| s.players.iter().map(|p| p.nickname.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
