use std::path::{Path, PathBuf};

use super::input::{validate_adjustment, validate_session};
use super::storage::{load_ledger, save_ledger};
use super::types::{LedgerData, PointAdjustment, Session};
use crate::error::{LedgerError, Result};
use crate::scoring::{validate_rules, RankingRules};

/// Handle on the ledger document.
///
/// Backed either by a JSON file or by process memory only. Every mutation
/// validates first, so a rejected record leaves the store untouched.
/// Changes reach disk only on [`Store::save`].
#[derive(Debug, Clone)]
pub struct Store {
    path: Option<PathBuf>,
    data: LedgerData,
}

impl Store {
    /// Open a file-backed store. A missing file starts an empty ledger.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = load_ledger(&path)?;
        Ok(Self {
            path: Some(path),
            data,
        })
    }

    /// Store that lives only in memory; `save` does nothing
    pub fn in_memory(data: LedgerData) -> Self {
        Self { path: None, data }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn data(&self) -> &LedgerData {
        &self.data
    }

    pub fn sessions(&self) -> &[Session] {
        &self.data.games
    }

    pub fn adjustments(&self) -> &[PointAdjustment] {
        &self.data.point_adjustments
    }

    pub fn rules(&self) -> &RankingRules {
        &self.data.ranking_rules
    }

    /// Session at a 0-based position
    pub fn session(&self, position: usize) -> Result<&Session> {
        self.data
            .games
            .get(position)
            .ok_or_else(|| self.missing_session(position))
    }

    pub fn add_session(&mut self, session: Session) -> Result<()> {
        validate_session(&session)?;
        log::debug!(
            "Adding game '{}' on {} with {} players",
            session.name,
            session.date,
            session.players.len()
        );
        self.data.games.push(session);
        Ok(())
    }

    /// Remove the session at a 0-based position and return it
    pub fn remove_session(&mut self, position: usize) -> Result<Session> {
        if position >= self.data.games.len() {
            return Err(self.missing_session(position));
        }
        let removed = self.data.games.remove(position);
        log::debug!("Removed game '{}' ({})", removed.name, removed.date);
        Ok(removed)
    }

    pub fn add_adjustment(&mut self, adjustment: PointAdjustment) -> Result<()> {
        validate_adjustment(&adjustment)?;
        log::debug!(
            "Adding adjustment {:+} for '{}'",
            adjustment.amount,
            adjustment.nickname
        );
        self.data.point_adjustments.push(adjustment);
        Ok(())
    }

    /// Replace the rule set wholesale
    pub fn replace_rules(&mut self, rules: RankingRules) -> Result<()> {
        validate_rules(&rules).map_err(LedgerError::Validation)?;
        self.data.ranking_rules = rules;
        Ok(())
    }

    /// Write the whole document back to its file
    pub fn save(&self) -> Result<()> {
        match &self.path {
            Some(path) => save_ledger(path, &self.data),
            None => {
                log::debug!("In-memory ledger; nothing to save");
                Ok(())
            }
        }
    }

    fn missing_session(&self, position: usize) -> LedgerError {
        LedgerError::NotFound(format!(
            "game #{} (ledger has {} games)",
            position + 1,
            self.data.games.len()
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::PlayerEntry;
    use crate::scoring::{aggregate_ranking, DateRange};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn game(name: &str, players: Vec<PlayerEntry>) -> Session {
        Session::new(name, date(), players)
    }

    #[test]
    fn test_in_memory_add_and_read() {
        let mut store = Store::in_memory(LedgerData::default());
        store
            .add_session(game("one", vec![PlayerEntry::new("A", 10.0, 0, 30.0, 1)]))
            .unwrap();
        assert_eq!(store.sessions().len(), 1);
        assert_eq!(store.session(0).unwrap().name, "one");
        assert!(store.save().is_ok());
        assert!(store.path().is_none());
    }

    #[test]
    fn test_invalid_session_leaves_store_unchanged() {
        let mut store = Store::in_memory(LedgerData::default());
        let before = store.data().clone();
        let result = store.add_session(game("bad", vec![PlayerEntry::new("", 10.0, 0, 0.0, 1)]));
        assert!(matches!(result, Err(LedgerError::Validation(_))));
        assert_eq!(store.data(), &before);
    }

    #[test]
    fn test_invalid_adjustment_leaves_store_unchanged() {
        let mut store = Store::in_memory(LedgerData::default());
        let result = store.add_adjustment(PointAdjustment {
            nickname: "  ".to_string(),
            amount: 3.0,
            reason: String::new(),
            date: date(),
        });
        assert!(result.is_err());
        assert!(store.adjustments().is_empty());
    }

    #[test]
    fn test_remove_session_out_of_range() {
        let mut store = Store::in_memory(LedgerData::default());
        assert!(matches!(store.remove_session(0), Err(LedgerError::NotFound(_))));
        assert!(matches!(store.session(3), Err(LedgerError::NotFound(_))));
    }

    #[test]
    fn test_remove_session_drops_contributions() {
        let mut store = Store::in_memory(LedgerData::default());
        store
            .add_session(game("one", vec![PlayerEntry::new("A", 10.0, 0, 30.0, 1)]))
            .unwrap();
        store
            .add_session(game("two", vec![PlayerEntry::new("B", 10.0, 0, 30.0, 1)]))
            .unwrap();

        let removed = store.remove_session(0).unwrap();
        assert_eq!(removed.name, "one");

        let ranking = aggregate_ranking(
            store.sessions(),
            store.adjustments(),
            store.rules(),
            &DateRange::all(),
        );
        assert_eq!(ranking.points.len(), 1);
        assert_eq!(ranking.points[0].nickname, "B");
    }

    #[test]
    fn test_replace_rules() {
        let mut store = Store::in_memory(LedgerData::default());
        let rules = RankingRules {
            rank_points: BTreeMap::from([(1, 20)]),
            first_buyin: 0,
            participation: 2,
        };
        store.replace_rules(rules.clone()).unwrap();
        assert_eq!(store.rules(), &rules);

        let bad = RankingRules {
            rank_points: BTreeMap::from([(0, 1)]),
            first_buyin: 0,
            participation: 0,
        };
        assert!(store.replace_rules(bad).is_err());
        assert_eq!(store.rules(), &rules);
    }

    #[test]
    fn test_replace_rules_rejects_overflowing_values() {
        let mut store = Store::in_memory(LedgerData::default());
        let huge = RankingRules {
            rank_points: BTreeMap::from([(1, i64::MAX)]),
            first_buyin: 1,
            participation: 1,
        };
        assert!(matches!(store.replace_rules(huge), Err(LedgerError::Validation(_))));
        assert_eq!(store.rules(), &RankingRules::default());
    }

    #[test]
    fn test_file_store_persists_on_save() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data.json");

        let mut store = Store::open(&path).unwrap();
        assert!(store.sessions().is_empty());
        store
            .add_session(game("one", vec![PlayerEntry::new("A", 10.0, 0, 30.0, 1)]))
            .unwrap();
        assert!(!path.exists());
        store.save().unwrap();

        let reopened = Store::open(&path).unwrap();
        assert_eq!(reopened.sessions().len(), 1);
        assert_eq!(reopened.rules(), &RankingRules::default());
    }
}
