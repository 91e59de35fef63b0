use super::rules::RankingRules;

/// Largest magnitude any single rule value may have. Keeps every score sum
/// far from `i64` overflow.
pub const MAX_RULE_POINTS: i64 = 1_000_000;

const RULE_POINTS_RANGE: std::ops::RangeInclusive<i64> = -MAX_RULE_POINTS..=MAX_RULE_POINTS;

/// Validate a rule set before it replaces the stored one.
/// Returns all validation errors at once (not just the first).
pub fn validate_rules(rules: &RankingRules) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if rules.rank_points.contains_key(&0) {
        errors.push("ranking_rules.rank_points: rank 0 is not a finishing rank (ranks start at 1)".to_string());
    }

    for (rank, points) in &rules.rank_points {
        if !RULE_POINTS_RANGE.contains(points) {
            errors.push(format!(
                "ranking_rules.rank_points.{}: {} is outside -{max}..={max}",
                rank,
                points,
                max = MAX_RULE_POINTS
            ));
        }
    }

    for (name, value) in [("first_buyin", rules.first_buyin), ("participation", rules.participation)] {
        if !RULE_POINTS_RANGE.contains(&value) {
            errors.push(format!(
                "ranking_rules.{}: {} is outside -{max}..={max}",
                name,
                value,
                max = MAX_RULE_POINTS
            ));
        }
    }

    if rules.rank_points.is_empty() {
        // Allowed: every participation then earns only the flat bonuses
        log::warn!("ranking_rules.rank_points is empty; finishing ranks will not score");
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_valid_rules() {
        assert!(validate_rules(&RankingRules::default()).is_ok());
    }

    #[test]
    fn test_empty_rank_table_is_allowed() {
        let rules = RankingRules {
            rank_points: BTreeMap::new(),
            first_buyin: 1,
            participation: 1,
        };
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn test_negative_values_are_allowed() {
        let rules = RankingRules {
            rank_points: BTreeMap::from([(1, 5), (6, -2)]),
            first_buyin: -1,
            participation: 0,
        };
        assert!(validate_rules(&rules).is_ok());
    }

    #[test]
    fn test_rank_zero_rejected() {
        let rules = RankingRules {
            rank_points: BTreeMap::from([(0, 5)]),
            first_buyin: 0,
            participation: 0,
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("rank 0"));
    }

    #[test]
    fn test_out_of_range_values_rejected() {
        let rules = RankingRules {
            rank_points: BTreeMap::from([(1, i64::MAX), (2, 6), (3, -MAX_RULE_POINTS - 1)]),
            first_buyin: 1,
            participation: i64::MIN,
        };
        let errors = validate_rules(&rules).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors[0].starts_with("ranking_rules.rank_points.1:"));
        assert!(errors[1].starts_with("ranking_rules.rank_points.3:"));
        assert!(errors[2].starts_with("ranking_rules.participation:"));
    }

    #[test]
    fn test_boundary_values_allowed() {
        let rules = RankingRules {
            rank_points: BTreeMap::from([(1, MAX_RULE_POINTS)]),
            first_buyin: -MAX_RULE_POINTS,
            participation: MAX_RULE_POINTS,
        };
        assert!(validate_rules(&rules).is_ok());
    }
}
