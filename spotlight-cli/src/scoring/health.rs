//! Severity-weighted health score

use crate::models::{ScanSummary, Severity};

/// Sum of severity weights over every counted suggestion
pub fn weighted_penalty(summary: &ScanSummary) -> u64 {
    Severity::all()
        .into_iter()
        .map(|s| summary.count(s) as u64 * u64::from(s.weight()))
        .sum()
}

/// Compute the health score for a summary.
///
/// Deterministic and side-effect free. The result is clamped to 0..=100.
pub fn health_score(summary: &ScanSummary) -> u8 {
    if summary.total_rules == 0 {
        return 100;
    }

    let penalty = weighted_penalty(summary);
    if penalty == 0 {
        return 100;
    }

    let max_penalty = summary.total_rules as f64 * 100.0;
    let ratio = penalty as f64 / max_penalty;
    let score = (100.0 - ratio * 100.0).max(0.0).round();

    score.clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(total: usize, critical: usize, high: usize, medium: usize, low: usize) -> ScanSummary {
        ScanSummary {
            total_rules: total,
            suggestions: critical + high + medium + low,
            passed: total.saturating_sub(critical + high + medium + low),
            critical,
            high,
            medium,
            low,
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_scan_is_perfect() {
        assert_eq!(health_score(&ScanSummary::default()), 100);
    }

    #[test]
    fn test_no_issues_is_perfect() {
        assert_eq!(health_score(&summary(5, 0, 0, 0, 0)), 100);
    }

    #[test]
    fn test_one_critical_in_ten() {
        assert_eq!(health_score(&summary(10, 1, 0, 0, 0)), 90);
    }

    #[test]
    fn test_everything_critical_floors_at_zero() {
        assert_eq!(health_score(&summary(3, 3, 0, 0, 0)), 0);
        // Penalty above the maximum still clamps to zero
        let mut s = summary(1, 1, 0, 0, 0);
        s.high = 4;
        assert_eq!(health_score(&s), 0);
    }

    #[test]
    fn test_mixed_severities_round() {
        // 70 + 40 + 10 = 120 over 700 => 82.857 -> 83
        assert_eq!(health_score(&summary(7, 0, 1, 1, 1)), 83);
        // one low in three => 96.67 -> 97
        assert_eq!(health_score(&summary(3, 0, 0, 0, 1)), 97);
    }

    #[test]
    fn test_errors_do_not_penalize() {
        let mut s = summary(4, 0, 0, 0, 0);
        s.errors = 4;
        s.passed = 0;
        assert_eq!(health_score(&s), 100);
    }

    #[test]
    fn test_adding_a_suggestion_never_raises_the_score() {
        let base = summary(10, 0, 1, 1, 0);
        let before = health_score(&base);
        for severity in Severity::all() {
            let mut s = base.clone();
            match severity {
                Severity::Critical => s.critical += 1,
                Severity::High => s.high += 1,
                Severity::Medium => s.medium += 1,
                Severity::Low => s.low += 1,
            }
            assert!(health_score(&s) <= before, "{severity} raised the score");
        }
    }

    #[test]
    fn test_weighted_penalty() {
        assert_eq!(weighted_penalty(&summary(10, 1, 1, 1, 1)), 220);
    }
}
