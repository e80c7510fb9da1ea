//! Category thresholds, one table per model.

use super::assessment::RiskCategory;

/// Framingham: <10 low, 10-20 (inclusive) intermediate, >20 high.
#[must_use]
pub fn framingham(percent: f64) -> RiskCategory {
    if percent < 10.0 {
        RiskCategory::Low
    } else if percent <= 20.0 {
        RiskCategory::Intermediate
    } else {
        RiskCategory::High
    }
}

/// ACC/AHA ASCVD: <5 low, 5-<7.5 borderline, 7.5-<20 intermediate, >=20 high.
#[must_use]
pub fn acc_aha(percent: f64) -> RiskCategory {
    if percent < 5.0 {
        RiskCategory::Low
    } else if percent < 7.5 {
        RiskCategory::Borderline
    } else if percent < 20.0 {
        RiskCategory::Intermediate
    } else {
        RiskCategory::High
    }
}

/// SCORE2 chart colours, used by the table and coefficient tiers.
#[must_use]
pub fn score2_chart(percent: f64) -> RiskCategory {
    if percent < 2.5 {
        RiskCategory::Low
    } else if percent < 7.5 {
        RiskCategory::Moderate
    } else if percent < 15.0 {
        RiskCategory::High
    } else {
        RiskCategory::VeryHigh
    }
}

/// ESC 2021 age-dependent SCORE2 thresholds, used by the approximation tier.
///
/// | age   | high from | very high from |
/// |-------|-----------|----------------|
/// | <50   | 2.5       | 7.5            |
/// | 50-69 | 5         | 10             |
/// | 70+   | 7.5       | 15             |
#[must_use]
pub fn score2_by_age(percent: f64, age: f64) -> RiskCategory {
    let (high, very_high) = if age < 50.0 {
        (2.5, 7.5)
    } else if age < 70.0 {
        (5.0, 10.0)
    } else {
        (7.5, 15.0)
    };

    if percent < high {
        RiskCategory::Low
    } else if percent < very_high {
        RiskCategory::High
    } else {
        RiskCategory::VeryHigh
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framingham_boundaries() {
        assert_eq!(framingham(9.9), RiskCategory::Low);
        assert_eq!(framingham(10.0), RiskCategory::Intermediate);
        assert_eq!(framingham(20.0), RiskCategory::Intermediate);
        assert_eq!(framingham(20.1), RiskCategory::High);
    }

    #[test]
    fn test_acc_aha_boundaries() {
        assert_eq!(acc_aha(4.9), RiskCategory::Low);
        assert_eq!(acc_aha(5.0), RiskCategory::Borderline);
        assert_eq!(acc_aha(7.5), RiskCategory::Intermediate);
        assert_eq!(acc_aha(19.9), RiskCategory::Intermediate);
        assert_eq!(acc_aha(20.0), RiskCategory::High);
    }

    #[test]
    fn test_score2_chart_boundaries() {
        assert_eq!(score2_chart(2.4), RiskCategory::Low);
        assert_eq!(score2_chart(2.5), RiskCategory::Moderate);
        assert_eq!(score2_chart(7.5), RiskCategory::High);
        assert_eq!(score2_chart(15.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_score2_age_dependent_thresholds() {
        assert_eq!(score2_by_age(2.4, 45.0), RiskCategory::Low);
        assert_eq!(score2_by_age(2.5, 45.0), RiskCategory::High);
        assert_eq!(score2_by_age(7.5, 45.0), RiskCategory::VeryHigh);

        assert_eq!(score2_by_age(4.9, 50.0), RiskCategory::Low);
        assert_eq!(score2_by_age(5.0, 60.0), RiskCategory::High);
        assert_eq!(score2_by_age(10.0, 69.0), RiskCategory::VeryHigh);

        assert_eq!(score2_by_age(7.4, 70.0), RiskCategory::Low);
        assert_eq!(score2_by_age(7.5, 75.0), RiskCategory::High);
        assert_eq!(score2_by_age(15.0, 89.0), RiskCategory::VeryHigh);
    }

    #[test]
    fn test_categorization_is_deterministic() {
        for pct in [0.0, 2.5, 7.5, 10.0, 15.0, 20.0, 40.0] {
            assert_eq!(framingham(pct), framingham(pct));
            assert_eq!(score2_by_age(pct, 55.0), score2_by_age(pct, 55.0));
        }
    }
}
