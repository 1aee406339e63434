//! Front-end / back-end affordability screening
//!
//! Screens a mortgage payment against total monthly income using the
//! conventional 28% / 36% debt-to-income thresholds.

/// Front-end ratio ceiling (mortgage payment / total income)
pub const FRONT_END_LIMIT: f64 = 28.0;

/// Back-end ratio ceiling (payment + other debt / total income)
pub const BACK_END_LIMIT: f64 = 36.0;

/// Result of an affordability assessment
#[derive(Debug, Clone, Copy)]
pub struct AffordabilityMetrics {
    pub total_monthly_income: f64,
    /// Mortgage payment as a percentage of total income (infinite at 0 income)
    pub front_end_ratio: f64,
    /// Payment plus monthly expenses as a percentage of total income
    pub back_end_ratio: f64,
    pub front_end_affordable: bool,
    pub back_end_affordable: bool,
    pub affordable: bool,
}

/// Assess affordability from all income sources.
///
/// `monthly_expenses` is assumed to include other debt payments, so the
/// back-end ratio folds it in whole.
pub fn assess(
    monthly_income: f64,
    monthly_expenses: f64,
    monthly_payment: f64,
    rental_income: f64,
    securities_monthly_income: f64,
) -> AffordabilityMetrics {
    let total_monthly_income = monthly_income + rental_income + securities_monthly_income;

    let (front_end_ratio, back_end_ratio) = if total_monthly_income > 0.0 {
        (
            monthly_payment / total_monthly_income * 100.0,
            (monthly_payment + monthly_expenses) / total_monthly_income * 100.0,
        )
    } else {
        (f64::INFINITY, f64::INFINITY)
    };

    let front_end_affordable = front_end_ratio <= FRONT_END_LIMIT;
    let back_end_affordable = back_end_ratio <= BACK_END_LIMIT;

    AffordabilityMetrics {
        total_monthly_income,
        front_end_ratio,
        back_end_ratio,
        front_end_affordable,
        back_end_affordable,
        affordable: front_end_affordable && back_end_affordable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn comfortably_affordable() {
        let metrics = assess(8_000.0, 1_000.0, 1_520.0, 0.0, 0.0);
        assert_relative_eq!(metrics.front_end_ratio, 19.0, epsilon = 0.01);
        assert_relative_eq!(metrics.back_end_ratio, 31.5, epsilon = 0.01);
        assert!(metrics.affordable);
    }

    #[test]
    fn rental_and_securities_income_count() {
        let without = assess(5_000.0, 1_000.0, 1_520.0, 0.0, 0.0);
        let with = assess(5_000.0, 1_000.0, 1_520.0, 1_500.0, 1_000.0);
        assert_eq!(with.total_monthly_income, 7_500.0);
        assert!(with.front_end_ratio < without.front_end_ratio);
    }

    #[test]
    fn front_end_pass_back_end_fail() {
        let metrics = assess(6_000.0, 1_500.0, 1_200.0, 0.0, 0.0);
        assert!(metrics.front_end_affordable);
        assert!(!metrics.back_end_affordable);
        assert!(!metrics.affordable);
    }

    #[test]
    fn zero_income_is_infinitely_unaffordable() {
        let metrics = assess(0.0, 0.0, 1_520.0, 0.0, 0.0);
        assert!(metrics.front_end_ratio.is_infinite());
        assert!(metrics.back_end_ratio.is_infinite());
        assert!(!metrics.affordable);
    }
}
