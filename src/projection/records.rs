//! Projection output structures
//!
//! One [`MonthlyRecord`] per month, month 0 included as the initial state.
//! Shared columns are projection-wide; the five strategy columns live in a
//! fixed array indexed by [`Strategy`].

use serde::{Deserialize, Serialize};

use super::strategy::Strategy;

/// Per-strategy values for one month
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct StrategySnapshot {
    pub remaining_balance: f64,
    pub securities_value: f64,
    pub savings_value: f64,
    pub net_worth: f64,
    /// Net cash movement for the month (leftover plus savings interest)
    pub monthly_cashflow: f64,
    /// Cumulative tax paid through this month
    pub tax_paid: f64,
}

/// One row of projection output covering all five strategies
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonthlyRecord {
    pub month: u32,

    // Shared columns
    pub property_value: f64,
    pub existing_house_value: f64,
    pub inflation_multiplier: f64,
    pub adjusted_income: f64,
    pub adjusted_expenses: f64,
    pub adjusted_rent: f64,
    /// Nominal quarterly dividend recognized this month (0 off-quarter)
    pub dividend_paid: f64,

    /// Strategy columns in [`Strategy::ALL`] order
    pub strategies: [StrategySnapshot; 5],
}

impl MonthlyRecord {
    pub fn strategy(&self, strategy: Strategy) -> &StrategySnapshot {
        &self.strategies[strategy.index()]
    }
}

/// Complete projection result: ordered records for months 0..=term
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionResult {
    pub records: Vec<MonthlyRecord>,
}

impl ProjectionResult {
    pub fn new(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
        }
    }

    pub fn add_row(&mut self, record: MonthlyRecord) {
        self.records.push(record);
    }

    fn last(&self) -> Option<&MonthlyRecord> {
        self.records.last()
    }

    /// Ending net worth for a strategy (0 for an empty projection)
    pub fn final_net_worth(&self, strategy: Strategy) -> f64 {
        self.last()
            .map(|r| r.strategy(strategy).net_worth)
            .unwrap_or(0.0)
    }

    /// Total tax a strategy paid across the run
    pub fn total_tax_paid(&self, strategy: Strategy) -> f64 {
        self.last()
            .map(|r| r.strategy(strategy).tax_paid)
            .unwrap_or(0.0)
    }

    /// The strategy with the highest ending net worth, with that value
    pub fn best_strategy(&self) -> (Strategy, f64) {
        let mut best = (Strategy::Income, self.final_net_worth(Strategy::Income));
        for strategy in Strategy::ALL.into_iter().skip(1) {
            let net_worth = self.final_net_worth(strategy);
            if net_worth > best.1 {
                best = (strategy, net_worth);
            }
        }
        best
    }

    pub fn summary(&self) -> ProjectionSummary {
        let (best_strategy, best_net_worth) = self.best_strategy();
        ProjectionSummary {
            total_months: self.records.len().saturating_sub(1) as u32,
            final_net_worth: Strategy::ALL.map(|s| self.final_net_worth(s)),
            total_tax_paid: Strategy::ALL.map(|s| self.total_tax_paid(s)),
            best_strategy,
            best_net_worth,
        }
    }
}

/// Summary statistics for a projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionSummary {
    pub total_months: u32,
    /// Ending net worth per strategy, [`Strategy::ALL`] order
    pub final_net_worth: [f64; 5],
    /// Total tax paid per strategy, [`Strategy::ALL`] order
    pub total_tax_paid: [f64; 5],
    pub best_strategy: Strategy,
    pub best_net_worth: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_net_worths(month: u32, net_worths: [f64; 5]) -> MonthlyRecord {
        let mut strategies = [StrategySnapshot::default(); 5];
        for (snapshot, nw) in strategies.iter_mut().zip(net_worths) {
            snapshot.net_worth = nw;
        }
        MonthlyRecord {
            month,
            property_value: 0.0,
            existing_house_value: 0.0,
            inflation_multiplier: 1.0,
            adjusted_income: 0.0,
            adjusted_expenses: 0.0,
            adjusted_rent: 0.0,
            dividend_paid: 0.0,
            strategies,
        }
    }

    #[test]
    fn best_strategy_picks_maximum_final_net_worth() {
        let mut result = ProjectionResult::new(2);
        result.add_row(record_with_net_worths(0, [1.0, 1.0, 1.0, 1.0, 1.0]));
        result.add_row(record_with_net_worths(1, [10.0, 40.0, 20.0, 30.0, 25.0]));

        let (strategy, net_worth) = result.best_strategy();
        assert_eq!(strategy, Strategy::HouseSell);
        assert_eq!(net_worth, 40.0);
    }

    #[test]
    fn empty_projection_defaults_to_income() {
        let result = ProjectionResult::new(0);
        assert_eq!(result.best_strategy(), (Strategy::Income, 0.0));
        assert_eq!(result.final_net_worth(Strategy::Combo), 0.0);
    }
}
