//! Brute-force strategy optimizer
//!
//! Sweeps the independent parameter axes (house sell month, sale
//! destination, securities one-time sell month or monthly sell amount),
//! runs a full projection per combination, and keeps the best strategy
//! outcome by ending net worth. Trials are independent, so they evaluate
//! in parallel; the only reduction is the final arg-max.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::{SaleDestination, ScenarioConfig, NEVER_SELL};
use crate::projection::{ProjectionEngine, Strategy};

/// Monthly sell amounts tried in the full search
const MONTHLY_SELL_CANDIDATES: [f64; 4] = [500.0, 1_000.0, 2_000.0, 5_000.0];

/// House sell months tried in test mode
const TEST_HOUSE_MONTHS: [i32; 3] = [NEVER_SELL, 0, 12];

/// Securities one-time sell months tried in test mode (0 = disabled)
const TEST_SECURITIES_MONTHS: [u32; 3] = [0, 6, 12];

/// One combination of search parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrialParams {
    pub house_sell_month: i32,
    pub sale_destination: SaleDestination,
    pub securities_sell_month: u32,
    pub securities_monthly_sell: f64,
}

impl TrialParams {
    /// The no-sell baseline every search must at least match
    fn baseline() -> Self {
        Self {
            house_sell_month: NEVER_SELL,
            sale_destination: SaleDestination::Savings,
            securities_sell_month: 0,
            securities_monthly_sell: 0.0,
        }
    }

    fn apply_to(&self, base: &ScenarioConfig) -> ScenarioConfig {
        ScenarioConfig {
            house_sell_month: self.house_sell_month,
            house_sale_destination: self.sale_destination,
            securities_sell_month: self.securities_sell_month,
            securities_monthly_sell: self.securities_monthly_sell,
            ..base.clone()
        }
    }
}

/// Best combination found by a search
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimalStrategy {
    pub house_sell_month: i32,
    pub sale_destination: SaleDestination,
    pub securities_sell_month: u32,
    pub securities_monthly_sell: f64,
    pub final_net_worth: f64,
    /// Which of the five strategies produced the maximum
    pub strategy: Strategy,
    /// Total tax that strategy paid across the run
    pub tax_paid: f64,
}

#[derive(Debug, Clone)]
struct TrialOutcome {
    order: usize,
    params: TrialParams,
    strategy: Strategy,
    final_net_worth: f64,
    tax_paid: f64,
}

/// Exhaustive grid-search optimizer over a base scenario
pub struct StrategyOptimizer {
    base: ScenarioConfig,
}

impl StrategyOptimizer {
    pub fn new(base: ScenarioConfig) -> Self {
        Self { base }
    }

    /// Run the full search to completion
    pub fn optimize(&self, max_search_months: u32, test_mode: bool) -> OptimalStrategy {
        self.optimize_with_cancel(max_search_months, test_mode, &AtomicBool::new(false))
    }

    /// Run the search with a cancellation hook. Trials observed after
    /// `cancel` is set are skipped; the best outcome seen so far (always
    /// including the no-sell baseline) is returned.
    pub fn optimize_with_cancel(
        &self,
        max_search_months: u32,
        test_mode: bool,
        cancel: &AtomicBool,
    ) -> OptimalStrategy {
        let trials = self.trials(max_search_months, test_mode);
        info!(
            "optimizing over {} trials ({} months searched, test_mode={})",
            trials.len(),
            max_search_months,
            test_mode
        );

        // The baseline is evaluated unconditionally so a cancelled (or
        // empty) search still yields a meaningful result
        let baseline = self.evaluate(0, TrialParams::baseline());

        let best = trials
            .into_par_iter()
            .enumerate()
            .filter_map(|(order, params)| {
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                Some(self.evaluate(order + 1, params))
            })
            .chain(rayon::iter::once(baseline))
            .reduce_with(better_outcome)
            .expect("at least the baseline outcome exists");

        debug!(
            "best: {} at net worth {:.2}",
            best.strategy, best.final_net_worth
        );

        OptimalStrategy {
            house_sell_month: best.params.house_sell_month,
            sale_destination: best.params.sale_destination,
            securities_sell_month: best.params.securities_sell_month,
            securities_monthly_sell: best.params.securities_monthly_sell,
            final_net_worth: best.final_net_worth,
            strategy: best.strategy,
            tax_paid: best.tax_paid,
        }
    }

    /// Generate the trial sequence: first the one-time-sale pass, then the
    /// monthly-sell pass. The two securities liquidation modes are never
    /// combined in one trial, and a house sale sharing its exact month
    /// with a securities one-time sale is skipped.
    fn trials(&self, max_search_months: u32, test_mode: bool) -> Vec<TrialParams> {
        let house_months: Vec<i32> = if test_mode {
            TEST_HOUSE_MONTHS.to_vec()
        } else {
            std::iter::once(NEVER_SELL)
                .chain((0..=max_search_months as i32).step_by(12))
                .collect()
        };

        let securities_months: Vec<u32> = if test_mode {
            TEST_SECURITIES_MONTHS.to_vec()
        } else {
            (0..max_search_months).collect()
        };

        let monthly_sells: Vec<f64> = if test_mode {
            vec![self.base.securities_value * 0.01]
        } else {
            MONTHLY_SELL_CANDIDATES.to_vec()
        };

        let mut trials = Vec::new();
        for &house_month in &house_months {
            for destination in destinations(house_month) {
                // Pass 1: one-time securities sale axis
                for &securities_month in &securities_months {
                    if securities_month > 0 && house_month == securities_month as i32 {
                        // Two one-time liquidity events in the same month
                        continue;
                    }
                    trials.push(TrialParams {
                        house_sell_month: house_month,
                        sale_destination: destination,
                        securities_sell_month: securities_month,
                        securities_monthly_sell: 0.0,
                    });
                }

                // Pass 2: recurring monthly sell axis
                for &amount in &monthly_sells {
                    if amount <= 0.0 {
                        continue;
                    }
                    trials.push(TrialParams {
                        house_sell_month: house_month,
                        sale_destination: destination,
                        securities_sell_month: 0,
                        securities_monthly_sell: amount,
                    });
                }
            }
        }
        trials
    }

    /// Project one trial and keep its best strategy outcome
    fn evaluate(&self, order: usize, params: TrialParams) -> TrialOutcome {
        let config = params.apply_to(&self.base);
        let result = ProjectionEngine::new(config).project();
        let (strategy, final_net_worth) = result.best_strategy();

        TrialOutcome {
            order,
            params,
            strategy,
            final_net_worth,
            tax_paid: result.total_tax_paid(strategy),
        }
    }
}

/// Higher ending net worth wins; ties go to the earlier trial so the
/// parallel reduction stays deterministic
fn better_outcome(a: TrialOutcome, b: TrialOutcome) -> TrialOutcome {
    if b.final_net_worth > a.final_net_worth
        || (b.final_net_worth == a.final_net_worth && b.order < a.order)
    {
        b
    } else {
        a
    }
}

/// Destination axis: collapsed to Savings when there is no sale
fn destinations(house_sell_month: i32) -> Vec<SaleDestination> {
    if house_sell_month < 0 {
        vec![SaleDestination::Savings]
    } else {
        vec![
            SaleDestination::Savings,
            SaleDestination::MortgagePrincipal,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ScenarioConfig {
        ScenarioConfig {
            principal: 300_000.0,
            annual_rate: 0.045,
            term_years: 1.0,
            monthly_income: 6_000.0,
            monthly_expenses: 3_000.0,
            house_value: 200_000.0,
            house_purchase_price: 150_000.0,
            house_appreciation_rate: 0.03,
            house_rent_income: 1_500.0,
            securities_value: 100_000.0,
            securities_growth_rate: 0.07,
            securities_quarterly_dividend: 750.0,
            savings_initial: 50_000.0,
            savings_interest_rate: 0.015,
            apply_income_tax: true,
            ..Default::default()
        }
    }

    #[test]
    fn beats_or_matches_the_unoptimized_baseline() {
        let base = base_config();
        let baseline = ProjectionEngine::new(base.clone())
            .project()
            .final_net_worth(Strategy::Income);

        let optimal = StrategyOptimizer::new(base).optimize(12, true);
        assert!(optimal.final_net_worth >= baseline);
        assert!(optimal.final_net_worth > 0.0);
    }

    #[test]
    fn same_month_one_time_overlap_is_skipped() {
        let optimizer = StrategyOptimizer::new(base_config());
        let trials = optimizer.trials(24, false);

        assert!(!trials.is_empty());
        for trial in &trials {
            // One-time house sale and one-time securities sale never share
            // the exact same month
            assert!(
                trial.securities_sell_month == 0
                    || trial.house_sell_month != trial.securities_sell_month as i32
            );
            // The two liquidation modes are never combined
            assert!(trial.securities_sell_month == 0 || trial.securities_monthly_sell == 0.0);
        }
    }

    #[test]
    fn destination_axis_collapses_without_a_sale() {
        let optimizer = StrategyOptimizer::new(base_config());
        let trials = optimizer.trials(24, false);

        assert!(trials.iter().all(|t| {
            t.house_sell_month >= 0 || t.sale_destination == SaleDestination::Savings
        }));
        // Both destinations appear once a sale month is set
        assert!(trials.iter().any(|t| {
            t.house_sell_month >= 0 && t.sale_destination == SaleDestination::MortgagePrincipal
        }));
    }

    #[test]
    fn full_mode_securities_axis_is_monthly() {
        let optimizer = StrategyOptimizer::new(base_config());
        let trials = optimizer.trials(24, false);

        let no_house: Vec<_> = trials
            .iter()
            .filter(|t| t.house_sell_month == NEVER_SELL && t.securities_monthly_sell == 0.0)
            .collect();
        // Every month in [0, 24) appears on the one-time axis
        assert_eq!(no_house.len(), 24);
    }

    #[test]
    fn test_mode_monthly_sell_is_one_percent() {
        let optimizer = StrategyOptimizer::new(base_config());
        let trials = optimizer.trials(12, true);
        let amounts: Vec<f64> = trials
            .iter()
            .filter(|t| t.securities_monthly_sell > 0.0)
            .map(|t| t.securities_monthly_sell)
            .collect();
        assert!(!amounts.is_empty());
        assert!(amounts.iter().all(|&a| a == 1_000.0));
    }

    #[test]
    fn cancelled_search_still_returns_the_baseline() {
        let base = base_config();
        let baseline = ProjectionEngine::new(base.clone())
            .project()
            .final_net_worth(Strategy::Income);

        let cancel = AtomicBool::new(true);
        let optimal =
            StrategyOptimizer::new(base).optimize_with_cancel(12, true, &cancel);
        assert!(optimal.final_net_worth >= baseline);
    }

    #[test]
    fn winner_is_reported_with_its_tax() {
        let optimal = StrategyOptimizer::new(base_config()).optimize(12, true);
        assert!(Strategy::ALL.contains(&optimal.strategy));
        // Income tax is on, so whatever wins paid something
        assert!(optimal.tax_paid > 0.0);
    }
}
