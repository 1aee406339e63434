//! Mutable per-strategy state advanced by the month loop

use crate::config::ScenarioConfig;

use super::records::StrategySnapshot;
use super::strategy::Strategy;

/// State of one strategy at a point in the projection.
///
/// All five strategies start from the same initial position; they diverge
/// only through the per-strategy step logic in the engine.
#[derive(Debug, Clone)]
pub struct StrategyState {
    pub strategy: Strategy,
    /// Remaining mortgage balance, in [0, principal]
    pub balance: f64,
    pub securities_value: f64,
    pub savings_value: f64,
    /// Cumulative tax paid since month 0
    pub tax_paid: f64,
}

impl StrategyState {
    pub fn from_config(strategy: Strategy, config: &ScenarioConfig) -> Self {
        Self {
            strategy,
            balance: config.principal.max(0.0),
            securities_value: config.securities_value.max(0.0),
            savings_value: config.savings_initial.max(0.0),
            tax_paid: 0.0,
        }
    }

    /// Snapshot the state into record cells with the month's derived values
    pub fn snapshot(&self, net_worth: f64, monthly_cashflow: f64) -> StrategySnapshot {
        StrategySnapshot {
            remaining_balance: self.balance,
            securities_value: self.securities_value,
            savings_value: self.savings_value,
            net_worth,
            monthly_cashflow,
            tax_paid: self.tax_paid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_state_mirrors_config() {
        let config = ScenarioConfig {
            principal: 300_000.0,
            securities_value: 100_000.0,
            savings_initial: 50_000.0,
            ..Default::default()
        };
        let state = StrategyState::from_config(Strategy::Rent, &config);
        assert_eq!(state.balance, 300_000.0);
        assert_eq!(state.securities_value, 100_000.0);
        assert_eq!(state.savings_value, 50_000.0);
        assert_eq!(state.tax_paid, 0.0);
    }

    #[test]
    fn negative_inputs_clamp_to_zero() {
        let config = ScenarioConfig {
            principal: -1.0,
            securities_value: -2.0,
            savings_initial: -3.0,
            ..Default::default()
        };
        let state = StrategyState::from_config(Strategy::Income, &config);
        assert_eq!(state.balance, 0.0);
        assert_eq!(state.securities_value, 0.0);
        assert_eq!(state.savings_value, 0.0);
    }
}
