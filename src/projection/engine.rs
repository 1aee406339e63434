//! Core projection engine: five strategy state machines in one month loop
//!
//! Each month the loop applies the shared mechanics (inflation, dividend,
//! mortgage payment, tax, ordered savings update) to all five strategies,
//! dispatching the strategy-specific pieces (rent, house sale, securities
//! liquidation) through [`Strategy`]'s behavior predicates. The engine is a
//! pure function of its configuration; no state survives between runs.

use log::debug;

use crate::amortization::monthly_payment;
use crate::config::{HouseAsset, ScenarioConfig, SecuritiesAsset};

use super::records::{MonthlyRecord, ProjectionResult, StrategySnapshot};
use super::state::StrategyState;
use super::strategy::Strategy;

/// Shared per-month values computed once and read by every strategy step
struct MonthContext {
    month: u32,
    payment: f64,
    monthly_loan_rate: f64,
    monthly_savings_rate: f64,
    adjusted_income: f64,
    adjusted_expenses: f64,
    adjusted_rent: f64,
    property_value: f64,
    existing_house_value: f64,
    dividend_month: bool,
}

/// Main projection engine
pub struct ProjectionEngine {
    config: ScenarioConfig,
}

impl ProjectionEngine {
    pub fn new(config: ScenarioConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScenarioConfig {
        &self.config
    }

    /// Run the projection: one record per month, 0..=term_months.
    /// Month 0 is the initial state; payments begin at month 1.
    pub fn project(&self) -> ProjectionResult {
        let cfg = &self.config;
        let loan = cfg.loan();
        let house = cfg.house();
        let securities = cfg.securities();
        let inflation = cfg.inflation();

        let term_months = loan.term_months();
        let payment = monthly_payment(cfg.principal, cfg.annual_rate, cfg.term_years);
        debug!(
            "projecting {} months, payment {:.2}/month",
            term_months, payment
        );

        let mut states: Vec<StrategyState> = Strategy::ALL
            .iter()
            .map(|&s| StrategyState::from_config(s, cfg))
            .collect();

        let mut result = ProjectionResult::new(term_months as usize + 1);
        result.add_row(self.initial_record(&states, &house));

        let mut inflation_multiplier = 1.0;
        for month in 1..=term_months {
            inflation_multiplier *= 1.0 + inflation.annual_rate / 12.0;

            let ctx = MonthContext {
                month,
                payment,
                monthly_loan_rate: cfg.annual_rate / 12.0,
                monthly_savings_rate: cfg.savings_interest_rate / 12.0,
                adjusted_income: apply_if(
                    cfg.monthly_income,
                    inflation_multiplier,
                    inflation.apply_to_income,
                ),
                adjusted_expenses: apply_if(
                    cfg.monthly_expenses,
                    inflation_multiplier,
                    inflation.apply_to_expenses,
                ),
                adjusted_rent: apply_if(
                    house.monthly_rent_income,
                    inflation_multiplier,
                    inflation.apply_to_rent,
                ),
                property_value: cfg.property_value_at(month),
                existing_house_value: house.value_at(month),
                dividend_month: month % 3 == 0,
            };

            let mut cells = [StrategySnapshot::default(); 5];
            for state in states.iter_mut() {
                cells[state.strategy.index()] = self.step(state, &ctx, &house, &securities);
            }

            result.add_row(MonthlyRecord {
                month,
                property_value: ctx.property_value,
                existing_house_value: ctx.existing_house_value,
                inflation_multiplier,
                adjusted_income: ctx.adjusted_income,
                adjusted_expenses: ctx.adjusted_expenses,
                adjusted_rent: ctx.adjusted_rent,
                dividend_paid: if ctx.dividend_month {
                    securities.quarterly_dividend
                } else {
                    0.0
                },
                strategies: cells,
            });
        }

        result
    }

    /// Month-0 record: initial balances, nominal cash figures, net worth
    /// computed with the same formula as every later month
    fn initial_record(&self, states: &[StrategyState], house: &HouseAsset) -> MonthlyRecord {
        let cfg = &self.config;
        let property_value = cfg.property_value_at(0);
        let existing_house_value = house.value_at(0);

        let mut cells = [StrategySnapshot::default(); 5];
        for state in states {
            let house_component = if house_counts(state.strategy, house, 0) {
                existing_house_value
            } else {
                0.0
            };
            let net_worth = (property_value - state.balance)
                + state.securities_value
                + house_component
                + state.savings_value;
            cells[state.strategy.index()] = state.snapshot(net_worth, 0.0);
        }

        MonthlyRecord {
            month: 0,
            property_value,
            existing_house_value,
            inflation_multiplier: 1.0,
            adjusted_income: cfg.monthly_income,
            adjusted_expenses: cfg.monthly_expenses,
            adjusted_rent: house.monthly_rent_income,
            dividend_paid: 0.0,
            strategies: cells,
        }
    }

    /// Advance one strategy through one month
    fn step(
        &self,
        state: &mut StrategyState,
        ctx: &MonthContext,
        house: &HouseAsset,
        securities: &SecuritiesAsset,
    ) -> StrategySnapshot {
        let cfg = &self.config;
        let strategy = state.strategy;

        // Securities grow, then liquidation fires
        state.securities_value *= 1.0 + securities.growth_rate / 12.0;
        let securities_proceeds = if strategy.sells_securities() {
            liquidate(&mut state.securities_value, securities, ctx.month)
        } else {
            0.0
        };

        // Quarterly dividend, scaled by the post-growth, post-sale value
        let dividend = if ctx.dividend_month
            && securities.quarterly_dividend > 0.0
            && securities.current_value > 0.0
        {
            securities.quarterly_dividend * state.securities_value / securities.current_value
        } else {
            0.0
        };

        // Rent: the Rent strategy collects for the whole term; Combo only
        // while the house is still owned
        let rent_received = if strategy.collects_rent()
            && (!strategy.house_ownership_ends() || house.owned_at(ctx.month))
        {
            ctx.adjusted_rent
        } else {
            0.0
        };

        // House sale proceeds, net of capital-gains tax when tax applies
        let mut house_proceeds = 0.0;
        if strategy.sells_house() && house.sale_step_month() == Some(ctx.month) {
            let sale_price = house.sale_price();
            let (sale_tax, net_proceeds) = if cfg.apply_income_tax {
                cfg.tax.capital_gains_tax(sale_price, house.purchase_price)
            } else {
                (0.0, sale_price)
            };
            state.tax_paid += sale_tax;

            if house.sale_destination.is_mortgage() {
                // Lump sum to principal before this month's payment;
                // the excess overflows to savings
                let lump = net_proceeds.min(state.balance);
                state.balance -= lump;
                house_proceeds = net_proceeds - lump;
            } else {
                house_proceeds = net_proceeds;
            }
        }

        // Mortgage payment. A payment that does not cover interest is
        // treated as interest-only: no amortization that month.
        let interest = state.balance * ctx.monthly_loan_rate;
        let extra_principal = if strategy.rent_pays_principal() {
            rent_received
        } else {
            0.0
        };
        let principal_portion =
            (ctx.payment - interest + extra_principal).clamp(0.0, state.balance);
        state.balance -= principal_portion;

        // Income tax on annualized income: nominal monthly income plus the
        // rent received this month, each x12, plus the dividend x4
        let monthly_tax = if cfg.apply_income_tax {
            let annual_income = cfg.monthly_income * 12.0 + rent_received * 12.0 + dividend * 4.0;
            cfg.tax.income_tax(annual_income) / 12.0
        } else {
            0.0
        };
        state.tax_paid += monthly_tax;

        // Net cash left over this month
        let mut leftover =
            ctx.adjusted_income - ctx.adjusted_expenses - ctx.payment + rent_received - monthly_tax;
        if !securities.dividend_to_savings {
            leftover += dividend;
        }

        // Savings update order: interest on the prior balance, dividend
        // auto-deposit, one-time proceeds, then the leftover with the
        // zero floor on withdrawals
        let interest_earned = state.savings_value * ctx.monthly_savings_rate;
        let mut savings = state.savings_value * (1.0 + ctx.monthly_savings_rate);
        if securities.dividend_to_savings {
            savings += dividend;
        }
        savings += house_proceeds + securities_proceeds;
        savings = if leftover > 0.0 {
            savings + leftover
        } else {
            (savings + leftover).max(0.0)
        };
        state.savings_value = savings;

        // Net worth, recomputed fresh every month
        let house_component = if house_counts(strategy, house, ctx.month) {
            ctx.existing_house_value
        } else {
            0.0
        };
        let net_worth = (ctx.property_value - state.balance)
            + state.securities_value
            + house_component
            + state.savings_value;

        state.snapshot(net_worth, leftover + interest_earned)
    }
}

/// Whether the existing house still counts toward a strategy's net worth
fn house_counts(strategy: Strategy, house: &HouseAsset, month: u32) -> bool {
    !strategy.house_ownership_ends() || house.owned_at(month)
}

fn apply_if(nominal: f64, multiplier: f64, apply: bool) -> f64 {
    if apply {
        nominal * multiplier
    } else {
        nominal
    }
}

/// Apply this month's securities liquidation and return the proceeds.
/// The one-time sale fires exactly at its month; monthly selling runs only
/// before it (or for the whole term when no one-time sale is configured).
fn liquidate(value: &mut f64, securities: &SecuritiesAsset, month: u32) -> f64 {
    if securities.sell_month > 0 && month == securities.sell_month {
        let proceeds = *value;
        *value = 0.0;
        proceeds
    } else if (securities.sell_month == 0 || month < securities.sell_month)
        && securities.monthly_sell_amount > 0.0
    {
        let proceeds = securities.monthly_sell_amount.min(*value);
        *value -= proceeds;
        proceeds
    } else {
        0.0
    }
}
