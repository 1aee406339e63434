//! Scenario configuration: the flat, independently-defaulted input record
//!
//! Every field carries a serde default so a partially-specified scenario
//! (e.g. loaded from a stored JSON payload) decodes to the documented
//! defaults instead of erroring. Degenerate values (zero term) are
//! normalized by the accessor methods, not at construction.

use serde::{Deserialize, Serialize};

use crate::tax::TaxConfig;

/// Sentinel for "never sell the existing house"
pub const NEVER_SELL: i32 = -1;

fn default_term_years() -> f64 {
    30.0
}

fn default_appreciation_rate() -> f64 {
    0.03
}

fn default_house_sell_month() -> i32 {
    NEVER_SELL
}

fn default_dividend_to_savings() -> bool {
    true
}

fn default_max_search_months() -> u32 {
    120
}

/// Where the net proceeds of the existing-house sale are applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SaleDestination {
    /// Proceeds are deposited into the savings account
    #[default]
    Savings,
    /// Proceeds pay down the mortgage principal; any excess overflows to savings
    MortgagePrincipal,
}

impl SaleDestination {
    pub fn is_mortgage(&self) -> bool {
        matches!(self, SaleDestination::MortgagePrincipal)
    }
}

/// Immutable terms of the mortgage being funded
#[derive(Debug, Clone, Copy)]
pub struct LoanTerms {
    pub principal: f64,
    pub annual_rate: f64,
    pub term_years: f64,
}

impl LoanTerms {
    /// Term in years with the divide-by-zero guard applied (0 coerces to 1)
    pub fn normalized_term_years(&self) -> f64 {
        if self.term_years <= 0.0 {
            1.0
        } else {
            self.term_years
        }
    }

    /// Number of payment months in the (normalized) term
    pub fn term_months(&self) -> u32 {
        (self.normalized_term_years() * 12.0) as u32
    }
}

/// The second, already-owned property
#[derive(Debug, Clone, Copy)]
pub struct HouseAsset {
    pub current_value: f64,
    pub purchase_price: f64,
    pub appreciation_rate: f64,
    pub monthly_rent_income: f64,
    /// Month index of the sale; negative = never sell
    pub sell_month: i32,
    pub sale_destination: SaleDestination,
}

impl HouseAsset {
    /// Appreciated market value at a given month
    pub fn value_at(&self, month: u32) -> f64 {
        self.current_value * (1.0 + self.appreciation_rate / 12.0).powi(month as i32)
    }

    /// Whether the house is still owned during the given month.
    /// A sale at month s removes the house from the balance sheet for all
    /// months >= s; negative sell months mean the house is always owned.
    pub fn owned_at(&self, month: u32) -> bool {
        self.sell_month < 0 || (month as i32) < self.sell_month
    }

    /// The month whose step processes the sale. A month-0 sale is handled
    /// during the first simulated month, uniformly across strategies.
    pub fn sale_step_month(&self) -> Option<u32> {
        if self.sell_month < 0 {
            None
        } else {
            Some((self.sell_month as u32).max(1))
        }
    }

    /// Sale price realized if the sale is configured: the appreciated value
    /// at the configured sell month
    pub fn sale_price(&self) -> f64 {
        if self.sell_month < 0 {
            0.0
        } else {
            self.value_at(self.sell_month as u32)
        }
    }
}

/// The securities portfolio
#[derive(Debug, Clone, Copy)]
pub struct SecuritiesAsset {
    pub current_value: f64,
    pub growth_rate: f64,
    pub quarterly_dividend: f64,
    pub dividend_to_savings: bool,
    /// One-time full liquidation month; 0 = disabled
    pub sell_month: u32,
    /// Recurring partial liquidation amount; only applies while
    /// month < sell_month or sell_month == 0
    pub monthly_sell_amount: f64,
}

/// Cash savings account
#[derive(Debug, Clone, Copy)]
pub struct SavingsAccount {
    pub initial_balance: f64,
    pub annual_interest_rate: f64,
}

/// Inflation rate and its three independent application switches
#[derive(Debug, Clone, Copy)]
pub struct InflationConfig {
    pub annual_rate: f64,
    pub apply_to_income: bool,
    pub apply_to_expenses: bool,
    pub apply_to_rent: bool,
}

/// Complete input for one projection or optimizer run.
///
/// Flat by design: collaborators (dashboard, scenario store) marshal this
/// struct in and out as a single record. The entity views below regroup
/// the fields for the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioConfig {
    // Loan
    pub principal: f64,
    pub annual_rate: f64,
    pub term_years: f64,

    // Household cash flow
    pub monthly_income: f64,
    pub monthly_expenses: f64,

    // New (mortgaged) property
    pub home_appreciation_rate: f64,

    // Existing house
    pub house_value: f64,
    pub house_purchase_price: f64,
    pub house_appreciation_rate: f64,
    pub house_rent_income: f64,
    pub house_sell_month: i32,
    pub house_sale_destination: SaleDestination,

    // Securities
    pub securities_value: f64,
    pub securities_growth_rate: f64,
    pub securities_quarterly_dividend: f64,
    pub securities_dividend_to_savings: bool,
    pub securities_sell_month: u32,
    pub securities_monthly_sell: f64,

    // Savings
    pub savings_initial: f64,
    pub savings_interest_rate: f64,

    // Inflation
    pub inflation_rate: f64,
    pub apply_inflation_to_income: bool,
    pub apply_inflation_to_expenses: bool,
    pub apply_inflation_to_rent: bool,

    // Tax
    pub apply_income_tax: bool,
    pub tax: TaxConfig,

    // Optimizer throttles
    pub max_search_months: u32,
    pub test_mode: bool,
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            principal: 0.0,
            annual_rate: 0.0,
            term_years: default_term_years(),
            monthly_income: 0.0,
            monthly_expenses: 0.0,
            home_appreciation_rate: default_appreciation_rate(),
            house_value: 0.0,
            house_purchase_price: 0.0,
            house_appreciation_rate: default_appreciation_rate(),
            house_rent_income: 0.0,
            house_sell_month: default_house_sell_month(),
            house_sale_destination: SaleDestination::default(),
            securities_value: 0.0,
            securities_growth_rate: 0.0,
            securities_quarterly_dividend: 0.0,
            securities_dividend_to_savings: default_dividend_to_savings(),
            securities_sell_month: 0,
            securities_monthly_sell: 0.0,
            savings_initial: 0.0,
            savings_interest_rate: 0.0,
            inflation_rate: 0.0,
            apply_inflation_to_income: false,
            apply_inflation_to_expenses: false,
            apply_inflation_to_rent: false,
            apply_income_tax: false,
            tax: TaxConfig::default(),
            max_search_months: default_max_search_months(),
            test_mode: false,
        }
    }
}

impl ScenarioConfig {
    pub fn loan(&self) -> LoanTerms {
        LoanTerms {
            principal: self.principal,
            annual_rate: self.annual_rate,
            term_years: self.term_years,
        }
    }

    pub fn house(&self) -> HouseAsset {
        HouseAsset {
            current_value: self.house_value,
            purchase_price: self.house_purchase_price,
            appreciation_rate: self.house_appreciation_rate,
            monthly_rent_income: self.house_rent_income,
            sell_month: self.house_sell_month,
            sale_destination: self.house_sale_destination,
        }
    }

    pub fn securities(&self) -> SecuritiesAsset {
        SecuritiesAsset {
            current_value: self.securities_value,
            growth_rate: self.securities_growth_rate,
            quarterly_dividend: self.securities_quarterly_dividend,
            dividend_to_savings: self.securities_dividend_to_savings,
            sell_month: self.securities_sell_month,
            monthly_sell_amount: self.securities_monthly_sell,
        }
    }

    pub fn savings(&self) -> SavingsAccount {
        SavingsAccount {
            initial_balance: self.savings_initial,
            annual_interest_rate: self.savings_interest_rate,
        }
    }

    pub fn inflation(&self) -> InflationConfig {
        InflationConfig {
            annual_rate: self.inflation_rate,
            apply_to_income: self.apply_inflation_to_income,
            apply_to_expenses: self.apply_inflation_to_expenses,
            apply_to_rent: self.apply_inflation_to_rent,
        }
    }

    /// Appreciated value of the mortgaged property at a given month
    pub fn property_value_at(&self, month: u32) -> f64 {
        self.principal * (1.0 + self.home_appreciation_rate / 12.0).powi(month as i32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_json_decodes_to_defaults() {
        let config: ScenarioConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.principal, 0.0);
        assert_eq!(config.term_years, 30.0);
        assert_eq!(config.house_sell_month, NEVER_SELL);
        assert_eq!(config.house_sale_destination, SaleDestination::Savings);
        assert!(config.securities_dividend_to_savings);
        assert_eq!(config.max_search_months, 120);
        assert!(!config.apply_income_tax);
    }

    #[test]
    fn zero_term_is_coerced_to_one_year() {
        let loan = LoanTerms {
            principal: 100_000.0,
            annual_rate: 0.05,
            term_years: 0.0,
        };
        assert_eq!(loan.normalized_term_years(), 1.0);
        assert_eq!(loan.term_months(), 12);
    }

    #[test]
    fn house_ownership_window() {
        let mut house = HouseAsset {
            current_value: 200_000.0,
            purchase_price: 150_000.0,
            appreciation_rate: 0.0,
            monthly_rent_income: 0.0,
            sell_month: 24,
            sale_destination: SaleDestination::Savings,
        };
        assert!(house.owned_at(0));
        assert!(house.owned_at(23));
        assert!(!house.owned_at(24));
        assert!(!house.owned_at(360));

        house.sell_month = NEVER_SELL;
        assert!(house.owned_at(360));
        assert_eq!(house.sale_step_month(), None);

        // A month-0 sale is processed during the first simulated month
        house.sell_month = 0;
        assert!(!house.owned_at(0));
        assert_eq!(house.sale_step_month(), Some(1));
        assert_eq!(house.sale_price(), 200_000.0);
    }

    #[test]
    fn house_value_appreciates_monthly() {
        let house = HouseAsset {
            current_value: 200_000.0,
            purchase_price: 150_000.0,
            appreciation_rate: 0.03,
            monthly_rent_income: 0.0,
            sell_month: NEVER_SELL,
            sale_destination: SaleDestination::Savings,
        };
        assert_eq!(house.value_at(0), 200_000.0);
        let one_year = house.value_at(12);
        assert!(one_year > 200_000.0 * 1.03 && one_year < 200_000.0 * 1.0305);
    }
}
