//! Progressive income-tax and capital-gains-tax calculations
//!
//! The bracket table is configuration, not law: the default is an
//! illustrative 7-bracket joint-filing table, and callers can swap in any
//! ascending, contiguous table (see [`loader`] for the CSV form).

pub mod loader;

pub use loader::TaxTableError;

use serde::{Deserialize, Serialize};

/// One marginal bracket: income in (lower, upper] is taxed at `rate`.
/// `upper` of `None` marks the open-ended top bracket.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub lower: f64,
    pub upper: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    pub fn new(lower: f64, upper: Option<f64>, rate: f64) -> Self {
        Self { lower, upper, rate }
    }

    fn upper_bound(&self) -> f64 {
        self.upper.unwrap_or(f64::INFINITY)
    }
}

/// Tax parameters for a projection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxConfig {
    /// Ascending, contiguous brackets covering [0, inf)
    pub brackets: Vec<TaxBracket>,
    /// Home-sale gain excluded before the flat rate applies
    pub capital_gains_exemption: f64,
    /// Flat rate on the taxable portion of the gain
    pub capital_gains_rate: f64,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self {
            brackets: default_brackets(),
            capital_gains_exemption: 500_000.0,
            capital_gains_rate: 0.15,
        }
    }
}

/// Illustrative joint-filing bracket table, 10% through 37%
fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::new(0.0, Some(23_200.0), 0.10),
        TaxBracket::new(23_200.0, Some(94_300.0), 0.12),
        TaxBracket::new(94_300.0, Some(201_050.0), 0.22),
        TaxBracket::new(201_050.0, Some(383_900.0), 0.24),
        TaxBracket::new(383_900.0, Some(487_450.0), 0.32),
        TaxBracket::new(487_450.0, Some(731_200.0), 0.35),
        TaxBracket::new(731_200.0, None, 0.37),
    ]
}

impl TaxConfig {
    /// Annual income tax under the progressive bracket table.
    ///
    /// Walks brackets in ascending order, taxing the slice of income that
    /// falls inside each; stops once income no longer reaches a bracket.
    /// Non-positive income owes nothing.
    pub fn income_tax(&self, annual_income: f64) -> f64 {
        if annual_income <= 0.0 {
            return 0.0;
        }

        let mut tax = 0.0;
        for bracket in &self.brackets {
            if annual_income <= bracket.lower {
                break;
            }
            let taxable = annual_income.min(bracket.upper_bound()) - bracket.lower;
            tax += taxable * bracket.rate;
        }
        tax
    }

    /// Capital-gains tax on a house sale.
    ///
    /// Returns `(tax, net_proceeds)`. The gain above the exemption is taxed
    /// at the flat rate; losses and under-exemption gains owe nothing, so
    /// both values are never negative and net proceeds never exceed the
    /// sale price.
    pub fn capital_gains_tax(&self, sale_price: f64, purchase_price: f64) -> (f64, f64) {
        let gain = (sale_price - purchase_price).max(0.0);
        let taxable_gain = (gain - self.capital_gains_exemption).max(0.0);
        let tax = taxable_gain * self.capital_gains_rate;
        (tax, sale_price - tax)
    }
}
