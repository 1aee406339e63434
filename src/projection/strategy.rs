//! The five mortgage-funding strategies
//!
//! Each strategy is one way of directing surplus cash and asset proceeds.
//! The engine advances all five in lockstep; the predicates here are what
//! the single month loop dispatches on.

use serde::{Deserialize, Serialize};

/// One of the five mutually exclusive funding strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Strategy {
    /// Surplus income alone funds the mortgage and savings
    Income,
    /// The existing house is sold at the configured month
    HouseSell,
    /// The existing house is rented out for the whole term
    Rent,
    /// Securities are liquidated (one-time or monthly) into savings
    Securities,
    /// Rent until the house-sell month plus securities liquidation
    Combo,
}

impl Strategy {
    /// All strategies in record-column order
    pub const ALL: [Strategy; 5] = [
        Strategy::Income,
        Strategy::HouseSell,
        Strategy::Rent,
        Strategy::Securities,
        Strategy::Combo,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Income => "Income",
            Strategy::HouseSell => "HouseSell",
            Strategy::Rent => "Rent",
            Strategy::Securities => "Securities",
            Strategy::Combo => "Combo",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Collects rental income (Rent always; Combo while the house is owned)
    pub fn collects_rent(&self) -> bool {
        matches!(self, Strategy::Rent | Strategy::Combo)
    }

    /// Diverts rent into extra mortgage principal (Rent only; in Combo the
    /// rent is income, not an extra principal payment)
    pub fn rent_pays_principal(&self) -> bool {
        matches!(self, Strategy::Rent)
    }

    /// Realizes the existing-house sale proceeds at the configured month
    pub fn sells_house(&self) -> bool {
        matches!(self, Strategy::HouseSell)
    }

    /// Liquidates securities per the configured schedule
    pub fn sells_securities(&self) -> bool {
        matches!(self, Strategy::Securities | Strategy::Combo)
    }

    /// House ownership ends at the configured sell month. In HouseSell the
    /// sale is realized; in Combo the house merely leaves the balance sheet
    /// (and rent stops).
    pub fn house_ownership_ends(&self) -> bool {
        matches!(self, Strategy::HouseSell | Strategy::Combo)
    }
}

impl std::fmt::Display for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_column_order() {
        for (i, strategy) in Strategy::ALL.iter().enumerate() {
            assert_eq!(strategy.index(), i);
        }
    }

    #[test]
    fn behavior_predicates() {
        assert!(!Strategy::Income.collects_rent());
        assert!(Strategy::Rent.collects_rent() && Strategy::Rent.rent_pays_principal());
        assert!(Strategy::Combo.collects_rent() && !Strategy::Combo.rent_pays_principal());
        assert!(Strategy::HouseSell.sells_house() && !Strategy::Combo.sells_house());
        assert!(Strategy::Securities.sells_securities() && Strategy::Combo.sells_securities());
        assert!(!Strategy::Rent.house_ownership_ends());
        assert!(Strategy::Combo.house_ownership_ends());
    }
}
