//! Mortgage payment formula and amortization schedule generation
//!
//! Pure functions; degenerate inputs (zero principal, zero rate, zero term)
//! take explicit safe branches instead of erroring.

use serde::{Deserialize, Serialize};

use crate::config::{HouseAsset, LoanTerms};

/// Residual balances below this clamp to exactly 0 to absorb float drift
const BALANCE_EPSILON: f64 = 0.01;

/// One row of the amortization schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleRow {
    pub month: u32,
    pub payment: f64,
    pub principal: f64,
    pub interest: f64,
    /// Non-zero only on a lump-sum row produced by a house sale applied to
    /// mortgage principal
    pub lump_sum: f64,
    pub remaining_balance: f64,
    pub total_interest_paid: f64,
}

/// Monthly payment for the given loan terms.
///
/// Zero principal pays nothing; zero rate amortizes straight-line;
/// otherwise the standard annuity formula
/// `P * r * (1+r)^n / ((1+r)^n - 1)` with monthly rate r over n payments.
/// A zero term is coerced to one year.
pub fn monthly_payment(principal: f64, annual_rate: f64, term_years: f64) -> f64 {
    let terms = LoanTerms {
        principal,
        annual_rate,
        term_years,
    };
    let n_payments = terms.term_months() as f64;

    if principal <= 0.0 {
        return 0.0;
    }
    if annual_rate == 0.0 {
        return principal / n_payments;
    }

    let rate = annual_rate / 12.0;
    let compound = (1.0 + rate).powf(n_payments);
    principal * rate * compound / (compound - 1.0)
}

/// Generate the amortization schedule.
///
/// `extra_payment` is an additional principal amount applied every month.
/// If `house` is configured to sell into mortgage principal, the month of
/// sale first gets a lump-sum row paying min(house value, balance) toward
/// principal, then the regular payment row for that month. The schedule
/// stops the month the balance reaches 0.
pub fn amortization_schedule(
    principal: f64,
    annual_rate: f64,
    term_years: f64,
    extra_payment: f64,
    house: Option<&HouseAsset>,
) -> Vec<ScheduleRow> {
    let terms = LoanTerms {
        principal,
        annual_rate,
        term_years,
    };
    let monthly_rate = annual_rate / 12.0;
    let n_payments = terms.term_months();
    let payment = monthly_payment(principal, annual_rate, term_years);

    let lump_sum_month = house
        .filter(|h| h.sale_destination.is_mortgage())
        .and_then(|h| h.sale_step_month());
    let lump_sum_amount = house.map(|h| h.sale_price()).unwrap_or(0.0);

    let mut schedule = Vec::new();
    let mut remaining_balance = principal;
    let mut total_interest = 0.0;

    for month in 1..=n_payments {
        if lump_sum_month == Some(month) {
            let lump = lump_sum_amount.min(remaining_balance);
            if lump > 0.0 {
                remaining_balance -= lump;
                if remaining_balance < BALANCE_EPSILON {
                    remaining_balance = 0.0;
                }
                schedule.push(ScheduleRow {
                    month,
                    payment: lump,
                    principal: lump,
                    interest: 0.0,
                    lump_sum: lump,
                    remaining_balance,
                    total_interest_paid: total_interest,
                });
                if remaining_balance == 0.0 {
                    break;
                }
            }
        }

        let interest = remaining_balance * monthly_rate;
        let principal_paid = (payment - interest + extra_payment).min(remaining_balance);
        let total_payment = principal_paid + interest;

        total_interest += interest;
        remaining_balance -= principal_paid;
        if remaining_balance < BALANCE_EPSILON {
            remaining_balance = 0.0;
        }

        schedule.push(ScheduleRow {
            month,
            payment: total_payment,
            principal: principal_paid,
            interest,
            lump_sum: 0.0,
            remaining_balance,
            total_interest_paid: total_interest,
        });

        if remaining_balance == 0.0 {
            break;
        }
    }

    schedule
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SaleDestination;
    use approx::assert_abs_diff_eq;

    #[test]
    fn payment_matches_published_value() {
        assert_abs_diff_eq!(monthly_payment(300_000.0, 0.045, 30.0), 1_520.06, epsilon = 1.0);
    }

    #[test]
    fn payment_zero_rate_is_straight_line() {
        assert_eq!(monthly_payment(300_000.0, 0.0, 30.0), 300_000.0 / 360.0);
    }

    #[test]
    fn payment_zero_principal_is_zero() {
        assert_eq!(monthly_payment(0.0, 0.045, 30.0), 0.0);
    }

    #[test]
    fn payment_zero_term_coerces_to_one_year() {
        assert_eq!(monthly_payment(12_000.0, 0.0, 0.0), 1_000.0);
    }

    #[test]
    fn schedule_pays_off_exactly() {
        let schedule = amortization_schedule(300_000.0, 0.045, 30.0, 0.0, None);
        assert_eq!(schedule.len(), 360);

        // First month's interest on the full balance
        assert_abs_diff_eq!(schedule[0].interest, 1_125.0, epsilon = 1.0);

        let last = schedule.last().unwrap();
        assert_abs_diff_eq!(last.remaining_balance, 0.0, epsilon = 0.01);

        // Payments = principal + interest, within rounding
        let total_payments: f64 = schedule.iter().map(|r| r.payment).sum();
        let total_interest: f64 = schedule.iter().map(|r| r.interest).sum();
        assert_abs_diff_eq!(total_payments, 300_000.0 + total_interest, epsilon = 1.0);
    }

    #[test]
    fn extra_payment_shortens_schedule_and_saves_interest() {
        let base = amortization_schedule(300_000.0, 0.045, 30.0, 0.0, None);
        let extra = amortization_schedule(300_000.0, 0.045, 30.0, 200.0, None);

        assert!(extra.len() < base.len());
        assert!(
            extra.last().unwrap().total_interest_paid < base.last().unwrap().total_interest_paid
        );
    }

    #[test]
    fn house_sale_lump_sum_inserts_annotated_row() {
        let house = HouseAsset {
            current_value: 200_000.0,
            purchase_price: 150_000.0,
            appreciation_rate: 0.0,
            monthly_rent_income: 0.0,
            sell_month: 24,
            sale_destination: SaleDestination::MortgagePrincipal,
        };
        let base = amortization_schedule(300_000.0, 0.045, 30.0, 0.0, None);
        let with_sale = amortization_schedule(300_000.0, 0.045, 30.0, 0.0, Some(&house));

        let lump_row = with_sale.iter().find(|r| r.lump_sum > 0.0).unwrap();
        assert_eq!(lump_row.month, 24);
        assert_abs_diff_eq!(lump_row.lump_sum, 200_000.0, epsilon = 0.01);
        assert_eq!(lump_row.interest, 0.0);

        // Paying 200k into principal ends the loan much earlier and cheaper
        assert!(with_sale.last().unwrap().month < base.last().unwrap().month);
        assert!(
            with_sale.last().unwrap().total_interest_paid
                < base.last().unwrap().total_interest_paid
        );
    }

    #[test]
    fn savings_destination_leaves_schedule_untouched() {
        let house = HouseAsset {
            current_value: 200_000.0,
            purchase_price: 150_000.0,
            appreciation_rate: 0.0,
            monthly_rent_income: 0.0,
            sell_month: 24,
            sale_destination: SaleDestination::Savings,
        };
        let base = amortization_schedule(300_000.0, 0.045, 30.0, 0.0, None);
        let with_sale = amortization_schedule(300_000.0, 0.045, 30.0, 0.0, Some(&house));
        assert_eq!(base.len(), with_sale.len());
        assert!(with_sale.iter().all(|r| r.lump_sum == 0.0));
    }

    #[test]
    fn zero_principal_yields_empty_like_schedule() {
        let schedule = amortization_schedule(0.0, 0.045, 30.0, 0.0, None);
        // Balance starts at 0, so the first row closes the loan
        assert_eq!(schedule.len(), 1);
        assert_eq!(schedule[0].remaining_balance, 0.0);
        assert_eq!(schedule[0].principal, 0.0);
    }
}
