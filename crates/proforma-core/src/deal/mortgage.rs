//! Fixed-rate mortgage arithmetic shared by the deal engine, the CLI and the
//! bindings. Pure functions over IEEE-754 doubles; no validation happens
//! here.

use crate::types::{Money, Percent};

/// Standard amortizing payment: P * r(1+r)^n / ((1+r)^n - 1).
///
/// A zero rate degenerates to straight-line principal repayment. A
/// non-positive principal means there is no debt and the payment is zero.
pub fn monthly_payment(principal: Money, annual_rate_percent: Percent, term_years: u32) -> Money {
    if principal <= 0.0 {
        return 0.0;
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let total_payments = (f64::from(term_years) * 12.0).max(1.0);

    if monthly_rate > 0.0 {
        let compound = (1.0 + monthly_rate).powf(total_payments);
        principal * (monthly_rate * compound) / (compound - 1.0)
    } else {
        principal / total_payments
    }
}

/// Outstanding principal after `years_elapsed` years of scheduled payments.
///
/// Closed form: B = P * ((1+r)^N - (1+r)^p) / ((1+r)^N - 1), with N total
/// scheduled payments and p payments made. A zero rate amortizes linearly.
/// The result is floored at zero, so horizons past the loan term report a
/// paid-off loan rather than a negative balance.
pub fn remaining_balance(
    principal: Money,
    annual_rate_percent: Percent,
    term_years: u32,
    years_elapsed: u32,
) -> Money {
    if principal <= 0.0 {
        return 0.0;
    }

    let monthly_rate = annual_rate_percent / 100.0 / 12.0;
    let total_payments = f64::from(term_years) * 12.0;
    let payments_made = f64::from(years_elapsed) * 12.0;

    let balance = if monthly_rate == 0.0 {
        principal - (principal / total_payments) * payments_made
    } else {
        let compound_total = (1.0 + monthly_rate).powf(total_payments);
        let compound_made = (1.0 + monthly_rate).powf(payments_made);
        principal * (compound_total - compound_made) / (compound_total - 1.0)
    };

    balance.max(0.0)
}
