use std::time::Instant;

use serde::{Deserialize, Serialize};

use crate::deal::input::DealInput;
use crate::deal::mortgage;
use crate::error::ProformaError;
use crate::types::{with_metadata, ComputationOutput, Money, Percent};
use crate::ProformaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One year of the pro-forma projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlyProjection {
    /// 1-based projection year
    pub year: u32,
    pub noi: Money,
    pub cash_flow: Money,
    /// Running sum of cash flow through this year
    pub cumulative_cash_flow: Money,
}

/// Fully derived deal metrics. One instance per input; constructed, returned,
/// discarded — nothing here is ever mutated after the fact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealOutput {
    // Key metrics
    pub noi: Money,
    pub cap_rate: Percent,
    /// Year-1 cash flow after debt service and capex reserve
    pub cash_flow: Money,
    pub cash_on_cash_return: Percent,

    // Purchase & loan
    pub loan_amount: Money,
    pub down_payment: Money,
    /// Down payment plus closing costs
    pub total_cash_needed: Money,
    pub monthly_mortgage: Money,

    // Income
    pub annual_gross_rent: Money,
    pub effective_gross_income: Money,

    // Expenses
    pub annual_operating_expenses: Money,

    // Projections & exit
    pub yearly_projections: Vec<YearlyProjection>,
    /// Accumulated cash flow plus sale appreciation over the holding period
    pub total_profit: Money,
    pub total_return_on_equity: Percent,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Validate and analyze a deal, wrapping the derived metrics in the standard
/// computation envelope with advisory warnings.
///
/// Warnings never alter computed values; they flag non-finite ratios and
/// figures outside typical market bands for the presentation layer.
pub fn analyze_deal(input: &DealInput) -> ProformaResult<ComputationOutput<DealOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.validate().map_err(ProformaError::Validation)?;

    let output = calculate_deal_metrics(input);

    if !output.cash_on_cash_return.is_finite() {
        warnings.push(
            "No cash invested (zero down payment and closing costs) — \
             cash-on-cash return is not a finite number"
                .into(),
        );
    }
    if !output.total_return_on_equity.is_finite() {
        warnings.push("Zero equity at exit — return on equity is not a finite number".into());
    }
    if output.cash_flow < 0.0 {
        warnings.push(format!(
            "Year-1 cash flow of {:.0} is negative — rents do not cover debt service and reserves",
            output.cash_flow
        ));
    }
    if output.cap_rate < 3.0 {
        warnings.push(format!(
            "Cap rate {:.2}% is below 3% — unusually low, verify pricing",
            output.cap_rate
        ));
    }
    if output.cap_rate > 12.0 {
        warnings.push(format!(
            "Cap rate {:.2}% exceeds 12% — unusually high, may indicate elevated risk",
            output.cap_rate
        ));
    }
    if input.vacancy_percentage > 15.0 {
        warnings.push(format!(
            "Vacancy rate {:.1}% exceeds 15% — above typical market norms",
            input.vacancy_percentage
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Rental Property Deal Analysis (Pro-Forma Projection)",
        input,
        warnings,
        elapsed,
        output,
    ))
}

/// Derive the full metric set for a validated deal.
///
/// Total over the validated domain: never fails and never panics. Ratios
/// with a zero denominator (an all-cash deal with no closing costs, or zero
/// exit equity) propagate as IEEE-754 infinity or NaN; rendering those as
/// "not applicable" is the caller's job.
pub fn calculate_deal_metrics(input: &DealInput) -> DealOutput {
    // --- Income ---
    let annual_gross_rent = input.gross_monthly_rent * 12.0;
    let annual_other_income = input.other_monthly_income * 12.0;
    let total_potential_income = annual_gross_rent + annual_other_income;
    let vacancy_loss = total_potential_income * (input.vacancy_percentage / 100.0);
    let effective_gross_income = total_potential_income - vacancy_loss;

    // --- Expenses ---
    // Management, maintenance and capex scale with collected income, not
    // with rent or price. Capex is a reserve, kept out of operating
    // expenses and deducted at the cash-flow line instead.
    let management_fee = effective_gross_income * (input.property_management_percentage / 100.0);
    let maintenance = effective_gross_income * (input.maintenance_percentage / 100.0);
    let capex = effective_gross_income * (input.capex_percentage / 100.0);
    let annual_operating_expenses = input.property_taxes
        + input.insurance
        + management_fee
        + maintenance
        + input.other_expenses;

    // --- NOI ---
    let noi = effective_gross_income - annual_operating_expenses;

    // --- Purchase & loan ---
    let down_payment = input.purchase_price * (input.down_payment_percentage / 100.0);
    let loan_amount = input.purchase_price - down_payment;
    let closing_costs = input.purchase_price * (input.closing_costs_percentage / 100.0);
    let total_cash_needed = down_payment + closing_costs;

    // --- Debt service ---
    let monthly_mortgage =
        mortgage::monthly_payment(loan_amount, input.interest_rate, input.loan_term);
    let annual_debt_service = monthly_mortgage * 12.0;

    // --- Year-1 KPIs ---
    let cash_flow = noi - annual_debt_service - capex;
    let cap_rate = noi / input.purchase_price * 100.0;
    let cash_on_cash_return = cash_flow / total_cash_needed * 100.0;

    // --- Pro-forma projection ---
    let rent_growth = 1.0 + input.rent_growth_percentage / 100.0;
    let expense_growth = 1.0 + input.expense_growth_percentage / 100.0;

    let mut yearly_projections = Vec::with_capacity(input.holding_period as usize);
    let mut cumulative_cash_flow = 0.0;
    let mut year_noi = noi;
    let mut year_cash_flow = cash_flow;

    for year in 1..=input.holding_period {
        if year > 1 {
            // Bases are recompounded from the year-1 values each pass, and
            // one further growth factor lands in the final multiply. The
            // capex reserve tracks the rent growth rate; debt service is
            // fixed for the life of the loan.
            let exponent = (year - 1) as i32;
            let base_egi = effective_gross_income * rent_growth.powi(exponent);
            let base_opex = annual_operating_expenses * expense_growth.powi(exponent);
            let base_capex = capex * rent_growth.powi(exponent);

            year_noi = base_egi * rent_growth - base_opex * expense_growth;
            year_cash_flow = year_noi - annual_debt_service - base_capex * rent_growth;
        }
        cumulative_cash_flow += year_cash_flow;
        yearly_projections.push(YearlyProjection {
            year,
            noi: year_noi,
            cash_flow: year_cash_flow,
            cumulative_cash_flow,
        });
    }

    // --- Exit ---
    let future_sale_price = input.purchase_price
        * (1.0 + input.appreciation_percentage / 100.0).powi(input.holding_period as i32);
    let remaining_loan_balance = mortgage::remaining_balance(
        loan_amount,
        input.interest_rate,
        input.loan_term,
        input.holding_period,
    );
    let sale_proceeds = future_sale_price - remaining_loan_balance;
    // Profit nets out the pre-sale equity baseline so principal paydown is
    // not counted twice: what remains is appreciation plus operating cash.
    let total_profit =
        cumulative_cash_flow + (sale_proceeds - (input.purchase_price - remaining_loan_balance));
    let total_equity = total_cash_needed + (loan_amount - remaining_loan_balance);
    let total_return_on_equity = total_profit / total_equity * 100.0;

    DealOutput {
        noi,
        cap_rate,
        cash_flow,
        cash_on_cash_return,
        loan_amount,
        down_payment,
        total_cash_needed,
        monthly_mortgage,
        annual_gross_rent,
        effective_gross_income,
        annual_operating_expenses,
        yearly_projections,
        total_profit,
        total_return_on_equity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// All-cash variant of the default deal; zero debt service makes the
    /// projection arithmetic easy to check by hand.
    fn all_cash_input() -> DealInput {
        DealInput {
            down_payment_percentage: 100.0,
            closing_costs_percentage: 0.0,
            ..DealInput::default()
        }
    }

    #[test]
    fn test_year_two_growth_applies_one_further_factor() {
        let out = calculate_deal_metrics(&all_cash_input());
        let y2 = &out.yearly_projections[1];

        // EGI base: 45600 * 1.03 = 46968; one more rent factor in the
        // multiply: 46968 * 1.03 = 48377.04
        // OpEx base: 14628 * 1.02 = 14920.56; * 1.02 = 15218.9712
        // NOI: 48377.04 - 15218.9712 = 33158.0688
        assert!((y2.noi - 33_158.068_8).abs() < 1e-6, "year-2 NOI {}", y2.noi);

        // Capex 2280 compounds at the rent rate: 2280 * 1.03^2 = 2418.852
        // Cash flow: 33158.0688 - 2418.852 = 30739.2168
        assert!(
            (y2.cash_flow - 30_739.216_8).abs() < 1e-6,
            "year-2 cash flow {}",
            y2.cash_flow
        );
    }

    #[test]
    fn test_debt_service_never_grows() {
        let input = DealInput {
            rent_growth_percentage: 0.0,
            expense_growth_percentage: 0.0,
            ..DealInput::default()
        };
        let out = calculate_deal_metrics(&input);
        // With flat growth every projected year repeats year 1 exactly.
        for p in &out.yearly_projections {
            assert!((p.cash_flow - out.cash_flow).abs() < 1e-9);
        }
    }
}
