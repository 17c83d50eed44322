use pretty_assertions::assert_eq;

use proforma_core::deal::engine::{analyze_deal, calculate_deal_metrics};
use proforma_core::deal::input::DealInput;

const TOL: f64 = 1e-6;

fn assert_close(actual: f64, expected: f64, label: &str) {
    assert!(
        (actual - expected).abs() < TOL,
        "{label}: expected {expected}, got {actual}"
    );
}

// ===========================================================================
// Baseline deal (the documented default record)
// ===========================================================================

#[test]
fn test_baseline_income_and_expense_rollup() {
    let out = calculate_deal_metrics(&DealInput::default());

    // Gross: 4000 * 12 = 48000; vacancy 5% = 2400; EGI = 45600
    assert_close(out.annual_gross_rent, 48_000.0, "annual gross rent");
    assert_close(out.effective_gross_income, 45_600.0, "EGI");

    // OpEx: 6000 + 1500 + 45600*0.08 + 45600*0.05 + 1200
    //     = 6000 + 1500 + 3648 + 2280 + 1200 = 14628
    assert_close(out.annual_operating_expenses, 14_628.0, "operating expenses");

    // NOI = 45600 - 14628 = 30972; cap rate = 30972/500000 = 6.1944%
    assert_close(out.noi, 30_972.0, "NOI");
    assert_close(out.cap_rate, 6.1944, "cap rate");
}

#[test]
fn test_baseline_financing() {
    let out = calculate_deal_metrics(&DealInput::default());

    assert_close(out.down_payment, 100_000.0, "down payment");
    assert_close(out.loan_amount, 400_000.0, "loan amount");
    // 100000 down + 15000 closing (3%)
    assert_close(out.total_cash_needed, 115_000.0, "total cash needed");

    // $400k at 6.5% over 30 years amortizes at ~$2,528.27/month
    assert!(
        out.monthly_mortgage > 2_528.0 && out.monthly_mortgage < 2_529.0,
        "monthly mortgage ~2528, got {}",
        out.monthly_mortgage
    );

    // Debt service plus the capex reserve outruns NOI on the default deal
    assert!(out.cash_flow < 0.0, "expected negative year-1 cash flow");
    assert!(
        out.cash_on_cash_return < 0.0 && out.cash_on_cash_return > -3.0,
        "cash-on-cash ~-1.4%, got {}",
        out.cash_on_cash_return
    );
}

#[test]
fn test_deterministic_output() {
    let input = DealInput::default();
    let a = calculate_deal_metrics(&input);
    let b = calculate_deal_metrics(&input);
    assert_eq!(a, b);
}

// ===========================================================================
// Projection properties
// ===========================================================================

#[test]
fn test_projection_length_and_year_indexing() {
    for holding_period in [1u32, 7, 50] {
        let input = DealInput {
            holding_period,
            ..DealInput::default()
        };
        let out = calculate_deal_metrics(&input);
        assert_eq!(out.yearly_projections.len(), holding_period as usize);
        for (i, p) in out.yearly_projections.iter().enumerate() {
            assert_eq!(p.year, i as u32 + 1);
        }
    }
}

#[test]
fn test_cumulative_cash_flow_is_running_sum() {
    let out = calculate_deal_metrics(&DealInput::default());
    let mut running = 0.0;
    for p in &out.yearly_projections {
        running += p.cash_flow;
        assert_close(p.cumulative_cash_flow, running, "cumulative cash flow");
    }
}

#[test]
fn test_first_projection_year_matches_headline_metrics() {
    let out = calculate_deal_metrics(&DealInput::default());
    let y1 = &out.yearly_projections[0];
    assert_close(y1.noi, out.noi, "year-1 NOI");
    assert_close(y1.cash_flow, out.cash_flow, "year-1 cash flow");
}

#[test]
fn test_total_profit_is_cash_flow_plus_appreciation() {
    // The exit arithmetic nets the loan balance out of both sale proceeds
    // and the equity baseline, so profit reduces to
    // cumulative cash flow + (future sale price - purchase price).
    let input = DealInput::default();
    let out = calculate_deal_metrics(&input);
    let future_sale_price = input.purchase_price
        * (1.0 + input.appreciation_percentage / 100.0).powi(input.holding_period as i32);
    let expected = out.yearly_projections.last().unwrap().cumulative_cash_flow
        + (future_sale_price - input.purchase_price);
    assert!(
        (out.total_profit - expected).abs() < 1e-6,
        "total profit {} vs {}",
        out.total_profit,
        expected
    );
}

#[test]
fn test_appreciation_strictly_increases_profit() {
    let mut prev = f64::NEG_INFINITY;
    for appreciation in [0.0, 2.0, 4.0, 6.0] {
        let input = DealInput {
            appreciation_percentage: appreciation,
            ..DealInput::default()
        };
        let out = calculate_deal_metrics(&input);
        assert!(
            out.total_profit > prev,
            "profit not increasing at {appreciation}% appreciation"
        );
        prev = out.total_profit;
    }
}

// ===========================================================================
// Financing edge cases
// ===========================================================================

#[test]
fn test_zero_interest_loan_is_straight_line() {
    let input = DealInput {
        interest_rate: 0.0,
        ..DealInput::default()
    };
    let out = calculate_deal_metrics(&input);
    assert_eq!(out.monthly_mortgage, 400_000.0 / 360.0);
}

#[test]
fn test_all_cash_purchase_has_no_debt() {
    let input = DealInput {
        down_payment_percentage: 100.0,
        ..DealInput::default()
    };
    let out = calculate_deal_metrics(&input);

    assert_eq!(out.loan_amount, 0.0);
    assert_eq!(out.monthly_mortgage, 0.0);
    // Cash flow is NOI less the capex reserve only: 30972 - 2280
    assert_close(out.cash_flow, 28_692.0, "all-cash cash flow");
    // Equity at exit is all cash in; return stays finite
    assert!(out.total_return_on_equity.is_finite());
}

#[test]
fn test_no_cash_invested_propagates_non_finite_return() {
    let input = DealInput {
        down_payment_percentage: 0.0,
        closing_costs_percentage: 0.0,
        ..DealInput::default()
    };
    let out = calculate_deal_metrics(&input);

    // The ratio is left as its IEEE-754 limit, not masked
    assert_eq!(out.total_cash_needed, 0.0);
    assert!(out.cash_on_cash_return.is_infinite());

    // The record is still structurally complete
    assert_eq!(out.yearly_projections.len(), 10);
    assert!(out.noi.is_finite());
    assert!(out.monthly_mortgage.is_finite());
    assert!(out.total_profit.is_finite());
}

// ===========================================================================
// Envelope & warnings
// ===========================================================================

#[test]
fn test_analyze_wraps_metrics_with_metadata() {
    let result = analyze_deal(&DealInput::default()).unwrap();
    assert_eq!(result.metadata.precision, "ieee754_f64");
    assert!(!result.methodology.is_empty());
    // The default deal runs cash-flow negative; that surfaces as a warning
    assert!(
        result.warnings.iter().any(|w| w.contains("cash flow")),
        "expected a negative cash-flow warning, got {:?}",
        result.warnings
    );
}

#[test]
fn test_analyze_warns_on_non_finite_ratio() {
    let input = DealInput {
        down_payment_percentage: 0.0,
        closing_costs_percentage: 0.0,
        ..DealInput::default()
    };
    let result = analyze_deal(&input).unwrap();
    assert!(result
        .warnings
        .iter()
        .any(|w| w.contains("cash-on-cash")));
}

#[test]
fn test_analyze_rejects_invalid_input() {
    let input = DealInput {
        purchase_price: -1.0,
        ..DealInput::default()
    };
    assert!(analyze_deal(&input).is_err());
}

// ===========================================================================
// Wire format
// ===========================================================================

#[test]
fn test_records_serialize_in_camel_case() {
    let input_json = serde_json::to_value(DealInput::default()).unwrap();
    assert!(input_json.get("purchasePrice").is_some());
    assert!(input_json.get("grossMonthlyRent").is_some());
    assert!(input_json.get("holdingPeriod").is_some());

    let out = calculate_deal_metrics(&DealInput::default());
    let out_json = serde_json::to_value(&out).unwrap();
    assert!(out_json.get("cashOnCashReturn").is_some());
    assert!(out_json.get("totalReturnOnEquity").is_some());
    let projections = out_json.get("yearlyProjections").unwrap();
    assert!(projections[0].get("cumulativeCashFlow").is_some());
}
