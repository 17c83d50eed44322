use clap::Args;
use serde::Serialize;
use serde_json::Value;

use proforma_core::deal::mortgage;

/// Arguments for an amortization balance query
#[derive(Args)]
pub struct LoanBalanceArgs {
    /// Original loan principal
    #[arg(long)]
    pub principal: f64,

    /// Annual interest rate, %
    #[arg(long)]
    pub rate: f64,

    /// Amortization term in years
    #[arg(long)]
    pub term: u32,

    /// Whole years of payments already made
    #[arg(long)]
    pub years: u32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoanBalanceOutput {
    monthly_payment: f64,
    annual_debt_service: f64,
    remaining_balance: f64,
    principal_paid: f64,
}

pub fn run_loan_balance(args: LoanBalanceArgs) -> Result<Value, Box<dyn std::error::Error>> {
    if args.term == 0 {
        return Err("--term must be at least 1 year".into());
    }
    if !(0.0..=100.0).contains(&args.rate) {
        return Err("--rate must be between 0 and 100".into());
    }

    let monthly_payment = mortgage::monthly_payment(args.principal, args.rate, args.term);
    let remaining_balance =
        mortgage::remaining_balance(args.principal, args.rate, args.term, args.years);

    let result = LoanBalanceOutput {
        monthly_payment,
        annual_debt_service: monthly_payment * 12.0,
        remaining_balance,
        principal_paid: (args.principal - remaining_balance).max(0.0),
    };
    Ok(serde_json::json!({ "result": result }))
}
