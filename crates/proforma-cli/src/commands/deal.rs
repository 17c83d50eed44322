use clap::Args;
use serde_json::Value;

use proforma_core::deal::engine;
use proforma_core::deal::input::{DealInput, InputViolation};

use crate::input;

/// Arguments for full deal analysis. Flags default to the example deal, so
/// `proforma analyze --rent 3200` answers "what if the rent were different"
/// without spelling out the other seventeen parameters.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to a JSON or YAML input file (field flags are ignored when given)
    #[arg(long)]
    pub input: Option<String>,

    /// Contract purchase price
    #[arg(long)]
    pub purchase_price: Option<f64>,

    /// Closing costs, % of purchase price
    #[arg(long)]
    pub closing_costs: Option<f64>,

    /// Down payment, % of purchase price
    #[arg(long)]
    pub down_payment: Option<f64>,

    /// Annual interest rate, %
    #[arg(long)]
    pub interest_rate: Option<f64>,

    /// Loan term in years
    #[arg(long)]
    pub loan_term: Option<u32>,

    /// Gross monthly rent
    #[arg(long)]
    pub rent: Option<f64>,

    /// Other monthly income (parking, laundry, storage)
    #[arg(long)]
    pub other_income: Option<f64>,

    /// Annual property taxes
    #[arg(long)]
    pub taxes: Option<f64>,

    /// Annual insurance premium
    #[arg(long)]
    pub insurance: Option<f64>,

    /// Property management, % of effective gross income
    #[arg(long)]
    pub management: Option<f64>,

    /// Maintenance, % of effective gross income
    #[arg(long)]
    pub maintenance: Option<f64>,

    /// Capital expenditure reserve, % of effective gross income
    #[arg(long)]
    pub capex: Option<f64>,

    /// Other annual operating expenses
    #[arg(long)]
    pub other_expenses: Option<f64>,

    /// Vacancy and collection loss, %
    #[arg(long)]
    pub vacancy: Option<f64>,

    /// Annual rent growth, % (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub rent_growth: Option<f64>,

    /// Annual expense growth, % (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub expense_growth: Option<f64>,

    /// Annual price appreciation, % (may be negative)
    #[arg(long, allow_hyphen_values = true)]
    pub appreciation: Option<f64>,

    /// Holding period in years (1 to 50)
    #[arg(long)]
    pub holding_period: Option<u32>,
}

impl AnalyzeArgs {
    fn to_deal_input(&self) -> DealInput {
        let d = DealInput::default();
        DealInput {
            purchase_price: self.purchase_price.unwrap_or(d.purchase_price),
            closing_costs_percentage: self.closing_costs.unwrap_or(d.closing_costs_percentage),
            down_payment_percentage: self.down_payment.unwrap_or(d.down_payment_percentage),
            interest_rate: self.interest_rate.unwrap_or(d.interest_rate),
            loan_term: self.loan_term.unwrap_or(d.loan_term),
            gross_monthly_rent: self.rent.unwrap_or(d.gross_monthly_rent),
            other_monthly_income: self.other_income.unwrap_or(d.other_monthly_income),
            property_taxes: self.taxes.unwrap_or(d.property_taxes),
            insurance: self.insurance.unwrap_or(d.insurance),
            property_management_percentage: self
                .management
                .unwrap_or(d.property_management_percentage),
            maintenance_percentage: self.maintenance.unwrap_or(d.maintenance_percentage),
            capex_percentage: self.capex.unwrap_or(d.capex_percentage),
            other_expenses: self.other_expenses.unwrap_or(d.other_expenses),
            vacancy_percentage: self.vacancy.unwrap_or(d.vacancy_percentage),
            rent_growth_percentage: self.rent_growth.unwrap_or(d.rent_growth_percentage),
            expense_growth_percentage: self.expense_growth.unwrap_or(d.expense_growth_percentage),
            appreciation_percentage: self.appreciation.unwrap_or(d.appreciation_percentage),
            holding_period: self.holding_period.unwrap_or(d.holding_period),
        }
    }
}

/// Arguments for schema validation
#[derive(Args)]
pub struct ValidateArgs {
    /// Path to a JSON or YAML input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let deal_input: DealInput = if let Some(ref path) = args.input {
        let raw = input::read_file_value(path)?;
        DealInput::from_value(&raw).map_err(violations_error)?
    } else if let Some(raw) = input::read_stdin_value()? {
        DealInput::from_value(&raw).map_err(violations_error)?
    } else {
        let built = args.to_deal_input();
        built.validate().map_err(violations_error)?;
        built
    };

    let result = engine::analyze_deal(&deal_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_validate(args: ValidateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let raw: Value = if let Some(ref path) = args.input {
        input::read_file_value(path)?
    } else if let Some(raw) = input::read_stdin_value()? {
        raw
    } else {
        return Err("--input <file> or piped stdin required for validate".into());
    };

    let verdict = match DealInput::from_value(&raw) {
        Ok(_) => serde_json::json!({ "valid": true, "violations": [] }),
        Err(violations) => serde_json::json!({ "valid": false, "violations": violations }),
    };
    Ok(verdict)
}

/// Flatten violations into one readable error line per field.
fn violations_error(violations: Vec<InputViolation>) -> Box<dyn std::error::Error> {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
        .into()
}
