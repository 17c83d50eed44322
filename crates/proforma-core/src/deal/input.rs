use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProformaError;
use crate::types::{Money, Percent};
use crate::ProformaResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Complete parameter set for a rental property acquisition.
///
/// Percentages are whole numbers as entered on a form (6.5 = 6.5%); the
/// engine divides by 100 at the point of use. Fields serialize in camelCase
/// because this record is the wire format shared with the JavaScript front
/// end.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DealInput {
    /// Contract purchase price
    pub purchase_price: Money,
    /// Closing costs as a share of purchase price
    pub closing_costs_percentage: Percent,
    /// Down payment as a share of purchase price
    pub down_payment_percentage: Percent,
    /// Annual note rate on the mortgage
    pub interest_rate: Percent,
    /// Amortization term in years
    pub loan_term: u32,
    pub gross_monthly_rent: Money,
    /// Parking, laundry, storage and similar income per month
    pub other_monthly_income: Money,
    /// Annual property taxes
    pub property_taxes: Money,
    /// Annual insurance premium
    pub insurance: Money,
    pub property_management_percentage: Percent,
    pub maintenance_percentage: Percent,
    /// Capital expenditure reserve as a share of effective gross income
    pub capex_percentage: Percent,
    /// Other annual operating expenses, entered as a flat amount
    pub other_expenses: Money,
    pub vacancy_percentage: Percent,
    pub rent_growth_percentage: Percent,
    pub expense_growth_percentage: Percent,
    pub appreciation_percentage: Percent,
    /// Projection horizon in years (1 to 50)
    pub holding_period: u32,
}

/// The documented example deal: a $500k single-family rental at 80% LTV,
/// used to seed input forms and CLI flag defaults.
impl Default for DealInput {
    fn default() -> Self {
        DealInput {
            purchase_price: 500_000.0,
            closing_costs_percentage: 3.0,
            down_payment_percentage: 20.0,
            interest_rate: 6.5,
            loan_term: 30,
            gross_monthly_rent: 4_000.0,
            other_monthly_income: 0.0,
            property_taxes: 6_000.0,
            insurance: 1_500.0,
            property_management_percentage: 8.0,
            maintenance_percentage: 5.0,
            capex_percentage: 5.0,
            other_expenses: 1_200.0,
            vacancy_percentage: 5.0,
            rent_growth_percentage: 3.0,
            expense_growth_percentage: 2.0,
            appreciation_percentage: 4.0,
            holding_period: 10,
        }
    }
}

/// A single failed input constraint. `field` carries the camelCase wire name
/// so violations can be attached to form fields on the JavaScript side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputViolation {
    pub field: String,
    pub reason: String,
}

impl fmt::Display for InputViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} — {}", self.field, self.reason)
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

impl DealInput {
    /// Check every schema constraint and report all violations at once.
    ///
    /// Rejection, not clamping: an out-of-range value is never silently
    /// adjusted, and the engine must not run on a rejected input. Total
    /// function: never panics, for any bit pattern in any field.
    pub fn validate(&self) -> Result<(), Vec<InputViolation>> {
        let mut violations = Vec::new();

        check_positive(&mut violations, "purchasePrice", self.purchase_price);
        check_percent(
            &mut violations,
            "closingCostsPercentage",
            self.closing_costs_percentage,
        );
        check_percent(
            &mut violations,
            "downPaymentPercentage",
            self.down_payment_percentage,
        );
        check_percent(&mut violations, "interestRate", self.interest_rate);
        if self.loan_term == 0 {
            push(&mut violations, "loanTerm", "must be at least 1 year");
        }
        check_positive(&mut violations, "grossMonthlyRent", self.gross_monthly_rent);
        check_non_negative(
            &mut violations,
            "otherMonthlyIncome",
            self.other_monthly_income,
        );
        check_non_negative(&mut violations, "propertyTaxes", self.property_taxes);
        check_non_negative(&mut violations, "insurance", self.insurance);
        check_percent(
            &mut violations,
            "propertyManagementPercentage",
            self.property_management_percentage,
        );
        check_percent(
            &mut violations,
            "maintenancePercentage",
            self.maintenance_percentage,
        );
        check_percent(&mut violations, "capexPercentage", self.capex_percentage);
        check_non_negative(&mut violations, "otherExpenses", self.other_expenses);
        check_percent(&mut violations, "vacancyPercentage", self.vacancy_percentage);
        check_signed_percent(
            &mut violations,
            "rentGrowthPercentage",
            self.rent_growth_percentage,
        );
        check_signed_percent(
            &mut violations,
            "expenseGrowthPercentage",
            self.expense_growth_percentage,
        );
        check_signed_percent(
            &mut violations,
            "appreciationPercentage",
            self.appreciation_percentage,
        );
        if !(1..=50).contains(&self.holding_period) {
            push(
                &mut violations,
                "holdingPeriod",
                "must be between 1 and 50 years",
            );
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }

    /// Build a validated input from a raw, untyped JSON value.
    ///
    /// Presence and type problems are reported per field in a single pass
    /// (serde deserialization would stop at the first), then the range
    /// checks of [`DealInput::validate`] run on the assembled record.
    pub fn from_value(value: &Value) -> Result<DealInput, Vec<InputViolation>> {
        let Some(map) = value.as_object() else {
            return Err(vec![InputViolation {
                field: "(root)".into(),
                reason: "expected a JSON object".into(),
            }]);
        };

        let mut violations = Vec::new();

        let input = DealInput {
            purchase_price: number_field(map, "purchasePrice", &mut violations),
            closing_costs_percentage: number_field(map, "closingCostsPercentage", &mut violations),
            down_payment_percentage: number_field(map, "downPaymentPercentage", &mut violations),
            interest_rate: number_field(map, "interestRate", &mut violations),
            loan_term: integer_field(map, "loanTerm", &mut violations),
            gross_monthly_rent: number_field(map, "grossMonthlyRent", &mut violations),
            other_monthly_income: number_field(map, "otherMonthlyIncome", &mut violations),
            property_taxes: number_field(map, "propertyTaxes", &mut violations),
            insurance: number_field(map, "insurance", &mut violations),
            property_management_percentage: number_field(
                map,
                "propertyManagementPercentage",
                &mut violations,
            ),
            maintenance_percentage: number_field(map, "maintenancePercentage", &mut violations),
            capex_percentage: number_field(map, "capexPercentage", &mut violations),
            other_expenses: number_field(map, "otherExpenses", &mut violations),
            vacancy_percentage: number_field(map, "vacancyPercentage", &mut violations),
            rent_growth_percentage: number_field(map, "rentGrowthPercentage", &mut violations),
            expense_growth_percentage: number_field(
                map,
                "expenseGrowthPercentage",
                &mut violations,
            ),
            appreciation_percentage: number_field(map, "appreciationPercentage", &mut violations),
            holding_period: integer_field(map, "holdingPeriod", &mut violations),
        };

        // Range checks only make sense on a structurally complete record.
        if !violations.is_empty() {
            return Err(violations);
        }

        input.validate()?;
        Ok(input)
    }

    /// Parse and validate a JSON string in one step.
    pub fn from_json_str(s: &str) -> ProformaResult<DealInput> {
        let value: Value = serde_json::from_str(s)?;
        DealInput::from_value(&value).map_err(ProformaError::Validation)
    }
}

fn push(violations: &mut Vec<InputViolation>, field: &str, reason: &str) {
    violations.push(InputViolation {
        field: field.to_string(),
        reason: reason.to_string(),
    });
}

fn check_positive(violations: &mut Vec<InputViolation>, field: &str, value: f64) {
    if !value.is_finite() {
        push(violations, field, "must be a finite number");
    } else if value <= 0.0 {
        push(violations, field, "must be positive");
    }
}

fn check_non_negative(violations: &mut Vec<InputViolation>, field: &str, value: f64) {
    if !value.is_finite() {
        push(violations, field, "must be a finite number");
    } else if value < 0.0 {
        push(violations, field, "must not be negative");
    }
}

fn check_percent(violations: &mut Vec<InputViolation>, field: &str, value: f64) {
    if !value.is_finite() {
        push(violations, field, "must be a finite number");
    } else if !(0.0..=100.0).contains(&value) {
        push(violations, field, "must be between 0 and 100");
    }
}

fn check_signed_percent(violations: &mut Vec<InputViolation>, field: &str, value: f64) {
    if !value.is_finite() {
        push(violations, field, "must be a finite number");
    } else if !(-100.0..=100.0).contains(&value) {
        push(violations, field, "must be between -100 and 100");
    }
}

/// Extract a numeric field, recording a violation (and returning a NaN
/// placeholder) when it is missing or not a number.
fn number_field(
    map: &serde_json::Map<String, Value>,
    key: &str,
    violations: &mut Vec<InputViolation>,
) -> f64 {
    match map.get(key) {
        None => {
            push(violations, key, "required field is missing");
            f64::NAN
        }
        Some(v) => match v.as_f64() {
            Some(n) => n,
            None => {
                push(violations, key, "must be a number");
                f64::NAN
            }
        },
    }
}

/// Extract a whole-year field; fractional or negative values are rejected.
fn integer_field(
    map: &serde_json::Map<String, Value>,
    key: &str,
    violations: &mut Vec<InputViolation>,
) -> u32 {
    match map.get(key) {
        None => {
            push(violations, key, "required field is missing");
            0
        }
        Some(v) => match v.as_u64().and_then(|n| u32::try_from(n).ok()) {
            Some(n) => n,
            None => {
                push(violations, key, "must be a non-negative integer");
                0
            }
        },
    }
}
