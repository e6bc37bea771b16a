use serde::{Deserialize, Serialize};

use super::domain::LoanApplication;

/// Household income (PHP) at which the upper-middle bracket starts.
pub const UPPER_MIDDLE_FLOOR: f64 = 1_000_000.0;
/// Household income (PHP) at which the middle-class bracket starts.
pub const MIDDLE_CLASS_FLOOR: f64 = 500_000.0;

/// Household income bracket, ordered from lowest to highest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IncomeBracket {
    #[serde(rename = "Lower Middle (Class C-)")]
    LowerMiddle,
    #[serde(rename = "Middle Class (Class C)")]
    MiddleClass,
    #[serde(rename = "Upper Middle (Class B)")]
    UpperMiddle,
}

impl IncomeBracket {
    /// Lower bounds are inclusive.
    pub fn from_total_income(total_household_income: f64) -> Self {
        if total_household_income >= UPPER_MIDDLE_FLOOR {
            IncomeBracket::UpperMiddle
        } else if total_household_income >= MIDDLE_CLASS_FLOOR {
            IncomeBracket::MiddleClass
        } else {
            IncomeBracket::LowerMiddle
        }
    }

    /// Vocabulary label used by the income category encoder.
    pub const fn label(self) -> &'static str {
        match self {
            IncomeBracket::LowerMiddle => "Lower Middle (Class C-)",
            IncomeBracket::MiddleClass => "Middle Class (Class C)",
            IncomeBracket::UpperMiddle => "Upper Middle (Class B)",
        }
    }

    pub const fn short_label(self) -> &'static str {
        match self {
            IncomeBracket::LowerMiddle => "Lower Middle",
            IncomeBracket::MiddleClass => "Middle Class",
            IncomeBracket::UpperMiddle => "Upper Middle",
        }
    }
}

/// Values computed from a single application before encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedFeatures {
    pub total_household_income: f64,
    pub loan_to_income_ratio: f64,
    pub income_bracket: IncomeBracket,
}

/// Derives household totals for an application. A household with no income gets a
/// loan-to-income ratio of 0 rather than an error.
pub fn derive(application: &LoanApplication) -> DerivedFeatures {
    let total_household_income =
        application.applicant_income_php + application.coapplicant_income_php;

    let loan_to_income_ratio = if total_household_income > 0.0 {
        application.loan_amount_php / total_household_income
    } else {
        0.0
    };

    DerivedFeatures {
        total_household_income,
        loan_to_income_ratio,
        income_bracket: IncomeBracket::from_total_income(total_household_income),
    }
}
