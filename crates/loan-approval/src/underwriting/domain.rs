use std::fmt;

use serde::{Deserialize, Serialize};

use super::dependents::normalize_dependents;

pub const DEFAULT_LOAN_TERM_DAYS: f64 = 360.0;
pub const DEFAULT_CREDIT_HISTORY: f64 = 1.0;

/// String conversions shared by the categorical fields. Labels outside the known set
/// are kept verbatim in `Other` so they reach the encoders instead of failing to parse.
macro_rules! open_label {
    ($name:ident { $($variant:ident => $label:literal),+ $(,)? }) => {
        impl $name {
            pub fn label(&self) -> &str {
                match self {
                    $($name::$variant => $label,)+
                    $name::Other(raw) => raw,
                }
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                match value.as_str() {
                    $($label => $name::$variant,)+
                    _ => $name::Other(value),
                }
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::from(value.to_string())
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                match value {
                    $name::Other(raw) => raw,
                    known => known.label().to_string(),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gender {
    Male,
    Female,
    Other(String),
}

open_label!(Gender {
    Male => "Lalaki",
    Female => "Babae",
});

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum MaritalStatus {
    Married,
    Single,
    Other(String),
}

open_label!(MaritalStatus {
    Married => "Kasal",
    Single => "Single",
});

/// Highest completed schooling.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Education {
    HighSchoolVocational,
    CollegeGraduate,
    Other(String),
}

open_label!(Education {
    HighSchoolVocational => "High School/Vocational",
    CollegeGraduate => "College Graduate",
});

impl Education {
    pub fn is_higher_tier(&self) -> bool {
        matches!(self, Education::CollegeGraduate)
    }
}

/// Self-employment answer. `"Yes"` and `"No"` are the only values the rules credit;
/// anything else is neither employed nor self-employed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SelfEmployment {
    SelfEmployed,
    Employed,
    Other(String),
}

open_label!(SelfEmployment {
    SelfEmployed => "Yes",
    Employed => "No",
});

impl SelfEmployment {
    pub fn is_self_employed(&self) -> bool {
        matches!(self, SelfEmployment::SelfEmployed)
    }

    pub fn is_employed(&self) -> bool {
        matches!(self, SelfEmployment::Employed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PropertyArea {
    MetroManila,
    ProvincialCities,
    RuralProvinces,
    Other(String),
}

open_label!(PropertyArea {
    MetroManila => "Metro Manila",
    ProvincialCities => "Provincial Cities",
    RuralProvinces => "Rural Provinces",
});

/// Purpose of the loan. Unlisted purposes are carried verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LoanCategory {
    HousePurchase,
    HomeImprovement,
    Car,
    Motorcycle,
    PersonalLoan,
    EducationalLoan,
    MedicalLoan,
    BusinessLoan,
    Other(String),
}

open_label!(LoanCategory {
    HousePurchase => "House Purchase",
    HomeImprovement => "Home Improvement",
    Car => "Car",
    Motorcycle => "Motorcycle",
    PersonalLoan => "Personal Loan",
    EducationalLoan => "Educational Loan",
    MedicalLoan => "Medical Loan",
    BusinessLoan => "Business Loan",
});


/// Applicant and loan attributes submitted for a prediction. Amounts are in PHP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    pub gender: Gender,
    pub marital_status: MaritalStatus,
    pub dependents: String,
    pub education: Education,
    pub self_employed: SelfEmployment,
    pub applicant_income_php: f64,
    #[serde(default)]
    pub coapplicant_income_php: f64,
    pub loan_amount_php: f64,
    #[serde(default = "default_loan_term_days")]
    pub loan_term_days: f64,
    #[serde(default = "default_credit_history")]
    pub credit_history: f64,
    pub property_area: PropertyArea,
    pub loan_category: LoanCategory,
}

fn default_loan_term_days() -> f64 {
    DEFAULT_LOAN_TERM_DAYS
}

fn default_credit_history() -> f64 {
    DEFAULT_CREDIT_HISTORY
}

impl LoanApplication {
    pub fn has_good_credit(&self) -> bool {
        self.credit_history == 1.0
    }

    pub fn is_married(&self) -> bool {
        self.marital_status == MaritalStatus::Married
    }

    /// Checks the declared domain of every field a prediction depends on.
    pub fn validate(&self) -> Result<(), ValidationError> {
        normalize_dependents(&self.dependents)?;

        non_negative("applicant_income_php", self.applicant_income_php)?;
        non_negative("coapplicant_income_php", self.coapplicant_income_php)?;
        positive("loan_amount_php", self.loan_amount_php)?;
        positive("loan_term_days", self.loan_term_days)?;

        if self.credit_history != 0.0 && self.credit_history != 1.0 {
            return Err(ValidationError::InvalidCreditHistory {
                value: self.credit_history,
            });
        }

        Ok(())
    }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NegativeAmount { field, value })
    }
}

fn positive(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::NonPositive { field, value })
    }
}

/// Input outside the declared domain of a request field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("dependents must be one of \"0\", \"1\", \"2\" or \"3+\" (found {value:?})")]
    InvalidDependents { value: String },
    #[error("{field} must be a finite, non-negative amount (found {value})")]
    NegativeAmount { field: &'static str, value: f64 },
    #[error("{field} must be greater than zero (found {value})")]
    NonPositive { field: &'static str, value: f64 },
    #[error("credit_history must be 0.0 or 1.0 (found {value})")]
    InvalidCreditHistory { value: f64 },
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::InvalidDependents { .. } => "dependents",
            ValidationError::NegativeAmount { field, .. }
            | ValidationError::NonPositive { field, .. } => field,
            ValidationError::InvalidCreditHistory { .. } => "credit_history",
        }
    }
}
