use std::collections::HashSet;

use super::dependents::normalize_dependents;
use super::domain::{LoanApplication, ValidationError};
use super::encoding::{CategoryField, EncoderRegistry};
use super::features::DerivedFeatures;

/// A column the classifier may be trained on, named as in the training table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    GenderEncoded,
    MaritalStatusEncoded,
    DependentsNumeric,
    EducationEncoded,
    SelfEmployedEncoded,
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanTermDays,
    CreditHistory,
    PropertyAreaEncoded,
    IncomeCategoryEncoded,
    LoanCategoryEncoded,
    TotalHouseholdIncome,
    LoanToIncomeRatio,
}

impl FeatureColumn {
    /// Training-time column order.
    pub const CANONICAL: [FeatureColumn; 15] = [
        FeatureColumn::GenderEncoded,
        FeatureColumn::MaritalStatusEncoded,
        FeatureColumn::DependentsNumeric,
        FeatureColumn::EducationEncoded,
        FeatureColumn::SelfEmployedEncoded,
        FeatureColumn::ApplicantIncome,
        FeatureColumn::CoapplicantIncome,
        FeatureColumn::LoanAmount,
        FeatureColumn::LoanTermDays,
        FeatureColumn::CreditHistory,
        FeatureColumn::PropertyAreaEncoded,
        FeatureColumn::IncomeCategoryEncoded,
        FeatureColumn::LoanCategoryEncoded,
        FeatureColumn::TotalHouseholdIncome,
        FeatureColumn::LoanToIncomeRatio,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            FeatureColumn::GenderEncoded => "Gender_encoded",
            FeatureColumn::MaritalStatusEncoded => "Marital_Status_encoded",
            FeatureColumn::DependentsNumeric => "Dependents_numeric",
            FeatureColumn::EducationEncoded => "Education_encoded",
            FeatureColumn::SelfEmployedEncoded => "Self_Employed_encoded",
            FeatureColumn::ApplicantIncome => "Applicant_Income_PHP",
            FeatureColumn::CoapplicantIncome => "Coapplicant_Income_PHP",
            FeatureColumn::LoanAmount => "Loan_Amount_PHP",
            FeatureColumn::LoanTermDays => "Loan_Term_Days",
            FeatureColumn::CreditHistory => "Credit_History",
            FeatureColumn::PropertyAreaEncoded => "Property_Area_encoded",
            FeatureColumn::IncomeCategoryEncoded => "Income_Category_encoded",
            FeatureColumn::LoanCategoryEncoded => "Loan_Category_encoded",
            FeatureColumn::TotalHouseholdIncome => "Total_Household_Income_PHP",
            FeatureColumn::LoanToIncomeRatio => "Loan_to_Income_Ratio",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::CANONICAL
            .into_iter()
            .find(|column| column.name() == name)
    }

    /// Categorical field behind an encoded column.
    pub const fn category(self) -> Option<CategoryField> {
        match self {
            FeatureColumn::GenderEncoded => Some(CategoryField::Gender),
            FeatureColumn::MaritalStatusEncoded => Some(CategoryField::MaritalStatus),
            FeatureColumn::EducationEncoded => Some(CategoryField::Education),
            FeatureColumn::SelfEmployedEncoded => Some(CategoryField::SelfEmployed),
            FeatureColumn::PropertyAreaEncoded => Some(CategoryField::PropertyArea),
            FeatureColumn::IncomeCategoryEncoded => Some(CategoryField::IncomeCategory),
            FeatureColumn::LoanCategoryEncoded => Some(CategoryField::LoanCategory),
            FeatureColumn::DependentsNumeric
            | FeatureColumn::ApplicantIncome
            | FeatureColumn::CoapplicantIncome
            | FeatureColumn::LoanAmount
            | FeatureColumn::LoanTermDays
            | FeatureColumn::CreditHistory
            | FeatureColumn::TotalHouseholdIncome
            | FeatureColumn::LoanToIncomeRatio => None,
        }
    }
}

/// Mismatch between a persisted column list and what this crate can produce.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("feature_columns is empty")]
    Empty,
    #[error("unknown feature column {0:?}")]
    UnknownColumn(String),
    #[error("feature column {0:?} listed more than once")]
    DuplicateColumn(String),
    #[error("column {column} needs a {field} vocabulary but the encoders have none")]
    MissingVocabulary {
        column: &'static str,
        field: &'static str,
    },
}

/// Ordered column list the classifier was trained on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    columns: Vec<FeatureColumn>,
}

impl FeatureSchema {
    pub fn canonical() -> Self {
        Self {
            columns: FeatureColumn::CANONICAL.to_vec(),
        }
    }

    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let column = FeatureColumn::from_name(name)
                .ok_or_else(|| SchemaError::UnknownColumn(name.to_string()))?;
            if !seen.insert(column) {
                return Err(SchemaError::DuplicateColumn(name.to_string()));
            }
            columns.push(column);
        }

        Ok(Self { columns })
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|column| column.name()).collect()
    }

    /// Every encoded column must have a vocabulary to look values up in.
    pub fn check_vocabularies(&self, encoders: &EncoderRegistry) -> Result<(), SchemaError> {
        for column in &self.columns {
            if let Some(field) = column.category() {
                if encoders.vocabulary(field).is_none() {
                    return Err(SchemaError::MissingVocabulary {
                        column: column.name(),
                        field: field.name(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn build(
        &self,
        application: &LoanApplication,
        derived: &DerivedFeatures,
        encoders: &EncoderRegistry,
    ) -> Result<FeatureVector, ValidationError> {
        let encode = |field: CategoryField| {
            f64::from(encoders.encode(field, field.value_of(application, derived)))
        };
        let mut values = Vec::with_capacity(self.columns.len());

        for column in &self.columns {
            let value = match column {
                FeatureColumn::GenderEncoded => encode(CategoryField::Gender),
                FeatureColumn::MaritalStatusEncoded => encode(CategoryField::MaritalStatus),
                FeatureColumn::EducationEncoded => encode(CategoryField::Education),
                FeatureColumn::SelfEmployedEncoded => encode(CategoryField::SelfEmployed),
                FeatureColumn::PropertyAreaEncoded => encode(CategoryField::PropertyArea),
                FeatureColumn::IncomeCategoryEncoded => encode(CategoryField::IncomeCategory),
                FeatureColumn::LoanCategoryEncoded => encode(CategoryField::LoanCategory),
                FeatureColumn::DependentsNumeric => {
                    f64::from(normalize_dependents(&application.dependents)?)
                }
                FeatureColumn::ApplicantIncome => application.applicant_income_php,
                FeatureColumn::CoapplicantIncome => application.coapplicant_income_php,
                FeatureColumn::LoanAmount => application.loan_amount_php,
                FeatureColumn::LoanTermDays => application.loan_term_days,
                FeatureColumn::CreditHistory => application.credit_history,
                FeatureColumn::TotalHouseholdIncome => derived.total_household_income,
                FeatureColumn::LoanToIncomeRatio => derived.loan_to_income_ratio,
            };
            values.push(value);
        }

        Ok(FeatureVector { values })
    }
}

/// Numeric row handed to the classifier, in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self { values }
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
