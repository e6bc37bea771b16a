use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::domain::{
    Education, Gender, LoanApplication, LoanCategory, MaritalStatus, PropertyArea,
    SelfEmployment, DEFAULT_CREDIT_HISTORY,
};
use super::encoding::EncoderRegistry;
use super::features::{self, IncomeBracket};
use super::heuristic::{ApprovalHeuristicScorer, HeuristicOutcome};

#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("failed to read loan dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid loan dataset CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("loan dataset has no records")]
    Empty,
    #[error("column {0} has no values to impute missing entries from")]
    NoValuesToImpute(&'static str),
}

/// Historical applications read from a CSV export.
///
/// Two views are kept. `recorded` leaves blank loan amounts, terms, and credit histories
/// as NaN, which fails every threshold comparison; label synthesis scores this view.
/// `applications` fills the blanks and is what gets written and encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoanDataset {
    recorded: Vec<LoanApplication>,
    applications: Vec<LoanApplication>,
}

impl LoanDataset {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, DatasetError> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Empty loan amounts and terms take the column median; empty credit history is good.
    /// Empty co-applicant income is zero in both views.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut recorded = Vec::new();
        for row in csv_reader.deserialize::<LoanRow>() {
            recorded.push(LoanApplication::from(row?));
        }
        if recorded.is_empty() {
            return Err(DatasetError::Empty);
        }

        let amount_fill = median(recorded.iter().map(|app| app.loan_amount_php));
        let term_fill = median(recorded.iter().map(|app| app.loan_term_days));

        let mut applications = Vec::with_capacity(recorded.len());
        for app in &recorded {
            let mut filled = app.clone();
            if filled.loan_amount_php.is_nan() {
                filled.loan_amount_php =
                    amount_fill.ok_or(DatasetError::NoValuesToImpute("Loan_Amount_PHP"))?;
            }
            if filled.loan_term_days.is_nan() {
                filled.loan_term_days =
                    term_fill.ok_or(DatasetError::NoValuesToImpute("Loan_Term_Days"))?;
            }
            if filled.credit_history.is_nan() {
                filled.credit_history = DEFAULT_CREDIT_HISTORY;
            }
            applications.push(filled);
        }

        Ok(Self {
            recorded,
            applications,
        })
    }

    /// Records as read, blanks left as NaN.
    pub fn recorded(&self) -> &[LoanApplication] {
        &self.recorded
    }

    pub fn applications(&self) -> &[LoanApplication] {
        &self.applications
    }

    pub fn len(&self) -> usize {
        self.applications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applications.is_empty()
    }

    pub fn fit_encoders(&self) -> EncoderRegistry {
        EncoderRegistry::fit(&self.applications)
    }

    /// Scores every record as recorded, in file order, and pairs each label with the
    /// filled-in application.
    pub fn synthesize_labels(
        &self,
        scorer: &ApprovalHeuristicScorer,
        seed: u64,
    ) -> Vec<LabeledApplication> {
        let outcomes = scorer.label_all(&self.recorded, seed);
        let labeled: Vec<LabeledApplication> = self
            .applications
            .iter()
            .cloned()
            .zip(outcomes)
            .map(|(application, outcome)| LabeledApplication {
                application,
                outcome,
            })
            .collect();

        let approved = labeled.iter().filter(|record| record.outcome.approved).count();
        info!(
            records = labeled.len(),
            approved,
            rejected = labeled.len() - approved,
            seed,
            "synthetic labels generated"
        );

        labeled
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabeledApplication {
    pub application: LoanApplication,
    pub outcome: HeuristicOutcome,
}

/// Writes labelled records with their derived columns and a `Loan_Status` of 1 or 0.
pub fn write_labeled<W: Write>(
    writer: W,
    records: &[LabeledApplication],
) -> Result<(), DatasetError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(LabeledRow::from(record))?;
    }
    csv_writer.flush()?;
    Ok(())
}

fn median(values: impl Iterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.filter(|value| value.is_finite()).collect();
    if values.is_empty() {
        return None;
    }
    values.sort_by(f64::total_cmp);

    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

#[derive(Debug, Deserialize)]
struct LoanRow {
    #[serde(rename = "Gender")]
    gender: Gender,
    #[serde(rename = "Marital_Status")]
    marital_status: MaritalStatus,
    #[serde(rename = "Dependents")]
    dependents: String,
    #[serde(rename = "Education")]
    education: Education,
    #[serde(rename = "Self_Employed")]
    self_employed: SelfEmployment,
    #[serde(rename = "Applicant_Income_PHP")]
    applicant_income_php: f64,
    #[serde(rename = "Coapplicant_Income_PHP", default)]
    coapplicant_income_php: Option<f64>,
    #[serde(rename = "Loan_Amount_PHP", default)]
    loan_amount_php: Option<f64>,
    #[serde(rename = "Loan_Term_Days", default)]
    loan_term_days: Option<f64>,
    #[serde(rename = "Credit_History", default)]
    credit_history: Option<f64>,
    #[serde(rename = "Property_Area")]
    property_area: PropertyArea,
    #[serde(rename = "Loan_Category")]
    loan_category: LoanCategory,
}

impl From<LoanRow> for LoanApplication {
    fn from(row: LoanRow) -> Self {
        LoanApplication {
            gender: row.gender,
            marital_status: row.marital_status,
            dependents: row.dependents,
            education: row.education,
            self_employed: row.self_employed,
            applicant_income_php: row.applicant_income_php,
            coapplicant_income_php: row.coapplicant_income_php.unwrap_or(0.0),
            loan_amount_php: row.loan_amount_php.unwrap_or(f64::NAN),
            loan_term_days: row.loan_term_days.unwrap_or(f64::NAN),
            credit_history: row.credit_history.unwrap_or(f64::NAN),
            property_area: row.property_area,
            loan_category: row.loan_category,
        }
    }
}

#[derive(Debug, Serialize)]
struct LabeledRow<'a> {
    #[serde(rename = "Gender")]
    gender: &'a str,
    #[serde(rename = "Marital_Status")]
    marital_status: &'a str,
    #[serde(rename = "Dependents")]
    dependents: &'a str,
    #[serde(rename = "Education")]
    education: &'a str,
    #[serde(rename = "Self_Employed")]
    self_employed: &'a str,
    #[serde(rename = "Applicant_Income_PHP")]
    applicant_income_php: f64,
    #[serde(rename = "Coapplicant_Income_PHP")]
    coapplicant_income_php: f64,
    #[serde(rename = "Loan_Amount_PHP")]
    loan_amount_php: f64,
    #[serde(rename = "Loan_Term_Days")]
    loan_term_days: f64,
    #[serde(rename = "Credit_History")]
    credit_history: f64,
    #[serde(rename = "Property_Area")]
    property_area: &'a str,
    #[serde(rename = "Loan_Category")]
    loan_category: &'a str,
    #[serde(rename = "Total_Household_Income_PHP")]
    total_household_income_php: f64,
    #[serde(rename = "Loan_to_Income_Ratio")]
    loan_to_income_ratio: f64,
    #[serde(rename = "Income_Category")]
    income_category: IncomeBracket,
    #[serde(rename = "Loan_Status")]
    loan_status: u8,
}

impl<'a> From<&'a LabeledApplication> for LabeledRow<'a> {
    fn from(record: &'a LabeledApplication) -> Self {
        let application = &record.application;
        let derived = features::derive(application);

        LabeledRow {
            gender: application.gender.label(),
            marital_status: application.marital_status.label(),
            dependents: &application.dependents,
            education: application.education.label(),
            self_employed: application.self_employed.label(),
            applicant_income_php: application.applicant_income_php,
            coapplicant_income_php: application.coapplicant_income_php,
            loan_amount_php: application.loan_amount_php,
            loan_term_days: application.loan_term_days,
            credit_history: application.credit_history,
            property_area: application.property_area.label(),
            loan_category: application.loan_category.label(),
            total_household_income_php: derived.total_household_income,
            loan_to_income_ratio: derived.loan_to_income_ratio,
            income_category: derived.income_bracket,
            loan_status: u8::from(record.outcome.approved),
        }
    }
}
