use std::sync::Arc;

use axum::body::to_bytes;
use axum::response::Response;
use serde_json::Value;

use crate::underwriting::classifier::{Classifier, ClassifierError};
use crate::underwriting::domain::{
    Education, Gender, LoanApplication, LoanCategory, MaritalStatus, PropertyArea,
    SelfEmployment,
};
use crate::underwriting::encoding::{CategoryField, EncoderRegistry};
use crate::underwriting::service::{PredictionService, ScoringContext};
use crate::underwriting::vector::{FeatureSchema, FeatureVector};

/// Married college graduate buying a house with a working co-applicant.
pub(super) fn application() -> LoanApplication {
    LoanApplication {
        gender: Gender::Male,
        marital_status: MaritalStatus::Married,
        dependents: "2".to_string(),
        education: Education::CollegeGraduate,
        self_employed: SelfEmployment::Employed,
        applicant_income_php: 800_000.0,
        coapplicant_income_php: 300_000.0,
        loan_amount_php: 1_500_000.0,
        loan_term_days: 360.0,
        credit_history: 1.0,
        property_area: PropertyArea::MetroManila,
        loan_category: LoanCategory::HousePurchase,
    }
}

/// Self-employed applicant with bad credit and a stretched loan.
pub(super) fn struggling_application() -> LoanApplication {
    LoanApplication {
        gender: Gender::Female,
        marital_status: MaritalStatus::Single,
        dependents: "0".to_string(),
        education: Education::HighSchoolVocational,
        self_employed: SelfEmployment::SelfEmployed,
        applicant_income_php: 250_000.0,
        coapplicant_income_php: 0.0,
        loan_amount_php: 800_000.0,
        loan_term_days: 360.0,
        credit_history: 0.0,
        property_area: PropertyArea::RuralProvinces,
        loan_category: LoanCategory::Motorcycle,
    }
}

/// Vocabularies in the sorted order a label encoder produces.
pub(super) fn registry() -> EncoderRegistry {
    EncoderRegistry::new()
        .with_vocabulary(CategoryField::Gender, ["Babae", "Lalaki"])
        .with_vocabulary(CategoryField::MaritalStatus, ["Kasal", "Single"])
        .with_vocabulary(
            CategoryField::Education,
            ["College Graduate", "High School/Vocational"],
        )
        .with_vocabulary(CategoryField::SelfEmployed, ["No", "Yes"])
        .with_vocabulary(
            CategoryField::PropertyArea,
            ["Metro Manila", "Provincial Cities", "Rural Provinces"],
        )
        .with_vocabulary(
            CategoryField::IncomeCategory,
            [
                "Lower Middle (Class C-)",
                "Middle Class (Class C)",
                "Upper Middle (Class B)",
            ],
        )
        .with_vocabulary(
            CategoryField::LoanCategory,
            [
                "Business Loan",
                "Car",
                "Educational Loan",
                "Home Improvement",
                "House Purchase",
                "Medical Loan",
                "Motorcycle",
                "Personal Loan",
            ],
        )
}

/// Classifier stub returning a fixed answer for every vector.
pub(super) struct FixedClassifier {
    pub(super) approved: bool,
    pub(super) probability: f64,
}

impl Classifier for FixedClassifier {
    fn model_type(&self) -> &str {
        "Fixed Stub"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<bool, ClassifierError> {
        Ok(self.approved)
    }

    fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ClassifierError> {
        Ok(self.probability)
    }
}

pub(super) struct FailingClassifier;

impl Classifier for FailingClassifier {
    fn model_type(&self) -> &str {
        "Failing Stub"
    }

    fn predict(&self, _features: &FeatureVector) -> Result<bool, ClassifierError> {
        Err(ClassifierError::Backend("model file truncated".to_string()))
    }

    fn predict_proba(&self, _features: &FeatureVector) -> Result<f64, ClassifierError> {
        Err(ClassifierError::Backend("model file truncated".to_string()))
    }
}

pub(super) fn context_with(classifier: Arc<dyn Classifier>) -> Arc<ScoringContext> {
    let context = ScoringContext::new(FeatureSchema::canonical(), registry(), classifier)
        .expect("canonical schema is served by the test registry");
    Arc::new(context.with_version("test"))
}

pub(super) fn service_with_probability(probability: f64) -> PredictionService {
    PredictionService::new(context_with(Arc::new(FixedClassifier {
        approved: probability >= 0.5,
        probability,
    })))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    serde_json::from_slice(&bytes).expect("valid json body")
}

pub(super) fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
