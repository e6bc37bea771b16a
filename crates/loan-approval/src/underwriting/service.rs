use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::artifact::ArtifactError;
use super::classifier::{Classifier, ClassifierError};
use super::domain::{LoanApplication, ValidationError};
use super::encoding::EncoderRegistry;
use super::features::{self, DerivedFeatures};
use super::recommendations::RecommendationEngine;
use super::vector::{FeatureSchema, FeatureVector};

pub const LOW_RISK_FLOOR: f64 = 0.8;
pub const MEDIUM_RISK_FLOOR: f64 = 0.6;

/// Immutable state built once at startup and shared read-only by every request.
pub struct ScoringContext {
    version: String,
    schema: FeatureSchema,
    encoders: EncoderRegistry,
    classifier: Arc<dyn Classifier>,
}

impl ScoringContext {
    /// Rejects schemas the encoders or the classifier cannot serve.
    pub fn new(
        schema: FeatureSchema,
        encoders: EncoderRegistry,
        classifier: Arc<dyn Classifier>,
    ) -> Result<Self, ArtifactError> {
        schema.check_vocabularies(&encoders)?;

        if let Some(width) = classifier.input_width() {
            if width != schema.len() {
                return Err(ArtifactError::ArityMismatch {
                    columns: schema.len(),
                    model: width,
                });
            }
        }

        Ok(Self {
            version: "unversioned".to_string(),
            schema,
            encoders,
            classifier,
        })
    }

    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn encoders(&self) -> &EncoderRegistry {
        &self.encoders
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn feature_vector(
        &self,
        application: &LoanApplication,
        derived: &DerivedFeatures,
    ) -> Result<FeatureVector, ValidationError> {
        self.schema.build(application, derived, &self.encoders)
    }

    pub fn model_info(&self) -> ModelInfo {
        let feature_names = self
            .schema
            .names()
            .into_iter()
            .map(str::to_string)
            .collect::<Vec<_>>();

        ModelInfo {
            model_type: self.classifier.model_type().to_string(),
            version: self.version.clone(),
            features_count: feature_names.len(),
            feature_names,
        }
    }
}

/// Metadata surface describing the loaded model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub model_type: String,
    pub version: String,
    pub features_count: usize,
    pub feature_names: Vec<String>,
}

/// Risk band derived from the approval probability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskTier {
    #[serde(rename = "Low Risk")]
    Low,
    #[serde(rename = "Medium Risk")]
    Medium,
    #[serde(rename = "High Risk")]
    High,
}

impl RiskTier {
    pub fn from_probability(probability: f64) -> Self {
        if probability >= LOW_RISK_FLOOR {
            RiskTier::Low
        } else if probability >= MEDIUM_RISK_FLOOR {
            RiskTier::Medium
        } else {
            RiskTier::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTier::Low => "Low Risk",
            RiskTier::Medium => "Medium Risk",
            RiskTier::High => "High Risk",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub loan_approved: bool,
    pub approval_probability: f64,
    pub risk_level: RiskTier,
    pub recommendations: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("prediction error: {0}")]
    Classifier(#[from] ClassifierError),
}

/// Builds feature vectors, consults the classifier, and explains the result.
pub struct PredictionService {
    context: Arc<ScoringContext>,
    recommendations: RecommendationEngine,
}

impl PredictionService {
    pub fn new(context: Arc<ScoringContext>) -> Self {
        Self {
            context,
            recommendations: RecommendationEngine::new(),
        }
    }

    pub fn context(&self) -> &ScoringContext {
        &self.context
    }

    pub fn predict(
        &self,
        application: &LoanApplication,
    ) -> Result<PredictionResult, PredictionError> {
        application.validate()?;

        let derived = features::derive(application);
        let vector = self.context.feature_vector(application, &derived)?;

        let classifier = self.context.classifier();
        let loan_approved = classifier.predict(&vector)?;
        let approval_probability = classifier.predict_proba(&vector)?;
        if !(0.0..=1.0).contains(&approval_probability) {
            return Err(ClassifierError::InvalidProbability(approval_probability).into());
        }

        let risk_level = RiskTier::from_probability(approval_probability);
        let recommendations = self
            .recommendations
            .recommend(application, approval_probability);

        debug!(
            loan_category = application.loan_category.label(),
            income_bracket = derived.income_bracket.short_label(),
            loan_to_income = derived.loan_to_income_ratio,
            approval_probability,
            risk_level = risk_level.label(),
            "prediction complete"
        );

        Ok(PredictionResult {
            loan_approved,
            approval_probability,
            risk_level,
            recommendations,
        })
    }
}
