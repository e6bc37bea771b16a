//! Loan approval scoring: feature derivation, categorical encoding, classifier
//! orchestration, risk tiering, recommendations, and offline label synthesis.

pub mod artifact;
pub mod classifier;
pub mod dataset;
pub mod dependents;
pub mod domain;
pub mod encoding;
pub mod features;
pub mod heuristic;
pub mod recommendations;
pub mod router;
pub mod service;
pub mod vector;

#[cfg(test)]
mod tests;

pub use artifact::{load_context, ArtifactError, ModelArtifact, ModelSpec};
pub use classifier::{Classifier, ClassifierError, LinearClassifier, Standardization};
pub use dataset::{write_labeled, DatasetError, LabeledApplication, LoanDataset};
pub use dependents::normalize_dependents;
pub use domain::{
    Education, Gender, LoanApplication, LoanCategory, MaritalStatus, PropertyArea,
    SelfEmployment, ValidationError,
};
pub use encoding::{CategoryField, EncodedValue, EncoderRegistry, Vocabulary, FALLBACK_INDEX};
pub use features::{DerivedFeatures, IncomeBracket};
pub use heuristic::{ApprovalHeuristicScorer, HeuristicOutcome, HeuristicWeights, DEFAULT_LABEL_SEED};
pub use recommendations::RecommendationEngine;
pub use router::{prediction_router, PredictionState};
pub use service::{
    ModelInfo, PredictionError, PredictionResult, PredictionService, RiskTier, ScoringContext,
};
pub use vector::{FeatureColumn, FeatureSchema, FeatureVector, SchemaError};
