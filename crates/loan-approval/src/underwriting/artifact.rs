use std::fs::File;
use std::io::{BufReader, Read, Write};
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::classifier::{
    Classifier, LinearClassifier, Standardization, DEFAULT_DECISION_THRESHOLD,
};
use super::encoding::EncoderRegistry;
use super::service::ScoringContext;
use super::vector::{FeatureSchema, SchemaError};

/// Classifier, vocabularies, and column order persisted as one versioned bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    pub version: String,
    pub feature_columns: Vec<String>,
    pub encoders: EncoderRegistry,
    pub model: ModelSpec,
}

/// Serialized model parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelSpec {
    Logistic {
        weights: Vec<f64>,
        bias: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        standardization: Option<Vec<Standardization>>,
    },
}

fn default_threshold() -> f64 {
    DEFAULT_DECISION_THRESHOLD
}

#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    #[error("failed to read model artifact: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid model artifact JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("feature schema mismatch: {0}")]
    Schema(#[from] SchemaError),
    #[error("model was trained on {model} features but feature_columns lists {columns}")]
    ArityMismatch { columns: usize, model: usize },
    #[error("invalid model parameters: {0}")]
    InvalidModel(String),
}

impl ModelSpec {
    fn into_classifier(self) -> Result<Arc<dyn Classifier>, ArtifactError> {
        match self {
            ModelSpec::Logistic {
                weights,
                bias,
                threshold,
                standardization,
            } => {
                if weights.is_empty() {
                    return Err(ArtifactError::InvalidModel("weights are empty".to_string()));
                }
                if !weights.iter().all(|weight| weight.is_finite()) || !bias.is_finite() {
                    return Err(ArtifactError::InvalidModel(
                        "weights and bias must be finite".to_string(),
                    ));
                }
                if !(0.0..=1.0).contains(&threshold) {
                    return Err(ArtifactError::InvalidModel(format!(
                        "threshold {threshold} is outside [0, 1]"
                    )));
                }

                let mut classifier = LinearClassifier::new(weights, bias).with_threshold(threshold);
                if let Some(scales) = standardization {
                    if scales.len() != classifier.weights().len() {
                        return Err(ArtifactError::InvalidModel(format!(
                            "{} standardization entries for {} weights",
                            scales.len(),
                            classifier.weights().len()
                        )));
                    }
                    let usable = scales.iter().all(|entry| {
                        entry.mean.is_finite() && entry.scale.is_finite() && entry.scale != 0.0
                    });
                    if !usable {
                        return Err(ArtifactError::InvalidModel(
                            "standardization needs finite means and non-zero scales".to_string(),
                        ));
                    }
                    classifier = classifier.with_standardization(scales);
                }

                Ok(Arc::new(classifier))
            }
        }
    }
}

impl ModelArtifact {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ArtifactError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ArtifactError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn to_writer<W: Write>(&self, writer: W) -> Result<(), ArtifactError> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }

    /// Validates the bundle and turns it into the immutable context shared by requests.
    pub fn into_context(self) -> Result<ScoringContext, ArtifactError> {
        let ModelArtifact {
            version,
            feature_columns,
            encoders,
            model,
        } = self;

        let schema = FeatureSchema::from_names(feature_columns.as_slice())?;
        let classifier = model.into_classifier()?;
        let context = ScoringContext::new(schema, encoders, classifier)?.with_version(version);

        info!(
            version = context.version(),
            features = context.schema().len(),
            model_type = context.classifier().model_type(),
            "model artifact loaded"
        );

        Ok(context)
    }
}

/// Reads and validates a bundle from disk in one step.
pub fn load_context<P: AsRef<Path>>(path: P) -> Result<ScoringContext, ArtifactError> {
    ModelArtifact::from_path(path)?.into_context()
}
