use serde::{Deserialize, Serialize};

use super::vector::FeatureVector;

/// Contract for the trained approval model. Implementations must be pure: the same
/// vector always yields the same label and probability.
pub trait Classifier: Send + Sync {
    /// Human readable model family reported by the model-info surface.
    fn model_type(&self) -> &str;

    /// Number of features the model was trained on, when known.
    fn input_width(&self) -> Option<usize> {
        None
    }

    fn predict(&self, features: &FeatureVector) -> Result<bool, ClassifierError>;

    /// Probability of the approved class.
    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ClassifierError>;
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClassifierError {
    #[error("classifier expects {expected} features, received {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("classifier produced an out-of-range probability {0}")]
    InvalidProbability(f64),
    #[error("classifier backend failure: {0}")]
    Backend(String),
}

/// Per-column centering applied before the linear combination.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Standardization {
    pub mean: f64,
    pub scale: f64,
}

/// Logistic scorer: `sigmoid(bias + sum(w_i * (x_i - mean_i) / scale_i))`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearClassifier {
    weights: Vec<f64>,
    bias: f64,
    threshold: f64,
    standardization: Option<Vec<Standardization>>,
}

pub const DEFAULT_DECISION_THRESHOLD: f64 = 0.5;

impl LinearClassifier {
    pub fn new(weights: Vec<f64>, bias: f64) -> Self {
        Self {
            weights,
            bias,
            threshold: DEFAULT_DECISION_THRESHOLD,
            standardization: None,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_standardization(mut self, standardization: Vec<Standardization>) -> Self {
        self.standardization = Some(standardization);
        self
    }

    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn standardization(&self) -> Option<&[Standardization]> {
        self.standardization.as_deref()
    }

    fn logit(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        if features.len() != self.weights.len() {
            return Err(ClassifierError::DimensionMismatch {
                expected: self.weights.len(),
                actual: features.len(),
            });
        }

        let values = features.as_slice();
        let logit = match &self.standardization {
            Some(scales) if scales.len() != values.len() => {
                return Err(ClassifierError::DimensionMismatch {
                    expected: scales.len(),
                    actual: values.len(),
                });
            }
            Some(scales) => values
                .iter()
                .zip(&self.weights)
                .zip(scales)
                .map(|((value, weight), scale)| weight * (value - scale.mean) / scale.scale)
                .sum::<f64>(),
            None => values
                .iter()
                .zip(&self.weights)
                .map(|(value, weight)| weight * value)
                .sum::<f64>(),
        };

        Ok(self.bias + logit)
    }
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

impl Classifier for LinearClassifier {
    fn model_type(&self) -> &str {
        "Logistic Regression"
    }

    fn input_width(&self) -> Option<usize> {
        Some(self.weights.len())
    }

    fn predict(&self, features: &FeatureVector) -> Result<bool, ClassifierError> {
        Ok(self.predict_proba(features)? >= self.threshold)
    }

    fn predict_proba(&self, features: &FeatureVector) -> Result<f64, ClassifierError> {
        let probability = sigmoid(self.logit(features)?);
        if probability.is_nan() {
            return Err(ClassifierError::InvalidProbability(probability));
        }
        Ok(probability)
    }
}
