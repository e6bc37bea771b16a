use std::sync::Arc;

use serde_json::{json, Value};

use super::common::application;
use crate::underwriting::artifact::{load_context, ArtifactError, ModelArtifact, ModelSpec};
use crate::underwriting::service::{PredictionService, ScoringContext};
use crate::underwriting::vector::{FeatureColumn, SchemaError};

fn artifact_json() -> Value {
    let columns: Vec<&str> = FeatureColumn::CANONICAL
        .iter()
        .map(|column| column.name())
        .collect();
    let mut weights = vec![0.0; 15];
    weights[9] = 3.0;

    json!({
        "version": "2024.06-logreg",
        "feature_columns": columns,
        "encoders": {
            "Gender": ["Babae", "Lalaki"],
            "Marital_Status": ["Kasal", "Single"],
            "Education": ["College Graduate", "High School/Vocational"],
            "Self_Employed": ["No", "Yes"],
            "Property_Area": ["Metro Manila", "Provincial Cities", "Rural Provinces"],
            "Income_Category": [
                "Lower Middle (Class C-)",
                "Middle Class (Class C)",
                "Upper Middle (Class B)"
            ],
            "Loan_Category": ["Car", "House Purchase", "Personal Loan"]
        },
        "model": {
            "kind": "logistic",
            "weights": weights,
            "bias": -1.0
        }
    })
}

fn load(value: Value) -> Result<ScoringContext, ArtifactError> {
    let artifact: ModelArtifact = serde_json::from_value(value)?;
    artifact.into_context()
}

#[test]
fn bundle_loads_into_a_working_context() {
    let context = load(artifact_json()).expect("artifact is valid");

    let info = context.model_info();
    assert_eq!(info.model_type, "Logistic Regression");
    assert_eq!(info.version, "2024.06-logreg");
    assert_eq!(info.features_count, 15);

    let service = PredictionService::new(Arc::new(context));
    let result = service.predict(&application()).expect("prediction succeeds");
    assert!(result.loan_approved);
    assert!(result.approval_probability > 0.85);
}

#[test]
fn threshold_defaults_to_one_half() {
    let artifact: ModelArtifact = serde_json::from_value(artifact_json()).expect("parses");

    let ModelSpec::Logistic { threshold, .. } = artifact.model;
    assert_eq!(threshold, 0.5);
}

#[test]
fn unknown_column_is_fatal() {
    let mut value = artifact_json();
    value["feature_columns"][3] = json!("Favourite_Colour");

    let error = load(value).err().expect("unknown column rejected");

    assert!(matches!(
        error,
        ArtifactError::Schema(SchemaError::UnknownColumn(ref name)) if name == "Favourite_Colour"
    ));
}

#[test]
fn duplicate_column_is_fatal() {
    let mut value = artifact_json();
    value["feature_columns"][1] = json!("Gender_encoded");

    let error = load(value).err().expect("duplicate column rejected");

    assert!(matches!(
        error,
        ArtifactError::Schema(SchemaError::DuplicateColumn(_))
    ));
}

#[test]
fn weight_count_must_match_columns() {
    let mut value = artifact_json();
    value["model"]["weights"] = json!([0.1, 0.2, 0.3]);

    let error = load(value).err().expect("arity mismatch rejected");

    assert!(matches!(
        error,
        ArtifactError::ArityMismatch {
            columns: 15,
            model: 3
        }
    ));
}

#[test]
fn threshold_outside_unit_interval_is_rejected() {
    let mut value = artifact_json();
    value["model"]["threshold"] = json!(1.5);

    let error = load(value).err().expect("threshold rejected");

    assert!(matches!(error, ArtifactError::InvalidModel(_)));
}

#[test]
fn zero_scale_standardization_is_rejected() {
    let mut value = artifact_json();
    let mut scales = vec![json!({"mean": 0.0, "scale": 1.0}); 15];
    scales[4] = json!({"mean": 0.0, "scale": 0.0});
    value["model"]["standardization"] = json!(scales);

    let error = load(value).err().expect("zero scale rejected");

    assert!(matches!(error, ArtifactError::InvalidModel(_)));
}

#[test]
fn missing_file_is_an_io_error() {
    let error = load_context("does/not/exist.json")
        .err()
        .expect("missing file rejected");

    assert!(matches!(error, ArtifactError::Io(_)));
}
