use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use tracing::{error, warn};

use super::domain::LoanApplication;
use super::service::{PredictionError, PredictionService};

/// Handler state. `None` means no model artifact was loaded at startup.
#[derive(Clone, Default)]
pub struct PredictionState {
    service: Option<Arc<PredictionService>>,
}

impl PredictionState {
    pub fn new(service: Option<Arc<PredictionService>>) -> Self {
        Self { service }
    }

    pub fn model_loaded(&self) -> bool {
        self.service.is_some()
    }
}

/// Router exposing the prediction, liveness, and model metadata endpoints.
pub fn prediction_router(service: Option<Arc<PredictionService>>) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/predict", post(predict_handler))
        .route("/model-info", get(model_info_handler))
        .with_state(PredictionState::new(service))
}

pub(crate) async fn root_handler() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Loan Approval Predictor API",
        "status": "active",
    }))
}

pub(crate) async fn health_handler(State(state): State<PredictionState>) -> Json<serde_json::Value> {
    let model_loaded = state.model_loaded();
    Json(json!({
        "status": if model_loaded { "healthy" } else { "unhealthy" },
        "model_loaded": model_loaded,
    }))
}

pub(crate) async fn predict_handler(
    State(state): State<PredictionState>,
    Json(application): Json<LoanApplication>,
) -> Response {
    let Some(service) = state.service else {
        return model_unavailable("Model not loaded. Please provide a trained model artifact.");
    };

    match service.predict(&application) {
        Ok(result) => (StatusCode::OK, Json(result)).into_response(),
        Err(PredictionError::Validation(error)) => {
            warn!(field = error.field(), %error, "rejected loan application");
            let payload = json!({
                "error": error.to_string(),
                "field": error.field(),
            });
            (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response()
        }
        Err(other @ PredictionError::Classifier(_)) => {
            error!(error = %other, "prediction failed");
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn model_info_handler(State(state): State<PredictionState>) -> Response {
    match state.service {
        Some(service) => (StatusCode::OK, Json(service.context().model_info())).into_response(),
        None => model_unavailable("Model not loaded"),
    }
}

fn model_unavailable(message: &str) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
}
