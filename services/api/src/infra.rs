use loan_approval::underwriting::{load_context, PredictionService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::path::Path;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tracing::warn;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Loads the model bundle once. A missing or invalid bundle leaves the service
/// running without a model so liveness and model status stay observable.
pub(crate) fn load_prediction_service(path: &Path) -> Option<Arc<PredictionService>> {
    match load_context(path) {
        Ok(context) => Some(Arc::new(PredictionService::new(Arc::new(context)))),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "model artifact unavailable, serving without a model");
            None
        }
    }
}
