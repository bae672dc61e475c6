// Axum API Server Module
//
// Purpose: HTTP surface for leaf classification and treatment recommendations.
// Inference and catalog queries are blocking, so handlers hand them to the
// blocking pool and keep the async workers free.

use axum::{
    extract::{
        multipart::MultipartRejection,
        rejection::JsonRejection,
        DefaultBodyLimit, Multipart, State,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::classification::onnx::{OnnxDiseaseClassifier, OnnxLeafClassifier};
use crate::classification::{
    describe_disease, ClassNameSource, ClassNames, ClassificationGate, ClassificationOutcome,
    DiseasePrediction, LeafVerdict,
};
use crate::config::AdvisorConfig;
use crate::error::AdvisorError;
use crate::recommendation::{Preferences, Recommendation, RecommendationAssembler, RecommendationRequest};
use crate::store::SqliteStore;
use crate::utils::NameNormalizer;

/// Predictions listed in the predict response
const TOP_PREDICTIONS: usize = 5;

/// Room for multipart boundaries and headers on top of the image itself
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

// ============================================================================
// Application State
// ============================================================================

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<ClassificationGate>,
    pub normalizer: Arc<NameNormalizer>,
    pub config: Arc<AdvisorConfig>,
}

impl AppState {
    /// Load models and class names described by `config`
    ///
    /// A model that fails to load is logged and left out; requests needing it
    /// get 503 until the service is restarted with a working model.
    pub fn new(config: AdvisorConfig) -> Self {
        tracing::info!("Loading class names...");
        let class_names = ClassNames::load_or_fallback(&config.class_names_path);

        let mut gate = ClassificationGate::new(class_names)
            .with_confidence_threshold(config.disease_confidence_threshold)
            .with_image_limits(config.image_size, config.max_upload_bytes);

        tracing::info!("Loading leaf detection model...");
        match OnnxLeafClassifier::load(&config.leaf_model_path) {
            Ok(model) => gate = gate.with_leaf_classifier(Arc::new(model)),
            Err(e) => tracing::warn!("Leaf model unavailable: {:#}", e),
        }

        tracing::info!("Loading disease detection model...");
        match OnnxDiseaseClassifier::load(&config.disease_model_path) {
            Ok(model) => gate = gate.with_disease_classifier(Arc::new(model)),
            Err(e) => tracing::warn!("Disease model unavailable: {:#}", e),
        }

        Self::from_parts(gate, config)
    }

    /// Assemble state from an already built gate
    pub fn from_parts(gate: ClassificationGate, config: AdvisorConfig) -> Self {
        Self {
            gate: Arc::new(gate),
            normalizer: Arc::new(NameNormalizer::new()),
            config: Arc::new(config),
        }
    }

    pub fn api_ready(&self) -> bool {
        self.gate.leaf_loaded() && self.gate.disease_loaded()
    }
}

// ============================================================================
// Router
// ============================================================================

pub fn create_router(state: AppState) -> Router {
    let body_limit = state.config.max_upload_bytes + MULTIPART_OVERHEAD_BYTES;

    Router::new()
        // Health check
        .route("/", get(health_check))
        .route("/health", get(health_check))

        // Classification endpoints (multipart `image`)
        .route("/api/predict", post(predict))
        .route("/api/predict-disease-only", post(predict_disease_only))

        // Model metadata
        .route("/api/classes", get(get_classes))
        .route("/api/model-info", get(model_info))

        // Treatment recommendations (JSON)
        .route("/api/get_recommendations", post(get_recommendations))

        // Middleware (applied in reverse order)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CompressionLayer::new())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ============================================================================
// Endpoint Handlers
// ============================================================================

async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let ready = state.api_ready();
    let model_status = |loaded: bool, path: &std::path::Path| {
        serde_json::json!({
            "loaded": loaded,
            "path": path.display().to_string(),
            "status": if loaded { "Ready" } else { "Failed to load" },
        })
    };

    Json(serde_json::json!({
        "status": if ready { "success" } else { "partial" },
        "message": if ready {
            "Tomato Disease Detection API is running"
        } else {
            "API running but some models failed to load"
        },
        "api_ready": ready,
        "models": {
            "leaf_model": model_status(state.gate.leaf_loaded(), state.config.leaf_model_path.as_path()),
            "disease_model": model_status(state.gate.disease_loaded(), state.config.disease_model_path.as_path()),
        },
        "timestamp": timestamp(),
    }))
}

async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    // Missing models are reported before the upload is even read
    state.gate.ensure_ready()?;
    let image = read_image_field(multipart).await?;

    tracing::info!("Classifying uploaded image ({} bytes)", image.len());

    let gate = state.gate.clone();
    let outcome = tokio::task::spawn_blocking(move || gate.classify_image(&image))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    let response = match outcome {
        ClassificationOutcome::Rejected { leaf: verdict } => {
            serde_json::json!({
                "status": "rejected",
                "stage": "leaf_detection",
                "message": format!(
                    "The uploaded image does not appear to be a tomato leaf (confidence: {:.2}%). \
                     Please upload a clear image of a tomato leaf.",
                    verdict.confidence * 100.0
                ),
                "leaf_detection": leaf_json(&verdict),
                "timestamp": timestamp(),
            })
        }
        ClassificationOutcome::Classified(prediction) => {
            let mut body = serde_json::json!({
                "status": "success",
                "stage": "disease_detection",
                "message": "Tomato leaf detected and disease identified successfully.",
                "leaf_detection": prediction.leaf.as_ref().map(leaf_json),
                "disease_detection": {
                    "disease": prediction.disease_id,
                    "confidence": prediction.confidence_percent(),
                    "is_confident": prediction.is_confident,
                    "disease_info": disease_info_json(&prediction),
                    "top_predictions": prediction.top(TOP_PREDICTIONS),
                },
                "timestamp": timestamp(),
            });
            if !prediction.is_confident {
                body["warning"] = Value::String(format!(
                    "Disease prediction confidence is below threshold ({:.0}%). \
                     Consider uploading a clearer image for more accurate results.",
                    state.gate.disease_confidence_threshold() * 100.0
                ));
            }
            body
        }
    };

    Ok(Json(response))
}

async fn predict_disease_only(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, AppError> {
    state.gate.ensure_disease_ready()?;
    let image = read_image_field(multipart).await?;

    let gate = state.gate.clone();
    let prediction = tokio::task::spawn_blocking(move || gate.classify_disease_only_image(&image))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(serde_json::json!({
        "status": "success",
        "prediction": {
            "disease": prediction.disease_id,
            "confidence": prediction.confidence_percent(),
            "disease_info": disease_info_json(&prediction),
        },
        "all_predictions": prediction.ranked_predictions,
        "timestamp": timestamp(),
    })))
}

async fn get_classes(State(state): State<AppState>) -> impl IntoResponse {
    let classes = state.gate.class_names();
    Json(serde_json::json!({
        "status": "success",
        "classes": classes.names(),
        "total_classes": classes.len(),
    }))
}

async fn model_info(State(state): State<AppState>) -> impl IntoResponse {
    let config = &state.config;
    let classes = state.gate.class_names();
    let class_source = match classes.source() {
        ClassNameSource::Artifact(_) => "artifact",
        ClassNameSource::Fallback => "fallback",
        ClassNameSource::Inline => "inline",
    };

    Json(serde_json::json!({
        "status": "success",
        "models": {
            "leaf_detector": {
                "loaded": state.gate.leaf_loaded(),
                "path": config.leaf_model_path.display().to_string(),
                "confidence_threshold": config.leaf_threshold,
            },
            "disease_detector": {
                "loaded": state.gate.disease_loaded(),
                "path": config.disease_model_path.display().to_string(),
                "confidence_threshold": state.gate.disease_confidence_threshold(),
                "total_classes": classes.len(),
                "class_source": class_source,
            },
        },
        "configuration": {
            "image_size": state.gate.image_size(),
            "max_file_size_mb": config.max_upload_mb(),
        },
    }))
}

/// Recommendation request body; both snake_case and camelCase keys are accepted
#[derive(Debug, Deserialize)]
struct RecommendationBody {
    #[serde(alias = "diseaseName")]
    disease_name: Option<String>,
    #[serde(alias = "affectedPercentage")]
    affected_percentage: Option<Value>,
    #[serde(alias = "farmingType")]
    farming_type: Option<String>,
    budget: Option<String>,
}

impl RecommendationBody {
    fn into_request(self) -> Result<RecommendationRequest, AppError> {
        let (Some(disease_name), Some(raw_pct)) = (self.disease_name, self.affected_percentage) else {
            return Err(AppError::BadRequest(
                "Missing required fields: disease_name and affected_percentage".to_string(),
            ));
        };

        let affected_percentage = match &raw_pct {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
        .ok_or_else(|| AppError::BadRequest(format!("Invalid data type: affected_percentage {}", raw_pct)))?;

        let preferences = Preferences::parse(self.farming_type.as_deref(), self.budget.as_deref())?;

        let request = RecommendationRequest::new(disease_name, affected_percentage)
            .with_preferences(preferences);
        request.validate()?;
        Ok(request)
    }
}

async fn get_recommendations(
    State(state): State<AppState>,
    payload: Result<Json<RecommendationBody>, JsonRejection>,
) -> Result<Json<Recommendation>, AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let request = body.into_request()?;

    tracing::info!(
        disease = %request.disease_name,
        affected = request.affected_percentage,
        farming_type = %request.preferences.farming_type,
        budget = %request.preferences.budget,
        "Recommendation requested"
    );

    let catalog_path = state.config.catalog_path.clone();
    let normalizer = state.normalizer.clone();

    // Catalog is opened per request; SQLite work runs on the blocking pool
    let recommendation = tokio::task::spawn_blocking(move || {
        let store = SqliteStore::open(&catalog_path)?;
        RecommendationAssembler::new(&store, &normalizer).recommend(&request)
    })
    .await
    .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))??;

    Ok(Json(recommendation))
}

// ============================================================================
// Helpers
// ============================================================================

/// Pull the `image` field out of a multipart upload
async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Vec<u8>, AppError> {
    let mut multipart = multipart.map_err(|e| AppError::BadRequest(e.body_text()))?;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        if field.name() != Some("image") {
            continue;
        }
        if field.file_name() == Some("") {
            return Err(AppError::BadRequest("No file selected".to_string()));
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        return Ok(bytes.to_vec());
    }

    Err(AppError::BadRequest("No image file provided".to_string()))
}

fn leaf_json(verdict: &LeafVerdict) -> Value {
    serde_json::json!({
        "is_leaf": verdict.is_leaf,
        "confidence": verdict.confidence,
        "label": verdict.label(),
        "raw_probability": verdict.raw_probability,
    })
}

fn disease_info_json(prediction: &DiseasePrediction) -> Value {
    serde_json::json!({
        "name": prediction.disease_id,
        "description": describe_disease(&prediction.disease_id),
    })
}

fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}

// ============================================================================
// Error Handling
// ============================================================================

#[derive(Debug)]
enum AppError {
    Advisor(AdvisorError),
    BadRequest(String),
    Internal(String),
}

impl From<AdvisorError> for AppError {
    fn from(err: AdvisorError) -> Self {
        AppError::Advisor(err)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::Advisor(err) => {
                let status = match &err {
                    AdvisorError::ClassifierUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
                    AdvisorError::InvalidImageInput(_)
                    | AdvisorError::InvalidPreferenceValue { .. }
                    | AdvisorError::InvalidPercentage(_) => StatusCode::BAD_REQUEST,
                    AdvisorError::DiseaseNotFound(_) | AdvisorError::NoTreatmentsFound(_) => {
                        StatusCode::NOT_FOUND
                    }
                    AdvisorError::Inference(_) | AdvisorError::Store(_) => {
                        StatusCode::INTERNAL_SERVER_ERROR
                    }
                };
                if status.is_server_error() {
                    tracing::error!("Request failed: {}", err);
                }
                (status, err.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
