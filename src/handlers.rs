use crate::clock::Clock;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::*;
use crate::rules::RulePolicy;
use crate::validation::{validate_batch, validate_kind};
use crate::verdict::DocumentStatus;
use axum::{
    extract::{rejection::JsonRejection, DefaultBodyLimit, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Rule parameters, derived from the configuration.
    pub policy: RulePolicy,
    /// Source of "today" for every verdict.
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(config: Config, clock: Arc<dyn Clock>) -> Self {
        Self {
            policy: config.rule_policy(),
            config,
            clock,
        }
    }
}

/// Builds the HTTP router with its middleware stack.
///
/// The body limit is enforced by the `Json` extractor, so an oversized body
/// surfaces as a `JsonRejection` and answers with the usual JSON error body.
pub fn build_router(state: Arc<AppState>) -> Router {
    let max_body_bytes = state.config.max_body_bytes;

    Router::new()
        .route("/health", get(health))
        .route("/api/v1/documents/validate", post(validate_document))
        .route(
            "/api/v1/documents/validate/batch",
            post(validate_documents_batch),
        )
        .with_state(state)
        .layer(ServiceBuilder::new().layer(DefaultBodyLimit::max(max_body_bytes)))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Health check endpoint.
///
/// # Returns
///
/// * `(StatusCode, Json<serde_json::Value>)` - HTTP 200 OK with health status JSON.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "kyc-doc-validator",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// POST /api/v1/documents/validate
///
/// Validates the date of one uploaded document. A rejected document is still
/// a 200 response; the verdict explains the rejection.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - Document category and the fields extracted from it.
///
/// # Returns
///
/// * `Result<Json<DocumentValidationResponse>, AppError>` - The verdict or a request error.
pub async fn validate_document(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ValidateDocumentRequest>, JsonRejection>,
) -> Result<Json<DocumentValidationResponse>, AppError> {
    let Json(request) = payload?;
    let today = state.clock.today();

    tracing::info!(
        "POST /documents/validate - type: {:?}, today: {}",
        request.document_type,
        today
    );

    let verdict = validate_kind(
        request.document_type,
        &request.extracted_data,
        today,
        &state.policy,
    );

    match verdict.status {
        DocumentStatus::Rejected => {
            tracing::warn!("❌ {:?} rejected: {}", request.document_type, verdict.message)
        }
        DocumentStatus::Approved => tracing::info!("✓ {:?} approved", request.document_type),
        DocumentStatus::Pending => {
            tracing::info!("{:?} left pending for review", request.document_type)
        }
    }

    Ok(Json(DocumentValidationResponse {
        document_type: request.document_type,
        verdict,
    }))
}

/// POST /api/v1/documents/validate/batch
///
/// Validates several documents from the same upload against a single "today".
///
/// # Arguments
///
/// * `state` - The application state.
/// * `payload` - The documents, validated in order.
///
/// # Returns
///
/// * `Result<Json<BatchValidationResponse>, AppError>` - One verdict per document or a request error.
pub async fn validate_documents_batch(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<BatchValidationRequest>, JsonRejection>,
) -> Result<Json<BatchValidationResponse>, AppError> {
    let Json(request) = payload?;

    if request.documents.is_empty() {
        return Err(AppError::BadRequest(
            "At least one document is required".to_string(),
        ));
    }
    if request.documents.len() > state.config.max_batch_size {
        return Err(AppError::BadRequest(format!(
            "Too many documents: {} (maximum {})",
            request.documents.len(),
            state.config.max_batch_size
        )));
    }

    let today = state.clock.today();
    let results = validate_batch(&request.documents, today, &state.policy);

    let rejected = results
        .iter()
        .filter(|r| r.verdict.status == DocumentStatus::Rejected)
        .count();
    tracing::info!(
        "POST /documents/validate/batch - {} documents, {} rejected, today: {}",
        results.len(),
        rejected,
        today
    );

    Ok(Json(BatchValidationResponse {
        reference_date: today.format("%Y-%m-%d").to_string(),
        results,
    }))
}
