//! API route handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, State};
use axum::Json;
use chrono::Utc;
use tracing::{debug, info};

use warden_core::{ArtifactKind, ClassificationResult};

use crate::error::{ApiError, Result};
use crate::history::{Analytics, HistoryEntry, RECENT_LIMIT};
use crate::models::{
    AnalyzeResponse, AnalyzeTextRequest, AnalyzeUrlRequest, ClearHistoryResponse,
    ServiceInfoResponse,
};
use crate::state::AppState;

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

const ENDPOINTS: &[&str] = &[
    "/analyze/text",
    "/analyze/url",
    "/analyze/file",
    "/history",
    "/analytics",
];

/// GET / - Service banner.
pub async fn service_info() -> Json<ServiceInfoResponse> {
    Json(ServiceInfoResponse {
        message: "Warden risk classification service running".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now(),
        endpoints: ENDPOINTS.to_vec(),
    })
}

/// POST /analyze/text - Classify free text.
pub async fn analyze_text(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeTextRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let Json(req) = payload?;
    debug!(text_len = req.text.len(), "Analyzing text");

    let result = state.classifier.classify_text(&req.text).await?;
    Ok(Json(record(&state, ArtifactKind::Text, req.text, result)))
}

/// POST /analyze/url - Classify a URL.
pub async fn analyze_url(
    State(state): State<AppState>,
    payload: std::result::Result<Json<AnalyzeUrlRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>> {
    let Json(req) = payload?;
    debug!(url = %req.url, "Analyzing URL");

    let result = state.classifier.classify_url(&req.url).await?;
    Ok(Json(record(&state, ArtifactKind::Url, req.url, result)))
}

/// POST /analyze/file - Classify an uploaded file (multipart field `file`).
pub async fn analyze_file(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let mime_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let content = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("failed to read upload: {e}")))?;

        debug!(file = %name, mime_type = %mime_type, size = content.len(), "Analyzing file");

        let size_bytes = content.len() as u64;
        let result = state
            .classifier
            .classify_file(&name, &mime_type, size_bytes, content.to_vec())
            .await?;
        return Ok(Json(record(&state, ArtifactKind::File, name, result)));
    }

    Err(ApiError::BadRequest("no file uploaded".to_string()))
}

/// GET /history - Most recent results, newest first.
pub async fn get_history(State(state): State<AppState>) -> Json<Vec<HistoryEntry>> {
    Json(state.history.recent(RECENT_LIMIT))
}

/// DELETE /history - Forget every recorded result.
pub async fn clear_history(State(state): State<AppState>) -> Json<ClearHistoryResponse> {
    state.history.clear();
    info!("History cleared");

    Json(ClearHistoryResponse {
        message: "History cleared successfully".to_string(),
        timestamp: Utc::now(),
    })
}

/// GET /analytics - Risk level distribution over the history.
pub async fn get_analytics(State(state): State<AppState>) -> Json<Analytics> {
    Json(state.history.analytics())
}

fn record(
    state: &AppState,
    kind: ArtifactKind,
    input: String,
    result: ClassificationResult,
) -> AnalyzeResponse {
    state
        .history
        .record(HistoryEntry::new(kind, input, &result));
    result.into()
}
