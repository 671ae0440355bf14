//! API request and response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use warden_core::{ClassificationResult, ResultSource, RiskLevel};

/// Request body for POST /analyze/text.
#[derive(Debug, Deserialize)]
pub struct AnalyzeTextRequest {
    /// The text to classify.
    pub text: String,
}

/// Request body for POST /analyze/url.
#[derive(Debug, Deserialize)]
pub struct AnalyzeUrlRequest {
    pub url: String,
}

/// Response body for every /analyze route.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub risk: RiskLevel,
    pub confidence: f32,
    pub source: ResultSource,
    /// Provider- or heuristic-specific detail.
    pub result: serde_json::Value,
}

impl From<ClassificationResult> for AnalyzeResponse {
    fn from(result: ClassificationResult) -> Self {
        Self {
            risk: result.risk,
            confidence: result.confidence,
            source: result.source,
            result: result.detail,
        }
    }
}

/// Response body for GET /.
#[derive(Debug, Serialize)]
pub struct ServiceInfoResponse {
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub endpoints: Vec<&'static str>,
}

/// Response body for DELETE /history.
#[derive(Debug, Serialize)]
pub struct ClearHistoryResponse {
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
