//! Binary malware scan for uploaded files (Scanii-style `files` endpoint).
//!
//! Needs both a key and a secret; without them every call is `Unconfigured`
//! and the chain moves on to the file heuristic.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::send_for_json;
use crate::classifier::{
    ArtifactKind, ClassificationProvider, ClassificationRequest, ClassificationResult, RiskLevel,
};
use crate::config::ProviderEndpoint;
use crate::error::ProviderError;

const PROVIDER_NAME: &str = "binary-scan";

#[derive(Debug, Deserialize)]
struct ScanResponse {
    id: Option<String>,
    findings: Option<Vec<String>>,
}

/// File adapter for the binary scan service.
pub struct BinaryScanProvider {
    http: reqwest::Client,
    endpoint: ProviderEndpoint,
}

impl BinaryScanProvider {
    pub fn new(http: reqwest::Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ClassificationProvider for BinaryScanProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn accepts(&self, request: &ClassificationRequest) -> bool {
        matches!(request, ClassificationRequest::File { .. })
    }

    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ProviderError> {
        let ClassificationRequest::File {
            name,
            mime_type,
            content,
            ..
        } = request
        else {
            return Err(ProviderError::unconfigured(
                PROVIDER_NAME,
                "only file requests are supported",
            ));
        };

        let (Some(key), Some(secret)) = (self.endpoint.api_key(), self.endpoint.api_secret())
        else {
            return Err(ProviderError::unconfigured(
                PROVIDER_NAME,
                "scan credentials not configured",
            ));
        };

        let request = self
            .http
            .post(self.endpoint.url("files"))
            .basic_auth(key, Some(secret))
            .header(reqwest::header::CONTENT_TYPE, mime_type.as_str())
            .query(&[("filename", name.as_str())])
            .timeout(self.endpoint.timeout())
            .body(content.clone());

        let response: ScanResponse = send_for_json(PROVIDER_NAME, request).await?;
        let findings = response.findings.ok_or_else(|| {
            ProviderError::unparseable(PROVIDER_NAME, "response has no findings field")
        })?;

        let (risk, confidence) = if findings.is_empty() {
            (ArtifactKind::File.safe_floor(), 0.90)
        } else {
            (RiskLevel::High, 0.95)
        };

        Ok(ClassificationResult::from_provider(
            PROVIDER_NAME,
            risk,
            confidence,
            json!({
                "scanId": response.id,
                "findings": findings,
            }),
        ))
    }
}
