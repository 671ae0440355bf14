//! Website virus scan for URLs.
//!
//! Posts the URL to a Cloudmersive-style `virus/scan/website` endpoint, which
//! fetches the page and scans it.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::send_for_json;
use crate::classifier::{
    ArtifactKind, ClassificationProvider, ClassificationRequest, ClassificationResult, RiskLevel,
};
use crate::config::ProviderEndpoint;
use crate::error::ProviderError;

const PROVIDER_NAME: &str = "virus-scan-url";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ScanResponse {
    clean_result: Option<bool>,
    found_viruses: Option<Vec<FoundVirus>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FoundVirus {
    file_name: Option<String>,
    virus_name: Option<String>,
}

/// URL adapter for the website virus scan.
pub struct VirusScanProvider {
    http: reqwest::Client,
    endpoint: ProviderEndpoint,
}

impl VirusScanProvider {
    pub fn new(http: reqwest::Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }

    fn interpret(response: ScanResponse) -> ClassificationResult {
        let viruses: Vec<String> = response
            .found_viruses
            .unwrap_or_default()
            .into_iter()
            .map(|v| {
                v.virus_name
                    .or(v.file_name)
                    .unwrap_or_else(|| "unknown".to_string())
            })
            .collect();

        if response.clean_result == Some(false) || !viruses.is_empty() {
            return ClassificationResult::from_provider(
                PROVIDER_NAME,
                RiskLevel::High,
                0.95,
                json!({
                    "reason": "threats found",
                    "viruses": viruses,
                }),
            );
        }

        match response.clean_result {
            Some(true) => ClassificationResult::from_provider(
                PROVIDER_NAME,
                ArtifactKind::Url.safe_floor(),
                0.90,
                json!({
                    "reason": "no threats found",
                    "clean": true,
                }),
            ),
            _ => ClassificationResult::from_provider(
                PROVIDER_NAME,
                RiskLevel::Medium,
                0.70,
                json!({
                    "reason": "inconclusive",
                    "clean": null,
                }),
            ),
        }
    }
}

#[async_trait]
impl ClassificationProvider for VirusScanProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn accepts(&self, request: &ClassificationRequest) -> bool {
        matches!(request, ClassificationRequest::Url { .. })
    }

    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ProviderError> {
        let ClassificationRequest::Url { value } = request else {
            return Err(ProviderError::unconfigured(
                PROVIDER_NAME,
                "only URL requests are supported",
            ));
        };
        let api_key = self
            .endpoint
            .api_key()
            .ok_or_else(|| ProviderError::unconfigured(PROVIDER_NAME, "no API key configured"))?;

        let request = self
            .http
            .post(self.endpoint.url("virus/scan/website"))
            .header("Apikey", api_key)
            .timeout(self.endpoint.timeout())
            .json(&json!({ "Url": value }));

        let response: ScanResponse = send_for_json(PROVIDER_NAME, request).await?;
        Ok(Self::interpret(response))
    }
}
