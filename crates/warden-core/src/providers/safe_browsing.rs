//! Safe Browsing `threatMatches:find` lookup for URLs.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use super::send_for_json;
use crate::classifier::{
    ArtifactKind, ClassificationProvider, ClassificationRequest, ClassificationResult, RiskLevel,
};
use crate::config::ProviderEndpoint;
use crate::error::ProviderError;

const PROVIDER_NAME: &str = "safe-browsing";

const THREAT_TYPES: &[&str] = &[
    "MALWARE",
    "SOCIAL_ENGINEERING",
    "UNWANTED_SOFTWARE",
    "POTENTIALLY_HARMFUL_APPLICATION",
];

#[derive(Debug, Deserialize)]
struct FindResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    threat_type: Option<String>,
}

/// URL adapter for the Safe Browsing lookup API.
pub struct SafeBrowsingProvider {
    http: reqwest::Client,
    endpoint: ProviderEndpoint,
}

impl SafeBrowsingProvider {
    pub fn new(http: reqwest::Client, endpoint: ProviderEndpoint) -> Self {
        Self { http, endpoint }
    }
}

#[async_trait]
impl ClassificationProvider for SafeBrowsingProvider {
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

        let body = json!({
            "client": { "clientId": "warden", "clientVersion": env!("CARGO_PKG_VERSION") },
            "threatInfo": {
                "threatTypes": THREAT_TYPES,
                "platformTypes": ["ANY_PLATFORM"],
                "threatEntryTypes": ["URL"],
                "threatEntries": [{ "url": value }],
            },
        });

        let request = self
            .http
            .post(self.endpoint.url("threatMatches:find"))
            .query(&[("key", api_key)])
            .timeout(self.endpoint.timeout())
            .json(&body);

        let response: FindResponse = send_for_json(PROVIDER_NAME, request).await?;

        if response.matches.is_empty() {
            return Ok(ClassificationResult::from_provider(
                PROVIDER_NAME,
                ArtifactKind::Url.safe_floor(),
                0.99,
                json!({ "safe": true }),
            ));
        }

        let threats: Vec<String> = response
            .matches
            .into_iter()
            .filter_map(|m| m.threat_type)
            .collect();

        Ok(ClassificationResult::from_provider(
            PROVIDER_NAME,
            RiskLevel::High,
            0.95,
            json!({
                "reason": "listed by Safe Browsing",
                "threatTypes": threats,
            }),
        ))
    }
}
