//! External classification providers.
//!
//! One adapter per provider per artifact kind. Adapters share a single
//! `reqwest::Client` (and its connection pool) and apply their own per-call
//! timeout.

mod binary_scan;
mod file_content;
pub(crate) mod llm;
mod safe_browsing;
mod text;
mod virus_scan;

pub use binary_scan::BinaryScanProvider;
pub use file_content::{FileContentProvider, FileVerdictParser, MAX_FILE_CHARS};
pub use llm::ChatClient;
pub use safe_browsing::SafeBrowsingProvider;
pub use text::{LlmTextProvider, TextVerdictParser};
pub use virus_scan::VirusScanProvider;

use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::config::ConfigError;
use crate::error::ProviderError;

/// Builds the HTTP client shared by every provider.
pub fn http_client() -> Result<reqwest::Client, ConfigError> {
    let client = reqwest::Client::builder()
        .user_agent(format!("Warden/{}", env!("CARGO_PKG_VERSION")))
        .build()?;
    Ok(client)
}

/// Sends a request and decodes a JSON body, mapping every failure onto the
/// provider error taxonomy.
pub(crate) async fn send_for_json<T: DeserializeOwned>(
    provider: &str,
    request: RequestBuilder,
) -> Result<T, ProviderError> {
    let response = request
        .send()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
        return Err(ProviderError::auth_failed(
            provider,
            format!("rejected with status {status}"),
        ));
    }
    if !status.is_success() {
        return Err(ProviderError::network(
            provider,
            format!("unexpected status {status}"),
        ));
    }

    let body = response
        .text()
        .await
        .map_err(|e| ProviderError::from_reqwest(provider, &e))?;

    serde_json::from_str(&body)
        .map_err(|e| ProviderError::unparseable(provider, format!("invalid response body: {e}")))
}
