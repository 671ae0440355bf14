//! Provider configuration, injected at startup.
//!
//! Every provider gets a [`ProviderEndpoint`]. Values come from `WARDEN_*`
//! environment variables; nothing is hardcoded beyond public base URLs.
//!
//! | Prefix                 | Provider                         |
//! |------------------------|----------------------------------|
//! | `WARDEN_TEXT_LLM`      | LLM text classifier              |
//! | `WARDEN_VIRUS_SCAN`    | website virus scan (URLs)        |
//! | `WARDEN_SAFE_BROWSING` | Safe Browsing lookup (URLs)      |
//! | `WARDEN_FILE_LLM`      | LLM content review (text files)  |
//! | `WARDEN_BINARY_SCAN`   | binary malware scan (files)      |
//!
//! Each prefix accepts `_BASE_URL`, `_API_KEY`, `_API_SECRET`, `_MODEL` and
//! `_TIMEOUT_SECS`. `WARDEN_LLM_API_KEY` is shared by both LLM endpoints
//! unless overridden. `WARDEN_TEXT_FALLBACK` enables heuristic fallback for
//! text.

use std::time::Duration;

use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },

    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connection settings for one provider.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderEndpoint {
    /// Base URL without a trailing slash.
    pub base_url: String,
    /// Credential. Providers that need one report `Unconfigured` without it.
    pub api_key: Option<String>,
    /// Secondary credential (basic-auth password).
    pub api_secret: Option<String>,
    /// Model name for LLM providers.
    pub model: Option<String>,
    /// Per-call timeout in seconds.
    pub timeout_secs: u64,
}

impl ProviderEndpoint {
    /// Creates an endpoint with no credentials.
    pub fn new(base_url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
            api_secret: None,
            model: None,
            timeout_secs,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the API secret.
    pub fn with_api_secret(mut self, secret: impl Into<String>) -> Self {
        self.api_secret = Some(secret.into());
        self
    }

    /// Sets the model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Returns the API key if present and non-empty.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref().filter(|k| !k.trim().is_empty())
    }

    /// Returns the API secret if present and non-empty.
    pub fn api_secret(&self) -> Option<&str> {
        self.api_secret.as_deref().filter(|s| !s.trim().is_empty())
    }

    /// Returns the per-call timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Joins a path onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

// Credentials must never reach the logs.
impl std::fmt::Debug for ProviderEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "<redacted>");
        f.debug_struct("ProviderEndpoint")
            .field("base_url", &self.base_url)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

/// Default model for the LLM providers.
pub const DEFAULT_LLM_MODEL: &str = "gpt-4o-mini";

/// Configuration for every provider in the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WardenConfig {
    pub text_llm: ProviderEndpoint,
    pub virus_scan: ProviderEndpoint,
    pub safe_browsing: ProviderEndpoint,
    pub file_llm: ProviderEndpoint,
    pub binary_scan: ProviderEndpoint,
    /// Degrade text classification to the heuristic when the LLM fails.
    /// Off by default: text failures surface as `ServiceUnavailable`.
    pub text_fallback_on_failure: bool,
}

impl Default for WardenConfig {
    fn default() -> Self {
        Self {
            text_llm: ProviderEndpoint::new("https://api.openai.com/v1", 10)
                .with_model(DEFAULT_LLM_MODEL),
            virus_scan: ProviderEndpoint::new("https://api.cloudmersive.com", 15),
            safe_browsing: ProviderEndpoint::new("https://safebrowsing.googleapis.com/v4", 10),
            file_llm: ProviderEndpoint::new("https://api.openai.com/v1", 20)
                .with_model(DEFAULT_LLM_MODEL),
            binary_scan: ProviderEndpoint::new("https://api-us1.scanii.com/v2.2", 20),
            text_fallback_on_failure: false,
        }
    }
}

impl WardenConfig {
    /// Loads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration through a key lookup, starting from defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let shared_llm_key = lookup("WARDEN_LLM_API_KEY");

        if let Some(key) = &shared_llm_key {
            config.text_llm.api_key = Some(key.clone());
            config.file_llm.api_key = Some(key.clone());
        }

        apply_overrides(&lookup, "WARDEN_TEXT_LLM", &mut config.text_llm)?;
        apply_overrides(&lookup, "WARDEN_VIRUS_SCAN", &mut config.virus_scan)?;
        apply_overrides(&lookup, "WARDEN_SAFE_BROWSING", &mut config.safe_browsing)?;
        apply_overrides(&lookup, "WARDEN_FILE_LLM", &mut config.file_llm)?;
        apply_overrides(&lookup, "WARDEN_BINARY_SCAN", &mut config.binary_scan)?;

        if let Some(value) = lookup("WARDEN_TEXT_FALLBACK") {
            config.text_fallback_on_failure = parse_bool("WARDEN_TEXT_FALLBACK", &value)?;
        }

        Ok(config)
    }
}

fn apply_overrides<F>(
    lookup: &F,
    prefix: &str,
    endpoint: &mut ProviderEndpoint,
) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = lookup(&format!("{prefix}_BASE_URL")) {
        endpoint.base_url = v;
    }
    if let Some(v) = lookup(&format!("{prefix}_API_KEY")) {
        endpoint.api_key = Some(v);
    }
    if let Some(v) = lookup(&format!("{prefix}_API_SECRET")) {
        endpoint.api_secret = Some(v);
    }
    if let Some(v) = lookup(&format!("{prefix}_MODEL")) {
        endpoint.model = Some(v);
    }

    let key = format!("{prefix}_TIMEOUT_SECS");
    if let Some(v) = lookup(&key) {
        endpoint.timeout_secs = v
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue { key, value: v })?;
    }

    Ok(())
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_have_no_credentials() {
        let config = WardenConfig::default();
        assert!(config.text_llm.api_key().is_none());
        assert!(config.binary_scan.api_secret().is_none());
        assert!(!config.text_fallback_on_failure);
        assert_eq!(config.text_llm.timeout(), Duration::from_secs(10));
        assert_eq!(config.file_llm.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn shared_llm_key_applies_to_both_llm_endpoints() {
        let config = WardenConfig::from_lookup(lookup(&[("WARDEN_LLM_API_KEY", "sk-shared")])).unwrap();
        assert_eq!(config.text_llm.api_key(), Some("sk-shared"));
        assert_eq!(config.file_llm.api_key(), Some("sk-shared"));
    }

    #[test]
    fn prefixed_values_override_shared_key() {
        let config = WardenConfig::from_lookup(lookup(&[
            ("WARDEN_LLM_API_KEY", "sk-shared"),
            ("WARDEN_FILE_LLM_API_KEY", "sk-file"),
            ("WARDEN_FILE_LLM_MODEL", "local-model"),
            ("WARDEN_BINARY_SCAN_TIMEOUT_SECS", "12"),
            ("WARDEN_VIRUS_SCAN_BASE_URL", "http://localhost:9000/"),
        ]))
        .unwrap();

        assert_eq!(config.text_llm.api_key(), Some("sk-shared"));
        assert_eq!(config.file_llm.api_key(), Some("sk-file"));
        assert_eq!(config.file_llm.model.as_deref(), Some("local-model"));
        assert_eq!(config.binary_scan.timeout_secs, 12);
        assert_eq!(
            config.virus_scan.url("/virus/scan/website"),
            "http://localhost:9000/virus/scan/website"
        );
    }

    #[test]
    fn invalid_timeout_is_rejected() {
        let err = WardenConfig::from_lookup(lookup(&[("WARDEN_TEXT_LLM_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("WARDEN_TEXT_LLM_TIMEOUT_SECS"));
    }

    #[test]
    fn text_fallback_flag_parses() {
        let config = WardenConfig::from_lookup(lookup(&[("WARDEN_TEXT_FALLBACK", "yes")])).unwrap();
        assert!(config.text_fallback_on_failure);
        assert!(WardenConfig::from_lookup(lookup(&[("WARDEN_TEXT_FALLBACK", "maybe")])).is_err());
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let endpoint = ProviderEndpoint::new("http://x", 5).with_api_key("   ");
        assert!(endpoint.api_key().is_none());
    }

    #[test]
    fn debug_output_redacts_credentials() {
        let endpoint = ProviderEndpoint::new("http://x", 5)
            .with_api_key("sk-secret")
            .with_api_secret("hunter2");
        let out = format!("{endpoint:?}");
        assert!(!out.contains("sk-secret"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("<redacted>"));
    }

    #[test]
    fn loaded_config_debug_never_shows_keys() {
        let config = WardenConfig::from_lookup(lookup(&[
            ("WARDEN_LLM_API_KEY", "sk-shared"),
            ("WARDEN_BINARY_SCAN_API_KEY", "scan-key"),
            ("WARDEN_BINARY_SCAN_API_SECRET", "scan-secret"),
        ]))
        .unwrap();

        let out = format!("{config:?}");
        for secret in ["sk-shared", "scan-key", "scan-secret"] {
            assert!(!out.contains(secret), "{secret} leaked");
        }
    }
}
