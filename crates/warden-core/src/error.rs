//! Error types for the classification pipeline.

use serde::Serialize;
use thiserror::Error;

use crate::classifier::ArtifactKind;

/// Why a single provider attempt failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderErrorKind {
    /// No credential or endpoint configured.
    Unconfigured,
    /// Transport failure or unexpected HTTP status.
    Network,
    /// The provider did not answer within its timeout.
    Timeout,
    /// The provider rejected the credential.
    AuthFailed,
    /// The provider answered with something we cannot interpret.
    UnparseableResponse,
}

impl ProviderErrorKind {
    /// Returns a short label for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderErrorKind::Unconfigured => "unconfigured",
            ProviderErrorKind::Network => "network",
            ProviderErrorKind::Timeout => "timeout",
            ProviderErrorKind::AuthFailed => "auth_failed",
            ProviderErrorKind::UnparseableResponse => "unparseable_response",
        }
    }
}

impl std::fmt::Display for ProviderErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed provider attempt.
#[derive(Debug, Clone, Error)]
#[error("provider {provider} failed ({kind}): {message}")]
pub struct ProviderError {
    pub kind: ProviderErrorKind,
    pub provider: String,
    pub message: String,
}

impl ProviderError {
    /// Creates a new provider error.
    pub fn new(kind: ProviderErrorKind, provider: &str, message: impl Into<String>) -> Self {
        Self {
            kind,
            provider: provider.to_string(),
            message: message.into(),
        }
    }

    pub fn unconfigured(provider: &str, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Unconfigured, provider, message)
    }

    pub fn network(provider: &str, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Network, provider, message)
    }

    pub fn timeout(provider: &str, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::Timeout, provider, message)
    }

    pub fn auth_failed(provider: &str, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::AuthFailed, provider, message)
    }

    pub fn unparseable(provider: &str, message: impl Into<String>) -> Self {
        Self::new(ProviderErrorKind::UnparseableResponse, provider, message)
    }

    /// Maps a `reqwest` failure onto the provider error taxonomy.
    pub fn from_reqwest(provider: &str, err: &reqwest::Error) -> Self {
        if err.is_timeout() {
            return Self::timeout(provider, err.to_string());
        }
        if err.is_decode() {
            return Self::unparseable(provider, err.to_string());
        }
        match err.status() {
            Some(status) if status.as_u16() == 401 || status.as_u16() == 403 => {
                Self::auth_failed(provider, format!("rejected with status {status}"))
            }
            _ => Self::network(provider, err.to_string()),
        }
    }
}

/// Errors surfaced to callers of the classification facade.
#[derive(Debug, Error)]
pub enum ClassifyError {
    /// The caller supplied an unusable artifact.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every provider failed and the chain does not allow heuristic fallback.
    #[error("{kind} classification service unavailable: {reason}")]
    ServiceUnavailable { kind: ArtifactKind, reason: String },
}

/// Result type for facade operations.
pub type Result<T> = std::result::Result<T, ClassifyError>;
