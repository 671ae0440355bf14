//! Public classification entry point.

use std::sync::Arc;

use tracing::info;

use super::chain::FallbackChain;
use super::heuristic::{FileHeuristic, TextHeuristic, UrlHeuristic};
use super::risk::{ArtifactKind, ClassificationRequest, ClassificationResult};
use crate::config::{ConfigError, WardenConfig};
use crate::error::{ClassifyError, Result};
use crate::providers::{
    http_client, BinaryScanProvider, FileContentProvider, LlmTextProvider, SafeBrowsingProvider,
    VirusScanProvider,
};

/// Classifies text, URLs, and files through one fallback chain per kind.
///
/// Cheap to share behind an `Arc`; every call is independent.
pub struct Classifier {
    text: FallbackChain,
    url: FallbackChain,
    file: FallbackChain,
}

impl Classifier {
    /// Creates a classifier without providers; every kind is scored by its
    /// heuristic.
    pub fn heuristic_only() -> Self {
        Self {
            text: FallbackChain::new(ArtifactKind::Text, TextHeuristic::new()),
            url: FallbackChain::new(ArtifactKind::Url, UrlHeuristic::new()),
            file: FallbackChain::new(ArtifactKind::File, FileHeuristic::new()),
        }
    }

    /// Replaces the chain for the kind `chain` serves.
    pub fn with_chain(mut self, chain: FallbackChain) -> Self {
        match chain.kind() {
            ArtifactKind::Text => self.text = chain,
            ArtifactKind::Url => self.url = chain,
            ArtifactKind::File => self.file = chain,
        }
        self
    }

    /// Builds the default provider chains from configuration.
    ///
    /// Providers without credentials are still wired in; they fail fast as
    /// `Unconfigured` and the chain moves on.
    pub fn from_config(config: &WardenConfig) -> std::result::Result<Self, ConfigError> {
        let http = http_client()?;

        let text = FallbackChain::new(ArtifactKind::Text, TextHeuristic::new())
            .with_provider(Arc::new(LlmTextProvider::new(
                http.clone(),
                config.text_llm.clone(),
            )))
            .fallback_on_failure(config.text_fallback_on_failure);

        let url = FallbackChain::new(ArtifactKind::Url, UrlHeuristic::new())
            .with_provider(Arc::new(VirusScanProvider::new(
                http.clone(),
                config.virus_scan.clone(),
            )))
            .with_provider(Arc::new(SafeBrowsingProvider::new(
                http.clone(),
                config.safe_browsing.clone(),
            )));

        let file = FallbackChain::new(ArtifactKind::File, FileHeuristic::new())
            .with_provider(Arc::new(FileContentProvider::new(
                http.clone(),
                config.file_llm.clone(),
            )))
            .with_provider(Arc::new(BinaryScanProvider::new(
                http,
                config.binary_scan.clone(),
            )));

        Ok(Self::heuristic_only()
            .with_chain(text)
            .with_chain(url)
            .with_chain(file))
    }

    /// Returns the chain serving `kind`.
    pub fn chain(&self, kind: ArtifactKind) -> &FallbackChain {
        match kind {
            ArtifactKind::Text => &self.text,
            ArtifactKind::Url => &self.url,
            ArtifactKind::File => &self.file,
        }
    }

    /// Classifies a piece of free text.
    pub async fn classify_text(&self, content: &str) -> Result<ClassificationResult> {
        self.classify(ClassificationRequest::text(content)).await
    }

    /// Classifies a URL. The value is not checked for well-formedness.
    pub async fn classify_url(&self, value: &str) -> Result<ClassificationResult> {
        self.classify(ClassificationRequest::url(value)).await
    }

    /// Classifies an uploaded file.
    pub async fn classify_file(
        &self,
        name: &str,
        mime_type: &str,
        size_bytes: u64,
        content: Vec<u8>,
    ) -> Result<ClassificationResult> {
        self.classify(ClassificationRequest::file(
            name, mime_type, size_bytes, content,
        ))
        .await
    }

    /// Validates a request and runs it through the chain for its kind.
    pub async fn classify(&self, request: ClassificationRequest) -> Result<ClassificationResult> {
        validate(&request)?;

        let kind = request.kind();
        let result = self.chain(kind).execute(&request).await?;

        info!(
            kind = %kind,
            risk = %result.risk,
            confidence = result.confidence,
            source = %result.source,
            "Classified artifact"
        );
        Ok(result)
    }
}

fn validate(request: &ClassificationRequest) -> Result<()> {
    match request {
        ClassificationRequest::Text { content } if content.trim().is_empty() => Err(
            ClassifyError::InvalidInput("text must not be empty".to_string()),
        ),
        ClassificationRequest::Url { value } if value.trim().is_empty() => Err(
            ClassifyError::InvalidInput("url must not be empty".to_string()),
        ),
        ClassificationRequest::File { name, .. } if name.trim().is_empty() => Err(
            ClassifyError::InvalidInput("file name must not be empty".to_string()),
        ),
        _ => Ok(()),
    }
}
