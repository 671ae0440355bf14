//! Canonical risk levels, classification requests, and results.

use serde::{Deserialize, Serialize};

/// Ordinal risk outcome shared by every provider and heuristic.
///
/// Ordering is meaningful: `None < Low < Medium < High`, so the worst of
/// several results is simply the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    /// No risk indicators found.
    None,
    /// Low risk. Also the "safe" verdict for URLs and files.
    Low,
    /// Needs caution.
    Medium,
    /// Likely malicious, fraudulent, or spam.
    High,
}

impl RiskLevel {
    /// Returns all levels in ascending order.
    pub fn all() -> &'static [RiskLevel] {
        &[
            RiskLevel::None,
            RiskLevel::Low,
            RiskLevel::Medium,
            RiskLevel::High,
        ]
    }

    /// Returns the lowercase label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskLevel::None => "none",
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        }
    }

    /// Returns the worst (highest) level, or `None` for an empty input.
    pub fn worst_of<I: IntoIterator<Item = RiskLevel>>(levels: I) -> RiskLevel {
        levels.into_iter().max().unwrap_or(RiskLevel::None)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of artifact being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactKind {
    Text,
    Url,
    File,
}

impl ArtifactKind {
    /// Returns all artifact kinds.
    pub fn all() -> &'static [ArtifactKind] {
        &[ArtifactKind::Text, ArtifactKind::Url, ArtifactKind::File]
    }

    /// Returns the lowercase label used on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            ArtifactKind::Text => "text",
            ArtifactKind::Url => "url",
            ArtifactKind::File => "file",
        }
    }

    /// The level reported when an artifact of this kind is judged safe.
    ///
    /// Text has a dedicated "no risk" verdict; URL and file verdicts have
    /// always bottomed out at `Low`.
    pub fn safe_floor(&self) -> RiskLevel {
        match self {
            ArtifactKind::Text => RiskLevel::None,
            ArtifactKind::Url | ArtifactKind::File => RiskLevel::Low,
        }
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// MIME types outside `text/*` whose payload is still plain text.
const TEXT_LIKE_MIME_TYPES: &[&str] = &[
    "application/json",
    "application/xml",
    "application/javascript",
    "application/x-javascript",
    "application/ecmascript",
    "application/x-sh",
    "application/x-yaml",
    "application/yaml",
    "application/csv",
    "application/sql",
    "application/x-httpd-php",
    "image/svg+xml",
];

/// Extensions treated as text when the MIME type is generic.
const TEXT_LIKE_EXTENSIONS: &[&str] = &[
    "txt", "md", "csv", "json", "xml", "html", "htm", "js", "ts", "css", "yaml", "yml", "ini",
    "log", "sh", "ps1", "py", "php", "sql", "eml", "svg", "rtf",
];

/// A user-submitted artifact to classify.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassificationRequest {
    Text {
        content: String,
    },
    Url {
        value: String,
    },
    File {
        name: String,
        mime_type: String,
        size_bytes: u64,
        content: Vec<u8>,
        /// Whether the content can be handed to text-based providers.
        is_text_like: bool,
    },
}

impl ClassificationRequest {
    /// Creates a text request.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// Creates a URL request.
    pub fn url(value: impl Into<String>) -> Self {
        Self::Url {
            value: value.into(),
        }
    }

    /// Creates a file request, deriving `is_text_like` from the MIME type,
    /// extension, and whether the bytes are valid UTF-8.
    pub fn file(
        name: impl Into<String>,
        mime_type: impl Into<String>,
        size_bytes: u64,
        content: Vec<u8>,
    ) -> Self {
        let name = name.into();
        let mime_type = mime_type.into();
        let is_text_like =
            looks_textual(&name, &mime_type) && std::str::from_utf8(&content).is_ok();

        Self::File {
            name,
            mime_type,
            size_bytes,
            content,
            is_text_like,
        }
    }

    /// Returns the artifact kind of this request.
    pub fn kind(&self) -> ArtifactKind {
        match self {
            Self::Text { .. } => ArtifactKind::Text,
            Self::Url { .. } => ArtifactKind::Url,
            Self::File { .. } => ArtifactKind::File,
        }
    }

    /// Short human-readable label for logs and history.
    pub fn label(&self) -> &str {
        match self {
            Self::Text { content } => content,
            Self::Url { value } => value,
            Self::File { name, .. } => name,
        }
    }
}

fn looks_textual(name: &str, mime_type: &str) -> bool {
    let mime = mime_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    if mime.starts_with("text/") || TEXT_LIKE_MIME_TYPES.contains(&mime.as_str()) {
        return true;
    }

    file_extension(name).is_some_and(|ext| TEXT_LIKE_EXTENSIONS.contains(&ext.as_str()))
}

/// Lowercased extension after the last `.`, without the dot.
pub(crate) fn file_extension(name: &str) -> Option<String> {
    let (_, ext) = name.rsplit_once('.')?;
    if ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Where a classification result came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResultSource {
    /// An external provider, by name.
    Provider { name: String },
    /// The local heuristic scorer.
    Heuristic,
}

impl ResultSource {
    /// Creates a provider source.
    pub fn provider(name: impl Into<String>) -> Self {
        Self::Provider { name: name.into() }
    }

    /// Returns true if the heuristic scorer produced the result.
    pub fn is_heuristic(&self) -> bool {
        matches!(self, Self::Heuristic)
    }
}

impl std::fmt::Display for ResultSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Provider { name } => f.write_str(name),
            Self::Heuristic => f.write_str("heuristic"),
        }
    }
}

/// Canonical output of any provider or heuristic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    /// Risk verdict.
    pub risk: RiskLevel,
    /// Confidence score (0.0 to 1.0).
    pub confidence: f32,
    /// Producer of this result.
    pub source: ResultSource,
    /// Producer-specific payload, surfaced for display only.
    pub detail: serde_json::Value,
}

impl ClassificationResult {
    /// Creates a new result, clamping confidence into `[0, 1]`.
    pub fn new(
        risk: RiskLevel,
        confidence: f32,
        source: ResultSource,
        detail: serde_json::Value,
    ) -> Self {
        Self {
            risk,
            confidence: clamp_confidence(confidence),
            source,
            detail,
        }
    }

    /// Creates a result attributed to the named provider.
    pub fn from_provider(
        name: &str,
        risk: RiskLevel,
        confidence: f32,
        detail: serde_json::Value,
    ) -> Self {
        Self::new(risk, confidence, ResultSource::provider(name), detail)
    }

    /// Creates a result attributed to the heuristic scorer.
    pub fn heuristic(risk: RiskLevel, confidence: f32, detail: serde_json::Value) -> Self {
        Self::new(risk, confidence, ResultSource::Heuristic, detail)
    }

    /// Returns true if the heuristic scorer produced this result.
    pub fn is_heuristic(&self) -> bool {
        self.source.is_heuristic()
    }
}

/// Clamps a confidence into `[0, 1]`; NaN becomes `0.0`.
pub fn clamp_confidence(confidence: f32) -> f32 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}
