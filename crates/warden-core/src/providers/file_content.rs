//! Content-aware file review by an LLM, for text-like uploads only.

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::json;

use super::llm::ChatClient;
use crate::classifier::patterns::{phrases, PatternCategory, PatternTable};
use crate::classifier::{
    ArtifactKind, ClassificationProvider, ClassificationRequest, ClassificationResult, RiskLevel,
};
use crate::config::ProviderEndpoint;
use crate::error::ProviderError;

const PROVIDER_NAME: &str = "llm-file";

/// Only this many characters of a file are sent for review.
pub const MAX_FILE_CHARS: usize = 30_000;

const SYSTEM_PROMPT: &str = "You are a security analyst reviewing uploaded files for \
malware, phishing, scams, and other threats.";

const HIGH_RISK_PHRASES: &[&str] = &[
    "high risk",
    "dangerous",
    "malicious",
    "threat",
    "malware",
    "phishing",
];
const MEDIUM_RISK_PHRASES: &[&str] = &[
    "medium risk",
    "suspicious",
    "caution",
    "warning",
    "potential risk",
];
const LOW_RISK_PHRASES: &[&str] = &["low risk", "safe", "clean", "legitimate"];

/// Parses the free-text review of the file classifier.
///
/// Tiers are checked high, then medium, then low. An explicit
/// `confidence: <number>` overrides the tier default; values above 1 are read
/// as percentages.
#[derive(Debug, Clone)]
pub struct FileVerdictParser {
    table: PatternTable,
    confidence: Regex,
}

impl FileVerdictParser {
    pub fn new() -> Self {
        let mut rules = phrases(HIGH_RISK_PHRASES, 1.0, PatternCategory::HighRiskPhrase);
        rules.extend(phrases(MEDIUM_RISK_PHRASES, 1.0, PatternCategory::MediumRiskPhrase));
        rules.extend(phrases(LOW_RISK_PHRASES, 1.0, PatternCategory::LowRiskPhrase));

        Self {
            table: PatternTable::new(rules).expect("built-in review phrases are valid"),
            confidence: RegexBuilder::new(r"confidence:\s*([0-9]*\.?[0-9]+)")
                .case_insensitive(true)
                .build()
                .expect("built-in confidence pattern is valid"),
        }
    }

    fn explicit_confidence(&self, text: &str) -> Option<f32> {
        let value: f32 = self.confidence.captures(text)?[1].parse().ok()?;
        Some(if value > 1.0 { value / 100.0 } else { value })
    }

    /// Turns the review text into a canonical result.
    pub fn parse(&self, provider: &str, text: &str) -> Result<ClassificationResult, ProviderError> {
        if text.trim().is_empty() {
            return Err(ProviderError::unparseable(provider, "empty review"));
        }

        let matched = self.table.matches(text);
        let has = |category: PatternCategory| matched.iter().any(|r| r.category == category);

        let (risk, default_confidence, reason) = if has(PatternCategory::HighRiskPhrase) {
            (RiskLevel::High, 0.90, "high risk indicators in review")
        } else if has(PatternCategory::MediumRiskPhrase) {
            (RiskLevel::Medium, 0.80, "medium risk indicators in review")
        } else if has(PatternCategory::LowRiskPhrase) {
            (ArtifactKind::File.safe_floor(), 0.85, "review judged the file safe")
        } else {
            // Permissive default: prose with no recognizable verdict passes as low risk.
            (ArtifactKind::File.safe_floor(), 0.75, "no risk indicators in review")
        };

        let confidence = self.explicit_confidence(text).unwrap_or(default_confidence);
        let keywords: Vec<&str> = matched.iter().map(|r| r.pattern).collect();

        Ok(ClassificationResult::from_provider(
            provider,
            risk,
            confidence,
            json!({
                "reason": reason,
                "keywords": keywords,
                "response": text,
            }),
        ))
    }
}

impl Default for FileVerdictParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns at most `max_chars` leading characters of `text`.
fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// File adapter that asks an LLM to review text-like file content.
pub struct FileContentProvider {
    client: ChatClient,
    parser: FileVerdictParser,
}

impl FileContentProvider {
    pub fn new(http: reqwest::Client, endpoint: ProviderEndpoint) -> Self {
        Self {
            client: ChatClient::new(PROVIDER_NAME, http, endpoint),
            parser: FileVerdictParser::new(),
        }
    }

    fn prompt(name: &str, mime_type: &str, excerpt: &str, truncated: bool) -> String {
        let note = if truncated {
            format!(" (only the first {MAX_FILE_CHARS} characters are shown)")
        } else {
            String::new()
        };
        format!(
            "Review the uploaded file \"{name}\" ({mime_type}){note} for security risks such as \
malware, phishing, scams, or malicious scripts.\n\
Rate the overall risk as low risk, medium risk, or high risk, explain briefly, and finish \
with a line `Confidence: <0.0-1.0>`.\n\n\
File content:\n\"\"\"\n{excerpt}\n\"\"\""
        )
    }
}

#[async_trait]
impl ClassificationProvider for FileContentProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn accepts(&self, request: &ClassificationRequest) -> bool {
        matches!(
            request,
            ClassificationRequest::File {
                is_text_like: true,
                ..
            }
        )
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

        let text = std::str::from_utf8(content).map_err(|e| {
            ProviderError::unconfigured(PROVIDER_NAME, format!("content is not UTF-8: {e}"))
        })?;
        let excerpt = truncate_chars(text, MAX_FILE_CHARS);
        let truncated = excerpt.len() < text.len();

        let answer = self
            .client
            .complete(SYSTEM_PROMPT, &Self::prompt(name, mime_type, excerpt, truncated))
            .await?;
        self.parser.parse(PROVIDER_NAME, &answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use crate::providers::llm::tests::completion;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn parse(text: &str) -> Result<ClassificationResult, ProviderError> {
        FileVerdictParser::new().parse(PROVIDER_NAME, text)
    }

    #[test]
    fn malicious_review_is_high() {
        let result = parse("This script downloads malware from a remote host.").unwrap();
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 0.90);
    }

    #[test]
    fn high_beats_low_wording() {
        let result = parse("Looks clean at first, but it is a phishing page.").unwrap();
        assert_eq!(result.risk, RiskLevel::High);
    }

    #[test]
    fn suspicious_review_is_medium() {
        let result = parse("Medium risk: contains suspicious obfuscated code.").unwrap();
        assert_eq!(result.risk, RiskLevel::Medium);
        assert_eq!(result.confidence, 0.80);
    }

    #[test]
    fn safe_review_is_low() {
        let result = parse("Low risk. A legitimate CSV export.").unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn explicit_confidence_overrides_default() {
        let result = parse("Low risk.\nConfidence: 0.62").unwrap();
        assert!((result.confidence - 0.62).abs() < 1e-6);

        let result = parse("High risk.\nconfidence: 93").unwrap();
        assert!((result.confidence - 0.93).abs() < 1e-6);
    }

    #[test]
    fn no_keywords_defaults_to_low() {
        let result = parse("The document lists quarterly figures.").unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.confidence, 0.75);
    }

    #[test]
    fn empty_review_is_unparseable() {
        let err = parse("   ").unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::UnparseableResponse);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let text = "é".repeat(10);
        assert_eq!(truncate_chars(&text, 3), "ééé");
        assert_eq!(truncate_chars("short", 30), "short");
    }

    #[test]
    fn accepts_only_text_like_files() {
        let provider = FileContentProvider::new(
            reqwest::Client::new(),
            ProviderEndpoint::new("http://127.0.0.1:9", 5),
        );
        let text = ClassificationRequest::file("a.txt", "text/plain", 2, b"hi".to_vec());
        let binary =
            ClassificationRequest::file("a.exe", "application/octet-stream", 2, b"MZ".to_vec());
        assert!(provider.accepts(&text));
        assert!(!provider.accepts(&binary));
        assert!(!provider.accepts(&ClassificationRequest::text("hi")));
    }

    #[tokio::test]
    async fn reviews_file_through_chat_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "Suspicious: the script disables antivirus. Confidence: 0.7",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let provider = FileContentProvider::new(
            reqwest::Client::new(),
            ProviderEndpoint::new(server.uri(), 5).with_api_key("sk-test"),
        );
        let request = ClassificationRequest::file(
            "run.sh",
            "application/x-sh",
            24,
            b"Set-MpPreference -Disable".to_vec(),
        );
        let result = provider.classify(&request).await.unwrap();
        assert_eq!(result.risk, RiskLevel::Medium);
        assert!((result.confidence - 0.7).abs() < 1e-6);
    }
}
