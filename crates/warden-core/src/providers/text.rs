//! LLM-backed spam/scam classifier for free text.

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};
use serde_json::json;

use super::llm::ChatClient;
use crate::classifier::{
    ArtifactKind, ClassificationProvider, ClassificationRequest, ClassificationResult, RiskLevel,
};
use crate::config::ProviderEndpoint;
use crate::error::ProviderError;

const PROVIDER_NAME: &str = "llm-text";

const SYSTEM_PROMPT: &str = "You are a fraud and spam detection assistant. \
You review messages that users received and judge whether they are spam, a scam, or safe.";

/// Scores at or above this are `High` risk.
const HIGH_SCORE: u64 = 71;
/// Scores at or above this (and below `HIGH_SCORE`) are `Low` risk.
const SPAM_SCORE: u64 = 31;

/// Parses the free-text answer of the text classifier.
///
/// The model is asked for `Classification: <Spam|Scam|Safe>` and
/// `Score: <0-100>`; either may be missing or embedded in prose.
#[derive(Debug, Clone)]
pub struct TextVerdictParser {
    classification: Regex,
    score: Regex,
    score_fallback: Regex,
}

impl TextVerdictParser {
    pub fn new() -> Self {
        let build = |pattern: &str| {
            RegexBuilder::new(pattern)
                .case_insensitive(true)
                .build()
                .expect("built-in verdict patterns are valid")
        };

        Self {
            classification: build(r"classification:\s*(spam|scam|safe)"),
            score: build(r"score:\s*(\d+)"),
            score_fallback: build(r"(\d+)\s*(?:/100|%)"),
        }
    }

    fn label(&self, text: &str) -> Option<String> {
        self.classification
            .captures(text)
            .map(|c| c[1].to_ascii_lowercase())
    }

    fn score(&self, text: &str) -> Option<u64> {
        self.score
            .captures(text)
            .or_else(|| self.score_fallback.captures(text))
            .and_then(|c| c[1].parse().ok())
    }

    /// Turns the model's answer into a canonical result.
    ///
    /// Scam wording or a score of 71+ is `High`; spam wording or 31..=70 is
    /// `Low`; everything else is the text safe floor. An answer with no
    /// label, score, or spam/scam wording is unparseable rather than safe.
    pub fn parse(&self, provider: &str, text: &str) -> Result<ClassificationResult, ProviderError> {
        let lower = text.to_lowercase();
        let label = self.label(text);
        let score = self.score(text);
        let mentions_scam = lower.contains("scam") || lower.contains("fraud");
        let mentions_spam = lower.contains("spam");

        if label.is_none() && score.is_none() && !mentions_scam && !mentions_spam {
            return Err(ProviderError::unparseable(
                provider,
                "answer has no classification or score",
            ));
        }

        let fraction = score.map(|s| s as f32 / 100.0);
        let (risk, confidence) = if label.as_deref() == Some("scam")
            || mentions_scam
            || score.is_some_and(|s| s >= HIGH_SCORE)
        {
            (RiskLevel::High, fraction.unwrap_or(0.85).clamp(0.85, 0.99))
        } else if label.as_deref() == Some("spam")
            || mentions_spam
            || score.is_some_and(|s| (SPAM_SCORE..HIGH_SCORE).contains(&s))
        {
            // "Spam" is reported as Low: text has no Medium tier.
            (RiskLevel::Low, fraction.unwrap_or(0.70).clamp(0.70, 0.95))
        } else {
            (
                ArtifactKind::Text.safe_floor(),
                fraction.map_or(0.85, |f| 1.0 - f).clamp(0.85, 0.99),
            )
        };

        Ok(ClassificationResult::from_provider(
            provider,
            risk,
            confidence,
            json!({
                "classification": label,
                "score": score,
                "response": text,
            }),
        ))
    }
}

impl Default for TextVerdictParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Text adapter backed by an OpenAI-compatible chat model.
pub struct LlmTextProvider {
    client: ChatClient,
    parser: TextVerdictParser,
}

impl LlmTextProvider {
    pub fn new(http: reqwest::Client, endpoint: ProviderEndpoint) -> Self {
        Self {
            client: ChatClient::new(PROVIDER_NAME, http, endpoint),
            parser: TextVerdictParser::new(),
        }
    }

    fn prompt(text: &str) -> String {
        format!(
            "Classify the following message as Spam, Scam, or Safe and rate how likely it is \
to be harmful on a scale from 0 (certainly safe) to 100 (certainly harmful).\n\
Answer exactly in this format:\n\
Classification: <Spam|Scam|Safe>\n\
Score: <0-100>\n\
Reason: <one sentence>\n\n\
Message:\n\"\"\"\n{text}\n\"\"\""
        )
    }
}

#[async_trait]
impl ClassificationProvider for LlmTextProvider {
    fn name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn accepts(&self, request: &ClassificationRequest) -> bool {
        matches!(request, ClassificationRequest::Text { .. })
    }

    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, ProviderError> {
        let ClassificationRequest::Text { content } = request else {
            return Err(ProviderError::unconfigured(
                PROVIDER_NAME,
                "only text requests are supported",
            ));
        };

        let answer = self.client.complete(SYSTEM_PROMPT, &Self::prompt(content)).await?;
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
        TextVerdictParser::new().parse(PROVIDER_NAME, text)
    }

    #[test]
    fn safe_answer_is_no_risk() {
        let result = parse("Classification: Safe\nScore: 12\nReason: ordinary greeting").unwrap();
        assert_eq!(result.risk, RiskLevel::None);
        assert!((0.85..=0.99).contains(&result.confidence));
        assert!((result.confidence - 0.88).abs() < 1e-6);
    }

    #[test]
    fn scam_label_is_high() {
        let result = parse("Classification: Scam\nScore: 40").unwrap();
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 0.85);
    }

    #[test]
    fn fraud_wording_is_high() {
        let result = parse("Score: 20. This looks like advance-fee fraud.").unwrap();
        assert_eq!(result.risk, RiskLevel::High);
    }

    #[test]
    fn high_score_is_high() {
        let result = parse("Classification: Safe\nScore: 90").unwrap();
        assert_eq!(result.risk, RiskLevel::High);
        assert!((result.confidence - 0.90).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_score_clamps_to_ceiling() {
        let result = parse("Score: 150").unwrap();
        assert_eq!(result.risk, RiskLevel::High);
        assert_eq!(result.confidence, 0.99);
    }

    #[test]
    fn spam_label_is_low() {
        let result = parse("Classification: Spam\nScore: 55").unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
        assert!((result.confidence - 0.70).abs() < 1e-6);
    }

    #[test]
    fn mid_range_score_without_label_is_low() {
        let result = parse("I'd put this at 45/100.").unwrap();
        assert_eq!(result.risk, RiskLevel::Low);
        assert_eq!(result.detail["score"], json!(45));
    }

    #[test]
    fn score_boundaries() {
        assert_eq!(parse("Score: 30").unwrap().risk, RiskLevel::None);
        assert_eq!(parse("Score: 31").unwrap().risk, RiskLevel::Low);
        assert_eq!(parse("Score: 70").unwrap().risk, RiskLevel::Low);
        assert_eq!(parse("Score: 71").unwrap().risk, RiskLevel::High);
    }

    #[test]
    fn case_insensitive_label() {
        let result = parse("CLASSIFICATION: SAFE\nSCORE: 0").unwrap();
        assert_eq!(result.risk, RiskLevel::None);
        assert_eq!(result.confidence, 0.99);
        assert_eq!(result.detail["classification"], json!("safe"));
    }

    #[test]
    fn prose_without_verdict_is_unparseable() {
        let err = parse("I cannot help with that request.").unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::UnparseableResponse);
    }

    #[test]
    fn result_is_attributed_to_provider() {
        let result = parse("Classification: Safe\nScore: 1").unwrap();
        assert_eq!(
            result.source,
            crate::classifier::ResultSource::provider(PROVIDER_NAME)
        );
    }

    #[tokio::test]
    async fn classifies_through_chat_endpoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("Classification: Scam\nScore: 97\nReason: prize bait")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let provider = LlmTextProvider::new(
            reqwest::Client::new(),
            ProviderEndpoint::new(server.uri(), 5).with_api_key("sk-test"),
        );
        let result = provider
            .classify(&ClassificationRequest::text("You have won!"))
            .await
            .unwrap();
        assert_eq!(result.risk, RiskLevel::High);
        assert!((result.confidence - 0.97).abs() < 1e-6);
    }

    #[test]
    fn accepts_only_text() {
        let provider = LlmTextProvider::new(
            reqwest::Client::new(),
            ProviderEndpoint::new("http://127.0.0.1:9", 5),
        );
        assert!(provider.accepts(&ClassificationRequest::text("hi")));
        assert!(!provider.accepts(&ClassificationRequest::url("http://x")));
    }
}
