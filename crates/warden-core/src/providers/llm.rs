//! Minimal OpenAI-compatible chat completion client.

use serde::{Deserialize, Serialize};

use super::send_for_json;
use crate::config::{ProviderEndpoint, DEFAULT_LLM_MODEL};
use crate::error::ProviderError;

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    content: Option<String>,
}

/// Sends one system + user exchange and returns the reply text.
#[derive(Debug, Clone)]
pub struct ChatClient {
    provider: &'static str,
    http: reqwest::Client,
    endpoint: ProviderEndpoint,
}

impl ChatClient {
    /// Creates a client reporting failures under `provider`.
    pub fn new(provider: &'static str, http: reqwest::Client, endpoint: ProviderEndpoint) -> Self {
        Self {
            provider,
            http,
            endpoint,
        }
    }

    /// Returns the endpoint configuration.
    pub fn endpoint(&self) -> &ProviderEndpoint {
        &self.endpoint
    }

    /// Runs a completion. An empty or missing reply is unparseable.
    pub async fn complete(&self, system: &str, user: &str) -> Result<String, ProviderError> {
        let api_key = self
            .endpoint
            .api_key()
            .ok_or_else(|| ProviderError::unconfigured(self.provider, "no API key configured"))?;

        let body = ChatRequest {
            model: self.endpoint.model.as_deref().unwrap_or(DEFAULT_LLM_MODEL),
            messages: [
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: 0.0,
        };

        let request = self
            .http
            .post(self.endpoint.url("chat/completions"))
            .bearer_auth(api_key)
            .timeout(self.endpoint.timeout())
            .json(&body);

        let response: ChatResponse = send_for_json(self.provider, request).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| ProviderError::unparseable(self.provider, "completion has no content"))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ProviderErrorKind;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    /// A chat completion body carrying `content`.
    pub(crate) fn completion(content: &str) -> serde_json::Value {
        json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": content},
                "finish_reason": "stop"
            }]
        })
    }

    fn client(server: &MockServer) -> ChatClient {
        ChatClient::new(
            "llm-test",
            reqwest::Client::new(),
            ProviderEndpoint::new(server.uri(), 5).with_api_key("sk-test"),
        )
    }

    #[tokio::test]
    async fn returns_reply_content() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("authorization", "Bearer sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("Score: 5")))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server).complete("system", "user").await.unwrap();
        assert_eq!(reply, "Score: 5");
    }

    #[tokio::test]
    async fn missing_key_is_unconfigured() {
        let client = ChatClient::new(
            "llm-test",
            reqwest::Client::new(),
            ProviderEndpoint::new("http://127.0.0.1:9", 5),
        );
        let err = client.complete("s", "u").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Unconfigured);
    }

    #[tokio::test]
    async fn unauthorized_is_auth_failed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let err = client(&server).complete("s", "u").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::AuthFailed);
    }

    #[tokio::test]
    async fn server_error_is_network() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let err = client(&server).complete("s", "u").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Network);
    }

    #[tokio::test]
    async fn empty_choices_are_unparseable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
            .mount(&server)
            .await;

        let err = client(&server).complete("s", "u").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::UnparseableResponse);
    }

    #[tokio::test]
    async fn slow_reply_is_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("late"))
                    .set_delay(std::time::Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let client = ChatClient::new(
            "llm-test",
            reqwest::Client::new(),
            ProviderEndpoint::new(server.uri(), 1).with_api_key("sk-test"),
        );
        let err = client.complete("s", "u").await.unwrap_err();
        assert_eq!(err.kind, ProviderErrorKind::Timeout);
    }
}
