use crate::domain::model::{GenerationRequest, GenerationResponse, RawCitation};
use crate::domain::ports::{ConfigProvider, GenerativeModel};
use crate::utils::error::{LocaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// REST client for the `generateContent` call of the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    timeout: Option<Duration>,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into().trim().trim_end_matches('/').to_string(),
            timeout: None,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.endpoint()).with_timeout(Duration::from_secs(config.timeout_seconds()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        };
        format!("{}/{}:generateContent", self.endpoint, model_path)
    }

    fn remote_error(model: &str, status: Option<u16>, message: impl Into<String>) -> LocaError {
        LocaError::RemoteCallError {
            model: model.to_string(),
            status,
            message: message.into(),
        }
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(
        &self,
        request: &GenerationRequest<'_>,
        credential: &str,
    ) -> Result<GenerationResponse> {
        let url = self.endpoint_for_model(request.model);
        let body = GenerateContentRequest::from_request(request);

        let mut http_request = self
            .client
            .post(&url)
            .header(API_KEY_HEADER, credential)
            .json(&body);
        if let Some(timeout) = self.timeout {
            http_request = http_request.timeout(timeout);
        }

        tracing::debug!("POST {}", url);
        let response = http_request
            .send()
            .await
            .map_err(|e| Self::remote_error(request.model, None, e.to_string()))?;

        let status = response.status();
        tracing::debug!("{} responded with {}", request.model, status);

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(Self::remote_error(
                request.model,
                Some(status.as_u16()),
                api_error_message(&text).unwrap_or_else(|| {
                    status
                        .canonical_reason()
                        .unwrap_or("request failed")
                        .to_string()
                }),
            ));
        }

        let payload: GenerateContentResponse = response.json().await.map_err(|e| {
            Self::remote_error(
                request.model,
                Some(status.as_u16()),
                format!("undecodable response body: {}", e),
            )
        })?;

        Ok(payload.into_generation_response())
    }
}

fn api_error_message(body: &str) -> Option<String> {
    let envelope: ApiErrorEnvelope = serde_json::from_str(body).ok()?;
    envelope.error.message.filter(|m| !m.is_empty())
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

impl<'a> GenerateContentRequest<'a> {
    fn from_request(request: &GenerationRequest<'a>) -> Self {
        let tools = if request.web_search {
            vec![Tool {
                google_search: GoogleSearch {},
            }]
        } else {
            Vec::new()
        };

        Self {
            contents: vec![Content {
                parts: vec![
                    Part::Text {
                        text: request.prompt,
                    },
                    Part::InlineData {
                        inline_data: Blob {
                            mime_type: request.image.mime_type,
                            data: request.image.data,
                        },
                    },
                ],
            }],
            tools,
            generation_config: request.reasoning_budget.map(|thinking_budget| {
                GenerationConfig {
                    thinking_config: ThinkingConfig { thinking_budget },
                }
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: Blob<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Blob<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

impl GenerateContentResponse {
    fn into_generation_response(self) -> GenerationResponse {
        let Some(candidate) = self.candidates.into_iter().next() else {
            return GenerationResponse::default();
        };

        let text = candidate
            .content
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter(|part| !part.thought.unwrap_or(false))
                    .filter_map(|part| part.text)
                    .collect::<String>()
            })
            .unwrap_or_default();

        let citations = candidate
            .grounding_metadata
            .map(|metadata| {
                metadata
                    .grounding_chunks
                    .into_iter()
                    .filter_map(|chunk| chunk.web)
                    .map(|web| RawCitation {
                        title: web.title,
                        uri: web.uri,
                    })
                    .collect()
            })
            .unwrap_or_default();

        GenerationResponse { text, citations }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
    thought: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::InlineImage;
    use httpmock::prelude::*;
    use serde_json::json;

    fn request<'a>(model: &'a str, reasoning_budget: Option<u32>, web_search: bool) -> GenerationRequest<'a> {
        GenerationRequest {
            model,
            prompt: "Where is this?",
            image: InlineImage {
                mime_type: "image/jpeg",
                data: "aGVsbG8=",
            },
            web_search,
            reasoning_budget,
        }
    }

    #[test]
    fn test_endpoint_for_model() {
        let client = GeminiClient::new("https://example.com/v1beta/");
        assert_eq!(
            client.endpoint_for_model("gemini-2.0-flash"),
            "https://example.com/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            client.endpoint_for_model("models/gemini-2.5-flash"),
            "https://example.com/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_request_body_shape() {
        let body = GenerateContentRequest::from_request(&request("m", Some(24576), true));
        let value = serde_json::to_value(&body).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        {"text": "Where is this?"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "aGVsbG8="}}
                    ]
                }],
                "tools": [{"googleSearch": {}}],
                "generationConfig": {"thinkingConfig": {"thinkingBudget": 24576}}
            })
        );
    }

    #[test]
    fn test_zero_budget_and_no_search_omit_fields() {
        let body = GenerateContentRequest::from_request(&request("m", None, false));
        let value = serde_json::to_value(&body).unwrap();
        assert!(value.get("generationConfig").is_none());
        assert!(value.get("tools").is_none());
    }

    #[test]
    fn test_response_text_skips_thoughts_and_collects_web_chunks() {
        let payload: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {"parts": [
                    {"text": "thinking...", "thought": true},
                    {"text": "{\"a\":"},
                    {"text": "1}"}
                ]},
                "groundingMetadata": {"groundingChunks": [
                    {"web": {"uri": "https://a.example", "title": "A"}},
                    {"retrievedContext": {"uri": "ignored"}},
                    {"web": {"uri": "https://b.example"}}
                ]}
            }]
        }))
        .unwrap();

        let response = payload.into_generation_response();
        assert_eq!(response.text, "{\"a\":1}");
        assert_eq!(
            response.citations,
            vec![
                RawCitation::new(Some("A"), Some("https://a.example")),
                RawCitation::new(None, Some("https://b.example")),
            ]
        );
    }

    #[test]
    fn test_empty_candidates_give_empty_text() {
        let payload: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(payload.into_generation_response(), GenerationResponse::default());
    }

    #[tokio::test]
    async fn test_generate_posts_with_api_key() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/models/gemini-2.5-flash:generateContent")
                .header("x-goog-api-key", "secret")
                .body_contains("\"thinkingBudget\":24576")
                .body_contains("\"googleSearch\"");
            then.status(200).json_body(json!({
                "candidates": [{"content": {"parts": [{"text": "hello"}]}}]
            }));
        });

        let client = GeminiClient::new(server.url(""));
        let response = client
            .generate(&request("gemini-2.5-flash", Some(24576), true), "secret")
            .await
            .unwrap();

        api_mock.assert();
        assert_eq!(response.text, "hello");
        assert!(response.citations.is_empty());
    }

    #[tokio::test]
    async fn test_http_error_becomes_remote_call_error() {
        let server = MockServer::start();
        let api_mock = server.mock(|when, then| {
            when.method(POST).path("/models/gemini-2.0-flash:generateContent");
            then.status(503).json_body(json!({
                "error": {"code": 503, "message": "The model is overloaded.", "status": "UNAVAILABLE"}
            }));
        });

        let client = GeminiClient::new(server.url(""));
        let err = client
            .generate(&request("gemini-2.0-flash", None, true), "secret")
            .await
            .unwrap_err();

        api_mock.assert();
        match err {
            LocaError::RemoteCallError {
                model,
                status,
                message,
            } => {
                assert_eq!(model, "gemini-2.0-flash");
                assert_eq!(status, Some(503));
                assert_eq!(message, "The model is overloaded.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_non_json_error_body_uses_status_reason() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST);
            then.status(403).body("denied");
        });

        let client = GeminiClient::new(server.url(""));
        let err = client
            .generate(&request("gemini-2.0-flash", None, false), "bad")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LocaError::RemoteCallError { status: Some(403), ref message, .. } if message == "Forbidden"
        ));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_remote_call_error() {
        let client = GeminiClient::new("http://127.0.0.1:1/v1beta");
        let err = client
            .generate(&request("gemini-2.0-flash", None, false), "secret")
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            LocaError::RemoteCallError { status: None, ref model, .. } if model == "gemini-2.0-flash"
        ));
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Remote);
    }
}
