//! Gemini `generateContent` client for the `LlmClient` port.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::ports::llm::{CompletionFuture, CompletionRequest, CompletionResponse, LlmClient};
use crate::ports::PortError;

/// Calls the Gemini REST API with a key supplied at construction.
pub struct GeminiClient {
    client: Client,
    api_base: String,
    api_key: String,
}

impl GeminiClient {
    /// Creates a client for `api_base` (e.g. `https://generativelanguage.googleapis.com/v1beta`).
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PortError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, api_base: api_base.into(), api_key: api_key.into() })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.api_base.trim_end_matches('/'))
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [OutgoingPart<'a>; 1],
}

#[derive(Serialize)]
struct OutgoingPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    top_k: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: UsageMetadata,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<IncomingPart>,
}

#[derive(Deserialize)]
struct IncomingPart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

/// Error envelope returned by Google APIs.
#[derive(Deserialize)]
struct ApiError {
    error: ApiErrorDetail,
}

#[derive(Deserialize)]
struct ApiErrorDetail {
    message: String,
}

/// Formats a non-success response so callers can classify it by message.
fn status_error(status: StatusCode, body: &str) -> String {
    let detail = serde_json::from_str::<ApiError>(body)
        .map(|e| e.error.message)
        .unwrap_or_else(|_| body.trim().to_string());
    match status {
        StatusCode::TOO_MANY_REQUESTS => {
            format!("Gemini API rate limit reached ({}): {detail}", status.as_u16())
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            format!("Gemini API key rejected ({}): {detail}", status.as_u16())
        }
        _ => format!("Gemini API error ({}): {detail}", status.as_u16()),
    }
}

fn into_completion(response: GenerateResponse) -> Result<CompletionResponse, PortError> {
    let content = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .ok_or("Gemini API returned no candidates")?;

    Ok(CompletionResponse {
        text: content.parts.into_iter().map(|p| p.text).collect(),
        prompt_tokens: response.usage_metadata.prompt_token_count,
        completion_tokens: response.usage_metadata.candidates_token_count,
    })
}

impl LlmClient for GeminiClient {
    fn complete(&self, request: &CompletionRequest) -> CompletionFuture<'_> {
        let url = self.endpoint(&request.model);
        let prompt = request.prompt.clone();
        let generation_config = GenerationConfig {
            temperature: request.temperature,
            top_p: request.top_p,
            top_k: request.top_k,
        };

        Box::pin(async move {
            let body = GenerateRequest {
                contents: [Content { parts: [OutgoingPart { text: &prompt }] }],
                generation_config,
            };

            let response = self
                .client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&body)
                .send()
                .await
                .map_err(|e| -> PortError { format!("Gemini API request failed: {e}").into() })?;

            let status = response.status();
            let text = response.text().await.map_err(|e| -> PortError {
                format!("Failed to read Gemini API response: {e}").into()
            })?;

            if !status.is_success() {
                return Err(status_error(status, &text).into());
            }

            let parsed: GenerateResponse = serde_json::from_str(&text).map_err(|e| -> PortError {
                format!("Failed to parse Gemini API response: {e}").into()
            })?;
            into_completion(parsed)
        })
    }
}
