use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::future::Future;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::GeminiSettings;

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Model request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Model API returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("Model returned no text")]
    Empty,
}

/// Anything that turns a prompt into free text.
pub trait TextGenerator: Send + Sync {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, GenerateError>> + Send;
}

/// Client for the Gemini `generateContent` REST endpoint.
///
/// Built once at startup and shared across workers; no request timeout is set.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: Secret<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [RequestContent<'a>; 1],
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: [RequestPart<'a>; 1],
}

#[derive(Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: &GeminiSettings) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint_url(&settings.base_url, &settings.model),
            api_key: settings.api_key.clone(),
        }
    }
}

fn endpoint_url(base_url: &str, model: &str) -> String {
    format!(
        "{}/v1beta/models/{}:generateContent",
        base_url.trim_end_matches('/'),
        model
    )
}

/// Concatenated text parts of the first candidate.
fn extract_text(response: GenerateResponse) -> Result<String, GenerateError> {
    let text: String = response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.is_empty() {
        return Err(GenerateError::Empty);
    }
    Ok(text)
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateRequest {
            contents: [RequestContent {
                parts: [RequestPart { text: prompt }],
            }],
        };

        debug!(endpoint = %self.endpoint, prompt_len = prompt.len(), "Sending generateContent request");

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.expose_secret())
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            warn!(status, "Model API returned an error");
            return Err(GenerateError::Status { status, body });
        }

        let parsed: GenerateResponse = response.json().await?;
        extract_text(parsed)
    }
}
