//! Gemini `generateContent` client and the remote [`AdviceProvider`].
//!
//! Single attempt per call, no retry, no cancellation: the widget allows one
//! outstanding request and the user simply re-sends on failure.

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::{
    prompts, AdviceProvider, MatchScore, EMPTY_REPLY, OFFLINE_REPLY, UNCONFIGURED_REPLY,
};
use crate::models::user::UserProfile;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all coach calls.
pub const MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Error)]
pub enum AdviceError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Backend returned empty content")]
    EmptyContent,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig", skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: &'static str,
    response_schema: Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Deserialize)]
struct TextPart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Text of the first candidate part, if any.
    fn text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .parts
            .iter()
            .find_map(|p| p.text.as_deref())
    }
}

/// Low-level HTTP client for the generateContent endpoint.
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(30))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    async fn call(&self, body: &GenerateRequest<'_>) -> Result<GenerateResponse, AdviceError> {
        let url = format!("{GEMINI_API_BASE}/{MODEL}:generateContent");
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AdviceError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse = response.json().await?;
        debug!("generateContent succeeded ({} candidates)", parsed.candidates.len());
        Ok(parsed)
    }

    /// Free-text generation.
    pub async fn generate(&self, prompt: &str) -> Result<String, AdviceError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: None,
        };
        let response = self.call(&body).await?;
        response
            .text()
            .map(str::to_string)
            .ok_or(AdviceError::EmptyContent)
    }

    /// JSON-mode generation against a declared response schema.
    pub async fn generate_json<T: DeserializeOwned>(
        &self,
        prompt: &str,
        schema: Value,
    ) -> Result<T, AdviceError> {
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json",
                response_schema: schema,
            }),
        };
        let response = self.call(&body).await?;
        let text = response.text().ok_or(AdviceError::EmptyContent)?;
        serde_json::from_str(strip_json_fences(text)).map_err(AdviceError::Parse)
    }
}

/// Strips ```json ... ``` fences in case the model wraps its JSON anyway.
fn strip_json_fences(text: &str) -> &str {
    let t = text.trim();
    let t = t
        .strip_prefix("```json")
        .or_else(|| t.strip_prefix("```"))
        .unwrap_or(t);
    t.strip_suffix("```").unwrap_or(t).trim()
}

/// Maps a generation outcome to the coach reply. Empty or missing text gets
/// the "couldn't generate" copy; transport and API failures get the offline
/// copy. Never an error.
fn reply_text(result: Result<String, AdviceError>) -> String {
    match result {
        Ok(text) if !text.trim().is_empty() => text,
        Ok(_) | Err(AdviceError::EmptyContent) => EMPTY_REPLY.to_string(),
        Err(e) => {
            warn!("career advice call failed: {e}");
            OFFLINE_REPLY.to_string()
        }
    }
}

/// The remote advice provider. Holds no client when the credential is absent
/// and degrades to the fixed fallback replies without touching the network.
pub struct GeminiAdvice {
    client: Option<GeminiClient>,
}

impl GeminiAdvice {
    pub fn from_key(api_key: Option<String>) -> Self {
        GeminiAdvice {
            client: api_key.map(GeminiClient::new),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }
}

#[async_trait]
impl AdviceProvider for GeminiAdvice {
    async fn career_advice(&self, profile: &UserProfile, query: &str) -> String {
        let Some(client) = &self.client else {
            return UNCONFIGURED_REPLY.to_string();
        };
        let prompt = prompts::career_advice_prompt(profile, query);
        reply_text(client.generate(&prompt).await)
    }

    async fn match_score(&self, job_description: &str, skills: &[String]) -> Option<MatchScore> {
        let client = self.client.as_ref()?;
        let prompt = prompts::match_score_prompt(job_description, skills);
        match client
            .generate_json::<MatchScore>(&prompt, prompts::match_score_schema())
            .await
        {
            Ok(mut score) => {
                score.score = score.score.clamp(0.0, 100.0);
                Some(score)
            }
            Err(e) => {
                warn!("match score call failed: {e}");
                None
            }
        }
    }
}
