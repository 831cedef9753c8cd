//! Remote model invocation.
//!
//! The pipeline only needs "prompt in, text out"; the Gemini REST client is
//! one implementation of [`ModelInvoker`], scripted fakes are another.

use crate::config::Config;
use crate::error::{ErrorCode, GenError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub trait ModelInvoker: Send + Sync {
    /// Sends `prompt` and returns the reply text, or `""` when the reply
    /// carries no text.
    fn generate(&self, prompt: &str) -> Result<String>;
}

impl<M: ModelInvoker + ?Sized> ModelInvoker for Box<M> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

impl<M: ModelInvoker + ?Sized> ModelInvoker for Arc<M> {
    fn generate(&self, prompt: &str) -> Result<String> {
        (**self).generate(prompt)
    }
}

/* ========================== Wire format ========================== */

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Debug)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize, Debug)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Deserialize, Debug, Default)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ReplyPart>,
}

#[derive(Deserialize, Debug)]
struct ReplyPart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    thought: bool,
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize, Debug)]
struct ApiError {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

fn request_body(prompt: &str, thinking_budget: u32) -> GenerateRequest<'_> {
    GenerateRequest {
        contents: vec![Content { parts: vec![Part { text: prompt }] }],
        generation_config: GenerationConfig {
            thinking_config: ThinkingConfig { thinking_budget },
        },
    }
}

/// Text of the first candidate, thought parts excluded.
fn reply_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .filter(|p| !p.thought)
                .filter_map(|p| p.text.as_deref())
                .collect::<String>()
        })
        .unwrap_or_default()
}

fn status_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(env) if !env.error.message.is_empty() => {
            format!("HTTP {} {}: {}", status.as_u16(), env.error.status, env.error.message)
        }
        _ => format!("HTTP {}", status),
    }
}

/* ========================== Gemini client ========================== */

pub struct GeminiClient {
    api_key: String,
    model: String,
    endpoint: String,
    thinking_budget: u32,
    client: reqwest::blocking::Client,
}

impl GeminiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::blocking::Client::builder().build().map_err(|e| GenError::Upstream {
            code: ErrorCode::UpstreamRequestFailed,
            message: format!("Failed to create HTTP client: {}", e),
            context: "client".to_string(),
        })?;

        Ok(Self {
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            thinking_budget: config.thinking_budget,
            client,
        })
    }

    fn url(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl ModelInvoker for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let url = self.url();
        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request_body(prompt, self.thinking_budget))
            .send()
            .map_err(|e| GenError::Upstream {
                code: ErrorCode::UpstreamRequestFailed,
                message: format!("Request failed: {}", e),
                context: self.model.clone(),
            })?;

        let status = response.status();
        let body = response.text().map_err(|e| GenError::Upstream {
            code: ErrorCode::UpstreamRequestFailed,
            message: format!("Failed to read response body: {}", e),
            context: self.model.clone(),
        })?;

        if !status.is_success() {
            return Err(GenError::Upstream {
                code: ErrorCode::UpstreamStatus,
                message: status_message(status, &body),
                context: self.model.clone(),
            });
        }

        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(|e| GenError::Upstream {
            code: ErrorCode::UpstreamMalformed,
            message: format!("Failed to parse response: {}", e),
            context: self.model.clone(),
        })?;

        Ok(reply_text(&parsed))
    }
}
