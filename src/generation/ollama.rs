//! Ollama-backed answer generator
//!
//! Calls POST /api/generate with `stream: false` and `format: "json"` so the
//! model returns one JSON body matching the answer shape. Network-level
//! failures map to transient outcomes; unparseable model output maps to a
//! malformed outcome for the corrective-retry path.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;

use crate::errors::{DocAnchorError, Result};
use crate::generation::{GenerationOutcome, Generator};
use crate::grounding::Answer;

/// Default Ollama API endpoint
pub const DEFAULT_OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default generation model
pub const DEFAULT_MODEL: &str = "qwen2.5:7b-instruct";

/// Generation request timeout
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Low temperature keeps cited output close to the source text
const TEMPERATURE: f64 = 0.1;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    format: &'a str,
    options: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

/// Ollama generation client
#[derive(Debug, Clone)]
pub struct OllamaGenerator {
    client: Client,
    base_url: String,
    model: String,
}

impl OllamaGenerator {
    /// Create a generator with default endpoint and model
    pub fn new() -> Result<Self> {
        Self::with_config(DEFAULT_OLLAMA_URL, DEFAULT_MODEL)
    }

    /// Create a generator against a specific endpoint and model
    pub fn with_config(base_url: &str, model: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(DocAnchorError::Http)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    /// Check whether the Ollama server is reachable
    pub async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        self.client
            .get(&url)
            .timeout(Duration::from_secs(2))
            .send()
            .await
            .is_ok()
    }
}

#[async_trait]
impl Generator for OllamaGenerator {
    async fn generate(&self, prompt: &str) -> Result<GenerationOutcome> {
        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
            format: "json",
            options: json!({ "temperature": TEMPERATURE }),
        };

        let response = match self.client.post(&url).json(&request).send().await {
            Ok(response) => response,
            Err(err) => {
                // Timeouts and connection errors are retryable; anything
                // else at this layer is infrastructure, not model output
                return Ok(GenerationOutcome::TransientFailure {
                    reason: err.to_string(),
                });
            }
        };

        let status = response.status();
        if status.is_server_error() {
            return Ok(GenerationOutcome::TransientFailure {
                reason: format!("Ollama API returned {}", status),
            });
        }
        if !status.is_success() {
            return Err(DocAnchorError::GenerationFailed(format!(
                "Ollama API returned {}",
                status
            )));
        }

        let body: GenerateResponse = match response.json().await {
            Ok(body) => body,
            Err(err) => {
                return Ok(GenerationOutcome::TransientFailure {
                    reason: format!("unreadable response body: {}", err),
                });
            }
        };

        match serde_json::from_str::<Answer>(&body.response) {
            Ok(answer) => Ok(GenerationOutcome::Success(answer)),
            Err(_) => Ok(GenerationOutcome::Malformed { raw: body.response }),
        }
    }
}
