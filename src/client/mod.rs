//! HTTP client for the Ollama-protocol generation backend.
//!
//! One request per call, no retries and no imposed timeout: the pipeline
//! keeps a single request in flight at a time, and a hung backend is bounded
//! only by the transport.

pub mod types;

pub use types::{GenerationError, GenerationOptions, ModelInfo};

use types::{GenerateRequest, GenerateResponse, TagsResponse, WireOptions};

/// Default backend address for a locally hosted Ollama instance.
pub const DEFAULT_BASE_URL: &str = "http://localhost:11434";

#[derive(Debug, Clone)]
pub struct GenerationClient {
    http: reqwest::Client,
    base_url: String,
}

impl GenerationClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        GenerationClient {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Issue a single prompt to `model` and return its text completion.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let options = options.clamped();
        let request = GenerateRequest {
            model,
            prompt,
            stream: false,
            options: WireOptions {
                num_ctx: options.num_ctx,
                temperature: options.temperature,
            },
        };

        tracing::debug!(model, num_ctx = options.num_ctx, "sending generate request");

        let response = self
            .http
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        tracing::debug!(model, chars = parsed.response.len(), "generate request complete");

        Ok(parsed.response)
    }

    /// List the models installed on the backend. An empty list is a valid
    /// result, not an error.
    pub async fn list_models(&self) -> Result<Vec<ModelInfo>, GenerationError> {
        let response = self
            .http
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().to_string();
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::Status { status, body });
        }

        let parsed: TagsResponse = response
            .json()
            .await
            .map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

        Ok(parsed
            .models
            .into_iter()
            .map(|m| ModelInfo {
                id: m.name.clone(),
                display_name: m.name,
            })
            .collect())
    }
}
