//! Gemini REST client for embeddings and text generation.
//!
//! Blocking `reqwest` with a per-call timeout: embedding calls sit on the
//! request path and must fail fast, generation may take longer.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::TextGenerator;
use crate::error::{RecError, Result};
use crate::search::embeddings::Embedder;

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Connection settings, usually built from the `[gemini]`, `[embedding]`
/// and `[generation]` config sections.
#[derive(Debug, Clone)]
pub struct GeminiSettings {
    pub base_url: String,
    pub api_key: String,
    pub embedding_model: String,
    pub embedding_dimension: usize,
    pub generation_model: String,
    pub embedding_timeout: Duration,
    pub generation_timeout: Duration,
}

impl GeminiSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.into(),
            embedding_model: "models/embedding-001".to_string(),
            embedding_dimension: 768,
            generation_model: "models/gemini-2.0-flash".to_string(),
            embedding_timeout: Duration::from_secs(15),
            generation_timeout: Duration::from_secs(30),
        }
    }
}

pub struct GeminiClient {
    client: Client,
    settings: GeminiSettings,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: EmbeddingValues,
}

#[derive(Debug, Deserialize)]
struct EmbeddingValues {
    values: Vec<f32>,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(settings: GeminiSettings) -> Result<Self> {
        if settings.api_key.trim().is_empty() {
            return Err(RecError::MissingConfig(
                "gemini.api_key (or GEMINI_API_KEY) is required for the gemini provider".to_string(),
            ));
        }
        let client = Client::builder()
            .user_agent(concat!("assessrec/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| RecError::Config(format!("gemini http client: {err}")))?;
        Ok(Self { client, settings })
    }

    fn endpoint(&self, model: &str, method: &str) -> String {
        let model = if model.starts_with("models/") {
            model.to_string()
        } else {
            format!("models/{model}")
        };
        format!(
            "{}/v1beta/{model}:{method}",
            self.settings.base_url.trim_end_matches('/')
        )
    }

    fn post(
        &self,
        url: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> reqwest::Result<reqwest::blocking::Response> {
        self.client
            .post(url)
            .header("x-goog-api-key", &self.settings.api_key)
            .timeout(timeout)
            .json(body)
            .send()
    }
}

impl Embedder for GeminiClient {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let model = &self.settings.embedding_model;
        let body = json!({
            "model": model,
            "content": { "parts": [{ "text": text }] },
        });

        let response = self
            .post(
                &self.endpoint(model, "embedContent"),
                &body,
                self.settings.embedding_timeout,
            )
            .map_err(|err| {
                RecError::EmbeddingUnavailable(format!("gemini embed request failed: {err}"))
            })?;
        if !response.status().is_success() {
            return Err(RecError::EmbeddingUnavailable(format!(
                "gemini embed HTTP {}",
                response.status()
            )));
        }
        let parsed: EmbedResponse = response
            .json()
            .map_err(|err| {
                RecError::EmbeddingUnavailable(format!("gemini embed response parse: {err}"))
            })?;

        let values = parsed.embedding.values;
        if values.len() != self.settings.embedding_dimension {
            return Err(RecError::EmbeddingUnavailable(format!(
                "gemini returned {} values (expected {})",
                values.len(),
                self.settings.embedding_dimension
            )));
        }
        debug!(model = %model, dimension = values.len(), "gemini embedding");
        Ok(values)
    }

    fn dimension(&self) -> usize {
        self.settings.embedding_dimension
    }

    fn model_id(&self) -> String {
        format!(
            "gemini/{}/{}",
            self.settings.embedding_model.trim_start_matches("models/"),
            self.settings.embedding_dimension
        )
    }
}

impl TextGenerator for GeminiClient {
    fn generate(&self, prompt: &str) -> Result<String> {
        let model = &self.settings.generation_model;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "temperature": 0.0 },
        });

        let response = self
            .post(&self.endpoint(model, "generateContent"), &body, self.settings.generation_timeout)
            .map_err(|err| RecError::Provider(format!("gemini generate request failed: {err}")))?;
        if !response.status().is_success() {
            return Err(RecError::Provider(format!(
                "gemini generate HTTP {}",
                response.status()
            )));
        }
        let parsed: GenerateResponse = response
            .json()
            .map_err(|err| RecError::Provider(format!("gemini generate response parse: {err}")))?;

        let text: String = parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(RecError::Provider("gemini returned no text".to_string()));
        }
        debug!(model = %model, chars = text.len(), "gemini generation");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GeminiClient {
        let mut settings = GeminiSettings::new("test-key");
        settings.base_url = base_url.to_string();
        GeminiClient::new(settings).unwrap()
    }

    #[test]
    fn test_missing_api_key_is_rejected() {
        let err = GeminiClient::new(GeminiSettings::new("  ")).err().unwrap();
        assert_eq!(err.code(), "missing_config");
    }

    #[test]
    fn test_endpoint_adds_models_prefix() {
        let client = client("https://example.test/");
        assert_eq!(
            client.endpoint("embedding-001", "embedContent"),
            "https://example.test/v1beta/models/embedding-001:embedContent"
        );
        assert_eq!(
            client.endpoint("models/gemini-2.0-flash", "generateContent"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
    }

    #[test]
    fn test_model_id_pins_model_and_dimension() {
        assert_eq!(client(DEFAULT_BASE_URL).model_id(), "gemini/embedding-001/768");
    }
}
