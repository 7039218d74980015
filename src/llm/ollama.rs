use std::io::{BufRead, BufReader};
use std::sync::mpsc;

use serde::{Deserialize, Serialize};

use super::GenerationError;

/// Client interface for the local LLM endpoint, mockable for tests.
pub trait LlmClient {
    /// Blocking generation: one prompt in, full response text out.
    fn generate(&self, model: &str, prompt: &str, system: &str)
        -> Result<String, GenerationError>;

    /// Streaming generation. Each text chunk is pushed through `chunk_tx` as
    /// it arrives; the assembled full text is returned at end-of-stream.
    ///
    /// Dropping the receiver cancels the stream: the connection is closed and
    /// the text accumulated so far is returned. Nothing is persisted here.
    fn generate_streaming(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<String, GenerationError>;

    /// Models currently installed on the endpoint.
    fn list_models(&self) -> Result<Vec<String>, GenerationError>;

    /// Lightweight availability probe for the UI. Failure here never gates a
    /// generation attempt; generation fails on its own terms.
    fn ping(&self) -> bool {
        self.list_models().is_ok()
    }

    fn is_model_available(&self, model: &str) -> Result<bool, GenerationError> {
        let models = self.list_models()?;
        Ok(models.iter().any(|m| m.starts_with(model)))
    }
}

/// Ollama HTTP client for local LLM inference.
pub struct OllamaClient {
    base_url: String,
    client: reqwest::blocking::Client,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new OllamaClient pointing at a local Ollama instance.
    pub fn new(base_url: &str, timeout_secs: u64) -> Self {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout_secs,
        }
    }

    /// Default Ollama instance at localhost:11434 with a 2-minute timeout.
    pub fn default_local() -> Self {
        Self::new("http://localhost:11434", 120)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn map_send_error(&self, e: reqwest::Error) -> GenerationError {
        if e.is_connect() {
            GenerationError::EndpointUnreachable(self.base_url.clone())
        } else if e.is_timeout() {
            GenerationError::Timeout(self.timeout_secs)
        } else {
            GenerationError::Http(e.to_string())
        }
    }

    fn post_generate(
        &self,
        body: &OllamaGenerateRequest<'_>,
    ) -> Result<reqwest::blocking::Response, GenerationError> {
        let url = format!("{}/api/generate", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::EndpointError {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

/// Request body for Ollama /api/generate
#[derive(Serialize)]
struct OllamaGenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
}

/// Response body from Ollama /api/generate (stream:false)
#[derive(Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// One NDJSON line from Ollama /api/generate (stream:true)
#[derive(Deserialize)]
struct OllamaStreamChunk {
    #[serde(default)]
    response: String,
    #[serde(default)]
    done: bool,
}

/// Response body from Ollama /api/tags
#[derive(Deserialize)]
struct OllamaTagsResponse {
    models: Vec<OllamaModel>,
}

#[derive(Deserialize)]
struct OllamaModel {
    name: String,
}

impl LlmClient for OllamaClient {
    fn generate(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
    ) -> Result<String, GenerationError> {
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: false,
        };
        let response = self.post_generate(&body)?;

        let parsed: OllamaGenerateResponse = response
            .json()
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        Ok(parsed.response)
    }

    fn generate_streaming(
        &self,
        model: &str,
        prompt: &str,
        system: &str,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<String, GenerationError> {
        let body = OllamaGenerateRequest {
            model,
            prompt,
            system,
            stream: true,
        };
        let response = self.post_generate(&body)?;

        let reader = BufReader::new(response);
        let mut full = String::new();
        let mut parsed_any = false;

        for line in reader.lines() {
            let line = line.map_err(|e| GenerationError::Http(e.to_string()))?;
            if line.is_empty() {
                continue;
            }
            let chunk: OllamaStreamChunk = match serde_json::from_str(&line) {
                Ok(chunk) => chunk,
                // Tolerate the occasional malformed keep-alive line, as the
                // endpoint interleaves status objects with text chunks.
                Err(_) => continue,
            };
            parsed_any = true;
            full.push_str(&chunk.response);

            if !chunk.response.is_empty() && chunk_tx.send(chunk.response).is_err() {
                // Receiver dropped: the caller cancelled. Dropping the
                // response here closes the underlying connection.
                tracing::debug!("Streaming generation cancelled by caller");
                return Ok(full);
            }
            if chunk.done {
                break;
            }
        }

        if !parsed_any {
            return Err(GenerationError::MalformedResponse(
                "stream contained no parseable chunks".into(),
            ));
        }
        Ok(full)
    }

    fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        let url = format!("{}/api/tags", self.base_url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(GenerationError::EndpointError {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: OllamaTagsResponse = response
            .json()
            .map_err(|e| GenerationError::MalformedResponse(e.to_string()))?;

        Ok(parsed.models.into_iter().map(|m| m.name).collect())
    }
}

/// Mock LLM client for testing. Returns a configurable response.
pub struct MockLlmClient {
    response: String,
    available_models: Vec<String>,
}

impl MockLlmClient {
    pub fn new(response: &str) -> Self {
        Self {
            response: response.to_string(),
            available_models: vec!["llama3:latest".to_string()],
        }
    }

    pub fn with_models(mut self, models: Vec<String>) -> Self {
        self.available_models = models;
        self
    }
}

impl LlmClient for MockLlmClient {
    fn generate(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
    ) -> Result<String, GenerationError> {
        Ok(self.response.clone())
    }

    fn generate_streaming(
        &self,
        _model: &str,
        _prompt: &str,
        _system: &str,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<String, GenerationError> {
        // Emit the canned response word by word to exercise consumers.
        for word in self.response.split_inclusive(' ') {
            if chunk_tx.send(word.to_string()).is_err() {
                break;
            }
        }
        Ok(self.response.clone())
    }

    fn list_models(&self) -> Result<Vec<String>, GenerationError> {
        Ok(self.available_models.clone())
    }
}
