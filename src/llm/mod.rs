//! Note generation pipeline: prompt assembly, local LLM call, and
//! diagnostic code suggestion over the produced text.

pub mod ollama;
pub mod prompt;

pub use ollama::{LlmClient, MockLlmClient, OllamaClient};
pub use prompt::PatientContext;

use std::collections::HashMap;
use std::sync::mpsc;

use thiserror::Error;

use crate::codes::{self, CodeEntry};
use crate::config::AppConfig;
use crate::models::NoteType;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("LLM endpoint unreachable at {0}")]
    EndpointUnreachable(String),

    #[error("LLM request timed out after {0}s")]
    Timeout(u64),

    #[error("Malformed response from LLM endpoint: {0}")]
    MalformedResponse(String),

    #[error("LLM endpoint returned HTTP {status}: {body}")]
    EndpointError { status: u16, body: String },

    #[error("HTTP error: {0}")]
    Http(String),
}

/// A generated note draft, not yet persisted. The clinician reviews it and
/// explicitly saves; nothing is written to the store by the generator.
#[derive(Debug, Clone)]
pub struct NoteDraft {
    pub note_type: NoteType,
    pub content: String,
    pub suggested_codes: Vec<CodeEntry>,
}

/// Drives the generation pipeline against a configured model.
pub struct Generator<C: LlmClient> {
    client: C,
    model: String,
    templates: HashMap<NoteType, String>,
}

impl Generator<OllamaClient> {
    /// Generator against a local Ollama instance.
    pub fn local(endpoint_url: &str, model: &str) -> Self {
        Self::new(OllamaClient::new(endpoint_url, 120), model)
    }
}

impl<C: LlmClient> Generator<C> {
    pub fn new(client: C, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
            templates: HashMap::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Replace the built-in template for one note type.
    pub fn set_template(&mut self, note_type: NoteType, template: String) {
        self.templates.insert(note_type, template);
    }

    /// Apply every per-note-type template override configured in settings.
    pub fn apply_template_overrides(&mut self, config: &AppConfig) {
        for note_type in [NoteType::Soap, NoteType::Referral, NoteType::Discharge] {
            if let Some(template) = config.prompt_template(note_type) {
                tracing::debug!(note_type = %note_type, "Using custom prompt template");
                self.templates.insert(note_type, template.to_string());
            }
        }
    }

    fn prompt_for(&self, note_type: NoteType, transcript: &str, context: &PatientContext) -> String {
        match self.templates.get(&note_type) {
            Some(template) => prompt::render_template(template, transcript, context),
            None => prompt::build_prompt(note_type, transcript, context),
        }
    }

    /// Availability probe for the UI. Never consulted before generating.
    pub fn endpoint_available(&self) -> bool {
        self.client.ping()
    }

    /// Blocking draft generation: template + transcript + patient context →
    /// prompt → LLM → code suggestion over the full text.
    pub fn draft(
        &self,
        note_type: NoteType,
        transcript: &str,
        context: &PatientContext,
    ) -> Result<NoteDraft, GenerationError> {
        let prompt = self.prompt_for(note_type, transcript, context);
        tracing::debug!(model = %self.model, note_type = %note_type, "Requesting note generation");
        let content = self
            .client
            .generate(&self.model, &prompt, prompt::system_instruction())?;
        Ok(self.finish(note_type, content))
    }

    /// Streaming variant. Chunks arrive on `chunk_tx` as the endpoint emits
    /// them; the finished draft (with code suggestions over the assembled
    /// text) is returned once the stream ends. Dropping the receiver cancels.
    pub fn draft_streaming(
        &self,
        note_type: NoteType,
        transcript: &str,
        context: &PatientContext,
        chunk_tx: mpsc::Sender<String>,
    ) -> Result<NoteDraft, GenerationError> {
        let prompt = self.prompt_for(note_type, transcript, context);
        tracing::debug!(model = %self.model, note_type = %note_type, "Requesting streaming note generation");
        let content = self.client.generate_streaming(
            &self.model,
            &prompt,
            prompt::system_instruction(),
            chunk_tx,
        )?;
        Ok(self.finish(note_type, content))
    }

    fn finish(&self, note_type: NoteType, content: String) -> NoteDraft {
        let content = content.trim().to_string();
        let suggested_codes = codes::suggest(&content);
        tracing::info!(
            note_type = %note_type,
            chars = content.len(),
            suggestions = suggested_codes.len(),
            "Note draft generated"
        );
        NoteDraft {
            note_type,
            content,
            suggested_codes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> PatientContext {
        PatientContext {
            name: "John Smith".into(),
            age: 57,
            gender: "M".into(),
            diagnosis: String::new(),
        }
    }

    #[test]
    fn draft_runs_suggestion_over_generated_text() {
        let client = MockLlmClient::new(
            "Assessment: type 2 diabetes with associated hypertension.\nPlan: recheck in 2 weeks.",
        );
        let gen = Generator::new(client, "llama3");
        let draft = gen.draft(NoteType::Soap, "transcript", &ctx()).unwrap();

        assert!(draft.content.contains("type 2 diabetes"));
        let codes: Vec<&str> = draft.suggested_codes.iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"E11.9"));
        assert!(codes.contains(&"I10"));
    }

    #[test]
    fn draft_trims_surrounding_whitespace() {
        let client = MockLlmClient::new("\n\n  Plan: rest.  \n");
        let gen = Generator::new(client, "llama3");
        let draft = gen.draft(NoteType::Discharge, "t", &ctx()).unwrap();
        assert_eq!(draft.content, "Plan: rest.");
    }

    #[test]
    fn streaming_draft_assembles_full_text_for_suggestions() {
        let client = MockLlmClient::new("Patient reports fever and persistent cough.");
        let gen = Generator::new(client, "llama3");
        let (tx, rx) = mpsc::channel();

        let draft = gen
            .draft_streaming(NoteType::Soap, "t", &ctx(), tx)
            .unwrap();

        let streamed: String = rx.iter().collect();
        assert_eq!(streamed, "Patient reports fever and persistent cough.");
        let codes: Vec<&str> = draft.suggested_codes.iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"R50.9"));
        assert!(codes.contains(&"R05"));
    }

    /// Returns the prompt it was sent, so tests can inspect prompt assembly.
    struct EchoClient;

    impl LlmClient for EchoClient {
        fn generate(
            &self,
            _model: &str,
            prompt: &str,
            _system: &str,
        ) -> Result<String, GenerationError> {
            Ok(prompt.to_string())
        }

        fn generate_streaming(
            &self,
            model: &str,
            prompt: &str,
            system: &str,
            _chunk_tx: mpsc::Sender<String>,
        ) -> Result<String, GenerationError> {
            self.generate(model, prompt, system)
        }

        fn list_models(&self) -> Result<Vec<String>, GenerationError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn configured_template_override_replaces_builtin() {
        let mut config = AppConfig::default();
        config.prompt_templates.insert(
            "soap".to_string(),
            "Dictation summary for {patient_context}:\n{transcript}".to_string(),
        );

        let mut gen = Generator::new(EchoClient, "llama3");
        gen.apply_template_overrides(&config);

        let draft = gen.draft(NoteType::Soap, "patient is well", &ctx()).unwrap();
        assert!(draft.content.starts_with("Dictation summary for"));
        assert!(draft.content.contains("patient is well"));
        assert!(!draft.content.contains("Subjective:"));

        // Other note types keep the built-in scaffold.
        let referral = gen.draft(NoteType::Referral, "t", &ctx()).unwrap();
        assert!(referral.content.contains("Reason for Referral:"));
    }

    #[test]
    fn unreachable_endpoint_surfaces_without_panicking() {
        let gen = Generator::local("http://127.0.0.1:9", "llama3");
        let err = gen.draft(NoteType::Soap, "t", &ctx()).unwrap_err();
        assert!(matches!(err, GenerationError::EndpointUnreachable(_)));
        assert!(!gen.endpoint_available());
    }
}
