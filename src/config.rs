use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::NoteType;

/// Application-level constants
pub const APP_NAME: &str = "ClinScribe";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config file: {0}")]
    Invalid(#[from] serde_json::Error),
}

/// Get the application data directory
/// ~/ClinScribe/ on all platforms (user-visible)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join("ClinScribe")
}

pub fn db_path() -> PathBuf {
    app_data_dir().join("clinscribe.db")
}

pub fn key_path() -> PathBuf {
    app_data_dir().join("clinscribe.key")
}

pub fn config_path() -> PathBuf {
    app_data_dir().join("config.json")
}

/// Get the models directory (whisper ggml files)
pub fn models_dir() -> PathBuf {
    app_data_dir().join("models")
}

/// Default tracing filter when RUST_LOG is unset.
pub fn default_log_filter() -> String {
    "info,clinscribe=debug".to_string()
}

/// User-editable settings. Every field has a default so a missing or partial
/// config file still yields a working configuration; unknown keys in the file
/// are ignored rather than rejected.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub endpoint_url: String,
    pub model_name: String,
    pub whisper_model: String,
    pub clinic_name: String,
    pub theme: String,
    pub audio_sample_rate: u32,
    pub audio_channels: u16,
    /// Per-note-type prompt template overrides, keyed by note type name
    /// (case-insensitive). Templates use the same `{patient_context}` and
    /// `{transcript}` placeholders as the built-ins.
    pub prompt_templates: HashMap<String, String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            endpoint_url: "http://localhost:11434".to_string(),
            model_name: "llama3.2".to_string(),
            whisper_model: "base".to_string(),
            clinic_name: "Medical Clinic".to_string(),
            theme: "light".to_string(),
            audio_sample_rate: 16_000,
            audio_channels: 1,
            prompt_templates: HashMap::new(),
        }
    }
}

impl AppConfig {
    /// Load settings from `path`. A missing file is not an error: defaults
    /// are returned so first launch works without setup.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Persist settings as pretty-printed JSON, creating the parent
    /// directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)?;
        tracing::info!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Custom prompt template for a note type, if one is configured.
    pub fn prompt_template(&self, note_type: NoteType) -> Option<&str> {
        self.prompt_templates
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(note_type.as_str()))
            .map(|(_, template)| template.as_str())
    }
}
