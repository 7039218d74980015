//! ClinScribe: local-first clinical documentation assistant.
//!
//! Everything stays on the doctor's machine: patient records in SQLite,
//! consultation audio transcribed by a local speech model, note drafts
//! generated against a local LLM endpoint, documents exported to PDF/DOCX.
//! The crate is the application core; a desktop shell drives it.

pub mod audio;
pub mod codes;
pub mod config;
pub mod crypto;
pub mod db;
pub mod export;
pub mod llm;
pub mod models;
pub mod session;

use tracing_subscriber::EnvFilter;

/// Initialize tracing once at startup. RUST_LOG overrides the default
/// filter.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config::default_log_filter())),
        )
        .init();
}
