//! whisper.cpp speech engine via `whisper-rs`, behind the `whisper` feature.

use std::path::Path;

use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use super::{SpeechEngine, TranscriptionError};

pub struct WhisperEngine {
    context: WhisperContext,
}

impl WhisperEngine {
    /// Load a ggml model file from disk. Model load is the slow part, so
    /// callers cache the engine (see `Transcriber`).
    pub fn load(model_path: &Path) -> Result<Self, TranscriptionError> {
        let path = model_path.to_str().ok_or_else(|| {
            TranscriptionError::TranscriptionFailed("model path is not valid UTF-8".into())
        })?;
        tracing::info!(model = path, "Loading whisper model");
        let context = WhisperContext::new_with_params(path, WhisperContextParameters::default())
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;
        Ok(Self { context })
    }
}

impl SpeechEngine for WhisperEngine {
    fn transcribe(&self, samples: &[f32]) -> Result<String, TranscriptionError> {
        if samples.is_empty() {
            return Err(TranscriptionError::TranscriptionFailed(
                "empty audio buffer".into(),
            ));
        }

        let mut state = self
            .context
            .create_state()
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;

        let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);

        state
            .full(params, samples)
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;

        let segments = state
            .full_n_segments()
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;
        let mut text = String::new();
        for i in 0..segments {
            let segment = state
                .full_get_segment_text(i)
                .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;
            text.push_str(&segment);
        }
        Ok(text)
    }
}
