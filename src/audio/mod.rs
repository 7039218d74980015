//! Consultation audio capture and transcription.
//!
//! The speech model itself is an external collaborator behind the
//! `SpeechEngine` trait: samples in, text out. The real whisper.cpp engine
//! ships behind the optional `whisper` feature; microphone capture behind
//! `capture`. Everything else (WAV decode, downmix, resampling, the lazy
//! engine cache) is plain code that works without either feature.

#[cfg(feature = "capture")]
pub mod recorder;
#[cfg(feature = "whisper")]
pub mod whisper;

use std::cell::OnceCell;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Sample rate the speech engine expects: 16 kHz mono f32.
pub const ENGINE_SAMPLE_RATE: u32 = 16_000;

#[derive(Error, Debug)]
pub enum TranscriptionError {
    #[error("No audio input device available")]
    DeviceUnavailable,

    #[error("Unsupported audio format: {0}")]
    UnsupportedFormat(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("No speech engine available: build with the `whisper` feature or inject one")]
    EngineUnavailable,

    #[error("Unknown whisper model size: {0}")]
    UnknownModel(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Speech-to-text engine contract: 16 kHz mono f32 samples in, text out.
pub trait SpeechEngine {
    fn transcribe(&self, samples: &[f32]) -> Result<String, TranscriptionError>;
}

/// Whisper model size, from the `whisper_model` config value. Larger models
/// are slower to load and run but more accurate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhisperModel {
    Tiny,
    Base,
    Small,
    Medium,
    Large,
}

impl WhisperModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tiny => "tiny",
            Self::Base => "base",
            Self::Small => "small",
            Self::Medium => "medium",
            Self::Large => "large",
        }
    }

    /// Conventional ggml model file name for this size.
    pub fn file_name(&self) -> String {
        format!("ggml-{}.bin", self.as_str())
    }
}

impl FromStr for WhisperModel {
    type Err = TranscriptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "tiny" => Ok(Self::Tiny),
            "base" => Ok(Self::Base),
            "small" => Ok(Self::Small),
            "medium" => Ok(Self::Medium),
            "large" => Ok(Self::Large),
            other => Err(TranscriptionError::UnknownModel(other.to_string())),
        }
    }
}

/// File extensions `transcribe_file` will decode.
const SUPPORTED_EXTENSIONS: &[&str] = &["wav"];

/// Transcription adapter. Model load is expensive, so the engine is created
/// lazily on first use and cached for the adapter's lifetime; switching
/// model sizes means constructing a new `Transcriber`.
pub struct Transcriber {
    model: WhisperModel,
    engine: OnceCell<Box<dyn SpeechEngine>>,
}

impl Transcriber {
    pub fn new(model: WhisperModel) -> Self {
        Self {
            model,
            engine: OnceCell::new(),
        }
    }

    /// Adapter with a pre-built engine (used by tests and callers that
    /// manage engine lifetime themselves).
    pub fn with_engine(model: WhisperModel, engine: Box<dyn SpeechEngine>) -> Self {
        let cell = OnceCell::new();
        let _ = cell.set(engine);
        Self {
            model,
            engine: cell,
        }
    }

    pub fn model(&self) -> WhisperModel {
        self.model
    }

    fn engine(&self) -> Result<&dyn SpeechEngine, TranscriptionError> {
        if let Some(engine) = self.engine.get() {
            return Ok(engine.as_ref());
        }
        let engine = load_default_engine(self.model)?;
        let _ = self.engine.set(engine);
        self.engine
            .get()
            .map(|b| b.as_ref())
            .ok_or_else(|| TranscriptionError::TranscriptionFailed("engine cache poisoned".into()))
    }

    /// Transcribe a recorded audio file. Only WAV is decodable; any other
    /// extension is rejected up front as `UnsupportedFormat`.
    pub fn transcribe_file(&self, path: &Path) -> Result<String, TranscriptionError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
            return Err(TranscriptionError::UnsupportedFormat(ext));
        }

        let (samples, sample_rate) = decode_wav(path)?;
        self.transcribe_samples(&samples, sample_rate)
    }

    /// Transcribe raw mono samples captured at `sample_rate`.
    pub fn transcribe_samples(
        &self,
        samples: &[f32],
        sample_rate: u32,
    ) -> Result<String, TranscriptionError> {
        let prepared = resample(samples, sample_rate, ENGINE_SAMPLE_RATE);
        tracing::debug!(
            model = self.model.as_str(),
            input_samples = samples.len(),
            engine_samples = prepared.len(),
            "Transcribing audio buffer"
        );
        let text = self.engine()?.transcribe(&prepared)?;
        Ok(text.trim().to_string())
    }
}

#[cfg(feature = "whisper")]
fn load_default_engine(model: WhisperModel) -> Result<Box<dyn SpeechEngine>, TranscriptionError> {
    let path = crate::config::models_dir().join(model.file_name());
    Ok(Box::new(whisper::WhisperEngine::load(&path)?))
}

#[cfg(not(feature = "whisper"))]
fn load_default_engine(_model: WhisperModel) -> Result<Box<dyn SpeechEngine>, TranscriptionError> {
    Err(TranscriptionError::EngineUnavailable)
}

/// Decode a WAV file into mono f32 samples at its native rate.
pub fn decode_wav(path: &Path) -> Result<(Vec<f32>, u32), TranscriptionError> {
    let reader = hound::WavReader::open(path)
        .map_err(|e| TranscriptionError::UnsupportedFormat(e.to_string()))?;
    let spec = reader.spec();

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| TranscriptionError::UnsupportedFormat(e.to_string()))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| TranscriptionError::UnsupportedFormat(e.to_string()))?
        }
    };

    Ok((downmix(&interleaved, spec.channels), spec.sample_rate))
}

/// Average interleaved channels down to mono.
pub fn downmix(interleaved: &[f32], channels: u16) -> Vec<f32> {
    if channels <= 1 {
        return interleaved.to_vec();
    }
    let channels = channels as usize;
    interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / frame.len() as f32)
        .collect()
}

/// Linear-interpolation resampler. Adequate for speech going into whisper;
/// consultations are voice-band audio, not music.
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }
    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64) / ratio).floor() as usize;
    let mut out = Vec::with_capacity(out_len);
    for i in 0..out_len {
        let pos = i as f64 * ratio;
        let idx = pos as usize;
        let frac = (pos - idx as f64) as f32;
        let a = samples[idx];
        let b = samples.get(idx + 1).copied().unwrap_or(a);
        out.push(a + (b - a) * frac);
    }
    out
}

/// Echoing engine for tests: reports the buffer it was handed.
pub struct MockSpeechEngine {
    transcript: String,
}

impl MockSpeechEngine {
    pub fn new(transcript: &str) -> Self {
        Self {
            transcript: transcript.to_string(),
        }
    }
}

impl SpeechEngine for MockSpeechEngine {
    fn transcribe(&self, samples: &[f32]) -> Result<String, TranscriptionError> {
        if samples.is_empty() {
            return Err(TranscriptionError::TranscriptionFailed(
                "empty audio buffer".into(),
            ));
        }
        Ok(self.transcript.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mock_transcriber(text: &str) -> Transcriber {
        Transcriber::with_engine(WhisperModel::Base, Box::new(MockSpeechEngine::new(text)))
    }

    #[test]
    fn model_parse_round_trip() {
        for m in [
            WhisperModel::Tiny,
            WhisperModel::Base,
            WhisperModel::Small,
            WhisperModel::Medium,
            WhisperModel::Large,
        ] {
            assert_eq!(WhisperModel::from_str(m.as_str()).unwrap(), m);
        }
        assert!(WhisperModel::from_str("huge").is_err());
    }

    #[test]
    fn unsupported_extension_rejected_before_decode() {
        let t = mock_transcriber("hello");
        let err = t.transcribe_file(Path::new("/tmp/audio.mp3")).unwrap_err();
        assert!(matches!(err, TranscriptionError::UnsupportedFormat(ext) if ext == "mp3"));
    }

    #[test]
    fn transcribe_samples_uses_engine() {
        let t = mock_transcriber("patient reports mild headache");
        let samples = vec![0.1f32; ENGINE_SAMPLE_RATE as usize];
        let text = t.transcribe_samples(&samples, ENGINE_SAMPLE_RATE).unwrap();
        assert_eq!(text, "patient reports mild headache");
    }

    #[test]
    fn empty_buffer_is_a_recoverable_engine_error() {
        let t = mock_transcriber("x");
        let err = t.transcribe_samples(&[], 16_000).unwrap_err();
        assert!(matches!(err, TranscriptionError::TranscriptionFailed(_)));
    }

    #[test]
    fn without_engine_feature_load_is_engine_unavailable() {
        #[cfg(not(feature = "whisper"))]
        {
            let t = Transcriber::new(WhisperModel::Tiny);
            let err = t.transcribe_samples(&[0.0; 16_000], 16_000).unwrap_err();
            assert!(matches!(err, TranscriptionError::EngineUnavailable));
        }
    }

    #[test]
    fn wav_round_trip_through_decoder() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");

        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 44_100,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..44_100 {
            let value = ((i % 100) as i16 - 50) * 200;
            writer.write_sample(value).unwrap(); // left
            writer.write_sample(value).unwrap(); // right
        }
        writer.finalize().unwrap();

        let (samples, rate) = decode_wav(&path).unwrap();
        assert_eq!(rate, 44_100);
        assert_eq!(samples.len(), 44_100); // downmixed to mono
        assert!(samples.iter().all(|s| s.abs() <= 1.0));
    }

    #[test]
    fn transcribe_file_accepts_wav() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clip.wav");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 16_000,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..16_000 {
            writer.write_sample(1000i16).unwrap();
        }
        writer.finalize().unwrap();

        let t = mock_transcriber("dictated text");
        assert_eq!(t.transcribe_file(&path).unwrap(), "dictated text");
    }

    #[test]
    fn downmix_averages_channels() {
        let stereo = [1.0, 0.0, 0.5, 0.5, -1.0, 1.0];
        assert_eq!(downmix(&stereo, 2), vec![0.5, 0.5, 0.0]);
        assert_eq!(downmix(&stereo, 1), stereo.to_vec());
    }

    #[test]
    fn resample_halves_and_preserves_rate_identity() {
        let samples: Vec<f32> = (0..1000).map(|i| i as f32 / 1000.0).collect();
        assert_eq!(resample(&samples, 16_000, 16_000).len(), 1000);

        let down = resample(&samples, 32_000, 16_000);
        assert_eq!(down.len(), 500);
        // Monotone input stays monotone through linear interpolation.
        assert!(down.windows(2).all(|w| w[0] <= w[1]));
    }
}
