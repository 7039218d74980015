//! Microphone capture via `cpal`, behind the `capture` feature.

use std::sync::{Arc, Mutex};

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use super::TranscriptionError;

/// Names of available input devices, default host.
pub fn list_input_devices() -> Vec<String> {
    let host = cpal::default_host();
    match host.input_devices() {
        Ok(devices) => devices.filter_map(|d| d.name().ok()).collect(),
        Err(_) => Vec::new(),
    }
}

/// A live microphone capture. Samples accumulate in memory until `stop`
/// returns them (with the capture rate and channel count) or `cancel`
/// discards them. Dropping the session also stops the stream.
pub struct RecordingSession {
    stream: cpal::Stream,
    buffer: Arc<Mutex<Vec<f32>>>,
    sample_rate: u32,
    channels: u16,
}

impl RecordingSession {
    /// Start capturing from the default input device.
    pub fn start() -> Result<Self, TranscriptionError> {
        let host = cpal::default_host();
        let device = host
            .default_input_device()
            .ok_or(TranscriptionError::DeviceUnavailable)?;
        let config = device
            .default_input_config()
            .map_err(|_| TranscriptionError::DeviceUnavailable)?;

        let sample_rate = config.sample_rate().0;
        let channels = config.channels();
        let buffer = Arc::new(Mutex::new(Vec::new()));

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => build_stream::<f32>(&device, &config.into(), &buffer)?,
            cpal::SampleFormat::I16 => build_stream::<i16>(&device, &config.into(), &buffer)?,
            cpal::SampleFormat::U16 => build_stream::<u16>(&device, &config.into(), &buffer)?,
            other => {
                return Err(TranscriptionError::UnsupportedFormat(format!(
                    "input sample format {other:?}"
                )))
            }
        };

        stream
            .play()
            .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))?;
        tracing::info!(sample_rate, channels, "Recording started");

        Ok(Self {
            stream,
            buffer,
            sample_rate,
            channels,
        })
    }

    /// Stop the capture and return the interleaved samples.
    pub fn stop(self) -> Result<(Vec<f32>, u32, u16), TranscriptionError> {
        drop(self.stream);
        let samples = self
            .buffer
            .lock()
            .map_err(|_| TranscriptionError::TranscriptionFailed("capture buffer poisoned".into()))?
            .clone();
        tracing::info!(samples = samples.len(), "Recording stopped");
        Ok((samples, self.sample_rate, self.channels))
    }

    /// Discard the capture.
    pub fn cancel(self) {
        drop(self.stream);
        tracing::info!("Recording cancelled");
    }
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    buffer: &Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream, TranscriptionError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    let sink = Arc::clone(buffer);
    device
        .build_input_stream(
            config,
            move |data: &[T], _: &cpal::InputCallbackInfo| {
                if let Ok(mut buf) = sink.lock() {
                    buf.extend(data.iter().map(|s| cpal::Sample::to_sample::<f32>(*s)));
                }
            },
            |err| tracing::warn!(error = %err, "Input stream error"),
            None,
        )
        .map_err(|e| TranscriptionError::TranscriptionFailed(e.to_string()))
}
