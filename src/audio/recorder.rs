use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::sync::mpsc;
use tracing::{info, warn};

use super::backend::AudioFrame;

/// Errors from the capture side of a session
#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("audio device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("no audio captured")]
    EmptyCapture,

    #[error("audio file error: {0}")]
    Wav(#[from] hound::Error),

    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),

    #[error("capture task failed: {0}")]
    TaskFailed(String),

    #[error("no capture in progress")]
    NotCapturing,
}

/// Fixed capture configuration for a deployment
///
/// Sample rate, channel count and bit depth must stay constant per
/// deployment so downstream transcription assumptions hold. The defaults
/// are the production values: 16 kHz, mono, 16-bit PCM.
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono)
    pub channels: u16,
    /// Output directory for captured recordings
    pub output_dir: PathBuf,
}

impl CaptureConfig {
    pub fn new(output_dir: PathBuf) -> Self {
        Self {
            sample_rate: 16000,
            channels: 1,
            output_dir,
        }
    }

    /// 16-bit integer PCM, always
    pub fn wav_spec(&self) -> hound::WavSpec {
        hound::WavSpec {
            channels: self.channels,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        }
    }
}

/// Handle to a completed capture: the WAV file on disk plus what we know
/// about its contents
#[derive(Debug, Clone)]
pub struct CaptureArtifact {
    pub path: PathBuf,
    pub duration_seconds: f64,
    pub sample_count: usize,
    pub sample_rate: u32,
    pub channels: u16,
}

impl CaptureArtifact {
    /// Re-open an artifact from disk, validating it is a readable,
    /// non-empty WAV file
    pub fn open(path: impl AsRef<Path>) -> Result<Self, CaptureError> {
        let path = path.as_ref();
        let reader = hound::WavReader::open(path)?;
        let spec = reader.spec();
        let sample_count = reader.len() as usize;

        if sample_count == 0 {
            return Err(CaptureError::EmptyCapture);
        }

        let duration_seconds =
            sample_count as f64 / (spec.sample_rate as f64 * spec.channels as f64);

        Ok(Self {
            path: path.to_path_buf(),
            duration_seconds,
            sample_count,
            sample_rate: spec.sample_rate,
            channels: spec.channels,
        })
    }

    /// File name to present to the backend on upload
    pub fn file_name(&self) -> &str {
        self.path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("recording.wav")
    }
}

/// Writes one consultation recording to disk as a WAV file
///
/// Consumes frames from a backend receiver until the channel closes, then
/// finalizes the file. The drop guard finalizes on early teardown so the
/// file is never left with a broken header.
pub struct WavRecorder {
    writer: Option<hound::WavWriter<BufWriter<File>>>,
    path: PathBuf,
    config: CaptureConfig,
    sample_count: usize,
}

impl WavRecorder {
    pub fn create(config: &CaptureConfig) -> Result<Self, CaptureError> {
        fs::create_dir_all(&config.output_dir)?;

        let path = config.output_dir.join(format!(
            "consult-{}-{}.wav",
            chrono::Utc::now().format("%Y%m%d-%H%M%S"),
            uuid::Uuid::new_v4()
        ));

        let writer = hound::WavWriter::create(&path, config.wav_spec())?;

        info!(
            "Recorder ready: {} ({}Hz, {}ch)",
            path.display(),
            config.sample_rate,
            config.channels
        );

        Ok(Self {
            writer: Some(writer),
            path,
            config: config.clone(),
            sample_count: 0,
        })
    }

    /// Drain frames until the channel closes, then finalize the file
    pub async fn record(
        mut self,
        mut audio_rx: mpsc::Receiver<AudioFrame>,
    ) -> Result<CaptureArtifact, CaptureError> {
        while let Some(frame) = audio_rx.recv().await {
            if frame.sample_rate != self.config.sample_rate
                || frame.channels != self.config.channels
            {
                warn!(
                    "Frame format mismatch: got {}Hz/{}ch, expected {}Hz/{}ch",
                    frame.sample_rate,
                    frame.channels,
                    self.config.sample_rate,
                    self.config.channels
                );
            }

            self.write_frame(&frame)?;
        }

        self.finish()
    }

    fn write_frame(&mut self, frame: &AudioFrame) -> Result<(), CaptureError> {
        if let Some(writer) = &mut self.writer {
            for &sample in &frame.samples {
                writer.write_sample(sample)?;
            }
            self.sample_count += frame.samples.len();
        }
        Ok(())
    }

    fn finish(mut self) -> Result<CaptureArtifact, CaptureError> {
        if let Some(writer) = self.writer.take() {
            writer.finalize()?;
        }

        if self.sample_count == 0 {
            return Err(CaptureError::EmptyCapture);
        }

        let duration_seconds = self.sample_count as f64
            / (self.config.sample_rate as f64 * self.config.channels as f64);

        info!(
            "Capture complete: {} ({:.1}s, {} samples)",
            self.path.display(),
            duration_seconds,
            self.sample_count
        );

        Ok(CaptureArtifact {
            path: self.path.clone(),
            duration_seconds,
            sample_count: self.sample_count,
            sample_rate: self.config.sample_rate,
            channels: self.config.channels,
        })
    }
}

impl Drop for WavRecorder {
    fn drop(&mut self) {
        if let Some(writer) = self.writer.take() {
            if let Err(e) = writer.finalize() {
                warn!("Failed to finalize WAV writer on drop: {}", e);
            }
        }
    }
}
