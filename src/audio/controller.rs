use tokio::task::JoinHandle;
use tracing::info;

use super::backend::CaptureBackend;
use super::recorder::{CaptureArtifact, CaptureConfig, CaptureError, WavRecorder};

/// Owns the microphone backend and the recorder task for one session
///
/// The backend value is held exclusively here, so only one component can
/// touch the hardware. `start` and `stop` bracket exactly one capture; the
/// session state machine guarantees `stop` is only reached from the
/// recording state.
pub struct CaptureController {
    backend: Box<dyn CaptureBackend>,
    config: CaptureConfig,
    active: Option<JoinHandle<Result<CaptureArtifact, CaptureError>>>,
}

impl CaptureController {
    pub fn new(backend: Box<dyn CaptureBackend>, config: CaptureConfig) -> Self {
        Self {
            backend,
            config,
            active: None,
        }
    }

    /// Acquire the microphone and start writing frames to disk
    pub async fn start(&mut self) -> Result<(), CaptureError> {
        let audio_rx = self
            .backend
            .start()
            .await
            .map_err(|e| CaptureError::DeviceUnavailable(e.to_string()))?;

        let recorder = WavRecorder::create(&self.config)?;

        info!("Capture started via backend: {}", self.backend.name());

        self.active = Some(tokio::spawn(recorder.record(audio_rx)));
        Ok(())
    }

    /// Release the microphone and resolve the captured artifact
    pub async fn stop(&mut self) -> Result<CaptureArtifact, CaptureError> {
        let task = self.active.take().ok_or(CaptureError::NotCapturing)?;

        // Closing the backend ends the frame stream, which lets the
        // recorder task drain and finalize the file.
        self.backend
            .stop()
            .await
            .map_err(|e| CaptureError::TaskFailed(e.to_string()))?;

        task.await
            .map_err(|e| CaptureError::TaskFailed(e.to_string()))?
    }

    pub fn is_capturing(&self) -> bool {
        self.active.is_some()
    }
}

impl Drop for CaptureController {
    fn drop(&mut self) {
        // Dropped mid-capture (host navigated away): abort the recorder
        // task; its WavRecorder drop guard finalizes the file.
        if let Some(task) = self.active.take() {
            task.abort();
        }
    }
}
