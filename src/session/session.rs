use thiserror::Error;
use tracing::{info, warn};

use super::state::{ControlView, SessionState};
use crate::api::{
    ConsentCode, ConsentError, ConsentService, ConsultationId, RecordingUpload, UploadError,
    UploadService,
};
use crate::audio::{CaptureArtifact, CaptureController, CaptureError};
use crate::permission::{PermissionGate, PermissionStatus};

/// Session failures, each recovered locally to a stable state with a
/// user-visible message; none propagate to the host as faults
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("microphone permission required")]
    PermissionDenied,

    #[error("invalid or expired code")]
    InvalidConsentCode,

    #[error("could not verify the code, try again later")]
    ConsentNetwork(String),

    #[error("recording device unavailable")]
    DeviceUnavailable(String),

    #[error("recording failed")]
    Capture(String),

    #[error("upload failed, the recording was not saved")]
    Upload(String),
}

impl From<ConsentError> for SessionError {
    fn from(e: ConsentError) -> Self {
        match e {
            ConsentError::InvalidCode => SessionError::InvalidConsentCode,
            ConsentError::Network(msg) => SessionError::ConsentNetwork(msg),
        }
    }
}

impl From<CaptureError> for SessionError {
    fn from(e: CaptureError) -> Self {
        match e {
            CaptureError::DeviceUnavailable(msg) => SessionError::DeviceUnavailable(msg),
            other => SessionError::Capture(other.to_string()),
        }
    }
}

impl From<UploadError> for SessionError {
    fn from(e: UploadError) -> Self {
        SessionError::Upload(e.to_string())
    }
}

/// What a session operation did, for the host UI to render
#[derive(Debug)]
pub enum SessionOutcome {
    /// The consent prompt should open
    ConsentPrompt,
    /// Consent verified and capture running
    RecordingStarted { hospital_name: String },
    /// Upload acknowledged by the backend; show the confirmation
    Uploaded(RecordingUpload),
    /// Consent prompt dismissed without verifying
    Cancelled,
    /// Confirmation or error dismissed; back to idle
    Acknowledged,
    /// The input arrived in a state that does not accept it (busy, or a
    /// pending confirmation); nothing changed
    Ignored,
}

/// One consultation recording cycle: consent entry through upload resolution
///
/// Owns the only mutable handle to every collaborator, and all operations
/// take `&mut self`, so no two async operations can ever be in flight for
/// one session. A failed operation lands in a stable state with
/// `last_error` set before the error is returned.
pub struct RecordingSession {
    state: SessionState,
    consultation_id: Option<ConsultationId>,
    consent_code_input: String,
    captured: Option<CaptureArtifact>,
    last_error: Option<String>,
    gate: Box<dyn PermissionGate>,
    consent: Box<dyn ConsentService>,
    uploader: Box<dyn UploadService>,
    capture: CaptureController,
}

impl RecordingSession {
    pub fn new(
        gate: Box<dyn PermissionGate>,
        consent: Box<dyn ConsentService>,
        uploader: Box<dyn UploadService>,
        capture: CaptureController,
    ) -> Self {
        Self {
            state: SessionState::Idle,
            consultation_id: None,
            consent_code_input: String::new(),
            captured: None,
            last_error: None,
            gate,
            consent,
            uploader,
            capture,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn consultation_id(&self) -> Option<ConsultationId> {
        self.consultation_id
    }

    pub fn consent_code_input(&self) -> &str {
        &self.consent_code_input
    }

    pub fn captured_file(&self) -> Option<&CaptureArtifact> {
        self.captured.as_ref()
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Render state for the single record/stop control
    pub fn control(&self) -> ControlView {
        self.state.control()
    }

    /// The record/stop toggle
    ///
    /// From `Idle` it opens the consent prompt; from `Recording` it stops
    /// capture and uploads the artifact. Anything else ignores the press.
    pub async fn press(&mut self) -> Result<SessionOutcome, SessionError> {
        match self.state {
            SessionState::Idle => {
                self.last_error = None;
                self.state = SessionState::AwaitingConsent;
                Ok(SessionOutcome::ConsentPrompt)
            }
            SessionState::Recording => self.stop_and_upload().await,
            _ => Ok(SessionOutcome::Ignored),
        }
    }

    /// Submit the consent code from the prompt
    ///
    /// Malformed input fails synchronously without a network call. On a
    /// verified code the session requests microphone permission and starts
    /// capture; only then does it enter `Recording`.
    pub async fn submit_code(&mut self, raw_code: &str) -> Result<SessionOutcome, SessionError> {
        if self.state != SessionState::AwaitingConsent {
            return Ok(SessionOutcome::Ignored);
        }

        self.last_error = None;
        self.consent_code_input = raw_code.to_string();

        let code = match ConsentCode::parse(raw_code) {
            Ok(code) => code,
            Err(e) => {
                let err = SessionError::from(e);
                self.last_error = Some(err.to_string());
                return Err(err);
            }
        };

        self.state = SessionState::VerifyingConsent;
        info!("Verifying consent code");

        let verification = match self.consent.verify(&code).await {
            Ok(v) => v,
            Err(e) => {
                // Back to the prompt; the code stays in the input so the
                // user can correct a typo.
                warn!("Consent verification failed: {}", e);
                let err = SessionError::from(e);
                self.last_error = Some(err.to_string());
                self.state = SessionState::AwaitingConsent;
                return Err(err);
            }
        };

        self.consultation_id = Some(verification.consultation_id);
        self.consent_code_input.clear();

        if self.gate.request_microphone().await == PermissionStatus::Denied {
            warn!("Microphone permission denied");
            return Err(self.fail(SessionError::PermissionDenied));
        }

        if let Err(e) = self.capture.start().await {
            warn!("Capture start failed: {}", e);
            return Err(self.fail(SessionError::from(e)));
        }

        info!(
            "Recording consultation {} at {}",
            verification.consultation_id, verification.hospital_name
        );
        self.state = SessionState::Recording;

        Ok(SessionOutcome::RecordingStarted {
            hospital_name: verification.hospital_name,
        })
    }

    /// Dismiss the consent prompt without submitting
    ///
    /// Only defined while the prompt is open; once verification is in
    /// flight the user waits for it to resolve.
    pub fn cancel(&mut self) -> SessionOutcome {
        if self.state != SessionState::AwaitingConsent {
            return SessionOutcome::Ignored;
        }
        self.consent_code_input.clear();
        self.state = SessionState::Idle;
        SessionOutcome::Cancelled
    }

    /// Dismiss the confirmation or error and return to `Idle`, ready for a
    /// fresh cycle
    pub fn acknowledge(&mut self) -> SessionOutcome {
        match self.state {
            SessionState::Done | SessionState::Failed => {
                self.consultation_id = None;
                self.consent_code_input.clear();
                self.captured = None;
                self.last_error = None;
                self.state = SessionState::Idle;
                SessionOutcome::Acknowledged
            }
            _ => SessionOutcome::Ignored,
        }
    }

    async fn stop_and_upload(&mut self) -> Result<SessionOutcome, SessionError> {
        self.state = SessionState::Uploading;

        let artifact = match self.capture.stop().await {
            Ok(artifact) => artifact,
            Err(e) => {
                warn!("Capture stop failed: {}", e);
                return Err(self.fail(SessionError::from(e)));
            }
        };

        // Capture and upload only ever run with a verified consultation;
        // the state machine cannot reach Recording without one.
        let consultation_id = match self.consultation_id {
            Some(id) => id,
            None => {
                return Err(self.fail(SessionError::Capture(
                    "recording finished without a verified consultation".to_string(),
                )))
            }
        };

        self.captured = Some(artifact.clone());
        info!(
            "Uploading {} ({:.1}s) for consultation {}",
            artifact.file_name(),
            artifact.duration_seconds,
            consultation_id
        );

        let result = self.uploader.upload(&artifact, consultation_id).await;

        // The artifact is never retained past upload resolution; a failed
        // upload requires a fresh recording.
        self.captured = None;

        match result {
            Ok(upload) => {
                self.consultation_id = None;
                self.state = SessionState::Done;
                Ok(SessionOutcome::Uploaded(upload))
            }
            Err(e) => {
                warn!("Upload failed: {}", e);
                Err(self.fail(SessionError::from(e)))
            }
        }
    }

    /// Record the failure message and move to `Failed`, where the host
    /// shows a blocking alert until `acknowledge`
    fn fail(&mut self, err: SessionError) -> SessionError {
        self.last_error = Some(err.to_string());
        self.state = SessionState::Failed;
        err
    }
}
