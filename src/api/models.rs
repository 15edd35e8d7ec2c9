use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Server-issued capability token proving a consent code was validated
///
/// Required for audio upload; acquired exactly once per session cycle and
/// read-only thereafter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConsultationId(pub i64);

impl std::fmt::Display for ConsultationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A hospital-issued numeric consent code, validated before any network call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsentCode(String);

impl ConsentCode {
    /// Accepts non-empty, digits-only input; anything else fails fast and
    /// never reaches the network
    pub fn parse(raw: &str) -> Result<Self, ConsentError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(ConsentError::InvalidCode);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Consent-exchange response from `POST /consultations/start`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsentVerification {
    pub consultation_id: ConsultationId,
    pub appointment_id: i64,
    pub hospital_name: String,
    pub consultation_time: Option<String>,
}

/// Backend acknowledgment from `POST /recordings/{consultationId}`
///
/// Surfaced to the user for confirmation only; the client retains none of it
/// past the end of the cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingUpload {
    pub recording_id: i64,
    pub consultation_id: ConsultationId,
    pub hospital_id: Option<i64>,
    pub file_path: Option<String>,
    pub duration_seconds: Option<f64>,
    pub file_size_mb: Option<f64>,
    pub transcript: Option<String>,
    pub status: String,
    pub created_at: Option<String>,
    pub authorized_at: Option<String>,
}

/// Consent verification failures
#[derive(Debug, Error)]
pub enum ConsentError {
    /// The code is malformed, or the server has no consultation for it (404)
    #[error("invalid or expired code")]
    InvalidCode,

    /// Timeout, 5xx or connectivity failure; the user should try again later
    #[error("could not reach the consent service: {0}")]
    Network(String),
}

/// Upload failures; terminal for the cycle, no automatic retry
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("captured audio is unreadable: {0}")]
    Artifact(String),

    #[error("recording upload failed: {0}")]
    Network(String),
}
