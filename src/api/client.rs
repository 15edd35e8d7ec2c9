use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::StatusCode;
use tracing::{info, warn};

use super::models::{
    ConsentCode, ConsentError, ConsentVerification, ConsultationId, RecordingUpload, UploadError,
};
use crate::audio::CaptureArtifact;

/// Exchanges a consent code for a server-confirmed consultation
#[async_trait::async_trait]
pub trait ConsentService: Send + Sync {
    async fn verify(&self, code: &ConsentCode) -> Result<ConsentVerification, ConsentError>;
}

/// Transmits a captured audio artifact to the backend
#[async_trait::async_trait]
pub trait UploadService: Send + Sync {
    async fn upload(
        &self,
        artifact: &CaptureArtifact,
        consultation_id: ConsultationId,
    ) -> Result<RecordingUpload, UploadError>;
}

/// Configuration for the hospital backend client
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Bearer token attached to every request
    pub bearer_token: String,
    /// Request timeout in seconds; a hung request resolves to a network
    /// error instead of leaving the session busy forever
    pub timeout_secs: u64,
}

/// HTTP client for the consultation backend
///
/// One request per operation: no chunking, no client-side retry. A failed
/// upload is terminal for the cycle and the user starts a fresh recording.
#[derive(Clone)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl BackendClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let base_url = config.base_url.trim_end_matches('/').to_string();

        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .context("Failed to build HTTP client")?;

        info!("Backend client ready: {}", base_url);

        Ok(Self {
            http,
            base_url,
            bearer_token: config.bearer_token.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ConsentService for BackendClient {
    async fn verify(&self, code: &ConsentCode) -> Result<ConsentVerification, ConsentError> {
        let url = format!("{}/consultations/start", self.base_url);

        let response = self
            .http
            .post(&url)
            .query(&[("appointmentId", code.as_str())])
            .bearer_auth(&self.bearer_token)
            .send()
            .await
            .map_err(|e| ConsentError::Network(e.to_string()))?;

        // The server answers 404 when no consultation matches the code.
        if response.status() == StatusCode::NOT_FOUND {
            warn!("Consent code rejected by server");
            return Err(ConsentError::InvalidCode);
        }

        let response = response
            .error_for_status()
            .map_err(|e| ConsentError::Network(e.to_string()))?;

        let verification: ConsentVerification = response
            .json()
            .await
            .map_err(|e| ConsentError::Network(e.to_string()))?;

        info!(
            "Consent verified: consultation {} at {}",
            verification.consultation_id, verification.hospital_name
        );

        Ok(verification)
    }
}

#[async_trait::async_trait]
impl UploadService for BackendClient {
    async fn upload(
        &self,
        artifact: &CaptureArtifact,
        consultation_id: ConsultationId,
    ) -> Result<RecordingUpload, UploadError> {
        let bytes = tokio::fs::read(&artifact.path)
            .await
            .map_err(|e| UploadError::Artifact(e.to_string()))?;

        if bytes.is_empty() {
            return Err(UploadError::Artifact(format!(
                "empty recording at {}",
                artifact.path.display()
            )));
        }

        let file_part = reqwest::multipart::Part::bytes(bytes)
            .file_name(artifact.file_name().to_string())
            .mime_str("audio/wav")
            .map_err(|e| UploadError::Artifact(e.to_string()))?;

        let form = reqwest::multipart::Form::new().part("file", file_part);

        let url = format!("{}/recordings/{}", self.base_url, consultation_id);

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.bearer_token)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?
            .error_for_status()
            .map_err(|e| UploadError::Network(e.to_string()))?;

        let upload: RecordingUpload = response
            .json()
            .await
            .map_err(|e| UploadError::Network(e.to_string()))?;

        info!(
            "Recording uploaded: id={} status={}",
            upload.recording_id, upload.status
        );

        Ok(upload)
    }
}
