pub mod api;
pub mod audio;
pub mod config;
pub mod permission;
pub mod session;

pub use api::{
    ApiConfig, BackendClient, ConsentCode, ConsentError, ConsentService, ConsentVerification,
    ConsultationId, RecordingUpload, UploadError, UploadService,
};
pub use audio::{
    AudioFrame, CaptureArtifact, CaptureBackend, CaptureConfig, CaptureController, CaptureError,
    ChannelBackend, WavRecorder,
};
pub use config::Config;
pub use permission::{NoRuntimePermissions, PermissionGate, PermissionStatus};
pub use session::{ControlView, RecordingSession, SessionError, SessionOutcome, SessionState};
