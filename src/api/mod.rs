pub mod client;
pub mod models;

pub use client::{ApiConfig, BackendClient, ConsentService, UploadService};
pub use models::{
    ConsentCode, ConsentError, ConsentVerification, ConsultationId, RecordingUpload, UploadError,
};
