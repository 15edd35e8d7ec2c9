pub mod backend;
pub mod controller;
pub mod recorder;

pub use backend::{AudioFrame, CaptureBackend, ChannelBackend};
pub use controller::CaptureController;
pub use recorder::{CaptureArtifact, CaptureConfig, CaptureError, WavRecorder};
