//! Consultation recording session
//!
//! This module provides the `RecordingSession` state machine that:
//! - Gates microphone capture behind a verified consent code
//! - Sequences permission, capture and upload so no two async
//!   operations are ever in flight at once
//! - Recovers every failure to a stable state with a user-visible message

mod session;
mod state;

pub use session::{RecordingSession, SessionError, SessionOutcome};
pub use state::{ControlView, SessionState};
