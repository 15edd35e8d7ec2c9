/// Session cycle state
///
/// One tagged union instead of separate is-recording/is-uploading/show-modal
/// flags, so invalid combinations cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Nothing in progress; the record control reads "start"
    Idle,
    /// Consent prompt open, waiting for the user to enter a code
    AwaitingConsent,
    /// Consent exchange in flight; input is rejected until it resolves
    VerifyingConsent,
    /// Microphone held, audio being written to disk
    Recording,
    /// Artifact in flight to the backend
    Uploading,
    /// Upload acknowledged; showing confirmation until the user dismisses it
    Done,
    /// A failure is being shown; acknowledging returns to `Idle`
    Failed,
}

/// What the record/stop control should render
///
/// A pure function of [`SessionState`]; rendering the same state twice
/// yields the identical view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlView {
    pub label: &'static str,
    pub enabled: bool,
    pub busy: bool,
}

impl SessionState {
    pub fn control(self) -> ControlView {
        match self {
            SessionState::Idle => ControlView {
                label: "start",
                enabled: true,
                busy: false,
            },
            SessionState::AwaitingConsent => ControlView {
                label: "start",
                enabled: false,
                busy: false,
            },
            SessionState::VerifyingConsent => ControlView {
                label: "start",
                enabled: false,
                busy: true,
            },
            SessionState::Recording => ControlView {
                label: "stop",
                enabled: true,
                busy: false,
            },
            SessionState::Uploading => ControlView {
                label: "stop",
                enabled: false,
                busy: true,
            },
            SessionState::Done | SessionState::Failed => ControlView {
                label: "start",
                enabled: false,
                busy: false,
            },
        }
    }
}
