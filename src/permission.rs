/// Outcome of a microphone permission request
///
/// `Denied` is a normal outcome, not an error: the session aborts the
/// attempt and tells the user, without touching any other session field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// Platform permission prompt seam
///
/// The request may suspend on a host prompt with no timeout; it resolves
/// when the user responds.
#[async_trait::async_trait]
pub trait PermissionGate: Send + Sync {
    async fn request_microphone(&self) -> PermissionStatus;
}

/// Pass-through gate for hosts without a runtime permission model
pub struct NoRuntimePermissions;

#[async_trait::async_trait]
impl PermissionGate for NoRuntimePermissions {
    async fn request_microphone(&self) -> PermissionStatus {
        PermissionStatus::Granted
    }
}
