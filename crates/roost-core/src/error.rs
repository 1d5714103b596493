use thiserror::Error;

/// Error raised by a resource hook (`create`, `setup`, `update`, `teardown`).
#[derive(Debug, Error)]
#[error("{message}")]
pub struct HookError {
    message: String,
}

impl HookError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<String> for HookError {
    fn from(message: String) -> Self {
        Self { message }
    }
}

impl From<&str> for HookError {
    fn from(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// Why a lifecycle operation failed.
#[derive(Debug, Error)]
pub enum LifecycleError {
    /// The factory or `setup` failed; the record was left without a usable
    /// instance.
    #[error("resource construction failed: {0}")]
    Construction(#[source] HookError),

    /// `update` failed. The previous instance is still live and registered.
    #[error("resource update failed: {0}")]
    Update(#[source] HookError),

    /// A teardown hook failed while an instance was being destroyed.
    #[error("resource teardown failed: {0}")]
    Teardown(#[source] HookError),

    /// The record lost its instance to an earlier failure.
    #[error("lifecycle record has no live instance")]
    Defunct,

    /// The manager declares a capabilities version this host does not speak.
    #[error("manager declares unsupported capabilities version {0}")]
    Protocol(u32),

    /// No manager was registered for the requested resource kind.
    #[error("no manager registered for resource kind `{0}`")]
    Unregistered(&'static str),
}
