//! Failure taxonomy shared by every controller workflow.
//!
//! Callers branch on the variant only. `Unexpected` carries the name of the
//! step that produced it; the detail is diagnostic and never part of the
//! contract.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// The daemon reported that the user cancelled the operation.
    #[error("operation cancelled")]
    Cancelled,
    /// The directory rejected the host registration request.
    #[error("host registration rejected by the directory")]
    RegistrationFailed,
    /// The daemon messaging channel is not installed on this machine.
    #[error("daemon messaging channel is not available")]
    MissingPlugin,
    /// Any other failure; `detail` names the step that failed.
    #[error("unexpected failure in {detail}")]
    Unexpected { detail: String },
}

impl Error {
    pub fn unexpected(detail: impl Into<String>) -> Self {
        Error::Unexpected {
            detail: detail.into(),
        }
    }
}
