use thiserror::Error;

pub const FALLBACK_REJECTION: &str = "Please try again later";
pub const TRANSPORT_FAILURE: &str =
    "An error occurred while analyzing the resume. Please try again later.";

/// Everything that can go wrong talking to the backend or establishing a
/// session. Each variant is terminal to the operation that raised it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("Resume text is required")]
    Validation,

    #[error("Student {0} was not found")]
    InvalidSession(String),

    #[error("{0}")]
    BackendRejected(String),

    #[error("Failed to reach the backend: {0}")]
    Transport(String),

    #[error("A resume is already being analyzed")]
    SubmissionInProgress,

    #[error("Request was cancelled")]
    Cancelled,

    #[error("Failed to save the session: {0}")]
    Storage(String),
}

impl ClientError {
    /// The text shown to the user when a submission ends in this error.
    pub fn submission_message(&self) -> String {
        match self {
            ClientError::BackendRejected(detail) => return detail.to_string(),
            ClientError::Validation
            | ClientError::SubmissionInProgress
            | ClientError::Storage(_) => {
                return self.to_string();
            }
            _ => return TRANSPORT_FAILURE.to_string(),
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> ClientError {
        return ClientError::Transport(err.to_string());
    }
}
