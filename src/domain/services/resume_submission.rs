#[cfg(test)]
#[path = "resume_submission_test.rs"]
mod tests;

use tokio_util::sync::CancellationToken;

use super::SessionStore;
use crate::domain::models::AnalyzedResume;
use crate::domain::models::Backend;
use crate::domain::models::ClientError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    Idle,
    Submitting,
    Succeeded,
    Failed(String),
}

/// Drives a single resume form through `Idle -> Submitting -> Succeeded |
/// Failed`. While `Submitting`, further submissions are refused, and the
/// session is written if and only if the flow reaches `Succeeded`.
pub struct ResumeSubmission {
    state: SubmissionState,
    cancel: Option<CancellationToken>,
}

impl Default for ResumeSubmission {
    fn default() -> ResumeSubmission {
        return ResumeSubmission {
            state: SubmissionState::Idle,
            cancel: None,
        };
    }
}

impl ResumeSubmission {
    pub fn state(&self) -> &SubmissionState {
        return &self.state;
    }

    pub fn is_submitting(&self) -> bool {
        return self.state == SubmissionState::Submitting;
    }

    /// Validates locally and moves to `Submitting`. The returned token must be
    /// handed to whatever performs the request.
    pub fn begin(&mut self, text: &str) -> Result<CancellationToken, ClientError> {
        if self.is_submitting() {
            return Err(ClientError::SubmissionInProgress);
        }

        if text.trim().is_empty() {
            return Err(ClientError::Validation);
        }

        let cancel = CancellationToken::new();
        self.cancel = Some(cancel.clone());
        self.state = SubmissionState::Submitting;
        tracing::info!(chars = text.len(), "Submitting resume");

        return Ok(cancel);
    }

    /// Abandons the in-flight request, if any, and returns to `Idle`.
    pub fn cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel.cancel();
        }

        if self.is_submitting() {
            self.state = SubmissionState::Idle;
        }
    }

    /// Applies the response of the request started by `begin`. Results that
    /// arrive for a cancelled token, or while not submitting, are discarded
    /// and reported as `ClientError::Cancelled`.
    pub async fn complete(
        &mut self,
        cancel: &CancellationToken,
        result: Result<AnalyzedResume, ClientError>,
        session: &mut SessionStore,
    ) -> Result<AnalyzedResume, ClientError> {
        if cancel.is_cancelled() {
            // A live current token means this result belongs to an earlier,
            // abandoned submission.
            let current_cancelled = self
                .cancel
                .as_ref()
                .map_or(false, |current| return current.is_cancelled());
            if current_cancelled {
                self.cancel = None;
                self.state = SubmissionState::Idle;
            }

            tracing::debug!("Discarding cancelled resume analysis");
            return Err(ClientError::Cancelled);
        }

        if !self.is_submitting() {
            tracing::debug!("Discarding resume analysis outside of a submission");
            return Err(ClientError::Cancelled);
        }
        self.cancel = None;

        let analyzed = match result {
            Ok(analyzed) => analyzed,
            Err(ClientError::Cancelled) => {
                self.state = SubmissionState::Idle;
                return Err(ClientError::Cancelled);
            }
            Err(err) => {
                tracing::warn!(error = ?err, "Resume analysis failed");
                self.state = SubmissionState::Failed(err.submission_message());
                return Err(err);
            }
        };

        if let Err(err) = session.set(&analyzed.student_id).await {
            tracing::error!(error = ?err, "Failed to persist session");
            let err = ClientError::Storage(err.to_string());
            self.state = SubmissionState::Failed(err.submission_message());
            return Err(err);
        }

        self.state = SubmissionState::Succeeded;

        return Ok(analyzed);
    }

    /// The caller has surfaced the terminal state; ready for the next form.
    pub fn acknowledge(&mut self) {
        if matches!(
            self.state,
            SubmissionState::Succeeded | SubmissionState::Failed(_)
        ) {
            self.state = SubmissionState::Idle;
        }
    }

    /// Runs the whole flow inline: validate, request, establish the session.
    pub async fn submit(
        &mut self,
        backend: &dyn Backend,
        session: &mut SessionStore,
        text: &str,
    ) -> Result<AnalyzedResume, ClientError> {
        let cancel = self.begin(text)?;

        let result = tokio::select! {
            biased;

            _ = cancel.cancelled() => Err(ClientError::Cancelled),
            res = backend.analyze_resume(text) => res,
        };

        return self.complete(&cancel, result, session).await;
    }
}
