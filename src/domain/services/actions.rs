#[cfg(test)]
#[path = "actions_test.rs"]
mod tests;

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::StudentFetcher;
use crate::domain::models::Action;
use crate::domain::models::AnalyzedResume;
use crate::domain::models::Backend;
use crate::domain::models::BackendBox;
use crate::domain::models::ClientError;
use crate::domain::models::Event;

async fn analyze(
    backend: &dyn Backend,
    text: &str,
    cancel: &CancellationToken,
) -> Result<AnalyzedResume, ClientError> {
    tokio::select! {
        biased;

        _ = cancel.cancelled() => {
            tracing::debug!("Resume analysis cancelled");
            return Err(ClientError::Cancelled);
        }
        res = backend.analyze_resume(text) => {
            return res;
        }
    }
}

/// Runs backend requests off the UI loop. Every action gets its own task, so
/// a slow lookup never holds up a submission, and results are sent back as
/// events in the order they finish.
pub struct ActionsService {}

impl ActionsService {
    pub async fn start(
        backend: BackendBox,
        tx: mpsc::UnboundedSender<Event>,
        rx: &mut mpsc::UnboundedReceiver<Action>,
    ) -> Result<()> {
        let backend: Arc<dyn Backend> = Arc::from(backend);

        if let Err(err) = backend.health_check().await {
            tracing::warn!(error = ?err, "PathfinderAI API is unreachable");
        }

        while let Some(action) = rx.recv().await {
            let backend = backend.clone();
            let worker_tx = tx.clone();

            tokio::spawn(async move {
                let event = match action {
                    Action::FetchStudent(student_id, cancel) => {
                        let res = StudentFetcher::fetch(&*backend, &student_id, &cancel).await;
                        Event::StudentFetched(student_id, cancel, res)
                    }
                    Action::SubmitResume(text, cancel) => {
                        let res = analyze(&*backend, &text, &cancel).await;
                        Event::ResumeAnalyzed(cancel, res)
                    }
                    Action::UpdateProgress(student_id, skill) => {
                        let res = backend.update_progress(&student_id, &skill).await;
                        Event::ProgressUpdated(skill, res)
                    }
                    Action::FetchMarketData() => {
                        Event::MarketDataFetched(backend.get_market_data().await)
                    }
                };

                // The UI may have exited already.
                if worker_tx.send(event).is_err() {
                    tracing::debug!("Dropping result, UI is gone");
                }
            });
        }

        return Ok(());
    }
}
