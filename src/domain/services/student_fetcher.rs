#[cfg(test)]
#[path = "student_fetcher_test.rs"]
mod tests;

use tokio_util::sync::CancellationToken;

use super::SessionStore;
use crate::domain::models::Backend;
use crate::domain::models::ClientError;
use crate::domain::models::StudentRecord;

pub struct StudentFetcher {}

impl StudentFetcher {
    /// One lookup, no retries. Resolves to `ClientError::Cancelled` as soon as
    /// the token is cancelled, dropping the in-flight request.
    pub async fn fetch(
        backend: &dyn Backend,
        student_id: &str,
        cancel: &CancellationToken,
    ) -> Result<StudentRecord, ClientError> {
        tokio::select! {
            biased;

            _ = cancel.cancelled() => {
                tracing::debug!(student_id, "Student lookup cancelled");
                return Err(ClientError::Cancelled);
            }
            res = backend.get_student(student_id) => {
                return res;
            }
        }
    }

    /// Applies the outcome of a lookup, or of any request made on behalf of
    /// the session, to the session. Only a confirmed rejection clears it, and
    /// only when the session still holds the id that was looked up. Transport
    /// failures leave the session alone.
    pub async fn settle<T>(
        session: &mut SessionStore,
        student_id: &str,
        result: &Result<T, ClientError>,
    ) -> Result<(), ClientError> {
        match result {
            Err(ClientError::InvalidSession(_)) => {
                if session.get() == Some(student_id) {
                    session
                        .clear()
                        .await
                        .map_err(|err| return ClientError::Storage(err.to_string()))?;
                }
            }
            Err(ClientError::Transport(err)) => {
                tracing::error!(student_id, error = err, "Error fetching student data");
            }
            _ => (),
        }

        return Ok(());
    }

    /// Fetches the record for the current session. Without a session nothing
    /// is requested and `None` is returned.
    pub async fn fetch_student_data(
        backend: &dyn Backend,
        session: &mut SessionStore,
        cancel: &CancellationToken,
    ) -> Result<Option<StudentRecord>, ClientError> {
        let student_id = match session.get() {
            Some(student_id) => student_id.to_string(),
            None => return Ok(None),
        };

        let result = StudentFetcher::fetch(backend, &student_id, cancel).await;
        StudentFetcher::settle(session, &student_id, &result).await?;

        return result.map(Some);
    }
}
