use tokio_util::sync::CancellationToken;

/// Work the UI loop hands to the actions worker.
pub enum Action {
    FetchStudent(String, CancellationToken),
    SubmitResume(String, CancellationToken),
    UpdateProgress(String, String),
    FetchMarketData(),
}
