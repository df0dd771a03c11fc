use tokio_util::sync::CancellationToken;
use tui_textarea::Input;

use super::AnalyzedResume;
use super::ClientError;
use super::MarketData;
use super::StudentRecord;

pub enum Event {
    StudentFetched(String, CancellationToken, Result<StudentRecord, ClientError>),
    ResumeAnalyzed(CancellationToken, Result<AnalyzedResume, ClientError>),
    ProgressUpdated(String, Result<(), ClientError>),
    MarketDataFetched(Result<MarketData, ClientError>),
    KeyboardCTRLC(),
    KeyboardCTRLS(),
    KeyboardInput(Input),
    KeyboardPaste(String),
    UIResize(),
    UITick(),
}
