#[cfg(test)]
#[path = "app_state_test.rs"]
mod tests;

use anyhow::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tui_textarea::Input;
use tui_textarea::Key;

use super::Navigation;
use super::Pages;
use super::ResumeSubmission;
use super::SessionStore;
use super::StudentFetcher;
use crate::domain::models::Action;
use crate::domain::models::AnalyzedResume;
use crate::domain::models::ClientError;
use crate::domain::models::MarketData;
use crate::domain::models::Notification;
use crate::domain::models::Route;
use crate::domain::models::StudentRecord;

/// Everything the UI loop owns. Network work is handed to the actions
/// worker as an `Action`, and its result comes back through one of the
/// `handle_*` methods, so all mutation happens on the UI loop.
pub struct AppState<'a> {
    pub session: SessionStore,
    pub student: Option<StudentRecord>,
    pub loading_student: bool,
    pub market_data: Option<MarketData>,
    pub route: Route,
    pub submission: ResumeSubmission,
    pub textarea: tui_textarea::TextArea<'a>,
    pub notification: Option<Notification>,
    pub selected_skill: usize,
    fetch: Option<CancellationToken>,
}

impl<'a> AppState<'a> {
    pub fn new(session: SessionStore) -> AppState<'a> {
        return AppState {
            session,
            student: None,
            loading_student: false,
            market_data: None,
            route: Route::Home,
            submission: ResumeSubmission::default(),
            textarea: Pages::resume_form(),
            notification: None,
            selected_skill: 0,
            fetch: None,
        };
    }

    /// Restores a previous session by fetching its record.
    pub fn start(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        if self.session.is_active() {
            self.request_student(tx)?;
        }

        return Ok(());
    }

    pub fn navigate(&mut self, path: &str) {
        let next = Route::parse(path);
        if next == self.route {
            return;
        }

        if self.route == Route::ResumeAnalyzer && self.submission.is_submitting() {
            self.submission.cancel();
            self.notify(Notification::info("Resume analysis cancelled"));
        }

        tracing::debug!(from = %self.route, to = %next, path, "Navigate");
        self.route = next;
        self.selected_skill = 0;
    }

    pub fn notify(&mut self, notification: Notification) {
        self.notification = Some(notification);
    }

    /// Issues a lookup for the current session, superseding any lookup still
    /// in flight. Does nothing without a session.
    pub fn request_student(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let student_id = match self.session.get() {
            Some(student_id) => student_id.to_string(),
            None => return Ok(()),
        };

        if let Some(previous) = self.fetch.take() {
            previous.cancel();
        }

        let cancel = CancellationToken::new();
        self.fetch = Some(cancel.clone());
        self.loading_student = true;
        tx.send(Action::FetchStudent(student_id, cancel))?;

        return Ok(());
    }

    pub fn request_market_data(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        tx.send(Action::FetchMarketData())?;
        return Ok(());
    }

    pub fn draft(&self) -> String {
        return self.textarea.lines().join("\n");
    }

    pub fn submit_resume(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let text = self.draft();
        match self.submission.begin(&text) {
            Ok(cancel) => {
                tx.send(Action::SubmitResume(text, cancel))?;
            }
            Err(ClientError::Validation) => {
                self.notify(Notification::error(
                    "Resume text is required",
                    "Paste your resume before submitting.",
                ));
            }
            Err(err) => {
                self.notify(Notification::info(&err.to_string()));
            }
        }

        return Ok(());
    }

    fn skills(&self) -> Vec<String> {
        if let Some(student) = &self.student {
            return student.pathway().keys().cloned().collect();
        }

        return vec![];
    }

    pub fn selected_skill_name(&self) -> Option<String> {
        return self.skills().get(self.selected_skill).cloned();
    }

    pub fn mark_selected_complete(&mut self, tx: &mpsc::UnboundedSender<Action>) -> Result<()> {
        let (student_id, skill) = match (self.session.get(), self.selected_skill_name()) {
            (Some(student_id), Some(skill)) => (student_id.to_string(), skill),
            _ => return Ok(()),
        };

        let completed = self
            .student
            .as_ref()
            .map_or(false, |student| return student.is_completed(&skill));
        if completed {
            self.notify(Notification::info(&format!("{skill} is already complete")));
            return Ok(());
        }

        tx.send(Action::UpdateProgress(student_id, skill))?;
        return Ok(());
    }

    async fn settle<T>(&mut self, student_id: &str, result: &Result<T, ClientError>) {
        if let Err(err) = StudentFetcher::settle(&mut self.session, student_id, result).await {
            self.notify(Notification::error("Failed to update session", &err.to_string()));
            return;
        }

        if let Err(ClientError::InvalidSession(_)) = result {
            if !self.session.is_active() {
                self.student = None;
                if let Some(fetch) = self.fetch.take() {
                    fetch.cancel();
                }
                self.loading_student = false;
                self.notify(Notification::error(
                    "Your session has expired",
                    "Submit your resume to get started again.",
                ));
            }
        }
    }

    pub async fn handle_student_fetched(
        &mut self,
        student_id: &str,
        cancel: &CancellationToken,
        result: Result<StudentRecord, ClientError>,
    ) {
        if cancel.is_cancelled() {
            tracing::debug!(student_id, "Dropping superseded student lookup");
            return;
        }

        self.fetch = None;
        self.loading_student = false;
        self.settle(student_id, &result).await;

        match result {
            Ok(record) => {
                if self.session.get() == Some(student_id) {
                    self.student = Some(record);
                    let len = self.skills().len();
                    self.selected_skill = self.selected_skill.min(len.saturating_sub(1));
                }
            }
            Err(ClientError::Transport(err)) => {
                self.notify(Notification::error("Failed to fetch student data", &err));
            }
            Err(_) => (),
        }
    }

    pub async fn handle_resume_analyzed(
        &mut self,
        cancel: &CancellationToken,
        result: Result<AnalyzedResume, ClientError>,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        let res = self
            .submission
            .complete(cancel, result, &mut self.session)
            .await;

        match res {
            Ok(analyzed) => {
                self.student = Some(analyzed.record);
                self.textarea = Pages::resume_form();
                self.notify(Notification::success("Resume analyzed successfully!"));
                self.navigate("/dashboard");
                self.request_student(tx)?;
            }
            Err(ClientError::Cancelled) => {
                return Ok(());
            }
            Err(ClientError::BackendRejected(detail)) => {
                self.notify(Notification::error("Failed to analyze resume", &detail));
            }
            Err(err) => {
                self.notify(Notification::error("Error", &err.submission_message()));
            }
        }

        self.submission.acknowledge();
        return Ok(());
    }

    pub async fn handle_progress_updated(
        &mut self,
        skill: &str,
        result: Result<(), ClientError>,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<()> {
        match &result {
            Ok(()) => {
                self.notify(Notification::success(&format!("Marked {skill} as complete")));
                self.request_student(tx)?;
            }
            Err(ClientError::InvalidSession(student_id)) => {
                let student_id = student_id.to_string();
                self.settle(&student_id, &result).await;
            }
            Err(err) => {
                self.notify(Notification::error("Failed to update progress", &err.to_string()));
            }
        }

        return Ok(());
    }

    pub fn handle_market_data(&mut self, result: Result<MarketData, ClientError>) {
        match result {
            Ok(market_data) => {
                self.market_data = Some(market_data);
            }
            Err(err) => {
                self.notify(Notification::error("Failed to load market data", &err.to_string()));
            }
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if self.route == Route::ResumeAnalyzer && !self.submission.is_submitting() {
            self.textarea.insert_str(text);
        }
    }

    /// Handles a key press. Returns true when the user asked to quit.
    pub fn handle_input(
        &mut self,
        input: Input,
        tx: &mpsc::UnboundedSender<Action>,
    ) -> Result<bool> {
        let dismissed = self.notification.take().is_some();

        if let Input { key: Key::Esc, .. } = input {
            if !dismissed {
                self.navigate("/");
            }
            return Ok(false);
        }

        if self.route == Route::ResumeAnalyzer {
            if !self.submission.is_submitting() {
                self.textarea.input(input);
            }
            return Ok(false);
        }

        match input {
            Input {
                key: Key::Char('q'),
                ctrl: false,
                ..
            } => {
                return Ok(true);
            }
            Input {
                key: Key::Char('h'),
                ..
            } => {
                self.navigate("/");
            }
            Input {
                key: Key::Char('r'),
                ..
            } => {
                self.request_student(tx)?;
            }
            Input {
                key: Key::Char('m'),
                ..
            } if self.route == Route::CareerExplorer => {
                self.request_market_data(tx)?;
            }
            Input {
                key: Key::Char(c), ..
            } if c.is_ascii_digit() => {
                if let Some(path) = Navigation::shortcut(&self.session, c) {
                    self.navigate(path);
                }
            }
            Input { key: Key::Up, .. } if self.route == Route::LearningPath => {
                self.selected_skill = self.selected_skill.saturating_sub(1);
            }
            Input { key: Key::Down, .. } if self.route == Route::LearningPath => {
                let last = self.skills().len().saturating_sub(1);
                self.selected_skill = (self.selected_skill + 1).min(last);
            }
            Input {
                key: Key::Enter, ..
            } if self.route == Route::LearningPath => {
                self.mark_selected_complete(tx)?;
            }
            Input {
                key: Key::Enter, ..
            } if self.route == Route::Home => {
                let path = Navigation::destinations(&self.session)[0].path();
                self.navigate(path);
            }
            _ => (),
        }

        return Ok(false);
    }
}
