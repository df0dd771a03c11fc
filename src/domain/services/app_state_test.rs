use std::time::Duration;

use anyhow::bail;
use anyhow::Result;
use serde_json::json;
use test_utils::student_fixture;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tui_textarea::Input;
use tui_textarea::Key;

use super::AppState;
use crate::domain::models::Action;
use crate::domain::models::Backend;
use crate::domain::models::ClientError;
use crate::domain::models::NotificationKind;
use crate::domain::models::Route;
use crate::domain::models::StudentRecord;
use crate::domain::services::SessionStore;
use crate::domain::services::SubmissionState;
use crate::infrastructure::backends::pathfinder::Pathfinder;

fn backend(url: &str) -> Pathfinder {
    return Pathfinder::new(url, Duration::from_millis(2000), Duration::from_millis(200));
}

fn key(key: Key) -> Input {
    return Input {
        key,
        ctrl: false,
        alt: false,
        shift: false,
    };
}

async fn state_with(
    dir: &tempfile::TempDir,
    student_id: Option<&str>,
) -> Result<AppState<'static>> {
    let mut session = SessionStore::load(dir.path().join("session.yaml")).await;
    if let Some(student_id) = student_id {
        session.set(student_id).await?;
    }

    return Ok(AppState::new(session));
}

fn expect_fetch(rx: &mut mpsc::UnboundedReceiver<Action>) -> Result<(String, CancellationToken)> {
    match rx.try_recv()? {
        Action::FetchStudent(student_id, cancel) => return Ok((student_id, cancel)),
        _ => bail!("Expected a student fetch"),
    }
}

fn expect_submit(rx: &mut mpsc::UnboundedReceiver<Action>) -> Result<(String, CancellationToken)> {
    match rx.try_recv()? {
        Action::SubmitResume(text, cancel) => return Ok((text, cancel)),
        _ => bail!("Expected a resume submission"),
    }
}

mod start {
    use super::*;

    #[tokio::test]
    async fn it_fetches_the_persisted_student() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;

        state.start(&tx)?;

        let (student_id, cancel) = expect_fetch(&mut rx)?;
        assert_eq!(student_id, "student_1");
        assert!(!cancel.is_cancelled());
        assert!(state.loading_student);

        return Ok(());
    }

    #[tokio::test]
    async fn it_stays_idle_without_session() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;

        state.start(&tx)?;

        assert!(rx.try_recv().is_err());
        assert!(!state.loading_student);

        return Ok(());
    }
}

mod submit_resume {
    use super::*;

    #[tokio::test]
    async fn it_lands_on_dashboard_after_analysis() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/analyze_resume")
            .with_status(200)
            .with_body(json!({ "student_id": "abc123", "name": "J. Doe" }).to_string())
            .create();

        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");
        state.handle_paste("Experienced backend engineer...");

        state.submit_resume(&tx)?;
        let (text, cancel) = expect_submit(&mut rx)?;
        assert_eq!(text, "Experienced backend engineer...");
        assert!(state.submission.is_submitting());

        let res = backend(&server.url()).analyze_resume(&text).await;
        state.handle_resume_analyzed(&cancel, res, &tx).await?;

        assert_eq!(state.session.get(), Some("abc123"));
        assert_eq!(
            serde_json::to_value(state.student.as_ref().unwrap())?,
            json!({ "name": "J. Doe" })
        );
        assert_eq!(state.route, Route::Dashboard);
        assert_eq!(state.submission.state(), &SubmissionState::Idle);
        assert_eq!(state.draft(), "");
        assert_eq!(
            state.notification.as_ref().map(|e| return e.kind),
            Some(NotificationKind::Success)
        );

        let (student_id, _) = expect_fetch(&mut rx)?;
        assert_eq!(student_id, "abc123");

        let reloaded = SessionStore::load(dir.path().join("session.yaml")).await;
        assert_eq!(reloaded.get(), Some("abc123"));
        mock.assert();

        return Ok(());
    }

    #[tokio::test]
    async fn it_refuses_empty_text() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");
        state.handle_paste("   ");

        state.submit_resume(&tx)?;

        assert!(rx.try_recv().is_err());
        assert_eq!(state.session.get(), None);
        assert_eq!(state.submission.state(), &SubmissionState::Idle);
        assert_eq!(
            state.notification.as_ref().map(|e| return e.title.to_string()),
            Some("Resume text is required".to_string())
        );

        return Ok(());
    }

    #[tokio::test]
    async fn it_refuses_a_second_submission() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");
        state.handle_paste("Python");

        state.submit_resume(&tx)?;
        state.submit_resume(&tx)?;

        expect_submit(&mut rx)?;
        assert!(rx.try_recv().is_err());
        assert_eq!(
            state.notification.as_ref().map(|e| return e.kind),
            Some(NotificationKind::Info)
        );

        return Ok(());
    }

    #[tokio::test]
    async fn it_keeps_the_form_when_rejected() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");
        state.handle_paste("Python");

        state.submit_resume(&tx)?;
        let (_, cancel) = expect_submit(&mut rx)?;
        state
            .handle_resume_analyzed(
                &cancel,
                Err(ClientError::BackendRejected("Resume could not be parsed".to_string())),
                &tx,
            )
            .await?;

        assert_eq!(state.route, Route::ResumeAnalyzer);
        assert_eq!(state.draft(), "Python");
        assert_eq!(state.session.get(), None);
        assert_eq!(state.submission.state(), &SubmissionState::Idle);
        let notification = state.notification.clone().unwrap();
        assert_eq!(notification.title, "Failed to analyze resume");
        assert_eq!(
            notification.description,
            Some("Resume could not be parsed".to_string())
        );

        return Ok(());
    }

    #[tokio::test]
    async fn it_cancels_when_leaving_the_form() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");
        state.handle_paste("Python");

        state.submit_resume(&tx)?;
        let (_, cancel) = expect_submit(&mut rx)?;
        state.navigate("/");

        assert!(cancel.is_cancelled());
        assert!(!state.submission.is_submitting());

        let late = serde_json::from_value(json!({ "student_id": "late" }))?;
        state.handle_resume_analyzed(&cancel, Ok(late), &tx).await?;

        assert_eq!(state.session.get(), None);
        assert_eq!(state.route, Route::Home);
        assert!(rx.try_recv().is_err());

        return Ok(());
    }
}

mod handle_student_fetched {
    use super::*;

    #[tokio::test]
    async fn it_clears_a_session_the_backend_rejects() -> Result<()> {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/student/stale-1")
            .with_status(404)
            .with_body(r#"{"detail":"Student not found"}"#)
            .create();

        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("stale-1")).await?;
        state.start(&tx)?;

        let (student_id, cancel) = expect_fetch(&mut rx)?;
        let res = backend(&server.url()).get_student(&student_id).await;
        state
            .handle_student_fetched(&student_id, &cancel, res)
            .await;

        assert_eq!(state.session.get(), None);
        assert!(!state.session.file_path().exists());
        assert_eq!(state.student, None);
        assert!(!state.loading_student);
        assert_eq!(
            state.notification.as_ref().map(|e| return e.kind),
            Some(NotificationKind::Error)
        );
        mock.assert();

        return Ok(());
    }

    #[tokio::test]
    async fn it_keeps_the_session_on_transport_failure() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;
        state.start(&tx)?;

        let (student_id, cancel) = expect_fetch(&mut rx)?;
        state
            .handle_student_fetched(
                &student_id,
                &cancel,
                Err(ClientError::Transport("connection refused".to_string())),
            )
            .await;

        assert_eq!(state.session.get(), Some("student_1"));
        assert!(state.session.file_path().exists());
        assert_eq!(
            state.notification.as_ref().map(|e| return e.title.to_string()),
            Some("Failed to fetch student data".to_string())
        );

        return Ok(());
    }

    #[tokio::test]
    async fn it_ignores_superseded_lookups() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;
        state.start(&tx)?;
        let (_, first) = expect_fetch(&mut rx)?;

        state.request_student(&tx)?;
        let (_, second) = expect_fetch(&mut rx)?;
        assert!(first.is_cancelled());
        assert!(!second.is_cancelled());

        let record: StudentRecord = serde_json::from_value(student_fixture())?;
        state
            .handle_student_fetched("student_1", &first, Ok(record.clone()))
            .await;
        assert_eq!(state.student, None);
        assert!(state.loading_student);

        state
            .handle_student_fetched("student_1", &second, Ok(record.clone()))
            .await;
        assert_eq!(state.student, Some(record));
        assert!(!state.loading_student);

        return Ok(());
    }
}

mod handle_input {
    use super::*;

    #[tokio::test]
    async fn it_navigates_with_number_keys() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;

        let mut state = state_with(&dir, None).await?;
        state.handle_input(key(Key::Char('2')), &tx)?;
        assert_eq!(state.route, Route::Home);
        state.handle_input(key(Key::Char('1')), &tx)?;
        assert_eq!(state.route, Route::ResumeAnalyzer);

        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;
        state.handle_input(key(Key::Char('2')), &tx)?;
        assert_eq!(state.route, Route::CareerExplorer);
        state.handle_input(key(Key::Char('h')), &tx)?;
        assert_eq!(state.route, Route::Home);

        return Ok(());
    }

    #[tokio::test]
    async fn it_types_into_the_form() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");

        assert!(!state.handle_input(key(Key::Char('q')), &tx)?);
        assert_eq!(state.draft(), "q");

        state.handle_input(key(Key::Esc), &tx)?;
        assert_eq!(state.route, Route::Home);
        assert!(state.handle_input(key(Key::Char('q')), &tx)?);

        return Ok(());
    }

    #[tokio::test]
    async fn it_dismisses_notifications_before_leaving() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, None).await?;
        state.navigate("/resume-analyzer");
        state.submit_resume(&tx)?;
        assert!(rx.try_recv().is_err());
        assert!(state.notification.is_some());

        state.handle_input(key(Key::Esc), &tx)?;
        assert!(state.notification.is_none());
        assert_eq!(state.route, Route::ResumeAnalyzer);

        state.handle_input(key(Key::Esc), &tx)?;
        assert_eq!(state.route, Route::Home);

        return Ok(());
    }

    #[tokio::test]
    async fn it_marks_the_selected_skill_complete() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;
        state.student = Some(serde_json::from_value(student_fixture())?);
        state.navigate("/learning-path");

        // "Data Analysis" sorts first and is already complete.
        state.handle_input(key(Key::Enter), &tx)?;
        assert!(rx.try_recv().is_err());
        assert_eq!(
            state.notification.as_ref().map(|e| return e.kind),
            Some(NotificationKind::Info)
        );

        state.handle_input(key(Key::Down), &tx)?;
        state.handle_input(key(Key::Down), &tx)?;
        assert_eq!(state.selected_skill, 1);
        state.handle_input(key(Key::Enter), &tx)?;

        match rx.try_recv()? {
            Action::UpdateProgress(student_id, skill) => {
                assert_eq!(student_id, "student_1");
                assert_eq!(skill, "Machine Learning");
            }
            _ => bail!("Expected a progress update"),
        }

        state
            .handle_progress_updated("Machine Learning", Ok(()), &tx)
            .await?;
        let (student_id, _) = expect_fetch(&mut rx)?;
        assert_eq!(student_id, "student_1");

        return Ok(());
    }
}

mod handle_progress_updated {
    use super::*;

    #[tokio::test]
    async fn it_clears_the_session_for_unknown_students() -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;
        state.student = Some(serde_json::from_value(student_fixture())?);

        state
            .handle_progress_updated(
                "Machine Learning",
                Err(ClientError::InvalidSession("student_1".to_string())),
                &tx,
            )
            .await?;

        assert_eq!(state.session.get(), None);
        assert_eq!(state.student, None);
        assert!(rx.try_recv().is_err());

        return Ok(());
    }

    #[tokio::test]
    async fn it_keeps_the_session_when_rejected() -> Result<()> {
        let (tx, _rx) = mpsc::unbounded_channel::<Action>();
        let dir = tempfile::tempdir()?;
        let mut state = state_with(&dir, Some("student_1")).await?;

        state
            .handle_progress_updated(
                "Machine Learning",
                Err(ClientError::BackendRejected("Skill not in pathway".to_string())),
                &tx,
            )
            .await?;

        assert_eq!(state.session.get(), Some("student_1"));
        assert_eq!(
            state.notification.as_ref().map(|e| return e.title.to_string()),
            Some("Failed to update progress".to_string())
        );

        return Ok(());
    }
}
