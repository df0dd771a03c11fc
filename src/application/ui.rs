use std::io;

use anyhow::Result;
use crossterm::cursor;
use crossterm::event::DisableBracketedPaste;
use crossterm::event::EnableBracketedPaste;
use crossterm::terminal::disable_raw_mode;
use crossterm::terminal::enable_raw_mode;
use crossterm::terminal::EnterAlternateScreen;
use crossterm::terminal::LeaveAlternateScreen;
use ratatui::backend::CrosstermBackend;
use ratatui::prelude::*;
use ratatui::Terminal;
use tokio::sync::mpsc;
#[cfg(feature = "dev")]
use tui_textarea::Input;
#[cfg(feature = "dev")]
use tui_textarea::Key;

use crate::domain::models::Action;
use crate::domain::models::Event;
use crate::domain::models::Route;
use crate::domain::services::events::EventsService;
use crate::domain::services::AppState;
use crate::domain::services::Navigation;
use crate::domain::services::Pages;
use crate::domain::services::SessionStore;

fn draw(frame: &mut Frame, app_state: &AppState) {
    let notification_height = if app_state.notification.is_some() { 3 } else { 0 };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(notification_height),
        ])
        .split(frame.size());

    Navigation::render(frame, layout[0], &app_state.session, app_state.route);
    Pages::render(frame, layout[1], app_state);

    if let Some(notification) = &app_state.notification {
        notification.render(frame, layout[2]);
    }
}

async fn start_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app_state: &mut AppState<'_>,
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut events = EventsService::new(rx);

    #[cfg(feature = "dev")]
    {
        app_state.navigate("/resume-analyzer");
        let test_str = "Python developer with SQL and communication skills.";
        for char in test_str.chars() {
            app_state.textarea.input(Input {
                key: Key::Char(char),
                ctrl: false,
                alt: false,
                shift: false,
            });
        }
    }

    app_state.start(&tx)?;

    loop {
        terminal.draw(|frame| {
            draw(frame, app_state);
        })?;

        match events.next().await? {
            Event::StudentFetched(student_id, cancel, res) => {
                app_state
                    .handle_student_fetched(&student_id, &cancel, res)
                    .await;
            }
            Event::ResumeAnalyzed(cancel, res) => {
                app_state.handle_resume_analyzed(&cancel, res, &tx).await?;
            }
            Event::ProgressUpdated(skill, res) => {
                app_state.handle_progress_updated(&skill, res, &tx).await?;
            }
            Event::MarketDataFetched(res) => {
                app_state.handle_market_data(res);
            }
            Event::KeyboardCTRLC() => {
                break;
            }
            Event::KeyboardCTRLS() => {
                if app_state.route == Route::ResumeAnalyzer {
                    app_state.notification = None;
                    app_state.submit_resume(&tx)?;
                }
            }
            Event::KeyboardPaste(text) => {
                app_state.handle_paste(&text);
            }
            Event::KeyboardInput(input) => {
                if app_state.handle_input(input, &tx)? {
                    break;
                }
            }
            Event::UIResize() | Event::UITick() => (),
        }
    }

    return Ok(());
}

pub fn destruct_terminal_for_panic() {
    let _ = disable_raw_mode();
    let _ = crossterm::execute!(io::stdout(), LeaveAlternateScreen, DisableBracketedPaste);
    let _ = crossterm::execute!(io::stdout(), cursor::Show);
}

pub async fn start(
    tx: mpsc::UnboundedSender<Action>,
    rx: mpsc::UnboundedReceiver<Event>,
) -> Result<()> {
    let mut app_state = AppState::new(SessionStore::load_default().await);

    let stdout = io::stdout();
    let mut stdout = stdout.lock();

    enable_raw_mode()?;
    crossterm::execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)?;
    let term_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(term_backend)?;

    let res = start_loop(&mut terminal, &mut app_state, tx, rx).await;

    disable_raw_mode()?;
    crossterm::execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableBracketedPaste
    )?;
    terminal.show_cursor()?;

    return res;
}
