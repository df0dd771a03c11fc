#[cfg(test)]
#[path = "pages_test.rs"]
mod tests;

use ratatui::prelude::Alignment;
use ratatui::prelude::Constraint;
use ratatui::prelude::Direction;
use ratatui::prelude::Layout;
use ratatui::prelude::Rect;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Padding;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;
use tui_textarea::TextArea;

use super::AppState;
use super::Navigation;
use crate::domain::models::Route;
use crate::domain::models::StudentRecord;

fn join_or(items: &[String], empty: &str) -> String {
    if items.is_empty() {
        return empty.to_string();
    }

    return items.join(", ");
}

fn home(state: &AppState) -> Vec<String> {
    let mut lines = vec![
        "Welcome to PathfinderAI".to_string(),
        "".to_string(),
        "Analyze your resume, discover careers that match your skills, and follow a"
            .to_string(),
        "learning path to close the gaps.".to_string(),
        "".to_string(),
    ];

    let first = Navigation::destinations(&state.session)[0];
    lines.push(format!("Press Enter to open {}.", first.title()));

    return lines;
}

/// Pages that need a record share the same empty and loading states.
fn with_student<F>(state: &AppState, page: F) -> Vec<String>
where
    F: Fn(&str, &StudentRecord) -> Vec<String>,
{
    let student_id = match state.session.get() {
        Some(student_id) => student_id,
        None => {
            return vec![
                "No resume analyzed yet.".to_string(),
                "Press 1 to get started.".to_string(),
            ];
        }
    };

    match &state.student {
        Some(student) => return page(student_id, student),
        None if state.loading_student => {
            return vec!["Loading your profile...".to_string()];
        }
        None => {
            return vec![
                "Your profile couldn't be loaded.".to_string(),
                "Press r to try again.".to_string(),
            ];
        }
    }
}

fn dashboard(student_id: &str, student: &StudentRecord) -> Vec<String> {
    let (completed, total) = student.progress_summary();
    let mut lines = vec![
        format!("Student: {student_id}"),
        "".to_string(),
        format!("Skills: {}", join_or(student.skills(), "none detected")),
        format!("Skill gaps: {}", join_or(student.skill_gaps(), "none")),
        format!("Learning progress: {completed}/{total} skills completed"),
    ];

    if let Some(best) = student.best_match() {
        lines.push(format!(
            "Top career match: {} ({:.1}%)",
            best.title, best.match_percentage
        ));
    }

    return lines;
}

fn careers(state: &AppState) -> Vec<String> {
    let mut lines = with_student(state, |_, student| {
        if student.career_matches().is_empty() {
            return vec!["No career matches yet.".to_string()];
        }

        let mut lines = vec![];
        for career in student.career_matches().iter() {
            lines.push(format!(
                "{} - {:.1}% match",
                career.title, career.match_percentage
            ));
            lines.push(format!(
                "  Matching skills: {}",
                join_or(&career.matching_skills, "none")
            ));
            lines.push(format!(
                "  Missing skills: {}",
                join_or(&career.missing_skills, "none")
            ));
            if !career.details.salary_range.is_empty() {
                lines.push(format!(
                    "  Salary: {}, growth: {}",
                    career.details.salary_range, career.details.growth_rate
                ));
            }
        }

        return lines;
    });

    lines.push("".to_string());
    match &state.market_data {
        Some(market_data) => {
            lines.push("Job market".to_string());
            lines.push(format!(
                "  In-demand skills: {}",
                join_or(&market_data.required_skills, "none")
            ));
            for (title, details) in market_data.career_paths.iter() {
                lines.push(format!(
                    "  {title}: {} ({} growth)",
                    details.salary_range, details.growth_rate
                ));
            }
        }
        None => {
            lines.push("Press m to load job market data.".to_string());
        }
    }

    return lines;
}

fn learning_path(state: &AppState) -> Vec<String> {
    let selected = state.selected_skill;
    return with_student(state, |_, student| {
        if student.pathway().is_empty() {
            return vec!["Your learning path is empty. Nice work!".to_string()];
        }

        let mut lines = vec![];
        for (idx, (skill, resource)) in student.pathway().iter().enumerate() {
            let cursor = if idx == selected { ">" } else { " " };
            let mark = if student.is_completed(skill) { "x" } else { " " };
            lines.push(format!(
                "{cursor} [{mark}] {skill}: {} ({})",
                resource.title, resource.kind
            ));
            lines.push(format!("      {}", resource.url));
        }
        lines.push("".to_string());
        lines.push("Up/Down to select, Enter to mark complete.".to_string());

        return lines;
    });
}

fn profile(student_id: &str, student: &StudentRecord) -> Vec<String> {
    let mut lines = vec![format!("Student: {student_id}")];
    let profile = student.profile.clone().unwrap_or_default();
    if profile.is_empty() {
        lines.push("No profile details yet. Use `pathfinder profile set` to add them.".to_string());
        return lines;
    }

    let fields = [
        ("Name", profile.name),
        ("Email", profile.email),
        ("Education", profile.education),
    ];
    for (label, value) in fields {
        if let Some(value) = value {
            lines.push(format!("{label}: {value}"));
        }
    }

    if let Some(goal) = profile.career_goal {
        match goal.reason {
            Some(reason) => lines.push(format!("Career goal: {} ({reason})", goal.title)),
            None => lines.push(format!("Career goal: {}", goal.title)),
        }
    }

    return lines;
}

fn resume_analyzer(state: &AppState) -> Vec<String> {
    if state.submission.is_submitting() {
        return vec!["Analyzing your resume. Leaving this page cancels the analysis.".to_string()];
    }

    return vec![
        "Paste or type your resume below, then press CTRL+S to analyze it.".to_string(),
        "Esc leaves the form.".to_string(),
    ];
}

pub struct Pages {}

impl Pages {
    pub fn title(route: Route) -> &'static str {
        match route {
            Route::Home => return "Home",
            Route::Dashboard => return "Dashboard",
            Route::ResumeAnalyzer => return "Resume Analyzer",
            Route::CareerExplorer => return "Career Explorer",
            Route::LearningPath => return "Learning Path",
            Route::Profile => return "Profile",
            Route::NotFound => return "Not Found",
        }
    }

    pub fn lines(state: &AppState) -> Vec<String> {
        match state.route {
            Route::Home => return home(state),
            Route::Dashboard => return with_student(state, dashboard),
            Route::ResumeAnalyzer => return resume_analyzer(state),
            Route::CareerExplorer => return careers(state),
            Route::LearningPath => return learning_path(state),
            Route::Profile => return with_student(state, profile),
            Route::NotFound => {
                return vec![
                    "404 - Page not found".to_string(),
                    "Press h to go home.".to_string(),
                ];
            }
        }
    }

    /// Empty resume form, recreated after every successful analysis.
    pub fn resume_form<'a>() -> TextArea<'a> {
        let mut textarea = TextArea::default();
        textarea.set_block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Double)
                .title("Resume (CTRL+S to analyze)")
                .padding(Padding::new(1, 1, 0, 0)),
        );

        return textarea;
    }

    pub fn render(frame: &mut Frame, rect: Rect, state: &AppState) {
        let text = Pages::lines(state).join("\n");
        let block = Block::default()
            .borders(Borders::ALL)
            .title(Pages::title(state.route))
            .padding(Padding::new(1, 1, 0, 0));

        if state.route != Route::ResumeAnalyzer {
            frame.render_widget(
                Paragraph::new(text).block(block).wrap(Wrap { trim: false }),
                rect,
            );
            return;
        }

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![Constraint::Length(4), Constraint::Min(3)])
            .split(rect);

        frame.render_widget(
            Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
            layout[0],
        );

        if !state.submission.is_submitting() {
            frame.render_widget(state.textarea.widget(), layout[1]);
            return;
        }

        let pending = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .padding(Padding::new(1, 1, 0, 0));
        frame.render_widget(
            Paragraph::new("Analyzing your resume...")
                .block(pending)
                .alignment(Alignment::Center),
            layout[1],
        );
    }
}
