#[cfg(test)]
#[path = "navigation_test.rs"]
mod tests;

use ratatui::prelude::Color;
use ratatui::prelude::Line;
use ratatui::prelude::Modifier;
use ratatui::prelude::Rect;
use ratatui::prelude::Span;
use ratatui::prelude::Style;
use ratatui::widgets::Block;
use ratatui::widgets::Borders;
use ratatui::widgets::Tabs;
use ratatui::Frame;

use super::SessionStore;
use crate::domain::models::Destination;
use crate::domain::models::Route;

const SIGNED_IN: [Destination; 4] = [
    Destination::Dashboard,
    Destination::Careers,
    Destination::LearningPath,
    Destination::Profile,
];

const SIGNED_OUT: [Destination; 1] = [Destination::GetStarted];

pub struct Navigation {}

impl Navigation {
    /// Which destinations the header offers. Derived from the session alone,
    /// so it can never show a mix of signed in and signed out entries.
    pub fn destinations(session: &SessionStore) -> &'static [Destination] {
        if session.is_active() {
            return &SIGNED_IN;
        }

        return &SIGNED_OUT;
    }

    /// Maps a 1-based header shortcut to a destination path.
    pub fn shortcut(session: &SessionStore, key: char) -> Option<&'static str> {
        let idx = key.to_digit(10)? as usize;
        if idx == 0 {
            return None;
        }

        return Navigation::destinations(session)
            .get(idx - 1)
            .map(|destination| return destination.path());
    }

    pub fn render(
        frame: &mut Frame,
        rect: Rect,
        session: &SessionStore,
        route: Route,
    ) {
        let destinations = Navigation::destinations(session);
        let titles = destinations
            .iter()
            .enumerate()
            .map(|(idx, destination)| {
                return Line::from(format!("{} {}", idx + 1, destination.title()));
            })
            .collect::<Vec<Line>>();

        let selected = destinations
            .iter()
            .position(|destination| return route.path() == Some(destination.path()));

        let mut tabs = Tabs::new(titles)
            .block(
                Block::default()
                    .borders(Borders::BOTTOM)
                    .title(Span::styled(
                        "PathfinderAI",
                        Style::default().add_modifier(Modifier::BOLD),
                    )),
            )
            .style(Style::default().fg(Color::White))
            .highlight_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD));

        if let Some(selected) = selected {
            tabs = tabs.select(selected);
        } else {
            tabs = tabs.highlight_style(Style::default());
        }

        frame.render_widget(tabs, rect);
    }
}
