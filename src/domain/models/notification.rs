use ratatui::prelude::Alignment;
use ratatui::prelude::Color;
use ratatui::prelude::Rect;
use ratatui::prelude::Style;
use ratatui::widgets::Block;
use ratatui::widgets::BorderType;
use ratatui::widgets::Borders;
use ratatui::widgets::Paragraph;
use ratatui::widgets::Wrap;
use ratatui::Frame;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// A toast. Shown at the bottom of the screen until the next key press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub description: Option<String>,
}

impl Notification {
    pub fn success(title: &str) -> Notification {
        return Notification {
            kind: NotificationKind::Success,
            title: title.to_string(),
            description: None,
        };
    }

    pub fn error(title: &str, description: &str) -> Notification {
        return Notification {
            kind: NotificationKind::Error,
            title: title.to_string(),
            description: Some(description.to_string()),
        };
    }

    pub fn info(title: &str) -> Notification {
        return Notification {
            kind: NotificationKind::Info,
            title: title.to_string(),
            description: None,
        };
    }

    pub fn text(&self) -> String {
        if let Some(description) = &self.description {
            return format!("{}: {description}", self.title);
        }

        return self.title.to_string();
    }

    pub fn render(&self, frame: &mut Frame, rect: Rect) {
        let color = match self.kind {
            NotificationKind::Success => Color::Green,
            NotificationKind::Error => Color::Red,
            NotificationKind::Info => Color::Blue,
        };

        frame.render_widget(
            Paragraph::new(self.text())
                .style(Style::default().fg(color))
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_type(BorderType::Rounded),
                )
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center),
            rect,
        );
    }
}
