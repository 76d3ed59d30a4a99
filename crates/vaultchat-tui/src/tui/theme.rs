//! Styles for every visual component of the chat view.

use ratatui::style::{Color, Modifier, Style};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Component {
    UserRole,
    AssistantRole,
    MarkdownHeading,
    MarkdownCode,
    MarkdownCodeBlock,
    MarkdownLink,
    MarkdownBlockquote,
    MarkdownListBullet,
    Reference,
    ToolCallHeader,
    ToolCallIcon,
    ToolCallSummary,
    StatusPending,
    StatusRunning,
    StatusSuccess,
    StatusError,
    ErrorText,
    DimText,
    StreamingIndicator,
    PopupBorder,
    PopupSelection,
    PopupDescription,
    PopupIcon,
}

/// A named palette mapping components to styles.
#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
        }
    }
}

impl Theme {
    pub fn style(&self, component: Component) -> Style {
        match component {
            Component::UserRole => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Component::AssistantRole => Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            Component::MarkdownHeading => Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            Component::MarkdownCode => Style::default().fg(Color::Yellow),
            Component::MarkdownCodeBlock => Style::default().fg(Color::Gray),
            Component::MarkdownLink => Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            Component::MarkdownBlockquote => Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::ITALIC),
            Component::MarkdownListBullet => Style::default().fg(Color::DarkGray),
            Component::Reference => Style::default()
                .fg(Color::LightBlue)
                .add_modifier(Modifier::UNDERLINED),
            Component::ToolCallHeader => Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            Component::ToolCallIcon => Style::default().fg(Color::DarkGray),
            Component::ToolCallSummary => Style::default().fg(Color::Gray),
            Component::StatusPending => Style::default().fg(Color::DarkGray),
            Component::StatusRunning => Style::default().fg(Color::Yellow),
            Component::StatusSuccess => Style::default().fg(Color::Green),
            Component::StatusError => Style::default().fg(Color::Red),
            Component::ErrorText => Style::default().fg(Color::Red),
            Component::DimText => Style::default().fg(Color::DarkGray),
            Component::StreamingIndicator => Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
            Component::PopupBorder => Style::default().fg(Color::White),
            Component::PopupSelection => Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
            Component::PopupDescription => Style::default().fg(Color::DarkGray),
            Component::PopupIcon => Style::default().fg(Color::Cyan),
        }
    }

    pub fn dim_text(&self) -> Style {
        self.style(Component::DimText)
    }

    pub fn error_text(&self) -> Style {
        self.style(Component::ErrorText)
    }
}
