use ratatui::{
    style::{Color, Style},
    text::Span,
    widgets::{Block, BorderType, Borders},
};

use crate::ui::theme::Theme;

/// Rounded bordered panel wrapping every dashboard section.
pub fn panel(title: &str, theme: &Theme) -> Block<'static> {
    bordered(title, theme.border, theme)
}

/// Variant with the accent border, for the panel holding input focus.
pub fn panel_focused(title: &str, theme: &Theme) -> Block<'static> {
    bordered(title, theme.border_focused, theme)
}

fn bordered(title: &str, border: Color, theme: &Theme) -> Block<'static> {
    Block::default()
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(theme.accent),
        ))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
}
