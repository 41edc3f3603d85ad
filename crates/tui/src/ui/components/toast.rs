use ratatui::{
    Frame,
    layout::Rect,
    style::Style,
    widgets::{Block, Borders, Clear, Paragraph},
};

use client::NoticeLevel;

use crate::{app::ToastState, ui::theme::Theme};

/// Toast overlay in the bottom-right corner; color tracks the notice level.
/// Drawn last so it floats above whatever screen is active.
pub fn render(frame: &mut Frame<'_>, area: Rect, toast: Option<&ToastState>) {
    let Some(toast) = toast else {
        return;
    };
    let theme = Theme::default();

    let width = (toast.message.chars().count() as u16).saturating_add(4).min(area.width);
    let rect = Rect {
        x: area.right().saturating_sub(width),
        y: area.bottom().saturating_sub(4).max(area.y),
        width,
        height: 3.min(area.height),
    };

    let color = match toast.level {
        NoticeLevel::Info => theme.text,
        NoticeLevel::Success => theme.positive,
        NoticeLevel::Error => theme.error,
    };
    let style = Style::default().fg(color);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(toast.message.as_str())
            .style(style)
            .block(Block::default().borders(Borders::ALL).border_style(style)),
        rect,
    );
}
