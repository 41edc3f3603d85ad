use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::notification::Notification;
use client::{QueryCache, QueryStatus};

use crate::{
    app::AppState,
    ui::{components::panel::panel, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, cache: &QueryCache) {
    let theme = Theme::default();

    let block = panel("Inbox", &theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key = state.notifications_key();
    let notifications = cache.get::<Vec<Notification>>(&key);

    let Some(notifications) = notifications else {
        match cache.status(&key) {
            QueryStatus::Error(message) => render_notice(frame, inner, &message, &theme, true),
            _ => render_notice(frame, inner, "Loading notifications...", &theme, false),
        }
        return;
    };

    if notifications.is_empty() {
        render_notice(frame, inner, "Nothing here. All caught up.", &theme, false);
        return;
    }

    let selected = state
        .notifications
        .selected
        .min(notifications.len() - 1);

    let lines: Vec<Line> = notifications
        .iter()
        .enumerate()
        .take(inner.height as usize)
        .map(|(i, notification)| {
            let marker = if i == selected { "▸ " } else { "  " };
            let unread = if notification.is_read { "  " } else { "● " };
            let title_style = if notification.is_read {
                Style::default().fg(theme.text_muted)
            } else {
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
            };
            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(unread, Style::default().fg(theme.accent)),
                Span::styled(format!("{:<28}", notification.title), title_style),
                Span::styled(
                    truncate(&notification.message, 48),
                    Style::default().fg(theme.dim),
                ),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_notice(frame: &mut Frame<'_>, area: Rect, message: &str, theme: &Theme, error: bool) {
    let color = if error { theme.error } else { theme.dim };
    let mut spans = vec![Span::styled(message.to_string(), Style::default().fg(color))];
    if error {
        spans.push(Span::raw(" Press "));
        spans.push(Span::styled("r", Style::default().fg(theme.accent)));
        spans.push(Span::raw(" to retry."));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
