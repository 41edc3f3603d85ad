pub mod components;
pub mod keymap;
pub mod screens;

mod terminal;
mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::notification::UnreadCount;
use client::QueryCache;

use crate::app::{AppState, Screen, Section};

pub use terminal::{AppTerminal as Terminal, restore_terminal, setup_terminal};
pub use theme::Theme;

pub fn render(frame: &mut Frame<'_>, state: &AppState, cache: &QueryCache) {
    let area = frame.area();
    match state.screen {
        Screen::Login => screens::login::render(frame, area, state),
        Screen::Home => render_shell(frame, area, state, cache),
    }
}

fn render_shell(frame: &mut Frame<'_>, area: Rect, state: &AppState, cache: &QueryCache) {
    let theme = Theme::default();

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Info bar
            Constraint::Length(2), // Tab bar
            Constraint::Min(0),    // Main content
            Constraint::Length(1), // Bottom bar
        ])
        .split(area);

    render_info_bar(frame, layout[0], state, cache, &theme);
    components::tabs::render_tabs(frame, layout[1], state.section, &theme);

    match state.section {
        Section::Budgets => screens::budgets::render(frame, layout[2], state, cache),
        Section::Overview => screens::overview::render(frame, layout[2], state, cache),
        Section::Entries => screens::entries::render(frame, layout[2], state, cache),
        Section::Summary => screens::summary::render(frame, layout[2], state, cache),
        Section::Notifications => screens::notifications::render(frame, layout[2], state, cache),
    }

    render_bottom_bar(frame, layout[3], state, &theme);
    components::toast::render(frame, area, state.toast.as_ref());
}

fn render_info_bar(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    cache: &QueryCache,
    theme: &Theme,
) {
    let user = state.user_name.as_deref().unwrap_or("-");
    let budget = state
        .budget_key()
        .and_then(|key| cache.get::<api_types::budget::BudgetSummary>(&key))
        .map(|budget| budget.name.clone())
        .unwrap_or_else(|| "-".to_string());
    let unread = cache
        .get::<UnreadCount>(&state.unread_key())
        .map(|count| count.count)
        .unwrap_or(0);

    let line = Line::from(vec![
        Span::styled("Philand  ", Style::default().fg(theme.accent)),
        Span::styled("User", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {user}  ")),
        Span::styled("Budget", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {budget}  ")),
        Span::styled("Unread", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {unread}  ")),
        Span::styled("Today", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}", state.today)),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

fn render_bottom_bar(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let mut parts = components::tabs::tab_shortcuts(theme);

    let context_hints = get_context_hints(state, theme);
    if !context_hints.is_empty() {
        parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
        parts.extend(context_hints);
    }

    parts.push(Span::styled("  │  ", Style::default().fg(theme.border)));
    parts.push(Span::styled("r", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" refresh  "));
    parts.push(Span::styled("q", Style::default().fg(theme.accent)));
    parts.push(Span::raw(" quit"));

    frame.render_widget(Paragraph::new(Line::from(parts)), area);
}

fn get_context_hints(state: &AppState, theme: &Theme) -> Vec<Span<'static>> {
    let accent = Style::default().fg(theme.accent);
    match state.section {
        Section::Budgets => vec![
            Span::styled("Enter", accent),
            Span::raw(" open  "),
            Span::styled("/", accent),
            Span::raw(" search  "),
            Span::styled("c", accent),
            Span::raw(" create  "),
            Span::styled("m", accent),
            Span::raw(" transfer  "),
            Span::styled("x", accent),
            Span::raw(" archive"),
        ],
        Section::Overview => vec![
            Span::styled("e", accent),
            Span::raw(" entries  "),
            Span::styled("s", accent),
            Span::raw(" summary"),
        ],
        Section::Entries => vec![
            Span::styled("a", accent),
            Span::raw(" add  "),
            Span::styled("/", accent),
            Span::raw(" search  "),
            Span::styled("f", accent),
            Span::raw(" kind  "),
            Span::styled("d", accent),
            Span::raw(" period  "),
            Span::styled("1-3", accent),
            Span::raw(" sort  "),
            Span::styled("n/p", accent),
            Span::raw(" page  "),
            Span::styled("x", accent),
            Span::raw(" delete  "),
            Span::styled("w", accent),
            Span::raw(" export"),
        ],
        Section::Summary => vec![
            Span::styled("d", accent),
            Span::raw(" period"),
        ],
        Section::Notifications => vec![
            Span::styled("m", accent),
            Span::raw(" mark read  "),
            Span::styled("a", accent),
            Span::raw(" mark all"),
        ],
    }
}
