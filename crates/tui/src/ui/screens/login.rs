use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::{
    app::{AppState, LoginField},
    ui::{components::panel::panel_focused, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState) {
    let theme = Theme::default();

    let width = 56.min(area.width);
    let height = 12.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    let box_area = Rect {
        x,
        y,
        width,
        height,
    };

    let block = panel_focused("Philand", &theme);
    let inner = block.inner(box_area);
    frame.render_widget(block, box_area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // server
            Constraint::Length(1), // spacer
            Constraint::Length(1), // email
            Constraint::Length(1), // password
            Constraint::Length(1), // spacer
            Constraint::Length(1), // message
            Constraint::Min(0),
            Constraint::Length(1), // hints
        ])
        .split(inner);

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Server: ", Style::default().fg(theme.text_muted)),
            Span::raw(state.base_url.clone()),
        ])),
        rows[0],
    );

    render_field(
        frame,
        rows[2],
        "Email",
        &state.login.email,
        state.login.focus == LoginField::Email,
        &theme,
    );
    let masked = "•".repeat(state.login.password.chars().count());
    render_field(
        frame,
        rows[3],
        "Password",
        &masked,
        state.login.focus == LoginField::Password,
        &theme,
    );

    if state.login.pending {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Signing in...",
                Style::default().fg(theme.dim),
            )),
            rows[5],
        );
    } else if let Some(message) = &state.login.message {
        frame.render_widget(
            Paragraph::new(Span::styled(
                message.as_str(),
                Style::default().fg(theme.error),
            )),
            rows[5],
        );
    }

    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled("Tab", Style::default().fg(theme.accent)),
            Span::raw(" switch  "),
            Span::styled("Enter", Style::default().fg(theme.accent)),
            Span::raw(" sign in  "),
            Span::styled("Ctrl+C", Style::default().fg(theme.accent)),
            Span::raw(" quit"),
        ]))
        .alignment(Alignment::Center),
        rows[7],
    );
}

fn render_field(
    frame: &mut Frame<'_>,
    area: Rect,
    label: &str,
    value: &str,
    focused: bool,
    theme: &Theme,
) {
    let label_style = if focused {
        Style::default()
            .fg(theme.accent)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text_muted)
    };
    let cursor = if focused { "_" } else { "" };
    frame.render_widget(
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{label:>9}: "), label_style),
            Span::raw(format!("{value}{cursor}")),
        ])),
        area,
    );
}
