use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::budget::BudgetSummary;
use client::{QueryCache, QueryStatus};

use crate::{
    app::{AppState, BudgetsMode},
    ui::{components::panel::panel, theme::Theme},
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, cache: &QueryCache) {
    let theme = Theme::default();

    let title = match &state.budgets.search {
        Some(search) => format!("Budgets · search: {search}"),
        None => "Budgets".to_string(),
    };
    let block = panel(&title, &theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let key = state.budgets_key();
    let budgets = cache.get::<Vec<BudgetSummary>>(&key);

    match cache.status(&key) {
        QueryStatus::Error(message) if budgets.is_none() => {
            render_notice(frame, inner, &message, &theme, true);
            return;
        }
        QueryStatus::Loading if budgets.is_none() => {
            render_notice(frame, inner, "Loading budgets...", &theme, false);
            return;
        }
        _ => {}
    }

    let Some(budgets) = budgets else {
        render_notice(frame, inner, "No data yet.", &theme, false);
        return;
    };

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(4)])
        .split(inner);

    if budgets.is_empty() {
        render_notice(
            frame,
            rows[0],
            "No budgets yet. Press c to create one.",
            &theme,
            false,
        );
    } else {
        render_list(frame, rows[0], state, &budgets, &theme);
    }

    match state.budgets.mode {
        BudgetsMode::List => {}
        BudgetsMode::Search => render_search(frame, rows[1], state, &theme),
        BudgetsMode::Create => render_create(frame, rows[1], state, &theme),
        BudgetsMode::Transfer => render_transfer(frame, rows[1], state, &budgets, &theme),
    }
}

fn render_list(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    budgets: &[BudgetSummary],
    theme: &Theme,
) {
    let selected = state.budgets.selected.min(budgets.len().saturating_sub(1));
    let lines: Vec<Line> = budgets
        .iter()
        .enumerate()
        .take(area.height as usize)
        .map(|(i, budget)| {
            let marker = if i == selected { "▸ " } else { "  " };
            let name_style = if i == selected {
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            let mut spans = vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(format!("{:<24}", budget.name), name_style),
                Span::styled(
                    format!("{:<10}", budget.budget_type.as_str()),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!("{:<5}", budget.currency_code),
                    Style::default().fg(theme.dim),
                ),
                Span::styled(
                    format!("{:<12}", budget.user_role.as_str()),
                    Style::default().fg(theme.text_muted),
                ),
            ];
            if budget.archived {
                spans.push(Span::styled(
                    "ARCHIVED",
                    Style::default().fg(theme.warning),
                ));
            }
            Line::from(spans)
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_search(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines = vec![
        Line::from(vec![
            Span::styled("Search: ", Style::default().fg(theme.accent)),
            Span::raw(format!("{}_", state.budgets.input)),
        ]),
        Line::from(Span::styled(
            "Enter to apply, empty clears, Esc cancels.",
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_create(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let form = &state.budgets.create;
    let focus_style = Style::default()
        .fg(theme.accent)
        .add_modifier(Modifier::BOLD);
    let idle_style = Style::default().fg(theme.text_muted);

    let lines = vec![
        Line::from(vec![
            Span::styled(
                "New budget / Name: ",
                if form.focus == 0 { focus_style } else { idle_style },
            ),
            Span::raw(format!("{}{}", form.name, if form.focus == 0 { "_" } else { "" })),
            Span::styled(
                "   Currency: ",
                if form.focus == 1 { focus_style } else { idle_style },
            ),
            Span::raw(format!(
                "{}{}",
                form.currency,
                if form.focus == 1 { "_" } else { "" }
            )),
        ]),
        Line::from(Span::styled(
            "Tab switches fields, Enter creates, Esc cancels.",
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_transfer(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    budgets: &[BudgetSummary],
    theme: &Theme,
) {
    let selected = state.budgets.selected.min(budgets.len().saturating_sub(1));
    let source = budgets.get(selected);
    let destinations: Vec<&BudgetSummary> = budgets
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != selected)
        .map(|(_, budget)| budget)
        .collect();
    let to_index = state
        .budgets
        .transfer
        .to_index
        .min(destinations.len().saturating_sub(1));

    let source_name = source.map(|b| b.name.as_str()).unwrap_or("?");
    let dest_name = destinations
        .get(to_index)
        .map(|b| b.name.as_str())
        .unwrap_or("?");

    let lines = vec![
        Line::from(vec![
            Span::styled("Transfer ", Style::default().fg(theme.accent)),
            Span::raw(format!("{source_name} → ")),
            Span::styled(
                dest_name,
                Style::default()
                    .fg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (↑/↓ changes destination)", Style::default().fg(theme.dim)),
        ]),
        Line::from(vec![
            Span::styled("Amount: ", Style::default().fg(theme.accent)),
            Span::raw(format!("{}_", state.budgets.transfer.amount)),
        ]),
        Line::from(Span::styled(
            "Enter sends one atomic transfer (paired entries), Esc cancels.",
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), area);
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
