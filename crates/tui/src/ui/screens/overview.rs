use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::{
    budget::{BudgetBalance, BudgetSummary},
    entry::Entry,
    membership::Member,
};
use client::{QueryCache, view};

use crate::{
    app::AppState,
    ui::{
        components::{money, panel::panel},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, cache: &QueryCache) {
    let theme = Theme::default();

    let budget = state
        .budget_key()
        .and_then(|key| cache.get::<BudgetSummary>(&key));
    let Some(budget) = budget else {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Loading budget...",
                Style::default().fg(theme.dim),
            ))
            .alignment(Alignment::Center),
            area,
        );
        return;
    };

    let members = state
        .members_key()
        .and_then(|key| cache.get::<Vec<Member>>(&key));

    let mut constraints = vec![
        Constraint::Length(5), // budget card
        Constraint::Length(5), // balance card
        Constraint::Min(7),    // recent activity
    ];
    if members.is_some() {
        constraints.push(Constraint::Length(6));
    }
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    render_budget_card(frame, rows[0], &budget, &theme);
    render_balance_card(frame, rows[1], state, cache, &budget, &theme);
    render_recent_activity(frame, rows[2], state, cache, &budget, &theme);
    if let Some(members) = members {
        render_members(frame, rows[3], &members, &theme);
    }
}

fn render_budget_card(frame: &mut Frame<'_>, area: Rect, budget: &BudgetSummary, theme: &Theme) {
    let block = panel("Budget", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut title_spans = vec![Span::styled(
        budget.name.clone(),
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
    )];
    if budget.archived {
        title_spans.push(Span::styled(
            "  ARCHIVED",
            Style::default().fg(theme.warning),
        ));
    }

    let lines = vec![
        Line::from(title_spans),
        Line::from(vec![
            Span::styled("Type", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}  ", budget.budget_type.as_str())),
            Span::styled("Currency", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}  ", budget.currency_code)),
            Span::styled("Your role", Style::default().fg(theme.text_muted)),
            Span::raw(format!(": {}", budget.user_role.as_str())),
        ]),
        Line::from(Span::styled(
            budget.description.clone().unwrap_or_default(),
            Style::default().fg(theme.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_balance_card(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    cache: &QueryCache,
    budget: &BudgetSummary,
    theme: &Theme,
) {
    let block = panel("Balance", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let balance = state
        .balance_key()
        .and_then(|key| cache.get::<BudgetBalance>(&key));
    let Some(balance) = balance else {
        frame.render_widget(
            Paragraph::new(Span::styled("Loading...", Style::default().fg(theme.dim))),
            inner,
        );
        return;
    };

    // The balance endpoint serves major units; scale back to minor for the
    // shared money formatting.
    let income_minor = (balance.income * 100.0).round() as i64;
    let expense_minor = (balance.expense * 100.0).round() as i64;
    let net_minor = (balance.net * 100.0).round() as i64;

    let lines = vec![
        Line::from(vec![
            Span::styled("Income   ", Style::default().fg(theme.text_muted)),
            money::styled_amount_no_sign(income_minor, &budget.currency_code, theme),
        ]),
        Line::from(vec![
            Span::styled("Expense  ", Style::default().fg(theme.text_muted)),
            money::styled_amount_no_sign(-expense_minor, &budget.currency_code, theme),
        ]),
        Line::from(vec![
            Span::styled("Net      ", Style::default().fg(theme.text_muted)),
            money::styled_amount_bold(net_minor, &budget.currency_code, theme),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_recent_activity(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    cache: &QueryCache,
    budget: &BudgetSummary,
    theme: &Theme,
) {
    let block = panel("Recent activity", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = state
        .entries_key()
        .and_then(|key| cache.get::<Vec<Entry>>(&key));
    let Some(entries) = entries else {
        frame.render_widget(
            Paragraph::new(Span::styled("Loading...", Style::default().fg(theme.dim))),
            inner,
        );
        return;
    };

    let recent = view::recent_activity(&entries, 5);
    if recent.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "Nothing recorded this month.",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let lines: Vec<Line> = recent
        .iter()
        .map(|entry| {
            let signed = match entry.kind {
                api_types::category::CategoryKind::Income => entry.amount_minor.abs(),
                api_types::category::CategoryKind::Expense => -entry.amount_minor.abs(),
            };
            Line::from(vec![
                Span::styled(
                    format!("{}  ", entry.entry_date),
                    Style::default().fg(theme.text),
                ),
                money::styled_amount(signed, &budget.currency_code, theme),
                Span::styled(
                    format!(
                        "  {} · {}",
                        entry.category_name.as_deref().unwrap_or("-"),
                        entry.member_name
                    ),
                    Style::default().fg(theme.dim),
                ),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_members(frame: &mut Frame<'_>, area: Rect, members: &[Member], theme: &Theme) {
    let block = panel("Members", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines: Vec<Line> = members
        .iter()
        .take(inner.height as usize)
        .map(|member| {
            let name = member.user_name.as_deref().unwrap_or(&member.user_email);
            Line::from(vec![
                Span::styled(format!("{name:<28}"), Style::default().fg(theme.text)),
                Span::styled(member.role.as_str(), Style::default().fg(theme.text_muted)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}
