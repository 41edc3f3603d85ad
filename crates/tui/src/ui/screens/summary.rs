use chrono::Datelike;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Paragraph},
};

use api_types::{
    budget::BudgetSummary, category::Category, entry::Entry, summary::MonthlySummary,
};
use client::{QueryCache, QueryStatus, view};

use crate::{
    app::AppState,
    ui::{
        components::{money, panel::panel},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, cache: &QueryCache) {
    let theme = Theme::default();
    let (from, to) = state.summary_range();

    let title = format!("Summary · {} · {from} — {to}", state.summary.period.label());
    let block = panel(&title, &theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let currency = state
        .budget_key()
        .and_then(|key| cache.get::<BudgetSummary>(&key))
        .map(|budget| budget.currency_code.clone())
        .unwrap_or_default();

    let monthly = state
        .summary_key()
        .and_then(|key| cache.get::<Vec<MonthlySummary>>(&key));

    let Some(monthly) = monthly else {
        if let Some(key) = state.summary_key() {
            if let QueryStatus::Error(message) = cache.status(&key) {
                render_notice(frame, inner, &message, &theme, true);
                return;
            }
        }
        render_notice(frame, inner, "Loading summary...", &theme, false);
        return;
    };

    if monthly.is_empty() {
        render_notice(frame, inner, "No data for this period.", &theme, false);
        return;
    }

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // KPIs
            Constraint::Length(2), // best/worst month
            Constraint::Min(6),    // category breakdown
            Constraint::Length(7), // monthly expenses chart
        ])
        .split(inner);

    render_kpis(frame, rows[0], &monthly, &currency, &theme);
    render_best_worst(frame, rows[1], &monthly, &currency, &theme);
    render_breakdown(frame, rows[2], state, cache, &currency, &theme);
    render_monthly_chart(frame, rows[3], &monthly, &theme);
}

fn render_kpis(
    frame: &mut Frame<'_>,
    area: Rect,
    monthly: &[MonthlySummary],
    currency: &str,
    theme: &Theme,
) {
    let insights = view::PeriodInsights::compute(monthly);
    let lines = vec![
        Line::from(vec![
            Span::styled("Total income   ", Style::default().fg(theme.text_muted)),
            money::styled_amount_no_sign(insights.total_income_minor, currency, theme),
            Span::styled(
                format!(
                    "   avg {}/month",
                    client::money::format_minor(insights.avg_income_minor, currency)
                ),
                Style::default().fg(theme.dim),
            ),
        ]),
        Line::from(vec![
            Span::styled("Total expense  ", Style::default().fg(theme.text_muted)),
            money::styled_amount_no_sign(-insights.total_expense_minor, currency, theme),
            Span::styled(
                format!(
                    "   avg {}/month",
                    client::money::format_minor(insights.avg_expense_minor, currency)
                ),
                Style::default().fg(theme.dim),
            ),
        ]),
        Line::from(vec![
            Span::styled("Net            ", Style::default().fg(theme.text_muted)),
            money::styled_amount_bold(insights.net_minor(), currency, theme),
            Span::styled(
                format!("   over {} months", insights.months),
                Style::default().fg(theme.dim),
            ),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_best_worst(
    frame: &mut Frame<'_>,
    area: Rect,
    monthly: &[MonthlySummary],
    currency: &str,
    theme: &Theme,
) {
    let mut lines = Vec::new();
    if let Some(best) = view::best_month(monthly) {
        lines.push(Line::from(vec![
            Span::styled("Best month   ", Style::default().fg(theme.text_muted)),
            Span::styled(
                format!(
                    "{} {}  ",
                    month_name_short(best.month_start.month()),
                    best.month_start.year()
                ),
                Style::default().fg(theme.text),
            ),
            money::styled_amount(best.net_minor, currency, theme),
        ]));
    }
    if let Some(worst) = view::worst_month(monthly) {
        lines.push(Line::from(vec![
            Span::styled("Worst month  ", Style::default().fg(theme.text_muted)),
            Span::styled(
                format!(
                    "{} {}  ",
                    month_name_short(worst.month_start.month()),
                    worst.month_start.year()
                ),
                Style::default().fg(theme.text),
            ),
            money::styled_amount(worst.net_minor, currency, theme),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_breakdown(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    cache: &QueryCache,
    currency: &str,
    theme: &Theme,
) {
    let block = panel("Top categories", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let entries = state
        .summary_entries_key()
        .and_then(|key| cache.get::<Vec<Entry>>(&key));
    let categories = state
        .categories_key()
        .and_then(|key| cache.get::<Vec<Category>>(&key));

    let Some(entries) = entries else {
        frame.render_widget(
            Paragraph::new(Span::styled("Loading...", Style::default().fg(theme.dim))),
            inner,
        );
        return;
    };

    let empty = Vec::new();
    let totals = view::category_totals(
        &entries,
        categories.as_deref().unwrap_or(&empty),
    );
    if totals.is_empty() {
        frame.render_widget(
            Paragraph::new(Span::styled(
                "No categorized entries in this period.",
                Style::default().fg(theme.dim),
            )),
            inner,
        );
        return;
    }

    let top = view::top_categories(&totals, 8);
    let max = top
        .iter()
        .map(|total| total.total_minor.unsigned_abs())
        .max()
        .unwrap_or(1);

    let lines: Vec<Line> = top
        .iter()
        .take(inner.height as usize)
        .map(|total| {
            let bar = money::ascii_bar(total.total_minor.unsigned_abs(), max, 20);
            let color = if total.total_minor >= 0 {
                theme.positive
            } else {
                theme.negative
            };
            Line::from(vec![
                Span::styled(
                    format!("{:<16}", truncate(&total.name, 15)),
                    Style::default().fg(theme.text),
                ),
                Span::styled(
                    format!(
                        "{:>14}",
                        client::money::format_minor(total.total_minor, currency)
                    ),
                    Style::default().fg(color),
                ),
                Span::raw("  "),
                Span::styled(bar, Style::default().fg(color)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_monthly_chart(
    frame: &mut Frame<'_>,
    area: Rect,
    monthly: &[MonthlySummary],
    theme: &Theme,
) {
    let block = panel("Monthly expenses", theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let labels: Vec<String> = monthly
        .iter()
        .map(|month| month_name_short(month.month_start.month()).to_string())
        .collect();
    let bar_data: Vec<(&str, u64)> = labels
        .iter()
        .zip(monthly)
        .map(|(label, month)| {
            // Major units keep the bar values readable.
            (label.as_str(), (month.expense_minor / 100).max(0) as u64)
        })
        .collect();

    let chart = BarChart::default()
        .data(&bar_data)
        .bar_width(5)
        .bar_gap(2)
        .bar_style(Style::default().fg(theme.accent))
        .value_style(Style::default().fg(theme.dim).add_modifier(Modifier::BOLD))
        .label_style(Style::default().fg(theme.dim));

    frame.render_widget(chart, inner);
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

fn month_name_short(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "???",
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
