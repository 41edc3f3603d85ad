use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

use api_types::{budget::BudgetSummary, entry::Entry};
use client::{QueryCache, QueryStatus, SortOrder, view::EntryTotals};

use crate::{
    app::{AppState, EntriesMode, RangeField},
    ui::{
        components::{money, panel::panel},
        theme::Theme,
    },
};

pub fn render(frame: &mut Frame<'_>, area: Rect, state: &AppState, cache: &QueryCache) {
    let theme = Theme::default();

    let block = panel("Entries", &theme);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // filter summary
            Constraint::Length(1), // totals
            Constraint::Length(1), // spacer
            Constraint::Min(0),    // table
            Constraint::Length(3), // input area
        ])
        .split(inner);

    let currency = state
        .budget_key()
        .and_then(|key| cache.get::<BudgetSummary>(&key))
        .map(|budget| budget.currency_code.clone())
        .unwrap_or_default();

    render_filter_line(frame, rows[0], state, cache, &theme);

    let entries = state.entries_key().and_then(|key| cache.get::<Vec<Entry>>(&key));

    if let Some(entries) = &entries {
        render_totals(frame, rows[1], entries, &currency, &theme);
        render_table(frame, rows[3], state, entries, &currency, &theme);
    } else if let Some(key) = state.entries_key() {
        match cache.status(&key) {
            QueryStatus::Error(message) => {
                render_notice(frame, rows[3], &message, &theme, true);
            }
            _ => render_notice(frame, rows[3], "Loading entries...", &theme, false),
        }
    }

    render_input_area(frame, rows[4], state, &theme);
}

fn render_filter_line(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    cache: &QueryCache,
    theme: &Theme,
) {
    let filter = &state.entries.filter;
    let order = match filter.sort_order {
        SortOrder::Asc => "▲",
        SortOrder::Desc => "▼",
    };
    let loading = state
        .entries_key()
        .map(|key| cache.is_loading(&key))
        .unwrap_or(false);

    let mut spans = vec![
        Span::styled("Kind", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", filter.kind.label())),
        Span::styled("Period", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {}  ", state.entries.preset.label())),
        Span::styled("Sort", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {} {order}  ", filter.sort_by.as_str())),
        Span::styled("Page", Style::default().fg(theme.text_muted)),
        Span::raw(format!(": {} × {}  ", filter.page, filter.per_page)),
    ];
    if let Some(search) = &filter.search {
        spans.push(Span::styled("Search", Style::default().fg(theme.text_muted)));
        spans.push(Span::raw(format!(": {search}  ")));
    }
    if loading {
        spans.push(Span::styled("…", Style::default().fg(theme.accent)));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_totals(
    frame: &mut Frame<'_>,
    area: Rect,
    entries: &[Entry],
    currency: &str,
    theme: &Theme,
) {
    let totals = EntryTotals::compute(entries);
    let line = Line::from(vec![
        Span::styled("Income ", Style::default().fg(theme.text_muted)),
        money::styled_amount_no_sign(totals.income_minor, currency, theme),
        Span::raw("   "),
        Span::styled("Expense ", Style::default().fg(theme.text_muted)),
        money::styled_amount_no_sign(-totals.expense_minor, currency, theme),
        Span::raw("   "),
        Span::styled("Net ", Style::default().fg(theme.text_muted)),
        money::styled_amount_bold(totals.net_minor(), currency, theme),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_table(
    frame: &mut Frame<'_>,
    area: Rect,
    state: &AppState,
    entries: &[Entry],
    currency: &str,
    theme: &Theme,
) {
    if entries.is_empty() {
        render_notice(frame, area, "No entries match these filters.", theme, false);
        return;
    }

    let selected = state.entries.selected.min(entries.len() - 1);
    let lines: Vec<Line> = entries
        .iter()
        .enumerate()
        .take(area.height as usize)
        .map(|(i, entry)| {
            let marker = if i == selected { "▸ " } else { "  " };
            let signed = match entry.kind {
                api_types::category::CategoryKind::Income => entry.amount_minor.abs(),
                api_types::category::CategoryKind::Expense => -entry.amount_minor.abs(),
            };
            let category = entry.category_name.as_deref().unwrap_or("-");
            let description = entry.description.as_deref().unwrap_or("");
            let comments = entry
                .comment_count
                .filter(|count| *count > 0)
                .map(|count| format!(" ({count}c)"))
                .unwrap_or_default();

            let base = if i == selected {
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };

            Line::from(vec![
                Span::styled(marker, Style::default().fg(theme.accent)),
                Span::styled(format!("{}  ", entry.entry_date), base),
                Span::styled(
                    format!("{:<16}", truncate(category, 15)),
                    Style::default().fg(theme.text_muted),
                ),
                money::styled_amount(signed, currency, theme),
                Span::styled(format!("  {}", truncate(description, 34)), base),
                Span::styled(comments, Style::default().fg(theme.dim)),
            ])
        })
        .collect();

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_input_area(frame: &mut Frame<'_>, area: Rect, state: &AppState, theme: &Theme) {
    let lines = match state.entries.mode {
        EntriesMode::List => {
            if state.entries.pending {
                vec![Line::from(Span::styled(
                    "Saving...",
                    Style::default().fg(theme.dim),
                ))]
            } else {
                Vec::new()
            }
        }
        EntriesMode::QuickAdd => vec![
            Line::from(vec![
                Span::styled("Add: ", Style::default().fg(theme.accent)),
                Span::raw(format!("{}_", state.entries.input)),
            ]),
            Line::from(Span::styled(
                "[+|-]amount #category note, e.g. \"+1500 #salary January\" or \"12.50 #food lunch\"",
                Style::default().fg(theme.dim),
            )),
        ],
        EntriesMode::Search => vec![
            Line::from(vec![
                Span::styled("Search: ", Style::default().fg(theme.accent)),
                Span::raw(format!("{}_", state.entries.input)),
            ]),
            Line::from(Span::styled(
                "Matches descriptions. Enter applies, empty clears, Esc cancels.",
                Style::default().fg(theme.dim),
            )),
        ],
        EntriesMode::Range => {
            let focus_style = Style::default()
                .fg(theme.accent)
                .add_modifier(Modifier::BOLD);
            let idle_style = Style::default().fg(theme.text_muted);
            let (from_style, to_style) = match state.entries.range_focus {
                RangeField::From => (focus_style, idle_style),
                RangeField::To => (idle_style, focus_style),
            };
            vec![
                Line::from(vec![
                    Span::styled("From: ", from_style),
                    Span::raw(format!("{}  ", state.entries.range_from)),
                    Span::styled("To: ", to_style),
                    Span::raw(state.entries.range_to.clone()),
                ]),
                Line::from(Span::styled(
                    "Dates as YYYY-MM-DD. Tab switches, Enter applies, Esc cancels.",
                    Style::default().fg(theme.dim),
                )),
            ]
        }
    };
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

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
