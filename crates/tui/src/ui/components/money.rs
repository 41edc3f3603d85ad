use ratatui::{
    style::{Modifier, Style},
    text::Span,
};

use client::money;

use crate::ui::theme::Theme;

/// Styled span for a signed minor-unit amount.
///
/// Positive renders green with a `+` prefix, negative red, zero in the
/// neutral text color.
pub fn styled_amount(amount_minor: i64, currency_code: &str, theme: &Theme) -> Span<'static> {
    let formatted = money::format_minor(amount_minor, currency_code);
    let (color, prefix) = if amount_minor > 0 {
        (theme.positive, "+")
    } else if amount_minor < 0 {
        (theme.negative, "")
    } else {
        (theme.text, "")
    };
    Span::styled(format!("{prefix}{formatted}"), Style::default().fg(color))
}

/// Styled span without the `+`/`-` prefix, for contexts where the label
/// already carries the direction (e.g. "Expense: 450 USD").
pub fn styled_amount_no_sign(
    amount_minor: i64,
    currency_code: &str,
    theme: &Theme,
) -> Span<'static> {
    let formatted = money::format_minor(amount_minor.abs(), currency_code);
    let color = if amount_minor > 0 {
        theme.positive
    } else if amount_minor < 0 {
        theme.negative
    } else {
        theme.text
    };
    Span::styled(formatted, Style::default().fg(color))
}

/// Bold variant for totals.
pub fn styled_amount_bold(amount_minor: i64, currency_code: &str, theme: &Theme) -> Span<'static> {
    let span = styled_amount(amount_minor, currency_code, theme);
    let style = span.style.add_modifier(Modifier::BOLD);
    Span::styled(span.content, style)
}

/// ASCII bar like `████████░░░░` scaled against `max`.
pub fn ascii_bar(value: u64, max: u64, width: usize) -> String {
    if max == 0 {
        return "░".repeat(width);
    }
    let filled = ((value as f64 / max as f64) * width as f64) as usize;
    let filled = filled.min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}
