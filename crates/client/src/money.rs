use std::fmt::Write as _;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid amount: {0}")]
pub struct ParseAmountError(pub String);

/// Parses a major-unit decimal string into signed minor units.
///
/// Accepts `.` or `,` as decimal separator and an optional leading `+`/`-`;
/// rejects more than two fractional digits so nothing is silently rounded.
pub fn parse_major(input: &str) -> Result<i64, ParseAmountError> {
    let empty = || ParseAmountError("empty amount".to_string());
    let invalid = || ParseAmountError("invalid amount".to_string());
    let overflow = || ParseAmountError("amount too large".to_string());

    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(empty());
    }

    let (sign, rest) = if let Some(stripped) = trimmed.strip_prefix('-') {
        (-1i64, stripped)
    } else if let Some(stripped) = trimmed.strip_prefix('+') {
        (1i64, stripped)
    } else {
        (1i64, trimmed)
    };

    let rest = rest.trim();
    if rest.is_empty() {
        return Err(empty());
    }

    let rest = rest.replace(',', ".");
    let mut parts = rest.split('.');
    let units_str = parts.next().ok_or_else(invalid)?;
    let cents_str = parts.next();
    if parts.next().is_some() {
        return Err(invalid());
    }

    if units_str.is_empty() || !units_str.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let units: i64 = units_str.parse().map_err(|_| invalid())?;

    let cents: i64 = match cents_str {
        None | Some("") => 0,
        Some(frac) => {
            if !frac.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            match frac.len() {
                1 => frac.parse::<i64>().map_err(|_| invalid())? * 10,
                2 => frac.parse::<i64>().map_err(|_| invalid())?,
                _ => return Err(ParseAmountError("too many decimals".to_string())),
            }
        }
    };

    let total = units
        .checked_mul(100)
        .and_then(|v| v.checked_add(cents))
        .ok_or_else(overflow)?;

    if sign < 0 {
        total.checked_neg().ok_or_else(overflow)
    } else {
        Ok(total)
    }
}

/// Form-input normalization: whatever sign the user typed, the submitted
/// payload carries the non-negative magnitude; the entry kind carries the
/// direction.
pub fn normalize_amount(input: &str) -> Result<i64, ParseAmountError> {
    parse_major(input).map(|minor| minor.abs())
}

/// Display convention: thousands separators, decimals only when the amount
/// is not whole, currency code as suffix. `1_234_56` → `"1,234.56 USD"`,
/// `1_000_000_00` → `"1,000,000 USD"`.
pub fn format_minor(amount_minor: i64, currency_code: &str) -> String {
    let mut out = format_minor_plain(amount_minor);
    if !currency_code.is_empty() {
        let _ = write!(out, " {currency_code}");
    }
    out
}

/// Same convention without the currency suffix.
pub fn format_minor_plain(amount_minor: i64) -> String {
    let sign = if amount_minor < 0 { "-" } else { "" };
    let abs = amount_minor.unsigned_abs();
    let units = group_thousands(abs / 100);
    let cents = abs % 100;
    if cents == 0 {
        format!("{sign}{units}")
    } else {
        format!("{sign}{units}.{cents:02}")
    }
}

/// Short form for tight spaces: `1.2M USD`, `45.3K USD`.
pub fn format_minor_compact(amount_minor: i64, currency_code: &str) -> String {
    let abs_units = amount_minor.unsigned_abs() / 100;
    let sign = if amount_minor < 0 { "-" } else { "" };
    if abs_units >= 1_000_000 {
        let millions = abs_units as f64 / 1_000_000.0;
        format!("{sign}{millions:.1}M {currency_code}")
    } else if abs_units >= 1_000 {
        let thousands = abs_units as f64 / 1_000.0;
        format!("{sign}{thousands:.1}K {currency_code}")
    } else {
        format_minor(amount_minor, currency_code)
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let offset = digits.len() % 3;
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (i + 3 - offset) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_dot_or_comma() {
        assert_eq!(parse_major("10").unwrap(), 1000);
        assert_eq!(parse_major("10.5").unwrap(), 1050);
        assert_eq!(parse_major("10,50").unwrap(), 1050);
        assert_eq!(parse_major("-0.01").unwrap(), -1);
        assert_eq!(parse_major("+1.00").unwrap(), 100);
        assert_eq!(parse_major("  2.30 ").unwrap(), 230);
    }

    #[test]
    fn parse_rejects_more_than_two_decimals() {
        assert!(parse_major("12.345").is_err());
        assert!(parse_major("0.001").is_err());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!(parse_major("").is_err());
        assert!(parse_major("-").is_err());
        assert!(parse_major("1.2.3").is_err());
        assert!(parse_major("ten").is_err());
    }

    #[test]
    fn normalized_amount_drops_the_typed_sign() {
        assert_eq!(normalize_amount("-42.50").unwrap(), 4250);
        assert_eq!(normalize_amount("42.50").unwrap(), 4250);
        assert_eq!(normalize_amount("+42.50").unwrap(), 4250);
    }

    #[test]
    fn whole_amounts_render_without_decimals() {
        assert_eq!(format_minor(1_000_000, "USD"), "10,000 USD");
        assert_eq!(format_minor(0, "EUR"), "0 EUR");
        assert_eq!(format_minor(-500_00, "EUR"), "-500 EUR");
    }

    #[test]
    fn fractional_amounts_render_two_decimals() {
        assert_eq!(format_minor(123_456, "USD"), "1,234.56 USD");
        assert_eq!(format_minor(-1_050, "EUR"), "-10.50 EUR");
        assert_eq!(format_minor(1, "EUR"), "0.01 EUR");
    }

    #[test]
    fn grouping_crosses_every_three_digits() {
        assert_eq!(format_minor_plain(1_000_000_000_00), "1,000,000,000");
        assert_eq!(format_minor_plain(12_345_678_90), "12,345,678.90");
    }

    #[test]
    fn compact_form_scales_to_k_and_m() {
        assert_eq!(format_minor_compact(1_234_567_00, "USD"), "1.2M USD");
        assert_eq!(format_minor_compact(45_300_00, "USD"), "45.3K USD");
        assert_eq!(format_minor_compact(999_00, "USD"), "999 USD");
    }
}
