use api_types::category::CategoryKind;
use client::money;

/// Parsed quick-add input: `[+|-]amount [#category] [note...]`.
///
/// `+` records income, `-` or no prefix records an expense. Exactly one
/// `#category` tag is required because every entry must carry a category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuickAddParsed {
    pub kind: CategoryKind,
    pub amount_minor: i64,
    pub category: String,
    pub note: Option<String>,
}

pub fn parse(input: &str) -> Result<QuickAddParsed, String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Enter an amount.".to_string());
    }

    let (kind, rest) = if let Some(stripped) = trimmed.strip_prefix('+') {
        (CategoryKind::Income, stripped.trim_start())
    } else if let Some(stripped) = trimmed.strip_prefix('-') {
        (CategoryKind::Expense, stripped.trim_start())
    } else {
        (CategoryKind::Expense, trimmed)
    };

    let mut parts = rest.splitn(2, ' ');
    let amount_raw = parts.next().unwrap_or("").trim();
    if amount_raw.is_empty() {
        return Err("Amount is missing.".to_string());
    }
    let note_raw = parts.next().unwrap_or("").trim();

    let amount_minor = money::normalize_amount(amount_raw)
        .map_err(|_| "Amount is not valid.".to_string())?;
    if amount_minor == 0 {
        return Err("Amount must be > 0.".to_string());
    }

    let (category, note) = parse_tag(note_raw)?;
    let Some(category) = category else {
        return Err("Category is required (add #name).".to_string());
    };

    Ok(QuickAddParsed {
        kind,
        amount_minor,
        category,
        note,
    })
}

fn parse_tag(note_raw: &str) -> Result<(Option<String>, Option<String>), String> {
    if note_raw.is_empty() {
        return Ok((None, None));
    }

    let mut tag: Option<String> = None;
    let mut kept: Vec<&str> = Vec::new();

    for token in note_raw.split_whitespace() {
        if let Some(rest) = token.strip_prefix('#') {
            if rest.is_empty() {
                kept.push(token);
                continue;
            }
            if tag.is_some() {
                return Err("Too many tags: one #category at most.".to_string());
            }
            tag = Some(rest.to_lowercase());
        } else {
            kept.push(token);
        }
    }

    let note = kept.join(" ");
    let note = if note.is_empty() { None } else { Some(note) };
    Ok((tag, note))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plus_is_income_default_is_expense() {
        let income = parse("+1500 #salary January").unwrap();
        assert_eq!(income.kind, CategoryKind::Income);
        assert_eq!(income.amount_minor, 150_000);
        assert_eq!(income.category, "salary");
        assert_eq!(income.note.as_deref(), Some("January"));

        let expense = parse("12.50 #food lunch").unwrap();
        assert_eq!(expense.kind, CategoryKind::Expense);
        assert_eq!(expense.amount_minor, 1250);
    }

    #[test]
    fn typed_sign_never_reaches_the_amount() {
        let parsed = parse("-42.50 #food").unwrap();
        assert_eq!(parsed.kind, CategoryKind::Expense);
        assert_eq!(parsed.amount_minor, 4250);
    }

    #[test]
    fn category_tag_is_required() {
        assert!(parse("12.50 lunch").is_err());
        assert!(parse("12.50").is_err());
    }

    #[test]
    fn rejects_zero_and_garbage() {
        assert!(parse("0 #food").is_err());
        assert!(parse("abc #food").is_err());
        assert!(parse("").is_err());
    }

    #[test]
    fn at_most_one_tag() {
        assert!(parse("5 #food #drinks").is_err());
    }
}
