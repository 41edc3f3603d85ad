use csv::Writer;
use serde::Serialize;

use api_types::entry::Entry;

#[derive(Serialize)]
struct EntryRow<'a> {
    date: String,
    kind: &'a str,
    amount: String,
    currency: &'a str,
    category: &'a str,
    description: &'a str,
    recorded_by: &'a str,
}

/// Serializes an entry listing to CSV, amounts in plain major units
/// (no thousands separators, so spreadsheets parse them as numbers).
pub fn entries_to_csv(entries: &[Entry]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = Writer::from_writer(Vec::new());
    for entry in entries {
        let magnitude = entry.amount_minor.abs();
        writer.serialize(EntryRow {
            date: entry.entry_date.to_string(),
            kind: entry.kind.as_str(),
            amount: format!("{}.{:02}", magnitude / 100, magnitude % 100),
            currency: &entry.currency_code,
            category: entry.category_name.as_deref().unwrap_or(""),
            description: entry.description.as_deref().unwrap_or(""),
            recorded_by: &entry.member_name,
        })?;
    }
    writer.into_inner().map_err(|err| err.into_error().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use api_types::category::CategoryKind;
    use chrono::NaiveDateTime;

    fn entry(kind: CategoryKind, amount_minor: i64) -> Entry {
        Entry {
            id: "e1".to_string(),
            budget_id: "b1".to_string(),
            category_id: "c1".to_string(),
            kind,
            amount_minor,
            currency_code: "USD".to_string(),
            entry_date: "2026-08-04".parse().unwrap(),
            description: Some("coffee, beans".to_string()),
            counterparty: None,
            created_by: "u1".to_string(),
            created_at: NaiveDateTime::default(),
            member_name: "Ada".to_string(),
            member_email: "ada@example.com".to_string(),
            member_avatar: None,
            comment_count: None,
            attachment_count: None,
            category_name: Some("Food".to_string()),
        }
    }

    #[test]
    fn header_and_quoting_survive_round_trip() {
        let bytes = entries_to_csv(&[entry(CategoryKind::Expense, 123_45)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "date,kind,amount,currency,category,description,recorded_by"
        );
        let row = lines.next().unwrap();
        assert!(row.contains("123.45"));
        assert!(row.contains("\"coffee, beans\""));
    }

    #[test]
    fn amounts_export_as_magnitudes() {
        let bytes = entries_to_csv(&[entry(CategoryKind::Expense, -50_00)]).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert!(text.contains(",50.00,"));
        assert!(!text.contains("-50.00"));
    }
}
