//! Derived view models: pure transforms over fetched collections.
//!
//! Everything here stays in integer minor units; division by 100 happens
//! only at display time so intermediate sums never drift.

use std::collections::HashMap;

use api_types::{
    category::{Category, CategoryKind},
    entry::Entry,
    summary::MonthlySummary,
};

/// Income/expense totals over a list of entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct EntryTotals {
    pub income_minor: i64,
    pub expense_minor: i64,
}

impl EntryTotals {
    pub fn compute(entries: &[Entry]) -> Self {
        let mut totals = Self::default();
        for entry in entries {
            // Amounts are stored as non-negative magnitudes; guard anyway so
            // a misbehaving server cannot flip a sum.
            let magnitude = entry.amount_minor.abs();
            match entry.kind {
                CategoryKind::Income => totals.income_minor += magnitude,
                CategoryKind::Expense => totals.expense_minor += magnitude,
            }
        }
        totals
    }

    pub fn net_minor(&self) -> i64 {
        self.income_minor - self.expense_minor
    }
}

/// Signed total per category, ordered by descending absolute value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: String,
    pub name: String,
    pub kind: CategoryKind,
    pub total_minor: i64,
}

/// Groups entries by category and sums their signed contribution (income
/// positive, expense negative). Entries referencing a category missing from
/// `categories` keep their embedded name.
pub fn category_totals(entries: &[Entry], categories: &[Category]) -> Vec<CategoryTotal> {
    let known: HashMap<&str, &Category> = categories
        .iter()
        .map(|category| (category.id.as_str(), category))
        .collect();

    let mut totals: Vec<CategoryTotal> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for entry in entries {
        let signed = match entry.kind {
            CategoryKind::Income => entry.amount_minor.abs(),
            CategoryKind::Expense => -entry.amount_minor.abs(),
        };
        if let Some(&i) = index.get(&entry.category_id) {
            totals[i].total_minor += signed;
            continue;
        }
        let (name, kind) = match known.get(entry.category_id.as_str()) {
            Some(category) => (category.name.clone(), category.kind),
            None => (
                entry
                    .category_name
                    .clone()
                    .unwrap_or_else(|| "Uncategorized".to_string()),
                entry.kind,
            ),
        };
        index.insert(entry.category_id.clone(), totals.len());
        totals.push(CategoryTotal {
            category_id: entry.category_id.clone(),
            name,
            kind,
            total_minor: signed,
        });
    }

    totals.sort_by_key(|total| std::cmp::Reverse(total.total_minor.abs()));
    totals
}

/// The fixed top-N slice used by the charts.
pub fn top_categories(totals: &[CategoryTotal], n: usize) -> &[CategoryTotal] {
    &totals[..totals.len().min(n)]
}

/// Month with the highest net; first occurrence wins on ties.
pub fn best_month(monthly: &[MonthlySummary]) -> Option<&MonthlySummary> {
    monthly
        .iter()
        .reduce(|best, month| if month.net_minor > best.net_minor { month } else { best })
}

/// Month with the lowest net; first occurrence wins on ties.
pub fn worst_month(monthly: &[MonthlySummary]) -> Option<&MonthlySummary> {
    monthly
        .iter()
        .reduce(|worst, month| if month.net_minor < worst.net_minor { month } else { worst })
}

/// Most recent entries by date, newest first; stable for same-day entries.
pub fn recent_activity(entries: &[Entry], n: usize) -> Vec<&Entry> {
    let mut sorted: Vec<&Entry> = entries.iter().collect();
    sorted.sort_by(|a, b| b.entry_date.cmp(&a.entry_date));
    sorted.truncate(n);
    sorted
}

/// Aggregates for the summary screen header.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PeriodInsights {
    pub months: usize,
    pub total_income_minor: i64,
    pub total_expense_minor: i64,
    pub avg_income_minor: i64,
    pub avg_expense_minor: i64,
}

impl PeriodInsights {
    pub fn compute(monthly: &[MonthlySummary]) -> Self {
        if monthly.is_empty() {
            return Self::default();
        }
        let months = monthly.len();
        let total_income_minor: i64 = monthly.iter().map(|m| m.income_minor).sum();
        let total_expense_minor: i64 = monthly.iter().map(|m| m.expense_minor).sum();
        Self {
            months,
            total_income_minor,
            total_expense_minor,
            avg_income_minor: total_income_minor / months as i64,
            avg_expense_minor: total_expense_minor / months as i64,
        }
    }

    pub fn net_minor(&self) -> i64 {
        self.total_income_minor - self.total_expense_minor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn entry(id: &str, kind: CategoryKind, amount_minor: i64, category_id: &str, date: &str) -> Entry {
        Entry {
            id: id.to_string(),
            budget_id: "b1".to_string(),
            category_id: category_id.to_string(),
            kind,
            amount_minor,
            currency_code: "USD".to_string(),
            entry_date: date.parse().unwrap(),
            description: None,
            counterparty: None,
            created_by: "u1".to_string(),
            created_at: NaiveDateTime::default(),
            member_name: "Ada".to_string(),
            member_email: "ada@example.com".to_string(),
            member_avatar: None,
            comment_count: None,
            attachment_count: None,
            category_name: None,
        }
    }

    fn month(start: &str, income_minor: i64, expense_minor: i64) -> MonthlySummary {
        MonthlySummary {
            month_start: start.parse::<NaiveDate>().unwrap(),
            income_minor,
            expense_minor,
            net_minor: income_minor - expense_minor,
        }
    }

    #[test]
    fn totals_match_the_fixture_arithmetic() {
        let entries = vec![
            entry("e1", CategoryKind::Income, 150_000, "c1", "2026-08-01"),
            entry("e2", CategoryKind::Expense, 45_000, "c2", "2026-08-02"),
        ];
        let totals = EntryTotals::compute(&entries);
        assert_eq!(totals.income_minor, 150_000);
        assert_eq!(totals.expense_minor, 45_000);
        assert_eq!(totals.net_minor(), 105_000);
        // 1500.00 / 450.00 / 1050.00 once divided for display.
        assert_eq!(crate::money::format_minor(totals.net_minor(), "USD"), "1,050 USD");
    }

    #[test]
    fn totals_ignore_whatever_sign_the_server_sent() {
        let entries = vec![
            entry("e1", CategoryKind::Expense, -45_000, "c1", "2026-08-01"),
            entry("e2", CategoryKind::Expense, 5_000, "c1", "2026-08-02"),
        ];
        let totals = EntryTotals::compute(&entries);
        assert_eq!(totals.expense_minor, 50_000);
        assert_eq!(totals.net_minor(), -50_000);
    }

    #[test]
    fn category_totals_order_by_descending_absolute_value() {
        let entries = vec![
            entry("e1", CategoryKind::Expense, 120, "a", "2026-08-01"),
            entry("e2", CategoryKind::Income, 300, "b", "2026-08-01"),
            entry("e3", CategoryKind::Expense, 50, "c", "2026-08-01"),
        ];
        let totals = category_totals(&entries, &[]);
        let order: Vec<&str> = totals.iter().map(|t| t.category_id.as_str()).collect();
        assert_eq!(order, ["b", "a", "c"]);
        assert_eq!(totals[1].total_minor, -120);
    }

    #[test]
    fn category_totals_accumulate_per_category() {
        let entries = vec![
            entry("e1", CategoryKind::Expense, 100, "a", "2026-08-01"),
            entry("e2", CategoryKind::Expense, 150, "a", "2026-08-02"),
            entry("e3", CategoryKind::Income, 40, "a", "2026-08-03"),
        ];
        let totals = category_totals(&entries, &[]);
        assert_eq!(totals.len(), 1);
        assert_eq!(totals[0].total_minor, -210);
    }

    #[test]
    fn top_n_takes_a_fixed_prefix() {
        let entries = vec![
            entry("e1", CategoryKind::Expense, 120, "a", "2026-08-01"),
            entry("e2", CategoryKind::Income, 300, "b", "2026-08-01"),
            entry("e3", CategoryKind::Expense, 50, "c", "2026-08-01"),
        ];
        let totals = category_totals(&entries, &[]);
        assert_eq!(top_categories(&totals, 2).len(), 2);
        assert_eq!(top_categories(&totals, 8).len(), 3);
    }

    #[test]
    fn best_and_worst_month_keep_first_occurrence_on_ties() {
        let monthly = vec![
            month("2026-01-01", 1_000, 500),
            month("2026-02-01", 2_000, 1_500),
            month("2026-03-01", 800, 300),
        ];
        // Net is 500 for all three months.
        assert_eq!(
            best_month(&monthly).map(|m| m.month_start),
            Some("2026-01-01".parse().unwrap())
        );
        assert_eq!(
            worst_month(&monthly).map(|m| m.month_start),
            Some("2026-01-01".parse().unwrap())
        );
    }

    #[test]
    fn best_and_worst_month_select_by_net() {
        let monthly = vec![
            month("2026-01-01", 1_000, 900),
            month("2026-02-01", 5_000, 500),
            month("2026-03-01", 100, 2_000),
        ];
        assert_eq!(
            best_month(&monthly).map(|m| m.net_minor),
            Some(4_500)
        );
        assert_eq!(
            worst_month(&monthly).map(|m| m.net_minor),
            Some(-1_900)
        );
    }

    #[test]
    fn recent_activity_is_newest_first_top_five() {
        let entries = vec![
            entry("e1", CategoryKind::Expense, 10, "a", "2026-08-01"),
            entry("e2", CategoryKind::Expense, 10, "a", "2026-08-06"),
            entry("e3", CategoryKind::Expense, 10, "a", "2026-08-03"),
            entry("e4", CategoryKind::Expense, 10, "a", "2026-08-05"),
            entry("e5", CategoryKind::Expense, 10, "a", "2026-08-02"),
            entry("e6", CategoryKind::Expense, 10, "a", "2026-08-04"),
        ];
        let recent = recent_activity(&entries, 5);
        let ids: Vec<&str> = recent.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, ["e2", "e4", "e6", "e3", "e5"]);
    }

    #[test]
    fn period_insights_average_over_month_count() {
        let monthly = vec![
            month("2026-01-01", 3_000, 1_000),
            month("2026-02-01", 1_000, 3_000),
        ];
        let insights = PeriodInsights::compute(&monthly);
        assert_eq!(insights.months, 2);
        assert_eq!(insights.total_income_minor, 4_000);
        assert_eq!(insights.avg_income_minor, 2_000);
        assert_eq!(insights.avg_expense_minor, 2_000);
        assert_eq!(insights.net_minor(), 0);
    }
}
