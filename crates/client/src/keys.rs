use chrono::NaiveDate;

use crate::filter::EntryFilter;

/// Structured cache key: resource name plus every parameter that makes the
/// fetched data distinct.
///
/// Keys compare structurally, so two identical filter states collapse onto
/// one cache slot. Prefix matching supports invalidation of a whole family
/// (e.g. every `entries` listing of one budget regardless of filters).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0[..prefix.0.len()] == prefix.0[..]
    }

    pub fn budgets(search: Option<&str>) -> Self {
        let mut segments = vec!["budgets".to_string()];
        if let Some(search) = search {
            segments.push(format!("query={search}"));
        }
        Self(segments)
    }

    pub fn budget(budget_id: &str) -> Self {
        Self::new(["budget", budget_id])
    }

    pub fn budget_balance(budget_id: &str) -> Self {
        Self::new(["budget-balance", budget_id])
    }

    pub fn categories(budget_id: &str) -> Self {
        Self::new(["categories", budget_id])
    }

    /// All entries listings of a budget; used as invalidation prefix.
    pub fn entries_prefix(budget_id: &str) -> Self {
        Self::new(["entries", budget_id])
    }

    pub fn entries(budget_id: &str, filter: &EntryFilter) -> Self {
        let mut segments = vec!["entries".to_string(), budget_id.to_string()];
        segments.extend(filter.key_segments());
        Self(segments)
    }

    pub fn summary_prefix(budget_id: &str) -> Self {
        Self::new(["summary", budget_id])
    }

    pub fn summary(budget_id: &str, from: NaiveDate, to: NaiveDate) -> Self {
        Self(vec![
            "summary".to_string(),
            budget_id.to_string(),
            from.to_string(),
            to.to_string(),
        ])
    }

    pub fn members(budget_id: &str) -> Self {
        Self::new(["members", budget_id])
    }

    pub fn comments(budget_id: &str, entry_id: &str) -> Self {
        Self::new(["comments", budget_id, entry_id])
    }

    pub fn notifications() -> Self {
        Self::new(["notifications"])
    }

    pub fn unread_count() -> Self {
        Self::new(["notifications-unread"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_filters_make_equal_keys() {
        let mut a = EntryFilter::default();
        let mut b = EntryFilter::default();
        a.set_search("coffee");
        b.set_search("coffee");
        assert_eq!(QueryKey::entries("b1", &a), QueryKey::entries("b1", &b));
    }

    #[test]
    fn different_filters_make_distinct_keys() {
        let a = EntryFilter::default();
        let mut b = EntryFilter::default();
        b.set_search("coffee");
        assert_ne!(QueryKey::entries("b1", &a), QueryKey::entries("b1", &b));
    }

    #[test]
    fn prefix_matches_every_filter_variant() {
        let mut filter = EntryFilter::default();
        filter.set_search("coffee");
        let key = QueryKey::entries("b1", &filter);
        assert!(key.starts_with(&QueryKey::entries_prefix("b1")));
        assert!(!key.starts_with(&QueryKey::entries_prefix("b2")));
        assert!(!key.starts_with(&QueryKey::budget_balance("b1")));
    }
}
