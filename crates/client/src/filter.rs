use chrono::{Datelike, Days, Months, NaiveDate};

/// Kind filter for entry listings; `All` means "no filter" and is never sent
/// on the wire.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum KindFilter {
    #[default]
    All,
    Income,
    Expense,
}

impl KindFilter {
    fn as_param(self) -> Option<&'static str> {
        match self {
            Self::All => None,
            Self::Income => Some("income"),
            Self::Expense => Some("expense"),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Income => "Income",
            Self::Expense => "Expense",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortField {
    #[default]
    Date,
    Amount,
    Description,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
            Self::Description => "description",
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    fn flipped(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// Date-range presets offered on the entries screen.
///
/// Ranges are computed from a caller-supplied `today` at selection time;
/// `Custom` hands the range over to explicit from/to editing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DatePreset {
    Last3Days,
    Last7Days,
    ThisMonth,
    LastMonth,
    ThisYear,
    LastYear,
    Custom,
}

impl DatePreset {
    pub const ALL: [DatePreset; 7] = [
        Self::Last3Days,
        Self::Last7Days,
        Self::ThisMonth,
        Self::LastMonth,
        Self::ThisYear,
        Self::LastYear,
        Self::Custom,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Last3Days => "Last 3 days",
            Self::Last7Days => "Last 7 days",
            Self::ThisMonth => "This month",
            Self::LastMonth => "Last month",
            Self::ThisYear => "This year",
            Self::LastYear => "Last year",
            Self::Custom => "Custom",
        }
    }

    /// The concrete from/to range, or `None` for [`Custom`](Self::Custom).
    pub fn range(self, today: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
        match self {
            Self::Last3Days => Some((back_days(today, 3), today)),
            Self::Last7Days => Some((back_days(today, 7), today)),
            Self::ThisMonth => Some((month_start(today), month_end(today))),
            Self::LastMonth => {
                let prev = month_start(today)
                    .checked_sub_days(Days::new(1))
                    .unwrap_or(today);
                Some((month_start(prev), prev))
            }
            Self::ThisYear => Some((year_start(today.year()), today)),
            Self::LastYear => {
                let year = today.year() - 1;
                Some((year_start(year), year_end(year)))
            }
            Self::Custom => None,
        }
    }
}

/// Period filter for the monthly-summary screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SummaryPeriod {
    Last3Months,
    #[default]
    Last6Months,
    ThisYear,
    LastYear,
}

impl SummaryPeriod {
    pub const ALL: [SummaryPeriod; 4] = [
        Self::Last3Months,
        Self::Last6Months,
        Self::ThisYear,
        Self::LastYear,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Last3Months => "Last 3 months",
            Self::Last6Months => "Last 6 months",
            Self::ThisYear => "This year",
            Self::LastYear => "Last year",
        }
    }

    pub fn range(self, today: NaiveDate) -> (NaiveDate, NaiveDate) {
        match self {
            Self::Last3Months => (back_months(today, 3), today),
            Self::Last6Months => (back_months(today, 6), today),
            Self::ThisYear => (year_start(today.year()), today),
            Self::LastYear => {
                let year = today.year() - 1;
                (year_start(year), year_end(year))
            }
        }
    }
}

/// Page-local view state for an entry listing.
///
/// Deterministically maps to outgoing query parameters and cache-key
/// segments. Every filter transition other than explicit page navigation
/// resets `page` to 1 so a narrowed result set can never show an
/// out-of-range page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EntryFilter {
    pub kind: KindFilter,
    pub category_id: Option<String>,
    pub member_id: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub search: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub per_page: u32,
}

impl Default for EntryFilter {
    fn default() -> Self {
        Self {
            kind: KindFilter::All,
            category_id: None,
            member_id: None,
            from: None,
            to: None,
            search: None,
            sort_by: SortField::Date,
            sort_order: SortOrder::Desc,
            page: 1,
            per_page: 30,
        }
    }
}

impl EntryFilter {
    /// The entries screen opens on the current month.
    pub fn this_month(today: NaiveDate) -> Self {
        let mut filter = Self::default();
        if let Some((from, to)) = DatePreset::ThisMonth.range(today) {
            filter.from = Some(from);
            filter.to = Some(to);
        }
        filter
    }

    pub fn set_kind(&mut self, kind: KindFilter) {
        self.kind = kind;
        self.page = 1;
    }

    pub fn set_category(&mut self, category_id: Option<String>) {
        self.category_id = category_id;
        self.page = 1;
    }

    pub fn set_member(&mut self, member_id: Option<String>) {
        self.member_id = member_id;
        self.page = 1;
    }

    /// Empty input clears the search filter entirely.
    pub fn set_search(&mut self, search: &str) {
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self.page = 1;
    }

    pub fn set_range(&mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) {
        self.from = from;
        self.to = to;
        self.page = 1;
    }

    /// Applies a preset range; [`DatePreset::Custom`] leaves the current
    /// range in place for explicit editing.
    pub fn apply_preset(&mut self, preset: DatePreset, today: NaiveDate) {
        if let Some((from, to)) = preset.range(today) {
            self.set_range(Some(from), Some(to));
        }
    }

    /// Sorting on the current field flips the direction; a new field starts
    /// at the default descending order.
    pub fn toggle_sort(&mut self, field: SortField) {
        if self.sort_by == field {
            self.sort_order = self.sort_order.flipped();
        } else {
            self.sort_by = field;
            self.sort_order = SortOrder::Desc;
        }
        self.page = 1;
    }

    pub fn set_page(&mut self, page: u32) {
        self.page = page.max(1);
    }

    pub fn next_page(&mut self) {
        self.page += 1;
    }

    pub fn prev_page(&mut self) {
        self.page = self.page.saturating_sub(1).max(1);
    }

    pub fn set_per_page(&mut self, per_page: u32) {
        self.per_page = per_page.max(1);
        self.page = 1;
    }

    /// Outgoing query parameters.
    ///
    /// Unset optional filters are omitted entirely (never sent as empty
    /// strings) so the backend's "no filter" default applies, and
    /// `kind=all` is never sent.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(kind) = self.kind.as_param() {
            params.push(("kind", kind.to_string()));
        }
        if let Some(category_id) = &self.category_id {
            params.push(("category_id", category_id.clone()));
        }
        if let Some(member_id) = &self.member_id {
            params.push(("member_id", member_id.clone()));
        }
        if let Some(from) = self.from {
            params.push(("from", from.to_string()));
        }
        if let Some(to) = self.to {
            params.push(("to", to.to_string()));
        }
        if let Some(search) = &self.search {
            params.push(("search", search.clone()));
        }
        params.push(("sort_by", self.sort_by.as_str().to_string()));
        params.push(("sort_order", self.sort_order.as_str().to_string()));
        params.push(("page", self.page.to_string()));
        params.push(("per_page", self.per_page.to_string()));
        params
    }

    /// Cache-key segments; structurally equal filters produce identical
    /// segments so they share one cache slot.
    pub fn key_segments(&self) -> Vec<String> {
        self.query()
            .into_iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect()
    }
}

fn back_days(today: NaiveDate, days: u64) -> NaiveDate {
    today.checked_sub_days(Days::new(days)).unwrap_or(today)
}

fn back_months(today: NaiveDate, months: u32) -> NaiveDate {
    today
        .checked_sub_months(Months::new(months))
        .unwrap_or(today)
}

fn month_start(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

fn month_end(date: NaiveDate) -> NaiveDate {
    month_start(date)
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .unwrap_or(date)
}

fn year_start(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN)
}

fn year_end(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn filter_changes_reset_pagination() {
        let mut filter = EntryFilter::default();
        filter.set_page(4);

        filter.set_kind(KindFilter::Income);
        assert_eq!(filter.page, 1);

        filter.set_page(4);
        filter.set_category(Some("c1".to_string()));
        assert_eq!(filter.page, 1);

        filter.set_page(4);
        filter.set_search("rent");
        assert_eq!(filter.page, 1);

        filter.set_page(4);
        filter.set_range(Some(day(2026, 1, 1)), Some(day(2026, 1, 31)));
        assert_eq!(filter.page, 1);

        filter.set_page(4);
        filter.toggle_sort(SortField::Amount);
        assert_eq!(filter.page, 1);

        filter.set_page(4);
        filter.set_per_page(10);
        assert_eq!(filter.page, 1);
    }

    #[test]
    fn explicit_page_moves_are_preserved() {
        let mut filter = EntryFilter::default();
        filter.next_page();
        filter.next_page();
        assert_eq!(filter.page, 3);
        filter.prev_page();
        assert_eq!(filter.page, 2);
        filter.prev_page();
        filter.prev_page();
        assert_eq!(filter.page, 1);
    }

    #[test]
    fn empty_filters_are_omitted_from_the_query() {
        let filter = EntryFilter {
            kind: KindFilter::All,
            search: None,
            category_id: None,
            ..EntryFilter::default()
        };
        let params = filter.query();
        assert!(params.iter().all(|(name, _)| *name != "kind"));
        assert!(params.iter().all(|(name, _)| *name != "category_id"));
        assert!(params.iter().all(|(name, _)| *name != "search"));
    }

    #[test]
    fn blank_search_input_clears_the_filter() {
        let mut filter = EntryFilter::default();
        filter.set_search("rent");
        assert_eq!(filter.search.as_deref(), Some("rent"));
        filter.set_search("   ");
        assert_eq!(filter.search, None);
        assert!(filter.query().iter().all(|(name, _)| *name != "search"));
    }

    #[test]
    fn sort_toggles_on_same_field_and_resets_on_new_field() {
        let mut filter = EntryFilter::default();
        assert_eq!(filter.sort_by, SortField::Date);
        assert_eq!(filter.sort_order, SortOrder::Desc);

        filter.toggle_sort(SortField::Date);
        assert_eq!(filter.sort_order, SortOrder::Asc);

        filter.toggle_sort(SortField::Amount);
        assert_eq!(filter.sort_by, SortField::Amount);
        assert_eq!(filter.sort_order, SortOrder::Desc);
    }

    #[test]
    fn equal_filters_produce_equal_key_segments() {
        let mut a = EntryFilter::default();
        let mut b = EntryFilter::default();
        a.set_search("coffee");
        b.set_search("coffee");
        assert_eq!(a.key_segments(), b.key_segments());
    }

    #[test]
    fn month_presets_cover_whole_months() {
        let today = day(2026, 8, 4);
        let (from, to) = DatePreset::ThisMonth.range(today).unwrap();
        assert_eq!(from, day(2026, 8, 1));
        assert_eq!(to, day(2026, 8, 31));

        let (from, to) = DatePreset::LastMonth.range(today).unwrap();
        assert_eq!(from, day(2026, 7, 1));
        assert_eq!(to, day(2026, 7, 31));
    }

    #[test]
    fn last_month_preset_crosses_year_boundaries() {
        let (from, to) = DatePreset::LastMonth.range(day(2026, 1, 15)).unwrap();
        assert_eq!(from, day(2025, 12, 1));
        assert_eq!(to, day(2025, 12, 31));
    }

    #[test]
    fn day_presets_end_today() {
        let today = day(2026, 8, 4);
        let (from, to) = DatePreset::Last3Days.range(today).unwrap();
        assert_eq!(from, day(2026, 8, 1));
        assert_eq!(to, today);

        let (from, to) = DatePreset::Last7Days.range(today).unwrap();
        assert_eq!(from, day(2026, 7, 28));
        assert_eq!(to, today);
    }

    #[test]
    fn year_presets() {
        let today = day(2026, 8, 4);
        let (from, to) = DatePreset::ThisYear.range(today).unwrap();
        assert_eq!(from, day(2026, 1, 1));
        assert_eq!(to, today);

        let (from, to) = DatePreset::LastYear.range(today).unwrap();
        assert_eq!(from, day(2025, 1, 1));
        assert_eq!(to, day(2025, 12, 31));
    }

    #[test]
    fn custom_preset_keeps_the_current_range() {
        let today = day(2026, 8, 4);
        let mut filter = EntryFilter::this_month(today);
        let before = filter.clone();
        filter.apply_preset(DatePreset::Custom, today);
        assert_eq!(filter, before);
    }
}
