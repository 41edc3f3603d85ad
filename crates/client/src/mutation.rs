use crate::{cache::QueryCache, error::ClientError, keys::QueryKey};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Port through which the mutation layer reports outcomes to the user.
///
/// Injected so the dispatcher can be exercised in tests without a UI; the
/// terminal front end implements it as a toast queue.
pub trait NotificationPort {
    fn notify(&mut self, level: NoticeLevel, title: &str, body: Option<&str>);
}

/// What to do once a write operation settles: which cache families it could
/// have changed, and what to tell the user.
#[derive(Clone, Debug)]
pub struct MutationSpec {
    success_title: String,
    success_body: Option<String>,
    error_title: String,
    invalidates: Vec<QueryKey>,
}

impl MutationSpec {
    pub fn new(success_title: impl Into<String>) -> Self {
        Self {
            success_title: success_title.into(),
            success_body: None,
            error_title: "Something went wrong".to_string(),
            invalidates: Vec::new(),
        }
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.success_body = Some(body.into());
        self
    }

    pub fn error_title(mut self, title: impl Into<String>) -> Self {
        self.error_title = title.into();
        self
    }

    pub fn invalidates(mut self, prefix: QueryKey) -> Self {
        self.invalidates.push(prefix);
        self
    }

    /// Creating, editing or deleting an entry changes the listings and the
    /// running balance of its budget.
    pub fn entry_write(success_title: impl Into<String>, budget_id: &str) -> Self {
        Self::new(success_title)
            .invalidates(QueryKey::entries_prefix(budget_id))
            .invalidates(QueryKey::budget_balance(budget_id))
    }

    pub fn budget_write(success_title: impl Into<String>, budget_id: &str) -> Self {
        Self::new(success_title)
            .invalidates(QueryKey::budgets(None))
            .invalidates(QueryKey::budget(budget_id))
    }

    pub fn category_write(success_title: impl Into<String>, budget_id: &str) -> Self {
        Self::new(success_title).invalidates(QueryKey::categories(budget_id))
    }

    pub fn member_write(success_title: impl Into<String>, budget_id: &str) -> Self {
        Self::new(success_title).invalidates(QueryKey::members(budget_id))
    }

    pub fn comment_write(success_title: impl Into<String>, budget_id: &str, entry_id: &str) -> Self {
        Self::new(success_title)
            .invalidates(QueryKey::comments(budget_id, entry_id))
            .invalidates(QueryKey::entries_prefix(budget_id))
    }

    /// A transfer lands one entry on each side.
    pub fn transfer_write(
        success_title: impl Into<String>,
        from_budget_id: &str,
        to_budget_id: &str,
    ) -> Self {
        Self::new(success_title)
            .invalidates(QueryKey::entries_prefix(from_budget_id))
            .invalidates(QueryKey::budget_balance(from_budget_id))
            .invalidates(QueryKey::entries_prefix(to_budget_id))
            .invalidates(QueryKey::budget_balance(to_budget_id))
    }

    pub fn notification_write(success_title: impl Into<String>) -> Self {
        Self::new(success_title)
            .invalidates(QueryKey::notifications())
            .invalidates(QueryKey::unread_count())
    }
}

/// Wraps write operations with their completion side effects.
///
/// The pending phase is observable by the caller (it holds the future);
/// `settle` runs the success/error tail: invalidate each listed prefix
/// exactly once and emit exactly one notification. The cache is never
/// mutated on failure; there are no optimistic updates, every write is
/// confirmed by refetch.
pub struct MutationDispatcher<N: NotificationPort> {
    notifier: N,
}

impl<N: NotificationPort> MutationDispatcher<N> {
    pub fn new(notifier: N) -> Self {
        Self { notifier }
    }

    pub fn notifier_mut(&mut self) -> &mut N {
        &mut self.notifier
    }

    pub fn settle<T>(
        &mut self,
        cache: &mut QueryCache,
        spec: &MutationSpec,
        result: Result<T, ClientError>,
    ) -> Option<T> {
        match result {
            Ok(value) => {
                for prefix in &spec.invalidates {
                    cache.invalidate_prefix(prefix);
                }
                self.notifier.notify(
                    NoticeLevel::Success,
                    &spec.success_title,
                    spec.success_body.as_deref(),
                );
                Some(value)
            }
            Err(err) => {
                self.notifier.notify(
                    NoticeLevel::Error,
                    &spec.error_title,
                    Some(&err.user_message()),
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{filter::EntryFilter, keys::QueryKey};

    #[derive(Default)]
    struct RecordingPort {
        notices: Vec<(NoticeLevel, String, Option<String>)>,
    }

    impl NotificationPort for RecordingPort {
        fn notify(&mut self, level: NoticeLevel, title: &str, body: Option<&str>) {
            self.notices
                .push((level, title.to_string(), body.map(str::to_string)));
        }
    }

    fn warm_cache() -> QueryCache {
        let mut cache = QueryCache::new();
        for key in [
            QueryKey::entries("b1", &EntryFilter::default()),
            QueryKey::budget_balance("b1"),
            QueryKey::categories("b1"),
        ] {
            let generation = cache.begin(&key).unwrap();
            cache.resolve_ok(&key, generation, ());
        }
        cache
    }

    #[test]
    fn successful_entry_create_invalidates_each_family_once() {
        let mut cache = warm_cache();
        let mut dispatcher = MutationDispatcher::new(RecordingPort::default());
        let spec = MutationSpec::entry_write("Entry added", "b1");

        let out = dispatcher.settle(&mut cache, &spec, Ok::<_, ClientError>(()));
        assert!(out.is_some());

        assert!(cache.needs_fetch(&QueryKey::entries("b1", &EntryFilter::default())));
        assert!(cache.needs_fetch(&QueryKey::budget_balance("b1")));
        // Untouched family stays fresh.
        assert!(!cache.needs_fetch(&QueryKey::categories("b1")));

        let notices = &dispatcher.notifier_mut().notices;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, NoticeLevel::Success);
        assert_eq!(notices[0].1, "Entry added");
    }

    #[test]
    fn failure_keeps_the_cache_and_reports_the_server_message() {
        let mut cache = warm_cache();
        let mut dispatcher = MutationDispatcher::new(RecordingPort::default());
        let spec = MutationSpec::entry_write("Entry added", "b1");

        let out = dispatcher.settle::<()>(
            &mut cache,
            &spec,
            Err(ClientError::Validation("amount must be positive".to_string())),
        );
        assert!(out.is_none());

        assert!(!cache.needs_fetch(&QueryKey::entries("b1", &EntryFilter::default())));
        assert!(!cache.needs_fetch(&QueryKey::budget_balance("b1")));

        let notices = &dispatcher.notifier_mut().notices;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].0, NoticeLevel::Error);
        assert_eq!(notices[0].2.as_deref(), Some("amount must be positive"));
    }

    #[test]
    fn transfer_invalidates_both_sides() {
        let mut cache = QueryCache::new();
        for key in [
            QueryKey::budget_balance("from"),
            QueryKey::budget_balance("to"),
        ] {
            let generation = cache.begin(&key).unwrap();
            cache.resolve_ok(&key, generation, ());
        }

        let mut dispatcher = MutationDispatcher::new(RecordingPort::default());
        let spec = MutationSpec::transfer_write("Transfer complete", "from", "to");
        dispatcher.settle(&mut cache, &spec, Ok::<_, ClientError>(()));

        assert!(cache.needs_fetch(&QueryKey::budget_balance("from")));
        assert!(cache.needs_fetch(&QueryKey::budget_balance("to")));
    }
}
