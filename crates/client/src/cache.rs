use std::{
    any::Any,
    collections::HashMap,
    sync::Arc,
};

use crate::keys::QueryKey;

/// Token handed out by [`QueryCache::begin`]; a resolution is applied only if
/// its token still matches the slot's current generation, so a fetch that was
/// superseded (new filter, invalidation) can never paint stale data.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchGen(u64);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum QueryStatus {
    Idle,
    Loading,
    Ready,
    Error(String),
}

#[derive(Default)]
struct Slot {
    value: Option<Arc<dyn Any + Send + Sync>>,
    error: Option<String>,
    generation: u64,
    in_flight: bool,
    stale: bool,
}

/// Keyed cache of fetched server resources.
///
/// - at most one in-flight fetch per exact key ([`begin`](Self::begin)
///   de-duplicates);
/// - a stale value stays visible while a refetch runs, so the UI never
///   flickers back to empty;
/// - a failed refetch records the error without discarding the last good
///   value;
/// - invalidation by key prefix marks slots stale and supersedes whatever is
///   in flight for them.
///
/// The runtime is the single-threaded UI event loop, so the cache takes
/// `&mut self` and needs no locking.
#[derive(Default)]
pub struct QueryCache {
    slots: HashMap<QueryKey, Slot>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a fetch for `key`, returning the generation token to resolve
    /// with. Returns `None` while another fetch for the same key is still in
    /// flight (request de-duplication).
    pub fn begin(&mut self, key: &QueryKey) -> Option<FetchGen> {
        let slot = self.slots.entry(key.clone()).or_default();
        if slot.in_flight {
            return None;
        }
        slot.generation += 1;
        slot.in_flight = true;
        Some(FetchGen(slot.generation))
    }

    /// Applies a successful fetch. Returns `false` when the resolution was
    /// superseded and therefore discarded.
    pub fn resolve_ok<T: Send + Sync + 'static>(
        &mut self,
        key: &QueryKey,
        generation: FetchGen,
        value: T,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            return false;
        };
        if slot.generation != generation.0 {
            return false;
        }
        slot.in_flight = false;
        slot.stale = false;
        slot.error = None;
        slot.value = Some(Arc::new(value));
        true
    }

    /// Applies a failed fetch; the last good value is kept.
    pub fn resolve_err(&mut self, key: &QueryKey, generation: FetchGen, message: String) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            return false;
        };
        if slot.generation != generation.0 {
            return false;
        }
        slot.in_flight = false;
        slot.stale = false;
        slot.error = Some(message);
        true
    }

    /// The latest known value, including a stale one during a refetch or
    /// after an error.
    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        self.slots
            .get(key)?
            .value
            .clone()
            .and_then(|value| value.downcast::<T>().ok())
    }

    pub fn status(&self, key: &QueryKey) -> QueryStatus {
        match self.slots.get(key) {
            None => QueryStatus::Idle,
            Some(slot) => {
                if let Some(error) = &slot.error {
                    QueryStatus::Error(error.clone())
                } else if slot.in_flight {
                    QueryStatus::Loading
                } else if slot.value.is_some() {
                    QueryStatus::Ready
                } else {
                    QueryStatus::Idle
                }
            }
        }
    }

    pub fn is_loading(&self, key: &QueryKey) -> bool {
        self.slots.get(key).is_some_and(|slot| slot.in_flight)
    }

    /// `true` when a read of `key` should trigger a (re)fetch: never fetched,
    /// or invalidated since. Errored slots return `false`; retries are
    /// explicit, never automatic.
    pub fn needs_fetch(&self, key: &QueryKey) -> bool {
        match self.slots.get(key) {
            None => true,
            Some(slot) => {
                !slot.in_flight
                    && (slot.stale || (slot.value.is_none() && slot.error.is_none()))
            }
        }
    }

    /// Marks every slot under `prefix` stale and supersedes any fetch in
    /// flight for it. Returns how many slots were invalidated.
    pub fn invalidate_prefix(&mut self, prefix: &QueryKey) -> usize {
        let mut count = 0;
        for (key, slot) in &mut self.slots {
            if key.starts_with(prefix) {
                slot.generation += 1;
                slot.in_flight = false;
                slot.stale = true;
                count += 1;
            }
        }
        count
    }

    /// Drops everything; used on logout so no data leaks across sessions.
    pub fn clear(&mut self) {
        self.slots.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(name: &str) -> QueryKey {
        QueryKey::new([name])
    }

    #[test]
    fn concurrent_begins_for_one_key_deduplicate() {
        let mut cache = QueryCache::new();
        let k = key("budgets");
        let first = cache.begin(&k);
        assert!(first.is_some());
        assert!(cache.begin(&k).is_none());

        assert!(cache.resolve_ok(&k, first.unwrap(), vec![1, 2, 3]));
        // Settled: a new fetch may start again.
        assert!(cache.begin(&k).is_some());
    }

    #[test]
    fn superseded_resolution_is_discarded() {
        let mut cache = QueryCache::new();
        let k = key("entries");
        let stale_gen = cache.begin(&k).unwrap();

        // Invalidation supersedes the in-flight fetch...
        cache.invalidate_prefix(&k);
        let fresh_gen = cache.begin(&k).unwrap();
        assert!(cache.resolve_ok(&k, fresh_gen, "fresh".to_string()));

        // ...so the old resolution must not overwrite the newer data.
        assert!(!cache.resolve_ok(&k, stale_gen, "stale".to_string()));
        assert_eq!(
            cache.get::<String>(&k).as_deref(),
            Some(&"fresh".to_string())
        );
    }

    #[test]
    fn stale_value_stays_visible_during_refetch() {
        let mut cache = QueryCache::new();
        let k = key("budgets");
        let generation = cache.begin(&k).unwrap();
        cache.resolve_ok(&k, generation, 42u32);

        cache.invalidate_prefix(&k);
        assert!(cache.needs_fetch(&k));
        let _refetch = cache.begin(&k).unwrap();

        assert!(cache.is_loading(&k));
        assert_eq!(cache.get::<u32>(&k).as_deref(), Some(&42));
    }

    #[test]
    fn errors_keep_the_last_good_value() {
        let mut cache = QueryCache::new();
        let k = key("budgets");
        let generation = cache.begin(&k).unwrap();
        cache.resolve_ok(&k, generation, 42u32);

        cache.invalidate_prefix(&k);
        let generation = cache.begin(&k).unwrap();
        cache.resolve_err(&k, generation, "boom".to_string());

        assert_eq!(cache.get::<u32>(&k).as_deref(), Some(&42));
        assert_eq!(cache.status(&k), QueryStatus::Error("boom".to_string()));
        // No automatic retry on error.
        assert!(!cache.needs_fetch(&k));
    }

    #[test]
    fn prefix_invalidation_hits_every_variant_and_counts() {
        let mut cache = QueryCache::new();
        let a = QueryKey::new(["entries", "b1", "page=1"]);
        let b = QueryKey::new(["entries", "b1", "page=2"]);
        let other = QueryKey::new(["entries", "b2", "page=1"]);
        for k in [&a, &b, &other] {
            let generation = cache.begin(k).unwrap();
            cache.resolve_ok(k, generation, ());
        }

        let count = cache.invalidate_prefix(&QueryKey::new(["entries", "b1"]));
        assert_eq!(count, 2);
        assert!(cache.needs_fetch(&a));
        assert!(cache.needs_fetch(&b));
        assert!(!cache.needs_fetch(&other));
    }
}
