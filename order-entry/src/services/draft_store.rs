//! In-memory drafts keyed by the id stored in the browser session.

use dashmap::DashMap;
use std::time::{Duration, Instant};
use uuid::Uuid;

struct Entry<T> {
    value: T,
    last_access: Instant,
}

/// Concurrent draft map. Each closure runs under the entry's shard lock, so
/// mutations of one draft are serialized; never hold it across an `.await`.
pub struct DraftStore<T> {
    drafts: DashMap<Uuid, Entry<T>>,
}

impl<T: Default> Default for DraftStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Default> DraftStore<T> {
    pub fn new() -> Self {
        Self {
            drafts: DashMap::new(),
        }
    }

    /// Run `f` against the draft, creating a default one on first use.
    pub fn with_draft<R>(&self, id: Uuid, f: impl FnOnce(&mut T) -> R) -> R {
        let mut entry = self.drafts.entry(id).or_insert_with(|| Entry {
            value: T::default(),
            last_access: Instant::now(),
        });
        entry.last_access = Instant::now();
        f(&mut entry.value)
    }

    pub fn len(&self) -> usize {
        self.drafts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drafts.is_empty()
    }

    /// Drop drafts untouched for longer than `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let before = self.drafts.len();
        self.drafts
            .retain(|_, entry| entry.last_access.elapsed() <= max_idle);
        before.saturating_sub(self.drafts.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drafts_are_created_on_first_use_and_isolated() {
        let store: DraftStore<Vec<u8>> = DraftStore::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        store.with_draft(a, |draft| draft.push(1));
        store.with_draft(a, |draft| draft.push(2));
        store.with_draft(b, |draft| draft.push(9));

        assert_eq!(store.with_draft(a, |draft| draft.clone()), vec![1, 2]);
        assert_eq!(store.with_draft(b, |draft| draft.clone()), vec![9]);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn evict_idle_keeps_recent_drafts() {
        let store: DraftStore<Vec<u8>> = DraftStore::new();
        store.with_draft(Uuid::new_v4(), |_| ());

        assert_eq!(store.evict_idle(Duration::from_secs(60)), 0);
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(store.evict_idle(Duration::ZERO), 1);
        assert!(store.is_empty());
    }
}
