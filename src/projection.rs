use alloc::sync::Arc;
use core::cmp::Ordering;

use crate::key::{RowKey, RowMap};
use crate::{ChangeEvent, Entry, Snapshot, ViewError};

/// Caller-supplied row ordering.
///
/// The projection always appends an ascending-key tie-break, so the comparator does not
/// have to distinguish rows with equal sort values; the effective order is strictly total
/// either way.
pub type RowComparator<K, V> = Arc<dyn Fn(&Entry<K, V>, &Entry<K, V>) -> Ordering + Send + Sync>;

/// An ordered materialized view over a keyed collection.
///
/// The projection folds batches of [`ChangeEvent`]s into a key → value map and a derived
/// totally-ordered row sequence, kept in lock-step: after every mutation the sorted order
/// contains exactly one row per map pair, in comparator order, with no duplicates.
///
/// Mutation is `O(log n)` to locate plus `O(n)` to shift; queries are `O(log n)` through
/// the order or `O(1)` through the map. All methods are synchronous with no internal
/// locking; batches must be applied by one logical thread of control at a time.
///
/// A returned [`ViewError::InconsistentState`] poisons the instance: the map and the
/// order no longer agree, and the projection must be discarded and rebuilt from the feed.
pub struct SortedProjection<K, V> {
    compare: RowComparator<K, V>,
    rows: RowMap<K, V>,
    sorted: Snapshot<K, V>,
}

impl<K: RowKey, V: Clone> SortedProjection<K, V> {
    /// Creates an empty projection ordered by `compare` (plus the key tie-break).
    pub fn new(
        compare: impl Fn(&Entry<K, V>, &Entry<K, V>) -> Ordering + Send + Sync + 'static,
    ) -> Self {
        Self::from_comparator(Arc::new(compare))
    }

    /// Creates an empty projection from an already-shared comparator.
    pub fn from_comparator(compare: RowComparator<K, V>) -> Self {
        Self {
            compare,
            rows: RowMap::new(),
            sorted: Snapshot::default(),
        }
    }

    /// Orders rows by value, then key.
    pub fn by_value() -> Self
    where
        V: Ord,
    {
        Self::new(|a, b| a.value.cmp(&b.value))
    }

    /// Orders rows by key alone.
    pub fn by_key() -> Self {
        Self::new(|_, _| Ordering::Equal)
    }

    /// Applies one batch of change events, strictly in order, and returns a view of the
    /// resulting snapshot.
    ///
    /// On error the batch is partially applied and the projection must be discarded.
    pub fn apply<I>(&mut self, batch: I) -> Result<&Snapshot<K, V>, ViewError>
    where
        I: IntoIterator<Item = ChangeEvent<K, V>>,
    {
        for event in batch {
            match event {
                ChangeEvent::Upsert { key, value } => self.upsert(key, value)?,
                ChangeEvent::Delete { key, value } => self.delete(key, value)?,
            }
        }
        ldebug!(len = self.sorted.len(), "apply batch");
        Ok(&self.sorted)
    }

    fn upsert(&mut self, key: K, value: V) -> Result<(), ViewError> {
        if let Some(old) = self.rows.get(&key).cloned() {
            // Relocation: find the row under its old value, then re-place it under the
            // new one as if the old row were already gone. Remove-then-insert yields the
            // same resulting order as an in-place shift.
            let old_index = self
                .search(&Entry::new(key.clone(), old))
                .map_err(|_| ViewError::InconsistentState {
                    context: "upsert relocation",
                })?;
            self.sorted.entries_mut().remove(old_index);

            let entry = Entry::new(key.clone(), value.clone());
            let at = match self.search(&entry) {
                Err(at) => at,
                Ok(_) => {
                    return Err(ViewError::InconsistentState {
                        context: "upsert reinsertion",
                    });
                }
            };
            ltrace!(old_index, at, "upsert relocated");
            self.sorted.entries_mut().insert(at, entry);
            self.rows.insert(key, value);
        } else {
            let entry = Entry::new(key.clone(), value.clone());
            let at = match self.search(&entry) {
                Err(at) => at,
                Ok(_) => {
                    return Err(ViewError::InconsistentState {
                        context: "upsert insertion",
                    });
                }
            };
            self.sorted.entries_mut().insert(at, entry);
            self.rows.insert(key, value);
        }
        Ok(())
    }

    fn delete(&mut self, key: K, value: V) -> Result<(), ViewError> {
        if self.rows.remove(&key).is_none() {
            // Unknown key: nothing to remove from the order.
            return Ok(());
        }
        // The carried value must still match the live row; a miss here means the feed
        // sent a stale value and the map and order have diverged.
        let index = self
            .search(&Entry::new(key, value))
            .map_err(|_| ViewError::InconsistentState { context: "delete" })?;
        self.sorted.entries_mut().remove(index);
        Ok(())
    }

    fn order(&self, a: &Entry<K, V>, b: &Entry<K, V>) -> Ordering {
        (self.compare)(a, b).then_with(|| a.key.cmp(&b.key))
    }

    fn search(&self, probe: &Entry<K, V>) -> Result<usize, usize> {
        self.sorted
            .entries()
            .binary_search_by(|e| self.order(e, probe))
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.rows.contains_key(key)
    }

    pub fn value_of(&self, key: &K) -> Option<&V> {
        self.rows.get(key)
    }

    pub fn entry_at(&self, index: usize) -> Option<&Entry<K, V>> {
        self.sorted.get(index)
    }

    /// Position of a key in the current order, or `None` if absent.
    pub fn index_of(&self, key: &K) -> Option<usize> {
        let value = self.rows.get(key)?;
        match self.search(&Entry::new(key.clone(), value.clone())) {
            Ok(index) => Some(index),
            Err(_) => {
                debug_assert!(false, "row present in map but missing from sorted order");
                None
            }
        }
    }

    /// The current snapshot, borrowed. Mutating the projection invalidates the borrow.
    pub fn current(&self) -> &Snapshot<K, V> {
        &self.sorted
    }

    /// An owning copy of the current snapshot, safe to hand to another consumer.
    pub fn snapshot(&self) -> Snapshot<K, V> {
        self.sorted.clone()
    }
}

impl<K: RowKey, V: Clone> Clone for SortedProjection<K, V> {
    fn clone(&self) -> Self {
        Self {
            compare: Arc::clone(&self.compare),
            rows: self.rows.clone(),
            sorted: self.sorted.clone(),
        }
    }
}

impl<K: core::fmt::Debug, V: core::fmt::Debug> core::fmt::Debug for SortedProjection<K, V> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SortedProjection")
            .field("sorted", &self.sorted)
            .finish_non_exhaustive()
    }
}
