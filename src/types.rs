use alloc::vec::Vec;

/// One keyed row of the view.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Entry<K, V> {
    pub key: K,
    pub value: V,
}

impl<K, V> Entry<K, V> {
    pub fn new(key: K, value: V) -> Self {
        Self { key, value }
    }
}

/// A single mutation of the keyed collection.
///
/// Batches of events are applied strictly in arrival order.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ChangeEvent<K, V> {
    /// Insert a new row, or replace the value of an existing one.
    Upsert { key: K, value: V },
    /// Remove a row.
    ///
    /// `value` must be the row's value as of this event; it is needed to locate the row in
    /// the sorted order. A stale value is a feed contract violation (see
    /// [`ViewError::InconsistentState`](crate::ViewError::InconsistentState)).
    Delete { key: K, value: V },
}

/// A structural update transforming one snapshot into the next.
///
/// Indices always refer to the sequence as it stands immediately before the delta is
/// applied. `Move { from, to }` means: take out the row at `from`, then re-insert it so
/// it ends up at index `to`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Delta {
    /// The whole view was (re)built; positional history is meaningless.
    Reset,
    RemoveRange { index: usize, count: usize },
    Move { from: usize, to: usize },
    InsertRange { index: usize, count: usize },
}

/// One complete, immutable, ordered version of the view.
///
/// Snapshots are compared by key membership and row equality, never by position.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot<K, V> {
    entries: Vec<Entry<K, V>>,
}

impl<K, V> Default for Snapshot<K, V> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<K, V> Snapshot<K, V> {
    /// Wraps an already-ordered sequence of rows.
    ///
    /// Useful when driving [`DiffEngine`](crate::DiffEngine) from a source other than
    /// [`SortedProjection`](crate::SortedProjection). The caller is responsible for key
    /// uniqueness.
    pub fn from_entries(entries: Vec<Entry<K, V>>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Entry<K, V>> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[Entry<K, V>] {
        &self.entries
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Entry<K, V>> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> Vec<Entry<K, V>> {
        self.entries
    }

    pub(crate) fn entries_mut(&mut self) -> &mut Vec<Entry<K, V>> {
        &mut self.entries
    }

    /// Linear scan for a key's position. For indexed lookups against the live view, prefer
    /// [`SortedProjection::index_of`](crate::SortedProjection::index_of).
    pub fn position_of(&self, key: &K) -> Option<usize>
    where
        K: PartialEq,
    {
        self.entries.iter().position(|e| e.key == *key)
    }
}

impl<K, V> From<Vec<Entry<K, V>>> for Snapshot<K, V> {
    fn from(entries: Vec<Entry<K, V>>) -> Self {
        Self::from_entries(entries)
    }
}

impl<K, V> FromIterator<Entry<K, V>> for Snapshot<K, V> {
    fn from_iter<I: IntoIterator<Item = Entry<K, V>>>(iter: I) -> Self {
        Self::from_entries(iter.into_iter().collect())
    }
}

impl<'a, K, V> IntoIterator for &'a Snapshot<K, V> {
    type Item = &'a Entry<K, V>;
    type IntoIter = core::slice::Iter<'a, Entry<K, V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// One unit of transition between consecutive snapshots.
///
/// `snapshot` is the state *after* `delta` has been applied. Steps are meant to be
/// consumed once, in order, and discarded; they hold no references back into the engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Step<K, V> {
    pub snapshot: Snapshot<K, V>,
    pub delta: Delta,
}
