use crate::key::{RowKey, RowMap};

/// Issues a stable numeric identity per key.
///
/// Renderers use these ids to recognize "this is the same item, now elsewhere" across
/// edit scripts, e.g. for animation or view recycling. Ids are handed out in first-sight
/// order starting at 0 and are never removed or reused, so an id stays valid even after
/// its key leaves the view and comes back.
///
/// The flip side: the map and counter grow with the number of distinct keys ever
/// observed. Sessions that churn through an unbounded key space should plan for that
/// growth; no eviction policy is provided.
#[derive(Clone, Debug)]
pub struct StableIdMap<K> {
    ids: RowMap<K, u64>,
    next_id: u64,
}

impl<K: RowKey> Default for StableIdMap<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: RowKey> StableIdMap<K> {
    pub fn new() -> Self {
        Self {
            ids: RowMap::new(),
            next_id: 0,
        }
    }

    /// Returns the key's id, allocating the next counter value on first sight.
    pub fn id_of(&mut self, key: &K) -> u64 {
        if let Some(&id) = self.ids.get(key) {
            return id;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.ids.insert(key.clone(), id);
        ltrace!(id, "assigned stable id");
        id
    }

    /// Returns the key's id without allocating.
    pub fn get(&self, key: &K) -> Option<u64> {
        self.ids.get(key).copied()
    }

    /// Number of distinct keys observed so far.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
