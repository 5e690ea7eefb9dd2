use alloc::vec::Vec;

use crate::diff::DiffEngine;
use crate::key::RowKey;
use crate::projection::SortedProjection;
use crate::{ChangeEvent, Snapshot, Step, ViewError};

/// Drives a [`SortedProjection`] and a [`DiffEngine`] as one pipeline: change-event
/// batches in, edit-script steps out.
///
/// Diffing is only meaningful over strictly consecutive snapshot pairs; a skipped
/// snapshot silently loses its intermediate steps. The feed upholds that contract by
/// owning the previous snapshot, so callers don't have to thread it around.
///
/// The first applied batch yields a single [`Delta::Reset`](crate::Delta::Reset) step.
/// After any error the feed must be discarded, like the projection inside it.
#[derive(Debug)]
pub struct DeltaFeed<K, V> {
    projection: SortedProjection<K, V>,
    engine: DiffEngine<K>,
    last: Option<Snapshot<K, V>>,
}

impl<K: RowKey, V: Clone> Clone for DeltaFeed<K, V> {
    fn clone(&self) -> Self {
        Self {
            projection: self.projection.clone(),
            engine: self.engine.clone(),
            last: self.last.clone(),
        }
    }
}

impl<K: RowKey, V: Clone + PartialEq> DeltaFeed<K, V> {
    pub fn new(projection: SortedProjection<K, V>) -> Self {
        Self::with_engine(projection, DiffEngine::new())
    }

    /// Builds a feed around an existing engine, e.g. to keep one stable-id space across
    /// a projection rebuild.
    pub fn with_engine(projection: SortedProjection<K, V>, engine: DiffEngine<K>) -> Self {
        Self {
            projection,
            engine,
            last: None,
        }
    }

    pub fn projection(&self) -> &SortedProjection<K, V> {
        &self.projection
    }

    pub fn engine(&self) -> &DiffEngine<K> {
        &self.engine
    }

    /// The snapshot the last emitted step sequence arrived at, if any batch was applied.
    pub fn latest(&self) -> Option<&Snapshot<K, V>> {
        self.last.as_ref()
    }

    /// Stable id for a key, allocating on first sight. See [`StableIdMap::id_of`](crate::StableIdMap::id_of).
    pub fn id_of(&mut self, key: &K) -> u64 {
        self.engine.id_of(key)
    }

    /// Applies one batch and emits the resulting steps, in order, without buffering.
    pub fn for_each_step<I>(
        &mut self,
        batch: I,
        f: impl FnMut(Step<K, V>),
    ) -> Result<(), ViewError>
    where
        I: IntoIterator<Item = ChangeEvent<K, V>>,
    {
        let next = self.projection.apply(batch)?.clone();
        self.engine.for_each_step(self.last.as_ref(), &next, f)?;
        self.last = Some(next);
        Ok(())
    }

    /// Applies one batch and returns the resulting steps.
    pub fn apply<I>(&mut self, batch: I) -> Result<Vec<Step<K, V>>, ViewError>
    where
        I: IntoIterator<Item = ChangeEvent<K, V>>,
    {
        let mut out = Vec::new();
        self.for_each_step(batch, |step| out.push(step))?;
        Ok(out)
    }

    pub fn into_parts(self) -> (SortedProjection<K, V>, DiffEngine<K>) {
        (self.projection, self.engine)
    }
}
