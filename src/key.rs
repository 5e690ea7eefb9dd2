#[cfg(not(feature = "std"))]
use alloc::collections::{BTreeMap, BTreeSet};
#[cfg(feature = "std")]
use std::collections::{HashMap, HashSet};

#[cfg(feature = "std")]
pub(crate) type RowMap<K, V> = HashMap<K, V>;
#[cfg(not(feature = "std"))]
pub(crate) type RowMap<K, V> = BTreeMap<K, V>;

#[cfg(feature = "std")]
pub(crate) type RowSet<K> = HashSet<K>;
#[cfg(not(feature = "std"))]
pub(crate) type RowSet<K> = BTreeSet<K>;

/// Bound for row keys.
///
/// `Ord` is required in both modes: the effective sort order appends an ascending-key
/// tie-break so that no two distinct rows ever compare equal.
#[cfg(feature = "std")]
pub trait RowKey: core::hash::Hash + Ord + Clone {}
#[cfg(feature = "std")]
impl<K: core::hash::Hash + Ord + Clone> RowKey for K {}

#[cfg(not(feature = "std"))]
pub trait RowKey: Ord + Clone {}
#[cfg(not(feature = "std"))]
impl<K: Ord + Clone> RowKey for K {}
