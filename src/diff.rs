use alloc::vec::Vec;

use crate::identity::StableIdMap;
use crate::key::{RowKey, RowMap, RowSet};
use crate::{Delta, Entry, Snapshot, Step, ViewError};

/// Derives edit scripts between consecutive snapshots.
///
/// Given a snapshot pair, the engine emits an ordered sequence of [`Step`]s whose deltas
/// transform the previous snapshot into the next one: coalesced removals first, then
/// single-row moves, then coalesced insertions. Each step's snapshot reflects the state
/// after that one delta. Diffing `None` against a snapshot yields a single
/// [`Delta::Reset`] step.
///
/// The move phase is a greedy smallest-cluster-first heuristic: deterministic and cheap,
/// but not globally minimal. Some permutations (e.g. reordering `[3,4,2,1]` back to
/// `[1,2,3,4]`) take more single-row moves than an optimal cluster-preserving plan would.
///
/// Rows within one snapshot must be pairwise distinct by value equality; duplicate values
/// make matching undefined. [`DiffEngine::with_unique_check`] turns on a defensive scan
/// that reports offenders as [`ViewError::NonUniqueElements`] instead.
///
/// The engine owns the session's [`StableIdMap`] and assigns ids to keys the first time
/// they appear in a `next` snapshot, in snapshot order.
#[derive(Clone, Debug)]
pub struct DiffEngine<K> {
    ids: StableIdMap<K>,
    unique_check: bool,
}

impl<K: RowKey> DiffEngine<K> {
    pub fn new() -> Self {
        Self {
            ids: StableIdMap::new(),
            unique_check: false,
        }
    }

    /// Enables the defensive duplicate-value scan over each `next` snapshot.
    ///
    /// The scan is `O(n²)` in the snapshot length (values are only `PartialEq`), so it is
    /// off by default.
    pub fn with_unique_check(mut self, enabled: bool) -> Self {
        self.unique_check = enabled;
        self
    }

    pub fn ids(&self) -> &StableIdMap<K> {
        &self.ids
    }

    /// Stable id for a key, allocating on first sight. See [`StableIdMap::id_of`].
    pub fn id_of(&mut self, key: &K) -> u64 {
        self.ids.id_of(key)
    }

    /// Emits the steps transforming `previous` into `next`, in order, without buffering.
    ///
    /// `previous` must be the snapshot the engine last diffed against (or `None` for the
    /// first call); skipping a snapshot silently loses its steps. Diffing a snapshot
    /// against itself emits nothing.
    pub fn for_each_step<V>(
        &mut self,
        previous: Option<&Snapshot<K, V>>,
        next: &Snapshot<K, V>,
        mut f: impl FnMut(Step<K, V>),
    ) -> Result<(), ViewError>
    where
        V: Clone + PartialEq,
    {
        if self.unique_check {
            check_unique(next)?;
        }

        // Ids are handed out in snapshot order so allocation is deterministic.
        for entry in next {
            self.ids.id_of(&entry.key);
        }

        let Some(previous) = previous else {
            f(Step {
                snapshot: next.clone(),
                delta: Delta::Reset,
            });
            return Ok(());
        };

        ldebug!(prev = previous.len(), next = next.len(), "diff");

        let mut next_pos: RowMap<K, usize> = RowMap::new();
        for (i, entry) in next.iter().enumerate() {
            next_pos.insert(entry.key.clone(), i);
        }
        let prev_keys: RowSet<K> = previous.iter().map(|e| e.key.clone()).collect();

        // Working copy: previous order, next values for surviving rows. Value-only
        // changes carry no delta, so intermediate snapshots must already hold the new
        // values for the step sequence to land exactly on `next`.
        let mut working: Vec<Entry<K, V>> = previous
            .iter()
            .map(|e| match next_pos.get(&e.key) {
                Some(&p) => next.entries()[p].clone(),
                None => e.clone(),
            })
            .collect();

        removal_phase(&mut working, &next_pos, &mut f);
        move_phase(&mut working, next, &prev_keys, &mut f);
        insertion_phase(&mut working, next, &mut f);

        debug_assert_eq!(working.len(), next.len());
        Ok(())
    }

    /// Collects the steps into `out` (clears `out` first).
    pub fn collect_steps<V>(
        &mut self,
        previous: Option<&Snapshot<K, V>>,
        next: &Snapshot<K, V>,
        out: &mut Vec<Step<K, V>>,
    ) -> Result<(), ViewError>
    where
        V: Clone + PartialEq,
    {
        out.clear();
        self.for_each_step(previous, next, |step| out.push(step))
    }

    /// Convenience wrapper around [`Self::for_each_step`] returning a fresh `Vec`.
    pub fn diff<V>(
        &mut self,
        previous: Option<&Snapshot<K, V>>,
        next: &Snapshot<K, V>,
    ) -> Result<Vec<Step<K, V>>, ViewError>
    where
        V: Clone + PartialEq,
    {
        let mut out = Vec::new();
        self.for_each_step(previous, next, |step| out.push(step))?;
        Ok(out)
    }
}

impl<K: RowKey> Default for DiffEngine<K> {
    fn default() -> Self {
        Self::new()
    }
}

fn check_unique<K, V: PartialEq>(next: &Snapshot<K, V>) -> Result<(), ViewError> {
    for (i, a) in next.iter().enumerate() {
        for b in next.iter().skip(i + 1) {
            if a.value == b.value {
                return Err(ViewError::NonUniqueElements);
            }
        }
    }
    Ok(())
}

/// Removes rows whose key is gone from `next`, one coalesced run per step.
fn removal_phase<K: RowKey, V: Clone>(
    working: &mut Vec<Entry<K, V>>,
    next_pos: &RowMap<K, usize>,
    f: &mut impl FnMut(Step<K, V>),
) {
    let mut i = 0;
    while i < working.len() {
        if next_pos.contains_key(&working[i].key) {
            i += 1;
            continue;
        }
        let mut end = i + 1;
        while end < working.len() && !next_pos.contains_key(&working[end].key) {
            end += 1;
        }
        let count = end - i;
        working.drain(i..end);
        f(Step {
            snapshot: Snapshot::from_entries(working.clone()),
            delta: Delta::RemoveRange { index: i, count },
        });
    }
}

/// A maximal run of rows sharing the same required positional shift.
#[derive(Clone, Copy, Debug)]
struct Cluster {
    start: usize,
    len: usize,
    delta: isize,
}

fn partition<K: RowKey, V>(working: &[Entry<K, V>], goal_pos: &RowMap<K, usize>) -> Vec<Cluster> {
    let mut clusters: Vec<Cluster> = Vec::new();
    for (i, entry) in working.iter().enumerate() {
        let delta = goal_pos[&entry.key] as isize - i as isize;
        match clusters.last_mut() {
            Some(last) if last.delta == delta => last.len += 1,
            _ => clusters.push(Cluster {
                start: i,
                len: 1,
                delta,
            }),
        }
    }
    clusters
}

/// Reorders the surviving rows into `next` order, one row per step.
///
/// Repeatedly picks the smallest cluster with a non-zero shift (first one wins ties),
/// moves its rows one at a time by that shift, then re-partitions. Greedy, not optimal.
fn move_phase<K: RowKey, V: Clone>(
    working: &mut Vec<Entry<K, V>>,
    next: &Snapshot<K, V>,
    prev_keys: &RowSet<K>,
    f: &mut impl FnMut(Step<K, V>),
) {
    // Target order: `next` restricted to the rows that survived the removal phase.
    let mut goal_pos: RowMap<K, usize> = RowMap::new();
    for entry in next {
        if prev_keys.contains(&entry.key) {
            let p = goal_pos.len();
            goal_pos.insert(entry.key.clone(), p);
        }
    }
    debug_assert_eq!(goal_pos.len(), working.len());

    loop {
        let clusters = partition(working, &goal_pos);
        let mut best: Option<Cluster> = None;
        for c in &clusters {
            if c.delta != 0 && best.is_none_or(|b| c.len < b.len) {
                best = Some(*c);
            }
        }
        let Some(best) = best else {
            break;
        };

        let keys: Vec<K> = working[best.start..best.start + best.len]
            .iter()
            .map(|e| e.key.clone())
            .collect();
        for key in keys {
            let Some(from) = working.iter().position(|e| e.key == key) else {
                lwarn!("cluster row vanished from working order");
                debug_assert!(false, "cluster row vanished from working order");
                continue;
            };
            let to = (from as isize + best.delta) as usize;
            let entry = working.remove(from);
            if to > working.len() {
                lwarn!(from, to, len = working.len(), "move target out of bounds");
                debug_assert!(false, "move target out of bounds (from={from}, to={to})");
            }
            working.insert(to.min(working.len()), entry);
            f(Step {
                snapshot: Snapshot::from_entries(working.clone()),
                delta: Delta::Move { from, to },
            });
        }
    }
}

/// Inserts rows new in `next`, one coalesced run per step.
fn insertion_phase<K: RowKey, V: Clone>(
    working: &mut Vec<Entry<K, V>>,
    next: &Snapshot<K, V>,
    f: &mut impl FnMut(Step<K, V>),
) {
    // `settled` counts rows already matched or inserted; pending rows flush as one run
    // whenever the scan hits a surviving row again (or the end).
    let mut settled = 0usize;
    let mut pending: Vec<Entry<K, V>> = Vec::new();
    for entry in next {
        let matched = working
            .get(settled)
            .is_some_and(|cur| cur.key == entry.key);
        if matched {
            settled = flush_pending(working, settled, &mut pending, f);
            settled += 1;
        } else {
            pending.push(entry.clone());
        }
    }
    flush_pending(working, settled, &mut pending, f);
}

fn flush_pending<K: Clone, V: Clone>(
    working: &mut Vec<Entry<K, V>>,
    at: usize,
    pending: &mut Vec<Entry<K, V>>,
    f: &mut impl FnMut(Step<K, V>),
) -> usize {
    if pending.is_empty() {
        return at;
    }
    let count = pending.len();
    working.splice(at..at, pending.drain(..));
    f(Step {
        snapshot: Snapshot::from_entries(working.clone()),
        delta: Delta::InsertRange { index: at, count },
    });
    at + count
}
