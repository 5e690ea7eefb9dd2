/// Failures surfaced by [`SortedProjection`](crate::SortedProjection) and
/// [`DiffEngine`](crate::DiffEngine).
///
/// Every variant is a programming-contract violation of the upstream feed, not a
/// transient fault. Nothing here is retried internally, and a projection that reported
/// [`ViewError::InconsistentState`] must be discarded and rebuilt from the feed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ViewError {
    /// The row map and the sorted order no longer agree: a lookup that must succeed
    /// (e.g. locating a row by its carried value during a delete) found nothing.
    ///
    /// The usual cause is an upstream `Delete` carrying a stale value.
    #[error("row map and sorted order diverged during {context}")]
    InconsistentState {
        /// The operation that hit the divergence.
        context: &'static str,
    },

    /// Two rows within one snapshot compared equal by value, which makes edit-script
    /// matching ambiguous. Only reported when the defensive check is enabled via
    /// [`DiffEngine::with_unique_check`](crate::DiffEngine::with_unique_check).
    #[error("snapshot contains rows with equal values; matching is ambiguous")]
    NonUniqueElements,
}
