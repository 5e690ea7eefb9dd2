//! Keyed sorted projections with incremental edit scripts for list renderers.
//!
//! This crate keeps an ordered materialized view over a keyed collection that is mutated by an
//! unordered stream of upsert/delete events, and derives the structural updates (remove-range,
//! move, insert-range) between successive versions of that view. A virtualized list/grid can
//! apply these granular updates instead of re-rendering from scratch.
//!
//! It is transport- and UI-agnostic. The surrounding system is expected to provide:
//! - an ordered stream of [`ChangeEvent`] batches (e.g. from a remote watch/subscription)
//! - a renderer that applies each [`Step`]'s [`Delta`] against its own position-indexed view
//!
//! [`DeltaFeed`] wires the pieces together for the common case. [`SortedProjection`] (event
//! folding) and [`DiffEngine`] (snapshot pair → edit script) are usable on their own.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod diff;
mod error;
mod feed;
mod identity;
mod key;
mod projection;
mod types;


pub use diff::DiffEngine;
pub use error::ViewError;
pub use feed::DeltaFeed;
pub use identity::StableIdMap;
pub use key::RowKey;
pub use projection::{RowComparator, SortedProjection};
pub use types::{ChangeEvent, Delta, Entry, Snapshot, Step};
