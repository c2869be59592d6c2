//! Tag listing.
//!
//! Tags are free-form and live on the notes themselves; there is no separate
//! registry. The set of known tags is whatever the notes currently carry.

use crate::search::collect_tags;
use crate::store::{NoteStore, StorageBackend};

/// Every distinct tag, ascending.
pub fn all<B: StorageBackend>(store: &NoteStore<B>) -> Vec<String> {
    collect_tags(&store.load_notes())
}
