//! # Storage Layer
//!
//! Sidenotes keeps its whole durable state under three logical keys:
//!
//! ```text
//! sidenotes-notes     # JSON array of every Note
//! sidenotes-settings  # UI preferences
//! sidenotes-version   # schema version marker ("1.0.0")
//! ```
//!
//! Each key is independently readable and clearable.
//!
//! ## Split of Responsibilities
//!
//! - [`StorageBackend`] is the "how": raw string I/O per key. It knows nothing
//!   about notes.
//! - [`note_store::NoteStore`] is the "what": it decodes the collection,
//!   enforces ordering, degrades reads and maps write failures.
//!
//! ## Failure Policy
//!
//! Reads never fail past the store. A missing collection, unparsable JSON or an
//! unavailable backend all yield the default seed set, logged as a warning.
//! Writes surface [`crate::error::SidenotesError::Persistence`].
//!
//! Mutations read through `load_for_write`, which has no fallback: a write is
//! never based on the seed set, so unreadable data stays on disk untouched.
//!
//! ## Implementations
//!
//! - [`fs_backend::FsBackend`]: one `<key>.json` file per key, atomic writes.
//! - [`mem_backend::MemBackend`]: in-memory, for tests. Can simulate write
//!   failures and counts writes.
//!
//! ## Concurrency
//!
//! One active writer is assumed. Every mutation reads the whole collection,
//! changes it and writes it back, so two overlapping un-awaited mutations are
//! last-write-wins on the entire collection.

use crate::error::Result;

pub mod fs_backend;
pub mod mem_backend;
pub mod note_store;

pub use fs_backend::FsBackend;
pub use mem_backend::MemBackend;
pub use note_store::NoteStore;

/// The persisted key namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    Notes,
    Settings,
    Version,
}

impl StorageKey {
    pub const ALL: [StorageKey; 3] = [StorageKey::Notes, StorageKey::Settings, StorageKey::Version];

    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Notes => "sidenotes-notes",
            StorageKey::Settings => "sidenotes-settings",
            StorageKey::Version => "sidenotes-version",
        }
    }
}

impl std::fmt::Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw key/value I/O.
///
/// Methods take `&self`; implementations handle their own interior
/// mutability so the store can be shared behind an `Arc`.
pub trait StorageBackend: Send + Sync {
    /// Read the raw value for `key`.
    /// Returns Ok(None) when the key has never been written (or was removed).
    fn read(&self, key: StorageKey) -> Result<Option<String>>;

    /// Replace the value for `key`.
    /// MUST be atomic: a reader never observes a half-written value.
    fn write(&self, key: StorageKey, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: StorageKey) -> Result<()>;
}
