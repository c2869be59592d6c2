use crate::error::Result;
use crate::schema::{default_notes, migrate, SCHEMA_VERSION};
use crate::store::{NoteStore, StorageBackend};
use tracing::{info, warn};

/// What `initialize` found and did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// No versioned collection existed; the default notes were written.
    Seeded,
    /// A collection from an older schema was normalized and re-stamped.
    Migrated { from: String },
    /// A current collection exists; nothing was written.
    Current,
    /// A version marker exists but the collection cannot be read. Nothing is
    /// written so the stored data stays recoverable; reads degrade.
    Unreadable,
}

pub fn run<B: StorageBackend>(store: &NoteStore<B>) -> Result<InitOutcome> {
    let version = store.read_version();

    let Some(version) = version else {
        return seed(store);
    };

    match store.read_notes() {
        Ok(None) => seed(store),
        Ok(Some(_)) if version == SCHEMA_VERSION => Ok(InitOutcome::Current),
        Ok(Some(notes)) => {
            let migrated = migrate(notes, &version);
            store.save_notes(&migrated)?;
            store.write_version(SCHEMA_VERSION)?;
            Ok(InitOutcome::Migrated { from: version })
        }
        Err(e) => {
            warn!(error = %e, version = %version, "Stored collection is unreadable");
            Ok(InitOutcome::Unreadable)
        }
    }
}

fn seed<B: StorageBackend>(store: &NoteStore<B>) -> Result<InitOutcome> {
    store.save_notes(&default_notes())?;
    store.write_version(SCHEMA_VERSION)?;
    info!(version = SCHEMA_VERSION, "Initialized with default notes");
    Ok(InitOutcome::Seeded)
}
