use super::{StorageBackend, StorageKey};
use crate::error::{Result, SidenotesError};
use crate::model::{Note, Settings};
use crate::schema::default_notes;
use tracing::{debug, warn};

/// The durable note collection on top of a [`StorageBackend`].
///
/// All reads and writes of notes, settings and the version marker go through
/// here. Business operations live in `commands/`.
pub struct NoteStore<B: StorageBackend> {
    /// The underlying storage backend.
    /// Exposed as pub(crate) for testing and internal access only.
    pub(crate) backend: B,
}

impl<B: StorageBackend> NoteStore<B> {
    pub fn with_backend(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Strict read of the collection.
    /// Ok(None) when nothing has been stored yet; Err on I/O failure or
    /// unparsable JSON.
    pub fn read_notes(&self) -> Result<Option<Vec<Note>>> {
        match self.backend.read(StorageKey::Notes)? {
            None => Ok(None),
            Some(raw) => {
                let notes: Vec<Note> = serde_json::from_str(&raw)?;
                Ok(Some(notes))
            }
        }
    }

    /// Degrading read, sorted by `updated_at` descending.
    ///
    /// Never fails: a missing collection, corrupt JSON or an unavailable
    /// backend yields the default seed set.
    pub fn load_notes(&self) -> Vec<Note> {
        let mut notes = match self.read_notes() {
            Ok(Some(notes)) => notes,
            Ok(None) => {
                debug!("No stored collection, using default notes");
                default_notes()
            }
            Err(e) => {
                warn!(error = %e, "Failed to read notes, falling back to defaults");
                default_notes()
            }
        };
        sort_by_recent(&mut notes);
        notes
    }

    /// Strict read for a mutation, sorted like [`NoteStore::load_notes`].
    ///
    /// A missing collection is empty. An unreadable one is a `Persistence`
    /// error: a write must never replace stored data with the seed set.
    pub fn load_for_write(&self) -> Result<Vec<Note>> {
        let mut notes = match self.read_notes() {
            Ok(notes) => notes.unwrap_or_default(),
            Err(e) => {
                warn!(error = %e, "Refusing to write over an unreadable collection");
                return Err(SidenotesError::persistence(format!(
                    "stored notes are unreadable: {e}"
                )));
            }
        };
        sort_by_recent(&mut notes);
        Ok(notes)
    }

    /// Persist the whole collection.
    pub fn save_notes(&self, notes: &[Note]) -> Result<()> {
        let raw = serde_json::to_string(notes)?;
        self.backend
            .write(StorageKey::Notes, &raw)
            .map_err(into_persistence)?;
        debug!(count = notes.len(), bytes = raw.len(), "Saved notes");
        Ok(())
    }

    /// The stored schema version marker. Read failures count as "absent".
    pub fn read_version(&self) -> Option<String> {
        match self.backend.read(StorageKey::Version) {
            Ok(v) => v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty()),
            Err(e) => {
                warn!(error = %e, "Failed to read schema version");
                None
            }
        }
    }

    pub fn write_version(&self, version: &str) -> Result<()> {
        self.backend
            .write(StorageKey::Version, version)
            .map_err(into_persistence)
    }

    /// Stored settings, or defaults when absent or unreadable.
    pub fn load_settings(&self) -> Settings {
        let raw = match self.backend.read(StorageKey::Settings) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Settings::default(),
            Err(e) => {
                warn!(error = %e, "Failed to read settings, using defaults");
                return Settings::default();
            }
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!(error = %e, "Corrupt settings, using defaults");
            Settings::default()
        })
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        let raw = serde_json::to_string(settings)?;
        self.backend
            .write(StorageKey::Settings, &raw)
            .map_err(into_persistence)
    }

    /// Remove every persisted key.
    pub fn clear(&self) -> Result<()> {
        for key in StorageKey::ALL {
            self.backend.remove(key).map_err(into_persistence)?;
        }
        Ok(())
    }
}

/// Most recently updated first. Stable, so ties keep storage order.
pub fn sort_by_recent(notes: &mut [Note]) {
    notes.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

fn into_persistence(e: SidenotesError) -> SidenotesError {
    match e {
        SidenotesError::Persistence { .. } => e,
        other => SidenotesError::persistence(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NoteDraft, Theme};
    use crate::store::mem_backend::MemBackend;
    use chrono::{Duration, Utc};

    fn make_store() -> NoteStore<MemBackend> {
        NoteStore::with_backend(MemBackend::new())
    }

    fn note(id: &str, minutes_ago: i64) -> Note {
        let mut n = Note::from_draft(id.to_string(), NoteDraft::new().title(id));
        n.created_at = Utc::now() - Duration::days(1);
        n.updated_at = Utc::now() - Duration::minutes(minutes_ago);
        n
    }

    #[test]
    fn test_load_without_collection_returns_defaults() {
        let store = make_store();
        let notes = store.load_notes();
        assert_eq!(notes.len(), 3);
        assert_eq!(notes[0].id, "1");
    }

    #[test]
    fn test_load_corrupt_collection_returns_defaults() {
        let store = make_store();
        store.backend.put_raw(StorageKey::Notes, "{not json");
        assert_eq!(store.load_notes().len(), 3);
        assert!(store.read_notes().is_err());
    }

    #[test]
    fn test_load_unavailable_backend_returns_defaults() {
        let store = make_store();
        store.backend.set_simulate_read_error(true);
        assert_eq!(store.load_notes().len(), 3);
    }

    #[test]
    fn test_load_sorts_by_updated_desc() {
        let store = make_store();
        store
            .save_notes(&[note("old", 30), note("new", 1), note("mid", 10)])
            .unwrap();
        let ids: Vec<String> = store.load_notes().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_load_for_write_is_strict() {
        let store = make_store();
        assert_eq!(store.load_for_write().unwrap(), Vec::new());

        store.backend.put_raw(StorageKey::Notes, "{not json");
        assert!(matches!(
            store.load_for_write(),
            Err(SidenotesError::Persistence { .. })
        ));

        store.save_notes(&[note("a", 5), note("b", 1)]).unwrap();
        store.backend.set_simulate_read_error(true);
        assert!(store.load_for_write().is_err());

        store.backend.set_simulate_read_error(false);
        let ids: Vec<String> = store.load_for_write().unwrap().into_iter().map(|n| n.id).collect();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn test_save_failure_is_persistence_error() {
        let store = make_store();
        store.backend.set_simulate_write_error(true);
        let err = store.save_notes(&[note("a", 0)]).unwrap_err();
        assert!(matches!(err, SidenotesError::Persistence { .. }));
    }

    #[test]
    fn test_version_roundtrip() {
        let store = make_store();
        assert_eq!(store.read_version(), None);
        store.write_version("1.0.0").unwrap();
        assert_eq!(store.read_version().as_deref(), Some("1.0.0"));
    }

    #[test]
    fn test_settings_default_when_corrupt() {
        let store = make_store();
        store.backend.put_raw(StorageKey::Settings, "???");
        assert_eq!(store.load_settings(), Settings::default());

        let settings = Settings {
            theme: Theme::Dark,
            autosave_ms: 250,
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);
    }

    #[test]
    fn test_clear_removes_all_keys() {
        let store = make_store();
        store.save_notes(&[note("a", 0)]).unwrap();
        store.write_version("1.0.0").unwrap();
        store.save_settings(&Settings::default()).unwrap();

        store.clear().unwrap();

        for key in StorageKey::ALL {
            assert_eq!(store.backend.get_raw(key), None);
        }
    }
}
