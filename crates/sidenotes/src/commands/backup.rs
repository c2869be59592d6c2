//! Export and import of the backup envelope.
//!
//! ## Format
//!
//! ```text
//! {
//!   "version": "1.0.0",
//!   "exportDate": "2025-01-15T10:00:00Z",
//!   "notes": [ { "id": "...", "title": "...", "content": "...", ... } ]
//! }
//! ```
//!
//! Exports are pretty-printed and named `sidenotes-backup-<YYYY-MM-DD>.json`.
//!
//! ## Import Validation
//!
//! The top level must be an object with a `notes` array. Each entry is kept
//! only if it reads as a [`Note`]: non-empty string `id`, string `title` and
//! `content` (empty allowed), and correctly typed optional fields. Bad entries
//! are skipped, duplicate ids keep their first occurrence. If nothing
//! survives, the import fails and the stored collection is untouched.
//! Otherwise the whole collection is replaced.

use crate::error::{Result, SidenotesError};
use crate::model::{BackupEnvelope, Note};
use crate::schema::SCHEMA_VERSION;
use crate::store::{NoteStore, StorageBackend};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

/// The "save file" collaborator an export is handed to.
pub trait BackupSink {
    fn save(&self, filename: &str, contents: &str) -> Result<()>;
}

/// Writes backups into a directory.
pub struct DirSink {
    dir: PathBuf,
}

impl DirSink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl BackupSink for DirSink {
    fn save(&self, filename: &str, contents: &str) -> Result<()> {
        if !self.dir.exists() {
            fs::create_dir_all(&self.dir)?;
        }
        let target = self.dir.join(filename);
        let tmp = self.dir.join(format!(".backup-{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, contents)?;
        fs::rename(&tmp, &target)?;
        Ok(())
    }
}

pub fn backup_filename(date: DateTime<Utc>) -> String {
    format!("sidenotes-backup-{}.json", date.format("%Y-%m-%d"))
}

pub fn envelope<B: StorageBackend>(store: &NoteStore<B>) -> BackupEnvelope {
    BackupEnvelope {
        version: SCHEMA_VERSION.to_string(),
        export_date: Utc::now(),
        notes: store.load_notes(),
    }
}

/// Serialize the collection and hand it to `sink`. Returns the filename used.
pub fn export<B: StorageBackend>(store: &NoteStore<B>, sink: &dyn BackupSink) -> Result<String> {
    let envelope = envelope(store);
    let filename = backup_filename(envelope.export_date);
    let contents = serde_json::to_string_pretty(&envelope)?;

    sink.save(&filename, &contents)?;

    info!(
        filename = %filename,
        notes = envelope.notes.len(),
        "Exported backup"
    );
    Ok(filename)
}

/// Validate a raw backup and extract its well-formed notes.
pub fn parse(raw: &str) -> Result<Vec<Note>> {
    let value: Value = serde_json::from_str(raw)
        .map_err(|e| SidenotesError::ImportFormat(format!("not valid JSON: {}", e)))?;

    let entries = value
        .get("notes")
        .and_then(Value::as_array)
        .ok_or_else(|| SidenotesError::ImportFormat("expected an object with a notes array".into()))?;

    let mut seen = HashSet::new();
    let mut valid = Vec::new();
    for entry in entries {
        match serde_json::from_value::<Note>(entry.clone()) {
            Ok(note) if !note.id.is_empty() && seen.insert(note.id.clone()) => valid.push(note),
            Ok(note) => warn!(note_id = %note.id, "Skipping note with empty or duplicate id"),
            Err(e) => warn!(error = %e, "Skipping malformed note"),
        }
    }

    if valid.is_empty() {
        return Err(SidenotesError::ImportFormat("no valid notes found".into()));
    }
    if valid.len() < entries.len() {
        warn!(
            kept = valid.len(),
            skipped = entries.len() - valid.len(),
            "Discarded invalid notes from backup"
        );
    }
    Ok(valid)
}

/// Replace the collection with the notes in `raw`. Returns the count imported.
pub fn import<B: StorageBackend>(store: &NoteStore<B>, raw: &str) -> Result<usize> {
    let notes = parse(raw)?;
    store.save_notes(&notes)?;
    // The restored collection is current; a later init must not reseed it
    store.write_version(SCHEMA_VERSION)?;
    info!(count = notes.len(), "Imported backup");
    Ok(notes.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, init, list};
    use crate::model::NoteDraft;
    use crate::store::MemBackend;
    use crate::test_utils::MemorySink;
    use chrono::TimeZone;

    fn make_store() -> NoteStore<MemBackend> {
        let store = NoteStore::with_backend(MemBackend::new());
        init::run(&store).unwrap();
        store
    }

    #[test]
    fn test_backup_filename_uses_date() {
        let date = Utc.with_ymd_and_hms(2025, 1, 15, 23, 59, 0).unwrap();
        assert_eq!(backup_filename(date), "sidenotes-backup-2025-01-15.json");
    }

    #[test]
    fn test_export_hands_envelope_to_sink() {
        let store = make_store();
        let sink = MemorySink::default();

        let filename = export(&store, &sink).unwrap();

        let saved = sink.saved();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].0, filename);
        let value: Value = serde_json::from_str(&saved[0].1).unwrap();
        assert_eq!(value["version"], SCHEMA_VERSION);
        assert!(value["exportDate"].is_string());
        assert_eq!(value["notes"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn test_export_sink_failure_is_reported() {
        let store = make_store();
        let sink = MemorySink::failing();
        assert!(export(&store, &sink).is_err());
    }

    #[test]
    fn test_roundtrip_restores_collection() {
        let store = make_store();
        create::run(
            &store,
            NoteDraft::new().title("Mine").content("body").tags(["x"]),
        )
        .unwrap();
        let before = list::run(&store);
        let sink = MemorySink::default();
        export(&store, &sink).unwrap();

        let other = NoteStore::with_backend(MemBackend::new());
        let count = import(&other, &sink.saved()[0].1).unwrap();

        assert_eq!(count, before.len());
        assert_eq!(other.read_version().as_deref(), Some(SCHEMA_VERSION));
        let after = list::run(&other);
        let key = |n: &Note| (n.id.clone(), n.title.clone(), n.content.clone(), n.tags.clone());
        assert_eq!(
            before.iter().map(key).collect::<Vec<_>>(),
            after.iter().map(key).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_import_skips_malformed_notes() {
        let store = make_store();
        let raw = r#"{
            "version": "1.0.0",
            "exportDate": "2025-01-15T00:00:00Z",
            "notes": [
                {"id": "ok", "title": "", "content": ""},
                {"id": "bad", "content": "no title"}
            ]
        }"#;

        assert_eq!(import(&store, raw).unwrap(), 1);
        let notes = list::run(&store);
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].id, "ok");
    }

    #[test]
    fn test_import_rejects_bad_shapes_without_mutation() {
        let store = make_store();
        let before = store.read_notes().unwrap();

        for raw in [
            "not json",
            "[]",
            r#"{"notes": "nope"}"#,
            r#"{"version": "1.0.0"}"#,
            r#"{"notes": []}"#,
            r#"{"notes": [{"id": "", "title": "t", "content": "c"}]}"#,
            r#"{"notes": [{"id": "x", "title": 3, "content": "c"}]}"#,
        ] {
            let err = import(&store, raw).unwrap_err();
            assert!(
                matches!(err, SidenotesError::ImportFormat(_)),
                "expected ImportFormat for {}",
                raw
            );
        }

        assert_eq!(store.read_notes().unwrap(), before);
    }

    #[test]
    fn test_import_ignores_extra_fields_and_dedupes() {
        let store = make_store();
        let raw = r#"{"notes": [
            {"id": "a", "title": "A", "content": "", "pinned": true, "tags": ["Foo"]},
            {"id": "a", "title": "A again", "content": ""}
        ], "whatever": 1}"#;

        assert_eq!(import(&store, raw).unwrap(), 1);
        let notes = list::run(&store);
        assert_eq!(notes[0].title, "A");
        assert_eq!(notes[0].tags, vec!["foo"]);
    }
}
