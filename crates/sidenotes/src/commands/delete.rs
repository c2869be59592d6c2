use crate::error::{Result, SidenotesError};
use crate::model::Note;
use crate::store::{NoteStore, StorageBackend};
use tracing::info;

/// Permanently remove a note. There is no tombstone and no undo.
///
/// The engine allows the collection to become empty; callers that want to
/// keep at least one note enforce that themselves.
pub fn run<B: StorageBackend>(store: &NoteStore<B>, id: &str) -> Result<Note> {
    let mut notes = store.load_for_write()?;
    let pos = notes
        .iter()
        .position(|n| n.id == id)
        .ok_or_else(|| SidenotesError::NotFound(id.to_string()))?;

    let removed = notes.remove(pos);
    store.save_notes(&notes)?;

    info!(note_id = %id, "Note deleted");
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{init, list};
    use crate::store::MemBackend;

    fn make_store() -> NoteStore<MemBackend> {
        let store = NoteStore::with_backend(MemBackend::new());
        init::run(&store).unwrap();
        store
    }

    #[test]
    fn test_delete_removes_note() {
        let store = make_store();
        let removed = run(&store, "2").unwrap();
        assert_eq!(removed.title, "Project Ideas");
        assert!(list::get(&store, "2").is_none());
        assert_eq!(list::run(&store).len(), 2);
    }

    #[test]
    fn test_delete_unknown_is_not_found() {
        let store = make_store();
        assert!(run(&store, "nope").unwrap_err().is_not_found());
    }

    #[test]
    fn test_engine_allows_empty_collection() {
        let store = make_store();
        for id in ["1", "2", "3"] {
            run(&store, id).unwrap();
        }
        assert_eq!(store.read_notes().unwrap(), Some(Vec::new()));
    }

    #[test]
    fn test_delete_during_read_outage_writes_nothing() {
        let store = make_store();
        let writes = store.backend().write_count();
        store.backend().set_simulate_read_error(true);

        assert!(matches!(
            run(&store, "1"),
            Err(SidenotesError::Persistence { .. })
        ));
        assert_eq!(store.backend().write_count(), writes);
    }

    #[test]
    fn test_delete_write_failure_surfaces() {
        let store = make_store();
        store.backend().set_simulate_write_error(true);
        assert!(matches!(
            run(&store, "1"),
            Err(SidenotesError::Persistence { .. })
        ));
    }
}
