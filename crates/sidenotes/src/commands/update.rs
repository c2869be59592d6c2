use crate::error::{Result, SidenotesError};
use crate::model::{Note, NoteUpdate};
use crate::store::{NoteStore, StorageBackend};
use tracing::info;

pub fn run<B: StorageBackend>(store: &NoteStore<B>, id: &str, update: NoteUpdate) -> Result<Note> {
    let mut notes = store.load_for_write()?;
    let note = notes
        .iter_mut()
        .find(|n| n.id == id)
        .ok_or_else(|| SidenotesError::NotFound(id.to_string()))?;

    note.apply(update);
    let updated = note.clone();

    store
        .save_notes(&notes)
        .map_err(|e| e.with_unsaved(updated.clone()))?;

    info!(note_id = %id, "Note updated");
    Ok(updated)
}
