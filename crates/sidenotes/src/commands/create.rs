use crate::error::Result;
use crate::model::{generate_id, Note, NoteDraft};
use crate::store::{NoteStore, StorageBackend};
use tracing::info;

pub fn run<B: StorageBackend>(store: &NoteStore<B>, draft: NoteDraft) -> Result<Note> {
    let mut notes = match store.load_for_write() {
        Ok(notes) => notes,
        Err(e) => return Err(e.with_unsaved(Note::from_draft(generate_id(), draft))),
    };
    let note = Note::from_draft(unique_id(&notes), draft);

    // New notes go to the head: they are the most recent
    notes.insert(0, note.clone());
    store
        .save_notes(&notes)
        .map_err(|e| e.with_unsaved(note.clone()))?;

    info!(note_id = %note.id, "Note created");
    Ok(note)
}

fn unique_id(notes: &[Note]) -> String {
    loop {
        let id = generate_id();
        if !notes.iter().any(|n| n.id == id) {
            return id;
        }
    }
}
